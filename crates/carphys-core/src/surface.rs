use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Road surface under the tyres. Selects the deceleration the car can reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceCondition {
    #[default]
    Dry,
    Wet,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown surface condition {input:?} (expected \"dry\" or \"wet\")")]
pub struct ParseSurfaceError {
    pub input: String,
}

impl SurfaceCondition {
    pub const ALL: [SurfaceCondition; 2] = [SurfaceCondition::Dry, SurfaceCondition::Wet];

    /// Constant deceleration in m/s² once the brakes are engaged.
    pub fn deceleration_ms2(self) -> f64 {
        match self {
            Self::Dry => 7.0,
            Self::Wet => 3.5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Dry => "Dry Road",
            Self::Wet => "Wet Road",
        }
    }

    /// One-line note shown under the stopping distance.
    pub fn explanation(self) -> &'static str {
        match self {
            Self::Dry => "Dry road has more friction, so the car slows down faster.",
            Self::Wet => "Wet road has less friction, so it takes longer to stop.",
        }
    }
}

impl fmt::Display for SurfaceCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Dry => f.pad("dry"),
            Self::Wet => f.pad("wet"),
        }
    }
}

impl FromStr for SurfaceCondition {
    type Err = ParseSurfaceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "dry" => Ok(Self::Dry),
            "wet" => Ok(Self::Wet),
            _ => Err(ParseSurfaceError {
                input: s.to_string(),
            }),
        }
    }
}
