//! Stopping distance of a car: thinking distance plus braking distance.
//!
//! The computation is pure. Full precision is kept in [`BrakingResult`];
//! rounding to one decimal only happens in [`BrakingReadout`].

use crate::surface::SurfaceCondition;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

/// Human perception-response delay before the brakes engage.
pub const REACTION_TIME_S: f64 = 1.5;

const KMH_PER_MS: f64 = 3.6;

/// Stopping distance formula as shown next to the result.
pub const FORMULA: &str = "d = v₀t + v² / (2a)";

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum BrakingError {
    #[error("speed must be a finite, non-negative number of km/h (got {speed_kmh})")]
    InvalidSpeed { speed_kmh: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BrakingResult {
    pub total_distance_m: f64,
    pub reaction_distance_m: f64,
    pub braking_distance_m: f64,
}

/// Stateless stopping-distance model.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrakingModel;

impl BrakingModel {
    pub fn compute(
        speed_kmh: f64,
        condition: SurfaceCondition,
    ) -> Result<BrakingResult, BrakingError> {
        if !speed_kmh.is_finite() || speed_kmh < 0.0 {
            return Err(BrakingError::InvalidSpeed { speed_kmh });
        }

        let speed_ms = speed_kmh / KMH_PER_MS;
        let decel = condition.deceleration_ms2();

        let reaction_distance_m = speed_ms * REACTION_TIME_S;
        // v² = 2·a·d under constant deceleration to a stop
        let braking_distance_m = (speed_ms * speed_ms) / (2.0 * decel);

        Ok(BrakingResult {
            total_distance_m: reaction_distance_m + braking_distance_m,
            reaction_distance_m,
            braking_distance_m,
        })
    }
}

impl BrakingResult {
    pub fn readout(&self) -> BrakingReadout {
        BrakingReadout {
            total_m: round_tenth(self.total_distance_m),
            reaction_m: round_tenth(self.reaction_distance_m),
            braking_m: round_tenth(self.braking_distance_m),
        }
    }
}

/// Distances rounded half away from zero to one decimal place.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct BrakingReadout {
    pub total_m: f64,
    pub reaction_m: f64,
    pub braking_m: f64,
}

impl BrakingReadout {
    pub fn total(&self) -> String {
        format!("{:.1}", self.total_m)
    }

    pub fn reaction(&self) -> String {
        format!("{:.1}", self.reaction_m)
    }

    pub fn braking(&self) -> String {
        format!("{:.1}", self.braking_m)
    }

    /// Fraction of the stopping distance covered before braking starts.
    /// Zero when the car is not moving.
    pub fn reaction_share(&self) -> f64 {
        self.share(self.reaction_m)
    }

    pub fn braking_share(&self) -> f64 {
        self.share(self.braking_m)
    }

    fn share(&self, part: f64) -> f64 {
        if self.total_m > 0.0 {
            part / self.total_m
        } else {
            0.0
        }
    }
}

impl fmt::Display for BrakingReadout {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:.1} m (thinking {:.1} m, braking {:.1} m)",
            self.total_m, self.reaction_m, self.braking_m
        )
    }
}

fn round_tenth(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
