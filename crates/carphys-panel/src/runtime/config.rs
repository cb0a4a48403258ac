use carphys_core::{ParseSurfaceError, SpeedSlider, SurfaceCondition};
use thiserror::Error;

pub const MAX_FPS: u32 = 240;

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("missing value for {flag}")]
    MissingValue { flag: String },
    #[error("invalid value {value:?} for {flag}")]
    InvalidValue { flag: String, value: String },
    #[error(transparent)]
    Surface(#[from] ParseSurfaceError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct RuntimeConfig {
    pub show_help: bool,
    pub run_seconds: Option<u64>,
    pub speed_kmh: f64,
    pub surface: SurfaceCondition,
    pub fps: u32,
    pub animate: bool,
    pub sweep: bool,
    pub json_logs: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            show_help: false,
            run_seconds: None,
            speed_kmh: SpeedSlider::DEFAULT_KMH,
            surface: SurfaceCondition::Dry,
            fps: 60,
            animate: true,
            sweep: false,
            json_logs: false,
        }
    }
}

impl RuntimeConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let args: Vec<String> = std::env::args().collect();
        Self::from_args(&args)
    }

    pub fn from_args(args: &[String]) -> Result<Self, ConfigError> {
        let mut cfg = RuntimeConfig::default();
        let mut i = 1;
        while i < args.len() {
            let flag = args[i].as_str();
            match flag {
                "--speed" => {
                    let value = value_for(args, &mut i)?;
                    cfg.speed_kmh = value
                        .parse::<f64>()
                        .ok()
                        .filter(|v| v.is_finite() && *v >= 0.0)
                        .ok_or_else(|| invalid(flag, value))?;
                }
                "--surface" => {
                    cfg.surface = value_for(args, &mut i)?.parse()?;
                }
                "--fps" => {
                    let value = value_for(args, &mut i)?;
                    cfg.fps = value
                        .parse::<u32>()
                        .ok()
                        .filter(|v| (1..=MAX_FPS).contains(v))
                        .ok_or_else(|| invalid(flag, value))?;
                }
                "--run-seconds" => {
                    let value = value_for(args, &mut i)?;
                    cfg.run_seconds = Some(value.parse().map_err(|_| invalid(flag, value))?);
                }
                "--no-animate" => {
                    cfg.animate = false;
                }
                "--sweep" => {
                    cfg.sweep = true;
                }
                "--json-logs" => {
                    cfg.json_logs = true;
                }
                "--help" | "-h" => {
                    cfg.show_help = true;
                    break;
                }
                _ => {}
            }
            i += 1;
        }
        Ok(cfg)
    }

    pub fn print_help() {
        println!(
            r#"carphys-panel - Braking distance and piston motion explorer

USAGE:
    carphys-panel [OPTIONS]

OPTIONS:
    --speed <KMH>           Car speed, snapped to 20..140 in steps of 10 [default: 60]
    --surface <dry|wet>     Road surface [default: dry]
    --fps <N>               Display refresh rate driving the piston (1..240) [default: 60]
    --run-seconds <SECS>    Run for a fixed duration then exit
    --no-animate            Leave the piston animation paused
    --sweep                 Print stopping distances for every speed and surface, then exit
    --json-logs             Output logs (and sweep rows) as JSON
    -h, --help              Print this help message

ENVIRONMENT VARIABLES:
    RUST_LOG                Set log filter (e.g., RUST_LOG=debug,carphys_core=trace)

EXAMPLES:
    # Wet road at motorway speed, animate for five seconds
    carphys-panel --speed 120 --surface wet --run-seconds 5

    # Full distance table
    carphys-panel --sweep
"#
        );
    }
}

fn value_for<'a>(args: &'a [String], i: &mut usize) -> Result<&'a str, ConfigError> {
    let flag = &args[*i];
    *i += 1;
    args.get(*i)
        .map(String::as_str)
        .ok_or_else(|| ConfigError::MissingValue { flag: flag.clone() })
}

fn invalid(flag: &str, value: &str) -> ConfigError {
    ConfigError::InvalidValue {
        flag: flag.to_string(),
        value: value.to_string(),
    }
}
