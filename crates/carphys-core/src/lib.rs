pub mod braking;
mod braking_proptest;
pub mod panel;
pub mod piston;
pub mod scheduler;
pub mod surface;
pub mod timebase;

pub use braking::{BrakingError, BrakingModel, BrakingReadout, BrakingResult, REACTION_TIME_S};
pub use panel::{PanelController, PanelState, PanelView, SpeedSlider};
pub use piston::{piston_position, OscillatorPhase, OscillatorState, PistonOscillator, CYCLE_MS};
pub use scheduler::{FrameHandle, FrameQueue, FrameScheduler};
pub use surface::{ParseSurfaceError, SurfaceCondition};
pub use timebase::FrameClock;
