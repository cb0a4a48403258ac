use crate::braking::{BrakingModel, BrakingReadout};
use crate::piston::{OscillatorState, PistonOscillator};
use crate::scheduler::{FrameHandle, FrameQueue, FrameScheduler};
use crate::surface::SurfaceCondition;
use log::{debug, error, warn};
use serde::Serialize;

/// Bounds of the speed input. The braking model itself accepts any
/// non-negative speed.
#[derive(Debug, Clone, Copy)]
pub struct SpeedSlider;

impl SpeedSlider {
    pub const MIN_KMH: f64 = 20.0;
    pub const MAX_KMH: f64 = 140.0;
    pub const STEP_KMH: f64 = 10.0;
    pub const DEFAULT_KMH: f64 = 60.0;

    /// Clamp to the slider range and round to the nearest step.
    pub fn snap(speed_kmh: f64) -> f64 {
        let clamped = speed_kmh.clamp(Self::MIN_KMH, Self::MAX_KMH);
        Self::MIN_KMH + ((clamped - Self::MIN_KMH) / Self::STEP_KMH).round() * Self::STEP_KMH
    }

    /// Every selectable speed, lowest first.
    pub fn stops() -> impl Iterator<Item = f64> {
        let count = ((Self::MAX_KMH - Self::MIN_KMH) / Self::STEP_KMH) as u32;
        (0..=count).map(|i| Self::MIN_KMH + f64::from(i) * Self::STEP_KMH)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PanelState {
    pub speed_kmh: f64,
    pub condition: SurfaceCondition,
    pub animating: bool,
}

impl Default for PanelState {
    fn default() -> Self {
        Self {
            speed_kmh: SpeedSlider::DEFAULT_KMH,
            condition: SurfaceCondition::Dry,
            animating: false,
        }
    }
}

/// Display layer fed by the controller.
pub trait PanelView {
    fn braking_changed(&mut self, state: &PanelState, readout: &BrakingReadout);
    fn animation_changed(&mut self, running: bool);
    fn piston_moved(&mut self, position: f64);
}

/// Owns the interaction state and wires it to the braking model and the
/// piston animation.
pub struct PanelController<S: FrameScheduler, V: PanelView> {
    state: PanelState,
    readout: BrakingReadout,
    oscillator: PistonOscillator<S>,
    view: V,
}

impl<S: FrameScheduler, V: PanelView> PanelController<S, V> {
    pub fn new(scheduler: S, view: V) -> Self {
        let mut panel = Self {
            state: PanelState::default(),
            readout: BrakingReadout::default(),
            oscillator: PistonOscillator::new(scheduler),
            view,
        };
        panel.recompute();
        panel
    }

    pub fn set_speed(&mut self, speed_kmh: f64) {
        if speed_kmh.is_nan() {
            warn!("ignoring NaN speed input");
            return;
        }
        self.state.speed_kmh = SpeedSlider::snap(speed_kmh);
        self.recompute();
    }

    pub fn set_condition(&mut self, condition: SurfaceCondition) {
        self.state.condition = condition;
        self.recompute();
    }

    /// The start/pause button.
    pub fn toggle_animation(&mut self) {
        if self.state.animating {
            self.stop_animation();
        } else {
            self.start_animation();
        }
    }

    pub fn start_animation(&mut self) {
        if self.state.animating {
            return;
        }
        self.state.animating = true;
        self.oscillator.start();
        self.view.animation_changed(true);
    }

    pub fn stop_animation(&mut self) {
        if !self.state.animating {
            return;
        }
        self.state.animating = false;
        self.oscillator.stop();
        self.view.animation_changed(false);
    }

    /// Forward a display refresh to the piston and the view.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp_ms: f64) -> Option<f64> {
        let position = self.oscillator.on_frame(handle, timestamp_ms)?;
        self.view.piston_moved(position);
        Some(position)
    }

    pub fn state(&self) -> &PanelState {
        &self.state
    }

    pub fn readout(&self) -> &BrakingReadout {
        &self.readout
    }

    pub fn piston(&self) -> OscillatorState {
        self.oscillator.state()
    }

    pub fn oscillator(&self) -> &PistonOscillator<S> {
        &self.oscillator
    }

    pub fn oscillator_mut(&mut self) -> &mut PistonOscillator<S> {
        &mut self.oscillator
    }

    pub fn view(&self) -> &V {
        &self.view
    }

    pub fn view_mut(&mut self) -> &mut V {
        &mut self.view
    }

    fn recompute(&mut self) {
        match BrakingModel::compute(self.state.speed_kmh, self.state.condition) {
            Ok(result) => {
                self.readout = result.readout();
                debug!(
                    "braking at {} km/h on {} road: {}",
                    self.state.speed_kmh, self.state.condition, self.readout
                );
                self.view.braking_changed(&self.state, &self.readout);
            }
            Err(e) => error!("braking recompute failed: {e}"),
        }
    }
}

impl<V: PanelView> PanelController<FrameQueue, V> {
    /// Dispatch one display refresh to every due frame.
    pub fn render_frame(&mut self, timestamp_ms: f64) -> Option<f64> {
        let mut latest = None;
        for handle in self.oscillator.scheduler_mut().take_due() {
            if let Some(position) = self.on_frame(handle, timestamp_ms) {
                latest = Some(position);
            }
        }
        latest
    }
}
