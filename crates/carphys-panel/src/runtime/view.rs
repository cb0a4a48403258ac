use carphys_core::{BrakingReadout, PanelState, PanelView};
use tracing::{debug, info, trace};

const TOP: f64 = 100.0;
const BOTTOM: f64 = 0.0;

/// Display layer that renders the panel into structured log events.
#[derive(Debug, Default)]
pub struct TracingView {
    last_position: Option<f64>,
    strokes: u64,
}

impl TracingView {
    pub fn new() -> Self {
        Self::default()
    }

    /// Completed trips to the top of the cylinder.
    pub fn strokes(&self) -> u64 {
        self.strokes
    }
}

impl PanelView for TracingView {
    fn braking_changed(&mut self, state: &PanelState, readout: &BrakingReadout) {
        info!(
            speed_kmh = state.speed_kmh,
            surface = %state.condition,
            total_m = %readout.total(),
            reaction_m = %readout.reaction(),
            braking_m = %readout.braking(),
            reaction_share = readout.reaction_share(),
            "Stopping distance updated"
        );
        debug!(
            surface = state.condition.label(),
            formula = carphys_core::braking::FORMULA,
            "{}",
            state.condition.explanation()
        );
    }

    fn animation_changed(&mut self, running: bool) {
        if running {
            info!("Piston animation started");
        } else {
            info!(strokes = self.strokes, "Piston animation paused");
        }
        self.last_position = None;
    }

    fn piston_moved(&mut self, position: f64) {
        trace!(position, "Piston moved");
        let previous = self.last_position.replace(position);
        match previous {
            Some(prev) if prev < TOP && position >= TOP => {
                self.strokes += 1;
                debug!(stroke = self.strokes, "Piston at top of stroke");
            }
            Some(prev) if prev > BOTTOM && position <= BOTTOM => {
                debug!(stroke = self.strokes, "Piston at bottom of stroke");
            }
            _ => {}
        }
    }
}
