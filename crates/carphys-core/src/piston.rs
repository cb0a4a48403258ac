//! Looping piston animation driven by display-refresh frames.
//!
//! The stroke is a trapezoid over a fixed 2 s cycle: rise for the first
//! quarter, dwell at the top, fall for the third quarter, dwell at the bottom.

use crate::scheduler::{FrameHandle, FrameQueue, FrameScheduler};
use log::{debug, trace, warn};
use serde::Serialize;
use std::fmt;

/// Length of one full stroke cycle.
pub const CYCLE_MS: f64 = 2000.0;
pub const POSITION_MIN: f64 = 0.0;
pub const POSITION_MAX: f64 = 100.0;

const RISE_END_PCT: f64 = 25.0;
const TOP_DWELL_END_PCT: f64 = 50.0;
const FALL_END_PCT: f64 = 75.0;
const RAMP_SLOPE: f64 = POSITION_MAX / RISE_END_PCT;

/// Piston position in `[0, 100]` after `elapsed_ms` of motion.
pub fn piston_position(elapsed_ms: f64) -> f64 {
    let elapsed = elapsed_ms.max(0.0);
    let cycle_pct = elapsed.rem_euclid(CYCLE_MS) / CYCLE_MS * 100.0;

    if cycle_pct < RISE_END_PCT {
        cycle_pct * RAMP_SLOPE
    } else if cycle_pct < TOP_DWELL_END_PCT {
        POSITION_MAX
    } else if cycle_pct < FALL_END_PCT {
        POSITION_MAX - (cycle_pct - TOP_DWELL_END_PCT) * RAMP_SLOPE
    } else {
        POSITION_MIN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum OscillatorPhase {
    #[default]
    Stopped,
    Running,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct OscillatorState {
    pub running: bool,
    pub position: f64,
}

pub type PositionListener = Box<dyn FnMut(f64)>;

pub struct PistonOscillator<S: FrameScheduler> {
    scheduler: S,
    phase: OscillatorPhase,
    pending: Option<FrameHandle>,
    phase_origin_ms: Option<f64>,
    position: f64,
    frames_rendered: u64,
    listeners: Vec<PositionListener>,
}

impl<S: FrameScheduler> PistonOscillator<S> {
    pub fn new(scheduler: S) -> Self {
        Self {
            scheduler,
            phase: OscillatorPhase::Stopped,
            pending: None,
            phase_origin_ms: None,
            position: POSITION_MIN,
            frames_rendered: 0,
            listeners: Vec::new(),
        }
    }

    /// Register a callback invoked with every new position, in registration order.
    pub fn on_position_changed<F>(&mut self, listener: F)
    where
        F: FnMut(f64) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub fn start(&mut self) {
        if self.phase == OscillatorPhase::Running {
            return;
        }
        self.phase = OscillatorPhase::Running;
        // The origin is taken from the first frame, not from now.
        self.phase_origin_ms = None;
        self.pending = Some(self.scheduler.schedule_next());
        debug!("piston oscillator started");
    }

    /// Halt updates and release the pending frame. The last position is kept.
    pub fn stop(&mut self) {
        if self.phase == OscillatorPhase::Stopped {
            return;
        }
        self.phase = OscillatorPhase::Stopped;
        self.release_frame();
        debug!(
            "piston oscillator stopped at position {:.1} after {} frames",
            self.position, self.frames_rendered
        );
    }

    /// Deliver a display refresh. Returns the new position, or `None` when the
    /// frame was not the one this oscillator is waiting for.
    pub fn on_frame(&mut self, handle: FrameHandle, timestamp_ms: f64) -> Option<f64> {
        if self.phase != OscillatorPhase::Running || self.pending != Some(handle) {
            trace!("ignoring stale frame {}", handle.id());
            return None;
        }
        self.pending = None;

        if !timestamp_ms.is_finite() {
            warn!("skipping frame {} with non-finite timestamp", handle.id());
            self.pending = Some(self.scheduler.schedule_next());
            return None;
        }

        let origin = *self.phase_origin_ms.get_or_insert_with(|| {
            debug!("piston phase origin captured at {timestamp_ms:.3} ms");
            timestamp_ms
        });
        let position = piston_position(timestamp_ms - origin);
        self.position = position;
        self.frames_rendered += 1;
        trace!("frame {} -> position {position:.2}", handle.id());

        for listener in self.listeners.iter_mut() {
            listener(position);
        }

        self.pending = Some(self.scheduler.schedule_next());
        Some(position)
    }

    pub fn state(&self) -> OscillatorState {
        OscillatorState {
            running: self.is_running(),
            position: self.position,
        }
    }

    pub fn phase(&self) -> OscillatorPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == OscillatorPhase::Running
    }

    pub fn position(&self) -> f64 {
        self.position
    }

    pub fn phase_origin_ms(&self) -> Option<f64> {
        self.phase_origin_ms
    }

    pub fn pending_frame(&self) -> Option<FrameHandle> {
        self.pending
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames_rendered
    }

    pub fn scheduler(&self) -> &S {
        &self.scheduler
    }

    /// Cancelling the pending frame through this reference stalls the animation
    /// until the next `stop`/`start`.
    pub fn scheduler_mut(&mut self) -> &mut S {
        &mut self.scheduler
    }

    fn release_frame(&mut self) {
        if let Some(handle) = self.pending.take() {
            self.scheduler.cancel(handle);
        }
    }
}

impl PistonOscillator<FrameQueue> {
    /// Dispatch one display refresh at `timestamp_ms` to every due frame.
    pub fn render_frame(&mut self, timestamp_ms: f64) -> Option<f64> {
        let mut latest = None;
        for handle in self.scheduler.take_due() {
            if let Some(position) = self.on_frame(handle, timestamp_ms) {
                latest = Some(position);
            }
        }
        latest
    }
}

impl<S: FrameScheduler> Drop for PistonOscillator<S> {
    fn drop(&mut self) {
        self.release_frame();
    }
}

impl<S: FrameScheduler> fmt::Debug for PistonOscillator<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PistonOscillator")
            .field("phase", &self.phase)
            .field("pending", &self.pending)
            .field("phase_origin_ms", &self.phase_origin_ms)
            .field("position", &self.position)
            .field("frames_rendered", &self.frames_rendered)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;
    use std::cell::{Cell, RefCell};
    use std::rc::Rc;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn waveform_quarter_points() {
        assert!(approx(piston_position(0.0), 0.0));
        assert!(approx(piston_position(250.0), 50.0));
        assert!(approx(piston_position(500.0), 100.0));
        assert!(approx(piston_position(1000.0), 100.0));
        assert!(approx(piston_position(1250.0), 50.0));
        assert!(approx(piston_position(1500.0), 0.0));
        assert!(approx(piston_position(1999.0), 0.0));
        assert!(approx(piston_position(2000.0), 0.0));
    }

    #[test]
    fn waveform_treats_negative_elapsed_as_zero() {
        assert_eq!(piston_position(-300.0), 0.0);
    }

    #[test]
    fn cycle_samples_from_arbitrary_origin() {
        let mut osc = PistonOscillator::new(FrameQueue::new());
        osc.start();
        let t0 = 1234.5;
        let samples: Vec<f64> = [0.0, 500.0, 1000.0, 1500.0, 2000.0]
            .iter()
            .map(|dt| osc.render_frame(t0 + dt).unwrap())
            .collect();
        assert!(approx(samples[0], 0.0));
        assert!(approx(samples[1], 100.0));
        assert!(approx(samples[2], 100.0));
        assert!(approx(samples[3], 0.0));
        assert!(approx(samples[4], samples[0]));
        assert_eq!(osc.phase_origin_ms(), Some(t0));
    }

    #[test]
    fn zero_timestamp_is_a_valid_origin() {
        let mut osc = PistonOscillator::new(FrameQueue::new());
        osc.start();
        assert_eq!(osc.render_frame(0.0), Some(0.0));
        assert_eq!(osc.phase_origin_ms(), Some(0.0));
        assert_eq!(osc.render_frame(500.0), Some(100.0));
    }

    #[test]
    fn origin_comes_from_first_frame_not_start() {
        let mut osc = PistonOscillator::new(FrameQueue::new());
        osc.start();
        assert_eq!(osc.phase_origin_ms(), None);
        osc.render_frame(10_000.0);
        assert_eq!(osc.phase_origin_ms(), Some(10_000.0));
    }

    #[test]
    fn double_start_keeps_one_registration() {
        let mut osc = PistonOscillator::new(FrameQueue::new());
        osc.start();
        osc.start();
        assert_eq!(osc.scheduler().pending_len(), 1);

        let fired = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&fired);
        osc.on_position_changed(move |_| counter.set(counter.get() + 1));

        osc.stop();
        assert_eq!(osc.scheduler().pending_len(), 0);
        assert_eq!(osc.render_frame(16.0), None);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn stop_while_stopped_is_silent() {
        let mut osc = PistonOscillator::new(FrameQueue::new());
        let fired = Rc::new(Cell::new(0u32));
        let counter = Rc::clone(&fired);
        osc.on_position_changed(move |_| counter.set(counter.get() + 1));

        osc.stop();
        osc.stop();
        assert_eq!(osc.phase(), OscillatorPhase::Stopped);
        assert_eq!(fired.get(), 0);
    }

    #[test]
    fn listeners_receive_positions_in_order() {
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut osc = PistonOscillator::new(FrameQueue::new());
        let first = Rc::clone(&seen);
        osc.on_position_changed(move |p| first.borrow_mut().push(("a", p)));
        let second = Rc::clone(&seen);
        osc.on_position_changed(move |p| second.borrow_mut().push(("b", p)));

        osc.start();
        osc.render_frame(100.0);
        osc.render_frame(350.0);

        let seen = seen.borrow();
        assert_eq!(seen.len(), 4);
        assert_eq!(seen[0], ("a", 0.0));
        assert_eq!(seen[1], ("b", 0.0));
        assert_eq!(seen[2].0, "a");
        assert!(approx(seen[2].1, 50.0));
    }

    #[test]
    fn stop_keeps_position_and_restart_rephases() {
        let mut osc = PistonOscillator::new(FrameQueue::new());
        osc.start();
        osc.render_frame(0.0);
        osc.render_frame(700.0);
        osc.stop();
        assert_eq!(osc.state(), OscillatorState { running: false, position: 100.0 });
        assert_eq!(osc.phase_origin_ms(), Some(0.0));

        osc.start();
        assert_eq!(osc.phase_origin_ms(), None);
        assert_eq!(osc.render_frame(5_000.0), Some(0.0));
        assert_eq!(osc.phase_origin_ms(), Some(5_000.0));
    }

    #[test]
    fn stale_handle_is_ignored() {
        let queue = Rc::new(RefCell::new(FrameQueue::new()));
        let mut osc = PistonOscillator::new(Rc::clone(&queue));
        osc.start();
        let handle = osc.pending_frame().unwrap();
        osc.stop();
        assert_eq!(osc.on_frame(handle, 100.0), None);

        osc.start();
        assert_eq!(osc.on_frame(handle, 100.0), None);
        assert_eq!(queue.borrow().pending_len(), 1);
    }

    #[test]
    fn nonfinite_timestamp_skips_but_keeps_running() {
        let mut osc = PistonOscillator::new(FrameQueue::new());
        osc.start();
        assert_eq!(osc.render_frame(f64::NAN), None);
        assert!(osc.is_running());
        assert_eq!(osc.scheduler().pending_len(), 1);
        assert_eq!(osc.phase_origin_ms(), None);
        assert_eq!(osc.render_frame(42.0), Some(0.0));
    }

    #[test]
    fn drop_releases_pending_frame() {
        let queue = Rc::new(RefCell::new(FrameQueue::new()));
        {
            let mut osc = PistonOscillator::new(Rc::clone(&queue));
            osc.start();
            let due = queue.borrow_mut().take_due();
            assert_eq!(osc.on_frame(due[0], 0.0), Some(0.0));
            assert_eq!(queue.borrow().pending_len(), 1);
        }
        assert_eq!(queue.borrow().pending_len(), 0);
    }

    #[test]
    fn drop_while_stopped_is_harmless() {
        let queue = Rc::new(RefCell::new(FrameQueue::new()));
        let osc = PistonOscillator::new(Rc::clone(&queue));
        drop(osc);
        assert_eq!(queue.borrow().pending_len(), 0);
    }

    proptest! {
        #[test]
        fn waveform_is_periodic_and_bounded(elapsed in 0.0f64..1.0e7) {
            let p = piston_position(elapsed);
            prop_assert!((POSITION_MIN..=POSITION_MAX).contains(&p));
            let next = piston_position(elapsed + CYCLE_MS);
            // Segment edges may land on either side after float rounding.
            let near_edge = [0.0, 500.0, 1000.0, 1500.0]
                .iter()
                .any(|edge| (elapsed.rem_euclid(CYCLE_MS) - edge).abs() < 1e-3);
            if !near_edge {
                prop_assert!((p - next).abs() < 1e-3, "elapsed={} p={} next={}", elapsed, p, next);
            }
        }
    }
}
