use std::cell::RefCell;
use std::collections::BTreeSet;
use std::rc::Rc;

/// Registration for one pending display-refresh callback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct FrameHandle(u64);

impl FrameHandle {
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Host capability that delivers a callback on the next display refresh.
///
/// Whoever owns the scheduler dispatches due handles back to the component
/// that requested them.
pub trait FrameScheduler {
    fn schedule_next(&mut self) -> FrameHandle;
    /// Cancelling an unknown or already-fired handle is a no-op.
    fn cancel(&mut self, handle: FrameHandle);
}

/// In-process frame scheduler for a single-threaded host loop.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    pending: BTreeSet<FrameHandle>,
}

impl FrameQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain every request made since the last refresh, oldest first.
    pub fn take_due(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.pending).into_iter().collect()
    }

    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, handle: FrameHandle) -> bool {
        self.pending.contains(&handle)
    }
}

impl FrameScheduler for FrameQueue {
    fn schedule_next(&mut self) -> FrameHandle {
        self.next_id += 1;
        let handle = FrameHandle(self.next_id);
        self.pending.insert(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.pending.remove(&handle);
    }
}

impl<S: FrameScheduler + ?Sized> FrameScheduler for Rc<RefCell<S>> {
    fn schedule_next(&mut self) -> FrameHandle {
        self.borrow_mut().schedule_next()
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.borrow_mut().cancel(handle)
    }
}
