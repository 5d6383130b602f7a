use std::collections::VecDeque;

/// Opaque id of one scheduled callback.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize)]
pub struct FrameHandle(u64);

impl FrameHandle {
    /// Raw id, unique within the scheduler that issued it.
    pub fn id(self) -> u64 {
        self.0
    }
}

/// Host scheduler contract seen by the controller.
///
/// Callbacks are not closures: the scheduler hands back the handle when it fires, and the owner of
/// the handle decides what to run. A cancelled handle must never be handed back.
pub trait FrameScheduler {
    /// Schedule a callback for the next display refresh.
    fn request_frame(&mut self) -> FrameHandle;
    /// Schedule a callback after the current frame's callbacks, before the next refresh.
    fn defer(&mut self) -> FrameHandle;
    /// Release a handle. Unknown or already-fired handles are ignored.
    fn cancel(&mut self, handle: FrameHandle);
}

/// Cooperative single-threaded scheduler.
///
/// The loop driving it calls [`FrameQueue::begin_frame`] once per refresh, fires the returned
/// handles, then drains [`FrameQueue::pop_deferred`] until empty.
#[derive(Debug, Default)]
pub struct FrameQueue {
    next_id: u64,
    frame: Vec<FrameHandle>,
    deferred: VecDeque<FrameHandle>,
}

impl FrameQueue {
    /// Create an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    fn issue(&mut self) -> FrameHandle {
        self.next_id += 1;
        FrameHandle(self.next_id)
    }

    /// Take every callback requested for this refresh.
    ///
    /// Callbacks requested while these fire land in the next refresh.
    pub fn begin_frame(&mut self) -> Vec<FrameHandle> {
        std::mem::take(&mut self.frame)
    }

    /// Next deferred callback, in request order.
    pub fn pop_deferred(&mut self) -> Option<FrameHandle> {
        self.deferred.pop_front()
    }

    /// Number of callbacks waiting to fire.
    pub fn pending(&self) -> usize {
        self.frame.len() + self.deferred.len()
    }

    /// `true` when nothing is scheduled.
    pub fn is_idle(&self) -> bool {
        self.pending() == 0
    }
}

impl FrameScheduler for FrameQueue {
    fn request_frame(&mut self) -> FrameHandle {
        let h = self.issue();
        self.frame.push(h);
        h
    }

    fn defer(&mut self) -> FrameHandle {
        let h = self.issue();
        self.deferred.push_back(h);
        h
    }

    fn cancel(&mut self, handle: FrameHandle) {
        self.frame.retain(|h| *h != handle);
        self.deferred.retain(|h| *h != handle);
    }
}

#[cfg(test)]
#[path = "../../tests/unit/schedule/queue.rs"]
mod tests;
