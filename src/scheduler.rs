//! "Run one tick before the next repaint" as an injectable capability.
//!
//! The game never calls back into itself: it asks its scheduler for one more
//! tick, and the host later calls `Game::tick` with a monotonic timestamp. In
//! the browser that is `requestAnimationFrame`; in tests it is
//! [`ManualScheduler`], which only records the request.

use std::cell::RefCell;
use std::rc::Rc;

use crate::error::ScheduleError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TickHandle(pub i32);

pub trait FrameScheduler {
    fn request_tick(&mut self) -> Result<TickHandle, ScheduleError>;
    fn cancel_tick(&mut self, handle: TickHandle);
}

#[derive(Debug, Default)]
struct ManualState {
    next_id: i32,
    pending: Option<TickHandle>,
    requested: u32,
    cancelled: Vec<TickHandle>,
}

/// Scheduler for deterministic driving. Clones share state, so a test can keep
/// one clone while the game owns another.
#[derive(Clone, Debug, Default)]
pub struct ManualScheduler {
    state: Rc<RefCell<ManualState>>,
}

impl ManualScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Consumes the outstanding request, if any. The caller is expected to
    /// follow up with `game.tick(now)`.
    pub fn take_pending(&self) -> Option<TickHandle> {
        self.state.borrow_mut().pending.take()
    }

    pub fn pending(&self) -> Option<TickHandle> {
        self.state.borrow().pending
    }

    pub fn requested(&self) -> u32 {
        self.state.borrow().requested
    }

    pub fn cancelled(&self) -> Vec<TickHandle> {
        self.state.borrow().cancelled.clone()
    }
}

impl FrameScheduler for ManualScheduler {
    fn request_tick(&mut self) -> Result<TickHandle, ScheduleError> {
        let mut state = self.state.borrow_mut();
        state.next_id += 1;
        state.requested += 1;
        let handle = TickHandle(state.next_id);
        state.pending = Some(handle);
        Ok(handle)
    }

    fn cancel_tick(&mut self, handle: TickHandle) {
        let mut state = self.state.borrow_mut();
        if state.pending == Some(handle) {
            state.pending = None;
        }
        state.cancelled.push(handle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn manual_scheduler_tracks_single_pending_request() {
        let sched = ManualScheduler::new();
        let mut owned = sched.clone();
        let h1 = owned.request_tick().unwrap();
        assert_eq!(sched.pending(), Some(h1));
        owned.cancel_tick(h1);
        assert_eq!(sched.pending(), None);
        assert_eq!(sched.cancelled(), vec![h1]);

        let h2 = owned.request_tick().unwrap();
        assert_ne!(h1, h2);
        assert_eq!(sched.take_pending(), Some(h2));
        assert_eq!(sched.take_pending(), None);
        assert_eq!(sched.requested(), 2);
    }
}
