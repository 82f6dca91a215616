// Copyright (c) 2026 rezky_nightky

//! Display-synchronized frame requests.
//!
//! The host fires the pending id once per display refresh. Only the newest
//! request is ever honoured, so a frame fired after `cancel` (or after a
//! restart) is a no-op.

use tracing::trace;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct FrameId(u64);

impl FrameId {
    pub fn get(self) -> u64 {
        self.0
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchedulerState {
    Idle,
    Running { pending: FrameId },
}

#[derive(Debug)]
pub struct FrameScheduler {
    state: SchedulerState,
    next_id: u64,
}

impl Default for FrameScheduler {
    fn default() -> Self {
        Self::new()
    }
}

impl FrameScheduler {
    pub fn new() -> Self {
        Self {
            state: SchedulerState::Idle,
            next_id: 1,
        }
    }

    fn request(&mut self) -> FrameId {
        let id = FrameId(self.next_id);
        self.next_id += 1;
        self.state = SchedulerState::Running { pending: id };
        id
    }

    pub fn start(&mut self) -> FrameId {
        let id = self.request();
        trace!(frame = id.0, "scheduler started");
        id
    }

    pub fn cancel(&mut self) {
        if let SchedulerState::Running { pending } = self.state {
            trace!(frame = pending.0, "frame request cancelled");
        }
        self.state = SchedulerState::Idle;
    }

    pub fn state(&self) -> SchedulerState {
        self.state
    }

    pub fn pending(&self) -> Option<FrameId> {
        match self.state {
            SchedulerState::Running { pending } => Some(pending),
            SchedulerState::Idle => None,
        }
    }

    pub fn is_running(&self) -> bool {
        self.pending().is_some()
    }

    /// Runs `work` if `id` is the pending request, then queues the next
    /// frame. Returns whether `work` ran.
    pub fn run_frame<F: FnOnce()>(&mut self, id: FrameId, work: F) -> bool {
        if self.pending() != Some(id) {
            trace!(frame = id.0, "stale frame ignored");
            return false;
        }
        work();
        self.request();
        true
    }
}
