//! Coalesced redraw scheduling
//!
//! Mutations mark the view dirty. However many requests arrive in one tick,
//! at most one frame is pending; the host calls [`RedrawScheduler::take_frame`]
//! at its next paint opportunity.

use std::cell::RefCell;
use std::rc::Rc;

#[derive(Debug, Default)]
struct RedrawState {
    dirty: bool,
    pending: bool,
    frames_scheduled: usize,
}

/// Cheap to clone; clones share state, so one can live in the history's
/// dirty callback while the host holds another
#[derive(Debug, Default, Clone)]
pub struct RedrawScheduler {
    state: Rc<RefCell<RedrawState>>,
}

impl RedrawScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark dirty and schedule a frame unless one is already pending
    pub fn request(&self) {
        let mut state = self.state.borrow_mut();
        state.dirty = true;
        if !state.pending {
            state.pending = true;
            state.frames_scheduled += 1;
        }
    }

    /// Consume the pending frame. Returns whether anything needs drawing.
    pub fn take_frame(&self) -> bool {
        let mut state = self.state.borrow_mut();
        if !state.pending {
            return false;
        }
        state.pending = false;
        std::mem::take(&mut state.dirty)
    }

    /// Drop the pending frame. Calling it again does nothing.
    pub fn cancel(&self) {
        self.state.borrow_mut().pending = false;
    }

    pub fn is_pending(&self) -> bool {
        self.state.borrow().pending
    }

    pub fn is_dirty(&self) -> bool {
        self.state.borrow().dirty
    }

    /// Number of distinct frames ever scheduled
    pub fn frames_scheduled(&self) -> usize {
        self.state.borrow().frames_scheduled
    }
}
