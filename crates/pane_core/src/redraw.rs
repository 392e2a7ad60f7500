//! Redraw scheduling
//!
//! Redraw requests only mark a window dirty. Any number of requests before
//! the next render collapse into one render pass:
//!
//! - [`FrameTiming::Immediate`] backends render every dirty window at the
//!   idle point at the end of `poll_events`.
//! - [`FrameTiming::Deferred`] backends are asked for one frame per dirty
//!   period and render when the frame event arrives.
//!
//! The scheduler also tracks which window's graphics context is current, so
//! a context is only re-bound when rendering switches windows.

use pane_platform::FrameTiming;

use crate::registry::WindowId;

/// Redraw bookkeeping of one window
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RedrawState {
    pending: bool,
    frame_requested: bool,
    renders: u64,
}

impl RedrawState {
    /// Mark the window dirty
    ///
    /// Returns `true` when the backend has to be asked for a frame.
    pub fn request(&mut self, timing: FrameTiming) -> bool {
        self.pending = true;
        match timing {
            FrameTiming::Immediate => false,
            FrameTiming::Deferred => !std::mem::replace(&mut self.frame_requested, true),
        }
    }

    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Clear the dirty flag, returning whether it was set
    pub fn take_pending(&mut self) -> bool {
        std::mem::take(&mut self.pending)
    }

    /// A render pass ran
    pub fn rendered(&mut self) {
        self.pending = false;
        self.frame_requested = false;
        self.renders += 1;
    }

    /// Number of render passes so far
    pub fn renders(&self) -> u64 {
        self.renders
    }
}

/// Cross-window rendering state
#[derive(Clone, Copy, Debug, Default)]
pub struct RedrawScheduler {
    timing: FrameTiming,
    first_pass_done: bool,
    current: Option<WindowId>,
}

impl RedrawScheduler {
    pub fn new(timing: FrameTiming) -> Self {
        Self {
            timing,
            first_pass_done: false,
            current: None,
        }
    }

    pub fn timing(&self) -> FrameTiming {
        self.timing
    }

    /// Whether the initial layout + render of every window is still due
    pub fn needs_first_pass(&self) -> bool {
        !self.first_pass_done
    }

    pub fn first_pass_done(&mut self) {
        self.first_pass_done = true;
    }

    /// Record `window` as the current context owner
    ///
    /// Returns `true` when the window's context has to be made current.
    pub fn switch_to(&mut self, window: WindowId) -> bool {
        self.current.replace(window) != Some(window)
    }

    /// Forget the current context (failed bind or destroyed window)
    pub fn forget(&mut self, window: WindowId) {
        if self.current == Some(window) {
            self.current = None;
        }
    }

    pub fn current(&self) -> Option<WindowId> {
        self.current
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_immediate_requests_coalesce() {
        let mut state = RedrawState::default();
        assert!(!state.request(FrameTiming::Immediate));
        assert!(!state.request(FrameTiming::Immediate));
        assert!(state.take_pending());
        assert!(!state.take_pending());
    }

    #[test]
    fn test_deferred_asks_for_one_frame() {
        let mut state = RedrawState::default();
        assert!(state.request(FrameTiming::Deferred));
        assert!(!state.request(FrameTiming::Deferred));
        state.rendered();
        assert!(!state.is_pending());
        assert!(state.request(FrameTiming::Deferred));
        assert_eq!(state.renders(), 1);
    }

    #[test]
    fn test_switch_context_only_on_change() {
        let mut ids: SlotMap<WindowId, ()> = SlotMap::with_key();
        let a = ids.insert(());
        let b = ids.insert(());

        let mut scheduler = RedrawScheduler::new(FrameTiming::Immediate);
        assert!(scheduler.switch_to(a));
        assert!(!scheduler.switch_to(a));
        assert!(scheduler.switch_to(b));
        scheduler.forget(b);
        assert_eq!(scheduler.current(), None);
        assert!(scheduler.switch_to(b));
    }
}
