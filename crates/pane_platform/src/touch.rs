//! Single-touch pointer emulation
//!
//! Pane has one pointer per window. The first finger down drives it as the
//! primary action; other fingers are ignored until that one lifts.

use tracing::trace;

use crate::input::{PointerAction, PointerEvent};

/// Phase of a platform touch point
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TouchPhase {
    Started,
    Moved,
    Ended,
    Cancelled,
}

/// Tracks which touch point drives the pointer
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TouchTracker {
    active: Option<u64>,
}

impl TouchTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// The touch id currently driving the pointer
    pub fn active(&self) -> Option<u64> {
        self.active
    }

    /// Translate a touch update into a pointer event
    pub fn translate(&mut self, id: u64, phase: TouchPhase, x: f32, y: f32) -> Option<PointerEvent> {
        let action = PointerAction::Primary;
        match phase {
            TouchPhase::Started if self.active.is_none() => {
                self.active = Some(id);
                Some(PointerEvent::Pressed { action, x, y })
            }
            TouchPhase::Moved if self.active == Some(id) => Some(PointerEvent::Moved { x, y }),
            TouchPhase::Ended if self.active == Some(id) => {
                self.active = None;
                Some(PointerEvent::Released { action, x, y })
            }
            TouchPhase::Cancelled if self.active == Some(id) => {
                self.active = None;
                Some(PointerEvent::Cancelled { x, y })
            }
            _ => {
                trace!(id, ?phase, "ignoring secondary touch point");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_finger_drives_pointer() {
        let mut touch = TouchTracker::new();
        assert_eq!(
            touch.translate(1, TouchPhase::Started, 1.0, 2.0),
            Some(PointerEvent::Pressed {
                action: PointerAction::Primary,
                x: 1.0,
                y: 2.0
            })
        );
        assert_eq!(touch.active(), Some(1));

        assert_eq!(touch.translate(2, TouchPhase::Started, 5.0, 5.0), None);
        assert_eq!(touch.translate(2, TouchPhase::Moved, 6.0, 6.0), None);
        assert_eq!(touch.translate(2, TouchPhase::Ended, 6.0, 6.0), None);
        assert_eq!(
            touch.translate(1, TouchPhase::Moved, 3.0, 4.0),
            Some(PointerEvent::Moved { x: 3.0, y: 4.0 })
        );
        assert_eq!(
            touch.translate(1, TouchPhase::Ended, 3.0, 4.0),
            Some(PointerEvent::Released {
                action: PointerAction::Primary,
                x: 3.0,
                y: 4.0
            })
        );
        assert_eq!(touch.active(), None);
    }

    #[test]
    fn test_cancel_releases_tracking() {
        let mut touch = TouchTracker::new();
        touch.translate(7, TouchPhase::Started, 0.0, 0.0);
        assert_eq!(
            touch.translate(7, TouchPhase::Cancelled, 1.0, 1.0),
            Some(PointerEvent::Cancelled { x: 1.0, y: 1.0 })
        );

        // A new finger can take over
        assert!(touch.translate(8, TouchPhase::Started, 2.0, 2.0).is_some());
        assert_eq!(touch.active(), Some(8));
    }

    #[test]
    fn test_stray_end_is_ignored() {
        let mut touch = TouchTracker::new();
        assert_eq!(touch.translate(3, TouchPhase::Ended, 0.0, 0.0), None);
        assert_eq!(touch.translate(3, TouchPhase::Moved, 0.0, 0.0), None);
    }
}
