//! Platform events delivered by backends

use crate::input::InputEvent;
use crate::window::{NativeHandle, Visibility};

/// Platform events
///
/// Backends translate their native event stream into this vocabulary and
/// hand it to the engine in the order the platform produced it.
#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    /// Window-related event
    Window {
        window: NativeHandle,
        event: WindowEvent,
    },
    /// Input event (pointer, scroll, keyboard, text)
    Input {
        window: NativeHandle,
        event: InputEvent,
    },
    /// Frame tick - time to render
    ///
    /// Only sent by backends with [`FrameTiming::Deferred`](crate::FrameTiming),
    /// in answer to an earlier redraw request (`RedrawRequested`, animation
    /// frame callback).
    Frame { window: NativeHandle },
    /// The platform asked the application to exit
    Quit,
}

impl Event {
    /// The native window the event targets, if any
    pub fn window(&self) -> Option<NativeHandle> {
        match self {
            Event::Window { window, .. } | Event::Input { window, .. } | Event::Frame { window } => {
                Some(*window)
            }
            Event::Quit => None,
        }
    }
}

/// Window events
#[derive(Clone, Debug, PartialEq)]
pub enum WindowEvent {
    /// Window was resized
    Resized {
        /// New width in backend units
        width: f32,
        /// New height in backend units
        height: f32,
    },
    /// Window close was requested (e.g., close button clicked)
    CloseRequested,
    /// Window gained or lost focus
    Focused(bool),
    /// Window was shown, hidden, minimized or restored
    VisibilityChanged(Visibility),
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerEvent;

    #[test]
    fn test_event_window() {
        let handle = NativeHandle(7);
        let event = Event::Input {
            window: handle,
            event: InputEvent::Pointer(PointerEvent::Left),
        };
        assert_eq!(event.window(), Some(handle));
        assert_eq!(Event::Frame { window: handle }.window(), Some(handle));
        assert_eq!(Event::Quit.window(), None);
    }
}
