//! Backend capability traits

use std::any::Any;

use crate::error::Result;
use crate::event::Event;
use crate::window::{Cursor, Focus, NativeHandle, Visibility, WindowConfig};

/// When a backend renders after a redraw request
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FrameTiming {
    /// Render at the idle point at the end of every `poll_events` batch
    #[default]
    Immediate,
    /// Render when the backend delivers [`Event::Frame`] for the window
    Deferred,
}

/// Static description of a backend's delivery model
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BackendCaps {
    /// Short backend name ("desktop", "web", "sdl", ...)
    pub name: &'static str,
    /// How redraw requests turn into render passes
    pub frame_timing: FrameTiming,
    /// Input is drained to empty from a queue on every poll
    ///
    /// Text assembly state is reset at the start of each batch on such
    /// backends so a dangling high surrogate cannot leak into a later frame.
    pub polled_input: bool,
    /// More than one window can be open at once
    pub multi_window: bool,
}

/// A per-window graphics context
///
/// The engine never interprets the context. It makes the context current
/// before the draw callback runs and presents it afterwards; everything in
/// between belongs to the draw callback.
pub trait GraphicsContext {
    /// Bind this context to the calling thread
    fn make_current(&mut self) -> Result<()>;

    /// Present the finished frame
    fn present(&mut self) -> Result<()>;

    /// Access the backend-specific context type
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

/// Platform backend adapter
///
/// Implemented by each platform backend (desktop, web, sdl). A backend owns
/// the native windows and translates native events into [`Event`]s; all
/// state-machine work happens in the engine driving it.
pub trait Backend {
    /// Describe the delivery model of this backend
    fn caps(&self) -> BackendCaps;

    /// One-time initialization, run before the first window is created
    fn init(&mut self) -> Result<()>;

    /// Create a native window
    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeHandle>;

    /// Destroy a native window
    fn destroy_window(&mut self, window: NativeHandle);

    /// Set the window title
    fn set_title(&mut self, window: NativeHandle, title: &str);

    /// Resize the window
    fn set_size(&mut self, window: NativeHandle, width: f32, height: f32);

    /// Show, hide, minimize, maximize or fullscreen the window
    fn set_visibility(&mut self, window: NativeHandle, visibility: Visibility);

    /// Focus or unfocus the window
    fn set_focus(&mut self, window: NativeHandle, focus: Focus);

    /// Set the cursor shown over the window
    fn set_cursor(&mut self, window: NativeHandle, cursor: Cursor);

    /// Ask for a frame
    ///
    /// Only called on [`FrameTiming::Deferred`] backends, at most once per
    /// pending frame; the backend answers with [`Event::Frame`].
    fn request_frame(&mut self, window: NativeHandle);

    /// Drain pending native events, appending translated events in order
    fn poll_events(&mut self, events: &mut Vec<Event>) -> Result<()>;

    /// The graphics context of a window
    fn graphics_context(&mut self, window: NativeHandle) -> Option<&mut dyn GraphicsContext>;
}

/// A graphics context that does nothing
///
/// Used by backends that leave surface creation to the application.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullGraphicsContext;

impl GraphicsContext for NullGraphicsContext {
    fn make_current(&mut self) -> Result<()> {
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_timing_default() {
        assert_eq!(FrameTiming::default(), FrameTiming::Immediate);
    }

    #[test]
    fn test_null_context_downcast() {
        let mut context = NullGraphicsContext;
        let context: &mut dyn GraphicsContext = &mut context;
        assert!(context.make_current().is_ok());
        assert!(context.as_any_mut().downcast_mut::<NullGraphicsContext>().is_some());
    }
}
