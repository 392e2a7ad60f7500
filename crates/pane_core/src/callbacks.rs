//! Window callback slots
//!
//! Callbacks are boxed closures, so they can carry whatever application
//! state they need. They never receive the [`Context`](crate::Context)
//! itself: changes are queued on the [`EventCx`] and applied once the
//! callback returns, which lets a callback close windows or resize them
//! without re-entering the engine.

use pane_platform::{
    Color, Cursor, Focus, GraphicsContext, KeyCode, Point, PointerAction, Size, Visibility,
};

use crate::registry::WindowId;
use crate::window::WindowInfo;

/// Deferred change requested from inside a callback
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Command {
    RequestRedraw(WindowId),
    SetTitle(WindowId, String),
    SetSize(WindowId, f32, f32),
    SetVisibility(WindowId, Visibility),
    SetFocus(WindowId, Focus),
    SetCursor(WindowId, Cursor),
    SetBackground(WindowId, Color),
    Close(WindowId),
    Quit,
}

/// Context handed to every callback
pub struct EventCx<'a> {
    window: WindowId,
    info: WindowInfo,
    commands: &'a mut Vec<Command>,
}

impl<'a> EventCx<'a> {
    pub(crate) fn new(window: WindowId, info: WindowInfo, commands: &'a mut Vec<Command>) -> Self {
        Self {
            window,
            info,
            commands,
        }
    }

    /// The window the callback belongs to
    pub fn window(&self) -> WindowId {
        self.window
    }

    /// Window state at the time the event was dispatched
    pub fn info(&self) -> &WindowInfo {
        &self.info
    }

    pub fn size(&self) -> Size {
        self.info.size
    }

    pub fn pointer_position(&self) -> Point {
        self.info.pointer_position
    }

    pub fn background(&self) -> Color {
        self.info.background
    }

    /// Ask for the window to be redrawn
    pub fn request_redraw(&mut self) {
        self.commands.push(Command::RequestRedraw(self.window));
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.commands.push(Command::SetTitle(self.window, title.into()));
    }

    pub fn set_size(&mut self, width: f32, height: f32) {
        self.commands.push(Command::SetSize(self.window, width, height));
    }

    pub fn set_visibility(&mut self, visibility: Visibility) {
        self.commands.push(Command::SetVisibility(self.window, visibility));
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.commands.push(Command::SetFocus(self.window, focus));
    }

    pub fn set_cursor(&mut self, cursor: Cursor) {
        self.commands.push(Command::SetCursor(self.window, cursor));
    }

    pub fn set_background(&mut self, color: Color) {
        self.commands.push(Command::SetBackground(self.window, color));
    }

    /// Close this window
    pub fn close_window(&mut self) {
        self.close(self.window);
    }

    /// Close any window
    pub fn close(&mut self, window: WindowId) {
        self.commands.push(Command::Close(window));
    }

    /// Ask the event loop to stop
    pub fn quit(&mut self) {
        self.commands.push(Command::Quit);
    }
}

pub type ResizeCallback = Box<dyn FnMut(&mut EventCx<'_>, f32, f32)>;
pub type DrawCallback = Box<dyn FnMut(&mut EventCx<'_>, &mut dyn GraphicsContext)>;
pub type CloseCallback = Box<dyn FnMut(&mut EventCx<'_>)>;
pub type VisibilityCallback = Box<dyn FnMut(&mut EventCx<'_>, Visibility)>;
pub type FocusCallback = Box<dyn FnMut(&mut EventCx<'_>, Focus)>;
pub type PointerMoveCallback = Box<dyn FnMut(&mut EventCx<'_>, f32, f32)>;
pub type PointerActionCallback = Box<dyn FnMut(&mut EventCx<'_>, PointerAction, f32, f32)>;
pub type ScrollCallback = Box<dyn FnMut(&mut EventCx<'_>, f32, f32)>;
pub type KeyCallback = Box<dyn FnMut(&mut EventCx<'_>, KeyCode)>;
pub type CodepointCallback = Box<dyn FnMut(&mut EventCx<'_>, char)>;

/// The callbacks registered on one window
///
/// Every slot is optional; an empty slot makes the event a no-op for the
/// application.
#[derive(Default)]
pub struct Callbacks {
    pub(crate) resize: Option<ResizeCallback>,
    pub(crate) draw: Option<DrawCallback>,
    pub(crate) close: Option<CloseCallback>,
    pub(crate) visibility: Option<VisibilityCallback>,
    pub(crate) focus: Option<FocusCallback>,
    pub(crate) pointer_move: Option<PointerMoveCallback>,
    pub(crate) pointer_begin: Option<PointerActionCallback>,
    pub(crate) pointer_end: Option<PointerActionCallback>,
    pub(crate) scroll: Option<ScrollCallback>,
    pub(crate) key_down: Option<KeyCallback>,
    pub(crate) key_up: Option<KeyCallback>,
    pub(crate) codepoint: Option<CodepointCallback>,
}

impl Callbacks {
    /// Window size changed
    pub fn on_resize(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, f32, f32) + 'static,
    ) -> &mut Self {
        self.resize = Some(Box::new(callback));
        self
    }

    /// Window contents must be drawn
    pub fn on_draw(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, &mut dyn GraphicsContext) + 'static,
    ) -> &mut Self {
        self.draw = Some(Box::new(callback));
        self
    }

    /// Window was closed; it is already unregistered when this runs
    pub fn on_close(&mut self, callback: impl FnMut(&mut EventCx<'_>) + 'static) -> &mut Self {
        self.close = Some(Box::new(callback));
        self
    }

    pub fn on_visibility(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, Visibility) + 'static,
    ) -> &mut Self {
        self.visibility = Some(Box::new(callback));
        self
    }

    pub fn on_focus(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, Focus) + 'static,
    ) -> &mut Self {
        self.focus = Some(Box::new(callback));
        self
    }

    pub fn on_pointer_move(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, f32, f32) + 'static,
    ) -> &mut Self {
        self.pointer_move = Some(Box::new(callback));
        self
    }

    /// Raw pointer press, before the view tree sees it
    pub fn on_pointer_begin(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, PointerAction, f32, f32) + 'static,
    ) -> &mut Self {
        self.pointer_begin = Some(Box::new(callback));
        self
    }

    /// Raw pointer release, before the view tree sees it
    pub fn on_pointer_end(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, PointerAction, f32, f32) + 'static,
    ) -> &mut Self {
        self.pointer_end = Some(Box::new(callback));
        self
    }

    /// Scroll in lines
    pub fn on_scroll(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, f32, f32) + 'static,
    ) -> &mut Self {
        self.scroll = Some(Box::new(callback));
        self
    }

    pub fn on_key_down(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, KeyCode) + 'static,
    ) -> &mut Self {
        self.key_down = Some(Box::new(callback));
        self
    }

    pub fn on_key_up(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, KeyCode) + 'static,
    ) -> &mut Self {
        self.key_up = Some(Box::new(callback));
        self
    }

    /// Text input, one complete character at a time
    pub fn on_codepoint(
        &mut self,
        callback: impl FnMut(&mut EventCx<'_>, char) + 'static,
    ) -> &mut Self {
        self.codepoint = Some(Box::new(callback));
        self
    }
}

impl std::fmt::Debug for Callbacks {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Callbacks")
            .field("resize", &self.resize.is_some())
            .field("draw", &self.draw.is_some())
            .field("close", &self.close.is_some())
            .field("visibility", &self.visibility.is_some())
            .field("focus", &self.focus.is_some())
            .field("pointer_move", &self.pointer_move.is_some())
            .field("pointer_begin", &self.pointer_begin.is_some())
            .field("pointer_end", &self.pointer_end.is_some())
            .field("scroll", &self.scroll.is_some())
            .field("key_down", &self.key_down.is_some())
            .field("key_up", &self.key_up.is_some())
            .field("codepoint", &self.codepoint.is_some())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_cx_queues_commands() {
        let window = WindowId::default();
        let mut commands = Vec::new();
        let mut cx = EventCx::new(window, WindowInfo::default(), &mut commands);

        cx.request_redraw();
        cx.set_title("hello");
        cx.close_window();
        cx.quit();

        assert_eq!(
            commands,
            vec![
                Command::RequestRedraw(window),
                Command::SetTitle(window, "hello".to_string()),
                Command::Close(window),
                Command::Quit,
            ]
        );
    }

    #[test]
    fn test_callbacks_chain() {
        let mut callbacks = Callbacks::default();
        callbacks.on_resize(|_, _, _| {}).on_key_down(|_, _| {});
        assert!(callbacks.resize.is_some());
        assert!(callbacks.key_down.is_some());
        assert!(callbacks.draw.is_none());
    }
}
