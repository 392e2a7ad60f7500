//! Platform event dispatch
//!
//! ```text
//! Backend::poll_events
//!     ↓ Event { NativeHandle, .. }
//! WindowRegistry::find_by_handle
//!     ↓ WindowId
//! raw callback (pointer / key / scroll)
//!     ↓
//! PointerCapture | keys down | CodepointAssembler
//!     ↓
//! view tree notification, redraw request
//! ```
//!
//! Raw pointer callbacks fire for every platform press and release, before
//! the capture state machine decides whether the event is legal.

use pane_platform::{
    Backend, Event, Focus, FrameTiming, GraphicsContext, InputEvent, KeyState,
    NullGraphicsContext, Point, PointerEvent, Size, Visibility, WindowEvent,
};
use tracing::{debug, error, trace, warn};

use crate::callbacks::{Callbacks, EventCx};
use crate::capture::{PointerCapture, Transition};
use crate::context::Context;
use crate::registry::WindowId;
use crate::view::{EmptyTree, ViewTree};
use crate::window::WindowState;

impl<B: Backend> Context<B> {
    /// Dispatch one platform event
    ///
    /// Commands queued by callbacks are left for the caller to flush.
    pub(crate) fn handle_event(&mut self, event: Event) {
        let Some(handle) = event.window() else {
            debug!("platform requested quit");
            self.quit_requested = true;
            return;
        };

        let Some(id) = self.windows.find_by_handle(handle) else {
            debug!(handle = handle.raw(), "event for unknown window");
            return;
        };

        match event {
            Event::Window { event, .. } => self.dispatch_window_event(id, event),
            Event::Input { event, .. } => self.dispatch_input(id, event),
            Event::Frame { .. } => self.render_window(id),
            Event::Quit => {}
        }
    }

    fn dispatch_window_event(&mut self, id: WindowId, event: WindowEvent) {
        match event {
            WindowEvent::Resized { width, height } => {
                self.apply_resize(id, Size::new(width, height));
            }
            WindowEvent::CloseRequested => {
                if let Err(err) = self.close_window(id) {
                    debug!(%err, "close requested for closed window");
                }
            }
            WindowEvent::Focused(focused) => self.apply_focus(id, Focus::from(focused)),
            WindowEvent::VisibilityChanged(visibility) => self.apply_visibility(id, visibility),
        }
    }

    fn dispatch_input(&mut self, id: WindowId, event: InputEvent) {
        match event {
            InputEvent::Pointer(pointer) => self.dispatch_pointer(id, pointer),
            InputEvent::Scroll { delta_x, delta_y } => {
                self.fire(id, |callbacks, cx| {
                    if let Some(scroll) = callbacks.scroll.as_mut() {
                        scroll(cx, delta_x, delta_y);
                    }
                });
            }
            InputEvent::Key { key, state } => {
                let Some(window) = self.windows.get_mut(id) else {
                    return;
                };
                match state {
                    KeyState::Pressed => {
                        window.keys_down.insert(key);
                    }
                    KeyState::Released => {
                        window.keys_down.remove(&key);
                    }
                }
                self.fire(id, |callbacks, cx| {
                    let slot = match state {
                        KeyState::Pressed => callbacks.key_down.as_mut(),
                        KeyState::Released => callbacks.key_up.as_mut(),
                    };
                    if let Some(callback) = slot {
                        callback(cx, key);
                    }
                });
            }
            InputEvent::CodeUnit(unit) => {
                let Some(ch) = self.windows.get_mut(id).and_then(|w| w.text.push(unit)) else {
                    return;
                };
                self.fire(id, |callbacks, cx| {
                    if let Some(codepoint) = callbacks.codepoint.as_mut() {
                        codepoint(cx, ch);
                    }
                });
            }
        }
    }

    fn dispatch_pointer(&mut self, id: WindowId, event: PointerEvent) {
        let transition = match event {
            PointerEvent::Moved { x, y } => {
                self.fire(id, |callbacks, cx| {
                    if let Some(moved) = callbacks.pointer_move.as_mut() {
                        moved(cx, x, y);
                    }
                });
                self.with_capture(id, |capture, tree| capture.move_to(tree, Point::new(x, y)))
            }
            PointerEvent::Pressed { action, x, y } => {
                self.fire(id, |callbacks, cx| {
                    if let Some(begin) = callbacks.pointer_begin.as_mut() {
                        begin(cx, action, x, y);
                    }
                });
                self.with_capture(id, |capture, tree| {
                    capture.begin(tree, action, Point::new(x, y))
                })
            }
            PointerEvent::Released { action, x, y } => {
                self.fire(id, |callbacks, cx| {
                    if let Some(end) = callbacks.pointer_end.as_mut() {
                        end(cx, action, x, y);
                    }
                });
                self.with_capture(id, |capture, tree| capture.end(tree, action, Point::new(x, y)))
            }
            PointerEvent::Cancelled { x, y } => {
                self.with_capture(id, |capture, tree| capture.cancel(tree, Point::new(x, y)))
            }
            PointerEvent::Left => self.with_capture(id, |capture, tree| {
                let position = capture.position();
                let cancelled = capture.cancel(tree, position);
                let moved = capture.move_to(tree, Point::OUTSIDE);
                if cancelled.needs_redraw() || moved.needs_redraw() {
                    Transition::Routed {
                        target: None,
                        redraw: true,
                    }
                } else {
                    Transition::Ignored
                }
            }),
        };

        if transition.is_some_and(|t| t.needs_redraw()) {
            self.request_redraw_window(id);
        }
    }

    // =========================================================================
    // State changes shared by platform events and application calls
    // =========================================================================

    pub(crate) fn apply_resize(&mut self, id: WindowId, size: Size) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.size == size {
            return;
        }
        window.size = size;
        trace!(width = size.width, height = size.height, "window resized");

        self.fire(id, |callbacks, cx| {
            if let Some(resize) = callbacks.resize.as_mut() {
                resize(cx, size.width, size.height);
            }
        });
        self.layout_window(id);
        self.request_redraw_window(id);
    }

    pub(crate) fn apply_visibility(&mut self, id: WindowId, visibility: Visibility) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.visibility == visibility {
            return;
        }
        window.visibility = visibility;

        self.fire(id, |callbacks, cx| {
            if let Some(changed) = callbacks.visibility.as_mut() {
                changed(cx, visibility);
            }
        });
        if visibility.is_shown() {
            self.request_redraw_window(id);
        }
    }

    pub(crate) fn apply_focus(&mut self, id: WindowId, focus: Focus) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.focus == focus {
            return;
        }
        window.focus = focus;

        if focus == Focus::Unfocused {
            window.keys_down.clear();
            let cancelled = self.with_capture(id, |capture, tree| {
                let position = capture.position();
                capture.cancel(tree, position)
            });
            if cancelled.is_some_and(|t| t.needs_redraw()) {
                self.request_redraw_window(id);
            }
        }

        self.fire(id, |callbacks, cx| {
            if let Some(changed) = callbacks.focus.as_mut() {
                changed(cx, focus);
            }
        });
    }

    pub(crate) fn layout_window(&mut self, id: WindowId) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        match window.views.as_mut() {
            Some(views) => views.layout(window.size),
            None => debug!("window contains no views"),
        }
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    pub(crate) fn request_redraw_window(&mut self, id: WindowId) {
        let timing = self.scheduler.timing();
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        if window.redraw.request(timing) {
            if let Some(handle) = self.windows.handle(id) {
                self.backend.request_frame(handle);
            }
        }
    }

    /// Initial layout of every window, and a render of each one no frame
    /// event has rendered yet
    pub(crate) fn first_pass(&mut self) {
        let ids = self.windows.ids().to_vec();
        for id in ids {
            self.layout_window(id);
            let rendered = self
                .windows
                .get(id)
                .is_some_and(|w| w.redraw.renders() > 0);
            if !rendered {
                self.render_window(id);
            }
        }
        self.flush_commands();
        self.scheduler.first_pass_done();
    }

    /// Render every dirty, visible window at the idle point
    pub(crate) fn render_pending(&mut self) {
        if self.scheduler.timing() != FrameTiming::Immediate {
            return;
        }

        let ids = self.windows.ids().to_vec();
        for id in ids {
            let due = match self.windows.get_mut(id) {
                Some(window) if window.visibility.is_shown() => window.redraw.take_pending(),
                _ => false,
            };
            if due {
                self.render_window(id);
            }
        }
        self.flush_commands();
    }

    /// One render pass: draw callback, view tree, present
    pub(crate) fn render_window(&mut self, id: WindowId) {
        let Some(handle) = self.windows.handle(id) else {
            return;
        };

        let mut null = NullGraphicsContext;
        let gfx: &mut dyn GraphicsContext = match self.backend.graphics_context(handle) {
            Some(gfx) => gfx,
            None => &mut null,
        };
        if self.scheduler.switch_to(id) {
            if let Err(err) = gfx.make_current() {
                error!(%err, "failed to make graphics context current");
                self.scheduler.forget(id);
                return;
            }
        }

        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        window.redraw.rendered();
        trace!(title = %window.title, "rendering window");

        let mut cx = EventCx::new(id, window.info(), &mut self.commands);
        if let Some(draw) = window.callbacks.draw.as_mut() {
            draw(&mut cx, gfx);
        }
        if let Some(views) = window.views.as_mut() {
            views.render(gfx);
        }
        if let Err(err) = gfx.present() {
            warn!(%err, "failed to present frame");
        }
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    /// Run a callback slot with a fresh [`EventCx`]
    pub(crate) fn fire(&mut self, id: WindowId, f: impl FnOnce(&mut Callbacks, &mut EventCx<'_>)) {
        let Some(window) = self.windows.get_mut(id) else {
            return;
        };
        let mut cx = EventCx::new(id, window.info(), &mut self.commands);
        f(&mut window.callbacks, &mut cx);
    }

    /// Run the capture state machine against the window's tree
    fn with_capture<R>(
        &mut self,
        id: WindowId,
        f: impl FnOnce(&mut PointerCapture, &mut dyn ViewTree) -> R,
    ) -> Option<R> {
        let WindowState { views, capture, .. } = self.windows.get_mut(id)?;
        let mut empty = EmptyTree;
        let tree: &mut dyn ViewTree = match views {
            Some(views) => &mut **views,
            None => &mut empty,
        };
        Some(f(capture, tree))
    }
}
