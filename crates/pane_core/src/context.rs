//! The application-facing engine object
//!
//! A [`Context`] owns a backend, the window registry and all per-window
//! input state. Every entry point goes through it; there is no global
//! state. The first window creation initializes the backend.
//!
//! # Example
//!
//! ```
//! use pane_core::{Context, HeadlessBackend};
//! use pane_platform::WindowConfig;
//!
//! let mut ctx = Context::new(HeadlessBackend::new());
//! let window = ctx.create_window(WindowConfig::new("Demo").size(640.0, 480.0))?;
//! ctx.callbacks(window)?.on_draw(|_cx, _gfx| {
//!     // issue draw calls here
//! });
//!
//! ctx.destroy_window(window)?;
//! assert!(!ctx.poll_events());
//! # Ok::<(), pane_core::Error>(())
//! ```

use std::marker::PhantomData;

use pane_platform::{
    Backend, BackendCaps, Color, Cursor, Event, Focus, GraphicsContext, KeyCode, NativeHandle,
    NullGraphicsContext, PlatformError, Point, PointerAction, Size, Visibility, WindowConfig,
};
use tracing::{debug, error, info, warn};

use crate::callbacks::{Callbacks, Command, EventCx};
use crate::error::{Error, Result};
use crate::redraw::RedrawScheduler;
use crate::registry::{WindowId, WindowRegistry};
use crate::view::{ViewId, ViewTree};
use crate::window::{WindowInfo, WindowState};

/// Engine context driving one backend
///
/// Single-threaded: a context is neither `Send` nor `Sync` and must stay on
/// the thread that runs the platform event pump.
pub struct Context<B: Backend> {
    pub(crate) backend: B,
    pub(crate) caps: BackendCaps,
    pub(crate) initialized: bool,
    pub(crate) windows: WindowRegistry<WindowState>,
    pub(crate) commands: Vec<Command>,
    pub(crate) scheduler: RedrawScheduler,
    pub(crate) events: Vec<Event>,
    pub(crate) quit_requested: bool,
    _not_send: PhantomData<*const ()>,
}

impl<B: Backend> Context<B> {
    /// Create a context around a backend
    ///
    /// The backend is not initialized until the first window is created.
    pub fn new(backend: B) -> Self {
        let caps = backend.caps();
        Self {
            backend,
            caps,
            initialized: false,
            windows: WindowRegistry::new(),
            commands: Vec::new(),
            scheduler: RedrawScheduler::new(caps.frame_timing),
            events: Vec::new(),
            quit_requested: false,
            _not_send: PhantomData,
        }
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn backend_mut(&mut self) -> &mut B {
        &mut self.backend
    }

    pub fn caps(&self) -> BackendCaps {
        self.caps
    }

    /// Whether the backend has been initialized
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    // =========================================================================
    // Window lifecycle
    // =========================================================================

    /// Create a window
    ///
    /// On failure nothing is registered.
    pub fn create_window(&mut self, config: WindowConfig) -> Result<WindowId> {
        self.ensure_initialized()?;

        let handle = self.backend.create_window(&config).map_err(|err| {
            error!(title = %config.title, %err, "failed to create window");
            err
        })?;

        let id = match self.windows.insert(handle, WindowState::new(&config)) {
            Ok(id) => id,
            Err(err) => {
                error!(handle = handle.raw(), "backend reused a live window handle");
                self.backend.destroy_window(handle);
                return Err(err);
            }
        };

        info!(
            title = %config.title,
            width = config.width,
            height = config.height,
            backend = self.caps.name,
            "window created"
        );
        self.request_redraw_window(id);
        Ok(id)
    }

    /// Create a window from a size and title
    pub fn create_window_simple(
        &mut self,
        width: f32,
        height: f32,
        title: impl Into<String>,
    ) -> Result<WindowId> {
        self.create_window(WindowConfig::new(title).size(width, height))
    }

    /// Destroy a window
    ///
    /// The window is unregistered before its close callback runs.
    pub fn destroy_window(&mut self, window: WindowId) -> Result<()> {
        self.close_window(window)?;
        self.flush_commands();
        Ok(())
    }

    fn ensure_initialized(&mut self) -> Result<()> {
        if self.initialized {
            return Ok(());
        }

        self.backend.init().map_err(|err| {
            error!(backend = self.caps.name, %err, "backend initialization failed");
            err
        })?;
        debug!(backend = self.caps.name, "backend initialized");
        self.initialized = true;
        Ok(())
    }

    pub(crate) fn close_window(&mut self, window: WindowId) -> Result<()> {
        let removed = self
            .windows
            .remove(window)
            .ok_or(Error::UnknownWindow(window))?;
        self.scheduler.forget(window);
        info!(title = %removed.record.title, "window destroyed");

        let mut record = removed.record;
        let info = record.info();
        if let Some(close) = record.callbacks.close.as_mut() {
            let mut cx = EventCx::new(window, info, &mut self.commands);
            close(&mut cx);
        }

        self.backend.destroy_window(removed.handle);
        if removed.was_last {
            info!("last window closed");
        }
        Ok(())
    }

    // =========================================================================
    // Event loop
    // =========================================================================

    /// Process all pending platform events
    ///
    /// Returns whether the application should keep running: `false` once
    /// every window is closed or a quit was requested.
    pub fn poll_events(&mut self) -> bool {
        if self.caps.polled_input {
            let ids = self.windows.ids().to_vec();
            for id in ids {
                if let Some(window) = self.windows.get_mut(id) {
                    window.text.reset();
                }
            }
        }

        // Backends have nothing to deliver before their first window
        let mut events = std::mem::take(&mut self.events);
        if self.initialized {
            match self.backend.poll_events(&mut events) {
                Ok(()) => {}
                Err(err @ PlatformError::EventLoop(_)) => {
                    error!(backend = self.caps.name, %err, "platform event loop failed");
                    self.quit_requested = true;
                }
                Err(err) => {
                    warn!(backend = self.caps.name, %err, "failed to poll platform events");
                }
            }
        }
        for event in events.drain(..) {
            self.handle_event(event);
            self.flush_commands();
        }
        self.events = events;

        if self.scheduler.needs_first_pass() && !self.windows.is_empty() {
            self.first_pass();
        }
        self.render_pending();

        self.should_continue()
    }

    /// Whether the application should keep running
    pub fn should_continue(&self) -> bool {
        !self.quit_requested && !self.windows.is_empty()
    }

    /// Ask the event loop to stop
    pub fn quit(&mut self) {
        self.quit_requested = true;
    }

    // =========================================================================
    // Window properties
    // =========================================================================

    pub fn set_title(&mut self, window: WindowId, title: impl Into<String>) -> Result<()> {
        let title = title.into();
        let handle = self.native(window)?;
        self.backend.set_title(handle, &title);
        self.state_mut(window)?.title = title;
        Ok(())
    }

    /// Resize a window, run its resize callback and lay out its views
    pub fn set_size(&mut self, window: WindowId, width: f32, height: f32) -> Result<()> {
        let handle = self.native(window)?;
        self.backend.set_size(handle, width, height);
        self.apply_resize(window, Size::new(width, height));
        self.flush_commands();
        Ok(())
    }

    pub fn set_visibility(&mut self, window: WindowId, visibility: Visibility) -> Result<()> {
        let handle = self.native(window)?;
        self.backend.set_visibility(handle, visibility);
        self.apply_visibility(window, visibility);
        self.flush_commands();
        Ok(())
    }

    pub fn set_focus(&mut self, window: WindowId, focus: Focus) -> Result<()> {
        let handle = self.native(window)?;
        self.backend.set_focus(handle, focus);
        self.apply_focus(window, focus);
        self.flush_commands();
        Ok(())
    }

    pub fn set_cursor(&mut self, window: WindowId, cursor: Cursor) -> Result<()> {
        let handle = self.native(window)?;
        self.backend.set_cursor(handle, cursor);
        self.state_mut(window)?.cursor = cursor;
        Ok(())
    }

    pub fn set_background_color(&mut self, window: WindowId, color: Color) -> Result<()> {
        self.state_mut(window)?.background = color;
        self.request_redraw_window(window);
        Ok(())
    }

    /// Ask for a window to be redrawn
    ///
    /// Requests made before the next render collapse into one render pass.
    pub fn request_redraw(&mut self, window: WindowId) -> Result<()> {
        self.native(window)?;
        self.request_redraw_window(window);
        Ok(())
    }

    /// The callback slots of a window
    pub fn callbacks(&mut self, window: WindowId) -> Result<&mut Callbacks> {
        Ok(&mut self.state_mut(window)?.callbacks)
    }

    pub fn title(&self, window: WindowId) -> Option<&str> {
        self.windows.get(window).map(|w| w.title.as_str())
    }

    pub fn window_size(&self, window: WindowId) -> Option<Size> {
        self.windows.get(window).map(|w| w.size)
    }

    pub fn visibility(&self, window: WindowId) -> Option<Visibility> {
        self.windows.get(window).map(|w| w.visibility)
    }

    pub fn focus(&self, window: WindowId) -> Option<Focus> {
        self.windows.get(window).map(|w| w.focus)
    }

    pub fn cursor(&self, window: WindowId) -> Option<Cursor> {
        self.windows.get(window).map(|w| w.cursor)
    }

    pub fn background_color(&self, window: WindowId) -> Option<Color> {
        self.windows.get(window).map(|w| w.background)
    }

    /// Snapshot of a window's state
    pub fn window_info(&self, window: WindowId) -> Option<WindowInfo> {
        self.windows.get(window).map(WindowState::info)
    }

    /// Live windows in creation order
    pub fn window_ids(&self) -> &[WindowId] {
        self.windows.ids()
    }

    pub fn window_count(&self) -> usize {
        self.windows.len()
    }

    /// Find the window registered for a native handle
    pub fn find_window(&self, handle: NativeHandle) -> Option<WindowId> {
        self.windows.find_by_handle(handle)
    }

    /// The backend's handle for a window
    pub fn native_handle(&self, window: WindowId) -> Option<NativeHandle> {
        self.windows.handle(window)
    }

    /// Number of render passes a window has received
    pub fn render_count(&self, window: WindowId) -> Option<u64> {
        self.windows.get(window).map(|w| w.redraw.renders())
    }

    // =========================================================================
    // Input state
    // =========================================================================

    /// Whether the platform reports `action` as held down over the window
    pub fn is_pointer_action_down(&self, window: WindowId, action: PointerAction) -> bool {
        self.windows
            .get(window)
            .is_some_and(|w| w.capture.is_down(action))
    }

    pub fn is_key_down(&self, window: WindowId, key: KeyCode) -> bool {
        self.windows
            .get(window)
            .is_some_and(|w| w.keys_down.contains(&key))
    }

    /// Last pointer position ([`Point::OUTSIDE`] when the pointer is not over the window)
    pub fn pointer_position(&self, window: WindowId) -> Option<Point> {
        self.windows.get(window).map(|w| w.capture.position())
    }

    /// View under the pointer, if it still exists
    pub fn hot_view(&self, window: WindowId) -> Option<ViewId> {
        let state = self.windows.get(window)?;
        live_view(state, state.capture.hot())
    }

    /// View holding the pointer capture, if it still exists
    pub fn active_view(&self, window: WindowId) -> Option<ViewId> {
        let state = self.windows.get(window)?;
        live_view(state, state.capture.active())
    }

    pub fn active_action(&self, window: WindowId) -> Option<PointerAction> {
        self.windows.get(window)?.capture.active_action()
    }

    /// Where the current pointer gesture started
    pub fn active_origin(&self, window: WindowId) -> Option<Point> {
        self.windows.get(window)?.capture.origin()
    }

    // =========================================================================
    // Views
    // =========================================================================

    /// Attach a view tree, returning the previous one
    ///
    /// The new tree is laid out for the current window size right away.
    pub fn set_view_tree(
        &mut self,
        window: WindowId,
        tree: Box<dyn ViewTree>,
    ) -> Result<Option<Box<dyn ViewTree>>> {
        let state = self.state_mut(window)?;
        let previous = state.views.replace(tree);
        self.layout_window(window);
        self.request_redraw_window(window);
        Ok(previous)
    }

    /// Detach the view tree
    pub fn take_view_tree(&mut self, window: WindowId) -> Result<Option<Box<dyn ViewTree>>> {
        let previous = self.state_mut(window)?.views.take();
        self.request_redraw_window(window);
        Ok(previous)
    }

    /// The attached view tree, downcast to its concrete type
    pub fn view_tree<T: ViewTree + 'static>(&self, window: WindowId) -> Option<&T> {
        self.windows
            .get(window)?
            .views
            .as_ref()?
            .as_any()
            .downcast_ref::<T>()
    }

    /// The attached view tree, downcast to its concrete type
    pub fn view_tree_mut<T: ViewTree + 'static>(&mut self, window: WindowId) -> Option<&mut T> {
        self.windows
            .get_mut(window)?
            .views
            .as_mut()?
            .as_any_mut()
            .downcast_mut::<T>()
    }

    /// Lay out the window's view tree for its current size
    pub fn layout_views(&mut self, window: WindowId) -> Result<()> {
        self.native(window)?;
        self.layout_window(window);
        Ok(())
    }

    /// Render the window's view tree into its graphics context now
    pub fn redraw_views(&mut self, window: WindowId) -> Result<()> {
        let handle = self.native(window)?;
        let has_views = self.windows.get(window).is_some_and(|w| w.views.is_some());
        if !has_views {
            debug!("window contains no views");
            return Ok(());
        }

        let mut null = NullGraphicsContext;
        let gfx: &mut dyn GraphicsContext =
            match self.backend.graphics_context(handle) {
                Some(gfx) => gfx,
                None => &mut null,
            };
        if self.scheduler.switch_to(window) {
            if let Err(err) = gfx.make_current() {
                error!(%err, "failed to make graphics context current");
                self.scheduler.forget(window);
                return Err(err.into());
            }
        }
        if let Some(views) = self.windows.get_mut(window).and_then(|w| w.views.as_mut()) {
            views.render(gfx);
        }
        Ok(())
    }

    // =========================================================================
    // Helpers
    // =========================================================================

    pub(crate) fn native(&self, window: WindowId) -> Result<NativeHandle> {
        self.windows
            .handle(window)
            .ok_or(Error::UnknownWindow(window))
    }

    pub(crate) fn state_mut(&mut self, window: WindowId) -> Result<&mut WindowState> {
        self.windows
            .get_mut(window)
            .ok_or(Error::UnknownWindow(window))
    }

    /// Apply every queued callback command, including ones queued meanwhile
    pub(crate) fn flush_commands(&mut self) {
        while !self.commands.is_empty() {
            let batch = std::mem::take(&mut self.commands);
            for command in batch {
                self.apply_command(command);
            }
        }
    }

    fn apply_command(&mut self, command: Command) {
        let result = match command {
            Command::RequestRedraw(window) => self.request_redraw(window),
            Command::SetTitle(window, title) => self.set_title(window, title),
            Command::SetSize(window, width, height) => self
                .native(window)
                .map(|handle| {
                    self.backend.set_size(handle, width, height);
                    self.apply_resize(window, Size::new(width, height));
                }),
            Command::SetVisibility(window, visibility) => {
                self.native(window).map(|handle| {
                    self.backend.set_visibility(handle, visibility);
                    self.apply_visibility(window, visibility);
                })
            }
            Command::SetFocus(window, focus) => self.native(window).map(|handle| {
                self.backend.set_focus(handle, focus);
                self.apply_focus(window, focus);
            }),
            Command::SetCursor(window, cursor) => self.set_cursor(window, cursor),
            Command::SetBackground(window, color) => self.set_background_color(window, color),
            Command::Close(window) => self.close_window(window),
            Command::Quit => {
                self.quit_requested = true;
                Ok(())
            }
        };

        if let Err(err) = result {
            debug!(%err, "dropping command for closed window");
        }
    }
}

fn live_view(state: &WindowState, view: Option<ViewId>) -> Option<ViewId> {
    let view = view?;
    match &state.views {
        Some(tree) if tree.contains(view) => Some(view),
        _ => None,
    }
}
