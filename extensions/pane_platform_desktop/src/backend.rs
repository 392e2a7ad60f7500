//! Desktop backend driving winit's event loop by pumping it

use std::any::Any;
use std::sync::Arc;
use std::time::Duration;

use pane_platform::{
    Backend, BackendCaps, Cursor, Event, Focus, FrameTiming, GraphicsContext, InputEvent,
    NativeHandle, PlatformError, PointerEvent, Result, TouchTracker, Visibility, WindowConfig,
    WindowEvent,
};
use raw_window_handle::{
    DisplayHandle, HandleError, HasDisplayHandle, HasWindowHandle, WindowHandle,
};
use rustc_hash::FxHashMap;
use tracing::{debug, trace};
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent as WinitWindowEvent};
use winit::event_loop::{ActiveEventLoop, EventLoop};
use winit::platform::pump_events::{EventLoopExtPumpEvents, PumpStatus};
use winit::window::{Fullscreen, Window, WindowId};

use crate::input;

/// Graphics context of a desktop window
///
/// Pane issues no GPU calls; renderers pull the winit window out of the
/// context (through `as_any_mut` or the raw window handle) to build their
/// own surface.
pub struct DesktopSurface {
    window: Arc<Window>,
}

impl DesktopSurface {
    /// Get the underlying winit window
    pub fn winit_window(&self) -> &Window {
        &self.window
    }

    /// Get an Arc to the winit window
    pub fn winit_window_arc(&self) -> Arc<Window> {
        Arc::clone(&self.window)
    }
}

impl GraphicsContext for DesktopSurface {
    fn make_current(&mut self) -> Result<()> {
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.window.pre_present_notify();
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

impl HasWindowHandle for DesktopSurface {
    fn window_handle(&self) -> std::result::Result<WindowHandle<'_>, HandleError> {
        self.window.window_handle()
    }
}

impl HasDisplayHandle for DesktopSurface {
    fn display_handle(&self) -> std::result::Result<DisplayHandle<'_>, HandleError> {
        self.window.display_handle()
    }
}

struct DesktopWindow {
    surface: DesktopSurface,
    touch: TouchTracker,
    cursor: (f32, f32),
}

/// Backend for macOS, Windows and Linux
///
/// Events are collected by pumping winit's event loop from
/// [`Backend::poll_events`], so the application keeps control of its loop.
/// Frames are delivered through `RedrawRequested`.
pub struct DesktopBackend {
    event_loop: Option<EventLoop<()>>,
    windows: FxHashMap<NativeHandle, DesktopWindow>,
    timeout: Option<Duration>,
}

impl Default for DesktopBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl DesktopBackend {
    pub fn new() -> Self {
        Self {
            event_loop: None,
            windows: FxHashMap::default(),
            timeout: Some(Duration::ZERO),
        }
    }

    /// How long a poll may wait for events (`None` waits until one arrives)
    ///
    /// Defaults to zero, which never blocks.
    pub fn poll_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.timeout = timeout;
        self
    }

    fn window(&self, handle: NativeHandle) -> Option<&Window> {
        self.windows.get(&handle).map(|w| w.surface.winit_window())
    }
}

fn native_handle(id: WindowId) -> NativeHandle {
    NativeHandle(u64::from(id))
}

impl Backend for DesktopBackend {
    fn caps(&self) -> BackendCaps {
        BackendCaps {
            name: "desktop",
            frame_timing: FrameTiming::Deferred,
            polled_input: false,
            multi_window: true,
        }
    }

    fn init(&mut self) -> Result<()> {
        if self.event_loop.is_none() {
            let event_loop =
                EventLoop::new().map_err(|e| PlatformError::InitFailed(e.to_string()))?;
            self.event_loop = Some(event_loop);
        }
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeHandle> {
        let event_loop = self
            .event_loop
            .as_ref()
            .ok_or_else(|| PlatformError::EventLoop("backend not initialized".to_string()))?;

        let attrs = Window::default_attributes()
            .with_title(&config.title)
            .with_inner_size(LogicalSize::new(config.width, config.height))
            .with_resizable(config.resizable)
            .with_visible(config.visible);

        // Windows are created outside of the pump so the handle can be
        // returned synchronously.
        #[allow(deprecated)]
        let window = event_loop
            .create_window(attrs)
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;
        window.set_cursor(input::cursor_icon(config.cursor));

        let handle = native_handle(window.id());
        self.windows.insert(
            handle,
            DesktopWindow {
                surface: DesktopSurface {
                    window: Arc::new(window),
                },
                touch: TouchTracker::new(),
                cursor: (0.0, 0.0),
            },
        );
        debug!(handle = handle.raw(), "created winit window");
        Ok(handle)
    }

    fn destroy_window(&mut self, window: NativeHandle) {
        if self.windows.remove(&window).is_some() {
            debug!(handle = window.raw(), "dropped winit window");
        }
    }

    fn set_title(&mut self, window: NativeHandle, title: &str) {
        if let Some(w) = self.window(window) {
            w.set_title(title);
        }
    }

    fn set_size(&mut self, window: NativeHandle, width: f32, height: f32) {
        if let Some(w) = self.window(window) {
            let _ = w.request_inner_size(LogicalSize::new(width, height));
        }
    }

    fn set_visibility(&mut self, window: NativeHandle, visibility: Visibility) {
        let Some(w) = self.window(window) else {
            return;
        };
        match visibility {
            Visibility::Visible => {
                w.set_fullscreen(None);
                w.set_minimized(false);
                w.set_maximized(false);
                w.set_visible(true);
            }
            Visibility::Hidden => w.set_visible(false),
            Visibility::Minimized => w.set_minimized(true),
            Visibility::Maximized => w.set_maximized(true),
            Visibility::Fullscreen => w.set_fullscreen(Some(Fullscreen::Borderless(None))),
        }
    }

    fn set_focus(&mut self, window: NativeHandle, focus: Focus) {
        let Some(w) = self.window(window) else {
            return;
        };
        match focus {
            Focus::Focused => w.focus_window(),
            Focus::Unfocused => debug!("winit cannot give up focus"),
        }
    }

    fn set_cursor(&mut self, window: NativeHandle, cursor: Cursor) {
        if let Some(w) = self.window(window) {
            w.set_cursor(input::cursor_icon(cursor));
        }
    }

    fn request_frame(&mut self, window: NativeHandle) {
        if let Some(w) = self.window(window) {
            w.request_redraw();
        }
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) -> Result<()> {
        let event_loop = self
            .event_loop
            .as_mut()
            .ok_or_else(|| PlatformError::EventLoop("backend not initialized".to_string()))?;

        let mut pump = Pump {
            windows: &mut self.windows,
            events,
        };
        if let PumpStatus::Exit(code) = event_loop.pump_app_events(self.timeout, &mut pump) {
            debug!(code, "winit event loop exited");
            pump.events.push(Event::Quit);
        }
        Ok(())
    }

    fn graphics_context(&mut self, window: NativeHandle) -> Option<&mut dyn GraphicsContext> {
        self.windows
            .get_mut(&window)
            .map(|w| &mut w.surface as &mut dyn GraphicsContext)
    }
}

/// winit application handler for one pump
struct Pump<'a> {
    windows: &'a mut FxHashMap<NativeHandle, DesktopWindow>,
    events: &'a mut Vec<Event>,
}

impl Pump<'_> {
    fn input(&mut self, window: NativeHandle, event: InputEvent) {
        self.events.push(Event::Input { window, event });
    }

    fn pointer(&mut self, window: NativeHandle, event: PointerEvent) {
        self.input(window, InputEvent::Pointer(event));
    }

    fn window_event(&mut self, window: NativeHandle, event: WindowEvent) {
        self.events.push(Event::Window { window, event });
    }
}

impl ApplicationHandler for Pump<'_> {
    fn resumed(&mut self, _event_loop: &ActiveEventLoop) {}

    fn window_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        window_id: WindowId,
        event: WinitWindowEvent,
    ) {
        let handle = native_handle(window_id);
        let scale = match self.windows.get(&handle) {
            Some(w) => w.surface.window.scale_factor(),
            None => {
                trace!(handle = handle.raw(), "event for a window pane does not own");
                return;
            }
        };

        match event {
            WinitWindowEvent::CloseRequested => {
                self.window_event(handle, WindowEvent::CloseRequested);
            }

            WinitWindowEvent::Resized(size) => {
                let size = size.to_logical::<f32>(scale);
                self.window_event(
                    handle,
                    WindowEvent::Resized {
                        width: size.width,
                        height: size.height,
                    },
                );
            }

            WinitWindowEvent::Focused(focused) => {
                self.window_event(handle, WindowEvent::Focused(focused));
            }

            WinitWindowEvent::Occluded(occluded) => {
                let visibility = if occluded {
                    Visibility::Hidden
                } else {
                    Visibility::Visible
                };
                self.window_event(handle, WindowEvent::VisibilityChanged(visibility));
            }

            WinitWindowEvent::RedrawRequested => {
                self.events.push(Event::Frame { window: handle });
            }

            WinitWindowEvent::KeyboardInput { event, .. } => {
                if let Some(key) = input::convert_key(&event.logical_key) {
                    self.input(
                        handle,
                        InputEvent::Key {
                            key,
                            state: input::convert_key_state(event.state),
                        },
                    );
                }
                if event.state == ElementState::Pressed {
                    if let Some(text) = event.text.as_deref() {
                        self.events.extend(InputEvent::text(text).map(|event| Event::Input {
                            window: handle,
                            event,
                        }));
                    }
                }
            }

            WinitWindowEvent::CursorMoved { position, .. } => {
                let position = position.to_logical::<f32>(scale);
                if let Some(w) = self.windows.get_mut(&handle) {
                    w.cursor = (position.x, position.y);
                }
                self.pointer(
                    handle,
                    PointerEvent::Moved {
                        x: position.x,
                        y: position.y,
                    },
                );
            }

            WinitWindowEvent::CursorLeft { .. } => self.pointer(handle, PointerEvent::Left),

            WinitWindowEvent::MouseInput { state, button, .. } => {
                let Some(action) = input::convert_mouse_button(button) else {
                    trace!(?button, "ignoring mouse button");
                    return;
                };
                // winit button events carry no position
                let (x, y) = self.windows.get(&handle).map_or((0.0, 0.0), |w| w.cursor);
                let event = match state {
                    ElementState::Pressed => PointerEvent::Pressed { action, x, y },
                    ElementState::Released => PointerEvent::Released { action, x, y },
                };
                self.pointer(handle, event);
            }

            WinitWindowEvent::MouseWheel { delta, .. } => {
                let (delta_x, delta_y) = input::scroll_delta(delta);
                self.input(handle, InputEvent::Scroll { delta_x, delta_y });
            }

            WinitWindowEvent::Touch(touch) => {
                let location = touch.location.to_logical::<f32>(scale);
                let translated = self.windows.get_mut(&handle).and_then(|w| {
                    let phase = input::convert_touch_phase(touch.phase);
                    w.touch.translate(touch.id, phase, location.x, location.y)
                });
                if let Some(event) = translated {
                    self.pointer(handle, event);
                }
            }

            _ => {}
        }
    }
}
