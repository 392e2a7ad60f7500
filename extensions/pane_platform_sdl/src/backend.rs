//! SDL2 backend draining SDL's event queue on every poll

use std::any::Any;

use pane_platform::{
    Backend, BackendCaps, Cursor, Event, Focus, FrameTiming, GraphicsContext, InputEvent,
    KeyState, NativeHandle, PlatformError, PointerEvent, Result, Visibility, WindowConfig,
    WindowEvent,
};
use rustc_hash::FxHashMap;
use sdl2::event::{Event as SdlEvent, WindowEvent as SdlWindowEvent};
use sdl2::mouse::{Cursor as SdlCursor, MouseWheelDirection, SystemCursor};
use sdl2::video::{FullscreenType, Window};
use sdl2::{EventPump, Sdl, VideoSubsystem};
use tracing::{debug, trace, warn};

use crate::translate;

/// Graphics context of an SDL window
///
/// Draw callbacks downcast to this type to reach the SDL window and build
/// their own renderer or GL context on it.
pub struct SdlSurface {
    window: Window,
}

impl SdlSurface {
    /// Get the underlying SDL window
    pub fn window(&self) -> &Window {
        &self.window
    }

    /// Get the underlying SDL window mutably
    pub fn window_mut(&mut self) -> &mut Window {
        &mut self.window
    }
}

impl GraphicsContext for SdlSurface {
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

struct SdlState {
    _sdl: Sdl,
    video: VideoSubsystem,
    pump: EventPump,
}

/// Backend on SDL2
///
/// Input is polled: every [`Backend::poll_events`] drains SDL's queue to
/// empty, and frames render at the idle point after each batch.
pub struct SdlBackend {
    // Windows drop before the video subsystem
    windows: FxHashMap<NativeHandle, SdlSurface>,
    cursor: Option<SdlCursor>,
    state: Option<SdlState>,
}

impl Default for SdlBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl SdlBackend {
    pub fn new() -> Self {
        Self {
            windows: FxHashMap::default(),
            cursor: None,
            state: None,
        }
    }

    fn window_mut(&mut self, handle: NativeHandle) -> Option<&mut Window> {
        self.windows.get_mut(&handle).map(SdlSurface::window_mut)
    }
}

fn system_cursor(cursor: Cursor) -> SystemCursor {
    match cursor {
        Cursor::Arrow => SystemCursor::Arrow,
        Cursor::IBeam => SystemCursor::IBeam,
        Cursor::Hand => SystemCursor::Hand,
        Cursor::Crosshair => SystemCursor::Crosshair,
        Cursor::SizeAll => SystemCursor::SizeAll,
        Cursor::SizeNWSE => SystemCursor::SizeNWSE,
        Cursor::SizeNESW => SystemCursor::SizeNESW,
        Cursor::SizeWE => SystemCursor::SizeWE,
        Cursor::SizeNS => SystemCursor::SizeNS,
    }
}

impl Backend for SdlBackend {
    fn caps(&self) -> BackendCaps {
        BackendCaps {
            name: "sdl",
            frame_timing: FrameTiming::Immediate,
            polled_input: true,
            multi_window: true,
        }
    }

    fn init(&mut self) -> Result<()> {
        if self.state.is_some() {
            return Ok(());
        }
        let sdl = sdl2::init().map_err(PlatformError::InitFailed)?;
        let video = sdl.video().map_err(PlatformError::InitFailed)?;
        let pump = sdl.event_pump().map_err(PlatformError::InitFailed)?;
        video.text_input().start();
        debug!(driver = video.current_video_driver(), "SDL video initialized");
        self.state = Some(SdlState {
            _sdl: sdl,
            video,
            pump,
        });
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeHandle> {
        let state = self
            .state
            .as_ref()
            .ok_or_else(|| PlatformError::EventLoop("backend not initialized".to_string()))?;

        let mut builder = state
            .video
            .window(&config.title, config.width as u32, config.height as u32);
        builder.position_centered();
        if config.resizable {
            builder.resizable();
        }
        if !config.visible {
            builder.hidden();
        }
        let window = builder
            .build()
            .map_err(|e| PlatformError::WindowCreation(e.to_string()))?;

        let handle = NativeHandle(u64::from(window.id()));
        self.windows.insert(handle, SdlSurface { window });
        self.set_cursor(handle, config.cursor);
        debug!(handle = handle.raw(), "created SDL window");
        Ok(handle)
    }

    fn destroy_window(&mut self, window: NativeHandle) {
        if self.windows.remove(&window).is_some() {
            debug!(handle = window.raw(), "dropped SDL window");
        }
    }

    fn set_title(&mut self, window: NativeHandle, title: &str) {
        if let Some(w) = self.window_mut(window) {
            if let Err(e) = w.set_title(title) {
                warn!("set_title failed: {e}");
            }
        }
    }

    fn set_size(&mut self, window: NativeHandle, width: f32, height: f32) {
        if let Some(w) = self.window_mut(window) {
            if let Err(e) = w.set_size(width as u32, height as u32) {
                warn!("set_size failed: {e}");
            }
        }
    }

    fn set_visibility(&mut self, window: NativeHandle, visibility: Visibility) {
        let Some(w) = self.window_mut(window) else {
            return;
        };
        match visibility {
            Visibility::Visible => {
                if let Err(e) = w.set_fullscreen(FullscreenType::Off) {
                    warn!("leaving fullscreen failed: {e}");
                }
                w.restore();
                w.show();
            }
            Visibility::Hidden => w.hide(),
            Visibility::Minimized => w.minimize(),
            Visibility::Maximized => w.maximize(),
            Visibility::Fullscreen => {
                if let Err(e) = w.set_fullscreen(FullscreenType::Desktop) {
                    warn!("entering fullscreen failed: {e}");
                }
            }
        }
    }

    fn set_focus(&mut self, window: NativeHandle, focus: Focus) {
        let Some(w) = self.window_mut(window) else {
            return;
        };
        match focus {
            Focus::Focused => w.raise(),
            Focus::Unfocused => debug!("SDL cannot give up focus"),
        }
    }

    fn set_cursor(&mut self, window: NativeHandle, cursor: Cursor) {
        if !self.windows.contains_key(&window) {
            return;
        }
        // SDL cursors are global; the last request wins
        match SdlCursor::from_system(system_cursor(cursor)) {
            Ok(native) => {
                native.set();
                self.cursor = Some(native);
            }
            Err(e) => warn!(?cursor, "system cursor unavailable: {e}"),
        }
    }

    fn request_frame(&mut self, _window: NativeHandle) {}

    fn poll_events(&mut self, events: &mut Vec<Event>) -> Result<()> {
        let state = self
            .state
            .as_mut()
            .ok_or_else(|| PlatformError::EventLoop("backend not initialized".to_string()))?;
        for event in state.pump.poll_iter() {
            translate_event(event, events);
        }
        Ok(())
    }

    fn graphics_context(&mut self, window: NativeHandle) -> Option<&mut dyn GraphicsContext> {
        self.windows
            .get_mut(&window)
            .map(|w| w as &mut dyn GraphicsContext)
    }
}

fn handle(window_id: u32) -> NativeHandle {
    NativeHandle(u64::from(window_id))
}

fn input(events: &mut Vec<Event>, window_id: u32, event: InputEvent) {
    events.push(Event::Input {
        window: handle(window_id),
        event,
    });
}

fn translate_event(event: SdlEvent, events: &mut Vec<Event>) {
    match event {
        SdlEvent::Quit { .. } => events.push(Event::Quit),

        SdlEvent::Window {
            window_id,
            win_event,
            ..
        } => translate_window_event(handle(window_id), win_event, events),

        SdlEvent::KeyDown {
            window_id,
            keycode: Some(keycode),
            ..
        } => {
            if let Some(event) = translate::key(keycode as i32, KeyState::Pressed) {
                input(events, window_id, event);
            }
        }

        SdlEvent::KeyUp {
            window_id,
            keycode: Some(keycode),
            ..
        } => {
            if let Some(event) = translate::key(keycode as i32, KeyState::Released) {
                input(events, window_id, event);
            }
        }

        SdlEvent::TextInput {
            window_id, text, ..
        } => {
            for event in InputEvent::text(&text) {
                input(events, window_id, event);
            }
        }

        SdlEvent::MouseMotion {
            window_id, x, y, ..
        } => input(
            events,
            window_id,
            InputEvent::Pointer(PointerEvent::Moved {
                x: x as f32,
                y: y as f32,
            }),
        ),

        SdlEvent::MouseButtonDown {
            window_id,
            mouse_btn,
            x,
            y,
            ..
        } => match translate::mouse_down(mouse_btn as u8, x, y) {
            Some(event) => input(events, window_id, InputEvent::Pointer(event)),
            None => trace!(?mouse_btn, "ignoring mouse button"),
        },

        SdlEvent::MouseButtonUp {
            window_id,
            mouse_btn,
            x,
            y,
            ..
        } => match translate::mouse_up(mouse_btn as u8, x, y) {
            Some(event) => input(events, window_id, InputEvent::Pointer(event)),
            None => trace!(?mouse_btn, "ignoring mouse button"),
        },

        SdlEvent::MouseWheel {
            window_id,
            x,
            y,
            direction,
            ..
        } => input(
            events,
            window_id,
            translate::wheel(x, y, direction == MouseWheelDirection::Flipped),
        ),

        _ => {}
    }
}

fn translate_window_event(window: NativeHandle, event: SdlWindowEvent, events: &mut Vec<Event>) {
    let event = match event {
        // Fires for every size change, user-driven or not
        SdlWindowEvent::SizeChanged(width, height) => WindowEvent::Resized {
            width: width as f32,
            height: height as f32,
        },
        SdlWindowEvent::Close => WindowEvent::CloseRequested,
        SdlWindowEvent::FocusGained => WindowEvent::Focused(true),
        SdlWindowEvent::FocusLost => WindowEvent::Focused(false),
        SdlWindowEvent::Shown | SdlWindowEvent::Restored => {
            WindowEvent::VisibilityChanged(Visibility::Visible)
        }
        SdlWindowEvent::Hidden => WindowEvent::VisibilityChanged(Visibility::Hidden),
        SdlWindowEvent::Minimized => WindowEvent::VisibilityChanged(Visibility::Minimized),
        SdlWindowEvent::Maximized => WindowEvent::VisibilityChanged(Visibility::Maximized),
        SdlWindowEvent::Exposed => {
            events.push(Event::Frame { window });
            return;
        }
        SdlWindowEvent::Leave => {
            events.push(Event::Input {
                window,
                event: InputEvent::Pointer(PointerEvent::Left),
            });
            return;
        }
        _ => return,
    };
    events.push(Event::Window { window, event });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_window_events() {
        let window = NativeHandle(3);
        let mut events = Vec::new();
        translate_window_event(window, SdlWindowEvent::SizeChanged(640, 480), &mut events);
        translate_window_event(window, SdlWindowEvent::Minimized, &mut events);
        translate_window_event(window, SdlWindowEvent::Moved(5, 5), &mut events);
        translate_window_event(window, SdlWindowEvent::Leave, &mut events);
        assert_eq!(
            events,
            vec![
                Event::Window {
                    window,
                    event: WindowEvent::Resized {
                        width: 640.0,
                        height: 480.0
                    }
                },
                Event::Window {
                    window,
                    event: WindowEvent::VisibilityChanged(Visibility::Minimized)
                },
                Event::Input {
                    window,
                    event: InputEvent::Pointer(PointerEvent::Left)
                },
            ]
        );
    }

    #[test]
    fn test_text_input_splits_into_code_units() {
        let mut events = Vec::new();
        translate_event(
            SdlEvent::TextInput {
                timestamp: 0,
                window_id: 1,
                text: "a\u{1F600}".to_string(),
            },
            &mut events,
        );
        assert_eq!(events.len(), 3);
        assert_eq!(
            events[0],
            Event::Input {
                window: NativeHandle(1),
                event: InputEvent::CodeUnit(u16::from(b'a'))
            }
        );
    }

    #[test]
    fn test_quit() {
        let mut events = Vec::new();
        translate_event(SdlEvent::Quit { timestamp: 0 }, &mut events);
        assert_eq!(events, vec![Event::Quit]);
    }
}
