//! In-memory backend
//!
//! [`HeadlessBackend`] owns no native windows. Events are scripted with
//! [`HeadlessBackend::push`] and delivered on the next `poll_events`; every
//! call the engine makes is recorded so tests can inspect it.

use std::any::Any;
use std::collections::VecDeque;

use pane_platform::{
    Backend, BackendCaps, Cursor, Event, Focus, FrameTiming, GraphicsContext, InputEvent,
    NativeHandle, PlatformError, Result, Size, Visibility, WindowConfig, WindowEvent,
};
use rustc_hash::FxHashMap;

/// Graphics context that counts what the engine does with it
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct HeadlessContext {
    pub make_current_calls: usize,
    pub presents: usize,
}

impl GraphicsContext for HeadlessContext {
    fn make_current(&mut self) -> Result<()> {
        self.make_current_calls += 1;
        Ok(())
    }

    fn present(&mut self) -> Result<()> {
        self.presents += 1;
        Ok(())
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

/// A window of the headless backend
#[derive(Clone, Debug)]
pub struct HeadlessWindow {
    pub title: String,
    pub size: Size,
    pub visibility: Visibility,
    pub focus: Focus,
    pub cursor: Cursor,
    pub context: HeadlessContext,
}

/// Scripted backend for tests and tooling
#[derive(Debug)]
pub struct HeadlessBackend {
    caps: BackendCaps,
    fail_init: bool,
    fail_create: bool,
    poll_error: Option<PlatformError>,
    initialized: bool,
    init_calls: usize,
    next_handle: u64,
    windows: FxHashMap<NativeHandle, HeadlessWindow>,
    destroyed: Vec<NativeHandle>,
    queue: VecDeque<Event>,
    frame_requests: Vec<NativeHandle>,
    frame_request_count: usize,
}

impl Default for HeadlessBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessBackend {
    /// Backend that renders at the end of every poll
    pub fn new() -> Self {
        Self::with_caps(BackendCaps {
            name: "headless",
            frame_timing: FrameTiming::Immediate,
            polled_input: true,
            multi_window: true,
        })
    }

    /// Backend that answers redraw requests with frame events
    pub fn deferred() -> Self {
        Self::with_caps(BackendCaps {
            name: "headless",
            frame_timing: FrameTiming::Deferred,
            polled_input: false,
            multi_window: true,
        })
    }

    pub fn with_caps(caps: BackendCaps) -> Self {
        Self {
            caps,
            fail_init: false,
            fail_create: false,
            poll_error: None,
            initialized: false,
            init_calls: 0,
            next_handle: 1,
            windows: FxHashMap::default(),
            destroyed: Vec::new(),
            queue: VecDeque::new(),
            frame_requests: Vec::new(),
            frame_request_count: 0,
        }
    }

    /// Make initialization fail
    pub fn fail_init(mut self, fail: bool) -> Self {
        self.fail_init = fail;
        self
    }

    /// Make window creation fail
    pub fn set_fail_create(&mut self, fail: bool) {
        self.fail_create = fail;
    }

    /// Make the next poll fail with `err`
    pub fn fail_next_poll(&mut self, err: PlatformError) {
        self.poll_error = Some(err);
    }

    /// Queue an event for the next poll
    pub fn push(&mut self, event: Event) {
        self.queue.push_back(event);
    }

    pub fn push_input(&mut self, window: NativeHandle, event: InputEvent) {
        self.push(Event::Input { window, event });
    }

    pub fn push_window(&mut self, window: NativeHandle, event: WindowEvent) {
        self.push(Event::Window { window, event });
    }

    pub fn window(&self, handle: NativeHandle) -> Option<&HeadlessWindow> {
        self.windows.get(&handle)
    }

    /// Handles of windows destroyed so far, in order
    pub fn destroyed(&self) -> &[NativeHandle] {
        &self.destroyed
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls
    }

    /// Frames requested so far
    pub fn frame_request_count(&self) -> usize {
        self.frame_request_count
    }
}

impl Backend for HeadlessBackend {
    fn caps(&self) -> BackendCaps {
        self.caps
    }

    fn init(&mut self) -> Result<()> {
        self.init_calls += 1;
        if self.fail_init {
            return Err(PlatformError::InitFailed("headless init disabled".to_string()));
        }
        self.initialized = true;
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeHandle> {
        if self.fail_create {
            return Err(PlatformError::WindowCreation(config.title.clone()));
        }
        if !self.caps.multi_window && !self.windows.is_empty() {
            return Err(PlatformError::Unsupported(
                "backend supports a single window".to_string(),
            ));
        }

        let handle = NativeHandle(self.next_handle);
        self.next_handle += 1;
        self.windows.insert(
            handle,
            HeadlessWindow {
                title: config.title.clone(),
                size: Size::new(config.width, config.height),
                visibility: if config.visible {
                    Visibility::Visible
                } else {
                    Visibility::Hidden
                },
                focus: Focus::Unfocused,
                cursor: config.cursor,
                context: HeadlessContext::default(),
            },
        );
        Ok(handle)
    }

    fn destroy_window(&mut self, window: NativeHandle) {
        if self.windows.remove(&window).is_some() {
            self.destroyed.push(window);
        }
        self.frame_requests.retain(|&h| h != window);
    }

    fn set_title(&mut self, window: NativeHandle, title: &str) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.title = title.to_string();
        }
    }

    fn set_size(&mut self, window: NativeHandle, width: f32, height: f32) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.size = Size::new(width, height);
        }
    }

    fn set_visibility(&mut self, window: NativeHandle, visibility: Visibility) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.visibility = visibility;
        }
    }

    fn set_focus(&mut self, window: NativeHandle, focus: Focus) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.focus = focus;
        }
    }

    fn set_cursor(&mut self, window: NativeHandle, cursor: Cursor) {
        if let Some(w) = self.windows.get_mut(&window) {
            w.cursor = cursor;
        }
    }

    fn request_frame(&mut self, window: NativeHandle) {
        self.frame_request_count += 1;
        if !self.frame_requests.contains(&window) {
            self.frame_requests.push(window);
        }
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) -> Result<()> {
        if !self.initialized {
            return Err(PlatformError::EventLoop("backend not initialized".to_string()));
        }
        if let Some(err) = self.poll_error.take() {
            return Err(err);
        }
        events.extend(self.queue.drain(..));
        events.extend(
            self.frame_requests
                .drain(..)
                .map(|window| Event::Frame { window }),
        );
        Ok(())
    }

    fn graphics_context(&mut self, window: NativeHandle) -> Option<&mut dyn GraphicsContext> {
        self.windows
            .get_mut(&window)
            .map(|w| &mut w.context as &mut dyn GraphicsContext)
    }
}
