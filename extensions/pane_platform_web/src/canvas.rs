//! Browser canvas backend (wasm32)

use std::any::Any;
use std::cell::RefCell;
use std::rc::Rc;

use pane_platform::{
    Backend, BackendCaps, Cursor, Event, Focus, FrameTiming, GraphicsContext, InputEvent,
    KeyState, NativeHandle, PlatformError, PointerEvent, Result, TouchPhase, TouchTracker,
    Visibility, WindowConfig, WindowEvent,
};
use tracing::{debug, warn};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::convert::FromWasmAbi;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, EventTarget, HtmlCanvasElement};

use crate::translate;

/// The one canvas this backend drives
const CANVAS_HANDLE: NativeHandle = NativeHandle(1);

type Queue = Rc<RefCell<Vec<Event>>>;

fn js_error(context: &str, err: JsValue) -> PlatformError {
    PlatformError::Other(format!("{context}: {err:?}"))
}

/// Graphics context of the canvas
///
/// Renderers take the canvas out through `as_any_mut` to create their own
/// WebGL or WebGPU context.
pub struct CanvasContext {
    canvas: HtmlCanvasElement,
}

impl CanvasContext {
    pub fn canvas(&self) -> &HtmlCanvasElement {
        &self.canvas
    }
}

impl GraphicsContext for CanvasContext {
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

struct Listener {
    target: EventTarget,
    kind: &'static str,
    callback: JsValue,
}

struct CanvasWindow {
    context: CanvasContext,
    listeners: Vec<Listener>,
    /// Created by the backend rather than found in the page
    owned: bool,
}

/// Backend for a single `<canvas>` element
///
/// DOM listeners queue events as the browser delivers them; `poll_events`
/// drains the queue. Drive the engine from [`run`] so polls line up with
/// animation frames.
pub struct WebBackend {
    canvas_id: String,
    fill_window: bool,
    document: Option<Document>,
    window: Option<CanvasWindow>,
    queue: Queue,
    frame_requested: bool,
}

impl Default for WebBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl WebBackend {
    pub fn new() -> Self {
        Self {
            canvas_id: "canvas".to_string(),
            fill_window: true,
            document: None,
            window: None,
            queue: Rc::new(RefCell::new(Vec::new())),
            frame_requested: false,
        }
    }

    /// Id of the canvas element to use; created if the page has none
    pub fn canvas_id(mut self, id: impl Into<String>) -> Self {
        self.canvas_id = id.into();
        self
    }

    /// Whether the canvas tracks the browser window size
    pub fn fill_window(mut self, fill: bool) -> Self {
        self.fill_window = fill;
        self
    }

    fn canvas(&self, handle: NativeHandle) -> Option<&HtmlCanvasElement> {
        match &self.window {
            Some(w) if handle == CANVAS_HANDLE => Some(&w.context.canvas),
            _ => None,
        }
    }

    fn find_or_create_canvas(&self, document: &Document) -> Result<(HtmlCanvasElement, bool)> {
        if let Some(element) = document.get_element_by_id(&self.canvas_id) {
            let canvas = element.dyn_into::<HtmlCanvasElement>().map_err(|_| {
                PlatformError::WindowCreation(format!("#{} is not a canvas", self.canvas_id))
            })?;
            return Ok((canvas, false));
        }

        let canvas = document
            .create_element("canvas")
            .map_err(|e| js_error("create canvas", e))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| PlatformError::WindowCreation("not a canvas".to_string()))?;
        canvas.set_id(&self.canvas_id);
        let body = document
            .body()
            .ok_or_else(|| PlatformError::WindowCreation("document has no body".to_string()))?;
        body.append_child(&canvas)
            .map_err(|e| js_error("append canvas", e))?;
        Ok((canvas, true))
    }
}

fn inner_size(window: &web_sys::Window) -> Option<(f32, f32)> {
    let width = window.inner_width().ok()?.as_f64()?;
    let height = window.inner_height().ok()?.as_f64()?;
    Some((width as f32, height as f32))
}

fn set_style(canvas: &HtmlCanvasElement, property: &str, value: &str) {
    if let Err(err) = canvas.style().set_property(property, value) {
        debug!(property, value, ?err, "style change rejected");
    }
}

fn resize_canvas(canvas: &HtmlCanvasElement, width: f32, height: f32) {
    canvas.set_width(width.max(0.0) as u32);
    canvas.set_height(height.max(0.0) as u32);
    set_style(canvas, "width", &format!("{width}px"));
    set_style(canvas, "height", &format!("{height}px"));
}

/// Registers DOM listeners that translate into the shared queue
struct Wiring<'a> {
    queue: &'a Queue,
    listeners: Vec<Listener>,
}

impl Wiring<'_> {
    fn listen<E>(&mut self, target: &EventTarget, kind: &'static str, mut f: impl FnMut(E, &mut Vec<Event>) + 'static)
    where
        E: FromWasmAbi + 'static,
    {
        let queue = Rc::clone(self.queue);
        let closure = Closure::<dyn FnMut(E)>::new(move |event: E| {
            f(event, &mut queue.borrow_mut());
        });
        if let Err(err) =
            target.add_event_listener_with_callback(kind, closure.as_ref().unchecked_ref())
        {
            warn!(kind, ?err, "failed to add event listener");
            return;
        }
        self.listeners.push(Listener {
            target: target.clone(),
            kind,
            callback: closure.into_js_value(),
        });
    }
}

fn input(queue: &mut Vec<Event>, event: InputEvent) {
    queue.push(Event::Input {
        window: CANVAS_HANDLE,
        event,
    });
}

fn pointer(queue: &mut Vec<Event>, event: PointerEvent) {
    input(queue, InputEvent::Pointer(event));
}

fn window_event(queue: &mut Vec<Event>, event: WindowEvent) {
    queue.push(Event::Window {
        window: CANVAS_HANDLE,
        event,
    });
}

fn wire(
    queue: &Queue,
    canvas: &HtmlCanvasElement,
    document: &Document,
    fill_window: bool,
) -> Vec<Listener> {
    let mut wiring = Wiring {
        queue,
        listeners: Vec::new(),
    };
    let target: &EventTarget = canvas.as_ref();

    wiring.listen(target, "mousemove", |e: web_sys::MouseEvent, q| {
        pointer(
            q,
            PointerEvent::Moved {
                x: e.offset_x() as f32,
                y: e.offset_y() as f32,
            },
        );
    });
    wiring.listen(target, "mousedown", |e: web_sys::MouseEvent, q| {
        if let Some(event) = translate::mouse_down(e.button(), e.offset_x() as f32, e.offset_y() as f32) {
            pointer(q, event);
        }
    });
    wiring.listen(target, "mouseup", |e: web_sys::MouseEvent, q| {
        if let Some(event) = translate::mouse_up(e.button(), e.offset_x() as f32, e.offset_y() as f32) {
            pointer(q, event);
        }
    });
    wiring.listen(target, "mouseleave", |_: web_sys::MouseEvent, q| {
        pointer(q, PointerEvent::Left);
    });
    wiring.listen(target, "contextmenu", |e: web_sys::MouseEvent, _| {
        e.prevent_default();
    });
    wiring.listen(target, "wheel", |e: web_sys::WheelEvent, q| {
        e.prevent_default();
        let (delta_x, delta_y) = translate::wheel_delta(e.delta_x(), e.delta_y(), e.delta_mode());
        input(q, InputEvent::Scroll { delta_x, delta_y });
    });

    let touch = Rc::new(RefCell::new(TouchTracker::new()));
    for (kind, phase) in [
        ("touchstart", TouchPhase::Started),
        ("touchmove", TouchPhase::Moved),
        ("touchend", TouchPhase::Ended),
        ("touchcancel", TouchPhase::Cancelled),
    ] {
        let touch = Rc::clone(&touch);
        let canvas = canvas.clone();
        wiring.listen(target, kind, move |e: web_sys::TouchEvent, q| {
            e.prevent_default();
            let rect = canvas.get_bounding_client_rect();
            let touches = e.changed_touches();
            for i in 0..touches.length() {
                let Some(point) = touches.get(i) else {
                    continue;
                };
                let x = (point.client_x() as f64 - rect.left()) as f32;
                let y = (point.client_y() as f64 - rect.top()) as f32;
                let id = point.identifier() as u32 as u64;
                if let Some(event) = touch.borrow_mut().translate(id, phase, x, y) {
                    pointer(q, event);
                }
            }
        });
    }

    wiring.listen(target, "keydown", |e: web_sys::KeyboardEvent, q| {
        if let Some(event) = translate::key(e.key_code(), KeyState::Pressed) {
            input(q, event);
        }
        let key = e.key();
        if let Some(text) = translate::key_text(&key, e.ctrl_key(), e.meta_key()) {
            for unit in InputEvent::text(text) {
                input(q, unit);
            }
        }
    });
    wiring.listen(target, "keyup", |e: web_sys::KeyboardEvent, q| {
        if let Some(event) = translate::key(e.key_code(), KeyState::Released) {
            input(q, event);
        }
    });
    wiring.listen(target, "focus", |_: web_sys::FocusEvent, q| {
        window_event(q, WindowEvent::Focused(true));
    });
    wiring.listen(target, "blur", |_: web_sys::FocusEvent, q| {
        window_event(q, WindowEvent::Focused(false));
    });

    let doc = document.clone();
    wiring.listen(document.as_ref(), "visibilitychange", move |_: web_sys::Event, q| {
        let visibility = if doc.hidden() {
            Visibility::Hidden
        } else {
            Visibility::Visible
        };
        window_event(q, WindowEvent::VisibilityChanged(visibility));
    });

    if fill_window {
        if let Some(window) = web_sys::window() {
            let canvas = canvas.clone();
            let browser = window.clone();
            wiring.listen(window.as_ref(), "resize", move |_: web_sys::Event, q| {
                if let Some((width, height)) = inner_size(&browser) {
                    resize_canvas(&canvas, width, height);
                    window_event(q, WindowEvent::Resized { width, height });
                }
            });
        }
    }

    wiring.listeners
}

impl Backend for WebBackend {
    fn caps(&self) -> BackendCaps {
        BackendCaps {
            name: "web",
            frame_timing: FrameTiming::Deferred,
            polled_input: false,
            multi_window: false,
        }
    }

    fn init(&mut self) -> Result<()> {
        let document = web_sys::window()
            .and_then(|w| w.document())
            .ok_or_else(|| PlatformError::InitFailed("no browser document".to_string()))?;
        self.document = Some(document);
        Ok(())
    }

    fn create_window(&mut self, config: &WindowConfig) -> Result<NativeHandle> {
        if self.window.is_some() {
            return Err(PlatformError::Unsupported(
                "the web backend drives a single canvas".to_string(),
            ));
        }
        let document = self
            .document
            .clone()
            .ok_or_else(|| PlatformError::InitFailed("backend not initialized".to_string()))?;

        let (canvas, owned) = self.find_or_create_canvas(&document)?;
        document.set_title(&config.title);
        canvas.set_tab_index(0);

        let (width, height) = match web_sys::window().and_then(|w| inner_size(&w)) {
            Some(size) if self.fill_window => size,
            _ => (config.width, config.height),
        };
        resize_canvas(&canvas, width, height);
        set_style(&canvas, "cursor", config.cursor.css_name());
        if !config.visible {
            set_style(&canvas, "display", "none");
        }

        let listeners = wire(&self.queue, &canvas, &document, self.fill_window);
        if (width, height) != (config.width, config.height) {
            window_event(
                &mut self.queue.borrow_mut(),
                WindowEvent::Resized { width, height },
            );
        }

        self.window = Some(CanvasWindow {
            context: CanvasContext { canvas },
            listeners,
            owned,
        });
        debug!(canvas = %self.canvas_id, width, height, "attached to canvas");
        Ok(CANVAS_HANDLE)
    }

    fn destroy_window(&mut self, window: NativeHandle) {
        if window != CANVAS_HANDLE {
            return;
        }
        let Some(canvas_window) = self.window.take() else {
            return;
        };
        for listener in &canvas_window.listeners {
            if let Err(err) = listener
                .target
                .remove_event_listener_with_callback(listener.kind, listener.callback.unchecked_ref())
            {
                debug!(kind = listener.kind, ?err, "failed to remove event listener");
            }
        }
        if canvas_window.owned {
            canvas_window.context.canvas.remove();
        }
        self.frame_requested = false;
        debug!(canvas = %self.canvas_id, "detached from canvas");
    }

    fn set_title(&mut self, window: NativeHandle, title: &str) {
        if self.canvas(window).is_some() {
            if let Some(document) = &self.document {
                document.set_title(title);
            }
        }
    }

    fn set_size(&mut self, window: NativeHandle, width: f32, height: f32) {
        if let Some(canvas) = self.canvas(window) {
            resize_canvas(canvas, width, height);
        }
    }

    fn set_visibility(&mut self, window: NativeHandle, visibility: Visibility) {
        let Some(canvas) = self.canvas(window) else {
            return;
        };
        match visibility {
            Visibility::Visible | Visibility::Maximized => set_style(canvas, "display", "block"),
            Visibility::Hidden | Visibility::Minimized => set_style(canvas, "display", "none"),
            Visibility::Fullscreen => {
                if let Err(err) = canvas.request_fullscreen() {
                    debug!(?err, "fullscreen request rejected");
                }
            }
        }
    }

    fn set_focus(&mut self, window: NativeHandle, focus: Focus) {
        let Some(canvas) = self.canvas(window) else {
            return;
        };
        let result = match focus {
            Focus::Focused => canvas.focus(),
            Focus::Unfocused => canvas.blur(),
        };
        if let Err(err) = result {
            debug!(?err, "focus change rejected");
        }
    }

    fn set_cursor(&mut self, window: NativeHandle, cursor: Cursor) {
        if let Some(canvas) = self.canvas(window) {
            set_style(canvas, "cursor", cursor.css_name());
        }
    }

    fn request_frame(&mut self, window: NativeHandle) {
        if self.canvas(window).is_some() {
            self.frame_requested = true;
        }
    }

    fn poll_events(&mut self, events: &mut Vec<Event>) -> Result<()> {
        events.append(&mut self.queue.borrow_mut());
        if std::mem::take(&mut self.frame_requested) {
            events.push(Event::Frame {
                window: CANVAS_HANDLE,
            });
        }
        Ok(())
    }

    fn graphics_context(&mut self, window: NativeHandle) -> Option<&mut dyn GraphicsContext> {
        match &mut self.window {
            Some(w) if window == CANVAS_HANDLE => Some(&mut w.context as &mut dyn GraphicsContext),
            _ => None,
        }
    }
}

/// Call `tick` once per animation frame until it returns `false`
///
/// `tick` normally wraps `Context::poll_events`, so frames requested during
/// one tick render on the next.
pub fn run(mut tick: impl FnMut() -> bool + 'static) -> Result<()> {
    let window =
        web_sys::window().ok_or_else(|| PlatformError::EventLoop("no browser window".to_string()))?;

    let slot: Rc<RefCell<Option<Closure<dyn FnMut(f64)>>>> = Rc::new(RefCell::new(None));
    let next = Rc::clone(&slot);
    let browser = window.clone();
    *slot.borrow_mut() = Some(Closure::new(move |_time: f64| {
        if !tick() {
            debug!("animation loop finished");
            return;
        }
        if let Some(callback) = next.borrow().as_ref() {
            if let Err(err) = browser.request_animation_frame(callback.as_ref().unchecked_ref()) {
                warn!(?err, "failed to schedule animation frame");
            }
        }
    }));

    let first = slot.borrow();
    let callback = first
        .as_ref()
        .ok_or_else(|| PlatformError::EventLoop("animation callback missing".to_string()))?;
    window
        .request_animation_frame(callback.as_ref().unchecked_ref())
        .map_err(|e| js_error("request animation frame", e))?;
    Ok(())
}
