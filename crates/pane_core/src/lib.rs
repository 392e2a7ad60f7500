//! Pane Core
//!
//! Event normalization and pointer-capture dispatch engine. A [`Context`]
//! drives one platform [`Backend`](pane_platform::Backend), keeps the
//! registry of live windows and turns the backend's event stream into
//! window callbacks, view-tree notifications and render passes.
//!
//! # Architecture
//!
//! ```text
//! Backend (desktop / web / sdl / headless)
//!     ↓ Event
//! Context ── WindowRegistry ── WindowState
//!     ↓                             ├─ Callbacks
//! dispatch                          ├─ PointerCapture ── ViewTree
//!     ↓                             ├─ CodepointAssembler
//! RedrawScheduler                   └─ RedrawState
//! ```
//!
//! # Example
//!
//! ```
//! use pane_core::prelude::*;
//!
//! let mut ctx = Context::new(HeadlessBackend::new());
//! let window = ctx.create_window_simple(320.0, 240.0, "Hello")?;
//!
//! let (mut tree, root) = RectTree::with_root(Size::new(320.0, 240.0));
//! let button = tree.add_child(root, Rect::new(10.0, 10.0, 100.0, 30.0)).unwrap();
//! ctx.set_view_tree(window, Box::new(tree))?;
//!
//! let handle = ctx.native_handle(window).unwrap();
//! ctx.backend_mut().push_input(
//!     handle,
//!     InputEvent::Pointer(PointerEvent::Pressed {
//!         action: PointerAction::Primary,
//!         x: 20.0,
//!         y: 20.0,
//!     }),
//! );
//! ctx.poll_events();
//! assert_eq!(ctx.active_view(window), Some(button));
//! # Ok::<(), pane_core::Error>(())
//! ```

mod callbacks;
mod capture;
mod context;
mod dispatch;
mod error;
mod headless;
mod redraw;
mod registry;
mod view;
mod window;


pub use callbacks::{
    Callbacks, CloseCallback, CodepointCallback, DrawCallback, EventCx, FocusCallback,
    KeyCallback, PointerActionCallback, PointerMoveCallback, ResizeCallback, ScrollCallback,
    VisibilityCallback,
};
pub use capture::{CaptureState, PointerCapture, Transition};
pub use context::Context;
pub use error::{Error, Result};
pub use headless::{HeadlessBackend, HeadlessContext, HeadlessWindow};
pub use redraw::{RedrawScheduler, RedrawState};
pub use registry::{Removed, WindowId, WindowRegistry};
pub use view::{EmptyTree, PointerNotice, RectTree, ViewId, ViewTree};
pub use window::WindowInfo;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::callbacks::{Callbacks, EventCx};
    pub use crate::context::Context;
    pub use crate::error::{Error, Result};
    pub use crate::headless::HeadlessBackend;
    pub use crate::registry::WindowId;
    pub use crate::view::{PointerNotice, RectTree, ViewId, ViewTree};
    pub use pane_platform::prelude::*;
}
