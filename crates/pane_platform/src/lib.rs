//! Pane Platform Abstraction Layer
//!
//! This crate provides the backend-neutral vocabulary shared by the Pane
//! engine and its platform backends: normalized events, keycodes, window
//! state and the traits a backend implements.
//!
//! # Architecture
//!
//! - [`Backend`] - A platform adapter: owns native windows, translates native events
//! - [`GraphicsContext`] - Per-window graphics context handed to draw callbacks
//! - [`Keymap`] - Bidirectional native/normalized keycode tables
//! - [`CodepointAssembler`] - UTF-16 surrogate pairing for text input
//! - [`TouchTracker`] - First-finger touch to primary pointer mapping
//!
//! # Platform Implementations
//!
//! - `pane_platform_desktop` - Desktop platforms (macOS, Windows, Linux) using winit
//! - `pane_platform_web` - Browser canvas using web-sys
//! - `pane_platform_sdl` - SDL2 polled event queue
//!
//! # Example
//!
//! ```
//! use pane_platform::{CodepointAssembler, KeyCode, VIRTUAL_KEYS};
//!
//! assert_eq!(VIRTUAL_KEYS.to_normalized(0x1B), Some(KeyCode::Escape));
//!
//! let mut text = CodepointAssembler::new();
//! assert_eq!(text.push(0xD83D), None);
//! assert_eq!(text.push(0xDE00), Some('\u{1F600}'));
//! ```

mod error;
mod event;
mod geometry;
mod input;
mod keymap;
mod platform;
mod text;
mod touch;
mod window;

// Re-export all public types
pub use error::{PlatformError, Result};
pub use event::{Event, WindowEvent};
pub use geometry::{Point, Rect, Size};
pub use input::{InputEvent, KeyCode, KeyState, PointerAction, PointerEvent, PointerPhase};
pub use keymap::{Keymap, SDL_KEYS, VIRTUAL_KEYS};
pub use platform::{Backend, BackendCaps, FrameTiming, GraphicsContext, NullGraphicsContext};
pub use text::CodepointAssembler;
pub use touch::{TouchPhase, TouchTracker};
pub use window::{Color, Cursor, Focus, NativeHandle, Visibility, WindowConfig};

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::error::{PlatformError, Result};
    pub use crate::event::{Event, WindowEvent};
    pub use crate::geometry::{Point, Rect, Size};
    pub use crate::input::{
        InputEvent, KeyCode, KeyState, PointerAction, PointerEvent, PointerPhase,
    };
    pub use crate::platform::{Backend, BackendCaps, FrameTiming, GraphicsContext};
    pub use crate::window::{Color, Cursor, Focus, NativeHandle, Visibility, WindowConfig};
}
