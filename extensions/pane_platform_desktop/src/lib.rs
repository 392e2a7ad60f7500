//! Pane Desktop Platform
//!
//! Windowing and input for macOS, Windows, and Linux using winit.
//!
//! [`DesktopBackend`] implements the `pane_platform` backend trait by
//! pumping winit's event loop, so a `pane_core::Context` can drive desktop
//! windows from an ordinary `while ctx.poll_events() {}` loop.
//!
//! # Example
//!
//! ```ignore
//! use pane_core::prelude::*;
//! use pane_platform_desktop::DesktopBackend;
//!
//! fn main() -> pane_core::Result<()> {
//!     let mut ctx = Context::new(DesktopBackend::new());
//!     let window = ctx.create_window_simple(800.0, 600.0, "Hello")?;
//!     ctx.callbacks(window)?.on_key_down(|cx, key| {
//!         if key == KeyCode::Escape {
//!             cx.close_window();
//!         }
//!     });
//!
//!     while ctx.poll_events() {}
//!     Ok(())
//! }
//! ```

pub mod input;

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
mod backend;

#[cfg(any(target_os = "windows", target_os = "macos", target_os = "linux"))]
pub use backend::{DesktopBackend, DesktopSurface};

pub use input::NAMED_KEYS;
