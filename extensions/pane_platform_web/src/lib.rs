//! Pane Web Platform
//!
//! Browser backend driving one `<canvas>` element. DOM event translation
//! lives in [`translate`] and builds on every target; the `web-sys`
//! listener glue only exists on `wasm32`.
//!
//! # Example
//!
//! ```ignore
//! use pane_core::prelude::*;
//! use pane_platform_web::{run, WebBackend};
//!
//! let mut ctx = Context::new(WebBackend::new().canvas_id("app"));
//! let window = ctx.create_window_simple(640.0, 480.0, "Pane")?;
//! ctx.callbacks(window)?.on_draw(|_cx, _gfx| {
//!     // draw into the canvas
//! });
//! run(move || ctx.poll_events())?;
//! ```

pub mod translate;

#[cfg(target_arch = "wasm32")]
mod canvas;

#[cfg(target_arch = "wasm32")]
pub use canvas::{run, CanvasContext, WebBackend};
