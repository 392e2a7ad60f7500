//! Pane SDL2 Backend
//!
//! Polled backend on SDL2. Each poll drains SDL's event queue to empty and
//! frames render at the idle point after the batch.
//!
//! [`translate`] turns raw SDL values into normalized events and builds
//! without SDL. The backend itself needs the `sdl2` feature and a system
//! libSDL2.
//!
//! ```ignore
//! use pane_core::prelude::*;
//! use pane_platform_sdl::SdlBackend;
//!
//! fn main() -> pane_core::Result<()> {
//!     let mut ctx = Context::new(SdlBackend::new());
//!     ctx.create_window_simple(640.0, 480.0, "Pane on SDL")?;
//!     while ctx.poll_events() {}
//!     Ok(())
//! }
//! ```

pub mod translate;

#[cfg(feature = "sdl2")]
mod backend;

#[cfg(feature = "sdl2")]
pub use backend::{SdlBackend, SdlSurface};
