//! # Photo Framer
//!
//! Places a user photo behind a decorative frame and exports the composite.
//! The frame is a PNG whose transparent regions reveal the photo; the photo
//! is scaled to cover the canvas (or an inset mask rectangle), can be zoomed
//! and dragged, and is always drawn beneath the frame.
//!
//! # Architecture: Plan, Then Draw
//!
//! Every render runs the same two steps:
//!
//! ```text
//! 1. Plan   frame size + photo size + view  →  canvas, visible area, photo rect
//! 2. Draw   plan  →  background, clipped photo, frame  →  Surface
//! ```
//!
//! Planning is pure arithmetic over dimensions, so geometry is tested
//! without touching pixels. Drawing goes through the [`imaging::Surface`]
//! trait; the CLI draws into an RGBA buffer, tests draw into a recorder.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`imaging`] | Canvas sizing, cover fit, pan clamp, the compositor and the raster backend |
//! | [`session`] | Frame, photo and view state; pointer, zoom, center and reset input |
//! | [`config`] | `photo-framer.toml` loading, merging and validation |
//! | [`frame_store`] | Remembers the last chosen frame between runs |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Clamp On Render
//!
//! Drags move the pan freely. The pan is clamped to
//! `slack × max(photo size, area size)` from center each time a composition
//! is planned, and the clamped value is written back. A drag that overshoots
//! therefore never leaves the photo unreachable, and re-rendering with the
//! same inputs changes nothing.
//!
//! ## One Engine, Two Layouts
//!
//! With the mask disabled the photo covers the full canvas. With it enabled
//! the photo covers, and is clipped to, the mask rectangle. The frame is
//! always stretched over the full canvas and never clipped.

pub mod config;
pub mod frame_store;
pub mod imaging;
pub mod output;
pub mod session;

#[cfg(test)]
pub(crate) mod test_helpers;
