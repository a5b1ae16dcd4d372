//! Drawing surface trait and shared error type.
//!
//! The [`Surface`] trait is the one seam between the compositor and pixels:
//! resize, fill, and draw a picture into a rectangle with an optional clip.
//! Every drawing operation is infallible; only decoding and encoding (see
//! [`rust_backend`](super::rust_backend)) can fail, with [`BackendError`].
//!
//! The production implementation is
//! [`RasterSurface`](super::rust_backend::RasterSurface), a CPU canvas over
//! the `image` crate. Tests use a recording mock.

use super::params::{DrawRect, Picture, VisibleArea};
use image::Rgba;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BackendError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to decode image: {0}")]
    Decode(String),
    #[error("Failed to encode image: {0}")]
    Encode(String),
    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// A drawing target the compositor renders onto.
///
/// Mirrors the small subset of a 2D canvas API the compositor needs. A clip,
/// when given, applies to that single draw call only.
pub trait Surface {
    /// Resize the surface, discarding its contents.
    fn set_size(&mut self, width: u32, height: u32);

    /// Current (width, height).
    fn size(&self) -> (u32, u32);

    /// Paint every pixel with `color`.
    fn fill(&mut self, color: Rgba<u8>);

    /// Draw `picture` scaled into `dest`, restricted to `clip` if present.
    fn draw_picture(&mut self, picture: &Picture, dest: DrawRect, clip: Option<&VisibleArea>);
}
