//! Shared test utilities: synthetic frames, photos and on-disk fixtures.
//!
//! # Usage
//!
//! ```rust
//! use crate::test_helpers::*;
//!
//! let frame = framed_window(1000, 1000, (200, 200, 600, 600), Rgba([0, 0, 255, 255]));
//! let photo = solid_picture(400, 300, Rgba([255, 0, 0, 255]));
//! ```

use crate::imaging::Picture;
use image::{Rgba, RgbaImage};
use std::path::{Path, PathBuf};

// =========================================================================
// In-memory pictures
// =========================================================================

/// A picture filled with one color.
pub fn solid_picture(width: u32, height: u32, color: Rgba<u8>) -> Picture {
    Picture::new(RgbaImage::from_pixel(width, height, color))
}

/// A frame: opaque `border` everywhere except a fully transparent window.
///
/// `window` is `(x, y, width, height)` in pixels.
pub fn framed_window(
    width: u32,
    height: u32,
    window: (u32, u32, u32, u32),
    border: Rgba<u8>,
) -> Picture {
    let (wx, wy, ww, wh) = window;
    Picture::new(RgbaImage::from_fn(width, height, |x, y| {
        let inside = x >= wx && x < wx + ww && y >= wy && y < wy + wh;
        if inside { Rgba([0, 0, 0, 0]) } else { border }
    }))
}

// =========================================================================
// On-disk fixtures
// =========================================================================

/// Write `picture` as a PNG at `dir/name` and return the path.
pub fn write_png(dir: &Path, name: &str, picture: &Picture) -> PathBuf {
    let path = dir.join(name);
    picture
        .pixels()
        .save_with_format(&path, image::ImageFormat::Png)
        .unwrap_or_else(|e| panic!("failed to write fixture {}: {e}", path.display()));
    path
}

/// Write `picture` as a JPEG (alpha dropped) at `dir/name` and return the path.
pub fn write_jpeg(dir: &Path, name: &str, picture: &Picture) -> PathBuf {
    let path = dir.join(name);
    image::DynamicImage::ImageRgba8(picture.pixels().clone())
        .to_rgb8()
        .save_with_format(&path, image::ImageFormat::Jpeg)
        .unwrap_or_else(|e| panic!("failed to write fixture {}: {e}", path.display()));
    path
}
