//! Value types shared by the geometry, compositor and session layers.
//!
//! These structs describe *where* things go, not *how* they are drawn. They
//! are the interface between the pure [`calculations`](super::calculations),
//! the [`operations`](super::operations) planner and whatever
//! [`Surface`](super::backend::Surface) ends up putting pixels on screen.
//!
//! ## Types
//!
//! - [`Zoom`]: Photo scale factor relative to cover fit. Positive, unbounded.
//! - [`PanOffset`]: Photo displacement in canvas pixels, relative to the visible-area center.
//! - [`ViewState`]: Zoom + pan: everything the user controls.
//! - [`PanSlack`]: Multiplier bounding how far the photo may be dragged away.
//! - [`MaskRegion`]: Inset clip rectangle as fractions of the canvas.
//! - [`VisibleArea`]: The mask (or whole canvas) resolved to pixels.
//! - [`DrawRect`]: Where the photo layer lands on the canvas.
//! - [`Picture`]: A decoded image plus its native size.
//! - [`Quality`]: Lossy export quality (1–100, default 92). Clamped on construction.

use image::RgbaImage;
use serde::{Deserialize, Serialize};

/// Zoom factor applied on top of cover fit (1.0 = exactly covers the area).
///
/// There is no lower or upper bound: values below 1.0 shrink the
/// photo and reveal the background, values above enlarge it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Zoom(pub f64);

impl Zoom {
    /// Accepts any finite positive value, substituting `fallback` otherwise.
    pub fn new_or(value: f64, fallback: Zoom) -> Self {
        if value.is_finite() && value > 0.0 {
            Self(value)
        } else {
            fallback
        }
    }

    /// Parse a zoom control value (e.g. the text of a range input).
    ///
    /// Missing, non-numeric, zero, negative and non-finite input all resolve
    /// to `fallback`.
    pub fn parse_or(input: Option<&str>, fallback: Zoom) -> Self {
        match input.map(str::trim).and_then(|s| s.parse::<f64>().ok()) {
            Some(v) => Self::new_or(v, fallback),
            None => fallback,
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for Zoom {
    fn default() -> Self {
        Self(1.0)
    }
}

/// Photo displacement in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PanOffset {
    pub x: f64,
    pub y: f64,
}

impl PanOffset {
    pub const ZERO: PanOffset = PanOffset { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// User-controlled view of the photo.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct ViewState {
    pub zoom: Zoom,
    pub pan: PanOffset,
}

/// Slack multiplier for the pan clamp (default 1.5).
///
/// The photo may travel up to `slack × max(draw size, area size)` from the
/// visible-area center along each axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PanSlack(pub f64);

impl PanSlack {
    pub fn value(self) -> f64 {
        self.0
    }
}

impl Default for PanSlack {
    fn default() -> Self {
        Self(1.5)
    }
}

/// Clip rectangle expressed as fractions (0..1) of the canvas size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaskRegion {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

/// Pixel rectangle the photo is fitted into.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisibleArea {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl VisibleArea {
    /// The whole canvas.
    pub fn full(canvas: (u32, u32)) -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            width: canvas.0 as f64,
            height: canvas.1 as f64,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn aspect(&self) -> f64 {
        self.width / self.height
    }
}

/// Destination rectangle of the photo layer.
///
/// The origin is snapped to whole pixels; the size keeps its fractional part
/// so zoom stays exactly proportional.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawRect {
    pub x: i64,
    pub y: i64,
    pub width: f64,
    pub height: f64,
}

/// Quality setting for lossy export (1-100).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Quality(pub u8);

impl Quality {
    pub fn new(value: u32) -> Self {
        Self(value.clamp(1, 100) as u8)
    }

    pub fn value(self) -> u8 {
        self.0
    }
}

impl Default for Quality {
    fn default() -> Self {
        Self(92)
    }
}

/// A decoded raster (frame or photo).
#[derive(Debug, Clone)]
pub struct Picture {
    pixels: RgbaImage,
}

impl Picture {
    pub fn new(pixels: RgbaImage) -> Self {
        Self { pixels }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn dimensions(&self) -> (u32, u32) {
        self.pixels.dimensions()
    }

    /// Native width / height.
    pub fn aspect(&self) -> f64 {
        self.width() as f64 / self.height() as f64
    }

    pub fn pixels(&self) -> &RgbaImage {
        &self.pixels
    }
}
