//! Compositing engine in pure Rust, no system libraries.
//!
//! | Concern | Where |
//! |---|---|
//! | **Canvas size** | [`calculate_canvas_size`]: frame size capped at a max edge |
//! | **Cover fit** | [`calculate_cover_size`], [`calculate_draw_rect`] |
//! | **Pan clamp** | [`clamp_pan`] |
//! | **Draw order** | [`compose`]: background, clipped photo, frame |
//! | **Pixels** | [`RasterSurface`] over the `image` crate |
//!
//! The module is split into:
//! - **Calculations**: Pure functions for geometry (unit testable)
//! - **Parameters**: Value types passed between the layers
//! - **Backend**: [`Surface`] trait + [`BackendError`]
//! - **Operations**: The compositor, planning and drawing
//! - **Rust backend**: [`RasterSurface`], decode and export helpers

pub mod backend;
mod calculations;
pub mod operations;
mod params;
pub mod rust_backend;

pub use backend::{BackendError, Surface};
pub use calculations::{
    calculate_canvas_size, calculate_cover_size, calculate_draw_rect, clamp_pan,
    resolve_visible_area,
};
pub use operations::{
    CompositionPlan, CompositorSettings, PhotoPlacement, RenderReport, compose, plan_composition,
};
pub use params::{
    DrawRect, MaskRegion, PanOffset, PanSlack, Picture, Quality, ViewState, VisibleArea, Zoom,
};
pub use rust_backend::{RasterSurface, decode_picture, identify, load_picture, save_canvas};
