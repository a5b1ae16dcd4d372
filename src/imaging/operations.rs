//! The compositor: plan a frame + photo composition, then draw it.
//!
//! Planning is pure and combines the [`calculations`](super::calculations);
//! drawing walks a plan against any [`Surface`]. Keeping the two apart lets
//! tests assert on geometry without touching pixels, and lets hosts report
//! geometry (the `plan` command) without rendering.
//!
//! Draw order is fixed:
//!
//! 1. Opaque background over the whole canvas
//! 2. Photo layer, clipped to the mask when one is configured
//! 3. Frame stretched to the full canvas, never clipped

use super::backend::Surface;
use super::calculations::{
    calculate_canvas_size, calculate_draw_rect, clamp_pan, resolve_visible_area,
};
use super::params::{DrawRect, MaskRegion, PanOffset, PanSlack, Picture, ViewState, VisibleArea};
use image::Rgba;

/// Static compositor configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositorSettings {
    /// Longest allowed canvas edge.
    pub max_dimension: u32,
    /// Clip region for the photo layer. `None` lets the photo use the whole canvas.
    pub mask: Option<MaskRegion>,
    pub pan_slack: PanSlack,
    pub background: Rgba<u8>,
}

impl Default for CompositorSettings {
    fn default() -> Self {
        Self {
            max_dimension: 3000,
            mask: None,
            pan_slack: PanSlack::default(),
            background: Rgba([255, 255, 255, 255]),
        }
    }
}

/// Where the photo goes and how it is clipped.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotoPlacement {
    pub dest: DrawRect,
    /// Pan after clamping; callers write this back into their view state.
    pub pan: PanOffset,
    pub clip: Option<VisibleArea>,
}

/// Everything needed to draw one composition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CompositionPlan {
    pub canvas: (u32, u32),
    pub visible_area: VisibleArea,
    pub photo: Option<PhotoPlacement>,
}

/// What a render produced, for the host UI.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderReport {
    pub canvas: (u32, u32),
    pub visible_area: VisibleArea,
    pub photo: Option<PhotoPlacement>,
    /// Export, center and reset only make sense with a photo loaded.
    pub ui_enabled: bool,
}

impl From<CompositionPlan> for RenderReport {
    fn from(plan: CompositionPlan) -> Self {
        Self {
            canvas: plan.canvas,
            visible_area: plan.visible_area,
            photo: plan.photo,
            ui_enabled: plan.photo.is_some(),
        }
    }
}

/// Plan a composition without drawing anything.
///
/// # Arguments
/// * `frame` - Frame native dimensions; they fix the canvas size
/// * `photo` - Photo native dimensions, if a photo is loaded
/// * `view` - Current zoom and (possibly unclamped) pan
/// * `settings` - Canvas cap, mask, slack and background
pub fn plan_composition(
    frame: (u32, u32),
    photo: Option<(u32, u32)>,
    view: &ViewState,
    settings: &CompositorSettings,
) -> CompositionPlan {
    let canvas = calculate_canvas_size(frame, settings.max_dimension);
    let visible_area = resolve_visible_area(canvas, settings.mask.as_ref());

    let photo = photo.map(|(pw, ph)| {
        let aspect = pw as f64 / ph as f64;
        let pan = clamp_pan(view.pan, &visible_area, aspect, view.zoom, settings.pan_slack);
        let clamped = ViewState {
            zoom: view.zoom,
            pan,
        };
        PhotoPlacement {
            dest: calculate_draw_rect(&visible_area, aspect, &clamped),
            pan,
            clip: settings.mask.map(|_| visible_area),
        }
    });

    CompositionPlan {
        canvas,
        visible_area,
        photo,
    }
}

/// Plan and draw a composition onto `surface`.
///
/// Returns `None` without touching the surface when no frame is loaded.
pub fn compose(
    surface: &mut impl Surface,
    frame: Option<&Picture>,
    photo: Option<&Picture>,
    view: &ViewState,
    settings: &CompositorSettings,
) -> Option<RenderReport> {
    let frame = frame?;
    let plan = plan_composition(
        frame.dimensions(),
        photo.map(Picture::dimensions),
        view,
        settings,
    );
    draw_plan(surface, &plan, frame, photo, settings.background);
    Some(plan.into())
}

/// Execute a plan. The photo is drawn only if both the plan and the picture have one.
pub fn draw_plan(
    surface: &mut impl Surface,
    plan: &CompositionPlan,
    frame: &Picture,
    photo: Option<&Picture>,
    background: Rgba<u8>,
) {
    let (cw, ch) = plan.canvas;
    surface.set_size(cw, ch);
    surface.fill(background);

    if let (Some(placement), Some(photo)) = (plan.photo, photo) {
        surface.draw_picture(photo, placement.dest, placement.clip.as_ref());
    }

    let full = DrawRect {
        x: 0,
        y: 0,
        width: cw as f64,
        height: ch as f64,
    };
    surface.draw_picture(frame, full, None);
}
