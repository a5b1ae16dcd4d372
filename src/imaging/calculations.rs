//! Pure calculation functions for compositing geometry.
//!
//! All functions here are pure and testable without any I/O or images.

use super::params::{DrawRect, MaskRegion, PanOffset, PanSlack, ViewState, VisibleArea, Zoom};

/// Calculate the output canvas size for a frame, capped at `max_dim`.
///
/// Sources that already fit are returned unchanged. Larger sources are scaled
/// down uniformly so the longer edge equals `max_dim`.
///
/// # Arguments
/// * `source` - Frame native dimensions (width, height)
/// * `max_dim` - Maximum allowed size of either edge
///
/// # Returns
/// * `(width, height)` - Canvas dimensions, each at least 1
///
/// # Examples
/// ```
/// # use photo_framer::imaging::calculate_canvas_size;
/// assert_eq!(calculate_canvas_size((800, 600), 3000), (800, 600));
/// assert_eq!(calculate_canvas_size((6000, 4000), 3000), (3000, 2000));
/// ```
pub fn calculate_canvas_size(source: (u32, u32), max_dim: u32) -> (u32, u32) {
    let (src_w, src_h) = source;
    if src_w <= max_dim && src_h <= max_dim {
        return source;
    }

    let scale = (max_dim as f64 / src_w as f64).min(max_dim as f64 / src_h as f64);
    let w = (src_w as f64 * scale).round().max(1.0) as u32;
    let h = (src_h as f64 * scale).round().max(1.0) as u32;
    (w, h)
}

/// Resolve the area the photo is fitted into, in canvas pixels.
///
/// Without a mask this is the whole canvas. With one, each edge of the mask
/// is rounded to the nearest pixel.
pub fn resolve_visible_area(canvas: (u32, u32), mask: Option<&MaskRegion>) -> VisibleArea {
    let Some(mask) = mask else {
        return VisibleArea::full(canvas);
    };

    let (cw, ch) = (canvas.0 as f64, canvas.1 as f64);
    VisibleArea {
        x: (mask.left * cw).round(),
        y: (mask.top * ch).round(),
        width: (mask.width * cw).round().max(1.0),
        height: (mask.height * ch).round().max(1.0),
    }
}

/// Calculate the photo's draw size under cover fit scaled by zoom.
///
/// At zoom 1 the photo exactly covers the area: one dimension matches, the
/// other overflows. Zoom then scales both dimensions uniformly.
///
/// # Arguments
/// * `area` - Rectangle to cover
/// * `photo_aspect` - Photo native width / height
/// * `zoom` - Scale factor on top of cover fit
///
/// # Returns
/// * `(width, height)` - Draw dimensions in canvas pixels
pub fn calculate_cover_size(area: &VisibleArea, photo_aspect: f64, zoom: Zoom) -> (f64, f64) {
    let z = zoom.value();

    if area.aspect() > photo_aspect {
        // Area is relatively wider: width binds, height overflows
        let w = area.width * z;
        (w, w / photo_aspect)
    } else {
        // Area is relatively taller (or equal): height binds, width overflows
        let h = area.height * z;
        (h * photo_aspect, h)
    }
}

/// Calculate where the photo layer lands on the canvas.
///
/// The photo is centered on the visible area, shifted by the pan offset, and
/// its origin snapped to whole pixels.
pub fn calculate_draw_rect(area: &VisibleArea, photo_aspect: f64, view: &ViewState) -> DrawRect {
    let (draw_w, draw_h) = calculate_cover_size(area, photo_aspect, view.zoom);
    let (cx, cy) = area.center();

    DrawRect {
        x: (cx - draw_w / 2.0 + view.pan.x).round() as i64,
        y: (cy - draw_h / 2.0 + view.pan.y).round() as i64,
        width: draw_w,
        height: draw_h,
    }
}

/// Bound a pan offset so the photo cannot drift arbitrarily far away.
///
/// Each axis is clamped independently to `±slack × max(draw, area)` along that
/// axis, with the draw size taken at the current zoom. The photo can leave
/// the view entirely, but only by a bounded amount. Idempotent.
pub fn clamp_pan(
    pan: PanOffset,
    area: &VisibleArea,
    photo_aspect: f64,
    zoom: Zoom,
    slack: PanSlack,
) -> PanOffset {
    let (draw_w, draw_h) = calculate_cover_size(area, photo_aspect, zoom);
    let max_x = draw_w.max(area.width) * slack.value();
    let max_y = draw_h.max(area.height) * slack.value();

    PanOffset {
        x: pan.x.clamp(-max_x, max_x),
        y: pan.y.clamp(-max_y, max_y),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn area(w: f64, h: f64) -> VisibleArea {
        VisibleArea {
            x: 0.0,
            y: 0.0,
            width: w,
            height: h,
        }
    }

    // =========================================================================
    // calculate_canvas_size tests
    // =========================================================================

    #[test]
    fn canvas_within_cap_is_unchanged() {
        assert_eq!(calculate_canvas_size((800, 600), 3000), (800, 600));
        assert_eq!(calculate_canvas_size((3000, 3000), 3000), (3000, 3000));
    }

    #[test]
    fn canvas_landscape_scaled_to_cap() {
        // 6000x4000 → scale 0.5
        assert_eq!(calculate_canvas_size((6000, 4000), 3000), (3000, 2000));
    }

    #[test]
    fn canvas_portrait_scaled_to_cap() {
        // 2500x5000 with cap 2000 → scale 0.4
        assert_eq!(calculate_canvas_size((2500, 5000), 2000), (1000, 2000));
    }

    #[test]
    fn canvas_one_edge_over_cap() {
        // Only the width exceeds: 4000x1000 → 3000x750
        assert_eq!(calculate_canvas_size((4000, 1000), 3000), (3000, 750));
    }

    #[test]
    fn canvas_rounds_to_nearest() {
        // 4001x3001 → scale 3000/4001, h = 3001 * 0.74981... = 2250.19 → 2250
        assert_eq!(calculate_canvas_size((4001, 3001), 3000), (3000, 2250));
    }

    #[test]
    fn canvas_never_collapses_to_zero() {
        let (w, h) = calculate_canvas_size((100_000, 10), 3000);
        assert_eq!(w, 3000);
        assert_eq!(h, 1);
    }

    #[test]
    fn canvas_respects_cap_and_aspect_across_inputs() {
        for &(sw, sh) in &[
            (5000, 3333),
            (3001, 17),
            (12000, 9000),
            (2999, 8000),
            (7777, 7777),
            (640, 4321),
        ] {
            for &cap in &[2000u32, 2500, 3000] {
                let (w, h) = calculate_canvas_size((sw, sh), cap);
                assert!(w.max(h) <= cap, "{sw}x{sh} cap {cap} → {w}x{h}");
                // Rounding moves each edge by at most half a pixel.
                let scale = (cap as f64 / sw.max(sh) as f64).min(1.0);
                assert!((w as f64 - sw as f64 * scale).abs() <= 0.5);
                assert!((h as f64 - sh as f64 * scale).abs() <= 0.5);
            }
        }
    }

    // =========================================================================
    // resolve_visible_area tests
    // =========================================================================

    #[test]
    fn visible_area_without_mask_is_whole_canvas() {
        let a = resolve_visible_area((800, 600), None);
        assert_eq!(a, area(800.0, 600.0));
        assert_eq!(a.center(), (400.0, 300.0));
    }

    #[test]
    fn visible_area_from_mask_fractions() {
        let mask = MaskRegion {
            left: 0.2,
            top: 0.2,
            width: 0.6,
            height: 0.6,
        };
        let a = resolve_visible_area((1000, 1000), Some(&mask));
        assert_eq!(a.x, 200.0);
        assert_eq!(a.y, 200.0);
        assert_eq!(a.width, 600.0);
        assert_eq!(a.height, 600.0);
        assert_eq!(a.center(), (500.0, 500.0));
    }

    #[test]
    fn visible_area_rounds_each_edge() {
        let mask = MaskRegion {
            left: 0.1,
            top: 0.25,
            width: 0.333,
            height: 0.5,
        };
        // 0.1*805 = 80.5 → 81; 0.25*403 = 100.75 → 101; 0.333*805 = 268.07 → 268; 0.5*403 = 201.5 → 202
        let a = resolve_visible_area((805, 403), Some(&mask));
        assert_eq!((a.x, a.y, a.width, a.height), (81.0, 101.0, 268.0, 202.0));
    }

    // =========================================================================
    // calculate_cover_size tests
    // =========================================================================

    #[test]
    fn cover_square_photo_in_landscape_area() {
        // 800x600 area (1.33) vs square photo → width binds
        let (w, h) = calculate_cover_size(&area(800.0, 600.0), 1.0, Zoom(1.0));
        assert_eq!((w, h), (800.0, 800.0));
    }

    #[test]
    fn cover_wide_photo_in_portrait_area() {
        // 400x500 area (0.8) vs 16:9 photo → height binds
        let (w, h) = calculate_cover_size(&area(400.0, 500.0), 16.0 / 9.0, Zoom(1.0));
        assert_eq!(h, 500.0);
        assert!((w - 888.888).abs() < 0.01);
    }

    #[test]
    fn cover_equal_aspect_matches_exactly() {
        let (w, h) = calculate_cover_size(&area(400.0, 300.0), 4.0 / 3.0, Zoom(1.0));
        assert_eq!(h, 300.0);
        assert!((w - 400.0).abs() < 1e-9);
    }

    #[test]
    fn cover_at_zoom_one_always_covers_area() {
        for &(aw, ah) in &[(800.0, 600.0), (600.0, 800.0), (1.0, 1000.0), (333.0, 333.0)] {
            for &r in &[0.1, 0.5, 0.75, 1.0, 4.0 / 3.0, 16.0 / 9.0, 10.0] {
                let (w, h) = calculate_cover_size(&area(aw, ah), r, Zoom(1.0));
                assert!(w >= aw - 1e-9, "{aw}x{ah} r={r}: w={w}");
                assert!(h >= ah - 1e-9, "{aw}x{ah} r={r}: h={h}");
            }
        }
    }

    #[test]
    fn cover_zoom_two_doubles_both_dimensions() {
        for &r in &[0.5, 1.0, 1.5, 3.0] {
            let a = area(640.0, 480.0);
            let (w1, h1) = calculate_cover_size(&a, r, Zoom(1.0));
            let (w2, h2) = calculate_cover_size(&a, r, Zoom(2.0));
            assert_eq!(w2, w1 * 2.0);
            assert_eq!(h2, h1 * 2.0);
        }
    }

    #[test]
    fn cover_zoom_increase_grows_monotonically() {
        let a = area(500.0, 700.0);
        let mut prev = calculate_cover_size(&a, 1.2, Zoom(0.25));
        for z in [0.5, 0.9, 1.0, 1.1, 2.5, 7.0] {
            let next = calculate_cover_size(&a, 1.2, Zoom(z));
            assert!(next.0 > prev.0 && next.1 > prev.1);
            prev = next;
        }
    }

    #[test]
    fn cover_below_one_leaves_gaps() {
        let (w, h) = calculate_cover_size(&area(800.0, 600.0), 1.0, Zoom(0.5));
        assert_eq!((w, h), (400.0, 400.0));
    }

    // =========================================================================
    // calculate_draw_rect tests
    // =========================================================================

    #[test]
    fn draw_rect_centered_without_pan() {
        // 800x600 canvas, square photo: 800x800 centered → y = 300 - 400 = -100
        let rect = calculate_draw_rect(&area(800.0, 600.0), 1.0, &ViewState::default());
        assert_eq!(rect.x, 0);
        assert_eq!(rect.y, -100);
        assert_eq!(rect.width, 800.0);
        assert_eq!(rect.height, 800.0);
    }

    #[test]
    fn draw_rect_applies_pan() {
        let view = ViewState {
            zoom: Zoom(1.0),
            pan: PanOffset::new(50.0, -30.0),
        };
        let rect = calculate_draw_rect(&area(800.0, 600.0), 1.0, &view);
        assert_eq!((rect.x, rect.y), (50, -130));
    }

    #[test]
    fn draw_rect_centers_on_mask() {
        let a = VisibleArea {
            x: 200.0,
            y: 200.0,
            width: 600.0,
            height: 600.0,
        };
        // Photo 2:1 in square area → height binds: 1200x600
        let rect = calculate_draw_rect(&a, 2.0, &ViewState::default());
        assert_eq!((rect.x, rect.y), (-100, 200));
        assert_eq!((rect.width, rect.height), (1200.0, 600.0));
    }

    #[test]
    fn draw_rect_rounds_origin() {
        let view = ViewState {
            zoom: Zoom(1.0),
            pan: PanOffset::new(0.4, 0.6),
        };
        let rect = calculate_draw_rect(&area(100.0, 100.0), 1.0, &view);
        assert_eq!((rect.x, rect.y), (0, 1));
    }

    // =========================================================================
    // clamp_pan tests
    // =========================================================================

    #[test]
    fn clamp_leaves_small_pan_alone() {
        let pan = PanOffset::new(120.0, -80.0);
        let clamped = clamp_pan(pan, &area(800.0, 600.0), 1.0, Zoom(1.0), PanSlack::default());
        assert_eq!(clamped, pan);
    }

    #[test]
    fn clamp_bounds_each_axis_independently() {
        // Draw 800x800 in 800x600 → max_x = 1200, max_y = 1200
        let clamped = clamp_pan(
            PanOffset::new(5000.0, -5000.0),
            &area(800.0, 600.0),
            1.0,
            Zoom(1.0),
            PanSlack::default(),
        );
        assert_eq!(clamped, PanOffset::new(1200.0, -1200.0));
    }

    #[test]
    fn clamp_uses_area_when_photo_is_smaller() {
        // Zoom 0.25: draw 200x200, area 800x600 → max_x = 1200, max_y = 900
        let clamped = clamp_pan(
            PanOffset::new(-10_000.0, 10_000.0),
            &area(800.0, 600.0),
            1.0,
            Zoom(0.25),
            PanSlack::default(),
        );
        assert_eq!(clamped, PanOffset::new(-1200.0, 900.0));
    }

    #[test]
    fn clamp_bound_grows_with_zoom() {
        let pan = PanOffset::new(3000.0, 0.0);
        let a = area(800.0, 600.0);
        let at_one = clamp_pan(pan, &a, 1.0, Zoom(1.0), PanSlack::default());
        let at_three = clamp_pan(pan, &a, 1.0, Zoom(3.0), PanSlack::default());
        assert_eq!(at_one.x, 1200.0);
        assert_eq!(at_three.x, 3000.0);
    }

    #[test]
    fn clamp_honours_custom_slack() {
        let clamped = clamp_pan(
            PanOffset::new(900.0, 0.0),
            &area(800.0, 600.0),
            1.0,
            Zoom(1.0),
            PanSlack(0.5),
        );
        assert_eq!(clamped.x, 400.0);
    }

    #[test]
    fn clamp_is_idempotent() {
        let a = area(733.0, 411.0);
        for &(px, py) in &[(0.0, 0.0), (1e6, -1e6), (-333.3, 2222.2), (12.5, -7.25)] {
            for &z in &[0.1, 1.0, 4.0] {
                let once = clamp_pan(PanOffset::new(px, py), &a, 0.8, Zoom(z), PanSlack::default());
                let twice = clamp_pan(once, &a, 0.8, Zoom(z), PanSlack::default());
                assert_eq!(once, twice);
            }
        }
    }
}
