//! Session state and the interaction controller.
//!
//! A [`Session`] owns everything that changes while the user works: the
//! frame, the photo, the [`ViewState`] and the drag in progress. Hosts feed
//! it input (pointer events, zoom control values, center/reset actions,
//! freshly decoded pictures) and call [`Session::render`] whenever an input
//! reports that the picture changed.
//!
//! ## Input → state
//!
//! | Input | Effect |
//! |---|---|
//! | new photo | pan → (0, 0), zoom → current zoom-control value |
//! | new frame | frame replaced, view kept |
//! | zoom control | zoom set verbatim (bad input → default zoom) |
//! | drag start | baseline = (pointer, pan); ignored without a photo |
//! | drag move | pan = baseline pan + (pointer − baseline pointer) |
//! | drag end / leave | drag cleared |
//! | center | pan → (0, 0) |
//! | reset | pan → (0, 0), zoom and zoom control → default zoom |
//!
//! Pan is re-clamped on every render, so drags may overshoot freely.
//!
//! All mutation goes through `&mut self`; a host that receives events on
//! several threads wraps the session in a `Mutex` to keep renders
//! synchronous with state.

use crate::imaging::{
    CompositionPlan, CompositorSettings, PanOffset, Picture, RenderReport, Surface, ViewState,
    Zoom, compose, plan_composition,
};
use tracing::{debug, info, warn};

/// A pointer position in canvas pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// Raw pointer and touch input.
///
/// Touch events carry every active touch point; only the first is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent<'a> {
    Down(Point),
    Move(Point),
    Up,
    /// Pointer left the canvas.
    Leave,
    TouchStart(&'a [Point]),
    TouchMove(&'a [Point]),
    TouchEnd,
}

/// Where a drag began.
#[derive(Debug, Clone, Copy, PartialEq)]
struct DragAnchor {
    pointer: Point,
    pan: PanOffset,
}

/// One frame, at most one photo, and the user's view of it.
#[derive(Debug, Clone)]
pub struct Session {
    settings: CompositorSettings,
    default_zoom: Zoom,
    frame: Option<Picture>,
    photo: Option<Picture>,
    view: ViewState,
    /// Value currently shown by the host's zoom control.
    zoom_control: Zoom,
    drag: Option<DragAnchor>,
}

impl Session {
    pub fn new(settings: CompositorSettings, default_zoom: Zoom) -> Self {
        Self {
            settings,
            default_zoom,
            frame: None,
            photo: None,
            view: ViewState {
                zoom: default_zoom,
                pan: PanOffset::ZERO,
            },
            zoom_control: default_zoom,
            drag: None,
        }
    }

    pub fn settings(&self) -> &CompositorSettings {
        &self.settings
    }

    pub fn view(&self) -> ViewState {
        self.view
    }

    pub fn zoom_control(&self) -> Zoom {
        self.zoom_control
    }

    pub fn frame(&self) -> Option<&Picture> {
        self.frame.as_ref()
    }

    pub fn photo(&self) -> Option<&Picture> {
        self.photo.as_ref()
    }

    /// Whether export, center and reset should be offered.
    pub fn ui_enabled(&self) -> bool {
        self.photo.is_some()
    }

    /// Output canvas size, once a frame is loaded.
    pub fn canvas_size(&self) -> Option<(u32, u32)> {
        self.plan().map(|plan| plan.canvas)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    // =========================================================================
    // Loaded pictures
    // =========================================================================

    /// Install a decoded frame. The view is left as is.
    pub fn load_frame(&mut self, frame: Picture) {
        info!(width = frame.width(), height = frame.height(), "frame loaded");
        self.frame = Some(frame);
    }

    /// Install a decoded photo, recentering it at the zoom control's value.
    pub fn load_photo(&mut self, photo: Picture) {
        info!(width = photo.width(), height = photo.height(), "photo loaded");
        self.photo = Some(photo);
        self.view = ViewState {
            zoom: self.zoom_control,
            pan: PanOffset::ZERO,
        };
        self.drag = None;
    }

    // =========================================================================
    // Zoom
    // =========================================================================

    /// Apply a zoom value verbatim. Invalid values fall back to the default zoom.
    pub fn set_zoom(&mut self, zoom: f64) {
        let zoom = Zoom::new_or(zoom, self.default_zoom);
        self.zoom_control = zoom;
        self.view.zoom = zoom;
        debug!(zoom = zoom.value(), "zoom set");
    }

    /// Apply the raw text of a zoom control.
    pub fn set_zoom_input(&mut self, input: Option<&str>) {
        let zoom = Zoom::parse_or(input, self.default_zoom);
        if input.and_then(|s| s.trim().parse::<f64>().ok()) != Some(zoom.value()) {
            warn!(?input, fallback = zoom.value(), "invalid zoom input");
        }
        self.zoom_control = zoom;
        self.view.zoom = zoom;
    }

    // =========================================================================
    // Drag to pan
    // =========================================================================

    /// Begin a drag at `pointer`. Returns `false` (and does nothing) without a photo.
    pub fn drag_start(&mut self, pointer: Point) -> bool {
        if self.photo.is_none() {
            return false;
        }
        self.drag = Some(DragAnchor {
            pointer,
            pan: self.view.pan,
        });
        debug!(x = pointer.x, y = pointer.y, "drag start");
        true
    }

    /// Move an active drag. Returns whether the pan changed and a render is due.
    pub fn drag_move(&mut self, pointer: Point) -> bool {
        let Some(anchor) = self.drag else {
            return false;
        };
        self.view.pan = PanOffset {
            x: anchor.pan.x + (pointer.x - anchor.pointer.x),
            y: anchor.pan.y + (pointer.y - anchor.pointer.y),
        };
        true
    }

    pub fn drag_end(&mut self) {
        if self.drag.take().is_some() {
            debug!(pan_x = self.view.pan.x, pan_y = self.view.pan.y, "drag end");
        }
    }

    /// Dispatch a raw pointer or touch event. Returns whether a render is due.
    pub fn handle_pointer(&mut self, event: PointerEvent<'_>) -> bool {
        match event {
            PointerEvent::Down(p) => {
                self.drag_start(p);
                false
            }
            PointerEvent::TouchStart(touches) => {
                if let Some(&p) = touches.first() {
                    self.drag_start(p);
                }
                false
            }
            PointerEvent::Move(p) => self.drag_move(p),
            PointerEvent::TouchMove(touches) => match touches.first() {
                Some(&p) => self.drag_move(p),
                None => false,
            },
            PointerEvent::Up | PointerEvent::Leave | PointerEvent::TouchEnd => {
                self.drag_end();
                false
            }
        }
    }

    // =========================================================================
    // Center / reset
    // =========================================================================

    /// Recenter the photo, keeping the zoom.
    pub fn center(&mut self) {
        self.view.pan = PanOffset::ZERO;
        self.drag = None;
    }

    /// Recenter and return to the default zoom, including the zoom control.
    pub fn reset(&mut self) {
        self.view = ViewState {
            zoom: self.default_zoom,
            pan: PanOffset::ZERO,
        };
        self.zoom_control = self.default_zoom;
        self.drag = None;
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Current geometry, with pan clamped, without drawing. `None` without a frame.
    pub fn plan(&self) -> Option<CompositionPlan> {
        let frame = self.frame.as_ref()?;
        Some(plan_composition(
            frame.dimensions(),
            self.photo.as_ref().map(Picture::dimensions),
            &self.view,
            &self.settings,
        ))
    }

    /// Like [`plan`](Self::plan), but also stores the clamped pan, as a render would.
    pub fn settle(&mut self) -> Option<CompositionPlan> {
        let plan = self.plan()?;
        if let Some(placement) = plan.photo {
            self.view.pan = placement.pan;
        }
        Some(plan)
    }

    /// Clamp the pan and draw the composition onto `surface`.
    ///
    /// Without a frame nothing happens and `None` is returned.
    pub fn render(&mut self, surface: &mut impl Surface) -> Option<RenderReport> {
        let report = compose(
            surface,
            self.frame.as_ref(),
            self.photo.as_ref(),
            &self.view,
            &self.settings,
        )?;
        if let Some(placement) = report.photo {
            self.view.pan = placement.pan;
        }
        debug!(
            canvas_w = report.canvas.0,
            canvas_h = report.canvas.1,
            ui_enabled = report.ui_enabled,
            "rendered"
        );
        Some(report)
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(CompositorSettings::default(), Zoom::default())
    }
}
