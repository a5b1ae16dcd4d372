//! CLI output formatting.
//!
//! Geometry first, files second: every command leads with what was computed
//! (canvas, visible area, photo placement) and shows paths as indented
//! context lines.
//!
//! # Output Format
//!
//! ## Plan
//!
//! ```text
//! Canvas 800x600
//!     Visible area: 800x600 at (0, 0)
//!     Photo: 800x800 at (0, -100)
//!     Pan: (0, 0)
//! ```
//!
//! ## Compose
//!
//! ```text
//! Canvas 800x600
//!     Visible area: 800x600 at (0, 0)
//!     Photo: 800x800 at (0, -100)
//!     Pan: (0, 0)
//! Exported → photo-with-frame.png
//! ```
//!
//! ## Frames
//!
//! ```text
//! Frames
//! 001 gold (default)
//!     Source: frames/gold.png
//! 002 wood
//!     Source: frames/wood.png
//! ```
//!
//! # Architecture
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure.

use crate::config::FramesConfig;
use crate::frame_store::StoredFrame;
use crate::imaging::{CompositionPlan, RenderReport, VisibleArea};
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// Format a coordinate without a trailing `.0` when it is whole.
fn num(value: f64) -> String {
    if value.fract() == 0.0 {
        format!("{}", value as i64)
    } else {
        format!("{:.2}", value)
    }
}

fn area_line(label: &str, area: &VisibleArea) -> String {
    format!(
        "{}{}: {}x{} at ({}, {})",
        indent(1),
        label,
        num(area.width),
        num(area.height),
        num(area.x),
        num(area.y)
    )
}

/// Lines shared by `plan` and `compose`.
fn geometry_lines(
    canvas: (u32, u32),
    visible_area: &VisibleArea,
    photo: Option<&crate::imaging::PhotoPlacement>,
) -> Vec<String> {
    let mut lines = vec![format!("Canvas {}x{}", canvas.0, canvas.1)];
    lines.push(area_line("Visible area", visible_area));
    match photo {
        Some(p) => {
            lines.push(format!(
                "{}Photo: {}x{} at ({}, {})",
                indent(1),
                num(p.dest.width),
                num(p.dest.height),
                p.dest.x,
                p.dest.y
            ));
            lines.push(format!("{}Pan: ({}, {})", indent(1), num(p.pan.x), num(p.pan.y)));
            if p.clip.is_some() {
                lines.push(format!("{}Clipped to visible area", indent(1)));
            }
        }
        None => lines.push(format!("{}Photo: none", indent(1))),
    }
    lines
}

// ============================================================================
// Plan
// ============================================================================

pub fn format_plan(plan: &CompositionPlan) -> Vec<String> {
    geometry_lines(plan.canvas, &plan.visible_area, plan.photo.as_ref())
}

pub fn print_plan(plan: &CompositionPlan) {
    for line in format_plan(plan) {
        println!("{}", line);
    }
}

// ============================================================================
// Compose
// ============================================================================

/// Format the result of a render and where it was written.
pub fn format_render_report(report: &RenderReport, output: &Path) -> Vec<String> {
    let mut lines = geometry_lines(report.canvas, &report.visible_area, report.photo.as_ref());
    lines.push(format!("Exported → {}", output.display()));
    lines
}

pub fn print_render_report(report: &RenderReport, output: &Path) {
    for line in format_render_report(report, output) {
        println!("{}", line);
    }
}

// ============================================================================
// Frame store
// ============================================================================

/// Format the remembered frame (or its absence).
pub fn format_stored_frame(frame: Option<&StoredFrame>) -> Vec<String> {
    match frame {
        Some(f) => vec![
            format!("Remembered frame {}x{}", f.width, f.height),
            format!("{}Source: {}", indent(1), f.source.display()),
            format!("{}Stored: {}", indent(1), f.path.display()),
        ],
        None => vec!["No remembered frame".to_string()],
    }
}

pub fn print_stored_frame(frame: Option<&StoredFrame>) {
    for line in format_stored_frame(frame) {
        println!("{}", line);
    }
}

// ============================================================================
// Frames
// ============================================================================

/// Format the configured selectable frames.
pub fn format_frames(frames: &FramesConfig) -> Vec<String> {
    if !frames.is_selectable() {
        return vec!["No frames configured".to_string()];
    }
    let mut lines = vec!["Frames".to_string()];
    for (i, choice) in frames.choices.iter().enumerate() {
        let is_default = frames.default.as_deref() == Some(choice.name.as_str());
        let marker = if is_default { " (default)" } else { "" };
        lines.push(format!("{} {}{}", format_index(i + 1), choice.name, marker));
        lines.push(format!("{}Source: {}", indent(1), choice.path.display()));
    }
    lines
}

pub fn print_frames(frames: &FramesConfig) {
    for line in format_frames(frames) {
        println!("{}", line);
    }
}
