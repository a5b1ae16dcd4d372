//! Pure Rust raster backend: decode, draw, encode.
//!
//! ## Crate mapping
//!
//! | Operation | Crate / function |
//! |---|---|
//! | Decode (JPEG, PNG, TIFF, WebP) | `image::ImageReader` (pure Rust decoders) |
//! | Shrink before drawing | `image::imageops::resize` with `Lanczos3` |
//! | Draw into rectangle | bilinear sampling + source-over, rows in parallel via `rayon` |
//! | Encode PNG / JPEG / WebP | `image::codecs::{png, jpeg, webp}` |

use super::backend::{BackendError, Surface};
use super::params::{DrawRect, Picture, Quality, VisibleArea};
use image::codecs::jpeg::JpegEncoder;
use image::codecs::png::PngEncoder;
use image::codecs::webp::WebPEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageFormat, ImageReader, Rgba, RgbaImage};
use rayon::prelude::*;
use std::borrow::Cow;
use std::path::Path;
use std::sync::LazyLock;

/// Extensions whose decoders are compiled in.
const INPUT_CANDIDATES: &[(&str, ImageFormat)] = &[
    ("jpg", ImageFormat::Jpeg),
    ("jpeg", ImageFormat::Jpeg),
    ("png", ImageFormat::Png),
    ("tif", ImageFormat::Tiff),
    ("tiff", ImageFormat::Tiff),
    ("webp", ImageFormat::WebP),
];

static SUPPORTED_EXTENSIONS: LazyLock<Vec<&'static str>> = LazyLock::new(|| {
    INPUT_CANDIDATES
        .iter()
        .filter(|(_, fmt)| fmt.reading_enabled())
        .map(|(ext, _)| *ext)
        .collect()
});

/// Returns the set of image file extensions that have working decoders compiled in.
pub fn supported_input_extensions() -> &'static [&'static str] {
    &SUPPORTED_EXTENSIONS
}

/// Whether `path` has an extension one of the compiled-in decoders handles.
pub fn is_supported_input(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .is_some_and(|e| supported_input_extensions().contains(&e.as_str()))
}

/// Load and decode an image from disk.
pub fn load_picture(path: &Path) -> Result<Picture, BackendError> {
    let img = ImageReader::open(path)?
        .with_guessed_format()?
        .decode()
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))?;
    Ok(Picture::new(img.into_rgba8()))
}

/// Decode an in-memory encoded image.
///
/// Entry point for hosts that receive photo or frame bytes directly (an
/// upload, a clipboard paste) rather than a path on disk.
pub fn decode_picture(bytes: &[u8]) -> Result<Picture, BackendError> {
    let img = image::load_from_memory(bytes).map_err(|e| BackendError::Decode(e.to_string()))?;
    Ok(Picture::new(img.into_rgba8()))
}

/// Read image dimensions without decoding pixel data.
pub fn identify(path: &Path) -> Result<(u32, u32), BackendError> {
    image::image_dimensions(path)
        .map_err(|e| BackendError::Decode(format!("{}: {}", path.display(), e)))
}

/// Whether the file at `path` is a PNG, judged by its content.
pub fn is_png(path: &Path) -> Result<bool, BackendError> {
    let reader = ImageReader::open(path)?.with_guessed_format()?;
    Ok(reader.format() == Some(ImageFormat::Png))
}

/// Encode the canvas to `path`, choosing the format from the extension.
///
/// - `png`: lossless, alpha kept
/// - `jpg`/`jpeg`: alpha dropped, `quality` applies
/// - `webp`: lossless, alpha kept
///
/// The image is encoded in memory first. An unsupported extension or an
/// encoder failure leaves any existing file at `path` untouched.
pub fn save_canvas(canvas: &RgbaImage, path: &Path, quality: Quality) -> Result<(), BackendError> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_lowercase();

    let img = DynamicImage::ImageRgba8(canvas.clone());
    let mut bytes = Vec::new();
    let result = match ext.as_str() {
        "png" => img.write_with_encoder(PngEncoder::new(&mut bytes)),
        "jpg" | "jpeg" => DynamicImage::ImageRgb8(img.to_rgb8())
            .write_with_encoder(JpegEncoder::new_with_quality(&mut bytes, quality.value())),
        "webp" => img.write_with_encoder(WebPEncoder::new_lossless(&mut bytes)),
        other => return Err(BackendError::UnsupportedFormat(other.to_string())),
    };
    result.map_err(|e| BackendError::Encode(e.to_string()))?;

    std::fs::write(path, bytes)?;
    Ok(())
}

/// CPU canvas backed by an RGBA8 buffer (straight alpha).
///
/// See the [module docs](self) for the crate-to-operation mapping.
pub struct RasterSurface {
    canvas: RgbaImage,
}

impl RasterSurface {
    pub fn new() -> Self {
        Self {
            canvas: RgbaImage::new(0, 0),
        }
    }

    pub fn canvas(&self) -> &RgbaImage {
        &self.canvas
    }

    pub fn into_canvas(self) -> RgbaImage {
        self.canvas
    }
}

impl Default for RasterSurface {
    fn default() -> Self {
        Self::new()
    }
}

/// Half-open pixel span `[start, end)` along one axis.
fn span(start: i64, end: i64, limit_start: i64, limit_end: i64) -> (i64, i64) {
    (start.max(limit_start), end.min(limit_end))
}

/// Sample `src` bilinearly at continuous coordinates, returning premultiplied
/// RGBA in 0..1. Coordinates outside the image clamp to the nearest edge.
fn sample_premultiplied(src: &RgbaImage, u: f64, v: f64) -> [f64; 4] {
    let max_x = src.width() as f64 - 1.0;
    let max_y = src.height() as f64 - 1.0;
    let u = u.clamp(0.0, max_x);
    let v = v.clamp(0.0, max_y);

    let x0 = u.floor();
    let y0 = v.floor();
    let fx = u - x0;
    let fy = v - y0;
    let x1 = (x0 + 1.0).min(max_x);
    let y1 = (y0 + 1.0).min(max_y);

    let texel = |x: f64, y: f64| -> [f64; 4] {
        let p = src.get_pixel(x as u32, y as u32).0;
        let a = p[3] as f64 / 255.0;
        [
            p[0] as f64 / 255.0 * a,
            p[1] as f64 / 255.0 * a,
            p[2] as f64 / 255.0 * a,
            a,
        ]
    };

    let tl = texel(x0, y0);
    let tr = texel(x1, y0);
    let bl = texel(x0, y1);
    let br = texel(x1, y1);

    let mut out = [0.0; 4];
    for c in 0..4 {
        let top = tl[c] + (tr[c] - tl[c]) * fx;
        let bot = bl[c] + (br[c] - bl[c]) * fx;
        out[c] = top + (bot - top) * fy;
    }
    out
}

/// Source-over of a premultiplied sample onto a straight-alpha pixel.
fn blend_over(dst: &mut [u8], src: [f64; 4]) {
    let sa = src[3];
    if sa <= 0.0 {
        return;
    }
    let da = dst[3] as f64 / 255.0;
    let inv = 1.0 - sa;
    let out_a = sa + da * inv;

    for c in 0..3 {
        let dc = dst[c] as f64 / 255.0 * da;
        let premul = src[c] + dc * inv;
        dst[c] = ((premul / out_a) * 255.0).round().clamp(0.0, 255.0) as u8;
    }
    dst[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
}

impl Surface for RasterSurface {
    fn set_size(&mut self, width: u32, height: u32) {
        self.canvas = RgbaImage::new(width, height);
    }

    fn size(&self) -> (u32, u32) {
        self.canvas.dimensions()
    }

    fn fill(&mut self, color: Rgba<u8>) {
        for px in self.canvas.pixels_mut() {
            *px = color;
        }
    }

    fn draw_picture(&mut self, picture: &Picture, dest: DrawRect, clip: Option<&VisibleArea>) {
        let (cw, ch) = self.canvas.dimensions();
        if cw == 0 || ch == 0 || picture.width() == 0 || picture.height() == 0 {
            return;
        }
        if !(dest.width > 0.0 && dest.height > 0.0) {
            return;
        }

        let right = (dest.x as f64 + dest.width).round() as i64;
        let bottom = (dest.y as f64 + dest.height).round() as i64;
        let (mut x0, mut x1) = span(dest.x, right, 0, cw as i64);
        let (mut y0, mut y1) = span(dest.y, bottom, 0, ch as i64);
        if let Some(clip) = clip {
            (x0, x1) = span(x0, x1, clip.x as i64, (clip.x + clip.width) as i64);
            (y0, y1) = span(y0, y1, clip.y as i64, (clip.y + clip.height) as i64);
        }
        if x0 >= x1 || y0 >= y1 {
            return;
        }

        // Shrinking with bilinear alone aliases; prescale with Lanczos3 first.
        let target_w = dest.width.round().max(1.0) as u32;
        let target_h = dest.height.round().max(1.0) as u32;
        let source: Cow<'_, RgbaImage> =
            if target_w < picture.width() || target_h < picture.height() {
                Cow::Owned(image::imageops::resize(
                    picture.pixels(),
                    target_w.min(picture.width()),
                    target_h.min(picture.height()),
                    FilterType::Lanczos3,
                ))
            } else {
                Cow::Borrowed(picture.pixels())
            };
        let scale_x = source.width() as f64 / dest.width;
        let scale_y = source.height() as f64 / dest.height;
        let origin_x = dest.x as f64;
        let origin_y = dest.y as f64;

        let row_bytes = cw as usize * 4;
        let raw: &mut [u8] = &mut self.canvas;
        raw.par_chunks_exact_mut(row_bytes)
            .enumerate()
            .filter(|(row, _)| (*row as i64) >= y0 && (*row as i64) < y1)
            .for_each(|(row, pixels)| {
                let v = (row as f64 + 0.5 - origin_y) * scale_y - 0.5;
                for col in x0..x1 {
                    let u = (col as f64 + 0.5 - origin_x) * scale_x - 0.5;
                    let sample = sample_premultiplied(&source, u, v);
                    let idx = col as usize * 4;
                    blend_over(&mut pixels[idx..idx + 4], sample);
                }
            });
    }
}
