//! Remembered frame persistence.
//!
//! The last frame the user picked survives between runs so `compose` can be
//! called with only a photo. The store lives in the state directory:
//!
//! ```text
//! .photo-framer/
//! ├── frame.png     # Copy of the remembered frame
//! └── frame.json    # Manifest: where it came from and its size
//! ```
//!
//! The PNG is copied rather than referenced so moving or deleting the
//! original does not lose the frame. Only PNG frames are accepted; a frame
//! needs an alpha channel for the photo to show through.
//!
//! A manifest with an unknown version, or one that fails to parse, is treated
//! as "nothing remembered" rather than an error, so format changes never
//! break `compose`.

use crate::imaging::BackendError;
use crate::imaging::rust_backend::{identify, is_png};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Manifest file name within the state directory.
const MANIFEST_FILENAME: &str = "frame.json";

/// Name of the stored frame copy.
const FRAME_FILENAME: &str = "frame.png";

/// Version of the manifest format. Bump to forget frames stored by older versions.
const MANIFEST_VERSION: u32 = 1;

#[derive(Error, Debug)]
pub enum FrameStoreError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("frame must be a PNG: {0}")]
    NotPng(PathBuf),
    #[error("Image error: {0}")]
    Backend(#[from] BackendError),
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
struct Manifest {
    version: u32,
    source: PathBuf,
    width: u32,
    height: u32,
}

/// A frame remembered from an earlier run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredFrame {
    /// The stored copy; load this, not `source`.
    pub path: PathBuf,
    /// Where the frame was originally picked from.
    pub source: PathBuf,
    pub width: u32,
    pub height: u32,
}

/// Remember `png` as the current frame, replacing any previous one.
///
/// The file must be a decodable PNG. Nothing in the state directory changes
/// when validation fails. Passing the stored copy itself keeps the current
/// record as is.
pub fn remember(state_dir: &Path, png: &Path) -> Result<StoredFrame, FrameStoreError> {
    if !is_png(png)? {
        return Err(FrameStoreError::NotPng(png.to_path_buf()));
    }
    let (width, height) = identify(png)?;

    let path = state_dir.join(FRAME_FILENAME);
    let source = png.canonicalize().unwrap_or_else(|_| png.to_path_buf());
    if path.canonicalize().is_ok_and(|stored| stored == source) {
        if let Some(current) = recall(state_dir)? {
            debug!(path = %path.display(), "frame already remembered");
            return Ok(current);
        }
    }

    fs::create_dir_all(state_dir)?;
    // Stage both files next to their final names, then rename into place.
    let staged_frame = state_dir.join(format!("{FRAME_FILENAME}.tmp"));
    fs::copy(png, &staged_frame)?;

    let manifest = Manifest {
        version: MANIFEST_VERSION,
        source: source.clone(),
        width,
        height,
    };
    let staged_manifest = state_dir.join(format!("{MANIFEST_FILENAME}.tmp"));
    fs::write(&staged_manifest, serde_json::to_string_pretty(&manifest)?)?;

    fs::rename(&staged_frame, &path)?;
    fs::rename(&staged_manifest, state_dir.join(MANIFEST_FILENAME))?;
    info!(source = %source.display(), width, height, "remembered frame");

    Ok(StoredFrame {
        path,
        source,
        width,
        height,
    })
}

/// The remembered frame, if there is a usable one.
pub fn recall(state_dir: &Path) -> Result<Option<StoredFrame>, FrameStoreError> {
    let manifest_path = state_dir.join(MANIFEST_FILENAME);
    let content = match fs::read_to_string(&manifest_path) {
        Ok(c) => c,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(e.into()),
    };
    let manifest: Manifest = match serde_json::from_str(&content) {
        Ok(m) => m,
        Err(e) => {
            warn!(path = %manifest_path.display(), error = %e, "ignoring unreadable frame manifest");
            return Ok(None);
        }
    };
    if manifest.version != MANIFEST_VERSION {
        debug!(version = manifest.version, "ignoring frame manifest from another version");
        return Ok(None);
    }

    let path = state_dir.join(FRAME_FILENAME);
    if !path.exists() {
        warn!(path = %path.display(), "frame manifest present but frame copy missing");
        return Ok(None);
    }

    Ok(Some(StoredFrame {
        path,
        source: manifest.source,
        width: manifest.width,
        height: manifest.height,
    }))
}

/// Forget the remembered frame. Returns whether there was one.
pub fn forget(state_dir: &Path) -> Result<bool, FrameStoreError> {
    let mut removed = false;
    for name in [MANIFEST_FILENAME, FRAME_FILENAME] {
        match fs::remove_file(state_dir.join(name)) {
            Ok(()) => removed = true,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {}
            Err(e) => return Err(e.into()),
        }
    }
    if removed {
        info!(state_dir = %state_dir.display(), "forgot remembered frame");
    }
    Ok(removed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_helpers::{framed_window, solid_picture, write_jpeg, write_png};
    use image::Rgba;
    use tempfile::TempDir;

    #[test]
    fn recall_empty_dir_is_none() {
        let tmp = TempDir::new().unwrap();
        assert_eq!(recall(tmp.path()).unwrap(), None);
        assert_eq!(recall(&tmp.path().join("missing")).unwrap(), None);
    }

    #[test]
    fn remember_then_recall() {
        let tmp = TempDir::new().unwrap();
        let frame = framed_window(120, 80, (20, 20, 80, 40), Rgba([200, 150, 0, 255]));
        let src = write_png(tmp.path(), "gold.png", &frame);
        let state = tmp.path().join("state");

        let stored = remember(&state, &src).unwrap();
        assert_eq!((stored.width, stored.height), (120, 80));
        assert_eq!(stored.path, state.join(FRAME_FILENAME));
        assert!(stored.path.exists());

        let recalled = recall(&state).unwrap().unwrap();
        assert_eq!(recalled, stored);
    }

    #[test]
    fn stored_copy_survives_source_removal() {
        let tmp = TempDir::new().unwrap();
        let src = write_png(tmp.path(), "f.png", &solid_picture(10, 10, Rgba([0, 0, 0, 0])));
        let state = tmp.path().join("state");
        remember(&state, &src).unwrap();
        fs::remove_file(&src).unwrap();

        let recalled = recall(&state).unwrap().unwrap();
        assert!(recalled.path.exists());
    }

    #[test]
    fn remember_replaces_previous_frame() {
        let tmp = TempDir::new().unwrap();
        let a = write_png(tmp.path(), "a.png", &solid_picture(10, 10, Rgba([0, 0, 0, 0])));
        let b = write_png(tmp.path(), "b.png", &solid_picture(30, 20, Rgba([0, 0, 0, 0])));
        let state = tmp.path().join("state");
        remember(&state, &a).unwrap();
        remember(&state, &b).unwrap();

        let recalled = recall(&state).unwrap().unwrap();
        assert_eq!((recalled.width, recalled.height), (30, 20));
        assert!(recalled.source.ends_with("b.png"));
    }

    #[test]
    fn remember_stored_copy_keeps_frame_intact() {
        let tmp = TempDir::new().unwrap();
        let frame = framed_window(40, 30, (10, 10, 20, 10), Rgba([1, 2, 3, 255]));
        let src = write_png(tmp.path(), "orig.png", &frame);
        let state = tmp.path().join("state");
        let first = remember(&state, &src).unwrap();

        let second = remember(&state, &first.path).unwrap();
        assert_eq!(second, first);
        assert!(fs::metadata(&first.path).unwrap().len() > 0);

        let recalled = recall(&state).unwrap().unwrap();
        let reloaded = crate::imaging::load_picture(&recalled.path).unwrap();
        assert_eq!(reloaded.pixels(), frame.pixels());
    }

    #[test]
    fn remember_leaves_no_staging_files() {
        let tmp = TempDir::new().unwrap();
        let src = write_png(tmp.path(), "f.png", &solid_picture(4, 4, Rgba([0, 0, 0, 0])));
        let state = tmp.path().join("state");
        remember(&state, &src).unwrap();

        let mut names: Vec<String> = fs::read_dir(&state)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        assert_eq!(names, vec![MANIFEST_FILENAME, FRAME_FILENAME]);
    }

    #[test]
    fn remember_rejects_non_png() {
        let tmp = TempDir::new().unwrap();
        let src = write_jpeg(tmp.path(), "f.jpg", &solid_picture(10, 10, Rgba([9, 9, 9, 255])));
        let state = tmp.path().join("state");

        let result = remember(&state, &src);
        assert!(matches!(result, Err(FrameStoreError::NotPng(_))));
        // State untouched
        assert!(!state.exists());
    }

    #[test]
    fn remember_missing_file_is_error() {
        let tmp = TempDir::new().unwrap();
        let result = remember(tmp.path(), &tmp.path().join("nope.png"));
        assert!(result.is_err());
        assert_eq!(recall(tmp.path()).unwrap(), None);
    }

    #[test]
    fn forget_removes_frame() {
        let tmp = TempDir::new().unwrap();
        let src = write_png(tmp.path(), "f.png", &solid_picture(4, 4, Rgba([0, 0, 0, 0])));
        let state = tmp.path().join("state");
        remember(&state, &src).unwrap();

        assert!(forget(&state).unwrap());
        assert_eq!(recall(&state).unwrap(), None);
        assert!(!forget(&state).unwrap());
    }

    #[test]
    fn corrupt_manifest_is_ignored() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(MANIFEST_FILENAME), "{ not json").unwrap();
        assert_eq!(recall(tmp.path()).unwrap(), None);
    }

    #[test]
    fn other_version_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let src = write_png(tmp.path(), "f.png", &solid_picture(4, 4, Rgba([0, 0, 0, 0])));
        let state = tmp.path().join("state");
        remember(&state, &src).unwrap();

        let manifest_path = state.join(MANIFEST_FILENAME);
        let mut manifest: Manifest =
            serde_json::from_str(&fs::read_to_string(&manifest_path).unwrap()).unwrap();
        manifest.version = MANIFEST_VERSION + 1;
        fs::write(&manifest_path, serde_json::to_string(&manifest).unwrap()).unwrap();

        assert_eq!(recall(&state).unwrap(), None);
    }

    #[test]
    fn missing_copy_is_ignored() {
        let tmp = TempDir::new().unwrap();
        let src = write_png(tmp.path(), "f.png", &solid_picture(4, 4, Rgba([0, 0, 0, 0])));
        let state = tmp.path().join("state");
        remember(&state, &src).unwrap();
        fs::remove_file(state.join(FRAME_FILENAME)).unwrap();

        assert_eq!(recall(&state).unwrap(), None);
    }
}
