//! Ground-truth discovery next to the input images
//!
//! For an image at `path`, the labeled mask lives at `path` with
//! `_mask.png` appended and the correct readings at `path` with
//! `.txt` appended, so `foo.jpg` pairs with `foo.jpg_mask.png` and
//! `foo.jpg.txt`. Missing ground truth is not an error; both loaders
//! return `Ok(None)` and leave the warning to the caller.

use std::path::{Path, PathBuf};

use image::GrayImage;

use crate::error::EvalResult;

fn with_suffix(path: &Path, suffix: &str) -> PathBuf {
    let mut name = path.as_os_str().to_os_string();
    name.push(suffix);
    PathBuf::from(name)
}

/// Path of the labeled mask belonging to `image_path`
pub fn mask_path(image_path: &Path) -> PathBuf {
    with_suffix(image_path, "_mask.png")
}

/// Path of the reading label file belonging to `image_path`
pub fn text_path(image_path: &Path) -> PathBuf {
    with_suffix(image_path, ".txt")
}

/// Loads the labeled mask for an image, if one exists.
///
/// The mask is hand-drawn in any color; it is collapsed to grayscale
/// and any nonzero pixel counts as labeled foreground.
pub fn load_truth_mask(image_path: &Path) -> EvalResult<Option<GrayImage>> {
    let path = mask_path(image_path);
    if !path.exists() {
        return Ok(None);
    }
    Ok(Some(image::open(&path)?.to_luma8()))
}

/// Loads the labeled readings for an image, if a label file exists.
///
/// One correct reading per line; reading stops at the first empty
/// line, and lines are trimmed.
pub fn load_truth_text(image_path: &Path) -> EvalResult<Option<Vec<String>>> {
    let path = text_path(image_path);
    if !path.exists() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    let lines: Vec<String> = content
        .lines()
        .take_while(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .collect();
    Ok(Some(lines))
}
