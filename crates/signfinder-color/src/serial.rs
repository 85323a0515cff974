//! Histogram model persistence
//!
//! Models are stored as a small line-oriented text format carrying the
//! color space, the bin dimensions, and the flat bin-count array:
//!
//! ```text
//! signfinder-hist 1
//! space ycrcb
//! bins 64 64
//! <64 lines of 64 space-separated counts>
//! ```
//!
//! A classifier instance persists as two such files, one per model
//! (positive and negative).

use crate::colorspace::ColorSpace;
use crate::error::{ColorError, ColorResult};
use crate::histogram::JointHistogram;
use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

const MAGIC: &str = "signfinder-hist";
const VERSION: u32 = 1;

impl JointHistogram {
    /// Write the model to `path`
    pub fn save(&self, path: &Path) -> ColorResult<()> {
        let mut w = BufWriter::new(File::create(path)?);
        let (bx, by) = self.dimensions();
        writeln!(w, "{MAGIC} {VERSION}")?;
        writeln!(w, "space {}", self.space().name())?;
        writeln!(w, "bins {bx} {by}")?;
        for i in 0..bx {
            let row: Vec<String> = (0..by).map(|j| format!("{}", self.get(i, j))).collect();
            writeln!(w, "{}", row.join(" "))?;
        }
        w.flush()?;
        Ok(())
    }

    /// Read a model previously written by [`JointHistogram::save`]
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::MalformedModel`] for anything that does
    /// not parse back into a histogram with consistent dimensions.
    pub fn load(path: &Path) -> ColorResult<Self> {
        let reader = BufReader::new(File::open(path)?);
        let mut lines = reader.lines();

        let header = next_line(&mut lines)?;
        let mut parts = header.split_whitespace();
        if parts.next() != Some(MAGIC) {
            return Err(ColorError::MalformedModel(format!(
                "bad magic in {}",
                path.display()
            )));
        }
        let version: u32 = parse_field(parts.next(), "version")?;
        if version != VERSION {
            return Err(ColorError::MalformedModel(format!(
                "unsupported version {version}"
            )));
        }

        let space_line = next_line(&mut lines)?;
        let space_name = space_line
            .strip_prefix("space ")
            .ok_or_else(|| ColorError::MalformedModel("missing space line".into()))?;
        let space = ColorSpace::from_name(space_name.trim())
            .ok_or_else(|| ColorError::MalformedModel(format!("unknown space {space_name}")))?;

        let bins_line = next_line(&mut lines)?;
        let rest = bins_line
            .strip_prefix("bins ")
            .ok_or_else(|| ColorError::MalformedModel("missing bins line".into()))?;
        let mut dims = rest.split_whitespace();
        let bx: u32 = parse_field(dims.next(), "bins_x")?;
        let by: u32 = parse_field(dims.next(), "bins_y")?;
        if bx != by {
            // Only square histograms are produced today.
            return Err(ColorError::MalformedModel(format!(
                "non-square dimensions {bx}x{by}"
            )));
        }

        let mut hist = JointHistogram::new(space, bx)?;
        for i in 0..bx {
            let row = next_line(&mut lines)?;
            let values: Vec<&str> = row.split_whitespace().collect();
            if values.len() != by as usize {
                return Err(ColorError::MalformedModel(format!(
                    "row {i} has {} values, expected {by}",
                    values.len()
                )));
            }
            for (j, v) in values.iter().enumerate() {
                let count: f64 = v.parse().map_err(|_| {
                    ColorError::MalformedModel(format!("bad count {v:?} at ({i},{j})"))
                })?;
                hist.set_raw(i, j as u32, count);
            }
        }
        Ok(hist)
    }
}

fn next_line(lines: &mut impl Iterator<Item = std::io::Result<String>>) -> ColorResult<String> {
    match lines.next() {
        Some(line) => Ok(line?),
        None => Err(ColorError::MalformedModel("unexpected end of file".into())),
    }
}

fn parse_field<T: std::str::FromStr>(field: Option<&str>, name: &str) -> ColorResult<T> {
    field
        .and_then(|f| f.parse().ok())
        .ok_or_else(|| ColorError::MalformedModel(format!("missing or invalid {name}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgb, RgbImage};

    #[test]
    fn test_save_load_round_trip() {
        let img = RgbImage::from_pixel(6, 6, Rgb([20, 60, 220]));
        let hist = JointHistogram::from_image(&img, None, ColorSpace::Hsv, 32).unwrap();

        let dir = std::env::temp_dir();
        let path = dir.join("signfinder_hist_roundtrip.hist");
        hist.save(&path).unwrap();
        let loaded = JointHistogram::load(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded, hist);
    }

    #[test]
    fn test_load_rejects_garbage() {
        let dir = std::env::temp_dir();
        let path = dir.join("signfinder_hist_garbage.hist");
        std::fs::write(&path, "not a histogram\n").unwrap();
        let err = JointHistogram::load(&path);
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, Err(ColorError::MalformedModel(_))));
    }

    #[test]
    fn test_load_missing_file_is_io_error() {
        let err = JointHistogram::load(Path::new("/nonexistent/pos.hist"));
        assert!(matches!(err, Err(ColorError::Io(_))));
    }
}
