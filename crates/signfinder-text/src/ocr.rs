//! OCR collaborator boundary and the tesseract adapter

use std::io::Read;
use std::process::{Command, Stdio};
use std::time::{Duration, Instant};

use image::GrayImage;
use log::{debug, warn};

use crate::error::{TextError, TextResult};

/// A character recognizer for rectified sign crops.
///
/// Implementations receive the grayscale crop and return the raw
/// reading; post-correction is the caller's concern.
pub trait OcrEngine {
    fn recognize(&self, sign: &GrayImage) -> TextResult<String>;
}

/// Runs the `tesseract` command line over a scratch directory.
///
/// The crop is written to a temp file, the subprocess is polled until
/// it finishes or the timeout expires, and the first line of the
/// output file becomes the reading. The scratch directory is removed
/// when the adapter call returns.
pub struct TesseractOcr {
    command: String,
    timeout: Duration,
}

impl TesseractOcr {
    pub fn new(command: impl Into<String>, timeout: Duration) -> Self {
        TesseractOcr { command: command.into(), timeout }
    }

    fn wait_with_timeout(&self, child: &mut std::process::Child) -> TextResult<std::process::ExitStatus> {
        let start = Instant::now();
        loop {
            if let Some(status) = child.try_wait()? {
                return Ok(status);
            }
            if start.elapsed() >= self.timeout {
                child.kill()?;
                child.wait()?;
                return Err(TextError::Timeout { seconds: self.timeout.as_secs() });
            }
            std::thread::sleep(Duration::from_millis(50));
        }
    }
}

impl OcrEngine for TesseractOcr {
    fn recognize(&self, sign: &GrayImage) -> TextResult<String> {
        let dir = tempfile::tempdir()?;
        let input = dir.path().join("sign.png");
        let out_base = dir.path().join("reading");
        sign.save(&input)?;

        debug!("running {} on {}x{} crop", self.command, sign.width(), sign.height());
        let mut child = Command::new(&self.command)
            .arg(&input)
            .arg(&out_base)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .spawn()?;
        let status = self.wait_with_timeout(&mut child)?;
        if !status.success() {
            let mut stderr = String::new();
            if let Some(pipe) = child.stderr.as_mut() {
                let _ = pipe.read_to_string(&mut stderr);
            }
            warn!("{} failed: {}", self.command, stderr.trim());
            return Err(TextError::CommandFailed { command: self.command.clone(), status });
        }

        let text = std::fs::read_to_string(out_base.with_extension("txt"))?;
        Ok(text.lines().next().unwrap_or("").to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn blank_sign() -> GrayImage {
        GrayImage::new(16, 8)
    }

    #[test]
    fn test_missing_command_is_an_io_error() {
        let ocr = TesseractOcr::new("signfinder-no-such-binary", Duration::from_secs(1));
        assert!(matches!(ocr.recognize(&blank_sign()), Err(TextError::Io(_))));
    }

    #[test]
    fn test_timeout_kills_the_subprocess() {
        let ocr = TesseractOcr::new("sleep", Duration::from_millis(100));
        // `sleep` treats the scratch paths as junk arguments; with a
        // numeric-looking first argument it would block far past the
        // timeout. Either way it cannot finish successfully.
        let start = Instant::now();
        let result = ocr.recognize(&blank_sign());
        assert!(result.is_err());
        assert!(start.elapsed() < Duration::from_secs(5));
    }

    #[test]
    fn test_missing_output_file_is_an_error() {
        // `true` exits successfully without writing the reading, so
        // the adapter surfaces the missing output file as I/O failure.
        let ocr = TesseractOcr::new("true", Duration::from_secs(1));
        assert!(matches!(ocr.recognize(&blank_sign()), Err(TextError::Io(_))));
    }
}
