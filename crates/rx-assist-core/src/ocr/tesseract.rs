//! Tesseract command-line OCR engine.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

use image::{GrayImage, ImageFormat};
use tracing::{debug, error};

use super::{OcrEngine, OcrError, OcrResult};

/// Page segmentation mode: assume a single uniform block of text.
pub const DEFAULT_PSM: u8 = 6;

/// Tesseract invoked as an external binary.
pub struct TesseractCli {
    binary: PathBuf,
    language: String,
    psm: u8,
}

impl TesseractCli {
    /// Engine using the binary at `binary` (a bare name is looked up on `PATH`).
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
            language: "eng".to_string(),
            psm: DEFAULT_PSM,
        }
    }

    /// Set language(s) for OCR (e.g., "eng", "eng+hin").
    pub fn with_language(mut self, language: &str) -> Self {
        self.language = language.to_string();
        self
    }

    /// Set the page segmentation mode.
    pub fn with_psm(mut self, psm: u8) -> Self {
        self.psm = psm;
        self
    }

    pub fn binary(&self) -> &Path {
        &self.binary
    }

    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn psm(&self) -> u8 {
        self.psm
    }

    /// Arguments passed to the binary for an input file. Output goes to stdout.
    fn args(&self, input: &Path) -> Vec<String> {
        vec![
            input.to_string_lossy().into_owned(),
            "stdout".to_string(),
            "--psm".to_string(),
            self.psm.to_string(),
            "-l".to_string(),
            self.language.clone(),
        ]
    }
}

impl Default for TesseractCli {
    fn default() -> Self {
        Self::new("tesseract")
    }
}

impl OcrEngine for TesseractCli {
    fn name(&self) -> &str {
        "tesseract"
    }

    fn recognize(&self, image: &GrayImage) -> OcrResult<String> {
        let input = tempfile::Builder::new()
            .prefix("rx-assist-")
            .suffix(".png")
            .tempfile()?;
        image.save_with_format(input.path(), ImageFormat::Png)?;

        let args = self.args(input.path());
        debug!(binary = %self.binary.display(), ?args, "Running OCR engine");

        let output = Command::new(&self.binary).args(&args).output().map_err(|e| {
            let reason = if e.kind() == ErrorKind::NotFound {
                "not found".to_string()
            } else {
                e.to_string()
            };
            OcrError::EngineUnavailable(format!("{} ({reason})", self.binary.display()))
        })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
            error!(status = ?output.status.code(), %stderr, "OCR engine failed");
            return Err(OcrError::EngineFailed {
                status: output.status.code(),
                stderr,
            });
        }

        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_args() {
        let engine = TesseractCli::new("/usr/bin/tesseract").with_language("eng+hin");
        let args = engine.args(Path::new("/tmp/page.png"));

        assert_eq!(args, vec!["/tmp/page.png", "stdout", "--psm", "6", "-l", "eng+hin"]);
    }

    #[test]
    fn test_args_with_psm() {
        let engine = TesseractCli::default().with_psm(4);
        let args = engine.args(Path::new("page.png"));

        assert_eq!(args, vec!["page.png", "stdout", "--psm", "4", "-l", "eng"]);
    }

    #[test]
    fn test_missing_binary_is_unavailable() {
        let engine = TesseractCli::new("/nonexistent/rx-assist/tesseract");
        let result = engine.recognize(&GrayImage::new(4, 4));

        assert!(matches!(result, Err(OcrError::EngineUnavailable(_))));
    }
}
