//! OCR front-end.
//!
//! Pipeline: image bytes → format check → decode → preprocess → engine → trimmed text
//!
//! The engine is a black box behind [`OcrEngine`]. Callers that must never
//! fail use [`extract_text_lenient`] or [`extract_file_lenient`], which turn
//! every error into an empty text plus a message for the user.

mod preprocess;
mod tesseract;

pub use preprocess::*;
pub use tesseract::*;

use std::path::Path;

use image::{GrayImage, ImageFormat};
use thiserror::Error;
use tracing::{error, info};

/// Maximum accepted image size in bytes.
const MAX_IMAGE_BYTES: usize = 50 * 1024 * 1024;

/// File extensions accepted for upload.
pub const SUPPORTED_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "bmp"];

/// OCR errors.
#[derive(Error, Debug)]
pub enum OcrError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported image format: {0}")]
    UnsupportedFormat(String),

    #[error("Image is empty")]
    EmptyImage,

    #[error("Image too large: {0} bytes")]
    TooLarge(usize),

    #[error("OCR engine could not be started: {0}")]
    EngineUnavailable(String),

    #[error("OCR engine failed (status {status:?}): {stderr}")]
    EngineFailed { status: Option<i32>, stderr: String },
}

pub type OcrResult<T> = Result<T, OcrError>;

/// Image in, best-effort text out.
pub trait OcrEngine {
    /// Short engine name for logs.
    fn name(&self) -> &str;

    /// Recognize text on an already preprocessed image.
    fn recognize(&self, image: &GrayImage) -> OcrResult<String>;
}

/// Text extracted without failing: empty text and a message on error.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrOutcome {
    pub text: String,
    pub error: Option<String>,
}

impl OcrOutcome {
    pub fn is_ok(&self) -> bool {
        self.error.is_none()
    }
}

/// Work out the image format from content, falling back to the file extension.
pub fn detect_format(bytes: &[u8], path_hint: Option<&Path>) -> OcrResult<ImageFormat> {
    let from_content = image::guess_format(bytes).ok();
    let from_extension = path_hint
        .and_then(|p| p.extension())
        .and_then(|e| e.to_str())
        .map(|e| e.to_lowercase())
        .filter(|e| SUPPORTED_EXTENSIONS.contains(&e.as_str()))
        .and_then(|e| ImageFormat::from_extension(&e));

    match from_content.or(from_extension) {
        Some(format @ (ImageFormat::Png | ImageFormat::Jpeg | ImageFormat::Bmp)) => Ok(format),
        Some(other) => Err(OcrError::UnsupportedFormat(format!("{:?}", other))),
        None => Err(OcrError::UnsupportedFormat("unrecognized image data".into())),
    }
}

/// Read an image file from disk.
pub fn read_image_file<P: AsRef<Path>>(path: P) -> OcrResult<Vec<u8>> {
    Ok(std::fs::read(path)?)
}

/// Decode, preprocess and recognize. The returned text is trimmed.
pub fn extract_text(
    engine: &dyn OcrEngine,
    preprocessor: &Preprocessor,
    image_bytes: &[u8],
    path_hint: Option<&Path>,
) -> OcrResult<String> {
    if image_bytes.is_empty() {
        return Err(OcrError::EmptyImage);
    }
    if image_bytes.len() > MAX_IMAGE_BYTES {
        return Err(OcrError::TooLarge(image_bytes.len()));
    }

    let format = detect_format(image_bytes, path_hint)?;
    let decoded = image::load_from_memory_with_format(image_bytes, format)?;
    let prepared = preprocessor.apply(&decoded);

    let text = engine.recognize(&prepared)?;
    let text = text.trim().to_string();
    info!(engine = engine.name(), chars = text.len(), "OCR complete");
    Ok(text)
}

/// Like [`extract_text`] but never fails.
pub fn extract_text_lenient(
    engine: &dyn OcrEngine,
    preprocessor: &Preprocessor,
    image_bytes: &[u8],
    path_hint: Option<&Path>,
) -> OcrOutcome {
    into_outcome(extract_text(engine, preprocessor, image_bytes, path_hint))
}

/// Read `path` and extract its text. Never fails, a read error included.
pub fn extract_file_lenient(
    engine: &dyn OcrEngine,
    preprocessor: &Preprocessor,
    path: &Path,
) -> OcrOutcome {
    let result = read_image_file(path)
        .and_then(|bytes| extract_text(engine, preprocessor, &bytes, Some(path)));
    into_outcome(result)
}

fn into_outcome(result: OcrResult<String>) -> OcrOutcome {
    match result {
        Ok(text) => OcrOutcome { text, error: None },
        Err(e) => {
            error!(error = %e, "Error processing image");
            OcrOutcome {
                text: String::new(),
                error: Some(format!("Error processing image: {e}")),
            }
        }
    }
}

/// Mock OCR engine for tests and dry runs.
pub struct MockOcrEngine {
    response: Result<String, String>,
}

impl MockOcrEngine {
    /// Engine that always returns `text`.
    pub fn new(text: &str) -> Self {
        Self {
            response: Ok(text.to_string()),
        }
    }

    /// Engine that always fails with `message`.
    pub fn failing(message: &str) -> Self {
        Self {
            response: Err(message.to_string()),
        }
    }
}

impl OcrEngine for MockOcrEngine {
    fn name(&self) -> &str {
        "mock"
    }

    fn recognize(&self, _image: &GrayImage) -> OcrResult<String> {
        self.response.clone().map_err(|stderr| OcrError::EngineFailed {
            status: Some(1),
            stderr,
        })
    }
}
