//! CLI OCR Command
//!
//! Extracts prescription text from an image. Shared by `chat` and `order`.

use std::io::Write;
use std::path::Path;

use anyhow::Result;
use tracing::debug;

use rx_assist_core::ocr::{self, OcrOutcome, Preprocessor, TesseractCli};

use crate::config::Config;

/// Tesseract engine with the configured binary, language and segmentation mode.
pub fn tesseract_engine(config: &Config) -> TesseractCli {
    TesseractCli::new(&config.tesseract_cmd)
        .with_language(&config.tesseract_lang)
        .with_psm(config.tesseract_psm)
}

/// Read, preprocess and recognize `image`. Never fails: errors land in `OcrOutcome::error`.
pub fn ocr_image(config: &Config, image: &Path, preprocessor: &Preprocessor) -> OcrOutcome {
    let engine = tesseract_engine(config);
    debug!(
        image = %image.display(),
        lang = engine.language(),
        psm = engine.psm(),
        "Extracting prescription text"
    );
    ocr::extract_file_lenient(&engine, preprocessor, image)
}

/// Print the outcome: text to `out`, any error to stderr.
pub fn print_outcome<W: Write>(outcome: &OcrOutcome, out: &mut W) -> Result<()> {
    if let Some(error) = &outcome.error {
        eprintln!("{error}");
    }
    writeln!(out, "{}", outcome.text)?;
    Ok(())
}

pub fn run(config: &Config, image: &Path, preprocessor: &Preprocessor) -> Result<()> {
    let outcome = ocr_image(config, image, preprocessor);
    print_outcome(&outcome, &mut std::io::stdout().lock())
}
