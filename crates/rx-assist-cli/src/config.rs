use std::path::PathBuf;

use rx_assist_core::ocr::DEFAULT_PSM;
use rx_assist_core::DEFAULT_THRESHOLD;
use rx_assist_llm::{DEFAULT_BASE_URL, DEFAULT_MODEL, DEFAULT_TIMEOUT_SECS};

/// Rx-Assist runtime configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Gemini API key
    pub api_key: Option<String>,
    /// Gemini model name
    pub llm_model: String,
    /// Gemini API base URL
    pub llm_base_url: String,
    /// HTTP timeout for LLM calls
    pub llm_timeout_secs: u64,
    /// Tesseract binary (name on PATH or full path)
    pub tesseract_cmd: String,
    /// Tesseract language(s), e.g. "eng" or "eng+hin"
    pub tesseract_lang: String,
    /// Tesseract page segmentation mode
    pub tesseract_psm: u8,
    /// Inventory CSV path
    pub inventory_path: PathBuf,
    /// Minimum fuzzy match score, 0 - 100
    pub match_threshold: u8,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: None,
            llm_model: DEFAULT_MODEL.to_string(),
            llm_base_url: DEFAULT_BASE_URL.to_string(),
            llm_timeout_secs: DEFAULT_TIMEOUT_SECS,
            tesseract_cmd: "tesseract".to_string(),
            tesseract_lang: "eng".to_string(),
            tesseract_psm: DEFAULT_PSM,
            inventory_path: PathBuf::from("pharmacy_db.csv"),
            match_threshold: DEFAULT_THRESHOLD,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration from any key lookup. Unparsable numbers fall back to defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            api_key: lookup("GOOGLE_API_KEY").filter(|k| !k.trim().is_empty()),
            llm_model: lookup("RX_ASSIST_LLM_MODEL").unwrap_or(defaults.llm_model),
            llm_base_url: lookup("RX_ASSIST_LLM_BASE_URL").unwrap_or(defaults.llm_base_url),
            llm_timeout_secs: lookup("RX_ASSIST_LLM_TIMEOUT_SECS")
                .and_then(|t| t.parse().ok())
                .unwrap_or(defaults.llm_timeout_secs),
            tesseract_cmd: lookup("TESSERACT_CMD").unwrap_or(defaults.tesseract_cmd),
            tesseract_lang: lookup("TESSERACT_LANG")
                .filter(|l| !l.trim().is_empty())
                .unwrap_or(defaults.tesseract_lang),
            tesseract_psm: lookup("TESSERACT_PSM")
                .and_then(|p| p.parse::<u8>().ok())
                .filter(|p| *p <= 13)
                .unwrap_or(defaults.tesseract_psm),
            inventory_path: lookup("RX_ASSIST_INVENTORY")
                .map(PathBuf::from)
                .unwrap_or(defaults.inventory_path),
            match_threshold: lookup("RX_ASSIST_MATCH_THRESHOLD")
                .and_then(|t| t.parse::<u8>().ok())
                .filter(|t| *t <= 100)
                .unwrap_or(defaults.match_threshold),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}
