//! Run configuration for kabureport
//!
//! A `ReportConfig` is built exactly once at startup and passed to every
//! component that needs it. Precedence: CLI flags > environment > optional
//! `kabureport.toml` in the working directory > built-in defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;

use crate::error::{ReportError, Result};

/// Default summarization endpoint (Gemini 1.5 Flash generateContent)
pub const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-1.5-flash:generateContent";

/// Default timeout for a single summarization call
pub const DEFAULT_TIMEOUT_SECONDS: u64 = 30;

/// Default topic filter suffix on thread titles
pub const DEFAULT_FILTER_SUFFIX: &str = "_米国株";

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "kabureport.toml";

/// Process-wide configuration, constructed once at startup
#[derive(Debug, Clone)]
pub struct ReportConfig {
    /// API key for the summarization endpoint (required only when a call is made)
    pub api_key: Option<String>,
    /// Summarization endpoint URL (the key is appended as a query parameter)
    pub endpoint: String,
    /// Path of the conversation export to read
    pub input: PathBuf,
    /// Directory holding one persisted HTML document per topic
    pub output_dir: PathBuf,
    /// Path of the regenerated index page
    pub index_path: PathBuf,
    /// Only threads whose title ends with this suffix are in scope
    pub filter_suffix: String,
    /// Timeout for a single summarization call, in seconds
    pub timeout_seconds: u64,
    /// Generation temperature passed to the endpoint
    pub temperature: f32,
    /// Maximum output tokens requested from the endpoint
    pub max_output_tokens: u32,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: DEFAULT_ENDPOINT.to_string(),
            input: PathBuf::from("conversations.json"),
            output_dir: PathBuf::from("output"),
            index_path: PathBuf::from("index.html"),
            filter_suffix: DEFAULT_FILTER_SUFFIX.to_string(),
            timeout_seconds: DEFAULT_TIMEOUT_SECONDS,
            temperature: 0.4,
            max_output_tokens: 1024,
        }
    }
}

/// Optional file-level configuration (`kabureport.toml`)
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    api_key: Option<String>,
    endpoint: Option<String>,
    input: Option<PathBuf>,
    output_dir: Option<PathBuf>,
    index: Option<PathBuf>,
    filter_suffix: Option<String>,
    timeout_seconds: Option<u64>,
    temperature: Option<f32>,
    max_output_tokens: Option<u32>,
}

impl ReportConfig {
    /// Load configuration from `kabureport.toml` under `root` (if present),
    /// then apply environment overrides.
    pub fn load(root: &Path) -> Result<Self> {
        let mut config = Self::default();

        let file_path = root.join(CONFIG_FILE_NAME);
        if file_path.is_file() {
            let content = fs::read_to_string(&file_path)?;
            let file_config: FileConfig = toml::from_str(&content)?;
            config.apply_file(file_config);
        }

        config.apply_env();
        Ok(config)
    }

    fn apply_file(&mut self, file: FileConfig) {
        if let Some(api_key) = file.api_key {
            self.api_key = Some(api_key);
        }
        if let Some(endpoint) = file.endpoint {
            self.endpoint = endpoint;
        }
        if let Some(input) = file.input {
            self.input = input;
        }
        if let Some(output_dir) = file.output_dir {
            self.output_dir = output_dir;
        }
        if let Some(index) = file.index {
            self.index_path = index;
        }
        if let Some(suffix) = file.filter_suffix {
            self.filter_suffix = suffix;
        }
        if let Some(timeout) = file.timeout_seconds {
            self.timeout_seconds = timeout.clamp(5, 300);
        }
        if let Some(temperature) = file.temperature {
            self.temperature = temperature;
        }
        if let Some(max_output_tokens) = file.max_output_tokens {
            self.max_output_tokens = max_output_tokens;
        }
    }

    fn apply_env(&mut self) {
        if let Ok(key) = std::env::var("GEMINI_API_KEY") {
            if !key.is_empty() {
                self.api_key = Some(key);
            }
        }

        if let Ok(endpoint) = std::env::var("KABUREPORT_ENDPOINT") {
            if !endpoint.is_empty() {
                self.endpoint = endpoint;
            }
        }

        if let Ok(timeout) = std::env::var("KABUREPORT_TIMEOUT") {
            if let Ok(seconds) = timeout.parse::<u64>() {
                self.timeout_seconds = seconds.clamp(5, 300);
            }
        }
    }

    /// The API key, or a usage error when none is configured
    pub fn require_api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .ok_or(ReportError::MissingApiKey)
    }
}
