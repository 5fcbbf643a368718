//! Configuration for the text-enhancement collaborator.
//!
//! Values come from CLI flags with environment fallbacks (see `main.rs`);
//! this module only holds the defaults and validation.

use crate::error::{DocError, Result};
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_MODEL: &str = "gemini-3-flash-preview";
pub const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_STORE_DIR: &str = ".docgenie";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnhancerConfig {
    pub api_key: Option<String>,
    pub model: String,
    pub api_base: String,
    pub timeout_secs: u64,
}

impl Default for EnhancerConfig {
    fn default() -> Self {
        EnhancerConfig {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl EnhancerConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Normalize and check the settings: http(s) base URL without a trailing
    /// slash, non-empty model, non-zero timeout.
    pub fn validated(mut self) -> Result<Self> {
        let url = url::Url::parse(&self.api_base)
            .map_err(|e| DocError::Config(format!("invalid API base URL '{}': {}", self.api_base, e)))?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(DocError::Config(format!(
                "API base must use http or https, got: {}",
                url.scheme()
            )));
        }
        if url.scheme() == "http" {
            warn!(api_base = %self.api_base, "enhancer API base is not using TLS");
        }

        let mut base = url.to_string();
        while base.ends_with('/') {
            base.pop();
        }
        self.api_base = base;

        if self.model.trim().is_empty() {
            return Err(DocError::Config("model name must not be empty".to_string()));
        }
        if self.timeout_secs == 0 {
            return Err(DocError::Config("timeout must be at least one second".to_string()));
        }
        Ok(self)
    }
}
