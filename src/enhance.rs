//! Description rewriting through a generative-text service.
//!
//! Enhancement is best effort: [`enhance_or_original`] never fails, it logs and
//! hands back the input when the service errors or answers with nothing.

use crate::config::EnhancerConfig;
use crate::error::{DocError, Result};
use serde::Deserialize;
use tracing::{debug, warn};

pub trait TextEnhancer {
    fn enhance(&self, text: &str) -> Result<String>;
}

/// Instruction sent ahead of the text to rewrite.
pub fn prompt(text: &str) -> String {
    format!(
        "Improve the following API documentation description. Keep the meaning but make it \
         more professional and technical. Keep it concise.\n\nOriginal: {}",
        text
    )
}

/// Enhance `text`, falling back to it unchanged on any failure or empty answer.
pub fn enhance_or_original(enhancer: &dyn TextEnhancer, text: &str) -> String {
    match enhancer.enhance(text) {
        Ok(enhanced) if !enhanced.trim().is_empty() => enhanced.trim().to_string(),
        Ok(_) => {
            warn!("enhancement returned no text, keeping original");
            text.to_string()
        }
        Err(e) => {
            warn!(error = %e, "enhancement failed, keeping original");
            text.to_string()
        }
    }
}

/// Google Generative Language `generateContent` client.
pub struct GeminiEnhancer {
    agent: ureq::Agent,
    api_key: String,
    endpoint: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Deserialize)]
struct Content {
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Deserialize)]
struct Part {
    text: Option<String>,
}

impl GenerateResponse {
    fn text(self) -> String {
        self.candidates
            .into_iter()
            .next()
            .and_then(|c| c.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|p| p.text)
                    .collect::<Vec<_>>()
                    .join("")
            })
            .unwrap_or_default()
    }
}

impl GeminiEnhancer {
    pub fn new(config: EnhancerConfig) -> Result<Self> {
        let config = config.validated()?;
        let api_key = config
            .api_key
            .clone()
            .filter(|k| !k.trim().is_empty())
            .ok_or_else(|| DocError::Config("an API key is required for enhancement".to_string()))?;
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Ok(GeminiEnhancer {
            agent,
            api_key,
            endpoint: format!("{}/models/{}:generateContent", config.api_base, config.model),
        })
    }
}

impl TextEnhancer for GeminiEnhancer {
    fn enhance(&self, text: &str) -> Result<String> {
        let body = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt(text) }] }]
        });
        debug!(endpoint = %self.endpoint, "requesting enhancement");

        let response = self
            .agent
            .post(&self.endpoint)
            .set("x-goog-api-key", &self.api_key)
            .send_json(body)
            .map_err(|e| DocError::Enhance(e.to_string()))?;
        let parsed: GenerateResponse = response
            .into_json()
            .map_err(|e| DocError::Enhance(format!("unreadable response: {}", e)))?;

        Ok(parsed.text().trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Fixed(&'static str);

    impl TextEnhancer for Fixed {
        fn enhance(&self, _text: &str) -> Result<String> {
            Ok(self.0.to_string())
        }
    }

    struct Failing;

    impl TextEnhancer for Failing {
        fn enhance(&self, _text: &str) -> Result<String> {
            Err(DocError::Enhance("service unavailable".into()))
        }
    }

    #[test]
    fn uses_enhanced_text() {
        assert_eq!(enhance_or_original(&Fixed("  Polished.\n"), "rough"), "Polished.");
    }

    #[test]
    fn falls_back_on_failure_or_empty() {
        assert_eq!(enhance_or_original(&Failing, "rough"), "rough");
        assert_eq!(enhance_or_original(&Fixed("   "), "rough"), "rough");
    }

    #[test]
    fn prompt_carries_original() {
        let p = prompt("Sends a message");
        assert!(p.starts_with("Improve the following API documentation description."));
        assert!(p.ends_with("\n\nOriginal: Sends a message"));
    }

    #[test]
    fn response_text_joins_first_candidate_parts() {
        let parsed: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello "},{"text":"world"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(parsed.text(), "Hello world");

        let empty: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert_eq!(empty.text(), "");
    }

    #[test]
    fn requires_api_key() {
        let result = GeminiEnhancer::new(EnhancerConfig::default());
        assert!(matches!(result, Err(DocError::Config(_))));

        let ok = GeminiEnhancer::new(EnhancerConfig {
            api_key: Some("k".into()),
            ..Default::default()
        })
        .unwrap();
        assert!(ok.endpoint.ends_with("/v1beta/models/gemini-3-flash-preview:generateContent"));
    }
}
