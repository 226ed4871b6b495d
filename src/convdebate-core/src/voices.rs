//! Voice enumeration from the vendor account.

use serde::Deserialize;
use tracing::debug;

use crate::config::{API_KEY_HEADER, AgentConfig};
use crate::error::DebateError;

/// A synthesized voice available to the account.
#[derive(Debug, Clone, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub labels: VoiceLabels,
}

/// Descriptive labels attached to a voice.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct VoiceLabels {
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub accent: Option<String>,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    #[serde(default)]
    voices: Vec<Voice>,
}

/// Fetch all voices available to the configured account.
pub async fn list_voices(config: &AgentConfig) -> Result<Vec<Voice>, DebateError> {
    let http = reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| DebateError::Config(format!("Failed to create HTTP client: {}", e)))?;

    let response = http
        .get(config.voices_url())
        .header(API_KEY_HEADER, &config.api_key)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(DebateError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    let parsed: VoicesResponse = serde_json::from_str(&body)?;

    debug!(count = parsed.voices.len(), "fetched voices");
    Ok(parsed.voices)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_voice_parsing_with_labels() {
        let body = r#"{
            "voices": [
                {
                    "voice_id": "21m00Tcm4TlvDq8ikWAM",
                    "name": "Rachel",
                    "category": "premade",
                    "description": "Calm narration voice",
                    "labels": {"gender": "female", "accent": "american", "age": "young"}
                },
                {
                    "voice_id": "abc123",
                    "name": "Custom"
                }
            ]
        }"#;
        let parsed: VoicesResponse = serde_json::from_str(body).unwrap();

        assert_eq!(parsed.voices.len(), 2);
        let rachel = &parsed.voices[0];
        assert_eq!(rachel.name, "Rachel");
        assert_eq!(rachel.labels.gender.as_deref(), Some("female"));
        assert_eq!(rachel.labels.accent.as_deref(), Some("american"));

        let custom = &parsed.voices[1];
        assert_eq!(custom.category, "");
        assert!(custom.labels.gender.is_none());
        assert!(custom.description.is_none());
    }

    #[test]
    fn test_voices_response_missing_key() {
        let parsed: VoicesResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.voices.is_empty());
    }
}
