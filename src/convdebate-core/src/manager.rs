//! Conversation managers.
//!
//! Two interchangeable implementations of the reply contract: a
//! session-capable realtime manager and a text-only REST manager. A factory
//! picks the realtime variant when it can be constructed and silently falls
//! back to REST otherwise, so callers never care which one is active.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::config::{API_KEY_HEADER, AgentConfig};
use crate::error::DebateError;
use crate::session::{DebateSession, SessionHandle};
use crate::simulation::{SimulationRequest, SimulationResponse};

/// The reply contract shared by all manager variants.
///
/// `get_response` never fails past this boundary: every transport, upstream
/// and parse failure collapses to an empty string, with the cause available
/// in the logs. Session operations default to no-ops for variants that do
/// not support sessions.
#[async_trait]
pub trait ConversationManager: Send + Sync {
    /// Send `prompt` as the opening line of a simulated conversation and
    /// return the agent's reply, or the empty string when no reply was
    /// produced for any reason.
    async fn get_response(&self, prompt: &str) -> String;

    /// Whether this variant supports the session lifecycle.
    fn supports_sessions(&self) -> bool {
        false
    }

    /// Start a session, or return the existing handle if one was already
    /// started. `None` for variants without session support.
    fn start_session(&self) -> Option<SessionHandle> {
        None
    }

    /// End the active session and return its conversation id. `None` when
    /// there is no active session or sessions are unsupported.
    fn end_session(&self) -> Option<String> {
        None
    }

    /// Suspend until the session ends, returning its conversation id.
    /// `None` when no session was ever started.
    async fn wait_for_end(&self) -> Option<String> {
        None
    }
}

/// Build the preferred manager for `config`.
///
/// When `prefer_realtime` is set, tries [`RealtimeConversationManager`]
/// first and downgrades to [`RestConversationManager`] if construction
/// fails (missing agent id, unusable client), logging the downgrade.
pub fn create_manager(
    config: &AgentConfig,
    prefer_realtime: bool,
) -> Result<Box<dyn ConversationManager>, DebateError> {
    if prefer_realtime {
        match RealtimeConversationManager::new(config.clone()) {
            Ok(manager) => return Ok(Box::new(manager)),
            Err(e) => {
                warn!(error = %e, "realtime manager unavailable, falling back to REST");
            }
        }
    }

    Ok(Box::new(RestConversationManager::new(config.clone())?))
}

/// Shared reply path: POST the simulation request and extract the reply.
async fn fetch_agent_reply(
    http: &reqwest::Client,
    config: &AgentConfig,
    prompt: &str,
) -> Result<String, DebateError> {
    let request = SimulationRequest::new(prompt);
    let url = config.simulation_url();

    debug!(url = %url, prompt_len = prompt.len(), "sending simulation request");

    let response = http
        .post(&url)
        .header(API_KEY_HEADER, &config.api_key)
        .json(&request)
        .send()
        .await?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        error!(status = status.as_u16(), body = %body, "simulation request rejected");
        return Err(DebateError::Upstream {
            status: status.as_u16(),
            body,
        });
    }

    let body = response.text().await?;
    let parsed: SimulationResponse = serde_json::from_str(&body)?;

    debug!(
        turns = parsed.simulated_conversation.len(),
        "simulation response received"
    );

    Ok(parsed.agent_reply())
}

fn build_http_client(config: &AgentConfig) -> Result<reqwest::Client, DebateError> {
    reqwest::Client::builder()
        .timeout(config.timeout)
        .build()
        .map_err(|e| DebateError::Config(format!("Failed to create HTTP client: {}", e)))
}

/// Text-only manager backed by the stateless simulation endpoint.
pub struct RestConversationManager {
    config: AgentConfig,
    http: reqwest::Client,
}

impl RestConversationManager {
    pub fn new(config: AgentConfig) -> Result<Self, DebateError> {
        let http = build_http_client(&config)?;
        Ok(Self { config, http })
    }
}

#[async_trait]
impl ConversationManager for RestConversationManager {
    async fn get_response(&self, prompt: &str) -> String {
        match fetch_agent_reply(&self.http, &self.config, prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "no reply produced");
                String::new()
            }
        }
    }
}

/// Session-capable manager.
///
/// Uses the same stateless reply path as the REST variant and layers the
/// session lifecycle on top. The conversation identifier of a session is
/// the agent id.
pub struct RealtimeConversationManager {
    config: AgentConfig,
    http: reqwest::Client,
    session: Mutex<Option<Arc<DebateSession>>>,
}

impl RealtimeConversationManager {
    /// Requires a non-empty credential and agent id; the factory treats a
    /// construction failure as a signal to downgrade to REST.
    pub fn new(config: AgentConfig) -> Result<Self, DebateError> {
        if config.api_key.is_empty() {
            return Err(DebateError::Config(
                "realtime manager requires an API key".to_string(),
            ));
        }
        if config.agent_id.is_empty() {
            return Err(DebateError::Config(
                "realtime manager requires an agent id".to_string(),
            ));
        }

        let http = build_http_client(&config)?;
        Ok(Self {
            config,
            http,
            session: Mutex::new(None),
        })
    }

    fn current_session(&self) -> Option<Arc<DebateSession>> {
        self.session
            .lock()
            .expect("session lock poisoned")
            .clone()
    }
}

#[async_trait]
impl ConversationManager for RealtimeConversationManager {
    async fn get_response(&self, prompt: &str) -> String {
        match fetch_agent_reply(&self.http, &self.config, prompt).await {
            Ok(reply) => reply,
            Err(e) => {
                warn!(error = %e, "no reply produced");
                String::new()
            }
        }
    }

    fn supports_sessions(&self) -> bool {
        true
    }

    fn start_session(&self) -> Option<SessionHandle> {
        let mut slot = self.session.lock().expect("session lock poisoned");

        if let Some(existing) = slot.as_ref() {
            // Not idle: hand back the existing session, no second countdown.
            return Some(existing.handle());
        }

        let session = DebateSession::start(
            self.config.agent_id.clone(),
            self.config.session_timeout,
        );
        let handle = session.handle();
        *slot = Some(session);
        Some(handle)
    }

    fn end_session(&self) -> Option<String> {
        self.current_session().and_then(|session| session.end())
    }

    async fn wait_for_end(&self) -> Option<String> {
        match self.current_session() {
            Some(session) => Some(session.wait_for_end().await),
            None => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    fn test_config() -> AgentConfig {
        AgentConfig::new("test-key", "agent_test")
            .with_session_timeout(Duration::from_secs(60))
    }

    #[tokio::test]
    async fn test_factory_prefers_realtime() {
        let manager = create_manager(&test_config(), true).unwrap();
        assert!(manager.supports_sessions());
    }

    #[tokio::test]
    async fn test_factory_downgrades_without_agent_id() {
        let config = AgentConfig::new("test-key", "");
        let manager = create_manager(&config, true).unwrap();
        assert!(!manager.supports_sessions());
    }

    #[tokio::test]
    async fn test_factory_rest_when_not_preferred() {
        let manager = create_manager(&test_config(), false).unwrap();
        assert!(!manager.supports_sessions());
    }

    #[tokio::test]
    async fn test_rest_session_operations_are_noops() {
        let manager = RestConversationManager::new(test_config()).unwrap();
        assert!(manager.start_session().is_none());
        assert!(manager.end_session().is_none());
        assert!(manager.wait_for_end().await.is_none());
    }

    #[tokio::test]
    async fn test_session_lifecycle_through_manager() {
        let manager = RealtimeConversationManager::new(test_config()).unwrap();

        assert!(manager.end_session().is_none());

        let first = manager.start_session().unwrap();
        assert!(first.is_active);
        assert_eq!(first.conversation_id, "agent_test");

        // Starting again returns the same session, not a new one.
        let second = manager.start_session().unwrap();
        assert_eq!(second.conversation_id, first.conversation_id);
        assert_eq!(second.started_at, first.started_at);

        assert_eq!(manager.end_session(), Some("agent_test".to_string()));
        assert!(manager.end_session().is_none());

        // After the session ended, start is still a no-op on the handle.
        let after_end = manager.start_session().unwrap();
        assert!(!after_end.is_active);

        assert_eq!(manager.wait_for_end().await, Some("agent_test".to_string()));
    }
}
