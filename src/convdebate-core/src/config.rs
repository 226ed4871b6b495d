//! Configuration for the agent client and prompt templates.

use serde::Deserialize;
use std::env;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use crate::error::DebateError;

/// Header carrying the per-deployment API credential.
pub const API_KEY_HEADER: &str = "xi-api-key";

/// Default request timeout for a single simulation call.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default lifetime for a realtime session before it is force-ended.
pub const DEFAULT_SESSION_TIMEOUT_SECS: u64 = 300;

const DEFAULT_API_BASE: &str = "https://api.elevenlabs.io";

/// Connection settings for the conversational-agent API.
///
/// Built explicitly and passed into managers; nothing here is read from
/// process-wide state after construction.
#[derive(Debug, Clone)]
pub struct AgentConfig {
    /// API credential sent in the `xi-api-key` header.
    pub api_key: String,
    /// Identifier of the conversational agent to talk to.
    pub agent_id: String,
    /// Base URL of the vendor API.
    pub api_base: String,
    /// Timeout applied to each HTTP request.
    pub timeout: Duration,
    /// Lifetime of a realtime session before the countdown ends it.
    pub session_timeout: Duration,
}

impl AgentConfig {
    pub fn new(api_key: impl Into<String>, agent_id: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            agent_id: agent_id.into(),
            api_base: DEFAULT_API_BASE.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
            session_timeout: Duration::from_secs(DEFAULT_SESSION_TIMEOUT_SECS),
        }
    }

    /// Load configuration from the environment.
    ///
    /// `ELEVENLABS_API_KEY` is required. `ELEVENLABS_AGENT_ID` may be absent;
    /// managers that need an agent id reject an empty one at construction.
    pub fn from_env() -> Result<Self, DebateError> {
        let api_key = env::var("ELEVENLABS_API_KEY")
            .ok()
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                DebateError::Config("ELEVENLABS_API_KEY is not set".to_string())
            })?;

        let agent_id = env::var("ELEVENLABS_AGENT_ID").unwrap_or_default();

        let mut config = Self::new(api_key, agent_id);

        if let Ok(base) = env::var("ELEVENLABS_API_BASE") {
            if !base.is_empty() {
                config.api_base = base;
            }
        }
        if let Some(secs) = env_secs("ELEVENLABS_TIMEOUT_SECS")? {
            config.timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = env_secs("ELEVENLABS_SESSION_TIMEOUT_SECS")? {
            config.session_timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// URL of the conversation-simulation endpoint for the configured agent.
    pub fn simulation_url(&self) -> String {
        format!(
            "{}/v1/convai/agents/{}/simulate-conversation",
            self.api_base.trim_end_matches('/'),
            self.agent_id
        )
    }

    /// URL of the voices-listing endpoint.
    pub fn voices_url(&self) -> String {
        format!("{}/v1/voices", self.api_base.trim_end_matches('/'))
    }
}

fn env_secs(name: &str) -> Result<Option<u64>, DebateError> {
    match env::var(name) {
        Ok(raw) if !raw.is_empty() => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|e| DebateError::Config(format!("Invalid {}: {}", name, e))),
        _ => Ok(None),
    }
}

/// Which side of the motion the agent argues.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebateSide {
    For,
    Against,
}

impl DebateSide {
    pub fn display_name(&self) -> &str {
        match self {
            DebateSide::For => "for",
            DebateSide::Against => "against",
        }
    }
}

impl FromStr for DebateSide {
    type Err = std::convert::Infallible;

    /// Permissive: anything other than "for" argues against the motion.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.eq_ignore_ascii_case("for") {
            Ok(DebateSide::For)
        } else {
            Ok(DebateSide::Against)
        }
    }
}

/// Root configuration structure for prompt templates.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub prompts: PromptsConfig,
}

/// Prompt template configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct PromptsConfig {
    /// Template with `{topic}`, `{side}` and `{user_input}` placeholders.
    pub debate_template: String,
    /// Topic used when the caller does not supply one.
    #[serde(default = "default_topic")]
    pub default_topic: String,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, DebateError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| DebateError::Config(format!("Failed to read config: {}", e)))?;

        Self::from_str(&content)
    }

    /// Load configuration from string content.
    pub fn from_str(content: &str) -> Result<Self, DebateError> {
        toml::from_str(content)
            .map_err(|e| DebateError::Config(format!("Failed to parse config: {}", e)))
    }

    /// Compose the opening debate prompt, with placeholders replaced.
    pub fn get_prompt(&self, topic: &str, side: DebateSide, user_input: &str) -> String {
        let topic = if topic.is_empty() {
            &self.prompts.default_topic
        } else {
            topic
        };

        self.prompts
            .debate_template
            .replace("{topic}", topic)
            .replace("{side}", side.display_name())
            .replace("{user_input}", user_input)
    }
}

/// Default configuration embedded in the binary.
pub fn default_config() -> Config {
    Config {
        prompts: PromptsConfig {
            debate_template: DEFAULT_DEBATE_TEMPLATE.to_string(),
            default_topic: default_topic(),
        },
    }
}

fn default_topic() -> String {
    "AI should be allowed to override human decisions in healthcare".to_string()
}

const DEFAULT_DEBATE_TEMPLATE: &str = "You are an AI assistant participating in a debate about {topic}. \
You are on the {side} side of the motion. Respond to the user's statements: {user_input} \
with well-reasoned arguments that support your position.";
