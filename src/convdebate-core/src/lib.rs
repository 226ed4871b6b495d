//! ConvDebate Core Library
//!
//! Provides the conversation client for a vendor conversational-agent
//! simulation endpoint: request construction, reply extraction, the
//! degrade-gracefully fallback policy, and the optional realtime session
//! lifecycle.

pub mod config;
pub mod error;
pub mod manager;
pub mod session;
pub mod simulation;
pub mod voices;

pub use config::{AgentConfig, Config, DebateSide, PromptsConfig, default_config};
pub use error::DebateError;
pub use manager::{
    ConversationManager, RealtimeConversationManager, RestConversationManager, create_manager,
};
pub use session::{DebateSession, SessionHandle, SessionPhase};
pub use simulation::{
    ConversationTurn, SimulationRequest, SimulationResponse, TurnRole, last_agent_message,
};
pub use voices::{Voice, VoiceLabels, list_voices};
