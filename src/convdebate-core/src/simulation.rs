//! Wire format for the conversation-simulation endpoint.
//!
//! Request/response bodies and reply extraction from the returned turn
//! sequence.

use serde::{Deserialize, Serialize};

/// Language sent with every simulation request.
pub const SIMULATION_LANGUAGE: &str = "en";

/// Request body for a simulate-conversation call.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationRequest {
    simulation_specification: SimulationSpecification,
}

#[derive(Debug, Clone, Serialize)]
struct SimulationSpecification {
    simulated_user_config: SimulatedUserConfig,
}

#[derive(Debug, Clone, Serialize)]
struct SimulatedUserConfig {
    language: String,
    first_message: String,
}

impl SimulationRequest {
    /// Build a request opening the simulated conversation with `first_message`.
    pub fn new(first_message: impl Into<String>) -> Self {
        Self {
            simulation_specification: SimulationSpecification {
                simulated_user_config: SimulatedUserConfig {
                    language: SIMULATION_LANGUAGE.to_string(),
                    first_message: first_message.into(),
                },
            },
        }
    }

    /// The opening line carried by this request.
    pub fn first_message(&self) -> &str {
        &self.simulation_specification.simulated_user_config.first_message
    }
}

/// Response body of a simulate-conversation call.
#[derive(Debug, Clone, Deserialize)]
pub struct SimulationResponse {
    /// Ordered turn sequence; absent key is treated as no turns.
    #[serde(default)]
    pub simulated_conversation: Vec<ConversationTurn>,
}

impl SimulationResponse {
    /// The last agent-authored message, or empty when there is none.
    pub fn agent_reply(&self) -> String {
        last_agent_message(&self.simulated_conversation)
    }
}

/// A single turn in the simulated exchange.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: TurnRole,
    /// Turns without a message field count as empty messages.
    #[serde(default)]
    pub message: String,
}

/// Author of a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Agent,
    /// Roles this client does not know about; never a deserialization error.
    #[serde(other)]
    Other,
}

/// Extract the message of the last agent-authored turn in sequence order.
///
/// Returns the empty string when the sequence is empty or contains no agent
/// turns; callers never see an absent value.
pub fn last_agent_message(turns: &[ConversationTurn]) -> String {
    turns
        .iter()
        .rev()
        .find(|turn| turn.role == TurnRole::Agent)
        .map(|turn| turn.message.clone())
        .unwrap_or_default()
}
