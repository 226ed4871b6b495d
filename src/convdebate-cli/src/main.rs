//! ConvDebate CLI - debate reply generation
//!
//! Sends the user's debate argument to the conversational agent and prints
//! the agent's reply on stdout. All diagnostics go to stderr so the reply is
//! the only stdout output.

use clap::Parser;
use colored::Colorize;
use convdebate_core::{
    AgentConfig, Config, ConversationManager, DebateSide, create_manager, default_config,
};
use serde::Deserialize;
use std::path::PathBuf;
use tracing::debug;

#[derive(Parser)]
#[command(
    name = "convdebate",
    version,
    about = "Generate a debate reply from the conversational agent",
    long_about = "Sends a debate argument to the configured conversational agent and prints the reply."
)]
struct Cli {
    /// The user's debate argument
    #[arg(value_name = "USER_INPUT")]
    user_input: String,

    /// Prior exchanges as a JSON array of {role, text} entries.
    /// Accepted for compatibility; the simulation endpoint is stateless.
    #[arg(value_name = "HISTORY_JSON", default_value = "[]")]
    history: String,

    /// Which side of the motion the agent argues
    #[arg(value_name = "DEBATE_SIDE", default_value = "against")]
    debate_side: String,

    /// Current debate round
    #[arg(value_name = "DEBATE_ROUND", default_value = "1")]
    debate_round: u32,

    /// Debate topic (defaults to the configured topic)
    #[arg(short, long, value_name = "TOPIC")]
    topic: Option<String>,

    /// Path to a TOML prompts config file
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
}

/// A prior exchange supplied by the caller.
#[derive(Debug, Deserialize)]
struct HistoryEntry {
    #[allow(dead_code)]
    role: String,
    #[serde(default)]
    #[allow(dead_code)]
    text: String,
}

fn parse_history(raw: &str) -> Result<Vec<HistoryEntry>, serde_json::Error> {
    serde_json::from_str(raw)
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    // Argument errors exit 1, not clap's default code.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = run(cli).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    let history = parse_history(&cli.history)
        .map_err(|e| format!("Error parsing history JSON: {}", e))?;
    debug!(entries = history.len(), round = cli.debate_round, "parsed history");

    let prompts = match &cli.config {
        Some(path) => Config::load(path)?,
        None => default_config(),
    };

    let agent_config = AgentConfig::from_env()?;
    if agent_config.agent_id.is_empty() {
        return Err("ELEVENLABS_AGENT_ID is not set".into());
    }

    let side: DebateSide = cli.debate_side.parse()?;
    let prompt = prompts.get_prompt(cli.topic.as_deref().unwrap_or(""), side, &cli.user_input);

    let manager = create_manager(&agent_config, true)?;
    let reply = manager.get_response(&prompt).await;

    if reply.is_empty() {
        return Err(
            "I apologize, but I'm having trouble generating a response right now. Please try again."
                .into(),
        );
    }

    println!("{}", reply);
    Ok(())
}
