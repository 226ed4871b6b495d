//! ConvDebate voices utility
//!
//! Lists the synthesized voices available to the configured account.

use colored::Colorize;
use convdebate_core::{AgentConfig, list_voices};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run().await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AgentConfig::from_env()?;

    let voices = list_voices(&config).await?;

    println!("Found {} voices\n", voices.len());
    println!("{}", "Available voices:".bold());
    for voice in &voices {
        println!("- {} (ID: {})", voice.name.bright_cyan(), voice.voice_id);
        println!("  Category: {}", voice.category);
        println!(
            "  Gender: {}",
            voice.labels.gender.as_deref().unwrap_or("unknown")
        );
        println!(
            "  Accent: {}",
            voice.labels.accent.as_deref().unwrap_or("unknown")
        );
        if let Some(description) = voice.description.as_deref().filter(|d| !d.is_empty()) {
            println!("  Description: {}", description);
        }
        println!();
    }

    Ok(())
}
