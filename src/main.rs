#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::str::FromStr;
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;
use vigilis::{
    GuardrailMode, Guardrails, GuardrailsConfig, JsonlAuditSink, OfflineClient, RoutingSignal,
    manifest,
};

/// Vigilis - guardrails decision core for a screen-aware assistant.
#[derive(Parser, Debug)]
#[command(name = "vigilis")]
#[command(version = "0.1.0")]
#[command(about = "Guardrails decision core for a screen-aware assistant.", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the guardrail check against a single request text
    Check {
        /// The request text to evaluate
        text: String,

        /// Guardrail mode: off, auto, or always (default: config value)
        #[arg(long)]
        mode: Option<String>,
    },

    /// Print the tool manifest in its canonical serialized form
    Manifest {
        /// Print the SHA-256 fingerprint instead of the full manifest
        #[arg(long)]
        fingerprint: bool,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("setting default subscriber failed");

    let cli = Cli::parse();
    match cli.command {
        Commands::Check { text, mode } => check(&text, mode.as_deref()).await,
        Commands::Manifest { fingerprint } => {
            if fingerprint {
                println!("{}", manifest::builtin().fingerprint());
            } else {
                println!("{}", String::from_utf8_lossy(manifest::builtin().serialize()));
            }
            Ok(())
        }
    }
}

/// Evaluate one request the way a host would: classifier-free, so the signal
/// is plain chat, and with the offline client, so only the deterministic
/// fast path can decide.
async fn check(text: &str, mode: Option<&str>) -> Result<()> {
    let config = GuardrailsConfig::load_or_init()?;
    let mode = match mode {
        Some(raw) => GuardrailMode::from_str(raw)?,
        None => config.default_mode,
    };

    let audit = Arc::new(JsonlAuditSink::new(config.audit_path()));
    let guardrails = Guardrails::new(Arc::new(OfflineClient::new()), audit, &config);

    let signal = RoutingSignal::chat_only(1.0);
    match guardrails.try_run(&signal, text, mode).await {
        Some(decision) => {
            println!("{}", decision.answer_text);
            println!("(llm round trips: {})", decision.llm_round_trips);
        }
        None => println!("no guardrail decision; request proceeds to the agent path"),
    }
    Ok(())
}
