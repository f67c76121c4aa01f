//! CLI module for the Ark relay
//!
//! Command-line interface definitions and handlers.
//!
//! # Commands
//!
//! - `serve` - Start the relay server
//! - `status` - Show upstream status through a running relay
//! - `generate` - One-shot generation, buffered or streamed
//! - `chat` - Multi-turn chat (single message or interactive)
//! - `config` - Configuration utilities (init)
//! - `completions` - Generate shell completions
//!
//! # Example
//!
//! ```bash
//! # Start the relay in front of a local Ollama
//! ark serve
//!
//! # Check which models are installed
//! ark status
//!
//! # Stream a generation
//! ark generate "Write a haiku about rust" --stream
//! ```

pub mod chat;
pub mod completions;
pub mod config;
pub mod generate;
pub mod output;
pub mod serve;
pub mod status;

pub use completions::handle_completions;
pub use config::handle_config_init;

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Relay address used by the client commands unless overridden.
pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:3000";

/// Ark - Ollama relay and client
#[derive(Parser, Debug)]
#[command(
    name = "ark",
    version,
    about = "Relay and client for a local Ollama server"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the relay server
    Serve(ServeArgs),
    /// Show upstream status
    Status(StatusArgs),
    /// Generate a response to a single prompt
    Generate(GenerateArgs),
    /// Chat with the default model
    Chat(ChatArgs),
    /// Configuration utilities
    #[command(subcommand)]
    Config(ConfigCommands),
    /// Generate shell completions
    Completions(CompletionsArgs),
}

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Path to configuration file
    #[arg(short, long, default_value = "ark.toml")]
    pub config: PathBuf,

    /// Override server port
    #[arg(short, long, env = "ARK_PORT")]
    pub port: Option<u16>,

    /// Override server host
    #[arg(short = 'H', long, env = "ARK_HOST")]
    pub host: Option<String>,

    /// Set log level (trace, debug, info, warn, error)
    #[arg(short, long, env = "ARK_LOG_LEVEL")]
    pub log_level: Option<String>,

    /// Override the upstream Ollama URL
    #[arg(long)]
    pub upstream: Option<String>,
}

/// Arguments shared by commands that talk to a running relay.
#[derive(Args, Debug, Clone)]
pub struct RelayArgs {
    /// Relay base URL
    #[arg(long = "relay", env = "ARK_RELAY_URL", default_value = DEFAULT_RELAY_URL)]
    pub url: String,
}

#[derive(Args, Debug)]
pub struct StatusArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Keep running and print changes, checking every SECS seconds
    #[arg(short, long, value_name = "SECS")]
    pub watch: Option<u64>,

    #[command(flatten)]
    pub relay: RelayArgs,
}

#[derive(Args, Debug)]
pub struct GenerateArgs {
    /// Prompt text
    pub prompt: String,

    /// System prompt (relay default when omitted)
    #[arg(short, long)]
    pub system: Option<String>,

    /// Sampling temperature (0.0 - 1.0)
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Maximum tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Model to use instead of the relay default
    #[arg(short, long)]
    pub model: Option<String>,

    /// Print tokens as they arrive
    #[arg(long)]
    pub stream: bool,

    #[command(flatten)]
    pub relay: RelayArgs,
}

#[derive(Args, Debug)]
pub struct ChatArgs {
    /// Message to send; reads turns from stdin when omitted
    pub message: Option<String>,

    /// System prompt placed at the start of the conversation
    #[arg(short, long)]
    pub system: Option<String>,

    /// Model to use instead of the relay default
    #[arg(short, long)]
    pub model: Option<String>,

    #[command(flatten)]
    pub relay: RelayArgs,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Initialize a new configuration file
    Init(ConfigInitArgs),
}

#[derive(Args, Debug)]
pub struct ConfigInitArgs {
    /// Output file path
    #[arg(short, long, default_value = "ark.toml")]
    pub output: PathBuf,

    /// Overwrite existing file
    #[arg(short, long)]
    pub force: bool,
}

#[derive(Args, Debug)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}
