use std::path::PathBuf;

use clap::Parser;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Your query to the model
    #[arg(required = true)]
    pub query: Vec<String>,

    /// Model to use; `claude-1`, `claude-2` and `claude-instant` models use the legacy protocol
    #[arg(short, long)]
    pub model: Option<String>,

    /// Maximum number of tokens to generate
    #[arg(long)]
    pub max_tokens: Option<u32>,

    /// Sampling temperature
    #[arg(short, long)]
    pub temperature: Option<f32>,

    /// Only sample from the top K options for each token
    #[arg(long)]
    pub top_k: Option<i32>,

    /// Nucleus sampling threshold
    #[arg(long)]
    pub top_p: Option<f32>,

    /// System prompt
    #[arg(short, long)]
    pub system: Option<String>,

    /// Stop sequence, may be given more than once
    #[arg(long = "stop")]
    pub stop_sequences: Vec<String>,

    /// Enable reasoning mode with this many thinking tokens
    #[arg(long)]
    pub thinking_budget: Option<u32>,

    /// Print the reasoning trace as well as the answer
    #[arg(long)]
    pub show_thinking: bool,

    /// Wait for the complete response instead of streaming it
    #[arg(long)]
    pub no_stream: bool,

    /// Print the reply as JSON once it is complete
    #[arg(long)]
    pub json: bool,

    /// API key; overrides the environment
    #[arg(long)]
    pub api_key: Option<String>,

    /// Path to a config file
    #[arg(short, long)]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(short, long, default_value = "false")]
    pub debug: bool,
}
