use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "autotemp",
    about = "Explore how completion quality varies with sampling temperature"
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Option<KeyCommand>,
    /// Prompt to explore; repeat the flag for several prompts
    #[arg(long = "prompt", short = 'p')]
    pub prompts: Vec<String>,
    /// Comma-separated list of temperatures to test
    #[arg(
        long,
        short = 't',
        value_delimiter = ',',
        default_values_t = [0.1, 0.3, 0.5]
    )]
    pub temperatures: Vec<f64>,
    #[arg(long, short = 'm', default_value = "llama3-70b-8192")]
    pub model: String,
    #[arg(long)]
    pub api_key: Option<String>,
    #[arg(long)]
    pub base_url: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long)]
    pub timeout: Option<u64>,
    /// Maximum provider calls in flight at once
    #[arg(long)]
    pub max_concurrency: Option<usize>,
    /// Where to write the HTML report
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum KeyCommand {
    /// Store the Groq API key in the secret store
    SetKey { value: String },
    /// Print the stored Groq API key
    GetKey,
    /// Remove the Groq API key from the secret store
    DeleteKey,
}
