use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "clipboardai")]
#[command(version, about = "Clipboard-triggered AI assistant", long_about = None)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Watch the clipboard and print each classified change
    Watch {
        /// Run the top suggested action on every change and store the result
        #[arg(long)]
        process: bool,

        /// Poll interval in milliseconds
        #[arg(long, env = "CLIPBOARDAI_POLL_MS", default_value_t = 500)]
        poll_ms: u64,

        /// Number of recent events kept in memory
        #[arg(long, env = "CLIPBOARDAI_HISTORY", default_value_t = 50)]
        history: usize,
    },

    /// Classify TEXT (or stdin) and print the result as JSON
    Detect {
        text: Option<String>,
    },

    /// Serve the HTTP API
    Serve {
        #[arg(long, env = "PORT", default_value_t = 5000)]
        port: u16,

        #[arg(long, default_value = "127.0.0.1")]
        host: String,
    },
}

#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// `openai` or `groq`
    #[arg(long, env = "AI_PROVIDER", default_value = "openai", global = true)]
    pub provider: String,

    #[arg(long, env = "AI_MODEL", default_value = "gpt-4o-mini", global = true)]
    pub model: String,

    #[arg(long, env = "AI_TEMPERATURE", default_value_t = 0.3, global = true)]
    pub temperature: f32,

    #[arg(long, env = "AI_MAX_TOKENS", default_value_t = 2000, global = true)]
    pub max_tokens: u32,

    #[arg(long, env = "AI_TIMEOUT_SECS", default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// API key; defaults to OPENAI_API_KEY or GROQ_API_KEY for the provider
    #[arg(long, global = true)]
    pub api_key: Option<String>,

    /// SQLite database path
    #[arg(long, env = "CLIPBOARDAI_DB", global = true)]
    pub db: Option<PathBuf>,
}
