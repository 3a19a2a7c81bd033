use anyhow::{Context, Result};
use clap::Parser;
use clipboardai::cli::{Cli, Command};
use clipboardai::config::AppConfig;
use clipboardai::watch::{self, WatchOptions};
use clipboardai_detect::ContextDetector;
use std::io::Read;
use std::time::Duration;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    clipboardai::init_tracing();

    match cli.command {
        Command::Detect { text } => {
            let content = match text {
                Some(t) => t,
                None => {
                    let mut buf = String::new();
                    std::io::stdin()
                        .read_to_string(&mut buf)
                        .context("reading stdin")?;
                    buf
                }
            };
            let result = ContextDetector::new()?.detect(&content);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Watch {
            process,
            poll_ms,
            history,
        } => {
            let config = AppConfig::from_args(&cli.global)?;
            let options = WatchOptions {
                process,
                poll_interval: Duration::from_millis(poll_ms),
                history,
            };
            watch::run(config, options).await?;
        }
        Command::Serve { port, host } => {
            let config = AppConfig::from_args(&cli.global)?;
            tracing::info!(provider = %config.ai.provider, model = %config.ai.model, "starting ClipboardAI");
            clipboardai::server::serve(config, &host, port).await?;
        }
    }
    Ok(())
}
