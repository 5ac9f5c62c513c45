use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::io::BufReader;
use tracing_subscriber::EnvFilter;

use ccbridge::config::Config;
use ccbridge::plugin::Plugin;

// ============================================================================
// CLI Types
// ============================================================================

/// Chat command bridge for the Claude Code task API
#[derive(Parser, Debug)]
#[command(version = ccbridge::build_info::VERSION, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "ccbridge.yaml", global = true)]
    config: PathBuf,

    /// Task API base URL (overrides config file)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Callback channel for task results (overrides config file)
    #[arg(long, global = true)]
    callback_channel: Option<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run as a host plugin, speaking JSON Lines over stdin/stdout
    Serve,

    /// Run a single slash command and print the reply
    Send {
        /// Command text, e.g. "/cc-new summarize the logs"
        text: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    // stdout carries the plugin protocol; logs go to stderr
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("ccbridge=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let mut config = Config::load(&cli.config)
        .await
        .with_context(|| format!("loading {}", cli.config.display()))?;
    if let Some(url) = cli.api_url {
        config.api_url = url;
    }
    if let Some(channel) = cli.callback_channel {
        config.callback_channel = channel;
    }

    let plugin = Plugin::from_config(&config)?;

    match cli.command {
        Commands::Serve => {
            tracing::info!(
                version = %ccbridge::build_info::version_string(),
                api_url = %config.api_url,
                "starting plugin"
            );
            let stdin = BufReader::new(tokio::io::stdin());
            plugin.run(stdin, tokio::io::stdout()).await?;
        }
        Commands::Send { text } => {
            let output = plugin.send(&text).await?;
            println!("{output}");
        }
    }

    Ok(())
}
