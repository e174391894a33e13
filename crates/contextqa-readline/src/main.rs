use anyhow::Result;
use clap::{Parser, Subcommand};
use contextqa_infrastructure::ContextQaPaths;
use std::path::PathBuf;

mod commands;
mod helper;
mod logging;
mod theme;
mod view;

use commands::{AppContext, Overrides};

#[derive(Parser)]
#[command(name = "contextqa")]
#[command(about = "ContextQA - ask questions about your documents", long_about = None)]
struct Cli {
    /// Backend base URL, e.g. http://localhost:8000
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Color theme: crimson or ember
    #[arg(long, global = true)]
    theme: Option<String>,

    /// Read configuration from this file instead of the default location
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Keep the active session in this file instead of the default location
    #[arg(long, global = true)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Chat about the uploaded documents (default)
    Chat,
    /// Upload documents and start a new session
    Upload {
        #[arg(required = true)]
        files: Vec<PathBuf>,
    },
    /// Forget the active session
    Reset,
    /// Check that the backend is reachable
    Health,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let paths = ContextQaPaths::default();
    let _log_guard = logging::init_logging(&paths);

    let overrides = Overrides {
        api_url: cli.api_url,
        theme: cli.theme,
        config_file: cli.config,
        session_file: cli.session_file,
    };
    let ctx = AppContext::build(&paths, &overrides)?;

    match cli.command.unwrap_or(Commands::Chat) {
        Commands::Chat => commands::chat::run(&ctx).await?,
        Commands::Upload { files } => commands::upload::run(&ctx, &files).await?,
        Commands::Reset => commands::reset::run(&ctx)?,
        Commands::Health => commands::health::run(&ctx).await?,
    }

    Ok(())
}
