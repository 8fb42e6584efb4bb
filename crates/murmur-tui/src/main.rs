//! Murmur terminal client entry point.
//!
//! # Usage
//!
//! ```bash
//! # Configure from the environment
//! STUDIO_PROJECT_ID=demo STUDIO_API_KEY=key murmur
//!
//! # Or explicitly, with a separate room and pending writes shown immediately
//! murmur --app-id team-a --project-id demo --api-key key --latency-compensation
//! ```
//!
//! The terminal belongs to the UI, so logs go to `--log-file`.

use std::{fs::File, path::PathBuf, sync::Mutex};

use clap::Parser;
use murmur_app::{ChatView, Runtime};
use murmur_backend::{MemoryAuth, MemoryStore, StoreOptions, SystemEnv};
use murmur_core::{BackendConfig, ChatConfig, DEFAULT_DEPLOYMENT_ID};
use murmur_tui::TerminalDriver;
use tracing_subscriber::EnvFilter;

/// Murmur terminal chat client
#[derive(Parser, Debug)]
#[command(name = "murmur")]
#[command(about = "Single-room realtime chat in the terminal")]
#[command(version)]
struct Args {
    /// Deployment identifier partitioning the chat data
    #[arg(long, env = "STUDIO_APP_ID", default_value = DEFAULT_DEPLOYMENT_ID)]
    app_id: String,

    /// Backend project identifier
    #[arg(long, env = "STUDIO_PROJECT_ID")]
    project_id: Option<String>,

    /// Backend API key
    #[arg(long, env = "STUDIO_API_KEY", hide_env_values = true)]
    api_key: Option<String>,

    /// Show writes in the feed before the store commits them
    #[arg(long)]
    latency_compensation: bool,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, default_value = "info")]
    log_level: String,

    /// File receiving log output
    #[arg(long, default_value = "murmur.log")]
    log_file: PathBuf,
}

impl Args {
    /// Resolve the view configuration. Missing credentials leave the backend
    /// unconfigured, which the view reports on mount.
    fn chat_config(&self) -> ChatConfig {
        let backend = match (&self.project_id, &self.api_key) {
            (Some(project_id), Some(api_key)) => {
                Some(BackendConfig { project_id: project_id.clone(), api_key: api_key.clone() })
            },
            _ => None,
        };

        ChatConfig::new(self.app_id.clone(), backend)
    }
}

#[allow(clippy::disallowed_types, reason = "log writer is shared across threads")]
fn init_logging(args: &Args) -> Result<(), Box<dyn std::error::Error>> {
    let file = File::create(&args.log_file)?;
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&args.log_level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();

    Ok(())
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();
    init_logging(&args)?;

    let config = args.chat_config();
    tracing::info!(
        deployment = %config.deployment_id,
        configured = config.is_configured(),
        "murmur starting"
    );

    let env = SystemEnv::new();
    let options = StoreOptions { latency_compensation: args.latency_compensation };
    let store = MemoryStore::with_options(env, options);
    let identity = MemoryAuth::new(env);

    let driver = TerminalDriver::new()?;
    let mut runtime = Runtime::new(driver, ChatView::new(config), identity, store);
    runtime.run().await?;

    tracing::info!("murmur stopped");
    Ok(())
}
