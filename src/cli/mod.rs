use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

pub mod chat;
pub mod health;
pub mod history;
pub mod send;
pub mod session;

use crate::chat::{ExchangeClient, MemoryStore, SharedStore, SqliteStore};
use crate::core::AppConfig;

#[derive(Subcommand)]
enum Command {
    /// Start an interactive chat session (default)
    Chat {
        /// Load the server side history for this session first
        #[arg(long, action, default_value = "false")]
        history: bool,
    },
    /// Send a single message and print the reply
    Send {
        #[arg(long)]
        message: String,
    },
    /// Print the server side history for this session
    History {},
    /// Clear the server side history for this session
    Clear {},
    /// Check that the backend is up
    Health {},
    /// Print the session identifier
    Session {},
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    /// Override SOFAI_API_BASE_URL
    #[arg(long, global = true)]
    api_base_url: Option<String>,

    /// Override SOFAI_API_KEY
    #[arg(long, global = true)]
    api_key: Option<String>,

    /// Keep the session identifier in memory only
    #[arg(long, global = true, action, default_value = "false")]
    ephemeral: bool,
}

fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| format!("{}=warn", env!("CARGO_CRATE_NAME")).into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

async fn build_client(config: AppConfig, ephemeral: bool) -> Result<ExchangeClient> {
    let store: SharedStore = if ephemeral {
        Arc::new(MemoryStore::new())
    } else {
        std::fs::create_dir_all(&config.storage_path)
            .with_context(|| format!("Failed to create {}", config.storage_path))?;
        Arc::new(SqliteStore::open(&config.db_path()).await?)
    };
    tracing::debug!("Using API base URL {}", config.api_base_url);
    Ok(ExchangeClient::new(config, store)?)
}

pub async fn run() -> Result<()> {
    let args = Cli::parse();
    init_tracing();

    let mut config = AppConfig::default();
    if let Some(url) = args.api_base_url {
        config.api_base_url = url;
    }
    if let Some(key) = args.api_key {
        config.api_key = key;
    }
    let client = build_client(config, args.ephemeral).await?;

    // Handle each sub command
    match args.command {
        Some(Command::Chat { history }) => {
            chat::run(client, history).await?;
        }
        Some(Command::Send { message }) => {
            send::run(&client, &message).await?;
        }
        Some(Command::History {}) => {
            history::show(&client).await?;
        }
        Some(Command::Clear {}) => {
            history::clear(&client).await?;
        }
        Some(Command::Health {}) => {
            health::run(&client).await?;
        }
        Some(Command::Session {}) => {
            session::run(&client).await?;
        }
        None => {
            chat::run(client, false).await?;
        }
    }

    Ok(())
}
