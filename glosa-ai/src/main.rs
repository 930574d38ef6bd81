//! glosa-ai - AI language-learning and persona chat service
//!
//! Serves the vocabulary enrichment workflow (words, example sentences,
//! speech) and the persona chat over HTTP REST + SSE.

use anyhow::Result;
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use glosa_ai::config::{resolve_openai_api_key, ServiceConfig};
use glosa_ai::db::SqliteMirror;
use glosa_ai::services::OpenAiClient;
use glosa_ai::workflow::{ChatSession, EnrichmentWorkflow};
use glosa_ai::AppState;
use glosa_common::config::{
    default_config_path, load_toml_config, write_toml_config, RootFolderInitializer,
    RootFolderResolver, TomlConfig,
};
use glosa_common::events::EventBus;

const MODULE_NAME: &str = "glosa-ai";

#[derive(Debug, Parser)]
#[command(name = "glosa-ai", version, about = "AI language-learning and persona chat service")]
struct Args {
    /// Root folder holding the database
    #[arg(long)]
    root_folder: Option<PathBuf>,

    /// TOML config file (default: <config dir>/glosa/glosa-ai.toml)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Address to listen on, e.g. 127.0.0.1:5730
    #[arg(long, env = "GLOSA_BIND")]
    bind: Option<String>,

    /// Write a default config file to the config path and exit
    #[arg(long)]
    init_config: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args
        .config
        .clone()
        .or_else(|| default_config_path(MODULE_NAME));

    if args.init_config {
        let path = config_path
            .ok_or_else(|| anyhow::anyhow!("No config directory available on this platform"))?;
        write_toml_config(&TomlConfig::default(), &path)?;
        println!("Wrote default config to {}", path.display());
        return Ok(());
    }

    let toml_config = match &config_path {
        Some(path) => load_toml_config(path)?,
        None => TomlConfig::default(),
    };

    // RUST_LOG takes precedence over the TOML level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&toml_config.logging.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    info!("Starting glosa-ai (AI language learning) service");
    info!(
        version = env!("CARGO_PKG_VERSION"),
        git = env!("GIT_HASH"),
        built = env!("BUILD_TIMESTAMP"),
        profile = env!("BUILD_PROFILE"),
        "Build info"
    );
    if let Some(path) = &config_path {
        info!("Config file: {}", path.display());
    }

    let root_folder = RootFolderResolver::new(MODULE_NAME)
        .with_cli_arg(args.root_folder.clone())
        .with_toml(&toml_config)
        .resolve();

    let initializer = RootFolderInitializer::new(root_folder);
    initializer
        .ensure_directory_exists()
        .map_err(|e| anyhow::anyhow!("Failed to initialize root folder: {}", e))?;

    let db_path = initializer.database_path();
    info!("Database: {}", db_path.display());

    let db_pool = glosa_ai::db::init_database_pool(&db_path).await?;
    info!("Database connection established");

    let api_key = resolve_openai_api_key(&toml_config);
    let ai_configured = api_key.is_some();
    let service_config = ServiceConfig::resolve(&toml_config, args.bind.as_deref(), api_key)?;
    info!(
        base_url = %service_config.openai.base_url,
        chat_model = %service_config.openai.chat_model,
        tts_model = %service_config.openai.tts_model,
        "OpenAI client configured"
    );

    let client = Arc::new(OpenAiClient::new(service_config.openai.clone())?);
    let mirror = Arc::new(SqliteMirror::new(db_pool));

    let event_bus = EventBus::new(100);
    info!("Event bus initialized");

    let workflow = Arc::new(EnrichmentWorkflow::new(
        client.clone(),
        client.clone(),
        mirror,
        event_bus.clone(),
    ));
    let chat = Arc::new(ChatSession::new(client, event_bus.clone()));

    // A failed history load leaves an empty list and a banner
    match workflow.load_history().await {
        Ok(count) => info!("Loaded {} word groups from history", count),
        Err(e) => warn!("Starting with empty history: {}", e),
    }

    let state = AppState::new(workflow, chat, event_bus, ai_configured);
    let app = glosa_ai::build_router(state);

    let listener = tokio::net::TcpListener::bind(service_config.bind_address).await?;
    info!("Listening on http://{}", service_config.bind_address);
    info!("Health check: http://{}/health", service_config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
