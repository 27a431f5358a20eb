use anyhow::Context;
use clap::Parser;
use ofamm_site::cli::{Cli, Command};
use ofamm_site::config::{OfammConfig, UploadMode};
use ofamm_site::database::open_store;
use ofamm_site::features::site::render::SiteRenderer;
use ofamm_site::io::{InlineMediaStorage, LocalMediaStorage, MediaStorage};
use ofamm_site::services::auth::hash_password;
use ofamm_site::services::{AuthService, ContentService};
use ofamm_site::{AppState, build_router, logging};
use std::sync::Arc;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::HashPassword { password }) = &cli.command {
        println!("{}", hash_password(password)?);
        return Ok(());
    }

    // determine environment variables
    dotenv::dotenv().ok();

    // load centralized config
    let config = OfammConfig::from_env()?;
    logging::init_logging(config.log_format);
    let shared_config = Arc::new(config.clone());

    let store = open_store(&config).await?;
    tracing::info!(backend = store.backend_name(), "content store ready");

    let media: Arc<dyn MediaStorage> = match config.upload_mode {
        UploadMode::Inline => Arc::new(InlineMediaStorage),
        UploadMode::Disk => Arc::new(LocalMediaStorage::new(&config.upload_dir)),
    };

    let renderer = SiteRenderer::new(&config.template_dir)?;

    let app_state = AppState {
        content: Arc::new(ContentService::new(store)),
        auth: Arc::new(AuthService::new(&config)),
        media,
        renderer: Arc::new(renderer),
        config: shared_config,
    };

    // warm the cache so a broken store fails at boot, not on the first visitor
    app_state.content.content().await?;

    let app = build_router(app_state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}
