use std::sync::Arc;

use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use finhub::api::{create_router, AppState};
use finhub::config::Config;
use finhub::db::{Database, DatabaseBackend, LibSqlBackend};
use finhub::ingest::{FactOracle, LlmFactOracle};
use finhub::llm::LlmProvider;

#[derive(Parser)]
#[command(name = "finhub")]
#[command(about = "Turns inbound email into financial items and decision context")]
struct Args {
    /// Bind address, overrides FINHUB_HOST
    #[arg(long)]
    host: Option<String>,

    /// Listen port, overrides FINHUB_PORT
    #[arg(long)]
    port: Option<u16>,

    /// Emit logs as JSON lines
    #[arg(long)]
    json_logs: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    dotenvy::dotenv().ok();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "finhub=info,tower_http=debug".into());
    if args.json_logs {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    let mut config = Config::from_env();
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Initializing database...");
    let raw_db = Database::new(&config.database).await?;
    let db: Arc<dyn DatabaseBackend> = Arc::new(LibSqlBackend::new(raw_db));

    if let Some(llm_config) = &config.llm {
        tracing::info!("Initializing LLM provider: {}...", llm_config.model);
    }
    let llm = LlmProvider::new(config.llm.as_ref());
    if !llm.is_available() {
        tracing::warn!("LLM unavailable - emails will be mined for highlights only");
    }
    let oracle: Arc<dyn FactOracle> = Arc::new(LlmFactOracle::new(llm));

    tracing::info!(
        display_currency = %config.currency.display,
        rates = config.currency.rates.len(),
        "Currency normalization configured"
    );

    let state = AppState::new(config.clone(), db, oracle);
    let cancel_token = CancellationToken::new();

    if config.database.local_path.is_some() {
        tracing::info!("Starting replica sync...");
        let db = state.db.clone();
        let token = cancel_token.child_token();
        tokio::spawn(async move {
            loop {
                tokio::select! {
                    _ = token.cancelled() => {
                        tracing::info!("Replica sync shutting down...");
                        break;
                    }
                    _ = tokio::time::sleep(tokio::time::Duration::from_secs(60)) => {
                        if let Err(e) = db.sync().await {
                            tracing::error!("Replica sync error: {}", e);
                        }
                    }
                }
            }
        });
    }

    let app = create_router(state);

    let addr = format!("{}:{}", config.server.host, config.server.port);
    tracing::info!("finhub starting on http://{}", addr);
    tracing::info!("  Webhook:      http://{}/api/v1/webhooks/email-inbound", addr);
    tracing::info!("  Health check: http://{}/api/v1/health", addr);
    tracing::info!("  API docs:     http://{}/api/v1/docs", addr);
    tracing::info!("  OpenAPI spec: http://{}/api/v1/openapi.json", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(cancel_token))
        .await?;

    Ok(())
}

async fn shutdown_signal(cancel_token: CancellationToken) {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, cancelling background tasks...");
    cancel_token.cancel();
}
