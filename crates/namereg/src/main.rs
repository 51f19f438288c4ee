use std::sync::Arc;

use anyhow::Context;
use bytes::Bytes;
use namereg::core::TokenVerifier;
use namereg::store::{DocumentStore, MemoryStore, SqliteStore};
use namereg::{router, NameRegistryUpdater, NameService, ServiceConfig};
use tracing_subscriber::EnvFilter;

const DEFAULT_LOG_FILTER: &str = "namereg=info,tower_http=info";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = ServiceConfig::from_env().context("loading configuration")?;
    init_tracing(config.json_logs);

    let verifier = config.verifier().context("loading token public key")?;
    tracing::info!(key = %verifier.public_key().to_hex(), "token verifier ready");

    match &config.database_path {
        Some(path) => {
            let store = SqliteStore::open(path)
                .with_context(|| format!("opening database {}", path.display()))?;
            tracing::info!(path = %path.display(), "using sqlite store");
            serve(&config, verifier, store).await
        }
        None => {
            tracing::warn!("no NAMEREG_DB set; registry is held in memory only");
            serve(&config, verifier, MemoryStore::new()).await
        }
    }
}

fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER));

    if json {
        tracing_subscriber::fmt().with_env_filter(filter).json().init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}

async fn serve<S: DocumentStore + 'static>(
    config: &ServiceConfig,
    verifier: TokenVerifier,
    store: S,
) -> anyhow::Result<()> {
    let store = Arc::new(store);

    if config.init_document {
        let created = store
            .put_if_absent(&config.document_key, Bytes::from_static(b"{}"))
            .await
            .context("provisioning registry document")?;
        if created {
            tracing::info!(key = %config.document_key, "created empty registry document");
        }
    }

    let service = NameService::new(
        verifier,
        NameRegistryUpdater::new(store, config.document_key.clone()),
    );

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("binding {}", config.bind_addr))?;
    tracing::info!(addr = %config.bind_addr, "listening");

    axum::serve(listener, router(service))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("shut down");
    Ok(())
}

async fn shutdown_signal() {
    shutdown_on(tokio::signal::ctrl_c()).await
}

/// Resolve when `signal` fires. If it cannot be installed, never resolve.
async fn shutdown_on<F>(signal: F)
where
    F: std::future::Future<Output = std::io::Result<()>>,
{
    if let Err(err) = signal.await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
}
