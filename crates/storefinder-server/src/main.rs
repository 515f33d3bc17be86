mod api;
mod middleware;

use std::net::SocketAddr;

use storefinder_core::{AppConfig, Backend, InMemoryStoreRepository, Store, StoreRepository};
use storefinder_db::PgStoreRepository;
use tracing_subscriber::EnvFilter;

use crate::api::{build_app, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = storefinder_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!(env = %config.env, backend = %config.backend, "starting storefinder-server");

    let seeds = match &config.seed_path {
        Some(path) => storefinder_core::load_stores(path)?,
        None => Vec::new(),
    };

    match config.backend {
        Backend::Memory => {
            let repo = InMemoryStoreRepository::new(config.search_defaults());
            run(&config, repo, seeds).await
        }
        Backend::Postgres => {
            let pool = storefinder_db::connect_pool_from_config(&config).await?;
            let applied = storefinder_db::run_migrations(&pool).await?;
            storefinder_db::health_check(&pool).await?;
            tracing::info!(applied, "database ready");
            let repo = PgStoreRepository::new(pool, config.search_defaults());
            run(&config, repo, seeds).await
        }
    }
}

async fn run<R>(config: &AppConfig, repo: R, seeds: Vec<Store>) -> anyhow::Result<()>
where
    R: StoreRepository + Clone + 'static,
{
    seed_stores(&repo, seeds).await?;

    let app = build_app(AppState {
        repo,
        backend: config.backend,
    });
    serve(config.bind_addr, app).await
}

/// Upsert every seed store, so restarting with the same file is idempotent.
async fn seed_stores<R: StoreRepository>(
    repo: &R,
    seeds: Vec<Store>,
) -> Result<(), storefinder_core::StoreError> {
    if seeds.is_empty() {
        return Ok(());
    }
    let total = seeds.len();
    let mut inserted = 0_usize;
    for store in seeds {
        if repo.update_store(store).await? {
            inserted += 1;
        }
    }
    tracing::info!(total, inserted, updated = total - inserted, "seeded stores");
    Ok(())
}

async fn serve(addr: SocketAddr, app: axum::Router) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("received shutdown signal, starting graceful shutdown");
}
