//! `videohint-worker` -- label-to-prompt pipeline service.
//!
//! Accepts object-finalize notifications over HTTP, and for every finalized
//! label-detection result writes a video-description prompt into the
//! matching `bot` record. Configuration is read from the environment; see
//! [`WorkerConfig::from_env`].

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use videohint_events::{EventBus, TriggerDispatcher};
use videohint_pipeline::LabelPromptHandler;
use videohint_worker::app::build_app;
use videohint_worker::config::WorkerConfig;
use videohint_worker::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    // LOG_FORMAT=json switches to one JSON object per line.
    let json_logs = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "videohint_worker=info,videohint_pipeline=info,videohint_events=info,tower_http=info"
                    .into()
            }),
        )
        .with(json_logs.then(|| tracing_subscriber::fmt::layer().json()))
        .with((!json_logs).then(tracing_subscriber::fmt::layer))
        .init();

    // --- Configuration ---
    let config = WorkerConfig::from_env().context("Invalid worker configuration")?;
    tracing::info!(
        host = %config.host,
        port = config.port,
        storage = config.storage_backend.name(),
        "Loaded worker configuration"
    );

    if config.test_mode {
        tracing::warn!("Running in test mode");
    }

    // --- Database ---
    let pool = videohint_db::create_pool(&config.database_url)
        .await
        .context("Failed to connect to database")?;
    tracing::info!("Database connection pool created");

    videohint_db::health_check(&pool)
        .await
        .context("Database health check failed")?;

    videohint_db::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    // --- Pipeline ---
    let storage =
        videohint_cloud::build_storage(config.storage_backend, &config.storage_config).await?;
    let records = Arc::new(videohint_db::PgRecordStore::new(pool.clone()));
    let handler = LabelPromptHandler::new(storage, records);

    // --- Event bus + dispatcher ---
    let event_bus = Arc::new(EventBus::default());
    let dispatcher = TriggerDispatcher::new().register(Arc::new(handler));
    let dispatcher_handle = tokio::spawn(dispatcher.run(event_bus.subscribe()));

    // --- Router ---
    let state = AppState {
        pool,
        event_bus: Arc::clone(&event_bus),
    };
    let app = build_app(state, Duration::from_secs(config.request_timeout_secs));

    // --- Start server ---
    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("Invalid HOST address '{}'", config.host))?;
    let addr = SocketAddr::new(host, config.port);
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {addr}"))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // --- Drain in-flight invocations ---
    // The router (and its bus clones) is gone; dropping the last handle
    // closes the channel and lets the dispatcher finish.
    tracing::info!("Server stopped accepting events, draining pipeline");
    drop(event_bus);

    let drain = Duration::from_secs(config.shutdown_timeout_secs);
    if tokio::time::timeout(drain, dispatcher_handle).await.is_err() {
        tracing::warn!(
            timeout_secs = config.shutdown_timeout_secs,
            "Pipeline did not drain before the shutdown timeout"
        );
    }

    tracing::info!("Graceful shutdown complete");
    Ok(())
}

/// Wait for SIGINT or (on Unix) SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl-C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
