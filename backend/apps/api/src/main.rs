//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.
//!
//! gRPC and the HTTP gateway run side by side over one [`BlogService`] and
//! stop together on Ctrl-C / SIGTERM.

mod config;
mod gateway;
mod grpc;
mod service;
mod upload;

use std::net::SocketAddr;
use std::sync::Arc;

use auth::PgAuthRepository;
use auth::application::SessionsUseCase;
use platform::token::TokenMaker;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::AppConfig;
use crate::grpc::GrpcService;
use crate::service::BlogService;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "blog_api=info,auth=info,blog=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .connect(&config.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Startup cleanup: errors here should not prevent server startup
    let sessions = SessionsUseCase::new(Arc::new(PgAuthRepository::new(pool.clone())));
    if let Err(e) = sessions.delete_expired().await {
        tracing::warn!(error = %e, "Expired session cleanup failed, continuing anyway");
    }

    let tokens = TokenMaker::new(&config.token_symmetric_key)?;
    let service = BlogService::new(pool, tokens, config.auth_config(), config.blog_config());

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        shutdown_signal().await;
        let _ = shutdown_tx.send(true);
    });

    // gRPC server
    let grpc = tonic::transport::Server::builder()
        .timeout(config.request_timeout)
        .layer(TraceLayer::new_for_grpc())
        .add_service(GrpcService::new(service.clone()).into_server())
        .serve_with_shutdown(config.grpc_addr, wait_for_shutdown(shutdown_rx.clone()));

    // HTTP gateway
    let app = gateway::app(service, &config);
    let listener = TcpListener::bind(config.http_addr).await?;
    let http = axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(wait_for_shutdown(shutdown_rx));

    tracing::info!(grpc = %config.grpc_addr, http = %config.http_addr, "Listening");

    tokio::try_join!(
        async { grpc.await.map_err(anyhow::Error::from) },
        async { http.await.map_err(anyhow::Error::from) },
    )?;

    tracing::info!("Servers stopped");
    Ok(())
}

async fn wait_for_shutdown(mut rx: watch::Receiver<bool>) {
    let _ = rx.wait_for(|stop| *stop).await;
}

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
                tracing::error!(error = %e, "Failed to listen for SIGTERM");
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

    tracing::info!("Shutdown signal received");
}
