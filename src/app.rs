/*
 * Responsibility
 * - tracing / panic hook の初期化
 * - Config読み込み → 秘密鍵解決 → 依存生成 → Router 組み立て
 * - axum::serve() で起動
 */
use axum::{Router, routing::get};
use std::{panic, process};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::health::health;
use crate::config::Config;
use crate::error::AppError;
use crate::middleware::http::{self, HttpLimits};
use crate::services::auth::{build_authorizer, build_principal_extractor};
use crate::services::secrets::{EnvSecretProvider, SecretProvider};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,api_authorizer=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook(abort_on_panic: bool) {
    // Keep the default hook as a fallback (prints to stderr with location/payload).
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(?info, "panic");

        // Development: crash the whole process so we notice immediately.
        if abort_on_panic {
            process::abort();
        } else {
            default_hook(info);
        }
    }))
}

pub async fn run() -> Result<(), AppError> {
    init_tracing();
    let config = Config::from_env()?;

    init_panic_hook(!config.app_env.is_production());

    tracing::info!(
        "starting authorizer in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let secrets = EnvSecretProvider::new();
    let state = build_state(&config, &secrets).await?;
    let app = build_router(state, HttpLimits::from(&config));

    let listener = tokio::net::TcpListener::bind(config.addr)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, addr = %config.addr, "failed to bind listener");
            AppError::Internal
        })?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "server error");
            AppError::Internal
        })?;

    Ok(())
}

pub async fn build_state(
    config: &Config,
    secrets: &dyn SecretProvider,
) -> Result<AppState, AppError> {
    // The verification secret is resolved once here; the authorizer only sees the value.
    let authorizer = build_authorizer(config, secrets).await?;
    let extractor = build_principal_extractor(config);

    Ok(AppState::new(authorizer, extractor))
}

pub fn build_router(state: AppState, limits: HttpLimits) -> Router {
    let router = Router::new()
        .route("/health", get(health))
        .nest("/api/v1", api::v1::routes())
        .with_state(state);

    http::apply(router, limits)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %e, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutdown signal received");
}
