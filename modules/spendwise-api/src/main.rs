use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ai_client::{ChatModel, Gemini, RetryPolicy, Retrying};
use spendwise_api::{build_router, jwt::JwtService, store::MemoryStore, AppState};
use spendwise_assistant::SystemClock;
use spendwise_common::Config;

const SESSION_PURGE_INTERVAL: Duration = Duration::from_secs(60);

fn init_tracing() -> Result<()> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::new("warn")
            .add_directive("spendwise=info".parse()?)
            .add_directive("ai_client=info".parse()?)
            .add_directive("tower_http=info".parse()?),
    };

    let builder = tracing_subscriber::fmt().with_env_filter(filter);
    if std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json")) {
        builder.json().init();
    } else {
        builder.init();
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> Result<()> {
    let config = Config::from_env()?;
    init_tracing()?;

    let mut gemini = Gemini::new(&config.gemini_api_key, &config.gemini_model)
        .with_timeout(config.ai_timeout);
    if let Some(ref url) = config.gemini_base_url {
        gemini = gemini.with_base_url(url);
    }
    let policy = RetryPolicy::default().with_max_attempts(config.ai_max_attempts);
    let model: Arc<dyn ChatModel> = Arc::new(Retrying::new(gemini, policy));

    let state = Arc::new(AppState::new(
        model,
        Arc::new(MemoryStore::new()),
        JwtService::new(&config.jwt_secret),
        Arc::new(SystemClock),
        config.chat_session_ttl,
    ));

    // Idle chat sessions are dropped in the background
    let purge_state = state.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PURGE_INTERVAL);
        loop {
            interval.tick().await;
            purge_state.sessions.purge_expired().await;
        }
    });

    let app = build_router(state, &config.allowed_origins);

    let addr = format!("{}:{}", config.api_host, config.api_port);
    info!(
        model = %config.gemini_model,
        max_attempts = config.ai_max_attempts,
        "Spendwise API starting on {addr}"
    );

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}
