use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue},
    routing::{delete, get, post, put},
    Router,
};
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tracing::warn;

use ai_client::ChatModel;
use spendwise_assistant::{ChatSessions, Clock, VoiceExtractor};

pub mod auth;
pub mod error;
pub mod jwt;
pub mod rest;
pub mod store;

use jwt::JwtService;
use store::RecordStore;

pub struct AppState {
    pub store: Arc<dyn RecordStore>,
    pub voice: VoiceExtractor<Arc<dyn ChatModel>>,
    pub sessions: ChatSessions<Arc<dyn ChatModel>>,
    pub jwt: JwtService,
    pub clock: Arc<dyn Clock>,
}

impl AppState {
    pub fn new(
        model: Arc<dyn ChatModel>,
        store: Arc<dyn RecordStore>,
        jwt: JwtService,
        clock: Arc<dyn Clock>,
        session_ttl: Duration,
    ) -> Self {
        Self {
            store,
            voice: VoiceExtractor::new(model.clone(), clock.clone()),
            sessions: ChatSessions::new(model, session_ttl),
            jwt,
            clock,
        }
    }
}

fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|o| {
            HeaderValue::from_str(o)
                .inspect_err(|_| warn!(origin = %o, "Ignoring invalid CORS origin"))
                .ok()
        })
        .collect();

    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);
    if origins.is_empty() {
        layer.allow_origin(Any)
    } else {
        layer.allow_origin(AllowOrigin::list(origins))
    }
}

pub fn build_router(state: Arc<AppState>, allowed_origins: &[String]) -> Router {
    let api = Router::new()
        // Assistant
        .route("/gemini/start", post(rest::gemini::start_session))
        .route("/gemini/chat", post(rest::gemini::chat))
        .route("/gemini/session", delete(rest::gemini::end_session))
        .route("/gemini/extract-category", post(rest::gemini::extract_category))
        .route(
            "/gemini/extract-transaction",
            post(rest::gemini::extract_transaction),
        )
        // Records
        .route(
            "/transactions",
            get(rest::records::list_transactions).post(rest::records::create_transaction),
        )
        .route(
            "/transactions/{id}",
            delete(rest::records::delete_transaction),
        )
        .route(
            "/categories",
            get(rest::records::list_categories).post(rest::records::create_category),
        )
        .route(
            "/categories/{id}",
            put(rest::records::update_category).delete(rest::records::delete_category),
        );

    Router::new()
        // Health check
        .route("/", get(|| async { "ok" }))
        .nest("/api/v1", api)
        .with_state(state)
        .layer(cors_layer(allowed_origins))
        // Responses carry personal financial data
        .layer(SetResponseHeaderLayer::overriding(
            header::CACHE_CONTROL,
            HeaderValue::from_static("no-store"),
        ))
        // Logging layer: method + path only, never bodies or tokens
        .layer(
            tower_http::trace::TraceLayer::new_for_http().make_span_with(
                |request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        path = %request.uri().path(),
                    )
                },
            ),
        )
}
