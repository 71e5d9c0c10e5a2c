use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
};
use serde::Deserialize;
use serde_json::json;
use tracing::{error, warn};

use spendwise_assistant::AssistantError;
use spendwise_common::TransactionFilter;

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::rest::LenientJson;
use crate::AppState;

#[derive(Deserialize, Default)]
pub struct ChatRequest {
    #[serde(default)]
    prompt: Option<String>,
}

#[derive(Deserialize, Default)]
pub struct ExtractRequest {
    #[serde(default)]
    input: Option<String>,
}

/// Open a chat session seeded with the caller's transactions.
pub async fn start_session(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let transactions = state
        .store
        .transactions_for(&user.id, &TransactionFilter::default())
        .await
        .map_err(|e| {
            error!(user = %user.id, error = %e, "Failed to load transactions");
            ApiError::internal("Failed to initialize chat")
        })?;

    match state.sessions.start(&user.id, &transactions).await {
        Ok(reply) => Ok(Json(json!({ "message": "Data sent to Gemini", "reply": reply }))),
        Err(AssistantError::NoDataFound) => Err(ApiError::NotFound(
            AssistantError::NoDataFound.to_string(),
        )),
        Err(e) => {
            error!(user = %user.id, error = %e, "Error sending data to Gemini");
            Err(ApiError::internal("Failed to initialize chat"))
        }
    }
}

pub async fn chat(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    LenientJson(body): LenientJson<ChatRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let prompt = body.prompt.unwrap_or_default();
    match state.sessions.chat(&user.id, &prompt).await {
        Ok(reply) => Ok(Json(json!({ "reply": reply }))),
        Err(e @ (AssistantError::NoSessionActive | AssistantError::InputMissing(_))) => {
            Err(ApiError::BadRequest(e.to_string()))
        }
        Err(e) => {
            error!(user = %user.id, error = %e, "Gemini chat error");
            Err(ApiError::internal("Failed to process chat prompt"))
        }
    }
}

/// End the caller's chat session, if any.
pub async fn end_session(State(state): State<Arc<AppState>>, user: AuthUser) -> StatusCode {
    state.sessions.end(&user.id).await;
    StatusCode::NO_CONTENT
}

pub async fn extract_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    LenientJson(body): LenientJson<ExtractRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body.input.unwrap_or_default();
    match state.voice.extract_category(&input).await {
        Ok(category) => Ok(Json(json!({ "category": category }))),
        Err(e @ AssistantError::InputMissing(_)) => Err(ApiError::BadRequest(e.to_string())),
        Err(AssistantError::MalformedResponse(e)) => {
            warn!(user = %user.id, error = %e, "Failed to extract category details");
            Err(ApiError::Internal {
                message: "Failed to extract category details",
                detail: None,
                raw: Some(e.raw().to_string()),
            })
        }
        Err(e) => {
            error!(user = %user.id, error = %e, "Error extracting category");
            Err(ApiError::internal(
                "Something went wrong while processing the input",
            ))
        }
    }
}

pub async fn extract_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    LenientJson(body): LenientJson<ExtractRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = body.input.unwrap_or_default();
    match state.voice.extract_transaction(&input).await {
        Ok(transaction) => Ok(Json(json!({ "transaction": transaction }))),
        Err(e @ AssistantError::InputMissing(_)) => Err(ApiError::BadRequest(e.to_string())),
        Err(e) => {
            error!(user = %user.id, error = %e, "Error extracting transaction");
            Err(ApiError::Internal {
                message: "Something went wrong",
                detail: Some(e.to_string()),
                raw: e.raw_response().map(str::to_string),
            })
        }
    }
}
