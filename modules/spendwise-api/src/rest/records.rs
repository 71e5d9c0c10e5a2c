use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json},
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::{error, info};
use uuid::Uuid;

use spendwise_common::{
    CategoryDraft, EntryType, SpendwiseError, TransactionDraft, TransactionFilter,
};

use crate::auth::AuthUser;
use crate::error::ApiError;
use crate::AppState;

#[derive(Deserialize)]
pub struct CreateTransactionRequest {
    #[serde(rename = "type")]
    entry_type: EntryType,
    amount: f64,
    category: String,
    #[serde(default)]
    date: Option<NaiveDate>,
    #[serde(default)]
    description: Option<String>,
}

/// Listing filters as sent by the client. Empty values mean "any".
#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionQuery {
    start_date: Option<String>,
    end_date: Option<String>,
    #[serde(rename = "type")]
    entry_type: Option<String>,
    category: Option<String>,
}

impl TransactionQuery {
    fn into_filter(self) -> Result<TransactionFilter, ApiError> {
        fn present(value: Option<String>) -> Option<String> {
            value.map(|v| v.trim().to_string()).filter(|v| !v.is_empty())
        }
        let date = |value: Option<String>, name: &str| {
            present(value)
                .map(|v| NaiveDate::parse_from_str(&v, "%Y-%m-%d"))
                .transpose()
                .map_err(|_| ApiError::BadRequest(format!("{name} must be a yyyy-mm-dd date")))
        };

        Ok(TransactionFilter {
            start_date: date(self.start_date, "startDate")?,
            end_date: date(self.end_date, "endDate")?,
            entry_type: present(self.entry_type)
                .map(|t| t.parse::<EntryType>())
                .transpose()
                .map_err(store_error)?,
            category: present(self.category),
        })
    }
}

fn store_error(e: SpendwiseError) -> ApiError {
    match e {
        SpendwiseError::Validation(_) | SpendwiseError::Duplicate { .. } => {
            ApiError::BadRequest(e.to_string())
        }
        SpendwiseError::NotFound { .. } => ApiError::NotFound(e.to_string()),
    }
}

pub async fn create_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(body): Json<CreateTransactionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let draft = TransactionDraft {
        entry_type: body.entry_type,
        amount: body.amount,
        category: body.category,
        date: body.date.unwrap_or_else(|| state.clock.today()),
        description: body.description,
    };
    draft.validate().map_err(store_error)?;

    let tx = state
        .store
        .insert_transaction(draft.into_transaction(user.id))
        .await
        .map_err(store_error)?;
    info!(user = %tx.user, entry_type = %tx.entry_type, "Transaction created");
    Ok((StatusCode::CREATED, Json(tx)))
}

pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Query(query): Query<TransactionQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = query.into_filter()?;
    state
        .store
        .transactions_for(&user.id, &filter)
        .await
        .map(Json)
        .map_err(|e| {
            error!(user = %user.id, error = %e, "Failed to load transactions");
            ApiError::internal("Failed to load transactions")
        })
}

pub async fn create_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Json(draft): Json<CategoryDraft>,
) -> Result<impl IntoResponse, ApiError> {
    draft.validate().map_err(store_error)?;

    let category = state
        .store
        .insert_category(draft.into_category(user.id))
        .await
        .map_err(store_error)?;
    info!(user = %category.user, entry_type = %category.entry_type, "Category created");
    Ok((StatusCode::CREATED, Json(category)))
}

pub async fn list_categories(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    state
        .store
        .categories_for(&user.id)
        .await
        .map(Json)
        .map_err(|e| {
            error!(user = %user.id, error = %e, "Failed to load categories");
            ApiError::internal("Failed to load categories")
        })
}

pub async fn delete_transaction(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_transaction(&user.id, id)
        .await
        .map_err(store_error)?;
    info!(user = %user.id, %id, "Transaction deleted");
    Ok(StatusCode::NO_CONTENT)
}

pub async fn update_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(draft): Json<CategoryDraft>,
) -> Result<impl IntoResponse, ApiError> {
    draft.validate().map_err(store_error)?;

    let category = state
        .store
        .update_category(&user.id, id, draft)
        .await
        .map_err(store_error)?;
    info!(user = %user.id, %id, "Category updated");
    Ok(Json(category))
}

pub async fn delete_category(
    State(state): State<Arc<AppState>>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError> {
    state
        .store
        .delete_category(&user.id, id)
        .await
        .map_err(store_error)?;
    info!(user = %user.id, %id, "Category deleted");
    Ok(StatusCode::NO_CONTENT)
}
