//! Test harness for driving the HTTP router in-process.
//!
//! Fakes the model with `ScriptedModel` and pins today to 2024-06-10.
//! Requests go through the full router (auth, CORS, trace layers) via
//! `tower::ServiceExt::oneshot`.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use chrono::NaiveDate;
use serde_json::Value;
use tower::ServiceExt;

use spendwise_api::jwt::JwtService;
use spendwise_api::store::{MemoryStore, RecordStore};
use spendwise_api::{build_router, AppState};
use spendwise_assistant::testing::ScriptedModel;
use spendwise_assistant::FixedClock;

pub const JWT_SECRET: &str = "test-secret";

pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, 10).unwrap()
}

pub struct TestApp {
    pub router: Router,
    pub model: Arc<ScriptedModel>,
    pub store: Arc<MemoryStore>,
}

impl TestApp {
    pub fn new(model: ScriptedModel) -> Self {
        let model = Arc::new(model);
        let store = Arc::new(MemoryStore::new());
        let state = Arc::new(AppState::new(
            model.clone(),
            store.clone() as Arc<dyn RecordStore>,
            JwtService::new(JWT_SECRET),
            Arc::new(FixedClock(today())),
            Duration::from_secs(1800),
        ));
        Self {
            router: build_router(state, &[]),
            model,
            store,
        }
    }

    pub fn token(user: &str) -> String {
        JwtService::new(JWT_SECRET)
            .create_token(user, chrono::Duration::days(30))
            .unwrap()
    }

    pub async fn send(
        &self,
        method: Method,
        path: &str,
        user: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut request = Request::builder().method(method).uri(path);
        if let Some(user) = user {
            request = request.header(header::AUTHORIZATION, format!("Bearer {}", Self::token(user)));
        }
        let request = match body {
            Some(json) => request
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => request.body(Body::empty()).unwrap(),
        };

        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&bytes).into_owned())
            })
        };
        (status, json)
    }

    pub async fn post(&self, path: &str, user: &str, body: Value) -> (StatusCode, Value) {
        self.send(Method::POST, path, Some(user), Some(body)).await
    }

    pub async fn post_empty(&self, path: &str, user: &str) -> (StatusCode, Value) {
        self.send(Method::POST, path, Some(user), None).await
    }

    pub async fn get(&self, path: &str, user: &str) -> (StatusCode, Value) {
        self.send(Method::GET, path, Some(user), None).await
    }
}
