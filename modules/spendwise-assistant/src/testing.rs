// Test doubles for the assistant.
//
// - ScriptedModel (ChatModel) replays queued replies and records every request.
// - transaction() builds a stored transaction for seeding sessions.

use std::collections::VecDeque;
use std::sync::Mutex;

use ai_client::{AiError, ChatModel, GenerateRequest};
use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use uuid::Uuid;

use spendwise_common::{EntryType, Transaction};

// ---------------------------------------------------------------------------
// ScriptedModel
// ---------------------------------------------------------------------------

/// Replies in the order queued. Once the queue is empty every call fails with
/// a 500 so a test never hangs on an unexpected extra call.
#[derive(Default)]
pub struct ScriptedModel {
    replies: Mutex<VecDeque<Result<String, AiError>>>,
    requests: Mutex<Vec<GenerateRequest>>,
}

impl ScriptedModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reply(self, text: impl Into<String>) -> Self {
        self.push(Ok(text.into()));
        self
    }

    pub fn fail(self, error: AiError) -> Self {
        self.push(Err(error));
        self
    }

    pub fn push(&self, reply: Result<String, AiError>) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn requests(&self) -> Vec<GenerateRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_prompt(&self) -> Option<String> {
        self.requests
            .lock()
            .unwrap()
            .last()
            .and_then(|r| r.messages.last())
            .map(|m| m.content.clone())
    }
}

#[async_trait]
impl ChatModel for ScriptedModel {
    async fn generate(&self, request: &GenerateRequest) -> Result<String, AiError> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Err(AiError::Api {
                    status: 500,
                    message: "no scripted reply".into(),
                })
            })
    }
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

pub fn transaction(user: &str, entry_type: EntryType, amount: f64, category: &str) -> Transaction {
    Transaction {
        id: Uuid::new_v4(),
        user: user.to_string(),
        entry_type,
        amount,
        category: category.to_string(),
        date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
        description: None,
        created_at: Utc::now(),
    }
}
