//! Per-user chat sessions with the assistant.
//!
//! Each session holds the conversation, starting with the user's transaction
//! history. Every turn resends that history, so the model keeps context
//! without any server-side state on the provider. Only the newest
//! [`DEFAULT_MAX_TURNS`] turns are kept after the seed.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use ai_client::{ChatModel, GenerateRequest, Message};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};
use uuid::Uuid;

use spendwise_common::{Transaction, UserId};

use crate::error::AssistantError;
use crate::prompts::{chat_turn_prompt, SESSION_GREETING_PROMPT};

pub const DEFAULT_SESSION_TTL: Duration = Duration::from_secs(30 * 60);

/// Chat turns (prompt and reply) kept after the seed before the oldest are
/// dropped.
pub const DEFAULT_MAX_TURNS: usize = 20;

/// Transaction dump, greeting prompt, greeting reply.
const SEED_LEN: usize = 3;

struct ChatSession {
    id: Uuid,
    history: Vec<Message>,
    last_used: Instant,
}

impl ChatSession {
    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_used.elapsed() >= ttl
    }

    /// Keep the seed and the newest `max_turns` turns.
    fn trim(&mut self, max_turns: usize) -> usize {
        let limit = SEED_LEN + max_turns * 2;
        let excess = self.history.len().saturating_sub(limit);
        self.history.drain(SEED_LEN..SEED_LEN + excess);
        excess / 2
    }
}

pub struct ChatSessions<M> {
    model: M,
    ttl: Duration,
    max_turns: usize,
    sessions: RwLock<HashMap<UserId, ChatSession>>,
}

impl<M: ChatModel> ChatSessions<M> {
    pub fn new(model: M, ttl: Duration) -> Self {
        Self {
            model,
            ttl,
            max_turns: DEFAULT_MAX_TURNS,
            sessions: RwLock::new(HashMap::new()),
        }
    }

    pub fn with_max_turns(mut self, max_turns: usize) -> Self {
        self.max_turns = max_turns;
        self
    }

    /// Open a session seeded with `transactions` and return the model's
    /// greeting. Replaces only this user's previous session.
    pub async fn start(
        &self,
        user: &str,
        transactions: &[Transaction],
    ) -> Result<String, AssistantError> {
        if transactions.is_empty() {
            return Err(AssistantError::NoDataFound);
        }

        let seed = Message::user(serde_json::to_string_pretty(transactions)?);
        let greeting = Message::user(SESSION_GREETING_PROMPT);
        let mut history = vec![seed, greeting];

        let reply = self
            .model
            .generate(&GenerateRequest::new(history.clone()))
            .await
            .inspect_err(|e| warn!(user, error = %e, "Failed to start chat session"))?;
        history.push(Message::model(reply.clone()));

        let session = ChatSession {
            id: Uuid::new_v4(),
            history,
            last_used: Instant::now(),
        };
        let replaced = self
            .sessions
            .write()
            .await
            .insert(user.to_string(), session)
            .is_some();

        info!(
            user,
            transactions = transactions.len(),
            replaced,
            "Chat session started"
        );
        Ok(reply)
    }

    /// Send one chat turn. History is only extended when the model answers.
    pub async fn chat(&self, user: &str, prompt: &str) -> Result<String, AssistantError> {
        let prompt = prompt.trim();
        if prompt.is_empty() {
            return Err(AssistantError::InputMissing("Prompt"));
        }

        let (session_id, mut messages) = self.snapshot(user).await?;
        let turn = Message::user(chat_turn_prompt(prompt));
        messages.push(turn.clone());

        let reply = self
            .model
            .generate(&GenerateRequest::new(messages))
            .await
            .inspect_err(|e| warn!(user, error = %e, "Chat turn failed"))?;

        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(user) {
            Some(session) if session.id == session_id => {
                session.history.push(turn);
                session.history.push(Message::model(reply.clone()));
                session.last_used = Instant::now();
                let dropped = session.trim(self.max_turns);
                debug!(
                    user,
                    messages = session.history.len(),
                    dropped,
                    "Chat turn recorded"
                );
            }
            // Session was restarted or ended while the model was answering.
            _ => debug!(user, "Chat session changed mid-turn, reply not recorded"),
        }
        Ok(reply)
    }

    /// Clone the history of a live session, dropping it if it has expired.
    async fn snapshot(&self, user: &str) -> Result<(Uuid, Vec<Message>), AssistantError> {
        let mut sessions = self.sessions.write().await;
        let expired = match sessions.get(user) {
            Some(session) if !session.is_expired(self.ttl) => {
                return Ok((session.id, session.history.clone()));
            }
            Some(_) => true,
            None => false,
        };
        if expired {
            sessions.remove(user);
            info!(user, "Chat session expired");
        }
        Err(AssistantError::NoSessionActive)
    }

    /// End a user's session. Returns whether one existed.
    pub async fn end(&self, user: &str) -> bool {
        let removed = self.sessions.write().await.remove(user).is_some();
        if removed {
            info!(user, "Chat session ended");
        }
        removed
    }

    /// Drop every session idle for longer than the TTL.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let before = sessions.len();
        sessions.retain(|_, s| !s.is_expired(self.ttl));
        let purged = before - sessions.len();
        if purged > 0 {
            info!(purged, remaining = sessions.len(), "Purged idle chat sessions");
        }
        purged
    }

    pub async fn is_active(&self, user: &str) -> bool {
        self.sessions
            .read()
            .await
            .get(user)
            .is_some_and(|s| !s.is_expired(self.ttl))
    }

    pub async fn active_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    /// Number of messages in a user's conversation, seed included.
    pub async fn history_len(&self, user: &str) -> Option<usize> {
        self.sessions.read().await.get(user).map(|s| s.history.len())
    }
}
