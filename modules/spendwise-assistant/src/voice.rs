use std::sync::Arc;

use ai_client::{truncate_to_char_boundary, ChatModel, GenerateRequest};
use tracing::{info, warn};

use spendwise_common::{CategoryDraft, TransactionDraft};

use crate::dates::{resolve_relative_dates, Clock, DateContext};
use crate::error::AssistantError;
use crate::extract::{parse_category_draft, parse_transaction_draft};
use crate::prompts::{category_prompt, transaction_prompt};

/// Turns spoken commands into draft records with one history-less model call
/// per command.
pub struct VoiceExtractor<M> {
    model: M,
    clock: Arc<dyn Clock>,
}

impl<M: ChatModel> VoiceExtractor<M> {
    pub fn new(model: M, clock: Arc<dyn Clock>) -> Self {
        Self { model, clock }
    }

    pub async fn extract_category(&self, input: &str) -> Result<CategoryDraft, AssistantError> {
        let input = require_input(input)?;
        info!(input_len = input.len(), "Extracting category from voice input");

        let text = self.complete(category_prompt(input)).await?;
        parse_category_draft(&text)
            .inspect(|draft| info!(entry_type = %draft.entry_type, "Category extracted"))
            .map_err(|e| log_malformed("category", e.into()))
    }

    pub async fn extract_transaction(
        &self,
        input: &str,
    ) -> Result<TransactionDraft, AssistantError> {
        let input = require_input(input)?;
        let dates = DateContext::new(self.clock.today());
        let processed = resolve_relative_dates(input, dates.today);
        info!(
            input_len = input.len(),
            rewritten = processed != input,
            "Extracting transaction from voice input"
        );

        let text = self.complete(transaction_prompt(&processed, &dates)).await?;
        parse_transaction_draft(&text)
            .inspect(|draft| info!(entry_type = %draft.entry_type, date = %draft.date, "Transaction extracted"))
            .map_err(|e| log_malformed("transaction", e.into()))
    }

    async fn complete(&self, prompt: String) -> Result<String, AssistantError> {
        let request = GenerateRequest::single(prompt).json_output();
        self.model.generate(&request).await.map_err(|e| {
            warn!(error = %e, "Voice extraction model call failed");
            AssistantError::Upstream(e)
        })
    }
}

fn require_input(input: &str) -> Result<&str, AssistantError> {
    let input = input.trim();
    if input.is_empty() {
        return Err(AssistantError::InputMissing("Input"));
    }
    Ok(input)
}

fn log_malformed(kind: &'static str, error: AssistantError) -> AssistantError {
    warn!(
        kind,
        error = %error,
        raw = truncate_to_char_boundary(error.raw_response().unwrap_or_default(), 500),
        "Model reply did not contain a usable draft"
    );
    error
}
