use crate::dates::{format_date, DateContext};

/// Sent right after the transaction history to open a chat session.
pub const SESSION_GREETING_PROMPT: &str =
    "Got the data? if yes then only respond with ' how can i assist you ..' ";

pub fn category_prompt(input: &str) -> String {
    format!(
        r#"You will be given a user command like "Add shopping as expense" or "Add salary as income".
Extract the type and name from it in JSON format like:
{{ "type": "expense", "name": "shopping" }}

Command: {input}
Only respond with JSON."#
    )
}

/// `input` is expected to have been through
/// [`resolve_relative_dates`](crate::dates::resolve_relative_dates) already.
pub fn transaction_prompt(input: &str, dates: &DateContext) -> String {
    let today = format_date(dates.today);
    let yesterday = format_date(dates.yesterday);
    let tomorrow = format_date(dates.tomorrow);
    format!(
        r#"You will receive a user's voice input related to a financial transaction.

Extract and return this JSON:
{{
  "type": "income" or "expense",
  "amount": 1234,
  "category": "shopping",
  "date": "yyyy-mm-dd",
  "description": "short summary"
}}

Rules:
- Convert all dates to "yyyy-mm-dd" format.
- "today" → "{today}", "yesterday" → "{yesterday}", "tomorrow" → "{tomorrow}"
- "X days ago/before" → minus X days from today
- "X days after/later" → add X days to today
- If no date is mentioned, use "{today}".
- Always return valid JSON only.

Input: {input}"#
    )
}

pub fn chat_turn_prompt(prompt: &str) -> String {
    format!("Give response after analyzing my data and without * and ** {prompt}")
}
