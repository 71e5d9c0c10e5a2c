use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::error::SpendwiseError;

/// Identity of an authenticated caller, as carried in the bearer token.
pub type UserId = String;

// --- Enums ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    Income,
    Expense,
}

impl std::fmt::Display for EntryType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntryType::Income => write!(f, "income"),
            EntryType::Expense => write!(f, "expense"),
        }
    }
}

impl std::str::FromStr for EntryType {
    type Err = SpendwiseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "income" => Ok(EntryType::Income),
            "expense" => Ok(EntryType::Expense),
            other => Err(SpendwiseError::Validation(format!(
                "type must be income or expense, got {other:?}"
            ))),
        }
    }
}

// --- Records ---

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user: UserId,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Category {
    pub id: Uuid,
    pub user: UserId,
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

// --- Drafts ---

/// A transaction proposed by voice extraction or a form. Not persisted until
/// validated and turned into a [`Transaction`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransactionDraft {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    #[serde(deserialize_with = "deserialize_amount")]
    pub amount: f64,
    pub category: String,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl TransactionDraft {
    pub fn validate(&self) -> Result<(), SpendwiseError> {
        if !self.amount.is_finite() || self.amount <= 0.0 {
            return Err(SpendwiseError::Validation(format!(
                "amount must be a positive number, got {}",
                self.amount
            )));
        }
        if self.category.trim().is_empty() {
            return Err(SpendwiseError::Validation("category is required".into()));
        }
        Ok(())
    }

    pub fn into_transaction(self, user: UserId) -> Transaction {
        Transaction {
            id: Uuid::new_v4(),
            user,
            entry_type: self.entry_type,
            amount: self.amount,
            category: self.category.trim().to_string(),
            date: self.date,
            description: self
                .description
                .map(|d| d.trim().to_string())
                .filter(|d| !d.is_empty()),
            created_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryDraft {
    #[serde(rename = "type")]
    pub entry_type: EntryType,
    pub name: String,
}

impl CategoryDraft {
    pub fn validate(&self) -> Result<(), SpendwiseError> {
        if self.name.trim().is_empty() {
            return Err(SpendwiseError::Validation("name is required".into()));
        }
        Ok(())
    }

    pub fn into_category(self, user: UserId) -> Category {
        Category {
            id: Uuid::new_v4(),
            user,
            entry_type: self.entry_type,
            name: self.name.trim().to_string(),
            created_at: Utc::now(),
        }
    }
}

// --- Queries ---

/// Narrows a transaction listing. Every bound is optional and inclusive.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionFilter {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub entry_type: Option<EntryType>,
    /// Matched ignoring case.
    pub category: Option<String>,
}

impl TransactionFilter {
    pub fn matches(&self, tx: &Transaction) -> bool {
        self.start_date.is_none_or(|start| tx.date >= start)
            && self.end_date.is_none_or(|end| tx.date <= end)
            && self.entry_type.is_none_or(|t| tx.entry_type == t)
            && self
                .category
                .as_deref()
                .is_none_or(|c| tx.category.eq_ignore_ascii_case(c))
    }
}

/// Models sometimes quote numbers ("amount": "500"); accept both forms.
fn deserialize_amount<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Amount {
        Number(f64),
        Text(String),
    }

    match Amount::deserialize(deserializer)? {
        Amount::Number(n) => Ok(n),
        Amount::Text(s) => s
            .trim()
            .replace(',', "")
            .parse()
            .map_err(|_| serde::de::Error::custom(format!("invalid amount: {s:?}"))),
    }
}
