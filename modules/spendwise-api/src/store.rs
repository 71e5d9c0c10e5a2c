use std::collections::HashMap;

use async_trait::async_trait;
use tokio::sync::RwLock;

use uuid::Uuid;

use spendwise_common::{
    Category, CategoryDraft, SpendwiseError, Transaction, TransactionFilter, UserId,
};

/// Per-user transaction and category records.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The user's transactions matching `filter`, newest first.
    async fn transactions_for(
        &self,
        user: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, SpendwiseError>;
    async fn insert_transaction(&self, tx: Transaction) -> Result<Transaction, SpendwiseError>;
    async fn delete_transaction(&self, user: &str, id: Uuid) -> Result<(), SpendwiseError>;

    async fn categories_for(&self, user: &str) -> Result<Vec<Category>, SpendwiseError>;
    /// Names are unique per user and entry type, ignoring case.
    async fn insert_category(&self, category: Category) -> Result<Category, SpendwiseError>;
    async fn update_category(
        &self,
        user: &str,
        id: Uuid,
        draft: CategoryDraft,
    ) -> Result<Category, SpendwiseError>;
    async fn delete_category(&self, user: &str, id: Uuid) -> Result<(), SpendwiseError>;
}

fn name_taken(existing: &[Category], candidate: &Category) -> bool {
    existing.iter().any(|c| {
        c.id != candidate.id
            && c.entry_type == candidate.entry_type
            && c.name.eq_ignore_ascii_case(&candidate.name)
    })
}

fn duplicate(category: &Category) -> SpendwiseError {
    SpendwiseError::Duplicate {
        entity_type: "Category",
        identifier: format!("{} ({})", category.name, category.entry_type),
    }
}

/// Process-local store. Contents are lost on restart.
#[derive(Default)]
pub struct MemoryStore {
    transactions: RwLock<HashMap<UserId, Vec<Transaction>>>,
    categories: RwLock<HashMap<UserId, Vec<Category>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RecordStore for MemoryStore {
    async fn transactions_for(
        &self,
        user: &str,
        filter: &TransactionFilter,
    ) -> Result<Vec<Transaction>, SpendwiseError> {
        let mut txs: Vec<Transaction> = self
            .transactions
            .read()
            .await
            .get(user)
            .map(|txs| txs.iter().filter(|tx| filter.matches(tx)).cloned().collect())
            .unwrap_or_default();
        txs.sort_by(|a, b| b.date.cmp(&a.date).then(b.created_at.cmp(&a.created_at)));
        Ok(txs)
    }

    async fn insert_transaction(&self, tx: Transaction) -> Result<Transaction, SpendwiseError> {
        self.transactions
            .write()
            .await
            .entry(tx.user.clone())
            .or_default()
            .push(tx.clone());
        Ok(tx)
    }

    async fn delete_transaction(&self, user: &str, id: Uuid) -> Result<(), SpendwiseError> {
        let mut transactions = self.transactions.write().await;
        let Some(txs) = transactions.get_mut(user) else {
            return Err(SpendwiseError::NotFound {
                entity_type: "Transaction",
                id,
            });
        };
        let before = txs.len();
        txs.retain(|tx| tx.id != id);
        if txs.len() == before {
            return Err(SpendwiseError::NotFound {
                entity_type: "Transaction",
                id,
            });
        }
        Ok(())
    }

    async fn categories_for(&self, user: &str) -> Result<Vec<Category>, SpendwiseError> {
        Ok(self
            .categories
            .read()
            .await
            .get(user)
            .cloned()
            .unwrap_or_default())
    }

    async fn insert_category(&self, category: Category) -> Result<Category, SpendwiseError> {
        let mut categories = self.categories.write().await;
        let existing = categories.entry(category.user.clone()).or_default();
        if name_taken(existing, &category) {
            return Err(duplicate(&category));
        }
        existing.push(category.clone());
        Ok(category)
    }

    async fn update_category(
        &self,
        user: &str,
        id: Uuid,
        draft: CategoryDraft,
    ) -> Result<Category, SpendwiseError> {
        let mut categories = self.categories.write().await;
        let not_found = SpendwiseError::NotFound {
            entity_type: "Category",
            id,
        };
        let Some(existing) = categories.get_mut(user) else {
            return Err(not_found);
        };
        let Some(index) = existing.iter().position(|c| c.id == id) else {
            return Err(not_found);
        };

        let updated = Category {
            entry_type: draft.entry_type,
            name: draft.name.trim().to_string(),
            ..existing[index].clone()
        };
        if name_taken(existing, &updated) {
            return Err(duplicate(&updated));
        }
        existing[index] = updated.clone();
        Ok(updated)
    }

    async fn delete_category(&self, user: &str, id: Uuid) -> Result<(), SpendwiseError> {
        let mut categories = self.categories.write().await;
        let Some(existing) = categories.get_mut(user) else {
            return Err(SpendwiseError::NotFound {
                entity_type: "Category",
                id,
            });
        };
        let before = existing.len();
        existing.retain(|c| c.id != id);
        if existing.len() == before {
            return Err(SpendwiseError::NotFound {
                entity_type: "Category",
                id,
            });
        }
        Ok(())
    }
}
