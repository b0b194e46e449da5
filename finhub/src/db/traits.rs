use async_trait::async_trait;

use crate::error::Result;
use crate::models::{ContextHighlight, FinancialItem};

/// Storage operations for financial items. All lookups are scoped to one owner.
#[async_trait]
pub trait FinancialItemStore: Send + Sync {
    /// Insert unless (owner, message id) already exists. `false` means the row already existed.
    async fn insert_financial_item(&self, item: &FinancialItem) -> Result<bool>;
    async fn get_financial_item_by_message_id(
        &self,
        owner_email: &str,
        message_id: &str,
    ) -> Result<Option<FinancialItem>>;
    /// Most recent item whose vendor or product name contains `keyword`, case-insensitively.
    async fn find_latest_financial_item_by_keyword(
        &self,
        owner_email: &str,
        keyword: &str,
    ) -> Result<Option<FinancialItem>>;
    async fn list_financial_items(&self, owner_email: &str) -> Result<Vec<FinancialItem>>;
    async fn delete_financial_item(&self, owner_email: &str, id: &str) -> Result<bool>;
}

/// Storage operations for context highlights. Inserts carry no uniqueness constraint.
#[async_trait]
pub trait HighlightStore: Send + Sync {
    async fn insert_highlight(&self, highlight: &ContextHighlight) -> Result<()>;
    async fn list_highlights(&self, owner_email: &str) -> Result<Vec<ContextHighlight>>;
}

/// A complete database backend that combines all store traits plus lifecycle
/// operations.
#[async_trait]
pub trait DatabaseBackend: FinancialItemStore + HighlightStore {
    /// Sync with remote (e.g. Turso replication). No-op for local-only backends.
    async fn sync(&self) -> Result<()>;
}
