use crate::db::connection::Database;
use crate::db::repository::{FinancialItemRepository, HighlightRepository};
use crate::db::traits::{DatabaseBackend, FinancialItemStore, HighlightStore};
use crate::error::Result;
use crate::models::{ContextHighlight, FinancialItem};
use async_trait::async_trait;

pub struct LibSqlBackend {
    db: Database,
}

impl LibSqlBackend {
    pub fn new(db: Database) -> Self {
        Self { db }
    }
}

#[async_trait]
impl FinancialItemStore for LibSqlBackend {
    async fn insert_financial_item(&self, item: &FinancialItem) -> Result<bool> {
        let conn = self.db.connect().await?;
        FinancialItemRepository::insert_if_absent(&conn, item).await
    }
    async fn get_financial_item_by_message_id(
        &self,
        owner_email: &str,
        message_id: &str,
    ) -> Result<Option<FinancialItem>> {
        let conn = self.db.connect().await?;
        FinancialItemRepository::get_by_message_id(&conn, owner_email, message_id).await
    }
    async fn find_latest_financial_item_by_keyword(
        &self,
        owner_email: &str,
        keyword: &str,
    ) -> Result<Option<FinancialItem>> {
        let conn = self.db.connect().await?;
        FinancialItemRepository::find_latest_by_keyword(&conn, owner_email, keyword).await
    }
    async fn list_financial_items(&self, owner_email: &str) -> Result<Vec<FinancialItem>> {
        let conn = self.db.connect().await?;
        FinancialItemRepository::list_by_owner(&conn, owner_email).await
    }
    async fn delete_financial_item(&self, owner_email: &str, id: &str) -> Result<bool> {
        let conn = self.db.connect().await?;
        FinancialItemRepository::delete(&conn, owner_email, id).await
    }
}

#[async_trait]
impl HighlightStore for LibSqlBackend {
    async fn insert_highlight(&self, highlight: &ContextHighlight) -> Result<()> {
        let conn = self.db.connect().await?;
        HighlightRepository::insert(&conn, highlight).await
    }
    async fn list_highlights(&self, owner_email: &str) -> Result<Vec<ContextHighlight>> {
        let conn = self.db.connect().await?;
        HighlightRepository::list_by_owner(&conn, owner_email).await
    }
}

#[async_trait]
impl DatabaseBackend for LibSqlBackend {
    async fn sync(&self) -> Result<()> {
        self.db.sync().await
    }
}
