use std::collections::HashSet;
use std::sync::Arc;

use crate::db::DatabaseBackend;
use crate::error::{FinhubError, Result};
use crate::models::{ContextHighlight, FinancialItem};

/// A stored item with the highlights that describe it.
#[derive(Debug, Clone, PartialEq)]
pub struct FinancialItemWithContext {
    pub item: FinancialItem,
    pub context_highlights: Vec<ContextHighlight>,
}

/// Read and administrative operations over one owner's records.
#[derive(Clone)]
pub struct FinancialItemService {
    db: Arc<dyn DatabaseBackend>,
}

impl FinancialItemService {
    pub fn new(db: Arc<dyn DatabaseBackend>) -> Self {
        Self { db }
    }

    /// Items newest first, each with its linked highlights followed by any
    /// unlinked highlight whose keyword mentions the item.
    ///
    /// The keyword match runs at read time, so a highlight that arrived
    /// before its item still shows up once the item exists.
    pub async fn list_with_context(&self, owner_email: &str) -> Result<Vec<FinancialItemWithContext>> {
        let owner = normalize_owner(owner_email)?;
        let items = self.db.list_financial_items(&owner).await?;
        if items.is_empty() {
            return Ok(Vec::new());
        }
        let highlights = self.db.list_highlights(&owner).await?;

        tracing::debug!(
            owner = %owner,
            items = items.len(),
            highlights = highlights.len(),
            "Assembling financial items with context"
        );

        Ok(items
            .into_iter()
            .map(|item| {
                let context_highlights = context_for(&item, &highlights);
                FinancialItemWithContext {
                    item,
                    context_highlights,
                }
            })
            .collect())
    }

    pub async fn delete(&self, owner_email: &str, item_id: &str) -> Result<()> {
        let owner = normalize_owner(owner_email)?;
        if !self.db.delete_financial_item(&owner, item_id).await? {
            return Err(FinhubError::NotFound(format!(
                "Financial item {item_id} not found"
            )));
        }
        tracing::info!(owner = %owner, item_id, "Financial item deleted");
        Ok(())
    }
}

fn normalize_owner(owner_email: &str) -> Result<String> {
    let owner = owner_email.trim().to_lowercase();
    if owner.is_empty() {
        return Err(FinhubError::Validation(
            "Owner email is required".to_string(),
        ));
    }
    Ok(owner)
}

/// The first non-blank of vendor, product and category.
fn read_keyword(item: &FinancialItem) -> Option<String> {
    [
        Some(item.vendor_name.as_str()),
        item.product_name.as_deref(),
        Some(item.category.as_str()),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|k| !k.is_empty())
    .map(str::to_lowercase)
}

fn context_for(item: &FinancialItem, highlights: &[ContextHighlight]) -> Vec<ContextHighlight> {
    let keyword = read_keyword(item);
    let mut seen = HashSet::new();

    let linked = highlights
        .iter()
        .filter(|h| h.financial_item_id.as_deref() == Some(item.id.as_str()));
    let by_keyword = highlights.iter().filter(|h| {
        h.financial_item_id.is_none()
            && match (&keyword, h.product_keyword.as_deref()) {
                (Some(keyword), Some(product)) => product.to_lowercase().contains(keyword),
                _ => false,
            }
    });

    linked
        .chain(by_keyword)
        .filter(|h| seen.insert(h.id.as_str()))
        .cloned()
        .collect()
}
