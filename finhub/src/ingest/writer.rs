//! Idempotent writes for one delivery.

use std::sync::Arc;

use crate::db::{DatabaseBackend, FinancialItemStore, HighlightStore};
use crate::error::{FinhubError, Result};
use crate::models::{ContextHighlight, FinancialItem};

/// The item that now represents this email in storage.
#[derive(Debug, Clone)]
pub struct WrittenItem {
    pub item: FinancialItem,
    /// The email had been processed before; `item` is the stored row.
    pub duplicate: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WriteReport {
    pub saved: usize,
    pub failed: usize,
    pub linked: usize,
}

pub struct PersistenceWriter {
    store: Arc<dyn DatabaseBackend>,
}

impl PersistenceWriter {
    pub fn new(store: Arc<dyn DatabaseBackend>) -> Self {
        Self { store }
    }

    /// Insert the item, or return the row already stored for the same
    /// (owner, message id).
    pub async fn write_item(&self, item: FinancialItem) -> Result<WrittenItem> {
        if self.store.insert_financial_item(&item).await? {
            return Ok(WrittenItem {
                item,
                duplicate: false,
            });
        }

        let message_id = item.source_email_message_id.as_deref().ok_or_else(|| {
            FinhubError::Internal("Insert without message id was not applied".to_string())
        })?;
        let existing = self
            .store
            .get_financial_item_by_message_id(&item.owner_email, message_id)
            .await?
            .ok_or_else(|| {
                FinhubError::Internal(format!(
                    "Conflicting financial item for message {message_id} could not be read back"
                ))
            })?;

        tracing::info!(
            item_id = %existing.id,
            message_id,
            "Email already processed, reusing stored financial item"
        );
        Ok(WrittenItem {
            item: existing,
            duplicate: true,
        })
    }

    /// Write each highlight on its own; a failed write is logged and skipped.
    pub async fn write_highlights(&self, highlights: &[ContextHighlight]) -> WriteReport {
        let mut report = WriteReport::default();
        for highlight in highlights {
            match self.store.insert_highlight(highlight).await {
                Ok(()) => {
                    report.saved += 1;
                    if highlight.financial_item_id.is_some() {
                        report.linked += 1;
                    }
                }
                Err(e) => {
                    report.failed += 1;
                    tracing::warn!(
                        highlight_id = %highlight.id,
                        error = %e,
                        "Failed to save context highlight"
                    );
                }
            }
        }
        report
    }
}
