//! Attaches highlights to the financial item they talk about.

use std::collections::HashMap;
use std::sync::Arc;

use crate::db::{DatabaseBackend, FinancialItemStore};
use crate::models::{FinancialItem, HighlightCandidate};

/// Resolves link targets for the highlights of one delivery.
///
/// Keyword lookups are memoized for the lifetime of the linker, so build one
/// per delivery.
pub struct EntityLinker<'a> {
    store: Arc<dyn DatabaseBackend>,
    owner_email: &'a str,
    same_email_item: Option<&'a FinancialItem>,
    cache: HashMap<String, Option<FinancialItem>>,
}

impl<'a> EntityLinker<'a> {
    pub fn new(
        store: Arc<dyn DatabaseBackend>,
        owner_email: &'a str,
        same_email_item: Option<&'a FinancialItem>,
    ) -> Self {
        Self {
            store,
            owner_email,
            same_email_item,
            cache: HashMap::new(),
        }
    }

    /// Id of the item this highlight should link to, if any.
    ///
    /// The item written for this email is the only candidate when it exists;
    /// otherwise the owner's most recent item matching the keyword is. Either
    /// way the candidate must actually mention the keyword, and a highlight
    /// without a keyword links only to the same-email item.
    pub async fn link(&mut self, highlight: &HighlightCandidate) -> Option<String> {
        let keyword = highlight
            .product_keyword
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty());

        if let Some(item) = self.same_email_item {
            return match keyword {
                None => Some(item.id.clone()),
                Some(keyword) if item.mentions(keyword) => Some(item.id.clone()),
                Some(_) => None,
            };
        }

        let keyword = keyword?;
        let candidate = self.lookup(keyword).await?;
        candidate.mentions(keyword).then(|| candidate.id.clone())
    }

    async fn lookup(&mut self, keyword: &str) -> Option<&FinancialItem> {
        let cache_key = keyword.to_lowercase();
        if !self.cache.contains_key(&cache_key) {
            let found = match self
                .store
                .find_latest_financial_item_by_keyword(self.owner_email, keyword)
                .await
            {
                Ok(found) => found,
                Err(e) => {
                    tracing::warn!(keyword, error = %e, "Keyword lookup failed, leaving highlight unlinked");
                    None
                }
            };
            self.cache.insert(cache_key.clone(), found);
        }
        self.cache.get(&cache_key).and_then(Option::as_ref)
    }
}
