use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

use super::BillingCycle;

pub const DEFAULT_CATEGORY: &str = "Other";

/// One detected transaction, partitioned by `owner_email`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FinancialItem {
    pub id: String,
    pub owner_email: String,
    pub vendor_name: String,
    pub product_name: Option<String>,
    pub original_amount: Option<f64>,
    pub original_currency: Option<String>,
    pub amount_display: Option<f64>,
    pub currency_display: Option<String>,
    /// Set when the display currency was assumed rather than read from the email.
    pub amount_is_approximate: bool,
    pub purchase_date: Option<DateTime<Utc>>,
    pub billing_cycle: BillingCycle,
    pub category: String,
    pub raw_email_subject: Option<String>,
    pub source_email_message_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl FinancialItem {
    pub fn new(owner_email: impl Into<String>, vendor_name: impl Into<String>) -> Self {
        Self {
            id: nanoid!(),
            owner_email: owner_email.into(),
            vendor_name: vendor_name.into(),
            product_name: None,
            original_amount: None,
            original_currency: None,
            amount_display: None,
            currency_display: None,
            amount_is_approximate: false,
            purchase_date: None,
            billing_cycle: BillingCycle::default(),
            category: DEFAULT_CATEGORY.to_string(),
            raw_email_subject: None,
            source_email_message_id: None,
            created_at: Utc::now(),
        }
    }

    /// Case-insensitive substring match against vendor or product name.
    pub fn mentions(&self, keyword: &str) -> bool {
        let needle = keyword.trim().to_lowercase();
        if needle.is_empty() {
            return false;
        }
        self.vendor_name.to_lowercase().contains(&needle)
            || self
                .product_name
                .as_deref()
                .is_some_and(|p| p.to_lowercase().contains(&needle))
    }

    /// Display fields must be absent without an amount, and a display currency must exist with one.
    pub fn display_fields_consistent(&self) -> bool {
        match self.original_amount {
            None => self.amount_display.is_none() && self.currency_display.is_none(),
            Some(_) => self.currency_display.is_some(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_defaults() {
        let item = FinancialItem::new("u@x.com", "Netflix");
        assert_eq!(item.category, "Other");
        assert_eq!(item.billing_cycle, BillingCycle::Unknown);
        assert!(!item.amount_is_approximate);
        assert!(item.display_fields_consistent());
        assert_eq!(item.id.len(), 21);
    }

    #[test]
    fn test_mentions_checks_vendor_and_product() {
        let mut item = FinancialItem::new("u@x.com", "Amazon Web Services");
        item.product_name = Some("Prime Video".to_string());

        assert!(item.mentions("amazon"));
        assert!(item.mentions("PRIME"));
        assert!(!item.mentions("Netflix"));
        assert!(!item.mentions("   "));
    }

    #[test]
    fn test_display_fields_consistency() {
        let mut item = FinancialItem::new("u@x.com", "Zoom");
        item.currency_display = Some("USD".to_string());
        assert!(!item.display_fields_consistent());

        item.original_amount = Some(14.99);
        item.amount_display = Some(14.99);
        assert!(item.display_fields_consistent());
    }
}
