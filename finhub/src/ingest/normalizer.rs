use chrono::{DateTime, Utc};

use crate::config::CurrencyConfig;
use crate::models::{FinancialItem, DEFAULT_CATEGORY};

use super::currency::{infer_currency, CurrencyNormalizer};
use super::dates::resolve_purchase_date;
use super::intake::InboundEmail;
use super::oracle::Fact;

/// Turns a validated [`Fact`] into a persistable [`FinancialItem`].
#[derive(Debug, Clone)]
pub struct FactNormalizer {
    currency: CurrencyNormalizer,
}

impl FactNormalizer {
    pub fn new(config: &CurrencyConfig) -> Self {
        Self {
            currency: CurrencyNormalizer::new(config),
        }
    }

    pub fn normalize(&self, fact: Fact, email: &InboundEmail, now: DateTime<Utc>) -> FinancialItem {
        // A currency guessed from the text only steers conversion. It is not
        // recorded as the original currency and the result is flagged.
        let display = match fact.original_currency.as_deref() {
            Some(code) => self.currency.convert(fact.original_amount, Some(code)),
            None => {
                let context = format!("{} {}", email.subject_or_empty(), email.body);
                let inferred = infer_currency(&context);
                let mut display = self.currency.convert(fact.original_amount, inferred);
                if let Some(code) = inferred {
                    tracing::debug!(inferred = code, "Currency inferred from email text");
                    display.approximate = true;
                }
                display
            }
        };

        let (purchase_date, date_source) = resolve_purchase_date(
            fact.purchase_date.as_deref(),
            email.date_header.as_deref(),
            now,
        );
        tracing::debug!(?date_source, "Resolved purchase date");

        let mut item = FinancialItem::new(email.owner.clone(), fact.vendor_name);
        item.product_name = fact.product_name;
        item.original_amount = Some(fact.original_amount);
        item.original_currency = fact.original_currency;
        item.amount_display = Some(display.amount);
        item.currency_display = Some(display.currency);
        item.amount_is_approximate = display.approximate;
        item.purchase_date = Some(purchase_date);
        item.billing_cycle = fact.billing_cycle;
        item.category = fact
            .category
            .filter(|c| !c.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_CATEGORY.to_string());
        item.raw_email_subject = email.subject.clone();
        item.source_email_message_id = email.message_id.clone();
        item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::BillingCycle;
    use chrono::TimeZone;

    fn email(subject: &str, body: &str) -> InboundEmail {
        InboundEmail {
            owner: "u@x.com".to_string(),
            sender_header: None,
            subject: Some(subject.to_string()),
            body: body.to_string(),
            date_header: Some("Mon, 3 Jun 2024 10:00:00 +0000".to_string()),
            message_id: Some("m1".to_string()),
        }
    }

    fn fact(currency: Option<&str>, date: Option<&str>) -> Fact {
        Fact {
            vendor_name: "Netflix".to_string(),
            product_name: Some("Premium".to_string()),
            original_amount: 13.99,
            original_currency: currency.map(str::to_string),
            purchase_date: date.map(str::to_string),
            billing_cycle: BillingCycle::Monthly,
            category: None,
        }
    }

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap()
    }

    #[test]
    fn test_normalizes_a_complete_fact() {
        let normalizer = FactNormalizer::new(&CurrencyConfig::default());
        let item = normalizer.normalize(
            fact(Some("EUR"), Some("2024-05-01")),
            &email("Your Netflix receipt", "Netflix charged you 13.99"),
            now(),
        );

        assert_eq!(item.owner_email, "u@x.com");
        assert_eq!(item.original_currency.as_deref(), Some("EUR"));
        assert_eq!(item.amount_display, Some(15.11));
        assert_eq!(item.currency_display.as_deref(), Some("USD"));
        assert!(!item.amount_is_approximate);
        assert_eq!(item.purchase_date, Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()));
        assert_eq!(item.category, "Other");
        assert_eq!(item.source_email_message_id.as_deref(), Some("m1"));
        assert!(item.display_fields_consistent());
    }

    #[test]
    fn test_currency_inferred_from_symbols() {
        let normalizer = FactNormalizer::new(&CurrencyConfig::default());
        let item = normalizer.normalize(fact(None, None), &email("Receipt", "Total £13.99"), now());

        assert_eq!(item.original_currency, None);
        assert_eq!(item.amount_display, Some(17.77));
        assert_eq!(item.currency_display.as_deref(), Some("USD"));
        assert!(item.amount_is_approximate);
    }

    #[test]
    fn test_stray_symbol_does_not_become_the_original_currency() {
        let normalizer = FactNormalizer::new(&CurrencyConfig::default());
        let mut f = fact(None, None);
        f.original_amount = 499.0;
        let item = normalizer.normalize(
            f,
            &email("Order", "Your total was 499.00. Save $5 on your next order!"),
            now(),
        );

        assert_eq!(item.original_currency, None);
        assert_eq!(item.amount_display, Some(499.0));
        assert_eq!(item.currency_display.as_deref(), Some("USD"));
        assert!(item.amount_is_approximate);
        assert!(item.display_fields_consistent());
    }

    #[test]
    fn test_extracted_currency_is_kept_exact() {
        let normalizer = FactNormalizer::new(&CurrencyConfig::default());
        let item = normalizer.normalize(fact(Some("GBP"), None), &email("Receipt", "Total $13.99"), now());

        assert_eq!(item.original_currency.as_deref(), Some("GBP"));
        assert_eq!(item.amount_display, Some(17.77));
        assert!(!item.amount_is_approximate);
    }

    #[test]
    fn test_missing_currency_is_flagged_approximate() {
        let normalizer = FactNormalizer::new(&CurrencyConfig::default());
        let item = normalizer.normalize(fact(None, None), &email("Receipt", "Total 13.99"), now());

        assert_eq!(item.original_currency, None);
        assert_eq!(item.amount_display, Some(13.99));
        assert_eq!(item.currency_display.as_deref(), Some("USD"));
        assert!(item.amount_is_approximate);
        assert!(item.display_fields_consistent());
    }

    #[test]
    fn test_purchase_date_always_set() {
        let normalizer = FactNormalizer::new(&CurrencyConfig::default());
        let item = normalizer.normalize(
            fact(Some("USD"), Some("sometime last week")),
            &email("Receipt", "Total $13.99"),
            now(),
        );
        assert_eq!(
            item.purchase_date,
            Some(Utc.with_ymd_and_hms(2024, 6, 3, 10, 0, 0).unwrap())
        );

        let mut headerless = email("Receipt", "Total $13.99");
        headerless.date_header = None;
        let item = normalizer.normalize(fact(Some("USD"), None), &headerless, now());
        assert_eq!(item.purchase_date, Some(now()));
    }
}
