//! Boundary with the external extraction capability.
//!
//! Whatever comes back is a [`RawFact`]: every field optional and loosely
//! typed. Only [`RawFact::validate`] produces a [`Fact`] the rest of the
//! pipeline can trust.

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

use crate::error::{FinhubError, Result};
use crate::llm::prompts::{financial_extraction_prompt, FINANCIAL_SYSTEM_PROMPT};
use crate::llm::LlmProvider;
use crate::models::BillingCycle;

/// Longest body excerpt sent to the model.
const MAX_PROMPT_BODY_CHARS: usize = 12_000;

/// "Given subject and body, return a structured guess or nothing."
#[async_trait]
pub trait FactOracle: Send + Sync {
    /// `false` means every email is treated as non-financial.
    fn is_available(&self) -> bool {
        true
    }

    async fn extract(&self, subject: &str, body: &str) -> Result<Option<RawFact>>;
}

/// Extractor output before validation.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
#[serde(default)]
pub struct RawFact {
    pub vendor_name: Option<Value>,
    pub product_name: Option<Value>,
    pub original_amount: Option<Value>,
    /// Older prompts asked for `price` alongside `original_amount`.
    pub price: Option<Value>,
    #[serde(alias = "currency")]
    pub original_currency: Option<Value>,
    pub purchase_date: Option<Value>,
    pub billing_cycle: Option<Value>,
    pub category: Option<Value>,
}

/// A validated extraction: a vendor and a finite amount are guaranteed.
#[derive(Debug, Clone, PartialEq)]
pub struct Fact {
    pub vendor_name: String,
    pub product_name: Option<String>,
    pub original_amount: f64,
    /// Uppercase 3-letter code, when the extractor gave a usable one.
    pub original_currency: Option<String>,
    pub purchase_date: Option<String>,
    pub billing_cycle: BillingCycle,
    pub category: Option<String>,
}

impl RawFact {
    /// `None` when the vendor or the amount is missing or unusable.
    pub fn validate(self) -> Option<Fact> {
        let vendor_name = text(self.vendor_name.as_ref())?;
        let original_amount = self
            .original_amount
            .as_ref()
            .and_then(coerce_amount)
            .or_else(|| self.price.as_ref().and_then(coerce_amount))?;

        Some(Fact {
            vendor_name,
            product_name: text(self.product_name.as_ref()),
            original_amount,
            original_currency: text(self.original_currency.as_ref())
                .and_then(|c| coerce_currency(&c)),
            purchase_date: text(self.purchase_date.as_ref()),
            billing_cycle: text(self.billing_cycle.as_ref())
                .map(|c| BillingCycle::from_loose(&c))
                .unwrap_or_default(),
            category: text(self.category.as_ref()),
        })
    }
}

fn text(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(s) => {
            let trimmed = s.trim();
            (!trimmed.is_empty() && !trimmed.eq_ignore_ascii_case("null"))
                .then(|| trimmed.to_string())
        }
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Numbers pass when finite. Strings keep only digits, `.` and `-` before
/// parsing, which drops symbols and thousands separators.
pub fn coerce_amount(value: &Value) -> Option<f64> {
    let amount = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => {
            let cleaned: String = s
                .chars()
                .filter(|c| c.is_ascii_digit() || *c == '.' || *c == '-')
                .collect();
            cleaned.parse::<f64>().ok()
        }
        _ => None,
    }?;
    amount.is_finite().then_some(amount)
}

pub fn coerce_currency(raw: &str) -> Option<String> {
    let code = raw.trim().to_uppercase();
    (code.len() == 3 && code.chars().all(|c| c.is_ascii_alphabetic())).then_some(code)
}

/// Oracle backed by a chat-completion model.
pub struct LlmFactOracle {
    provider: LlmProvider,
}

impl LlmFactOracle {
    pub fn new(provider: LlmProvider) -> Self {
        Self { provider }
    }
}

#[async_trait]
impl FactOracle for LlmFactOracle {
    fn is_available(&self) -> bool {
        self.provider.is_available()
    }

    async fn extract(&self, subject: &str, body: &str) -> Result<Option<RawFact>> {
        if subject.trim().is_empty() && body.trim().is_empty() {
            return Ok(None);
        }

        let excerpt: String = body.chars().take(MAX_PROMPT_BODY_CHARS).collect();
        let prompt = financial_extraction_prompt(subject, &excerpt);
        let value = self
            .provider
            .complete_json(Some(FINANCIAL_SYSTEM_PROMPT), &prompt)
            .await?;

        if !value.is_object() {
            tracing::debug!("Extraction response was not a JSON object");
            return Ok(None);
        }

        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| FinhubError::Llm(format!("Unexpected extraction shape: {e}")))
    }
}
