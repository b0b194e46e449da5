use std::collections::HashMap;

use crate::config::CurrencyConfig;

use super::lexicon::{contains_term, CURRENCY_HINTS};

/// Amount as presented to the owner.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayAmount {
    pub amount: f64,
    pub currency: String,
    /// The source currency was unknown and the display currency was assumed.
    pub approximate: bool,
}

#[derive(Debug, Clone)]
pub struct CurrencyNormalizer {
    display: String,
    rates: HashMap<String, f64>,
}

impl CurrencyNormalizer {
    pub fn new(config: &CurrencyConfig) -> Self {
        let display = config.display.trim().to_uppercase();
        // A rate for the display currency itself would rescale it.
        let rates = config
            .rates
            .iter()
            .map(|(code, rate)| (code.to_uppercase(), *rate))
            .filter(|(code, _)| *code != display)
            .collect();
        Self { display, rates }
    }

    pub fn display_currency(&self) -> &str {
        &self.display
    }

    /// Rules, first match wins:
    /// 1. already the display currency: unchanged
    /// 2. configured rate: convert and round to cents
    /// 3. unrecognized currency: unchanged, shown in that currency
    /// 4. no currency: unchanged, display currency assumed and flagged
    pub fn convert(&self, amount: f64, currency: Option<&str>) -> DisplayAmount {
        let Some(code) = currency.map(|c| c.trim().to_uppercase()).filter(|c| !c.is_empty())
        else {
            tracing::warn!(
                amount,
                assumed = %self.display,
                "No currency for amount, assuming display currency"
            );
            return DisplayAmount {
                amount,
                currency: self.display.clone(),
                approximate: true,
            };
        };

        if code == self.display {
            return DisplayAmount {
                amount,
                currency: code,
                approximate: false,
            };
        }

        if let Some(rate) = self.rates.get(&code) {
            return DisplayAmount {
                amount: round2(amount * rate),
                currency: self.display.clone(),
                approximate: false,
            };
        }

        tracing::debug!(currency = %code, "No rate configured, keeping original currency");
        DisplayAmount {
            amount,
            currency: code,
            approximate: false,
        }
    }
}

pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Currency suggested by symbols or codes in free text.
pub fn infer_currency(text: &str) -> Option<&'static str> {
    let lower = text.to_lowercase();
    CURRENCY_HINTS
        .iter()
        .find(|(hint, _)| {
            if hint.chars().any(|c| c.is_ascii_alphabetic()) {
                contains_term(&lower, hint)
            } else {
                lower.contains(hint)
            }
        })
        .map(|(_, code)| *code)
}
