mod financial_items;
mod highlights;

pub use financial_items::FinancialItemRepository;
pub use highlights::HighlightRepository;

use chrono::{DateTime, SecondsFormat, Utc};

/// Fixed-width UTC timestamps so that text ordering matches time ordering.
pub(crate) fn format_timestamp(ts: &DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .ok()
}
