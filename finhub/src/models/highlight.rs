use chrono::{DateTime, Utc};
use nanoid::nanoid;
use serde::{Deserialize, Serialize};

use super::Sentiment;

/// Reserved indicator for a highlight synthesized from the body when no sentence qualified.
pub const GENERAL_CONTEXT_INDICATOR: &str = "general_context";

/// A highlight as produced by the extractor, before it has an id or a link.
#[derive(Debug, Clone, PartialEq)]
pub struct HighlightCandidate {
    pub product_keyword: Option<String>,
    pub highlight_text: String,
    pub indicator_keyword: String,
    pub sentiment: Sentiment,
}

impl HighlightCandidate {
    pub fn is_fallback(&self) -> bool {
        self.indicator_keyword == GENERAL_CONTEXT_INDICATOR
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ContextHighlight {
    pub id: String,
    pub owner_email: String,
    pub product_keyword: Option<String>,
    pub highlight_text: String,
    pub indicator_keyword: String,
    pub sentiment: Sentiment,
    pub source_email_subject: Option<String>,
    pub source_email_message_id: Option<String>,
    pub financial_item_id: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl ContextHighlight {
    pub fn from_candidate(
        candidate: HighlightCandidate,
        owner_email: &str,
        subject: Option<&str>,
        message_id: Option<&str>,
        financial_item_id: Option<String>,
    ) -> Self {
        Self {
            id: nanoid!(),
            owner_email: owner_email.to_string(),
            product_keyword: candidate.product_keyword,
            highlight_text: candidate.highlight_text,
            indicator_keyword: candidate.indicator_keyword,
            sentiment: candidate.sentiment,
            source_email_subject: subject.map(str::to_string),
            source_email_message_id: message_id.map(str::to_string),
            financial_item_id,
            created_at: Utc::now(),
        }
    }
}
