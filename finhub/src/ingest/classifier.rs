//! Cheap gate in front of the extraction oracle. Biased toward recall: a false
//! positive costs one oracle call, a false negative loses a transaction.

use super::intake::InboundEmail;
use super::lexicon::{contains_term, FINANCIAL_KEYWORDS, KNOWN_VENDOR_TOKENS};

/// Why an email was judged worth extracting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FinancialSignal {
    Keyword(&'static str),
    Vendor(&'static str),
}

pub fn classify(email: &InboundEmail) -> Option<FinancialSignal> {
    let sender = [email.sender_header.as_deref().unwrap_or(""), email.owner.as_str()].join(" ");
    classify_text(email.subject_or_empty(), &email.body, &sender)
}

pub fn classify_text(subject: &str, body: &str, sender: &str) -> Option<FinancialSignal> {
    let content = format!("{subject}\n{body}").to_lowercase();

    if let Some(keyword) = FINANCIAL_KEYWORDS.iter().find(|k| content.contains(*k)) {
        return Some(FinancialSignal::Keyword(*keyword));
    }

    let sender = sender.to_lowercase();
    KNOWN_VENDOR_TOKENS
        .iter()
        .find(|vendor| sender.contains(*vendor) && contains_term(&content, vendor))
        .map(|vendor| FinancialSignal::Vendor(*vendor))
}
