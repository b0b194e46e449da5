//! Turns a raw inbound-mail webhook body into an owner and a plain-text email.

use std::sync::OnceLock;

use mailparse::MailAddr;
use regex::Regex;
use serde_json::Value;

use super::{SkipReason, Stage};

/// Width handed to the HTML renderer. Large enough that it never wraps a sentence.
const HTML_RENDER_WIDTH: usize = 10_000;

/// An inbound email with a determined owner. Optional headers are trimmed and
/// absent when blank.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundEmail {
    pub owner: String,
    /// Raw `From` header, kept for vendor matching against the display name.
    pub sender_header: Option<String>,
    pub subject: Option<String>,
    pub body: String,
    pub date_header: Option<String>,
    pub message_id: Option<String>,
}

impl InboundEmail {
    pub fn subject_or_empty(&self) -> &str {
        self.subject.as_deref().unwrap_or("")
    }
}

fn angle_address_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"<\s*([^<>\s]+@[^<>\s]+)\s*>").expect("invalid angle address regex"))
}

/// Normalize raw webhook bytes. Anything that is not a JSON object, or carries
/// no usable sender, is an undeterminable sender.
pub fn normalize(raw: &[u8]) -> Stage<InboundEmail> {
    match serde_json::from_slice::<Value>(raw) {
        Ok(payload) => normalize_payload(&payload),
        Err(e) => {
            tracing::debug!(error = %e, "Inbound payload is not JSON");
            Stage::Skip(SkipReason::UndeterminableSender)
        }
    }
}

pub fn normalize_payload(payload: &Value) -> Stage<InboundEmail> {
    let Some(fields) = payload.as_object() else {
        return Stage::Skip(SkipReason::UndeterminableSender);
    };
    let text = |key: &str| {
        fields
            .get(key)
            .and_then(Value::as_str)
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
    };

    let sender_header = text("From");
    let owner = fields
        .get("FromFull")
        .and_then(owner_from_structured)
        .or_else(|| sender_header.as_deref().and_then(owner_from_header));

    let Some(owner) = owner else {
        return Stage::Skip(SkipReason::UndeterminableSender);
    };

    let body = text("TextBody")
        .or_else(|| text("HtmlBody").and_then(|html| html_to_text(&html)))
        .unwrap_or_default();

    Stage::Ready(InboundEmail {
        owner,
        sender_header,
        subject: text("Subject"),
        body,
        date_header: text("Date"),
        message_id: text("MessageID"),
    })
}

/// `FromFull` as an object, or the first entry of an array that carries an address.
fn owner_from_structured(value: &Value) -> Option<String> {
    match value {
        Value::Object(entry) => entry.get("Email").and_then(Value::as_str).and_then(canonical_address),
        Value::Array(entries) => entries.iter().find_map(|entry| {
            entry
                .get("Email")
                .and_then(Value::as_str)
                .and_then(canonical_address)
        }),
        _ => None,
    }
}

/// `Name <addr>` or a bare `addr`.
fn owner_from_header(header: &str) -> Option<String> {
    if let Ok(list) = mailparse::addrparse(header) {
        let parsed = list.iter().find_map(|addr| match addr {
            MailAddr::Single(info) => canonical_address(&info.addr),
            MailAddr::Group(group) => group.addrs.iter().find_map(|i| canonical_address(&i.addr)),
        });
        if parsed.is_some() {
            return parsed;
        }
    }

    if let Some(caps) = angle_address_re().captures(header) {
        return canonical_address(&caps[1]);
    }

    if !header.contains('<') {
        return canonical_address(header);
    }

    None
}

fn canonical_address(raw: &str) -> Option<String> {
    let addr = raw.trim().trim_matches(|c| c == '<' || c == '>').trim();
    let (local, domain) = addr.split_once('@')?;
    if local.is_empty() || domain.is_empty() || addr.chars().any(char::is_whitespace) {
        return None;
    }
    Some(addr.to_lowercase())
}

fn html_to_text(html: &str) -> Option<String> {
    match html2text::from_read(html.as_bytes(), HTML_RENDER_WIDTH) {
        Ok(text) => Some(text.trim().to_string()).filter(|t| !t.is_empty()),
        Err(e) => {
            tracing::debug!(error = %e, "Failed to render HTML body");
            None
        }
    }
}
