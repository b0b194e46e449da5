//! Mines sentences that carry decision context about a product.
//!
//! Pure and deterministic: the same text and tables always produce the same
//! candidates in the same order.

use unicode_segmentation::UnicodeSegmentation;

use crate::models::{HighlightCandidate, GENERAL_CONTEXT_INDICATOR};

use super::lexicon::{contains_term, HighlightTables};
use super::sentiment::sentiment_of;

/// Inclusive character bounds for a kept sentence.
pub const MIN_HIGHLIGHT_CHARS: usize = 16;
pub const MAX_HIGHLIGHT_CHARS: usize = 399;

/// Inclusive body length bounds for the synthesized fallback.
pub const FALLBACK_MIN_BODY_CHARS: usize = 51;
pub const FALLBACK_MAX_BODY_CHARS: usize = 1999;
pub const FALLBACK_SNIPPET_CHARS: usize = 250;

#[derive(Debug, Clone)]
pub struct HighlightExtractor {
    services: Vec<String>,
    indicators: Vec<(String, String)>,
}

impl Default for HighlightExtractor {
    fn default() -> Self {
        Self::new(HighlightTables::default())
    }
}

impl HighlightExtractor {
    pub fn new(tables: HighlightTables) -> Self {
        Self {
            services: tables.known_services,
            indicators: tables
                .indicator_phrases
                .into_iter()
                .map(|phrase| (phrase.to_lowercase(), phrase))
                .collect(),
        }
    }

    pub fn extract(&self, subject: &str, body: &str) -> Vec<HighlightCandidate> {
        if body.trim().is_empty() {
            return Vec::new();
        }

        let email_keyword = self.email_keyword(subject, body);
        let text = reflow(body);

        let highlights: Vec<HighlightCandidate> = text
            .split_sentence_bounds()
            .filter_map(|sentence| self.qualify(sentence, email_keyword))
            .collect();

        if !highlights.is_empty() {
            return highlights;
        }

        let body_chars = body.chars().count();
        match email_keyword {
            Some(keyword)
                if (FALLBACK_MIN_BODY_CHARS..=FALLBACK_MAX_BODY_CHARS).contains(&body_chars) =>
            {
                vec![general_context(keyword, body)]
            }
            _ => Vec::new(),
        }
    }

    /// First known service (in table order) mentioned anywhere in subject or body.
    pub fn email_keyword(&self, subject: &str, body: &str) -> Option<&str> {
        let haystack = format!("{subject}\n{body}").to_lowercase();
        self.service_in(&haystack)
    }

    fn service_in(&self, haystack_lower: &str) -> Option<&str> {
        self.services
            .iter()
            .find(|service| contains_term(haystack_lower, service))
            .map(String::as_str)
    }

    fn qualify(&self, sentence: &str, email_keyword: Option<&str>) -> Option<HighlightCandidate> {
        let cleaned = strip_quote_markers(sentence);
        let length = cleaned.chars().count();
        if !(MIN_HIGHLIGHT_CHARS..=MAX_HIGHLIGHT_CHARS).contains(&length) {
            return None;
        }

        let lower = cleaned.to_lowercase();
        let (_, indicator) = self
            .indicators
            .iter()
            .find(|(needle, _)| lower.contains(needle.as_str()))?;

        let keyword = self.service_in(&lower).or(email_keyword);

        Some(HighlightCandidate {
            product_keyword: keyword.map(str::to_string),
            highlight_text: cleaned.to_string(),
            indicator_keyword: indicator.clone(),
            sentiment: sentiment_of(cleaned),
        })
    }
}

fn general_context(keyword: &str, body: &str) -> HighlightCandidate {
    let excerpt: String = body.chars().take(FALLBACK_SNIPPET_CHARS).collect();
    let snippet = excerpt.split_whitespace().collect::<Vec<_>>().join(" ");

    HighlightCandidate {
        product_keyword: Some(keyword.to_string()),
        highlight_text: format!("General context about {keyword}: {snippet}..."),
        indicator_keyword: GENERAL_CONTEXT_INDICATOR.to_string(),
        sentiment: sentiment_of(&snippet),
    }
}

/// Trim and drop any leading `>` quote markers.
pub fn strip_quote_markers(text: &str) -> &str {
    let mut rest = text.trim();
    while let Some(stripped) = rest.strip_prefix('>') {
        rest = stripped.trim_start();
    }
    rest.trim_end()
}

/// Join hard-wrapped lines into paragraphs so a sentence is not cut at a line
/// break. Quote markers are removed per line; blank lines end a paragraph.
fn reflow(body: &str) -> String {
    let mut paragraphs: Vec<String> = Vec::new();
    let mut current = String::new();

    for line in body.lines() {
        let line = strip_quote_markers(line);
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(std::mem::take(&mut current));
            }
            continue;
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(line);
    }
    if !current.is_empty() {
        paragraphs.push(current);
    }

    paragraphs.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Sentiment;
    use pretty_assertions::assert_eq;

    fn extract(subject: &str, body: &str) -> Vec<HighlightCandidate> {
        HighlightExtractor::default().extract(subject, body)
    }

    #[test]
    fn test_netflix_reason_sentence() {
        let highlights = extract(
            "Your Netflix receipt",
            "Netflix charged you €13.99. The reason for this plan is the 4K streaming support.",
        );

        assert_eq!(highlights.len(), 1);
        assert_eq!(
            highlights[0].highlight_text,
            "The reason for this plan is the 4K streaming support."
        );
        assert_eq!(highlights[0].product_keyword.as_deref(), Some("Netflix"));
        assert_eq!(highlights[0].indicator_keyword, "the reason");
    }

    #[test]
    fn test_length_boundaries() {
        let kept = extract("", "Reason: it works");
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].highlight_text.chars().count(), 16);

        assert!(extract("", "Reason: it work").is_empty());

        let at_max = format!("Because {}.", "x".repeat(390));
        assert_eq!(at_max.chars().count(), 399);
        assert_eq!(extract("", &at_max).len(), 1);

        let too_long = format!("Because {}.", "x".repeat(391));
        assert_eq!(too_long.chars().count(), 400);
        assert!(extract("", &too_long).is_empty());
    }

    #[test]
    fn test_length_is_measured_after_stripping_quotes() {
        // 17 characters with the marker, 15 without.
        assert!(extract("", "> Reason: it work").is_empty());

        let quoted = extract("", "> > We switched to Slack because of threads.");
        assert_eq!(quoted.len(), 1);
        assert_eq!(quoted[0].highlight_text, "We switched to Slack because of threads.");
        assert_eq!(quoted[0].product_keyword.as_deref(), Some("Slack"));
    }

    #[test]
    fn test_sentence_needs_an_indicator() {
        assert!(extract("", "We pay for this service every month without fail.").is_empty());
    }

    #[test]
    fn test_sentence_keyword_overrides_email_keyword() {
        let highlights = extract(
            "Netflix renewal",
            "We kept Netflix. We dropped Hulu because the catalog is thin. The reason is cost.",
        );

        let keywords: Vec<Option<&str>> = highlights
            .iter()
            .map(|h| h.product_keyword.as_deref())
            .collect();
        assert_eq!(keywords, vec![Some("Hulu"), Some("Netflix")]);
    }

    #[test]
    fn test_keyword_may_be_absent() {
        let highlights = extract("Team notes", "We decided to move the budget review to Friday.");
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].product_keyword, None);
    }

    #[test]
    fn test_fallback_for_short_body_with_known_service() {
        let body = "Your plan now includes streaming on every screen in the home";
        assert_eq!(body.chars().count(), 60);

        let highlights = extract("Netflix update", body);
        assert_eq!(highlights.len(), 1);
        assert!(highlights[0].is_fallback());
        assert_eq!(highlights[0].indicator_keyword, GENERAL_CONTEXT_INDICATOR);
        assert_eq!(highlights[0].product_keyword.as_deref(), Some("Netflix"));
        assert_eq!(
            highlights[0].highlight_text,
            format!("General context about Netflix: {body}...")
        );
    }

    #[test]
    fn test_fallback_bounds() {
        let short = "x".repeat(50);
        assert!(extract("Netflix update", &short).is_empty());
        assert_eq!(extract("Netflix update", &"x ".repeat(26)).len(), 1);

        let long = "word ".repeat(400);
        assert!(extract("Netflix update", &long).is_empty());

        assert!(extract("Hello", "Your plan now includes streaming on every screen in the home").is_empty());
    }

    #[test]
    fn test_fallback_snippet_is_collapsed_and_truncated() {
        let body = format!("Line one\n\n   line    two {}", "y".repeat(400));
        let highlights = extract("Spotify", &body[..300]);
        assert_eq!(highlights.len(), 1);
        let text = &highlights[0].highlight_text;
        assert!(text.starts_with("General context about Spotify: Line one line two y"));
        assert!(text.ends_with("..."));
        assert!(text.chars().count() <= MAX_HIGHLIGHT_CHARS);
    }

    #[test]
    fn test_hard_wrapped_sentence_is_kept_whole() {
        let highlights = extract(
            "",
            "> We moved to Figma\n> because the review flow\n> is much faster.",
        );
        assert_eq!(highlights.len(), 1);
        assert_eq!(
            highlights[0].highlight_text,
            "We moved to Figma because the review flow is much faster."
        );
    }

    #[test]
    fn test_sentiment_is_attached() {
        let highlights = extract("", "Unfortunately the app crashes because of a terrible bug.");
        assert_eq!(highlights[0].sentiment, Sentiment::Negative);
    }

    #[test]
    fn test_extraction_is_deterministic() {
        let body = "We switched to Zoom because it is reliable. The problem with Slack huddles is audio.";
        let first = extract("Zoom invoice", body);
        for _ in 0..5 {
            assert_eq!(extract("Zoom invoice", body), first);
        }
    }

    #[test]
    fn test_custom_tables() {
        let extractor = HighlightExtractor::new(HighlightTables {
            known_services: vec!["Acme Cloud".to_string()],
            indicator_phrases: vec!["opted".to_string()],
        });
        let highlights = extractor.extract("", "We opted for Acme Cloud this quarter.");
        assert_eq!(highlights.len(), 1);
        assert_eq!(highlights[0].product_keyword.as_deref(), Some("Acme Cloud"));
        assert_eq!(highlights[0].indicator_keyword, "opted");
    }
}
