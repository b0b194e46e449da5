//! Declarative lookup tables for the heuristic stages.
//!
//! Everything the classifier, the highlight extractor and the currency
//! inference match against lives here so the stages stay pure functions
//! over data.

use std::collections::HashMap;
use std::sync::OnceLock;

/// Generic words that mark an email as transactional. Matched as substrings,
/// so "payments" and "confirmation" count.
pub const FINANCIAL_KEYWORDS: &[&str] = &[
    "receipt",
    "invoice",
    "payment",
    "bill",
    "order",
    "subscription",
    "charge",
    "confirm",
];

/// Vendor tokens checked against the sender when no financial keyword matched.
pub const KNOWN_VENDOR_TOKENS: &[&str] = &[
    "amazon",
    "netflix",
    "spotify",
    "aws",
    "zoom",
    "microsoft",
    "google",
    "apple",
];

/// Service names a highlight can be about. Order matters: the first entry
/// found wins, so specific names precede the brands they contain.
pub const KNOWN_SERVICES: &[&str] = &[
    "Netflix",
    "Spotify",
    "Amazon Prime",
    "Prime Video",
    "AWS",
    "Amazon",
    "Disney+",
    "Hulu",
    "HBO Max",
    "YouTube Premium",
    "YouTube",
    "Apple Music",
    "iCloud",
    "Apple",
    "Google Workspace",
    "Google Cloud",
    "Google One",
    "Google",
    "Microsoft 365",
    "Azure",
    "Microsoft",
    "Zoom",
    "Slack",
    "GitHub",
    "Notion",
    "Figma",
    "Adobe",
    "Dropbox",
    "Canva",
    "ChatGPT",
    "OpenAI",
    "DigitalOcean",
    "Heroku",
    "Vercel",
    "Uber",
    "Airbnb",
];

/// Phrases signalling reasoning, a decision, a problem or a benefit.
/// Matched case-insensitively as substrings; the first listed match is recorded.
pub const INDICATOR_PHRASES: &[&str] = &[
    "the reason",
    "reason",
    "because",
    "decided",
    "decision",
    "chose",
    "switched",
    "switching",
    "instead of",
    "cancel",
    "downgrade",
    "upgrade",
    "problem",
    "issue",
    "frustrat",
    "disappoint",
    "complain",
    "too expensive",
    "overpriced",
    "not worth",
    "worth it",
    "benefit",
    "helps us",
    "helped",
    "saves",
    "love",
    "prefer",
    "recommend",
    "so that",
    "due to",
    "unfortunately",
];

/// Symbols and codes used to infer a currency when the extractor gave none.
/// Checked in order; ASCII entries are matched as whole words.
pub const CURRENCY_HINTS: &[(&str, &str)] = &[
    ("₹", "INR"),
    ("rs.", "INR"),
    ("inr", "INR"),
    ("€", "EUR"),
    ("eur", "EUR"),
    ("£", "GBP"),
    ("gbp", "GBP"),
    ("$", "USD"),
    ("usd", "USD"),
];

/// Words that flip the polarity of the next scored word.
pub const NEGATORS: &[&str] = &[
    "not", "no", "never", "don't", "doesn't", "didn't", "isn't", "wasn't", "aren't", "won't",
    "can't", "cannot", "hardly", "without",
];

/// AFINN-style valences in [-5, 5] for the vocabulary that shows up in
/// purchase and subscription mail.
const VALENCES: &[(&str, i8)] = &[
    ("amazing", 4),
    ("awesome", 4),
    ("excellent", 3),
    ("fantastic", 4),
    ("great", 3),
    ("good", 3),
    ("nice", 3),
    ("love", 3),
    ("loved", 3),
    ("like", 2),
    ("liked", 2),
    ("enjoy", 2),
    ("enjoyed", 2),
    ("happy", 3),
    ("glad", 3),
    ("pleased", 3),
    ("best", 3),
    ("better", 2),
    ("perfect", 3),
    ("recommend", 2),
    ("worth", 2),
    ("useful", 2),
    ("helpful", 2),
    ("help", 2),
    ("helps", 2),
    ("benefit", 2),
    ("benefits", 2),
    ("support", 2),
    ("reliable", 2),
    ("easy", 1),
    ("fast", 1),
    ("stable", 2),
    ("save", 2),
    ("saves", 2),
    ("savings", 1),
    ("free", 1),
    ("thanks", 2),
    ("thank", 2),
    ("win", 4),
    ("bad", -3),
    ("worse", -3),
    ("worst", -3),
    ("terrible", -3),
    ("awful", -3),
    ("horrible", -3),
    ("hate", -3),
    ("poor", -2),
    ("problem", -2),
    ("problems", -2),
    ("issue", -1),
    ("issues", -1),
    ("broken", -1),
    ("bug", -2),
    ("bugs", -2),
    ("crash", -2),
    ("crashes", -2),
    ("slow", -2),
    ("expensive", -2),
    ("overpriced", -3),
    ("annoying", -2),
    ("frustrated", -2),
    ("frustrating", -2),
    ("disappointed", -2),
    ("disappointing", -2),
    ("complaint", -2),
    ("cancel", -1),
    ("cancelled", -1),
    ("canceled", -1),
    ("fail", -2),
    ("failed", -2),
    ("failure", -2),
    ("error", -2),
    ("errors", -2),
    ("unfortunately", -2),
    ("waste", -1),
    ("wasted", -2),
    ("refund", -1),
    ("fraud", -4),
    ("scam", -2),
    ("confusing", -2),
    ("difficult", -1),
    ("lost", -3),
    ("missing", -2),
    ("late", -1),
    ("delay", -1),
    ("delayed", -1),
];

pub fn valence(word: &str) -> Option<i8> {
    static TABLE: OnceLock<HashMap<&'static str, i8>> = OnceLock::new();
    TABLE
        .get_or_init(|| VALENCES.iter().copied().collect())
        .get(word)
        .copied()
}

/// Tables consumed by the highlight extractor. `Default` is the built-in set.
#[derive(Debug, Clone)]
pub struct HighlightTables {
    pub known_services: Vec<String>,
    pub indicator_phrases: Vec<String>,
}

impl Default for HighlightTables {
    fn default() -> Self {
        Self {
            known_services: KNOWN_SERVICES.iter().map(|s| s.to_string()).collect(),
            indicator_phrases: INDICATOR_PHRASES.iter().map(|s| s.to_string()).collect(),
        }
    }
}

/// Case-insensitive search for `term` in `haystack_lower` that does not start
/// or end inside an alphanumeric run. `haystack_lower` must already be lowercase.
pub fn contains_term(haystack_lower: &str, term: &str) -> bool {
    let needle = term.to_lowercase();
    if needle.is_empty() {
        return false;
    }
    let needs_left = needle.chars().next().is_some_and(char::is_alphanumeric);
    let needs_right = needle.chars().last().is_some_and(char::is_alphanumeric);

    haystack_lower.match_indices(&needle).any(|(start, matched)| {
        let end = start + matched.len();
        let left_ok = !needs_left
            || haystack_lower[..start]
                .chars()
                .next_back()
                .map_or(true, |c| !c.is_alphanumeric());
        let right_ok = !needs_right
            || haystack_lower[end..]
                .chars()
                .next()
                .map_or(true, |c| !c.is_alphanumeric());
        left_ok && right_ok
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_term_respects_word_edges() {
        assert!(contains_term("billed by aws today", "AWS"));
        assert!(!contains_term("consumer laws apply", "aws"));
        assert!(contains_term("from no-reply@netflix.com", "netflix"));
        assert!(contains_term("watch on disney+.", "Disney+"));
        assert!(!contains_term("pineapple juice", "apple"));
        assert!(!contains_term("anything", ""));
    }

    #[test]
    fn test_specific_services_precede_their_brands() {
        let position = |name: &str| KNOWN_SERVICES.iter().position(|s| *s == name).unwrap();
        assert!(position("Amazon Prime") < position("Amazon"));
        assert!(position("AWS") < position("Amazon"));
        assert!(position("YouTube Premium") < position("YouTube"));
        assert!(position("Google Workspace") < position("Google"));
        assert!(position("Apple Music") < position("Apple"));
    }

    #[test]
    fn test_valence_lookup() {
        assert_eq!(valence("great"), Some(3));
        assert_eq!(valence("terrible"), Some(-3));
        assert_eq!(valence("streaming"), None);
    }

    #[test]
    fn test_default_tables_mirror_constants() {
        let tables = HighlightTables::default();
        assert_eq!(tables.known_services.len(), KNOWN_SERVICES.len());
        assert_eq!(tables.indicator_phrases[0], "the reason");
    }
}
