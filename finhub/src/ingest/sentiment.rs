//! Lexicon polarity: the sum of word valences divided by the number of words.

use unicode_segmentation::UnicodeSegmentation;

use crate::models::Sentiment;

use super::lexicon::{valence, NEGATORS};

/// Average valence per word. A negator flips the next word that has a valence.
pub fn polarity(text: &str) -> f64 {
    let normalized = text.replace('\u{2019}', "'").to_lowercase();
    let words: Vec<&str> = normalized.unicode_words().collect();
    if words.is_empty() {
        return 0.0;
    }

    let mut total: i32 = 0;
    let mut negate = false;
    for word in &words {
        if NEGATORS.contains(word) {
            negate = true;
            continue;
        }
        if let Some(v) = valence(word) {
            let v = i32::from(v);
            total += if negate { -v } else { v };
            negate = false;
        }
    }

    f64::from(total) / words.len() as f64
}

pub fn sentiment_of(text: &str) -> Sentiment {
    Sentiment::from_score(polarity(text))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_threshold_stays_neutral() {
        // 3 / 10 words
        let text = "The plan is good for the whole family this year";
        assert_eq!(polarity(text), 0.3);
        assert_eq!(sentiment_of(text), Sentiment::Neutral);

        let text = "The plan is bad for the whole family this year";
        assert_eq!(polarity(text), -0.3);
        assert_eq!(sentiment_of(text), Sentiment::Neutral);
    }

    #[test]
    fn test_just_past_threshold() {
        // 3 / 9 words
        assert_eq!(
            sentiment_of("The plan is good for the whole family now"),
            Sentiment::Positive
        );
        assert_eq!(
            sentiment_of("The plan is bad for the whole family now"),
            Sentiment::Negative
        );
    }

    #[test]
    fn test_negation_flips_next_scored_word() {
        assert!(polarity("this is not good") < 0.0);
        assert!(polarity("it doesn\u{2019}t crash anymore") > 0.0);
        assert_eq!(sentiment_of("I love it"), Sentiment::Positive);
    }

    #[test]
    fn test_empty_and_unscored_text() {
        assert_eq!(polarity(""), 0.0);
        assert_eq!(polarity("   ...   "), 0.0);
        assert_eq!(sentiment_of("Invoice number 12345 attached"), Sentiment::Neutral);
    }
}
