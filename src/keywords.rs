//! Keyword extraction for chunk diagnostics.

use std::collections::BTreeSet;

/// Maximum number of keywords attached to a chunk.
pub const MAX_KEYWORDS: usize = 15;

/// Short function words excluded from keyword lists.
const STOPWORDS: &[&str] = &[
    "this", "that", "with", "from", "they", "them", "have", "which", "shall",
];

/// Derives up to [`MAX_KEYWORDS`] representative tokens for a chunk.
///
/// Tokens are maximal ASCII-alphabetic runs of length >= 4, lowercased,
/// deduplicated, stopwords removed, and returned in lexicographic order.
/// Purely diagnostic; retrieval scoring never consults keywords.
pub fn extract_keywords(text: &str) -> Vec<String> {
    let mut tokens: BTreeSet<String> = BTreeSet::new();
    for token in text.split(|c: char| !c.is_ascii_alphabetic()) {
        if token.len() < 4 {
            continue;
        }
        let lower = token.to_ascii_lowercase();
        if STOPWORDS.contains(&lower.as_str()) {
            continue;
        }
        tokens.insert(lower);
    }
    tokens.into_iter().take(MAX_KEYWORDS).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lowercases_sorts_and_dedupes() {
        let keywords = extract_keywords("Permit renewal PERMIT applicants Renewal");
        assert_eq!(keywords, vec!["applicants", "permit", "renewal"]);
    }

    #[test]
    fn skips_short_tokens_and_stopwords() {
        let keywords = extract_keywords("they have fees due this week");
        assert_eq!(keywords, vec!["fees", "week"]);
    }

    #[test]
    fn splits_on_non_alphabetic_characters() {
        let keywords = extract_keywords("study-permit fees: $155");
        assert_eq!(keywords, vec!["fees", "permit", "study"]);
    }

    #[test]
    fn caps_at_fifteen_keywords() {
        let text = "alpha bravo charlie delta echo foxtrot golf hotel india juliett \
                    kilo lima mike november oscar papa quebec romeo sierra tango";
        let keywords = extract_keywords(text);
        assert_eq!(keywords.len(), MAX_KEYWORDS);
        // Lexicographic order means the cap keeps the first 15 sorted tokens.
        assert_eq!(keywords.first().map(String::as_str), Some("alpha"));
    }

    #[test]
    fn empty_text_yields_no_keywords() {
        assert!(extract_keywords("").is_empty());
        assert!(extract_keywords("a an 123").is_empty());
    }
}
