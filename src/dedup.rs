//! Exact-text chunk deduplication.

use std::collections::HashMap;

use crate::types::Chunk;

/// Collapses chunks with identical text down to one entry each.
///
/// Output order is the order in which each distinct text was first seen, but
/// the surviving metadata (source, pages, keywords) comes from the *last*
/// occurrence. Duplicate text across government pages is near-universally
/// boilerplate (fee lines, disclaimers), where any one provenance serves
/// retrieval display equally well.
pub fn dedupe_chunks(chunks: Vec<Chunk>) -> Vec<Chunk> {
    let mut order: Vec<String> = Vec::new();
    let mut by_text: HashMap<String, Chunk> = HashMap::with_capacity(chunks.len());

    for chunk in chunks {
        if !by_text.contains_key(&chunk.text) {
            order.push(chunk.text.clone());
        }
        by_text.insert(chunk.text.clone(), chunk);
    }

    order
        .into_iter()
        .filter_map(|text| by_text.remove(&text))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn chunk(source: &str, text: &str) -> Chunk {
        Chunk {
            source: source.into(),
            page_start: None,
            page_end: None,
            text: text.into(),
            keywords: vec![],
            char_length: text.chars().count(),
        }
    }

    #[test]
    fn keeps_first_seen_order() {
        let chunks = vec![chunk("a.json", "alpha"), chunk("a.json", "beta"), chunk("b.json", "alpha")];
        let deduped = dedupe_chunks(chunks);
        assert_eq!(deduped.len(), 2);
        assert_eq!(deduped[0].text, "alpha");
        assert_eq!(deduped[1].text, "beta");
    }

    #[test]
    fn last_occurrence_metadata_wins() {
        let chunks = vec![chunk("a.json", "Fee: $100 CAD"), chunk("b.json", "Fee: $100 CAD")];
        let deduped = dedupe_chunks(chunks);
        assert_eq!(deduped.len(), 1);
        assert_eq!(deduped[0].source, "b.json");
    }

    #[test]
    fn no_duplicates_is_a_no_op() {
        let chunks = vec![chunk("a.json", "one"), chunk("a.json", "two")];
        assert_eq!(dedupe_chunks(chunks.clone()), chunks);
    }

    #[test]
    fn empty_input_yields_empty_output() {
        assert!(dedupe_chunks(vec![]).is_empty());
    }
}
