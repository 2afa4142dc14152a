//! Heading-aware semantic chunking.
//!
//! Documents are first cut at numbered-heading boundaries ("3.1 Eligibility"
//! style), then each section is split into size-bounded, overlapping chunks
//! that prefer to break on paragraph, sentence, and word boundaries over hard
//! character cuts.

use std::sync::LazyLock;

use regex::Regex;

/// A newline followed by a numbered heading such as `3` or `3.1.2 Applicants`.
static HEADING_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n\d+(?:\.\d+)*\s+[A-Z]").unwrap());

/// Tuning for [`split_text`].
#[derive(Debug, Clone)]
pub struct ChunkerConfig {
    /// Target maximum chunk size, in bytes of ASCII-dominant text.
    pub chunk_size: usize,
    /// How far consecutive chunks overlap.
    pub chunk_overlap: usize,
    /// Sections shorter than this many characters are dropped whole.
    pub min_section_chars: usize,
    /// Chunks shorter than this many characters are dropped.
    pub min_chunk_chars: usize,
}

impl Default for ChunkerConfig {
    fn default() -> Self {
        Self {
            chunk_size: 600,
            chunk_overlap: 80,
            min_section_chars: 50,
            min_chunk_chars: 50,
        }
    }
}

impl ChunkerConfig {
    #[must_use]
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    #[must_use]
    pub fn with_chunk_overlap(mut self, chunk_overlap: usize) -> Self {
        self.chunk_overlap = chunk_overlap;
        self
    }

    #[must_use]
    pub fn with_min_section_chars(mut self, min_section_chars: usize) -> Self {
        self.min_section_chars = min_section_chars;
        self
    }

    #[must_use]
    pub fn with_min_chunk_chars(mut self, min_chunk_chars: usize) -> Self {
        self.min_chunk_chars = min_chunk_chars;
        self
    }
}

/// Splits a document into chunk texts.
///
/// Sections shorter than `min_section_chars` and chunks shorter than
/// `min_chunk_chars` are discarded. Output order follows document order.
pub fn split_text(text: &str, config: &ChunkerConfig) -> Vec<String> {
    let mut chunks = Vec::new();
    for section in split_sections(text) {
        let section = section.trim();
        if section.chars().count() < config.min_section_chars {
            continue;
        }
        for chunk in split_section(section, config) {
            let chunk = chunk.trim();
            if chunk.chars().count() < config.min_chunk_chars {
                continue;
            }
            chunks.push(chunk.to_string());
        }
    }
    chunks
}

/// Cuts the text ahead of each numbered heading that starts a new line.
///
/// The heading itself stays attached to the section it opens. Text with no
/// heading boundaries comes back as a single section.
fn split_sections(text: &str) -> Vec<&str> {
    let mut sections = Vec::new();
    let mut start = 0;
    for m in HEADING_RE.find_iter(text) {
        if m.start() > start {
            sections.push(&text[start..m.start()]);
        }
        // Skip the leading newline so the heading opens the next section.
        start = m.start() + 1;
    }
    if start < text.len() {
        sections.push(&text[start..]);
    }
    sections
}

/// Sliding-window split of one section into overlapping chunks.
fn split_section(section: &str, config: &ChunkerConfig) -> Vec<String> {
    let len = section.len();
    if len <= config.chunk_size {
        return vec![section.to_string()];
    }

    let mut chunks = Vec::new();
    let mut start = 0;
    while start < len {
        let mut end = (start + config.chunk_size).min(len);
        while end < len && !section.is_char_boundary(end) {
            end -= 1;
        }

        let window = &section[start..end];
        let cut = if end < len {
            start + find_break_point(window)
        } else {
            end
        };

        chunks.push(section[start..cut].to_string());
        if cut >= len {
            break;
        }

        // Step back to overlap with the previous chunk, but always advance.
        let mut next = cut.saturating_sub(config.chunk_overlap).max(start + 1);
        while !section.is_char_boundary(next) {
            next += 1;
        }
        if next <= start {
            next = cut;
        }
        start = next;
    }
    chunks
}

/// Picks the best break position within a window, preferring paragraph
/// breaks, then sentence ends, then any newline, then a space. Boundaries in
/// the first third of the window are ignored so chunks do not collapse. Falls
/// back to the full window when nothing qualifies.
fn find_break_point(window: &str) -> usize {
    let min_pos = window.len() / 3;

    if let Some(pos) = window.rfind("\n\n") {
        if pos > min_pos {
            return pos + 2;
        }
    }
    for pattern in [". ", "! ", "? "] {
        if let Some(pos) = window.rfind(pattern) {
            if pos > min_pos {
                return pos + 2;
            }
        }
    }
    if let Some(pos) = window.rfind('\n') {
        if pos > min_pos {
            return pos + 1;
        }
    }
    if let Some(pos) = window.rfind(' ') {
        if pos > min_pos {
            return pos + 1;
        }
    }
    window.len()
}
