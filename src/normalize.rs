//! Boilerplate stripping for raw extracted text.
//!
//! Scraped pages and PDF text extractions carry page-number artifacts,
//! table-of-contents dot leaders, and bare revision dates that add noise to
//! chunks and embeddings. [`normalize_text`] drops those lines and collapses
//! the remainder into a single whitespace-normalized line.

use std::sync::LazyLock;

use regex::Regex;

/// Lines made up only of digits, dots, and whitespace (page-number artifacts).
static PAGE_ARTIFACT_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[.\d\s]+$").unwrap());

/// Runs of five or more dots (table-of-contents leaders).
static DOT_LEADER_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.{5,}").unwrap());

/// Bare ISO dates (`YYYY-MM-DD`), common as standalone revision stamps.
static ISO_DATE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static WHITESPACE_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s+").unwrap());

/// Strips junk lines and normalizes whitespace.
///
/// Rules applied per line, in order, dropping any line that matches:
///
/// 1. empty after trimming;
/// 2. composed entirely of digits, dots, and whitespace;
/// 3. containing a run of 5+ consecutive dots;
/// 4. exactly matching `YYYY-MM-DD`.
///
/// Surviving lines are joined with single spaces, internal whitespace runs
/// collapsed, and the result trimmed. Empty input yields empty output.
pub fn normalize_text(raw: &str) -> String {
    let mut kept: Vec<&str> = Vec::new();
    for line in raw.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if PAGE_ARTIFACT_RE.is_match(line) {
            continue;
        }
        if DOT_LEADER_RE.is_match(line) {
            continue;
        }
        if ISO_DATE_RE.is_match(line) {
            continue;
        }
        kept.push(line);
    }

    let joined = kept.join(" ");
    WHITESPACE_RE.replace_all(&joined, " ").trim().to_string()
}
