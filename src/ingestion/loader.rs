//! Directory loading for scraped JSON exports.
//!
//! Each `.json` file in the source directory becomes one or more
//! [`Document`]s. Two payload shapes exist: page-extraction exports (arrays
//! of `{ "text": ..., "page": ... }` objects, or a single such object) and
//! scraped-record arrays handled by [`flatten_records`]. Malformed files are
//! logged and skipped so one bad export never sinks a build.

use std::path::Path;

use serde_json::Value;
use tokio::fs;
use tracing::{debug, warn};

use crate::ingestion::records::flatten_records;
use crate::normalize::normalize_text;
use crate::types::{Document, RagError};

/// Loads every `.json` file under `dir`, in file-name order.
///
/// Returns [`RagError::Ingestion`] only when `dir` itself is unreadable;
/// individual unreadable or unrecognized files are warned about and skipped.
pub async fn load_documents(dir: &Path) -> Result<Vec<Document>, RagError> {
    let mut entries = fs::read_dir(dir)
        .await
        .map_err(|err| RagError::Ingestion(format!("cannot read {}: {err}", dir.display())))?;

    let mut paths = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.extension().is_some_and(|ext| ext == "json") {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::new();
    for path in paths {
        let source = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        let raw = match fs::read_to_string(&path).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(file = %path.display(), %err, "skipping unreadable file");
                continue;
            }
        };
        let value: Value = match serde_json::from_str(&raw) {
            Ok(value) => value,
            Err(err) => {
                warn!(file = %path.display(), %err, "skipping malformed JSON");
                continue;
            }
        };

        let before = documents.len();
        documents_from_value(&source, &value, &mut documents);
        debug!(
            file = %path.display(),
            documents = documents.len() - before,
            "loaded source file"
        );
    }
    Ok(documents)
}

/// Routes one parsed payload to the matching extraction strategy.
fn documents_from_value(source: &str, value: &Value, out: &mut Vec<Document>) {
    match value {
        Value::Array(entries) => {
            let has_text_entries = entries
                .iter()
                .any(|entry| entry.get("text").is_some());
            if has_text_entries {
                for entry in entries {
                    push_page_document(source, entry, out);
                }
            } else if let Some(text) = flatten_records(entries) {
                push_document(source, None, &text, out);
            } else {
                warn!(source, "skipping file with no usable records");
            }
        }
        Value::Object(_) if value.get("text").is_some() => {
            push_page_document(source, value, out);
        }
        _ => {
            warn!(source, "skipping unrecognized payload shape");
        }
    }
}

/// Extracts one `{ "text": ..., "page": ... }` entry.
fn push_page_document(source: &str, entry: &Value, out: &mut Vec<Document>) {
    let Some(text) = entry.get("text").and_then(Value::as_str) else {
        warn!(source, "skipping entry without text field");
        return;
    };
    let page = entry
        .get("page")
        .and_then(Value::as_u64)
        .and_then(|page| u32::try_from(page).ok());
    push_document(source, page, text, out);
}

/// Normalizes and appends, dropping documents that normalize to nothing.
fn push_document(source: &str, page: Option<u32>, text: &str, out: &mut Vec<Document>) {
    let normalized = normalize_text(text);
    if normalized.is_empty() {
        return;
    }
    out.push(Document::new(source, page, normalized));
}
