//! Structured scraped-record flattening.
//!
//! Scraped JSON exports mix three record shapes in the same directory:
//! processing-time tables, fee tables, and question/answer pairs. Each entry
//! is deserialized once into [`ScrapedRecord`], which decides the kind at
//! parse time; downstream code never sniffs field names.

use serde::Deserialize;
use serde_json::Value;
use tracing::warn;

/// One scraped record, in any of the shapes the scraping jobs emit.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
pub enum ScrapedRecord {
    /// A row from a processing-times table.
    ProcessingTime {
        #[serde(default)]
        category: String,
        #[serde(default)]
        subcategory: String,
        #[serde(default)]
        country: String,
        processing_time: String,
        #[serde(default)]
        last_updated: String,
    },
    /// A row from a fee schedule. Field names mirror the scraped tables.
    Fee {
        #[serde(rename = "Fees")]
        service: String,
        #[serde(rename = "$CAN")]
        amount_cad: Value,
    },
    /// A help-centre question and answer.
    Qa { question: String, answer: String },
}

impl ScrapedRecord {
    /// Renders the record as labeled lines of prose for embedding.
    pub fn flatten(&self) -> String {
        match self {
            Self::ProcessingTime {
                category,
                subcategory,
                country,
                processing_time,
                last_updated,
            } => format!(
                "Category: {category}\nSubcategory: {subcategory}\nCountry: {country}\n\
                 Processing Time: {processing_time}\nLast Updated: {last_updated}"
            ),
            Self::Fee {
                service,
                amount_cad,
            } => format!("Service: {service}\nFee: ${} CAD", value_text(amount_cad)),
            Self::Qa { question, answer } => {
                format!("Q: {}\nA: {}", question.trim(), answer.trim())
            }
        }
    }
}

/// Flattens an array of raw JSON entries into one text block.
///
/// Entries that fit none of the record shapes are logged and skipped.
/// Returns `None` when nothing usable remains.
pub fn flatten_records(entries: &[Value]) -> Option<String> {
    let mut blocks = Vec::with_capacity(entries.len());
    for (position, entry) in entries.iter().enumerate() {
        match serde_json::from_value::<ScrapedRecord>(entry.clone()) {
            Ok(record) => blocks.push(record.flatten()),
            Err(err) => {
                warn!(position, %err, "skipping unrecognized record");
            }
        }
    }
    if blocks.is_empty() {
        None
    } else {
        Some(blocks.join("\n\n"))
    }
}

/// Renders a JSON value the way the scraped tables mean it: strings as-is,
/// numbers and everything else via their JSON representation.
fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn processing_time_rows_flatten_with_labels() {
        let record: ScrapedRecord = serde_json::from_value(json!({
            "category": "Temporary residence",
            "subcategory": "Study permit",
            "country": "India",
            "processing_time": "9 weeks",
            "last_updated": "2024-03-12"
        }))
        .unwrap();
        assert_eq!(
            record.flatten(),
            "Category: Temporary residence\nSubcategory: Study permit\nCountry: India\n\
             Processing Time: 9 weeks\nLast Updated: 2024-03-12"
        );
    }

    #[test]
    fn processing_time_optional_fields_default_to_empty() {
        let record: ScrapedRecord =
            serde_json::from_value(json!({ "processing_time": "9 weeks" })).unwrap();
        assert!(record.flatten().contains("Category: \n"));
        assert!(record.flatten().contains("Processing Time: 9 weeks"));
    }

    #[test]
    fn fee_rows_render_string_and_numeric_amounts() {
        let record: ScrapedRecord = serde_json::from_value(json!({
            "Fees": "Work permit",
            "$CAN": "155"
        }))
        .unwrap();
        assert_eq!(record.flatten(), "Service: Work permit\nFee: $155 CAD");

        let record: ScrapedRecord = serde_json::from_value(json!({
            "Fees": "Biometrics",
            "$CAN": 85
        }))
        .unwrap();
        assert_eq!(record.flatten(), "Service: Biometrics\nFee: $85 CAD");
    }

    #[test]
    fn qa_rows_trim_whitespace() {
        let record: ScrapedRecord = serde_json::from_value(json!({
            "question": "  How long does it take?  ",
            "answer": "About 9 weeks.\n"
        }))
        .unwrap();
        assert_eq!(record.flatten(), "Q: How long does it take?\nA: About 9 weeks.");
    }

    #[test]
    fn flatten_records_joins_and_skips_unrecognized() {
        let entries = vec![
            json!({ "Fees": "Work permit", "$CAN": "155" }),
            json!({ "unrelated": true }),
            json!({ "question": "Q1", "answer": "A1" }),
        ];
        let text = flatten_records(&entries).unwrap();
        assert_eq!(text, "Service: Work permit\nFee: $155 CAD\n\nQ: Q1\nA: A1");
    }

    #[test]
    fn flatten_records_with_nothing_usable_is_none() {
        assert!(flatten_records(&[]).is_none());
        assert!(flatten_records(&[serde_json::json!({ "x": 1 })]).is_none());
    }
}
