//! Output schema for generated sentences and validation of model responses.
//!
//! The same schema is sent to the model as a response constraint and
//! enforced locally on whatever comes back. A response is accepted only if
//! it is a JSON array whose every element has all four sentence fields
//! present and non-empty.

use serde_json::{json, Value};

use crate::core::GeneratedSentence;
use crate::generation::observer::DegradationReason;

/// Field names every generated sentence must carry.
pub const REQUIRED_FIELDS: [&str; 4] = [
    "source_text",
    "target_text_primary",
    "target_text_secondary",
    "target_text_romanized",
];

/// Schema descriptor for a list of generated sentences.
///
/// Uses the OpenAPI subset understood by the Generative Language API.
pub fn sentence_list_schema() -> Value {
    let properties: serde_json::Map<String, Value> = REQUIRED_FIELDS
        .iter()
        .map(|field| (field.to_string(), json!({ "type": "STRING" })))
        .collect();

    json!({
        "type": "ARRAY",
        "items": {
            "type": "OBJECT",
            "properties": properties,
            "required": REQUIRED_FIELDS,
        }
    })
}

/// Why a model response was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResponseError {
    /// Body was empty or whitespace.
    Empty,
    /// Body was not valid JSON.
    Malformed(String),
    /// JSON did not match the sentence list schema.
    Schema(String),
    /// Fewer valid sentences than requested.
    TooFew { expected: usize, actual: usize },
}

impl ResponseError {
    /// The degradation reason reported for this failure.
    pub fn reason(&self) -> DegradationReason {
        match self {
            ResponseError::Empty => DegradationReason::EmptyResponse,
            ResponseError::Malformed(_) => DegradationReason::MalformedResponse,
            ResponseError::Schema(_) | ResponseError::TooFew { .. } => {
                DegradationReason::SchemaMismatch
            }
        }
    }
}

impl std::fmt::Display for ResponseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResponseError::Empty => write!(f, "empty response body"),
            ResponseError::Malformed(msg) => write!(f, "response is not valid JSON: {}", msg),
            ResponseError::Schema(msg) => write!(f, "response does not match schema: {}", msg),
            ResponseError::TooFew { expected, actual } => {
                write!(f, "expected {} sentences, got {}", expected, actual)
            }
        }
    }
}

impl std::error::Error for ResponseError {}

/// Parse and validate a raw response body.
///
/// Returns exactly `expected` sentences. Extra valid sentences are dropped;
/// any invalid element rejects the whole response so results are never mixed.
pub fn parse_sentences(
    body: &str,
    expected: usize,
) -> std::result::Result<Vec<GeneratedSentence>, ResponseError> {
    let body = body.trim();
    if body.is_empty() {
        return Err(ResponseError::Empty);
    }

    let value: Value =
        serde_json::from_str(body).map_err(|e| ResponseError::Malformed(e.to_string()))?;

    let Value::Array(items) = value else {
        return Err(ResponseError::Schema("expected a JSON array".to_string()));
    };

    let mut sentences = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        if !item.is_object() {
            return Err(ResponseError::Schema(format!(
                "item {} is not an object",
                index
            )));
        }
        let sentence: GeneratedSentence = serde_json::from_value(item)
            .map_err(|e| ResponseError::Schema(format!("item {}: {}", index, e)))?;
        if let Some(field) = sentence.first_blank_field() {
            return Err(ResponseError::Schema(format!(
                "item {}: field '{}' is empty",
                index, field
            )));
        }
        sentences.push(sentence);
    }

    if sentences.len() < expected {
        return Err(ResponseError::TooFew {
            expected,
            actual: sentences.len(),
        });
    }

    sentences.truncate(expected);
    Ok(sentences)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sentence_json(source: &str) -> Value {
        json!({
            "source_text": source,
            "target_text_primary": "The cat is big.",
            "target_text_secondary": "那只猫很大。",
            "target_text_romanized": "nà zhī māo hěn dà."
        })
    }

    #[test]
    fn test_schema_declares_all_required_fields() {
        let schema = sentence_list_schema();
        assert_eq!(schema["type"], "ARRAY");
        assert_eq!(schema["items"]["type"], "OBJECT");
        let required = schema["items"]["required"].as_array().unwrap();
        assert_eq!(required.len(), 4);
        for field in REQUIRED_FIELDS {
            assert_eq!(schema["items"]["properties"][field]["type"], "STRING");
        }
    }

    #[test]
    fn test_parse_valid_response() {
        let body = json!([sentence_json("a"), sentence_json("b"), sentence_json("c")]).to_string();
        let sentences = parse_sentences(&body, 3).unwrap();
        assert_eq!(sentences.len(), 3);
        assert_eq!(sentences[2].source_text, "c");
    }

    #[test]
    fn test_parse_truncates_extra_sentences() {
        let body = json!([sentence_json("a"), sentence_json("b"), sentence_json("c")]).to_string();
        let sentences = parse_sentences(&body, 2).unwrap();
        assert_eq!(sentences.len(), 2);
        assert_eq!(sentences[1].source_text, "b");
    }

    #[test]
    fn test_fenced_json_is_malformed() {
        let body = format!("```json\n{}\n```", json!([sentence_json("a")]));
        let err = parse_sentences(&body, 1).unwrap_err();
        assert!(matches!(err, ResponseError::Malformed(_)));
        assert_eq!(err.reason(), DegradationReason::MalformedResponse);
    }

    #[test]
    fn test_per_language_keys_are_schema_mismatch() {
        let body = r#"[{"indonesian": "a", "english": "b", "mandarin": "c", "pinyin": "d"}]"#;
        let err = parse_sentences(body, 1).unwrap_err();
        assert!(matches!(err, ResponseError::Schema(_)));
        assert_eq!(err.reason(), DegradationReason::SchemaMismatch);
    }

    #[test]
    fn test_mixed_key_sets_are_schema_mismatch() {
        let body = r#"[{"source_text": "a", "english": "b",
                        "target_text_secondary": "c", "pinyin": "d"}]"#;
        let err = parse_sentences(body, 1).unwrap_err();
        assert_eq!(err.reason(), DegradationReason::SchemaMismatch);
    }

    #[test]
    fn test_extra_key_is_schema_mismatch() {
        let mut item = sentence_json("a");
        item["note"] = json!("extra");
        let err = parse_sentences(&json!([item]).to_string(), 1).unwrap_err();
        assert_eq!(err.reason(), DegradationReason::SchemaMismatch);
    }

    #[test]
    fn test_empty_body() {
        assert_eq!(parse_sentences("   \n", 3), Err(ResponseError::Empty));
        assert_eq!(
            ResponseError::Empty.reason(),
            DegradationReason::EmptyResponse
        );
    }

    #[test]
    fn test_malformed_json() {
        let err = parse_sentences("[{\"source_text\": ", 1).unwrap_err();
        assert!(matches!(err, ResponseError::Malformed(_)));
        assert_eq!(err.reason(), DegradationReason::MalformedResponse);
    }

    #[test]
    fn test_not_an_array() {
        let err = parse_sentences(&sentence_json("a").to_string(), 1).unwrap_err();
        assert!(matches!(err, ResponseError::Schema(_)));
    }

    #[test]
    fn test_missing_field_rejects_whole_response() {
        let mut bad = sentence_json("b");
        bad.as_object_mut().unwrap().remove("target_text_romanized");
        let body = json!([sentence_json("a"), bad, sentence_json("c")]).to_string();

        let err = parse_sentences(&body, 3).unwrap_err();
        assert!(err.to_string().contains("item 1"));
        assert_eq!(err.reason(), DegradationReason::SchemaMismatch);
    }

    #[test]
    fn test_blank_field_rejects_whole_response() {
        let mut bad = sentence_json("b");
        bad["target_text_secondary"] = json!("  ");
        let body = json!([sentence_json("a"), bad]).to_string();

        let err = parse_sentences(&body, 2).unwrap_err();
        assert!(err.to_string().contains("target_text_secondary"));
    }

    #[test]
    fn test_non_string_field_rejected() {
        let mut bad = sentence_json("a");
        bad["target_text_primary"] = json!(42);
        let err = parse_sentences(&json!([bad]).to_string(), 1).unwrap_err();
        assert!(matches!(err, ResponseError::Schema(_)));
    }

    #[test]
    fn test_too_few_sentences() {
        let body = json!([sentence_json("a")]).to_string();
        let err = parse_sentences(&body, 3).unwrap_err();
        assert_eq!(
            err,
            ResponseError::TooFew {
                expected: 3,
                actual: 1
            }
        );
        assert_eq!(err.reason(), DegradationReason::SchemaMismatch);
    }
}
