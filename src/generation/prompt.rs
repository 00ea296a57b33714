//! Prompt construction for practice sentence generation.

use serde::Serialize;
use serde_json::Value;

use crate::core::{TargetLanguage, VocabularyItem, SOURCE_LANGUAGE};
use crate::generation::schema::sentence_list_schema;

/// A single schema-constrained request to the model.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    /// Natural-language instruction.
    pub prompt: String,
    /// Schema the response must conform to.
    pub output_schema: Value,
}

impl GenerationRequest {
    /// Build the request for a vocabulary sample.
    pub fn new(vocabulary: &[VocabularyItem], language: TargetLanguage, count: usize) -> Self {
        Self {
            prompt: build_prompt(vocabulary, language, count),
            output_schema: sentence_list_schema(),
        }
    }
}

/// Render the vocabulary as `source (gloss)` pairs.
pub fn vocabulary_list(vocabulary: &[VocabularyItem], language: TargetLanguage) -> String {
    vocabulary
        .iter()
        .map(|item| format!("{} ({})", item.source, item.gloss(language)))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Build the instruction sent to the model.
pub fn build_prompt(vocabulary: &[VocabularyItem], language: TargetLanguage, count: usize) -> String {
    let noun = if count == 1 { "sentence" } else { "sentences" };
    format!(
        "You are a language teacher for a native {source} speaker who is learning {target}.\n\
         Vocabulary list: {vocab}.\n\
         Write exactly {count} new, simple example {noun}. \
         Each sentence must use at least one word from the vocabulary list.\n\
         Give every sentence in Indonesian (source_text), English (target_text_primary), \
         Mandarin characters (target_text_secondary) and Pinyin (target_text_romanized). \
         All four fields are required and must not be empty.\n\
         Return ONLY a JSON array of {count} objects that matches the provided schema.",
        source = SOURCE_LANGUAGE,
        target = language,
        vocab = vocabulary_list(vocabulary, language),
        count = count,
        noun = noun,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vocab() -> Vec<VocabularyItem> {
        vec![
            VocabularyItem::new(1, "kucing", "cat", "猫", "māo"),
            VocabularyItem::new(2, "besar", "big", "大", "dà"),
        ]
    }

    #[test]
    fn test_vocabulary_list_uses_target_gloss() {
        assert_eq!(
            vocabulary_list(&vocab(), TargetLanguage::English),
            "kucing (cat), besar (big)"
        );
        assert_eq!(
            vocabulary_list(&vocab(), TargetLanguage::Mandarin),
            "kucing (猫), besar (大)"
        );
    }

    #[test]
    fn test_prompt_mentions_languages_vocab_and_count() {
        let prompt = build_prompt(&vocab(), TargetLanguage::Mandarin, 4);
        assert!(prompt.contains("native Indonesian speaker"));
        assert!(prompt.contains("learning Mandarin"));
        assert!(prompt.contains("kucing (猫), besar (大)"));
        assert!(prompt.contains("exactly 4 new"));
        assert!(prompt.contains("JSON array"));
    }

    #[test]
    fn test_request_carries_schema() {
        let request = GenerationRequest::new(&vocab(), TargetLanguage::English, 3);
        assert_eq!(request.output_schema, sentence_list_schema());
        assert!(request.prompt.contains("exactly 3 new"));
    }
}
