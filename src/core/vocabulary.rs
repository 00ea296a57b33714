//! Vocabulary and generated sentence types.
//!
//! Learners read Indonesian and study either English or Mandarin. A
//! [`GeneratedSentence`] always carries all four renderings so the UI can
//! show whichever pair the learner needs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::LingoError;

/// The learner's native (source) language.
pub const SOURCE_LANGUAGE: &str = "Indonesian";

/// Language a learner is studying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetLanguage {
    English,
    Mandarin,
}

impl TargetLanguage {
    /// Name used in prompts and output.
    pub fn display_name(&self) -> &'static str {
        match self {
            TargetLanguage::English => "English",
            TargetLanguage::Mandarin => "Mandarin",
        }
    }

    /// All supported target languages.
    pub fn all() -> [TargetLanguage; 2] {
        [TargetLanguage::English, TargetLanguage::Mandarin]
    }
}

impl fmt::Display for TargetLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for TargetLanguage {
    type Err = LingoError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "english" | "en" => Ok(TargetLanguage::English),
            "mandarin" | "zh" | "chinese" => Ok(TargetLanguage::Mandarin),
            other => Err(LingoError::invalid_request(format!(
                "unsupported target language '{}'",
                other
            ))),
        }
    }
}

/// A vocabulary entry with its parallel renderings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VocabularyItem {
    /// Identifier in the vocabulary store.
    pub id: u64,
    /// Indonesian word or phrase.
    #[serde(alias = "indonesian")]
    pub source: String,
    /// English gloss.
    #[serde(default)]
    pub english: String,
    /// Mandarin gloss (hanzi).
    #[serde(default)]
    pub mandarin: String,
    /// Pinyin for the Mandarin gloss.
    #[serde(default)]
    pub pinyin: String,
}

impl VocabularyItem {
    /// Create a vocabulary item.
    pub fn new(
        id: u64,
        source: impl Into<String>,
        english: impl Into<String>,
        mandarin: impl Into<String>,
        pinyin: impl Into<String>,
    ) -> Self {
        Self {
            id,
            source: source.into(),
            english: english.into(),
            mandarin: mandarin.into(),
            pinyin: pinyin.into(),
        }
    }

    /// The gloss shown next to the source word for a target language.
    pub fn gloss(&self, language: TargetLanguage) -> &str {
        match language {
            TargetLanguage::English => &self.english,
            TargetLanguage::Mandarin => &self.mandarin,
        }
    }
}

/// A practice sentence in all four renderings.
///
/// Field names are exactly those of the output schema sent to the model.
/// Deserialization rejects any other key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GeneratedSentence {
    /// Indonesian sentence.
    pub source_text: String,
    /// English sentence.
    pub target_text_primary: String,
    /// Mandarin sentence in hanzi.
    pub target_text_secondary: String,
    /// Pinyin romanization of the Mandarin sentence.
    pub target_text_romanized: String,
}

impl GeneratedSentence {
    /// Create a sentence from its four renderings.
    pub fn new(
        source_text: impl Into<String>,
        target_text_primary: impl Into<String>,
        target_text_secondary: impl Into<String>,
        target_text_romanized: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            target_text_primary: target_text_primary.into(),
            target_text_secondary: target_text_secondary.into(),
            target_text_romanized: target_text_romanized.into(),
        }
    }

    /// Name of the first blank field, if any.
    pub fn first_blank_field(&self) -> Option<&'static str> {
        [
            ("source_text", &self.source_text),
            ("target_text_primary", &self.target_text_primary),
            ("target_text_secondary", &self.target_text_secondary),
            ("target_text_romanized", &self.target_text_romanized),
        ]
        .into_iter()
        .find(|(_, value)| value.trim().is_empty())
        .map(|(name, _)| name)
    }

    /// Whether all four fields are non-empty.
    pub fn is_complete(&self) -> bool {
        self.first_blank_field().is_none()
    }

    /// The rendering a learner of `language` practises against.
    pub fn target_text(&self, language: TargetLanguage) -> &str {
        match language {
            TargetLanguage::English => &self.target_text_primary,
            TargetLanguage::Mandarin => &self.target_text_secondary,
        }
    }
}
