//! Practice command for lingopath.
//!
//! Generates practice sentences for a vocabulary sample read from a JSON
//! file. Falls back to fixed sentences whenever the model cannot be used.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::core::{GeneratedSentence, TargetLanguage, VocabularyItem};
use crate::error::Result;
use crate::generation::{
    ContentGenerator, DegradationObserver, DegradationReason, GenerationOutcome, ModelClient,
};
use crate::util::read_json;

/// Options for the practice command.
#[derive(Debug, Clone)]
pub struct PracticeOptions {
    /// JSON file holding an array of vocabulary items.
    pub vocab: PathBuf,
    /// Language the learner is studying.
    pub language: TargetLanguage,
    /// Number of sentences. Falls back to `generation.default_count`.
    pub count: Option<usize>,
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the practice command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PracticeOutput {
    /// Whether the command was successful.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<TargetLanguage>,
    /// Whether the sentences came from the fallback set.
    pub fallback: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<DegradationReason>,
    #[serde(default)]
    pub sentences: Vec<GeneratedSentence>,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PracticeOutput {
    /// Create a successful output from a generation outcome.
    pub fn success(language: TargetLanguage, outcome: GenerationOutcome) -> Self {
        Self {
            success: true,
            language: Some(language),
            fallback: outcome.is_fallback(),
            reason: outcome.degradation(),
            sentences: outcome.into_sentences(),
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            language: None,
            fallback: false,
            reason: None,
            sentences: Vec::new(),
            error: Some(error.into()),
        }
    }
}

/// The practice command implementation.
pub struct PracticeCommand<C, O> {
    generator: ContentGenerator<C, O>,
}

impl<C: ModelClient, O: DegradationObserver> PracticeCommand<C, O> {
    /// Create a new practice command.
    pub fn new(generator: ContentGenerator<C, O>) -> Self {
        Self { generator }
    }

    /// Run the practice command.
    pub async fn run(&self, options: &PracticeOptions) -> PracticeOutput {
        match self.generate(options).await {
            Ok(outcome) => PracticeOutput::success(options.language, outcome),
            Err(e) => PracticeOutput::failure(e.to_string()),
        }
    }

    async fn generate(&self, options: &PracticeOptions) -> Result<GenerationOutcome> {
        let vocabulary: Vec<VocabularyItem> = read_json(&options.vocab)?;
        match options.count {
            Some(count) => {
                self.generator
                    .generate(&vocabulary, options.language, count)
                    .await
            }
            None => {
                self.generator
                    .generate_default(&vocabulary, options.language)
                    .await
            }
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &PracticeOutput, options: &PracticeOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &PracticeOutput) -> String {
        if !output.success {
            return format!(
                "Practice command failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let language = output.language.unwrap_or(TargetLanguage::English);
        let mut lines = Vec::new();

        if let Some(reason) = output.reason {
            lines.push(format!("Using fallback sentences ({}).\n", reason));
        }

        for (i, sentence) in output.sentences.iter().enumerate() {
            lines.push(format!("{}. {}", i + 1, sentence.source_text));
            lines.push(format!("   {}", sentence.target_text(language)));
            if language == TargetLanguage::Mandarin {
                lines.push(format!("   {}", sentence.target_text_romanized));
            }
        }

        lines.join("\n") + "\n"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Credential, GenerationConfig};
    use crate::generation::{GenerationRequest, MemoryObserver, ModelResponse};
    use async_trait::async_trait;
    use std::fs;
    use std::sync::Arc;
    use tempfile::TempDir;

    const VOCAB: &str = r#"[
        {"id": 1, "indonesian": "makan", "english": "eat", "mandarin": "吃", "pinyin": "chī"},
        {"id": 2, "indonesian": "minum", "english": "drink", "mandarin": "喝", "pinyin": "hē"}
    ]"#;

    const REPLY: &str = r#"[
        {"source_text": "Saya makan nasi.", "target_text_primary": "I eat rice.",
         "target_text_secondary": "我吃米饭。", "target_text_romanized": "Wǒ chī mǐfàn."},
        {"source_text": "Dia minum teh.", "target_text_primary": "He drinks tea.",
         "target_text_secondary": "他喝茶。", "target_text_romanized": "Tā hē chá."}
    ]"#;

    struct CannedClient;

    #[async_trait]
    impl ModelClient for CannedClient {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(
            &self,
            _request: &GenerationRequest,
            _credential: &Credential,
        ) -> Result<ModelResponse> {
            Ok(ModelResponse::new(REPLY))
        }
    }

    fn command(
        credential: Option<&str>,
    ) -> (
        PracticeCommand<CannedClient, Arc<MemoryObserver>>,
        Arc<MemoryObserver>,
    ) {
        let observer = Arc::new(MemoryObserver::new());
        let generator = ContentGenerator::with_observer(
            GenerationConfig::default(),
            credential.and_then(Credential::new),
            CannedClient,
            Arc::clone(&observer),
        );
        (PracticeCommand::new(generator), observer)
    }

    fn options(dir: &TempDir, count: Option<usize>) -> PracticeOptions {
        let vocab = dir.path().join("vocab.json");
        fs::write(&vocab, VOCAB).unwrap();
        PracticeOptions {
            vocab,
            language: TargetLanguage::Mandarin,
            count,
            json: false,
            quiet: false,
        }
    }

    #[tokio::test]
    async fn test_practice_generates_sentences() {
        let dir = TempDir::new().unwrap();
        let (cmd, observer) = command(Some("test-key"));

        let output = cmd.run(&options(&dir, Some(2))).await;
        assert!(output.success);
        assert!(!output.fallback);
        assert_eq!(output.sentences.len(), 2);
        assert_eq!(output.sentences[0].target_text_secondary, "我吃米饭。");
        assert!(observer.is_empty());
    }

    #[tokio::test]
    async fn test_practice_offline_uses_fallback() {
        let dir = TempDir::new().unwrap();
        let (cmd, observer) = command(None);

        let output = cmd.run(&options(&dir, None)).await;
        assert!(output.success);
        assert!(output.fallback);
        assert_eq!(output.reason, Some(DegradationReason::MissingCredential));
        assert!(!output.sentences.is_empty());
        assert_eq!(observer.len(), 1);
    }

    #[tokio::test]
    async fn test_practice_too_few_sentences_falls_back() {
        let dir = TempDir::new().unwrap();
        let (cmd, _) = command(Some("test-key"));

        let output = cmd.run(&options(&dir, Some(5))).await;
        assert!(output.fallback);
        assert_eq!(output.reason, Some(DegradationReason::SchemaMismatch));
    }

    #[tokio::test]
    async fn test_practice_missing_vocab_file_fails() {
        let dir = TempDir::new().unwrap();
        let (cmd, _) = command(Some("test-key"));
        let mut opts = options(&dir, Some(1));
        opts.vocab = dir.path().join("missing.json");

        let output = cmd.run(&opts).await;
        assert!(!output.success);
        assert!(output.error.unwrap().contains("missing.json"));
    }

    #[tokio::test]
    async fn test_practice_vocab_without_target_gloss_fails() {
        let dir = TempDir::new().unwrap();
        let (cmd, observer) = command(Some("test-key"));
        let opts = options(&dir, Some(1));
        fs::write(&opts.vocab, r#"[{"id": 3, "indonesian": "tidur", "english": "sleep"}]"#)
            .unwrap();

        let output = cmd.run(&opts).await;
        assert!(!output.success);
        assert!(output.error.unwrap().contains("item 3"));
        assert!(observer.is_empty());
    }

    #[tokio::test]
    async fn test_practice_zero_count_fails() {
        let dir = TempDir::new().unwrap();
        let (cmd, observer) = command(Some("test-key"));

        let output = cmd.run(&options(&dir, Some(0))).await;
        assert!(!output.success);
        assert!(observer.is_empty());
    }

    #[tokio::test]
    async fn test_format_output_human_and_json() {
        let dir = TempDir::new().unwrap();
        let (cmd, _) = command(Some("test-key"));
        let mut opts = options(&dir, Some(1));
        let output = cmd.run(&opts).await;

        let human = cmd.format_output(&output, &opts);
        assert!(human.contains("1. Saya makan nasi."));
        assert!(human.contains("Wǒ chī mǐfàn."));

        opts.json = true;
        let parsed: serde_json::Value =
            serde_json::from_str(&cmd.format_output(&output, &opts)).unwrap();
        assert_eq!(parsed["fallback"], false);
        assert_eq!(parsed["language"], "mandarin");
    }
}
