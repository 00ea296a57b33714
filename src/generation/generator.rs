//! Practice sentence generator.
//!
//! Pipeline per call, strictly in order:
//!
//! 1. Precondition checks (the only errors a caller ever sees)
//! 2. Credential check, falling back without a network call when absent
//! 3. Prompt and schema construction
//! 4. One model call, bounded by the configured timeout, never retried
//! 5. Response validation
//!
//! Any failure in steps 2, 4 or 5 yields a fixed fallback set and exactly
//! one [`GenerationDegraded`] event. The generator keeps no mutable state,
//! so concurrent calls need no coordination.

use crate::config::{Credential, GenerationConfig};
use crate::core::{GeneratedSentence, TargetLanguage, VocabularyItem};
use crate::error::{LingoError, Result};
use crate::generation::client::ModelClient;
use crate::generation::fallback;
use crate::generation::observer::{
    DegradationObserver, DegradationReason, GenerationDegraded, TracingObserver,
};
use crate::generation::prompt::GenerationRequest;
use crate::generation::schema::parse_sentences;

/// Result of a generation call. Never mixes model and fallback sentences.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationOutcome {
    /// Exactly the requested number of validated model sentences.
    Generated(Vec<GeneratedSentence>),
    /// A fixed pre-authored set, returned verbatim.
    Fallback {
        reason: DegradationReason,
        sentences: Vec<GeneratedSentence>,
    },
}

impl GenerationOutcome {
    /// The sentences, whichever path produced them.
    pub fn sentences(&self) -> &[GeneratedSentence] {
        match self {
            GenerationOutcome::Generated(sentences) => sentences,
            GenerationOutcome::Fallback { sentences, .. } => sentences,
        }
    }

    /// Collapse to the plain list callers render.
    pub fn into_sentences(self) -> Vec<GeneratedSentence> {
        match self {
            GenerationOutcome::Generated(sentences) => sentences,
            GenerationOutcome::Fallback { sentences, .. } => sentences,
        }
    }

    /// Whether the fallback path was taken.
    pub fn is_fallback(&self) -> bool {
        matches!(self, GenerationOutcome::Fallback { .. })
    }

    /// Why the fallback path was taken, if it was.
    pub fn degradation(&self) -> Option<DegradationReason> {
        match self {
            GenerationOutcome::Generated(_) => None,
            GenerationOutcome::Fallback { reason, .. } => Some(*reason),
        }
    }
}

/// Generates practice sentences for a vocabulary sample.
pub struct ContentGenerator<C, O = TracingObserver> {
    config: GenerationConfig,
    credential: Option<Credential>,
    client: C,
    observer: O,
}

impl<C: ModelClient> ContentGenerator<C, TracingObserver> {
    /// Create a generator that reports degradation through `tracing`.
    ///
    /// `credential` should be resolved once at startup (see
    /// [`Credential::from_env`]); `None` puts the generator in offline mode.
    pub fn new(config: GenerationConfig, credential: Option<Credential>, client: C) -> Self {
        Self::with_observer(config, credential, client, TracingObserver)
    }
}

impl<C: ModelClient, O: DegradationObserver> ContentGenerator<C, O> {
    /// Create a generator with a custom degradation observer.
    pub fn with_observer(
        config: GenerationConfig,
        credential: Option<Credential>,
        client: C,
        observer: O,
    ) -> Self {
        Self {
            config,
            credential,
            client,
            observer,
        }
    }

    /// Whether a model credential is configured.
    pub fn is_online(&self) -> bool {
        self.credential.is_some()
    }

    /// The generation settings.
    pub fn config(&self) -> &GenerationConfig {
        &self.config
    }

    /// The degradation observer.
    pub fn observer(&self) -> &O {
        &self.observer
    }

    /// Generate `count` practice sentences.
    ///
    /// Fails only with [`LingoError::InvalidRequest`] when the vocabulary is
    /// empty, larger than the configured maximum, or has an item without a
    /// source word or target-language gloss, or when `count` is zero. All
    /// other failures produce [`GenerationOutcome::Fallback`].
    pub async fn generate(
        &self,
        vocabulary: &[VocabularyItem],
        language: TargetLanguage,
        count: usize,
    ) -> Result<GenerationOutcome> {
        self.check_request(vocabulary, language, count)?;

        let Some(credential) = &self.credential else {
            return Ok(self.degrade(
                DegradationReason::MissingCredential,
                "no model credential configured",
                language,
                count,
            ));
        };

        let request = GenerationRequest::new(vocabulary, language, count);
        let call = self.client.complete(&request, credential);

        let response = match tokio::time::timeout(self.config.timeout(), call).await {
            Err(_) => {
                return Ok(self.degrade(
                    DegradationReason::Timeout,
                    format!(
                        "{} did not answer within {}s",
                        self.client.name(),
                        self.config.timeout_seconds
                    ),
                    language,
                    count,
                ));
            }
            Ok(Err(err)) => {
                return Ok(self.degrade(
                    DegradationReason::Transport,
                    err.to_string(),
                    language,
                    count,
                ));
            }
            Ok(Ok(response)) => response,
        };

        match parse_sentences(&response.body, count) {
            Ok(sentences) => {
                tracing::debug!(
                    client = self.client.name(),
                    %language,
                    count = sentences.len(),
                    "generated practice sentences"
                );
                Ok(GenerationOutcome::Generated(sentences))
            }
            Err(err) => Ok(self.degrade(err.reason(), err.to_string(), language, count)),
        }
    }

    /// Generate the configured default number of sentences.
    pub async fn generate_default(
        &self,
        vocabulary: &[VocabularyItem],
        language: TargetLanguage,
    ) -> Result<GenerationOutcome> {
        let count = self.config.default_count as usize;
        self.generate(vocabulary, language, count).await
    }

    /// Generate and collapse to a plain sentence list.
    pub async fn generate_sentences(
        &self,
        vocabulary: &[VocabularyItem],
        language: TargetLanguage,
        count: usize,
    ) -> Result<Vec<GeneratedSentence>> {
        Ok(self
            .generate(vocabulary, language, count)
            .await?
            .into_sentences())
    }

    fn check_request(
        &self,
        vocabulary: &[VocabularyItem],
        language: TargetLanguage,
        count: usize,
    ) -> Result<()> {
        if vocabulary.is_empty() {
            return Err(LingoError::invalid_request("vocabulary sample is empty"));
        }
        if vocabulary.len() > self.config.max_vocabulary {
            return Err(LingoError::invalid_request(format!(
                "vocabulary sample has {} items (max {})",
                vocabulary.len(),
                self.config.max_vocabulary
            )));
        }
        if let Some(item) = vocabulary
            .iter()
            .find(|item| item.source.trim().is_empty() || item.gloss(language).trim().is_empty())
        {
            return Err(LingoError::invalid_request(format!(
                "vocabulary item {} needs both an Indonesian word and a {} gloss",
                item.id, language
            )));
        }
        if count == 0 {
            return Err(LingoError::invalid_request(
                "sentence count must be positive",
            ));
        }
        Ok(())
    }

    fn degrade(
        &self,
        reason: DegradationReason,
        detail: impl Into<String>,
        language: TargetLanguage,
        requested: usize,
    ) -> GenerationOutcome {
        let sentences = fallback::sentences_for(reason);
        self.observer.degraded(&GenerationDegraded {
            reason,
            detail: detail.into(),
            language,
            requested,
            returned: sentences.len(),
        });
        GenerationOutcome::Fallback { reason, sentences }
    }
}
