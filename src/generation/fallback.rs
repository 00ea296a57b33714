//! Pre-authored sentences used when generation cannot complete.
//!
//! These are illustrative only. They are not drawn from the requested
//! vocabulary and their count does not follow the requested count.

use crate::core::GeneratedSentence;
use crate::generation::observer::DegradationReason;

/// Sentences shown when no model credential is configured.
pub fn offline_sentences() -> Vec<GeneratedSentence> {
    vec![
        GeneratedSentence::new(
            "Kucing itu besar.",
            "The cat is big.",
            "那只猫很大。",
            "nà zhī māo hěn dà.",
        ),
        GeneratedSentence::new(
            "Saya suka anjing kecil.",
            "I like small dogs.",
            "我喜欢小狗。",
            "wǒ xǐhuān xiǎo gǒu.",
        ),
    ]
}

/// Sentence shown when the model call or its response failed.
pub fn error_sentences() -> Vec<GeneratedSentence> {
    vec![GeneratedSentence::new(
        "Terjadi kesalahan saat membuat kalimat.",
        "An error occurred while creating sentences.",
        "创建句子时发生错误。",
        "chuàngjiàn jùzi shí fāshēng cuòwù.",
    )]
}

/// The fixed set for a given degradation reason.
pub fn sentences_for(reason: DegradationReason) -> Vec<GeneratedSentence> {
    match reason {
        DegradationReason::MissingCredential => offline_sentences(),
        _ => error_sentences(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_sets_are_complete() {
        for sentence in offline_sentences().iter().chain(error_sentences().iter()) {
            assert!(sentence.is_complete(), "{:?}", sentence);
        }
    }

    #[test]
    fn test_fallback_sets_are_deterministic() {
        assert_eq!(offline_sentences(), offline_sentences());
        assert_eq!(error_sentences(), error_sentences());
    }

    #[test]
    fn test_sentences_for_reason() {
        assert_eq!(
            sentences_for(DegradationReason::MissingCredential),
            offline_sentences()
        );
        for reason in [
            DegradationReason::Transport,
            DegradationReason::Timeout,
            DegradationReason::EmptyResponse,
            DegradationReason::MalformedResponse,
            DegradationReason::SchemaMismatch,
        ] {
            assert_eq!(sentences_for(reason), error_sentences());
        }
    }
}
