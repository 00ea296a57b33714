//! Lingopath - lesson gating and practice content for language learners
//!
//! Lingopath decides which lessons of a linear track a learner may open, and
//! generates short practice sentences from a vocabulary sample through a
//! schema-constrained model call that always degrades to usable content.

pub mod cli;
pub mod config;
pub mod core;
pub mod error;
pub mod generation;
pub mod storage;
pub mod util;

pub use config::{Config, Credential, GenerationConfig};
pub use core::{
    evaluate, CompletedLessons, GatedPath, GeneratedSentence, LessonDescriptor, LessonId,
    LessonNode, LessonSequence, LessonStatus, ProgressRecord, TargetLanguage, VocabularyItem,
};
pub use error::{LingoError, Result};
pub use generation::{
    ContentGenerator, DegradationObserver, DegradationReason, GeminiClient, GenerationOutcome,
    ModelClient,
};
pub use storage::{CurriculumStore, JsonCurriculumStore, MemoryCurriculumStore};

// CLI commands
pub use cli::{ConfigCommand, PathCommand, PracticeCommand};
