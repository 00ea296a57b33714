//! Core types and logic for lingopath.
//!
//! This module contains the lesson and vocabulary value types and the
//! gating evaluator that decides which lessons a learner may open.

pub mod gate;
pub mod lesson;
pub mod vocabulary;

pub use gate::{evaluate, GatedPath, LessonNode, LessonSequence, LessonStatus};
pub use lesson::{CompletedLessons, LessonDescriptor, LessonId, ProgressRecord};
pub use vocabulary::{GeneratedSentence, TargetLanguage, VocabularyItem, SOURCE_LANGUAGE};
