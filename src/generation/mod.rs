//! Practice sentence generation.
//!
//! Builds a schema-constrained prompt from a vocabulary sample, calls a
//! generative model once, validates the answer, and degrades to fixed
//! sentences when any of that fails.

pub mod client;
pub mod fallback;
pub mod generator;
pub mod observer;
pub mod prompt;
pub mod schema;

pub use client::{GeminiClient, ModelClient, ModelResponse};
pub use generator::{ContentGenerator, GenerationOutcome};
pub use observer::{
    DegradationObserver, DegradationReason, GenerationDegraded, MemoryObserver, TracingObserver,
};
pub use prompt::{build_prompt, GenerationRequest};
pub use schema::{parse_sentences, sentence_list_schema, ResponseError};
