//! Curriculum storage for lingopath.
//!
//! The persistence service is external; this module defines its read
//! boundary plus in-memory and JSON-file implementations.

pub mod json;
pub mod memory;
pub mod traits;

pub use json::{CurriculumSnapshot, JsonCurriculumStore};
pub use memory::MemoryCurriculumStore;
pub use traits::CurriculumStore;
