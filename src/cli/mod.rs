//! CLI commands for lingopath.
//!
//! - **path**: gated lesson path of a learner on one track
//! - **practice**: practice sentences for a vocabulary sample
//! - **config**: effective configuration

pub mod config_cmd;
pub mod path;
pub mod practice;

pub use config_cmd::ConfigCommand;
pub use path::PathCommand;
pub use practice::PracticeCommand;
