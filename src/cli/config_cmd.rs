//! Config command for lingopath.
//!
//! Shows the effective configuration after all layers are merged, with the
//! model credential redacted.

use serde::{Deserialize, Serialize};

use crate::config::{Config, Credential, CREDENTIAL_ENV_VARS};

/// Options for the config command.
#[derive(Debug, Clone, Default)]
pub struct ConfigOptions {
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// Output format for the config command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConfigOutput {
    /// Whether the command was successful.
    pub success: bool,
    pub config: Config,
    /// Redacted credential, if one is configured.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credential: Option<String>,
    /// Whether practice sentences come from the model or the fallback set.
    pub online: bool,
}

/// The config command implementation.
pub struct ConfigCommand {
    config: Config,
    credential: Option<Credential>,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(config: Config, credential: Option<Credential>) -> Self {
        Self { config, credential }
    }

    /// Run the config command.
    pub fn run(&self, _options: &ConfigOptions) -> ConfigOutput {
        ConfigOutput {
            success: true,
            config: self.config.clone(),
            credential: self.credential.as_ref().map(Credential::redacted),
            online: self.credential.is_some(),
        }
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &ConfigOutput, options: &ConfigOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &ConfigOutput) -> String {
        let generation = &output.config.generation;
        let curriculum = &output.config.curriculum;

        let mut lines = vec![
            "[generation]".to_string(),
            format!("model = {}", generation.model),
            format!("endpoint = {}", generation.endpoint),
            format!("timeout_seconds = {}", generation.timeout_seconds),
            format!("default_count = {}", generation.default_count),
            format!("max_vocabulary = {}", generation.max_vocabulary),
            String::new(),
            "[curriculum]".to_string(),
            format!(
                "data_file = {}",
                curriculum
                    .data_file
                    .as_ref()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "(unset)".to_string())
            ),
            format!(
                "default_track = {}",
                curriculum.default_track.as_deref().unwrap_or("(unset)")
            ),
            String::new(),
        ];

        match &output.credential {
            Some(key) => lines.push(format!("credential: {} (online)", key)),
            None => lines.push(format!(
                "credential: none, set one of {} (offline, fallback sentences only)",
                CREDENTIAL_ENV_VARS.join(", ")
            )),
        }

        lines.join("\n") + "\n"
    }
}
