//! Configuration loading for lingopath.
//!
//! Configuration follows a precedence chain:
//! 1. Environment variables (highest priority)
//! 2. Project config (`.lingopath/config.toml`)
//! 3. User config (`~/.lingopath/config.toml`)
//! 4. Defaults (lowest priority)
//!
//! The model access credential is deliberately not part of [`Config`]. It is
//! resolved once from the environment via [`Credential::from_env`] and handed
//! to the content generator at construction; nothing reads it ambiently.

use std::env;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{FailOpen, LingoError, Result};
use crate::util::read_to_string_limited;

/// Environment variables consulted for the model credential, in order.
pub const CREDENTIAL_ENV_VARS: &[&str] = &["LINGOPATH_API_KEY", "GEMINI_API_KEY", "API_KEY"];

/// Main configuration struct for lingopath.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Practice sentence generation settings.
    pub generation: GenerationConfig,
    /// Curriculum data settings.
    pub curriculum: CurriculumConfig,
}

/// Practice sentence generation settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct GenerationConfig {
    /// Model identifier.
    pub model: String,
    /// Base URL of the generative language API.
    pub endpoint: String,
    /// Upper bound on a single model call, in seconds.
    pub timeout_seconds: u64,
    /// Number of sentences requested when the caller does not say.
    pub default_count: u32,
    /// Largest vocabulary sample accepted in one request.
    pub max_vocabulary: usize,
}

/// Minimum valid timeout (seconds).
pub const MIN_TIMEOUT_SECONDS: u64 = 1;

impl GenerationConfig {
    /// The call timeout as a [`Duration`].
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_seconds)
    }

    /// Check if a timeout value is valid.
    pub fn is_valid_timeout(value: u64) -> bool {
        value >= MIN_TIMEOUT_SECONDS
    }
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            model: "gemini-2.5-flash".to_string(),
            endpoint: "https://generativelanguage.googleapis.com/v1beta".to_string(),
            timeout_seconds: 30,
            default_count: 3,
            max_vocabulary: 20,
        }
    }
}

/// Curriculum data settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CurriculumConfig {
    /// Path to a JSON curriculum snapshot used when `--data` is omitted.
    pub data_file: Option<PathBuf>,
    /// Track shown when `--track` is omitted.
    pub default_track: Option<String>,
}

impl Config {
    /// Load configuration with full precedence chain.
    pub fn load() -> Self {
        match env::current_dir() {
            Ok(cwd) => Self::load_from_cwd(&cwd),
            Err(_) => {
                let mut config = Config::default();
                if let Some(user_config) = Self::load_user_config() {
                    config = config.merge(user_config);
                }
                config.apply_env_overrides();
                config
            }
        }
    }

    /// Load configuration with a specific working directory.
    pub fn load_from_cwd(cwd: &Path) -> Self {
        let mut config = Config::default();

        if let Some(user_config) = Self::load_user_config() {
            config = config.merge(user_config);
        }

        if let Some(project_config) = Self::load_project_config(cwd) {
            config = config.merge(project_config);
        }

        config.apply_env_overrides();

        config
    }

    /// Load user config from `~/.lingopath/config.toml`.
    fn load_user_config() -> Option<Config> {
        let home = lingopath_home()?;
        Self::load_optional(&home.join("config.toml"))
    }

    /// Load project config from `.lingopath/config.toml` in the given directory.
    fn load_project_config(cwd: &Path) -> Option<Config> {
        Self::load_optional(&cwd.join(".lingopath").join("config.toml"))
    }

    /// Load a config file that may not exist. Parse errors are logged.
    fn load_optional(path: &Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        Self::load_from_file(path)
            .map(Some)
            .fail_open_default(&format!("loading {}", path.display()))
    }

    /// Load config from a specific file path.
    pub fn load_from_file(path: &Path) -> Result<Config> {
        let content = read_to_string_limited(path)?;
        toml::from_str(&content).map_err(|e| LingoError::config(e.to_string()))
    }

    /// Apply environment variable overrides.
    fn apply_env_overrides(&mut self) {
        if let Ok(val) = env::var("LINGOPATH_MODEL") {
            if val.trim().is_empty() {
                tracing::warn!(
                    "LINGOPATH_MODEL is empty, keeping '{}'",
                    self.generation.model
                );
            } else {
                self.generation.model = val;
            }
        }

        if let Ok(val) = env::var("LINGOPATH_ENDPOINT") {
            if val.trim().is_empty() {
                tracing::warn!(
                    "LINGOPATH_ENDPOINT is empty, keeping '{}'",
                    self.generation.endpoint
                );
            } else {
                self.generation.endpoint = val.trim_end_matches('/').to_string();
            }
        }

        if let Ok(val) = env::var("LINGOPATH_TIMEOUT_SECONDS") {
            match val.parse::<u64>() {
                Ok(n) if GenerationConfig::is_valid_timeout(n) => {
                    self.generation.timeout_seconds = n
                }
                _ => tracing::warn!(
                    "Invalid LINGOPATH_TIMEOUT_SECONDS value '{}'. \
                    Must be an integer >= {}. Using '{}'.",
                    val,
                    MIN_TIMEOUT_SECONDS,
                    self.generation.timeout_seconds
                ),
            }
        }

        if let Ok(val) = env::var("LINGOPATH_DEFAULT_COUNT") {
            match val.parse::<u32>() {
                Ok(n) if n > 0 => self.generation.default_count = n,
                _ => tracing::warn!(
                    "Invalid LINGOPATH_DEFAULT_COUNT value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val,
                    self.generation.default_count
                ),
            }
        }

        if let Ok(val) = env::var("LINGOPATH_MAX_VOCABULARY") {
            match val.parse::<usize>() {
                Ok(n) if n > 0 => self.generation.max_vocabulary = n,
                _ => tracing::warn!(
                    "Invalid LINGOPATH_MAX_VOCABULARY value '{}'. \
                    Expected a positive integer. Using '{}'.",
                    val,
                    self.generation.max_vocabulary
                ),
            }
        }

        if let Ok(val) = env::var("LINGOPATH_DATA_FILE") {
            if !val.trim().is_empty() {
                self.curriculum.data_file = Some(PathBuf::from(val));
            }
        }

        if let Ok(val) = env::var("LINGOPATH_TRACK") {
            if !val.trim().is_empty() {
                self.curriculum.default_track = Some(val);
            }
        }
    }

    /// Merge another config into this one.
    ///
    /// Non-default fields from `other` win. A layer cannot reset a value back
    /// to its default once a lower layer changed it.
    fn merge(mut self, other: Config) -> Self {
        let default_gen = GenerationConfig::default();
        if other.generation.model != default_gen.model {
            self.generation.model = other.generation.model;
        }
        if other.generation.endpoint != default_gen.endpoint {
            self.generation.endpoint = other.generation.endpoint;
        }
        if other.generation.timeout_seconds != default_gen.timeout_seconds {
            self.generation.timeout_seconds = other.generation.timeout_seconds;
        }
        if other.generation.default_count != default_gen.default_count {
            self.generation.default_count = other.generation.default_count;
        }
        if other.generation.max_vocabulary != default_gen.max_vocabulary {
            self.generation.max_vocabulary = other.generation.max_vocabulary;
        }

        if other.curriculum.data_file.is_some() {
            self.curriculum.data_file = other.curriculum.data_file;
        }
        if other.curriculum.default_track.is_some() {
            self.curriculum.default_track = other.curriculum.default_track;
        }

        self
    }

    /// Reject values a file layer could have set out of range.
    pub fn validate(&self) -> Result<()> {
        if !GenerationConfig::is_valid_timeout(self.generation.timeout_seconds) {
            return Err(LingoError::config(format!(
                "generation.timeout_seconds must be >= {}",
                MIN_TIMEOUT_SECONDS
            )));
        }
        if self.generation.default_count == 0 {
            return Err(LingoError::config("generation.default_count must be > 0"));
        }
        if self.generation.max_vocabulary == 0 {
            return Err(LingoError::config("generation.max_vocabulary must be > 0"));
        }
        Ok(())
    }
}

/// Keys up to this many characters never show their tail when redacted.
pub const REDACT_TAIL_MIN_LEN: usize = 8;

/// Access credential for the generative model.
///
/// Resolved once at process start and immutable afterwards. `Debug` and
/// `Display` never print the secret.
#[derive(Clone, PartialEq, Eq)]
pub struct Credential(String);

impl Credential {
    /// Wrap a key. Blank keys are treated as absent.
    pub fn new(key: impl Into<String>) -> Option<Self> {
        let key = key.into();
        let trimmed = key.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(Self(trimmed.to_string()))
        }
    }

    /// Resolve the credential from [`CREDENTIAL_ENV_VARS`].
    pub fn from_env() -> Option<Self> {
        let credential = CREDENTIAL_ENV_VARS
            .iter()
            .filter_map(|name| env::var(name).ok())
            .find_map(Self::new);

        if credential.is_none() {
            tracing::warn!(
                vars = ?CREDENTIAL_ENV_VARS,
                "no model API key configured; practice sentences will use fallback data"
            );
        }
        credential
    }

    /// The raw key, for building requests.
    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A redacted form safe for display.
    ///
    /// Keys of [`REDACT_TAIL_MIN_LEN`] characters or fewer are fully masked.
    pub fn redacted(&self) -> String {
        let len = self.0.chars().count();
        if len <= REDACT_TAIL_MIN_LEN {
            return "****".to_string();
        }
        let tail: String = self.0.chars().skip(len - 4).collect();
        format!("****{}", tail)
    }
}

impl fmt::Debug for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Credential({})", self.redacted())
    }
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.redacted())
    }
}

/// Get the lingopath home directory.
///
/// Checks `LINGOPATH_HOME` first, then falls back to `~/.lingopath`.
pub fn lingopath_home() -> Option<PathBuf> {
    if let Ok(home) = env::var("LINGOPATH_HOME") {
        if home.is_empty() {
            tracing::warn!("LINGOPATH_HOME is empty, using default");
        } else {
            return Some(PathBuf::from(home));
        }
    }

    dirs::home_dir().map(|home| home.join(".lingopath"))
}
