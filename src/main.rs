//! Lingopath - lesson gating and practice content for language learners
//!
//! CLI entry point with global panic handler.

use std::io::Write;
use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use lingopath::cli::config_cmd::{ConfigCommand, ConfigOptions};
use lingopath::cli::path::{PathCommand, PathOptions};
use lingopath::cli::practice::{PracticeCommand, PracticeOptions};
use lingopath::config::{lingopath_home, Config, Credential};
use lingopath::core::TargetLanguage;
use lingopath::error::exit_codes;
use lingopath::generation::{ContentGenerator, GeminiClient};
use lingopath::storage::JsonCurriculumStore;

/// Environment variable holding the log filter.
const LOG_ENV: &str = "LINGOPATH_LOG";

// =============================================================================
// CLI Definition
// =============================================================================

/// Lingopath - lesson gating and practice content for language learners
#[derive(Parser)]
#[command(name = "lingopath")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show a learner's gated lesson path on a track
    Path {
        /// JSON curriculum snapshot (defaults to curriculum.data_file)
        #[arg(long)]
        data: Option<PathBuf>,
        /// Track ID (defaults to curriculum.default_track)
        #[arg(long, short)]
        track: Option<String>,
        /// Learner ID
        #[arg(long, short)]
        learner: String,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Generate practice sentences from a vocabulary file
    Practice {
        /// JSON file with an array of vocabulary items
        #[arg(long)]
        vocab: PathBuf,
        /// Language being learned (english, mandarin)
        #[arg(long, short, default_value = "english")]
        language: TargetLanguage,
        /// Number of sentences (defaults to generation.default_count)
        #[arg(long, short)]
        count: Option<usize>,
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
        /// Suppress output
        #[arg(long, short)]
        quiet: bool,
    },

    /// Show the effective configuration
    Config {
        /// Output as JSON
        #[arg(long, short)]
        json: bool,
    },
}

// =============================================================================
// Main Entry Point
// =============================================================================

fn main() -> ExitCode {
    setup_panic_handler();
    init_logging();

    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("lingopath error: {}", e);
            ExitCode::from(exit_codes::ERROR as u8)
        }
    }
}

/// Route `tracing` output to stderr, filtered by `LINGOPATH_LOG`.
fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

/// Set up the global panic handler.
///
/// On panic, logs to ~/.lingopath/crash.log and exits with code 3.
fn setup_panic_handler() {
    std::panic::set_hook(Box::new(|info| {
        eprintln!("lingopath panic: {}", info);

        if let Some(home) = lingopath_home() {
            let _ = std::fs::create_dir_all(&home);
            let crash_log = home.join("crash.log");
            if let Ok(mut file) = std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(&crash_log)
            {
                let timestamp = chrono::Utc::now().format("%Y-%m-%d %H:%M:%S UTC");
                let _ = writeln!(file, "[{}] {}", timestamp, info);
            }
        }

        std::process::exit(exit_codes::CRASH);
    }));
}

/// Run the CLI and return the exit code.
fn run() -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let config = Config::load();
    config.validate()?;

    match cli.command {
        Commands::Path {
            data,
            track,
            learner,
            json,
            quiet,
        } => run_path(config, data, track, learner, json, quiet),
        Commands::Practice {
            vocab,
            language,
            count,
            json,
            quiet,
        } => run_practice(config, vocab, language, count, json, quiet),
        Commands::Config { json } => run_config(config, json),
    }
}

// =============================================================================
// Command Implementations
// =============================================================================

/// Convert a success boolean to an exit code.
fn success_to_exit_code(success: bool) -> ExitCode {
    if success {
        ExitCode::from(exit_codes::SUCCESS as u8)
    } else {
        ExitCode::from(exit_codes::ERROR as u8)
    }
}

fn print_formatted(formatted: &str) {
    if !formatted.is_empty() {
        print!("{}", formatted);
    }
}

fn run_path(
    config: Config,
    data: Option<PathBuf>,
    track: Option<String>,
    learner: String,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let Some(data) = data.or_else(|| config.curriculum.data_file.clone()) else {
        return Err("no --data given and curriculum.data_file is unset".into());
    };

    let store = JsonCurriculumStore::open(data)?;
    let cmd = PathCommand::new(store, config);
    let options = PathOptions {
        track,
        learner,
        json,
        quiet,
    };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_practice(
    config: Config,
    vocab: PathBuf,
    language: TargetLanguage,
    count: Option<usize>,
    json: bool,
    quiet: bool,
) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let credential = Credential::from_env();
    let client = GeminiClient::new(&config.generation);
    let generator = ContentGenerator::new(config.generation, credential, client);
    let cmd = PracticeCommand::new(generator);
    let options = PracticeOptions {
        vocab,
        language,
        count,
        json,
        quiet,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let output = runtime.block_on(cmd.run(&options));
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}

fn run_config(config: Config, json: bool) -> Result<ExitCode, Box<dyn std::error::Error>> {
    let cmd = ConfigCommand::new(config, Credential::from_env());
    let options = ConfigOptions { json, quiet: false };

    let output = cmd.run(&options);
    print_formatted(&cmd.format_output(&output, &options));

    Ok(success_to_exit_code(output.success))
}
