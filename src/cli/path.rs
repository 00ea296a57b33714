//! Path command for lingopath.
//!
//! Shows a learner's gated lesson path for one track.

use serde::{Deserialize, Serialize};

use crate::config::Config;
use crate::core::{GatedPath, LessonStatus};
use crate::error::Result;
use crate::storage::CurriculumStore;

/// Options for the path command.
#[derive(Debug, Clone, Default)]
pub struct PathOptions {
    /// Track to show. Falls back to `curriculum.default_track`.
    pub track: Option<String>,
    /// Learner whose progress drives the gating.
    pub learner: String,
    /// Output as JSON.
    pub json: bool,
    /// Suppress output.
    pub quiet: bool,
}

/// One lesson row in the path output.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PathEntry {
    pub id: String,
    pub title: String,
    pub icon: String,
    pub xp_reward: u32,
    pub status: LessonStatus,
}

/// Output format for the path command.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PathOutput {
    /// Whether the command was successful.
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub learner: Option<String>,
    /// Lessons in track order.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lessons: Vec<PathEntry>,
    /// First unlocked lesson not yet completed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next_lesson: Option<String>,
    pub completed: usize,
    pub earned_xp: u64,
    /// Completions that refer to lessons outside the track.
    pub ignored_completions: usize,
    /// Error message if command failed.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PathOutput {
    /// Create a successful output from an evaluated path.
    pub fn success(
        track: impl Into<String>,
        learner: impl Into<String>,
        path: &GatedPath,
        ignored_completions: usize,
    ) -> Self {
        let lessons = path
            .nodes
            .iter()
            .map(|node| PathEntry {
                id: node.lesson.id.to_string(),
                title: node.lesson.title.clone(),
                icon: node.lesson.icon.clone(),
                xp_reward: node.lesson.xp_reward,
                status: node.status(),
            })
            .collect();

        Self {
            success: true,
            track: Some(track.into()),
            learner: Some(learner.into()),
            lessons,
            next_lesson: path.next_lesson().map(|n| n.lesson.id.to_string()),
            completed: path.completed_count(),
            earned_xp: path.earned_xp(),
            ignored_completions,
            error: None,
        }
    }

    /// Create a failed output.
    pub fn failure(error: impl Into<String>) -> Self {
        Self {
            success: false,
            track: None,
            learner: None,
            lessons: Vec::new(),
            next_lesson: None,
            completed: 0,
            earned_xp: 0,
            ignored_completions: 0,
            error: Some(error.into()),
        }
    }
}

/// The path command implementation.
pub struct PathCommand<S: CurriculumStore> {
    store: S,
    config: Config,
}

impl<S: CurriculumStore> PathCommand<S> {
    /// Create a new path command.
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    /// Run the path command.
    pub fn run(&self, options: &PathOptions) -> PathOutput {
        let Some(track) = options
            .track
            .clone()
            .or_else(|| self.config.curriculum.default_track.clone())
        else {
            return PathOutput::failure("no track given and curriculum.default_track is unset");
        };

        match self.evaluate(&track, &options.learner) {
            Ok((path, ignored)) => PathOutput::success(track, &options.learner, &path, ignored),
            Err(e) => PathOutput::failure(e.to_string()),
        }
    }

    fn evaluate(&self, track: &str, learner: &str) -> Result<(GatedPath, usize)> {
        let sequence = self.store.sequence(track)?;
        let completed = self.store.completed_lessons(learner)?;
        let ignored = sequence.unknown_ids(&completed).len();
        Ok((sequence.evaluate(&completed), ignored))
    }

    /// Format output based on options.
    pub fn format_output(&self, output: &PathOutput, options: &PathOptions) -> String {
        if options.quiet {
            return String::new();
        }

        if options.json {
            serde_json::to_string_pretty(output).unwrap_or_else(|_| "{}".to_string())
        } else {
            self.format_human_readable(output)
        }
    }

    fn format_human_readable(&self, output: &PathOutput) -> String {
        if !output.success {
            return format!(
                "Path command failed: {}\n",
                output.error.as_deref().unwrap_or("unknown error")
            );
        }

        let track = output.track.as_deref().unwrap_or("?");
        if output.lessons.is_empty() {
            return format!("Track '{}' has no lessons.\n", track);
        }

        let mut lines = Vec::new();
        lines.push(format!(
            "Track '{}' for {}: {}/{} completed, {} XP\n",
            track,
            output.learner.as_deref().unwrap_or("?"),
            output.completed,
            output.lessons.len(),
            output.earned_xp
        ));

        for (i, entry) in output.lessons.iter().enumerate() {
            let marker = match entry.status {
                LessonStatus::Completed => "[x]",
                LessonStatus::Unlocked => "[ ]",
                LessonStatus::Locked => "[-]",
            };
            lines.push(format!(
                "  {} {:>2}. {} {} ({} XP)",
                marker,
                i + 1,
                entry.icon,
                entry.title,
                entry.xp_reward
            ));
        }

        match &output.next_lesson {
            Some(id) => lines.push(format!("\nNext lesson: {}", id)),
            None => lines.push("\nTrack finished.".to_string()),
        }

        lines.join("\n") + "\n"
    }
}
