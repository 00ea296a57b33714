//! Lesson gating for a learning track.
//!
//! A track is a totally ordered sequence of lessons. Each lesson depends only
//! on its immediate predecessor: the first lesson is always open, and every
//! other lesson opens once its predecessor is completed.
//!
//! Per-lesson state machine (derived, never persisted):
//!
//! ```text
//! Locked ──(predecessor completed)──▶ Unlocked ──(progress observed)──▶ Completed
//! ```

use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::core::lesson::{CompletedLessons, LessonDescriptor, LessonId};
use crate::error::{LingoError, Result};

/// Derived display state of a lesson.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    /// Predecessor not yet completed.
    Locked,
    /// Playable but not completed.
    Unlocked,
    /// Completion observed. Terminal.
    Completed,
}

impl LessonStatus {
    /// Whether this is the terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, LessonStatus::Completed)
    }

    /// Whether the learner may open the lesson.
    pub fn is_accessible(&self) -> bool {
        !matches!(self, LessonStatus::Locked)
    }
}

impl fmt::Display for LessonStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LessonStatus::Locked => write!(f, "locked"),
            LessonStatus::Unlocked => write!(f, "unlocked"),
            LessonStatus::Completed => write!(f, "completed"),
        }
    }
}

/// A validated, ordered lesson sequence for one track.
///
/// Construction rejects duplicate and blank identifiers so gating can never
/// silently resolve the wrong predecessor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LessonSequence {
    lessons: Vec<LessonDescriptor>,
    positions: HashMap<LessonId, usize>,
}

impl LessonSequence {
    /// Validate and wrap an ordered list of lessons.
    pub fn new(lessons: Vec<LessonDescriptor>) -> Result<Self> {
        let mut positions = HashMap::with_capacity(lessons.len());

        for (index, lesson) in lessons.iter().enumerate() {
            if lesson.id.is_blank() {
                return Err(LingoError::invalid_sequence(format!(
                    "lesson at position {} has a blank id",
                    index
                )));
            }
            if let Some(first) = positions.insert(lesson.id.clone(), index) {
                return Err(LingoError::invalid_sequence(format!(
                    "duplicate lesson id '{}' at positions {} and {}",
                    lesson.id, first, index
                )));
            }
        }

        Ok(Self { lessons, positions })
    }

    /// The lessons in track order.
    pub fn lessons(&self) -> &[LessonDescriptor] {
        &self.lessons
    }

    /// Number of lessons.
    pub fn len(&self) -> usize {
        self.lessons.len()
    }

    /// Whether the track has no lessons.
    pub fn is_empty(&self) -> bool {
        self.lessons.is_empty()
    }

    /// Position of a lesson in the track.
    pub fn position(&self, id: &LessonId) -> Option<usize> {
        self.positions.get(id).copied()
    }

    /// Whether the lesson belongs to this track.
    pub fn contains(&self, id: &LessonId) -> bool {
        self.positions.contains_key(id)
    }

    /// The lesson a given lesson depends on.
    ///
    /// `None` for the first lesson and for IDs not in the track.
    pub fn predecessor(&self, id: &LessonId) -> Option<&LessonDescriptor> {
        let index = self.position(id)?;
        index.checked_sub(1).map(|prev| &self.lessons[prev])
    }

    /// Completed IDs that do not belong to this track (e.g. retired lessons).
    pub fn unknown_ids<'a>(&self, completed: &'a CompletedLessons) -> Vec<&'a LessonId> {
        let mut unknown: Vec<&LessonId> =
            completed.iter().filter(|id| !self.contains(id)).collect();
        unknown.sort();
        unknown
    }

    /// Compute the gating state of every lesson.
    ///
    /// Single pass, constant-time lookups. Completed IDs that are not part of
    /// the track are ignored; they are only collected when debug logging is on.
    pub fn evaluate(&self, completed: &CompletedLessons) -> GatedPath {
        if tracing::enabled!(tracing::Level::DEBUG) {
            let unknown = self.unknown_ids(completed);
            if !unknown.is_empty() {
                tracing::debug!(
                    count = unknown.len(),
                    ids = ?unknown,
                    "ignoring completed lessons not present in track"
                );
            }
        }

        let nodes = self
            .lessons
            .iter()
            .map(|lesson| {
                let is_completed = completed.contains(&lesson.id);
                let is_unlocked = match self.predecessor(&lesson.id) {
                    None => true,
                    Some(prev) => completed.contains(&prev.id),
                };
                LessonNode {
                    lesson: lesson.clone(),
                    is_completed,
                    is_unlocked,
                }
            })
            .collect();

        GatedPath { nodes }
    }
}

/// Gating result for one lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonNode {
    /// The lesson.
    pub lesson: LessonDescriptor,
    /// A completion for this lesson was observed.
    pub is_completed: bool,
    /// The learner may open this lesson.
    pub is_unlocked: bool,
}

impl LessonNode {
    /// Collapse the two flags into a display state.
    ///
    /// A completed lesson stays `Completed` even if its predecessor is not,
    /// since completion is observed rather than derived.
    pub fn status(&self) -> LessonStatus {
        if self.is_completed {
            LessonStatus::Completed
        } else if self.is_unlocked {
            LessonStatus::Unlocked
        } else {
            LessonStatus::Locked
        }
    }
}

/// Gating result for a whole track, in track order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatedPath {
    /// One node per lesson.
    pub nodes: Vec<LessonNode>,
}

impl GatedPath {
    /// Number of lessons in the path.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the path is empty.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The first lesson that is open but not yet completed.
    pub fn next_lesson(&self) -> Option<&LessonNode> {
        self.nodes
            .iter()
            .find(|node| node.status() == LessonStatus::Unlocked)
    }

    /// Number of completed lessons in this track.
    pub fn completed_count(&self) -> usize {
        self.nodes.iter().filter(|node| node.is_completed).count()
    }

    /// XP earned from completed lessons in this track.
    pub fn earned_xp(&self) -> u64 {
        self.nodes
            .iter()
            .filter(|node| node.is_completed)
            .map(|node| u64::from(node.lesson.xp_reward))
            .sum()
    }

    /// Whether every lesson in the track is completed.
    pub fn is_finished(&self) -> bool {
        !self.nodes.is_empty() && self.nodes.iter().all(|node| node.is_completed)
    }
}

/// Validate `lessons` and evaluate them against `completed` in one call.
pub fn evaluate(lessons: &[LessonDescriptor], completed: &CompletedLessons) -> Result<GatedPath> {
    let sequence = LessonSequence::new(lessons.to_vec())?;
    Ok(sequence.evaluate(completed))
}
