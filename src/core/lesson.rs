//! Lesson and progress entities.
//!
//! These are immutable value types handed in by the caller. The core never
//! owns their lifecycle; it only reads them.

use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Stable identifier of a lesson (a "topic" in the curriculum store).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LessonId(String);

impl LessonId {
    /// Create a lesson ID from any string-like value.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// The raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the identifier is blank.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for LessonId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for LessonId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for LessonId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<u64> for LessonId {
    fn from(id: u64) -> Self {
        Self(id.to_string())
    }
}

/// A lesson node on a learning track.
///
/// Position is implicit: it is the descriptor's index in the ordered
/// sequence for its track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LessonDescriptor {
    /// Unique, stable identifier.
    pub id: LessonId,
    /// Display label.
    pub title: String,
    /// Display icon (usually an emoji).
    #[serde(default)]
    pub icon: String,
    /// XP awarded on completion.
    #[serde(default)]
    pub xp_reward: u32,
}

impl LessonDescriptor {
    /// Create a new lesson descriptor.
    pub fn new(
        id: impl Into<LessonId>,
        title: impl Into<String>,
        icon: impl Into<String>,
        xp_reward: u32,
    ) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            icon: icon.into(),
            xp_reward,
        }
    }
}

/// One completion event: a learner finished a lesson.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressRecord {
    /// The learner who completed the lesson.
    pub learner_id: String,
    /// The completed lesson.
    pub lesson_id: LessonId,
    /// When the completion was recorded, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<DateTime<Utc>>,
}

impl ProgressRecord {
    /// Create a progress record stamped with the current time.
    pub fn new(learner_id: impl Into<String>, lesson_id: impl Into<LessonId>) -> Self {
        Self {
            learner_id: learner_id.into(),
            lesson_id: lesson_id.into(),
            completed_at: Some(Utc::now()),
        }
    }
}

/// The set of lesson IDs a learner has completed.
///
/// Backed by a hash set for constant-time membership tests. There is no
/// removal operation: completion is monotonic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompletedLessons {
    ids: HashSet<LessonId>,
}

impl CompletedLessons {
    /// Create an empty set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build the set induced by a learner's progress records.
    pub fn from_records<'a>(records: impl IntoIterator<Item = &'a ProgressRecord>) -> Self {
        records
            .into_iter()
            .map(|record| record.lesson_id.clone())
            .collect()
    }

    /// Record a completion. Returns false if it was already present.
    pub fn insert(&mut self, id: impl Into<LessonId>) -> bool {
        self.ids.insert(id.into())
    }

    /// Whether the lesson has been completed.
    pub fn contains(&self, id: &LessonId) -> bool {
        self.ids.contains(id)
    }

    /// Number of completed lessons (including ones unknown to any track).
    pub fn len(&self) -> usize {
        self.ids.len()
    }

    /// Whether no lesson has been completed.
    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Iterate over the completed IDs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = &LessonId> {
        self.ids.iter()
    }
}

impl<I: Into<LessonId>> FromIterator<I> for CompletedLessons {
    fn from_iter<T: IntoIterator<Item = I>>(iter: T) -> Self {
        Self {
            ids: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lesson_id_conversions() {
        assert_eq!(LessonId::from(7u64).as_str(), "7");
        assert_eq!(LessonId::from("greetings").to_string(), "greetings");
        assert!(LessonId::new("  ").is_blank());
        assert!(!LessonId::new("a").is_blank());
    }

    #[test]
    fn test_lesson_descriptor_deserializes_with_defaults() {
        let lesson: LessonDescriptor =
            serde_json::from_str(r#"{"id": "1", "title": "Salam"}"#).unwrap();
        assert_eq!(lesson.id, LessonId::new("1"));
        assert_eq!(lesson.icon, "");
        assert_eq!(lesson.xp_reward, 0);
    }

    #[test]
    fn test_completed_from_records() {
        let records = vec![
            ProgressRecord::new("u1", "a"),
            ProgressRecord::new("u1", "b"),
            ProgressRecord::new("u1", "a"),
        ];
        let completed = CompletedLessons::from_records(&records);
        assert_eq!(completed.len(), 2);
        assert!(completed.contains(&LessonId::new("a")));
        assert!(completed.contains(&LessonId::new("b")));
        assert!(!completed.contains(&LessonId::new("c")));
    }

    #[test]
    fn test_completed_insert_is_idempotent() {
        let mut completed = CompletedLessons::new();
        assert!(completed.is_empty());
        assert!(completed.insert("a"));
        assert!(!completed.insert("a"));
        assert_eq!(completed.len(), 1);
    }

    #[test]
    fn test_progress_record_timestamp_optional() {
        let record: ProgressRecord =
            serde_json::from_str(r#"{"learner_id": "u1", "lesson_id": "3"}"#).unwrap();
        assert!(record.completed_at.is_none());
        let json = serde_json::to_string(&record).unwrap();
        assert!(!json.contains("completed_at"));
    }
}
