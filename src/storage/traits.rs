//! Curriculum storage traits for lingopath.
//!
//! The core never persists anything itself. A [`CurriculumStore`] is the
//! read side of whatever service holds lessons and progress; callers fetch
//! one snapshot per gating evaluation.

use std::sync::Arc;

use crate::core::{CompletedLessons, LessonDescriptor, LessonSequence, ProgressRecord};
use crate::error::Result;

/// Source of lesson tracks and learner progress.
///
/// There is deliberately no way to remove a progress record: completion is
/// monotonic.
pub trait CurriculumStore: Send + Sync {
    /// Lessons of a track, in track order. Unknown tracks yield an empty list.
    fn lessons_by_track(&self, track_id: &str) -> Result<Vec<LessonDescriptor>>;

    /// All progress records of a learner.
    fn progress(&self, learner_id: &str) -> Result<Vec<ProgressRecord>>;

    /// Validated lesson sequence for a track.
    fn sequence(&self, track_id: &str) -> Result<LessonSequence> {
        LessonSequence::new(self.lessons_by_track(track_id)?)
    }

    /// The completed-lesson set induced by a learner's progress.
    fn completed_lessons(&self, learner_id: &str) -> Result<CompletedLessons> {
        Ok(CompletedLessons::from_records(&self.progress(learner_id)?))
    }
}

/// Blanket implementation for Arc-wrapped stores.
impl<T: CurriculumStore + ?Sized> CurriculumStore for Arc<T> {
    fn lessons_by_track(&self, track_id: &str) -> Result<Vec<LessonDescriptor>> {
        (**self).lessons_by_track(track_id)
    }

    fn progress(&self, learner_id: &str) -> Result<Vec<ProgressRecord>> {
        (**self).progress(learner_id)
    }
}

/// Test utilities for CurriculumStore implementations.
#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::core::LessonId;

    /// Verify a store seeded with track "english" = [a, b, c] and learner
    /// "u1" having completed "a" plus a retired lesson "old".
    pub fn check_seeded_store<S: CurriculumStore>(store: &S) {
        let lessons = store.lessons_by_track("english").unwrap();
        let ids: Vec<&str> = lessons.iter().map(|l| l.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);

        assert!(store.lessons_by_track("klingon").unwrap().is_empty());

        let completed = store.completed_lessons("u1").unwrap();
        assert!(completed.contains(&LessonId::new("a")));
        assert!(completed.contains(&LessonId::new("old")));
        assert!(store.progress("nobody").unwrap().is_empty());

        let path = store.sequence("english").unwrap().evaluate(&completed);
        let flags: Vec<(bool, bool)> = path
            .nodes
            .iter()
            .map(|n| (n.is_completed, n.is_unlocked))
            .collect();
        assert_eq!(flags, vec![(true, true), (false, true), (false, false)]);
    }
}
