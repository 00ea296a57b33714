//! In-memory curriculum storage.
//!
//! Thread-safe implementation of [`CurriculumStore`], used by tests and by
//! callers that already hold their curriculum in memory.

use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use crate::core::{LessonDescriptor, LessonId, ProgressRecord};
use crate::error::Result;
use crate::storage::CurriculumStore;

/// In-memory curriculum store.
#[derive(Debug, Default)]
pub struct MemoryCurriculumStore {
    tracks: RwLock<HashMap<String, Vec<LessonDescriptor>>>,
    progress: RwLock<Vec<ProgressRecord>>,
}

impl MemoryCurriculumStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the lessons of a track.
    pub fn set_track(&self, track_id: impl Into<String>, lessons: Vec<LessonDescriptor>) {
        self.tracks
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(track_id.into(), lessons);
    }

    /// Append a completion. Returns false if the learner already had it.
    pub fn record_completion(&self, record: ProgressRecord) -> bool {
        let mut progress = self
            .progress
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if has_completion(&progress, &record.learner_id, &record.lesson_id) {
            return false;
        }
        progress.push(record);
        true
    }

    /// Number of stored progress records.
    pub fn progress_len(&self) -> usize {
        self.progress
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

fn has_completion(records: &[ProgressRecord], learner_id: &str, lesson_id: &LessonId) -> bool {
    records
        .iter()
        .any(|r| r.learner_id == learner_id && &r.lesson_id == lesson_id)
}

impl CurriculumStore for MemoryCurriculumStore {
    fn lessons_by_track(&self, track_id: &str) -> Result<Vec<LessonDescriptor>> {
        let tracks = self.tracks.read().unwrap_or_else(PoisonError::into_inner);
        Ok(tracks.get(track_id).cloned().unwrap_or_default())
    }

    fn progress(&self, learner_id: &str) -> Result<Vec<ProgressRecord>> {
        let progress = self.progress.read().unwrap_or_else(PoisonError::into_inner);
        Ok(progress
            .iter()
            .filter(|r| r.learner_id == learner_id)
            .cloned()
            .collect())
    }
}
