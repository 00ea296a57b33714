//! Read-only curriculum snapshot backed by a JSON file.
//!
//! File layout:
//!
//! ```json
//! {
//!   "tracks": { "english": [{ "id": "1", "title": "Salam", "icon": "👋", "xp_reward": 10 }] },
//!   "progress": [{ "learner_id": "u1", "lesson_id": "1" }]
//! }
//! ```

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::core::{LessonDescriptor, ProgressRecord};
use crate::error::Result;
use crate::storage::CurriculumStore;
use crate::util::read_json;

/// On-disk shape of a curriculum snapshot.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CurriculumSnapshot {
    /// Lessons per track, in track order.
    pub tracks: HashMap<String, Vec<LessonDescriptor>>,
    /// Completion records of all learners.
    pub progress: Vec<ProgressRecord>,
}

/// Curriculum store reading a JSON snapshot once at open time.
#[derive(Debug, Clone)]
pub struct JsonCurriculumStore {
    path: PathBuf,
    snapshot: CurriculumSnapshot,
}

impl JsonCurriculumStore {
    /// Read the snapshot at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let snapshot: CurriculumSnapshot = read_json(&path)?;
        tracing::debug!(
            path = %path.display(),
            tracks = snapshot.tracks.len(),
            records = snapshot.progress.len(),
            "loaded curriculum snapshot"
        );
        Ok(Self { path, snapshot })
    }

    /// Where the snapshot was read from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Track IDs in the snapshot, sorted.
    pub fn track_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.snapshot.tracks.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }
}

impl CurriculumStore for JsonCurriculumStore {
    fn lessons_by_track(&self, track_id: &str) -> Result<Vec<LessonDescriptor>> {
        Ok(self
            .snapshot
            .tracks
            .get(track_id)
            .cloned()
            .unwrap_or_default())
    }

    fn progress(&self, learner_id: &str) -> Result<Vec<ProgressRecord>> {
        Ok(self
            .snapshot
            .progress
            .iter()
            .filter(|r| r.learner_id == learner_id)
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LingoError;
    use crate::storage::traits::tests::check_seeded_store;
    use std::fs;
    use tempfile::TempDir;

    const SNAPSHOT: &str = r#"{
        "tracks": {
            "english": [
                {"id": "a", "title": "Salam", "icon": "👋", "xp_reward": 10},
                {"id": "b", "title": "Angka", "icon": "🔢", "xp_reward": 10},
                {"id": "c", "title": "Warna", "icon": "🎨", "xp_reward": 15}
            ],
            "mandarin": []
        },
        "progress": [
            {"learner_id": "u1", "lesson_id": "a", "completed_at": "2025-01-02T03:04:05Z"},
            {"learner_id": "u1", "lesson_id": "old"},
            {"learner_id": "u2", "lesson_id": "b"}
        ]
    }"#;

    fn write_snapshot(dir: &TempDir, content: &str) -> PathBuf {
        let path = dir.path().join("curriculum.json");
        fs::write(&path, content).unwrap();
        path
    }

    #[test]
    fn test_json_store_contract() {
        let dir = TempDir::new().unwrap();
        let store = JsonCurriculumStore::open(write_snapshot(&dir, SNAPSHOT)).unwrap();
        check_seeded_store(&store);
        assert_eq!(store.track_ids(), vec!["english", "mandarin"]);
    }

    #[test]
    fn test_missing_sections_default_to_empty() {
        let dir = TempDir::new().unwrap();
        let store = JsonCurriculumStore::open(write_snapshot(&dir, "{}")).unwrap();
        assert!(store.lessons_by_track("english").unwrap().is_empty());
        assert!(store.progress("u1").unwrap().is_empty());
    }

    #[test]
    fn test_open_missing_file() {
        let err = JsonCurriculumStore::open("/nonexistent/curriculum.json").unwrap_err();
        assert!(matches!(err, LingoError::Storage { .. }));
    }

    #[test]
    fn test_open_invalid_json() {
        let dir = TempDir::new().unwrap();
        let err = JsonCurriculumStore::open(write_snapshot(&dir, "[1, 2")).unwrap_err();
        assert!(matches!(err, LingoError::Serde { .. }));
    }
}
