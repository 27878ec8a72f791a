use std::fs;
use std::io::Write;
use std::path::PathBuf;

use anyhow::Result;

use crate::store::schema::SessionSnapshot;

const SNAPSHOT_FILE: &str = "session.json";

/// Persistence bridge: one JSON snapshot under the platform data dir.
/// Corruption is contained here — a file that is absent, unreadable, or
/// unparseable loads as a default snapshot and is never surfaced as an
/// error to the user.
pub struct JsonStore {
    base_dir: PathBuf,
}

impl JsonStore {
    pub fn new() -> Result<Self> {
        let base_dir = dirs::data_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("quizdr");
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    pub fn with_base_dir(base_dir: PathBuf) -> Result<Self> {
        fs::create_dir_all(&base_dir)?;
        Ok(Self { base_dir })
    }

    fn snapshot_path(&self) -> PathBuf {
        self.base_dir.join(SNAPSHOT_FILE)
    }

    pub fn load_snapshot(&self) -> SessionSnapshot {
        let path = self.snapshot_path();
        if path.exists() {
            match fs::read_to_string(&path) {
                Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
                Err(_) => SessionSnapshot::default(),
            }
        } else {
            SessionSnapshot::default()
        }
    }

    /// Atomic write: stage to a tmp file, fsync, rename over the old
    /// snapshot. A crash mid-save leaves the previous snapshot intact.
    pub fn save_snapshot(&self, snapshot: &SessionSnapshot) -> Result<()> {
        let path = self.snapshot_path();
        let tmp_path = path.with_extension("tmp");

        let json = serde_json::to_string_pretty(snapshot)?;
        let mut file = fs::File::create(&tmp_path)?;
        file.write_all(json.as_bytes())?;
        file.sync_all()?;

        fs::rename(&tmp_path, &path)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::ResultMap;
    use crate::engine::list::Mode;
    use tempfile::TempDir;

    fn make_test_store() -> (TempDir, JsonStore) {
        let dir = TempDir::new().unwrap();
        let store = JsonStore::with_base_dir(dir.path().to_path_buf()).unwrap();
        (dir, store)
    }

    #[test]
    fn missing_file_loads_as_default() {
        let (_dir, store) = make_test_store();
        let snapshot = store.load_snapshot();
        assert_eq!(snapshot.mode, Mode::Normal);
        assert!(snapshot.results.is_empty());
        assert_eq!(snapshot.current_index, 0);
    }

    #[test]
    fn malformed_file_loads_as_default() {
        let (_dir, store) = make_test_store();
        fs::write(store.snapshot_path(), "{not json at all").unwrap();
        let snapshot = store.load_snapshot();
        assert_eq!(snapshot.mode, Mode::Normal);
        assert!(snapshot.results.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let (_dir, store) = make_test_store();
        let snapshot = SessionSnapshot {
            mode: Mode::WrongOnly,
            results: ResultMap::from([
                ("q2".to_string(), false),
                ("q1".to_string(), true),
            ]),
            current_index: 1,
            last_viewed: Some("q2".to_string()),
            ..SessionSnapshot::default()
        };
        store.save_snapshot(&snapshot).unwrap();

        let loaded = store.load_snapshot();
        assert_eq!(loaded.mode, Mode::WrongOnly);
        assert_eq!(loaded.results, snapshot.results);
        assert_eq!(loaded.current_index, 1);
        assert_eq!(loaded.last_viewed.as_deref(), Some("q2"));
    }

    #[test]
    fn empty_results_and_absent_last_viewed_round_trip() {
        let (_dir, store) = make_test_store();
        store.save_snapshot(&SessionSnapshot::default()).unwrap();
        let loaded = store.load_snapshot();
        assert!(loaded.results.is_empty());
        assert!(loaded.last_viewed.is_none());
    }

    #[test]
    fn save_overwrites_previous_snapshot() {
        let (_dir, store) = make_test_store();
        let mut snapshot = SessionSnapshot::default();
        snapshot.current_index = 2;
        store.save_snapshot(&snapshot).unwrap();
        snapshot.current_index = 5;
        store.save_snapshot(&snapshot).unwrap();
        assert_eq!(store.load_snapshot().current_index, 5);

        // No residual tmp file after a successful save
        assert!(!store.snapshot_path().with_extension("tmp").exists());
    }

    #[test]
    fn partial_fields_on_disk_fall_back_to_defaults() {
        let (_dir, store) = make_test_store();
        fs::write(store.snapshot_path(), r#"{"mode": "shuffle"}"#).unwrap();
        let loaded = store.load_snapshot();
        assert_eq!(loaded.mode, Mode::Shuffle);
        assert_eq!(loaded.current_index, 0);
        assert!(loaded.results.is_empty());
    }
}
