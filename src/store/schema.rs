use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::data::model::ResultMap;
use crate::engine::list::Mode;

pub const SCHEMA_VERSION: u32 = 1;

/// Persisted session snapshot. Every field carries a serde default so
/// partially-shaped or old data degrades to a fresh session instead of
/// failing to parse; a malformed file is handled the same way by the store.
///
/// `current_index` is only a hint: the working list may have changed since
/// the snapshot was written (dataset edits, wrong-only membership), so it
/// is re-clamped against the freshly built list on restore.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SessionSnapshot {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    #[serde(default)]
    pub mode: Mode,
    #[serde(default)]
    pub results: ResultMap,
    #[serde(default)]
    pub current_index: usize,
    #[serde(default)]
    pub last_viewed: Option<String>,
    #[serde(default = "Utc::now")]
    pub saved_at: DateTime<Utc>,
}

fn default_schema_version() -> u32 {
    SCHEMA_VERSION
}

impl Default for SessionSnapshot {
    fn default() -> Self {
        Self {
            schema_version: SCHEMA_VERSION,
            mode: Mode::default(),
            results: ResultMap::new(),
            current_index: 0,
            last_viewed: None,
            saved_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_deserializes_from_empty_object() {
        let snapshot: SessionSnapshot = serde_json::from_str("{}").unwrap();
        assert_eq!(snapshot.schema_version, SCHEMA_VERSION);
        assert_eq!(snapshot.mode, Mode::Normal);
        assert!(snapshot.results.is_empty());
        assert_eq!(snapshot.current_index, 0);
        assert!(snapshot.last_viewed.is_none());
    }

    #[test]
    fn snapshot_tolerates_partial_fields() {
        let json = r#"{"mode": "wrong-only", "current_index": 3}"#;
        let snapshot: SessionSnapshot = serde_json::from_str(json).unwrap();
        assert_eq!(snapshot.mode, Mode::WrongOnly);
        assert_eq!(snapshot.current_index, 3);
        assert!(snapshot.results.is_empty());
        assert!(snapshot.last_viewed.is_none());
    }

    #[test]
    fn snapshot_round_trips() {
        let mut snapshot = SessionSnapshot::default();
        snapshot.mode = Mode::Shuffle;
        snapshot.results.insert("q2".to_string(), false);
        snapshot.current_index = 1;
        snapshot.last_viewed = Some("q2".to_string());

        let json = serde_json::to_string(&snapshot).unwrap();
        let restored: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.mode, Mode::Shuffle);
        assert_eq!(restored.results, snapshot.results);
        assert_eq!(restored.current_index, 1);
        assert_eq!(restored.last_viewed.as_deref(), Some("q2"));
    }
}
