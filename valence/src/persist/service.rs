//! Versioned snapshot persistence.
//!
//! `load` never fails. Unavailable storage, unparsable JSON, a structural
//! rejection or a version mismatch all yield a fresh default snapshot, and
//! old schema versions are discarded rather than migrated. `save` and `clear`
//! log storage errors instead of returning them, so the canvas keeps running
//! in memory.

use crate::config::{CanvasConfig, SCHEMA_VERSION, STORAGE_PROBE_KEY};
use crate::env::Environment;
use crate::model::{PersistedCanvasState, PersonNode, Position, ViewTransform};
use crate::persist::storage::{KeyValueStore, StorageError};
use log::{debug, warn};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

#[derive(Clone, Debug, PartialEq, Error)]
pub enum SnapshotError {
    #[error("stored snapshot is not valid JSON: {0}")]
    JsonParse(String),
    #[error("stored snapshot has invalid structure: {0}")]
    InvalidStructure(&'static str),
    #[error("stored snapshot version {found} does not match {expected}")]
    VersionMismatch { found: String, expected: &'static str },
    #[error("stored snapshot could not be decoded: {0}")]
    Decode(String),
}

impl SnapshotError {
    pub fn code(&self) -> &'static str {
        match self {
            SnapshotError::JsonParse(_) => "json_parse",
            SnapshotError::InvalidStructure(_) => "invalid_structure",
            SnapshotError::VersionMismatch { .. } => "version_mismatch",
            SnapshotError::Decode(_) => "decode",
        }
    }
}

/// How `load_outcome` arrived at its snapshot.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
    Restored,
    Missing,
    Unavailable,
    Corrupt,
    Invalid,
    VersionMismatch,
}

impl LoadOutcome {
    pub fn is_restored(self) -> bool { self == LoadOutcome::Restored }

    pub fn as_str(self) -> &'static str {
        match self {
            LoadOutcome::Restored => "restored",
            LoadOutcome::Missing => "missing",
            LoadOutcome::Unavailable => "unavailable",
            LoadOutcome::Corrupt => "corrupt",
            LoadOutcome::Invalid => "invalid",
            LoadOutcome::VersionMismatch => "version_mismatch",
        }
    }
}

/// Structural check on an untyped payload.
pub fn validate_snapshot(v: &Value) -> Result<(), SnapshotError> {
    let obj = v.as_object().ok_or(SnapshotError::InvalidStructure("root is not an object"))?;
    if !obj.get("version").is_some_and(Value::is_string) {
        return Err(SnapshotError::InvalidStructure("version"));
    }
    let nodes = obj
        .get("nodes")
        .and_then(Value::as_array)
        .ok_or(SnapshotError::InvalidStructure("nodes"))?;
    if nodes.is_empty() {
        return Err(SnapshotError::InvalidStructure("nodes is empty"));
    }
    if !nodes.iter().any(|n| n.get("isSelf").and_then(Value::as_bool) == Some(true)) {
        return Err(SnapshotError::InvalidStructure("no self node"));
    }
    let vt = obj
        .get("viewTransform")
        .and_then(Value::as_object)
        .ok_or(SnapshotError::InvalidStructure("viewTransform"))?;
    for field in ["zoom", "panX", "panY"] {
        if !vt.get(field).is_some_and(Value::is_number) {
            return Err(SnapshotError::InvalidStructure("viewTransform field"));
        }
    }
    if !obj.get("savedAt").is_some_and(Value::is_string) {
        return Err(SnapshotError::InvalidStructure("savedAt"));
    }
    Ok(())
}

/// Parses, validates, version-checks and decodes a stored payload.
pub fn parse_snapshot(raw: &str) -> Result<PersistedCanvasState, SnapshotError> {
    let v: Value = serde_json::from_str(raw).map_err(|e| SnapshotError::JsonParse(e.to_string()))?;
    validate_snapshot(&v)?;
    let found = v.get("version").and_then(Value::as_str).unwrap_or_default();
    if found != SCHEMA_VERSION {
        return Err(SnapshotError::VersionMismatch { found: found.to_string(), expected: SCHEMA_VERSION });
    }
    serde_json::from_value(v).map_err(|e| SnapshotError::Decode(e.to_string()))
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotRef<'a> {
    version: &'static str,
    nodes: &'a [PersonNode],
    view_transform: &'a ViewTransform,
    saved_at: String,
}

pub struct PersistenceService {
    store: Box<dyn KeyValueStore>,
    key: String,
    env: Environment,
    self_name: String,
    self_position: Position,
}

impl PersistenceService {
    pub fn new(store: Box<dyn KeyValueStore>, env: Environment) -> Self {
        PersistenceService::with_config(store, env, &CanvasConfig::default())
    }

    pub fn with_config(store: Box<dyn KeyValueStore>, env: Environment, config: &CanvasConfig) -> Self {
        PersistenceService {
            store,
            key: config.storage_key.clone(),
            env,
            self_name: config.self_name.clone(),
            self_position: config.self_position,
        }
    }

    pub fn key(&self) -> &str { &self.key }

    /// Trivial write+delete probe. Any failure means unavailable.
    pub fn is_available(&mut self) -> bool {
        self.store
            .set_item(STORAGE_PROBE_KEY, STORAGE_PROBE_KEY)
            .and_then(|_| self.store.remove_item(STORAGE_PROBE_KEY))
            .is_ok()
    }

    pub fn default_state(&self) -> PersistedCanvasState {
        PersistedCanvasState {
            version: SCHEMA_VERSION.to_string(),
            nodes: vec![PersonNode::self_node(self.env.ids.next_id(), self.self_name.clone(), self.self_position)],
            view_transform: ViewTransform::default(),
            saved_at: self.env.clock.now_iso(),
        }
    }

    pub fn load(&mut self) -> PersistedCanvasState { self.load_outcome().0 }

    pub fn load_outcome(&mut self) -> (PersistedCanvasState, LoadOutcome) {
        if !self.is_available() {
            warn!("local storage not available, using default canvas state");
            return (self.default_state(), LoadOutcome::Unavailable);
        }
        let raw = match self.store.get_item(&self.key) {
            Ok(Some(raw)) if !raw.is_empty() => raw,
            Ok(_) => return (self.default_state(), LoadOutcome::Missing),
            Err(e) => {
                warn!("failed to read canvas state: {e}");
                return (self.default_state(), LoadOutcome::Unavailable);
            }
        };
        match parse_snapshot(&raw) {
            Ok(state) => (state, LoadOutcome::Restored),
            Err(e) => {
                warn!("discarding stored canvas state ({}): {e}", e.code());
                let outcome = match e {
                    SnapshotError::JsonParse(_) => LoadOutcome::Corrupt,
                    SnapshotError::VersionMismatch { .. } => LoadOutcome::VersionMismatch,
                    SnapshotError::InvalidStructure(_) | SnapshotError::Decode(_) => LoadOutcome::Invalid,
                };
                (self.default_state(), outcome)
            }
        }
    }

    /// Writes a snapshot stamped with the current time.
    pub fn try_save(&mut self, nodes: &[PersonNode], view_transform: &ViewTransform) -> Result<(), StorageError> {
        if !self.is_available() {
            return Err(StorageError::Unavailable);
        }
        let snap = SnapshotRef { version: SCHEMA_VERSION, nodes, view_transform, saved_at: self.env.clock.now_iso() };
        let json = serde_json::to_string(&snap).map_err(|e| StorageError::Backend(e.to_string()))?;
        self.store.set_item(&self.key, &json)?;
        debug!("saved canvas state: {} nodes, {} bytes", nodes.len(), json.len());
        Ok(())
    }

    pub fn save(&mut self, nodes: &[PersonNode], view_transform: &ViewTransform) {
        if let Err(e) = self.try_save(nodes, view_transform) {
            warn!("failed to save canvas state ({}): {e}", e.code());
        }
    }

    pub fn clear(&mut self) {
        if !self.is_available() {
            return;
        }
        if let Err(e) = self.store.remove_item(&self.key) {
            warn!("failed to clear canvas state ({}): {e}", e.code());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn good() -> Value {
        json!({
            "version": "1.0.0",
            "nodes": [{"id": "s", "name": "You", "position": {"x": 400, "y": 300}, "isSelf": true}],
            "viewTransform": {"zoom": 1.0, "panX": 0, "panY": 0},
            "savedAt": "2024-01-01T00:00:00Z"
        })
    }

    #[test]
    fn validator_accepts_well_formed() {
        assert_eq!(validate_snapshot(&good()), Ok(()));
        assert!(parse_snapshot(&good().to_string()).is_ok());
    }

    #[test]
    fn validator_rejections() {
        let cases: Vec<(&str, Value)> = vec![
            ("version", json!(1)),
            ("nodes", json!([])),
            ("nodes", json!("x")),
            ("nodes", json!([{"id": "a", "isSelf": false}])),
            ("nodes", json!([{"id": "a", "isSelf": "true"}])),
            ("viewTransform", json!({"zoom": "1", "panX": 0, "panY": 0})),
            ("viewTransform", json!({"zoom": 1, "panX": 0})),
            ("savedAt", json!(null)),
        ];
        for (field, bad) in cases {
            let mut v = good();
            v[field] = bad;
            assert_eq!(validate_snapshot(&v).unwrap_err().code(), "invalid_structure", "{field}");
        }
        assert!(validate_snapshot(&json!([1, 2])).is_err());
    }

    #[test]
    fn version_mismatch_is_distinct() {
        let mut v = good();
        v["version"] = json!("0.9.0");
        assert_eq!(parse_snapshot(&v.to_string()).unwrap_err().code(), "version_mismatch");
    }

    #[test]
    fn structurally_valid_but_undecodable_nodes() {
        let mut v = good();
        v["nodes"] = json!([{"isSelf": true}]);
        assert_eq!(parse_snapshot(&v.to_string()).unwrap_err().code(), "decode");
    }

    #[test]
    fn garbage_is_json_parse() {
        assert_eq!(parse_snapshot("{not json").unwrap_err().code(), "json_parse");
    }
}
