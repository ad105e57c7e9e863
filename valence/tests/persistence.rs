use serde_json::json;
use valence::config::{SCHEMA_VERSION, STORAGE_KEY, STORAGE_PROBE_KEY};
use valence::{
    Environment, LoadOutcome, MemoryStore, PersistenceService, PersonNode, Position, TrustLevel, TrustScore,
    ViewTransform,
};

fn service(mem: &MemoryStore) -> PersistenceService {
    let (env, _) = Environment::deterministic("id", 0);
    PersistenceService::new(Box::new(mem.clone()), env)
}

fn sample_nodes() -> Vec<PersonNode> {
    let mut p = PersonNode::person("p-1".into(), "Ada".into(), Position::new(-12.25, 480.0));
    p.trust_score = Some(TrustScore { outward: TrustLevel::Low, inward: TrustLevel::Medium, uncertain: true });
    vec![PersonNode::self_node("me".into(), "You".into(), Position::new(400.0, 300.0)), p]
}

#[test]
fn save_then_load_is_identity() {
    let mem = MemoryStore::new();
    let mut svc = service(&mem);
    let nodes = sample_nodes();
    let vt = ViewTransform { zoom: 1.75, pan_x: -20.0, pan_y: 33.5 };
    svc.save(&nodes, &vt);
    let (loaded, outcome) = svc.load_outcome();
    assert_eq!(outcome, LoadOutcome::Restored);
    assert_eq!(loaded.nodes, nodes);
    assert_eq!(loaded.view_transform, vt);
    assert_eq!(loaded.version, SCHEMA_VERSION);
    assert_eq!(loaded.saved_at, "1970-01-01T00:00:00Z");
    assert!(mem.raw(STORAGE_PROBE_KEY).is_none(), "probe key must be cleaned up");
}

#[test]
fn stored_record_shape() {
    let mem = MemoryStore::new();
    let mut svc = service(&mem);
    svc.save(&sample_nodes()[..1], &ViewTransform::default());
    let v: serde_json::Value = serde_json::from_str(&mem.raw(STORAGE_KEY).unwrap()).unwrap();
    assert_eq!(
        v,
        json!({
            "version": "1.0.0",
            "nodes": [{"id": "me", "name": "You", "position": {"x": 400.0, "y": 300.0}, "isSelf": true}],
            "viewTransform": {"zoom": 1.0, "panX": 0.0, "panY": 0.0},
            "savedAt": "1970-01-01T00:00:00Z"
        })
    );
}

#[test]
fn corrupted_json_equals_missing() {
    let mem = MemoryStore::new();
    mem.insert_raw(STORAGE_KEY, "{not json");
    let (corrupt, outcome) = service(&mem).load_outcome();
    assert_eq!(outcome, LoadOutcome::Corrupt);

    let (missing, outcome) = service(&MemoryStore::new()).load_outcome();
    assert_eq!(outcome, LoadOutcome::Missing);
    assert_eq!(corrupt, missing);
}

#[test]
fn rejected_payloads_fall_back() {
    let cases = [
        (json!({"version": "1.0.0", "nodes": [], "viewTransform": {"zoom": 1, "panX": 0, "panY": 0}, "savedAt": "x"}), LoadOutcome::Invalid),
        (json!({"version": "1.0.0", "nodes": [{"id": "a", "name": "A", "position": {"x": 0, "y": 0}, "isSelf": false}], "viewTransform": {"zoom": 1, "panX": 0, "panY": 0}, "savedAt": "x"}), LoadOutcome::Invalid),
        (json!({"version": "0.1.0", "nodes": [{"id": "a", "name": "A", "position": {"x": 0, "y": 0}, "isSelf": true}], "viewTransform": {"zoom": 1, "panX": 0, "panY": 0}, "savedAt": "x"}), LoadOutcome::VersionMismatch),
        (json!({"version": "1.0.0", "nodes": [{"id": "a", "isSelf": true}], "viewTransform": {"zoom": 1, "panX": 0, "panY": 0}, "savedAt": "x"}), LoadOutcome::Invalid),
        (json!(42), LoadOutcome::Invalid),
    ];
    for (payload, expected) in cases {
        let mem = MemoryStore::new();
        mem.insert_raw(STORAGE_KEY, &payload.to_string());
        let (state, outcome) = service(&mem).load_outcome();
        assert_eq!(outcome, expected, "{payload}");
        assert_eq!(state.nodes.len(), 1);
        assert!(state.nodes[0].is_self);
        assert_eq!(state.view_transform, ViewTransform::default());
    }
}

#[test]
fn unavailable_storage_degrades_silently() {
    let mem = MemoryStore::new();
    mem.insert_raw(STORAGE_KEY, "{}");
    mem.set_disabled(true);
    let mut svc = service(&mem);
    assert!(!svc.is_available());
    let (state, outcome) = svc.load_outcome();
    assert_eq!(outcome, LoadOutcome::Unavailable);
    assert_eq!(state.nodes.len(), 1);
    svc.save(&sample_nodes(), &ViewTransform::default());
    svc.clear();
    assert_eq!(mem.raw(STORAGE_KEY).as_deref(), Some("{}"));
    assert!(svc.try_save(&sample_nodes(), &ViewTransform::default()).is_err());
}

#[test]
fn quota_exceeded_is_swallowed() {
    let mem = MemoryStore::with_quota(64);
    let mut svc = service(&mem);
    svc.save(&sample_nodes(), &ViewTransform::default());
    assert!(mem.raw(STORAGE_KEY).is_none());
    let err = svc.try_save(&sample_nodes(), &ViewTransform::default()).unwrap_err();
    assert_eq!(err.code(), "quota_exceeded");
}

#[test]
fn clear_removes_the_key() {
    let mem = MemoryStore::new();
    let mut svc = service(&mem);
    svc.save(&sample_nodes(), &ViewTransform::default());
    svc.clear();
    assert!(mem.raw(STORAGE_KEY).is_none());
    assert_eq!(svc.load_outcome().1, LoadOutcome::Missing);
}

#[test]
fn custom_key_and_self_defaults() {
    let mem = MemoryStore::new();
    let (env, _) = Environment::deterministic("id", 0);
    let cfg = valence::CanvasConfig {
        storage_key: "other".into(),
        self_name: "Me".into(),
        self_position: Position::new(0.0, 0.0),
        ..Default::default()
    };
    let mut svc = PersistenceService::with_config(Box::new(mem.clone()), env, &cfg);
    let def = svc.load();
    assert_eq!(def.nodes[0].name, "Me");
    assert_eq!(def.nodes[0].id, "id-1");
    svc.save(&def.nodes, &def.view_transform);
    assert!(mem.raw("other").is_some());
    assert!(mem.raw(STORAGE_KEY).is_none());
}
