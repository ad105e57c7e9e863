use valence::config::STORAGE_KEY;
use valence::interaction::drag::{DragEvent, PointerCapture, PointerSample};
use valence::interaction::keyboard::KeyDisposition;
use valence::{CanvasController, CanvasStore, Clock, Environment, ManualClock, MemoryStore, ViewTransformPatch};

fn controller(mem: &MemoryStore) -> (CanvasController, ManualClock) {
    let (env, clock) = Environment::deterministic("n", 0);
    (CanvasController::new(CanvasStore::open(Box::new(mem.clone()), env)), clock)
}

#[derive(Default)]
struct Element {
    captured: Option<i32>,
}

impl PointerCapture for Element {
    fn set_pointer_capture(&mut self, id: i32) { self.captured = Some(id) }
    fn release_pointer_capture(&mut self, id: i32) {
        assert_eq!(self.captured, Some(id));
        self.captured = None;
    }
}

#[test]
fn arrow_keys_pan_and_are_consumed() {
    let (mut c, _) = controller(&MemoryStore::new());
    assert_eq!(c.key_down("ArrowUp", &false), KeyDisposition::Consumed);
    assert_eq!(c.store().view_transform().pan_y, 50.0);
    c.key_down("ArrowDown", &false);
    c.key_down("ArrowDown", &false);
    assert_eq!(c.store().view_transform().pan_y, -50.0);
    c.key_down("ArrowLeft", &false);
    assert_eq!(c.store().view_transform().pan_x, 50.0);
    c.key_down("ArrowRight", &false);
    assert_eq!(c.store().view_transform().pan_x, 0.0);
}

#[test]
fn typing_suppresses_shortcuts() {
    let (mut c, _) = controller(&MemoryStore::new());
    let a = c.add_person("A").unwrap();
    c.select_node(Some(&a));
    assert_eq!(c.key_down("Backspace", &true), KeyDisposition::Ignored);
    assert!(c.store().node(&a).is_some());
    c.set_shortcuts_enabled(false);
    assert_eq!(c.key_down("Delete", &false), KeyDisposition::Ignored);
    assert!(c.store().node(&a).is_some());
    c.set_shortcuts_enabled(true);
    assert_eq!(c.key_down("Delete", &false), KeyDisposition::Consumed);
    assert!(c.store().node(&a).is_none());
    assert_eq!(c.store().selected_node_id(), None);
}

#[test]
fn delete_key_never_removes_self() {
    let (mut c, _) = controller(&MemoryStore::new());
    let me = c.store().self_node().unwrap().id.clone();
    c.select_node(Some(&me));
    c.key_down("Delete", &false);
    assert!(c.store().node(&me).is_some());
}

#[test]
fn keyboard_zoom_is_stepped_and_clamped() {
    let (mut c, _) = controller(&MemoryStore::new());
    c.key_down("+", &false);
    c.key_down("=", &false);
    assert!((c.store().view_transform().zoom - 1.2).abs() < 1e-9);
    for _ in 0..20 {
        c.key_down("-", &false);
    }
    // the keyboard floor is wider but the store floor wins
    assert_eq!(c.store().view_transform().zoom, 0.5);
    for _ in 0..30 {
        c.key_down("_", &false);
        c.key_down("+", &false);
    }
    assert!(c.store().view_transform().zoom <= 2.0);
}

#[test]
fn space_centers_on_self() {
    let (mut c, _) = controller(&MemoryStore::new());
    c.set_viewport(1000.0, 800.0);
    c.key_down(" ", &false);
    let vt = c.store().view_transform();
    assert_eq!((vt.pan_x, vt.pan_y), (100.0, 100.0));

    c.store_mut().update_view_transform(ViewTransformPatch::zoom(2.0));
    c.key_down(" ", &false);
    let vt = c.store().view_transform();
    assert_eq!((vt.pan_x, vt.pan_y), (500.0 - 800.0, 400.0 - 600.0));
}

#[test]
fn escape_and_enter_are_consumed() {
    let (mut c, _) = controller(&MemoryStore::new());
    assert_eq!(c.key_down("Escape", &false), KeyDisposition::Consumed);
    assert_eq!(c.key_down("Enter", &false), KeyDisposition::Consumed);
    assert_eq!(c.key_down("x", &false), KeyDisposition::Ignored);
}

#[test]
fn drag_gesture_persists_once_after_quiet_period() {
    let mem = MemoryStore::new();
    let (mut c, clock) = controller(&mem);
    let a = c.add_person("A").unwrap();
    c.flush();
    let writes = mem.writes_to(STORAGE_KEY);

    let mut el = Element::default();
    let start = c.store().node(&a).unwrap().position;
    let ev = c.pointer_down(&a, PointerSample::new(7, 100.0, 100.0), &mut el).unwrap();
    assert!(matches!(ev, DragEvent::Start { .. }));
    assert_eq!(el.captured, Some(7));
    for i in 1..=10 {
        clock.advance(16);
        c.pointer_move(&a, PointerSample::new(7, 100.0 + i as f64, 100.0)).unwrap();
        assert!(!c.tick(clock.now_ms()));
    }
    c.pointer_up(&a, PointerSample::new(7, 110.0, 100.0), &mut el).unwrap();
    assert_eq!(el.captured, None);

    clock.advance(500);
    assert!(c.tick(clock.now_ms()));
    assert_eq!(mem.writes_to(STORAGE_KEY), writes + 1);
    let end = c.store().node(&a).unwrap().position;
    assert!((end.x - start.x - 10.0).abs() < 1e-9);
}

#[test]
fn cancelled_pointer_stops_dragging() {
    let (mut c, _) = controller(&MemoryStore::new());
    let a = c.add_person("A").unwrap();
    let mut el = Element::default();
    c.pointer_down(&a, PointerSample::new(1, 0.0, 0.0), &mut el);
    assert!(c.is_dragging(&a));
    c.pointer_cancel(&a);
    assert!(!c.is_dragging(&a));
    assert!(c.pointer_move(&a, PointerSample::new(1, 5.0, 5.0)).is_none());
}

#[test]
fn reset_map_needs_confirmation() {
    let mem = MemoryStore::new();
    let (mut c, _) = controller(&mem);
    c.add_person("A");
    c.flush();
    assert!(!c.reset_map(false));
    assert_eq!(c.store().nodes().len(), 2);
    assert!(c.reset_map(true));
    assert_eq!(c.store().nodes().len(), 1);
    assert!(mem.raw(STORAGE_KEY).is_none());
}

#[test]
fn trust_editor_flow_feeds_arrows() {
    let (mut c, _) = controller(&MemoryStore::new());
    let a = c.add_person("A").unwrap();
    assert!(c.trust_arrows().is_empty());
    assert!(c.open_trust_editor(&a));
    assert!(c.save_trust_score(valence::TrustScore {
        outward: valence::TrustLevel::High,
        inward: valence::TrustLevel::Medium,
        uncertain: false,
    }));
    assert_eq!(c.scoring_node_id(), None);
    let arrows = c.trust_arrows();
    assert_eq!(arrows.len(), 2);
    assert!(arrows.iter().all(|a| !a.dashed));
}
