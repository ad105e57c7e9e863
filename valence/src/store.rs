//! Canvas state store: single owner of the node list and view transform.
//!
//! Exactly one node is the self node, and it can be neither removed nor
//! trust-scored. Removing a node also clears any editing or selection marker
//! pointing at it. Every real change to the nodes or the view transform
//! restarts the save debounce, while marker changes, no-ops and the initial
//! load leave it alone. Non-finite coordinates are rejected so that whatever
//! is saved can be loaded back.

use crate::config::CanvasConfig;
use crate::env::Environment;
use crate::geometry::layout;
use crate::interaction::debounce::Debouncer;
use crate::model::{
    sanitize_name, CanvasState, PersistedCanvasState, PersonNode, Position, TrustScore, ViewTransform,
    ViewTransformPatch, Viewport,
};
use crate::persist::service::{LoadOutcome, PersistenceService};
use crate::persist::storage::KeyValueStore;
use log::debug;

pub struct CanvasStore {
    state: CanvasState,
    persistence: PersistenceService,
    env: Environment,
    debounce: Debouncer,
    fallback_viewport: Viewport,
    load_outcome: LoadOutcome,
}

impl CanvasStore {
    pub fn open(store: Box<dyn KeyValueStore>, env: Environment) -> Self {
        CanvasStore::open_with_config(store, env, &CanvasConfig::default())
    }

    /// Loads the stored snapshot (or the default) without scheduling a save.
    pub fn open_with_config(store: Box<dyn KeyValueStore>, env: Environment, config: &CanvasConfig) -> Self {
        let mut persistence = PersistenceService::with_config(store, env.clone(), config);
        let (snapshot, load_outcome) = persistence.load_outcome();
        debug!("canvas opened ({load_outcome:?}) with {} nodes", snapshot.nodes.len());
        CanvasStore {
            state: state_from(snapshot),
            persistence,
            env,
            debounce: Debouncer::new(config.debounce_ms),
            fallback_viewport: config.fallback_viewport,
            load_outcome,
        }
    }

    pub fn state(&self) -> &CanvasState { &self.state }
    pub fn nodes(&self) -> &[PersonNode] { &self.state.nodes }
    pub fn node(&self, id: &str) -> Option<&PersonNode> { self.state.node(id) }
    pub fn self_node(&self) -> Option<&PersonNode> { self.state.self_node() }
    pub fn view_transform(&self) -> ViewTransform { self.state.view_transform }
    pub fn editing_node_id(&self) -> Option<&str> { self.state.editing_node_id.as_deref() }
    pub fn selected_node_id(&self) -> Option<&str> { self.state.selected_node_id.as_deref() }
    pub fn load_outcome(&self) -> LoadOutcome { self.load_outcome }
    pub fn fallback_viewport(&self) -> Viewport { self.fallback_viewport }

    pub fn is_self(&self, id: &str) -> bool { self.node(id).is_some_and(|n| n.is_self) }

    fn touch(&mut self) { self.debounce.schedule(self.env.clock.now_ms()); }

    /// Appends a person. Returns the new id, or `None` when the name is blank
    /// or the position is not finite.
    pub fn add_node(&mut self, name: &str, position: Position) -> Option<String> {
        if !position.is_finite() {
            return None;
        }
        let name = sanitize_name(name)?;
        let id = self.env.ids.next_id();
        self.state.nodes.push(PersonNode::person(id.clone(), name, position));
        self.touch();
        Some(id)
    }

    /// Adds a person and redistributes every person on a ring around the
    /// viewport center, zooming out if the ring no longer fits.
    pub fn add_person(&mut self, name: &str, viewport: Viewport) -> Option<String> {
        let viewport = viewport.or(self.fallback_viewport);
        let center = viewport.center();
        let id = self.add_node(name, center)?;
        let count = self.state.people().count();
        let ring = layout::radial_layout(center, count);
        for (node, pos) in self.state.nodes.iter_mut().filter(|n| !n.is_self).zip(ring.positions) {
            node.position = pos;
        }
        if let Some(z) = layout::zoom_out_to_fit(self.state.view_transform.zoom, ring.radius, viewport) {
            self.state.view_transform = self.state.view_transform.merged(&ViewTransformPatch::zoom(z));
        }
        Some(id)
    }

    pub fn update_node_position(&mut self, id: &str, position: Position) {
        if !position.is_finite() {
            return;
        }
        let Some(node) = self.state.node_mut(id) else { return };
        if node.position == position {
            return;
        }
        node.position = position;
        self.touch();
    }

    pub fn update_node_name(&mut self, id: &str, name: &str) {
        let Some(name) = sanitize_name(name) else { return };
        let Some(node) = self.state.node_mut(id) else { return };
        if node.name == name {
            return;
        }
        node.name = name;
        self.touch();
    }

    /// Removes a person. Requests for the self node are ignored.
    pub fn remove_node(&mut self, id: &str) {
        let Some(idx) = self.state.nodes.iter().position(|n| n.id == id && !n.is_self) else { return };
        self.state.nodes.remove(idx);
        if self.state.editing_node_id.as_deref() == Some(id) {
            self.state.editing_node_id = None;
        }
        if self.state.selected_node_id.as_deref() == Some(id) {
            self.state.selected_node_id = None;
        }
        self.touch();
    }

    pub fn update_view_transform(&mut self, patch: ViewTransformPatch) {
        let next = self.state.view_transform.merged(&patch);
        if next == self.state.view_transform {
            return;
        }
        self.state.view_transform = next;
        self.touch();
    }

    pub fn update_trust_score(&mut self, id: &str, score: TrustScore) {
        let Some(node) = self.state.node_mut(id) else { return };
        if node.is_self || node.trust_score == Some(score) {
            return;
        }
        node.trust_score = Some(score);
        self.touch();
    }

    pub fn set_editing_node_id(&mut self, id: Option<&str>) { self.state.editing_node_id = id.map(str::to_string) }

    pub fn set_selected_node_id(&mut self, id: Option<&str>) {
        self.state.selected_node_id = id.map(str::to_string)
    }

    /// Clears storage and returns to the default single-node canvas. The
    /// cleared key stays absent until the next real change.
    pub fn reset_canvas(&mut self) {
        self.persistence.clear();
        self.debounce.cancel();
        self.state = state_from(self.persistence.default_state());
        debug!("canvas reset");
    }

    pub fn has_pending_save(&self) -> bool { self.debounce.is_pending() }
    pub fn save_deadline_ms(&self) -> Option<u64> { self.debounce.deadline() }

    /// Timer tick: writes once the quiet period has elapsed.
    pub fn flush_due(&mut self, now_ms: u64) -> bool {
        if !self.debounce.fire_if_due(now_ms) {
            return false;
        }
        self.write();
        true
    }

    /// Writes any pending change immediately (page hide/unload).
    pub fn flush_now(&mut self) -> bool {
        if !self.debounce.take() {
            return false;
        }
        self.write();
        true
    }

    fn write(&mut self) { self.persistence.save(&self.state.nodes, &self.state.view_transform) }
}

fn state_from(snapshot: PersistedCanvasState) -> CanvasState {
    CanvasState {
        nodes: snapshot.nodes,
        view_transform: snapshot.view_transform,
        editing_node_id: None,
        selected_node_id: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persist::storage::MemoryStore;

    fn fresh() -> CanvasStore {
        let (env, _clock) = Environment::deterministic("n", 0);
        CanvasStore::open(Box::new(MemoryStore::new()), env)
    }

    #[test]
    fn noop_mutations_do_not_schedule() {
        let mut s = fresh();
        let me = s.self_node().unwrap().id.clone();
        s.update_node_position("missing", Position::new(1.0, 1.0));
        s.update_node_name(&me, "   ");
        s.remove_node(&me);
        s.update_trust_score(&me, TrustScore::default());
        s.update_view_transform(ViewTransformPatch::zoom(1.0));
        s.set_selected_node_id(Some(&me));
        assert!(!s.has_pending_save());
    }

    #[test]
    fn add_person_lays_out_around_viewport_center() {
        let mut s = fresh();
        s.add_person("A", Viewport::new(0.0, 0.0)).unwrap();
        s.add_person("B", Viewport::new(0.0, 0.0)).unwrap();
        let people: Vec<_> = s.state().people().map(|n| n.position).collect();
        assert!((people[0].x - 550.0).abs() < 1e-9 && (people[0].y - 300.0).abs() < 1e-9);
        assert!((people[1].x - 250.0).abs() < 1e-9 && (people[1].y - 300.0).abs() < 1e-9);
        assert_eq!(s.self_node().unwrap().position, Position::new(400.0, 300.0));
    }

    #[test]
    fn add_person_with_blank_name_changes_nothing() {
        let mut s = fresh();
        assert_eq!(s.add_person("  ", Viewport::new(800.0, 600.0)), None);
        assert_eq!(s.nodes().len(), 1);
        assert!(!s.has_pending_save());
    }
}
