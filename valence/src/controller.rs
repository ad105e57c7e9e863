//! Presentation-facing glue around [`CanvasStore`].
//!
//! Owns what the view components would otherwise keep for themselves: one
//! drag recognizer and tracker per node, the keyboard dispatcher, the
//! measured viewport and the open trust-score editor. Every change still
//! lands in the store.

use crate::config::{self, PAN_STEP, ZOOM_MAX, ZOOM_MIN, ZOOM_STEP};
use crate::geometry::arrows::{self, TrustArrow};
use crate::geometry::transform;
use crate::interaction::drag::{DragEvent, DragRecognizer, NodeDragTracker, PointerCapture, PointerSample};
use crate::interaction::keyboard::{FocusContext, KeyDisposition, KeyboardDispatcher, PanDirection, ShortcutHandler};
use crate::model::{TrustScore, ViewTransformPatch, Viewport};
use crate::store::CanvasStore;
use std::collections::HashMap;

pub struct CanvasController {
    store: CanvasStore,
    viewport: Viewport,
    keyboard: KeyboardDispatcher,
    drags: HashMap<String, (DragRecognizer, NodeDragTracker)>,
    scoring_node_id: Option<String>,
}

impl CanvasController {
    pub fn new(store: CanvasStore) -> Self {
        let viewport = store.fallback_viewport();
        CanvasController {
            store,
            viewport,
            keyboard: KeyboardDispatcher::default(),
            drags: HashMap::new(),
            scoring_node_id: None,
        }
    }

    pub fn store(&self) -> &CanvasStore { &self.store }
    pub fn store_mut(&mut self) -> &mut CanvasStore { &mut self.store }
    pub fn viewport(&self) -> Viewport { self.viewport }

    /// Records the live container size; unmeasured sizes fall back.
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.viewport = Viewport::new(width, height).or(self.store.fallback_viewport());
    }

    pub fn add_person(&mut self, name: &str) -> Option<String> { self.store.add_person(name, self.viewport) }

    pub fn remove_node(&mut self, id: &str) {
        self.store.remove_node(id);
        if self.store.node(id).is_none() {
            self.drags.remove(id);
            if self.scoring_node_id.as_deref() == Some(id) {
                self.scoring_node_id = None;
            }
        }
    }

    // Selection and inline rename

    /// Selecting ends any rename in progress.
    pub fn select_node(&mut self, id: Option<&str>) {
        let id = id.filter(|id| self.store.node(id).is_some());
        if id.is_some() {
            self.store.set_editing_node_id(None);
        }
        self.store.set_selected_node_id(id);
    }

    /// Starts an inline rename; the node stops being a delete target. The
    /// self node cannot be renamed from the canvas.
    pub fn begin_rename(&mut self, id: &str) -> bool {
        if self.store.node(id).is_none() || self.store.is_self(id) {
            return false;
        }
        self.store.set_selected_node_id(None);
        self.store.set_editing_node_id(Some(id));
        if let Some((rec, tracker)) = self.drags.get_mut(id) {
            rec.pointer_cancel();
            tracker.end();
        }
        true
    }

    pub fn commit_rename(&mut self, name: &str) {
        if let Some(id) = self.store.editing_node_id().map(str::to_string) {
            self.store.update_node_name(&id, name);
            self.store.set_editing_node_id(None);
        }
    }

    pub fn cancel_rename(&mut self) { self.store.set_editing_node_id(None) }

    // Trust-score editor

    pub fn scoring_node_id(&self) -> Option<&str> { self.scoring_node_id.as_deref() }

    pub fn open_trust_editor(&mut self, id: &str) -> bool {
        if self.store.node(id).is_none() || self.store.is_self(id) {
            return false;
        }
        self.scoring_node_id = Some(id.to_string());
        true
    }

    /// Saves the score for the node being scored and closes the editor.
    pub fn save_trust_score(&mut self, score: TrustScore) -> bool {
        let Some(id) = self.scoring_node_id.take() else { return false };
        self.store.update_trust_score(&id, score);
        true
    }

    pub fn cancel_trust_editor(&mut self) { self.scoring_node_id = None }

    // Zoom/pan controls

    pub fn zoom_in(&mut self) { self.zoom_by(ZOOM_STEP) }
    pub fn zoom_out(&mut self) { self.zoom_by(-ZOOM_STEP) }

    fn zoom_by(&mut self, delta: f64) {
        let z = self.store.view_transform().zoom + delta;
        self.store.update_view_transform(ViewTransformPatch::zoom(z));
    }

    pub fn reset_view(&mut self) {
        self.store.update_view_transform(ViewTransformPatch { zoom: Some(1.0), pan_x: Some(0.0), pan_y: Some(0.0) });
    }

    pub fn zoom_percentage(&self) -> u32 { (self.store.view_transform().zoom * 100.0).round() as u32 }
    pub fn can_zoom_in(&self) -> bool { self.store.view_transform().zoom < ZOOM_MAX }
    pub fn can_zoom_out(&self) -> bool { self.store.view_transform().zoom > ZOOM_MIN }

    /// Keyboard zoom uses its own wider floor before the store clamps.
    pub fn keyboard_zoom(&mut self, direction: i8) {
        let step = ZOOM_STEP * f64::from(direction.signum());
        let z = config::clamp_keyboard_zoom(self.store.view_transform().zoom + step);
        self.store.update_view_transform(ViewTransformPatch::zoom(z));
    }

    pub fn pan(&mut self, direction: PanDirection) {
        let vt = self.store.view_transform();
        let (dx, dy) = direction.pan_delta(PAN_STEP);
        self.store.update_view_transform(ViewTransformPatch::pan(vt.pan_x + dx, vt.pan_y + dy));
    }

    pub fn center_on_self(&mut self) {
        let Some(me) = self.store.self_node().map(|n| n.position) else { return };
        let vt = self.store.view_transform();
        let (pan_x, pan_y) = transform::centering_pan(me, self.viewport, vt.zoom);
        self.store.update_view_transform(ViewTransformPatch::pan(pan_x, pan_y));
    }

    /// Escape: closes the trust editor, else ends a rename, else clears
    /// the selection.
    pub fn cancel(&mut self) {
        if self.scoring_node_id.take().is_some() {
            return;
        }
        if self.store.editing_node_id().is_some() {
            self.store.set_editing_node_id(None);
            return;
        }
        self.store.set_selected_node_id(None);
    }

    pub fn delete_selected(&mut self) {
        if let Some(id) = self.store.selected_node_id().map(str::to_string) {
            self.remove_node(&id);
        }
    }

    pub fn reset_map(&mut self, confirmed: bool) -> bool {
        if !confirmed {
            return false;
        }
        self.store.reset_canvas();
        self.drags.clear();
        self.scoring_node_id = None;
        true
    }

    pub fn trust_arrows(&self) -> Vec<TrustArrow> { arrows::trust_arrows(self.store.nodes()) }

    // Keyboard

    pub fn shortcuts_enabled(&self) -> bool { self.keyboard.is_enabled() }
    pub fn set_shortcuts_enabled(&mut self, enabled: bool) { self.keyboard.set_enabled(enabled) }

    pub fn key_down(&mut self, key: &str, focus: &dyn FocusContext) -> KeyDisposition {
        let keyboard = self.keyboard;
        keyboard.dispatch(key, focus, self)
    }

    // Dragging

    fn drag_entry(&mut self, id: &str) -> Option<&mut (DragRecognizer, NodeDragTracker)> {
        let node = self.store.node(id)?;
        let disabled = node.is_self || self.store.editing_node_id() == Some(id);
        let entry = self
            .drags
            .entry(id.to_string())
            .or_insert_with(|| (DragRecognizer::new(id), NodeDragTracker::default()));
        entry.0.set_disabled(disabled);
        Some(entry)
    }

    pub fn pointer_down(&mut self, id: &str, sample: PointerSample, target: &mut dyn PointerCapture) -> Option<DragEvent> {
        let (rec, tracker) = self.drag_entry(id)?;
        let ev = rec.pointer_down(sample, target)?;
        tracker.begin(ev.position());
        Some(ev)
    }

    pub fn pointer_move(&mut self, id: &str, sample: PointerSample) -> Option<DragEvent> {
        let current = self.store.node(id)?.position;
        let (rec, tracker) = self.drag_entry(id)?;
        let ev = rec.pointer_move(sample)?;
        let next = tracker.follow(ev.position(), current);
        if let Some(p) = next {
            self.store.update_node_position(id, p);
        }
        Some(ev)
    }

    pub fn pointer_up(&mut self, id: &str, sample: PointerSample, target: &mut dyn PointerCapture) -> Option<DragEvent> {
        let (rec, tracker) = self.drag_entry(id)?;
        let ev = rec.pointer_up(sample, target)?;
        tracker.end();
        Some(ev)
    }

    pub fn pointer_cancel(&mut self, id: &str) {
        if let Some((rec, tracker)) = self.drags.get_mut(id) {
            rec.pointer_cancel();
            tracker.end();
        }
    }

    pub fn is_dragging(&self, id: &str) -> bool { self.drags.get(id).is_some_and(|(r, _)| r.is_dragging()) }

    // Persistence timer

    pub fn tick(&mut self, now_ms: u64) -> bool { self.store.flush_due(now_ms) }
    pub fn flush(&mut self) -> bool { self.store.flush_now() }
}

impl ShortcutHandler for CanvasController {
    fn on_cancel(&mut self) -> bool {
        self.cancel();
        true
    }

    // Enter is left to the rename field's own handling.
    fn on_confirm(&mut self) -> bool { true }

    fn on_zoom(&mut self, delta: i8) -> bool {
        self.keyboard_zoom(delta);
        true
    }

    fn on_pan(&mut self, direction: PanDirection) -> bool {
        self.pan(direction);
        true
    }

    fn on_delete(&mut self) -> bool {
        self.delete_selected();
        true
    }

    fn on_center(&mut self) -> bool {
        self.center_on_self();
        true
    }
}
