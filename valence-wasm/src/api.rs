use crate::browser::{self, DomFocus, ElementCapture};
use crate::interop::{opt_str, to_js};
use crate::{error, logging, Canvas};
use log::warn;
use valence::geometry::transform::{self, CanvasOffset};
use valence::interaction::drag::{DragEvent, NoCapture, PointerSample};
use valence::interaction::keyboard::ShortcutAction;
use valence::model::sanitize_name;
use valence::{CanvasConfig, Position, TrustLevel, TrustScore, ViewTransformPatch};
use wasm_bindgen::prelude::*;
use web_sys::{KeyboardEvent, PointerEvent};

#[wasm_bindgen]
pub fn set_panic_hook() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}

/// Routes `log` records to the browser console. Safe to call repeatedly.
#[wasm_bindgen]
pub fn init_logging(level: &str) -> bool {
    match logging::init_logging(level) {
        Ok(()) => true,
        Err(e) => {
            web_sys::console::warn_1(&JsValue::from_str(&e));
            false
        }
    }
}

fn parse_score(outward: &str, inward: &str, uncertain: bool) -> Result<TrustScore, JsValue> {
    let outward = TrustLevel::parse(outward).ok_or_else(|| error::invalid_level("outward", outward))?;
    let inward = TrustLevel::parse(inward).ok_or_else(|| error::invalid_level("inward", inward))?;
    Ok(TrustScore { outward, inward, uncertain })
}

fn is_start(ev: Option<DragEvent>) -> bool { matches!(ev, Some(DragEvent::Start { .. })) }

#[wasm_bindgen]
impl Canvas {
    /// Opens the canvas stored under the default key.
    #[wasm_bindgen(constructor)]
    pub fn new() -> Canvas { Canvas::rs_open(&CanvasConfig::default()) }

    pub fn with_storage_key(key: &str) -> Canvas {
        Canvas::rs_open(&CanvasConfig { storage_key: key.to_string(), ..CanvasConfig::default() })
    }

    /// Partial config objects are accepted; unusable ones fall back to defaults.
    pub fn with_config(config: JsValue) -> Canvas {
        let config = if config.is_undefined() || config.is_null() {
            CanvasConfig::default()
        } else {
            serde_wasm_bindgen::from_value::<CanvasConfig>(config).unwrap_or_else(|e| {
                warn!("ignoring invalid canvas config: {e}");
                CanvasConfig::default()
            })
        };
        Canvas::rs_open(&config)
    }

    // Reads

    pub fn state(&self) -> JsValue { self.rs_read(|c| to_js(c.store().state())) }
    pub fn nodes(&self) -> JsValue { self.rs_read(|c| to_js(c.store().nodes())) }
    pub fn node(&self, id: &str) -> JsValue { self.rs_read(|c| c.store().node(id).map_or(JsValue::NULL, to_js)) }
    pub fn view_transform(&self) -> JsValue { self.rs_read(|c| to_js(&c.store().view_transform())) }
    pub fn self_node_id(&self) -> JsValue { self.rs_read(|c| opt_str(c.store().self_node().map(|n| n.id.as_str()))) }
    pub fn selected_node_id(&self) -> JsValue { self.rs_read(|c| opt_str(c.store().selected_node_id())) }
    pub fn editing_node_id(&self) -> JsValue { self.rs_read(|c| opt_str(c.store().editing_node_id())) }
    pub fn scoring_node_id(&self) -> JsValue { self.rs_read(|c| opt_str(c.scoring_node_id())) }
    pub fn load_outcome(&self) -> String { self.rs_read(|c| c.store().load_outcome().as_str().to_string()) }
    pub fn trust_arrows(&self) -> JsValue { self.rs_read(|c| to_js(&c.trust_arrows())) }
    pub fn has_pending_save(&self) -> bool { self.rs_read(|c| c.store().has_pending_save()) }

    // Nodes

    /// Adds a person and re-runs the radial layout. Returns the new id or `null`.
    pub fn add_person(&mut self, name: &str) -> JsValue { opt_str(self.rs_mutate(|c| c.add_person(name)).as_deref()) }
    pub fn add_person_res(&mut self, name: &str) -> JsValue {
        match self.rs_mutate(|c| c.add_person(name)) {
            Some(id) => error::ok(JsValue::from_str(&id)),
            None => error::invalid_name(),
        }
    }

    /// Adds a person at an explicit canvas position, without relayout.
    pub fn add_node(&mut self, name: &str, x: f64, y: f64) -> JsValue {
        opt_str(self.rs_mutate(|c| c.store_mut().add_node(name, Position::new(x, y))).as_deref())
    }
    pub fn add_node_res(&mut self, name: &str, x: f64, y: f64) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        match self.rs_mutate(|c| c.store_mut().add_node(name, Position::new(x, y))) {
            Some(id) => error::ok(JsValue::from_str(&id)),
            None => error::invalid_name(),
        }
    }

    pub fn move_node(&mut self, id: &str, x: f64, y: f64) {
        self.rs_mutate(|c| c.store_mut().update_node_position(id, Position::new(x, y)))
    }
    pub fn move_node_res(&mut self, id: &str, x: f64, y: f64) -> JsValue {
        if !x.is_finite() {
            return error::non_finite("x");
        }
        if !y.is_finite() {
            return error::non_finite("y");
        }
        if self.rs_read(|c| c.store().node(id).is_none()) {
            return error::invalid_id(id);
        }
        self.move_node(id, x, y);
        error::ok(JsValue::TRUE)
    }

    pub fn rename_node(&mut self, id: &str, name: &str) { self.rs_mutate(|c| c.store_mut().update_node_name(id, name)) }
    pub fn rename_node_res(&mut self, id: &str, name: &str) -> JsValue {
        if self.rs_read(|c| c.store().node(id).is_none()) {
            return error::invalid_id(id);
        }
        let Some(clean) = sanitize_name(name) else { return error::invalid_name() };
        self.rename_node(id, &clean);
        error::ok(JsValue::from_str(&clean))
    }

    pub fn remove_node(&mut self, id: &str) { self.rs_mutate(|c| c.remove_node(id)) }
    pub fn remove_node_res(&mut self, id: &str) -> JsValue {
        match self.rs_read(|c| c.store().node(id).map(|n| n.is_self)) {
            None => error::invalid_id(id),
            Some(true) => error::self_node(id),
            Some(false) => {
                self.remove_node(id);
                error::ok(JsValue::TRUE)
            }
        }
    }

    /// Levels are `high`, `medium`, `low` or `unscored`. Invalid input is ignored.
    pub fn set_trust_score(&mut self, id: &str, outward: &str, inward: &str, uncertain: bool) {
        if let Ok(score) = parse_score(outward, inward, uncertain) {
            self.rs_mutate(|c| c.store_mut().update_trust_score(id, score))
        }
    }
    pub fn set_trust_score_res(&mut self, id: &str, outward: &str, inward: &str, uncertain: bool) -> JsValue {
        let score = match parse_score(outward, inward, uncertain) {
            Ok(s) => s,
            Err(e) => return e,
        };
        match self.rs_read(|c| c.store().node(id).map(|n| n.is_self)) {
            None => error::invalid_id(id),
            Some(true) => error::self_node(id),
            Some(false) => {
                self.rs_mutate(|c| c.store_mut().update_trust_score(id, score));
                error::ok(JsValue::TRUE)
            }
        }
    }

    // View

    /// Merges the given fields into the view transform; zoom is clamped.
    pub fn set_view_transform(&mut self, zoom: Option<f64>, pan_x: Option<f64>, pan_y: Option<f64>) {
        let finite = |v: Option<f64>| v.filter(|v| v.is_finite());
        let patch = ViewTransformPatch { zoom: finite(zoom), pan_x: finite(pan_x), pan_y: finite(pan_y) };
        self.rs_mutate(|c| c.store_mut().update_view_transform(patch))
    }
    pub fn set_view_transform_res(&mut self, zoom: Option<f64>, pan_x: Option<f64>, pan_y: Option<f64>) -> JsValue {
        for (name, v) in [("zoom", zoom), ("panX", pan_x), ("panY", pan_y)] {
            if v.is_some_and(|v| !v.is_finite()) {
                return error::non_finite(name);
            }
        }
        self.set_view_transform(zoom, pan_x, pan_y);
        error::ok(self.view_transform())
    }

    pub fn zoom_in(&mut self) { self.rs_mutate(|c| c.zoom_in()) }
    pub fn zoom_out(&mut self) { self.rs_mutate(|c| c.zoom_out()) }
    pub fn reset_view(&mut self) { self.rs_mutate(|c| c.reset_view()) }
    pub fn center_on_self(&mut self) { self.rs_mutate(|c| c.center_on_self()) }
    pub fn zoom_percentage(&self) -> u32 { self.rs_read(|c| c.zoom_percentage()) }
    pub fn can_zoom_in(&self) -> bool { self.rs_read(|c| c.can_zoom_in()) }
    pub fn can_zoom_out(&self) -> bool { self.rs_read(|c| c.can_zoom_out()) }

    /// Live container size; zero or unmeasured sizes use the fallback.
    pub fn set_viewport(&mut self, width: f64, height: f64) { self.rs_mutate(|c| c.set_viewport(width, height)) }

    /// `[x, y]` in canvas space for a client point; `left`/`top` locate the container.
    pub fn screen_to_canvas(&self, x: f64, y: f64, left: f64, top: f64) -> Vec<f64> {
        let vt = self.rs_read(|c| c.store().view_transform());
        let p = transform::screen_to_canvas(Position::new(x, y), &vt, CanvasOffset::new(left, top));
        vec![p.x, p.y]
    }

    pub fn canvas_to_screen(&self, x: f64, y: f64, left: f64, top: f64) -> Vec<f64> {
        let vt = self.rs_read(|c| c.store().view_transform());
        let p = transform::canvas_to_screen(Position::new(x, y), &vt, CanvasOffset::new(left, top));
        vec![p.x, p.y]
    }

    // Selection, rename and trust editor

    pub fn select_node(&mut self, id: Option<String>) { self.rs_mutate(|c| c.select_node(id.as_deref())) }
    pub fn begin_rename(&mut self, id: &str) -> bool { self.rs_mutate(|c| c.begin_rename(id)) }
    pub fn commit_rename(&mut self, name: &str) { self.rs_mutate(|c| c.commit_rename(name)) }
    pub fn cancel_rename(&mut self) { self.rs_mutate(|c| c.cancel_rename()) }
    pub fn open_trust_editor(&mut self, id: &str) -> bool { self.rs_mutate(|c| c.open_trust_editor(id)) }
    pub fn cancel_trust_editor(&mut self) { self.rs_mutate(|c| c.cancel_trust_editor()) }

    pub fn save_trust_score(&mut self, outward: &str, inward: &str, uncertain: bool) -> bool {
        match parse_score(outward, inward, uncertain) {
            Ok(score) => self.rs_mutate(|c| c.save_trust_score(score)),
            Err(_) => false,
        }
    }
    pub fn save_trust_score_res(&mut self, outward: &str, inward: &str, uncertain: bool) -> JsValue {
        let score = match parse_score(outward, inward, uncertain) {
            Ok(s) => s,
            Err(e) => return e,
        };
        if self.rs_mutate(|c| c.save_trust_score(score)) { error::ok(JsValue::TRUE) } else { error::no_editor() }
    }

    // Pointer input. Each returns true when the event started, moved or
    // ended a drag of `id`.

    pub fn pointer_down(&mut self, id: &str, ev: &PointerEvent) -> bool {
        let sample = browser::sample(ev);
        let mut capture = ElementCapture::from_event(ev);
        is_start(self.rs_mutate(|c| c.pointer_down(id, sample, &mut capture)))
    }
    pub fn pointer_move(&mut self, id: &str, ev: &PointerEvent) -> bool {
        let sample = browser::sample(ev);
        self.rs_mutate(|c| c.pointer_move(id, sample)).is_some()
    }
    pub fn pointer_up(&mut self, id: &str, ev: &PointerEvent) -> bool {
        let sample = browser::sample(ev);
        let mut capture = ElementCapture::from_event(ev);
        self.rs_mutate(|c| c.pointer_up(id, sample, &mut capture)).is_some()
    }
    pub fn pointer_cancel(&mut self, id: &str) { self.rs_mutate(|c| c.pointer_cancel(id)) }

    /// Coordinate form for hosts that do not forward DOM events; no capture.
    pub fn pointer_down_at(&mut self, id: &str, pointer_id: i32, client_x: f64, client_y: f64) -> bool {
        let sample = PointerSample::new(pointer_id, client_x, client_y);
        is_start(self.rs_mutate(|c| c.pointer_down(id, sample, &mut NoCapture)))
    }
    pub fn pointer_move_at(&mut self, id: &str, pointer_id: i32, client_x: f64, client_y: f64) -> bool {
        let sample = PointerSample::new(pointer_id, client_x, client_y);
        self.rs_mutate(|c| c.pointer_move(id, sample)).is_some()
    }
    pub fn pointer_up_at(&mut self, id: &str, pointer_id: i32, client_x: f64, client_y: f64) -> bool {
        let sample = PointerSample::new(pointer_id, client_x, client_y);
        self.rs_mutate(|c| c.pointer_up(id, sample, &mut NoCapture)).is_some()
    }
    pub fn is_dragging(&self, id: &str) -> bool { self.rs_read(|c| c.is_dragging(id)) }

    // Keyboard

    pub fn shortcuts_enabled(&self) -> bool { self.rs_read(|c| c.shortcuts_enabled()) }
    pub fn set_shortcuts_enabled(&mut self, enabled: bool) { self.rs_mutate(|c| c.set_shortcuts_enabled(enabled)) }

    /// Document-level keydown listener. Calls `preventDefault` on consumed keys.
    pub fn key_down(&mut self, ev: &KeyboardEvent) -> bool {
        let consumed = self.handle_key(&ev.key());
        if consumed {
            ev.prevent_default();
        }
        consumed
    }

    /// Dispatches a key name against the current DOM focus; true when consumed.
    pub fn handle_key(&mut self, key: &str) -> bool {
        self.rs_mutate(|c| c.key_down(key, &DomFocus)).prevent_default()
    }
    pub fn handle_key_res(&mut self, key: &str) -> JsValue {
        if ShortcutAction::from_key(key).is_none() {
            let d = crate::interop::new_obj();
            crate::interop::set_kv(&d, "key", &JsValue::from_str(key));
            return error::err("invalid_key", "not a canvas shortcut", Some(d.into()));
        }
        error::ok(JsValue::from_bool(self.handle_key(key)))
    }

    // Reset and persistence

    /// Asks `window.confirm` first; a dismissed or failed prompt changes nothing.
    pub fn reset_map(&mut self) -> bool {
        let confirmed = web_sys::window()
            .and_then(|w| w.confirm_with_message("Reset the map? This removes every person you added.").ok())
            .unwrap_or(false);
        self.rs_mutate(|c| c.reset_map(confirmed))
    }
    pub fn reset_map_res(&mut self, confirmed: bool) -> JsValue {
        if self.rs_mutate(|c| c.reset_map(confirmed)) { error::ok(JsValue::TRUE) } else { error::not_confirmed() }
    }

    /// Writes a pending change now (page hide/unload). True if anything was written.
    pub fn flush(&mut self) -> bool { self.rs_mutate(|c| c.flush()) }
}

impl Default for Canvas {
    fn default() -> Self { Canvas::new() }
}
