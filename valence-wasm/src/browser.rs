// Browser-backed collaborators for the core engine.

use js_sys::{Date, Reflect};
use valence::interaction::drag::{PointerCapture, PointerSample};
use valence::interaction::keyboard::{is_text_input, FocusContext};
use valence::{Clock, KeyValueStore, StorageError};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Element, PointerEvent, Storage};

/// `window.localStorage`. Reading the property can itself throw (disabled
/// storage, sandboxed frames); that is treated as unavailable.
pub struct LocalStorage {
    storage: Option<Storage>,
}

impl LocalStorage {
    pub fn from_window() -> Self {
        let storage = web_sys::window().and_then(|w| w.local_storage().ok().flatten());
        LocalStorage { storage }
    }

    fn storage(&self) -> Result<&Storage, StorageError> { self.storage.as_ref().ok_or(StorageError::Unavailable) }
}

fn js_error(e: JsValue) -> StorageError {
    let name = Reflect::get(&e, &JsValue::from_str("name")).ok().and_then(|n| n.as_string());
    match name.as_deref() {
        Some("QuotaExceededError") | Some("NS_ERROR_DOM_QUOTA_REACHED") => StorageError::QuotaExceeded,
        Some("SecurityError") => StorageError::Unavailable,
        _ => StorageError::Backend(format!("{:?}", e)),
    }
}

impl KeyValueStore for LocalStorage {
    fn get_item(&self, key: &str) -> Result<Option<String>, StorageError> {
        self.storage()?.get_item(key).map_err(js_error)
    }

    fn set_item(&mut self, key: &str, value: &str) -> Result<(), StorageError> {
        self.storage()?.set_item(key, value).map_err(js_error)
    }

    fn remove_item(&mut self, key: &str) -> Result<(), StorageError> {
        self.storage()?.remove_item(key).map_err(js_error)
    }
}

#[derive(Clone, Copy, Debug, Default)]
pub struct JsClock;

impl Clock for JsClock {
    fn now_ms(&self) -> u64 {
        let ms = Date::now();
        if ms.is_finite() && ms > 0.0 { ms as u64 } else { 0 }
    }

    fn now_iso(&self) -> String { Date::new_0().to_iso_string().into() }
}

/// Reads `document.activeElement` on demand.
#[derive(Clone, Copy, Debug, Default)]
pub struct DomFocus;

impl FocusContext for DomFocus {
    fn is_text_input_focused(&self) -> bool {
        let Some(active) = web_sys::window().and_then(|w| w.document()).and_then(|d| d.active_element()) else {
            return false;
        };
        is_text_input(&active.tag_name(), active.get_attribute("contenteditable").as_deref())
    }
}

pub struct ElementCapture(pub Option<Element>);

impl ElementCapture {
    pub fn from_event(ev: &PointerEvent) -> Self {
        ElementCapture(ev.current_target().and_then(|t| t.dyn_into::<Element>().ok()))
    }
}

impl PointerCapture for ElementCapture {
    fn set_pointer_capture(&mut self, pointer_id: i32) {
        if let Some(el) = &self.0 {
            let _ = el.set_pointer_capture(pointer_id);
        }
    }

    fn release_pointer_capture(&mut self, pointer_id: i32) {
        if let Some(el) = &self.0 {
            let _ = el.release_pointer_capture(pointer_id);
        }
    }
}

pub fn sample(ev: &PointerEvent) -> PointerSample {
    PointerSample::new(ev.pointer_id(), f64::from(ev.client_x()), f64::from(ev.client_y()))
}
