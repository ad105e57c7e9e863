// One pending setTimeout per canvas, re-armed whenever the save deadline moves.

use log::warn;
use std::cell::RefCell;
use std::rc::Weak;
use valence::CanvasController;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;

pub struct SaveTimer {
    handle: Option<i32>,
    armed_for: Option<u64>,
    callback: Closure<dyn FnMut()>,
}

impl SaveTimer {
    pub fn new(target: Weak<RefCell<CanvasController>>) -> Self {
        // The timer is cleared on every deadline change, so by the time it
        // fires the quiet period has passed.
        let callback = Closure::<dyn FnMut()>::new(move || {
            if let Some(ctrl) = target.upgrade() {
                if let Ok(mut c) = ctrl.try_borrow_mut() {
                    c.flush();
                }
            }
        });
        SaveTimer { handle: None, armed_for: None, callback }
    }

    pub fn sync(&mut self, deadline: Option<u64>, now_ms: u64) {
        if deadline == self.armed_for {
            return;
        }
        self.clear();
        let Some(d) = deadline else { return };
        let Some(window) = web_sys::window() else { return };
        let delay = d.saturating_sub(now_ms).min(i32::MAX as u64) as i32;
        match window.set_timeout_with_callback_and_timeout_and_arguments_0(self.callback.as_ref().unchecked_ref(), delay) {
            Ok(h) => {
                self.handle = Some(h);
                self.armed_for = Some(d);
            }
            Err(e) => warn!("failed to arm save timer: {:?}", e),
        }
    }

    pub fn clear(&mut self) {
        if let Some(h) = self.handle.take() {
            if let Some(w) = web_sys::window() {
                w.clear_timeout_with_handle(h);
            }
        }
        self.armed_for = None;
    }
}

impl Drop for SaveTimer {
    fn drop(&mut self) { self.clear() }
}
