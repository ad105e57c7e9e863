use std::cell::RefCell;
use std::rc::Rc;
use valence::{CanvasConfig, CanvasController, CanvasStore, Clock, Environment, UuidIds};
use wasm_bindgen::prelude::*;

mod api;
mod browser;
mod error;
mod interop;
mod logging;
mod timer;

pub use browser::{DomFocus, ElementCapture, JsClock, LocalStorage};

#[wasm_bindgen]
pub struct Canvas {
    pub(crate) inner: Rc<RefCell<CanvasController>>,
    pub(crate) timer: timer::SaveTimer,
}

impl Canvas {
    pub fn rs_open(config: &CanvasConfig) -> Canvas {
        let env = Environment::new(Rc::new(UuidIds), Rc::new(JsClock));
        let store = CanvasStore::open_with_config(Box::new(LocalStorage::from_window()), env, config);
        let inner = Rc::new(RefCell::new(CanvasController::new(store)));
        let timer = timer::SaveTimer::new(Rc::downgrade(&inner));
        Canvas { inner, timer }
    }

    /// Runs a mutation, then re-arms the save timer if the deadline moved.
    pub(crate) fn rs_mutate<R>(&mut self, f: impl FnOnce(&mut CanvasController) -> R) -> R {
        let out = f(&mut *self.inner.borrow_mut());
        let deadline = self.inner.borrow().store().save_deadline_ms();
        self.timer.sync(deadline, JsClock.now_ms());
        out
    }

    pub(crate) fn rs_read<R>(&self, f: impl FnOnce(&CanvasController) -> R) -> R { f(&*self.inner.borrow()) }
}
