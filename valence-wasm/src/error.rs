use crate::interop::{new_obj, set_kv};
use wasm_bindgen::prelude::*;

pub fn ok(v: JsValue) -> JsValue {
    let o = new_obj();
    set_kv(&o, "ok", &JsValue::from_bool(true));
    set_kv(&o, "value", &v);
    o.into()
}

pub fn err(code: &'static str, message: impl Into<String>, data: Option<JsValue>) -> JsValue {
    let root = new_obj();
    set_kv(&root, "ok", &JsValue::from_bool(false));
    let e = new_obj();
    set_kv(&e, "code", &JsValue::from_str(code));
    set_kv(&e, "message", &JsValue::from_str(&message.into()));
    if let Some(d) = data { set_kv(&e, "data", &d); }
    set_kv(&root, "error", &e.into());
    root.into()
}

#[inline]
pub fn non_finite(param: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "param", &JsValue::from_str(param));
    err("non_finite", format!("parameter '{}' must be finite", param), Some(d.into()))
}

#[inline]
pub fn invalid_id(id: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "id", &JsValue::from_str(id));
    err("invalid_id", "no node with this id", Some(d.into()))
}

#[inline]
pub fn self_node(id: &str) -> JsValue {
    let d = new_obj(); set_kv(&d, "id", &JsValue::from_str(id));
    err("self_node", "the self node cannot be changed this way", Some(d.into()))
}

#[inline]
pub fn invalid_name() -> JsValue { err("invalid_name", "name is empty after trimming", None) }

#[inline]
pub fn invalid_level(param: &str, got: &str) -> JsValue {
    let d = new_obj();
    set_kv(&d, "param", &JsValue::from_str(param));
    set_kv(&d, "got", &JsValue::from_str(got));
    err("invalid_level", "trust level must be high, medium, low or unscored", Some(d.into()))
}

#[inline]
pub fn not_confirmed() -> JsValue { err("not_confirmed", "reset was not confirmed", None) }

#[inline]
pub fn no_editor() -> JsValue { err("no_editor", "no trust-score editor is open", None) }
