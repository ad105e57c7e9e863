use js_sys::{Promise, Reflect, JSON};
use valence_wasm::Canvas;
use wasm_bindgen::JsValue;
use wasm_bindgen_futures::JsFuture;
use wasm_bindgen_test::*;

wasm_bindgen_test_configure!(run_in_browser);

fn storage() -> web_sys::Storage { web_sys::window().unwrap().local_storage().unwrap().unwrap() }

fn fresh(key: &str) -> Canvas {
    storage().remove_item(key).unwrap();
    Canvas::with_storage_key(key)
}

async fn sleep(ms: i32) {
    let promise = Promise::new(&mut |resolve, _reject| {
        web_sys::window()
            .unwrap()
            .set_timeout_with_callback_and_timeout_and_arguments_0(&resolve, ms)
            .unwrap();
    });
    JsFuture::from(promise).await.unwrap();
}

fn stored_zoom(key: &str) -> Option<f64> {
    let raw = storage().get_item(key).unwrap()?;
    let v = JSON::parse(&raw).unwrap();
    let vt = Reflect::get(&v, &JsValue::from_str("viewTransform")).unwrap();
    Reflect::get(&vt, &JsValue::from_str("zoom")).unwrap().as_f64()
}

#[wasm_bindgen_test]
async fn rapid_changes_are_written_once_after_quiet_period() {
    let key = "valence-test-timer-coalesce";
    let mut c = fresh(key);
    c.set_view_transform(Some(1.2), None, None);
    sleep(150).await;
    c.set_view_transform(Some(1.4), None, None);
    sleep(150).await;
    c.set_view_transform(Some(1.6), None, None);

    // 500 ms after the first change, but the last one restarted the window.
    sleep(200).await;
    assert!(storage().get_item(key).unwrap().is_none(), "saved before the quiet period ended");
    assert!(c.has_pending_save());

    sleep(450).await;
    assert!(!c.has_pending_save());
    assert_eq!(stored_zoom(key), Some(1.6));
}

#[wasm_bindgen_test]
async fn confirmed_reset_cancels_pending_save() {
    let key = "valence-test-timer-reset";
    let mut c = fresh(key);
    c.set_view_transform(Some(1.3), None, None);
    assert!(c.has_pending_save());
    let r = c.reset_map_res(true);
    assert_eq!(Reflect::get(&r, &JsValue::from_str("ok")).unwrap().as_bool(), Some(true));
    assert!(!c.has_pending_save());

    sleep(700).await;
    assert!(storage().get_item(key).unwrap().is_none(), "reset key must stay absent");
}
