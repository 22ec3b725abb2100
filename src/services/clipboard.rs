use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;

use crate::error::ClientError;

/// `navigator.clipboard.writeText`, looked up dynamically so a page served
/// without clipboard access reports an error instead of throwing.
pub async fn write_text(text: &str) -> Result<(), ClientError> {
    let window = web_sys::window().ok_or_else(|| ClientError::Js("no window".into()))?;
    let navigator = window.navigator();

    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Err(ClientError::Js("clipboard is not available".into()));
    }

    let write_text: Function = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?.dyn_into()?;
    let promise: Promise = write_text.call1(&clipboard, &JsValue::from_str(text))?.dyn_into()?;
    JsFuture::from(promise).await?;
    Ok(())
}
