use js_sys::{Function, Promise, Reflect};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::JsFuture;
use web_sys::{HtmlDocument, HtmlTextAreaElement};

use crate::dom;

/// Copies `text` through the async clipboard API, or through a hidden
/// textarea and `execCommand("copy")` where that API is missing.
pub(crate) async fn copy_text(text: &str) -> Result<(), JsValue> {
    if let Some(promise) = clipboard_write(text)? {
        JsFuture::from(promise).await?;
        return Ok(());
    }
    copy_with_textarea(text)
}

fn clipboard_write(text: &str) -> Result<Option<Promise>, JsValue> {
    let navigator = dom::window()?.navigator();
    let clipboard = Reflect::get(&navigator, &JsValue::from_str("clipboard"))?;
    if clipboard.is_undefined() || clipboard.is_null() {
        return Ok(None);
    }
    let write = Reflect::get(&clipboard, &JsValue::from_str("writeText"))?;
    let Ok(write) = write.dyn_into::<Function>() else {
        return Ok(None);
    };
    let promise = write.call1(&clipboard, &JsValue::from_str(text))?;
    Ok(Some(promise.dyn_into::<Promise>()?))
}

fn copy_with_textarea(text: &str) -> Result<(), JsValue> {
    let document = dom::document()?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("missing body"))?;
    let textarea = document
        .create_element("textarea")?
        .dyn_into::<HtmlTextAreaElement>()?;
    textarea.set_value(text);
    textarea.set_attribute("readonly", "")?;
    dom::set_style(&textarea, "position", "fixed")?;
    dom::set_style(&textarea, "left", "-9999px")?;
    body.append_child(&textarea)?;
    textarea.select();
    let copied = match document.dyn_ref::<HtmlDocument>() {
        Some(document) => document.exec_command("copy"),
        None => Ok(false),
    };
    let _ = body.remove_child(&textarea);
    if copied? {
        Ok(())
    } else {
        Err(JsValue::from_str("execCommand copy failed"))
    }
}
