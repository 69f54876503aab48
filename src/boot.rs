use gloo::events::EventListener;

use crate::dom;

/// Runs `start` once the document has been parsed.
pub(crate) fn on_dom_ready<F>(start: F)
where
    F: FnOnce() + 'static,
{
    let Ok(document) = dom::document() else {
        return;
    };
    if document.ready_state() != "loading" {
        start();
        return;
    }
    EventListener::once(&document, "DOMContentLoaded", move |_event| start()).forget();
}

/// Runs one enhancement, logging instead of propagating so a failure in one
/// never blocks the others.
pub(crate) fn run_feature<T, F>(name: &str, install: F) -> Option<T>
where
    F: FnOnce() -> Result<T, wasm_bindgen::JsValue>,
{
    match install() {
        Ok(value) => Some(value),
        Err(err) => {
            gloo::console::warn!(format!("{name}: install failed"), dom::js_err(err));
            None
        }
    }
}
