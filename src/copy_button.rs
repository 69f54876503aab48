use gloo::events::EventListener;
use gloo::timers::callback::Timeout;
use pagelift_core::copy::{
    button_gap, CopyButtonConfig, CopyState, COPY_BUTTON_CLASS, COPY_GAP_VAR, COPY_PRE_CLASS,
    STATE_CLASSES,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlButtonElement, HtmlElement};

use crate::{clipboard, dom};

/// Adds a copy button to every matching code block that lacks one. Returns
/// the number of buttons added.
pub(crate) fn attach(config: &CopyButtonConfig) -> Result<usize, JsValue> {
    let document = dom::document()?;
    let Some(root) = document.document_element() else {
        return Ok(0);
    };
    let existing = format!(".{COPY_BUTTON_CLASS}");
    let mut attached = 0;
    for code in dom::query_all(&root, &config.selector())? {
        let Some(pre) = container_for(&code) else {
            continue;
        };
        if pre.query_selector(&existing)?.is_some() {
            continue;
        }
        let button = create_button(&document)?;
        wire_click(&button, &code, config.reset_ms);
        pre.class_list().add_1(COPY_PRE_CLASS)?;
        pre.append_child(&button)?;
        dom::set_style(&pre, COPY_GAP_VAR, &button_gap(button.offset_width() as f64))?;
        attached += 1;
    }
    Ok(attached)
}

fn container_for(code: &Element) -> Option<Element> {
    if code.tag_name().eq_ignore_ascii_case("pre") {
        return Some(code.clone());
    }
    code.closest("pre")
        .ok()
        .flatten()
        .or_else(|| code.parent_element())
}

fn create_button(document: &Document) -> Result<HtmlButtonElement, JsValue> {
    let button = document
        .create_element("button")?
        .dyn_into::<HtmlButtonElement>()?;
    button.set_class_name(COPY_BUTTON_CLASS);
    button.set_type("button");
    render_state(&button, CopyState::Idle)?;
    Ok(button)
}

fn wire_click(button: &HtmlButtonElement, code: &Element, reset_ms: u32) {
    let target = button.clone();
    let code = code.clone();
    let listener = EventListener::new(button, "click", move |_event| {
        let text = match code.dyn_ref::<HtmlElement>() {
            Some(code) => code.inner_text(),
            None => code.text_content().unwrap_or_default(),
        };
        target.set_disabled(true);
        let button = target.clone();
        spawn_local(async move {
            let result = clipboard::copy_text(&text).await;
            if let Err(err) = &result {
                gloo::console::warn!("copy button: copy failed", dom::js_err(err.clone()));
            }
            show_state(&button, CopyState::from_result(&result), reset_ms);
        });
    });
    listener.forget();
}

fn show_state(button: &HtmlButtonElement, state: CopyState, reset_ms: u32) {
    button.set_disabled(false);
    if render_state(button, state).is_err() {
        return;
    }
    if state.reverts() {
        let button = button.clone();
        Timeout::new(reset_ms, move || {
            let _ = render_state(&button, CopyState::Idle);
        })
        .forget();
    }
}

fn render_state(button: &HtmlButtonElement, state: CopyState) -> Result<(), JsValue> {
    let classes = button.class_list();
    for class in STATE_CLASSES {
        classes.remove_1(class)?;
    }
    if let Some(class) = state.class() {
        classes.add_1(class)?;
    }
    button.set_text_content(Some(state.label()));
    button.set_attribute("aria-label", state.aria_label())?;
    Ok(())
}
