use js_sys::Reflect;
use pagelift_core::{Rect, ViewportSize};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlElement, NodeList, Window};

pub(crate) fn window() -> Result<Window, JsValue> {
    web_sys::window().ok_or_else(|| JsValue::from_str("missing window"))
}

pub(crate) fn document() -> Result<Document, JsValue> {
    window()?
        .document()
        .ok_or_else(|| JsValue::from_str("missing document"))
}

/// Whether `window[name]` exists, used for capability checks such as
/// `IntersectionObserver`.
pub(crate) fn has_global(name: &str) -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    Reflect::has(&window, &JsValue::from_str(name)).unwrap_or(false)
}

pub(crate) fn elements(list: &NodeList) -> Vec<Element> {
    (0..list.length())
        .filter_map(|index| list.get(index))
        .filter_map(|node| node.dyn_into::<Element>().ok())
        .collect()
}

pub(crate) fn query_all(root: &Element, selector: &str) -> Result<Vec<Element>, JsValue> {
    Ok(elements(&root.query_selector_all(selector)?))
}

pub(crate) fn element_rect(element: &Element) -> Rect {
    let rect = element.get_bounding_client_rect();
    Rect {
        top: rect.top(),
        right: rect.right(),
        bottom: rect.bottom(),
        left: rect.left(),
    }
}

pub(crate) fn viewport_size(window: &Window, document: &Document) -> ViewportSize {
    let inner_width = window.inner_width().ok().and_then(|value| value.as_f64());
    let inner_height = window.inner_height().ok().and_then(|value| value.as_f64());
    let (client_width, client_height) = document
        .document_element()
        .map(|root| (root.client_width() as f64, root.client_height() as f64))
        .unwrap_or((0.0, 0.0));
    ViewportSize::resolve(inner_width, inner_height, client_width, client_height)
}

pub(crate) fn set_style(element: &Element, property: &str, value: &str) -> Result<(), JsValue> {
    if let Some(element) = element.dyn_ref::<HtmlElement>() {
        element.style().set_property(property, value)?;
    }
    Ok(())
}

pub(crate) fn visually_hide(element: &Element) -> Result<(), JsValue> {
    set_style(element, "position", "absolute")?;
    set_style(element, "left", "-9999px")?;
    set_style(element, "width", "1px")?;
    set_style(element, "height", "1px")?;
    set_style(element, "overflow", "hidden")?;
    Ok(())
}

pub(crate) fn js_err(error: JsValue) -> String {
    if let Some(value) = error.as_string() {
        return value;
    }
    if let Some(error) = error.dyn_ref::<js_sys::Error>() {
        return String::from(error.message());
    }
    if let Ok(json) = js_sys::JSON::stringify(&error) {
        if let Some(value) = json.as_string() {
            return value;
        }
    }
    "js error".to_string()
}
