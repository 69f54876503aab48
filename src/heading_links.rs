use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::timers::callback::Timeout;
use pagelift_core::heading::{
    is_activation_key, share_url, unique_id, HeadingLinksConfig, ANNOUNCE_COPIED,
    ANNOUNCE_FOCUSED, COPIED_CLASS, COPY_FEEDBACK_CLASS, FEEDBACK_TEXT, HEADING_ANCHOR_CLASS,
    HEADING_LINK_CLASS, HEADING_SELECTOR, LINK_GLYPH, LINK_LABEL, LIVE_REGION_ID,
};
use wasm_bindgen::{JsCast, JsValue};
use wasm_bindgen_futures::spawn_local;
use web_sys::{Document, Element, HtmlElement, KeyboardEvent};

use crate::{clipboard, dom};

const ACTIVE_LISTENER: EventListenerOptions = EventListenerOptions {
    phase: EventListenerPhase::Bubble,
    passive: false,
};

/// Adds a copy-link anchor to every `h2`..`h6` under `root`, or under the
/// configured root when none is given. Returns the number of headings that
/// gained a link.
pub(crate) fn install(
    config: &HeadingLinksConfig,
    root: Option<Element>,
) -> Result<usize, JsValue> {
    let document = dom::document()?;
    let root = match root {
        Some(root) => root,
        None => match document.query_selector(&config.root_selector)? {
            Some(root) => root,
            None => match document.document_element() {
                Some(root) => root,
                None => return Ok(0),
            },
        },
    };
    let headings = dom::query_all(&root, HEADING_SELECTOR)?;
    if headings.is_empty() {
        return Ok(0);
    }
    let live_region = live_region(&document)?;
    let existing = format!(".{HEADING_LINK_CLASS}");
    let mut installed = 0;
    for heading in headings {
        if heading.query_selector(&existing)?.is_some() {
            continue;
        }
        let id = ensure_id(&document, &heading, &config.fallback_id);
        let link = create_link(&document, &id)?;
        wire_link(&link, id, live_region.clone(), config.copied_ms);
        heading.append_child(&link)?;
        heading.class_list().add_1(HEADING_ANCHOR_CLASS)?;
        installed += 1;
    }
    Ok(installed)
}

fn ensure_id(document: &Document, heading: &Element, fallback: &str) -> String {
    let id = heading.id();
    if !id.is_empty() {
        return id;
    }
    let id = unique_id(fallback, |candidate| {
        document.get_element_by_id(candidate).is_some()
    });
    heading.set_id(&id);
    id
}

fn live_region(document: &Document) -> Result<Element, JsValue> {
    if let Some(region) = document.get_element_by_id(LIVE_REGION_ID) {
        return Ok(region);
    }
    let region = document.create_element("div")?;
    region.set_id(LIVE_REGION_ID);
    region.set_attribute("aria-live", "polite")?;
    region.set_attribute("aria-atomic", "true")?;
    dom::visually_hide(&region)?;
    let body = document
        .body()
        .ok_or_else(|| JsValue::from_str("missing body"))?;
    body.append_child(&region)?;
    Ok(region)
}

fn create_link(document: &Document, id: &str) -> Result<HtmlElement, JsValue> {
    let link = document.create_element("a")?.dyn_into::<HtmlElement>()?;
    link.set_class_name(HEADING_LINK_CLASS);
    link.set_attribute("href", &format!("#{id}"))?;
    link.set_attribute("aria-label", LINK_LABEL)?;
    link.set_attribute("title", LINK_LABEL)?;
    link.set_attribute("role", "button")?;
    link.set_tab_index(0);

    let feedback = document.create_element("span")?;
    feedback.set_class_name(COPY_FEEDBACK_CLASS);
    feedback.set_text_content(Some(FEEDBACK_TEXT));
    link.append_child(&feedback)?;
    link.append_child(&document.create_text_node(LINK_GLYPH))?;
    Ok(link)
}

fn wire_link(link: &HtmlElement, id: String, live_region: Element, copied_ms: u32) {
    let feedback: Rc<RefCell<Option<Timeout>>> = Rc::new(RefCell::new(None));
    let target = link.clone();
    let click = EventListener::new_with_options(link, "click", ACTIVE_LISTENER, move |event| {
        event.prevent_default();
        let link = target.clone();
        let id = id.clone();
        let live_region = live_region.clone();
        let feedback = Rc::clone(&feedback);
        spawn_local(async move {
            match copy_section_link(&id).await {
                Ok(()) => {
                    let _ = link.class_list().add_1(COPIED_CLASS);
                    let link_for_reset = link.clone();
                    let timeout = Timeout::new(copied_ms, move || {
                        let _ = link_for_reset.class_list().remove_1(COPIED_CLASS);
                    });
                    feedback.borrow_mut().replace(timeout);
                    live_region.set_text_content(Some(ANNOUNCE_COPIED));
                }
                Err(err) => {
                    gloo::console::warn!("heading links: copy failed", dom::js_err(err));
                    if let Ok(window) = dom::window() {
                        let _ = window.location().set_hash(&id);
                    }
                    live_region.set_text_content(Some(ANNOUNCE_FOCUSED));
                }
            }
        });
    });
    click.forget();

    let target = link.clone();
    let keydown = EventListener::new_with_options(link, "keydown", ACTIVE_LISTENER, move |event| {
        let Some(event) = event.dyn_ref::<KeyboardEvent>() else {
            return;
        };
        if is_activation_key(&event.key()) {
            event.prevent_default();
            target.click();
        }
    });
    keydown.forget();
}

async fn copy_section_link(id: &str) -> Result<(), JsValue> {
    let location = dom::window()?.location();
    let url = share_url(
        &location.origin()?,
        &location.pathname()?,
        &location.search()?,
        id,
    );
    clipboard::copy_text(&url).await
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    #[wasm_bindgen_test]
    fn explicit_root_limits_installation() {
        let document = dom::document().expect("document");
        let body = document.body().expect("body");
        let inside = document.create_element("section").expect("section");
        let outside = document.create_element("aside").expect("aside");
        inside.set_inner_html("<h2 id=\"inside-heading\">Setup</h2><h3>Details</h3>");
        outside.set_inner_html("<h2 id=\"outside-heading\">Elsewhere</h2>");
        body.append_child(&inside).expect("append");
        body.append_child(&outside).expect("append");

        let config = HeadingLinksConfig {
            fallback_id: "pagelift-test-section".to_string(),
            ..HeadingLinksConfig::default()
        };
        assert_eq!(install(&config, Some(inside.clone())).expect("install"), 2);
        assert_eq!(install(&config, Some(inside.clone())).expect("reinstall"), 0);

        let link = inside
            .query_selector("#inside-heading .heading-link")
            .expect("query")
            .expect("link added");
        assert_eq!(link.get_attribute("href").as_deref(), Some("#inside-heading"));
        let details = inside.query_selector("h3").expect("query").expect("h3");
        assert_eq!(details.id(), "pagelift-test-section");
        assert!(outside
            .query_selector(".heading-link")
            .expect("query")
            .is_none());

        inside.remove();
        outside.remove();
    }
}
