use pagelift_core::{
    intersects_viewport, DirectiveError, ImageHost, InsertedNode, VisibilityObserver,
    LOADING_ATTR, LOADING_LAZY, UNDIRECTED_IMAGE_SELECTOR,
};
use std::cell::Cell;

use js_sys::WeakMap;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, Element, HtmlImageElement, IntersectionObserver, Node, Window};

use crate::dom;

/// [`ImageHost`] over the live document.
///
/// Keys are handed out on first sight and held in a `WeakMap`, so removed
/// images can still be collected.
pub struct DomImageHost {
    window: Window,
    document: Document,
    exempt_class: String,
    keys: WeakMap,
    next_key: Cell<u32>,
}

impl DomImageHost {
    pub fn new(window: Window, document: Document, exempt_class: impl Into<String>) -> Self {
        Self {
            window,
            document,
            exempt_class: exempt_class.into(),
            keys: WeakMap::new(),
            next_key: Cell::new(0),
        }
    }
}

impl ImageHost for DomImageHost {
    type Image = Element;
    type Key = u32;

    fn key(&self, image: &Element) -> u32 {
        if let Some(key) = self.keys.get(image).as_f64() {
            return key as u32;
        }
        let key = self.next_key.get();
        self.next_key.set(key.wrapping_add(1));
        self.keys.set(image, &JsValue::from(key));
        key
    }

    fn has_directive(&self, image: &Element) -> bool {
        image.has_attribute(LOADING_ATTR)
    }

    fn is_exempt(&self, image: &Element) -> bool {
        image.class_list().contains(&self.exempt_class)
    }

    fn in_viewport(&self, image: &Element) -> bool {
        let viewport = dom::viewport_size(&self.window, &self.document);
        intersects_viewport(&dom::element_rect(image), viewport)
    }

    fn set_lazy(&self, image: &Element) -> Result<(), DirectiveError> {
        if !image.is_connected() {
            return Err(DirectiveError::Detached);
        }
        image
            .set_attribute(LOADING_ATTR, LOADING_LAZY)
            .map_err(|err| DirectiveError::Rejected(dom::js_err(err)))
    }

    fn undirected_images(&self) -> Vec<Element> {
        match self.document.query_selector_all(UNDIRECTED_IMAGE_SELECTOR) {
            Ok(list) => dom::elements(&list),
            Err(_) => Vec::new(),
        }
    }

    fn report_failure(&self, image: &Element, error: &DirectiveError) {
        gloo::console::warn!(
            "lazy load: could not set loading attribute",
            image.clone(),
            error.to_string()
        );
    }
}

/// [`VisibilityObserver`] backed by the browser's `IntersectionObserver`.
pub struct DomVisibilityObserver {
    observer: IntersectionObserver,
}

impl DomVisibilityObserver {
    pub fn new(observer: IntersectionObserver) -> Self {
        Self { observer }
    }
}

impl VisibilityObserver<Element> for DomVisibilityObserver {
    fn observe(&self, image: &Element) {
        self.observer.observe(image);
    }

    fn unobserve(&self, image: &Element) {
        self.observer.unobserve(image);
    }

    fn disconnect(&self) {
        self.observer.disconnect();
    }
}

/// Narrows a node reported by the mutation observer to what the classifier
/// routes.
pub fn inserted_node(node: &Node) -> InsertedNode<Element> {
    if node.node_type() != Node::ELEMENT_NODE {
        return InsertedNode::Other;
    }
    let Some(element) = node.dyn_ref::<Element>() else {
        return InsertedNode::Other;
    };
    if element.is_instance_of::<HtmlImageElement>() {
        return InsertedNode::Image(element.clone());
    }
    match element.query_selector_all(UNDIRECTED_IMAGE_SELECTOR) {
        Ok(list) => InsertedNode::Container(dom::elements(&list)),
        Err(_) => InsertedNode::Other,
    }
}
