#![cfg(target_arch = "wasm32")]

use gloo::timers::future::TimeoutFuture;
use js_sys::Date;
use pagelift::dom_host::{inserted_node, DomImageHost};
use pagelift::lazy_load::LazyLoadHandle;
use pagelift_core::{
    DirectiveError, ImageHost, InsertedNode, LazyClassifier, LazyLoadConfig, NoObserver, Outcome,
    SkipReason,
};
use wasm_bindgen_test::*;
use web_sys::{window, Document, Element};

wasm_bindgen_test_configure!(run_in_browser);

const FAR_BELOW: u32 = 50_000;

fn document() -> Document {
    window()
        .expect("window available")
        .document()
        .expect("document available")
}

fn host(document: &Document) -> DomImageHost {
    DomImageHost::new(window().expect("window available"), document.clone(), "no-auto-lazy")
}

fn image(document: &Document, top_px: u32) -> Element {
    let img = document.create_element("img").expect("create img");
    img.set_attribute(
        "style",
        &format!("position:absolute;left:0;top:{top_px}px;width:40px;height:40px"),
    )
    .expect("set style");
    img
}

fn place(document: &Document, element: &Element) {
    document
        .body()
        .expect("body available")
        .append_child(element)
        .expect("append");
}

#[wasm_bindgen_test]
fn geometry_check_follows_layout() {
    let document = document();
    let host = host(&document);
    let near = image(&document, 0);
    let far = image(&document, FAR_BELOW);
    place(&document, &near);
    place(&document, &far);

    assert!(host.in_viewport(&near));
    assert!(!host.in_viewport(&far));

    near.remove();
    far.remove();
}

#[wasm_bindgen_test]
fn polling_classifier_marks_only_off_screen_images() {
    let document = document();
    let near = image(&document, 0);
    let far = image(&document, FAR_BELOW);
    place(&document, &near);
    place(&document, &far);
    let mut classifier: LazyClassifier<_, NoObserver> = LazyClassifier::polling(host(&document));

    assert_eq!(classifier.process(&far), Outcome::MarkedLazy);
    assert_eq!(classifier.process(&near), Outcome::LeftEager);
    assert_eq!(far.get_attribute("loading").as_deref(), Some("lazy"));
    assert_eq!(near.get_attribute("loading"), None);

    near.remove();
    far.remove();
}

#[wasm_bindgen_test]
fn exempt_and_directed_images_are_left_alone() {
    let document = document();
    let exempt = image(&document, FAR_BELOW);
    exempt.set_class_name("hero no-auto-lazy");
    let directed = image(&document, FAR_BELOW);
    directed
        .set_attribute("loading", "eager")
        .expect("set loading");
    place(&document, &exempt);
    place(&document, &directed);
    let mut classifier: LazyClassifier<_, NoObserver> = LazyClassifier::polling(host(&document));

    assert_eq!(classifier.process(&exempt), Outcome::Skipped(SkipReason::Exempt));
    assert_eq!(
        classifier.process(&directed),
        Outcome::Skipped(SkipReason::Directed)
    );
    assert_eq!(exempt.get_attribute("loading"), None);
    assert_eq!(directed.get_attribute("loading").as_deref(), Some("eager"));

    exempt.remove();
    directed.remove();
}

#[wasm_bindgen_test]
fn detached_image_write_is_refused() {
    let document = document();
    let detached = image(&document, FAR_BELOW);
    let host = host(&document);
    assert_eq!(host.set_lazy(&detached), Err(DirectiveError::Detached));
    assert_eq!(detached.get_attribute("loading"), None);
}

#[wasm_bindgen_test]
fn inserted_nodes_are_narrowed_to_images() {
    let document = document();
    let container = document.create_element("figure").expect("create figure");
    let plain = image(&document, 0);
    let directed = image(&document, 0);
    directed
        .set_attribute("loading", "lazy")
        .expect("set loading");
    container.append_child(&plain).expect("append");
    container.append_child(&directed).expect("append");

    assert_eq!(inserted_node(&container), InsertedNode::Container(vec![plain.clone()]));
    assert_eq!(inserted_node(&plain), InsertedNode::Image(plain.clone()));
    let text = document.create_text_node("caption");
    assert_eq!(inserted_node(&text), InsertedNode::Other);
}

#[wasm_bindgen_test]
fn polling_install_classifies_startup_images() {
    let document = document();
    let far = image(&document, FAR_BELOW);
    place(&document, &far);
    let config = LazyLoadConfig {
        force_polling: true,
        ..LazyLoadConfig::default()
    };

    let mut handle = LazyLoadHandle::install(&config).expect("install");
    assert!(!handle.classifier().borrow().is_observer_backed());
    assert!(handle.stats().marked_lazy >= 1);
    assert_eq!(far.get_attribute("loading").as_deref(), Some("lazy"));

    handle.dispose();
    assert!(handle.classifier().borrow().is_disposed());
    far.remove();
}

#[wasm_bindgen_test]
fn image_keys_follow_element_identity() {
    let document = document();
    let host = host(&document);
    let first = image(&document, 0);
    let second = image(&document, 0);

    let key = host.key(&first);
    assert_eq!(host.key(&first), key);
    assert_ne!(host.key(&second), key);
}

#[wasm_bindgen_test]
async fn observer_install_marks_images_inserted_later() {
    let document = document();
    let handle = LazyLoadHandle::install(&LazyLoadConfig::default()).expect("install");
    assert!(handle.classifier().borrow().is_observer_backed());

    let far = image(&document, FAR_BELOW);
    place(&document, &far);
    assert_eq!(far.get_attribute("loading"), None);

    let start = Date::now();
    loop {
        let settled = !handle.classifier().borrow().is_pending(&far);
        if settled && far.has_attribute("loading") {
            break;
        }
        if Date::now() - start > 5000.0 {
            panic!("inserted image was not classified within 5s");
        }
        TimeoutFuture::new(20).await;
    }

    assert_eq!(far.get_attribute("loading").as_deref(), Some("lazy"));
    assert!(handle.stats().observed >= 1);
    drop(handle);
    far.remove();
}
