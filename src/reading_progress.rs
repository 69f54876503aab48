use std::cell::RefCell;
use std::rc::Rc;

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use pagelift_core::{FrameGate, ReadingProgress, ReadingProgressConfig, ScrollMetrics};
use wasm_bindgen::JsValue;
use web_sys::{Document, Element, Window};

use crate::dom;

const UPDATE_EVENTS: &[&str] = &["scroll", "resize"];

struct ProgressBar {
    bar: Element,
    gate: RefCell<FrameGate>,
    frame: RefCell<Option<AnimationFrame>>,
}

struct ProgressHandle {
    _listeners: Vec<EventListener>,
    _bar: Rc<ProgressBar>,
}

thread_local! {
    static PROGRESS: RefCell<Option<ProgressHandle>> = RefCell::new(None);
}

/// Drives the `#reading-progress-bar` element from the scroll position.
/// Returns false when the page has no bar.
pub(crate) fn install(config: &ReadingProgressConfig) -> Result<bool, JsValue> {
    let window = dom::window()?;
    let document = dom::document()?;
    let Some(bar) = document.get_element_by_id(&config.bar_id) else {
        return Ok(false);
    };
    let bar = Rc::new(ProgressBar {
        bar,
        gate: RefCell::new(FrameGate::new()),
        frame: RefCell::new(None),
    });

    let listeners = UPDATE_EVENTS
        .iter()
        .map(|event| {
            let bar = Rc::clone(&bar);
            EventListener::new_with_options(
                &window,
                *event,
                EventListenerOptions {
                    phase: EventListenerPhase::Bubble,
                    passive: true,
                },
                move |_event| schedule(&bar),
            )
        })
        .collect();
    schedule(&bar);

    PROGRESS.with(|slot| {
        *slot.borrow_mut() = Some(ProgressHandle {
            _listeners: listeners,
            _bar: bar,
        });
    });
    Ok(true)
}

fn schedule(bar: &Rc<ProgressBar>) {
    if !bar.gate.borrow_mut().request() {
        return;
    }
    let view = Rc::clone(bar);
    let handle = request_animation_frame(move |_| {
        view.frame.borrow_mut().take();
        view.gate.borrow_mut().begin();
        if let Err(err) = update(&view.bar) {
            gloo::console::warn!("reading progress: update failed", dom::js_err(err));
        }
    });
    *bar.frame.borrow_mut() = Some(handle);
}

fn update(bar: &Element) -> Result<ReadingProgress, JsValue> {
    let metrics = scroll_metrics(&dom::window()?, &dom::document()?);
    let progress = ReadingProgress::from_metrics(metrics);
    dom::set_style(bar, "transform", &progress.transform())?;
    bar.set_attribute("aria-valuenow", &progress.percent().to_string())?;
    bar.set_attribute("aria-label", &progress.label())?;
    Ok(progress)
}

fn scroll_metrics(window: &Window, document: &Document) -> ScrollMetrics {
    let Some(root) = document.document_element() else {
        return ScrollMetrics::default();
    };
    let offset = window.page_y_offset().unwrap_or(0.0);
    let scroll_top = if offset > 0.0 {
        offset
    } else {
        root.scroll_top() as f64
    };
    ScrollMetrics {
        scroll_top,
        client_top: root.client_top() as f64,
        scroll_height: root.scroll_height() as f64,
        client_height: root.client_height() as f64,
    }
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use gloo::timers::future::TimeoutFuture;
    use wasm_bindgen_test::*;

    wasm_bindgen_test_configure!(run_in_browser);

    fn test_bar(document: &Document, id: &str) -> Element {
        let bar = document.create_element("div").expect("create bar");
        bar.set_id(id);
        document
            .body()
            .expect("body")
            .append_child(&bar)
            .expect("append");
        bar
    }

    #[wasm_bindgen_test]
    fn missing_bar_installs_nothing() {
        let config = ReadingProgressConfig {
            bar_id: "pagelift-test-no-bar".to_string(),
            ..ReadingProgressConfig::default()
        };
        assert!(!install(&config).expect("install"));
    }

    #[wasm_bindgen_test]
    async fn first_frame_reports_progress() {
        let document = dom::document().expect("document");
        let config = ReadingProgressConfig {
            bar_id: "pagelift-test-progress".to_string(),
            ..ReadingProgressConfig::default()
        };
        let bar = test_bar(&document, &config.bar_id);

        assert!(install(&config).expect("install"));
        TimeoutFuture::new(100).await;

        let percent: u32 = bar
            .get_attribute("aria-valuenow")
            .expect("aria-valuenow set")
            .parse()
            .expect("integer percent");
        assert!(percent <= 100);
        assert_eq!(
            bar.get_attribute("aria-label"),
            Some(format!("{percent}% read"))
        );
        bar.remove();
    }
}
