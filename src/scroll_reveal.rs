use std::cell::RefCell;

use js_sys::Array;
use pagelift_core::reveal::{RevealAction, RevealConfig};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit};

use crate::dom;

struct RevealObserver {
    observer: IntersectionObserver,
    _callback: Closure<dyn FnMut(Array, IntersectionObserver)>,
}

thread_local! {
    static REVEAL: RefCell<Option<RevealObserver>> = RefCell::new(None);
}

/// Fades `.fade-element` targets in and out as they cross the viewport.
/// Without an intersection observer every target is revealed at once.
pub(crate) fn install(config: &RevealConfig) -> Result<usize, JsValue> {
    let document = dom::document()?;
    let Some(root) = document.query_selector(&config.root_selector)? else {
        return Ok(0);
    };
    let targets = dom::query_all(&root, &config.target_selector)?;
    if targets.is_empty() {
        return Ok(0);
    }

    if !dom::has_global("IntersectionObserver") {
        for target in &targets {
            target.class_list().add_1(&config.visible_class)?;
        }
        return Ok(targets.len());
    }

    let visible_class = config.visible_class.clone();
    let callback = Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
        for entry in entries.iter() {
            let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                continue;
            };
            let classes = entry.target().class_list();
            let _ = match RevealAction::for_intersection(entry.is_intersecting()) {
                RevealAction::Show => classes.add_1(&visible_class),
                RevealAction::Hide => classes.remove_1(&visible_class),
            };
        }
    }) as Box<dyn FnMut(Array, IntersectionObserver)>);

    let init = IntersectionObserverInit::new();
    init.set_root_margin(&config.root_margin);
    init.set_threshold(&JsValue::from_f64(config.threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    for target in &targets {
        observer.observe(target);
    }

    let previous = REVEAL.with(|slot| {
        slot.borrow_mut().replace(RevealObserver {
            observer,
            _callback: callback,
        })
    });
    if let Some(previous) = previous {
        previous.observer.disconnect();
    }
    Ok(targets.len())
}
