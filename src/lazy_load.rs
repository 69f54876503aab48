use std::cell::RefCell;
use std::rc::{Rc, Weak};

use gloo::events::{EventListener, EventListenerOptions, EventListenerPhase};
use gloo::render::{request_animation_frame, AnimationFrame};
use js_sys::Array;
use pagelift_core::{ClassifierStats, LazyClassifier, LazyLoadConfig, Strategy};
use wasm_bindgen::closure::Closure;
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{
    IntersectionObserver, IntersectionObserverEntry, IntersectionObserverInit, MutationObserver,
    MutationObserverInit, MutationRecord, Node,
};

use crate::dom;
use crate::dom_host::{inserted_node, DomImageHost, DomVisibilityObserver};

const RECHECK_EVENTS: &[&str] = &["scroll", "resize", "orientationchange"];

pub type DomClassifier = LazyClassifier<DomImageHost, DomVisibilityObserver>;

type ClassifierSlot = Rc<RefCell<Weak<RefCell<DomClassifier>>>>;
type ObserverCallback = Closure<dyn FnMut(Array, IntersectionObserver)>;
type MutationCallback = Closure<dyn FnMut(Array, MutationObserver)>;

/// Every subscription the image loader holds. Dropping it, or calling
/// [`LazyLoadHandle::dispose`], stops all classification.
pub struct LazyLoadHandle {
    classifier: Rc<RefCell<DomClassifier>>,
    mutation_observer: MutationObserver,
    _mutation_callback: MutationCallback,
    _observer_callback: Option<ObserverCallback>,
    listeners: Vec<EventListener>,
    frame: Rc<RefCell<Option<AnimationFrame>>>,
}

impl LazyLoadHandle {
    pub fn install(config: &LazyLoadConfig) -> Result<Self, JsValue> {
        let window = dom::window()?;
        let document = dom::document()?;
        let host = DomImageHost::new(window.clone(), document.clone(), config.exempt_class.clone());

        let slot: ClassifierSlot = Rc::new(RefCell::new(Weak::new()));
        let (strategy, observer_callback) = select_strategy(&slot, config);
        let classifier = Rc::new(RefCell::new(LazyClassifier::new(host, strategy)));
        *slot.borrow_mut() = Rc::downgrade(&classifier);

        let scanned = classifier.borrow_mut().start();
        let observer_backed = classifier.borrow().is_observer_backed();
        gloo::console::log!("lazy load: initial scan", scanned, observer_backed);

        let root: Node = match document.document_element() {
            Some(root) => root.into(),
            None => document.clone().into(),
        };
        let (mutation_observer, mutation_callback) = watch_insertions(&classifier, &root)?;

        let frame = Rc::new(RefCell::new(None));
        let mut listeners = Vec::new();
        if !observer_backed {
            for event in RECHECK_EVENTS {
                let classifier = Rc::clone(&classifier);
                let frame = Rc::clone(&frame);
                listeners.push(EventListener::new_with_options(
                    &window,
                    *event,
                    EventListenerOptions {
                        phase: EventListenerPhase::Bubble,
                        passive: true,
                    },
                    move |_event| schedule_recheck(&classifier, &frame),
                ));
            }
            schedule_recheck(&classifier, &frame);
        }

        Ok(Self {
            classifier,
            mutation_observer,
            _mutation_callback: mutation_callback,
            _observer_callback: observer_callback,
            listeners,
            frame,
        })
    }

    pub fn stats(&self) -> ClassifierStats {
        self.classifier.borrow().stats()
    }

    pub fn classifier(&self) -> &Rc<RefCell<DomClassifier>> {
        &self.classifier
    }

    pub fn dispose(&mut self) {
        self.mutation_observer.disconnect();
        self.listeners.clear();
        self.frame.borrow_mut().take();
        self.classifier.borrow_mut().dispose();
    }
}

impl Drop for LazyLoadHandle {
    fn drop(&mut self) {
        self.dispose();
    }
}

fn select_strategy(
    slot: &ClassifierSlot,
    config: &LazyLoadConfig,
) -> (Strategy<DomVisibilityObserver>, Option<ObserverCallback>) {
    if config.force_polling || !dom::has_global("IntersectionObserver") {
        return (Strategy::polling(), None);
    }
    match intersection_observer(slot, config) {
        Ok((observer, callback)) => (Strategy::Observer(observer), Some(callback)),
        Err(err) => {
            gloo::console::warn!("lazy load: observer unavailable, polling", dom::js_err(err));
            (Strategy::polling(), None)
        }
    }
}

fn intersection_observer(
    slot: &ClassifierSlot,
    config: &LazyLoadConfig,
) -> Result<(DomVisibilityObserver, ObserverCallback), JsValue> {
    let callback = {
        let slot = Rc::clone(slot);
        Closure::wrap(Box::new(move |entries: Array, _observer: IntersectionObserver| {
            let Some(classifier) = slot.borrow().upgrade() else {
                return;
            };
            let mut classifier = classifier.borrow_mut();
            for entry in entries.iter() {
                let Ok(entry) = entry.dyn_into::<IntersectionObserverEntry>() else {
                    continue;
                };
                classifier.on_visibility(&entry.target(), entry.is_intersecting());
            }
        }) as Box<dyn FnMut(Array, IntersectionObserver)>)
    };
    let init = IntersectionObserverInit::new();
    init.set_root_margin(&config.root_margin);
    init.set_threshold(&JsValue::from_f64(config.threshold));
    let observer = IntersectionObserver::new_with_options(callback.as_ref().unchecked_ref(), &init)?;
    Ok((DomVisibilityObserver::new(observer), callback))
}

fn watch_insertions(
    classifier: &Rc<RefCell<DomClassifier>>,
    root: &Node,
) -> Result<(MutationObserver, MutationCallback), JsValue> {
    let callback = {
        let classifier = Rc::downgrade(classifier);
        Closure::wrap(Box::new(move |records: Array, _observer: MutationObserver| {
            let Some(classifier) = classifier.upgrade() else {
                return;
            };
            let mut inserted = Vec::new();
            for record in records.iter() {
                let Ok(record) = record.dyn_into::<MutationRecord>() else {
                    continue;
                };
                let added = record.added_nodes();
                for index in 0..added.length() {
                    if let Some(node) = added.get(index) {
                        inserted.push(inserted_node(&node));
                    }
                }
            }
            if !inserted.is_empty() {
                classifier.borrow_mut().on_inserted(inserted);
            }
        }) as Box<dyn FnMut(Array, MutationObserver)>)
    };
    let observer = MutationObserver::new(callback.as_ref().unchecked_ref())?;
    let init = MutationObserverInit::new();
    init.set_child_list(true);
    init.set_subtree(true);
    observer.observe_with_options(root, &init)?;
    Ok((observer, callback))
}

fn schedule_recheck(
    classifier: &Rc<RefCell<DomClassifier>>,
    frame: &Rc<RefCell<Option<AnimationFrame>>>,
) {
    if !classifier.borrow_mut().request_recheck() {
        return;
    }
    let classifier = Rc::clone(classifier);
    let frame_slot = Rc::clone(frame);
    let handle = request_animation_frame(move |_| {
        frame_slot.borrow_mut().take();
        let marked = classifier.borrow_mut().run_recheck();
        if marked > 0 {
            gloo::console::log!("lazy load: recheck marked", marked);
        }
    });
    *frame.borrow_mut() = Some(handle);
}

thread_local! {
    static LAZY_LOAD: RefCell<Option<LazyLoadHandle>> = RefCell::new(None);
}

/// Installs the page-lifetime loader once; later calls are no-ops.
pub(crate) fn install(config: &LazyLoadConfig) -> Result<(), JsValue> {
    if LAZY_LOAD.with(|slot| slot.borrow().is_some()) {
        return Ok(());
    }
    let handle = LazyLoadHandle::install(config)?;
    LAZY_LOAD.with(|slot| {
        *slot.borrow_mut() = Some(handle);
    });
    Ok(())
}

pub(crate) fn dispose() {
    let handle = LAZY_LOAD.with(|slot| slot.borrow_mut().take());
    if let Some(mut handle) = handle {
        handle.dispose();
        gloo::console::log!("lazy load: disposed");
    }
}

pub(crate) fn stats() -> Option<ClassifierStats> {
    LAZY_LOAD.with(|slot| slot.borrow().as_ref().map(LazyLoadHandle::stats))
}
