use std::cell::RefCell;

use gloo::events::EventListener;
use pagelift_core::theme::{Theme, ThemeConfig, PREFERS_DARK_QUERY};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{Document, StorageEvent};

use crate::dom;

thread_local! {
    static THEME_LISTENERS: RefCell<Vec<EventListener>> = RefCell::new(Vec::new());
}

/// Applies the stored or system theme. Runs before the document is ready so
/// the page does not flash the wrong palette.
pub(crate) fn apply_initial(config: &ThemeConfig) -> Result<Theme, JsValue> {
    let stored = load_stored(config);
    let theme = Theme::resolve(stored.as_deref(), prefers_dark());
    apply(&dom::document()?, config, theme)?;
    Ok(theme)
}

/// Wires both toggles and follows theme changes made in other tabs. The
/// current theme is applied again because the toggles and the highlight
/// stylesheet may not have existed when [`apply_initial`] ran.
pub(crate) fn install(config: &ThemeConfig) -> Result<(), JsValue> {
    let window = dom::window()?;
    let document = dom::document()?;
    apply(&document, config, current_theme(&document, config))?;
    let mut listeners = Vec::new();

    for id in [&config.pressed_toggle_id, &config.checked_toggle_id] {
        let Some(button) = document.get_element_by_id(id) else {
            continue;
        };
        let config = config.clone();
        let document = document.clone();
        listeners.push(EventListener::new(&button, "click", move |_event| {
            let next = current_theme(&document, &config).toggled();
            persist(&config, next);
            if let Err(err) = apply(&document, &config, next) {
                gloo::console::warn!("theme: apply failed", dom::js_err(err));
            }
        }));
    }

    let config = config.clone();
    listeners.push(EventListener::new(&window, "storage", move |event| {
        let Some(event) = event.dyn_ref::<StorageEvent>() else {
            return;
        };
        if event.key().as_deref() != Some(config.storage_key.as_str()) {
            return;
        }
        let theme = Theme::from_dark(event.new_value().as_deref() == Some(Theme::Dark.as_str()));
        if let Err(err) = apply(&document, &config, theme) {
            gloo::console::warn!("theme: sync failed", dom::js_err(err));
        }
    }));

    THEME_LISTENERS.with(|slot| {
        *slot.borrow_mut() = listeners;
    });
    Ok(())
}

fn apply(document: &Document, config: &ThemeConfig, theme: Theme) -> Result<(), JsValue> {
    if let Some(root) = document.document_element() {
        root.class_list()
            .toggle_with_force(&config.dark_class, theme.is_dark())?;
    }
    if let Some(button) = document.get_element_by_id(&config.pressed_toggle_id) {
        button.set_attribute("aria-pressed", theme.aria_value())?;
    }
    if let Some(button) = document.get_element_by_id(&config.checked_toggle_id) {
        button.set_attribute("aria-checked", theme.aria_value())?;
    }
    if let Some(link) = document.get_element_by_id(&config.stylesheet_id) {
        link.set_attribute("href", config.stylesheet_for(theme))?;
    }
    Ok(())
}

fn current_theme(document: &Document, config: &ThemeConfig) -> Theme {
    let dark = document
        .document_element()
        .map(|root| root.class_list().contains(&config.dark_class))
        .unwrap_or(false);
    Theme::from_dark(dark)
}

fn load_stored(config: &ThemeConfig) -> Option<String> {
    let window = web_sys::window()?;
    let storage = window.local_storage().ok()??;
    storage.get_item(&config.storage_key).ok()?
}

fn persist(config: &ThemeConfig, theme: Theme) {
    let Some(window) = web_sys::window() else {
        return;
    };
    let Ok(Some(storage)) = window.local_storage() else {
        return;
    };
    if storage.set_item(&config.storage_key, theme.as_str()).is_err() {
        gloo::console::log!("theme: storage set failed");
    }
}

fn prefers_dark() -> bool {
    let Some(window) = web_sys::window() else {
        return false;
    };
    window
        .match_media(PREFERS_DARK_QUERY)
        .ok()
        .flatten()
        .map(|query| query.matches())
        .unwrap_or(false)
}

#[cfg(all(test, target_arch = "wasm32"))]
mod tests {
    use super::*;
    use wasm_bindgen_test::*;
    use web_sys::HtmlElement;

    wasm_bindgen_test_configure!(run_in_browser);

    fn test_config() -> ThemeConfig {
        ThemeConfig {
            storage_key: "pagelift-test-theme".to_string(),
            dark_class: "pagelift-test-dark".to_string(),
            pressed_toggle_id: "pagelift-test-toggle".to_string(),
            checked_toggle_id: "pagelift-test-toggle-pc".to_string(),
            stylesheet_id: "pagelift-test-hljs".to_string(),
            ..ThemeConfig::default()
        }
    }

    fn storage() -> web_sys::Storage {
        web_sys::window()
            .expect("window")
            .local_storage()
            .expect("storage access")
            .expect("storage available")
    }

    #[wasm_bindgen_test]
    fn install_syncs_toggles_created_after_initial_apply() {
        let config = test_config();
        let document = dom::document().expect("document");
        storage()
            .set_item(&config.storage_key, "dark")
            .expect("store theme");

        assert_eq!(apply_initial(&config).expect("apply"), Theme::Dark);

        let button = document
            .create_element("button")
            .expect("create button")
            .dyn_into::<HtmlElement>()
            .expect("html button");
        button.set_id(&config.pressed_toggle_id);
        let body = document.body().expect("body");
        body.append_child(&button).expect("append");
        assert_eq!(button.get_attribute("aria-pressed"), None);

        install(&config).expect("install");
        assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("true"));

        button.click();
        assert_eq!(button.get_attribute("aria-pressed").as_deref(), Some("false"));
        assert_eq!(
            storage().get_item(&config.storage_key).expect("read").as_deref(),
            Some("light")
        );
        let root = document.document_element().expect("root");
        assert!(!root.class_list().contains(&config.dark_class));

        button.remove();
        let _ = storage().remove_item(&config.storage_key);
    }
}
