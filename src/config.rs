use std::cell::RefCell;

use js_sys::Reflect;
use pagelift_core::{ConfigError, PageConfig};
use wasm_bindgen::JsValue;

use crate::dom;

/// Global a page can define before loading the module to override defaults.
const CONFIG_GLOBAL: &str = "__PAGELIFT_CONFIG";

thread_local! {
    static PAGE_CONFIG: RefCell<Option<PageConfig>> = RefCell::new(None);
}

pub(crate) fn page_config() -> PageConfig {
    if let Some(config) = PAGE_CONFIG.with(|slot| slot.borrow().clone()) {
        return config;
    }
    let config = load_page_config();
    PAGE_CONFIG.with(|slot| {
        *slot.borrow_mut() = Some(config.clone());
    });
    config
}

fn load_page_config() -> PageConfig {
    match read_config_global() {
        Ok(Some(config)) => {
            gloo::console::log!("config: loaded page overrides");
            config
        }
        Ok(None) => PageConfig::default(),
        Err(err) => {
            gloo::console::warn!("config: using defaults", err.to_string());
            PageConfig::default()
        }
    }
}

fn read_config_global() -> Result<Option<PageConfig>, ConfigError> {
    let Some(window) = web_sys::window() else {
        return Ok(None);
    };
    let Ok(value) = Reflect::get(&window, &JsValue::from_str(CONFIG_GLOBAL)) else {
        return Ok(None);
    };
    if value.is_null() || value.is_undefined() {
        return Ok(None);
    }
    let raw = match value.as_string() {
        Some(raw) => raw,
        None => js_sys::JSON::stringify(&value)
            .map_err(|err| ConfigError::Parse(dom::js_err(err)))?
            .as_string()
            .unwrap_or_default(),
    };
    PageConfig::from_json(&raw).map(Some)
}
