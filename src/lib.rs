//! Progressive enhancements for static content pages: deferred loading for
//! off-screen images, copy buttons on code blocks, shareable heading links,
//! fade-in on scroll, a reading progress bar and a light/dark theme toggle.

mod boot;
mod clipboard;
mod config;
mod copy_button;
mod dom;
pub mod dom_host;
mod heading_links;
pub mod lazy_load;
mod reading_progress;
mod scroll_reveal;
mod theme_toggle;

use wasm_bindgen::prelude::*;
use web_sys::Element;

pub use pagelift_core::{ClassifierStats, PageConfig};

#[wasm_bindgen(start)]
pub fn start() {
    let config = config::page_config();
    if config.theme.enabled {
        boot::run_feature("theme", || theme_toggle::apply_initial(&config.theme));
    }
    boot::on_dom_ready(move || {
        if config.lazy_load.enabled {
            boot::run_feature("lazy load", || lazy_load::install(&config.lazy_load));
        }
        if config.copy_button.enabled {
            boot::run_feature("copy button", || copy_button::attach(&config.copy_button));
        }
        if config.heading_links.enabled {
            boot::run_feature("heading links", || {
                heading_links::install(&config.heading_links, None)
            });
        }
        if config.reveal.enabled {
            boot::run_feature("scroll reveal", || scroll_reveal::install(&config.reveal));
        }
        if config.theme.enabled {
            boot::run_feature("theme", || theme_toggle::install(&config.theme));
        }
        if config.reading_progress.enabled {
            boot::run_feature("reading progress", || {
                reading_progress::install(&config.reading_progress)
            });
        }
        if let Some(stats) = lazy_load::stats() {
            gloo::console::log!("pagelift: ready", stats.observed, stats.marked_lazy);
        }
    });
}

/// Re-scans the page for code blocks added after load.
#[wasm_bindgen(js_name = attachCopyButtons)]
pub fn attach_copy_buttons() -> usize {
    let config = config::page_config();
    boot::run_feature("copy button", || copy_button::attach(&config.copy_button)).unwrap_or(0)
}

/// Re-scans for headings added after load, under `root` when given.
#[wasm_bindgen(js_name = installHeadingLinks)]
pub fn install_heading_links(root: Option<Element>) -> usize {
    let config = config::page_config();
    boot::run_feature("heading links", || heading_links::install(&config.heading_links, root))
        .unwrap_or(0)
}

/// Counters from the image loader, or `None` before it is installed.
pub fn lazy_load_stats() -> Option<ClassifierStats> {
    lazy_load::stats()
}

/// Same counters as a JSON object string for page scripts.
#[wasm_bindgen(js_name = lazyLoadStats)]
pub fn lazy_load_stats_json() -> Option<String> {
    let stats = lazy_load::stats()?;
    match serde_json::to_string(&stats) {
        Ok(json) => Some(json),
        Err(err) => {
            gloo::console::warn!("lazy load: stats not serializable", err.to_string());
            None
        }
    }
}

/// Stops watching the page for images; directives already written stay.
#[wasm_bindgen(js_name = disposeLazyLoad)]
pub fn dispose_lazy_load() {
    lazy_load::dispose();
}
