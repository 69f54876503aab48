use serde::{Deserialize, Serialize};

pub const HEADING_SELECTOR: &str = "h2, h3, h4, h5, h6";
pub const HEADING_LINK_CLASS: &str = "heading-link";
pub const HEADING_ANCHOR_CLASS: &str = "heading-anchor";
pub const COPY_FEEDBACK_CLASS: &str = "copy-feedback";
pub const COPIED_CLASS: &str = "copied";
pub const LIVE_REGION_ID: &str = "heading-link-live-region";
pub const LINK_LABEL: &str = "Copy link to this section";
pub const LINK_GLYPH: &str = "\u{1F517}";
pub const FEEDBACK_TEXT: &str = "Copied!";
pub const ANNOUNCE_COPIED: &str = "Link copied to clipboard";
pub const ANNOUNCE_FOCUSED: &str = "Link focused";

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HeadingLinksConfig {
    pub enabled: bool,
    pub root_selector: String,
    pub fallback_id: String,
    pub copied_ms: u32,
}

impl Default for HeadingLinksConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root_selector: "article".to_string(),
            fallback_id: "section".to_string(),
            copied_ms: 1500,
        }
    }
}

/// First of `base`, `base-1`, `base-2`, ... that `taken` rejects.
pub fn unique_id(base: &str, mut taken: impl FnMut(&str) -> bool) -> String {
    if !taken(base) {
        return base.to_string();
    }
    let mut index = 1u32;
    loop {
        let candidate = format!("{base}-{index}");
        if !taken(&candidate) {
            return candidate;
        }
        index = index.saturating_add(1);
    }
}

/// Absolute link to a section, dropping any hash already in the location.
pub fn share_url(origin: &str, pathname: &str, search: &str, id: &str) -> String {
    format!("{origin}{pathname}{search}#{id}")
}

pub fn is_activation_key(key: &str) -> bool {
    key == "Enter" || key == " "
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_id_keeps_free_base() {
        assert_eq!(unique_id("section", |_| false), "section");
    }

    #[test]
    fn unique_id_counts_past_taken_ids() {
        let taken = ["section", "section-1", "section-2"];
        assert_eq!(unique_id("section", |id| taken.contains(&id)), "section-3");
    }

    #[test]
    fn share_url_appends_fragment() {
        assert_eq!(
            share_url("https://blog.example", "/posts/rust/", "?ref=feed", "setup"),
            "https://blog.example/posts/rust/?ref=feed#setup"
        );
    }

    #[test]
    fn activation_keys() {
        assert!(is_activation_key("Enter"));
        assert!(is_activation_key(" "));
        assert!(!is_activation_key("Tab"));
    }
}
