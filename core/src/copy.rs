use serde::{Deserialize, Serialize};

pub const COPY_BUTTON_CLASS: &str = "copy-code-button";
pub const COPY_PRE_CLASS: &str = "copy-code-pre";
pub const COPY_GAP_VAR: &str = "--copy-button-gap";
pub const COPY_GAP_BUFFER_PX: f64 = 12.0;
pub const COPY_RESET_MS: u32 = 2000;

const DEFAULT_SELECTORS: &[&str] = &["pre > code", "div.highlighter-rouge pre", ".highlight pre"];

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyButtonConfig {
    pub enabled: bool,
    pub selectors: Vec<String>,
    pub reset_ms: u32,
}

impl Default for CopyButtonConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            selectors: DEFAULT_SELECTORS.iter().map(|s| s.to_string()).collect(),
            reset_ms: COPY_RESET_MS,
        }
    }
}

impl CopyButtonConfig {
    pub fn selector(&self) -> String {
        self.selectors.join(",")
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyState {
    Idle,
    Copied,
    Failed,
}

impl CopyState {
    pub fn from_result<T, E>(result: &Result<T, E>) -> Self {
        if result.is_ok() {
            CopyState::Copied
        } else {
            CopyState::Failed
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            CopyState::Idle => "Copy",
            CopyState::Copied => "Copied!",
            CopyState::Failed => "Failed",
        }
    }

    pub fn aria_label(self) -> &'static str {
        match self {
            CopyState::Copied => "Code copied to clipboard",
            CopyState::Idle | CopyState::Failed => "Copy code to clipboard",
        }
    }

    pub fn class(self) -> Option<&'static str> {
        match self {
            CopyState::Idle => None,
            CopyState::Copied => Some("copied"),
            CopyState::Failed => Some("failed"),
        }
    }

    /// Whether the button returns to idle after the reset delay.
    pub fn reverts(self) -> bool {
        self != CopyState::Idle
    }
}

pub const STATE_CLASSES: &[&str] = &["copied", "failed"];

/// Value for the `--copy-button-gap` custom property.
pub fn button_gap(button_width: f64) -> String {
    format!("{}px", button_width + COPY_GAP_BUFFER_PX)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_selector_joins_patterns() {
        let config = CopyButtonConfig::default();
        assert_eq!(
            config.selector(),
            "pre > code,div.highlighter-rouge pre,.highlight pre"
        );
    }

    #[test]
    fn state_follows_copy_result() {
        let ok: Result<(), ()> = Ok(());
        let err: Result<(), ()> = Err(());
        assert_eq!(CopyState::from_result(&ok), CopyState::Copied);
        assert_eq!(CopyState::from_result(&err), CopyState::Failed);
    }

    #[test]
    fn failed_keeps_idle_aria_label() {
        assert_eq!(CopyState::Failed.aria_label(), CopyState::Idle.aria_label());
        assert_eq!(CopyState::Copied.label(), "Copied!");
        assert!(!CopyState::Idle.reverts());
    }

    #[test]
    fn gap_adds_buffer() {
        assert_eq!(button_gap(48.0), "60px");
    }
}
