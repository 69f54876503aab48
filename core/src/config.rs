use serde::{Deserialize, Serialize};

use crate::copy::CopyButtonConfig;
use crate::directive::DEFAULT_EXEMPT_CLASS;
use crate::heading::HeadingLinksConfig;
use crate::progress::ReadingProgressConfig;
use crate::reveal::RevealConfig;
use crate::theme::ThemeConfig;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ConfigError {
    #[error("config is not valid json: {0}")]
    Parse(String),
    #[error("config field `{field}` must not be empty")]
    Empty { field: &'static str },
    #[error("config field `{field}` must be within 0..=1, got {value}")]
    ThresholdOutOfRange { field: &'static str, value: f64 },
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LazyLoadConfig {
    pub enabled: bool,
    pub exempt_class: String,
    pub root_margin: String,
    pub threshold: f64,
    /// Skip the intersection observer even when the browser has one.
    pub force_polling: bool,
}

impl Default for LazyLoadConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            exempt_class: DEFAULT_EXEMPT_CLASS.to_string(),
            root_margin: "0px".to_string(),
            threshold: 0.0,
            force_polling: false,
        }
    }
}

/// Settings for every enhancement on the page. Missing fields keep their
/// defaults, so a page only spells out what it changes.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageConfig {
    pub lazy_load: LazyLoadConfig,
    pub copy_button: CopyButtonConfig,
    pub heading_links: HeadingLinksConfig,
    pub reveal: RevealConfig,
    pub theme: ThemeConfig,
    pub reading_progress: ReadingProgressConfig,
}

impl PageConfig {
    pub fn from_json(raw: &str) -> Result<Self, ConfigError> {
        let config: PageConfig =
            serde_json::from_str(raw).map_err(|err| ConfigError::Parse(err.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        non_empty("lazy_load.exempt_class", &self.lazy_load.exempt_class)?;
        unit_range("lazy_load.threshold", self.lazy_load.threshold)?;
        if self.copy_button.selectors.iter().all(|s| s.trim().is_empty()) {
            return Err(ConfigError::Empty {
                field: "copy_button.selectors",
            });
        }
        non_empty("heading_links.root_selector", &self.heading_links.root_selector)?;
        non_empty("heading_links.fallback_id", &self.heading_links.fallback_id)?;
        non_empty("reveal.root_selector", &self.reveal.root_selector)?;
        non_empty("reveal.target_selector", &self.reveal.target_selector)?;
        non_empty("reveal.visible_class", &self.reveal.visible_class)?;
        unit_range("reveal.threshold", self.reveal.threshold)?;
        non_empty("theme.storage_key", &self.theme.storage_key)?;
        non_empty("theme.dark_class", &self.theme.dark_class)?;
        non_empty("reading_progress.bar_id", &self.reading_progress.bar_id)?;
        Ok(())
    }
}

fn non_empty(field: &'static str, value: &str) -> Result<(), ConfigError> {
    if value.trim().is_empty() {
        return Err(ConfigError::Empty { field });
    }
    Ok(())
}

fn unit_range(field: &'static str, value: f64) -> Result<(), ConfigError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(ConfigError::ThresholdOutOfRange { field, value });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_object_yields_defaults() {
        let config = PageConfig::from_json("{}").expect("parse");
        assert_eq!(config, PageConfig::default());
        assert_eq!(config.lazy_load.exempt_class, "no-auto-lazy");
        assert_eq!(config.lazy_load.root_margin, "0px");
    }

    #[test]
    fn partial_override_keeps_other_defaults() {
        let raw = r#"{"lazy_load":{"force_polling":true},"theme":{"storage_key":"blog-theme"}}"#;
        let config = PageConfig::from_json(raw).expect("parse");
        assert!(config.lazy_load.force_polling);
        assert!(config.lazy_load.enabled);
        assert_eq!(config.theme.storage_key, "blog-theme");
        assert_eq!(config.theme.dark_class, "dark-mode");
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(matches!(
            PageConfig::from_json("{lazy"),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn rejects_empty_exempt_class() {
        let err = PageConfig::from_json(r#"{"lazy_load":{"exempt_class":"  "}}"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Empty {
                field: "lazy_load.exempt_class"
            }
        );
    }

    #[test]
    fn rejects_threshold_out_of_range() {
        let err = PageConfig::from_json(r#"{"reveal":{"threshold":1.5}}"#).unwrap_err();
        assert!(matches!(
            err,
            ConfigError::ThresholdOutOfRange {
                field: "reveal.threshold",
                ..
            }
        ));
    }

    #[test]
    fn reading_progress_can_be_turned_off() {
        let config = PageConfig::from_json(r#"{"reading_progress":{"enabled":false}}"#)
            .expect("parse");
        assert!(!config.reading_progress.enabled);
        assert_eq!(config.reading_progress.bar_id, "reading-progress-bar");
        let err = PageConfig::from_json(r#"{"reading_progress":{"bar_id":""}}"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Empty {
                field: "reading_progress.bar_id"
            }
        );
    }

    #[test]
    fn rejects_blank_copy_selectors() {
        let err = PageConfig::from_json(r#"{"copy_button":{"selectors":[""]}}"#).unwrap_err();
        assert_eq!(
            err,
            ConfigError::Empty {
                field: "copy_button.selectors"
            }
        );
    }
}
