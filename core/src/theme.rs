use serde::{Deserialize, Serialize};

pub const PREFERS_DARK_QUERY: &str = "(prefers-color-scheme: dark)";

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    Light,
    Dark,
}

impl Theme {
    pub fn from_dark(dark: bool) -> Self {
        if dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn parse(value: &str) -> Option<Self> {
        match value {
            "light" => Some(Theme::Light),
            "dark" => Some(Theme::Dark),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Stored choice first, then the system preference, then light.
    pub fn resolve(stored: Option<&str>, prefers_dark: bool) -> Self {
        stored
            .and_then(Theme::parse)
            .unwrap_or_else(|| Theme::from_dark(prefers_dark))
    }

    pub fn aria_value(self) -> &'static str {
        if self.is_dark() {
            "true"
        } else {
            "false"
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    pub enabled: bool,
    pub storage_key: String,
    pub dark_class: String,
    /// Toggle reporting its state through `aria-pressed`.
    pub pressed_toggle_id: String,
    /// Toggle reporting its state through `aria-checked`.
    pub checked_toggle_id: String,
    pub stylesheet_id: String,
    pub light_stylesheet: String,
    pub dark_stylesheet: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            storage_key: "site-theme".to_string(),
            dark_class: "dark-mode".to_string(),
            pressed_toggle_id: "theme-toggle".to_string(),
            checked_toggle_id: "theme-toggle-pc".to_string(),
            stylesheet_id: "hljs-theme".to_string(),
            light_stylesheet:
                "https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.11.1/styles/github.min.css"
                    .to_string(),
            dark_stylesheet:
                "https://cdn.jsdelivr.net/npm/highlight.js@11.9.0/styles/atom-one-dark.min.css"
                    .to_string(),
        }
    }
}

impl ThemeConfig {
    pub fn stylesheet_for(&self, theme: Theme) -> &str {
        match theme {
            Theme::Light => &self.light_stylesheet,
            Theme::Dark => &self.dark_stylesheet,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stored_value_wins() {
        assert_eq!(Theme::resolve(Some("light"), true), Theme::Light);
        assert_eq!(Theme::resolve(Some("dark"), false), Theme::Dark);
    }

    #[test]
    fn unknown_stored_value_uses_system() {
        assert_eq!(Theme::resolve(Some("sepia"), true), Theme::Dark);
        assert_eq!(Theme::resolve(None, false), Theme::Light);
    }

    #[test]
    fn toggle_flips() {
        assert_eq!(Theme::Light.toggled(), Theme::Dark);
        assert_eq!(Theme::Dark.toggled().toggled(), Theme::Dark);
    }

    #[test]
    fn stylesheet_matches_theme() {
        let config = ThemeConfig::default();
        assert!(config.stylesheet_for(Theme::Dark).contains("atom-one-dark"));
        assert!(config.stylesheet_for(Theme::Light).contains("github"));
    }
}
