use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    pub enabled: bool,
    pub root_selector: String,
    pub target_selector: String,
    pub visible_class: String,
    pub threshold: f64,
    pub root_margin: String,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            root_selector: "article".to_string(),
            target_selector: ".fade-element".to_string(),
            visible_class: "in-view".to_string(),
            threshold: 0.15,
            root_margin: "0px 0px -10% 0px".to_string(),
        }
    }
}

/// Reveal toggles both ways, so elements fade out again when they leave.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RevealAction {
    Show,
    Hide,
}

impl RevealAction {
    pub fn for_intersection(intersecting: bool) -> Self {
        if intersecting {
            RevealAction::Show
        } else {
            RevealAction::Hide
        }
    }
}
