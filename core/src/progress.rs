use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadingProgressConfig {
    pub enabled: bool,
    pub bar_id: String,
}

impl Default for ReadingProgressConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            bar_id: "reading-progress-bar".to_string(),
        }
    }
}

/// Scroll position of the root element, in CSS pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub client_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

/// How far through the document the reader has scrolled, within `0..=1`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ReadingProgress(f64);

impl ReadingProgress {
    pub fn from_metrics(metrics: ScrollMetrics) -> Self {
        let range = metrics.scroll_height - metrics.client_height;
        if range.is_nan() || range <= 0.0 {
            return Self(0.0);
        }
        Self::clamped((metrics.scroll_top - metrics.client_top) / range)
    }

    pub fn clamped(fraction: f64) -> Self {
        if fraction.is_nan() {
            return Self(0.0);
        }
        Self(fraction.clamp(0.0, 1.0))
    }

    pub fn fraction(self) -> f64 {
        self.0
    }

    pub fn percent(self) -> u32 {
        (self.0 * 100.0).round() as u32
    }

    pub fn transform(self) -> String {
        format!("scaleX({})", self.0)
    }

    pub fn label(self) -> String {
        format!("{}% read", self.percent())
    }
}
