pub mod classifier;
pub mod config;
pub mod copy;
pub mod directive;
pub mod frame_gate;
pub mod geometry;
pub mod heading;
pub mod host;
pub mod mutation;
pub mod progress;
pub mod reveal;
pub mod theme;

pub use classifier::{ClassifierStats, LazyClassifier, Strategy};
pub use config::{ConfigError, LazyLoadConfig, PageConfig};
pub use directive::{
    DirectiveError, Outcome, SkipReason, DEFAULT_EXEMPT_CLASS, LOADING_ATTR, LOADING_LAZY,
    UNDIRECTED_IMAGE_SELECTOR,
};
pub use frame_gate::FrameGate;
pub use geometry::{intersects_viewport, Rect, ViewportSize};
pub use host::{ImageHost, NoObserver, VisibilityObserver};
pub use mutation::InsertedNode;
pub use progress::{ReadingProgress, ReadingProgressConfig, ScrollMetrics};
pub use theme::Theme;
