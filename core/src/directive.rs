pub const LOADING_ATTR: &str = "loading";
pub const LOADING_LAZY: &str = "lazy";
pub const DEFAULT_EXEMPT_CLASS: &str = "no-auto-lazy";
pub const UNDIRECTED_IMAGE_SELECTOR: &str = "img:not([loading])";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DirectiveError {
    #[error("image is no longer attached to the document")]
    Detached,
    #[error("loading attribute write rejected: {0}")]
    Rejected(String),
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The image already carries a `loading` attribute.
    Directed,
    /// The image opted out through the exemption class.
    Exempt,
}

/// Result of routing one image through the classifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Observed,
    AlreadyPending,
    /// The image already received its one decision.
    AlreadyDecided,
    MarkedLazy,
    LeftEager,
    Skipped(SkipReason),
    Failed,
    Ignored,
}

impl Outcome {
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Outcome::MarkedLazy | Outcome::LeftEager | Outcome::Skipped(_) | Outcome::Failed
        )
    }
}
