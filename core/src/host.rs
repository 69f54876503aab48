use std::hash::Hash;

use crate::directive::DirectiveError;

/// Document access needed by the classifier.
///
/// The browser crate implements this over `web_sys::Element`; tests use an
/// in-memory document. The classifier tracks images by `Key`, which must
/// stay the same for one image for as long as the host lives.
pub trait ImageHost {
    type Image: Clone;
    type Key: Copy + Eq + Hash;

    fn key(&self, image: &Self::Image) -> Self::Key;

    /// Whether the image carries an explicit `loading` attribute.
    fn has_directive(&self, image: &Self::Image) -> bool;

    /// Whether the image opted out of automatic classification.
    fn is_exempt(&self, image: &Self::Image) -> bool;

    /// Synchronous geometry check against the current viewport.
    fn in_viewport(&self, image: &Self::Image) -> bool;

    fn set_lazy(&self, image: &Self::Image) -> Result<(), DirectiveError>;

    /// Every image in the document that has no `loading` attribute yet.
    fn undirected_images(&self) -> Vec<Self::Image>;

    fn report_failure(&self, _image: &Self::Image, _error: &DirectiveError) {}
}

/// Asynchronous viewport intersection reporting.
pub trait VisibilityObserver<I> {
    fn observe(&self, image: &I);
    fn unobserve(&self, image: &I);
    fn disconnect(&self);
}

/// Placeholder observer for classifiers that only ever poll.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoObserver;

impl<I> VisibilityObserver<I> for NoObserver {
    fn observe(&self, _image: &I) {}
    fn unobserve(&self, _image: &I) {}
    fn disconnect(&self) {}
}
