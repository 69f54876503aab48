use std::collections::HashSet;

use serde::Serialize;

use crate::directive::{Outcome, SkipReason};
use crate::frame_gate::FrameGate;
use crate::host::{ImageHost, VisibilityObserver};
use crate::mutation::InsertedNode;

/// How visibility gets decided, chosen once when the classifier is built.
pub enum Strategy<O> {
    /// Register images with an intersection observer and decide on its
    /// first report.
    Observer(O),
    /// Check geometry immediately, then recheck on scroll, resize and
    /// orientation change, one pass per animation frame.
    Polling(FrameGate),
}

impl<O> Strategy<O> {
    pub fn polling() -> Self {
        Strategy::Polling(FrameGate::new())
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ClassifierStats {
    pub observed: u32,
    pub marked_lazy: u32,
    pub left_eager: u32,
    pub skipped: u32,
    pub failed: u32,
    pub rechecks: u32,
}

/// Decides, once per image, whether an image should carry
/// `loading="lazy"`.
///
/// An image is never both pending and decided: it leaves the pending set
/// before its decision is recorded, and a decided image is never routed
/// again. Only the polling recheck revisits images left eager, since an
/// image can scroll off-screen after its first check.
pub struct LazyClassifier<H: ImageHost, O> {
    host: H,
    strategy: Strategy<O>,
    pending: HashSet<H::Key>,
    decided: HashSet<H::Key>,
    stats: ClassifierStats,
    disposed: bool,
}

impl<H, O> LazyClassifier<H, O>
where
    H: ImageHost,
    O: VisibilityObserver<H::Image>,
{
    pub fn new(host: H, strategy: Strategy<O>) -> Self {
        Self {
            host,
            strategy,
            pending: HashSet::new(),
            decided: HashSet::new(),
            stats: ClassifierStats::default(),
            disposed: false,
        }
    }

    pub fn with_observer(host: H, observer: O) -> Self {
        Self::new(host, Strategy::Observer(observer))
    }

    pub fn polling(host: H) -> Self {
        Self::new(host, Strategy::polling())
    }

    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn stats(&self) -> ClassifierStats {
        self.stats
    }

    pub fn is_observer_backed(&self) -> bool {
        matches!(self.strategy, Strategy::Observer(_))
    }

    pub fn is_disposed(&self) -> bool {
        self.disposed
    }

    pub fn pending_count(&self) -> usize {
        self.pending.len()
    }

    pub fn is_pending(&self, image: &H::Image) -> bool {
        self.pending.contains(&self.host.key(image))
    }

    pub fn is_decided(&self, image: &H::Image) -> bool {
        self.decided.contains(&self.host.key(image))
    }

    /// Routes every image currently lacking a directive. Returns how many
    /// images were looked at.
    pub fn start(&mut self) -> usize {
        let images = self.host.undirected_images();
        for image in &images {
            self.process(image);
        }
        images.len()
    }

    /// Entry path shared by the startup scan and the mutation watcher.
    pub fn process(&mut self, image: &H::Image) -> Outcome {
        if self.disposed {
            return Outcome::Ignored;
        }
        let key = self.host.key(image);
        if self.decided.contains(&key) {
            return Outcome::AlreadyDecided;
        }
        let skip = if self.host.has_directive(image) {
            Some(SkipReason::Directed)
        } else if self.host.is_exempt(image) {
            Some(SkipReason::Exempt)
        } else {
            None
        };
        if let Some(reason) = skip {
            self.forget_pending(image);
            self.stats.skipped += 1;
            return Outcome::Skipped(reason);
        }

        if let Strategy::Observer(observer) = &self.strategy {
            if !self.pending.insert(key) {
                return Outcome::AlreadyPending;
            }
            observer.observe(image);
            self.stats.observed += 1;
            return Outcome::Observed;
        }

        let outcome = if self.host.in_viewport(image) {
            self.stats.left_eager += 1;
            Outcome::LeftEager
        } else {
            self.mark_lazy(image)
        };
        self.decide(key, outcome)
    }

    /// Handles one observer report. Every report is terminal for its image;
    /// reports for images that are not pending are ignored.
    pub fn on_visibility(&mut self, image: &H::Image, intersecting: bool) -> Outcome {
        if self.disposed || !self.forget_pending(image) {
            return Outcome::Ignored;
        }
        if self.host.has_directive(image) {
            self.stats.skipped += 1;
            return Outcome::Skipped(SkipReason::Directed);
        }
        let outcome = if intersecting {
            self.stats.left_eager += 1;
            Outcome::LeftEager
        } else {
            self.mark_lazy(image)
        };
        self.decide(self.host.key(image), outcome)
    }

    pub fn on_inserted<I>(&mut self, nodes: I) -> usize
    where
        I: IntoIterator<Item = InsertedNode<H::Image>>,
    {
        let mut routed = 0;
        for node in nodes {
            for image in node.into_images() {
                self.process(&image);
                routed += 1;
            }
        }
        routed
    }

    /// Asks for a polling recheck. Returns true when the caller has to queue
    /// a frame; false when one is already queued, when an observer is in
    /// use, or after disposal.
    pub fn request_recheck(&mut self) -> bool {
        if self.disposed {
            return false;
        }
        match &mut self.strategy {
            Strategy::Polling(gate) => gate.request(),
            Strategy::Observer(_) => false,
        }
    }

    /// One complete polling pass. Returns how many images were marked lazy.
    pub fn run_recheck(&mut self) -> usize {
        if self.disposed {
            return 0;
        }
        let Strategy::Polling(gate) = &mut self.strategy else {
            return 0;
        };
        gate.begin();
        self.stats.rechecks += 1;
        let mut marked = 0;
        for image in self.host.undirected_images() {
            if self.host.is_exempt(&image) || self.host.in_viewport(&image) {
                continue;
            }
            let outcome = self.mark_lazy(&image);
            if outcome == Outcome::MarkedLazy {
                marked += 1;
            }
            self.decide(self.host.key(&image), outcome);
        }
        marked
    }

    /// Writes `loading="lazy"` unless a directive is already present. Write
    /// failures are reported to the host and leave the image eager.
    pub fn mark_lazy(&mut self, image: &H::Image) -> Outcome {
        if self.host.has_directive(image) {
            self.stats.skipped += 1;
            return Outcome::Skipped(SkipReason::Directed);
        }
        match self.host.set_lazy(image) {
            Ok(()) => {
                self.stats.marked_lazy += 1;
                Outcome::MarkedLazy
            }
            Err(err) => {
                self.host.report_failure(image, &err);
                self.stats.failed += 1;
                Outcome::Failed
            }
        }
    }

    /// Drops every subscription. Pending images stay untouched and load
    /// eagerly.
    pub fn dispose(&mut self) {
        if self.disposed {
            return;
        }
        self.disposed = true;
        match &mut self.strategy {
            Strategy::Observer(observer) => observer.disconnect(),
            Strategy::Polling(gate) => gate.cancel(),
        }
        self.pending.clear();
    }

    fn decide(&mut self, key: H::Key, outcome: Outcome) -> Outcome {
        if outcome.is_terminal() {
            self.decided.insert(key);
        }
        outcome
    }

    fn forget_pending(&mut self, image: &H::Image) -> bool {
        if !self.pending.remove(&self.host.key(image)) {
            return false;
        }
        if let Strategy::Observer(observer) = &self.strategy {
            observer.unobserve(image);
        }
        true
    }
}
