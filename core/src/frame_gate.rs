/// Collapses bursts of trigger events into one queued task.
///
/// `request` returns true only for the first call since the last `begin`,
/// which is when the caller should actually queue a frame.
#[derive(Clone, Debug, Default)]
pub struct FrameGate {
    scheduled: bool,
}

impl FrameGate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn request(&mut self) -> bool {
        if self.scheduled {
            return false;
        }
        self.scheduled = true;
        true
    }

    /// Called when the queued frame runs. Returns whether a frame was queued.
    pub fn begin(&mut self) -> bool {
        std::mem::replace(&mut self.scheduled, false)
    }

    pub fn cancel(&mut self) {
        self.scheduled = false;
    }

    pub fn is_scheduled(&self) -> bool {
        self.scheduled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn burst_collapses_to_one_request() {
        let mut gate = FrameGate::new();
        assert!(gate.request());
        assert!(!gate.request());
        assert!(!gate.request());
        assert!(gate.is_scheduled());
    }

    #[test]
    fn begin_reopens_the_gate() {
        let mut gate = FrameGate::new();
        assert!(gate.request());
        assert!(gate.begin());
        assert!(!gate.is_scheduled());
        assert!(gate.request());
    }

    #[test]
    fn begin_without_request_reports_nothing_queued() {
        let mut gate = FrameGate::new();
        assert!(!gate.begin());
    }

    #[test]
    fn cancel_drops_pending_request() {
        let mut gate = FrameGate::new();
        gate.request();
        gate.cancel();
        assert!(!gate.is_scheduled());
        assert!(gate.request());
    }
}
