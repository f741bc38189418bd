//! Frame-coalesced visual transform updates
//!
//! Drag move events arrive faster than the display refreshes. Rather than
//! queueing one visual update per event, the sheet keeps a single pending
//! offset with latest-wins semantics: scheduling replaces any pending value,
//! and the host drains the slot at most once per rendering frame.

/// Single-slot holder for the next sheet transform.
#[derive(Clone, Copy, Debug, Default)]
pub struct TransformSlot {
    pending: Option<f32>,
}

impl TransformSlot {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule an offset for the next frame, superseding any pending one.
    pub fn schedule(&mut self, offset: f32) {
        self.pending = Some(offset);
    }

    /// Drop the pending offset without applying it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Take the pending offset for this frame, leaving the slot empty.
    #[must_use]
    pub fn take(&mut self) -> Option<f32> {
        self.pending.take()
    }

    #[must_use]
    pub fn is_scheduled(&self) -> bool {
        self.pending.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latest_scheduled_value_wins() {
        let mut slot = TransformSlot::new();
        slot.schedule(10.0);
        slot.schedule(20.0);
        slot.schedule(30.0);
        assert_eq!(slot.take(), Some(30.0));
        assert_eq!(slot.take(), None);
    }

    #[test]
    fn cancel_drops_pending_value() {
        let mut slot = TransformSlot::new();
        slot.schedule(10.0);
        slot.cancel();
        assert!(!slot.is_scheduled());
        assert_eq!(slot.take(), None);
    }
}
