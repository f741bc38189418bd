//! Sheet state management
//!
//! Pure state machine for the bottom sheet: open/closed, current snap and the
//! in-progress drag session. Commands mutate the state and return effects the
//! controller executes against the host surfaces.

use super::drag::DragSession;
use super::snap::SnapPosition;
use super::{DISMISS_THRESHOLD_RATIO, DISMISS_VELOCITY, VELOCITY_BIAS};

/// Current state of one bottom sheet instance
#[derive(Clone, Debug)]
pub struct SheetState {
    /// Viewport height in the pointer coordinate space
    pub viewport_height: f32,

    /// Active snap; `None` means the sheet is closed
    pub current_snap: Option<SnapPosition>,

    /// In-progress drag, if any
    pub drag: Option<DragSession>,

    /// Offset last pushed toward the panel surface. Seeds the next drag the
    /// way the reference implementation reads the computed transform.
    visual_offset: f32,
}

impl SheetState {
    #[must_use]
    pub fn new(viewport_height: f32) -> Self {
        Self {
            viewport_height,
            current_snap: None,
            drag: None,
            visual_offset: viewport_height,
        }
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.current_snap.is_some()
    }

    /// Offset the sheet currently displays (or is about to display).
    #[must_use]
    pub fn visual_offset(&self) -> f32 {
        self.visual_offset
    }

    /// Apply a command and return resulting effects
    #[must_use]
    pub fn apply(&mut self, cmd: Command) -> Vec<Effect> {
        match cmd {
            Command::Open(snap) => {
                let mut effects = self.snap_effects(snap.unwrap_or(SnapPosition::Half));
                effects.push(Effect::RequestLoad);
                effects
            }

            Command::ApplySnap(snap) => self.snap_effects(snap),

            Command::Close => self.close_effects(),

            Command::DragStart { y } => {
                // A fresh session always replaces a stale one.
                self.drag = Some(DragSession::begin(y, self.visual_offset));
                vec![Effect::SetDragging(true)]
            }

            Command::DragMove { y } => {
                let Some(drag) = self.drag.as_mut() else {
                    return vec![];
                };
                let next = drag.advance(y, self.viewport_height);
                self.visual_offset = next;
                vec![Effect::ScheduleTransform(next)]
            }

            Command::DragEnd => {
                let Some(session) = self.drag.take() else {
                    return vec![];
                };

                let offset = session.current_offset;
                let vh = self.viewport_height;

                if offset > vh * DISMISS_THRESHOLD_RATIO || session.velocity > DISMISS_VELOCITY {
                    return self.close_effects();
                }

                let biased = offset + session.velocity * VELOCITY_BIAS;
                self.snap_effects(SnapPosition::nearest(biased, vh))
            }

            Command::SetViewportHeight(height) => {
                self.viewport_height = height;
                if let Some(snap) = self.current_snap {
                    self.visual_offset = snap.resting_offset(height);
                }
                vec![]
            }
        }
    }

    fn snap_effects(&mut self, snap: SnapPosition) -> Vec<Effect> {
        self.current_snap = Some(snap);
        self.visual_offset = snap.resting_offset(self.viewport_height);
        vec![
            Effect::CancelPendingTransform,
            Effect::SetDragging(false),
            Effect::SetSnapClass(Some(snap)),
            Effect::ClearTransform,
            Effect::SetIndicators(Some(snap)),
            Effect::SetBackdrop(true),
        ]
    }

    fn close_effects(&mut self) -> Vec<Effect> {
        self.current_snap = None;
        self.drag = None;
        self.visual_offset = self.viewport_height;
        vec![
            Effect::CancelPendingTransform,
            Effect::SetDragging(false),
            Effect::SetSnapClass(None),
            Effect::ClearTransform,
            Effect::SetIndicators(None),
            Effect::SetBackdrop(false),
        ]
    }
}

/// Commands fed by the input adapter
#[derive(Clone, Copy, Debug)]
pub enum Command {
    /// Open at the given snap (default Half) and request the document load
    Open(Option<SnapPosition>),
    /// Close from any state; always succeeds
    Close,
    /// Move to a snap position directly
    ApplySnap(SnapPosition),
    /// Pointer down at the given Y
    DragStart { y: f32 },
    /// Pointer moved to the given Y
    DragMove { y: f32 },
    /// Pointer released or cancelled
    DragEnd,
    /// Viewport geometry changed
    SetViewportHeight(f32),
}

/// Effects produced by state changes, executed against host surfaces
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    /// Set or clear the snap-position class on the panel surface
    SetSnapClass(Option<SnapPosition>),
    /// Toggle the dragging visual state
    SetDragging(bool),
    /// Toggle backdrop visibility
    SetBackdrop(bool),
    /// Mark the active snap on the indicator set
    SetIndicators(Option<SnapPosition>),
    /// Remove the inline transform, returning control to the resting position
    ClearTransform,
    /// Coalesce a transform for the next rendering frame
    ScheduleTransform(f32),
    /// Drop any transform still pending from a previous frame
    CancelPendingTransform,
    /// Kick off the document load (the loader gates re-entry itself)
    RequestLoad,
}

#[cfg(test)]
mod tests {
    use super::*;

    const VH: f32 = 900.0;

    fn open_state(snap: SnapPosition) -> SheetState {
        let mut state = SheetState::new(VH);
        let _ = state.apply(Command::Open(Some(snap)));
        state
    }

    #[test]
    fn open_defaults_to_half_and_requests_load() {
        let mut state = SheetState::new(VH);
        let effects = state.apply(Command::Open(None));

        assert!(state.is_open());
        assert_eq!(state.current_snap, Some(SnapPosition::Half));
        assert_eq!(effects.last(), Some(&Effect::RequestLoad));
        assert!(effects.contains(&Effect::SetSnapClass(Some(SnapPosition::Half))));
        assert!(effects.contains(&Effect::SetBackdrop(true)));
    }

    #[test]
    fn open_at_each_snap_rests_at_canonical_offset() {
        for (snap, expected) in [
            (SnapPosition::Peek, VH * 2.0 / 3.0),
            (SnapPosition::Half, VH / 3.0),
            (SnapPosition::Full, 0.0),
        ] {
            let state = open_state(snap);
            assert!(state.is_open());
            assert!((state.visual_offset() - expected).abs() < 0.001);
        }
    }

    #[test]
    fn reopen_at_same_snap_reapplies_without_error() {
        let mut state = open_state(SnapPosition::Half);
        let effects = state.apply(Command::Open(Some(SnapPosition::Half)));
        assert!(effects.contains(&Effect::SetSnapClass(Some(SnapPosition::Half))));
        assert_eq!(state.current_snap, Some(SnapPosition::Half));
    }

    #[test]
    fn close_from_any_state_clears_snap_and_drag() {
        let mut state = open_state(SnapPosition::Full);
        let _ = state.apply(Command::DragStart { y: 10.0 });
        let effects = state.apply(Command::Close);

        assert!(!state.is_open());
        assert!(state.drag.is_none());
        assert!(effects.contains(&Effect::SetBackdrop(false)));
        assert!(effects.contains(&Effect::CancelPendingTransform));

        // Closing a closed sheet is a no-op error-wise: same effects, no panic.
        let effects = state.apply(Command::Close);
        assert!(effects.contains(&Effect::SetSnapClass(None)));
    }

    #[test]
    fn drag_move_without_session_is_ignored() {
        let mut state = open_state(SnapPosition::Half);
        assert!(state.apply(Command::DragMove { y: 50.0 }).is_empty());
        assert!(state.apply(Command::DragEnd).is_empty());
    }

    #[test]
    fn drag_move_schedules_coalesced_transform() {
        let mut state = open_state(SnapPosition::Half);
        let _ = state.apply(Command::DragStart { y: 100.0 });
        let effects = state.apply(Command::DragMove { y: 180.0 });

        let expected = VH / 3.0 + 80.0;
        assert_eq!(effects, vec![Effect::ScheduleTransform(expected)]);
        assert!((state.visual_offset() - expected).abs() < 0.001);
    }

    #[test]
    fn drag_above_full_is_rubber_banded() {
        let mut state = open_state(SnapPosition::Full);
        let _ = state.apply(Command::DragStart { y: 500.0 });
        // Raw candidate -100 must surface as -25.
        let effects = state.apply(Command::DragMove { y: 400.0 });
        assert_eq!(effects, vec![Effect::ScheduleTransform(-25.0)]);
    }

    #[test]
    fn drag_below_viewport_clamps_to_margin() {
        let mut state = open_state(SnapPosition::Peek);
        let _ = state.apply(Command::DragStart { y: 0.0 });
        // Raw candidate far past the bottom clamps to vh + 60.
        let effects = state.apply(Command::DragMove { y: 2000.0 });
        assert_eq!(effects, vec![Effect::ScheduleTransform(VH + 60.0)]);
    }

    #[test]
    fn release_past_dismiss_threshold_closes() {
        let mut state = open_state(SnapPosition::Peek);
        let _ = state.apply(Command::DragStart { y: 0.0 });
        // Land at 0.85 * vh with no trailing velocity.
        let _ = state.apply(Command::DragMove { y: VH * 0.85 - VH * 2.0 / 3.0 });
        let _ = state.apply(Command::DragMove {
            y: VH * 0.85 - VH * 2.0 / 3.0,
        });
        let effects = state.apply(Command::DragEnd);

        assert!(!state.is_open());
        assert!(effects.contains(&Effect::SetBackdrop(false)));
    }

    #[test]
    fn release_with_fast_flick_closes_at_mid_height() {
        let mut state = open_state(SnapPosition::Half);
        let _ = state.apply(Command::DragStart { y: 100.0 });
        // Walk to 0.5 * vh, then a final 25 px/frame flick downward.
        let target = VH * 0.5;
        let reach = 100.0 + (target - VH / 3.0) - 25.0;
        let _ = state.apply(Command::DragMove { y: reach });
        let _ = state.apply(Command::DragMove { y: reach + 25.0 });

        let session = state.drag.expect("drag session active");
        assert!((session.velocity - 25.0).abs() < 0.001);
        assert!((session.current_offset - target).abs() < 0.001);

        let effects = state.apply(Command::DragEnd);
        assert!(!state.is_open());
        assert!(effects.contains(&Effect::SetSnapClass(None)));
    }

    #[test]
    fn release_midway_between_snaps_ties_to_earlier_snap() {
        let mut state = open_state(SnapPosition::Full);
        let _ = state.apply(Command::DragStart { y: 0.0 });
        // Exactly between Full (0) and Half (300), zero trailing velocity.
        let _ = state.apply(Command::DragMove { y: 150.0 });
        let _ = state.apply(Command::DragMove { y: 150.0 });
        let _ = state.apply(Command::DragEnd);

        assert_eq!(state.current_snap, Some(SnapPosition::Half));
    }

    #[test]
    fn release_velocity_biases_snap_selection() {
        let mut state = open_state(SnapPosition::Full);
        let _ = state.apply(Command::DragStart { y: 0.0 });
        // Offset 100 alone is nearest Full, but 100 + 17 * 6 = 202 is nearest Half.
        let _ = state.apply(Command::DragMove { y: 83.0 });
        let _ = state.apply(Command::DragMove { y: 100.0 });
        let _ = state.apply(Command::DragEnd);

        assert_eq!(state.current_snap, Some(SnapPosition::Half));
    }

    #[test]
    fn new_drag_session_overwrites_stale_one() {
        let mut state = open_state(SnapPosition::Half);
        let _ = state.apply(Command::DragStart { y: 100.0 });
        let _ = state.apply(Command::DragMove { y: 150.0 });
        let _ = state.apply(Command::DragStart { y: 400.0 });

        let session = state.drag.expect("drag session active");
        assert!((session.start_y - 400.0).abs() < f32::EPSILON);
        assert!((session.velocity - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn viewport_resize_refreshes_resting_offset() {
        let mut state = open_state(SnapPosition::Half);
        let _ = state.apply(Command::SetViewportHeight(600.0));
        assert!((state.visual_offset() - 200.0).abs() < 0.001);
    }
}
