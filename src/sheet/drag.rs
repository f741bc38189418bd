//! Ephemeral drag-session bookkeeping and drag physics

use super::{OVERDRAG_MARGIN, RUBBER_BAND_STRENGTH};

/// State of one pointer drag, created on pointer-down and dropped on
/// pointer-up/cancel. A new session always overwrites a stale one: in the
/// pointer event model an up always precedes the next down.
#[derive(Clone, Copy, Debug)]
pub struct DragSession {
    /// Pointer Y at drag start
    pub start_y: f32,
    /// Sheet offset at drag start
    pub start_offset: f32,
    /// Pointer Y of the previous move event
    pub last_y: f32,
    /// Delta Y of the most recent move event
    pub velocity: f32,
    /// Last computed (resisted + clamped) sheet offset
    pub current_offset: f32,
}

impl DragSession {
    #[must_use]
    pub fn begin(y: f32, start_offset: f32) -> Self {
        Self {
            start_y: y,
            start_offset,
            last_y: y,
            velocity: 0.0,
            current_offset: start_offset,
        }
    }

    /// Advance the session with a new pointer position and return the offset
    /// to display. Offsets above FULL are resisted at quarter strength; the
    /// sheet cannot travel more than [`OVERDRAG_MARGIN`] below the viewport.
    pub fn advance(&mut self, y: f32, viewport_height: f32) -> f32 {
        self.velocity = y - self.last_y;
        self.last_y = y;

        let mut next = self.start_offset + (y - self.start_y);
        if next < 0.0 {
            next *= RUBBER_BAND_STRENGTH;
        }
        next = next.min(viewport_height + OVERDRAG_MARGIN);

        self.current_offset = next;
        next
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advance_tracks_pointer_delta() {
        let mut drag = DragSession::begin(100.0, 300.0);
        let offset = drag.advance(140.0, 900.0);
        assert!((offset - 340.0).abs() < f32::EPSILON);
        assert!((drag.velocity - 40.0).abs() < f32::EPSILON);
    }

    #[test]
    fn velocity_is_per_event_delta_not_cumulative() {
        let mut drag = DragSession::begin(100.0, 300.0);
        drag.advance(150.0, 900.0);
        drag.advance(160.0, 900.0);
        assert!((drag.velocity - 10.0).abs() < f32::EPSILON);
    }

    #[test]
    fn negative_offsets_are_rubber_banded() {
        let mut drag = DragSession::begin(500.0, 0.0);
        // Raw candidate is -100; quarter strength yields -25.
        let offset = drag.advance(400.0, 900.0);
        assert!((offset - (-25.0)).abs() < f32::EPSILON);
    }

    #[test]
    fn offsets_clamp_to_overdrag_margin() {
        let mut drag = DragSession::begin(0.0, 900.0);
        // Raw candidate is viewport + 500; clamp to viewport + 60.
        let offset = drag.advance(500.0, 900.0);
        assert!((offset - 960.0).abs() < f32::EPSILON);
    }
}
