//! Snap positions and their resting offsets

use serde::{Deserialize, Serialize};

/// Discrete resting heights of the sheet. The closed sheet is represented as
/// the absence of a snap (`Option<SnapPosition>::None`), never as a variant.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SnapPosition {
    /// Sheet peeks over the bottom third of the viewport
    Peek,
    /// Sheet covers the lower two thirds
    Half,
    /// Sheet covers the whole viewport
    Full,
}

impl SnapPosition {
    /// All snaps in tie-break order: when two snaps are equally near a release
    /// offset, the earlier entry wins.
    pub const ALL: [SnapPosition; 3] = [Self::Peek, Self::Half, Self::Full];

    /// Vertical offset of the sheet's top edge at this snap, in the same
    /// coordinate space as pointer Y (0 = viewport top).
    #[must_use]
    pub fn resting_offset(self, viewport_height: f32) -> f32 {
        match self {
            Self::Peek => viewport_height * 2.0 / 3.0,
            Self::Half => viewport_height / 3.0,
            Self::Full => 0.0,
        }
    }

    /// The snap whose resting offset is nearest to `offset`. Ties resolve to
    /// the earliest entry of [`Self::ALL`].
    #[must_use]
    pub fn nearest(offset: f32, viewport_height: f32) -> Self {
        let mut nearest = Self::ALL[0];
        let mut min_dist = f32::INFINITY;
        for snap in Self::ALL {
            let dist = (offset - snap.resting_offset(viewport_height)).abs();
            if dist < min_dist {
                min_dist = dist;
                nearest = snap;
            }
        }
        nearest
    }

    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Peek => "peek",
            Self::Half => "half",
            Self::Full => "full",
        }
    }
}

impl std::str::FromStr for SnapPosition {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "peek" => Ok(Self::Peek),
            "half" => Ok(Self::Half),
            "full" => Ok(Self::Full),
            other => Err(format!("unknown snap position: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resting_offsets_are_viewport_fractions() {
        let vh = 900.0;
        assert!((SnapPosition::Peek.resting_offset(vh) - 600.0).abs() < f32::EPSILON);
        assert!((SnapPosition::Half.resting_offset(vh) - 300.0).abs() < f32::EPSILON);
        assert!((SnapPosition::Full.resting_offset(vh) - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn nearest_picks_closest_snap() {
        let vh = 900.0;
        assert_eq!(SnapPosition::nearest(580.0, vh), SnapPosition::Peek);
        assert_eq!(SnapPosition::nearest(290.0, vh), SnapPosition::Half);
        assert_eq!(SnapPosition::nearest(40.0, vh), SnapPosition::Full);
    }

    #[test]
    fn nearest_tie_resolves_in_declaration_order() {
        let vh = 900.0;
        // Exactly between Half (300) and Full (0).
        assert_eq!(SnapPosition::nearest(150.0, vh), SnapPosition::Half);
        // Exactly between Peek (600) and Half (300).
        assert_eq!(SnapPosition::nearest(450.0, vh), SnapPosition::Peek);
    }

    #[test]
    fn snap_names_round_trip() {
        for snap in SnapPosition::ALL {
            assert_eq!(snap.as_str().parse::<SnapPosition>(), Ok(snap));
        }
        assert!("closed".parse::<SnapPosition>().is_err());
    }
}
