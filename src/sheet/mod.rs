//! Bottom-sheet snap infrastructure

mod coalesce;
mod controller;
mod drag;
mod snap;
mod state;

pub use coalesce::TransformSlot;
pub use controller::SheetController;
pub use drag::DragSession;
pub use snap::SnapPosition;
pub use state::{Command, Effect, SheetState};

/// Fraction of viewport height beyond which a released drag dismisses the sheet
pub const DISMISS_THRESHOLD_RATIO: f32 = 0.80;

/// Downward velocity (px per move event) that dismisses the sheet regardless of height
pub const DISMISS_VELOCITY: f32 = 18.0;

/// Multiplier projecting the trailing velocity onto the release offset when
/// choosing the nearest snap
pub const VELOCITY_BIAS: f32 = 6.0;

/// Resistance applied when the sheet is dragged above the FULL position
pub const RUBBER_BAND_STRENGTH: f32 = 0.25;

/// How far below the viewport bottom the sheet may be dragged, in px
pub const OVERDRAG_MARGIN: f32 = 60.0;
