//! Host surface bindings
//!
//! The core never queries a display tree. Externally-owned visual elements are
//! bound in at construction as trait objects; effects and loader signals are
//! executed against them. Hosts decide what "class", "transform" and
//! "visibility" mean for their rendering technology.

use crate::sheet::SnapPosition;

#[cfg(feature = "pdf")]
use std::sync::Arc;

#[cfg(feature = "pdf")]
use crate::loader::paged::PageData;

/// The sheet panel itself
pub trait PanelSurface {
    /// Apply the resting-position class for `snap`, or clear it when `None`.
    fn set_snap_class(&mut self, snap: Option<SnapPosition>);

    /// Toggle the while-dragging visual state.
    fn set_dragging(&mut self, dragging: bool);

    /// Set an inline vertical offset override, or `None` to fall back to the
    /// class-driven resting position.
    fn set_transform(&mut self, offset: Option<f32>);
}

/// Dimming backdrop behind the sheet
pub trait BackdropSurface {
    fn set_visible(&mut self, visible: bool);
}

/// The row of snap-position markers on the sheet handle
pub trait SnapIndicators {
    fn set_active(&mut self, snap: Option<SnapPosition>);
}

/// Loading spinner and error banner
pub trait StatusIndicators {
    fn set_loading(&mut self, visible: bool);
    fn set_error(&mut self, visible: bool);
}

/// Externally-owned surfaces bound to one sheet instance
pub struct SheetRefs {
    pub panel: Box<dyn PanelSurface>,
    pub backdrop: Box<dyn BackdropSurface>,
    pub indicators: Box<dyn SnapIndicators>,
    pub status: Box<dyn StatusIndicators>,
}

/// Content host for the frame-navigation strategies.
///
/// `replace_frame` must tear the current embedded viewer down and mount a
/// fresh one at `src` — re-pointing an existing viewer does not reliably
/// re-read a page fragment, so partial updates are rejected by contract.
pub trait FrameHost {
    fn replace_frame(&mut self, src: &str);
}

/// Content host for the scrollable-frame strategy
pub trait ScrollHost {
    /// Load the document into the owned container.
    fn open_document(&mut self, src: &str);

    /// Maximum scroll offset of the container contents.
    fn max_scroll_extent(&self) -> u32;

    fn scroll_to(&mut self, offset: u32);
}

/// Content host for the paginated-render strategy
#[cfg(feature = "pdf")]
pub trait PageHost {
    /// Reserve one placeholder surface per page, in ascending page order.
    /// Called once, before any page has rendered.
    fn reserve_pages(&mut self, count: usize);

    /// Fill the placeholder for `page` with rendered output.
    fn place_page(&mut self, page: usize, data: Arc<PageData>);

    /// Bring the placeholder for `page` into view.
    fn scroll_page_into_view(&mut self, page: usize);

    /// Width available for page content, in px.
    fn container_width_px(&self) -> f32;

    /// Device pixel density of the output surface.
    fn pixel_ratio(&self) -> f32;
}
