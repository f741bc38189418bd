//! Paginated PDF render loader strategy
//!
//! Pages are rasterized by background workers and placed into placeholder
//! surfaces the host reserved up front, so visual order never depends on
//! render completion order.

mod cache;
mod ledger;
mod request;
mod service;
mod types;
mod worker;

pub use cache::{CacheKey, PageCache};
pub use ledger::{LedgerOutcome, PageLedger};
pub use request::{RenderParams, RenderRequest, RenderResponse, RequestId, WorkerFault};
pub use service::PaginatedRender;
pub use types::{ImageData, PageData};

/// Default number of render worker threads
pub const DEFAULT_WORKERS: usize = 2;

/// Default rendered-page cache capacity
pub const DEFAULT_CACHE_SIZE: usize = 64;

/// Device pixel density is honored only up to this factor
pub const MAX_PIXEL_RATIO: f32 = 2.0;

/// Shared scale factor for every page of the document: fit the first page's
/// intrinsic width to the container, sharpened by the device pixel ratio
/// (capped at [`MAX_PIXEL_RATIO`]).
#[must_use]
pub fn shared_scale(intrinsic_width_px: f32, container_width_px: f32, pixel_ratio: f32) -> f32 {
    let usable = |v: f32| v.is_finite() && v > 0.0;
    if !usable(intrinsic_width_px) || !usable(container_width_px) {
        return 1.0;
    }
    let fit = container_width_px / intrinsic_width_px;
    let density = if pixel_ratio.is_finite() {
        pixel_ratio.clamp(1.0, MAX_PIXEL_RATIO)
    } else {
        1.0
    };
    fit * density
}
