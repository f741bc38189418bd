//! Document loading infrastructure
//!
//! Exactly one loader strategy is active per deployment. All strategies share
//! the same contract: an at-most-once `load`, last-page navigation, a phase
//! query and an event drain polled from the host event loop.

mod frame_nav;
#[cfg(feature = "probe")]
mod probe;
mod scroll_view;
mod timeout;

#[cfg(feature = "pdf")]
pub mod paged;

pub use frame_nav::NavigableFrame;
#[cfg(feature = "probe")]
pub use probe::NetworkProbe;
pub use scroll_view::ScrollableFrame;
pub use timeout::TimeoutGuard;

use std::time::Duration;

/// Page fragment used for last-page navigation; intentionally out of range,
/// the viewer clamps it to the final page.
pub const LAST_PAGE_FRAGMENT: usize = 9999;

/// Load lifecycle of the target document. Transitions are one-directional;
/// `Error` and `TimedOut` are terminal for the attempt (no auto-retry).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadPhase {
    NotLoaded,
    Loading,
    Loaded,
    Error,
    TimedOut,
}

impl LoadPhase {
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Loaded | Self::Error | Self::TimedOut)
    }
}

/// Faults a load attempt can surface
#[derive(Debug, thiserror::Error)]
pub enum LoadFault {
    #[error("fetch: {detail}")]
    Fetch { detail: String },

    #[error("render: {detail}")]
    Render { detail: String },
}

impl LoadFault {
    pub fn fetch(detail: impl Into<String>) -> Self {
        Self::Fetch {
            detail: detail.into(),
        }
    }

    pub fn render(detail: impl Into<String>) -> Self {
        Self::Render {
            detail: detail.into(),
        }
    }
}

/// Signals drained by the controller on each event-loop tick
#[derive(Debug)]
pub enum LoaderEvent {
    /// First load began
    LoadingStarted,
    /// Document is ready for display
    Loaded,
    /// Fetch or decode failed
    Failed(LoadFault),
    /// Deadline passed with neither success nor failure
    TimedOut,
    /// One page of a paginated render finished
    PageReady { page: usize },
}

/// Completion signals a content host reports back about its surface
#[derive(Clone, Debug)]
pub enum HostSignal {
    Loaded,
    Failed { detail: String },
}

/// Deployment-fixed loader configuration
#[derive(Clone, Debug)]
pub struct LoaderConfig {
    /// Document source address (URL or filesystem path, per strategy)
    pub source: String,

    /// Deadline for the timeout guard. Ignored by the paginated-render
    /// strategy, which reports per-page progress instead.
    pub timeout: Duration,
}

impl LoaderConfig {
    /// Reference-deployment deadline
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

    #[must_use]
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Common contract across loader strategies
pub trait DocumentLoader {
    /// Begin the load. At-most-once: every call after the first is a no-op,
    /// whatever the outcome of the first.
    fn load(&mut self);

    /// Strategy-dependent navigation to the final page. No-op until loaded.
    fn go_to_last_page(&mut self);

    fn phase(&self) -> LoadPhase;

    /// Drain pending signals. Called from the host event loop; never blocks.
    fn poll_events(&mut self) -> Vec<LoaderEvent>;

    fn is_loaded(&self) -> bool {
        self.phase() == LoadPhase::Loaded
    }
}
