//! Test doubles for surfaces, content hosts and loaders
//!
//! Every double records mutations behind an `Arc<Mutex<..>>` handle so a test
//! can hand a boxed clone to the controller or loader and still inspect what
//! happened afterwards.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::loader::{DocumentLoader, LoadPhase, LoaderEvent};
use crate::sheet::SnapPosition;
use crate::surfaces::{
    BackdropSurface, FrameHost, PanelSurface, ScrollHost, SheetRefs, SnapIndicators,
    StatusIndicators,
};

#[cfg(feature = "pdf")]
use crate::loader::paged::PageData;
#[cfg(feature = "pdf")]
use crate::surfaces::PageHost;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

/// Everything the recording surfaces observed
#[derive(Clone, Debug, Default)]
pub struct SurfaceLog {
    pub snap_class: Option<SnapPosition>,
    pub dragging: bool,
    pub backdrop_visible: bool,
    pub indicator: Option<SnapPosition>,
    pub transform: Option<f32>,
    pub transforms_applied: Vec<f32>,
    pub loading_visible: bool,
    pub error_visible: bool,
}

/// Recording implementation of all four sheet surfaces. Hand [`Self::refs`]
/// to the controller, keep the handle, assert on [`Self::snapshot`].
#[derive(Clone, Default)]
pub struct RecordingSurfaces {
    log: Arc<Mutex<SurfaceLog>>,
}

impl RecordingSurfaces {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn refs(&self) -> SheetRefs {
        SheetRefs {
            panel: Box::new(PanelProbe {
                log: self.log.clone(),
            }),
            backdrop: Box::new(BackdropProbe {
                log: self.log.clone(),
            }),
            indicators: Box::new(IndicatorProbe {
                log: self.log.clone(),
            }),
            status: Box::new(StatusProbe {
                log: self.log.clone(),
            }),
        }
    }

    #[must_use]
    pub fn snapshot(&self) -> SurfaceLog {
        lock(&self.log).clone()
    }
}

struct PanelProbe {
    log: Arc<Mutex<SurfaceLog>>,
}

impl PanelSurface for PanelProbe {
    fn set_snap_class(&mut self, snap: Option<SnapPosition>) {
        lock(&self.log).snap_class = snap;
    }

    fn set_dragging(&mut self, dragging: bool) {
        lock(&self.log).dragging = dragging;
    }

    fn set_transform(&mut self, offset: Option<f32>) {
        let mut log = lock(&self.log);
        if let Some(offset) = offset {
            log.transforms_applied.push(offset);
        }
        log.transform = offset;
    }
}

struct BackdropProbe {
    log: Arc<Mutex<SurfaceLog>>,
}

impl BackdropSurface for BackdropProbe {
    fn set_visible(&mut self, visible: bool) {
        lock(&self.log).backdrop_visible = visible;
    }
}

struct IndicatorProbe {
    log: Arc<Mutex<SurfaceLog>>,
}

impl SnapIndicators for IndicatorProbe {
    fn set_active(&mut self, snap: Option<SnapPosition>) {
        lock(&self.log).indicator = snap;
    }
}

struct StatusProbe {
    log: Arc<Mutex<SurfaceLog>>,
}

impl StatusIndicators for StatusProbe {
    fn set_loading(&mut self, visible: bool) {
        lock(&self.log).loading_visible = visible;
    }

    fn set_error(&mut self, visible: bool) {
        lock(&self.log).error_visible = visible;
    }
}

/// Frame host recording every mount address
#[derive(Clone, Default)]
pub struct StubFrameHost {
    mounted: Arc<Mutex<Vec<String>>>,
}

impl StubFrameHost {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn mounted(&self) -> Vec<String> {
        lock(&self.mounted).clone()
    }
}

impl FrameHost for StubFrameHost {
    fn replace_frame(&mut self, src: &str) {
        lock(&self.mounted).push(src.to_string());
    }
}

/// Scroll host with a fixed extent, recording opens and scrolls
#[derive(Clone)]
pub struct StubScrollHost {
    extent: u32,
    opened: Arc<Mutex<Vec<String>>>,
    scrolled: Arc<Mutex<Vec<u32>>>,
}

impl StubScrollHost {
    #[must_use]
    pub fn with_extent(extent: u32) -> Self {
        Self {
            extent,
            opened: Arc::default(),
            scrolled: Arc::default(),
        }
    }

    #[must_use]
    pub fn opened(&self) -> Vec<String> {
        lock(&self.opened).clone()
    }

    #[must_use]
    pub fn scrolled_to(&self) -> Vec<u32> {
        lock(&self.scrolled).clone()
    }
}

impl ScrollHost for StubScrollHost {
    fn open_document(&mut self, src: &str) {
        lock(&self.opened).push(src.to_string());
    }

    fn max_scroll_extent(&self) -> u32 {
        self.extent
    }

    fn scroll_to(&mut self, offset: u32) {
        lock(&self.scrolled).push(offset);
    }
}

/// Page host recording reservations and placements
#[cfg(feature = "pdf")]
#[derive(Clone)]
pub struct StubPageHost {
    container_width: f32,
    ratio: f32,
    reserved: Arc<Mutex<Option<usize>>>,
    placed: Arc<Mutex<Vec<usize>>>,
    viewed: Arc<Mutex<Vec<usize>>>,
}

#[cfg(feature = "pdf")]
impl StubPageHost {
    #[must_use]
    pub fn new(container_width: f32, ratio: f32) -> Self {
        Self {
            container_width,
            ratio,
            reserved: Arc::default(),
            placed: Arc::default(),
            viewed: Arc::default(),
        }
    }

    #[must_use]
    pub fn reserved(&self) -> Option<usize> {
        *lock(&self.reserved)
    }

    #[must_use]
    pub fn placed(&self) -> Vec<usize> {
        lock(&self.placed).clone()
    }

    #[must_use]
    pub fn viewed(&self) -> Vec<usize> {
        lock(&self.viewed).clone()
    }
}

#[cfg(feature = "pdf")]
impl PageHost for StubPageHost {
    fn reserve_pages(&mut self, count: usize) {
        *lock(&self.reserved) = Some(count);
    }

    fn place_page(&mut self, page: usize, _data: Arc<PageData>) {
        lock(&self.placed).push(page);
    }

    fn scroll_page_into_view(&mut self, page: usize) {
        lock(&self.viewed).push(page);
    }

    fn container_width_px(&self) -> f32 {
        self.container_width
    }

    fn pixel_ratio(&self) -> f32 {
        self.ratio
    }
}

#[derive(Debug)]
struct ScriptedLoaderState {
    load_calls: usize,
    last_page_calls: usize,
    phase: LoadPhase,
    queued: Vec<LoaderEvent>,
}

impl Default for ScriptedLoaderState {
    fn default() -> Self {
        Self {
            load_calls: 0,
            last_page_calls: 0,
            phase: LoadPhase::NotLoaded,
            queued: Vec::new(),
        }
    }
}

/// Loader double for controller tests: counts calls, emits queued events.
#[derive(Clone, Default)]
pub struct ScriptedLoader {
    state: Arc<Mutex<ScriptedLoaderState>>,
}

impl ScriptedLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn load_calls(&self) -> usize {
        lock(&self.state).load_calls
    }

    #[must_use]
    pub fn last_page_calls(&self) -> usize {
        lock(&self.state).last_page_calls
    }

    pub fn set_phase(&self, phase: LoadPhase) {
        lock(&self.state).phase = phase;
    }

    /// Queue an event for the next `poll_events` drain.
    pub fn queue_event(&self, event: LoaderEvent) {
        lock(&self.state).queued.push(event);
    }
}

impl DocumentLoader for ScriptedLoader {
    fn load(&mut self) {
        let mut state = lock(&self.state);
        state.load_calls += 1;
        if state.phase == LoadPhase::NotLoaded {
            state.phase = LoadPhase::Loading;
            state.queued.push(LoaderEvent::LoadingStarted);
        }
    }

    fn go_to_last_page(&mut self) {
        let mut state = lock(&self.state);
        if state.phase == LoadPhase::Loaded {
            state.last_page_calls += 1;
        }
    }

    fn phase(&self) -> LoadPhase {
        lock(&self.state).phase
    }

    fn poll_events(&mut self) -> Vec<LoaderEvent> {
        std::mem::take(&mut lock(&self.state).queued)
    }
}
