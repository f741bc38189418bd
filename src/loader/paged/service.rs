//! Paginated render service - manages the worker pool and page placement

use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use log::{debug, warn};
use mupdf::Document;

use crate::loader::{DocumentLoader, LoadFault, LoadPhase, LoaderEvent};
use crate::surfaces::PageHost;

use super::cache::PageCache;
use super::ledger::{LedgerOutcome, PageLedger};
use super::request::{RenderParams, RenderRequest, RenderResponse, RequestId};
use super::worker::render_worker;
use super::{DEFAULT_CACHE_SIZE, DEFAULT_WORKERS, shared_scale};

/// Document facts gathered before any page renders
#[derive(Clone, Debug)]
struct DocumentOverview {
    page_count: usize,
    first_page_width: f32,
}

/// Loader strategy that rasterizes every page of a local PDF.
///
/// Page 1 renders alone first and its paint completes the load; the remaining
/// pages are then all enqueued at once, one render task per page, and settle
/// in whatever order the workers finish.
pub struct PaginatedRender {
    doc_path: PathBuf,
    host: Box<dyn PageHost>,
    phase: LoadPhase,
    pending: Vec<LoaderEvent>,
    ledger: Option<PageLedger>,
    params: Option<RenderParams>,
    request_tx: Sender<RenderRequest>,
    response_rx: Receiver<RenderResponse>,
    next_request_id: u64,
    num_workers: usize,
    rest_enqueued: bool,
}

impl PaginatedRender {
    /// Create a render loader with default worker/cache configuration
    #[must_use]
    pub fn new(doc_path: PathBuf, host: Box<dyn PageHost>) -> Self {
        Self::with_config(doc_path, host, DEFAULT_WORKERS, DEFAULT_CACHE_SIZE)
    }

    /// Create a render loader with custom configuration
    #[must_use]
    pub fn with_config(
        doc_path: PathBuf,
        host: Box<dyn PageHost>,
        num_workers: usize,
        cache_size: usize,
    ) -> Self {
        let cache = Arc::new(Mutex::new(PageCache::new(cache_size)));

        // Flume gives us MPMC channels: multiple workers pull page requests
        // from one shared queue, which std/tokio mpsc receivers cannot do.
        let (request_tx, request_rx) = flume::unbounded();
        let (response_tx, response_rx) = flume::unbounded();

        for _ in 0..num_workers.max(1) {
            let path = doc_path.clone();
            let rx = request_rx.clone();
            let tx = response_tx.clone();
            let cache_clone = cache.clone();

            std::thread::spawn(move || {
                render_worker(&path, rx, tx, cache_clone);
            });
        }

        Self {
            doc_path,
            host,
            phase: LoadPhase::NotLoaded,
            pending: Vec::new(),
            ledger: None,
            params: None,
            request_tx,
            response_rx,
            next_request_id: 1,
            num_workers: num_workers.max(1),
            rest_enqueued: false,
        }
    }

    fn document_overview(doc_path: &Path) -> Result<DocumentOverview, LoadFault> {
        let doc = Document::open(doc_path.to_string_lossy().as_ref())
            .map_err(|e| LoadFault::fetch(e.to_string()))?;
        let page_count = doc
            .page_count()
            .map_err(|e| LoadFault::fetch(e.to_string()))? as usize;
        if page_count == 0 {
            return Err(LoadFault::render("document has no pages"));
        }

        let first = doc
            .load_page(0)
            .and_then(|page| page.bounds())
            .map_err(|e| LoadFault::render(e.to_string()))?;

        Ok(DocumentOverview {
            page_count,
            first_page_width: first.x1 - first.x0,
        })
    }

    fn request_page(&mut self, page: usize) {
        let Some(params) = self.params.clone() else {
            return;
        };
        let id = self.next_id();
        let _ = self
            .request_tx
            .send(RenderRequest::Page { id, page, params });
    }

    /// Enqueue every page after the first, once the first has settled.
    fn enqueue_remaining(&mut self) {
        if self.rest_enqueued {
            return;
        }
        self.rest_enqueued = true;
        let count = self.ledger.as_ref().map_or(0, PageLedger::page_count);
        for page in 1..count {
            self.request_page(page);
        }
    }

    /// Pages placed so far (rendered successfully)
    #[must_use]
    pub fn rendered_count(&self) -> usize {
        self.ledger.as_ref().map_or(0, PageLedger::rendered_count)
    }

    /// Total pages of the loaded document, once discovered
    #[must_use]
    pub fn page_count(&self) -> Option<usize> {
        self.ledger.as_ref().map(PageLedger::page_count)
    }

    /// Shutdown all workers
    pub fn shutdown(&self) {
        for _ in 0..self.num_workers {
            let _ = self.request_tx.send(RenderRequest::Shutdown);
        }
    }

    fn next_id(&mut self) -> RequestId {
        let id = RequestId::new(self.next_request_id);
        self.next_request_id += 1;
        id
    }
}

impl DocumentLoader for PaginatedRender {
    fn load(&mut self) {
        if self.phase != LoadPhase::NotLoaded {
            return;
        }
        self.pending.push(LoaderEvent::LoadingStarted);

        match Self::document_overview(&self.doc_path) {
            Ok(overview) => {
                self.phase = LoadPhase::Loading;
                let scale = shared_scale(
                    overview.first_page_width,
                    self.host.container_width_px(),
                    self.host.pixel_ratio(),
                );
                debug!(
                    "loading {} pages at scale {scale:.3}",
                    overview.page_count
                );

                self.host.reserve_pages(overview.page_count);
                self.ledger = Some(PageLedger::new(overview.page_count));
                self.params = Some(RenderParams { scale });
                self.request_page(0);
            }
            Err(fault) => {
                self.phase = LoadPhase::Error;
                self.pending.push(LoaderEvent::Failed(fault));
            }
        }
    }

    fn go_to_last_page(&mut self) {
        if self.phase != LoadPhase::Loaded {
            return;
        }
        if let Some(target) = self.ledger.as_ref().and_then(PageLedger::last_target) {
            self.host.scroll_page_into_view(target);
        }
    }

    fn phase(&self) -> LoadPhase {
        self.phase
    }

    fn poll_events(&mut self) -> Vec<LoaderEvent> {
        let mut events = std::mem::take(&mut self.pending);

        while let Ok(response) = self.response_rx.try_recv() {
            match response {
                RenderResponse::Page { page, data, .. } => {
                    self.host.place_page(page, Arc::clone(&data));
                    events.push(LoaderEvent::PageReady { page });

                    if let Some(ledger) = self.ledger.as_mut() {
                        match ledger.record_success(page) {
                            LedgerOutcome::FirstPaint => {
                                self.phase = LoadPhase::Loaded;
                                events.push(LoaderEvent::Loaded);
                            }
                            LedgerOutcome::Complete => {
                                debug!("all {} pages rendered", ledger.page_count());
                            }
                            LedgerOutcome::Progress | LedgerOutcome::AllFailed => {}
                        }
                    }
                    self.enqueue_remaining();
                }

                RenderResponse::Error { page, error, .. } => {
                    warn!("page {page} render failed: {error}");

                    if let Some(ledger) = self.ledger.as_mut() {
                        if ledger.record_failure(page) == LedgerOutcome::AllFailed {
                            self.phase = LoadPhase::Error;
                            events.push(LoaderEvent::Failed(LoadFault::render(
                                "no page rendered successfully",
                            )));
                        }
                    }
                    self.enqueue_remaining();
                }
            }
        }

        events
    }
}

impl Drop for PaginatedRender {
    fn drop(&mut self) {
        self.shutdown();
    }
}
