//! PDF render worker - runs in separate thread(s)

use std::path::Path;
use std::sync::{Arc, Mutex};

use flume::{Receiver, Sender};
use mupdf::{Colorspace, Document, Matrix, Pixmap};
use rayon::prelude::*;

use super::cache::{CacheKey, PageCache};
use super::request::{RenderParams, RenderRequest, RenderResponse, RequestId, WorkerFault};
use super::types::{ImageData, PageData};

/// Main worker function - runs in a dedicated thread
#[expect(
    clippy::needless_pass_by_value,
    reason = "Values moved into thread, need ownership"
)]
pub(crate) fn render_worker(
    doc_path: &Path,
    requests: Receiver<RenderRequest>,
    responses: Sender<RenderResponse>,
    cache: Arc<Mutex<PageCache>>,
) {
    let doc = match Document::open(doc_path.to_string_lossy().as_ref()) {
        Ok(d) => d,
        Err(e) => {
            // Without a document every page request fails the same way; the
            // service aggregates these into the document-level outcome.
            let detail = format!("open {}: {e}", doc_path.display());
            for request in requests {
                match request {
                    RenderRequest::Page { id, page, .. } => {
                        let _ = responses.send(RenderResponse::Error {
                            id,
                            page,
                            error: WorkerFault::generic(detail.clone()),
                        });
                    }
                    RenderRequest::Shutdown => break,
                }
            }
            return;
        }
    };

    for request in requests {
        match request {
            RenderRequest::Page { id, page, params } => {
                handle_page_request(&doc, id, page, &params, &cache, &responses);
            }

            RenderRequest::Shutdown => break,
        }
    }
}

fn handle_page_request(
    doc: &Document,
    id: RequestId,
    page_num: usize,
    params: &RenderParams,
    cache: &Arc<Mutex<PageCache>>,
    responses: &Sender<RenderResponse>,
) {
    let key = CacheKey::from_params(page_num, params);

    let cached = cache
        .lock()
        .unwrap_or_else(std::sync::PoisonError::into_inner)
        .get(&key);
    if let Some(cached) = cached {
        let _ = responses.send(RenderResponse::Page {
            id,
            page: page_num,
            data: Arc::clone(&cached),
        });
        return;
    }

    match render_page(doc, page_num, params) {
        Ok(data) => {
            let cached = cache
                .lock()
                .unwrap_or_else(std::sync::PoisonError::into_inner)
                .insert(key, data);
            let _ = responses.send(RenderResponse::Page {
                id,
                page: page_num,
                data: Arc::clone(&cached),
            });
        }
        Err(e) => {
            let _ = responses.send(RenderResponse::Error {
                id,
                page: page_num,
                error: e,
            });
        }
    }
}

/// Render a single page at the document's shared scale
fn render_page(
    doc: &Document,
    page_num: usize,
    params: &RenderParams,
) -> Result<PageData, WorkerFault> {
    let page = doc.load_page(page_num as i32)?;
    let bounds = page.bounds()?;
    let page_height = bounds.y1 - bounds.y0;

    let transform = Matrix::new_scale(params.scale, params.scale);
    let rgb = Colorspace::device_rgb();
    let pixmap = page.to_pixmap(&transform, &rgb, false, false)?;

    let pixels = pixmap_to_rgb(&pixmap)?;

    Ok(PageData {
        img_data: ImageData {
            pixels,
            width_px: pixmap.width(),
            height_px: pixmap.height(),
        },
        page_num,
        scale_factor: params.scale,
        page_height_px: page_height * params.scale,
    })
}

fn pixmap_to_rgb(pixmap: &Pixmap) -> Result<Vec<u8>, WorkerFault> {
    let n = pixmap.n() as usize;
    if n < 3 {
        return Err(WorkerFault::generic(format!(
            "Unsupported pixmap format: {n} channels"
        )));
    }

    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    if width == 0 || height == 0 {
        return Ok(Vec::new());
    }
    let stride = pixmap.stride() as usize;
    let samples = pixmap.samples();
    let row_bytes = width * n;
    let expected_min = stride.saturating_mul(height);
    if samples.len() < expected_min || row_bytes > stride {
        return Err(WorkerFault::generic("Pixmap buffer size mismatch"));
    }

    let mut out = vec![0u8; width * height * 3];
    out.par_chunks_mut(width * 3)
        .enumerate()
        .for_each(|(y, dst)| {
            let row = &samples[y * stride..y * stride + row_bytes];
            if n == 3 {
                dst.copy_from_slice(row);
            } else {
                for (dst_px, src_px) in dst.chunks_exact_mut(3).zip(row.chunks_exact(n)) {
                    dst_px.copy_from_slice(&src_px[..3]);
                }
            }
        });

    Ok(out)
}
