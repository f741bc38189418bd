//! Render request and response types

use std::sync::Arc;

use super::types::PageData;

/// Unique identifier for render requests
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl RequestId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }
}

/// Parameters for rendering a page
#[derive(Clone, Debug)]
pub struct RenderParams {
    /// Shared scale factor for the whole document
    pub scale: f32,
}

/// Request sent to render workers
#[derive(Debug)]
pub enum RenderRequest {
    /// Render a page
    Page {
        id: RequestId,
        page: usize,
        params: RenderParams,
    },

    /// Shutdown the worker
    Shutdown,
}

/// Errors from render workers
#[derive(Debug, thiserror::Error)]
pub enum WorkerFault {
    #[error("PDF engine: {0}")]
    Pdf(#[from] mupdf::error::Error),

    #[error("{detail}")]
    Generic { detail: String },
}

impl WorkerFault {
    pub fn generic(msg: impl Into<String>) -> Self {
        Self::Generic { detail: msg.into() }
    }
}

/// Response from render workers
#[derive(Debug)]
pub enum RenderResponse {
    /// Rendered page data
    Page {
        id: RequestId,
        page: usize,
        data: Arc<PageData>,
    },

    /// Error while rendering a page
    Error {
        id: RequestId,
        page: usize,
        error: WorkerFault,
    },
}
