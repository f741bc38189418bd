// Export modules for use in tests
pub mod event_source;
pub mod loader;
pub mod panic_handler;
pub mod settings;
pub mod sheet;
pub mod surfaces;

#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

// Re-export the panel entry points
pub use loader::{DocumentLoader, LoadPhase, LoaderConfig, LoaderEvent};
pub use sheet::{SheetController, SnapPosition};
pub use surfaces::SheetRefs;
