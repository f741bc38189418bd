//! Loader strategies exercised through the controller

use std::time::Duration;

use pdfsheet::loader::{
    HostSignal, LoadPhase, LoaderConfig, NavigableFrame, ScrollableFrame,
};
use pdfsheet::sheet::SheetController;
use pdfsheet::test_utils::{RecordingSurfaces, StubFrameHost, StubScrollHost};

const VH: f32 = 900.0;
const URL: &str = "https://example.org/sample.pdf";

#[test]
fn frame_strategy_full_lifecycle() {
    let host = StubFrameHost::new();
    let loader = NavigableFrame::new(
        LoaderConfig::new(URL).with_timeout(Duration::from_secs(3600)),
        Box::new(host.clone()),
    );
    let signals = loader.signal_sender();

    let surfaces = RecordingSurfaces::new();
    let mut controller = SheetController::new(surfaces.refs(), Box::new(loader), VH);

    controller.open(None);
    let _ = controller.tick();
    assert!(surfaces.snapshot().loading_visible);
    assert_eq!(host.mounted(), vec![URL.to_string()]);

    signals.send(HostSignal::Loaded).unwrap();
    let _ = controller.tick();
    assert!(!surfaces.snapshot().loading_visible);
    assert_eq!(controller.load_phase(), LoadPhase::Loaded);

    // Last-page navigation replaces the frame with the fragment target.
    controller.go_to_last_page();
    assert_eq!(
        host.mounted().last().map(String::as_str),
        Some("https://example.org/sample.pdf#page=9999")
    );
}

#[test]
fn frame_timeout_latches_against_late_success() {
    let host = StubFrameHost::new();
    let loader = NavigableFrame::new(
        LoaderConfig::new(URL).with_timeout(Duration::ZERO),
        Box::new(host),
    );
    let signals = loader.signal_sender();

    let surfaces = RecordingSurfaces::new();
    let mut controller = SheetController::new(surfaces.refs(), Box::new(loader), VH);

    controller.open(None);
    let _ = controller.tick();

    let log = surfaces.snapshot();
    assert!(!log.loading_visible);
    assert!(log.error_visible);
    assert_eq!(controller.load_phase(), LoadPhase::TimedOut);

    // The success signal arrives too late; the indicator must not revert.
    signals.send(HostSignal::Loaded).unwrap();
    let _ = controller.tick();

    let log = surfaces.snapshot();
    assert!(log.error_visible);
    assert_eq!(controller.load_phase(), LoadPhase::TimedOut);
}

#[test]
fn scroll_strategy_scrolls_to_max_extent() {
    let host = StubScrollHost::with_extent(4200);
    let loader = ScrollableFrame::new(
        LoaderConfig::new("file:///books/sample.pdf").with_timeout(Duration::from_secs(3600)),
        Box::new(host.clone()),
    );
    let signals = loader.signal_sender();

    let surfaces = RecordingSurfaces::new();
    let mut controller = SheetController::new(surfaces.refs(), Box::new(loader), VH);

    controller.open(None);
    signals.send(HostSignal::Loaded).unwrap();
    let _ = controller.tick();

    controller.go_to_last_page();
    assert_eq!(host.scrolled_to(), vec![4200]);
}

#[cfg(feature = "pdf")]
mod paged {
    use super::*;
    use pdfsheet::loader::paged::PaginatedRender;
    use pdfsheet::test_utils::StubPageHost;
    use std::path::PathBuf;

    #[test]
    fn missing_document_surfaces_the_error_banner() {
        let host = StubPageHost::new(640.0, 1.0);
        let loader = PaginatedRender::with_config(
            PathBuf::from("/nonexistent/missing.pdf"),
            Box::new(host.clone()),
            1,
            8,
        );

        let surfaces = RecordingSurfaces::new();
        let mut controller = SheetController::new(surfaces.refs(), Box::new(loader), VH);

        controller.open(None);
        let _ = controller.tick();

        let log = surfaces.snapshot();
        assert!(!log.loading_visible);
        assert!(log.error_visible);
        assert_eq!(controller.load_phase(), LoadPhase::Error);
        assert!(host.reserved().is_none());

        // The panel itself stays fully operable.
        assert!(controller.is_open());
        controller.close();
        assert!(!controller.is_open());
    }
}
