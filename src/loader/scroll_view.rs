//! Scrollable-frame loader strategy
//!
//! The document loads into a scrollable container the host owns; last-page
//! navigation scrolls the container to its maximum extent instead of
//! re-navigating the content.

use flume::{Receiver, Sender};
use log::debug;

use crate::surfaces::ScrollHost;

use super::timeout::TimeoutGuard;
use super::{DocumentLoader, HostSignal, LoadFault, LoadPhase, LoaderConfig, LoaderEvent};

pub struct ScrollableFrame {
    config: LoaderConfig,
    host: Box<dyn ScrollHost>,
    phase: LoadPhase,
    timeout: TimeoutGuard,
    pending: Vec<LoaderEvent>,
    signal_tx: Sender<HostSignal>,
    signal_rx: Receiver<HostSignal>,
}

impl ScrollableFrame {
    #[must_use]
    pub fn new(config: LoaderConfig, host: Box<dyn ScrollHost>) -> Self {
        let (signal_tx, signal_rx) = flume::unbounded();
        Self {
            config,
            host,
            phase: LoadPhase::NotLoaded,
            timeout: TimeoutGuard::new(),
            pending: Vec::new(),
            signal_tx,
            signal_rx,
        }
    }

    /// Sender the host uses to report container load completion or failure.
    #[must_use]
    pub fn signal_sender(&self) -> Sender<HostSignal> {
        self.signal_tx.clone()
    }
}

impl DocumentLoader for ScrollableFrame {
    fn load(&mut self) {
        if self.phase != LoadPhase::NotLoaded {
            return;
        }
        self.phase = LoadPhase::Loading;
        self.pending.push(LoaderEvent::LoadingStarted);
        self.timeout.arm(self.config.timeout);
        self.host.open_document(&self.config.source);
    }

    fn go_to_last_page(&mut self) {
        if self.phase != LoadPhase::Loaded {
            return;
        }
        let extent = self.host.max_scroll_extent();
        self.host.scroll_to(extent);
    }

    fn phase(&self) -> LoadPhase {
        self.phase
    }

    fn poll_events(&mut self) -> Vec<LoaderEvent> {
        let mut events = std::mem::take(&mut self.pending);

        while let Ok(signal) = self.signal_rx.try_recv() {
            if self.phase != LoadPhase::Loading {
                debug!("scroll host signal after terminal phase ignored: {signal:?}");
                continue;
            }
            match signal {
                HostSignal::Loaded => {
                    self.timeout.disarm();
                    self.phase = LoadPhase::Loaded;
                    events.push(LoaderEvent::Loaded);
                }
                HostSignal::Failed { detail } => {
                    self.phase = LoadPhase::Error;
                    events.push(LoaderEvent::Failed(LoadFault::fetch(detail)));
                }
            }
        }

        if self.phase == LoadPhase::Loading && self.timeout.poll() {
            self.phase = LoadPhase::TimedOut;
            events.push(LoaderEvent::TimedOut);
        }

        events
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;
    use crate::test_utils::StubScrollHost;

    #[test]
    fn last_page_scrolls_to_max_extent() {
        let host = StubScrollHost::with_extent(4200);
        let mut loader = ScrollableFrame::new(
            LoaderConfig::new("file:///books/sample.pdf").with_timeout(Duration::from_secs(3600)),
            Box::new(host.clone()),
        );

        loader.go_to_last_page();
        assert!(host.scrolled_to().is_empty());

        loader.load();
        loader.signal_sender().send(HostSignal::Loaded).unwrap();
        let _ = loader.poll_events();

        loader.go_to_last_page();
        assert_eq!(host.scrolled_to(), vec![4200]);
        assert_eq!(host.opened(), vec!["file:///books/sample.pdf"]);
    }

    #[test]
    fn timeout_fires_when_host_stays_silent() {
        let host = StubScrollHost::with_extent(100);
        let mut loader = ScrollableFrame::new(
            LoaderConfig::new("file:///books/sample.pdf").with_timeout(Duration::ZERO),
            Box::new(host),
        );
        loader.load();

        let events = loader.poll_events();
        assert!(matches!(
            events.as_slice(),
            [LoaderEvent::LoadingStarted, LoaderEvent::TimedOut]
        ));
        assert_eq!(loader.phase(), LoadPhase::TimedOut);
    }
}
