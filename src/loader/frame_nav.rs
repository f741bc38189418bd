//! Navigable-frame loader strategy
//!
//! The document is displayed by an embedded viewer the host owns. Loading and
//! last-page navigation both go through full frame replacement: the host tears
//! the viewer down and mounts a fresh one at the target address, so a page
//! fragment is re-read on every navigation. The host reports completion of its
//! surface over a signal channel; the strategy drains it on the event-loop
//! tick alongside the timeout guard.

use flume::{Receiver, Sender};
use log::debug;

use crate::surfaces::FrameHost;

use super::timeout::TimeoutGuard;
use super::{
    DocumentLoader, HostSignal, LAST_PAGE_FRAGMENT, LoadFault, LoadPhase, LoaderConfig, LoaderEvent,
};

pub struct NavigableFrame {
    config: LoaderConfig,
    host: Box<dyn FrameHost>,
    phase: LoadPhase,
    timeout: TimeoutGuard,
    pending: Vec<LoaderEvent>,
    signal_tx: Sender<HostSignal>,
    signal_rx: Receiver<HostSignal>,
}

impl NavigableFrame {
    #[must_use]
    pub fn new(config: LoaderConfig, host: Box<dyn FrameHost>) -> Self {
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

    /// Sender the host uses to report frame load completion or failure.
    #[must_use]
    pub fn signal_sender(&self) -> Sender<HostSignal> {
        self.signal_tx.clone()
    }
}

impl DocumentLoader for NavigableFrame {
    fn load(&mut self) {
        if self.phase != LoadPhase::NotLoaded {
            return;
        }
        self.phase = LoadPhase::Loading;
        self.pending.push(LoaderEvent::LoadingStarted);
        self.timeout.arm(self.config.timeout);
        self.host.replace_frame(&self.config.source);
    }

    fn go_to_last_page(&mut self) {
        if self.phase != LoadPhase::Loaded {
            return;
        }
        // No spinner: the resource is already cached, the swap is instant.
        let target = format!("{}#page={}", self.config.source, LAST_PAGE_FRAGMENT);
        self.host.replace_frame(&target);
    }

    fn phase(&self) -> LoadPhase {
        self.phase
    }

    fn poll_events(&mut self) -> Vec<LoaderEvent> {
        let mut events = std::mem::take(&mut self.pending);

        while let Ok(signal) = self.signal_rx.try_recv() {
            if self.phase != LoadPhase::Loading {
                debug!("frame signal after terminal phase ignored: {signal:?}");
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
