//! Network-probe loader strategy
//!
//! A background worker fetches the target resource before anything is shown:
//! success both warms the transport cache and proves the address reachable,
//! after which the frame surface is mounted at the target. Navigation then
//! behaves like the navigable-frame strategy. The probe runs on its own
//! thread; closing the panel never cancels it.

use flume::Receiver;
use log::{debug, info};

use crate::surfaces::FrameHost;

use super::timeout::TimeoutGuard;
use super::{
    DocumentLoader, LAST_PAGE_FRAGMENT, LoadFault, LoadPhase, LoaderConfig, LoaderEvent,
};

pub struct NetworkProbe {
    config: LoaderConfig,
    host: Box<dyn FrameHost>,
    phase: LoadPhase,
    timeout: TimeoutGuard,
    pending: Vec<LoaderEvent>,
    result_rx: Option<Receiver<Result<(), LoadFault>>>,
}

impl NetworkProbe {
    #[must_use]
    pub fn new(config: LoaderConfig, host: Box<dyn FrameHost>) -> Self {
        Self {
            config,
            host,
            phase: LoadPhase::NotLoaded,
            timeout: TimeoutGuard::new(),
            pending: Vec::new(),
            result_rx: None,
        }
    }
}

fn probe_url(url: &str) -> Result<(), LoadFault> {
    let response = reqwest::blocking::get(url).map_err(|e| LoadFault::fetch(e.to_string()))?;
    let status = response.status();
    if !status.is_success() {
        return Err(LoadFault::fetch(format!("status {status}")));
    }
    // Pull the body so the transfer actually happens and ends up cached.
    let bytes = response
        .bytes()
        .map_err(|e| LoadFault::fetch(e.to_string()))?;
    info!("probe fetched {} bytes from {url}", bytes.len());
    Ok(())
}

impl DocumentLoader for NetworkProbe {
    fn load(&mut self) {
        if self.phase != LoadPhase::NotLoaded {
            return;
        }
        self.phase = LoadPhase::Loading;
        self.pending.push(LoaderEvent::LoadingStarted);
        self.timeout.arm(self.config.timeout);

        let (tx, rx) = flume::bounded(1);
        self.result_rx = Some(rx);
        let url = self.config.source.clone();
        std::thread::spawn(move || {
            let _ = tx.send(probe_url(&url));
        });
    }

    fn go_to_last_page(&mut self) {
        if self.phase != LoadPhase::Loaded {
            return;
        }
        let target = format!("{}#page={}", self.config.source, LAST_PAGE_FRAGMENT);
        self.host.replace_frame(&target);
    }

    fn phase(&self) -> LoadPhase {
        self.phase
    }

    fn poll_events(&mut self) -> Vec<LoaderEvent> {
        let mut events = std::mem::take(&mut self.pending);

        if let Some(rx) = &self.result_rx {
            while let Ok(result) = rx.try_recv() {
                if self.phase != LoadPhase::Loading {
                    debug!("probe result after terminal phase ignored");
                    continue;
                }
                match result {
                    Ok(()) => {
                        self.timeout.disarm();
                        self.phase = LoadPhase::Loaded;
                        self.host.replace_frame(&self.config.source);
                        events.push(LoaderEvent::Loaded);
                    }
                    Err(fault) => {
                        self.phase = LoadPhase::Error;
                        events.push(LoaderEvent::Failed(fault));
                    }
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
    use crate::test_utils::StubFrameHost;

    // The probe hits the real resolver, so whether the zero deadline or the
    // DNS failure lands first is a race; both end in a terminal failure.

    #[test]
    fn failed_probe_never_mounts_the_frame() {
        let host = StubFrameHost::new();
        let mut loader = NetworkProbe::new(
            LoaderConfig::new("https://example.invalid/doc.pdf").with_timeout(Duration::ZERO),
            Box::new(host.clone()),
        );
        loader.load();

        let events = loader.poll_events();
        assert!(matches!(events.first(), Some(LoaderEvent::LoadingStarted)));
        assert!(loader.phase().is_terminal());
        assert_ne!(loader.phase(), LoadPhase::Loaded);

        assert!(host.mounted().is_empty());
        loader.go_to_last_page();
        assert!(host.mounted().is_empty());
    }

    #[test]
    fn load_after_terminal_phase_is_a_noop() {
        let host = StubFrameHost::new();
        let mut loader = NetworkProbe::new(
            LoaderConfig::new("https://example.invalid/doc.pdf").with_timeout(Duration::ZERO),
            Box::new(host),
        );
        loader.load();
        let _ = loader.poll_events();
        let settled = loader.phase();
        assert!(settled.is_terminal());

        loader.load();
        assert_eq!(loader.phase(), settled);

        // A probe result landing after the deadline is suppressed for good.
        std::thread::sleep(Duration::from_millis(50));
        let _ = loader.poll_events();
        assert_eq!(loader.phase(), settled);
    }
}
