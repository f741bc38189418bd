//! Sheet controller - executes state-machine effects against host surfaces
//!
//! One instance per mounted panel. Owns the sheet state, the coalesced
//! transform slot and the document loader; the input adapter calls in with
//! pointer and click events and drives `on_frame`/`tick` from its event loop.

use log::{debug, warn};

use crate::loader::{DocumentLoader, LoadPhase, LoaderEvent};
use crate::surfaces::SheetRefs;

use super::coalesce::TransformSlot;
use super::snap::SnapPosition;
use super::state::{Command, Effect, SheetState};

pub struct SheetController {
    state: SheetState,
    refs: SheetRefs,
    loader: Box<dyn DocumentLoader>,
    pending_transform: TransformSlot,
}

impl SheetController {
    #[must_use]
    pub fn new(refs: SheetRefs, loader: Box<dyn DocumentLoader>, viewport_height: f32) -> Self {
        Self {
            state: SheetState::new(viewport_height),
            refs,
            loader,
            pending_transform: TransformSlot::new(),
        }
    }

    /// Open at `snap` (default Half). First open kicks off the document load;
    /// the loader's own gate makes that at-most-once per panel lifetime.
    pub fn open(&mut self, snap: Option<SnapPosition>) {
        self.dispatch(Command::Open(snap));
    }

    /// Close from any state. Never fails; an in-flight document load keeps
    /// running in the background so reopening does not reload.
    pub fn close(&mut self) {
        self.dispatch(Command::Close);
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.state.is_open()
    }

    pub fn apply_snap(&mut self, snap: SnapPosition) {
        self.dispatch(Command::ApplySnap(snap));
    }

    pub fn on_drag_start(&mut self, y: f32) {
        self.dispatch(Command::DragStart { y });
    }

    pub fn on_drag_move(&mut self, y: f32) {
        self.dispatch(Command::DragMove { y });
    }

    pub fn on_drag_end(&mut self) {
        self.dispatch(Command::DragEnd);
    }

    pub fn set_viewport_height(&mut self, height: f32) {
        self.dispatch(Command::SetViewportHeight(height));
    }

    /// Navigate the document to its last page. No-op until loaded.
    pub fn go_to_last_page(&mut self) {
        self.loader.go_to_last_page();
    }

    #[must_use]
    pub fn load_phase(&self) -> LoadPhase {
        self.loader.phase()
    }

    #[must_use]
    pub fn state(&self) -> &SheetState {
        &self.state
    }

    /// Rendering-frame tick: apply at most one coalesced transform.
    pub fn on_frame(&mut self) {
        if let Some(offset) = self.pending_transform.take() {
            self.refs.panel.set_transform(Some(offset));
        }
    }

    /// Event-loop tick: drain loader signals and mirror them onto the
    /// loading/error indicators. Returns the drained events for hosts that
    /// want to react beyond indicator visibility.
    pub fn tick(&mut self) -> Vec<LoaderEvent> {
        let events = self.loader.poll_events();
        for event in &events {
            match event {
                LoaderEvent::LoadingStarted => {
                    self.refs.status.set_loading(true);
                    self.refs.status.set_error(false);
                }
                LoaderEvent::Loaded => {
                    self.refs.status.set_loading(false);
                }
                LoaderEvent::TimedOut => {
                    warn!("document load timed out");
                    self.refs.status.set_loading(false);
                    self.refs.status.set_error(true);
                }
                LoaderEvent::Failed(fault) => {
                    warn!("document load failed: {fault}");
                    self.refs.status.set_loading(false);
                    self.refs.status.set_error(true);
                }
                LoaderEvent::PageReady { page } => {
                    debug!("page {page} ready");
                }
            }
        }
        events
    }

    fn dispatch(&mut self, cmd: Command) {
        let effects = self.state.apply(cmd);
        self.execute(effects);
    }

    fn execute(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SetSnapClass(snap) => self.refs.panel.set_snap_class(snap),
                Effect::SetDragging(dragging) => self.refs.panel.set_dragging(dragging),
                Effect::SetBackdrop(visible) => self.refs.backdrop.set_visible(visible),
                Effect::SetIndicators(snap) => self.refs.indicators.set_active(snap),
                Effect::ClearTransform => self.refs.panel.set_transform(None),
                Effect::ScheduleTransform(offset) => self.pending_transform.schedule(offset),
                Effect::CancelPendingTransform => self.pending_transform.cancel(),
                Effect::RequestLoad => self.loader.load(),
            }
        }
    }
}
