//! Terminal demo for the bottom-sheet PDF viewer
//!
//! Owns the screen and the raw input stream: decides which cells belong to
//! the sheet, maps pointer and key events onto controller calls, and renders
//! whatever the surface bindings recorded. All sheet behavior lives in the
//! library; this binary is deliberately just wiring.

use std::fs::File;
use std::io::stdout;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::{Duration, Instant};

use anyhow::Result;
use clap::Parser;
use crossterm::event::{
    DisableMouseCapture, EnableMouseCapture, Event, KeyCode, MouseButton, MouseEvent,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use log::info;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use simplelog::{Config, LevelFilter, WriteLogger};

use pdfsheet::event_source::{EventSource, TerminalEventSource};
use pdfsheet::loader::{
    DocumentLoader, HostSignal, LoaderConfig, NavigableFrame, ScrollableFrame,
};
use pdfsheet::panic_handler;
use pdfsheet::settings::{Settings, StrategyKind};
use pdfsheet::sheet::{SheetController, SnapPosition};
use pdfsheet::surfaces::{
    BackdropSurface, FrameHost, PanelSurface, ScrollHost, SheetRefs, SnapIndicators,
    StatusIndicators,
};

const LOG_FILE: &str = "pdfsheet.log";

/// Assumed cell width in px for container-width math
const CELL_WIDTH_PX: f32 = 8.0;

/// Simulated scroll extent of the scrollable container
const SCROLL_EXTENT: u32 = 4000;

#[derive(Parser)]
#[command(name = "pdfsheet", about = "Draggable bottom-sheet PDF viewer demo")]
struct Args {
    /// Document source (URL, or local path for the paged strategy)
    document: Option<String>,

    /// Loader strategy: frame, scroll, probe or paged
    #[arg(short, long)]
    strategy: Option<String>,

    /// Settings file (YAML)
    #[arg(short, long)]
    config: Option<PathBuf>,
}

/// Everything the surfaces and content hosts mutate; the draw loop reads it
/// and records hit-test geometry back.
#[derive(Debug, Default)]
struct ViewModel {
    snap: Option<SnapPosition>,
    dragging: bool,
    backdrop: bool,
    indicator: Option<SnapPosition>,
    transform: Option<f32>,
    loading: bool,
    error: bool,

    mounted: Option<String>,
    scroll_offset: u32,
    page_total: Option<usize>,
    pages_rendered: Vec<bool>,
    page_in_view: Option<usize>,

    // Geometry of the last drawn frame, for mouse hit-testing
    sheet_top: u16,
    handle_row: u16,
    dots_row: u16,
    dot_cols: [u16; 3],
    content_top: u16,
}

type SharedModel = Arc<Mutex<ViewModel>>;

fn lock(model: &SharedModel) -> MutexGuard<'_, ViewModel> {
    model.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
}

// ── Surface bindings ─────────────────────────────────────────────────────────

struct TermPanel(SharedModel);

impl PanelSurface for TermPanel {
    fn set_snap_class(&mut self, snap: Option<SnapPosition>) {
        lock(&self.0).snap = snap;
    }

    fn set_dragging(&mut self, dragging: bool) {
        lock(&self.0).dragging = dragging;
    }

    fn set_transform(&mut self, offset: Option<f32>) {
        lock(&self.0).transform = offset;
    }
}

struct TermBackdrop(SharedModel);

impl BackdropSurface for TermBackdrop {
    fn set_visible(&mut self, visible: bool) {
        lock(&self.0).backdrop = visible;
    }
}

struct TermIndicators(SharedModel);

impl SnapIndicators for TermIndicators {
    fn set_active(&mut self, snap: Option<SnapPosition>) {
        lock(&self.0).indicator = snap;
    }
}

struct TermStatus(SharedModel);

impl StatusIndicators for TermStatus {
    fn set_loading(&mut self, visible: bool) {
        lock(&self.0).loading = visible;
    }

    fn set_error(&mut self, visible: bool) {
        lock(&self.0).error = visible;
    }
}

// ── Content hosts ────────────────────────────────────────────────────────────

type SignalSlot = Arc<Mutex<Option<flume::Sender<HostSignal>>>>;

fn send_loaded(slot: &SignalSlot) {
    let signal = slot.lock().unwrap_or_else(std::sync::PoisonError::into_inner);
    if let Some(sender) = signal.as_ref() {
        let _ = sender.send(HostSignal::Loaded);
    }
}

/// Frame host: "mounting" a viewer in a terminal is synchronous, so the load
/// signal fires as soon as the frame is replaced.
#[derive(Clone)]
struct TermFrameHost {
    model: SharedModel,
    signal: SignalSlot,
}

impl TermFrameHost {
    fn new(model: SharedModel) -> Self {
        Self {
            model,
            signal: Arc::default(),
        }
    }

    fn attach_signal(&self, sender: flume::Sender<HostSignal>) {
        *self
            .signal
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(sender);
    }
}

impl FrameHost for TermFrameHost {
    fn replace_frame(&mut self, src: &str) {
        lock(&self.model).mounted = Some(src.to_string());
        send_loaded(&self.signal);
    }
}

#[derive(Clone)]
struct TermScrollHost {
    model: SharedModel,
    signal: SignalSlot,
}

impl TermScrollHost {
    fn new(model: SharedModel) -> Self {
        Self {
            model,
            signal: Arc::default(),
        }
    }

    fn attach_signal(&self, sender: flume::Sender<HostSignal>) {
        *self
            .signal
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = Some(sender);
    }
}

impl ScrollHost for TermScrollHost {
    fn open_document(&mut self, src: &str) {
        lock(&self.model).mounted = Some(src.to_string());
        send_loaded(&self.signal);
    }

    fn max_scroll_extent(&self) -> u32 {
        SCROLL_EXTENT
    }

    fn scroll_to(&mut self, offset: u32) {
        lock(&self.model).scroll_offset = offset;
    }
}

#[cfg(feature = "pdf")]
mod paged_host {
    use super::{SharedModel, lock};
    use log::info;
    use pdfsheet::loader::paged::PageData;
    use pdfsheet::surfaces::PageHost;
    use std::sync::Arc;

    #[derive(Clone)]
    pub struct TermPageHost {
        pub model: SharedModel,
        pub container_width_px: f32,
    }

    impl PageHost for TermPageHost {
        fn reserve_pages(&mut self, count: usize) {
            let mut model = lock(&self.model);
            model.page_total = Some(count);
            model.pages_rendered = vec![false; count];
        }

        fn place_page(&mut self, page: usize, data: Arc<PageData>) {
            let mut model = lock(&self.model);
            if let Some(slot) = model.pages_rendered.get_mut(page) {
                *slot = true;
            }
            info!(
                "placed page {page}: {}x{} px",
                data.img_data.width_px, data.img_data.height_px
            );
        }

        fn scroll_page_into_view(&mut self, page: usize) {
            lock(&self.model).page_in_view = Some(page);
        }

        fn container_width_px(&self) -> f32 {
            self.container_width_px
        }

        fn pixel_ratio(&self) -> f32 {
            1.0
        }
    }
}

// ── Setup ────────────────────────────────────────────────────────────────────

#[cfg(feature = "probe")]
fn build_probe(config: LoaderConfig, model: &SharedModel) -> Result<Box<dyn DocumentLoader>> {
    let host = TermFrameHost::new(model.clone());
    Ok(Box::new(pdfsheet::loader::NetworkProbe::new(
        config,
        Box::new(host),
    )))
}

#[cfg(not(feature = "probe"))]
fn build_probe(_config: LoaderConfig, _model: &SharedModel) -> Result<Box<dyn DocumentLoader>> {
    anyhow::bail!("probe strategy requires the `probe` feature")
}

#[cfg(feature = "pdf")]
fn build_paged(
    source: &str,
    model: &SharedModel,
    sheet_width: u16,
) -> Result<Box<dyn DocumentLoader>> {
    let host = paged_host::TermPageHost {
        model: model.clone(),
        container_width_px: f32::from(sheet_width) * CELL_WIDTH_PX,
    };
    Ok(Box::new(pdfsheet::loader::paged::PaginatedRender::new(
        PathBuf::from(source),
        Box::new(host),
    )))
}

#[cfg(not(feature = "pdf"))]
fn build_paged(
    _source: &str,
    _model: &SharedModel,
    _sheet_width: u16,
) -> Result<Box<dyn DocumentLoader>> {
    anyhow::bail!("paged strategy requires the `pdf` feature")
}

fn build_loader(
    strategy: StrategyKind,
    source: &str,
    settings: &Settings,
    model: &SharedModel,
    sheet_width: u16,
) -> Result<Box<dyn DocumentLoader>> {
    let config = LoaderConfig::new(source).with_timeout(settings.timeout());

    match strategy {
        StrategyKind::Frame => {
            let host = TermFrameHost::new(model.clone());
            let loader = NavigableFrame::new(config, Box::new(host.clone()));
            host.attach_signal(loader.signal_sender());
            Ok(Box::new(loader))
        }

        StrategyKind::Scroll => {
            let host = TermScrollHost::new(model.clone());
            let loader = ScrollableFrame::new(config, Box::new(host.clone()));
            host.attach_signal(loader.signal_sender());
            Ok(Box::new(loader))
        }

        StrategyKind::Probe => build_probe(config, model),

        StrategyKind::Paged => build_paged(source, model, sheet_width),
    }
}

fn main() -> Result<()> {
    let args = Args::parse();

    panic_handler::initialize_panic_handler();
    WriteLogger::init(
        LevelFilter::Info,
        Config::default(),
        File::create(LOG_FILE)?,
    )?;
    info!("starting pdfsheet");

    let settings = Settings::load(args.config.as_deref());
    let source = args.document.unwrap_or_else(|| settings.source.clone());
    let strategy = match args.strategy.as_deref() {
        Some(name) => name.parse().map_err(anyhow::Error::msg)?,
        None => settings.strategy,
    };
    info!("strategy {} source {source}", strategy.as_str());

    let model: SharedModel = Arc::default();
    let (cols, rows) = crossterm::terminal::size()?;
    let loader = build_loader(strategy, &source, &settings, &model, cols)?;

    let refs = SheetRefs {
        panel: Box::new(TermPanel(model.clone())),
        backdrop: Box::new(TermBackdrop(model.clone())),
        indicators: Box::new(TermIndicators(model.clone())),
        status: Box::new(TermStatus(model.clone())),
    };
    let mut controller = SheetController::new(refs, loader, f32::from(rows));

    enable_raw_mode()?;
    execute!(stdout(), EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout());
    let mut terminal = Terminal::new(backend)?;

    let mut events = TerminalEventSource;
    let res = run_app(&mut terminal, &mut events, &mut controller, &model);

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    info!("shutting down pdfsheet");
    res
}

// ── Event loop ───────────────────────────────────────────────────────────────

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    events: &mut dyn EventSource,
    controller: &mut SheetController,
    model: &SharedModel,
) -> Result<()>
where
    <B as ratatui::backend::Backend>::Error: Send + Sync + 'static,
{
    const FRAME: Duration = Duration::from_millis(16);
    let mut last_frame = Instant::now();

    loop {
        terminal.draw(|f| draw(f, model))?;

        let timeout = FRAME
            .checked_sub(last_frame.elapsed())
            .unwrap_or(Duration::ZERO);
        if events.poll(timeout)? {
            match events.read()? {
                Event::Key(key) => match key.code {
                    KeyCode::Char('q') => break,
                    KeyCode::Char('o') => controller.open(None),
                    KeyCode::Char('p') => controller.apply_snap(SnapPosition::Peek),
                    KeyCode::Char('h') => controller.apply_snap(SnapPosition::Half),
                    KeyCode::Char('f') => controller.apply_snap(SnapPosition::Full),
                    KeyCode::Char('g') | KeyCode::Char('G') => controller.go_to_last_page(),
                    KeyCode::Esc => {
                        // Escape closes only an open sheet.
                        if controller.is_open() {
                            controller.close();
                        }
                    }
                    _ => {}
                },
                Event::Mouse(mouse) => handle_mouse(controller, model, mouse),
                Event::Resize(_, rows) => controller.set_viewport_height(f32::from(rows)),
                _ => {}
            }
        }

        // One coalesced transform per rendering frame.
        if last_frame.elapsed() >= FRAME {
            controller.on_frame();
            last_frame = Instant::now();
        }

        let _ = controller.tick();
    }

    Ok(())
}

fn handle_mouse(controller: &mut SheetController, model: &SharedModel, mouse: MouseEvent) {
    let (sheet_top, handle_row, dots_row, dot_cols, content_top, scroll_offset, is_open) = {
        let m = lock(model);
        (
            m.sheet_top,
            m.handle_row,
            m.dots_row,
            m.dot_cols,
            m.content_top,
            m.scroll_offset,
            m.snap.is_some(),
        )
    };

    match mouse.kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if !is_open {
                return;
            }
            if mouse.row < sheet_top {
                // Backdrop tap closes the sheet.
                controller.close();
            } else if mouse.row == dots_row {
                if let Some(snap) = dot_hit(dot_cols, mouse.column) {
                    controller.apply_snap(snap);
                }
            } else if mouse.row == handle_row {
                // The handle always starts a drag.
                controller.on_drag_start(f32::from(mouse.row));
            } else if mouse.row >= content_top && scroll_offset == 0 {
                // Content starts a drag only when scrolled to the top.
                controller.on_drag_start(f32::from(mouse.row));
            }
        }

        MouseEventKind::Drag(MouseButton::Left) => {
            controller.on_drag_move(f32::from(mouse.row));
        }

        MouseEventKind::Up(MouseButton::Left) => {
            controller.on_drag_end();
        }

        MouseEventKind::ScrollDown if mouse.row >= content_top => {
            lock(model).scroll_offset = scroll_offset.saturating_add(3);
        }

        MouseEventKind::ScrollUp if mouse.row >= content_top => {
            lock(model).scroll_offset = scroll_offset.saturating_sub(3);
        }

        _ => {}
    }
}

/// Which snap dot, if any, sits at the given column of the dots row
fn dot_hit(dot_cols: [u16; 3], column: u16) -> Option<SnapPosition> {
    SnapPosition::ALL
        .iter()
        .zip(dot_cols)
        .find(|&(_, col)| column >= col && column <= col + 1)
        .map(|(&snap, _)| snap)
}

// ── Rendering ────────────────────────────────────────────────────────────────

fn draw(f: &mut ratatui::Frame, model: &SharedModel) {
    let area = f.area();
    let mut m = lock(model);

    let host_page = Paragraph::new(vec![
        Line::from(""),
        Line::from("  Host page content"),
        Line::from(""),
        Line::from("  o open · Esc close · g last page · p/h/f snap · q quit"),
    ])
    .style(Style::default().fg(Color::DarkGray));
    f.render_widget(host_page, area);

    if m.snap.is_none() && m.transform.is_none() {
        m.sheet_top = area.height;
        return;
    }

    if m.backdrop {
        let backdrop = Block::default().style(Style::default().bg(Color::Rgb(20, 20, 28)));
        f.render_widget(backdrop, area);
    }

    let vh = f32::from(area.height);
    let offset = m
        .transform
        .unwrap_or_else(|| m.snap.map_or(vh, |s| s.resting_offset(vh)));
    let top = offset.round().clamp(0.0, vh) as u16;
    if top >= area.height {
        m.sheet_top = area.height;
        return;
    }

    let sheet_area = Rect::new(0, top, area.width, area.height - top);
    f.render_widget(Clear, sheet_area);

    let border_style = if m.dragging {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default().fg(Color::Gray)
    };
    let sheet = Block::default()
        .borders(Borders::ALL)
        .border_style(border_style)
        .title(" document ");
    let inner = sheet.inner(sheet_area);
    f.render_widget(sheet, sheet_area);
    if inner.height < 2 || inner.width < 6 {
        m.sheet_top = top;
        m.handle_row = inner.y;
        m.dots_row = inner.y;
        m.content_top = inner.y;
        return;
    }

    // Handle bar, then the snap dots at a known position for hit-testing
    let handle = Paragraph::new(Line::from(Span::styled("━━━━━━", border_style)))
        .alignment(Alignment::Center);
    f.render_widget(handle, Rect::new(inner.x, inner.y, inner.width, 1));

    let dots_x = inner.x + (inner.width.saturating_sub(5)) / 2;
    let dot_spans: Vec<Span> = SnapPosition::ALL
        .iter()
        .enumerate()
        .flat_map(|(i, &snap)| {
            let active = m.indicator == Some(snap);
            let style = if active {
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(Color::DarkGray)
            };
            let mut spans = vec![Span::styled(if active { "●" } else { "○" }, style)];
            if i < 2 {
                spans.push(Span::raw(" "));
            }
            spans
        })
        .collect();
    f.render_widget(
        Paragraph::new(Line::from(dot_spans)),
        Rect::new(dots_x, inner.y + 1, 5.min(inner.width), 1),
    );

    m.sheet_top = top;
    m.handle_row = inner.y;
    m.dots_row = inner.y + 1;
    m.dot_cols = [dots_x, dots_x + 2, dots_x + 4];
    m.content_top = inner.y + 2;

    let content_area = Rect::new(
        inner.x,
        inner.y + 2,
        inner.width,
        inner.height.saturating_sub(2),
    );
    if content_area.height == 0 {
        return;
    }

    // Status indicators win over document state
    let content = if m.loading {
        Paragraph::new("Loading document…")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Yellow))
    } else if m.error {
        Paragraph::new("Couldn't load the document.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(Color::Red).add_modifier(Modifier::BOLD))
    } else if let Some(total) = m.page_total {
        let rendered = m.pages_rendered.iter().filter(|&&r| r).count();
        let mut lines = vec![Line::from(format!("{rendered}/{total} pages rendered"))];
        if let Some(page) = m.page_in_view {
            lines.push(Line::from(format!("viewing page {}", page + 1)));
        }
        Paragraph::new(lines).alignment(Alignment::Center)
    } else if let Some(src) = &m.mounted {
        Paragraph::new(vec![
            Line::from(format!("[viewer] {src}")),
            Line::from(format!("scroll {}", m.scroll_offset)),
        ])
        .alignment(Alignment::Center)
    } else {
        Paragraph::new("")
    };
    f.render_widget(content, content_area);
}
