//! Application state and event loop

use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use chrono::{Local, NaiveDate};
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{buffer::Buffer, layout::Rect, style::Style, widgets::Widget, DefaultTerminal, Frame};

use crate::services::dashboard::RECENT_BOOKINGS;
use crate::services::{recent_bookings, AnalyticsCache, DashboardStats, DataLoaderService};
use crate::types::{Booking, LoadWarning, YearMonth};

use super::theme::Theme;
use super::widgets::{
    analytics::AnalyticsView,
    bookings::BookingsView,
    breakdown::BreakdownView,
    dashboard::DashboardView,
    help::HelpPopup,
    render_notice,
    spinner::Spinner,
    tabs::Tab,
    StatusLine,
};

/// Application state
pub enum AppState {
    /// Loading data with spinner animation
    Loading { spinner_frame: usize },
    /// Ready with loaded data
    Ready { data: Box<AppData> },
    /// Error state
    Error { message: String },
}

/// Loaded application data
pub struct AppData {
    pub bookings: Arc<[Booking]>,
    pub stats: DashboardStats,
    /// Source line, or the load warnings when something went wrong
    pub status: StatusLine,
}

/// Result of one background load, tagged with the generation that requested it
pub struct LoadMessage {
    pub generation: u64,
    pub data: Box<AppData>,
}

/// Main application
pub struct App {
    state: AppState,
    should_quit: bool,
    current_tab: Tab,
    month: YearMonth,
    cache: AnalyticsCache,
    scroll: usize,
    viewport_height: u16,
    show_help: bool,
    generation: u64,
    reload_requested: bool,
    source: String,
    theme: Theme,
}

impl App {
    /// Create a new app in loading state
    pub fn new(source: impl Into<String>, month: YearMonth, theme: Theme) -> Self {
        Self {
            state: AppState::Loading { spinner_frame: 0 },
            should_quit: false,
            current_tab: Tab::default(),
            month,
            cache: AnalyticsCache::new(),
            scroll: 0,
            viewport_height: 0,
            show_help: false,
            generation: 0,
            reload_requested: false,
            source: source.into(),
            theme,
        }
    }

    /// Start a new load: show the spinner and invalidate any load in flight.
    /// Returns the generation the new result must carry.
    pub fn begin_load(&mut self) -> u64 {
        self.generation += 1;
        self.state = AppState::Loading { spinner_frame: 0 };
        self.generation
    }

    /// Apply a finished load. Results from an older generation are dropped.
    pub fn apply_load(&mut self, msg: LoadMessage) -> bool {
        if msg.generation != self.generation {
            tracing::debug!(
                stale = msg.generation,
                current = self.generation,
                "discarding stale load result"
            );
            return false;
        }

        self.state = AppState::Ready { data: msg.data };
        self.scroll = 0;
        self.refresh_analytics();
        true
    }

    /// Show a fatal error in place of the views
    pub fn fail(&mut self, message: impl Into<String>) {
        self.state = AppState::Error {
            message: message.into(),
        };
    }

    /// Returns true once per `r` press
    pub fn take_reload_request(&mut self) -> bool {
        std::mem::take(&mut self.reload_requested)
    }

    /// Terminal height, used to clamp scrolling
    pub fn set_viewport_height(&mut self, height: u16) {
        self.viewport_height = height;
    }

    /// Handle keyboard events
    pub fn handle_event(&mut self, event: Event) {
        match event {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                    self.should_quit = true;
                }
                KeyCode::Tab => {
                    self.current_tab = self.current_tab.next();
                }
                KeyCode::BackTab => {
                    self.current_tab = self.current_tab.prev();
                }
                KeyCode::Char(c @ '1'..='4') => {
                    if let Some(tab) = Tab::from_number(c as u8 - b'0') {
                        self.current_tab = tab;
                    }
                }
                KeyCode::Char('?') => {
                    self.show_help = !self.show_help;
                }
                KeyCode::Char('r') | KeyCode::Char('R') => {
                    self.reload_requested = true;
                }
                KeyCode::Left | KeyCode::Char('[') if self.current_tab.is_monthly() => {
                    self.set_month(self.month.prev());
                }
                KeyCode::Right | KeyCode::Char(']') if self.current_tab.is_monthly() => {
                    self.set_month(self.month.next());
                }
                KeyCode::Up | KeyCode::Char('k') => {
                    self.scroll_up();
                }
                KeyCode::Down | KeyCode::Char('j') => {
                    self.scroll_down();
                }
                _ => {}
            },
            Event::Resize(_, height) => {
                self.viewport_height = height;
                self.scroll = self.scroll.min(self.max_scroll());
            }
            _ => {}
        }
    }

    fn set_month(&mut self, month: YearMonth) {
        self.month = month;
        self.refresh_analytics();
    }

    /// Bring the cached report in line with the loaded collection and month
    fn refresh_analytics(&mut self) {
        if let AppState::Ready { data } = &self.state {
            self.cache.get(&data.bookings, self.month);
        }
    }

    fn max_scroll(&self) -> usize {
        match &self.state {
            AppState::Ready { data } => BookingsView::max_scroll(
                data.bookings.len(),
                BookingsView::visible_rows(self.viewport_height),
            ),
            _ => 0,
        }
    }

    fn scroll_up(&mut self) {
        if self.current_tab == Tab::Bookings {
            self.scroll = self.scroll.saturating_sub(1);
        }
    }

    fn scroll_down(&mut self) {
        if self.current_tab == Tab::Bookings {
            self.scroll = (self.scroll + 1).min(self.max_scroll());
        }
    }

    /// Update spinner animation
    pub fn tick(&mut self) {
        if let AppState::Loading { spinner_frame } = &self.state {
            self.state = AppState::Loading {
                spinner_frame: Spinner::next_frame(*spinner_frame),
            };
        }
    }

    /// Check if app should quit
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Draw the application
    pub fn draw(&self, frame: &mut Frame) {
        frame.render_widget(self, frame.area());
    }
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        match &self.state {
            AppState::Loading { spinner_frame } => {
                Spinner::new(*spinner_frame, &self.source, self.theme).render(area, buf);
            }
            AppState::Ready { data } => {
                match self.current_tab {
                    Tab::Dashboard => {
                        let recent = recent_bookings(&data.bookings, RECENT_BOOKINGS);
                        DashboardView::new(&data.stats, &recent, &data.status, self.theme)
                            .render(area, buf);
                    }
                    Tab::Analytics => {
                        if let Some(report) = self.cache.current() {
                            AnalyticsView::new(report, &data.status, self.theme).render(area, buf);
                        }
                    }
                    Tab::Breakdown => {
                        if let Some(report) = self.cache.current() {
                            BreakdownView::new(report, &data.status, self.theme).render(area, buf);
                        }
                    }
                    Tab::Bookings => {
                        BookingsView::new(&data.bookings, self.scroll, &data.status, self.theme)
                            .render(area, buf);
                    }
                }

                if self.show_help {
                    let popup_area = HelpPopup::centered_area(area);
                    HelpPopup::new(self.theme).render(popup_area, buf);
                }
            }
            AppState::Error { message } => {
                render_notice(
                    area,
                    buf,
                    &format!("Error: {}", message),
                    Style::default().fg(self.theme.error()),
                );
            }
        }
    }
}

/// Fetch bookings and contacts and derive the dashboard counters.
/// Never fails: load problems end up in the status line.
fn load_data(loader: &DataLoaderService, today: NaiveDate) -> Box<AppData> {
    let bookings = loader.load_bookings();
    let contacts = loader.load_contacts();

    let warnings: Vec<String> = [&bookings.warning, &contacts.warning]
        .into_iter()
        .flatten()
        .map(LoadWarning::message)
        .collect();
    let status = if warnings.is_empty() {
        StatusLine::info(format!("Source: {}", loader.source()))
    } else {
        StatusLine::warning(warnings.join("; "))
    };

    let stats = DashboardStats::compute(&bookings.records, contacts.records.len(), today);
    Box::new(AppData {
        bookings: bookings.records.into(),
        stats,
        status,
    })
}

/// Run the TUI application
pub fn run(loader: DataLoaderService) -> anyhow::Result<()> {
    // Detect before entering the alternate screen
    let theme = Theme::detect();
    let loader = Arc::new(loader);

    let mut terminal = ratatui::init();
    let result = run_app(&mut terminal, loader, theme);
    ratatui::restore();
    result
}

/// Load on a background thread, reporting back over `tx`
fn spawn_load(
    app: &mut App,
    loader: &Arc<DataLoaderService>,
    tx: &mpsc::Sender<LoadMessage>,
) {
    let generation = app.begin_load();
    let loader = Arc::clone(loader);
    let tx = tx.clone();

    let spawned = thread::Builder::new()
        .name("cabdash-loader".into())
        .spawn(move || {
            let data = load_data(&loader, Local::now().date_naive());
            // Receiver is gone once the app has quit
            let _ = tx.send(LoadMessage { generation, data });
        });

    if let Err(e) = spawned {
        tracing::error!(error = %e, "failed to start loader thread");
        app.fail(format!("Failed to start loader: {}", e));
    }
}

fn run_app(
    terminal: &mut DefaultTerminal,
    loader: Arc<DataLoaderService>,
    theme: Theme,
) -> anyhow::Result<()> {
    let mut app = App::new(loader.source(), YearMonth::current(), theme);
    let (tx, rx) = mpsc::channel();
    spawn_load(&mut app, &loader, &tx);

    loop {
        terminal.draw(|frame| app.draw(frame))?;

        if app.should_quit() {
            break;
        }

        while let Ok(msg) = rx.try_recv() {
            app.apply_load(msg);
        }

        if app.take_reload_request() {
            tracing::info!(source = %loader.source(), "reloading");
            spawn_load(&mut app, &loader, &tx);
        }

        app.set_viewport_height(terminal.size()?.height);

        // Poll for events with 100ms timeout for spinner animation
        if event::poll(Duration::from_millis(100))? {
            app.handle_event(event::read()?);
        } else {
            app.tick();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{Backend, BOOKINGS_PATH};
    use crate::types::{CabdashError, Result};
    use chrono::{TimeZone, Utc};
    use crossterm::event::{KeyEvent, KeyModifiers};
    use serde_json::{json, Value};

    fn march() -> YearMonth {
        "2024-03".parse().unwrap()
    }

    fn make_booking(id: &str, day: u32) -> Booking {
        Booking {
            booking_id: id.into(),
            user_name: "Asha Rao".into(),
            pick_up_location: "Mumbai".into(),
            drop_location: Some("Pune".into()),
            journey_date: NaiveDate::from_ymd_opt(2024, 3, day).unwrap(),
            estimated_fare: 1000.0,
            created_at: Utc.with_ymd_and_hms(2024, 3, day, 12, 0, 0).unwrap(),
            ..Booking::default()
        }
    }

    fn make_data(count: usize) -> Box<AppData> {
        let bookings: Vec<Booking> = (0..count)
            .map(|i| make_booking(&format!("ZC-{}", i), (i % 28) as u32 + 1))
            .collect();
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        Box::new(AppData {
            stats: DashboardStats::compute(&bookings, 0, today),
            bookings: bookings.into(),
            status: StatusLine::info("Source: test"),
        })
    }

    fn make_ready_app(count: usize) -> App {
        let mut app = App::new("test", march(), Theme::Dark);
        let generation = app.begin_load();
        assert!(app.apply_load(LoadMessage {
            generation,
            data: make_data(count),
        }));
        app
    }

    fn key(code: KeyCode) -> Event {
        Event::Key(KeyEvent::new(code, KeyModifiers::NONE))
    }

    fn render(app: &App) -> String {
        render_sized(app, 120, 40)
    }

    fn render_sized(app: &App, width: u16, height: u16) -> String {
        let area = Rect::new(0, 0, width, height);
        let mut buf = Buffer::empty(area);
        app.render(area, &mut buf);
        buf.content().iter().map(|c| c.symbol()).collect()
    }

    // ========== load generation tests ==========

    #[test]
    fn test_new_app_is_loading() {
        let app = App::new("test", march(), Theme::Dark);
        assert!(matches!(app.state, AppState::Loading { .. }));
        assert!(!app.should_quit());
    }

    #[test]
    fn test_apply_current_generation() {
        let app = make_ready_app(3);
        assert!(matches!(app.state, AppState::Ready { .. }));
        assert_eq!(app.cache.computations(), 1);
    }

    #[test]
    fn test_stale_generation_discarded() {
        let mut app = App::new("test", march(), Theme::Dark);
        let first = app.begin_load();
        let second = app.begin_load();

        // The first load finishes after a reload was requested
        assert!(!app.apply_load(LoadMessage {
            generation: first,
            data: make_data(1),
        }));
        assert!(matches!(app.state, AppState::Loading { .. }));

        assert!(app.apply_load(LoadMessage {
            generation: second,
            data: make_data(2),
        }));
        match &app.state {
            AppState::Ready { data } => assert_eq!(data.bookings.len(), 2),
            _ => panic!("expected Ready state"),
        }
    }

    #[test]
    fn test_stale_result_after_ready_keeps_data() {
        let mut app = make_ready_app(4);
        let stale = app.generation - 1;
        assert!(!app.apply_load(LoadMessage {
            generation: stale,
            data: make_data(1),
        }));
        match &app.state {
            AppState::Ready { data } => assert_eq!(data.bookings.len(), 4),
            _ => panic!("expected Ready state"),
        }
    }

    #[test]
    fn test_reload_key_requests_once() {
        let mut app = make_ready_app(1);
        app.handle_event(key(KeyCode::Char('r')));
        assert!(app.take_reload_request());
        assert!(!app.take_reload_request());
    }

    // ========== key handling tests ==========

    #[test]
    fn test_quit_keys() {
        for code in [KeyCode::Char('q'), KeyCode::Esc] {
            let mut app = make_ready_app(1);
            app.handle_event(key(code));
            assert!(app.should_quit());
        }
    }

    #[test]
    fn test_tab_navigation() {
        let mut app = make_ready_app(1);
        app.handle_event(key(KeyCode::Tab));
        assert_eq!(app.current_tab, Tab::Analytics);
        app.handle_event(key(KeyCode::BackTab));
        assert_eq!(app.current_tab, Tab::Dashboard);
        app.handle_event(key(KeyCode::Char('4')));
        assert_eq!(app.current_tab, Tab::Bookings);
    }

    #[test]
    fn test_help_toggle() {
        let mut app = make_ready_app(1);
        app.handle_event(key(KeyCode::Char('?')));
        assert!(app.show_help);
        assert!(render(&app).contains("Reload from backend"));
        app.handle_event(key(KeyCode::Char('?')));
        assert!(!app.show_help);
    }

    #[test]
    fn test_month_navigation_recomputes_report() {
        let mut app = make_ready_app(3);
        app.handle_event(key(KeyCode::Char('2')));
        app.handle_event(key(KeyCode::Left));

        assert_eq!(app.month, "2024-02".parse::<YearMonth>().unwrap());
        assert_eq!(app.cache.computations(), 2);
        assert_eq!(app.cache.current().map(|r| r.month), Some(app.month));

        app.handle_event(key(KeyCode::Char(']')));
        assert_eq!(app.month, march());
        assert_eq!(app.cache.computations(), 3);
    }

    #[test]
    fn test_month_keys_ignored_outside_monthly_tabs() {
        let mut app = make_ready_app(3);
        app.handle_event(key(KeyCode::Left));
        assert_eq!(app.month, march());
        assert_eq!(app.cache.computations(), 1);
    }

    #[test]
    fn test_tab_switch_reuses_cached_report() {
        let mut app = make_ready_app(3);
        app.handle_event(key(KeyCode::Char('2')));
        app.handle_event(key(KeyCode::Char('3')));
        app.handle_event(key(KeyCode::Char('2')));
        assert_eq!(app.cache.computations(), 1);
    }

    #[test]
    fn test_scroll_clamped_to_bookings() {
        let mut app = make_ready_app(30);
        app.set_viewport_height(20); // 12 visible rows
        app.handle_event(key(KeyCode::Char('4')));

        for _ in 0..25 {
            app.handle_event(key(KeyCode::Down));
        }
        assert_eq!(app.scroll, 18);

        app.handle_event(key(KeyCode::Char('k')));
        assert_eq!(app.scroll, 17);
    }

    #[test]
    fn test_scroll_only_on_bookings_tab() {
        let mut app = make_ready_app(30);
        app.set_viewport_height(20);
        app.handle_event(key(KeyCode::Down));
        assert_eq!(app.scroll, 0);
    }

    #[test]
    fn test_tick_advances_spinner() {
        let mut app = App::new("test", march(), Theme::Dark);
        app.tick();
        assert!(matches!(
            app.state,
            AppState::Loading { spinner_frame: 1 }
        ));
    }

    // ========== render tests ==========

    #[test]
    fn test_render_loading() {
        let app = App::new("http://localhost:3001", march(), Theme::Dark);
        assert!(render(&app).contains("Fetching bookings from http://localhost:3001"));
    }

    #[test]
    fn test_render_each_tab() {
        let mut app = make_ready_app(3);
        assert!(render(&app).contains("Total Bookings"));

        app.handle_event(key(KeyCode::Char('2')));
        assert!(render(&app).contains("March 2024"));

        app.handle_event(key(KeyCode::Char('3')));
        assert!(render(&app).contains("Mumbai → Pune"));

        app.handle_event(key(KeyCode::Char('4')));
        assert!(render(&app).contains("ZC-0"));
    }

    #[test]
    fn test_render_error() {
        let mut app = App::new("test", march(), Theme::Dark);
        app.fail("boom");
        assert!(render(&app).contains("Error: boom"));
    }

    #[test]
    fn test_render_tiny_terminal_does_not_panic() {
        const SIZES: [(u16, u16); 6] = [(10, 3), (1, 1), (120, 7), (120, 8), (30, 12), (0, 0)];

        let mut app = make_ready_app(30);
        for tab in ['1', '2', '3', '4'] {
            app.handle_event(key(KeyCode::Char(tab)));
            for (width, height) in SIZES {
                render_sized(&app, width, height);
            }
        }

        app.handle_event(key(KeyCode::Char('?')));
        for (width, height) in SIZES {
            render_sized(&app, width, height);
        }

        let loading = App::new("test", march(), Theme::Dark);
        let mut failed = App::new("test", march(), Theme::Dark);
        failed.fail("boom");
        for (width, height) in SIZES {
            render_sized(&loading, width, height);
            render_sized(&failed, width, height);
        }
    }

    #[test]
    fn test_render_error_short_terminal() {
        let mut app = App::new("test", march(), Theme::Dark);
        app.fail("boom");
        assert!(render_sized(&app, 40, 1).contains("Error: boom"));
    }

    // ========== load_data() tests ==========

    struct FixedBackend {
        bookings: Option<Value>,
    }

    impl Backend for FixedBackend {
        fn describe(&self) -> String {
            "fixture".into()
        }

        fn get_json(&self, path: &str) -> Result<Value> {
            match path {
                BOOKINGS_PATH => self
                    .bookings
                    .clone()
                    .ok_or_else(|| CabdashError::Http("connection refused".into())),
                _ => Ok(json!([])),
            }
        }

        fn put_json(&self, path: &str, _body: &Value) -> Result<Value> {
            Err(CabdashError::Api(format!("{} is read-only", path)))
        }
    }

    #[test]
    fn test_load_data_reports_source() {
        let loader = DataLoaderService::new(Box::new(FixedBackend {
            bookings: Some(json!([])),
        }));
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let data = load_data(&loader, today);

        assert!(data.bookings.is_empty());
        assert_eq!(data.status, StatusLine::info("Source: fixture"));
    }

    #[test]
    fn test_load_data_degrades_to_warning() {
        let loader = DataLoaderService::new(Box::new(FixedBackend { bookings: None }));
        let today = NaiveDate::from_ymd_opt(2024, 3, 15).unwrap();
        let data = load_data(&loader, today);

        assert!(data.bookings.is_empty());
        assert!(data.status.warning);
        assert!(data.status.text.contains("connection refused"));
        assert_eq!(data.stats.total_bookings, 0);
    }
}
