//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation
//! - Input event handling and blur validation
//! - Background prediction requests via the worker

use std::io;
use std::sync::Arc;
use std::time::Duration;

use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    Frame, Terminal,
};

use crate::adapters::http::UreqTransport;
use crate::adapters::sqlite::SqliteStore;
use crate::application::{FormSession, FormSnapshotService, PredictionClient, SubmitRejected};
use crate::config::AppConfig;
use crate::Result;
use crate::domain::{FeatureSchema, PredictionResponse};

use super::styles::SPINNER_FRAMES;
use super::ui::{
    details::render_details,
    form::{render_form, FormView},
    render_alert, render_disclaimer,
    result::render_result,
    Alert,
};
use super::worker::{PredictionProgress, PredictionWorker, PredictionWorkerHandle};

/// Current screen/view in the application
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Form,
    Result,
}

/// Main application state
pub struct App {
    /// Current screen
    screen: Screen,

    /// Whether the app should quit
    should_quit: bool,

    /// Form values, marks, snapshot and submission gate
    session: FormSession<SqliteStore>,

    /// Shared with the worker thread for each request
    client: Arc<PredictionClient<UreqTransport>>,

    /// Field layout built from the schema
    form_view: FormView,

    /// Last prediction, kept until a new one replaces it
    result: Option<PredictionResponse>,

    /// Transient message region
    alert: Option<Alert>,

    /// Whether the details modal is open
    show_details: bool,

    /// Pending prediction worker (if running)
    pending_worker: Option<PredictionWorkerHandle>,

    /// Frame counter driving the spinner
    tick: usize,
}

impl App {
    /// Create a new application instance from configuration.
    ///
    /// For more control, use `with_dependencies()`.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let store = Arc::new(SqliteStore::new(&config.db_path)?);
        let transport = UreqTransport::new(config.endpoint.clone(), config.timeout);
        let client = Arc::new(PredictionClient::new(transport));

        tracing::info!(
            endpoint = %config.endpoint,
            schema = %config.schema,
            "Prediction client configured"
        );

        Ok(Self::with_dependencies(
            FeatureSchema::new(config.schema),
            client,
            store,
        ))
    }

    /// Create application with injected dependencies (Composition Root pattern).
    ///
    /// Restores the saved form snapshot, if any.
    pub fn with_dependencies(
        schema: FeatureSchema,
        client: Arc<PredictionClient<UreqTransport>>,
        store: Arc<SqliteStore>,
    ) -> Self {
        let mut session = FormSession::new(schema, FormSnapshotService::new(store));
        session.restore();
        let form_view = FormView::build(session.schema());

        Self {
            screen: Screen::Form,
            should_quit: false,
            session,
            client,
            form_view,
            result: None,
            alert: None,
            show_details: false,
            pending_worker: None,
            tick: 0,
        }
    }

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.screen
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    #[must_use]
    pub fn session(&self) -> &FormSession<SqliteStore> {
        &self.session
    }

    #[must_use]
    pub fn form_view(&self) -> &FormView {
        &self.form_view
    }

    #[must_use]
    pub fn result(&self) -> Option<&PredictionResponse> {
        self.result.as_ref()
    }

    #[must_use]
    pub fn alert(&self) -> Option<&Alert> {
        self.alert.as_ref()
    }

    #[must_use]
    pub fn details_open(&self) -> bool {
        self.show_details
    }

    #[must_use]
    pub fn is_submitting(&self) -> bool {
        self.session.is_submitting()
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        // Setup terminal
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        // Main loop
        let result = self.main_loop(&mut terminal);

        // Restore terminal
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        loop {
            self.poll_worker();
            if self.is_submitting() {
                self.tick = self.tick.wrapping_add(1);
            }

            terminal.draw(|f| self.draw(f))?;

            // Short poll to stay responsive
            if event::poll(Duration::from_millis(50))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        Ok(())
    }

    /// Draw the current screen, alert region and modal.
    pub fn draw(&self, f: &mut Frame) {
        let area = f.area();
        let alert_height = if self.alert.is_some() { 3 } else { 0 };
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Min(0),
                Constraint::Length(alert_height),
                Constraint::Length(3),
            ])
            .split(area);

        let spinner = self
            .is_submitting()
            .then(|| SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()]);

        match (self.screen, &self.result) {
            (Screen::Result, Some(response)) => render_result(f, chunks[0], response, spinner),
            _ => {
                render_form(
                    f,
                    chunks[0],
                    &self.form_view,
                    self.session.form(),
                    self.session.marks(),
                    spinner,
                );
            }
        }

        if let Some(alert) = &self.alert {
            render_alert(f, chunks[1], alert);
        }
        render_disclaimer(f, chunks[2]);

        if let (true, Some(response)) = (self.show_details, &self.result) {
            render_details(f, area, response, self.session.schema());
        }
    }

    /// Drain progress from the background worker.
    pub fn poll_worker(&mut self) {
        // Must not hold a borrow of `pending_worker` while mutating `self`
        loop {
            let progress = match self.pending_worker.as_ref().and_then(|w| w.try_recv()) {
                Some(p) => p,
                None => break,
            };

            match progress {
                PredictionProgress::Submitting => {}
                PredictionProgress::Complete(response) => {
                    let outcome = Ok(response);
                    self.session.finish_submit(&outcome);
                    self.pending_worker = None;
                    self.result = outcome.ok();
                    self.alert = None;
                    self.show_details = false;
                    self.screen = Screen::Result;
                }
                PredictionProgress::Failed(error) => {
                    let message = format!("Prediction failed: {error}");
                    self.session.finish_submit(&Err(error));
                    self.pending_worker = None;
                    self.result = None;
                    self.show_details = false;
                    self.alert = Some(Alert::danger(message));
                    self.screen = Screen::Form;
                }
            }
        }
    }

    /// Handle one key press.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        let ctrl = modifiers.contains(KeyModifiers::CONTROL);

        // Global handling
        if ctrl && matches!(key, KeyCode::Char('q') | KeyCode::Char('Q')) {
            self.should_quit = true;
            return;
        }
        if ctrl && matches!(key, KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Enter) {
            self.submit_form();
            return;
        }
        if key == KeyCode::Esc {
            if self.show_details {
                self.show_details = false;
            } else {
                self.alert = None;
            }
            return;
        }
        if self.show_details {
            return;
        }

        match self.screen {
            Screen::Form => self.handle_form_key(key),
            Screen::Result => self.handle_result_key(key),
        }
    }

    fn handle_form_key(&mut self, key: KeyCode) {
        let index = self.form_view.selected();
        match key {
            KeyCode::Up | KeyCode::BackTab => {
                self.blur_selected();
                self.form_view.prev_field();
            }
            KeyCode::Down | KeyCode::Tab => {
                self.blur_selected();
                self.form_view.next_field();
            }
            KeyCode::Enter => {
                self.submit_form();
            }
            KeyCode::Char('s') | KeyCode::Char('S') => {
                self.session.load_sample();
                self.alert = Some(Alert::info("Sample case loaded"));
            }
            KeyCode::Char(c) if FormView::accepts(c) => {
                self.session.push_char(index, c);
            }
            KeyCode::Backspace => {
                self.session.pop_char(index);
            }
            KeyCode::Delete => {
                self.session.clear_field(index);
            }
            _ => {}
        }
    }

    fn handle_result_key(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('d') | KeyCode::Char('D') => self.open_details(),
            KeyCode::Char('n') | KeyCode::Char('N') => self.new_prediction(),
            _ => {}
        }
    }

    fn blur_selected(&mut self) {
        if let Some(field) = self.form_view.selected_field() {
            let name = field.name;
            self.session.blur(name);
        }
    }

    fn submit_form(&mut self) {
        match self.session.begin_submit() {
            Ok(values) => {
                self.alert = None;
                self.tick = 0;
                self.pending_worker = Some(PredictionWorker::spawn(self.client.clone(), values));
            }
            Err(SubmitRejected::AlreadySubmitting) => {}
            Err(rejected @ SubmitRejected::InvalidFields { .. }) => {
                self.alert = Some(Alert::danger(rejected.to_string()));
                self.screen = Screen::Form;
                self.show_details = false;

                // Jump to the first invalid field
                let marks = self.session.marks();
                let first_invalid = self.form_view.fields().iter().position(|f| marks.is_marked(f.name));
                if let Some(index) = first_invalid {
                    self.form_view.select(index);
                }
            }
        }
    }

    fn open_details(&mut self) {
        let Some(response) = &self.result else {
            return;
        };
        if response.top_importances(self.session.schema()).is_empty() {
            self.alert = Some(Alert::warning("Detailed analysis data not available"));
        } else {
            self.show_details = true;
        }
    }

    /// Leave the result view; form values are kept as they are.
    fn new_prediction(&mut self) {
        self.result = None;
        self.show_details = false;
        self.alert = None;
        self.screen = Screen::Form;
    }
}
