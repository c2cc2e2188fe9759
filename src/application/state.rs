//! Application state management for the terminal loan calculator.
//!
//! This module contains the main application state and mode management
//! for the terminal user interface.

use crate::application::form::{FormController, SubmitStart};
use crate::application::shared::{shared_payment, PaymentReader};
use crate::domain::{Field, LoanResponse, LoanService, ServiceError, ServiceResult};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread;
use tracing::error;

pub const DEFAULT_EXPORT_FILENAME: &str = "loan-breakdown.csv";

/// Represents the current mode of the application.
///
/// The mode decides how key presses are interpreted and which
/// overlays are drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Moving between fields, shortcuts available
    Normal,
    /// Typing into a text field
    Editing,
    /// Help screen is displayed
    Help,
    /// CSV export dialog is open
    ExportCsv,
}

/// The element of the form that currently has keyboard focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Field(Field),
    Submit,
}

impl Focus {
    const ORDER: [Focus; 6] = [
        Focus::Field(Field::LoanType),
        Focus::Field(Field::LoanAmount),
        Focus::Field(Field::Term),
        Focus::Field(Field::CreditScore),
        Focus::Field(Field::HouseAge),
        Focus::Submit,
    ];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Self {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Self {
        Self::ORDER[(self.index() + Self::ORDER.len() - 1) % Self::ORDER.len()]
    }
}

/// Main application state: the form controller plus terminal UI state.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
/// use loancalc::application::{App, AppMode, Focus};
/// use loancalc::domain::{LoanRequest, LoanResponse, LoanService, ServiceError, ServiceResult};
///
/// struct Offline;
///
/// impl LoanService for Offline {
///     fn calculate(&self, _: &LoanRequest) -> ServiceResult<LoanResponse> {
///         Err(ServiceError::Transport("offline".to_string()))
///     }
/// }
///
/// let app = App::new(Arc::new(Offline));
/// assert_eq!(app.mode, AppMode::Normal);
/// assert!(matches!(app.focus, Focus::Field(_)));
/// ```
pub struct App {
    /// Field values, validation and calculation state
    pub form: FormController,
    /// Reader used by the header badge
    pub header_payment: PaymentReader,
    /// Current application mode
    pub mode: AppMode,
    /// Focused form element
    pub focus: Focus,
    /// Current input buffer (for editing mode)
    pub input: String,
    /// Cursor position within the input buffer, in characters
    pub cursor_position: usize,
    /// Scroll position in help text
    pub help_scroll: usize,
    /// Temporary status message to display
    pub status_message: Option<String>,
    /// Input buffer for filename entry
    pub filename_input: String,
    /// Animation frame for the loading indicator
    pub spinner_frame: usize,
    service: Arc<dyn LoanService>,
    pending: Option<Receiver<ServiceResult<LoanResponse>>>,
}

impl App {
    pub fn new(service: Arc<dyn LoanService>) -> Self {
        let (publisher, reader) = shared_payment();
        Self {
            form: FormController::new(publisher),
            header_payment: reader,
            mode: AppMode::Normal,
            focus: Focus::Field(Field::LoanType),
            input: String::new(),
            cursor_position: 0,
            help_scroll: 0,
            status_message: None,
            filename_input: String::new(),
            spinner_frame: 0,
            service,
            pending: None,
        }
    }

    pub fn focus_next(&mut self) {
        self.focus = self.focus.next();
    }

    pub fn focus_previous(&mut self) {
        self.focus = self.focus.previous();
    }

    /// Acts on the focused element: edit a text field, cycle a choice
    /// field, or submit.
    pub fn activate(&mut self) {
        match self.focus {
            Focus::Submit => self.submit(),
            Focus::Field(field) if field.is_choice() => self.cycle_choice(true),
            Focus::Field(_) => self.start_editing(),
        }
    }

    /// Switches to editing mode for the focused text field.
    ///
    /// Loads the field's raw value into the input buffer and positions
    /// the cursor at the end. Choice fields and the submit row are not
    /// editable.
    pub fn start_editing(&mut self) {
        if let Focus::Field(field) = self.focus {
            if field.is_choice() {
                return;
            }
            self.mode = AppMode::Editing;
            self.input = self.form.field(field).to_string();
            self.cursor_position = self.input.chars().count();
        }
    }

    /// Stores the input buffer into the focused field and moves to the next element.
    pub fn finish_editing(&mut self) {
        if let Focus::Field(field) = self.focus {
            self.form.update_field(field, self.input.clone());
            self.focus_next();
        }

        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    /// Cancels editing and returns to normal mode without saving changes.
    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let position = self.cursor_position;
        let buffer = self.active_buffer();
        let at = byte_index(buffer, position);
        buffer.insert(at, c);
        self.cursor_position += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let position = self.cursor_position;
            let buffer = self.active_buffer();
            let at = byte_index(buffer, position);
            buffer.remove(at);
        }
    }

    pub fn delete_at_cursor(&mut self) {
        let position = self.cursor_position;
        let buffer = self.active_buffer();
        if position < buffer.chars().count() {
            let at = byte_index(buffer, position);
            buffer.remove(at);
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        let len = self.active_buffer().chars().count();
        if self.cursor_position < len {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_home(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_end(&mut self) {
        self.cursor_position = self.active_buffer().chars().count();
    }

    fn active_buffer(&mut self) -> &mut String {
        match self.mode {
            AppMode::ExportCsv => &mut self.filename_input,
            _ => &mut self.input,
        }
    }

    /// Steps the focused choice field through its options.
    ///
    /// The empty "Select" value sits before the first option, so cycling
    /// wraps through it.
    pub fn cycle_choice(&mut self, forward: bool) {
        let Focus::Field(field) = self.focus else {
            return;
        };
        let Some(options) = field.options() else {
            return;
        };

        let mut values = vec![""];
        values.extend(options);
        let current = values
            .iter()
            .position(|v| *v == self.form.field(field))
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % values.len()
        } else {
            (current + values.len() - 1) % values.len()
        };
        self.form.update_field(field, values[next]);
    }

    /// Starts a calculation on a worker thread if the form is valid.
    ///
    /// The outcome is picked up by [`App::poll_pending`].
    pub fn submit(&mut self) {
        match self.form.begin_submit() {
            SubmitStart::Dispatched(request) => {
                let (tx, rx) = mpsc::channel();
                let service = Arc::clone(&self.service);
                let spawned = thread::Builder::new()
                    .name("loan-calculation".to_string())
                    .spawn(move || {
                        // The receiver may be gone if the app quit mid-request.
                        let _ = tx.send(service.calculate(&request));
                    });

                match spawned {
                    Ok(_) => {
                        self.pending = Some(rx);
                        self.status_message = Some("Calculating…".to_string());
                    }
                    Err(e) => {
                        error!(error = %e, "failed to start calculation worker");
                        self.form.finish_submit(Err(ServiceError::WorkerLost));
                        self.status_message = None;
                    }
                }
            }
            SubmitStart::Invalid => {
                self.status_message = Some("Please correct the highlighted fields".to_string());
            }
            SubmitStart::Busy => {
                self.status_message = Some("A calculation is already running".to_string());
            }
        }
    }

    pub fn has_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Applies the worker's outcome if it has arrived.
    ///
    /// Returns `true` when the form state changed. A worker that exits
    /// without reporting counts as a failure so loading never sticks.
    pub fn poll_pending(&mut self) -> bool {
        let Some(rx) = &self.pending else {
            return false;
        };
        let outcome = match rx.try_recv() {
            Ok(outcome) => outcome,
            Err(TryRecvError::Empty) => return false,
            Err(TryRecvError::Disconnected) => Err(ServiceError::WorkerLost),
        };
        self.complete(outcome);
        true
    }

    /// Blocks until the in-flight calculation finishes and applies it.
    pub fn wait_for_pending(&mut self) {
        if let Some(rx) = &self.pending {
            let outcome = rx.recv().unwrap_or(Err(ServiceError::WorkerLost));
            self.complete(outcome);
        }
    }

    fn complete(&mut self, outcome: ServiceResult<LoanResponse>) {
        self.pending = None;
        let succeeded = outcome.is_ok();
        self.form.finish_submit(outcome);
        self.status_message = succeeded.then(|| "Calculation complete".to_string());
    }

    /// Advances the loading indicator; called once per event loop tick.
    pub fn tick(&mut self) {
        if self.form.is_loading() {
            self.spinner_frame = self.spinner_frame.wrapping_add(1);
        }
    }

    /// Empties the form and returns focus to the first field.
    pub fn reset_form(&mut self) {
        self.form.reset();
        self.focus = Focus::Field(Field::LoanType);
        self.status_message = Some("Form cleared".to_string());
    }

    /// Switches to CSV export mode to prompt for a filename.
    pub fn start_csv_export(&mut self) {
        if self.form.result().is_none() {
            self.status_message = Some("Nothing to export yet".to_string());
            return;
        }
        self.mode = AppMode::ExportCsv;
        self.filename_input = DEFAULT_EXPORT_FILENAME.to_string();
        self.cursor_position = self.filename_input.chars().count();
        self.status_message = None;
    }

    /// Gets the filename to use for CSV export.
    ///
    /// Returns the filename input if not empty, otherwise the default.
    pub fn get_csv_export_filename(&self) -> String {
        if self.filename_input.trim().is_empty() {
            DEFAULT_EXPORT_FILENAME.to_string()
        } else {
            self.filename_input.trim().to_string()
        }
    }

    /// Processes the result of a CSV export and returns to normal mode.
    pub fn set_csv_export_result<E: std::fmt::Display>(&mut self, result: Result<String, E>) {
        match result {
            Ok(filename) => {
                self.status_message = Some(format!("Exported to {}", filename));
            }
            Err(error) => {
                self.status_message = Some(format!("Export failed: {}", error));
            }
        }

        self.cancel_filename_input();
    }

    /// Cancels filename input and returns to normal mode.
    pub fn cancel_filename_input(&mut self) {
        self.mode = AppMode::Normal;
        self.filename_input.clear();
        self.cursor_position = 0;
    }
}

fn byte_index(s: &str, char_position: usize) -> usize {
    s.char_indices().nth(char_position).map(|(i, _)| i).unwrap_or(s.len())
}
