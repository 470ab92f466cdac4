use std::path::PathBuf;
use std::time::Instant;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::report;
use crate::roster::ClassRoster;
use crate::score::{score, ResultRecord};
use crate::stimulus::SymbolSource;
use crate::trial::{InvalidTransition, Phase, ResponseKind, TrialSession};

/// Top-level screens. The class dashboard is not a screen of its own; it is
/// rendered at the bottom of every screen, as on the original report page.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Intake,
    Trial,
    Results,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormField {
    Name,
    Class,
}

/// Student information form shown before a run starts.
#[derive(Debug, Default)]
pub struct IntakeForm {
    pub name: String,
    pub class_name: String,
    pub error: Option<&'static str>,
    active_class: bool,
}

impl IntakeForm {
    pub fn active(&self) -> FormField {
        if self.active_class {
            FormField::Class
        } else {
            FormField::Name
        }
    }

    pub fn toggle_field(&mut self) {
        self.active_class = !self.active_class;
    }

    pub fn type_char(&mut self, c: char) {
        match self.active() {
            FormField::Name => self.name.push(c),
            FormField::Class => self.class_name.push(c),
        }
        self.error = None;
    }

    pub fn backspace(&mut self) {
        match self.active() {
            FormField::Name => self.name.pop(),
            FormField::Class => self.class_name.pop(),
        };
    }

    /// Presence check only. Deviation from the reference, which accepted
    /// blank identities silently.
    fn validate(&self) -> Result<(String, String), &'static str> {
        let name = self.name.trim();
        let class_name = self.class_name.trim();
        if name.is_empty() {
            return Err("Student name is required");
        }
        if class_name.is_empty() {
            return Err("Class / section is required");
        }
        Ok((name.to_string(), class_name.to_string()))
    }
}

/// Discrete events the presentation layer feeds into the core.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppEvent {
    Start { name: String, class_name: String },
    AdvanceToStimulus,
    Respond(ResponseKind),
    AdvanceTrial,
    NewStudent,
    SaveReport,
    ExportCsv,
}

/// What the main loop should do after a key was handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Continue,
    Quit,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub trials: usize,
    pub report_dir: PathBuf,
}

/// Owns the whole interaction state: the intake form, the in-progress
/// session (at most one), the last completed record, and the process-lifetime
/// class roster. The terminal loop threads key events through [`App::on_key`]
/// and renders the result.
pub struct App {
    pub config: AppConfig,
    pub screen: Screen,
    pub form: IntakeForm,
    pub roster: ClassRoster,
    pub last_result: Option<ResultRecord>,
    /// One-line status shown in the footer (saved file, internal error)
    pub notice: Option<String>,
    session: Option<TrialSession>,
    symbols: Box<dyn SymbolSource>,
}

impl App {
    pub fn new(config: AppConfig, symbols: Box<dyn SymbolSource>) -> Self {
        Self {
            config,
            screen: Screen::Intake,
            form: IntakeForm::default(),
            roster: ClassRoster::new(),
            last_result: None,
            notice: None,
            session: None,
            symbols,
        }
    }

    pub fn session(&self) -> Option<&TrialSession> {
        self.session.as_ref()
    }

    /// Translate a key press into core events for the current screen.
    pub fn on_key(&mut self, key: KeyEvent) -> Control {
        if key.code == KeyCode::Esc
            || (key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c'))
        {
            return Control::Quit;
        }

        match self.screen {
            Screen::Intake => self.on_intake_key(key),
            Screen::Trial => self.on_trial_key(key),
            Screen::Results => self.on_results_key(key),
        }

        Control::Continue
    }

    fn on_intake_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Tab | KeyCode::Up | KeyCode::Down => self.form.toggle_field(),
            KeyCode::Backspace => self.form.backspace(),
            KeyCode::Enter => match self.form.validate() {
                Ok((name, class_name)) => {
                    self.dispatch(AppEvent::Start { name, class_name });
                }
                Err(message) => self.form.error = Some(message),
            },
            KeyCode::Char(c) => self.form.type_char(c),
            _ => {}
        }
    }

    fn on_trial_key(&mut self, key: KeyEvent) {
        let phase = match &self.session {
            Some(session) => session.phase(),
            None => return,
        };

        match (phase, key.code) {
            (Phase::Target, KeyCode::Enter | KeyCode::Char(' ')) => {
                self.dispatch(AppEvent::AdvanceToStimulus);
            }
            (Phase::Stimulus, KeyCode::Char('t')) => {
                self.dispatch(AppEvent::Respond(ResponseKind::MatchClaim));
            }
            (Phase::Stimulus, KeyCode::Char('s') | KeyCode::Char(' ')) => {
                self.dispatch(AppEvent::Respond(ResponseKind::Skip));
            }
            _ => {}
        }
    }

    fn on_results_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('d') => self.dispatch(AppEvent::SaveReport),
            KeyCode::Char('c') => self.dispatch(AppEvent::ExportCsv),
            KeyCode::Char('n') => self.dispatch(AppEvent::NewStudent),
            _ => {}
        }
    }

    fn dispatch(&mut self, event: AppEvent) {
        // A transition rejection here is a bug in the key mapping above, not
        // in the student's input. Surface it in the footer and keep running.
        if let Err(err) = self.apply(event, Instant::now()) {
            self.notice = Some(format!("internal error: {err}"));
        }
    }

    /// Apply one core event at the given instant. Headless tests drive the
    /// app through here with scripted timestamps.
    pub fn apply(&mut self, event: AppEvent, now: Instant) -> Result<(), InvalidTransition> {
        match event {
            AppEvent::Start { name, class_name } => {
                self.form.name = name;
                self.form.class_name = class_name;
                self.session = Some(TrialSession::new(self.config.trials, &mut *self.symbols));
                self.last_result = None;
                self.notice = None;
                self.screen = Screen::Trial;
                // A zero-trial run has nothing to collect
                if self.session.as_ref().is_some_and(|s| s.is_complete()) {
                    self.finish_session();
                }
            }
            AppEvent::AdvanceToStimulus => {
                if let Some(session) = self.session.as_mut() {
                    session.advance_to_stimulus(&mut *self.symbols, now)?;
                }
            }
            AppEvent::Respond(kind) => {
                if let Some(session) = self.session.as_mut() {
                    session.respond(kind, now)?;
                    // The reference flows straight through its "next" phase;
                    // advancing stays a guarded operation but needs no
                    // separate user action
                    self.apply(AppEvent::AdvanceTrial, now)?;
                }
            }
            AppEvent::AdvanceTrial => {
                if let Some(session) = self.session.as_mut() {
                    session.advance_trial(&mut *self.symbols)?;
                    if session.is_complete() {
                        self.finish_session();
                    }
                }
            }
            AppEvent::NewStudent => {
                self.session = None;
                self.last_result = None;
                self.notice = None;
                self.form = IntakeForm::default();
                self.screen = Screen::Intake;
            }
            AppEvent::SaveReport => self.save_report(),
            AppEvent::ExportCsv => self.export_csv(),
        }
        Ok(())
    }

    fn finish_session(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };
        let record = score(&session).into_record(&self.form.name, &self.form.class_name);
        self.roster.record(record.clone());
        self.last_result = Some(record);
        self.screen = Screen::Results;
    }

    fn save_report(&mut self) {
        let Some(record) = &self.last_result else {
            return;
        };
        let path = self.config.report_dir.join(report::suggested_filename(record));
        let outcome = report::render_pdf(record).map_err(|e| e.to_string()).and_then(|bytes| {
            std::fs::write(&path, bytes).map_err(|e| e.to_string())
        });
        self.notice = Some(match outcome {
            Ok(()) => format!("Saved {}", path.display()),
            Err(err) => format!("Could not save report: {err}"),
        });
    }

    fn export_csv(&mut self) {
        let path = self.config.report_dir.join("class_dashboard.csv");
        let outcome = self.roster.to_csv().map_err(|e| e.to_string()).and_then(|bytes| {
            std::fs::write(&path, bytes).map_err(|e| e.to_string())
        });
        self.notice = Some(match outcome {
            Ok(()) => format!("Saved {}", path.display()),
            Err(err) => format!("Could not export dashboard: {err}"),
        });
    }
}
