use std::io;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::model::InferenceModel;
use crate::predictor::{ModelHandle, Session};
use crate::ui::draw;
use crate::ui::form::{FormAction, FormState};

struct TerminalGuard;

impl TerminalGuard {
    fn enter() -> Result<Self> {
        enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen)?;
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
    }
}

/// Form plus the session it drives.
pub struct App<M> {
    pub form: FormState,
    pub session: Session<M>,
}

impl<M: InferenceModel> App<M> {
    pub fn new(session: Session<M>) -> Self {
        Self {
            form: FormState::new(),
            session,
        }
    }

    /// Returns `true` when the user asked to quit.
    pub fn handle_key(&mut self, key: KeyCode) -> bool {
        if self.session.is_halted() {
            return matches!(key, KeyCode::Esc | KeyCode::Char('q'));
        }
        match self.form.handle_key(key) {
            FormAction::Quit => true,
            FormAction::Predict => {
                self.session.trigger(self.form.applicant());
                false
            }
            FormAction::None => false,
        }
    }
}

/// Runs the form until the user quits.
///
/// # Errors
/// Returns an error if terminal setup or rendering fails. Model problems are
/// shown on screen instead.
pub fn run<M: InferenceModel>(handle: &ModelHandle<M>) -> Result<()> {
    let mut app = App::new(Session::open(handle));

    let _guard = TerminalGuard::enter()?;
    let backend = CrosstermBackend::new(io::stdout());
    let mut terminal = Terminal::new(backend)?;
    terminal.clear()?;

    loop {
        terminal.draw(|f| draw::draw(f, &app))?;

        if event::poll(Duration::from_millis(120))? {
            if let Event::Key(k) = event::read()? {
                if k.kind != KeyEventKind::Press {
                    continue;
                }
                if app.handle_key(k.code) {
                    break;
                }
            }
        }
    }

    terminal.show_cursor()?;
    Ok(())
}
