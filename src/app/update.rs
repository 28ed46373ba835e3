use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use std::sync::Arc;
use std::time::Duration;

use crate::app::effects::Effects;
use crate::app::keymap::KeyAction;
use crate::app::reducer::{self, Msg};
use crate::app::{AppState, FormFocus, InputMode};
use crate::directory::UserDirectory;
use crate::ui;

/// What the event loop should do after a key press.
#[derive(Debug)]
pub enum KeyOutcome {
    Continue,
    Quit,
    Dispatch(Msg),
}

pub fn run_app(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    mut app: AppState,
    directory: Arc<dyn UserDirectory>,
) -> Result<()> {
    let (effects, inbox) = Effects::new(directory);

    // The list is fetched once on start; `r` asks again.
    dispatch(&mut app, &effects, Msg::LoadRequested)?;

    loop {
        while let Ok(msg) = inbox.try_recv() {
            dispatch(&mut app, &effects, msg)?;
        }

        terminal.draw(|f| {
            ui::render(f, &mut app);
        })?;

        if event::poll(Duration::from_millis(100))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match handle_key(&mut app, key) {
                        KeyOutcome::Quit => break,
                        KeyOutcome::Dispatch(msg) => dispatch(&mut app, &effects, msg)?,
                        KeyOutcome::Continue => {}
                    }
                }
            }
        }
    }
    tracing::info!("quitting");
    Ok(())
}

/// Apply `msg` and hand any resulting command to the executor.
pub fn dispatch(app: &mut AppState, effects: &Effects, msg: Msg) -> Result<()> {
    if let Some(command) = reducer::update(app, msg) {
        let request = command.request();
        effects
            .spawn(command)
            .with_context(|| format!("spawn worker for request {request}"))?;
    }
    Ok(())
}

/// Translate a key press. Navigation and mode switches are applied here
/// directly; dashboard operations are returned as messages.
pub fn handle_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    if app.show_help {
        app.show_help = false;
        return KeyOutcome::Continue;
    }
    match app.input_mode {
        InputMode::Normal => handle_normal_key(app, &key),
        InputMode::Search => handle_search_key(app, key),
        InputMode::Modal => handle_modal_key(app, key),
    }
}

fn handle_normal_key(app: &mut AppState, key: &KeyEvent) -> KeyOutcome {
    let Some(action) = app.keymap.resolve(key) else {
        return KeyOutcome::Continue;
    };
    match action {
        KeyAction::Quit => KeyOutcome::Quit,
        KeyAction::OpenHelp => {
            app.show_help = true;
            KeyOutcome::Continue
        }
        KeyAction::StartSearch => {
            app.input_mode = InputMode::Search;
            KeyOutcome::Continue
        }
        KeyAction::AddUser => KeyOutcome::Dispatch(Msg::OpenCreate),
        KeyAction::EditSelection => match app.selected_user() {
            Some(user) => KeyOutcome::Dispatch(Msg::OpenEdit(user.clone())),
            None => KeyOutcome::Continue,
        },
        KeyAction::DeleteSelection => match app.selected_user() {
            Some(user) => KeyOutcome::Dispatch(Msg::DeleteRequested(user.id.clone())),
            None => KeyOutcome::Continue,
        },
        KeyAction::Reload => KeyOutcome::Dispatch(Msg::LoadRequested),
        KeyAction::MoveUp => {
            app.move_selection(-1);
            KeyOutcome::Continue
        }
        KeyAction::MoveDown => {
            app.move_selection(1);
            KeyOutcome::Continue
        }
        KeyAction::PageUp => {
            let step = page(app);
            app.move_selection(-step);
            KeyOutcome::Continue
        }
        KeyAction::PageDown => {
            let step = page(app);
            app.move_selection(step);
            KeyOutcome::Continue
        }
        KeyAction::Ignore => KeyOutcome::Continue,
    }
}

fn page(app: &AppState) -> isize {
    isize::try_from(app.rows_per_page.max(1)).unwrap_or(isize::MAX)
}

fn handle_search_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Enter | KeyCode::Esc => {
            app.input_mode = InputMode::Normal;
            KeyOutcome::Continue
        }
        KeyCode::Backspace => {
            let mut text = app.search.clone();
            if text.pop().is_none() {
                return KeyOutcome::Continue;
            }
            KeyOutcome::Dispatch(Msg::SearchChanged(text))
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let mut text = app.search.clone();
            text.push(c);
            KeyOutcome::Dispatch(Msg::SearchChanged(text))
        }
        _ => KeyOutcome::Continue,
    }
}

fn handle_modal_key(app: &mut AppState, key: KeyEvent) -> KeyOutcome {
    match key.code {
        KeyCode::Esc => KeyOutcome::Dispatch(Msg::CloseModal),
        KeyCode::Tab | KeyCode::Down => {
            app.form_focus = app.form_focus.next();
            KeyOutcome::Continue
        }
        KeyCode::BackTab | KeyCode::Up => {
            app.form_focus = app.form_focus.prev();
            KeyOutcome::Continue
        }
        KeyCode::Enter => match app.form_focus {
            FormFocus::Cancel => KeyOutcome::Dispatch(Msg::CloseModal),
            FormFocus::Field(_) | FormFocus::Save => KeyOutcome::Dispatch(Msg::Submit),
        },
        KeyCode::Backspace => {
            let FormFocus::Field(field) = app.form_focus else {
                return KeyOutcome::Continue;
            };
            let mut value = app.form.get(field).to_string();
            if value.pop().is_none() {
                return KeyOutcome::Continue;
            }
            KeyOutcome::Dispatch(Msg::FormFieldChanged(field, value))
        }
        KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
            let FormFocus::Field(field) = app.form_focus else {
                return KeyOutcome::Continue;
            };
            let mut value = app.form.get(field).to_string();
            value.push(c);
            KeyOutcome::Dispatch(Msg::FormFieldChanged(field, value))
        }
        _ => KeyOutcome::Continue,
    }
}
