//! Key handling for the playground TUI.

use std::path::Path;
use std::sync::{Arc, Mutex};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use metaprompt::playground::{OutputView, Side};
use metaprompt::session::with_json_extension;
use metaprompt::ui::{UiState, dismiss_alert, load_from, save_to, show_alert};

use crate::app::{App, Focus, InputMode, PathAction};
use crate::{Command, TuiConfig};

const TAB_WIDTH: usize = 4;

pub(crate) fn handle_key_event(
    key: KeyEvent,
    app: &mut App,
    state: &Arc<Mutex<UiState>>,
    config: &TuiConfig,
) {
    // Ctrl+C always quits.
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // An open alert swallows the next key.
    let alert_open = state.lock().is_ok_and(|s| s.alert.is_some());
    if alert_open {
        dismiss_alert(state);
        return;
    }

    match app.input_mode {
        InputMode::Normal => handle_normal_key(key, app, state, config),
        InputMode::Editing => handle_edit_key(key, app, state),
        InputMode::PathEntry(action) => handle_path_key(key, app, state, action),
        InputMode::About => app.input_mode = InputMode::Normal,
    }
}

fn handle_normal_key(
    key: KeyEvent,
    app: &mut App,
    state: &Arc<Mutex<UiState>>,
    config: &TuiConfig,
) {
    match key.code {
        KeyCode::Char('q') => app.should_quit = true,
        KeyCode::Char(',') => app.toggle_logs(),
        KeyCode::Char('?') => app.input_mode = InputMode::About,
        KeyCode::Tab => app.focus_next(),
        KeyCode::BackTab => app.focus_prev(),
        KeyCode::Enter | KeyCode::Char('i') if app.focus.is_editable() => {
            app.input_mode = InputMode::Editing;
            app.scroll_to_end();
        }

        KeyCode::Char('a') => request_generation(config, state, &[Side::A]),
        KeyCode::Char('b') => request_generation(config, state, &[Side::B]),
        KeyCode::Char('g') => request_generation(config, state, &Side::ALL),

        KeyCode::Char('t') => {
            if let Some(side) = app.focus.side() {
                let view = state
                    .lock()
                    .ok()
                    .map(|mut s| s.playground.toggle_view(side));
                if let Some(view) = view {
                    tracing::debug!("Side {side} now shows {view:?}");
                }
                app.scroll_to_top(Focus::Output(side));
            }
        }
        KeyCode::Char('y') => {
            if let Focus::Output(side) = app.focus {
                copy_visible_result(app, state, side);
            }
        }
        KeyCode::Char('x') => {
            if let Ok(mut s) = state.lock() {
                match app.focus {
                    Focus::Output(side) => s.playground.clear_visible_result(side),
                    Focus::TestInput => s.playground.clear_test_input(),
                    Focus::Prompt(_) | Focus::Log => {}
                }
            }
            app.scroll_to_top(app.focus);
        }
        KeyCode::Char('d') => {
            if let Focus::Prompt(side) = app.focus {
                if let Ok(mut s) = state.lock() {
                    s.playground.reset_prompt(side);
                    s.status = format!("Prompt {side} reset to default");
                }
                app.scroll_to_top(app.focus);
            }
        }
        KeyCode::Char('e') => {
            if let Ok(mut s) = state.lock() {
                s.playground.load_example_input();
                s.status = "Loaded example input".into();
            }
            app.scroll_to_top(Focus::TestInput);
        }

        KeyCode::Char('s') => start_path_entry(app, state, config, PathAction::Save),
        KeyCode::Char('l') => start_path_entry(app, state, config, PathAction::Load),

        KeyCode::Up | KeyCode::Char('k') => app.scroll_up(3),
        KeyCode::Down | KeyCode::Char('j') => app.scroll_down(3),
        KeyCode::PageUp => app.scroll_up(20),
        KeyCode::PageDown => app.scroll_down(20),
        KeyCode::Home => app.scroll_to_top(app.focus),
        KeyCode::End => app.scroll_to_end(),
        _ => {}
    }
}

/// Queue generations. Sides already in flight are skipped with a status note.
fn request_generation(config: &TuiConfig, state: &Arc<Mutex<UiState>>, sides: &[Side]) {
    for &side in sides {
        let busy = state.lock().is_ok_and(|s| s.playground.is_busy(side));
        if busy {
            if let Ok(mut s) = state.lock() {
                s.status = format!("Generation {side} already in progress");
            }
            continue;
        }
        if config.commands.send(Command::Generate(side)).is_err() {
            tracing::error!("Generation {side} not sent: runtime is gone");
        }
    }
}

/// Copy whatever the side's result pane shows to the clipboard.
fn copy_visible_result(app: &mut App, state: &Arc<Mutex<UiState>>, side: Side) {
    let Some((text, view)) = state.lock().ok().map(|s| {
        (
            s.playground.visible_result(side).to_string(),
            s.playground.side(side).view,
        )
    }) else {
        return;
    };
    let what = match view {
        OutputView::Output => "output",
        OutputView::Reasoning => "reasoning",
    };

    if text.is_empty() {
        if let Ok(mut s) = state.lock() {
            s.status = format!("Nothing to copy in {side} {what}");
        }
        return;
    }

    match app.clipboard.write_text(&text) {
        Ok(()) => {
            if let Ok(mut s) = state.lock() {
                s.status = format!("Copied {side} {what}");
            }
        }
        Err(e) => {
            tracing::error!("Copy failed: {e}");
            show_alert(state, "Copy Error", &format!("Error copying {side} {what}: {e}"));
        }
    }
}

fn start_path_entry(
    app: &mut App,
    state: &Arc<Mutex<UiState>>,
    config: &TuiConfig,
    action: PathAction,
) {
    let last = state.lock().ok().and_then(|s| s.session_path.clone());
    app.path_buffer = match last {
        Some(path) => path.display().to_string(),
        None => format!("{}/", config.session_dir.display()),
    };
    app.input_mode = InputMode::PathEntry(action);
}

fn handle_edit_key(key: KeyEvent, app: &mut App, state: &Arc<Mutex<UiState>>) {
    if key.code == KeyCode::Esc {
        app.input_mode = InputMode::Normal;
        return;
    }

    let Ok(mut s) = state.lock() else {
        return;
    };
    let text = match app.focus {
        Focus::Prompt(side) => s.playground.prompt_mut(side),
        Focus::TestInput => s.playground.test_input_mut(),
        Focus::Output(_) | Focus::Log => {
            app.input_mode = InputMode::Normal;
            return;
        }
    };
    match key.code {
        KeyCode::Char(c) => text.push(c),
        KeyCode::Enter => text.push('\n'),
        KeyCode::Tab => text.push_str(&" ".repeat(TAB_WIDTH)),
        KeyCode::Backspace => {
            text.pop();
        }
        _ => return,
    }
    drop(s);
    app.scroll_to_end();
}

fn handle_path_key(
    key: KeyEvent,
    app: &mut App,
    state: &Arc<Mutex<UiState>>,
    action: PathAction,
) {
    match key.code {
        KeyCode::Esc => {
            app.path_buffer.clear();
            app.input_mode = InputMode::Normal;
        }
        KeyCode::Enter => {
            let typed = app.path_buffer.trim().to_string();
            app.path_buffer.clear();
            app.input_mode = InputMode::Normal;
            if typed.is_empty() || typed.ends_with('/') {
                return;
            }
            run_path_action(state, action, &with_json_extension(typed));
            if action == PathAction::Load {
                for side in Side::ALL {
                    app.scroll_to_top(Focus::Prompt(side));
                    app.scroll_to_top(Focus::Output(side));
                }
                app.scroll_to_top(Focus::TestInput);
            }
        }
        KeyCode::Backspace => {
            app.path_buffer.pop();
        }
        KeyCode::Char(c) => app.path_buffer.push(c),
        _ => {}
    }
}

/// Errors are already surfaced as alerts by the shared-state helpers.
fn run_path_action(state: &Arc<Mutex<UiState>>, action: PathAction, path: &Path) {
    let result = match action {
        PathAction::Save => save_to(state, path),
        PathAction::Load => load_from(state, path).map(|_| ()),
    };
    if result.is_ok() {
        tracing::info!("{} {}", action.label(), path.display());
    }
}
