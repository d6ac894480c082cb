//! Keyboard input handling for the TUI.
//!
//! Keys only change state or queue work; anything that touches the network
//! is queued as a `PendingAction` and run by the main loop after the next draw.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use crate::app::{
    can_add_date_char, can_add_password_char, App, AppState, PendingAction, PAGE_SCROLL_SIZE,
};

/// Handle keyboard input. Returns true if the app should quit.
pub fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match app.state {
        AppState::LoggingIn => return Ok(handle_login_input(app, key)),
        AppState::EditingDate => {
            handle_date_input(app, key);
            return Ok(false);
        }
        AppState::ShowingHelp => {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::Char('q')) {
                app.state = AppState::Normal;
            }
            return Ok(false);
        }
        AppState::ConfirmingQuit => {
            return Ok(match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => {
                    app.state = AppState::Quitting;
                    true
                }
                KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                    app.state = AppState::Normal;
                    false
                }
                _ => false,
            });
        }
        AppState::ShowingRaw => {
            handle_raw_input(app, key);
            return Ok(false);
        }
        AppState::Normal | AppState::Quitting => {}
    }

    match key.code {
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        KeyCode::Char('?') => app.state = AppState::ShowingHelp,
        KeyCode::Char('f') | KeyCode::Enter => app.queue(PendingAction::Fetch),
        KeyCode::Char('e') => app.export_csv(),
        KeyCode::Char('o') => app.logout(),
        KeyCode::Char('r') => app.toggle_raw(),
        KeyCode::Char('[') => app.previous_day(),
        KeyCode::Char(']') => app.next_day(),
        KeyCode::Char('t') => app.select_today(),
        KeyCode::Char('d') => app.start_date_edit(),
        KeyCode::Down | KeyCode::Char('j') => app.select_next_row(1),
        KeyCode::Up | KeyCode::Char('k') => app.select_prev_row(1),
        KeyCode::PageDown => app.select_next_row(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev_row(PAGE_SCROLL_SIZE),
        KeyCode::Home => app.row_selection = 0,
        KeyCode::Right | KeyCode::Char('l') => app.scroll_right(),
        KeyCode::Left | KeyCode::Char('h') => app.scroll_left(),
        _ => {}
    }

    Ok(false)
}

fn handle_login_input(app: &mut App, key: KeyEvent) -> bool {
    match key.code {
        KeyCode::Esc => {
            // Quit if on login screen
            app.state = AppState::Quitting;
            return true;
        }
        KeyCode::Enter => app.queue(PendingAction::Login),
        KeyCode::Backspace => {
            app.login_password.pop();
        }
        KeyCode::Char(c) => {
            if can_add_password_char(app.login_password.chars().count(), c) {
                app.login_password.push(c);
            }
        }
        _ => {}
    }
    false
}

fn handle_date_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.cancel_date_edit(),
        KeyCode::Enter => app.commit_date_edit(),
        KeyCode::Backspace => {
            app.date_input.pop();
        }
        KeyCode::Char(c) => {
            if can_add_date_char(app.date_input.len(), c) {
                app.date_input.push(c);
            }
        }
        _ => {}
    }
}

fn handle_raw_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') | KeyCode::Esc => app.toggle_raw(),
        KeyCode::Down | KeyCode::Char('j') => app.raw_scroll = app.raw_scroll.saturating_add(1),
        KeyCode::Up | KeyCode::Char('k') => app.raw_scroll = app.raw_scroll.saturating_sub(1),
        KeyCode::PageDown => {
            app.raw_scroll = app.raw_scroll.saturating_add(PAGE_SCROLL_SIZE as u16)
        }
        KeyCode::PageUp => app.raw_scroll = app.raw_scroll.saturating_sub(PAGE_SCROLL_SIZE as u16),
        KeyCode::Char('q') => app.state = AppState::ConfirmingQuit,
        _ => {}
    }
}
