use std::time::Instant;

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent};

use super::app::{App, Mode};
use crate::storage::Storage;

pub enum KeyAction {
    Quit,
    Continue,
}

/// Handle a key press for the current mode.
pub fn handle_key<S: Storage>(
    app: &mut App<S>,
    key: KeyEvent,
    now: Instant,
) -> Result<KeyAction> {
    match app.mode {
        Mode::Normal => match key.code {
            KeyCode::Char('q') | KeyCode::Esc => return Ok(KeyAction::Quit),
            KeyCode::Char('j') | KeyCode::Down => app.move_down(),
            KeyCode::Char('k') | KeyCode::Up => app.move_up(),
            KeyCode::Char(' ') => app.toggle_selected()?,
            KeyCode::Char('d') => app.delete_selected()?,
            KeyCode::Char('a') => app.open_add_form(),
            KeyCode::Char('/') => app.mode = Mode::Search,
            KeyCode::Char('f') => app.cycle_filter(),
            KeyCode::Char('r') => app.reload()?,
            KeyCode::Char('?') => app.mode = Mode::Help,
            _ => {}
        },

        Mode::Search => match key.code {
            KeyCode::Esc | KeyCode::Enter => app.mode = Mode::Normal,
            KeyCode::Backspace => app.search_pop(now),
            KeyCode::Char(c) => app.search_push(c, now),
            _ => {}
        },

        Mode::Add => match key.code {
            KeyCode::Esc => app.cancel_add_form(),
            KeyCode::Enter => {
                // stays open with the error shown when invalid
                app.submit_add()?;
            }
            KeyCode::Tab | KeyCode::Down => {
                if let Some(form) = app.add_form.as_mut() {
                    form.next_field();
                }
            }
            KeyCode::BackTab | KeyCode::Up => {
                if let Some(form) = app.add_form.as_mut() {
                    form.prev_field();
                }
            }
            KeyCode::Backspace => {
                if let Some(form) = app.add_form.as_mut() {
                    form.focused_buf_mut().pop();
                }
            }
            KeyCode::Char(c) => {
                if let Some(form) = app.add_form.as_mut() {
                    form.focused_buf_mut().push(c);
                }
            }
            _ => {}
        },

        Mode::Help => app.mode = Mode::Normal,
    }
    Ok(KeyAction::Continue)
}
