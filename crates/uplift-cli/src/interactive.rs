use std::io::Write;

use anyhow::{Context, Result};
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::terminal::{Clear, ClearType};
use crossterm::{cursor, execute, terminal};
use uplift_engine::SelectionSession;

use crate::render::{colorize, cursor_style, format_selection_lines, SELECTION_HEADER_ROWS};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ViewCommand {
    MoveUp,
    MoveDown,
    Select,
    Unselect,
    Toggle,
    SelectAll,
    UnselectAll,
    Commit,
    Quit,
}

/// Translate one key event into a session command. Pure; the raw-mode
/// loop is just this mapping applied to the live session.
pub(crate) fn command_for_key(key: &KeyEvent) -> Option<ViewCommand> {
    if key.kind != KeyEventKind::Press {
        return None;
    }
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        return Some(ViewCommand::Quit);
    }

    match key.code {
        KeyCode::Up | KeyCode::Char('k') => Some(ViewCommand::MoveUp),
        KeyCode::Down | KeyCode::Char('j') => Some(ViewCommand::MoveDown),
        KeyCode::Char('s') => Some(ViewCommand::Select),
        KeyCode::Char('u') => Some(ViewCommand::Unselect),
        KeyCode::Char(' ') => Some(ViewCommand::Toggle),
        KeyCode::Char('a') => Some(ViewCommand::SelectAll),
        KeyCode::Char('n') => Some(ViewCommand::UnselectAll),
        KeyCode::Char('x') | KeyCode::Enter => Some(ViewCommand::Commit),
        KeyCode::Char('q') | KeyCode::Esc => Some(ViewCommand::Quit),
        _ => None,
    }
}

/// Run the selection list until the operator commits or quits.
///
/// Returns the committed indices, or `None` when the session was
/// discarded. Terminal teardown runs on every exit path, including when
/// the loop itself errors, before any batch output is printed.
pub(crate) fn run_selection_view(session: &mut SelectionSession) -> Result<Option<Vec<usize>>> {
    terminal::enable_raw_mode().context("failed to enter raw terminal mode")?;
    let outcome = drive_selection_loop(session);
    restore_terminal();
    outcome
}

fn restore_terminal() {
    let _ = terminal::disable_raw_mode();
    let mut stdout = std::io::stdout();
    let _ = execute!(stdout, cursor::Show);
    println!();
}

fn drive_selection_loop(session: &mut SelectionSession) -> Result<Option<Vec<usize>>> {
    let mut stdout = std::io::stdout();
    let mut cursor_row = 0_usize;

    loop {
        draw_selection_view(&mut stdout, session, cursor_row)?;

        let Event::Key(key) = event::read().context("failed to read terminal event")? else {
            continue;
        };
        let Some(command) = command_for_key(&key) else {
            continue;
        };

        match command {
            ViewCommand::MoveUp => cursor_row = cursor_row.saturating_sub(1),
            ViewCommand::MoveDown => {
                if cursor_row + 1 < session.len() {
                    cursor_row += 1;
                }
            }
            ViewCommand::Select => session.select(cursor_row)?,
            ViewCommand::Unselect => session.unselect(cursor_row)?,
            ViewCommand::Toggle => session.toggle(cursor_row)?,
            ViewCommand::SelectAll => session.select_all(),
            ViewCommand::UnselectAll => session.unselect_all(),
            ViewCommand::Commit => return Ok(Some(session.selected_indices())),
            ViewCommand::Quit => return Ok(None),
        }
    }
}

fn draw_selection_view(
    stdout: &mut std::io::Stdout,
    session: &SelectionSession,
    cursor_row: usize,
) -> Result<()> {
    execute!(stdout, cursor::Hide, Clear(ClearType::All), cursor::MoveTo(0, 0))
        .context("failed to clear terminal")?;

    for (row, line) in format_selection_lines(session).iter().enumerate() {
        let rendered = if row.checked_sub(SELECTION_HEADER_ROWS) == Some(cursor_row) {
            colorize(cursor_style(), line)
        } else {
            line.clone()
        };
        // Raw mode needs explicit carriage returns.
        write!(stdout, "{rendered}\r\n").context("failed to write selection view")?;
    }

    stdout.flush().context("failed to flush selection view")?;
    Ok(())
}
