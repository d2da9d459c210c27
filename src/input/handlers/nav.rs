// src/input/handlers/nav.rs
use crate::editor::{Engine, Host, HostAction};
use crate::input::key::Key;
use crate::input::keymap::KeyRouter;
use crate::input::till::{find_backward, find_forward, TillDirection};

/// Largest count prefix a motion accepts.
const MAX_COUNT: usize = 9999;

/// Navigation shared by Normal, Delete and Yank. Returns false when the key
/// is not a navigation key.
pub fn nav_common<H: Host, R: KeyRouter>(engine: &mut Engine<H, R>, key: Key) -> bool {
    if engine.till.pending().is_some() {
        let target = match key {
            Key::Char(c) => Some(c),
            _ => None,
        };
        if let (Some(direction), Some(c)) = (engine.till.take(target), target) {
            till(engine, direction, c);
        }
        engine.count = None;
        return true;
    }

    // Count prefix: 0 is only a digit once a count is pending
    if let Some(digit) = key.digit() {
        if digit > 0 || engine.count.is_some() {
            let count = engine.count.unwrap_or(0);
            engine.count = Some((count * 10 + digit).min(MAX_COUNT));
            return true;
        }
    }
    let count = engine.count.take().unwrap_or(1);

    let motion = match key {
        Key::Char('h') | Key::Left => Some(HostAction::CursorLeft),
        Key::Char('j') | Key::Down => Some(HostAction::CursorDown),
        Key::Char('k') | Key::Up => Some(HostAction::CursorUp),
        Key::Char('l') | Key::Right => Some(HostAction::CursorRight),
        // TODO: W, B and E should move by whitespace-delimited WORDs
        Key::Char('w' | 'W') => Some(HostAction::NextWord),
        Key::Char('b' | 'B') => Some(HostAction::PrevWord),
        Key::Char('e' | 'E') => Some(HostAction::NextWordEnd),
        _ => None,
    };
    if let Some(action) = motion {
        for _ in 0..count {
            engine.host.execute(action.clone());
        }
        return true;
    }

    let action = match key {
        Key::PageUp => HostAction::PageUp,
        Key::PageDown => HostAction::PageDown,
        Key::Char('0') | Key::Home => HostAction::LineBegin,
        Key::Char('$') | Key::End => HostAction::LineEnd,
        Key::Char('{') => HostAction::PrevParagraph,
        Key::Char('}') => HostAction::NextParagraph,
        Key::Char('g') => HostAction::BufferBegin,
        Key::Char('G') => HostAction::BufferEnd,
        Key::Char('/') => HostAction::FindInBuffer,
        Key::Char('?') => HostAction::ReplaceCurrentSearch,
        Key::Char('n') => HostAction::FindNext,
        Key::Char('N') => HostAction::FindPrev,
        Key::Char(op @ ('f' | 't' | 'F' | 'T')) => {
            engine.till.request(op);
            return true;
        }
        Key::Char(';') => {
            if let Some((direction, c)) = engine.till.last() {
                till(engine, direction, c);
            }
            return true;
        }
        _ => return false,
    };
    engine.host.execute(action);
    true
}

// Move within the cursor's line; no match leaves the cursor alone
fn till<H: Host, R: KeyRouter>(engine: &mut Engine<H, R>, direction: TillDirection, target: char) {
    let Some((row, col)) = engine.host.cursor() else {
        return;
    };
    let Some(line) = engine.host.line(row) else {
        return;
    };
    let found = match direction {
        TillDirection::Forward => find_forward(&line, col, target),
        TillDirection::Backward => find_backward(&line, col, target, false),
        TillDirection::BackwardStopBefore => find_backward(&line, col, target, true),
    };
    if let Some(col) = found {
        engine.host.set_cursor(row, col);
    }
}
