// src/input/handlers/insert.rs
use crate::editor::{Engine, Host, HostAction, Mode};
use crate::input::key::Key;
use crate::input::keymap::KeyRouter;
use crate::input::repeat::Origin;

/// Every key is recorded for `.` before it is handled.
pub fn handle_insert_mode<H: Host, R: KeyRouter>(engine: &mut Engine<H, R>, key: Key, origin: Origin) {
    engine.repeat.push(key, origin);

    let action = match key {
        Key::Left => HostAction::CursorLeft,
        Key::Down => HostAction::CursorDown,
        Key::Up => HostAction::CursorUp,
        Key::Right => HostAction::CursorRight,
        Key::PageUp => HostAction::PageUp,
        Key::PageDown => HostAction::PageDown,
        Key::Home => HostAction::LineBegin,
        Key::End => HostAction::LineEnd,
        Key::Backspace => HostAction::DeleteBack,
        Key::Delete => HostAction::DeleteForward,
        k if k.is_cancel() => {
            engine.transition(Mode::Normal, false, true);
            return;
        }
        Key::Enter => HostAction::Insert('\n'),
        Key::Tab => HostAction::Insert('\t'),
        Key::Char(c) => HostAction::Insert(c),
        _ => {
            engine.repeat.pop(origin);
            engine.report_unhandled(key);
            return;
        }
    };
    engine.host.execute(action);
}
