// src/input/handlers/normal.rs
use super::nav::nav_common;
use crate::editor::{Engine, Host, HostAction, Mode};
use crate::input::key::Key;
use crate::input::keymap::KeyRouter;
use crate::input::repeat::Origin;

pub fn handle_normal_mode<H: Host, R: KeyRouter>(engine: &mut Engine<H, R>, key: Key, origin: Origin) {
    if nav_common(engine, key) {
        return;
    }

    match key {
        // Operators
        Key::Char('d') | Key::Char('D') => {
            engine.host.execute(HostAction::SelectOff);
            engine.repeat.start(key, origin);
            engine.transition(Mode::Delete, key == Key::Char('D'), false);
        }
        Key::Char('y') | Key::Char('Y') => {
            engine.host.execute(HostAction::SelectOff);
            engine.transition(Mode::Yank, key == Key::Char('Y'), false);
        }
        Key::Char('v') => engine.host.execute(HostAction::Select),
        Key::Char('V') => engine.host.execute(HostAction::SelectLines),
        Key::Char('p') => {
            engine.repeat.start(key, origin);
            engine.host.execute(HostAction::PasteYankBuffer);
        }

        // Entering insert
        Key::Char('a') | Key::Char('A') | Key::Char('i') => {
            engine.host.execute(HostAction::SelectOff);
            engine.repeat.start(key, origin);
            match key {
                Key::Char('a') => engine.host.execute(HostAction::CursorRight),
                Key::Char('A') => engine.host.execute(HostAction::LineEnd),
                _ => {}
            }
            engine.transition(Mode::Insert, false, false);
        }

        Key::Delete => {
            engine.host.execute(HostAction::SelectOff);
            engine.repeat.start(key, origin);
            engine.host.execute(HostAction::DeleteForward);
        }
        Key::Char('u') => engine.host.execute(HostAction::Undo),
        Key::Ctrl('r') => engine.host.execute(HostAction::Redo),
        Key::Char('.') => {
            engine.host.execute(HostAction::SelectOff);
            engine.replay(origin);
        }
        Key::Char(':') => engine.open_command_line(),
        Key::Ctrl('z') => engine.host.execute(HostAction::Suspend),
        k if k.is_cancel() => engine.host.execute(HostAction::SelectOff),
        _ => engine.report_unhandled(key),
    }
}
