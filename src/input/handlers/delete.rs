// src/input/handlers/delete.rs
use super::nav::nav_common;
use crate::editor::{Engine, Host, Mode};
use crate::input::key::Key;
use crate::input::keymap::KeyRouter;
use crate::input::repeat::Origin;

pub fn handle_delete_mode<H: Host, R: KeyRouter>(engine: &mut Engine<H, R>, key: Key, origin: Origin) {
    engine.repeat.push(key, origin);

    if nav_common(engine, key) {
        return;
    }

    match key {
        Key::Char('d') => engine.transition(Mode::Normal, false, false),
        // change: delete, then straight into insert
        Key::Char('c') => {
            engine.transition(Mode::Normal, false, false);
            engine.transition(Mode::Insert, false, false);
        }
        k if k.is_cancel() => engine.transition(Mode::Normal, false, true),
        _ => {
            engine.repeat.pop(origin);
            engine.report_unhandled(key);
        }
    }
}
