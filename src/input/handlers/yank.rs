// src/input/handlers/yank.rs
use super::nav::nav_common;
use crate::editor::{Engine, Host, Mode};
use crate::input::key::Key;
use crate::input::keymap::KeyRouter;
use crate::input::repeat::Origin;

// Yanks are never recorded for `.`
pub fn handle_yank_mode<H: Host, R: KeyRouter>(engine: &mut Engine<H, R>, key: Key, _origin: Origin) {
    if nav_common(engine, key) {
        return;
    }

    match key {
        Key::Char('y') => engine.transition(Mode::Normal, false, false),
        k if k.is_cancel() => engine.transition(Mode::Normal, false, true),
        _ => engine.report_unhandled(key),
    }
}
