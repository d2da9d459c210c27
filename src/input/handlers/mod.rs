// src/input/handlers/mod.rs
mod delete;
mod insert;
mod nav;
mod normal;
mod yank;

use crate::editor::{Engine, Host, Mode};
use crate::input::key::Key;
use crate::input::keymap::KeyRouter;
use crate::input::repeat::Origin;

/// A mode's key handler.
pub type Handler<H, R> = fn(&mut Engine<H, R>, Key, Origin);

pub fn handler_for<H: Host, R: KeyRouter>(mode: Mode) -> Handler<H, R> {
    match mode {
        Mode::Normal => normal::handle_normal_mode::<H, R>,
        Mode::Insert => insert::handle_insert_mode::<H, R>,
        Mode::Delete => delete::handle_delete_mode::<H, R>,
        Mode::Yank => yank::handle_yank_mode::<H, R>,
    }
}
