// src/input/mod.rs
pub mod command_line;
mod handlers;
pub mod key;
pub mod keymap;
pub mod repeat;
pub mod till;

pub use key::Key;
pub use keymap::{KeyRouter, MemoryRouter};
pub use repeat::Origin;

use log::{debug, trace};

use crate::editor::{Engine, Host};
use command_line::CommandLineEvent;

impl<H: Host, R: KeyRouter> Engine<H, R> {
    /// Feed one typed key to the engine.
    pub fn take_key(&mut self, key: Key) {
        self.dispatch(key, Origin::Typed);
    }

    pub(crate) fn dispatch(&mut self, key: Key, origin: Origin) {
        trace!("[{}] key {} ({:?})", self.mode.display_name(), key, origin);

        if self.command_line.is_active() {
            self.feed_command_line(key);
            return;
        }

        let handler = handlers::handler_for::<H, R>(self.mode);
        handler(self, key, origin);
    }

    /// Replay the recorded gesture. Does nothing when already replaying.
    pub(crate) fn replay(&mut self, origin: Origin) {
        if origin.is_replay() {
            return;
        }
        let keys = self.repeat.keys().to_vec();
        debug!("replaying {}", Key::sequence_to_string(&keys));
        for key in keys {
            self.dispatch(key, Origin::Replayed);
        }
    }

    fn feed_command_line(&mut self, key: Key) {
        match self.command_line.take_key(key) {
            CommandLineEvent::Edited(text) => self.host.set_command_text(&text),
            CommandLineEvent::Cancelled => {
                self.host.set_prompt(None);
                self.host.set_command_text("");
            }
            CommandLineEvent::Submitted(line) => {
                self.host.set_prompt(None);
                self.host.set_command_text("");
                self.execute_line(&line);
            }
        }
    }
}
