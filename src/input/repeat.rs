// src/input/repeat.rs
use super::key::Key;

/// Where a key entering the dispatcher came from. Replayed keys must never
/// be recorded again, and a replay never starts another one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    Typed,
    Replayed,
}

impl Origin {
    pub fn is_replay(&self) -> bool {
        matches!(self, Origin::Replayed)
    }
}

/// Key-by-key recipe of the last repeatable gesture, replayed on `.`.
#[derive(Debug, Clone, Default)]
pub struct RepeatRecorder {
    keys: Vec<Key>,
}

impl RepeatRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin a new gesture with `key` as its first key.
    pub fn start(&mut self, key: Key, origin: Origin) {
        if origin.is_replay() {
            return;
        }
        self.keys.clear();
        self.keys.push(key);
    }

    pub fn push(&mut self, key: Key, origin: Origin) {
        if origin.is_replay() {
            return;
        }
        self.keys.push(key);
    }

    /// Drop the most recent key, used when a recorded key turns out unhandled.
    pub fn pop(&mut self, origin: Origin) {
        if origin.is_replay() {
            return;
        }
        self.keys.pop();
    }

    pub fn keys(&self) -> &[Key] {
        &self.keys
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_start_restarts_recording() {
        let mut rec = RepeatRecorder::new();
        rec.start(Key::Char('d'), Origin::Typed);
        rec.push(Key::Char('w'), Origin::Typed);
        rec.start(Key::Char('i'), Origin::Typed);
        assert_eq!(rec.keys(), &[Key::Char('i')]);
    }

    #[test]
    fn test_replayed_keys_are_not_recorded() {
        let mut rec = RepeatRecorder::new();
        rec.start(Key::Char('d'), Origin::Typed);
        rec.push(Key::Char('d'), Origin::Typed);

        rec.start(Key::Char('d'), Origin::Replayed);
        rec.push(Key::Char('x'), Origin::Replayed);
        rec.pop(Origin::Replayed);

        assert_eq!(rec.keys(), &[Key::Char('d'), Key::Char('d')]);
    }

    #[test]
    fn test_pop_removes_last_key() {
        let mut rec = RepeatRecorder::new();
        rec.start(Key::Char('i'), Origin::Typed);
        rec.push(Key::Ctrl('x'), Origin::Typed);
        rec.pop(Origin::Typed);
        assert_eq!(rec.keys(), &[Key::Char('i')]);
    }
}
