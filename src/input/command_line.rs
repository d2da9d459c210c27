// src/input/command_line.rs
use super::key::Key;

pub const PROMPT: &str = ":";

/// Result of feeding one key to the command line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandLineEvent {
    /// Still editing; the current line content
    Edited(String),
    Cancelled,
    /// Enter was pressed with this line
    Submitted(String),
}

/// Readline-style editable line with cursor and history navigation.
#[derive(Debug, Clone, Default)]
pub struct LineEditor {
    chars: Vec<char>,
    cursor: usize,
    // Position in history while browsing, and the line being typed before
    history_pos: Option<usize>,
    stash: Vec<char>,
}

impl LineEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn content(&self) -> String {
        self.chars.iter().collect()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Apply an editing key. Keys with no line-editing meaning are ignored.
    pub fn take_key(&mut self, key: Key, history: &[String]) {
        match key {
            Key::Char(c) => {
                self.chars.insert(self.cursor, c);
                self.cursor += 1;
            }
            Key::Tab => {
                self.chars.insert(self.cursor, ' ');
                self.cursor += 1;
            }
            Key::Backspace | Key::Ctrl('h') => {
                if self.cursor > 0 {
                    self.cursor -= 1;
                    self.chars.remove(self.cursor);
                }
            }
            Key::Delete => {
                if self.cursor < self.chars.len() {
                    self.chars.remove(self.cursor);
                }
            }
            Key::Left | Key::Ctrl('b') => self.cursor = self.cursor.saturating_sub(1),
            Key::Right | Key::Ctrl('f') => self.cursor = (self.cursor + 1).min(self.chars.len()),
            Key::Home | Key::Ctrl('a') => self.cursor = 0,
            Key::End | Key::Ctrl('e') => self.cursor = self.chars.len(),
            Key::Ctrl('u') => {
                self.chars.drain(..self.cursor);
                self.cursor = 0;
            }
            Key::Ctrl('w') => self.delete_word_backward(),
            Key::Up | Key::Ctrl('p') => self.history_prev(history),
            Key::Down | Key::Ctrl('n') => self.history_next(history),
            _ => {}
        }
    }

    fn delete_word_backward(&mut self) {
        let mut start = self.cursor;
        while start > 0 && self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        while start > 0 && !self.chars[start - 1].is_whitespace() {
            start -= 1;
        }
        self.chars.drain(start..self.cursor);
        self.cursor = start;
    }

    fn set_line(&mut self, chars: Vec<char>) {
        self.chars = chars;
        self.cursor = self.chars.len();
    }

    fn history_prev(&mut self, history: &[String]) {
        let pos = match self.history_pos {
            None if history.is_empty() => return,
            None => {
                self.stash = self.chars.clone();
                history.len() - 1
            }
            Some(0) => return,
            Some(pos) => pos - 1,
        };
        self.history_pos = Some(pos);
        self.set_line(history[pos].chars().collect());
    }

    fn history_next(&mut self, history: &[String]) {
        let Some(pos) = self.history_pos else {
            return;
        };
        if pos + 1 < history.len() {
            self.history_pos = Some(pos + 1);
            self.set_line(history[pos + 1].chars().collect());
        } else {
            self.history_pos = None;
            let stash = std::mem::take(&mut self.stash);
            self.set_line(stash);
        }
    }
}

/// The interactive `:` sub-mode. History outlives each invocation.
#[derive(Debug, Clone, Default)]
pub struct CommandLine {
    active: bool,
    editor: LineEditor,
    history: Vec<String>,
}

impl CommandLine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active
    }

    pub fn start(&mut self) {
        self.active = true;
        self.editor.reset();
    }

    /// The line as typed so far
    pub fn content(&self) -> String {
        self.editor.content()
    }

    pub fn history(&self) -> &[String] {
        &self.history
    }

    /// Feed one key. Enter submits the line and records it in history, except
    /// blank lines, which are submitted but not recorded.
    pub fn take_key(&mut self, key: Key) -> CommandLineEvent {
        if key.is_cancel() {
            self.active = false;
            self.editor.reset();
            return CommandLineEvent::Cancelled;
        }

        if key == Key::Enter {
            self.active = false;
            let line = self.editor.content();
            self.editor.reset();
            if !line.trim().is_empty() {
                self.history.push(line.clone());
            }
            return CommandLineEvent::Submitted(line);
        }

        self.editor.take_key(key, &self.history);
        CommandLineEvent::Edited(self.editor.content())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_str(cl: &mut CommandLine, s: &str) {
        for c in s.chars() {
            cl.take_key(Key::Char(c));
        }
    }

    #[test]
    fn test_submit_appends_history() {
        let mut cl = CommandLine::new();
        cl.start();
        assert!(cl.is_active());
        type_str(&mut cl, "wq");

        assert_eq!(cl.take_key(Key::Enter), CommandLineEvent::Submitted("wq".to_string()));
        assert!(!cl.is_active());
        assert_eq!(cl.history(), &["wq".to_string()]);
    }

    #[test]
    fn test_cancel_leaves_history_alone() {
        let mut cl = CommandLine::new();
        cl.start();
        type_str(&mut cl, "q");
        assert_eq!(cl.take_key(Key::Esc), CommandLineEvent::Cancelled);
        assert!(!cl.is_active());
        assert!(cl.history().is_empty());
        assert_eq!(cl.content(), "");
    }

    #[test]
    fn test_line_editing() {
        let mut cl = CommandLine::new();
        cl.start();
        type_str(&mut cl, "wrte");
        cl.take_key(Key::Left);
        cl.take_key(Key::Left);
        assert_eq!(cl.take_key(Key::Char('i')), CommandLineEvent::Edited("write".to_string()));
        cl.take_key(Key::End);
        cl.take_key(Key::Backspace);
        assert_eq!(cl.content(), "writ");
        cl.take_key(Key::Home);
        cl.take_key(Key::Delete);
        assert_eq!(cl.content(), "rit");
    }

    #[test]
    fn test_delete_word_backward() {
        let mut editor = LineEditor::new();
        for c in "w out.txt  ".chars() {
            editor.take_key(Key::Char(c), &[]);
        }
        editor.take_key(Key::Ctrl('w'), &[]);
        assert_eq!(editor.content(), "w ");
        assert_eq!(editor.cursor(), 2);
    }

    #[test]
    fn test_history_navigation() {
        let mut cl = CommandLine::new();
        for cmd in ["w", "q"] {
            cl.start();
            type_str(&mut cl, cmd);
            cl.take_key(Key::Enter);
        }

        cl.start();
        type_str(&mut cl, "x");
        assert_eq!(cl.take_key(Key::Up), CommandLineEvent::Edited("q".to_string()));
        assert_eq!(cl.take_key(Key::Up), CommandLineEvent::Edited("w".to_string()));
        assert_eq!(cl.take_key(Key::Up), CommandLineEvent::Edited("w".to_string()));
        assert_eq!(cl.take_key(Key::Down), CommandLineEvent::Edited("q".to_string()));
        // walking past the newest entry restores the typed line
        assert_eq!(cl.take_key(Key::Down), CommandLineEvent::Edited("x".to_string()));
    }

    #[test]
    fn test_blank_lines_are_not_kept() {
        let mut cl = CommandLine::new();
        cl.start();
        assert_eq!(cl.take_key(Key::Enter), CommandLineEvent::Submitted(String::new()));
        assert!(cl.history().is_empty());
    }
}
