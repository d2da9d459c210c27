// src/editor/buffer.rs
use std::path::{Path, PathBuf};

use super::host::{Host, HostAction, Position, Selection, SelectionKind};
use super::mode::ModeIndicator;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Yank {
    pub text: String,
    pub linewise: bool,
    /// Set when the yank came from a delete
    pub deletion: bool,
}

#[derive(Clone, Debug)]
struct Snapshot {
    lines: Vec<String>,
    cursor: Position,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharClass {
    Space,
    Word,
    Punct,
}

fn classify(c: char) -> CharClass {
    if c.is_whitespace() {
        CharClass::Space
    } else if c.is_alphanumeric() || c == '_' {
        CharClass::Word
    } else {
        CharClass::Punct
    }
}

/// An in-memory text buffer implementing [`Host`]. Every action it receives
/// is kept in an action log, which is what the tests assert against.
#[derive(Debug)]
pub struct MemoryHost {
    lines: Vec<String>,
    cursor: Position,
    selection: Option<(SelectionKind, Position)>,
    yank: Option<Yank>,
    undo_stack: Vec<Snapshot>,
    redo_stack: Vec<Snapshot>,
    search: Option<String>,
    page_height: usize,
    frames: usize,
    fills_terminal: bool,
    cursor_line: bool,
    search_cursor_move: bool,
    indicator: ModeIndicator,
    prompt: Option<String>,
    command_text: String,
    path: Option<PathBuf>,
    actions: Vec<HostAction>,
    commands: Vec<(String, Vec<String>)>,
    messages: Vec<String>,
    quit: bool,
    suspended: bool,
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryHost {
    pub fn new() -> Self {
        Self {
            lines: vec![String::new()],
            cursor: (0, 0),
            selection: None,
            yank: None,
            undo_stack: Vec::new(),
            redo_stack: Vec::new(),
            search: None,
            page_height: 20,
            frames: 1,
            fills_terminal: true,
            cursor_line: false,
            search_cursor_move: false,
            indicator: ModeIndicator::default(),
            prompt: None,
            command_text: String::new(),
            path: None,
            actions: Vec::new(),
            commands: Vec::new(),
            messages: Vec::new(),
            quit: false,
            suspended: false,
        }
    }

    pub fn from_text(text: &str) -> Self {
        let mut host = Self::new();
        host.lines = text.split('\n').map(str::to_string).collect();
        host
    }

    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn set_page_height(&mut self, height: usize) {
        self.page_height = height.max(1);
    }

    /// Lay out `frames` frames; a lone frame may or may not fill the terminal.
    pub fn set_frames(&mut self, frames: usize, fills_terminal: bool) {
        self.frames = frames;
        self.fills_terminal = fills_terminal;
    }

    pub fn set_cursor_line_enabled(&mut self, enabled: bool) {
        self.cursor_line = enabled;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor_position(&self) -> Position {
        self.cursor
    }

    pub fn yank_register(&self) -> Option<&Yank> {
        self.yank.as_ref()
    }

    pub fn actions(&self) -> &[HostAction] {
        &self.actions
    }

    pub fn clear_actions(&mut self) {
        self.actions.clear();
    }

    /// Drop the action, command and message logs.
    pub fn clear_logs(&mut self) {
        self.actions.clear();
        self.commands.clear();
        self.messages.clear();
    }

    pub fn commands(&self) -> &[(String, Vec<String>)] {
        &self.commands
    }

    pub fn messages(&self) -> &[String] {
        &self.messages
    }

    pub fn indicator(&self) -> &ModeIndicator {
        &self.indicator
    }

    pub fn prompt(&self) -> Option<&str> {
        self.prompt.as_deref()
    }

    pub fn command_text(&self) -> &str {
        &self.command_text
    }

    pub fn search_cursor_move(&self) -> bool {
        self.search_cursor_move
    }

    pub fn should_quit(&self) -> bool {
        self.quit
    }

    pub fn is_suspended(&self) -> bool {
        self.suspended
    }

    pub fn resume(&mut self) {
        self.suspended = false;
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines.get(row).map_or(0, |l| l.chars().count())
    }

    fn last_row(&self) -> usize {
        self.lines.len().saturating_sub(1)
    }

    fn clamp(&self, (row, col): Position) -> Position {
        let row = row.min(self.last_row());
        (row, col.min(self.line_len(row)))
    }

    fn byte_index(line: &str, col: usize) -> usize {
        line.char_indices().nth(col).map_or(line.len(), |(i, _)| i)
    }

    // The end of each line reads as a newline
    fn char_at(&self, (row, col): Position) -> char {
        self.lines
            .get(row)
            .and_then(|l| l.chars().nth(col))
            .unwrap_or('\n')
    }

    fn next_pos(&self, (row, col): Position) -> Option<Position> {
        if col < self.line_len(row) {
            Some((row, col + 1))
        } else if row < self.last_row() {
            Some((row + 1, 0))
        } else {
            None
        }
    }

    fn prev_pos(&self, (row, col): Position) -> Option<Position> {
        if col > 0 {
            Some((row, col - 1))
        } else if row > 0 {
            Some((row - 1, self.line_len(row - 1)))
        } else {
            None
        }
    }

    fn record_change(&mut self) {
        self.undo_stack.push(Snapshot {
            lines: self.lines.clone(),
            cursor: self.cursor,
        });
        self.redo_stack.clear();
    }

    fn move_word_forward(&mut self) {
        let mut pos = self.cursor;
        let class = classify(self.char_at(pos));
        if class != CharClass::Space {
            while let Some(next) = self.next_pos(pos) {
                pos = next;
                if classify(self.char_at(pos)) != class {
                    break;
                }
            }
        }
        while classify(self.char_at(pos)) == CharClass::Space {
            match self.next_pos(pos) {
                Some(next) => pos = next,
                None => break,
            }
        }
        self.cursor = pos;
    }

    fn move_word_backward(&mut self) {
        let Some(mut pos) = self.prev_pos(self.cursor) else {
            return;
        };
        while classify(self.char_at(pos)) == CharClass::Space {
            match self.prev_pos(pos) {
                Some(prev) => pos = prev,
                None => break,
            }
        }
        let class = classify(self.char_at(pos));
        while let Some(prev) = self.prev_pos(pos) {
            if classify(self.char_at(prev)) != class {
                break;
            }
            pos = prev;
        }
        self.cursor = pos;
    }

    fn move_word_end(&mut self) {
        let Some(mut pos) = self.next_pos(self.cursor) else {
            return;
        };
        while classify(self.char_at(pos)) == CharClass::Space {
            match self.next_pos(pos) {
                Some(next) => pos = next,
                None => break,
            }
        }
        let class = classify(self.char_at(pos));
        while let Some(next) = self.next_pos(pos) {
            if classify(self.char_at(next)) != class {
                break;
            }
            pos = next;
        }
        self.cursor = pos;
    }

    fn is_blank(&self, row: usize) -> bool {
        self.lines.get(row).map_or(true, |l| l.trim().is_empty())
    }

    fn move_paragraph(&mut self, forward: bool) {
        let mut row = self.cursor.0;
        loop {
            let next = if forward {
                (row < self.last_row()).then(|| row + 1)
            } else {
                row.checked_sub(1)
            };
            match next {
                Some(r) => {
                    row = r;
                    if self.is_blank(row) {
                        break;
                    }
                }
                None => break,
            }
        }
        self.cursor = (row, 0);
    }

    fn selection_range(&self) -> Option<(SelectionKind, Position, Position)> {
        let (kind, anchor) = self.selection?;
        let sel = Selection {
            kind,
            anchor: self.clamp(anchor),
            cursor: self.clamp(self.cursor),
        };
        let (start, end) = sel.ordered();
        Some((kind, start, end))
    }

    fn text_between(&self, start: Position, end: Position) -> String {
        if start.0 == end.0 {
            return self.lines[start.0]
                .chars()
                .skip(start.1)
                .take(end.1 - start.1)
                .collect();
        }
        let mut text: String = self.lines[start.0].chars().skip(start.1).collect();
        for row in start.0 + 1..end.0 {
            text.push('\n');
            text.push_str(&self.lines[row]);
        }
        text.push('\n');
        text.extend(self.lines[end.0].chars().take(end.1));
        text
    }

    fn selected_text(&self) -> Option<(String, bool)> {
        let (kind, start, end) = self.selection_range()?;
        match kind {
            SelectionKind::Line => Some((self.lines[start.0..=end.0].join("\n"), true)),
            SelectionKind::Char => Some((self.text_between(start, end), false)),
        }
    }

    fn delete_between(&mut self, start: Position, end: Position) {
        let head = Self::byte_index(&self.lines[start.0], start.1);
        let tail_at = Self::byte_index(&self.lines[end.0], end.1);
        let tail = self.lines[end.0][tail_at..].to_string();
        self.lines[start.0].truncate(head);
        self.lines[start.0].push_str(&tail);
        self.lines.drain(start.0 + 1..=end.0);
        self.cursor = start;
    }

    fn delete_selection(&mut self) {
        let Some((kind, start, end)) = self.selection_range() else {
            return;
        };
        self.record_change();
        match kind {
            SelectionKind::Char => self.delete_between(start, end),
            SelectionKind::Line => {
                self.lines.drain(start.0..=end.0);
                if self.lines.is_empty() {
                    self.lines.push(String::new());
                }
                self.cursor = (start.0.min(self.last_row()), 0);
            }
        }
        self.selection = None;
    }

    fn insert_text(&mut self, text: &str) {
        let (row, col) = self.clamp(self.cursor);
        let at = Self::byte_index(&self.lines[row], col);
        let tail = self.lines[row].split_off(at);
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            self.lines[row].push_str(first);
        }
        let mut cur_row = row;
        for piece in pieces {
            cur_row += 1;
            self.lines.insert(cur_row, piece.to_string());
        }
        let col = self.lines[cur_row].chars().count();
        self.lines[cur_row].push_str(&tail);
        self.cursor = (cur_row, col);
    }

    fn delete_back(&mut self) {
        if self.selection.is_some() {
            self.delete_selection();
            return;
        }
        let (row, col) = self.clamp(self.cursor);
        if col > 0 {
            self.record_change();
            self.delete_between((row, col - 1), (row, col));
        } else if row > 0 {
            self.record_change();
            let prev_len = self.line_len(row - 1);
            self.delete_between((row - 1, prev_len), (row, 0));
        }
    }

    fn delete_forward(&mut self) {
        if self.selection.is_some() {
            self.delete_selection();
            return;
        }
        let (row, col) = self.clamp(self.cursor);
        if col < self.line_len(row) {
            self.record_change();
            self.delete_between((row, col), (row, col + 1));
        } else if row < self.last_row() {
            self.record_change();
            self.delete_between((row, col), (row + 1, 0));
        }
    }

    fn paste(&mut self) {
        let Some(yank) = self.yank.clone() else {
            return;
        };
        self.record_change();
        if yank.linewise {
            let row = self.cursor.0.min(self.last_row());
            for (i, line) in yank.text.split('\n').enumerate() {
                self.lines.insert(row + 1 + i, line.to_string());
            }
            self.cursor = (row + 1, 0);
        } else {
            self.insert_text(&yank.text);
        }
    }

    fn undo(&mut self) {
        if let Some(snapshot) = self.undo_stack.pop() {
            self.redo_stack.push(Snapshot {
                lines: std::mem::replace(&mut self.lines, snapshot.lines),
                cursor: self.cursor,
            });
            self.cursor = snapshot.cursor;
        }
    }

    fn redo(&mut self) {
        if let Some(snapshot) = self.redo_stack.pop() {
            self.undo_stack.push(Snapshot {
                lines: std::mem::replace(&mut self.lines, snapshot.lines),
                cursor: self.cursor,
            });
            self.cursor = snapshot.cursor;
        }
    }

    fn find(&mut self, forward: bool) {
        let Some(pattern) = self.search.clone() else {
            return;
        };
        let rows = self.lines.len();
        let (row, col) = self.cursor;
        for step in 0..=rows {
            let r = if forward {
                (row + step) % rows
            } else {
                (row + rows - step % rows) % rows
            };
            let line = &self.lines[r];
            let hits: Vec<usize> = line
                .match_indices(pattern.as_str())
                .map(|(byte, _)| line[..byte].chars().count())
                .collect();
            let hit = match (forward, step) {
                (true, 0) => hits.into_iter().find(|&c| c > col),
                (true, _) => hits.into_iter().next(),
                (false, 0) => hits.into_iter().rev().find(|&c| c < col),
                (false, _) => hits.into_iter().next_back(),
            };
            if let Some(c) = hit {
                self.cursor = (r, c);
                return;
            }
        }
    }

    fn write(&mut self, args: &[String]) {
        let Some(path) = args.first().map(PathBuf::from).or_else(|| self.path.clone()) else {
            self.report("no file name");
            return;
        };
        let mut contents = self.text();
        contents.push('\n');
        match std::fs::write(&path, contents) {
            Ok(()) => {
                log::info!("wrote {}", path.display());
                self.path = Some(path);
            }
            Err(e) => self.report(&format!("could not write {}: {}", path.display(), e)),
        }
    }
}

impl Host for MemoryHost {
    fn execute(&mut self, action: HostAction) {
        self.actions.push(action.clone());
        match action {
            HostAction::CursorLeft => self.cursor.1 = self.cursor.1.saturating_sub(1),
            HostAction::CursorRight => {
                self.cursor.1 = (self.cursor.1 + 1).min(self.line_len(self.cursor.0))
            }
            HostAction::CursorUp => self.cursor = self.clamp((self.cursor.0.saturating_sub(1), self.cursor.1)),
            HostAction::CursorDown => self.cursor = self.clamp((self.cursor.0 + 1, self.cursor.1)),
            HostAction::PageUp => {
                self.cursor = self.clamp((self.cursor.0.saturating_sub(self.page_height), self.cursor.1))
            }
            HostAction::PageDown => {
                self.cursor = self.clamp((self.cursor.0 + self.page_height, self.cursor.1))
            }
            HostAction::NextWord => self.move_word_forward(),
            HostAction::PrevWord => self.move_word_backward(),
            HostAction::NextWordEnd => self.move_word_end(),
            HostAction::LineBegin => self.cursor.1 = 0,
            HostAction::LineEnd => self.cursor.1 = self.line_len(self.cursor.0),
            HostAction::PrevParagraph => self.move_paragraph(false),
            HostAction::NextParagraph => self.move_paragraph(true),
            HostAction::BufferBegin => self.cursor = (0, 0),
            HostAction::BufferEnd => self.cursor = (self.last_row(), 0),
            HostAction::Select => {
                let anchor = self.selection.map_or(self.cursor, |(_, anchor)| anchor);
                self.selection = Some((SelectionKind::Char, anchor));
            }
            HostAction::SelectLines => {
                let anchor = self.selection.map_or(self.cursor, |(_, anchor)| anchor);
                self.selection = Some((SelectionKind::Line, anchor));
            }
            HostAction::SelectOff => self.selection = None,
            HostAction::Insert(c) => {
                self.record_change();
                let mut buf = [0u8; 4];
                self.insert_text(c.encode_utf8(&mut buf));
            }
            HostAction::DeleteBack => self.delete_back(),
            HostAction::DeleteForward => self.delete_forward(),
            HostAction::PasteYankBuffer => self.paste(),
            HostAction::YankSelection { deletion } => {
                if let Some((text, linewise)) = self.selected_text() {
                    self.yank = Some(Yank {
                        text,
                        linewise,
                        deletion,
                    });
                }
            }
            HostAction::Undo => self.undo(),
            HostAction::Redo => self.redo(),
            HostAction::FindInBuffer | HostAction::FindNext => self.find(true),
            HostAction::FindPrev => self.find(false),
            HostAction::ReplaceCurrentSearch => {}
            HostAction::FrameDelete => {
                self.frames = self.frames.saturating_sub(1);
                if self.frames == 0 {
                    self.quit = true;
                }
            }
            HostAction::Quit => self.quit = true,
            HostAction::Suspend => self.suspended = true,
            HostAction::WriteBuffer(args) => self.write(&args),
        }
    }

    fn run_command(&mut self, name: &str, args: &[String]) {
        self.commands.push((name.to_string(), args.to_vec()));
        match name {
            "find-in-buffer" if !args.is_empty() => {
                self.search = Some(args.join(" "));
                self.find(true);
            }
            _ => match HostAction::from_name(name, args) {
                Some(action) => self.execute(action),
                None => self.report(&format!("unknown command '{}'", name)),
            },
        }
    }

    fn report(&mut self, message: &str) {
        self.messages.push(message.to_string());
    }

    fn cursor(&self) -> Option<Position> {
        Some(self.cursor)
    }

    fn line(&self, row: usize) -> Option<String> {
        self.lines.get(row).cloned()
    }

    fn selection(&self) -> Option<Selection> {
        self.selection.map(|(kind, anchor)| Selection {
            kind,
            anchor,
            cursor: self.cursor,
        })
    }

    fn undo_record_count(&self) -> Option<usize> {
        Some(self.undo_stack.len())
    }

    fn frame_count(&self) -> usize {
        self.frames
    }

    fn active_frame_fills_terminal(&self) -> bool {
        self.fills_terminal
    }

    fn cursor_line(&self) -> bool {
        self.cursor_line
    }

    fn set_cursor(&mut self, row: usize, col: usize) {
        self.cursor = self.clamp((row, col));
    }

    fn merge_undo_records(&mut self) {
        // The older record's snapshot already predates both edits
        if self.undo_stack.len() >= 2 {
            self.undo_stack.pop();
        }
    }

    fn set_cursor_line(&mut self, enabled: bool) {
        self.cursor_line = enabled;
    }

    fn set_search_cursor_move(&mut self, enabled: bool) {
        self.search_cursor_move = enabled;
    }

    fn set_mode_indicator(&mut self, indicator: &ModeIndicator) {
        self.indicator = indicator.clone();
    }

    fn set_prompt(&mut self, prompt: Option<&str>) {
        self.prompt = prompt.map(str::to_string);
    }

    fn set_command_text(&mut self, text: &str) {
        self.command_text = text.to_string();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_insert_and_newline() {
        let mut host = MemoryHost::from_text("ab");
        host.set_cursor(0, 1);
        host.execute(HostAction::Insert('X'));
        host.execute(HostAction::Insert('\n'));
        assert_eq!(host.lines(), &["aX".to_string(), "b".to_string()]);
        assert_eq!(host.cursor_position(), (1, 0));
        assert_eq!(host.undo_record_count(), Some(2));
    }

    #[test]
    fn test_word_motions() {
        let mut host = MemoryHost::from_text("foo bar.baz\n  qux");
        host.execute(HostAction::NextWord);
        assert_eq!(host.cursor_position(), (0, 4));
        host.execute(HostAction::NextWord);
        assert_eq!(host.cursor_position(), (0, 7));
        host.execute(HostAction::NextWordEnd);
        assert_eq!(host.cursor_position(), (0, 10));
        host.execute(HostAction::NextWord);
        assert_eq!(host.cursor_position(), (1, 2));
        host.execute(HostAction::PrevWord);
        assert_eq!(host.cursor_position(), (0, 8));
    }

    #[test]
    fn test_delete_char_selection() {
        let mut host = MemoryHost::from_text("foo bar");
        host.execute(HostAction::Select);
        host.execute(HostAction::NextWord);
        host.execute(HostAction::YankSelection { deletion: true });
        host.execute(HostAction::DeleteBack);

        assert_eq!(host.text(), "bar");
        let yank = host.yank_register().unwrap();
        assert_eq!(yank.text, "foo ");
        assert!(yank.deletion);
        assert!(host.selection().is_none());
    }

    #[test]
    fn test_delete_line_selection() {
        let mut host = MemoryHost::from_text("one\ntwo\nthree");
        host.set_cursor(1, 1);
        host.execute(HostAction::SelectLines);
        host.execute(HostAction::YankSelection { deletion: false });
        host.execute(HostAction::DeleteBack);
        assert_eq!(host.text(), "one\nthree");
        assert_eq!(host.cursor_position(), (1, 0));

        host.execute(HostAction::PasteYankBuffer);
        assert_eq!(host.text(), "one\nthree\ntwo");
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut host = MemoryHost::from_text("ab\ncd");
        host.set_cursor(1, 0);
        host.execute(HostAction::DeleteBack);
        assert_eq!(host.text(), "abcd");
        assert_eq!(host.cursor_position(), (0, 2));

        // nothing to delete, nothing recorded
        host.set_cursor(0, 0);
        host.execute(HostAction::DeleteBack);
        assert_eq!(host.undo_record_count(), Some(1));
    }

    #[test]
    fn test_undo_redo_and_merge() {
        let mut host = MemoryHost::from_text("");
        for c in "abc".chars() {
            host.execute(HostAction::Insert(c));
        }
        host.merge_undo_records();
        host.merge_undo_records();
        assert_eq!(host.undo_record_count(), Some(1));

        host.execute(HostAction::Undo);
        assert_eq!(host.text(), "");
        host.execute(HostAction::Redo);
        assert_eq!(host.text(), "abc");
    }

    #[test]
    fn test_search() {
        let mut host = MemoryHost::from_text("ab ab\nxx ab");
        host.run_command("find-in-buffer", &["ab".to_string()]);
        assert_eq!(host.cursor_position(), (0, 3));
        host.execute(HostAction::FindNext);
        assert_eq!(host.cursor_position(), (1, 3));
        host.execute(HostAction::FindNext);
        assert_eq!(host.cursor_position(), (0, 0));
        host.execute(HostAction::FindPrev);
        assert_eq!(host.cursor_position(), (1, 3));
    }

    #[test]
    fn test_paragraph_motion() {
        let mut host = MemoryHost::from_text("a\nb\n\nc\nd");
        host.execute(HostAction::NextParagraph);
        assert_eq!(host.cursor_position(), (2, 0));
        host.execute(HostAction::NextParagraph);
        assert_eq!(host.cursor_position(), (4, 0));
        host.execute(HostAction::PrevParagraph);
        assert_eq!(host.cursor_position(), (2, 0));
    }

    #[test]
    fn test_frames_and_quit() {
        let mut host = MemoryHost::new();
        host.set_frames(2, false);
        host.execute(HostAction::FrameDelete);
        assert!(!host.should_quit());
        host.execute(HostAction::FrameDelete);
        assert!(host.should_quit());
    }

    #[test]
    fn test_named_actions_run() {
        let mut host = MemoryHost::from_text("one\ntwo");
        host.run_command("cursor-buffer-end", &[]);
        host.run_command("delete-forward", &[]);
        assert_eq!(host.text(), "one\nwo");
        assert_eq!(
            host.actions(),
            &[HostAction::BufferEnd, HostAction::DeleteForward]
        );
        assert!(host.messages().is_empty());
    }

    #[test]
    fn test_clear_logs() {
        let mut host = MemoryHost::from_text("ab");
        host.execute(HostAction::CursorRight);
        host.run_command("frobnicate", &[]);
        host.clear_logs();
        assert!(host.actions().is_empty());
        assert!(host.commands().is_empty());
        assert!(host.messages().is_empty());
        // the buffer itself is untouched
        assert_eq!(host.cursor_position(), (0, 1));
    }

    #[test]
    fn test_unknown_command_is_reported() {
        let mut host = MemoryHost::new();
        host.run_command("frobnicate", &[]);
        assert_eq!(host.messages(), &["unknown command 'frobnicate'".to_string()]);
    }
}
