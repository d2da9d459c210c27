// src/editor/host.rs
use std::fmt;

use super::mode::ModeIndicator;

/// A buffer position as (row, column), both zero based.
pub type Position = (usize, usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionKind {
    Char,
    Line,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    pub kind: SelectionKind,
    pub anchor: Position,
    pub cursor: Position,
}

impl Selection {
    /// A character selection whose motion never moved the cursor.
    pub fn is_collapsed(&self) -> bool {
        self.kind != SelectionKind::Line && self.anchor == self.cursor
    }

    pub fn ordered(&self) -> (Position, Position) {
        if self.anchor <= self.cursor {
            (self.anchor, self.cursor)
        } else {
            (self.cursor, self.anchor)
        }
    }
}

/// Opaque editing operations the host performs on the engine's behalf.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HostAction {
    // Cursor motions
    CursorLeft,
    CursorRight,
    CursorUp,
    CursorDown,
    PageUp,
    PageDown,
    NextWord,
    PrevWord,
    NextWordEnd,
    LineBegin,
    LineEnd,
    PrevParagraph,
    NextParagraph,
    BufferBegin,
    BufferEnd,

    // Selection control
    Select,
    SelectLines,
    SelectOff,

    // Edits
    Insert(char),
    DeleteBack,
    DeleteForward,
    PasteYankBuffer,
    /// `deletion` marks a yank that precedes a delete
    YankSelection { deletion: bool },
    Undo,
    Redo,

    // Search
    FindInBuffer,
    FindNext,
    FindPrev,
    ReplaceCurrentSearch,

    // Frames and process
    FrameDelete,
    Quit,
    Suspend,
    WriteBuffer(Vec<String>),
}

impl HostAction {
    pub fn name(&self) -> &'static str {
        match self {
            HostAction::CursorLeft => "cursor-left",
            HostAction::CursorRight => "cursor-right",
            HostAction::CursorUp => "cursor-up",
            HostAction::CursorDown => "cursor-down",
            HostAction::PageUp => "cursor-page-up",
            HostAction::PageDown => "cursor-page-down",
            HostAction::NextWord => "cursor-next-word",
            HostAction::PrevWord => "cursor-prev-word",
            HostAction::NextWordEnd => "cursor-next-word-end",
            HostAction::LineBegin => "cursor-line-begin",
            HostAction::LineEnd => "cursor-line-end",
            HostAction::PrevParagraph => "cursor-prev-paragraph",
            HostAction::NextParagraph => "cursor-next-paragraph",
            HostAction::BufferBegin => "cursor-buffer-begin",
            HostAction::BufferEnd => "cursor-buffer-end",
            HostAction::Select => "select",
            HostAction::SelectLines => "select-lines",
            HostAction::SelectOff => "select-off",
            HostAction::Insert(_) => "insert",
            HostAction::DeleteBack => "delete-back",
            HostAction::DeleteForward => "delete-forward",
            HostAction::PasteYankBuffer => "paste-yank-buffer",
            HostAction::YankSelection { .. } => "yank-selection",
            HostAction::Undo => "undo",
            HostAction::Redo => "redo",
            HostAction::FindInBuffer => "find-in-buffer",
            HostAction::FindNext => "find-next-in-buffer",
            HostAction::FindPrev => "find-prev-in-buffer",
            HostAction::ReplaceCurrentSearch => "replace-current-search",
            HostAction::FrameDelete => "frame-delete",
            HostAction::Quit => "quit",
            HostAction::Suspend => "suspend",
            HostAction::WriteBuffer(_) => "write-buffer",
        }
    }
}

impl HostAction {
    /// Look an action up by its command name. `insert` takes the character to
    /// insert, `yank-selection 1` marks a deletion yank and `write-buffer`
    /// keeps its arguments.
    pub fn from_name(name: &str, args: &[String]) -> Option<HostAction> {
        let action = match name {
            "cursor-left" => HostAction::CursorLeft,
            "cursor-right" => HostAction::CursorRight,
            "cursor-up" => HostAction::CursorUp,
            "cursor-down" => HostAction::CursorDown,
            "cursor-page-up" => HostAction::PageUp,
            "cursor-page-down" => HostAction::PageDown,
            "cursor-next-word" => HostAction::NextWord,
            "cursor-prev-word" => HostAction::PrevWord,
            "cursor-next-word-end" => HostAction::NextWordEnd,
            "cursor-line-begin" => HostAction::LineBegin,
            "cursor-line-end" => HostAction::LineEnd,
            "cursor-prev-paragraph" => HostAction::PrevParagraph,
            "cursor-next-paragraph" => HostAction::NextParagraph,
            "cursor-buffer-begin" => HostAction::BufferBegin,
            "cursor-buffer-end" => HostAction::BufferEnd,
            "select" => HostAction::Select,
            "select-lines" => HostAction::SelectLines,
            "select-off" => HostAction::SelectOff,
            "insert" => {
                let mut chars = args.first()?.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => HostAction::Insert(c),
                    _ => return None,
                }
            }
            "delete-back" => HostAction::DeleteBack,
            "delete-forward" => HostAction::DeleteForward,
            "paste-yank-buffer" => HostAction::PasteYankBuffer,
            "yank-selection" => HostAction::YankSelection {
                deletion: args.first().is_some_and(|a| a == "1"),
            },
            "undo" => HostAction::Undo,
            "redo" => HostAction::Redo,
            "find-in-buffer" => HostAction::FindInBuffer,
            "find-next-in-buffer" => HostAction::FindNext,
            "find-prev-in-buffer" => HostAction::FindPrev,
            "replace-current-search" => HostAction::ReplaceCurrentSearch,
            "frame-delete" => HostAction::FrameDelete,
            "quit" => HostAction::Quit,
            "suspend" => HostAction::Suspend,
            "write-buffer" => HostAction::WriteBuffer(args.to_vec()),
            _ => return None,
        };
        Some(action)
    }
}

impl fmt::Display for HostAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostAction::Insert(c) => write!(f, "insert {:?}", c),
            HostAction::YankSelection { deletion: true } => write!(f, "yank-selection 1"),
            HostAction::WriteBuffer(args) if !args.is_empty() => {
                write!(f, "write-buffer {}", args.join(" "))
            }
            other => f.write_str(other.name()),
        }
    }
}

/// The editor the engine drives. Text storage, geometry, rendering and file
/// I/O all live behind this trait.
pub trait Host {
    fn execute(&mut self, action: HostAction);

    /// Run a command the engine does not own itself.
    fn run_command(&mut self, name: &str, args: &[String]);

    /// Surface a diagnostic to the user.
    fn report(&mut self, message: &str);

    // Queries. `None` means there is no active frame/buffer.
    fn cursor(&self) -> Option<Position>;
    fn line(&self, row: usize) -> Option<String>;
    fn selection(&self) -> Option<Selection>;
    fn undo_record_count(&self) -> Option<usize>;
    fn frame_count(&self) -> usize;
    fn active_frame_fills_terminal(&self) -> bool;
    fn cursor_line(&self) -> bool;

    fn set_cursor(&mut self, row: usize, col: usize);
    fn merge_undo_records(&mut self);
    fn set_cursor_line(&mut self, enabled: bool);
    fn set_search_cursor_move(&mut self, enabled: bool);
    fn set_mode_indicator(&mut self, indicator: &ModeIndicator);

    // Command line surface
    fn set_prompt(&mut self, prompt: Option<&str>);
    fn set_command_text(&mut self, text: &str);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collapsed_selection() {
        let sel = Selection {
            kind: SelectionKind::Char,
            anchor: (2, 4),
            cursor: (2, 4),
        };
        assert!(sel.is_collapsed());

        let lines = Selection {
            kind: SelectionKind::Line,
            ..sel
        };
        assert!(!lines.is_collapsed());
    }

    #[test]
    fn test_selection_ordering() {
        let sel = Selection {
            kind: SelectionKind::Char,
            anchor: (3, 1),
            cursor: (1, 7),
        };
        assert_eq!(sel.ordered(), ((1, 7), (3, 1)));
    }

    #[test]
    fn test_action_display() {
        assert_eq!(HostAction::CursorLeft.to_string(), "cursor-left");
        assert_eq!(HostAction::YankSelection { deletion: true }.to_string(), "yank-selection 1");
        assert_eq!(
            HostAction::WriteBuffer(vec!["out.txt".into()]).to_string(),
            "write-buffer out.txt"
        );
    }

    #[test]
    fn test_lookup_by_name() {
        let plain = [
            HostAction::CursorDown,
            HostAction::NextWordEnd,
            HostAction::BufferBegin,
            HostAction::SelectLines,
            HostAction::DeleteForward,
            HostAction::FindPrev,
            HostAction::FrameDelete,
        ];
        for action in plain {
            assert_eq!(HostAction::from_name(action.name(), &[]), Some(action));
        }

        let args = |list: &[&str]| list.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        assert_eq!(
            HostAction::from_name("insert", &args(&["é"])),
            Some(HostAction::Insert('é'))
        );
        assert_eq!(HostAction::from_name("insert", &args(&["ab"])), None);
        assert_eq!(HostAction::from_name("insert", &[]), None);
        assert_eq!(
            HostAction::from_name("yank-selection", &args(&["1"])),
            Some(HostAction::YankSelection { deletion: true })
        );
        assert_eq!(
            HostAction::from_name("write-buffer", &args(&["out.txt"])),
            Some(HostAction::WriteBuffer(args(&["out.txt"])))
        );
        assert_eq!(HostAction::from_name("frame-split", &[]), None);
    }
}
