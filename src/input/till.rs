// src/input/till.rs

/// Direction of a pending single-character search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TillDirection {
    /// `f` and `t`: land on the next match to the right
    Forward,
    /// `F`: land on the previous match to the left
    Backward,
    /// `T`: stop one glyph short of the previous match
    BackwardStopBefore,
}

impl TillDirection {
    pub fn for_op(op: char) -> Option<Self> {
        match op {
            'f' | 't' => Some(TillDirection::Forward),
            'F' => Some(TillDirection::Backward),
            'T' => Some(TillDirection::BackwardStopBefore),
            _ => None,
        }
    }
}

/// Pending and last-executed f/t/F/T searches, for repeat with `;`.
#[derive(Debug, Clone, Default)]
pub struct TillMotion {
    pending: Option<TillDirection>,
    last_key: Option<char>,
    last_op: Option<char>,
}

impl TillMotion {
    pub fn new() -> Self {
        Self::default()
    }

    /// Arm a search for `op`. Returns false if `op` is not a till operator.
    pub fn request(&mut self, op: char) -> bool {
        match TillDirection::for_op(op) {
            Some(direction) => {
                self.pending = Some(direction);
                self.last_op = Some(op);
                true
            }
            None => false,
        }
    }

    pub fn pending(&self) -> Option<TillDirection> {
        self.pending
    }

    /// Consume the pending search with its target. Always disarms.
    pub fn take(&mut self, target: Option<char>) -> Option<TillDirection> {
        let direction = self.pending.take()?;
        self.last_key = target;
        Some(direction)
    }

    /// The search `;` repeats.
    pub fn last(&self) -> Option<(TillDirection, char)> {
        let direction = TillDirection::for_op(self.last_op?)?;
        Some((direction, self.last_key?))
    }

    pub fn last_op(&self) -> Option<char> {
        self.last_op
    }

    pub fn last_key(&self) -> Option<char> {
        self.last_key
    }
}

/// Column of the first `target` right of `col`.
pub fn find_forward(line: &str, col: usize, target: char) -> Option<usize> {
    line.chars()
        .enumerate()
        .skip(col + 1)
        .find(|&(_, c)| c == target)
        .map(|(i, _)| i)
}

/// Column to land on for a backward search from `col`. Scanning stops at
/// column zero.
pub fn find_backward(line: &str, col: usize, target: char, stop_before: bool) -> Option<usize> {
    let chars: Vec<char> = line.chars().collect();
    let start = col.min(chars.len());
    (0..start)
        .rev()
        .find(|&i| chars[i] == target)
        .map(|i| if stop_before { i + 1 } else { i })
}
