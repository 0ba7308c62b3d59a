//! Offset to line/column mapping for a single source text.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A zero-based line/column location. Columns count bytes from the line start.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for Position {
    /// Formats as 1-based `line:column`, the way editors show it.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line + 1, self.column + 1)
    }
}

/// Line-start table built once per analysis pass.
#[derive(Debug, Clone)]
pub struct PositionIndex {
    /// Byte offset at which each line starts. Always contains at least `0`.
    line_starts: Vec<usize>,
    /// Total text length in bytes.
    len: usize,
}

impl PositionIndex {
    /// Build the index by splitting on `\n` and accumulating line lengths.
    pub fn new(text: &str) -> Self {
        let mut line_starts = Vec::with_capacity(text.len() / 32 + 1);
        let mut offset = 0;
        for line in text.split('\n') {
            line_starts.push(offset);
            offset += line.len() + 1;
        }

        Self {
            line_starts,
            len: text.len(),
        }
    }

    /// Number of lines in the indexed text (a trailing newline opens an empty last line).
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Resolve a byte offset to its line and column.
    ///
    /// Returns `None` for offsets past the end of the text.
    pub fn resolve(&self, offset: usize) -> Option<Position> {
        if offset > self.len {
            return None;
        }
        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .checked_sub(1)?;
        Some(Position::new(line, offset - self.line_starts[line]))
    }

    /// Reconstruct the absolute offset of a position.
    pub fn offset_of(&self, position: Position) -> Option<usize> {
        let start = *self.line_starts.get(position.line)?;
        let offset = start + position.column;
        let line_end = self
            .line_starts
            .get(position.line + 1)
            .map(|next| next - 1)
            .unwrap_or(self.len);
        (offset <= line_end).then_some(offset)
    }
}
