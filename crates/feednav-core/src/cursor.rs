//! Row/column cursor and its transition table.
//!
//! The cursor holds positions only. Rows and cards are re-derived on every
//! event, so a stored handle would silently point at replaced content.

/// Directional moves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Move {
    RowBackward,
    RowForward,
    ColumnBackward,
    ColumnForward,
}

impl Move {
    pub fn is_row_move(self) -> bool {
        matches!(self, Move::RowBackward | Move::RowForward)
    }
}

/// Current selection. `None` on either axis means nothing has been selected
/// yet and the first entry is used on the next move.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Cursor {
    pub row: Option<usize>,
    pub column: Option<usize>,
}

/// Fully specified cell a move wants to reach.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Target {
    pub row: usize,
    pub column: usize,
}

impl Cursor {
    pub const fn new(row: usize, column: usize) -> Self {
        Self {
            row: Some(row),
            column: Some(column),
        }
    }

    pub fn is_set(&self) -> bool {
        self.row.is_some() || self.column.is_some()
    }

    /// Target of `mv`, or `None` when the move is a no-op at the first
    /// row/column. Row moves always land on the first card. The target is
    /// not yet validated against the page.
    pub fn plan(&self, mv: Move) -> Option<Target> {
        match mv {
            Move::RowBackward => Some(Target {
                row: step_back(self.row)?,
                column: 0,
            }),
            Move::RowForward => Some(Target {
                row: step_forward(self.row),
                column: 0,
            }),
            Move::ColumnBackward => Some(Target {
                row: self.row.unwrap_or(0),
                column: step_back(self.column)?,
            }),
            Move::ColumnForward => Some(Target {
                row: self.row.unwrap_or(0),
                column: step_forward(self.column),
            }),
        }
    }

    pub fn commit(&mut self, target: Target) {
        *self = Cursor::new(target.row, target.column);
    }
}

fn step_back(index: Option<usize>) -> Option<usize> {
    match index {
        None => Some(0),
        Some(0) => None,
        Some(i) => Some(i - 1),
    }
}

fn step_forward(index: Option<usize>) -> usize {
    index.map_or(0, |i| i + 1)
}
