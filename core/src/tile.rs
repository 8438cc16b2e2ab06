use core::fmt;
use serde::{Deserialize, Serialize, Serializer};

use crate::*;

/// Content of a board cell, fixed once the game is created.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoardCell {
    Mine,
    /// Number of mines among the cell's neighbors.
    Count(MineCount),
}

impl BoardCell {
    pub const fn is_mine(self) -> bool {
        matches!(self, Self::Mine)
    }

    pub const fn is_empty(self) -> bool {
        matches!(self, Self::Count(0))
    }
}

impl Default for BoardCell {
    fn default() -> Self {
        Self::Count(0)
    }
}

impl fmt::Display for BoardCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Mine => f.write_str("."),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

/// Symbol shown for a cell when a game is rendered.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Glyph {
    Hidden,
    Mine,
    Empty,
    Count(MineCount),
}

impl From<BoardCell> for Glyph {
    fn from(cell: BoardCell) -> Self {
        match cell {
            BoardCell::Mine => Self::Mine,
            BoardCell::Count(0) => Self::Empty,
            BoardCell::Count(count) => Self::Count(count),
        }
    }
}

impl fmt::Display for Glyph {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Hidden => f.write_str("_"),
            Self::Mine => f.write_str("."),
            Self::Empty => f.write_str(" "),
            Self::Count(count) => write!(f, "{count}"),
        }
    }
}

// serialized as the displayed symbol so rendered boards become nested lists of strings
impl Serialize for Glyph {
    fn serialize<S: Serializer>(&self, serializer: S) -> core::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}
