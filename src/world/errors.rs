//! Errors raised by tile grid operations.
use std::fmt;

use super::tiles::TilePos;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    OutOfBounds {
        pos: TilePos,
    },
    SizeMismatch {
        expected: (i32, i32),
        found: (i32, i32),
    },
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { pos } => write!(f, "tile {} is outside the map", pos),
            Self::SizeMismatch { expected, found } => write!(
                f,
                "grid size mismatch: expected {}x{}, found {}x{}",
                expected.0, expected.1, found.0, found.1
            ),
        }
    }
}

impl std::error::Error for WorldError {}
