//! Reasons a farming action can be refused.
use std::fmt;

use crate::world::tiles::TilePos;

use super::crops::{CropKind, CropStage};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FarmingError {
    OutOfBounds { pos: TilePos },
    NotTillable { tile: String },
    NotTilled { tile: String },
    NoSeeds { crop: CropKind },
    NoCrop { tile: String },
    NotRipe { crop: CropKind, stage: CropStage },
}

impl fmt::Display for FarmingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::OutOfBounds { pos } => write!(f, "{} is outside the map", pos),
            Self::NotTillable { tile } => write!(f, "cannot till {}", tile),
            Self::NotTilled { tile } => write!(f, "cannot plant on {}", tile),
            Self::NoSeeds { crop } => write!(f, "no {} seeds to plant", crop.label()),
            Self::NoCrop { tile } => write!(f, "nothing to harvest on {}", tile),
            Self::NotRipe { crop, stage } => {
                write!(f, "the {} is still {}", crop.label(), stage.label())
            }
        }
    }
}

impl std::error::Error for FarmingError {}
