//! Farming operations applied to a tile on behalf of a character.
use std::fmt;

use crate::{
    inventory::Inventory,
    world::tiles::{Tile, TileGrid, TilePos},
};

use super::{
    config::FarmingConfig,
    crops::{CropKind, CropState},
    errors::FarmingError,
};

/// Work a character can do on a tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmAction {
    Till,
    Plant(CropKind),
    Harvest,
}

/// Goods gained from a harvest.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HarvestYield {
    pub crop: CropKind,
    pub produce: u32,
    pub seeds: u32,
}

/// Successful result of a farming action.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FarmOutcome {
    Tilled,
    Planted(CropKind),
    Harvested(HarvestYield),
}

impl fmt::Display for FarmOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Tilled => write!(f, "tilled the soil"),
            Self::Planted(crop) => write!(f, "planted {}", crop.label()),
            Self::Harvested(harvest) if harvest.seeds > 0 => write!(
                f,
                "harvested {} {} and saved {} seeds",
                harvest.produce,
                harvest.crop.label(),
                harvest.seeds
            ),
            Self::Harvested(harvest) => {
                write!(f, "harvested {} {}", harvest.produce, harvest.crop.label())
            }
        }
    }
}

fn tile_at(grid: &TileGrid, pos: TilePos) -> Result<Tile, FarmingError> {
    grid.get(pos)
        .copied()
        .ok_or(FarmingError::OutOfBounds { pos })
}

/// Grass becomes tilled soil.
pub fn till(grid: &mut TileGrid, pos: TilePos) -> Result<FarmOutcome, FarmingError> {
    match tile_at(grid, pos)? {
        Tile::Grass => {
            grid.set(pos, Tile::Tilled)
                .map_err(|_| FarmingError::OutOfBounds { pos })?;
            Ok(FarmOutcome::Tilled)
        }
        other => Err(FarmingError::NotTillable {
            tile: other.label(),
        }),
    }
}

/// Consumes one seed and plants it on tilled soil.
pub fn plant(
    grid: &mut TileGrid,
    pos: TilePos,
    crop: CropKind,
    inventory: &mut Inventory,
) -> Result<FarmOutcome, FarmingError> {
    let tile = tile_at(grid, pos)?;
    if tile != Tile::Tilled {
        return Err(FarmingError::NotTilled { tile: tile.label() });
    }
    if !inventory.remove(crop.seed_item(), 1) {
        return Err(FarmingError::NoSeeds { crop });
    }

    grid.set(pos, Tile::Crop(CropState::planted(crop)))
        .map_err(|_| FarmingError::OutOfBounds { pos })?;
    Ok(FarmOutcome::Planted(crop))
}

/// Collects a ripe crop, leaving tilled soil behind.
pub fn harvest(
    grid: &mut TileGrid,
    pos: TilePos,
    config: &FarmingConfig,
    inventory: &mut Inventory,
) -> Result<FarmOutcome, FarmingError> {
    let tile = tile_at(grid, pos)?;
    let Some(crop) = tile.crop().copied() else {
        return Err(FarmingError::NoCrop { tile: tile.label() });
    };
    if !crop.is_ripe() {
        return Err(FarmingError::NotRipe {
            crop: crop.kind,
            stage: crop.stage,
        });
    }

    grid.set(pos, Tile::Tilled)
        .map_err(|_| FarmingError::OutOfBounds { pos })?;

    let settings = config.crop(crop.kind);
    inventory.add(crop.kind.produce_item(), settings.yield_amount);
    inventory.add(crop.kind.seed_item(), settings.seed_return);

    Ok(FarmOutcome::Harvested(HarvestYield {
        crop: crop.kind,
        produce: settings.yield_amount,
        seeds: settings.seed_return,
    }))
}

pub fn perform(
    grid: &mut TileGrid,
    pos: TilePos,
    action: FarmAction,
    config: &FarmingConfig,
    inventory: &mut Inventory,
) -> Result<FarmOutcome, FarmingError> {
    match action {
        FarmAction::Till => till(grid, pos),
        FarmAction::Plant(crop) => plant(grid, pos, crop, inventory),
        FarmAction::Harvest => harvest(grid, pos, config, inventory),
    }
}

/// The natural next step for a tile: till grass, plant soil, harvest crops.
pub fn auto_action(tile: &Tile, inventory: &Inventory) -> Option<FarmAction> {
    match tile {
        Tile::Grass => Some(FarmAction::Till),
        Tile::Tilled => Some(FarmAction::Plant(
            inventory.first_seed().unwrap_or(CropKind::Wheat),
        )),
        Tile::Crop(_) => Some(FarmAction::Harvest),
        Tile::Path | Tile::Water | Tile::Building => None,
    }
}
