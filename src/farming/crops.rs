//! Crop kinds and the per-tile growth state machine.
use serde::{Deserialize, Serialize};

use crate::inventory::ItemKind;

/// Crops that can be planted on tilled soil.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropKind {
    Wheat,
    Carrot,
}

impl CropKind {
    pub fn label(self) -> &'static str {
        match self {
            Self::Wheat => "wheat",
            Self::Carrot => "carrot",
        }
    }

    pub fn seed_item(self) -> ItemKind {
        match self {
            Self::Wheat => ItemKind::WheatSeeds,
            Self::Carrot => ItemKind::CarrotSeeds,
        }
    }

    pub fn produce_item(self) -> ItemKind {
        match self {
            Self::Wheat => ItemKind::Wheat,
            Self::Carrot => ItemKind::Carrot,
        }
    }
}

/// Growth stages, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CropStage {
    Seed,
    Sprout,
    Growing,
    Ripe,
}

impl CropStage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Seed => "seeded",
            Self::Sprout => "sprouting",
            Self::Growing => "growing",
            Self::Ripe => "ripe",
        }
    }

    fn next(self) -> Self {
        match self {
            Self::Seed => Self::Sprout,
            Self::Sprout => Self::Growing,
            Self::Growing | Self::Ripe => Self::Ripe,
        }
    }
}

/// State of a planted tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CropState {
    pub kind: CropKind,
    pub stage: CropStage,
    pub growth_ticks: u32,
}

impl CropState {
    pub fn planted(kind: CropKind) -> Self {
        Self {
            kind,
            stage: CropStage::Seed,
            growth_ticks: 0,
        }
    }

    pub fn is_ripe(&self) -> bool {
        self.stage == CropStage::Ripe
    }

    /// Advances growth by one tick. Returns true when the stage changed.
    pub fn advance(&mut self, ticks_per_stage: u32) -> bool {
        if self.is_ripe() {
            return false;
        }

        self.growth_ticks = self.growth_ticks.saturating_add(1);
        if self.growth_ticks >= ticks_per_stage.max(1) {
            self.growth_ticks = 0;
            self.stage = self.stage.next();
            return true;
        }

        false
    }
}
