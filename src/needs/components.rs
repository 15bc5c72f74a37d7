//! Per-character hunger state.
use bevy::prelude::*;

use super::config::NeedsConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum HungerLevel {
    #[default]
    Sated,
    Peckish,
    Hungry,
    Starving,
}

impl HungerLevel {
    pub fn label(self) -> &'static str {
        match self {
            Self::Sated => "sated",
            Self::Peckish => "peckish",
            Self::Hungry => "hungry",
            Self::Starving => "starving",
        }
    }
}

/// Hunger in `[0, max]`; zero means full.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hunger {
    value: f32,
}

impl Hunger {
    pub fn new(value: f32) -> Self {
        Self {
            value: value.max(0.0),
        }
    }

    pub fn from_config(config: &NeedsConfig) -> Self {
        Self::new(config.start_hunger)
    }

    pub fn value(&self) -> f32 {
        self.value
    }

    pub fn set(&mut self, value: f32, max: f32) {
        self.value = value.clamp(0.0, max);
    }

    pub fn rise(&mut self, amount: f32, max: f32) {
        self.value = (self.value + amount.max(0.0)).min(max);
    }

    pub fn eat(&mut self, nourishment: f32) {
        self.value = (self.value - nourishment.max(0.0)).max(0.0);
    }

    pub fn level(&self, config: &NeedsConfig) -> HungerLevel {
        let thresholds = &config.thresholds;
        if self.value >= thresholds.starving {
            HungerLevel::Starving
        } else if self.value >= thresholds.hungry {
            HungerLevel::Hungry
        } else if self.value >= thresholds.peckish {
            HungerLevel::Peckish
        } else {
            HungerLevel::Sated
        }
    }

    /// Multiplier applied to a character's movement interval.
    pub fn move_multiplier(&self, config: &NeedsConfig) -> u32 {
        if self.level(config) == HungerLevel::Starving {
            config.starving_move_multiplier
        } else {
            1
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rises_to_max_and_eating_saturates_at_zero() {
        let config = NeedsConfig::default();
        let mut hunger = Hunger::new(95.0);
        hunger.rise(20.0, config.max_hunger);
        assert_eq!(hunger.value(), config.max_hunger);
        assert_eq!(hunger.level(&config), HungerLevel::Starving);
        assert_eq!(hunger.move_multiplier(&config), 2);

        hunger.eat(35.0);
        assert_eq!(hunger.level(&config), HungerLevel::Hungry);
        hunger.eat(200.0);
        assert_eq!(hunger.value(), 0.0);
        assert_eq!(hunger.level(&config), HungerLevel::Sated);
    }

    #[test]
    fn levels_follow_thresholds() {
        let config = NeedsConfig::default();
        assert_eq!(Hunger::new(29.9).level(&config), HungerLevel::Sated);
        assert_eq!(Hunger::new(30.0).level(&config), HungerLevel::Peckish);
        assert_eq!(Hunger::new(60.0).level(&config), HungerLevel::Hungry);
    }
}
