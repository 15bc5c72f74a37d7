//! World time configuration, day clock resource, and sky colour system.
use std::f32::consts::PI;

use bevy::prelude::*;
use serde::Deserialize;

use crate::core::config::load_toml_or_default;

const CONFIG_PATH: &str = "config/simulation.toml";

#[derive(Debug, Clone, Deserialize, Default)]
struct RawTimeConfig {
    #[serde(default)]
    clock: RawClockSection,
    #[serde(default)]
    sky: RawSkySection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawClockSection {
    ticks_per_day: u32,
    start_fraction: f32,
    dawn_fraction: f32,
    dusk_fraction: f32,
}

impl Default for RawClockSection {
    fn default() -> Self {
        Self {
            ticks_per_day: 3_000,
            start_fraction: 0.3,
            dawn_fraction: 0.22,
            dusk_fraction: 0.8,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSkySection {
    day_color: [f32; 3],
    night_color: [f32; 3],
}

impl Default for RawSkySection {
    fn default() -> Self {
        Self {
            day_color: [0.55, 0.75, 0.95],
            night_color: [0.04, 0.05, 0.12],
        }
    }
}

/// Tunable parameters describing how the world clock behaves.
#[derive(Resource, Debug, Clone)]
pub struct WorldTimeSettings {
    pub ticks_per_day: u32,
    pub start_fraction: f32,
    pub dawn_fraction: f32,
    pub dusk_fraction: f32,
    pub day_color: Vec3,
    pub night_color: Vec3,
}

impl WorldTimeSettings {
    pub fn load_or_default() -> Self {
        load_toml_or_default::<RawTimeConfig>(CONFIG_PATH).into()
    }
}

impl Default for WorldTimeSettings {
    fn default() -> Self {
        RawTimeConfig::default().into()
    }
}

impl From<RawTimeConfig> for WorldTimeSettings {
    fn from(value: RawTimeConfig) -> Self {
        let clock = value.clock;
        let dawn = clock.dawn_fraction.clamp(0.0, 1.0);
        let dusk = clock.dusk_fraction.clamp(0.0, 1.0);
        let (dawn, dusk) = if dawn == dusk {
            (dawn, (dawn + 0.5) % 1.0)
        } else {
            (dawn.min(dusk), dawn.max(dusk))
        };

        Self {
            ticks_per_day: clock.ticks_per_day.max(10),
            start_fraction: clock.start_fraction.rem_euclid(1.0),
            dawn_fraction: dawn,
            dusk_fraction: dusk,
            day_color: Vec3::from_array(value.sky.day_color),
            night_color: Vec3::from_array(value.sky.night_color),
        }
    }
}

/// Runtime state for the world clock, counted in simulation ticks.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct WorldClock {
    day_count: u64,
    ticks_into_day: u32,
    ticks_per_day: u32,
}

impl WorldClock {
    pub fn new(settings: &WorldTimeSettings) -> Self {
        let ticks_per_day = settings.ticks_per_day.max(1);
        Self {
            day_count: 1,
            ticks_into_day: (settings.start_fraction * ticks_per_day as f32) as u32 % ticks_per_day,
            ticks_per_day,
        }
    }

    /// Restores a clock from saved values, wrapping ticks into the day.
    pub fn restore(day_count: u64, ticks_into_day: u32, ticks_per_day: u32) -> Self {
        let ticks_per_day = ticks_per_day.max(1);
        Self {
            day_count: day_count.max(1),
            ticks_into_day: ticks_into_day % ticks_per_day,
            ticks_per_day,
        }
    }

    /// Fraction of the current day elapsed, in `[0, 1)`.
    pub fn time_of_day(&self) -> f32 {
        self.ticks_into_day as f32 / self.ticks_per_day as f32
    }

    pub fn day_count(&self) -> u64 {
        self.day_count
    }

    pub fn ticks_into_day(&self) -> u32 {
        self.ticks_into_day
    }

    /// Advances one tick. Returns true when a new day begins.
    pub fn tick(&mut self) -> bool {
        self.ticks_into_day += 1;
        if self.ticks_into_day >= self.ticks_per_day {
            self.ticks_into_day = 0;
            self.day_count = self.day_count.saturating_add(1);
            return true;
        }
        false
    }

    /// 24-hour wall clock label such as "07:30".
    pub fn clock_label(&self) -> String {
        let minutes = (self.time_of_day() * 24.0 * 60.0) as u32;
        format!("{:02}:{:02}", minutes / 60, minutes % 60)
    }

    /// Label used in memories, e.g. "day 3, 14:05".
    pub fn stamp(&self) -> String {
        format!("day {}, {}", self.day_count, self.clock_label())
    }

    /// 0 at night, rising to 1 at midday between dawn and dusk.
    pub fn daylight(&self, settings: &WorldTimeSettings) -> f32 {
        let span = settings.dusk_fraction - settings.dawn_fraction;
        if span <= 0.0 {
            return 1.0;
        }
        let t = self.time_of_day();
        if t < settings.dawn_fraction || t > settings.dusk_fraction {
            return 0.0;
        }
        let normalized = (t - settings.dawn_fraction) / span;
        (normalized * PI).sin().max(0.0)
    }
}

impl Default for WorldClock {
    fn default() -> Self {
        Self::new(&WorldTimeSettings::default())
    }
}

/// Advances the world clock once per simulation tick.
pub fn advance_world_clock(mut clock: ResMut<WorldClock>) {
    if clock.tick() {
        info!("A new day dawns: day {}", clock.day_count());
    }
}

/// Blends the clear colour between night and day.
pub fn apply_sky_color(
    clock: Res<WorldClock>,
    settings: Res<WorldTimeSettings>,
    mut clear_color: ResMut<ClearColor>,
) {
    let daylight = clock.daylight(&settings).powf(0.6);
    let sky = settings.night_color.lerp(settings.day_color, daylight);
    clear_color.0 = Color::srgb(sky.x, sky.y, sky.z);
}
