//! CorePlugin wires the fixed simulation step, time scaling and schedule ordering.
use bevy::prelude::*;
#[cfg(feature = "core_debug")]
use bevy::time::TimerMode;
use serde::Deserialize;
use std::time::Duration;

use super::config::load_toml_or_default;

const CONFIG_PATH: &str = "config/simulation.toml";
const DEFAULT_TICK_HZ: f64 = 10.0;
const DEFAULT_TIME_SCALE: f32 = 1.0;
const MIN_TIME_SCALE: f32 = 0.001;
const MIN_PLAYER_TIME_SCALE: f32 = 0.125;
const MAX_PLAYER_TIME_SCALE: f32 = 16.0;

#[cfg(feature = "core_debug")]
#[derive(Resource)]
struct DebugTickTimer {
    timer: Timer,
}

#[cfg(feature = "core_debug")]
impl Default for DebugTickTimer {
    fn default() -> Self {
        Self {
            timer: Timer::from_seconds(1.0, TimerMode::Repeating),
        }
    }
}

/// Ordering of the gameplay systems that run once per fixed tick.
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SimulationSet {
    /// Clocks and crop growth.
    Time,
    /// Hunger and other bodily needs.
    Needs,
    /// NPC decision making.
    Intent,
    /// Grid movement for every character.
    Movement,
    /// Farming and eating requests are resolved against the world.
    Actions,
    /// Outcomes are written into character memories.
    Memory,
}

/// Set while a text field owns the keyboard.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct TextInputActive(pub bool);

/// Run condition for systems bound to single-key shortcuts.
pub fn hotkeys_enabled(focus: Res<TextInputActive>) -> bool {
    !focus.0
}

#[derive(Debug, Clone, Deserialize, Default)]
struct RawSimulationConfig {
    #[serde(default)]
    simulation: RawSimulationSection,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
struct RawSimulationSection {
    tick_hz: f64,
    time_scale: f32,
}

impl Default for RawSimulationSection {
    fn default() -> Self {
        Self {
            tick_hz: DEFAULT_TICK_HZ,
            time_scale: DEFAULT_TIME_SCALE,
        }
    }
}

/// Fixed-step rate and initial time scale.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SimulationSettings {
    pub tick_hz: f64,
    pub time_scale: f32,
}

impl SimulationSettings {
    pub fn load_or_default() -> Self {
        load_toml_or_default::<RawSimulationConfig>(CONFIG_PATH).into()
    }
}

impl Default for SimulationSettings {
    fn default() -> Self {
        RawSimulationConfig::default().into()
    }
}

impl From<RawSimulationConfig> for SimulationSettings {
    fn from(value: RawSimulationConfig) -> Self {
        let tick_hz = if value.simulation.tick_hz.is_finite() {
            value.simulation.tick_hz.clamp(1.0, 240.0)
        } else {
            DEFAULT_TICK_HZ
        };
        Self {
            tick_hz,
            time_scale: value.simulation.time_scale.max(MIN_TIME_SCALE),
        }
    }
}

/// Counts simulation ticks and the simulated time they cover.
#[derive(Resource, Debug)]
pub struct SimulationClock {
    time_scale: f32,
    ticks: u64,
    last_delta: Duration,
    elapsed: Duration,
}

impl SimulationClock {
    /// Creates a new clock with the provided time-scale multiplier.
    pub fn new(time_scale: f32) -> Self {
        Self {
            time_scale: time_scale.max(MIN_TIME_SCALE),
            ticks: 0,
            last_delta: Duration::ZERO,
            elapsed: Duration::ZERO,
        }
    }

    /// Sets the time-scale multiplier (clamped to a small positive minimum).
    pub fn set_time_scale(&mut self, scale: f32) {
        self.time_scale = scale.max(MIN_TIME_SCALE);
    }

    /// Returns the current time-scale multiplier.
    pub fn time_scale(&self) -> f32 {
        self.time_scale
    }

    /// Number of fixed ticks simulated so far.
    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Simulated duration of the most recent tick.
    #[cfg_attr(not(feature = "core_debug"), allow(dead_code))]
    pub fn last_delta(&self) -> Duration {
        self.last_delta
    }

    /// Total simulated duration since start-up.
    #[cfg_attr(not(feature = "core_debug"), allow(dead_code))]
    pub fn elapsed(&self) -> Duration {
        self.elapsed
    }

    /// Records one fixed tick of the given simulated length.
    pub fn tick(&mut self, delta: Duration) {
        self.ticks = self.ticks.saturating_add(1);
        self.last_delta = delta;
        self.elapsed += delta;
    }
}

impl Default for SimulationClock {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_SCALE)
    }
}

/// Registers the fixed timestep, the simulation clock and schedule sets.
#[derive(Debug, Clone, Copy, Default)]
pub struct CorePlugin {
    settings: Option<SimulationSettings>,
}

impl CorePlugin {
    /// Uses explicit settings instead of `config/simulation.toml`.
    pub const fn with_settings(settings: SimulationSettings) -> Self {
        Self {
            settings: Some(settings),
        }
    }
}

impl Plugin for CorePlugin {
    fn build(&self, app: &mut App) {
        let settings = self
            .settings
            .unwrap_or_else(SimulationSettings::load_or_default);

        app.insert_resource(settings)
            .insert_resource(Time::<Fixed>::from_hz(settings.tick_hz))
            .insert_resource(SimulationClock::new(settings.time_scale))
            .init_resource::<TextInputActive>()
            .configure_sets(
                FixedUpdate,
                (
                    SimulationSet::Time,
                    SimulationSet::Needs,
                    SimulationSet::Intent,
                    SimulationSet::Movement,
                    SimulationSet::Actions,
                    SimulationSet::Memory,
                )
                    .chain(),
            )
            .add_systems(Startup, apply_initial_time_scale)
            .add_systems(
                FixedUpdate,
                advance_simulation_clock.in_set(SimulationSet::Time),
            )
            .add_systems(Update, handle_time_controls.run_if(hotkeys_enabled));

        #[cfg(feature = "core_debug")]
        {
            app.insert_resource(DebugTickTimer::default())
                .add_systems(FixedUpdate, log_sim_ticks.after(advance_simulation_clock));
        }
    }
}

fn advance_simulation_clock(mut clock: ResMut<SimulationClock>, time: Res<Time>) {
    clock.tick(time.delta());
}

fn apply_initial_time_scale(
    settings: Res<SimulationSettings>,
    clock: Res<SimulationClock>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    virtual_time.set_relative_speed(clock.time_scale());
    info!(
        "CorePlugin initialised: {:.1} ticks/s, time scale {:.3}",
        settings.tick_hz,
        clock.time_scale()
    );
}

/// Keyboard controls: `P` pauses, `[` / `]` halve or double the time scale.
pub fn handle_time_controls(
    keyboard: Res<ButtonInput<KeyCode>>,
    mut clock: ResMut<SimulationClock>,
    mut virtual_time: ResMut<Time<Virtual>>,
) {
    if keyboard.just_pressed(KeyCode::KeyP) {
        if virtual_time.is_paused() {
            virtual_time.unpause();
            info!("Simulation resumed");
        } else {
            virtual_time.pause();
            info!("Simulation paused");
        }
    }

    let mut scale = clock.time_scale();
    if keyboard.just_pressed(KeyCode::BracketRight) {
        scale = step_time_scale(scale, 2.0);
    }
    if keyboard.just_pressed(KeyCode::BracketLeft) {
        scale = step_time_scale(scale, 0.5);
    }

    if (scale - clock.time_scale()).abs() > f32::EPSILON {
        clock.set_time_scale(scale);
        virtual_time.set_relative_speed(scale);
        info!("Time scale set to {:.3}", scale);
    }
}

fn step_time_scale(current: f32, factor: f32) -> f32 {
    (current * factor).clamp(MIN_PLAYER_TIME_SCALE, MAX_PLAYER_TIME_SCALE)
}

#[cfg(feature = "core_debug")]
fn log_sim_ticks(
    mut timer: ResMut<DebugTickTimer>,
    clock: Res<SimulationClock>,
    settings: Res<SimulationSettings>,
) {
    if timer.timer.tick(clock.last_delta()).just_finished() {
        info!(
            target: "core_debug",
            "Sim elapsed: {:.2}s | ticks: {} | scale: {:.3} | hz: {:.1}",
            clock.elapsed().as_secs_f32(),
            clock.ticks(),
            clock.time_scale(),
            settings.tick_hz,
        );
    }
}
