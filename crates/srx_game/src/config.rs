//! Immutable simulation tuning.
//!
//! One `SimConfig` is built at startup (defaults, optionally overridden by a
//! JSON file) and handed to `Simulation::new`. Nothing reads tuning from
//! global state. Any subset of fields may appear in the file; missing fields
//! keep their defaults.
//!
//! Defaults are tuned for a 60 Hz tick and 32 px tiles. Speeds are px/s,
//! accelerations px/s^2, durations milliseconds of run time.

use std::path::Path;

use serde::Deserialize;

use crate::data::{read_json, DataError};

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(default)]
pub struct SimConfig {
    pub tile_size: f32,
    pub physics: PhysicsConfig,
    pub enemy: EnemyConfig,
    pub effects: EffectConfig,
    pub run: RunConfig,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct PhysicsConfig {
    pub gravity: f32,
    pub terminal_velocity: f32,
    pub max_speed: f32,
    pub acceleration: f32,
    pub friction: f32,
    pub jump_speed: f32,
    pub stomp_bounce_speed: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct EnemyConfig {
    pub speed: f32,
    pub gravity: f32,
    pub jump_speed: f32,
    pub jump_interval_ms: u64,
    pub fly_amplitude: f32,
    /// Radians per second of the flying bob.
    pub fly_frequency: f32,
    pub default_patrol_distance: f32,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct EffectConfig {
    pub speed_multiplier: f32,
    pub speed_boost_ms: u64,
    pub invincibility_ms: u64,
}

#[derive(Debug, Deserialize, Clone, Copy, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    pub tick_hz: u32,
    pub countdown_secs: u32,
    pub start_lives: u32,
    /// Respawn lands this far above the checkpoint anchor.
    pub respawn_offset: f32,
    pub ghost_sample_interval_ms: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            tile_size: 32.0,
            physics: PhysicsConfig::default(),
            enemy: EnemyConfig::default(),
            effects: EffectConfig::default(),
            run: RunConfig::default(),
        }
    }
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: 2880.0,
            terminal_velocity: 1200.0,
            max_speed: 480.0,
            acceleration: 1800.0,
            friction: 432.0,
            jump_speed: 960.0,
            stomp_bounce_speed: 600.0,
        }
    }
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            speed: 120.0,
            gravity: 2304.0,
            jump_speed: 600.0,
            jump_interval_ms: 2000,
            fly_amplitude: 32.0,
            fly_frequency: 3.0,
            default_patrol_distance: 128.0,
        }
    }
}

impl Default for EffectConfig {
    fn default() -> Self {
        Self {
            speed_multiplier: 1.5,
            speed_boost_ms: 5000,
            invincibility_ms: 5000,
        }
    }
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            tick_hz: 60,
            countdown_secs: 3,
            start_lives: 3,
            respawn_offset: 64.0,
            ghost_sample_interval_ms: 50,
        }
    }
}

impl SimConfig {
    pub fn tick_dt_us(&self) -> u64 {
        let hz = u64::from(self.run.tick_hz.max(1));
        (1_000_000 + hz / 2) / hz
    }

    pub fn tick_dt_secs(&self) -> f32 {
        self.tick_dt_us() as f32 / 1_000_000.0
    }

    pub fn validate(&self) -> Result<(), DataError> {
        if self.run.tick_hz == 0 {
            return Err(invalid("run.tick_hz must be > 0"));
        }
        if self.tile_size <= 0.0 {
            return Err(invalid("tile_size must be > 0"));
        }
        if self.physics.gravity < 0.0 || self.enemy.gravity < 0.0 {
            return Err(invalid("gravity must be >= 0"));
        }
        if self.physics.terminal_velocity <= 0.0 {
            return Err(invalid("physics.terminal_velocity must be > 0"));
        }
        if self.physics.max_speed <= 0.0 {
            return Err(invalid("physics.max_speed must be > 0"));
        }
        if self.effects.speed_multiplier <= 0.0 {
            return Err(invalid("effects.speed_multiplier must be > 0"));
        }
        if self.run.ghost_sample_interval_ms == 0 {
            return Err(invalid("run.ghost_sample_interval_ms must be > 0"));
        }
        Ok(())
    }
}

pub fn load_config_from_path(path: &Path) -> Result<SimConfig, DataError> {
    let config: SimConfig = read_json(path)?;
    config.validate()?;
    Ok(config)
}

fn invalid(reason: &str) -> DataError {
    DataError::Invalid(format!("Config validation failed: {reason}"))
}
