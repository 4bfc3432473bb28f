//! Configuration module - match tuning and environment variable parsing

use std::env;
use std::str::FromStr;

use glam::Vec3;

use crate::game::GrenadeEffect;
use crate::util::time::SIMULATION_TPS;

/// How the splash hit test picks its distance threshold
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitTest {
    /// Fixed multiple of the world scale, independent of the grenade
    Fixed { meters: f32 },
    /// The grenade's declared explosion radius
    ExplosionRadius,
}

impl Default for HitTest {
    fn default() -> Self {
        Self::Fixed { meters: 2.0 }
    }
}

/// Tuning passed to the match controller at construction
#[derive(Debug, Clone, PartialEq)]
pub struct MatchConfig {
    /// World units per meter
    pub world_scale: f32,
    /// Meters per second squared
    pub gravity: f32,
    pub ground_level: f32,
    /// Seconds of hold needed for a full charge
    pub charge_max: f32,
    pub hp_max: u32,
    pub hit_test: HitTest,
    /// Hand position relative to the thrower, in meters, for a thrower facing +X
    pub release_offset: Vec3,
    /// Grenade the player throws until changed
    pub player_effect: GrenadeEffect,
    /// Enemy RNG seed
    pub seed: u64,
}

impl Default for MatchConfig {
    fn default() -> Self {
        Self {
            world_scale: 20.0,
            gravity: 9.8,
            ground_level: 0.0,
            charge_max: 10.0,
            hp_max: 100,
            hit_test: HitTest::default(),
            release_offset: Vec3::new(0.8, 1.0, -0.2),
            player_effect: GrenadeEffect::Fire,
            seed: 0,
        }
    }
}

impl MatchConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !positive_finite(self.world_scale) {
            return Err(ConfigError::OutOfRange("world_scale"));
        }
        if !positive_finite(self.gravity) {
            return Err(ConfigError::OutOfRange("gravity"));
        }
        if !positive_finite(self.charge_max) {
            return Err(ConfigError::OutOfRange("charge_max"));
        }
        if self.hp_max == 0 {
            return Err(ConfigError::OutOfRange("hp_max"));
        }
        if let HitTest::Fixed { meters } = self.hit_test {
            if !positive_finite(meters) {
                return Err(ConfigError::OutOfRange("hit_test"));
            }
        }
        Ok(())
    }

    /// Grenade release point for a thrower standing at `position`
    pub fn release_point(&self, position: Vec3, facing: f32) -> Vec3 {
        let offset = self.release_offset * self.world_scale;
        position + Vec3::new(offset.x * facing, offset.y, offset.z)
    }
}

/// Host configuration loaded from environment variables
#[derive(Clone, Debug)]
pub struct Config {
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
    /// Emit JSON log lines
    pub log_json: bool,
    /// Host frame rate
    pub tick_rate: u32,
    /// Seconds the demo pilot holds the throw input
    pub demo_hold_secs: f32,
    /// Matches to play before exiting
    pub demo_matches: u32,
    pub match_config: MatchConfig,
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = MatchConfig::default();

        let hit_test = match env::var("HIT_RADIUS") {
            Ok(mode) if mode.eq_ignore_ascii_case("explosion") => HitTest::ExplosionRadius,
            Ok(_) => return Err(ConfigError::Invalid("HIT_RADIUS")),
            Err(_) => HitTest::Fixed {
                meters: parse_or("HIT_RADIUS_METERS", 2.0)?,
            },
        };

        let player_effect = match env::var("PLAYER_EFFECT") {
            Ok(name) => {
                GrenadeEffect::from_name(&name).ok_or(ConfigError::Invalid("PLAYER_EFFECT"))?
            }
            Err(_) => defaults.player_effect,
        };

        let match_config = MatchConfig {
            world_scale: parse_or("WORLD_SCALE", defaults.world_scale)?,
            charge_max: parse_or("CHARGE_MAX", defaults.charge_max)?,
            hp_max: parse_or("HP_MAX", defaults.hp_max)?,
            seed: parse_or("MATCH_SEED", defaults.seed)?,
            hit_test,
            player_effect,
            ..defaults
        };
        match_config.validate()?;

        Ok(Self {
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            log_json: env::var("LOG_FORMAT")
                .map(|f| f.eq_ignore_ascii_case("json"))
                .unwrap_or(false),
            tick_rate: parse_or("TICK_RATE", SIMULATION_TPS)?,
            demo_hold_secs: parse_or("DEMO_HOLD_SECS", 6.8)?,
            demo_matches: parse_or("DEMO_MATCHES", 1)?,
            match_config,
        })
    }
}

fn positive_finite(value: f32) -> bool {
    value.is_finite() && value > 0.0
}

fn parse_or<T: FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map_err(|_| ConfigError::Invalid(name)),
        Err(_) => Ok(default),
    }
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid value for environment variable: {0}")]
    Invalid(&'static str),

    #[error("Match setting out of range: {0}")]
    OutOfRange(&'static str),
}
