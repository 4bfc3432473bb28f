//! Ballistic grenade motion and ground impact

use glam::Vec3;

use crate::config::MatchConfig;

use super::grenade::{GrenadeInstance, GrenadeState};

/// Constant-gravity integrator for grenades
#[derive(Debug, Clone, Copy)]
pub struct Ballistics {
    /// Gravity in meters per second squared
    pub gravity: f32,
    /// World units per meter
    pub world_scale: f32,
    /// Height of the ground plane
    pub ground_level: f32,
}

impl Ballistics {
    pub fn from_config(config: &MatchConfig) -> Self {
        Self {
            gravity: config.gravity,
            world_scale: config.world_scale,
            ground_level: config.ground_level,
        }
    }

    /// Downward acceleration in world units
    pub fn acceleration(&self) -> f32 {
        self.gravity * self.world_scale
    }

    /// Advance a flying grenade by one frame.
    /// Returns the impact point on the frame the grenade reaches the ground; only
    /// flying grenades move, so an impact is reported once per grenade.
    pub fn advance(&self, grenade: &mut GrenadeInstance, dt: f32) -> Option<Vec3> {
        if grenade.state != GrenadeState::Flying {
            return None;
        }

        grenade.velocity.y -= self.acceleration() * dt;
        grenade.position += grenade.velocity * dt;

        if grenade.position.y <= self.ground_level {
            grenade.state = GrenadeState::Exploding;
            return Some(grenade.position);
        }
        None
    }
}
