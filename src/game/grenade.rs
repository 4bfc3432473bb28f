//! Grenade effects, tuning table and in-flight grenade instances

use glam::Vec3;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Side;

/// Identifier of a spawned grenade
pub type GrenadeId = Uuid;

/// Elemental grenade variants
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrenadeEffect {
    #[default]
    Fire,
    Ice,
    Poison,
}

impl GrenadeEffect {
    pub const ALL: [GrenadeEffect; 3] = [Self::Fire, Self::Ice, Self::Poison];

    /// Static tuning record, in meters
    pub fn tuning(self) -> &'static GrenadeTuning {
        match self {
            Self::Fire => &FIRE,
            Self::Ice => &ICE,
            Self::Poison => &POISON,
        }
    }

    /// Parse a lowercase effect name (`fire`, `ice`, `poison`)
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "fire" => Some(Self::Fire),
            "ice" => Some(Self::Ice),
            "poison" => Some(Self::Poison),
            _ => None,
        }
    }
}

/// Per-effect tuning constants
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrenadeTuning {
    /// Launch speed at zero charge
    pub throw_force_min: f32,
    /// Launch speed at full charge
    pub throw_force_max: f32,
    /// Declared splash radius
    pub explosion_radius: f32,
    /// Hit points removed on a hit
    pub damage: u32,
}

impl GrenadeTuning {
    /// Convert speeds and radius from meters to world units
    pub fn scaled(&self, world_scale: f32) -> Self {
        Self {
            throw_force_min: self.throw_force_min * world_scale,
            throw_force_max: self.throw_force_max * world_scale,
            explosion_radius: self.explosion_radius * world_scale,
            damage: self.damage,
        }
    }
}

const FIRE: GrenadeTuning = GrenadeTuning {
    throw_force_min: 4.0,
    throw_force_max: 12.0,
    explosion_radius: 2.5,
    damage: 40,
};

const ICE: GrenadeTuning = GrenadeTuning {
    throw_force_min: 0.3 * 10.0,
    throw_force_max: 1.5 * 10.0,
    explosion_radius: 1.5,
    damage: 30,
};

const POISON: GrenadeTuning = GrenadeTuning {
    throw_force_min: 0.5 * 6.0,
    throw_force_max: 1.5 * 6.0,
    explosion_radius: 2.0,
    damage: 60,
};

/// Grenade lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GrenadeState {
    /// Moving under gravity
    Flying,
    /// Hit the ground, explosion effect playing
    Exploding,
    /// Explosion finished, awaiting removal
    Destroyed,
}

/// A thrown grenade owned by the match controller
#[derive(Debug, Clone)]
pub struct GrenadeInstance {
    pub id: GrenadeId,
    pub effect: GrenadeEffect,
    pub owner: Side,
    pub position: Vec3,
    pub velocity: Vec3,
    pub state: GrenadeState,
    /// Tuning already converted to world units
    pub tuning: GrenadeTuning,
}

impl GrenadeInstance {
    pub fn new(
        effect: GrenadeEffect,
        owner: Side,
        origin: Vec3,
        velocity: Vec3,
        world_scale: f32,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            effect,
            owner,
            position: origin,
            velocity,
            state: GrenadeState::Flying,
            tuning: effect.tuning().scaled(world_scale),
        }
    }

    pub fn is_flying(&self) -> bool {
        self.state == GrenadeState::Flying
    }

    /// Mark the explosion effect as complete. Returns false unless the grenade was exploding.
    pub fn finish_explosion(&mut self) -> bool {
        if self.state != GrenadeState::Exploding {
            return false;
        }
        self.state = GrenadeState::Destroyed;
        true
    }
}

/// Launch velocity for a throw: up and toward the opponent
pub fn launch_velocity(owner: Side, speed: f32) -> Vec3 {
    Vec3::new(owner.facing() * speed, speed, 0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poison_matches_reference_tuning() {
        let t = GrenadeEffect::Poison.tuning().scaled(20.0);
        assert_eq!(t.throw_force_min, 60.0);
        assert_eq!(t.throw_force_max, 180.0);
        assert_eq!(t.explosion_radius, 40.0);
        assert_eq!(t.damage, 60);
    }

    #[test]
    fn every_effect_has_a_positive_speed_range() {
        for effect in GrenadeEffect::ALL {
            let t = effect.tuning();
            assert!(t.throw_force_min > 0.0, "{effect:?}");
            assert!(t.throw_force_max > t.throw_force_min, "{effect:?}");
            assert!(t.damage > 0, "{effect:?}");
        }
    }

    #[test]
    fn fire_is_the_default_effect() {
        assert_eq!(GrenadeEffect::default(), GrenadeEffect::Fire);
    }

    #[test]
    fn effect_names_parse_case_insensitively() {
        assert_eq!(GrenadeEffect::from_name("Ice"), Some(GrenadeEffect::Ice));
        assert_eq!(GrenadeEffect::from_name(" poison "), Some(GrenadeEffect::Poison));
        assert_eq!(GrenadeEffect::from_name("acid"), None);
    }

    #[test]
    fn enemy_launch_is_mirrored() {
        assert_eq!(launch_velocity(Side::Player, 50.0), Vec3::new(50.0, 50.0, 0.0));
        assert_eq!(launch_velocity(Side::Enemy, 50.0), Vec3::new(-50.0, 50.0, 0.0));
    }

    #[test]
    fn only_exploding_grenades_can_finish() {
        let mut g = GrenadeInstance::new(
            GrenadeEffect::Fire,
            Side::Player,
            Vec3::ZERO,
            Vec3::ONE,
            20.0,
        );
        assert!(!g.finish_explosion());
        assert_eq!(g.state, GrenadeState::Flying);

        g.state = GrenadeState::Exploding;
        assert!(g.finish_explosion());
        assert_eq!(g.state, GrenadeState::Destroyed);
        assert!(!g.finish_explosion());
    }
}
