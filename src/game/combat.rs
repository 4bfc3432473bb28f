//! Combatants, splash hit test and damage

use glam::Vec3;
use serde::Serialize;
use tracing::{debug, info};

use crate::config::{HitTest, MatchConfig};

use super::grenade::{GrenadeEffect, GrenadeId, GrenadeInstance, GrenadeTuning};
use super::Side;

/// One side of the duel
#[derive(Debug, Clone, Serialize)]
pub struct Combatant {
    pub side: Side,
    pub position: Vec3,
    hp: u32,
    hp_max: u32,
}

impl Combatant {
    pub fn new(side: Side, position: Vec3, hp_max: u32) -> Self {
        Self {
            side,
            position,
            hp: hp_max,
            hp_max,
        }
    }

    pub fn hp(&self) -> u32 {
        self.hp
    }

    pub fn hp_max(&self) -> u32 {
        self.hp_max
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Subtract damage, stopping at zero. Returns the new hp.
    pub fn apply_damage(&mut self, damage: u32) -> u32 {
        self.hp = self.hp.saturating_sub(damage);
        self.hp
    }

    /// Back to full health at a new position
    pub fn respawn(&mut self, position: Vec3) {
        self.position = position;
        self.hp = self.hp_max;
    }
}

/// Outcome of one grenade impact
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DamageEvent {
    pub grenade_id: GrenadeId,
    pub effect: GrenadeEffect,
    pub attacker: Side,
    pub defender: Side,
    pub impact: Vec3,
    pub distance: f32,
    pub hit: bool,
    pub damage: u32,
    pub hp_before: u32,
    pub hp_after: u32,
}

impl DamageEvent {
    pub fn is_lethal(&self) -> bool {
        self.hit && self.hp_after == 0
    }
}

/// Splash hit test and damage application
#[derive(Debug, Clone, Copy)]
pub struct DamageResolver {
    hit_test: HitTest,
    world_scale: f32,
}

impl DamageResolver {
    pub fn new(hit_test: HitTest, world_scale: f32) -> Self {
        Self {
            hit_test,
            world_scale,
        }
    }

    pub fn from_config(config: &MatchConfig) -> Self {
        Self::new(config.hit_test, config.world_scale)
    }

    /// Hit distance threshold for a grenade (world units)
    pub fn hit_radius(&self, tuning: &GrenadeTuning) -> f32 {
        match self.hit_test {
            HitTest::Fixed { meters } => meters * self.world_scale,
            HitTest::ExplosionRadius => tuning.explosion_radius,
        }
    }

    /// Resolve a landed grenade against the defending combatant
    pub fn resolve_impact(
        &self,
        grenade: &GrenadeInstance,
        attacker: &Combatant,
        defender: &mut Combatant,
    ) -> DamageEvent {
        let distance = grenade.position.distance(defender.position);
        let radius = self.hit_radius(&grenade.tuning);
        let hit = distance < radius;
        let hp_before = defender.hp();

        let (damage, hp_after) = if hit {
            let hp_after = defender.apply_damage(grenade.tuning.damage);
            (hp_before - hp_after, hp_after)
        } else {
            (0, hp_before)
        };

        if hit {
            info!(
                grenade_id = %grenade.id,
                attacker = ?attacker.side,
                defender = ?defender.side,
                damage,
                hp = hp_after,
                "grenade hit"
            );
        } else {
            debug!(
                grenade_id = %grenade.id,
                distance,
                radius,
                "grenade missed"
            );
        }

        DamageEvent {
            grenade_id: grenade.id,
            effect: grenade.effect,
            attacker: attacker.side,
            defender: defender.side,
            impact: grenade.position,
            distance,
            hit,
            damage,
            hp_before,
            hp_after,
        }
    }
}
