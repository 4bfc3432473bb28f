//! Per-frame visual state handed to the presentation layer

use glam::Vec3;
use serde::Serialize;

use super::combat::Combatant;
use super::grenade::{GrenadeEffect, GrenadeId, GrenadeInstance, GrenadeState};
use super::{CombatState, Side};

/// Force bar state
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ChargeIndicator {
    /// force / max force
    pub progress: f32,
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombatantSnapshot {
    pub side: Side,
    pub position: Vec3,
    pub hp: u32,
    pub hp_max: u32,
    pub alive: bool,
}

impl From<&Combatant> for CombatantSnapshot {
    fn from(c: &Combatant) -> Self {
        Self {
            side: c.side,
            position: c.position,
            hp: c.hp(),
            hp_max: c.hp_max(),
            alive: c.is_alive(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GrenadeSnapshot {
    pub id: GrenadeId,
    pub effect: GrenadeEffect,
    pub owner: Side,
    pub position: Vec3,
    pub state: GrenadeState,
}

impl From<&GrenadeInstance> for GrenadeSnapshot {
    fn from(g: &GrenadeInstance) -> Self {
        Self {
            id: g.id,
            effect: g.effect,
            owner: g.owner,
            position: g.position,
            state: g.state,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MatchSnapshot {
    pub tick: u64,
    pub state: Option<CombatState>,
    pub charge: ChargeIndicator,
    pub combatants: Vec<CombatantSnapshot>,
    pub grenades: Vec<GrenadeSnapshot>,
    pub winner: Option<Side>,
}

impl MatchSnapshot {
    pub fn combatant(&self, side: Side) -> Option<&CombatantSnapshot> {
        self.combatants.iter().find(|c| c.side == side)
    }

    pub fn grenade(&self, id: GrenadeId) -> Option<&GrenadeSnapshot> {
        self.grenades.iter().find(|g| g.id == id)
    }
}
