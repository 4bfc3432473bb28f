//! Notifications emitted to the presentation layer.
//! These serialize with a `type` tag so a host can forward them as JSON.

use glam::Vec3;
use serde::Serialize;

use super::combat::DamageEvent;
use super::grenade::{GrenadeEffect, GrenadeId};
use super::{CombatState, Side};

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchEvent {
    /// A new FSM state became active
    TurnChanged { state: CombatState },

    /// Player started holding the throw input
    ChargeStarted,

    /// A grenade left a combatant's hand
    GrenadeThrown {
        grenade_id: GrenadeId,
        owner: Side,
        effect: GrenadeEffect,
        origin: Vec3,
        velocity: Vec3,
    },

    /// A grenade reached the ground and was resolved
    Damage(DamageEvent),

    /// A grenade finished exploding and was removed
    GrenadeDestroyed { grenade_id: GrenadeId, owner: Side },

    /// One combatant is out of hit points
    GameOver { winner: Side },

    /// Combatants reset for a new match
    MatchRestarted,
}
