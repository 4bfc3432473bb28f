//! Turn-based grenade combat

pub mod ai;
pub mod combat;
pub mod events;
pub mod force;
pub mod fsm;
pub mod grenade;
pub mod r#match;
pub mod physics;
pub mod signal;
pub mod snapshot;

pub use combat::{Combatant, DamageEvent};
pub use events::MatchEvent;
pub use grenade::{GrenadeEffect, GrenadeId, GrenadeInstance, GrenadeState};
pub use r#match::MatchController;
pub use snapshot::{ChargeIndicator, MatchSnapshot};

use serde::{Deserialize, Serialize};

/// Which combatant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    pub const ALL: [Side; 2] = [Self::Player, Self::Enemy];

    pub fn opponent(self) -> Self {
        match self {
            Self::Player => Self::Enemy,
            Self::Enemy => Self::Player,
        }
    }

    /// Sign of the X axis pointing at the opponent
    pub fn facing(self) -> f32 {
        match self {
            Self::Player => 1.0,
            Self::Enemy => -1.0,
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            Self::Player => 0,
            Self::Enemy => 1,
        }
    }
}

/// Combat turn states
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CombatState {
    /// Intro sequence playing
    Init,
    /// Player may charge and release
    PlayerTurn,
    /// Player throw animation and grenade flight
    PlayerThrow,
    /// Enemy picks effect and force
    EnemyTurn,
    /// Enemy throw animation and grenade flight
    EnemyThrow,
    /// Match decided, waiting for restart
    GameOver,
}

impl CombatState {
    pub const ALL: [CombatState; 6] = [
        Self::Init,
        Self::PlayerTurn,
        Self::PlayerThrow,
        Self::EnemyTurn,
        Self::EnemyThrow,
        Self::GameOver,
    ];

    /// Whose turn the state belongs to
    pub fn side(self) -> Option<Side> {
        match self {
            Self::PlayerTurn | Self::PlayerThrow => Some(Side::Player),
            Self::EnemyTurn | Self::EnemyThrow => Some(Side::Enemy),
            Self::Init | Self::GameOver => None,
        }
    }
}
