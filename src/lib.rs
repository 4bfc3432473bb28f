//! Grenade Duel - turn-based grenade combat core
//!
//! Two combatants take turns charging and throwing elemental grenades. This
//! crate holds the combat state machine, the charge force model, ballistic
//! grenade flight and splash damage. Rendering, animation and effects sit
//! behind the [`view::Presentation`] trait.

pub mod config;
pub mod error;
pub mod game;
pub mod util;
pub mod view;

pub use config::{Config, ConfigError, HitTest, MatchConfig};
pub use error::MatchError;
pub use game::{CombatState, GrenadeEffect, MatchController, MatchEvent, Side};
