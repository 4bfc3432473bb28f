//! Presentation layer seam.
//!
//! The combat core drives rendering, animation and effects through
//! [`Presentation`] and receives their completion signals back as
//! [`ViewEvent`]s, either returned from [`Presentation::update`] or handed to
//! `MatchController::handle_view_event` directly by the host.

pub mod headless;

pub use headless::{HeadlessStage, StageLayout};

use glam::Vec3;

use crate::error::MatchError;
use crate::game::snapshot::MatchSnapshot;
use crate::game::{GrenadeEffect, GrenadeId, Side};

/// Signals raised by the presentation layer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewEvent {
    /// Intro camera sequence finished
    SetupComplete,
    /// Throw animation reached the frame where the grenade leaves the hand
    ReleaseTiming(Side),
    /// Throw animation finished
    AnimationFinished(Side),
    /// Explosion effect for a grenade finished
    ExplosionFinished(GrenadeId),
}

/// Timing of a throw animation, in seconds
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowTiming {
    pub release_at: f32,
    pub duration: f32,
}

impl ThrowTiming {
    pub fn validate(&self, side: Side) -> Result<(), MatchError> {
        let in_range = self.release_at > 0.0 && self.release_at <= self.duration;
        if !in_range {
            return Err(MatchError::InvalidReleaseTiming {
                side,
                release_at: self.release_at,
                duration: self.duration,
            });
        }
        Ok(())
    }
}

pub trait Presentation {
    /// Start the intro sequence; report `SetupComplete` when done
    fn play_intro(&mut self);

    fn combatant_position(&self, side: Side) -> Vec3;

    /// Throw animation timing, or `None` if the animation has no release event
    fn release_timing(&self, side: Side) -> Option<ThrowTiming>;

    /// Report `ReleaseTiming` once, then `AnimationFinished`
    fn play_throw_animation(&mut self, side: Side);

    fn spawn_grenade_visual(&mut self, id: GrenadeId, effect: GrenadeEffect, origin: Vec3);

    /// Report `ExplosionFinished` when the effect completes
    fn trigger_explosion_visual(&mut self, id: GrenadeId);

    fn play_defeat_animation(&mut self, side: Side);

    /// Drop all visuals and animations for a new match
    fn reset(&mut self);

    /// Advance the presentation by one frame and collect its signals
    fn update(&mut self, dt: f32, snapshot: &MatchSnapshot) -> Vec<ViewEvent>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn release_must_fall_inside_the_animation() {
        let ok = ThrowTiming {
            release_at: 3.6,
            duration: 4.5,
        };
        assert!(ok.validate(Side::Player).is_ok());

        for release_at in [0.0, -1.0, 5.0, f32::NAN] {
            let bad = ThrowTiming {
                release_at,
                duration: 4.5,
            };
            assert!(matches!(
                bad.validate(Side::Enemy),
                Err(MatchError::InvalidReleaseTiming {
                    side: Side::Enemy,
                    ..
                })
            ));
        }
    }
}
