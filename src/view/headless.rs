//! Presentation without rendering: animation clocks and effect timers only.
//! Used by the demo binary and tests.

use std::collections::HashMap;

use glam::Vec3;
use tracing::{debug, warn};

use crate::game::snapshot::{ChargeIndicator, MatchSnapshot};
use crate::game::{GrenadeEffect, GrenadeId, Side};

use super::{Presentation, ThrowTiming, ViewEvent};

/// Positions and timings of the headless stage
#[derive(Debug, Clone, PartialEq)]
pub struct StageLayout {
    pub player_position: Vec3,
    pub enemy_position: Vec3,
    pub intro_secs: f32,
    pub explosion_secs: f32,
    pub player_throw: Option<ThrowTiming>,
    pub enemy_throw: Option<ThrowTiming>,
}

impl StageLayout {
    /// Combatants six meters either side of the origin
    pub fn new(world_scale: f32) -> Self {
        let dist = world_scale * 6.0;
        Self {
            player_position: Vec3::new(-dist, 0.0, 0.0),
            enemy_position: Vec3::new(dist, 0.0, 0.0),
            intro_secs: 2.0,
            explosion_secs: 1.0,
            player_throw: Some(ThrowTiming {
                release_at: 3.6,
                duration: 4.5,
            }),
            enemy_throw: Some(ThrowTiming {
                release_at: 1.2,
                duration: 2.0,
            }),
        }
    }

    fn throw_timing(&self, side: Side) -> Option<ThrowTiming> {
        match side {
            Side::Player => self.player_throw,
            Side::Enemy => self.enemy_throw,
        }
    }
}

#[derive(Debug, Clone)]
struct ThrowClip {
    side: Side,
    elapsed: f32,
    timing: ThrowTiming,
}

impl ThrowClip {
    /// Returns (crossed the release frame, reached the end)
    fn advance(&mut self, dt: f32) -> (bool, bool) {
        let prev = self.elapsed;
        self.elapsed += dt;
        let released = prev < self.timing.release_at && self.elapsed >= self.timing.release_at;
        (released, self.elapsed >= self.timing.duration)
    }
}

#[derive(Debug)]
pub struct HeadlessStage {
    layout: StageLayout,
    intro_remaining: Option<f32>,
    throws: Vec<ThrowClip>,
    explosions: Vec<(GrenadeId, f32)>,
    grenades: HashMap<GrenadeId, (GrenadeEffect, Vec3)>,
    defeated: Option<Side>,
    charge: Option<ChargeIndicator>,
}

impl HeadlessStage {
    pub fn new(layout: StageLayout) -> Self {
        Self {
            layout,
            intro_remaining: None,
            throws: Vec::new(),
            explosions: Vec::new(),
            grenades: HashMap::new(),
            defeated: None,
            charge: None,
        }
    }

    pub fn layout(&self) -> &StageLayout {
        &self.layout
    }

    pub fn is_throwing(&self, side: Side) -> bool {
        self.throws.iter().any(|clip| clip.side == side)
    }

    pub fn explosions_playing(&self) -> usize {
        self.explosions.len()
    }

    pub fn grenade_visual(&self, id: GrenadeId) -> Option<(GrenadeEffect, Vec3)> {
        self.grenades.get(&id).copied()
    }

    pub fn defeated(&self) -> Option<Side> {
        self.defeated
    }

    /// Force bar as last rendered
    pub fn charge_indicator(&self) -> Option<ChargeIndicator> {
        self.charge
    }
}

impl Presentation for HeadlessStage {
    fn play_intro(&mut self) {
        self.intro_remaining = Some(self.layout.intro_secs);
    }

    fn combatant_position(&self, side: Side) -> Vec3 {
        match side {
            Side::Player => self.layout.player_position,
            Side::Enemy => self.layout.enemy_position,
        }
    }

    fn release_timing(&self, side: Side) -> Option<ThrowTiming> {
        self.layout.throw_timing(side)
    }

    fn play_throw_animation(&mut self, side: Side) {
        let Some(timing) = self.layout.throw_timing(side) else {
            warn!(side = ?side, "throw animation has no release timing");
            return;
        };
        self.throws.retain(|clip| clip.side != side);
        self.throws.push(ThrowClip {
            side,
            elapsed: 0.0,
            timing,
        });
    }

    fn spawn_grenade_visual(&mut self, id: GrenadeId, effect: GrenadeEffect, origin: Vec3) {
        self.grenades.insert(id, (effect, origin));
    }

    fn trigger_explosion_visual(&mut self, id: GrenadeId) {
        self.explosions.push((id, self.layout.explosion_secs));
    }

    fn play_defeat_animation(&mut self, side: Side) {
        self.defeated = Some(side);
    }

    fn reset(&mut self) {
        self.throws.clear();
        self.explosions.clear();
        self.grenades.clear();
        self.defeated = None;
    }

    fn update(&mut self, dt: f32, snapshot: &MatchSnapshot) -> Vec<ViewEvent> {
        let mut events = Vec::new();

        if let Some(remaining) = self.intro_remaining.as_mut() {
            *remaining -= dt;
            if *remaining <= 0.0 {
                self.intro_remaining = None;
                events.push(ViewEvent::SetupComplete);
            }
        }

        self.throws.retain_mut(|clip| {
            let (released, finished) = clip.advance(dt);
            if released {
                debug!(side = ?clip.side, "release frame");
                events.push(ViewEvent::ReleaseTiming(clip.side));
            }
            if finished {
                events.push(ViewEvent::AnimationFinished(clip.side));
            }
            !finished
        });

        let mut finished = Vec::new();
        self.explosions.retain_mut(|(id, remaining)| {
            *remaining -= dt;
            if *remaining <= 0.0 {
                finished.push(*id);
                false
            } else {
                true
            }
        });
        for id in finished {
            self.grenades.remove(&id);
            events.push(ViewEvent::ExplosionFinished(id));
        }

        for grenade in &snapshot.grenades {
            if let Some(visual) = self.grenades.get_mut(&grenade.id) {
                visual.1 = grenade.position;
            }
        }
        self.charge = Some(snapshot.charge);

        events
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn empty_snapshot() -> MatchSnapshot {
        MatchSnapshot {
            tick: 0,
            state: None,
            charge: ChargeIndicator {
                progress: 0.0,
                visible: false,
            },
            combatants: Vec::new(),
            grenades: Vec::new(),
            winner: None,
        }
    }

    fn run(stage: &mut HeadlessStage, frames: usize, dt: f32) -> Vec<ViewEvent> {
        let snapshot = empty_snapshot();
        (0..frames)
            .flat_map(|_| stage.update(dt, &snapshot))
            .collect()
    }

    #[test]
    fn intro_completes_once() {
        let mut stage = HeadlessStage::new(StageLayout::new(20.0));
        stage.play_intro();
        let events = run(&mut stage, 300, 1.0 / 60.0);
        assert_eq!(events, vec![ViewEvent::SetupComplete]);
    }

    #[test]
    fn throw_releases_then_finishes() {
        let mut stage = HeadlessStage::new(StageLayout::new(20.0));
        stage.play_throw_animation(Side::Enemy);
        assert!(stage.is_throwing(Side::Enemy));

        let events = run(&mut stage, 600, 1.0 / 60.0);
        assert_eq!(
            events,
            vec![
                ViewEvent::ReleaseTiming(Side::Enemy),
                ViewEvent::AnimationFinished(Side::Enemy),
            ]
        );
        assert!(!stage.is_throwing(Side::Enemy));
    }

    #[test]
    fn release_fires_on_the_crossing_frame() {
        let mut stage = HeadlessStage::new(StageLayout::new(20.0));
        stage.play_throw_animation(Side::Player);

        let snapshot = empty_snapshot();
        assert!(stage.update(3.5, &snapshot).is_empty());
        assert_eq!(
            stage.update(0.2, &snapshot),
            vec![ViewEvent::ReleaseTiming(Side::Player)]
        );
        assert!(stage.update(0.2, &snapshot).is_empty());
    }

    #[test]
    fn explosion_reports_completion_and_drops_visual() {
        let mut stage = HeadlessStage::new(StageLayout::new(20.0));
        let id = GrenadeId::new_v4();
        stage.spawn_grenade_visual(id, GrenadeEffect::Ice, Vec3::ONE);
        stage.trigger_explosion_visual(id);

        let events = run(&mut stage, 120, 1.0 / 60.0);
        assert_eq!(events, vec![ViewEvent::ExplosionFinished(id)]);
        assert!(stage.grenade_visual(id).is_none());
        assert_eq!(stage.explosions_playing(), 0);
    }

    #[test]
    fn reset_cancels_pending_signals() {
        let mut stage = HeadlessStage::new(StageLayout::new(20.0));
        stage.play_throw_animation(Side::Player);
        stage.trigger_explosion_visual(GrenadeId::new_v4());
        stage.play_defeat_animation(Side::Enemy);
        stage.reset();

        assert!(run(&mut stage, 600, 1.0 / 60.0).is_empty());
        assert_eq!(stage.defeated(), None);
    }
}
