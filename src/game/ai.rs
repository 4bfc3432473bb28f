//! Enemy throw selection

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use super::grenade::GrenadeEffect;

/// What the enemy will throw this turn
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ThrowPlan {
    pub effect: GrenadeEffect,
    /// Launch speed in world units
    pub speed: f32,
}

/// Uniformly random effect and launch speed, no difficulty scaling
#[derive(Debug, Clone)]
pub struct EnemyPlanner {
    rng: ChaCha8Rng,
    world_scale: f32,
}

impl EnemyPlanner {
    pub fn new(seed: u64, world_scale: f32) -> Self {
        Self {
            rng: ChaCha8Rng::seed_from_u64(seed),
            world_scale,
        }
    }

    pub fn plan(&mut self) -> ThrowPlan {
        let effects = GrenadeEffect::ALL;
        let effect = effects[self.rng.gen_range(0..effects.len())];
        let tuning = effect.tuning().scaled(self.world_scale);
        let speed = self
            .rng
            .gen_range(tuning.throw_force_min..=tuning.throw_force_max);
        ThrowPlan { effect, speed }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn sampled_speed_stays_within_effect_bounds() {
        let mut planner = EnemyPlanner::new(7, 20.0);
        let mut seen = HashSet::new();

        for _ in 0..5_000 {
            let plan = planner.plan();
            let tuning = plan.effect.tuning().scaled(20.0);
            assert!(
                plan.speed >= tuning.throw_force_min && plan.speed <= tuning.throw_force_max,
                "{plan:?} outside [{}, {}]",
                tuning.throw_force_min,
                tuning.throw_force_max
            );
            seen.insert(plan.effect);
        }

        assert_eq!(seen.len(), GrenadeEffect::ALL.len());
    }

    #[test]
    fn same_seed_same_plans() {
        let mut a = EnemyPlanner::new(42, 20.0);
        let mut b = EnemyPlanner::new(42, 20.0);
        for _ in 0..32 {
            assert_eq!(a.plan(), b.plan());
        }
    }
}
