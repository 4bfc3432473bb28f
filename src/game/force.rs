//! Charge-based throw force

use super::grenade::GrenadeTuning;

/// Accumulates charge while the throw input is held
#[derive(Debug, Clone)]
pub struct ForceModel {
    force: f32,
    max_force: f32,
    charging: bool,
}

impl ForceModel {
    pub fn new(max_force: f32) -> Self {
        Self {
            force: 0.0,
            max_force: max_force.max(f32::EPSILON),
            charging: false,
        }
    }

    pub fn set_charging(&mut self, active: bool) {
        self.charging = active;
    }

    pub fn is_charging(&self) -> bool {
        self.charging
    }

    /// Advance the charge. Force grows one unit per second while charging.
    pub fn tick(&mut self, dt: f32) {
        if self.charging {
            self.force = (self.force + dt).clamp(0.0, self.max_force);
        }
    }

    pub fn current_force(&self) -> f32 {
        self.force
    }

    pub fn max_force(&self) -> f32 {
        self.max_force
    }

    /// Charge fraction in [0, 1]
    pub fn progress(&self) -> f32 {
        self.force / self.max_force
    }

    pub fn is_full(&self) -> bool {
        self.force >= self.max_force
    }

    /// Drop accumulated charge and stop charging
    pub fn reset(&mut self) {
        self.force = 0.0;
        self.charging = false;
    }

    /// Launch speed for the current charge, interpolated over the grenade's speed range
    pub fn release_speed(&self, tuning: &GrenadeTuning) -> f32 {
        let range = tuning.throw_force_max - tuning.throw_force_min;
        tuning.throw_force_min + range * self.progress()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::grenade::GrenadeEffect;

    #[test]
    fn idle_model_does_not_accumulate() {
        let mut force = ForceModel::new(10.0);
        force.tick(1.0);
        assert_eq!(force.current_force(), 0.0);
    }

    #[test]
    fn force_is_bounded_and_monotonic_while_charging() {
        let mut force = ForceModel::new(10.0);
        force.set_charging(true);

        let mut last = force.current_force();
        for step in 0..2_000 {
            let dt = if step % 3 == 0 { 0.016 } else { 0.033 };
            force.tick(dt);
            let now = force.current_force();
            assert!((0.0..=10.0).contains(&now));
            assert!(now >= last);
            last = now;
        }
        assert_eq!(force.current_force(), force.max_force());
        assert!(force.is_full());
    }

    #[test]
    fn negative_delta_never_goes_below_zero() {
        let mut force = ForceModel::new(10.0);
        force.set_charging(true);
        force.tick(-5.0);
        assert_eq!(force.current_force(), 0.0);
    }

    #[test]
    fn release_speed_spans_the_tuning_range() {
        let tuning = GrenadeEffect::Poison.tuning().scaled(20.0);
        let mut force = ForceModel::new(10.0);
        assert_eq!(force.release_speed(&tuning), tuning.throw_force_min);

        force.set_charging(true);
        let mut last = force.release_speed(&tuning);
        for _ in 0..10 {
            force.tick(1.0);
            let speed = force.release_speed(&tuning);
            assert!(speed > last);
            last = speed;
        }
        assert_eq!(last, tuning.throw_force_max);
    }

    #[test]
    fn reset_clears_charge_and_flag() {
        let mut force = ForceModel::new(10.0);
        force.set_charging(true);
        force.tick(4.0);
        force.reset();
        assert_eq!(force.current_force(), 0.0);
        assert!(!force.is_charging());
    }
}
