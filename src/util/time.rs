//! Time utilities for the frame loop

use std::time::Duration;

/// Default host frame rate
pub const SIMULATION_TPS: u32 = 60; // 60 frames per second

/// Calculate delta time for the given frame rate (in seconds)
pub fn tick_delta(tps: u32) -> f32 {
    1.0 / tps.max(1) as f32
}

/// Wall-clock duration of one frame
pub fn frame_duration(tps: u32) -> Duration {
    Duration::from_micros(1_000_000 / tps.max(1) as u64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_rate_is_sixty_hz() {
        assert!((tick_delta(SIMULATION_TPS) - 1.0 / 60.0).abs() < f32::EPSILON);
        assert_eq!(frame_duration(SIMULATION_TPS), Duration::from_micros(16_666));
    }

    #[test]
    fn zero_rate_does_not_divide_by_zero() {
        assert_eq!(tick_delta(0), 1.0);
        assert_eq!(frame_duration(0), Duration::from_secs(1));
    }
}
