//! Movement configuration and constants

use serde::{Deserialize, Serialize};

/// Movement configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MovementConfig {
    /// Walking speed in meters per second (crouched or walk modifier held)
    pub walk_speed: f32,
    /// Jogging speed in meters per second (default gait)
    pub jog_speed: f32,
    /// Vertical velocity applied at the jump thrust animation event
    pub jump_velocity: f32,
    /// Vertical velocity below which an airborne actor counts as falling
    pub fall_threshold: f32,
    /// Maximum distance to a grab point for the hang action to engage
    pub grab_radius: f32,
    /// Duration of one shimmy step animation, in seconds
    pub shimmy_duration: f32,
    /// How far down to probe for the ground-distance report
    pub ground_ray_length: f32,
}

impl Default for MovementConfig {
    fn default() -> Self {
        Self {
            walk_speed: 2.0,
            jog_speed: 5.0,
            jump_velocity: 8.0,
            fall_threshold: -4.0,
            grab_radius: 2.5,
            shimmy_duration: 0.4,
            ground_ray_length: 50.0,
        }
    }
}

impl MovementConfig {
    /// Ground speed for the current stance.
    ///
    /// Walk speed applies while crouched or with the walk modifier held
    /// (if walking is allowed), jog speed otherwise (if jogging is
    /// allowed), zero when neither gait is available.
    pub fn gait_speed(&self, crouching: bool, walk_held: bool, can_walk: bool, can_jog: bool) -> f32 {
        if crouching || (walk_held && can_walk) {
            self.walk_speed
        } else if can_jog {
            self.jog_speed
        } else {
            0.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gait_speed_selection() {
        let config = MovementConfig::default();

        assert_eq!(config.gait_speed(false, false, true, true), config.jog_speed);
        assert_eq!(config.gait_speed(true, false, true, true), config.walk_speed);
        assert_eq!(config.gait_speed(false, true, true, true), config.walk_speed);
        // Crouched blocks jogging; walking unavailable mid-jump.
        assert_eq!(config.gait_speed(false, true, false, false), 0.0);
    }
}
