//! Tick timing for the Traverse controller
//!
//! The simulation advances in fixed-rate steps; rendering happens at
//! whatever rate the host runs and interpolates between steps.

use serde::{Deserialize, Serialize};

/// Configuration for the fixed-timestep clock
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TickConfig {
    /// Fixed timestep for simulation (in seconds)
    pub fixed_timestep: f32,
    /// Maximum delta time to prevent spiral of death
    pub max_delta_time: f32,
}

impl Default for TickConfig {
    fn default() -> Self {
        Self {
            fixed_timestep: 1.0 / 60.0,
            max_delta_time: 0.25,
        }
    }
}

/// Accumulating clock that converts frame deltas into fixed simulation steps
#[derive(Debug, Clone)]
pub struct TickClock {
    /// Configuration
    pub config: TickConfig,
    /// Time since start in seconds
    pub total_time: f64,
    /// Delta time for this frame (clamped)
    pub delta_time: f32,
    /// Frame counter
    pub frame_count: u64,
    /// Accumulated time for fixed timestep
    fixed_accumulator: f32,
}

impl Default for TickClock {
    fn default() -> Self {
        Self {
            config: TickConfig::default(),
            total_time: 0.0,
            delta_time: 0.0,
            frame_count: 0,
            fixed_accumulator: 0.0,
        }
    }
}

impl TickClock {
    /// Create a new clock with custom config
    pub fn new(config: TickConfig) -> Self {
        Self {
            config,
            ..Default::default()
        }
    }

    /// Update the clock with the raw delta from the previous frame
    pub fn update(&mut self, raw_delta: f32) {
        self.delta_time = raw_delta.min(self.config.max_delta_time);
        self.frame_count += 1;
        self.total_time += self.delta_time as f64;
        self.fixed_accumulator += self.delta_time;
    }

    /// Get the number of fixed timesteps to process this frame
    pub fn fixed_steps(&mut self) -> u32 {
        let mut steps = 0;
        while self.fixed_accumulator >= self.config.fixed_timestep {
            self.fixed_accumulator -= self.config.fixed_timestep;
            steps += 1;
        }
        steps
    }

    /// Get the interpolation factor for rendering between simulation steps
    pub fn fixed_interpolation(&self) -> f32 {
        self.fixed_accumulator / self.config.fixed_timestep
    }
}
