//! Kinematic character body built on rapier3d's character controller
//!
//! This is the motion integrator the locomotion state machine drives: it
//! owns velocity, grounded state, and a kinematic-override switch that the
//! hang/climb machinery flips when it takes over position control.

use glam::Vec3;
use rapier3d::control::{CharacterAutostep, CharacterLength, KinematicCharacterController};
use rapier3d::prelude::*;

/// Character body configuration
#[derive(Debug, Clone)]
pub struct CharacterBodyConfig {
    /// Capsule height (default: 1.8m)
    pub height: f32,
    /// Capsule radius (default: 0.4m)
    pub radius: f32,
    /// Maximum slope angle in degrees (default: 45)
    pub max_slope_angle: f32,
    /// Step height for climbing stairs (default: 0.25m)
    pub step_height: f32,
    /// Skin width for collision detection (default: 0.02m)
    pub skin_width: f32,
    /// Whether to snap to ground when walking down slopes
    pub snap_to_ground: bool,
    /// Maximum ground snap distance
    pub ground_snap_distance: f32,
}

impl Default for CharacterBodyConfig {
    fn default() -> Self {
        Self {
            height: 1.8,
            radius: 0.4,
            max_slope_angle: 45.0,
            step_height: 0.25,
            skin_width: 0.02,
            snap_to_ground: true,
            ground_snap_distance: 0.2,
        }
    }
}

/// Kinematic character body with collision response
pub struct CharacterBody {
    /// Configuration
    pub config: CharacterBodyConfig,
    /// Current position (capsule base)
    pub position: Vec3,
    /// Current velocity
    pub velocity: Vec3,
    /// Whether the character is on the ground
    grounded: bool,
    /// When set, `update` ignores velocity; something else drives position
    kinematic_override: bool,
    /// The collider handle for this character
    pub collider_handle: Option<ColliderHandle>,
    /// Rapier's kinematic character controller
    controller: KinematicCharacterController,
}

impl CharacterBody {
    /// Create a new character body with default config
    pub fn new() -> Self {
        Self::with_config(CharacterBodyConfig::default())
    }

    /// Create a new character body with custom config
    pub fn with_config(config: CharacterBodyConfig) -> Self {
        let mut controller = KinematicCharacterController::default();
        controller.max_slope_climb_angle = config.max_slope_angle.to_radians();
        controller.min_slope_slide_angle = config.max_slope_angle.to_radians();
        controller.autostep = Some(CharacterAutostep {
            max_height: CharacterLength::Absolute(config.step_height),
            min_width: CharacterLength::Relative(0.5),
            include_dynamic_bodies: true,
        });
        controller.snap_to_ground = if config.snap_to_ground {
            Some(CharacterLength::Absolute(config.ground_snap_distance))
        } else {
            None
        };
        controller.offset = CharacterLength::Absolute(config.skin_width);

        Self {
            config,
            position: Vec3::ZERO,
            velocity: Vec3::ZERO,
            grounded: false,
            kinematic_override: false,
            collider_handle: None,
            controller,
        }
    }

    /// Spawn the character in the physics world
    pub fn spawn(&mut self, physics: &mut crate::PhysicsWorld, position: Vec3) -> ColliderHandle {
        self.position = position;

        let half_height = (self.config.height - 2.0 * self.config.radius) / 2.0;
        let collider = ColliderBuilder::capsule_y(half_height.max(0.01), self.config.radius)
            .translation(vector![position.x, position.y + self.config.height / 2.0, position.z])
            .friction(0.0)
            .restitution(0.0)
            .build();

        let handle = physics.add_static_collider(collider);
        self.collider_handle = Some(handle);
        handle
    }

    /// Move the character with collision detection
    pub fn move_character(
        &mut self,
        physics: &mut crate::PhysicsWorld,
        desired_translation: Vec3,
        dt: f32,
    ) {
        let Some(collider_handle) = self.collider_handle else {
            return;
        };

        let Some(collider) = physics.collider_set.get(collider_handle) else {
            return;
        };

        let shape = collider.shape();
        let current_pos = Isometry::translation(
            self.position.x,
            self.position.y + self.config.height / 2.0,
            self.position.z,
        );

        let movement = self.controller.move_shape(
            dt,
            &physics.rigid_body_set,
            &physics.collider_set,
            &physics.query_pipeline,
            shape,
            &current_pos,
            vector![desired_translation.x, desired_translation.y, desired_translation.z],
            QueryFilter::default().exclude_collider(collider_handle),
            |_| {},
        );

        self.grounded = movement.grounded;

        let effective_translation = movement.translation;
        self.position.x += effective_translation.x;
        self.position.y += effective_translation.y;
        self.position.z += effective_translation.z;

        self.sync_collider(physics);
    }

    /// Apply velocity and move the character.
    ///
    /// Does nothing while the kinematic override is active; during hang and
    /// climb the traversal machinery drives position directly.
    pub fn update(&mut self, physics: &mut crate::PhysicsWorld, dt: f32) {
        if self.kinematic_override {
            return;
        }

        // Gravity belongs to the integrator; the controller only ever
        // reads vertical velocity back.
        if !self.grounded {
            self.velocity.y += physics.config.gravity.y * dt;
        } else if self.velocity.y < 0.0 {
            self.velocity.y = 0.0;
        }

        let translation = self.velocity * dt;
        self.move_character(physics, translation, dt);
    }

    /// Set the character's position directly (teleport)
    pub fn set_position(&mut self, physics: &mut crate::PhysicsWorld, position: Vec3) {
        self.position = position;
        self.sync_collider(physics);
    }

    /// Push the character's position into its collider
    fn sync_collider(&self, physics: &mut crate::PhysicsWorld) {
        if let Some(handle) = self.collider_handle {
            if let Some(collider) = physics.collider_set.get_mut(handle) {
                collider.set_translation(vector![
                    self.position.x,
                    self.position.y + self.config.height / 2.0,
                    self.position.z
                ]);
            }
        }
    }

    /// Enable or disable the kinematic override.
    ///
    /// While enabled, velocity integration is suspended and `update` is a
    /// no-op. Disabling it resumes normal integration.
    pub fn set_kinematic_override(&mut self, enabled: bool) {
        self.kinematic_override = enabled;
        if enabled {
            self.grounded = false;
        }
    }

    /// Whether the kinematic override is currently active
    pub fn kinematic_override(&self) -> bool {
        self.kinematic_override
    }

    /// Check if standing on ground
    pub fn is_grounded(&self) -> bool {
        self.grounded
    }

    /// The vertical component of the current velocity
    pub fn vertical_velocity(&self) -> f32 {
        self.velocity.y
    }

    /// Overwrite the vertical component of the current velocity
    pub fn set_vertical_velocity(&mut self, v: f32) {
        self.velocity.y = v;
    }

    /// Set the character's velocity directly
    pub fn set_velocity(&mut self, velocity: Vec3) {
        self.velocity = velocity;
    }

    /// Distance from the capsule base straight down to the nearest surface
    pub fn distance_to_ground(&self, physics: &crate::PhysicsWorld, max_distance: f32) -> Option<f32> {
        physics.cast_ray_down(self.position, max_distance, self.collider_handle)
    }

    /// Get the center position (middle of capsule)
    pub fn center_position(&self) -> Vec3 {
        Vec3::new(
            self.position.x,
            self.position.y + self.config.height / 2.0,
            self.position.z,
        )
    }
}

impl Default for CharacterBody {
    fn default() -> Self {
        Self::new()
    }
}
