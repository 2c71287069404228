//! Traverse Physics - Physics integration using rapier3d
//!
//! Provides the motion integrator the locomotion controller drives:
//! collision queries, ground detection, and a kinematic character body.

mod character_body;

pub use character_body::{CharacterBody, CharacterBodyConfig};

use glam::Vec3;
use rapier3d::prelude::*;

/// Physics world configuration
#[derive(Debug, Clone)]
pub struct PhysicsConfig {
    /// Gravity vector (default: -9.81 on Y axis)
    pub gravity: Vec3,
    /// Physics timestep (default: 1/60)
    pub timestep: f32,
}

impl Default for PhysicsConfig {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            timestep: 1.0 / 60.0,
        }
    }
}

/// The main physics world containing all simulation state
pub struct PhysicsWorld {
    /// Configuration
    pub config: PhysicsConfig,

    /// Rigid body storage
    pub rigid_body_set: RigidBodySet,
    /// Collider storage
    pub collider_set: ColliderSet,
    /// Impulse joint storage
    pub impulse_joint_set: ImpulseJointSet,
    /// Multi-body joint storage
    pub multibody_joint_set: MultibodyJointSet,

    /// Integration parameters
    integration_parameters: IntegrationParameters,
    /// Physics pipeline
    physics_pipeline: PhysicsPipeline,
    /// Island manager
    island_manager: IslandManager,
    /// Broad phase collision detection
    broad_phase: DefaultBroadPhase,
    /// Narrow phase collision detection
    narrow_phase: NarrowPhase,
    /// Continuous collision detection solver
    ccd_solver: CCDSolver,
    /// Query pipeline for raycasts and shape casts
    query_pipeline: QueryPipeline,
}

impl PhysicsWorld {
    /// Create a new physics world with default configuration
    pub fn new() -> Self {
        Self::with_config(PhysicsConfig::default())
    }

    /// Create a new physics world with custom configuration
    pub fn with_config(config: PhysicsConfig) -> Self {
        let mut integration_parameters = IntegrationParameters::default();
        integration_parameters.dt = config.timestep;

        Self {
            config,
            rigid_body_set: RigidBodySet::new(),
            collider_set: ColliderSet::new(),
            impulse_joint_set: ImpulseJointSet::new(),
            multibody_joint_set: MultibodyJointSet::new(),
            integration_parameters,
            physics_pipeline: PhysicsPipeline::new(),
            island_manager: IslandManager::new(),
            broad_phase: DefaultBroadPhase::new(),
            narrow_phase: NarrowPhase::new(),
            ccd_solver: CCDSolver::new(),
            query_pipeline: QueryPipeline::new(),
        }
    }

    /// Step the physics simulation
    pub fn step(&mut self) {
        let gravity = vector![self.config.gravity.x, self.config.gravity.y, self.config.gravity.z];

        self.physics_pipeline.step(
            &gravity,
            &self.integration_parameters,
            &mut self.island_manager,
            &mut self.broad_phase,
            &mut self.narrow_phase,
            &mut self.rigid_body_set,
            &mut self.collider_set,
            &mut self.impulse_joint_set,
            &mut self.multibody_joint_set,
            &mut self.ccd_solver,
            None,
            &(),
            &(),
        );

        // Update query pipeline after physics step
        self.query_pipeline.update(&self.collider_set);
    }

    /// Add a static collider (ground, walls, etc.)
    pub fn add_static_collider(&mut self, collider: Collider) -> ColliderHandle {
        let handle = self.collider_set.insert(collider);
        self.query_pipeline.update(&self.collider_set);
        handle
    }

    /// Add a flat ground plane centered at the origin
    pub fn add_ground_plane(&mut self, half_extent: f32, y: f32) -> ColliderHandle {
        let collider = ColliderBuilder::cuboid(half_extent, 0.1, half_extent)
            .translation(vector![0.0, y - 0.1, 0.0])
            .build();
        self.add_static_collider(collider)
    }

    /// Cast a ray straight down from `origin`, returning the hit distance.
    ///
    /// Returns `None` when nothing lies within `max_distance`.
    pub fn cast_ray_down(
        &self,
        origin: Vec3,
        max_distance: f32,
        exclude: Option<ColliderHandle>,
    ) -> Option<f32> {
        let ray = Ray::new(
            point![origin.x, origin.y, origin.z],
            vector![0.0, -1.0, 0.0],
        );
        let mut filter = QueryFilter::default();
        if let Some(handle) = exclude {
            filter = filter.exclude_collider(handle);
        }

        self.query_pipeline
            .cast_ray(
                &self.rigid_body_set,
                &self.collider_set,
                &ray,
                max_distance,
                true,
                filter,
            )
            .map(|(_, toi)| toi)
    }
}

impl Default for PhysicsWorld {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ray_hits_ground() {
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane(50.0, 0.0);

        let hit = physics.cast_ray_down(Vec3::new(0.0, 2.0, 0.0), 10.0, None);
        assert!(hit.is_some());
        assert!((hit.unwrap() - 2.0).abs() < 0.2);
    }

    #[test]
    fn test_ray_misses_when_out_of_range() {
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane(50.0, 0.0);

        let hit = physics.cast_ray_down(Vec3::new(0.0, 100.0, 0.0), 10.0, None);
        assert!(hit.is_none());
    }
}
