//! Player controller: the per-tick locomotion state machine
//!
//! Runs once per fixed simulation tick. Drains queued animation events,
//! evaluates the transition rules in a fixed order (later rules read flags
//! written by earlier ones), resolves movement speed and direction, then
//! either drives the physics body or, while hanging, blends the actor's
//! position along the climb graph instead.

use std::collections::VecDeque;

use glam::{Quat, Vec3};
use tracing::{debug, info};
use traverse_core::ActorId;
use traverse_physics::{CharacterBody, PhysicsWorld};

use crate::animation::{AnimationEvent, AnimationFrame};
use crate::climb::{ClimbGraph, GrabPointId, HangPhase, HangState, ShimmyDirection, ShimmyOutcome};
use crate::error::ControllerError;
use crate::input::{InputAction, InputState};

use super::movement::MovementConfig;
use super::state::LocomotionFlags;

/// Vertical velocity below which a grounded jump counts as finished
const JUMP_EXIT_VELOCITY: f32 = -0.01;

/// Third-person locomotion and ledge-traversal controller for one actor
pub struct PlayerController {
    /// Identity of the controlled actor
    pub actor_id: ActorId,
    /// Movement configuration
    pub config: MovementConfig,
    /// Physics character body (the motion integrator)
    pub body: CharacterBody,
    /// Actor orientation (yaw-facing)
    pub rotation: Quat,
    /// Current locomotion flags
    flags: LocomotionFlags,
    /// Hang/shimmy sub-state
    hang: HangState,
    /// Speed carried across ticks for the airborne/hanging freeze
    last_speed: f32,
    /// Animation events waiting for the next tick
    pending_events: VecDeque<AnimationEvent>,
}

impl PlayerController {
    /// Create a new controller with default config
    pub fn new() -> Self {
        Self::with_config(MovementConfig::default())
    }

    /// Create a new controller with custom config
    pub fn with_config(config: MovementConfig) -> Self {
        Self {
            actor_id: ActorId::new(),
            config,
            body: CharacterBody::new(),
            rotation: Quat::IDENTITY,
            flags: LocomotionFlags::default(),
            hang: HangState::default(),
            last_speed: 0.0,
            pending_events: VecDeque::new(),
        }
    }

    /// Spawn the actor in the physics world
    pub fn spawn(&mut self, physics: &mut PhysicsWorld, position: Vec3) {
        self.body.spawn(physics, position);
        self.flags = LocomotionFlags::default();
        self.hang.clear();
        self.last_speed = 0.0;
    }

    /// The actor's current position
    pub fn position(&self) -> Vec3 {
        self.body.position
    }

    /// The actor's facing direction
    pub fn forward(&self) -> Vec3 {
        self.rotation * -Vec3::Z
    }

    /// The current locomotion flags
    pub fn flags(&self) -> LocomotionFlags {
        self.flags
    }

    /// The hang sub-state (read-only)
    pub fn hang(&self) -> &HangState {
        &self.hang
    }

    /// Queue an animation event for the next tick.
    ///
    /// Events arrive asynchronously relative to the simulation; they are
    /// applied in arrival order at the start of the next `fixed_update`.
    pub fn push_event(&mut self, event: AnimationEvent) {
        self.pending_events.push_back(event);
    }

    /// Advance the controller by one fixed tick.
    ///
    /// Returns the animation frame for this tick, or an invariant
    /// violation that aborted it.
    pub fn fixed_update(
        &mut self,
        physics: &mut PhysicsWorld,
        input: &InputState,
        graph: &ClimbGraph,
        dt: f32,
    ) -> Result<AnimationFrame, ControllerError> {
        let prev = self.flags;

        self.drain_events();
        self.flags.grounded = self.body.is_grounded();

        // Nearest reachable point is tick-scoped: recomputed here, threaded
        // through the rules, never stored on the controller.
        let reachable = self.reachable_point(graph);

        self.rule_falling();
        self.rule_jump(input);
        self.rule_crouch(input);
        self.rule_hang(physics, input, graph, reachable)?;
        self.rule_traversal(input, graph)?;

        let speed = self.resolve_movement(physics, input, dt);

        if self.flags.hanging {
            self.hang.advance(dt);
            let target = self.hang.target_position(graph)?;
            let weight = self.hang.blend_weight(self.config.shimmy_duration);
            let blended = self.body.position.lerp(target, weight);
            self.body.set_position(physics, blended);
        }

        self.build_frame(physics, graph, prev, speed)
    }

    /// Apply queued animation events before the transition rules run
    fn drain_events(&mut self) {
        while let Some(event) = self.pending_events.pop_front() {
            debug!(actor = ?self.actor_id, ?event, "animation event");
            match event {
                AnimationEvent::JumpThrustStart => {
                    self.body.set_vertical_velocity(self.config.jump_velocity);
                }
                AnimationEvent::JumpLanded => {
                    self.body.set_velocity(Vec3::ZERO);
                    self.flags.landing_from_jump = true;
                }
                AnimationEvent::JumpAnimationEnd => {
                    self.flags.landing_from_jump = false;
                }
                AnimationEvent::ClimbFinished => {
                    self.flags.climbing = false;
                    self.body.set_kinematic_override(false);
                }
            }
        }
    }

    /// The nearest grab point in range whose facing gate the actor passes
    fn reachable_point(&self, graph: &ClimbGraph) -> Option<GrabPointId> {
        let nearest = graph.nearest_within(self.body.position, self.config.grab_radius)?;
        let point = graph.get(nearest)?;
        point.facing_allows(self.forward()).then_some(nearest)
    }

    /// Rule 1: falling detection. Grounding always cancels falling.
    fn rule_falling(&mut self) {
        if !self.flags.falling
            && !self.flags.grounded
            && self.body.vertical_velocity() < self.config.fall_threshold
        {
            self.flags.falling = true;
        }
        if self.flags.grounded {
            self.flags.falling = false;
        }
    }

    /// Rule 2: jump entry and exit
    fn rule_jump(&mut self, input: &InputState) {
        if self.flags.jumping {
            let touched_down =
                self.body.vertical_velocity() < JUMP_EXIT_VELOCITY && self.flags.grounded;
            if touched_down || self.flags.landing_from_jump {
                self.flags.jumping = false;
                self.flags.falling = false;
            }
        } else if self.can_jump() && input.is_just_released(InputAction::Jump) {
            self.flags.jumping = true;
        }
    }

    /// Rule 3: crouch toggle
    fn rule_crouch(&mut self, input: &InputState) {
        if input.is_just_released(InputAction::Crouch) && self.can_crouch() {
            self.flags.crouching = !self.flags.crouching;
        }
    }

    /// Rule 4: hang engage/release
    fn rule_hang(
        &mut self,
        physics: &mut PhysicsWorld,
        input: &InputState,
        graph: &ClimbGraph,
        reachable: Option<GrabPointId>,
    ) -> Result<(), ControllerError> {
        if !input.is_just_released(InputAction::Hang) {
            return Ok(());
        }

        if self.flags.hanging && self.hang.phase == HangPhase::Final {
            self.unhang();
        } else if let Some(point) = reachable.filter(|_| self.can_hang(reachable)) {
            self.enter_hang(physics, graph, point)?;
        }
        Ok(())
    }

    /// Rule 5: shimmy and climb while hanging
    fn rule_traversal(
        &mut self,
        input: &InputState,
        graph: &ClimbGraph,
    ) -> Result<(), ControllerError> {
        if !self.flags.hanging {
            return Ok(());
        }

        if input.is_just_released(InputAction::ShimmyLeft) {
            self.shimmy(graph, ShimmyDirection::Left)?;
        }
        if input.is_just_released(InputAction::ShimmyRight) {
            self.shimmy(graph, ShimmyDirection::Right)?;
        }

        if input.is_just_released(InputAction::Jump)
            && self.can_climb()
            && self.hang.phase == HangPhase::Final
        {
            self.begin_climb();
        }
        Ok(())
    }

    fn can_jump(&self) -> bool {
        !self.flags.jumping && self.flags.grounded && !self.flags.crouching
    }

    fn can_crouch(&self) -> bool {
        self.flags.grounded
    }

    fn can_walk(&self) -> bool {
        !self.flags.jumping
    }

    fn can_jog(&self) -> bool {
        !self.flags.crouching
    }

    fn can_hang(&self, reachable: Option<GrabPointId>) -> bool {
        self.flags.grounded
            && reachable.is_some()
            && !self.flags.crouching
            && !self.flags.jumping
    }

    fn can_climb(&self) -> bool {
        self.flags.hanging
    }

    /// Attach to a grab point: suspend physics, snap to the root anchor
    fn enter_hang(
        &mut self,
        physics: &mut PhysicsWorld,
        graph: &ClimbGraph,
        point: GrabPointId,
    ) -> Result<(), ControllerError> {
        let anchor = graph
            .get(point)
            .ok_or(ControllerError::UnknownPoint(point))?
            .root_anchor
            .position;

        info!(actor = ?self.actor_id, ?point, "entering hang");
        self.flags.hanging = true;
        self.body.set_kinematic_override(true);
        self.body.set_velocity(Vec3::ZERO);
        self.hang = HangState::begin(point);
        self.body.set_position(physics, anchor);
        Ok(())
    }

    /// Let go of the ledge and fall
    fn unhang(&mut self) {
        info!(actor = ?self.actor_id, "releasing hang");
        self.flags.hanging = false;
        self.flags.falling = true;
        self.body.set_kinematic_override(false);
        self.hang.clear();
    }

    /// Shimmy one step; a missing neighbor is a logged no-op
    fn shimmy(
        &mut self,
        graph: &ClimbGraph,
        direction: ShimmyDirection,
    ) -> Result<(), ControllerError> {
        match self.hang.shimmy(graph, direction)? {
            ShimmyOutcome::NoNeighbor => {
                debug!(actor = ?self.actor_id, ?direction, "no grab point in that direction");
            }
            outcome => {
                debug!(actor = ?self.actor_id, ?direction, ?outcome, "shimmy");
            }
        }
        Ok(())
    }

    /// Start the climb-up; the kinematic override stays on for the
    /// duration of the climb animation
    fn begin_climb(&mut self) {
        info!(actor = ?self.actor_id, "starting climb");
        self.flags.climbing = true;
        self.flags.hanging = false;
        self.hang.clear();
    }

    /// Resolve speed and direction, drive the integrator, return the speed.
    ///
    /// While jumping, hanging, falling, or climbing the speed is frozen at
    /// its last grounded value and the direction pinned to the current
    /// forward, so airborne input cannot steer.
    fn resolve_movement(
        &mut self,
        physics: &mut PhysicsWorld,
        input: &InputState,
        dt: f32,
    ) -> f32 {
        let mut raw = Vec3::ZERO;
        if input.is_held(InputAction::MoveForward) {
            raw.z -= 1.0;
        }
        if input.is_held(InputAction::MoveBackward) {
            raw.z += 1.0;
        }
        if input.is_held(InputAction::MoveLeft) {
            raw.x -= 1.0;
        }
        if input.is_held(InputAction::MoveRight) {
            raw.x += 1.0;
        }
        raw = raw.clamp_length_max(1.0);

        let frozen = self.flags.jumping
            || self.flags.hanging
            || self.flags.falling
            || self.flags.climbing;

        let (speed, direction) = if frozen {
            (self.last_speed, self.forward())
        } else if raw != Vec3::ZERO {
            let speed = self.config.gait_speed(
                self.flags.crouching,
                input.is_held(InputAction::Walk),
                self.can_walk(),
                self.can_jog(),
            );
            self.last_speed = speed;
            (speed, self.rotation * raw)
        } else {
            self.last_speed = 0.0;
            (0.0, Vec3::ZERO)
        };

        if !self.flags.hanging {
            let velocity = Vec3::new(
                direction.x * speed,
                self.body.vertical_velocity(),
                direction.z * speed,
            );
            self.body.set_velocity(velocity);

            if !frozen && direction != Vec3::ZERO {
                self.rotation = Quat::from_rotation_y(f32::atan2(-direction.x, -direction.z));
            }

            self.body.update(physics, dt);
        }

        speed
    }

    /// Assemble the per-tick payload for the animation/IK layer
    fn build_frame(
        &self,
        physics: &PhysicsWorld,
        graph: &ClimbGraph,
        prev: LocomotionFlags,
        speed: f32,
    ) -> Result<AnimationFrame, ControllerError> {
        let (left_hand, right_hand, hang_style) = if self.flags.hanging {
            let (left, right) = self.hang.hand_targets(graph)?;
            let style = self.hang.current_point(graph)?.style;
            (Some(left), Some(right), Some(style))
        } else {
            (None, None, None)
        };

        let shimmying = self.flags.hanging && self.hang.phase == HangPhase::Midpoint;
        let shimmy_left = shimmying && self.hang.direction == Some(ShimmyDirection::Left);
        let shimmy_right = shimmying && self.hang.direction == Some(ShimmyDirection::Right);

        Ok(AnimationFrame {
            actor: self.actor_id,
            flags: self.flags,
            events: self.flags.edges(prev),
            speed,
            vertical_velocity: self.body.vertical_velocity(),
            distance_to_ground: self
                .body
                .distance_to_ground(physics, self.config.ground_ray_length),
            left_hand,
            right_hand,
            hang_style,
            shimmy_left,
            shimmy_right,
        })
    }
}

impl Default for PlayerController {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::climb::GrabPoint;

    const DT: f32 = 1.0 / 60.0;

    /// A grounded controller standing at the origin on a large floor
    fn grounded_setup() -> (PhysicsWorld, PlayerController, ClimbGraph) {
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane(100.0, 0.0);

        let mut player = PlayerController::new();
        player.spawn(&mut physics, Vec3::new(0.0, 0.1, 0.0));

        // Settle onto the floor so grounded reads true.
        let input = InputState::new();
        let graph = ClimbGraph::new();
        for _ in 0..5 {
            player.body.set_vertical_velocity(-1.0);
            player
                .fixed_update(&mut physics, &input, &graph, DT)
                .unwrap();
        }
        assert!(player.flags().grounded);

        (physics, player, graph)
    }

    /// A ledge of three linked points above and in front of the actor
    fn ledge_graph() -> ClimbGraph {
        let mut graph = ClimbGraph::new();
        let a = graph.add_point(GrabPoint::at(Vec3::new(-2.0, 2.2, -1.0)));
        let b = graph.add_point(GrabPoint::at(Vec3::new(0.0, 2.2, -1.0)));
        let c = graph.add_point(GrabPoint::at(Vec3::new(2.0, 2.2, -1.0)));
        graph.link(a, b);
        graph.link(b, c);
        graph
    }

    fn hanging_setup() -> (PhysicsWorld, PlayerController, ClimbGraph) {
        let (mut physics, mut player, _) = grounded_setup();
        let graph = ledge_graph();

        let mut input = InputState::new();
        input.tap(InputAction::Hang);
        player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(player.flags().hanging);

        (physics, player, graph)
    }

    #[test]
    fn test_jump_release_starts_jump() {
        let (mut physics, mut player, graph) = grounded_setup();

        let mut input = InputState::new();
        input.tap(InputAction::Jump);
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();

        assert!(frame.flags.jumping);
        assert!(frame.events.contains(&crate::player::StateEvent::JumpStarted));
    }

    #[test]
    fn test_no_jump_while_crouched() {
        let (mut physics, mut player, graph) = grounded_setup();

        let mut input = InputState::new();
        input.tap(InputAction::Crouch);
        player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(player.flags().crouching);

        let mut input = InputState::new();
        input.tap(InputAction::Jump);
        player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(!player.flags().jumping);
    }

    #[test]
    fn test_crouch_toggles() {
        let (mut physics, mut player, graph) = grounded_setup();

        let mut input = InputState::new();
        input.tap(InputAction::Crouch);
        player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(player.flags().crouching);

        player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(!player.flags().crouching);
    }

    #[test]
    fn test_grounding_cancels_falling() {
        let mut physics = PhysicsWorld::new();
        physics.add_ground_plane(100.0, 0.0);
        let graph = ClimbGraph::new();
        let input = InputState::new();

        let mut player = PlayerController::new();
        player.spawn(&mut physics, Vec3::new(0.0, 8.0, 0.0));
        player.body.set_vertical_velocity(-6.0);

        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(frame.flags.falling);

        // Keep falling until the floor catches the actor.
        let mut landed = false;
        for _ in 0..600 {
            player.body.set_vertical_velocity(-6.0);
            let frame = player
                .fixed_update(&mut physics, &input, &graph, DT)
                .unwrap();
            if frame.flags.grounded {
                assert!(!frame.flags.falling);
                landed = true;
                break;
            }
        }
        assert!(landed);
    }

    #[test]
    fn test_airborne_speed_is_frozen() {
        let (mut physics, mut player, graph) = grounded_setup();

        // Jog forward to establish a last speed.
        let mut input = InputState::new();
        input.press(InputAction::MoveForward);
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert_eq!(frame.speed, player.config.jog_speed);

        // Start a jump; held walk modifier must not change the speed.
        input.tap(InputAction::Jump);
        input.press(InputAction::Walk);
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(frame.flags.jumping);
        assert_eq!(frame.speed, player.config.jog_speed);
        input.clear_frame();

        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert_eq!(frame.speed, player.config.jog_speed);
    }

    #[test]
    fn test_hang_requires_nearby_point() {
        let (mut physics, mut player, _) = grounded_setup();
        let graph = ClimbGraph::new();

        let mut input = InputState::new();
        input.tap(InputAction::Hang);
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(!frame.flags.hanging);
    }

    #[test]
    fn test_facing_gate_blocks_hang() {
        let (mut physics, mut player, _) = grounded_setup();

        let mut graph = ClimbGraph::new();
        // Point requires approaching from +Z; the actor faces -Z by default.
        graph.add_point(
            GrabPoint::at(Vec3::new(0.0, 2.2, -1.0)).with_required_facing(-Vec3::Z),
        );

        let mut input = InputState::new();
        input.tap(InputAction::Hang);
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(!frame.flags.hanging);
    }

    #[test]
    fn test_enter_hang_snaps_to_anchor() {
        let (_, player, graph) = hanging_setup();

        let anchor = player.hang().current_point(&graph).unwrap().root_anchor.position;
        assert_eq!(player.position(), anchor);
        assert!(player.body.kinematic_override());
    }

    #[test]
    fn test_hang_frame_carries_ik_targets() {
        let (mut physics, mut player, graph) = hanging_setup();

        let input = InputState::new();
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();

        assert!(frame.left_hand.is_some());
        assert!(frame.right_hand.is_some());
        assert_eq!(frame.hang_style, Some(crate::climb::HangStyle::Braced));
        assert!(!frame.shimmy_left && !frame.shimmy_right);
    }

    #[test]
    fn test_shimmy_right_then_complete() {
        let (mut physics, mut player, graph) = hanging_setup();
        let start = player.hang().current.unwrap();

        let mut input = InputState::new();
        input.tap(InputAction::ShimmyRight);
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert_eq!(player.hang().phase, HangPhase::Midpoint);
        assert_eq!(player.hang().direction, Some(ShimmyDirection::Right));
        let next = player.hang().next.unwrap();
        assert_eq!(graph.neighbor(start, ShimmyDirection::Right), Some(next));
        assert!(frame.shimmy_right);

        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert_eq!(player.hang().phase, HangPhase::Final);
        assert_eq!(player.hang().current, Some(next));
        assert_eq!(player.hang().next, None);
        assert!(!frame.shimmy_right);
    }

    #[test]
    fn test_shimmy_cancel_keeps_point() {
        let (mut physics, mut player, graph) = hanging_setup();
        let start = player.hang().current.unwrap();

        let mut input = InputState::new();
        input.tap(InputAction::ShimmyRight);
        player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();

        let mut input = InputState::new();
        input.tap(InputAction::ShimmyLeft);
        player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();

        assert_eq!(player.hang().phase, HangPhase::Final);
        assert_eq!(player.hang().current, Some(start));
    }

    #[test]
    fn test_unhang_round_trip() {
        let (mut physics, mut player, graph) = hanging_setup();
        let hang_position = player.position();

        let mut input = InputState::new();
        input.tap(InputAction::Hang);
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();

        assert!(!frame.flags.hanging);
        assert!(frame.flags.falling);
        assert!(!player.hang().is_attached());
        assert!(!player.body.kinematic_override());
        // Intentional: position is not reset, the actor starts falling
        // from the grab point (gravity already applies this tick).
        assert!((player.position() - hang_position).length() < 0.05);
    }

    #[test]
    fn test_jump_while_hanging_starts_climb() {
        let (mut physics, mut player, graph) = hanging_setup();

        let mut input = InputState::new();
        input.tap(InputAction::Jump);
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();

        assert!(frame.flags.climbing);
        assert!(!frame.flags.hanging);
        assert!(player.body.kinematic_override());
        assert!(!player.hang().is_attached());

        // The animation layer reports the climb finished later.
        player.push_event(AnimationEvent::ClimbFinished);
        let input = InputState::new();
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(!frame.flags.climbing);
        assert!(!player.body.kinematic_override());
    }

    #[test]
    fn test_jump_thrust_event_sets_velocity() {
        let (mut physics, mut player, graph) = grounded_setup();

        let mut input = InputState::new();
        input.tap(InputAction::Jump);
        player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();

        player.push_event(AnimationEvent::JumpThrustStart);
        let input = InputState::new();
        let frame = player
            .fixed_update(&mut physics, &input, &graph, DT)
            .unwrap();
        assert!(frame.vertical_velocity > 0.0);
    }
}
