//! Traverse - third-person locomotion and ledge-traversal controller
//!
//! Headless demo driver: runs a scripted traversal (jog, jump, hang,
//! shimmy, climb) through the fixed-tick loop and logs the animation
//! frames the controller emits.

use anyhow::Result;
use glam::Vec3;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use traverse_core::TickClock;
use traverse_game::{AnimationEvent, Course, InputAction, InputState, PlayerController};
use traverse_physics::PhysicsWorld;

mod settings;

use settings::Settings;

/// A short ledge above the spawn area, facing the actor's approach
const DEMO_COURSE: &str = r#"{
    "points": [
        { "position": [-2.0, 2.2, -4.0], "facing": [0.0, 0.0, 1.0] },
        { "position": [ 0.0, 2.2, -4.0], "facing": [0.0, 0.0, 1.0] },
        { "position": [ 2.0, 2.2, -4.0], "facing": [0.0, 0.0, 1.0] }
    ],
    "links": [[0, 1], [1, 2]]
}"#;

/// Input script for one tick of the demo
fn scripted_input(tick: u32, input: &mut InputState) {
    input.clear_frame();
    match tick {
        // Jog up to the wall below the ledge.
        0..=59 => {
            input.press(InputAction::MoveForward);
        }
        60 => input.release(InputAction::MoveForward),
        // Jump in place from standstill.
        90 => input.tap(InputAction::Jump),
        // Grab the ledge overhead.
        220 => input.tap(InputAction::Hang),
        // Shimmy two points to the right; each step takes a tap to start
        // the transition and another to commit it.
        250 => input.tap(InputAction::ShimmyRight),
        280 => input.tap(InputAction::ShimmyRight),
        310 => input.tap(InputAction::ShimmyRight),
        340 => input.tap(InputAction::ShimmyRight),
        // Climb up over the edge.
        370 => input.tap(InputAction::Jump),
        _ => {}
    }
}

fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::DEBUG)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber).expect("Failed to set subscriber");

    info!("Starting traverse demo...");

    let settings = Settings::load();

    let course = Course::from_json(DEMO_COURSE)?;
    let graph = course.build_graph()?;
    info!(points = graph.len(), "demo course ready");

    let mut physics = PhysicsWorld::new();
    physics.add_ground_plane(100.0, 0.0);

    let mut player = PlayerController::with_config(settings.movement.clone());
    player.spawn(&mut physics, Vec3::new(-2.0, 0.1, 0.0));

    let mut clock = TickClock::new(settings.tick.clone());
    let mut input = InputState::new();
    let dt = clock.config.fixed_timestep;

    let mut tick: u32 = 0;
    while tick < 430 {
        clock.update(dt);
        for _ in 0..clock.fixed_steps() {
            scripted_input(tick, &mut input);

            // The animation layer would fire these; the script stands in.
            match tick {
                91 => player.push_event(AnimationEvent::JumpThrustStart),
                195 => player.push_event(AnimationEvent::JumpLanded),
                205 => player.push_event(AnimationEvent::JumpAnimationEnd),
                410 => player.push_event(AnimationEvent::ClimbFinished),
                _ => {}
            }

            let frame = player.fixed_update(&mut physics, &input, &graph, dt)?;
            if !frame.events.is_empty() {
                info!(
                    tick,
                    events = ?frame.events,
                    position = ?player.position(),
                    speed = frame.speed,
                    "state transition"
                );
            }
            tick += 1;
        }
    }

    info!(position = ?player.position(), flags = ?player.flags(), "demo finished");
    Ok(())
}
