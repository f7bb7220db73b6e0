//! Scripted scenarios for the binary, selected with `HULLSIM_TEST=<name>`.
//!
//! Each scenario spawns a small world, runs for `frame_limit` frames, logs
//! progress and prints PASS/FAIL before exiting.

use crate::buoyancy::Compartment;
use crate::config::VesselConfig;
use crate::registry::BodyRegistry;
use crate::scene::box_hull_walls;
use crate::structure::WallSegment;
use crate::terrain::spawn_terrain_cell;
use crate::vessel::{spawn_vessel, VesselBody, VesselPlacement};
use bevy::prelude::*;
use std::io::Write;

/// Test configuration
#[derive(Resource)]
pub struct TestConfig {
    pub enabled: bool,
    pub test_name: String,
    pub frame_limit: u32,
    pub frame_count: u32,
    /// Speed given to every vessel on the first frame.
    pub launch_speed: Vec2,
    /// Target given to every vessel on the first frame.
    pub launch_target: Option<Vec2>,
    pub initial_position: Option<Vec2>,
}

impl Default for TestConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            test_name: String::new(),
            frame_limit: 120,
            frame_count: 0,
            launch_speed: Vec2::ZERO,
            launch_target: None,
            initial_position: None,
        }
    }
}

/// Names accepted by `HULLSIM_TEST`.
pub const SCENARIOS: [&str; 4] = ["idle", "seek", "flood", "ram"];

fn spawn_test_vessel(
    commands: &mut Commands,
    registry: &mut BodyRegistry,
    config: &VesselConfig,
    trim: f32,
) -> Option<Entity> {
    let walls = box_hull_walls(300.0, 120.0, 1);
    let vessel = match spawn_vessel(commands, registry, &walls, Vec2::ZERO, config) {
        Ok(vessel) => vessel,
        Err(e) => {
            eprintln!("✗ Test vessel not spawned: {e}");
            return None;
        }
    };
    for _ in 0..2 {
        let mut room = Compartment::dry(vessel, 1000.0);
        room.flood(1000.0 * trim);
        commands.spawn(room);
    }
    Some(vessel)
}

/// Spawn test scenario: a vessel at neutral trim with nothing to do
pub fn spawn_test_idle(
    mut commands: Commands,
    mut registry: ResMut<BodyRegistry>,
    config: Res<VesselConfig>,
    mut test_config: ResMut<TestConfig>,
) {
    test_config.test_name = "idle".to_string();
    test_config.frame_limit = 120;
    spawn_test_vessel(&mut commands, &mut registry, &config, config.neutral_water_fraction);
    println!("✓ Spawned test: idle vessel at neutral trim");
}

/// Spawn test scenario: a vessel seeking a target to its right
pub fn spawn_test_seek(
    mut commands: Commands,
    mut registry: ResMut<BodyRegistry>,
    config: Res<VesselConfig>,
    mut test_config: ResMut<TestConfig>,
) {
    test_config.test_name = "seek".to_string();
    test_config.frame_limit = 300;
    test_config.launch_target = Some(Vec2::new(400.0, 0.0));
    spawn_test_vessel(&mut commands, &mut registry, &config, config.neutral_water_fraction);
    println!("✓ Spawned test: vessel seeking (400, 0)");
}

/// Spawn test scenario: a fully flooded vessel
pub fn spawn_test_flood(
    mut commands: Commands,
    mut registry: ResMut<BodyRegistry>,
    config: Res<VesselConfig>,
    mut test_config: ResMut<TestConfig>,
) {
    test_config.test_name = "flood".to_string();
    test_config.frame_limit = 60;
    spawn_test_vessel(&mut commands, &mut registry, &config, 1.0);
    println!("✓ Spawned test: flooded vessel");
}

/// Spawn test scenario: a vessel driven hard into a square rock
pub fn spawn_test_ram(
    mut commands: Commands,
    mut registry: ResMut<BodyRegistry>,
    config: Res<VesselConfig>,
    mut test_config: ResMut<TestConfig>,
) {
    test_config.test_name = "ram".to_string();
    test_config.frame_limit = 120;
    test_config.launch_speed = Vec2::new(600.0, 0.0);
    spawn_test_vessel(&mut commands, &mut registry, &config, config.neutral_water_fraction);

    let rock = vec![
        Vec2::new(-80.0, -80.0),
        Vec2::new(80.0, -80.0),
        Vec2::new(80.0, 80.0),
        Vec2::new(-80.0, 80.0),
    ];
    if let Err(e) = spawn_terrain_cell(&mut commands, &mut registry, rock, Vec2::new(400.0, 0.0))
    {
        eprintln!("✗ Rock not spawned: {e}");
    }
    println!("✓ Spawned test: vessel at 600 u/s toward a rock at x=400");
}

pub fn test_logging_system(
    mut test_config: ResMut<TestConfig>,
    mut vessels: Query<(&mut VesselBody, &VesselPlacement)>,
) {
    if !test_config.enabled {
        return;
    }

    test_config.frame_count += 1;

    if test_config.frame_count == 1 {
        for (mut vessel, placement) in vessels.iter_mut() {
            let _ = vessel.set_speed(test_config.launch_speed);
            if let Some(target) = test_config.launch_target {
                let _ = vessel.set_target_position(target);
            }
            test_config.initial_position = Some(placement.0);
        }
        println!(
            "[Frame 1] Test: {} | vessels: {}",
            test_config.test_name,
            vessels.iter().count()
        );
        return;
    }

    if test_config.frame_count.is_multiple_of(30)
        || test_config.frame_count == test_config.frame_limit
    {
        for (vessel, placement) in vessels.iter() {
            println!(
                "[Frame {}] pos: ({:.2}, {:.2}) speed: ({:.2}, {:.2}) rigidness: {:.2} target: {:?}",
                test_config.frame_count,
                placement.0.x,
                placement.0.y,
                vessel.speed().x,
                vessel.speed().y,
                vessel.collision_rigidness(),
                vessel.target_position(),
            );
        }
    }
}

pub fn test_verification_system(
    test_config: Res<TestConfig>,
    vessels: Query<(&VesselBody, &VesselPlacement)>,
    walls: Query<&WallSegment>,
    mut exit: MessageWriter<bevy::app::AppExit>,
) {
    if !test_config.enabled || test_config.frame_count != test_config.frame_limit {
        return;
    }

    println!("\n╔════════════════════════════════════════════╗");
    println!("║           TEST COMPLETE                    ║");
    println!("╚════════════════════════════════════════════╝");
    println!("Test: {}", test_config.test_name);
    println!("Frames: {}", test_config.frame_count);

    let start = test_config.initial_position.unwrap_or_default();
    let Some((vessel, placement)) = vessels.iter().next() else {
        println!("✗ FAIL: no vessel alive");
        let _ = std::io::stdout().flush();
        exit.write(bevy::app::AppExit::error());
        return;
    };
    let moved = placement.0 - start;
    let wall_damage: f32 = walls.iter().map(|w| w.total_damage()).sum();
    println!("Displacement: ({:.3}, {:.3})", moved.x, moved.y);
    println!("Wall damage:  {:.1}", wall_damage);

    let (passed, reason) = scenario_verdict(&test_config.test_name, vessel, moved, wall_damage);

    let result = if passed {
        format!("✓ PASS: {reason}")
    } else {
        format!("✗ FAIL: expected {reason}")
    };
    println!("{}\n", result);
    let _ = std::io::stdout().flush();

    exit.write(if passed {
        bevy::app::AppExit::Success
    } else {
        bevy::app::AppExit::error()
    });
}

/// Whether a scenario ended as expected, plus what was expected.
fn scenario_verdict(
    name: &str,
    vessel: &VesselBody,
    moved: Vec2,
    wall_damage: f32,
) -> (bool, &'static str) {
    match name {
        "idle" => (
            moved.length() < 1e-3,
            "vessel at neutral trim stays put",
        ),
        "seek" => (
            moved.x > 300.0 && vessel.target_position().is_none(),
            "vessel reaches the target and clears it",
        ),
        "flood" => (
            moved.y < 0.0 && vessel.speed().y < 0.0,
            "flooded vessel sinks",
        ),
        "ram" => (
            vessel.collision_rigidness() < 1.0 && moved.x < 320.0 && wall_damage > 0.0,
            "structural impact damages walls, loosens the hull and stops the vessel",
        ),
        _ => (false, "unknown test"),
    }
}
