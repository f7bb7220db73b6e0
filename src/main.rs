use bevy::prelude::*;
use bevy::window::WindowResolution;
use bevy_rapier2d::prelude::*;
use hullsim::config::{self, VesselConfig};
use hullsim::constants::DISPLAY_UNITS_PER_SIM_UNIT;
use hullsim::simulation::{VesselPlugin, VesselSet};
use hullsim::testing::{
    self, spawn_test_flood, spawn_test_idle, spawn_test_ram, spawn_test_seek, TestConfig,
};
use hullsim::{graphics, scene};
use std::env;

fn main() {
    // Check for test mode
    let test_mode = env::var("HULLSIM_TEST").ok();

    let mut app = App::new();

    app.add_plugins(DefaultPlugins.set(WindowPlugin {
        primary_window: Some(Window {
            title: "Hullsim".into(),
            resolution: WindowResolution::new(1200, 680),
            ..Default::default()
        }),
        ..Default::default()
    }))
    .insert_resource(ClearColor(Color::srgb(0.02, 0.05, 0.09)))
    // Insert VesselConfig with compiled defaults; load_vessel_config will
    // overwrite it from assets/vessel.toml (if present) in the Startup schedule.
    .insert_resource(VesselConfig::default())
    // Engine values read through Bevy are display units; one simulation unit
    // (meter) is DISPLAY_UNITS_PER_SIM_UNIT pixels.
    .add_plugins(RapierPhysicsPlugin::<NoUserData>::pixels_per_meter(
        DISPLAY_UNITS_PER_SIM_UNIT,
    ))
    .add_plugins(VesselPlugin)
    .add_systems(
        Startup,
        (
            // Load config first so every other startup system sees the final values.
            config::load_vessel_config,
            graphics::setup_camera.after(config::load_vessel_config),
        ),
    )
    .add_systems(
        Update,
        (
            graphics::attach_hull_mesh_system,
            graphics::camera_shake_system,
            graphics::debug_outline_system.after(VesselSet::Sync),
        ),
    );

    if let Some(test_name) = test_mode {
        app.insert_resource(TestConfig {
            enabled: true,
            ..Default::default()
        });

        match test_name.as_str() {
            "seek" => app.add_systems(Startup, spawn_test_seek.after(config::load_vessel_config)),
            "flood" => app.add_systems(Startup, spawn_test_flood.after(config::load_vessel_config)),
            "ram" => app.add_systems(Startup, spawn_test_ram.after(config::load_vessel_config)),
            "idle" => app.add_systems(Startup, spawn_test_idle.after(config::load_vessel_config)),
            other => {
                eprintln!(
                    "Unknown test '{other}' (expected one of {:?}); running idle",
                    testing::SCENARIOS
                );
                app.add_systems(Startup, spawn_test_idle.after(config::load_vessel_config))
            }
        };

        app.add_systems(
            Update,
            (testing::test_logging_system, testing::test_verification_system)
                .chain()
                .after(VesselSet::Sync),
        );

        println!("Running test: {}", test_name);
    } else {
        app.insert_resource(TestConfig::default()).add_systems(
            Startup,
            scene::spawn_demo_scene
                .after(config::load_vessel_config)
                .after(graphics::setup_camera),
        );
        app.add_systems(Update, scene::vessel_control_system.before(VesselSet::Contacts));
    }

    app.run();
}
