//! Demo world for the binary: one vessel, its crew, and a field of rocks.

use crate::buoyancy::Compartment;
use crate::character::spawn_character;
use crate::config::VesselConfig;
use crate::hull::WallRect;
use crate::registry::BodyRegistry;
use crate::terrain::spawn_terrain_cell;
use crate::vessel::{spawn_vessel, VesselBody};
use bevy::input::ButtonInput;
use bevy::prelude::*;
use rand::Rng;

const WALL_THICKNESS: f32 = 10.0;

/// Outer shell of a `width × height` vessel plus evenly spaced bulkheads,
/// all relative to the vessel center.
pub fn box_hull_walls(width: f32, height: f32, bulkheads: usize) -> Vec<WallRect> {
    let half_w = width * 0.5;
    let half_h = height * 0.5;
    let mut walls = vec![
        WallRect::new(Vec2::new(0.0, half_h), Vec2::new(width, WALL_THICKNESS)),
        WallRect::new(Vec2::new(0.0, -half_h), Vec2::new(width, WALL_THICKNESS)),
        WallRect::new(Vec2::new(-half_w, 0.0), Vec2::new(WALL_THICKNESS, height)),
        WallRect::new(Vec2::new(half_w, 0.0), Vec2::new(WALL_THICKNESS, height)),
    ];
    let spacing = width / (bulkheads + 1) as f32;
    for i in 1..=bulkheads {
        let x = -half_w + spacing * i as f32;
        walls.push(WallRect::new(
            Vec2::new(x, 0.0),
            Vec2::new(WALL_THICKNESS, height - WALL_THICKNESS),
        ));
    }
    walls
}

/// A rough polygon: `sides` vertices around the origin with radial jitter.
pub fn rock_outline(radius: f32, sides: usize, jitter: f32, rng: &mut impl Rng) -> Vec<Vec2> {
    let sides = sides.max(3);
    (0..sides)
        .map(|i| {
            let angle = std::f32::consts::TAU * i as f32 / sides as f32;
            let r = radius * (1.0 + rng.gen_range(-jitter..=jitter));
            Vec2::from_angle(angle) * r
        })
        .collect()
}

pub fn spawn_demo_scene(
    mut commands: Commands,
    mut registry: ResMut<BodyRegistry>,
    config: Res<VesselConfig>,
) {
    const ROOMS: usize = 3;
    let (width, height) = (600.0, 200.0);
    let placement = Vec2::new(-250.0, 0.0);

    let walls = box_hull_walls(width, height, ROOMS - 1);
    let vessel = match spawn_vessel(&mut commands, &mut registry, &walls, placement, &config) {
        Ok(vessel) => vessel,
        Err(e) => {
            error!("Demo vessel not spawned: {e}");
            return;
        }
    };

    // Start at neutral trim so the vessel hovers until flooded or pumped.
    let room_volume = (width / ROOMS as f32) * height;
    let rooms: Vec<Entity> = (0..ROOMS)
        .map(|_| {
            let mut room = Compartment::dry(vessel, room_volume);
            room.flood(room_volume * config.neutral_water_fraction);
            commands.spawn(room).id()
        })
        .collect();

    let floor = placement.y - height * 0.5 + WALL_THICKNESS;
    for (i, room) in rooms.iter().enumerate() {
        let x = placement.x - width * 0.5 + (i as f32 + 0.5) * width / ROOMS as f32;
        spawn_character(&mut commands, Some(*room), Vec2::new(x, floor), 3);
    }

    let mut rng = rand::thread_rng();
    let mut cells = 0;
    for i in 0..6 {
        let position = Vec2::new(250.0 + i as f32 * 110.0, rng.gen_range(-250.0..=250.0));
        let outline = rock_outline(rng.gen_range(30.0..=60.0), 7, 0.25, &mut rng);
        match spawn_terrain_cell(&mut commands, &mut registry, outline, position) {
            Ok(_) => cells += 1,
            Err(e) => warn!("Terrain cell skipped: {e}"),
        }
    }

    println!("✓ Demo scene: 1 vessel, {ROOMS} compartments, {cells} terrain cells");
}

/// Left click sets the vessel's target; `F` floods and `P` pumps every
/// compartment.
pub fn vessel_control_system(
    buttons: Res<ButtonInput<MouseButton>>,
    keys: Res<ButtonInput<KeyCode>>,
    windows: Query<&Window>,
    cameras: Query<(&Camera, &GlobalTransform)>,
    mut vessels: Query<&mut VesselBody>,
    mut compartments: Query<&mut Compartment>,
) {
    if buttons.just_pressed(MouseButton::Left) {
        let target = windows
            .single()
            .ok()
            .and_then(|window| window.cursor_position())
            .and_then(|cursor| {
                let (camera, transform) = cameras.single().ok()?;
                camera.viewport_to_world_2d(transform, cursor).ok()
            });
        if let Some(target) = target {
            for mut vessel in vessels.iter_mut() {
                let _ = vessel.set_target_position(target);
            }
        }
    }

    let flow = if keys.pressed(KeyCode::KeyF) {
        200.0
    } else if keys.pressed(KeyCode::KeyP) {
        -200.0
    } else {
        return;
    };
    for mut room in compartments.iter_mut() {
        room.flood(flow);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hull::HullOutline;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn box_hull_encloses_every_wall() {
        let walls = box_hull_walls(600.0, 200.0, 2);
        assert_eq!(walls.len(), 6);
        let hull = HullOutline::from_walls(&walls).unwrap();
        // Shell corners overlap, cutting each hull corner: 8 vertices.
        assert_eq!(hull.vertices.len(), 8, "bulkheads sit inside the shell");
        assert!((hull.bounds.width() - 610.0).abs() < 1e-3);
        assert!((hull.bounds.height() - 210.0).abs() < 1e-3);
    }

    #[test]
    fn rock_outline_stays_within_jitter() {
        let mut rng = StdRng::seed_from_u64(7);
        let rock = rock_outline(50.0, 7, 0.25, &mut rng);
        assert_eq!(rock.len(), 7);
        for v in rock {
            let r = v.length();
            assert!((37.4..=62.6).contains(&r), "radius {r}");
        }
    }
}
