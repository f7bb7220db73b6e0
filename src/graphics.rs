//! Demo-binary visuals: camera, camera shake, debug outlines and the hull
//! fill mesh.
//!
//! None of this feeds back into the simulation.

use crate::envelope::triangulate;
use crate::presentation::CameraShake;
use crate::structure::WallSegment;
use crate::terrain::TerrainCell;
use crate::vessel::{VesselBody, VesselPlacement};
use bevy::prelude::*;
use bevy_asset::RenderAssetUsages;
use bevy_mesh::{Indices, PrimitiveTopology};
use rand::Rng;

/// Resting position of the camera; shake jitters around it.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct CameraAnchor(pub Vec2);

/// Setup camera for 2D rendering
pub fn setup_camera(mut commands: Commands) {
    commands.spawn((Camera2d, CameraAnchor(Vec2::ZERO)));
    eprintln!("[SETUP] Camera spawned");
}

/// Offset the camera from its anchor by a random jitter scaled by the shake.
pub fn camera_shake_system(
    shake: Res<CameraShake>,
    mut cameras: Query<(&CameraAnchor, &mut Transform), With<Camera2d>>,
) {
    let mut rng = rand::thread_rng();
    for (anchor, mut transform) in cameras.iter_mut() {
        let jitter = if shake.magnitude > 0.0 {
            Vec2::new(rng.gen_range(-1.0..=1.0), rng.gen_range(-1.0..=1.0)) * shake.magnitude
        } else {
            Vec2::ZERO
        };
        let position = anchor.0 + jitter;
        transform.translation.x = position.x;
        transform.translation.y = position.y;
    }
}

/// Give every new vessel a flat fill mesh of its hull.
pub fn attach_hull_mesh_system(
    mut commands: Commands,
    query: Query<(Entity, &VesselBody), Added<VesselBody>>,
    mut meshes: ResMut<Assets<Mesh>>,
    mut materials: ResMut<Assets<ColorMaterial>>,
) {
    for (entity, vessel) in query.iter() {
        let triangles = match triangulate(&vessel.outline().vertices) {
            Ok(triangles) => triangles,
            Err(e) => {
                warn!("No hull mesh for {entity:?}: {e}");
                continue;
            }
        };

        commands.entity(entity).insert((
            Mesh2d(meshes.add(triangle_mesh(&triangles))),
            MeshMaterial2d(materials.add(ColorMaterial::from_color(Color::srgb(
                0.22, 0.26, 0.30,
            )))),
        ));
    }
}

/// Flat triangle-list mesh in local space.
pub fn triangle_mesh(triangles: &[[Vec2; 3]]) -> Mesh {
    let positions: Vec<[f32; 3]> = triangles
        .iter()
        .flatten()
        .map(|v| [v.x, v.y, 0.0])
        .collect();
    let n = positions.len();
    let normals: Vec<[f32; 3]> = vec![[0.0, 0.0, 1.0]; n];
    let uvs: Vec<[f32; 2]> = positions
        .iter()
        .map(|p| [(p[0] / 100.0) + 0.5, (p[1] / 100.0) + 0.5])
        .collect();
    let indices: Vec<u32> = (0..n as u32).collect();

    let mut mesh = Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    );
    mesh.insert_attribute(Mesh::ATTRIBUTE_POSITION, positions);
    mesh.insert_attribute(Mesh::ATTRIBUTE_NORMAL, normals);
    mesh.insert_attribute(Mesh::ATTRIBUTE_UV_0, uvs);
    mesh.insert_indices(Indices::U32(indices));
    mesh
}

/// Hull outlines, terrain edges and wall damage.
pub fn debug_outline_system(
    mut gizmos: Gizmos,
    vessels: Query<(&VesselBody, &VesselPlacement)>,
    terrain: Query<(&TerrainCell, &Transform)>,
    walls: Query<(&WallSegment, &Transform)>,
) {
    for (vessel, placement) in vessels.iter() {
        let outline = &vessel.outline().vertices;
        for (i, a) in outline.iter().enumerate() {
            let b = outline[(i + 1) % outline.len()];
            gizmos.line_2d(placement.0 + *a, placement.0 + b, Color::srgb(0.3, 0.8, 1.0));
        }
        if let Some(target) = vessel.target_position() {
            gizmos.circle_2d(target, 6.0, Color::srgb(1.0, 0.9, 0.2));
        }
    }

    for (cell, transform) in terrain.iter() {
        for (a, b) in cell.world_edges(transform.translation.truncate()) {
            gizmos.line_2d(a, b, Color::srgba(1.0, 1.0, 1.0, 0.4));
        }
    }

    for (segment, transform) in walls.iter() {
        let center = transform.translation.truncate();
        let axis = if segment.is_horizontal() { Vec2::X } else { Vec2::Y };
        for section in &segment.sections {
            let health = 1.0 - (section.damage / segment.max_health).clamp(0.0, 1.0);
            gizmos.line_2d(
                center + axis * section.start,
                center + axis * section.end,
                Color::srgb(1.0, health, health),
            );
        }
    }
}
