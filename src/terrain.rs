//! Level geometry cells the vessel can crash into.

use crate::envelope::{compound_collider, triangulate, LIMB_GROUP, TERRAIN_GROUP, VESSEL_GROUP};
use crate::error::SimResult;
use crate::registry::{BodyRegistry, BodyRole};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// A polygonal terrain region.  Vertices are relative to the cell's transform.
#[derive(Component, Debug, Clone, PartialEq)]
pub struct TerrainCell {
    pub vertices: Vec<Vec2>,
}

impl TerrainCell {
    pub fn new(vertices: Vec<Vec2>) -> Self {
        Self { vertices }
    }

    /// Boundary edges in local space, closing back to the first vertex.
    pub fn edges(&self) -> impl Iterator<Item = (Vec2, Vec2)> + '_ {
        let n = self.vertices.len();
        (0..n).map(move |i| (self.vertices[i], self.vertices[(i + 1) % n]))
    }

    /// Boundary edges shifted to the cell's world position.
    pub fn world_edges(&self, position: Vec2) -> Vec<(Vec2, Vec2)> {
        self.edges().map(|(a, b)| (a + position, b + position)).collect()
    }
}

/// Spawn a fixed terrain cell and register its body.
pub fn spawn_terrain_cell(
    commands: &mut Commands,
    registry: &mut BodyRegistry,
    vertices: Vec<Vec2>,
    position: Vec2,
) -> SimResult<Entity> {
    let collider = compound_collider(&triangulate(&vertices)?);
    let cell = commands
        .spawn((
            TerrainCell::new(vertices),
            Transform::from_translation(position.extend(0.0)),
            RigidBody::Fixed,
            collider,
            Friction::coefficient(0.5),
            CollisionGroups::new(TERRAIN_GROUP, VESSEL_GROUP | LIMB_GROUP),
            ActiveEvents::COLLISION_EVENTS,
        ))
        .id();
    registry.register(cell, BodyRole::Terrain(cell));
    Ok(cell)
}
