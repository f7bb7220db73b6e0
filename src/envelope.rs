//! Compound collision envelope of a vessel.
//!
//! The hull outline is cut into triangles (ear clipping) and registered with
//! Rapier as one compound dynamic body.  The body never rotates, ignores
//! gravity, never sleeps and only collides with terrain; its transform is
//! throw-away state that the integrator resets every tick.
//!
//! ## Collision groups
//!
//! | Layer     | Group   | Collides with |
//! |-----------|---------|---------------|
//! | Vessel    | GROUP_1 | GROUP_2 (terrain) |
//! | Terrain   | GROUP_2 | GROUP_1, GROUP_4 |
//! | Wall      | GROUP_3 | GROUP_4 (limbs) |
//! | Limb      | GROUP_4 | GROUP_2, GROUP_3 |
//!
//! Walls are outside the vessel's filter, so the envelope never
//! collides with its own interior.

use crate::error::{SimError, SimResult};
use crate::hull::cross_product;
use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

pub const VESSEL_GROUP: Group = Group::GROUP_1;
pub const TERRAIN_GROUP: Group = Group::GROUP_2;
pub const WALL_GROUP: Group = Group::GROUP_3;
pub const LIMB_GROUP: Group = Group::GROUP_4;

/// Marks the physics body of a vessel and points back at the vessel entity.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq)]
pub struct VesselEnvelope {
    pub vessel: Entity,
}

/// Cut a simple polygon into triangles by ear clipping.
///
/// Accepts either winding; triangles are always returned counter-clockwise.
/// Collinear vertices are dropped without emitting a triangle.
pub fn triangulate(polygon: &[Vec2]) -> SimResult<Vec<[Vec2; 3]>> {
    let degenerate = || SimError::DegenerateGeometry {
        corner_count: polygon.len(),
    };
    if polygon.len() < 3 {
        return Err(degenerate());
    }

    let mut ring: Vec<usize> = (0..polygon.len()).collect();
    if signed_area(polygon) < 0.0 {
        ring.reverse();
    }

    let mut triangles = Vec::with_capacity(polygon.len() - 2);
    while ring.len() > 3 {
        let m = ring.len();
        let mut clipped = false;
        for k in 0..m {
            let prev = polygon[ring[(k + m - 1) % m]];
            let cur = polygon[ring[k]];
            let next = polygon[ring[(k + 1) % m]];
            let turn = cross_product(prev, cur, next);

            if turn == 0.0 {
                ring.remove(k);
                clipped = true;
                break;
            }
            if turn < 0.0 {
                continue;
            }
            let blocked = ring.iter().any(|&j| {
                let p = polygon[j];
                p != prev && p != cur && p != next && point_in_triangle(p, prev, cur, next)
            });
            if blocked {
                continue;
            }

            triangles.push([prev, cur, next]);
            ring.remove(k);
            clipped = true;
            break;
        }
        if !clipped {
            return Err(degenerate());
        }
    }

    let last = [polygon[ring[0]], polygon[ring[1]], polygon[ring[2]]];
    if cross_product(last[0], last[1], last[2]) > 0.0 {
        triangles.push(last);
    }
    if triangles.is_empty() {
        return Err(degenerate());
    }
    Ok(triangles)
}

/// Twice the signed area is the shoelace sum; positive for counter-clockwise.
pub fn signed_area(polygon: &[Vec2]) -> f32 {
    let n = polygon.len();
    (0..n)
        .map(|i| {
            let a = polygon[i];
            let b = polygon[(i + 1) % n];
            a.x * b.y - b.x * a.y
        })
        .sum::<f32>()
        * 0.5
}

fn point_in_triangle(p: Vec2, a: Vec2, b: Vec2, c: Vec2) -> bool {
    cross_product(a, b, p) >= 0.0 && cross_product(b, c, p) >= 0.0 && cross_product(c, a, p) >= 0.0
}

/// One compound collider made of the given triangles, in body-local space.
pub fn compound_collider(triangles: &[[Vec2; 3]]) -> Collider {
    let shapes = triangles
        .iter()
        .map(|t| (Vec2::ZERO, 0.0, Collider::triangle(t[0], t[1], t[2])))
        .collect();
    Collider::compound(shapes)
}

/// Every component the envelope body needs, placed at `anchor`.
pub fn envelope_bundle(
    vessel: Entity,
    triangles: &[[Vec2; 3]],
    anchor: Vec2,
    density: f32,
) -> impl Bundle {
    (
        (
            VesselEnvelope { vessel },
            Transform::from_translation(anchor.extend(0.0)),
            RigidBody::Dynamic,
            compound_collider(triangles),
            ColliderMassProperties::Density(density),
            Restitution::coefficient(0.0),
        ),
        (
            LockedAxes::ROTATION_LOCKED,
            GravityScale(0.0),
            Sleeping::disabled(),
            Velocity::zero(),
            CollisionGroups::new(VESSEL_GROUP, TERRAIN_GROUP),
            ActiveEvents::COLLISION_EVENTS,
        ),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangles_area(triangles: &[[Vec2; 3]]) -> f32 {
        triangles.iter().map(|t| signed_area(t)).sum()
    }

    #[test]
    fn convex_ngon_yields_n_minus_two_triangles() {
        let hexagon: Vec<Vec2> = (0..6)
            .map(|i| {
                let a = std::f32::consts::TAU * i as f32 / 6.0;
                Vec2::new(a.cos(), a.sin()) * 100.0
            })
            .collect();
        let triangles = triangulate(&hexagon).expect("hexagon triangulates");
        assert_eq!(triangles.len(), 4);
        assert!((triangles_area(&triangles) - signed_area(&hexagon)).abs() < 1e-1);
    }

    #[test]
    fn clockwise_input_produces_ccw_triangles() {
        let cw = [
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 0.0),
        ];
        let triangles = triangulate(&cw).unwrap();
        assert_eq!(triangles.len(), 2);
        for t in &triangles {
            assert!(signed_area(t) > 0.0, "triangle {t:?} is not counter-clockwise");
        }
        assert!((triangles_area(&triangles) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn concave_polygon_area_is_preserved() {
        // An "L" shape: reflex vertex at (10, 10).
        let l_shape = [
            Vec2::new(0.0, 0.0),
            Vec2::new(20.0, 0.0),
            Vec2::new(20.0, 10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(10.0, 20.0),
            Vec2::new(0.0, 20.0),
        ];
        let triangles = triangulate(&l_shape).unwrap();
        assert_eq!(triangles.len(), 4);
        assert!((triangles_area(&triangles) - 300.0).abs() < 1e-3);
    }

    #[test]
    fn collinear_vertex_never_yields_flat_triangle() {
        let with_midpoint = [
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(0.0, 10.0),
        ];
        let triangles = triangulate(&with_midpoint).unwrap();
        for t in &triangles {
            assert!(signed_area(t) > 0.0, "flat triangle {t:?}");
        }
        assert!((triangles_area(&triangles) - 100.0).abs() < 1e-3);
    }

    #[test]
    fn too_few_points_is_degenerate() {
        assert!(triangulate(&[Vec2::ZERO, Vec2::X]).is_err());
        assert!(triangulate(&[Vec2::ZERO, Vec2::X, Vec2::X * 2.0]).is_err());
    }

    #[test]
    fn vessel_filter_hits_terrain_but_not_walls() {
        assert!(TERRAIN_GROUP.intersects(TERRAIN_GROUP | LIMB_GROUP));
        assert!(!VESSEL_GROUP.intersects(WALL_GROUP | LIMB_GROUP));
        let vessel_filter = TERRAIN_GROUP;
        assert!(!WALL_GROUP.intersects(vessel_filter));
    }
}
