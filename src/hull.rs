//! Convex outline of a vessel, built from its wall segments.
//!
//! Every wall is a rectangle; its four corners are collected, exact duplicates
//! removed, and the convex hull found with a gift-wrapping walk starting from
//! the leftmost corner.  The result is the single collision envelope the
//! physics engine sees for the whole vessel.
//!
//! Vertices come out counter-clockwise (y up), which is the winding Rapier
//! expects for convex pieces.

use crate::error::{SimError, SimResult};
use bevy::prelude::*;

/// Axis-aligned wall rectangle: center and full size, in display units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallRect {
    pub center: Vec2,
    pub size: Vec2,
}

impl WallRect {
    pub fn new(center: Vec2, size: Vec2) -> Self {
        Self { center, size }
    }

    /// The four corners: center ± half-width, ± half-height.
    pub fn corners(&self) -> [Vec2; 4] {
        let half = self.size * 0.5;
        let mut out = [Vec2::ZERO; 4];
        let mut i = 0;
        for x in [-1.0, 1.0] {
            for y in [-1.0, 1.0] {
                out[i] = self.center + Vec2::new(x * half.x, y * half.y);
                i += 1;
            }
        }
        out
    }
}

/// Convex hull of a vessel plus its bounding rectangle.
#[derive(Debug, Clone, PartialEq)]
pub struct HullOutline {
    /// Counter-clockwise hull vertices, first vertex not repeated at the end.
    pub vertices: Vec<Vec2>,
    /// Axis-aligned bounds of `vertices`.
    pub bounds: Rect,
}

impl HullOutline {
    /// Build the outline enclosing every corner of `walls`.
    pub fn from_walls(walls: &[WallRect]) -> SimResult<Self> {
        let mut corners: Vec<Vec2> = Vec::with_capacity(walls.len() * 4);
        for wall in walls {
            for corner in wall.corners() {
                if !corners.contains(&corner) {
                    corners.push(corner);
                }
            }
        }
        Self::from_points(&corners)
    }

    /// Build the outline enclosing `points`.  Exact duplicates are ignored.
    pub fn from_points(points: &[Vec2]) -> SimResult<Self> {
        let mut unique: Vec<Vec2> = Vec::with_capacity(points.len());
        for &p in points {
            if !unique.contains(&p) {
                unique.push(p);
            }
        }

        let vertices = gift_wrap(&unique).ok_or(SimError::DegenerateGeometry {
            corner_count: unique.len(),
        })?;
        let bounds = bounding_rect(&vertices);
        Ok(Self { vertices, bounds })
    }

    /// Center of the bounding rectangle.
    pub fn center(&self) -> Vec2 {
        self.bounds.center()
    }

    /// True when `p` is inside or on the boundary (with a small tolerance).
    pub fn contains(&self, p: Vec2) -> bool {
        let n = self.vertices.len();
        (0..n).all(|i| {
            let a = self.vertices[i];
            let b = self.vertices[(i + 1) % n];
            cross_product(a, b, p) >= -1e-3
        })
    }

    /// True when every turn along the outline is a left turn.
    pub fn is_convex(&self) -> bool {
        let n = self.vertices.len();
        n >= 3
            && (0..n).all(|i| {
                let a = self.vertices[i];
                let b = self.vertices[(i + 1) % n];
                let c = self.vertices[(i + 2) % n];
                cross_product(a, b, c) > 0.0
            })
    }
}

/// Gift-wrapping walk.  Returns `None` for fewer than three distinct points or
/// when every point is collinear.
fn gift_wrap(points: &[Vec2]) -> Option<Vec<Vec2>> {
    if points.len() < 3 {
        return None;
    }

    // Leftmost point, lowest among ties, so the start is a true hull corner.
    let mut start = 0;
    for i in 1..points.len() {
        if points[i].x < points[start].x
            || (points[i].x == points[start].x && points[i].y < points[start].y)
        {
            start = i;
        }
    }

    let mut hull = Vec::new();
    let mut current = start;

    loop {
        hull.push(points[current]);
        if hull.len() > points.len() {
            return None;
        }

        let mut next = if current == 0 { 1 } else { 0 };
        for i in 0..points.len() {
            if i == current {
                continue;
            }
            let turn = cross_product(points[current], points[next], points[i]);
            // A right turn means `i` lies outside the candidate edge.  On ties
            // take the farther point along the same direction so collinear
            // corners are skipped.
            let ahead = points[i] - points[current];
            let edge = points[next] - points[current];
            if turn < 0.0
                || (turn == 0.0
                    && ahead.dot(edge) > 0.0
                    && ahead.length_squared() > edge.length_squared())
            {
                next = i;
            }
        }

        current = next;
        // Closing on any vertex already walked ends the loop too.
        if current == start || hull.contains(&points[current]) {
            break;
        }
    }

    if hull.len() < 3 {
        return None;
    }
    Some(hull)
}

fn bounding_rect(vertices: &[Vec2]) -> Rect {
    let min = vertices
        .iter()
        .copied()
        .fold(Vec2::splat(f32::INFINITY), Vec2::min);
    let max = vertices
        .iter()
        .copied()
        .fold(Vec2::splat(f32::NEG_INFINITY), Vec2::max);
    Rect::from_corners(min, max)
}

/// Cross product to determine turn direction: positive for a left turn.
pub(crate) fn cross_product(o: Vec2, a: Vec2, b: Vec2) -> f32 {
    (a.x - o.x) * (b.y - o.y) - (a.y - o.y) * (b.x - o.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn square_wall() -> WallRect {
        WallRect::new(Vec2::ZERO, Vec2::new(100.0, 100.0))
    }

    #[test]
    fn single_square_wall_yields_its_four_corners() {
        let outline = HullOutline::from_walls(&[square_wall()]).expect("square is valid");
        assert_eq!(outline.vertices.len(), 4);
        for corner in square_wall().corners() {
            assert!(
                outline.vertices.contains(&corner),
                "corner {corner:?} missing from hull"
            );
        }
        assert!(outline.is_convex(), "square hull should wind consistently");
    }

    #[test]
    fn single_square_wall_bounds_are_centered() {
        let outline = HullOutline::from_walls(&[square_wall()]).unwrap();
        assert_eq!(outline.bounds.size(), Vec2::new(100.0, 100.0));
        assert_eq!(outline.center(), Vec2::ZERO);
    }

    #[test]
    fn hull_starts_at_leftmost_corner() {
        let outline = HullOutline::from_walls(&[
            WallRect::new(Vec2::new(0.0, 0.0), Vec2::new(40.0, 10.0)),
            WallRect::new(Vec2::new(-200.0, 30.0), Vec2::new(10.0, 60.0)),
        ])
        .unwrap();
        assert_eq!(outline.vertices[0].x, -205.0);
    }

    #[test]
    fn hull_is_convex_and_contains_every_corner() {
        let walls = [
            WallRect::new(Vec2::new(0.0, 0.0), Vec2::new(400.0, 20.0)),
            WallRect::new(Vec2::new(-190.0, 80.0), Vec2::new(20.0, 160.0)),
            WallRect::new(Vec2::new(190.0, 60.0), Vec2::new(20.0, 120.0)),
            WallRect::new(Vec2::new(0.0, 170.0), Vec2::new(300.0, 20.0)),
            WallRect::new(Vec2::new(40.0, 80.0), Vec2::new(10.0, 10.0)),
            WallRect::new(Vec2::new(260.0, -30.0), Vec2::new(30.0, 30.0)),
        ];
        let outline = HullOutline::from_walls(&walls).unwrap();
        assert!(outline.is_convex(), "outline {:?} is not convex", outline.vertices);
        for wall in &walls {
            for corner in wall.corners() {
                assert!(outline.contains(corner), "corner {corner:?} outside hull");
            }
        }
    }

    #[test]
    fn collinear_edge_points_are_skipped() {
        // Two walls side by side share an edge; the midpoints sit on the hull edge.
        let outline = HullOutline::from_walls(&[
            WallRect::new(Vec2::new(-50.0, 0.0), Vec2::new(100.0, 100.0)),
            WallRect::new(Vec2::new(50.0, 0.0), Vec2::new(100.0, 100.0)),
        ])
        .unwrap();
        assert_eq!(outline.vertices.len(), 4, "got {:?}", outline.vertices);
    }

    #[test]
    fn interior_point_is_excluded() {
        let pts = [
            Vec2::new(-10.0, -10.0),
            Vec2::new(10.0, -10.0),
            Vec2::new(10.0, 10.0),
            Vec2::new(-10.0, 10.0),
            Vec2::new(0.0, 0.0),
        ];
        let outline = HullOutline::from_points(&pts).unwrap();
        assert_eq!(outline.vertices.len(), 4);
        assert!(!outline.vertices.contains(&Vec2::ZERO));
    }

    #[test]
    fn fewer_than_three_distinct_corners_is_degenerate() {
        let err = HullOutline::from_points(&[Vec2::ZERO, Vec2::ZERO, Vec2::X]).unwrap_err();
        assert_eq!(err, SimError::DegenerateGeometry { corner_count: 2 });
    }

    #[test]
    fn zero_area_wall_is_degenerate() {
        let flat = WallRect::new(Vec2::ZERO, Vec2::new(100.0, 0.0));
        assert!(matches!(
            HullOutline::from_walls(&[flat]),
            Err(SimError::DegenerateGeometry { .. })
        ));
    }

    #[test]
    fn collinear_leftmost_start_still_closes() {
        let pts = [
            Vec2::new(0.0, 5.0),
            Vec2::new(0.0, 0.0),
            Vec2::new(0.0, 10.0),
            Vec2::new(10.0, 5.0),
        ];
        let outline = HullOutline::from_points(&pts).unwrap();
        assert_eq!(outline.vertices.len(), 3, "got {:?}", outline.vertices);
        assert_eq!(outline.vertices[0], Vec2::new(0.0, 0.0));
        assert!(outline.is_convex(), "outline {:?} is not convex", outline.vertices);
        for p in pts {
            assert!(outline.contains(p), "{p:?} outside hull");
        }
    }

    #[test]
    fn stacked_walls_listed_top_first() {
        // The first leftmost corner seen sits halfway up the left edge.
        let walls = [
            WallRect::new(Vec2::new(0.0, 100.0), Vec2::new(100.0, 100.0)),
            WallRect::new(Vec2::new(0.0, 0.0), Vec2::new(100.0, 100.0)),
        ];
        let outline = HullOutline::from_walls(&walls).unwrap();
        assert_eq!(
            outline.vertices,
            vec![
                Vec2::new(-50.0, -50.0),
                Vec2::new(50.0, -50.0),
                Vec2::new(50.0, 150.0),
                Vec2::new(-50.0, 150.0),
            ]
        );
        assert!(outline.is_convex());
    }

    #[test]
    fn random_wall_sets_give_convex_hulls() {
        use rand::rngs::StdRng;
        use rand::{Rng, SeedableRng};

        let mut rng = StdRng::seed_from_u64(42);
        for round in 0..2000 {
            // Grid-aligned walls share edges and corners often.
            let count = rng.gen_range(1..=6);
            let walls: Vec<WallRect> = (0..count)
                .map(|_| {
                    let center = Vec2::new(
                        rng.gen_range(-4..=4) as f32 * 10.0,
                        rng.gen_range(-4..=4) as f32 * 10.0,
                    );
                    let size = Vec2::new(
                        rng.gen_range(1..=4) as f32 * 20.0,
                        rng.gen_range(1..=4) as f32 * 20.0,
                    );
                    WallRect::new(center, size)
                })
                .collect();

            let outline = HullOutline::from_walls(&walls)
                .unwrap_or_else(|e| panic!("round {round}: {e} for {walls:?}"));
            assert!(
                outline.is_convex(),
                "round {round}: outline {:?} is not convex",
                outline.vertices
            );
            for wall in &walls {
                for corner in wall.corners() {
                    assert!(
                        outline.contains(corner),
                        "round {round}: corner {corner:?} outside {:?}",
                        outline.vertices
                    );
                }
            }
        }
    }

    #[test]
    fn no_walls_is_degenerate() {
        assert!(HullOutline::from_walls(&[]).is_err());
    }

    #[test]
    fn collinear_points_are_degenerate() {
        let pts = [
            Vec2::new(0.0, 0.0),
            Vec2::new(5.0, 0.0),
            Vec2::new(10.0, 0.0),
            Vec2::new(15.0, 0.0),
        ];
        assert!(HullOutline::from_points(&pts).is_err());
    }
}
