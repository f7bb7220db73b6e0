//! Structural wall segments and their damageable sections.
//!
//! A wall is an axis-aligned rectangle split along its long axis into sections
//! of [`crate::constants::WALL_SECTION_LENGTH`].  Damage is tracked per
//! section; a section whose damage reaches the wall's max health is breached.

use crate::envelope::{LIMB_GROUP, WALL_GROUP};
use crate::hull::WallRect;
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// One damageable piece of a wall.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WallSection {
    /// Extent along the wall's long axis, relative to the wall center.
    pub start: f32,
    pub end: f32,
    pub damage: f32,
}

/// A structural wall belonging to a vessel.
#[derive(Component, Debug, Clone)]
pub struct WallSegment {
    pub vessel: Entity,
    /// Rectangle relative to the vessel placement.
    pub local: WallRect,
    pub sections: Vec<WallSection>,
    pub max_health: f32,
}

impl WallSegment {
    pub fn new(vessel: Entity, local: WallRect, section_length: f32, max_health: f32) -> Self {
        let length = local.size.x.max(local.size.y);
        let count = ((length / section_length).ceil() as usize).max(1);
        let step = length / count as f32;
        let sections = (0..count)
            .map(|i| WallSection {
                start: -length * 0.5 + step * i as f32,
                end: -length * 0.5 + step * (i + 1) as f32,
                damage: 0.0,
            })
            .collect();
        Self {
            vessel,
            local,
            sections,
            max_health,
        }
    }

    pub fn is_horizontal(&self) -> bool {
        self.local.size.x >= self.local.size.y
    }

    /// Section nearest to `world_point`, given the wall's current world center.
    /// Points beyond either end map to the end section.
    pub fn find_section_index(&self, wall_center: Vec2, world_point: Vec2) -> usize {
        let offset = world_point - wall_center;
        let along = if self.is_horizontal() {
            offset.x
        } else {
            offset.y
        };
        self.sections
            .iter()
            .position(|s| along < s.end)
            .unwrap_or(self.sections.len() - 1)
    }

    /// Apply damage to one section.  Returns true when this hit breached it.
    pub fn add_damage(&mut self, index: usize, amount: f32) -> bool {
        let max_health = self.max_health;
        let Some(section) = self.sections.get_mut(index) else {
            return false;
        };
        let was_intact = section.damage < max_health;
        section.damage = (section.damage + amount.max(0.0)).min(max_health);
        was_intact && section.damage >= max_health
    }

    pub fn is_breached(&self, index: usize) -> bool {
        self.sections
            .get(index)
            .is_some_and(|s| s.damage >= self.max_health)
    }

    pub fn total_damage(&self) -> f32 {
        self.sections.iter().map(|s| s.damage).sum()
    }
}

/// Every component a wall body needs.  Walls are kinematic: the integrator
/// moves them along with the vessel.
pub fn wall_bundle(segment: WallSegment, placement: Vec2) -> impl Bundle {
    let center = placement + segment.local.center;
    let half = segment.local.size * 0.5;
    (
        Transform::from_translation(center.extend(0.0)),
        RigidBody::KinematicPositionBased,
        Collider::cuboid(half.x, half.y),
        CollisionGroups::new(WALL_GROUP, LIMB_GROUP),
        segment,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn horizontal_wall() -> WallSegment {
        let mut world = World::new();
        let vessel = world.spawn_empty().id();
        WallSegment::new(
            vessel,
            WallRect::new(Vec2::new(0.0, 0.0), Vec2::new(300.0, 20.0)),
            100.0,
            100.0,
        )
    }

    #[test]
    fn sections_cover_the_long_axis() {
        let wall = horizontal_wall();
        assert_eq!(wall.sections.len(), 3);
        assert_eq!(wall.sections[0].start, -150.0);
        assert_eq!(wall.sections[2].end, 150.0);
    }

    #[test]
    fn section_lookup_uses_offset_from_center() {
        let wall = horizontal_wall();
        let center = Vec2::new(1000.0, 500.0);
        assert_eq!(wall.find_section_index(center, center + Vec2::new(-120.0, 0.0)), 0);
        assert_eq!(wall.find_section_index(center, center), 1);
        assert_eq!(wall.find_section_index(center, center + Vec2::new(120.0, 8.0)), 2);
    }

    #[test]
    fn section_lookup_clamps_beyond_ends() {
        let wall = horizontal_wall();
        assert_eq!(wall.find_section_index(Vec2::ZERO, Vec2::new(-900.0, 0.0)), 0);
        assert_eq!(wall.find_section_index(Vec2::ZERO, Vec2::new(900.0, 0.0)), 2);
    }

    #[test]
    fn vertical_wall_splits_along_y() {
        let mut world = World::new();
        let vessel = world.spawn_empty().id();
        let wall = WallSegment::new(
            vessel,
            WallRect::new(Vec2::ZERO, Vec2::new(20.0, 200.0)),
            100.0,
            100.0,
        );
        assert!(!wall.is_horizontal());
        assert_eq!(wall.find_section_index(Vec2::ZERO, Vec2::new(0.0, 60.0)), 1);
    }

    #[test]
    fn damage_accumulates_and_reports_breach_once() {
        let mut wall = horizontal_wall();
        assert!(!wall.add_damage(1, 60.0));
        assert!(wall.add_damage(1, 60.0), "second hit crosses max health");
        assert!(!wall.add_damage(1, 60.0), "already breached");
        assert!(wall.is_breached(1));
        assert_eq!(wall.sections[1].damage, 100.0);
        assert_eq!(wall.total_damage(), 100.0);
    }

    #[test]
    fn out_of_range_section_is_ignored() {
        let mut wall = horizontal_wall();
        assert!(!wall.add_damage(99, 500.0));
        assert_eq!(wall.total_damage(), 0.0);
    }
}
