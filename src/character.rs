//! Characters aboard a vessel and the limbs collisions push around.

use crate::envelope::{LIMB_GROUP, TERRAIN_GROUP, WALL_GROUP};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// A character.  `compartment` is the room its locomotion currently stands in.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Character {
    pub compartment: Option<Entity>,
    /// Seconds of stun left; zero when the character can act.
    pub stun_timer: f32,
}

impl Character {
    pub fn is_stunned(&self) -> bool {
        self.stun_timer > 0.0
    }
}

/// One physics limb of a character.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Limb {
    pub owner: Entity,
    pub mass: f32,
    /// The limb touching the floor.  Impacts never push it.
    pub lowest: bool,
}

/// Counts stun timers down toward zero.
pub fn character_stun_system(time: Res<Time>, mut characters: Query<&mut Character>) {
    let dt = time.delta_secs();
    for mut character in characters.iter_mut() {
        if character.stun_timer > 0.0 {
            character.stun_timer = (character.stun_timer - dt).max(0.0);
        }
    }
}

/// Spawn a character with `limb_count` ball limbs stacked upward from `feet`;
/// the first limb is the lowest.
pub fn spawn_character(
    commands: &mut Commands,
    compartment: Option<Entity>,
    feet: Vec2,
    limb_count: usize,
) -> Entity {
    const LIMB_RADIUS: f32 = 6.0;
    const LIMB_MASS: f32 = 5.0;

    let character = commands
        .spawn(Character {
            compartment,
            stun_timer: 0.0,
        })
        .id();

    for i in 0..limb_count {
        let offset = Vec2::new(0.0, LIMB_RADIUS + i as f32 * LIMB_RADIUS * 2.0);
        commands.spawn((
            Limb {
                owner: character,
                mass: LIMB_MASS,
                lowest: i == 0,
            },
            Transform::from_translation((feet + offset).extend(0.0)),
            RigidBody::Dynamic,
            Collider::ball(LIMB_RADIUS),
            ColliderMassProperties::Mass(LIMB_MASS),
            ExternalImpulse::default(),
            Velocity::zero(),
            CollisionGroups::new(LIMB_GROUP, TERRAIN_GROUP | WALL_GROUP),
        ));
    }

    character
}
