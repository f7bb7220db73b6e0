//! Typed lookup from physics-body entities to the domain object they stand for.
//!
//! Contact events only carry raw collider entities.  Every body this crate
//! spawns is registered here with its [`BodyRole`], so collision handling
//! recovers the vessel, terrain cell or wall behind a contact with one map
//! lookup.

use crate::error::{SimError, SimResult};
use bevy::prelude::*;
use std::collections::HashMap;

/// What a physics body represents.  The payload is the domain entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyRole {
    /// Compound envelope body of the given vessel.
    Vessel(Entity),
    /// Level geometry cell (the body entity is the cell itself).
    Terrain(Entity),
    /// Structural wall segment.
    Wall(Entity),
}

/// Resource mapping body entities to their [`BodyRole`].
#[derive(Resource, Debug, Clone, Default)]
pub struct BodyRegistry {
    roles: HashMap<Entity, BodyRole>,
}

impl BodyRegistry {
    pub fn register(&mut self, body: Entity, role: BodyRole) {
        self.roles.insert(body, role);
    }

    pub fn unregister(&mut self, body: Entity) -> Option<BodyRole> {
        self.roles.remove(&body)
    }

    pub fn role(&self, body: Entity) -> Option<BodyRole> {
        self.roles.get(&body).copied()
    }

    /// Vessel owning `body`, if `body` is a vessel envelope.
    pub fn vessel_of(&self, body: Entity) -> Option<Entity> {
        match self.role(body) {
            Some(BodyRole::Vessel(vessel)) => Some(vessel),
            _ => None,
        }
    }

    /// Wall segment entity behind `body`.
    pub fn wall_of(&self, body: Entity) -> SimResult<Entity> {
        match self.role(body) {
            Some(BodyRole::Wall(wall)) => Ok(wall),
            Some(_) => Err(SimError::ResolutionMiss {
                context: "picked body is not a wall segment",
            }),
            None => Err(SimError::EntityNotFound {
                context: "picked body missing from registry",
            }),
        }
    }

    pub fn len(&self) -> usize {
        self.roles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roles.is_empty()
    }
}

/// Removes registry entries for bodies whose entity was despawned.
pub fn prune_body_registry_system(
    mut registry: ResMut<BodyRegistry>,
    mut removed_colliders: RemovedComponents<bevy_rapier2d::prelude::Collider>,
) {
    for entity in removed_colliders.read() {
        registry.unregister(entity);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wall_lookup_distinguishes_missing_and_wrong_role() {
        let mut world = World::new();
        let wall = world.spawn_empty().id();
        let cell = world.spawn_empty().id();
        let stranger = world.spawn_empty().id();

        let mut registry = BodyRegistry::default();
        registry.register(wall, BodyRole::Wall(wall));
        registry.register(cell, BodyRole::Terrain(cell));

        assert_eq!(registry.wall_of(wall), Ok(wall));
        assert!(matches!(
            registry.wall_of(cell),
            Err(SimError::ResolutionMiss { .. })
        ));
        assert!(matches!(
            registry.wall_of(stranger),
            Err(SimError::EntityNotFound { .. })
        ));
    }

    #[test]
    fn vessel_of_only_answers_for_envelopes() {
        let mut world = World::new();
        let vessel = world.spawn_empty().id();
        let body = world.spawn_empty().id();
        let mut registry = BodyRegistry::default();
        registry.register(body, BodyRole::Vessel(vessel));

        assert_eq!(registry.vessel_of(body), Some(vessel));
        assert_eq!(registry.vessel_of(vessel), None);
        assert_eq!(registry.unregister(body), Some(BodyRole::Vessel(vessel)));
        assert!(registry.is_empty());
    }
}
