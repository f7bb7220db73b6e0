//! Vessel simulation plugin.
//!
//! Update runs, in order: collect new contacts, resolve them, integrate every
//! vessel, then move walls and transforms onto the new placements.  Rapier
//! steps in PostUpdate, so contacts it reports are consumed on the next
//! frame.

use crate::character::character_stun_system;
use crate::collision::{collect_vessel_contacts_system, resolve_vessel_contacts_system, VesselContact};
use crate::config::VesselConfig;
use crate::presentation::{camera_shake_decay_system, CameraShake, DamageSound};
use crate::registry::{prune_body_registry_system, BodyRegistry};
use crate::vessel::{
    release_vessel_bodies_system, sync_vessel_placement_system, vessel_integration_system,
};
use bevy::prelude::*;

/// Ordering labels for the vessel pipeline.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub enum VesselSet {
    Contacts,
    Integrate,
    Sync,
}

pub struct VesselPlugin;

impl Plugin for VesselPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<VesselConfig>()
            .init_resource::<BodyRegistry>()
            .init_resource::<CameraShake>()
            .add_message::<VesselContact>()
            .add_message::<DamageSound>()
            .configure_sets(
                Update,
                (VesselSet::Contacts, VesselSet::Integrate, VesselSet::Sync).chain(),
            )
            .add_systems(
                Update,
                (
                    (collect_vessel_contacts_system, resolve_vessel_contacts_system)
                        .chain()
                        .in_set(VesselSet::Contacts),
                    vessel_integration_system.in_set(VesselSet::Integrate),
                    sync_vessel_placement_system.in_set(VesselSet::Sync),
                    character_stun_system,
                    camera_shake_decay_system,
                ),
            )
            // Runs after despawns queued this frame have been applied.
            .add_systems(
                PostUpdate,
                (release_vessel_bodies_system, prune_body_registry_system).chain(),
            );
    }
}
