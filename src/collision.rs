//! Bevy side of vessel collisions.
//!
//! `collect_vessel_contacts_system` turns rapier `CollisionEvent::Started`
//! pairs that involve a vessel envelope into [`VesselContact`] messages.
//! `resolve_vessel_contacts_system` feeds each one through the
//! [`CollisionResolver`] and applies what it decided: limb impulses, stun
//! timers, wall damage, sounds and camera shake.

use crate::buoyancy::Compartment;
use crate::character::{Character, Limb};
use crate::config::VesselConfig;
use crate::envelope::WALL_GROUP;
use crate::error::{SimError, SimResult};
use crate::presentation::{CameraShake, DamageSound, DamageSoundKind};
use crate::registry::{BodyRegistry, BodyRole};
use crate::resolver::{
    CharacterSink, CollisionResolver, ContactInput, LimbInfo, PhysicsQuery, PickHit,
    PresentationSink, StructureSink, TerrainContact,
};
use crate::structure::WallSegment;
use crate::terrain::TerrainCell;
use crate::units::UnitScale;
use crate::vessel::VesselBody;
use bevy::prelude::*;
use bevy_rapier2d::geometry::Group;
use bevy_rapier2d::prelude::*;

/// A contact between a vessel envelope and another body.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct VesselContact {
    pub vessel: Entity,
    /// The vessel's envelope body.
    pub body: Entity,
    /// The other collider.
    pub partner: Entity,
    /// Unit normal from the vessel toward `partner`.
    pub normal: Vec2,
    /// World contact point.
    pub point: Vec2,
}

/// Emit a [`VesselContact`] for every new contact touching a vessel envelope.
///
/// Terrain contacts need a manifold to get a normal; pairs whose manifold is
/// already gone are dropped.  Contacts with anything else are always emitted
/// since their response ignores the geometry.
pub fn collect_vessel_contacts_system(
    mut collision_events: MessageReader<CollisionEvent>,
    rapier_context: ReadRapierContext,
    registry: Res<BodyRegistry>,
    transforms: Query<&Transform>,
    mut contacts: MessageWriter<VesselContact>,
) {
    let rapier = rapier_context.single().ok();

    for event in collision_events.read() {
        let (e1, e2) = match event {
            CollisionEvent::Started(e1, e2, _) => (*e1, *e2),
            CollisionEvent::Stopped(..) => continue,
        };

        let (body, vessel, partner) = match (registry.role(e1), registry.role(e2)) {
            (Some(BodyRole::Vessel(v)), _) => (e1, v, e2),
            (_, Some(BodyRole::Vessel(v))) => (e2, v, e1),
            _ => continue,
        };

        let geometry = rapier
            .as_ref()
            .and_then(|rapier| contact_geometry(rapier, body, partner));

        let (normal, point) = match geometry {
            Some(geometry) => geometry,
            None if matches!(registry.role(partner), Some(BodyRole::Terrain(_))) => {
                debug!("Terrain contact {body:?}/{partner:?} has no manifold; skipped");
                continue;
            }
            None => {
                let point = transforms
                    .get(body)
                    .map(|t| t.translation.truncate())
                    .unwrap_or_default();
                (Vec2::ZERO, point)
            }
        };

        contacts.write(VesselContact {
            vessel,
            body,
            partner,
            normal,
            point,
        });
    }
}

/// Contact normal (oriented from `body` toward `partner`) and point.
fn contact_geometry(
    rapier: &RapierContext,
    body: Entity,
    partner: Entity,
) -> Option<(Vec2, Vec2)> {
    let pair = rapier.contact_pair(body, partner)?;
    let manifold = pair.manifold(0)?;
    let mut normal = manifold.normal();
    if pair.collider1() != Some(body) {
        normal = -normal;
    }
    let point = manifold.solver_contact(0)?.point();
    Some((normal.normalize_or_zero(), point))
}

/// Side effects gathered while the resolver runs, applied once it returns.
struct ContactScratch<'a, 'r> {
    crew: Vec<(Entity, Vec<LimbInfo>)>,
    rapier: Option<&'a RapierContext<'r>>,
    registry: &'a BodyRegistry,
    units: UnitScale,
    impulses: Vec<(Entity, Vec2)>,
    stuns: Vec<(Entity, f32)>,
    damage: Vec<(Entity, Vec2, f32)>,
    sounds: Vec<DamageSound>,
    shake: Option<f32>,
}

impl CharacterSink for ContactScratch<'_, '_> {
    fn crew_aboard(&self) -> Vec<Entity> {
        self.crew.iter().map(|(c, _)| *c).collect()
    }

    fn limbs_of(&self, character: Entity) -> Vec<LimbInfo> {
        self.crew
            .iter()
            .find(|(c, _)| *c == character)
            .map(|(_, limbs)| limbs.clone())
            .unwrap_or_default()
    }

    fn apply_limb_impulse(&mut self, limb: Entity, impulse: Vec2) {
        self.impulses.push((limb, self.units.to_display(impulse)));
    }

    fn set_stun(&mut self, character: Entity, seconds: f32) {
        self.stuns.push((character, seconds));
    }
}

impl PhysicsQuery for ContactScratch<'_, '_> {
    fn pick_body(&self, start: Vec2, end: Vec2, exclude: Entity) -> Option<PickHit> {
        let rapier = self.rapier?;
        let filter = QueryFilter::new()
            .exclude_collider(exclude)
            .groups(CollisionGroups::new(Group::ALL, WALL_GROUP));
        let (body, hit) = rapier.cast_ray_and_get_normal(start, end - start, 1.0, true, filter)?;
        Some(PickHit {
            body,
            point: hit.point,
        })
    }
}

impl StructureSink for ContactScratch<'_, '_> {
    fn damage_structure(&mut self, body: Entity, point: Vec2, damage: f32) -> SimResult<()> {
        let wall = self.registry.wall_of(body)?;
        self.damage.push((wall, point, damage));
        Ok(())
    }
}

impl PresentationSink for ContactScratch<'_, '_> {
    fn play_damage_sound(&mut self, kind: DamageSoundKind, intensity: f32, position: Vec2) {
        self.sounds.push(DamageSound {
            kind,
            intensity,
            position,
        });
    }

    fn shake_camera(&mut self, magnitude: f32) {
        self.shake = Some(magnitude);
    }
}

/// Run the collision resolver for every collected contact.
#[allow(clippy::too_many_arguments, clippy::type_complexity)]
pub fn resolve_vessel_contacts_system(
    mut contacts: MessageReader<VesselContact>,
    config: Res<VesselConfig>,
    registry: Res<BodyRegistry>,
    rapier_context: ReadRapierContext,
    mut vessels: Query<&mut VesselBody>,
    bodies: Query<&Velocity>,
    terrain: Query<(&TerrainCell, &Transform)>,
    compartments: Query<&Compartment>,
    mut characters: Query<(Entity, &mut Character)>,
    mut limbs: Query<(Entity, &Limb, &mut ExternalImpulse)>,
    mut walls: Query<(&mut WallSegment, &Transform)>,
    mut sounds: MessageWriter<DamageSound>,
    mut shake: ResMut<CameraShake>,
) {
    let rapier = rapier_context.single().ok();
    let resolver = CollisionResolver::new(&config);

    for contact in contacts.read() {
        let Ok(mut vessel) = vessels.get_mut(contact.vessel) else {
            warn!(
                "{}",
                SimError::EntityNotFound {
                    context: "vessel for contact"
                }
            );
            continue;
        };

        let terrain_cell = match registry.role(contact.partner) {
            Some(BodyRole::Terrain(cell)) => terrain.get(cell).ok().map(|(c, t)| (cell, c, t)),
            _ => None,
        };
        let edges = terrain_cell
            .map(|(_, cell, t)| cell.world_edges(t.translation.truncate()))
            .unwrap_or_default();

        let crew: Vec<(Entity, Vec<LimbInfo>)> = characters
            .iter()
            .filter(|(_, c)| {
                c.compartment
                    .and_then(|room| compartments.get(room).ok())
                    .is_some_and(|room| room.vessel == contact.vessel)
            })
            .map(|(character, _)| {
                let owned: Vec<LimbInfo> = limbs
                    .iter()
                    .filter(|(_, limb, _)| limb.owner == character)
                    .map(|(limb, info, _)| LimbInfo {
                        limb,
                        mass: info.mass,
                        lowest: info.lowest,
                    })
                    .collect();
                (character, owned)
            })
            .collect();

        let mut scratch = ContactScratch {
            crew,
            rapier: rapier.as_ref(),
            registry: &registry,
            units: UnitScale::new(config.display_units_per_sim_unit),
            impulses: Vec::new(),
            stuns: Vec::new(),
            damage: Vec::new(),
            sounds: Vec::new(),
            shake: None,
        };

        let input = ContactInput {
            terrain: terrain_cell.map(|(cell, _, t)| TerrainContact {
                cell,
                position: t.translation.truncate(),
                edges: &edges,
            }),
            normal: contact.normal,
            point: contact.point,
            body_velocity: bodies.get(contact.body).map(|v| v.linvel).unwrap_or_default(),
        };

        let outcome = resolver.resolve(&mut vessel, &input, &mut scratch);
        if outcome.misses > 0 {
            debug!(
                "Contact {:?}: {} cell edges hit no wall",
                contact.partner, outcome.misses
            );
        }

        for (limb, impulse) in scratch.impulses {
            if let Ok((_, _, mut external)) = limbs.get_mut(limb) {
                external.impulse += impulse;
            }
        }
        for (character, seconds) in scratch.stuns {
            if let Ok((_, mut c)) = characters.get_mut(character) {
                c.stun_timer = seconds;
            }
        }
        apply_wall_damage(&mut walls, scratch.damage);
        for sound in scratch.sounds {
            sounds.write(sound);
        }
        if let Some(magnitude) = scratch.shake {
            shake.set(magnitude);
        }
    }
}

/// Add each `(wall, world point, amount)` hit to the section under the point.
fn apply_wall_damage(
    walls: &mut Query<(&mut WallSegment, &Transform)>,
    damage: Vec<(Entity, Vec2, f32)>,
) {
    for (wall, point, amount) in damage {
        let Ok((mut segment, transform)) = walls.get_mut(wall) else {
            continue;
        };
        let index = segment.find_section_index(transform.translation.truncate(), point);
        if segment.add_damage(index, amount) {
            info!("Wall {:?} section {} breached", wall, index);
        }
    }
}
