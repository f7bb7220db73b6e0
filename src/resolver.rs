//! Collision response policy for a vessel hull.
//!
//! Called once per contact between the vessel envelope and another body.
//! Anything that is not terrain just damps the vessel's speed.  Terrain
//! contacts are graded by *impact*, the approach speed along the contact
//! normal in simulation units:
//!
//! | Impact        | Effect |
//! |---------------|--------|
//! | any           | limbs of the crew are pushed along the normal |
//! | > 2.0         | crew stunned for `(impact − 2) · 0.1` s |
//! | ≥ 1.0         | damage sounds and camera shake |
//! | < 3.0         | soft: most energy absorbed, gentle rebound |
//! | ≥ 3.0         | structural: energy mostly kept, walls near the cell damaged, hull loosened |
//!
//! The engine's own contact solving always proceeds; this policy only adds
//! side effects and overrides the vessel's manual speed.
//!
//! All collaborators are reached through the traits below so the policy runs
//! unchanged against Bevy queries or test doubles.

use crate::config::VesselConfig;
use crate::error::SimResult;
use crate::presentation::DamageSoundKind;
use crate::units::UnitScale;
use crate::vessel::VesselBody;
use bevy::prelude::*;

/// A limb as the resolver sees it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LimbInfo {
    pub limb: Entity,
    pub mass: f32,
    pub lowest: bool,
}

/// Characters aboard the vessel being resolved.
pub trait CharacterSink {
    /// Characters whose current compartment belongs to the vessel.
    fn crew_aboard(&self) -> Vec<Entity>;
    fn limbs_of(&self, character: Entity) -> Vec<LimbInfo>;
    /// `impulse` is in simulation units.
    fn apply_limb_impulse(&mut self, limb: Entity, impulse: Vec2);
    fn set_stun(&mut self, character: Entity, seconds: f32);
}

/// Result of a segment query against the physics world.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PickHit {
    pub body: Entity,
    /// World point where the segment first touched `body`.
    pub point: Vec2,
}

pub trait PhysicsQuery {
    /// First body touched along `start → end`, ignoring `exclude`.
    fn pick_body(&self, start: Vec2, end: Vec2, exclude: Entity) -> Option<PickHit>;
}

pub trait StructureSink {
    /// Resolve `body` to a wall segment, find the section nearest `point`
    /// and damage it.
    fn damage_structure(&mut self, body: Entity, point: Vec2, damage: f32) -> SimResult<()>;
}

pub trait PresentationSink {
    fn play_damage_sound(&mut self, kind: DamageSoundKind, intensity: f32, position: Vec2);
    fn shake_camera(&mut self, magnitude: f32);
}

/// Everything a contact can touch.
pub trait ContactEnvironment: CharacterSink + PhysicsQuery + StructureSink + PresentationSink {}

impl<T: CharacterSink + PhysicsQuery + StructureSink + PresentationSink> ContactEnvironment for T {}

/// The terrain cell on the other side of a contact.
#[derive(Debug, Clone, Copy)]
pub struct TerrainContact<'a> {
    /// The cell's body entity.
    pub cell: Entity,
    /// World position of the cell body.
    pub position: Vec2,
    /// Boundary edges in world space.
    pub edges: &'a [(Vec2, Vec2)],
}

/// One contact reported for the vessel envelope.
#[derive(Debug, Clone, Copy)]
pub struct ContactInput<'a> {
    /// `None` when the other body is not terrain.
    pub terrain: Option<TerrainContact<'a>>,
    /// Unit contact normal pointing from the vessel toward the other body.
    pub normal: Vec2,
    /// World contact point (display units).
    pub point: Vec2,
    /// Velocity of the envelope body (display units per second).
    pub body_velocity: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContactKind {
    /// Not terrain: speed damped, nothing else.
    Debris,
    Soft,
    Structural,
}

/// What a resolved contact did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContactOutcome {
    pub kind: ContactKind,
    pub impact: f32,
    /// Wall sections that took damage.
    pub damaged: usize,
    /// Cell edges whose query found no wall.
    pub misses: usize,
    /// Always true: the engine resolves the contact physically as well.
    pub allow_contact: bool,
}

impl ContactOutcome {
    fn new(kind: ContactKind, impact: f32) -> Self {
        Self {
            kind,
            impact,
            damaged: 0,
            misses: 0,
            allow_contact: true,
        }
    }
}

pub struct CollisionResolver<'c> {
    config: &'c VesselConfig,
    units: UnitScale,
}

impl<'c> CollisionResolver<'c> {
    pub fn new(config: &'c VesselConfig) -> Self {
        Self {
            config,
            units: UnitScale::new(config.display_units_per_sim_unit),
        }
    }

    pub fn resolve(
        &self,
        vessel: &mut VesselBody,
        contact: &ContactInput,
        env: &mut impl ContactEnvironment,
    ) -> ContactOutcome {
        let cfg = self.config;

        let Some(terrain) = contact.terrain else {
            let speed = vessel.speed();
            let _ = vessel.set_speed(Vec2::new(
                speed.x * cfg.debris_damping_x,
                speed.y * cfg.debris_damping_y,
            ));
            return ContactOutcome::new(ContactKind::Debris, 0.0);
        };

        let normal = contact.normal.normalize_or_zero();
        let sim_speed = self.units.to_sim(vessel.speed()) + self.units.to_sim(contact.body_velocity);
        let impact = sim_speed.dot(normal);

        let u = normal * impact;
        let w = sim_speed - u;

        self.push_crew(impact, normal, &mut *env);

        if impact >= cfg.impact_feedback_threshold {
            let intensity = impact * cfg.impact_sound_scale;
            env.play_damage_sound(DamageSoundKind::StructureBlunt, intensity, terrain.position);
            env.play_damage_sound(DamageSoundKind::StructureBlunt, intensity, contact.point);
            env.shake_camera(impact * cfg.impact_shake_scale);
        }

        debug!(
            "IMPACT: {impact:.3} normal: {normal:?} sim_speed: {sim_speed:?} u: {u:?} w: {w:?}"
        );

        if impact < cfg.impact_structural_threshold {
            let _ = vessel.set_speed(
                self.units
                    .to_display(w * cfg.soft_tangent_keep - u * cfg.soft_normal_rebound),
            );
            return ContactOutcome::new(ContactKind::Soft, impact);
        }

        let _ = vessel.set_speed(
            self.units
                .to_display(w * cfg.hard_tangent_keep + u * cfg.hard_normal_keep),
        );

        let mut outcome = ContactOutcome::new(ContactKind::Structural, impact);
        let damage = impact * cfg.impact_damage_scale;
        for &(a, b) in terrain.edges {
            let Some(hit) = env.pick_body(a + normal, b + normal, terrain.cell) else {
                outcome.misses += 1;
                continue;
            };
            match env.damage_structure(hit.body, hit.point, damage) {
                Ok(()) => outcome.damaged += 1,
                Err(e) => {
                    debug!("{e}");
                    outcome.misses += 1;
                }
            }
        }

        vessel.loosen(cfg.rigidness_loosened);
        outcome
    }

    /// Stun the crew and push every limb but the lowest along the normal.
    fn push_crew(&self, impact: f32, normal: Vec2, env: &mut impl CharacterSink) {
        let cfg = self.config;
        let limb_force = (normal * impact).clamp_length_max(cfg.limb_force_cap);

        for character in env.crew_aboard() {
            if impact > cfg.impact_stun_threshold {
                env.set_stun(character, (impact - cfg.impact_stun_threshold) * cfg.stun_per_impact);
            }
            for limb in env.limbs_of(character) {
                if limb.lowest {
                    continue;
                }
                env.apply_limb_impulse(limb.limb, limb_force * limb.mass);
            }
        }
    }
}
