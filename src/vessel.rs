//! Vessel body state and the manual translational integrator.
//!
//! The vessel's authoritative position is [`VesselPlacement`].  Rapier only
//! gets a compound envelope body riding alongside it: every tick the body's
//! own displacement is folded into the manual translation (scaled by the
//! hull's collision rigidness) and the body is snapped back onto the
//! placement with zero velocity.  The engine therefore detects contacts but
//! never owns the vessel's motion.
//!
//! Per tick:
//!
//! 1. `translate = speed·dt + body_displacement·rigidness`
//! 2. seek toward the target while farther than the arrival radius
//! 3. move the placement
//! 4. `speed += (buoyancy + drag) / mass`
//! 5. reset the envelope body onto the placement

use crate::buoyancy::{buoyancy_force, vessel_water_fraction, Compartment};
use crate::config::VesselConfig;
use crate::envelope::{envelope_bundle, triangulate, VesselEnvelope};
use crate::error::{SimError, SimResult};
use crate::hull::{HullOutline, WallRect};
use crate::registry::{BodyRegistry, BodyRole};
use crate::structure::{wall_bundle, WallSegment};
use bevy::prelude::*;
use bevy_rapier2d::prelude::*;

/// Authoritative world position of a vessel (display units).
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct VesselPlacement(pub Vec2);

/// Motion state of one vessel.  Owns its envelope body exclusively.
#[derive(Component, Debug, Clone)]
pub struct VesselBody {
    outline: HullOutline,
    speed: Vec2,
    target_position: Option<Vec2>,
    collision_rigidness: f32,
    mass: f32,
    body: Entity,
}

impl VesselBody {
    pub fn new(outline: HullOutline, body: Entity, config: &VesselConfig) -> Self {
        Self {
            outline,
            speed: Vec2::ZERO,
            target_position: None,
            collision_rigidness: config.rigidness_initial,
            mass: config.vessel_mass,
            body,
        }
    }

    /// Hull outline relative to the placement.
    pub fn outline(&self) -> &HullOutline {
        &self.outline
    }

    pub fn borders(&self) -> Rect {
        self.outline.bounds
    }

    pub fn speed(&self) -> Vec2 {
        self.speed
    }

    /// Set the speed.  Non-finite values are rejected and the old speed kept.
    pub fn set_speed(&mut self, speed: Vec2) -> SimResult<()> {
        if !speed.is_finite() {
            let err = SimError::InvalidInput { field: "speed" };
            debug!("{err}: {speed:?}");
            return Err(err);
        }
        self.speed = speed;
        Ok(())
    }

    pub fn target_position(&self) -> Option<Vec2> {
        self.target_position
    }

    /// Set the seek target.  Non-finite values are rejected.
    pub fn set_target_position(&mut self, target: Vec2) -> SimResult<()> {
        if !target.is_finite() {
            let err = SimError::InvalidInput {
                field: "target_position",
            };
            debug!("{err}: {target:?}");
            return Err(err);
        }
        self.target_position = Some(target);
        Ok(())
    }

    pub fn clear_target(&mut self) {
        self.target_position = None;
    }

    pub fn collision_rigidness(&self) -> f32 {
        self.collision_rigidness
    }

    /// Lower the rigidness to `to`.  Never raises it.
    pub fn loosen(&mut self, to: f32) {
        self.collision_rigidness = self.collision_rigidness.min(to);
    }

    pub fn mass(&self) -> f32 {
        self.mass
    }

    /// The envelope body entity.
    pub fn body(&self) -> Entity {
        self.body
    }

    /// `speed += force / mass`.
    pub fn apply_force(&mut self, force: Vec2) {
        let _ = self.set_speed(self.speed + force / self.mass);
    }

    /// Steps 1–2: translation for this tick.  Clears the target on arrival.
    pub fn translation(
        &mut self,
        dt: f32,
        body_displacement: Vec2,
        position: Vec2,
        config: &VesselConfig,
    ) -> Vec2 {
        let mut translate = self.speed * dt + body_displacement * self.collision_rigidness;

        match self.target_position {
            Some(target) if target.distance(position) > config.target_arrival_radius => {
                translate += (target - position) * config.target_seek_factor;
            }
            _ => self.target_position = None,
        }

        translate
    }

    /// Step 4: buoyancy and quadratic drag, integrated into the speed.
    pub fn integrate_forces(&mut self, water_fraction: f32, config: &VesselConfig) {
        let mut total_force = buoyancy_force(water_fraction, self.mass, config);

        let speed_length = self.speed.length();
        if speed_length > 0.0 {
            let drag = speed_length * speed_length * config.drag_coefficient * self.mass;
            total_force -= self.speed / speed_length * drag;
        }

        self.apply_force(total_force);
    }

    /// One full integrator tick.  Returns the translation to apply to the
    /// placement.
    pub fn step(
        &mut self,
        dt: f32,
        body_displacement: Vec2,
        position: Vec2,
        water_fraction: f32,
        config: &VesselConfig,
    ) -> Vec2 {
        let translate = self.translation(dt, body_displacement, position, config);
        self.integrate_forces(water_fraction, config);
        translate
    }
}

/// Build the hull from `walls`, spawn the vessel, its envelope body and its
/// wall bodies, and register every body.
///
/// Nothing is spawned when the walls do not form a valid hull.
pub fn spawn_vessel(
    commands: &mut Commands,
    registry: &mut BodyRegistry,
    walls: &[WallRect],
    placement: Vec2,
    config: &VesselConfig,
) -> SimResult<Entity> {
    let outline = HullOutline::from_walls(walls)?;
    let triangles = triangulate(&outline.vertices)?;

    let vessel = commands.spawn_empty().id();
    let body = commands
        .spawn(envelope_bundle(
            vessel,
            &triangles,
            placement,
            config.envelope_density,
        ))
        .id();
    registry.register(body, BodyRole::Vessel(vessel));

    info!(
        "Vessel {:?} spawned at {:?}: {} walls, {} hull vertices, {} envelope triangles",
        vessel,
        placement,
        walls.len(),
        outline.vertices.len(),
        triangles.len()
    );

    commands.entity(vessel).insert((
        VesselBody::new(outline, body, config),
        VesselPlacement(placement),
        Transform::from_translation(placement.extend(0.0)),
    ));

    for rect in walls {
        let segment = WallSegment::new(
            vessel,
            *rect,
            config.wall_section_length,
            config.wall_max_health,
        );
        let wall = commands.spawn(wall_bundle(segment, placement)).id();
        registry.register(wall, BodyRole::Wall(wall));
    }

    Ok(vessel)
}

/// Run the integrator for every vessel and snap each envelope body back onto
/// its placement.
pub fn vessel_integration_system(
    time: Res<Time>,
    config: Res<VesselConfig>,
    compartments: Query<&Compartment>,
    mut vessels: Query<(Entity, &mut VesselBody, &mut VesselPlacement)>,
    mut bodies: Query<(&mut Transform, &mut Velocity), With<VesselEnvelope>>,
) {
    let dt = time.delta_secs();

    for (entity, mut vessel, mut placement) in vessels.iter_mut() {
        let Ok((mut body_transform, mut body_velocity)) = bodies.get_mut(vessel.body()) else {
            warn!(
                "{}",
                SimError::EntityNotFound {
                    context: "vessel envelope body"
                }
            );
            continue;
        };

        let displacement = body_transform.translation.truncate() - placement.0;
        let water_fraction =
            vessel_water_fraction(compartments.iter(), entity, config.buoyancy_scope);

        let translate = vessel.step(dt, displacement, placement.0, water_fraction, &config);
        placement.0 += translate;

        body_transform.translation = placement.0.extend(body_transform.translation.z);
        body_transform.rotation = Quat::IDENTITY;
        *body_velocity = Velocity::zero();
    }
}

/// Move wall bodies and the vessel's own transform along with its placement.
pub fn sync_vessel_placement_system(
    vessels: Query<&VesselPlacement>,
    mut vessel_transforms: Query<(&VesselPlacement, &mut Transform), Without<WallSegment>>,
    mut walls: Query<(&WallSegment, &mut Transform), Without<VesselPlacement>>,
) {
    for (placement, mut transform) in vessel_transforms.iter_mut() {
        transform.translation = placement.0.extend(transform.translation.z);
    }

    for (segment, mut transform) in walls.iter_mut() {
        let Ok(placement) = vessels.get(segment.vessel) else {
            continue;
        };
        let center = placement.0 + segment.local.center;
        transform.translation = center.extend(transform.translation.z);
    }
}

/// Despawn the envelope and walls of vessels that were removed.
pub fn release_vessel_bodies_system(
    mut commands: Commands,
    mut removed: RemovedComponents<VesselBody>,
    mut registry: ResMut<BodyRegistry>,
    envelopes: Query<(Entity, &VesselEnvelope)>,
    walls: Query<(Entity, &WallSegment)>,
) {
    for vessel in removed.read() {
        for (body, envelope) in envelopes.iter() {
            if envelope.vessel == vessel {
                registry.unregister(body);
                commands.entity(body).despawn();
            }
        }
        for (wall, segment) in walls.iter() {
            if segment.vessel == vessel {
                registry.unregister(wall);
                commands.entity(wall).despawn();
            }
        }
        info!("Vessel {:?} removed; bodies released", vessel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_vessel() -> VesselBody {
        let mut world = World::new();
        let body = world.spawn_empty().id();
        let outline =
            HullOutline::from_walls(&[WallRect::new(Vec2::ZERO, Vec2::new(100.0, 100.0))])
                .unwrap();
        VesselBody::new(outline, body, &VesselConfig::default())
    }

    /// Config with buoyancy switched off so only the motion terms act.
    fn no_buoyancy() -> VesselConfig {
        VesselConfig {
            buoyancy_force_scale: 0.0,
            ..Default::default()
        }
    }

    #[test]
    fn idle_vessel_does_not_move() {
        let mut vessel = test_vessel();
        let cfg = no_buoyancy();
        for _ in 0..10 {
            let t = vessel.step(1.0 / 60.0, Vec2::ZERO, Vec2::new(30.0, 40.0), 0.07, &cfg);
            assert_eq!(t, Vec2::ZERO);
        }
        assert_eq!(vessel.speed(), Vec2::ZERO);
    }

    #[test]
    fn neutral_buoyancy_keeps_speed_zero_with_default_config() {
        let mut vessel = test_vessel();
        let cfg = VesselConfig::default();
        vessel.integrate_forces(cfg.neutral_water_fraction, &cfg);
        assert!(vessel.speed().length() < 1e-6);
    }

    #[test]
    fn speed_translates_by_dt() {
        let mut vessel = test_vessel();
        vessel.set_speed(Vec2::new(120.0, -60.0)).unwrap();
        let t = vessel.translation(0.5, Vec2::ZERO, Vec2::ZERO, &no_buoyancy());
        assert_eq!(t, Vec2::new(60.0, -30.0));
    }

    #[test]
    fn body_displacement_is_scaled_by_rigidness() {
        let mut vessel = test_vessel();
        let cfg = no_buoyancy();
        let full = vessel.translation(0.0, Vec2::new(10.0, 0.0), Vec2::ZERO, &cfg);
        vessel.loosen(0.8);
        let loose = vessel.translation(0.0, Vec2::new(10.0, 0.0), Vec2::ZERO, &cfg);
        assert_eq!(full, Vec2::new(10.0, 0.0));
        assert!((loose - Vec2::new(8.0, 0.0)).length() < 1e-6);
    }

    #[test]
    fn far_target_adds_seek_term_and_is_kept() {
        let mut vessel = test_vessel();
        vessel.set_target_position(Vec2::new(1000.0, 0.0)).unwrap();
        let t = vessel.translation(0.0, Vec2::ZERO, Vec2::ZERO, &no_buoyancy());
        assert!((t - Vec2::new(10.0, 0.0)).length() < 1e-5);
        assert_eq!(vessel.target_position(), Some(Vec2::new(1000.0, 0.0)));
    }

    #[test]
    fn near_target_is_cleared() {
        let mut vessel = test_vessel();
        vessel.set_target_position(Vec2::new(30.0, 0.0)).unwrap();
        let t = vessel.translation(0.0, Vec2::ZERO, Vec2::ZERO, &no_buoyancy());
        assert_eq!(t, Vec2::ZERO);
        assert_eq!(vessel.target_position(), None);
    }

    #[test]
    fn drag_opposes_motion() {
        let mut vessel = test_vessel();
        vessel.set_speed(Vec2::new(100.0, 0.0)).unwrap();
        vessel.integrate_forces(0.07, &no_buoyancy());
        // drag = 100² · 1e-5 · m, so Δv = 0.1
        assert!((vessel.speed().x - 99.9).abs() < 1e-4, "got {}", vessel.speed().x);
        assert_eq!(vessel.speed().y, 0.0);
    }

    #[test]
    fn dry_vessel_accelerates_upward() {
        let mut vessel = test_vessel();
        vessel.integrate_forces(0.0, &VesselConfig::default());
        assert!(vessel.speed().y > 0.0);
    }

    #[test]
    fn nan_speed_is_rejected() {
        let mut vessel = test_vessel();
        vessel.set_speed(Vec2::new(3.0, 4.0)).unwrap();
        let err = vessel.set_speed(Vec2::new(f32::NAN, 0.0)).unwrap_err();
        assert_eq!(err, SimError::InvalidInput { field: "speed" });
        assert_eq!(vessel.speed(), Vec2::new(3.0, 4.0));
    }

    #[test]
    fn infinite_target_is_rejected() {
        let mut vessel = test_vessel();
        vessel.set_target_position(Vec2::new(5.0, 5.0)).unwrap();
        assert!(vessel
            .set_target_position(Vec2::new(f32::INFINITY, 0.0))
            .is_err());
        assert_eq!(vessel.target_position(), Some(Vec2::new(5.0, 5.0)));
    }

    #[test]
    fn non_finite_force_leaves_speed_unchanged() {
        let mut vessel = test_vessel();
        vessel.set_speed(Vec2::new(1.0, 1.0)).unwrap();
        vessel.apply_force(Vec2::new(f32::INFINITY, 0.0));
        assert_eq!(vessel.speed(), Vec2::new(1.0, 1.0));
    }

    #[test]
    fn loosen_never_raises_rigidness() {
        let mut vessel = test_vessel();
        vessel.loosen(0.8);
        vessel.loosen(0.9);
        assert_eq!(vessel.collision_rigidness(), 0.8);
    }
}
