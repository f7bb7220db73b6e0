//! Buoyancy from the flooded share of a vessel's compartments.
//!
//! A vessel is neutral at [`crate::constants::NEUTRAL_WATER_FRACTION`]: drier
//! than that it rises, wetter it sinks.  The force is linear in the deviation
//! and purely vertical.

use crate::config::{BuoyancyScope, VesselConfig};
use bevy::prelude::*;

/// A floodable room of a vessel.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Compartment {
    /// Vessel this compartment belongs to.
    pub vessel: Entity,
    /// Current water volume.
    pub volume: f32,
    /// Volume when completely flooded.
    pub full_volume: f32,
}

impl Compartment {
    pub fn dry(vessel: Entity, full_volume: f32) -> Self {
        Self {
            vessel,
            volume: 0.0,
            full_volume,
        }
    }

    /// Add (or with a negative amount, pump out) water, clamped to the room.
    pub fn flood(&mut self, amount: f32) {
        self.volume = (self.volume + amount).clamp(0.0, self.full_volume);
    }
}

/// `Σvolume / Σfull_volume`; zero when there is no capacity at all.
pub fn water_fraction(volumes: impl IntoIterator<Item = (f32, f32)>) -> f32 {
    let (water, capacity) = volumes
        .into_iter()
        .fold((0.0_f32, 0.0_f32), |(w, c), (volume, full)| (w + volume, c + full));
    if capacity > 0.0 {
        water / capacity
    } else {
        0.0
    }
}

/// Vertical restoring force for the given flooded fraction.
pub fn buoyancy_force(water_fraction: f32, mass: f32, config: &VesselConfig) -> Vec2 {
    let deviation = config.neutral_water_fraction - water_fraction;
    Vec2::new(0.0, deviation * mass * config.buoyancy_force_scale)
}

/// Fraction for `vessel`, honouring the configured compartment scope.
pub fn vessel_water_fraction<'a>(
    compartments: impl IntoIterator<Item = &'a Compartment>,
    vessel: Entity,
    scope: BuoyancyScope,
) -> f32 {
    water_fraction(
        compartments
            .into_iter()
            .filter(|c| scope == BuoyancyScope::Global || c.vessel == vessel)
            .map(|c| (c.volume, c.full_volume)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::VESSEL_MASS;

    fn force_for(flooded: f32, max: f32) -> f32 {
        let cfg = VesselConfig::default();
        buoyancy_force(water_fraction([(flooded, max)]), VESSEL_MASS, &cfg).y
    }

    #[test]
    fn dry_vessel_rises() {
        assert!(force_for(0.0, 100.0) > 0.0);
    }

    #[test]
    fn flooded_vessel_sinks() {
        assert!(force_for(100.0, 100.0) < 0.0);
    }

    #[test]
    fn seven_percent_is_neutral() {
        let f = force_for(7.0, 100.0);
        assert!(f.abs() < 1e-2, "expected ≈0, got {f}");
    }

    #[test]
    fn force_has_no_horizontal_component() {
        let cfg = VesselConfig::default();
        assert_eq!(buoyancy_force(0.5, VESSEL_MASS, &cfg).x, 0.0);
    }

    #[test]
    fn zero_capacity_counts_as_dry() {
        assert_eq!(water_fraction([(0.0, 0.0)]), 0.0);
        assert_eq!(water_fraction(std::iter::empty()), 0.0);
    }

    #[test]
    fn scope_selects_compartments() {
        let mut world = World::new();
        let ours = world.spawn_empty().id();
        let theirs = world.spawn_empty().id();
        let rooms = [
            Compartment {
                vessel: ours,
                volume: 0.0,
                full_volume: 100.0,
            },
            Compartment {
                vessel: theirs,
                volume: 100.0,
                full_volume: 100.0,
            },
        ];

        let global = vessel_water_fraction(&rooms, ours, BuoyancyScope::Global);
        let scoped = vessel_water_fraction(&rooms, ours, BuoyancyScope::PerVessel);
        assert!((global - 0.5).abs() < 1e-6);
        assert_eq!(scoped, 0.0);
    }

    #[test]
    fn flood_is_clamped_to_capacity() {
        let mut world = World::new();
        let vessel = world.spawn_empty().id();
        let mut room = Compartment::dry(vessel, 50.0);
        room.flood(80.0);
        assert_eq!(room.volume, 50.0);
        room.flood(-200.0);
        assert_eq!(room.volume, 0.0);
    }
}
