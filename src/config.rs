//! Runtime vessel configuration loaded from `assets/vessel.toml`.
//!
//! [`VesselConfig`] is a Bevy [`Resource`] that mirrors every constant in
//! [`crate::constants`].  At startup, [`load_vessel_config`] reads
//! `assets/vessel.toml` and overwrites the defaults with any values present in
//! the file.  Missing keys fall back to the compile-time defaults, so a minimal
//! TOML can override just the constants you care about:
//!
//! ```toml
//! vessel_mass = 12000.0
//! buoyancy_scope = "per_vessel"
//! ```
//!
//! Keep `src/constants.rs` in sync: it remains the **authoritative default**
//! source used by `VesselConfig::default()`.

use crate::constants::*;
use crate::error::{validate_finite, validate_positive, validate_unit_interval, SimError};
use bevy::prelude::*;
use serde::Deserialize;

pub const CONFIG_PATH: &str = "assets/vessel.toml";

/// Which compartments feed a vessel's buoyancy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuoyancyScope {
    /// Sum every compartment in the world.
    #[default]
    Global,
    /// Sum only the compartments that belong to the vessel.
    PerVessel,
}

/// Runtime-tunable vessel physics configuration.
///
/// All fields default to the corresponding compile-time constant from
/// `src/constants.rs`.
#[derive(Resource, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct VesselConfig {
    // ── Units ────────────────────────────────────────────────────────────────
    pub display_units_per_sim_unit: f32,

    // ── Vessel body ──────────────────────────────────────────────────────────
    pub vessel_mass: f32,
    pub envelope_density: f32,
    pub rigidness_initial: f32,
    pub rigidness_loosened: f32,

    // ── Integrator ───────────────────────────────────────────────────────────
    pub target_arrival_radius: f32,
    pub target_seek_factor: f32,
    pub drag_coefficient: f32,

    // ── Buoyancy ─────────────────────────────────────────────────────────────
    pub neutral_water_fraction: f32,
    pub buoyancy_force_scale: f32,
    pub buoyancy_scope: BuoyancyScope,

    // ── Collision response ───────────────────────────────────────────────────
    pub debris_damping_x: f32,
    pub debris_damping_y: f32,
    pub impact_feedback_threshold: f32,
    pub impact_stun_threshold: f32,
    pub stun_per_impact: f32,
    pub impact_structural_threshold: f32,
    pub limb_force_cap: f32,
    pub soft_tangent_keep: f32,
    pub soft_normal_rebound: f32,
    pub hard_tangent_keep: f32,
    pub hard_normal_keep: f32,
    pub impact_damage_scale: f32,
    pub impact_sound_scale: f32,
    pub impact_shake_scale: f32,

    // ── Structure ────────────────────────────────────────────────────────────
    pub wall_section_length: f32,
    pub wall_max_health: f32,

    // ── Presentation ─────────────────────────────────────────────────────────
    pub camera_shake_decay: f32,
}

impl Default for VesselConfig {
    fn default() -> Self {
        Self {
            // Units
            display_units_per_sim_unit: DISPLAY_UNITS_PER_SIM_UNIT,
            // Vessel body
            vessel_mass: VESSEL_MASS,
            envelope_density: ENVELOPE_DENSITY,
            rigidness_initial: RIGIDNESS_INITIAL,
            rigidness_loosened: RIGIDNESS_LOOSENED,
            // Integrator
            target_arrival_radius: TARGET_ARRIVAL_RADIUS,
            target_seek_factor: TARGET_SEEK_FACTOR,
            drag_coefficient: DRAG_COEFFICIENT,
            // Buoyancy
            neutral_water_fraction: NEUTRAL_WATER_FRACTION,
            buoyancy_force_scale: BUOYANCY_FORCE_SCALE,
            buoyancy_scope: BuoyancyScope::Global,
            // Collision response
            debris_damping_x: DEBRIS_DAMPING_X,
            debris_damping_y: DEBRIS_DAMPING_Y,
            impact_feedback_threshold: IMPACT_FEEDBACK_THRESHOLD,
            impact_stun_threshold: IMPACT_STUN_THRESHOLD,
            stun_per_impact: STUN_PER_IMPACT,
            impact_structural_threshold: IMPACT_STRUCTURAL_THRESHOLD,
            limb_force_cap: LIMB_FORCE_CAP,
            soft_tangent_keep: SOFT_TANGENT_KEEP,
            soft_normal_rebound: SOFT_NORMAL_REBOUND,
            hard_tangent_keep: HARD_TANGENT_KEEP,
            hard_normal_keep: HARD_NORMAL_KEEP,
            impact_damage_scale: IMPACT_DAMAGE_SCALE,
            impact_sound_scale: IMPACT_SOUND_SCALE,
            impact_shake_scale: IMPACT_SHAKE_SCALE,
            // Structure
            wall_section_length: WALL_SECTION_LENGTH,
            wall_max_health: WALL_MAX_HEALTH,
            // Presentation
            camera_shake_decay: CAMERA_SHAKE_DECAY,
        }
    }
}

impl VesselConfig {
    /// Parse a (possibly partial) TOML document on top of the defaults.
    pub fn from_toml_str(contents: &str) -> Result<Self, toml::de::Error> {
        toml::from_str::<VesselConfig>(contents)
    }

    /// Check every field with a meaningful safe range.
    ///
    /// Offending fields are reset to their compiled default; the returned list
    /// names each violation so the caller can log it.
    pub fn sanitize(&mut self) -> Vec<SimError> {
        let defaults = VesselConfig::default();
        let mut errors = Vec::new();

        macro_rules! check {
            ($validator:ident, $field:ident) => {
                if let Err(e) = $validator(stringify!($field), self.$field) {
                    errors.push(e);
                    self.$field = defaults.$field;
                }
            };
        }

        check!(validate_positive, display_units_per_sim_unit);
        check!(validate_positive, vessel_mass);
        check!(validate_positive, envelope_density);
        check!(validate_unit_interval, rigidness_initial);
        check!(validate_unit_interval, rigidness_loosened);
        check!(validate_positive, target_arrival_radius);
        check!(validate_unit_interval, target_seek_factor);
        check!(validate_finite, drag_coefficient);
        check!(validate_unit_interval, neutral_water_fraction);
        check!(validate_finite, buoyancy_force_scale);
        check!(validate_unit_interval, debris_damping_x);
        check!(validate_unit_interval, debris_damping_y);
        check!(validate_finite, impact_feedback_threshold);
        check!(validate_finite, impact_stun_threshold);
        check!(validate_finite, stun_per_impact);
        check!(validate_finite, impact_structural_threshold);
        check!(validate_positive, limb_force_cap);
        check!(validate_finite, impact_damage_scale);
        check!(validate_positive, wall_section_length);
        check!(validate_positive, wall_max_health);
        check!(validate_unit_interval, camera_shake_decay);

        if self.rigidness_loosened > self.rigidness_initial {
            errors.push(SimError::UnsafeConstant {
                name: "rigidness_loosened",
                value: self.rigidness_loosened,
                safe_range: "[0.0, rigidness_initial]",
            });
            self.rigidness_loosened = self.rigidness_initial.min(defaults.rigidness_loosened);
        }

        errors
    }
}

/// Startup system: attempt to load `assets/vessel.toml` and overwrite the
/// `VesselConfig` resource with any values present in the file.
///
/// Missing keys retain their compiled defaults.  TOML parse errors are printed
/// to stderr but do not abort the simulation.  A missing file is silently
/// ignored (defaults are already in place from `insert_resource`).
pub fn load_vessel_config(mut config: ResMut<VesselConfig>) {
    match std::fs::read_to_string(CONFIG_PATH) {
        Ok(contents) => match VesselConfig::from_toml_str(&contents) {
            Ok(loaded) => {
                *config = loaded;
                println!("✓ Loaded vessel config from {CONFIG_PATH}");
            }
            Err(e) => {
                eprintln!("⚠ Failed to parse {CONFIG_PATH}: {e}; using defaults");
            }
        },
        Err(_) => {
            println!("ℹ No {CONFIG_PATH} found; using compiled defaults");
        }
    }

    for violation in config.sanitize() {
        warn!("{violation}; falling back to the compiled default");
    }
}
