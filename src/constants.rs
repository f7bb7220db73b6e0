//! Centralised vessel physics constants.
//!
//! All tuneable values live here so they can be found, reasoned-about, and
//! modified in one place without source-diving across multiple modules.
//! [`crate::config::VesselConfig`] mirrors every value and can override any
//! of them at runtime from `assets/vessel.toml`.
//!
//! ## Tuning guidance
//!
//! The numbers below were tuned by hand against the demo scenarios in
//! `testing.rs`.  After editing, run the scenarios (`HULLSIM_TEST=<name>`) and
//! the test suite to confirm the vessel still floats, drifts and crashes the
//! way it should.

// ── Units ─────────────────────────────────────────────────────────────────────

/// Display units (pixels) per simulation unit (meter).
///
/// Rapier is configured with the same pixels-per-meter value, so every
/// velocity read through Bevy is already in display units.
pub const DISPLAY_UNITS_PER_SIM_UNIT: f32 = 100.0;

// ── Vessel body ───────────────────────────────────────────────────────────────

/// Mass of the vessel used by the manual integrator (not the Rapier mass).
pub const VESSEL_MASS: f32 = 10_000.0;

/// Density of each triangle fixture in the compound collision body.
pub const ENVELOPE_DENSITY: f32 = 5.0;

/// Rigidness of a freshly built hull mount.
pub const RIGIDNESS_INITIAL: f32 = 1.0;

/// Rigidness after the first structural collision.  Never restored.
pub const RIGIDNESS_LOOSENED: f32 = 0.8;

// ── Integrator ────────────────────────────────────────────────────────────────

/// Once the vessel is within this distance of its target (display units) the
/// target is cleared.
pub const TARGET_ARRIVAL_RADIUS: f32 = 50.0;

/// Fraction of the remaining distance to the target covered per tick.
pub const TARGET_SEEK_FACTOR: f32 = 0.01;

/// Quadratic drag coefficient: `drag = |v|² · DRAG_COEFFICIENT · mass`.
pub const DRAG_COEFFICIENT: f32 = 0.000_01;

// ── Buoyancy ──────────────────────────────────────────────────────────────────

/// Flooded fraction at which the vessel neither rises nor sinks.
///
/// A mostly-dry vessel floats; the ballast compartments account for the rest.
pub const NEUTRAL_WATER_FRACTION: f32 = 0.07;

/// Scales the buoyancy deviation into a force: `(neutral − fraction) · mass · k`.
pub const BUOYANCY_FORCE_SCALE: f32 = 30.0;

// ── Collision response ────────────────────────────────────────────────────────

/// Contacts with anything that is not terrain damp the speed per axis.
pub const DEBRIS_DAMPING_X: f32 = 0.9;
pub const DEBRIS_DAMPING_Y: f32 = 0.2;

/// Impacts at or above this value (sim units/s) play sounds and shake the camera.
pub const IMPACT_FEEDBACK_THRESHOLD: f32 = 1.0;

/// Impacts above this value stun every character aboard.
pub const IMPACT_STUN_THRESHOLD: f32 = 2.0;

/// Stun seconds per unit of impact above [`IMPACT_STUN_THRESHOLD`].
pub const STUN_PER_IMPACT: f32 = 0.1;

/// Impacts at or above this value are structural: walls take damage and the
/// hull mount loosens.
pub const IMPACT_STRUCTURAL_THRESHOLD: f32 = 3.0;

/// Maximum magnitude of the per-unit-mass impulse pushed into limbs.
pub const LIMB_FORCE_CAP: f32 = 10.0;

/// Soft branch: tangential speed kept, normal speed reflected.
pub const SOFT_TANGENT_KEEP: f32 = 0.45;
pub const SOFT_NORMAL_REBOUND: f32 = 0.25;

/// Structural branch: tangential speed kept, normal speed kept.
pub const HARD_TANGENT_KEEP: f32 = 0.9;
pub const HARD_NORMAL_KEEP: f32 = 0.5;

/// Wall damage per unit of structural impact.
pub const IMPACT_DAMAGE_SCALE: f32 = 50.0;

/// Damage sound intensity per unit of impact.
pub const IMPACT_SOUND_SCALE: f32 = 10.0;

/// Camera shake magnitude per unit of impact.
pub const IMPACT_SHAKE_SCALE: f32 = 2.0;

// ── Structure ────────────────────────────────────────────────────────────────

/// Length of one damageable wall section along the segment's long axis
/// (display units).
pub const WALL_SECTION_LENGTH: f32 = 96.0;

/// Damage a single wall section absorbs before it is breached.
pub const WALL_MAX_HEALTH: f32 = 100.0;

// ── Presentation ──────────────────────────────────────────────────────────────

/// Fraction of camera shake remaining after one second.
pub const CAMERA_SHAKE_DECAY: f32 = 0.05;
