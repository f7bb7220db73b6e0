//! Fire-and-forget presentation sinks: damage sounds and camera shake.
//!
//! Nothing in the simulation reads these back.  Audio playback and the
//! camera live outside this crate; they consume [`DamageSound`] messages and
//! the [`CameraShake`] resource.

use bevy::prelude::*;

/// Category of a damage sound.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DamageSoundKind {
    StructureBlunt,
}

/// Request to play a damage sound at a world position.
#[derive(Message, Debug, Clone, Copy, PartialEq)]
pub struct DamageSound {
    pub kind: DamageSoundKind,
    pub intensity: f32,
    pub position: Vec2,
}

/// Current camera shake magnitude (display units of jitter).
#[derive(Resource, Debug, Clone, Copy, Default, PartialEq)]
pub struct CameraShake {
    pub magnitude: f32,
}

impl CameraShake {
    /// Replace the current shake.  Non-finite or negative values are ignored.
    pub fn set(&mut self, magnitude: f32) {
        if magnitude.is_finite() && magnitude >= 0.0 {
            self.magnitude = magnitude;
        }
    }

    /// Exponential decay: `decay_per_second` of the shake is left after 1 s.
    pub fn decay(&mut self, dt: f32, decay_per_second: f32) {
        self.magnitude *= decay_per_second.powf(dt);
        if self.magnitude < 0.01 {
            self.magnitude = 0.0;
        }
    }
}

pub fn camera_shake_decay_system(
    time: Res<Time>,
    config: Res<crate::config::VesselConfig>,
    mut shake: ResMut<CameraShake>,
) {
    if shake.magnitude > 0.0 {
        shake.decay(time.delta_secs(), config.camera_shake_decay);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn shake_decays_to_zero() {
        let mut shake = CameraShake::default();
        shake.set(10.0);
        shake.decay(1.0, 0.05);
        assert!((shake.magnitude - 0.5).abs() < 1e-4);
        for _ in 0..10 {
            shake.decay(1.0, 0.05);
        }
        assert_eq!(shake.magnitude, 0.0);
    }

    #[test]
    fn invalid_shake_is_ignored() {
        let mut shake = CameraShake::default();
        shake.set(4.0);
        shake.set(f32::NAN);
        shake.set(-1.0);
        assert_eq!(shake.magnitude, 4.0);
    }
}
