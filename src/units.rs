//! Display ↔ simulation unit conversion.
//!
//! Display units are pixels; simulation units are meters.  The collision
//! policy thresholds are expressed in simulation units, everything the host
//! reads or writes (positions, speeds) is in display units.

use bevy::prelude::*;

/// Conversion between display and simulation units at a fixed ratio.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitScale {
    display_per_sim: f32,
}

impl UnitScale {
    pub fn new(display_per_sim: f32) -> Self {
        Self { display_per_sim }
    }

    #[inline]
    pub fn to_sim(&self, display: Vec2) -> Vec2 {
        display / self.display_per_sim
    }

    #[inline]
    pub fn to_display(&self, sim: Vec2) -> Vec2 {
        sim * self.display_per_sim
    }
}

impl Default for UnitScale {
    fn default() -> Self {
        Self::new(crate::constants::DISPLAY_UNITS_PER_SIM_UNIT)
    }
}
