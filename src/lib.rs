//! Vessel hull physics on Bevy + Rapier 2D.
//!
//! A vessel is a set of rectangular walls.  Their corners are wrapped into a
//! convex hull that becomes one compound collision envelope; the vessel's
//! motion is integrated by hand (speed, target seek, buoyancy, drag) while
//! Rapier only reports contacts.  Contacts with terrain are graded by impact:
//! soft ones deflect the vessel, hard ones damage the walls near the rock
//! and loosen the hull.
//!
//! [`simulation::VesselPlugin`] wires everything into an `App`.

pub mod buoyancy;
pub mod character;
pub mod collision;
pub mod config;
pub mod constants;
pub mod envelope;
pub mod error;
pub mod graphics;
pub mod hull;
pub mod presentation;
pub mod registry;
pub mod resolver;
pub mod scene;
pub mod simulation;
pub mod structure;
pub mod terrain;
pub mod testing;
pub mod units;
pub mod vessel;
