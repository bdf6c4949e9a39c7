//! Scale Loop - emergent properties from pairwise interactions
//!
//! A universe of entities on a cyclical scale spectrum. Pluggable rules
//! propose interactions each tick; interactions advance the participants'
//! local time and apply type-specific effects; observer entities build a
//! private graph of what they took part in and mine it for patterns.

pub mod core;
pub mod entity;
pub mod interaction;
pub mod observer;
pub mod rules;
pub mod simulation;

pub use crate::core::{EntityId, EntityKind, GroupId, InteractionId, Result, SimulationConfig, UniverseError};
pub use crate::entity::{Entity, EntitySnapshot, Value};
pub use crate::interaction::Interaction;
pub use crate::observer::{PatternReport, RealityModel};
pub use crate::simulation::{Universe, WorldSnapshot};
