pub mod config;
pub mod error;
pub mod types;

pub use config::SimulationConfig;
pub use error::{Result, UniverseError};
pub use types::{EntityId, EntityKind, GroupId, InteractionId, Tick};
