//! Interactions - the events that define entities
//!
//! An interaction binds two or more entities under a type tag. Once built it
//! never changes; the universe shares it (via `Arc`) between the global
//! history, every participant's history and any observer that perceives it.

pub mod effects;

use std::fmt;
use std::sync::Arc;
use std::time::SystemTime;

use serde::Serialize;

use crate::core::error::{Result, UniverseError};
use crate::core::types::{EntityId, InteractionId};
use crate::entity::{Entity, Metadata};

pub use effects::{builtin_effects, EffectFn, EffectRegistry};

/// Interaction type tags produced by the built-in rules
pub mod kinds {
    pub const SCALE_BIASED_ENCOUNTER: &str = "scale_biased_encounter";
    pub const GRAVITY: &str = "gravity";
    pub const FUSION: &str = "fusion";
    pub const GROUP_FORMED: &str = "group_formed";
    pub const PERSISTENT_BOND: &str = "persistent_bond";
}

/// An event between two or more entities
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Interaction {
    id: InteractionId,
    timestamp: SystemTime,
    participants: Vec<EntityId>,
    interaction_type: String,
    metadata: Metadata,
}

impl Interaction {
    /// Build an interaction between `participants`.
    ///
    /// Fails with [`UniverseError::InvalidInteraction`] for fewer than two.
    pub fn new(
        participants: Vec<EntityId>,
        interaction_type: impl Into<String>,
        metadata: Metadata,
    ) -> Result<Self> {
        if participants.len() < 2 {
            return Err(UniverseError::InvalidInteraction {
                participants: participants.len(),
            });
        }
        Ok(Self {
            id: InteractionId::new(),
            timestamp: SystemTime::now(),
            participants,
            interaction_type: interaction_type.into(),
            metadata,
        })
    }

    /// Binary interaction; cannot fail
    pub fn between(
        a: EntityId,
        b: EntityId,
        interaction_type: impl Into<String>,
        metadata: Metadata,
    ) -> Self {
        Self {
            id: InteractionId::new(),
            timestamp: SystemTime::now(),
            participants: vec![a, b],
            interaction_type: interaction_type.into(),
            metadata,
        }
    }

    /// Replace the generated id (used to draw ids from a seeded RNG)
    pub fn with_id(mut self, id: InteractionId) -> Self {
        self.id = id;
        self
    }

    pub fn id(&self) -> InteractionId {
        self.id
    }

    pub fn timestamp(&self) -> SystemTime {
        self.timestamp
    }

    pub fn participants(&self) -> &[EntityId] {
        &self.participants
    }

    pub fn interaction_type(&self) -> &str {
        &self.interaction_type
    }

    pub fn metadata(&self) -> &Metadata {
        &self.metadata
    }

    pub fn involves(&self, entity: EntityId) -> bool {
        self.participants.contains(&entity)
    }

    pub fn is_binary(&self) -> bool {
        self.participants.len() == 2
    }

    /// The two participants of a binary interaction
    pub fn pair(&self) -> Option<(EntityId, EntityId)> {
        match self.participants.as_slice() {
            [a, b] => Some((*a, *b)),
            _ => None,
        }
    }

    /// Append to `entity`'s history and advance its local time by one.
    ///
    /// The universe calls this exactly once per participant; rules never do.
    pub fn record(self: &Arc<Self>, entity: &mut Entity) {
        entity.push_interaction(Arc::clone(self));
    }

    /// Apply the built-in effect for this interaction type to `entity`
    pub fn apply_effects(&self, entity: &mut Entity) {
        self.apply_effects_with(entity, builtin_effects());
    }

    /// Apply this interaction's effect as registered in `registry`
    pub fn apply_effects_with(&self, entity: &mut Entity, registry: &EffectRegistry) {
        registry.apply(&self.interaction_type, entity.properties_mut(), &self.metadata);
    }
}

impl fmt::Display for Interaction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Interaction({}, {})", self.interaction_type, self.id.short())
    }
}
