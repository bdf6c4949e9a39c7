//! Read-only world view for renderers and reports

use serde::Serialize;

use crate::core::error::Result;
use crate::core::types::{EntityId, InteractionId, Tick};
use crate::entity::EntitySnapshot;
use crate::simulation::universe::Universe;

/// One drawn connection: the first two participants of an interaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Link {
    pub interaction_id: InteractionId,
    pub interaction_type: String,
    pub source: EntityId,
    pub target: EntityId,
}

/// Everything a visualization needs, detached from the live universe
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorldSnapshot {
    pub tick: Tick,
    pub entities: Vec<EntitySnapshot>,
    pub links: Vec<Link>,
}

impl WorldSnapshot {
    pub fn capture(universe: &Universe) -> Self {
        let entities = universe.entities().iter().map(|e| e.snapshot()).collect();
        let links = universe
            .interaction_history()
            .iter()
            .filter_map(|interaction| match interaction.participants() {
                [source, target, ..] => Some(Link {
                    interaction_id: interaction.id(),
                    interaction_type: interaction.interaction_type().to_string(),
                    source: *source,
                    target: *target,
                }),
                _ => None,
            })
            .collect();

        Self {
            tick: universe.tick_count(),
            entities,
            links,
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
