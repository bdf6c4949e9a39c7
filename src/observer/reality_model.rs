//! Perceived-reality graph - an observer's private model of the world
//!
//! A directed multigraph over entity ids. Nodes hold the last perceived state
//! of an entity; edges are keyed by `(from, to, interaction id)` so the same
//! pair can be linked by many interactions, while perceiving one interaction
//! twice never duplicates its edges. Nothing is ever removed.

use std::time::SystemTime;

use ahash::AHashMap;
use serde::Serialize;

use crate::core::types::{EntityId, InteractionId};
use crate::entity::{EntitySnapshot, Metadata, Properties};
use crate::interaction::Interaction;

/// Last perceived state of an entity
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerceivedNode {
    pub properties: Properties,
    pub scale: f64,
    pub local_time: u64,
}

/// One direction of a perceived binary interaction
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerceivedEdge {
    pub from: EntityId,
    pub to: EntityId,
    pub interaction_id: InteractionId,
    pub interaction_type: String,
    pub timestamp: SystemTime,
    pub metadata: Metadata,
}

type EdgeKey = (EntityId, EntityId, InteractionId);

/// The observer's graph
#[derive(Debug, Clone, Default)]
pub struct RealityModel {
    nodes: AHashMap<EntityId, PerceivedNode>,
    /// Node ids in first-perceived order
    node_order: Vec<EntityId>,
    edges: Vec<PerceivedEdge>,
    edge_index: AHashMap<EdgeKey, usize>,
}

impl RealityModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Update the model from an interaction. Interactions that do not
    /// include `observer` are ignored; returns whether it was perceived.
    ///
    /// Every participant becomes (or refreshes) a node. Only binary
    /// interactions produce edges: with three or more participants there is
    /// no single pair to link, so the model records who was present and
    /// nothing else.
    pub fn perceive(
        &mut self,
        observer: EntityId,
        interaction: &Interaction,
        participants: &[EntitySnapshot],
    ) -> bool {
        if !interaction.involves(observer) {
            return false;
        }

        for &id in interaction.participants() {
            match participants.iter().find(|s| s.id == id) {
                Some(snapshot) => self.upsert_node(snapshot),
                None => tracing::warn!(
                    "Observer {} perceived {} without a snapshot of {}",
                    observer.short(),
                    interaction,
                    id.short()
                ),
            }
        }

        match interaction.pair() {
            Some((a, b)) if self.contains(a) && self.contains(b) => {
                self.add_edge(a, b, interaction);
                self.add_edge(b, a, interaction);
            }
            Some(_) => {}
            None => tracing::trace!(
                "Observer {} perceived {}-way {} as nodes only",
                observer.short(),
                interaction.participants().len(),
                interaction
            ),
        }

        true
    }

    fn upsert_node(&mut self, snapshot: &EntitySnapshot) {
        match self.nodes.get_mut(&snapshot.id) {
            Some(node) => {
                // Scale never changes, so only the evolving state is refreshed
                node.properties = snapshot.properties.clone();
                node.local_time = snapshot.local_time;
            }
            None => {
                self.nodes.insert(
                    snapshot.id,
                    PerceivedNode {
                        properties: snapshot.properties.clone(),
                        scale: snapshot.scale,
                        local_time: snapshot.local_time,
                    },
                );
                self.node_order.push(snapshot.id);
            }
        }
    }

    fn add_edge(&mut self, from: EntityId, to: EntityId, interaction: &Interaction) {
        let edge = PerceivedEdge {
            from,
            to,
            interaction_id: interaction.id(),
            interaction_type: interaction.interaction_type().to_string(),
            timestamp: interaction.timestamp(),
            metadata: interaction.metadata().clone(),
        };

        let key = (from, to, interaction.id());
        match self.edge_index.get(&key) {
            Some(&idx) => self.edges[idx] = edge,
            None => {
                self.edge_index.insert(key, self.edges.len());
                self.edges.push(edge);
            }
        }
    }

    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn node(&self, id: EntityId) -> Option<&PerceivedNode> {
        self.nodes.get(&id)
    }

    /// Nodes in first-perceived order
    pub fn nodes(&self) -> impl Iterator<Item = (EntityId, &PerceivedNode)> + '_ {
        self.node_order
            .iter()
            .filter_map(move |id| self.nodes.get(id).map(|node| (*id, node)))
    }

    /// Edges in the order they were added
    pub fn edges(&self) -> &[PerceivedEdge] {
        &self.edges
    }

    pub fn has_edge(&self, from: EntityId, to: EntityId, interaction: InteractionId) -> bool {
        self.edge_index.contains_key(&(from, to, interaction))
    }

    pub fn edge(&self, from: EntityId, to: EntityId, interaction: InteractionId) -> Option<&PerceivedEdge> {
        self.edge_index
            .get(&(from, to, interaction))
            .map(|&idx| &self.edges[idx])
    }

    /// In-degree plus out-degree, counting parallel edges
    pub fn degree(&self, id: EntityId) -> usize {
        self.edges
            .iter()
            .map(|e| usize::from(e.from == id) + usize::from(e.to == id))
            .sum()
    }
}
