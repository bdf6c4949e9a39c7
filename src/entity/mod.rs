//! Entities - the participants of the universe
//!
//! An entity is identity plus an evolving property map. It has no behavior of
//! its own: everything that happens to it arrives through interactions, which
//! advance its local time and apply their effects. An entity built with
//! [`Entity::observer`] additionally carries a [`RealityModel`] and perceives
//! the interactions it takes part in.

pub mod properties;

use std::fmt;
use std::sync::Arc;

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::core::types::{EntityId, EntityKind, GroupId};
use crate::interaction::Interaction;
use crate::observer::{PatternReport, RealityModel, DEFAULT_TOP_K};

pub use properties::{keys, Metadata, Properties, Value};

/// A participant in the universe
#[derive(Debug, Clone)]
pub struct Entity {
    id: EntityId,
    interaction_history: Vec<Arc<Interaction>>,
    local_time: u64,
    scale: f64,
    properties: Properties,
    /// Present only on observers
    reality_model: Option<RealityModel>,
}

impl Entity {
    /// Create an entity at a random position on the scale loop
    pub fn new() -> Self {
        Self::build(EntityId::new(), rand::thread_rng().gen(), None)
    }

    /// Create an entity at a fixed scale (clamped to [0, 1])
    pub fn with_scale(scale: f64) -> Self {
        Self::build(EntityId::new(), scale, None)
    }

    /// Create an entity whose id and scale come from `rng`
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = EntityId::from_rng(rng);
        Self::build(id, rng.gen(), None)
    }

    /// Create an observer at a random scale
    pub fn observer() -> Self {
        Self::build(
            EntityId::new(),
            rand::thread_rng().gen(),
            Some(RealityModel::new()),
        )
    }

    /// Create an observer at a fixed scale
    pub fn observer_with_scale(scale: f64) -> Self {
        Self::build(EntityId::new(), scale, Some(RealityModel::new()))
    }

    /// Create an observer whose id and scale come from `rng`
    pub fn observer_from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let id = EntityId::from_rng(rng);
        Self::build(id, rng.gen(), Some(RealityModel::new()))
    }

    fn build(id: EntityId, scale: f64, reality_model: Option<RealityModel>) -> Self {
        Self {
            id,
            interaction_history: Vec::new(),
            local_time: 0,
            scale: scale.clamp(0.0, 1.0),
            properties: Properties::new(),
            reality_model,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn local_time(&self) -> u64 {
        self.local_time
    }

    pub fn interaction_history(&self) -> &[Arc<Interaction>] {
        &self.interaction_history
    }

    pub fn properties(&self) -> &Properties {
        &self.properties
    }

    /// Properties change only through interaction effects
    pub(crate) fn properties_mut(&mut self) -> &mut Properties {
        &mut self.properties
    }

    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Current group, if the entity has joined one
    pub fn group_id(&self) -> Option<GroupId> {
        self.properties
            .get(keys::GROUP_ID)
            .and_then(Value::as_str)
            .map(GroupId::from)
    }

    pub fn kind(&self) -> EntityKind {
        if self.reality_model.is_some() {
            EntityKind::Observer
        } else {
            EntityKind::Entity
        }
    }

    /// Whether this entity has the perception capability
    pub fn perceives(&self) -> bool {
        self.reality_model.is_some()
    }

    pub fn reality_model(&self) -> Option<&RealityModel> {
        self.reality_model.as_ref()
    }

    /// Append an interaction to the history and advance local time.
    /// Only [`Interaction::record`] calls this.
    pub(crate) fn push_interaction(&mut self, interaction: Arc<Interaction>) {
        self.interaction_history.push(interaction);
        self.local_time += 1;
    }

    /// Feed an interaction into the perception pipeline. No-op for entities
    /// without the capability and for interactions this entity is not part of.
    ///
    /// `participants` must hold a snapshot of every participant, in any order.
    pub fn perceive_signal(&mut self, interaction: &Interaction, participants: &[EntitySnapshot]) {
        let id = self.id;
        if let Some(model) = self.reality_model.as_mut() {
            model.perceive(id, interaction, participants);
        }
    }

    /// Mine the reality model. `None` for non-observers.
    pub fn find_patterns(&self) -> Option<PatternReport> {
        self.find_patterns_top(DEFAULT_TOP_K)
    }

    pub fn find_patterns_top(&self, top_k: usize) -> Option<PatternReport> {
        self.reality_model
            .as_ref()
            .map(|model| model.find_patterns(top_k))
    }

    /// Point-in-time copy of the observable state
    pub fn snapshot(&self) -> EntitySnapshot {
        EntitySnapshot {
            id: self.id,
            kind: self.kind(),
            scale: self.scale,
            local_time: self.local_time,
            properties: self.properties.clone(),
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Entity {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Entity {}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self.kind() {
            EntityKind::Entity => "Entity",
            EntityKind::Observer => "OBSERVER",
        };
        let props = self
            .properties
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<_>>()
            .join(", ");
        write!(f, "{}({}\nScale:{:.2}\n{}", label, self.id.short(), self.scale, props)?;
        if let Some(group) = self.group_id() {
            write!(f, "\nGroup:{}", group)?;
        }
        write!(f, ")")
    }
}

/// Observable state of an entity at one moment
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntitySnapshot {
    pub id: EntityId,
    pub kind: EntityKind,
    pub scale: f64,
    pub local_time: u64,
    pub properties: Properties,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_entity_creation() {
        let entity = Entity::new();
        assert!(entity.interaction_history().is_empty());
        assert_eq!(entity.local_time(), 0);
        assert!((0.0..=1.0).contains(&entity.scale()));
        assert!(entity.properties().is_empty());
        assert_eq!(entity.kind(), EntityKind::Entity);
        assert!(!entity.perceives());
    }

    #[test]
    fn test_observer_creation() {
        let observer = Entity::observer();
        assert_eq!(observer.kind(), EntityKind::Observer);
        assert!(observer.perceives());
        assert_eq!(observer.reality_model().unwrap().node_count(), 0);
    }

    #[test]
    fn test_scale_clamped() {
        assert_eq!(Entity::with_scale(1.7).scale(), 1.0);
        assert_eq!(Entity::with_scale(-0.2).scale(), 0.0);
    }

    #[test]
    fn test_from_rng_is_replayable() {
        let a = Entity::from_rng(&mut ChaCha8Rng::seed_from_u64(42));
        let b = Entity::from_rng(&mut ChaCha8Rng::seed_from_u64(42));
        assert_eq!(a.id(), b.id());
        assert_eq!(a.scale(), b.scale());
    }

    #[test]
    fn test_non_observer_has_no_patterns() {
        assert!(Entity::new().find_patterns().is_none());
    }

    #[test]
    fn test_display_with_properties() {
        let mut entity = Entity::with_scale(0.5);
        entity.properties_mut().insert("mass".into(), Value::Int(10));
        entity
            .properties_mut()
            .insert(keys::GROUP_ID.into(), Value::from("abc"));

        let text = entity.to_string();
        assert!(text.starts_with("Entity("));
        assert!(text.contains("Scale:0.50"));
        assert!(text.contains("mass=10"));
        assert!(text.contains("Group:abc"));
    }

    #[test]
    fn test_observer_display_label() {
        let observer = Entity::observer_with_scale(0.25);
        assert!(observer.to_string().starts_with("OBSERVER("));
    }

    #[test]
    fn test_snapshot_copies_state() {
        let mut entity = Entity::with_scale(0.3);
        entity.properties_mut().insert("energy".into(), Value::Int(5));
        let snap = entity.snapshot();
        entity.properties_mut().insert("energy".into(), Value::Int(9));

        assert_eq!(snap.id, entity.id());
        assert_eq!(snap.properties.get("energy"), Some(&Value::Int(5)));
    }
}
