//! Core type definitions used throughout the codebase

use derive_more::Display;
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for entities
#[derive(
    Debug, Display, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct EntityId(pub Uuid);

impl EntityId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Build an id from a caller-supplied random source (replayable runs)
    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(random_uuid(rng))
    }

    /// First eight hex digits, used in human-readable output
    pub fn short(&self) -> String {
        short_uuid(&self.0)
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

/// Unique identifier for interactions
#[derive(Debug, Display, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct InteractionId(pub Uuid);

impl InteractionId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    pub fn from_rng<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(random_uuid(rng))
    }

    pub fn short(&self) -> String {
        short_uuid(&self.0)
    }
}

impl Default for InteractionId {
    fn default() -> Self {
        Self::new()
    }
}

/// Identifier of an emergent group, stored in `properties["group_id"]`
#[derive(Debug, Display, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct GroupId(pub String);

impl GroupId {
    /// Mint a fresh group id. Never reused across merges.
    pub fn mint<R: Rng + ?Sized>(rng: &mut R) -> Self {
        Self(random_uuid(rng).to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for GroupId {
    fn from(value: &str) -> Self {
        Self(value.to_string())
    }
}

/// Simulation tick counter
pub type Tick = u64;

/// Whether an entity is a plain participant or also perceives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EntityKind {
    Entity,
    Observer,
}

fn random_uuid<R: Rng + ?Sized>(rng: &mut R) -> Uuid {
    uuid::Builder::from_random_bytes(rng.gen()).into_uuid()
}

fn short_uuid(uuid: &Uuid) -> String {
    uuid.simple().to_string()[..8].to_string()
}
