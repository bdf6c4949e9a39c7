//! Effect registry - what each interaction type does to its participants
//!
//! Effects are looked up by the interaction type tag. Types without a
//! registered effect are a no-op, so new interaction types can be introduced
//! purely for observers to perceive.

use std::fmt;
use std::sync::{Arc, OnceLock};

use ahash::AHashMap;

use crate::entity::{keys, Metadata, Properties, Value};
use crate::interaction::kinds;

/// Mutates a participant's properties using the interaction metadata
pub type EffectFn = Arc<dyn Fn(&mut Properties, &Metadata) + Send + Sync>;

/// Mass added when a gravity interaction carries no `mass_change`
pub const DEFAULT_MASS_CHANGE: i64 = 1;

/// Energy added when a fusion interaction carries no `energy_gain`
pub const DEFAULT_ENERGY_GAIN: i64 = 10;

/// Lookup from interaction type to effect
#[derive(Clone, Default)]
pub struct EffectRegistry {
    effects: AHashMap<String, EffectFn>,
}

impl EffectRegistry {
    /// An empty registry: every type is a no-op
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the gravity, fusion and group_formed effects
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register(kinds::GRAVITY, gravity_effect);
        registry.register(kinds::FUSION, fusion_effect);
        registry.register(kinds::GROUP_FORMED, group_formed_effect);
        registry
    }

    /// Register or replace the effect for an interaction type
    pub fn register<F>(&mut self, interaction_type: impl Into<String>, effect: F)
    where
        F: Fn(&mut Properties, &Metadata) + Send + Sync + 'static,
    {
        self.effects.insert(interaction_type.into(), Arc::new(effect));
    }

    pub fn contains(&self, interaction_type: &str) -> bool {
        self.effects.contains_key(interaction_type)
    }

    /// Apply the effect for `interaction_type`. Returns false when the type
    /// has no effect.
    pub fn apply(&self, interaction_type: &str, properties: &mut Properties, metadata: &Metadata) -> bool {
        match self.effects.get(interaction_type) {
            Some(effect) => {
                effect(properties, metadata);
                true
            }
            None => false,
        }
    }
}

impl fmt::Debug for EffectRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut types: Vec<_> = self.effects.keys().collect();
        types.sort();
        f.debug_struct("EffectRegistry").field("types", &types).finish()
    }
}

static BUILTIN: OnceLock<EffectRegistry> = OnceLock::new();

/// Shared registry holding only the built-in effects
pub fn builtin_effects() -> &'static EffectRegistry {
    BUILTIN.get_or_init(EffectRegistry::with_builtins)
}

/// Add `metadata[delta_key]` (or `default`) to `properties[key]`, starting from 0
fn accumulate(properties: &mut Properties, key: &str, metadata: &Metadata, delta_key: &str, default: i64) {
    let delta = metadata
        .get(delta_key)
        .cloned()
        .unwrap_or(Value::Int(default));
    let current = properties.get(key).cloned().unwrap_or(Value::Int(0));

    match current.checked_add(&delta) {
        Some(sum) => {
            properties.insert(key.to_string(), sum);
        }
        None => {
            tracing::warn!(
                "Skipping non-numeric accumulation of {}: {} + {}",
                key,
                current,
                delta
            );
        }
    }
}

fn gravity_effect(properties: &mut Properties, metadata: &Metadata) {
    accumulate(properties, keys::MASS, metadata, keys::MASS_CHANGE, DEFAULT_MASS_CHANGE);
}

fn fusion_effect(properties: &mut Properties, metadata: &Metadata) {
    accumulate(properties, keys::ENERGY, metadata, keys::ENERGY_GAIN, DEFAULT_ENERGY_GAIN);
}

fn group_formed_effect(properties: &mut Properties, metadata: &Metadata) {
    match metadata.get(keys::GROUP_ID) {
        Some(group) => {
            properties.insert(keys::GROUP_ID.to_string(), group.clone());
        }
        None => tracing::warn!("group_formed interaction without a group_id"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn meta(key: &str, value: Value) -> Metadata {
        let mut m = Metadata::new();
        m.insert(key.to_string(), value);
        m
    }

    #[test]
    fn test_gravity_accumulates() {
        let registry = EffectRegistry::with_builtins();
        let mut props = Properties::new();
        let m = meta(keys::MASS_CHANGE, Value::Int(2));

        registry.apply(kinds::GRAVITY, &mut props, &m);
        registry.apply(kinds::GRAVITY, &mut props, &m);

        assert_eq!(props.get(keys::MASS), Some(&Value::Int(4)));
    }

    #[test]
    fn test_gravity_default_change() {
        let mut props = Properties::new();
        builtin_effects().apply(kinds::GRAVITY, &mut props, &Metadata::new());
        assert_eq!(props.get(keys::MASS), Some(&Value::Int(DEFAULT_MASS_CHANGE)));
    }

    #[test]
    fn test_fusion_default_gain() {
        let mut props = Properties::new();
        builtin_effects().apply(kinds::FUSION, &mut props, &Metadata::new());
        assert_eq!(props.get(keys::ENERGY), Some(&Value::Int(DEFAULT_ENERGY_GAIN)));
    }

    #[test]
    fn test_group_formed_overwrites() {
        let mut props = Properties::new();
        props.insert(keys::GROUP_ID.into(), Value::from("old"));
        builtin_effects().apply(
            kinds::GROUP_FORMED,
            &mut props,
            &meta(keys::GROUP_ID, Value::from("new")),
        );
        assert_eq!(props.get(keys::GROUP_ID), Some(&Value::from("new")));
    }

    #[test]
    fn test_unknown_type_is_noop() {
        let mut props = Properties::new();
        let applied = builtin_effects().apply("whisper", &mut props, &Metadata::new());
        assert!(!applied);
        assert!(props.is_empty());
    }

    #[test]
    fn test_custom_effect_registration() {
        let mut registry = EffectRegistry::with_builtins();
        registry.register("charge", |props: &mut Properties, _: &Metadata| {
            props.insert("charged".into(), Value::Int(1));
        });

        let mut props = Properties::new();
        assert!(registry.apply("charge", &mut props, &Metadata::new()));
        assert_eq!(props.get("charged"), Some(&Value::Int(1)));
        assert!(registry.contains(kinds::GRAVITY));
    }

    #[test]
    fn test_text_mass_is_left_alone() {
        let mut props = Properties::new();
        props.insert(keys::MASS.into(), Value::from("heavy"));
        builtin_effects().apply(kinds::GRAVITY, &mut props, &Metadata::new());
        assert_eq!(props.get(keys::MASS), Some(&Value::from("heavy")));
    }
}
