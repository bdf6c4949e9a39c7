//! Fusion - entities sitting almost on top of each other on the scale loop

use rand::seq::SliceRandom;

use crate::core::config::SimulationConfig;
use crate::entity::{keys, Entity, Metadata, Value};
use crate::interaction::kinds;
use crate::rules::scale::scale_distance;
use crate::rules::{InteractionRule, RuleContext, RuleOutput};

/// Fuse one random pair among all pairs closer than `threshold`
pub fn fusion(
    entities: &[Entity],
    ctx: &mut RuleContext<'_>,
    threshold: f64,
    energy_gain: i64,
) -> RuleOutput {
    let mut candidates = Vec::new();
    for i in 0..entities.len() {
        for j in (i + 1)..entities.len() {
            if scale_distance(entities[i].scale(), entities[j].scale()) < threshold {
                candidates.push((i, j));
            }
        }
    }

    let &(i, j) = candidates.choose(ctx.rng())?;

    let mut metadata = Metadata::new();
    metadata.insert(keys::ENERGY_GAIN.to_string(), Value::Int(energy_gain));

    Some(vec![ctx.interaction(
        entities[i].id(),
        entities[j].id(),
        kinds::FUSION,
        metadata,
    )])
}

#[derive(Debug, Clone)]
pub struct FusionRule {
    pub threshold: f64,
    pub energy_gain: i64,
}

impl FusionRule {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            threshold: config.fusion_scale_threshold,
            energy_gain: config.fusion_energy_gain,
        }
    }
}

impl Default for FusionRule {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl InteractionRule for FusionRule {
    fn name(&self) -> &str {
        kinds::FUSION
    }

    fn evaluate(&mut self, entities: &[Entity], ctx: &mut RuleContext<'_>) -> RuleOutput {
        fusion(entities, ctx, self.threshold, self.energy_gain)
    }
}
