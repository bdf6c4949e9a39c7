//! Scale-biased encounter - entities meet neighbours on the scale loop

use rand::distributions::{Distribution, WeightedIndex};
use rand::seq::SliceRandom;

use crate::core::config::SimulationConfig;
use crate::entity::{Entity, Metadata};
use crate::interaction::kinds;
use crate::rules::scale::scale_distance;
use crate::rules::{InteractionRule, RuleContext, RuleOutput};

/// Pick a random initiator and a partner drawn with weight
/// `1 / (scale_distance + epsilon)`, so closer scales meet more often.
pub fn scale_biased_encounter(
    entities: &[Entity],
    ctx: &mut RuleContext<'_>,
    epsilon: f64,
) -> RuleOutput {
    if entities.len() < 2 {
        return None;
    }

    let initiator = entities.choose(ctx.rng())?;
    let candidates: Vec<&Entity> = entities
        .iter()
        .filter(|e| e.id() != initiator.id())
        .collect();
    if candidates.is_empty() {
        return None;
    }

    let weights = candidates
        .iter()
        .map(|c| 1.0 / (scale_distance(initiator.scale(), c.scale()) + epsilon));
    let dist = match WeightedIndex::new(weights) {
        Ok(dist) => dist,
        Err(e) => {
            tracing::warn!("Encounter weights rejected: {}", e);
            return None;
        }
    };
    let partner = candidates[dist.sample(ctx.rng())];

    Some(vec![ctx.interaction(
        initiator.id(),
        partner.id(),
        kinds::SCALE_BIASED_ENCOUNTER,
        Metadata::new(),
    )])
}

#[derive(Debug, Clone)]
pub struct ScaleBiasedEncounterRule {
    pub epsilon: f64,
}

impl ScaleBiasedEncounterRule {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            epsilon: config.encounter_weight_epsilon,
        }
    }
}

impl Default for ScaleBiasedEncounterRule {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl InteractionRule for ScaleBiasedEncounterRule {
    fn name(&self) -> &str {
        kinds::SCALE_BIASED_ENCOUNTER
    }

    fn evaluate(&mut self, entities: &[Entity], ctx: &mut RuleContext<'_>) -> RuleOutput {
        scale_biased_encounter(entities, ctx, self.epsilon)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_encounter_produces_one_interaction() {
        let entities = vec![
            Entity::with_scale(0.1),
            Entity::with_scale(0.15),
            Entity::with_scale(0.9),
        ];
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut ctx = RuleContext::new(0, &mut rng);

        let interactions = scale_biased_encounter(&entities, &mut ctx, 0.01).unwrap();
        assert_eq!(interactions.len(), 1);
        assert_eq!(interactions[0].interaction_type(), kinds::SCALE_BIASED_ENCOUNTER);

        let (a, b) = interactions[0].pair().unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_encounter_needs_two_entities() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut ctx = RuleContext::new(0, &mut rng);
        assert!(scale_biased_encounter(&[Entity::new()], &mut ctx, 0.01).is_none());
        assert!(scale_biased_encounter(&[], &mut ctx, 0.01).is_none());
    }

    #[test]
    fn test_encounter_prefers_close_scales() {
        // 0.10 and 0.11 are near each other, 0.6 is far from both
        let entities = vec![
            Entity::with_scale(0.10),
            Entity::with_scale(0.11),
            Entity::with_scale(0.6),
        ];
        let near = (entities[0].id(), entities[1].id());
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut close_pairs = 0;
        let mut initiated_by_near = 0;

        for tick in 0..2000 {
            let mut ctx = RuleContext::new(tick, &mut rng);
            let interaction = &scale_biased_encounter(&entities, &mut ctx, 0.01).unwrap()[0];
            let (a, b) = interaction.pair().unwrap();
            if a == near.0 || a == near.1 {
                initiated_by_near += 1;
                if b == near.0 || b == near.1 {
                    close_pairs += 1;
                }
            }
        }

        // Weight ratio is roughly 100 : 2, so nearly every near initiator
        // picks the other near entity
        assert!(close_pairs as f64 > initiated_by_near as f64 * 0.9);
    }
}
