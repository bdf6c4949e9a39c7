//! Group formation - repeated co-interaction turns a pair into one "self"
//!
//! Counts how often each pair of entities appears together in binary
//! interactions (of any type) across every history in the roster and, once a
//! pair reaches the threshold, emits a `group_formed` interaction that puts
//! both in the same group:
//!
//! | left group | right group | result                         |
//! |------------|-------------|--------------------------------|
//! | none       | none        | freshly minted group           |
//! | `g`        | none        | `g` propagated to both         |
//! | none       | `g`         | `g` propagated to both         |
//! | `g1`       | `g2`        | merged into `g1` (left wins)   |
//! | `g`        | `g`         | nothing                        |
//!
//! A merge only re-tags the pair itself. Other members of the losing group
//! keep its id until they reach the threshold with someone in the winner.

use ahash::AHashMap;

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, GroupId};
use crate::entity::{keys, Entity, Metadata, Value};
use crate::interaction::kinds;
use crate::rules::{InteractionRule, RuleContext, RuleOutput};

/// Co-interaction tally for one unordered pair
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairCount {
    /// Participant listed first when the pair was discovered
    pub left: EntityId,
    pub right: EntityId,
    pub count: usize,
}

/// Tally binary co-interactions across every history in the roster, in
/// discovery order. Counts are per history entry, so one interaction between
/// two roster members adds 2 to their pair.
pub fn co_interaction_counts(entities: &[Entity]) -> Vec<PairCount> {
    let mut counts: Vec<PairCount> = Vec::new();
    let mut index: AHashMap<(EntityId, EntityId), usize> = AHashMap::new();

    for entity in entities {
        for interaction in entity.interaction_history() {
            let Some((a, b)) = interaction.pair() else {
                continue;
            };
            if a == b {
                continue;
            }
            let key = if a < b { (a, b) } else { (b, a) };
            match index.get(&key) {
                Some(&i) => counts[i].count += 1,
                None => {
                    index.insert(key, counts.len());
                    counts.push(PairCount {
                        left: a,
                        right: b,
                        count: 1,
                    });
                }
            }
        }
    }

    counts
}

/// Emit one `group_formed` interaction per pair at or above `threshold`
/// whose members are not already in the same group.
pub fn group_formation(
    entities: &[Entity],
    ctx: &mut RuleContext<'_>,
    threshold: usize,
) -> RuleOutput {
    let by_id: AHashMap<EntityId, &Entity> = entities.iter().map(|e| (e.id(), e)).collect();
    let mut formed = Vec::new();

    for pair in co_interaction_counts(entities) {
        if pair.count < threshold {
            continue;
        }
        let (Some(left), Some(right)) = (by_id.get(&pair.left), by_id.get(&pair.right)) else {
            continue;
        };

        let group = match (left.group_id(), right.group_id()) {
            (None, None) => GroupId::mint(ctx.rng()),
            (Some(g), None) | (None, Some(g)) => g,
            (Some(g1), Some(g2)) if g1 != g2 => {
                tracing::debug!(
                    "Merging group {} into {} via {} and {}",
                    g2,
                    g1,
                    left.id().short(),
                    right.id().short()
                );
                g1
            }
            (Some(_), Some(_)) => continue,
        };

        tracing::debug!(
            "Group {} formed by {} and {} after {} co-interactions",
            group,
            left.id().short(),
            right.id().short(),
            pair.count
        );

        let mut metadata = Metadata::new();
        metadata.insert(keys::GROUP_ID.to_string(), Value::Text(group.0));
        formed.push(ctx.interaction(left.id(), right.id(), kinds::GROUP_FORMED, metadata));
    }

    Some(formed)
}

#[derive(Debug, Clone)]
pub struct GroupFormationRule {
    pub threshold: usize,
}

impl GroupFormationRule {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            threshold: config.group_interaction_threshold,
        }
    }
}

impl Default for GroupFormationRule {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl InteractionRule for GroupFormationRule {
    fn name(&self) -> &str {
        "group_formation"
    }

    fn evaluate(&mut self, entities: &[Entity], ctx: &mut RuleContext<'_>) -> RuleOutput {
        group_formation(entities, ctx, self.threshold)
    }
}
