//! Gravity - two random entities pull on each other and gain mass

use crate::core::config::SimulationConfig;
use crate::entity::{keys, Entity, Metadata, Value};
use crate::interaction::kinds;
use crate::rules::{pick_two_distinct, InteractionRule, RuleContext, RuleOutput};

pub fn gravity(entities: &[Entity], ctx: &mut RuleContext<'_>, mass_change: i64) -> RuleOutput {
    let (i, j) = pick_two_distinct(entities.len(), ctx.rng())?;

    let mut metadata = Metadata::new();
    metadata.insert(keys::MASS_CHANGE.to_string(), Value::Int(mass_change));

    Some(vec![ctx.interaction(
        entities[i].id(),
        entities[j].id(),
        kinds::GRAVITY,
        metadata,
    )])
}

#[derive(Debug, Clone)]
pub struct GravityRule {
    pub mass_change: i64,
}

impl GravityRule {
    pub fn from_config(config: &SimulationConfig) -> Self {
        Self {
            mass_change: config.gravity_mass_change,
        }
    }
}

impl Default for GravityRule {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl InteractionRule for GravityRule {
    fn name(&self) -> &str {
        kinds::GRAVITY
    }

    fn evaluate(&mut self, entities: &[Entity], ctx: &mut RuleContext<'_>) -> RuleOutput {
        gravity(entities, ctx, self.mass_change)
    }
}
