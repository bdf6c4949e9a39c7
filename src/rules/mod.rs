//! Interaction rules - how candidate interactions arise each tick
//!
//! A rule looks at the whole roster and proposes zero or more interactions.
//! Rules never touch entities: the universe records and applies everything
//! they return after all rules of the tick have run.

pub mod encounter;
pub mod fusion;
pub mod gravity;
pub mod group_formation;
pub mod persistent_bond;
pub mod scale;

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::types::{EntityId, InteractionId, Tick};
use crate::entity::{Entity, Metadata};
use crate::interaction::Interaction;

pub use encounter::{scale_biased_encounter, ScaleBiasedEncounterRule};
pub use fusion::{fusion, FusionRule};
pub use gravity::{gravity, GravityRule};
pub use group_formation::{co_interaction_counts, group_formation, GroupFormationRule, PairCount};
pub use persistent_bond::{persistent_bond, PersistentBondRule, PersistentBondState};
pub use scale::scale_distance;

/// What a rule produced this tick. `None` and an empty vec both mean
/// "nothing happened".
pub type RuleOutput = Option<Vec<Interaction>>;

/// Per-call context handed to every rule
pub struct RuleContext<'a> {
    pub tick: Tick,
    rng: &'a mut ChaCha8Rng,
}

impl<'a> RuleContext<'a> {
    pub fn new(tick: Tick, rng: &'a mut ChaCha8Rng) -> Self {
        Self { tick, rng }
    }

    /// The universe's random source
    pub fn rng(&mut self) -> &mut ChaCha8Rng {
        &mut *self.rng
    }

    /// Build a binary interaction whose id is drawn from the context RNG
    pub fn interaction(
        &mut self,
        a: EntityId,
        b: EntityId,
        interaction_type: &str,
        metadata: Metadata,
    ) -> Interaction {
        let id = InteractionId::from_rng(&mut *self.rng);
        Interaction::between(a, b, interaction_type, metadata).with_id(id)
    }
}

/// A source of interactions, evaluated once per tick
pub trait InteractionRule {
    /// Name used in logs
    fn name(&self) -> &str;

    fn evaluate(&mut self, entities: &[Entity], ctx: &mut RuleContext<'_>) -> RuleOutput;
}

/// Adapter turning a closure into a rule
pub struct FnRule<F> {
    name: String,
    f: F,
}

impl<F> FnRule<F>
where
    F: FnMut(&[Entity], &mut RuleContext<'_>) -> RuleOutput,
{
    pub fn new(name: impl Into<String>, f: F) -> Self {
        Self { name: name.into(), f }
    }
}

impl<F> InteractionRule for FnRule<F>
where
    F: FnMut(&[Entity], &mut RuleContext<'_>) -> RuleOutput,
{
    fn name(&self) -> &str {
        &self.name
    }

    fn evaluate(&mut self, entities: &[Entity], ctx: &mut RuleContext<'_>) -> RuleOutput {
        (self.f)(entities, ctx)
    }
}

/// The five built-in rules, configured from `config`, in their canonical
/// registration order.
pub fn standard_rules(config: &SimulationConfig) -> Vec<Box<dyn InteractionRule>> {
    vec![
        Box::new(ScaleBiasedEncounterRule::from_config(config)),
        Box::new(GravityRule::from_config(config)),
        Box::new(FusionRule::from_config(config)),
        Box::new(GroupFormationRule::from_config(config)),
        Box::new(PersistentBondRule::from_config(config)),
    ]
}

/// Two distinct uniform indices in `0..len`, or `None` when `len < 2`
pub(crate) fn pick_two_distinct<R: Rng + ?Sized>(len: usize, rng: &mut R) -> Option<(usize, usize)> {
    if len < 2 {
        return None;
    }
    let i = rng.gen_range(0..len);
    let mut j = rng.gen_range(0..len - 1);
    if j >= i {
        j += 1;
    }
    Some((i, j))
}
