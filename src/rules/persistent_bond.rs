//! Persistent bond - one fixed pair interacting on consecutive ticks
//!
//! Mostly a demonstration aid: it guarantees that some pair crosses the group
//! threshold early in a run. Unlike the other rules it remembers things
//! between ticks, and that memory lives in an explicit
//! [`PersistentBondState`]. Callers running several independent simulations
//! must give each run a fresh state (or [`reset`](PersistentBondState::reset)
//! it); reusing a spent state is a caller error.

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::config::SimulationConfig;
use crate::core::types::EntityId;
use crate::entity::{Entity, Metadata};
use crate::interaction::kinds;
use crate::rules::{pick_two_distinct, InteractionRule, RuleContext, RuleOutput};

/// Memory of the persistent bond rule
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PersistentBondState {
    pair: Option<(EntityId, EntityId)>,
    count: usize,
}

impl PersistentBondState {
    pub fn new() -> Self {
        Self::default()
    }

    /// The bonded pair, chosen on first use
    pub fn pair(&self) -> Option<(EntityId, EntityId)> {
        self.pair
    }

    /// Interactions emitted so far
    pub fn count(&self) -> usize {
        self.count
    }

    /// Forget the pair and the counter
    pub fn reset(&mut self) {
        *self = Self::default();
    }
}

/// Emit one `persistent_bond` interaction between the remembered pair until
/// `max_interactions` have been emitted. The pair is chosen at random on the
/// first call with at least two entities.
pub fn persistent_bond(
    entities: &[Entity],
    ctx: &mut RuleContext<'_>,
    state: &mut PersistentBondState,
    max_interactions: usize,
) -> RuleOutput {
    if entities.len() < 2 {
        return None;
    }

    let (a, b) = match state.pair {
        Some(pair) => pair,
        None => {
            let (i, j) = pick_two_distinct(entities.len(), ctx.rng())?;
            let pair = (entities[i].id(), entities[j].id());
            tracing::debug!("Persistent bond between {} and {}", pair.0.short(), pair.1.short());
            state.pair = Some(pair);
            state.count = 0;
            pair
        }
    };

    if state.count >= max_interactions {
        return None;
    }
    state.count += 1;

    Some(vec![ctx.interaction(a, b, kinds::PERSISTENT_BOND, Metadata::new())])
}

/// Rule wrapper around a shared state handle.
///
/// The handle returned by [`state`](Self::state) stays valid after the rule
/// is registered with a universe, so callers can inspect or reset it.
#[derive(Debug, Clone)]
pub struct PersistentBondRule {
    pub max_interactions: usize,
    state: Rc<RefCell<PersistentBondState>>,
}

impl PersistentBondRule {
    pub fn new(max_interactions: usize) -> Self {
        Self::with_state(max_interactions, Rc::new(RefCell::new(PersistentBondState::new())))
    }

    /// Use an externally owned state
    pub fn with_state(max_interactions: usize, state: Rc<RefCell<PersistentBondState>>) -> Self {
        Self {
            max_interactions,
            state,
        }
    }

    pub fn from_config(config: &SimulationConfig) -> Self {
        Self::new(config.persistent_max_interactions)
    }

    pub fn state(&self) -> Rc<RefCell<PersistentBondState>> {
        Rc::clone(&self.state)
    }
}

impl Default for PersistentBondRule {
    fn default() -> Self {
        Self::from_config(&SimulationConfig::default())
    }
}

impl InteractionRule for PersistentBondRule {
    fn name(&self) -> &str {
        kinds::PERSISTENT_BOND
    }

    fn evaluate(&mut self, entities: &[Entity], ctx: &mut RuleContext<'_>) -> RuleOutput {
        let mut state = self.state.borrow_mut();
        persistent_bond(entities, ctx, &mut state, self.max_interactions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    #[test]
    fn test_bond_caps_at_max() {
        let entities = vec![Entity::new(), Entity::new()];
        let mut state = PersistentBondState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut ctx = RuleContext::new(0, &mut rng);

        let first = persistent_bond(&entities, &mut ctx, &mut state, 2).unwrap();
        assert_eq!(first.len(), 1);
        assert_eq!(first[0].interaction_type(), kinds::PERSISTENT_BOND);
        assert_eq!(state.count(), 1);

        let second = persistent_bond(&entities, &mut ctx, &mut state, 2).unwrap();
        assert_eq!(second.len(), 1);
        assert_eq!(state.count(), 2);

        assert!(persistent_bond(&entities, &mut ctx, &mut state, 2).is_none());
        assert_eq!(state.count(), 2);
    }

    #[test]
    fn test_pair_is_fixed() {
        let entities = vec![Entity::new(), Entity::new(), Entity::new(), Entity::new()];
        let mut state = PersistentBondState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut ctx = RuleContext::new(0, &mut rng);

        let first = persistent_bond(&entities, &mut ctx, &mut state, 5).unwrap();
        let second = persistent_bond(&entities, &mut ctx, &mut state, 5).unwrap();
        assert_eq!(first[0].pair(), second[0].pair());
        assert_eq!(state.pair(), first[0].pair());
    }

    #[test]
    fn test_reset_clears_state() {
        let entities = vec![Entity::new(), Entity::new()];
        let mut state = PersistentBondState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut ctx = RuleContext::new(0, &mut rng);

        persistent_bond(&entities, &mut ctx, &mut state, 1);
        assert!(persistent_bond(&entities, &mut ctx, &mut state, 1).is_none());

        state.reset();
        assert_eq!(state, PersistentBondState::new());
        assert!(persistent_bond(&entities, &mut ctx, &mut state, 1).is_some());
    }

    #[test]
    fn test_too_few_entities() {
        let mut state = PersistentBondState::new();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut ctx = RuleContext::new(0, &mut rng);
        assert!(persistent_bond(&[Entity::new()], &mut ctx, &mut state, 5).is_none());
        assert!(state.pair().is_none());
    }

    #[test]
    fn test_rule_handle_observes_state() {
        let entities = vec![Entity::new(), Entity::new()];
        let mut rule = PersistentBondRule::new(3);
        let handle = rule.state();
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let mut ctx = RuleContext::new(0, &mut rng);

        rule.evaluate(&entities, &mut ctx);
        rule.evaluate(&entities, &mut ctx);
        assert_eq!(handle.borrow().count(), 2);

        handle.borrow_mut().reset();
        assert_eq!(handle.borrow().count(), 0);
    }
}
