//! Universe - entity registry, rule registry and the tick loop

use std::sync::Arc;

use ahash::AHashMap;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::core::config::SimulationConfig;
use crate::core::error::{Result, UniverseError};
use crate::core::types::{EntityId, Tick};
use crate::entity::{Entity, EntitySnapshot, Metadata, Properties};
use crate::interaction::{EffectRegistry, Interaction};
use crate::rules::{standard_rules, FnRule, InteractionRule, RuleContext, RuleOutput};

/// The simulated world
pub struct Universe {
    /// All entities, in insertion order
    entities: Vec<Entity>,
    /// First roster position of each id
    index: AHashMap<EntityId, usize>,
    interaction_rules: Vec<Box<dyn InteractionRule>>,
    interaction_history: Vec<Arc<Interaction>>,
    effects: EffectRegistry,
    config: SimulationConfig,
    /// Random number generator (deterministic when seeded)
    rng: ChaCha8Rng,
    tick_count: Tick,
}

impl Universe {
    /// Empty universe with default config and an entropy-seeded RNG
    pub fn new() -> Self {
        Self::build(SimulationConfig::default())
    }

    /// Empty universe with a seeded RNG
    pub fn from_seed(seed: u64) -> Self {
        Self::build(SimulationConfig::default().with_seed(seed))
    }

    /// Empty universe using `config` (validated). No rules are registered.
    pub fn with_config(config: SimulationConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    /// Universe using `config` with the five built-in rules registered
    pub fn with_standard_rules(config: SimulationConfig) -> Result<Self> {
        let mut universe = Self::with_config(config)?;
        for rule in standard_rules(&universe.config) {
            universe.add_boxed_rule(rule);
        }
        Ok(universe)
    }

    fn build(config: SimulationConfig) -> Self {
        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            entities: Vec::new(),
            index: AHashMap::new(),
            interaction_rules: Vec::new(),
            interaction_history: Vec::new(),
            effects: EffectRegistry::with_builtins(),
            config,
            rng,
            tick_count: 0,
        }
    }

    /// Register an entity. Ids are not checked for uniqueness; a repeated id
    /// is kept in the roster but lookups resolve to the first one.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        let id = entity.id();
        if self.index.contains_key(&id) {
            tracing::warn!("Entity {} registered twice", id.short());
        } else {
            self.index.insert(id, self.entities.len());
        }
        self.entities.push(entity);
        id
    }

    /// Register a rule; rules run in registration order
    pub fn add_interaction_rule<R: InteractionRule + 'static>(&mut self, rule: R) {
        self.add_boxed_rule(Box::new(rule));
    }

    pub fn add_boxed_rule(&mut self, rule: Box<dyn InteractionRule>) {
        tracing::debug!("Registered rule {}", rule.name());
        self.interaction_rules.push(rule);
    }

    /// Register a closure as a rule
    pub fn add_rule_fn<F>(&mut self, name: impl Into<String>, f: F)
    where
        F: FnMut(&[Entity], &mut RuleContext<'_>) -> RuleOutput + 'static,
    {
        self.add_interaction_rule(FnRule::new(name, f));
    }

    /// Register or replace the effect of an interaction type
    pub fn register_effect<F>(&mut self, interaction_type: impl Into<String>, effect: F)
    where
        F: Fn(&mut Properties, &Metadata) + Send + Sync + 'static,
    {
        self.effects.register(interaction_type, effect);
    }

    /// Advance the world by one step.
    ///
    /// Every rule sees the roster as it was at the start of the tick.
    /// Interactions naming an unregistered entity are dropped. The rest are
    /// appended to the global history, then for each
    /// interaction and each participant in order: recorded, effects applied,
    /// and perceived if the participant can perceive.
    pub fn tick(&mut self) -> Vec<Arc<Interaction>> {
        let mut new_interactions: Vec<Arc<Interaction>> = Vec::new();

        let mut ctx = RuleContext::new(self.tick_count, &mut self.rng);
        for rule in self.interaction_rules.iter_mut() {
            if let Some(batch) = rule.evaluate(&self.entities, &mut ctx) {
                if !batch.is_empty() {
                    tracing::trace!("Rule {} produced {} interactions", rule.name(), batch.len());
                }
                new_interactions.extend(batch.into_iter().map(Arc::new));
            }
        }

        // Every participant must record what enters the global history
        new_interactions.retain(|interaction| {
            match interaction
                .participants()
                .iter()
                .find(|id| !self.index.contains_key(*id))
            {
                Some(unknown) => {
                    tracing::warn!(
                        "Dropping {}: names unknown entity {}",
                        interaction,
                        unknown.short()
                    );
                    false
                }
                None => true,
            }
        });

        self.interaction_history
            .extend(new_interactions.iter().cloned());

        for interaction in &new_interactions {
            for &participant in interaction.participants() {
                let Some(&idx) = self.index.get(&participant) else {
                    continue;
                };

                let entity = &mut self.entities[idx];
                interaction.record(entity);
                interaction.apply_effects_with(entity, &self.effects);

                if entity.perceives() {
                    let snapshots = self.participant_snapshots(interaction);
                    self.entities[idx].perceive_signal(interaction, &snapshots);
                }
            }
        }

        self.tick_count += 1;
        tracing::debug!(
            "Tick {} produced {} interactions ({} total)",
            self.tick_count,
            new_interactions.len(),
            self.interaction_history.len()
        );

        new_interactions
    }

    /// Run `ticks` ticks, returning how many interactions they produced
    pub fn run(&mut self, ticks: u64) -> usize {
        (0..ticks).map(|_| self.tick().len()).sum()
    }

    fn participant_snapshots(&self, interaction: &Interaction) -> Vec<EntitySnapshot> {
        interaction
            .participants()
            .iter()
            .filter_map(|id| self.index.get(id).map(|&i| self.entities[i].snapshot()))
            .collect()
    }

    pub fn entities(&self) -> &[Entity] {
        &self.entities
    }

    pub fn entity(&self, id: EntityId) -> Option<&Entity> {
        self.index.get(&id).map(|&i| &self.entities[i])
    }

    /// Mutable access to a registered entity. Properties stay read-only
    /// outside the crate; they change only through interaction effects.
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity> {
        match self.index.get(&id) {
            Some(&i) => Ok(&mut self.entities[i]),
            None => Err(UniverseError::EntityNotFound(id)),
        }
    }

    pub fn observers(&self) -> impl Iterator<Item = &Entity> + '_ {
        self.entities.iter().filter(|e| e.perceives())
    }

    pub fn interaction_history(&self) -> &[Arc<Interaction>] {
        &self.interaction_history
    }

    pub fn rule_names(&self) -> Vec<&str> {
        self.interaction_rules.iter().map(|r| r.name()).collect()
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Ticks completed so far
    pub fn tick_count(&self) -> Tick {
        self.tick_count
    }

    /// Reseed the random source
    pub fn reset_rng(&mut self, seed: u64) {
        self.rng = ChaCha8Rng::seed_from_u64(seed);
    }
}

impl Default for Universe {
    fn default() -> Self {
        Self::new()
    }
}
