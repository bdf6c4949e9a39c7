//! Simulation configuration with documented constants
//!
//! All magic numbers used by the built-in rules and the pattern miner are
//! collected here. Every field has a default, so a TOML file only needs to
//! name the values it overrides.

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::core::error::{Result, UniverseError};

/// Configuration for the universe and its built-in rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    // === RANDOMNESS ===
    /// Seed for the universe RNG. `None` seeds from OS entropy and makes
    /// the run non-replayable.
    pub seed: Option<u64>,

    // === ENCOUNTERS ===
    /// Added to the scale distance before inverting it into a sampling
    /// weight, so identical scales get weight 100 instead of infinity.
    pub encounter_weight_epsilon: f64,

    // === GRAVITY ===
    /// Mass added to both participants of a gravity interaction
    pub gravity_mass_change: i64,

    // === FUSION ===
    /// Pairs strictly closer than this on the scale loop may fuse
    pub fusion_scale_threshold: f64,

    /// Energy added to both participants of a fusion interaction
    pub fusion_energy_gain: i64,

    // === GROUPS ===
    /// Number of co-interactions after which a pair forms or joins a group
    pub group_interaction_threshold: usize,

    /// Cap for the persistent bond rule
    ///
    /// At 5 the bonded pair interacts on the first five ticks, which is
    /// enough to push it over the group threshold.
    pub persistent_max_interactions: usize,

    // === PATTERN MINING ===
    /// How many entries the observer reports for ranked patterns
    pub pattern_top_k: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            seed: None,
            encounter_weight_epsilon: 0.01,
            gravity_mass_change: 1,
            fusion_scale_threshold: 0.05,
            fusion_energy_gain: 5,
            group_interaction_threshold: 2,
            persistent_max_interactions: 5,
            pattern_top_k: 3,
        }
    }
}

impl SimulationConfig {
    /// Create a new config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style seed override
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Parse a config from TOML text and validate it
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: SimulationConfig = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config from a TOML file on disk
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml_str(&content)
    }

    /// Validate configuration for internal consistency
    pub fn validate(&self) -> Result<()> {
        if self.encounter_weight_epsilon <= 0.0 {
            return Err(UniverseError::InvalidConfig(format!(
                "encounter_weight_epsilon ({}) must be positive",
                self.encounter_weight_epsilon
            )));
        }

        // The largest possible scale distance is 0.5
        if !(0.0..=0.5).contains(&self.fusion_scale_threshold) {
            return Err(UniverseError::InvalidConfig(format!(
                "fusion_scale_threshold ({}) must be within [0.0, 0.5]",
                self.fusion_scale_threshold
            )));
        }

        if self.group_interaction_threshold == 0 {
            return Err(UniverseError::InvalidConfig(
                "group_interaction_threshold must be at least 1".into(),
            ));
        }

        if self.pattern_top_k == 0 {
            return Err(UniverseError::InvalidConfig(
                "pattern_top_k must be at least 1".into(),
            ));
        }

        Ok(())
    }
}
