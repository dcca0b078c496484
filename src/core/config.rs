//! Combat configuration.
//!
//! A combat is configured once, at construction:
//! - `seed`: drives every die and every turn-order draw
//! - `lane_count`: width of the battlefield
//! - `max_rounds`: optional hard stop
//!
//! ```
//! use tactical_combat::core::CombatConfig;
//!
//! let config = CombatConfig::new(42).with_lane_count(10).with_max_rounds(20);
//! assert!(config.validate().is_ok());
//! assert_eq!(config.seed, 42);
//! ```

use serde::{Deserialize, Serialize};

use super::error::{CombatError, Result};

/// Default battlefield width.
pub const DEFAULT_LANE_COUNT: usize = 8;

/// Configuration for one combat encounter.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct CombatConfig {
    /// Seed for the combat rng. Same seed + same inputs = same combat.
    pub seed: u64,

    /// Number of lanes. Positions are `0..lane_count`.
    pub lane_count: usize,

    /// End the combat after this many rounds. `None` runs until one
    /// faction is left standing.
    pub max_rounds: Option<u32>,
}

impl CombatConfig {
    /// Create a configuration with defaults and the given seed.
    #[must_use]
    pub fn new(seed: u64) -> Self {
        Self {
            seed,
            lane_count: DEFAULT_LANE_COUNT,
            max_rounds: None,
        }
    }

    #[must_use]
    pub fn with_lane_count(mut self, lane_count: usize) -> Self {
        self.lane_count = lane_count;
        self
    }

    #[must_use]
    pub fn with_max_rounds(mut self, rounds: u32) -> Self {
        self.max_rounds = Some(rounds);
        self
    }

    /// Check the configuration is usable.
    pub fn validate(&self) -> Result<()> {
        if self.lane_count == 0 {
            return Err(CombatError::InvalidConfig(
                "lane_count must be at least 1".to_string(),
            ));
        }
        if self.max_rounds == Some(0) {
            return Err(CombatError::InvalidConfig(
                "max_rounds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new(0)
    }
}
