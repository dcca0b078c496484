//! Core types: identifiers, dice, RNG, configuration, errors.
//!
//! Everything here is independent of the event bus and the state machine.

pub mod entity;
pub mod die;
pub mod rng;
pub mod config;
pub mod error;

pub use entity::{AbilityId, CharacterId, PassiveId, StatusId};
pub use die::{DiceList, Die};
pub use rng::{CombatRng, CombatRngState};
pub use config::{CombatConfig, DEFAULT_LANE_COUNT};
pub use error::{CombatError, Result};
