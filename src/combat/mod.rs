//! Combat orchestration.
//!
//! ## Key Components
//!
//! - [`CombatContext`]: roster, event bus, rng and action queue of one combat
//! - [`CombatInstance`]: the round/turn state machine
//! - [`CombatState`]: the machine's states
//! - [`TurnOrder`]: per-round speed draw
//! - [`CombatLog`]: observer recording every event
//!
//! ## Example Usage
//!
//! ```
//! use tactical_combat::combat::{CombatInstance, CombatLog, CombatState};
//! use tactical_combat::core::CombatConfig;
//! use tactical_combat::scenario::ScenarioInfo;
//!
//! let mut combat = CombatInstance::new(CombatConfig::new(7), ScenarioInfo::skirmish()).unwrap();
//! let log = CombatLog::new();
//! log.attach(combat.context_mut().events_mut());
//!
//! combat.start().unwrap();
//! // The player-controlled duelist is waiting for input, unless the
//! // dummies were faster and already won.
//! assert!(combat.state().is_suspension() || combat.is_finished());
//! assert!(!log.is_empty());
//! ```

mod context;
mod instance;
mod log;
mod resolution;
mod state;
mod turn_order;

pub use context::{CombatContext, COOLDOWN_HANDLER, DAMAGE_FLOOR_HANDLER};
pub use instance::CombatInstance;
pub use log::{CombatLog, COMBAT_LOG};
pub use resolution::{Activation, ClashOutcome};
pub use state::CombatState;
pub use turn_order::TurnOrder;
