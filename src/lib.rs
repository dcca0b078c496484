//! # tactical-combat
//!
//! Deterministic rules core for a turn-based tactical combat simulator.
//!
//! ## Design Principles
//!
//! 1. **One Ordered Pipeline**: Every gameplay reaction runs through the
//!    per-combat event bus, in priority order. Handlers shape outcomes by
//!    editing the event payload they are handed.
//!
//! 2. **No Globals**: A combat owns its bus, roster, rng and turn order.
//!    Everything that needs them receives a `CombatContext`.
//!
//! 3. **Deterministic**: Same seed and same inputs give the same combat,
//!    event for event.
//!
//! ## Architecture
//!
//! - **Tombstoned Subscriptions**: Unsubscribing during a broadcast marks
//!   the entry; it is compacted at the next broadcast of that kind.
//!
//! - **Persistent Snapshots**: Subscriber lists are `im` vectors, so each
//!   broadcast walks an O(1) snapshot unaffected by re-entrant changes.
//!
//! - **Queued Actions**: Actions raised while another action resolves run
//!   after it; follow-ups (stagger, death) run first.
//!
//! ## Modules
//!
//! - `core`: ids, dice, rng, configuration, errors
//! - `events`: event types, priorities, the bus
//! - `characters`: characters, roster, decision strategies
//! - `status`: status effects and the built-in library
//! - `actions`: state mutations and their resolution
//! - `abilities`: ability model, targeting and the built-in library
//! - `combat`: context, state machine, turn order, combat log
//! - `scenario`: combat setup

pub mod abilities;
pub mod actions;
pub mod characters;
pub mod combat;
pub mod core;
pub mod events;
pub mod scenario;
pub mod status;

// Re-export commonly used types
pub use crate::core::{
    AbilityId, CharacterId, PassiveId, StatusId,
    Die, DiceList,
    CombatRng, CombatRngState,
    CombatConfig, CombatError, Result,
};

pub use crate::events::{CombatEvent, EventBus, EventHandler, EventKind, Hook, Priority, SubscriberId};

pub use crate::characters::{AbilityChoice, Character, DecisionStrategy, Faction, Passive, PureRandom, Roster};

pub use crate::status::StatusEffect;

pub use crate::actions::Action;

pub use crate::abilities::{Ability, AbilityType, ActivationGate, TargetSelection, TargetingModifier, ValidTargets};

pub use crate::combat::{CombatContext, CombatInstance, CombatLog, CombatState, TurnOrder};

pub use crate::scenario::ScenarioInfo;
