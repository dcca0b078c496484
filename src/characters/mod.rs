//! Characters and the roster that holds them.
//!
//! ## Key Components
//!
//! - [`Character`]: a combatant with pools, abilities, statuses and passives
//! - [`Roster`]: the canonical character set of one combat, with lanes
//! - [`DecisionStrategy`]: how computer-controlled characters choose

mod character;
mod roster;
mod strategy;

pub use character::{Character, Faction, Passive};
pub use roster::Roster;
pub use strategy::{AbilityChoice, DecisionStrategy, PureRandom};
