//! Abilities: cooldowns, targeting and activation.
//!
//! ## Key Components
//!
//! - [`Ability`]: range, dice, cooldown and an optional script
//! - [`ActivationGate`]: combat-wide conditions on activation
//! - [`TargetSelection`] / [`ValidTargets`]: what an activation aims at
//! - [`library`]: the built-in abilities
//!
//! Activation itself is driven by the combat state machine: it broadcasts
//! `AbilityActivated`, and the cooldown is started by a system handler at
//! [`Priority::IMMEDIATE`](crate::events::Priority::IMMEDIATE), ahead of any
//! ability script.

mod ability;
pub mod library;
mod targeting;

pub use ability::{Ability, AbilityType, ActivationGate};
pub use targeting::{TargetSelection, TargetingModifier, ValidTargets};
