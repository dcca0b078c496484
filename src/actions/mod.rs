//! Actions: the only way rules code mutates characters.
//!
//! ## Key Components
//!
//! - [`Action`]: apply status, deal damage, remove status, move, defeat
//! - `Action::resolve`: runs one action and returns its follow-ups
//!
//! Actions are run through
//! [`CombatContext::execute`](crate::combat::CombatContext::execute), which
//! queues them when called from inside another action's resolution.

mod action;
mod resolver;

pub use action::Action;
