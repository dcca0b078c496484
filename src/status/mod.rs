//! Status effects.
//!
//! A [`StatusEffect`] is owned by the character carrying it. Its optional
//! behavior is a [`Hook`](crate::events::Hook) that is subscribed to the bus
//! when the effect is applied and unsubscribed when it is removed.

mod effect;
pub mod library;

pub use effect::StatusEffect;
