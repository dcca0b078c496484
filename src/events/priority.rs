//! Dispatch priority bands.
//!
//! Higher values run first. Handlers pick the band that matches what they
//! do, so ordering intent is visible at the subscription site:
//!
//! | Band | Value | Typical handler |
//! |---|---|---|
//! | `IMMEDIATE` | 100 000 | cooldown bookkeeping, "prevent death" |
//! | `DICE_QUEUE` | 900 | add/remove dice from an activation |
//! | `DICE_CONVERSION` | 800 | change what a die is |
//! | `ADDITIVE` | 700 | +N modifiers |
//! | `MULTIPLICATIVE` | 600 | xN modifiers |
//! | `STANDARD` | 500 | gameplay effects (apply status, move) |
//! | `POST_CALCULATION` | 100 | clamps and guards on final values |
//! | `OBSERVER` | 0 | logs and presentation; sees final state |
//!
//! Custom values between bands are allowed via [`Priority::offset`].

use serde::{Deserialize, Serialize};

/// Subscription priority. Higher runs earlier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Priority(pub i32);

impl Priority {
    pub const IMMEDIATE: Priority = Priority(100_000);
    pub const DICE_QUEUE: Priority = Priority(900);
    pub const DICE_CONVERSION: Priority = Priority(800);
    pub const ADDITIVE: Priority = Priority(700);
    pub const MULTIPLICATIVE: Priority = Priority(600);
    pub const STANDARD: Priority = Priority(500);
    pub const POST_CALCULATION: Priority = Priority(100);
    pub const OBSERVER: Priority = Priority(0);

    /// Create a custom priority.
    #[must_use]
    pub const fn new(value: i32) -> Self {
        Self(value)
    }

    /// Get the raw value.
    #[must_use]
    pub const fn raw(self) -> i32 {
        self.0
    }

    /// A priority `delta` above (positive) or below (negative) this one.
    #[must_use]
    pub const fn offset(self, delta: i32) -> Self {
        Self(self.0.saturating_add(delta))
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::STANDARD
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Priority({})", self.0)
    }
}
