//! Dice: the atomic unit of random resolution.
//!
//! A die has inclusive bounds, a natural value (what the rng produced) and an
//! actual value that handlers may modify after the roll. Natural min/max
//! flags are derived from the natural value, never stored.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::rng::CombatRng;

/// The dice an ability brings into resolution.
///
/// Most abilities carry one to three dice.
pub type DiceList = SmallVec<[Die; 4]>;

/// A single die.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    min: i32,
    max: i32,
    natural: Option<i32>,
    value: Option<i32>,
}

impl Die {
    /// Create a die with inclusive bounds. Reversed bounds are swapped.
    #[must_use]
    pub const fn new(min: i32, max: i32) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            min,
            max,
            natural: None,
            value: None,
        }
    }

    /// A die that always rolls `value`.
    #[must_use]
    pub const fn fixed(value: i32) -> Self {
        Self::new(value, value)
    }

    #[must_use]
    pub const fn min(&self) -> i32 {
        self.min
    }

    #[must_use]
    pub const fn max(&self) -> i32 {
        self.max
    }

    /// Roll the die, setting both the natural and actual value.
    pub fn roll(&mut self, rng: &mut CombatRng) -> i32 {
        let rolled = rng.roll(self.min, self.max);
        self.natural = Some(rolled);
        self.value = Some(rolled);
        rolled
    }

    /// Has this die been rolled since creation or the last reset?
    #[must_use]
    pub const fn is_rolled(&self) -> bool {
        self.natural.is_some()
    }

    /// The value the rng produced.
    #[must_use]
    pub const fn natural(&self) -> Option<i32> {
        self.natural
    }

    /// The value after modifications.
    #[must_use]
    pub const fn value(&self) -> Option<i32> {
        self.value
    }

    /// The actual value, or zero when unrolled.
    #[must_use]
    pub fn value_or_zero(&self) -> i32 {
        self.value.unwrap_or(0)
    }

    /// Override the actual value. The natural value is untouched.
    pub fn set_value(&mut self, value: i32) {
        self.value = Some(value);
    }

    /// Add `delta` to the actual value. No effect on an unrolled die.
    pub fn modify(&mut self, delta: i32) {
        if let Some(value) = self.value.as_mut() {
            *value = value.saturating_add(delta);
        }
    }

    #[must_use]
    pub fn rolled_natural_min(&self) -> bool {
        self.natural == Some(self.min)
    }

    #[must_use]
    pub fn rolled_natural_max(&self) -> bool {
        self.natural == Some(self.max)
    }

    /// Forget the last roll.
    pub fn reset(&mut self) {
        self.natural = None;
        self.value = None;
    }
}

impl std::fmt::Display for Die {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.value {
            Some(value) => write!(f, "[{}-{}]={}", self.min, self.max, value),
            None => write!(f, "[{}-{}]", self.min, self.max),
        }
    }
}
