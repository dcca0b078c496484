//! Identifiers for combatants and the things attached to them.
//!
//! Every fighter in a combat gets a `CharacterId` from the roster when it is
//! added. Abilities, status effects and passives are identified by kind:
//! two characters carrying the same status share its `StatusId`.
//!
//! ## Usage
//!
//! ```
//! use tactical_combat::core::{AbilityId, CharacterId, StatusId};
//!
//! const BURNING: StatusId = StatusId::new(40);
//!
//! let hero = CharacterId::new(0);
//! assert_eq!(hero.index(), 0);
//! assert_eq!(format!("{}", BURNING), "Status(40)");
//! assert_ne!(AbilityId::new(1), AbilityId::new(2));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a combatant within one combat.
///
/// Allocated sequentially by the roster, so it doubles as an index.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CharacterId(pub u32);

impl CharacterId {
    /// Create a new character ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }

    /// Get the roster index for this character.
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Character({})", self.0)
    }
}

/// Ability kind identifier. The ability library defines the known kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AbilityId(pub u32);

impl AbilityId {
    /// Create a new ability ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for AbilityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ability({})", self.0)
    }
}

/// Status effect kind identifier.
///
/// Stacking rules key on this: a character never carries two effects with
/// the same `StatusId`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StatusId(pub u32);

impl StatusId {
    /// Create a new status ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for StatusId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Status({})", self.0)
    }
}

/// Passive kind identifier.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PassiveId(pub u32);

impl PassiveId {
    /// Create a new passive ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for PassiveId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Passive({})", self.0)
    }
}
