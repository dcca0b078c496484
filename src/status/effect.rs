//! Status effect instances.

use std::rc::Rc;

use crate::core::{CharacterId, StatusId};
use crate::events::Hook;

/// A status effect carried by a character.
///
/// `stacks == 0` marks a non-stacking effect. Applying an effect whose id the
/// target already carries never creates a second instance.
#[derive(Clone, Debug)]
pub struct StatusEffect {
    pub id: StatusId,
    pub name: String,
    pub description: String,
    pub stacks: u32,
    /// Rounds left; `None` lasts until removed.
    pub duration: Option<u32>,
    /// Who applied it.
    pub source: Option<CharacterId>,
    /// Reactive behavior, subscribed while the effect is attached.
    pub behavior: Option<Rc<dyn Hook>>,
}

impl StatusEffect {
    /// A non-stacking, permanent effect with no behavior.
    pub fn new(id: StatusId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            description: String::new(),
            stacks: 0,
            duration: None,
            source: None,
            behavior: None,
        }
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Make the effect stackable, starting at `stacks`.
    #[must_use]
    pub fn with_stacks(mut self, stacks: u32) -> Self {
        self.stacks = stacks;
        self
    }

    #[must_use]
    pub fn with_duration(mut self, rounds: u32) -> Self {
        self.duration = Some(rounds);
        self
    }

    #[must_use]
    pub fn with_source(mut self, source: CharacterId) -> Self {
        self.source = Some(source);
        self
    }

    #[must_use]
    pub fn with_behavior(mut self, behavior: Rc<dyn Hook>) -> Self {
        self.behavior = Some(behavior);
        self
    }

    #[must_use]
    pub fn is_stackable(&self) -> bool {
        self.stacks > 0
    }
}

impl std::fmt::Display for StatusEffect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name)?;
        if self.is_stackable() {
            write!(f, " x{}", self.stacks)?;
        }
        if let Some(rounds) = self.duration {
            write!(f, " ({rounds} rounds)")?;
        }
        Ok(())
    }
}
