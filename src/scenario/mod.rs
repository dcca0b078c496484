//! Scenario setup: who fights, and where they start.

use std::rc::Rc;

use crate::abilities::library;
use crate::characters::{Character, Faction, PureRandom, Roster};
use crate::core::{CombatError, Result};

/// The fighters of an encounter and their starting lanes.
#[derive(Clone, Debug, Default)]
pub struct ScenarioInfo {
    fighters: Vec<(Character, usize)>,
}

impl ScenarioInfo {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a fighter starting in `lane` (builder pattern).
    #[must_use]
    pub fn with_fighter(mut self, character: Character, lane: usize) -> Self {
        self.fighters.push((character, lane));
        self
    }

    #[must_use]
    pub fn fighters(&self) -> &[(Character, usize)] {
        &self.fighters
    }

    /// Check the scenario fits on a board of `lane_count` lanes.
    pub fn validate(&self, lane_count: usize) -> Result<()> {
        if self.fighters.is_empty() {
            return Err(CombatError::InvalidConfig("scenario has no fighters".into()));
        }
        if let Some((character, lane)) = self.fighters.iter().find(|(_, lane)| *lane >= lane_count) {
            return Err(CombatError::InvalidConfig(format!(
                "{} starts in lane {lane}, board has {lane_count} lanes",
                character.name
            )));
        }
        Ok(())
    }

    /// Build the roster. Ids follow the order fighters were added.
    pub(crate) fn into_roster(self, lane_count: usize) -> Roster {
        let mut roster = Roster::new(lane_count);
        for (character, lane) in self.fighters {
            roster.add(character, lane);
        }
        roster
    }

    /// A small demo fight: one player-controlled duelist against two
    /// computer-controlled dummies.
    pub fn skirmish() -> Self {
        let quill = Character::new("Quill", Faction::Player)
            .with_hp(40)
            .with_poise(12)
            .with_speed(3, 7)
            .with_ability(library::have_at_thee())
            .with_ability(library::thwack())
            .with_ability(library::retreat())
            .with_ability(library::riposte());

        let dummy = |name: &str| {
            Character::new(name, Faction::Enemy)
                .with_hp(20)
                .with_poise(8)
                .with_speed(1, 5)
                .with_strategy(Rc::new(PureRandom))
                .with_ability(library::thwack())
                .with_ability(library::relentless_stabbing())
                .with_ability(library::riposte())
        };

        Self::new()
            .with_fighter(quill, 2)
            .with_fighter(dummy("Test Dummy A"), 3)
            .with_fighter(dummy("Test Dummy B").with_ability(library::discharge()), 5)
    }
}
