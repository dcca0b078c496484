//! The combat state machine.
//!
//! `CombatInstance` drives one encounter from `Idle` to `CombatEnd`. Every
//! transition broadcasts `StateChanged` and then resolves the new state,
//! which usually picks the next state by itself. The loop stops at the two
//! suspension points, where it waits for [`CombatInstance::submit_ability_input`]
//! or [`CombatInstance::submit_reaction`], and at `CombatEnd`.
//!
//! Characters with a [`DecisionStrategy`](crate::characters::DecisionStrategy)
//! are asked for their choices in place, so a combat between computer-
//! controlled sides runs to completion from [`CombatInstance::start`].

use tracing::{debug, info, warn};

use crate::abilities::{Ability, AbilityType, TargetSelection};
use crate::actions::Action;
use crate::characters::{Faction, Roster};
use crate::core::{AbilityId, CharacterId, CombatConfig, CombatError, Result};
use crate::events::CombatEvent;
use crate::scenario::ScenarioInfo;

use super::context::CombatContext;
use super::resolution::{resolve_clash, resolve_unopposed, Activation};
use super::state::CombatState;
use super::turn_order::TurnOrder;

/// An attack waiting for resolution, possibly answered by a reaction.
#[derive(Clone, Debug)]
struct PendingResolution {
    attack: Activation,
    defender: Option<CharacterId>,
    eligible: Vec<AbilityId>,
    reaction: Option<Activation>,
}

/// One combat encounter.
#[derive(Debug)]
pub struct CombatInstance {
    ctx: CombatContext,
    state: CombatState,
    round: u32,
    turn_order: TurnOrder,
    active: Option<CharacterId>,
    actions_remaining: u32,
    forfeited: bool,
    pending: Option<PendingResolution>,
    victor: Option<Faction>,
    /// Set once any ability is activated during the current round.
    round_active: bool,
    /// HP, poise and lane of every fighter at the start of the round.
    round_snapshot: Vec<(CharacterId, i32, i32, usize)>,
}

impl CombatInstance {
    /// Set up a combat. Nothing is broadcast until [`start`](Self::start).
    pub fn new(config: CombatConfig, scenario: ScenarioInfo) -> Result<Self> {
        config.validate()?;
        scenario.validate(config.lane_count)?;
        let roster = scenario.into_roster(config.lane_count);
        Ok(Self {
            ctx: CombatContext::new(config, roster),
            state: CombatState::Idle,
            round: 0,
            turn_order: TurnOrder::new(),
            active: None,
            actions_remaining: 0,
            forfeited: false,
            pending: None,
            victor: None,
            round_active: false,
            round_snapshot: Vec::new(),
        })
    }

    /// Begin the combat and run until the first suspension point.
    pub fn start(&mut self) -> Result<()> {
        if self.state != CombatState::Idle {
            return Err(self.rejected("combat start"));
        }
        info!(
            seed = self.ctx.config().seed,
            fighters = self.ctx.roster().len(),
            "combat starting"
        );
        self.change_state(CombatState::CombatStart);
        Ok(())
    }

    /// Use an ability for the active character.
    ///
    /// While a clash window is open this is treated as the defender's
    /// reaction choice, and only an eligible reaction is accepted.
    pub fn submit_ability_input(
        &mut self,
        ability: AbilityId,
        selection: TargetSelection,
    ) -> Result<()> {
        match self.state {
            CombatState::AwaitingAbilityInput => {
                let caster = self
                    .active
                    .ok_or_else(|| self.rejected("ability input"))?;
                let next = self.activate(caster, ability, selection)?;
                self.change_state(next);
                Ok(())
            }
            CombatState::AwaitingClashInput => self.submit_reaction(Some(ability)),
            _ => Err(self.rejected("ability input")),
        }
    }

    /// Answer the open clash window with a reaction, or `None` to take the hit.
    pub fn submit_reaction(&mut self, reaction: Option<AbilityId>) -> Result<()> {
        if self.state != CombatState::AwaitingClashInput {
            return Err(self.rejected("clash input"));
        }
        self.react(reaction)?;
        self.change_state(CombatState::ResolveAbilities);
        Ok(())
    }

    /// End the active character's turn without using its remaining actions.
    pub fn end_turn(&mut self) -> Result<()> {
        if self.state != CombatState::AwaitingAbilityInput {
            return Err(self.rejected("end of turn"));
        }
        self.change_state(CombatState::TurnEnd);
        Ok(())
    }

    #[must_use]
    pub fn state(&self) -> CombatState {
        self.state
    }

    /// Current round, starting at 1. Zero before the first round.
    #[must_use]
    pub fn round(&self) -> u32 {
        self.round
    }

    /// The character whose turn it is.
    #[must_use]
    pub fn active_character(&self) -> Option<CharacterId> {
        self.active
    }

    #[must_use]
    pub fn actions_remaining(&self) -> u32 {
        self.actions_remaining
    }

    #[must_use]
    pub fn turn_order(&self) -> &TurnOrder {
        &self.turn_order
    }

    /// The defender of the open clash window.
    #[must_use]
    pub fn clash_defender(&self) -> Option<CharacterId> {
        match self.state {
            CombatState::AwaitingClashInput => self.pending.as_ref().and_then(|p| p.defender),
            _ => None,
        }
    }

    /// Reactions the defender may answer the open clash window with.
    #[must_use]
    pub fn eligible_reactions(&self) -> &[AbilityId] {
        match (self.state, &self.pending) {
            (CombatState::AwaitingClashInput, Some(pending)) => &pending.eligible,
            _ => &[],
        }
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        self.ctx.roster()
    }

    #[must_use]
    pub fn context(&self) -> &CombatContext {
        &self.ctx
    }

    /// Mutable access for attaching observers and test setup.
    pub fn context_mut(&mut self) -> &mut CombatContext {
        &mut self.ctx
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.state.is_terminal()
    }

    /// The winning faction, once the combat is over.
    #[must_use]
    pub fn victor(&self) -> Option<Faction> {
        self.victor
    }

    fn rejected(&self, expected: &'static str) -> CombatError {
        debug!(state = %self.state, expected, "input rejected");
        CombatError::NotAwaitingInput {
            state: self.state,
            expected,
        }
    }

    /// Move to `next` and keep resolving until a state asks to wait.
    ///
    /// Requesting the current state does nothing.
    fn change_state(&mut self, next: CombatState) {
        let mut next = Some(next);
        while let Some(to) = next.take() {
            if to == self.state {
                debug!(state = %to, "already in requested state");
                return;
            }
            let from = self.state;
            self.state = to;
            debug!(%from, %to, round = self.round, "state changed");
            self.ctx.broadcast(CombatEvent::StateChanged { from, to });
            next = self.resolve_state();
        }
    }

    /// Run the current state's logic. `None` means wait.
    fn resolve_state(&mut self) -> Option<CombatState> {
        match self.state {
            CombatState::Idle => None,
            CombatState::CombatStart => {
                for id in self.ctx.roster().fighter_ids() {
                    self.ctx.register_fighter_hooks(id);
                }
                self.ctx.broadcast(CombatEvent::CombatStart);
                Some(self.unless_decided(CombatState::RoundStart))
            }
            CombatState::RoundStart => {
                self.round += 1;
                self.round_active = false;
                self.round_snapshot = self.fighter_snapshot();
                info!(round = self.round, "round start");
                self.ctx.broadcast(CombatEvent::RoundStart { round: self.round });
                self.turn_order.roll(&mut self.ctx);
                Some(self.next_turn())
            }
            CombatState::TurnStart => Some(self.start_turn()),
            CombatState::AwaitingAbilityInput => self.await_ability_input(),
            CombatState::AwaitingClashInput => self.await_clash_input(),
            CombatState::ResolveAbilities => {
                if let Some(pending) = self.pending.take() {
                    match &pending.reaction {
                        Some(reaction) => {
                            let outcome = resolve_clash(&mut self.ctx, &pending.attack, reaction);
                            debug!(?outcome, "clash resolved");
                        }
                        None => resolve_unopposed(&mut self.ctx, &pending.attack),
                    }
                }
                Some(self.unless_decided(self.after_action()))
            }
            CombatState::TurnEnd => {
                if let Some(character) = self.active.take() {
                    self.ctx.broadcast(CombatEvent::TurnEnd {
                        character,
                        forfeited: self.forfeited,
                    });
                }
                self.forfeited = false;
                self.actions_remaining = 0;
                if self.ctx.roster().is_decided() {
                    Some(CombatState::CombatEnd)
                } else {
                    Some(self.next_turn())
                }
            }
            CombatState::RoundEnd => {
                self.ctx.broadcast(CombatEvent::RoundEnd { round: self.round });
                // Judged before ticking, which could free an ability next round
                let stalled = self.is_stalled();
                self.tick_round();
                let limit_reached = self
                    .ctx
                    .config()
                    .max_rounds
                    .is_some_and(|limit| self.round >= limit);
                if limit_reached {
                    info!(round = self.round, "round limit reached");
                    Some(CombatState::CombatEnd)
                } else if stalled {
                    info!(round = self.round, "stalemate, nobody can act");
                    Some(CombatState::CombatEnd)
                } else {
                    Some(self.unless_decided(CombatState::RoundStart))
                }
            }
            CombatState::CombatEnd => {
                self.active = None;
                self.pending = None;
                self.victor = self.ctx.roster().sole_faction();
                self.ctx
                    .broadcast(CombatEvent::CombatEnd { victor: self.victor });
                self.ctx.events_mut().clear();
                info!(victor = ?self.victor, rounds = self.round, "combat over");
                None
            }
        }
    }

    fn unless_decided(&self, next: CombatState) -> CombatState {
        if self.ctx.roster().is_decided() {
            CombatState::CombatEnd
        } else {
            next
        }
    }

    /// Hand the turn to the next character, or end the round.
    fn next_turn(&mut self) -> CombatState {
        match self.turn_order.next(self.ctx.roster()) {
            Some(character) => {
                self.active = Some(character);
                CombatState::TurnStart
            }
            None => CombatState::RoundEnd,
        }
    }

    fn start_turn(&mut self) -> CombatState {
        let Some(character) = self.active else {
            return self.next_turn();
        };
        self.actions_remaining = self
            .ctx
            .roster()
            .get(character)
            .map_or(0, |c| c.actions_per_turn);
        debug!(%character, actions = self.actions_remaining, "turn start");

        let event = self.ctx.broadcast(CombatEvent::TurnStart {
            character,
            forfeit: false,
        });
        self.forfeited = matches!(event, CombatEvent::TurnStart { forfeit: true, .. });
        if self.forfeited {
            debug!(%character, "turn forfeited");
            return CombatState::TurnEnd;
        }
        self.after_action()
    }

    /// Where to go once the active character may (or may not) act again.
    fn after_action(&self) -> CombatState {
        let can_act = self
            .active
            .is_some_and(|id| self.ctx.roster().is_standing(id));
        if can_act && self.actions_remaining > 0 {
            CombatState::AwaitingAbilityInput
        } else {
            CombatState::TurnEnd
        }
    }

    fn await_ability_input(&mut self) -> Option<CombatState> {
        if self.ctx.roster().is_decided() {
            return Some(CombatState::CombatEnd);
        }
        let character = self.active?;
        let strategy = self
            .ctx
            .roster()
            .get(character)
            .and_then(|c| c.strategy().cloned())?;

        let Some(choice) = strategy.choose_ability(character, &mut self.ctx) else {
            debug!(%character, "strategy passed");
            return Some(CombatState::TurnEnd);
        };
        match self.activate(character, choice.ability, choice.selection) {
            Ok(next) => Some(next),
            Err(err) => {
                warn!(%character, %err, "strategy chose an unusable ability, ending turn");
                Some(CombatState::TurnEnd)
            }
        }
    }

    fn await_clash_input(&mut self) -> Option<CombatState> {
        let pending = self.pending.as_ref()?;
        let defender = pending.defender?;
        let eligible = pending.eligible.clone();
        let strategy = self
            .ctx
            .roster()
            .get(defender)
            .and_then(|c| c.strategy().cloned())?;

        let choice = strategy.choose_reaction(defender, &eligible, &mut self.ctx);
        if let Err(err) = self.react(choice) {
            warn!(%defender, %err, "strategy chose an unusable reaction, taking the hit");
        }
        Some(CombatState::ResolveAbilities)
    }

    /// Validate and activate an ability, returning the state to move to.
    fn activate(
        &mut self,
        caster: CharacterId,
        ability: AbilityId,
        selection: TargetSelection,
    ) -> Result<CombatState> {
        let roster = self.ctx.roster();
        let character = roster
            .standing(caster)
            .ok_or(CombatError::UnknownCharacter(caster))?;
        let equipped = character
            .ability(ability)
            .ok_or(CombatError::AbilityNotEquipped {
                character: caster,
                ability,
            })?;
        if !equipped.kind.is_proactive() || !equipped.is_activatable(caster, roster) {
            return Err(CombatError::NotActivatable(ability));
        }
        if !equipped.valid_targets(caster, roster).contains(&selection) {
            return Err(CombatError::InvalidTarget(ability));
        }
        let is_attack = equipped.kind == AbilityType::Attack;
        let dice = equipped.base_dice().clone();

        let (targets, lanes) = match selection {
            TargetSelection::Units(units) => (units, Vec::new()),
            TargetSelection::Lanes(lanes) => (Vec::new(), lanes),
        };
        debug!(%caster, %ability, ?targets, ?lanes, "ability activated");
        let event = self.ctx.broadcast(CombatEvent::ability_activated(
            caster, ability, dice, targets, lanes,
        ));
        let attack = Activation::from_event(event).unwrap_or_else(|| Activation::empty(caster, ability));
        self.actions_remaining = self.actions_remaining.saturating_sub(1);
        self.round_active = true;

        let mut pending = PendingResolution {
            attack,
            defender: None,
            eligible: Vec::new(),
            reaction: None,
        };
        if is_attack {
            if let Some(defender) = pending.attack.single_target() {
                let reactions = self.reactions_against(defender, caster);
                if !reactions.is_empty() {
                    self.ctx.broadcast(CombatEvent::ClashEligible {
                        attacker: caster,
                        defender,
                        ability,
                        reactions: reactions.clone(),
                    });
                    pending.defender = Some(defender);
                    pending.eligible = reactions;
                    self.pending = Some(pending);
                    return Ok(CombatState::AwaitingClashInput);
                }
            }
        }
        self.pending = Some(pending);
        Ok(CombatState::ResolveAbilities)
    }

    /// Reactions `defender` could use against `attacker` right now.
    fn reactions_against(&self, defender: CharacterId, attacker: CharacterId) -> Vec<AbilityId> {
        let roster = self.ctx.roster();
        let Some(character) = roster.standing(defender) else {
            return Vec::new();
        };
        let target = TargetSelection::unit(attacker);
        character
            .abilities()
            .iter()
            .filter(|a| {
                a.kind == AbilityType::Reaction
                    && a.is_activatable(defender, roster)
                    && a.valid_targets(defender, roster).contains(&target)
            })
            .map(Ability::id)
            .collect()
    }

    /// Record the defender's reaction choice on the pending attack.
    fn react(&mut self, choice: Option<AbilityId>) -> Result<()> {
        let Some(pending) = self.pending.as_ref() else {
            return Err(self.rejected("clash input"));
        };
        let (Some(defender), attacker) = (pending.defender, pending.attack.caster) else {
            return Err(self.rejected("clash input"));
        };
        let Some(reaction) = choice else {
            debug!(%defender, "no reaction");
            return Ok(());
        };
        if !pending.eligible.contains(&reaction)
            || !self.reactions_against(defender, attacker).contains(&reaction)
        {
            return Err(CombatError::NotAReaction(reaction));
        }

        let dice = self
            .ctx
            .roster()
            .get(defender)
            .and_then(|c| c.ability(reaction))
            .map(|a| a.base_dice().clone())
            .unwrap_or_default();
        debug!(%defender, %reaction, %attacker, "reaction chosen");
        let event = self.ctx.broadcast(CombatEvent::ability_activated(
            defender,
            reaction,
            dice,
            vec![attacker],
            Vec::new(),
        ));
        let activation =
            Activation::from_event(event).unwrap_or_else(|| Activation::empty(defender, reaction));
        if let Some(pending) = self.pending.as_mut() {
            pending.reaction = Some(activation);
        }
        Ok(())
    }

    fn fighter_snapshot(&self) -> Vec<(CharacterId, i32, i32, usize)> {
        self.ctx
            .roster()
            .fighters()
            .map(|c| (c.id(), c.cur_hp, c.cur_poise, c.position))
            .collect()
    }

    /// True when a computer-only combat went a whole round without anything
    /// happening and nothing is left to count down.
    fn is_stalled(&self) -> bool {
        if self.round_active || self.fighter_snapshot() != self.round_snapshot {
            return false;
        }
        self.ctx.roster().fighters().all(|c| {
            c.is_ai_controlled()
                && c.abilities().iter().all(Ability::is_available)
                && c
                    .statuses()
                    .iter()
                    .all(|s| s.duration.is_none() && !s.is_stackable())
        })
    }

    /// Round-end bookkeeping: cooldowns and status durations.
    fn tick_round(&mut self) {
        let mut expired = Vec::new();
        for id in self.ctx.roster().fighter_ids() {
            let Some(character) = self.ctx.roster_mut().get_mut(id) else {
                continue;
            };
            for ability in character.abilities_mut() {
                ability.tick_cooldown();
            }
            for status in character.statuses_mut() {
                if let Some(rounds) = status.duration.as_mut() {
                    *rounds = rounds.saturating_sub(1);
                    if *rounds == 0 {
                        expired.push((id, status.id));
                    }
                }
            }
        }
        for (id, status) in expired {
            self.ctx.execute(Action::remove_status(id, status));
        }
    }
}
