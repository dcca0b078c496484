//! The per-combat context threaded through every handler.
//!
//! `CombatContext` bundles what rules code needs during resolution: the
//! roster, the event bus, the rng and the action queue. One context exists
//! per combat; nothing is global.

use std::collections::VecDeque;
use std::rc::Rc;

use tracing::trace;

use crate::actions::Action;
use crate::characters::Roster;
use crate::core::{CharacterId, CombatConfig, CombatRng};
use crate::events::{CombatEvent, EventBus, EventKind, Hook, Priority, SubscriberId};

/// Subscriber id of the cooldown bookkeeping handler.
pub const COOLDOWN_HANDLER: SubscriberId = SubscriberId::System("cooldowns");
/// Subscriber id of the handler that keeps damage non-negative.
pub const DAMAGE_FLOOR_HANDLER: SubscriberId = SubscriberId::System("damage-floor");

/// Roster, bus, rng and pending actions of one combat.
#[derive(Debug)]
pub struct CombatContext {
    roster: Roster,
    events: EventBus,
    rng: CombatRng,
    config: CombatConfig,
    pending: VecDeque<Action>,
    resolving: bool,
    depth: u32,
}

impl CombatContext {
    /// Create a context with the system handlers installed.
    pub fn new(config: CombatConfig, roster: Roster) -> Self {
        let mut ctx = Self {
            roster,
            events: EventBus::new(),
            rng: CombatRng::new(config.seed),
            config,
            pending: VecDeque::new(),
            resolving: false,
            depth: 0,
        };
        ctx.install_system_handlers();
        ctx
    }

    fn install_system_handlers(&mut self) {
        self.events.subscribe(
            EventKind::AbilityActivated,
            COOLDOWN_HANDLER,
            Priority::IMMEDIATE,
            Rc::new(start_cooldown),
        );
        self.events.subscribe(
            EventKind::DamageDealt,
            DAMAGE_FLOOR_HANDLER,
            Priority::POST_CALCULATION,
            Rc::new(floor_damage),
        );
    }

    /// Dispatch `event` to its subscribers and return the final payload.
    ///
    /// Subscribers run in priority order, each seeing the edits of those
    /// before it. Handlers may broadcast, subscribe and unsubscribe freely:
    /// this call walks a snapshot taken on entry and skips entries
    /// unsubscribed while it runs.
    pub fn broadcast(&mut self, mut event: CombatEvent) -> CombatEvent {
        let kind = event.kind();
        let subscribers = self.events.dispatch_list(kind);
        trace!(%kind, subscribers = subscribers.len(), depth = self.depth, "broadcast");

        self.depth += 1;
        for subscription in subscribers.iter() {
            if subscription.is_removed() {
                trace!(%kind, id = %subscription.id, "skipping unsubscribed handler");
                continue;
            }
            subscription.handler.handle(&mut event, self);
        }
        self.depth -= 1;
        event
    }

    /// Run an action and everything it causes.
    ///
    /// Called while another action is resolving, the action is queued and
    /// runs once the current one (and its follow-ups) are done.
    pub fn execute(&mut self, action: Action) {
        self.pending.push_back(action);
        if self.resolving {
            trace!(queued = self.pending.len(), "action queued");
            return;
        }

        self.resolving = true;
        while let Some(next) = self.pending.pop_front() {
            let follow_ups = next.resolve(self);
            for follow_up in follow_ups.into_iter().rev() {
                self.pending.push_front(follow_up);
            }
        }
        self.resolving = false;
    }

    /// Subscribe the ability scripts, statuses and passives `id` carries.
    ///
    /// Returns how many subscriptions were added. Already-subscribed hooks
    /// are skipped, so calling this twice is harmless.
    pub fn register_fighter_hooks(&mut self, id: CharacterId) -> usize {
        let Some(character) = self.roster.standing(id) else {
            return 0;
        };
        let abilities = character.abilities().iter().filter_map(|a| {
            a.script().map(|hook| {
                (SubscriberId::Ability { owner: id, ability: a.id() }, Rc::clone(hook))
            })
        });
        let statuses = character.statuses().iter().filter_map(|s| {
            s.behavior.as_ref().map(|hook| {
                (SubscriberId::Status { owner: id, status: s.id }, Rc::clone(hook))
            })
        });
        let passives = character.passives().iter().map(|p| {
            (SubscriberId::Passive { owner: id, passive: p.id }, Rc::clone(&p.hook))
        });
        let hooks: Vec<(SubscriberId, Rc<dyn Hook>)> =
            abilities.chain(statuses).chain(passives).collect();

        hooks
            .iter()
            .map(|(subscriber, hook)| self.events.subscribe_hook(*subscriber, id, hook))
            .sum()
    }

    #[must_use]
    pub fn roster(&self) -> &Roster {
        &self.roster
    }

    pub fn roster_mut(&mut self) -> &mut Roster {
        &mut self.roster
    }

    #[must_use]
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn rng_mut(&mut self) -> &mut CombatRng {
        &mut self.rng
    }

    #[must_use]
    pub fn config(&self) -> &CombatConfig {
        &self.config
    }

    /// Is an action being resolved right now?
    #[must_use]
    pub fn is_resolving(&self) -> bool {
        self.resolving
    }
}

fn start_cooldown(event: &mut CombatEvent, ctx: &mut CombatContext) {
    if let CombatEvent::AbilityActivated { caster, ability, .. } = *event {
        if let Some(equipped) = ctx
            .roster_mut()
            .get_mut(caster)
            .and_then(|c| c.ability_mut(ability))
        {
            equipped.start_cooldown();
            trace!(%caster, %ability, rounds = equipped.cooldown_remaining(), "cooldown started");
        }
    }
}

fn floor_damage(event: &mut CombatEvent, _ctx: &mut CombatContext) {
    if let CombatEvent::DamageDealt { amount, .. } = event {
        *amount = (*amount).max(0);
    }
}
