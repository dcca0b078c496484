//! Event bus integration tests.
//!
//! These tests verify dispatch ordering, payload threading and the
//! re-entrancy rules: unsubscribing, subscribing and broadcasting from
//! inside a handler.

use std::cell::RefCell;
use std::rc::Rc;

use proptest::prelude::*;

use tactical_combat::characters::Roster;
use tactical_combat::combat::CombatContext;
use tactical_combat::core::{CharacterId, CombatConfig};
use tactical_combat::events::{CombatEvent, EventKind, Priority, SubscriberId};

type Trace = Rc<RefCell<Vec<u32>>>;

fn context() -> CombatContext {
    CombatContext::new(CombatConfig::new(42), Roster::new(8))
}

/// Subscribe an observer that records `n` each time it runs.
fn recorder(ctx: &mut CombatContext, kind: EventKind, n: u32, priority: Priority, trace: &Trace) {
    let trace = Rc::clone(trace);
    ctx.events_mut().subscribe(
        kind,
        SubscriberId::Observer(n),
        priority,
        Rc::new(move |_: &mut CombatEvent, _: &mut CombatContext| trace.borrow_mut().push(n)),
    );
}

fn round_start() -> CombatEvent {
    CombatEvent::RoundStart { round: 1 }
}

// =============================================================================
// Ordering
// =============================================================================

proptest! {
    /// Any subscriber set runs in non-increasing priority order, ties in
    /// subscription order.
    #[test]
    fn test_dispatch_order_property(priorities in prop::collection::vec(-3i32..4, 0..24)) {
        let mut ctx = context();
        let trace: Trace = Rc::default();
        for (n, priority) in priorities.iter().enumerate() {
            recorder(&mut ctx, EventKind::RoundStart, n as u32, Priority::new(*priority), &trace);
        }

        ctx.broadcast(round_start());

        let order = trace.borrow();
        prop_assert_eq!(order.len(), priorities.len());
        for pair in order.windows(2) {
            let (a, b) = (pair[0] as usize, pair[1] as usize);
            prop_assert!(
                priorities[a] > priorities[b] || (priorities[a] == priorities[b] && a < b),
                "{} (priority {}) ran before {} (priority {})",
                a, priorities[a], b, priorities[b]
            );
        }
    }
}

/// Named bands run in their documented order.
#[test]
fn test_bands_dispatch_in_order() {
    let mut ctx = context();
    let trace: Trace = Rc::default();
    recorder(&mut ctx, EventKind::Clash, 1, Priority::OBSERVER, &trace);
    recorder(&mut ctx, EventKind::Clash, 2, Priority::STANDARD, &trace);
    recorder(&mut ctx, EventKind::Clash, 3, Priority::IMMEDIATE, &trace);
    recorder(&mut ctx, EventKind::Clash, 4, Priority::ADDITIVE, &trace);
    recorder(&mut ctx, EventKind::Clash, 5, Priority::POST_CALCULATION, &trace);
    recorder(&mut ctx, EventKind::Clash, 6, Priority::STANDARD.offset(1), &trace);

    ctx.broadcast(CombatEvent::Clash {
        attacker: CharacterId::new(0),
        defender: CharacterId::new(1),
        attack: tactical_combat::core::AbilityId::new(1),
        reaction: tactical_combat::core::AbilityId::new(2),
        attacker_roll: 3,
        defender_roll: 4,
    });

    assert_eq!(*trace.borrow(), vec![3, 4, 6, 2, 5, 1]);
}

/// Broadcasting to a kind nobody listens to returns the event unchanged.
#[test]
fn test_broadcast_without_subscribers() {
    let mut ctx = context();
    let event = CombatEvent::UnitMoved {
        character: CharacterId::new(3),
        from: 1,
        to: 2,
    };
    assert_eq!(ctx.broadcast(event.clone()), event);
}

// =============================================================================
// Payload threading
// =============================================================================

/// Each handler sees the previous handlers' edits; the caller gets the last.
#[test]
fn test_payload_edits_thread_through() {
    let mut ctx = context();
    let seen = Rc::new(RefCell::new(Vec::new()));

    ctx.events_mut().subscribe(
        EventKind::DamageDealt,
        SubscriberId::Observer(1),
        Priority::ADDITIVE,
        Rc::new(|event: &mut CombatEvent, _: &mut CombatContext| {
            if let CombatEvent::DamageDealt { amount, .. } = event {
                *amount += 3;
            }
        }),
    );
    ctx.events_mut().subscribe(
        EventKind::DamageDealt,
        SubscriberId::Observer(2),
        Priority::MULTIPLICATIVE,
        Rc::new(|event: &mut CombatEvent, _: &mut CombatContext| {
            if let CombatEvent::DamageDealt { amount, .. } = event {
                *amount *= 2;
            }
        }),
    );
    let log = Rc::clone(&seen);
    ctx.events_mut().subscribe(
        EventKind::DamageDealt,
        SubscriberId::Observer(3),
        Priority::OBSERVER,
        Rc::new(move |event: &mut CombatEvent, _: &mut CombatContext| {
            if let CombatEvent::DamageDealt { amount, .. } = event {
                log.borrow_mut().push(*amount);
            }
        }),
    );

    let event = ctx.broadcast(CombatEvent::damage_dealt(None, CharacterId::new(0), 2, false));
    assert_eq!(event, CombatEvent::damage_dealt(None, CharacterId::new(0), 10, false));
    assert_eq!(*seen.borrow(), vec![10]);
}

// =============================================================================
// Re-entrancy
// =============================================================================

/// A handler unsubscribing itself mid-broadcast skips and repeats nothing.
#[test]
fn test_unsubscribe_self_during_broadcast() {
    let mut ctx = context();
    let trace: Trace = Rc::default();
    recorder(&mut ctx, EventKind::RoundStart, 1, Priority::IMMEDIATE, &trace);

    let log = Rc::clone(&trace);
    ctx.events_mut().subscribe(
        EventKind::RoundStart,
        SubscriberId::Observer(2),
        Priority::STANDARD,
        Rc::new(move |_: &mut CombatEvent, ctx: &mut CombatContext| {
            log.borrow_mut().push(2);
            ctx.events_mut()
                .unsubscribe(EventKind::RoundStart, SubscriberId::Observer(2));
        }),
    );
    recorder(&mut ctx, EventKind::RoundStart, 3, Priority::STANDARD, &trace);
    recorder(&mut ctx, EventKind::RoundStart, 4, Priority::OBSERVER, &trace);

    ctx.broadcast(round_start());
    assert_eq!(*trace.borrow(), vec![1, 2, 3, 4]);
    assert_eq!(ctx.events().tombstone_count(EventKind::RoundStart), 1);

    trace.borrow_mut().clear();
    ctx.broadcast(round_start());
    assert_eq!(*trace.borrow(), vec![1, 3, 4]);
    assert_eq!(ctx.events().tombstone_count(EventKind::RoundStart), 0);
}

/// Unsubscribing a handler that has not run yet prevents it from running.
#[test]
fn test_unsubscribe_later_handler_during_broadcast() {
    let mut ctx = context();
    let trace: Trace = Rc::default();

    ctx.events_mut().subscribe(
        EventKind::TurnEnd,
        SubscriberId::Observer(1),
        Priority::IMMEDIATE,
        Rc::new(|_: &mut CombatEvent, ctx: &mut CombatContext| {
            ctx.events_mut().unsubscribe_all(SubscriberId::Observer(2));
        }),
    );
    recorder(&mut ctx, EventKind::TurnEnd, 2, Priority::STANDARD, &trace);
    recorder(&mut ctx, EventKind::TurnEnd, 3, Priority::STANDARD, &trace);

    ctx.broadcast(CombatEvent::TurnEnd {
        character: CharacterId::new(0),
        forfeited: false,
    });
    assert_eq!(*trace.borrow(), vec![3]);
}

/// Subscribers added mid-broadcast start with the next broadcast.
#[test]
fn test_subscribe_during_broadcast() {
    let mut ctx = context();
    let trace: Trace = Rc::default();

    let log = Rc::clone(&trace);
    ctx.events_mut().subscribe(
        EventKind::RoundStart,
        SubscriberId::Observer(1),
        Priority::STANDARD,
        Rc::new(move |_: &mut CombatEvent, ctx: &mut CombatContext| {
            log.borrow_mut().push(1);
            let inner = Rc::clone(&log);
            // Higher priority than the running handler; duplicate adds are ignored
            ctx.events_mut().subscribe(
                EventKind::RoundStart,
                SubscriberId::Observer(2),
                Priority::IMMEDIATE,
                Rc::new(move |_: &mut CombatEvent, _: &mut CombatContext| {
                    inner.borrow_mut().push(2)
                }),
            );
        }),
    );
    recorder(&mut ctx, EventKind::RoundStart, 3, Priority::OBSERVER, &trace);

    ctx.broadcast(round_start());
    assert_eq!(*trace.borrow(), vec![1, 3]);

    trace.borrow_mut().clear();
    ctx.broadcast(round_start());
    assert_eq!(*trace.borrow(), vec![2, 1, 3]);
    assert_eq!(ctx.events().subscriber_count(EventKind::RoundStart), 3);
}

/// A nested broadcast of the same kind does not disturb the outer one.
#[test]
fn test_nested_same_kind_broadcast() {
    let mut ctx = context();
    let trace: Trace = Rc::default();

    let log = Rc::clone(&trace);
    ctx.events_mut().subscribe(
        EventKind::RoundStart,
        SubscriberId::Observer(1),
        Priority::IMMEDIATE,
        Rc::new(move |event: &mut CombatEvent, ctx: &mut CombatContext| {
            let CombatEvent::RoundStart { round } = *event else {
                return;
            };
            log.borrow_mut().push(100 + round);
            if round == 1 {
                // Unsubscribe a later handler, then re-broadcast
                ctx.events_mut()
                    .unsubscribe(EventKind::RoundStart, SubscriberId::Observer(3));
                ctx.broadcast(CombatEvent::RoundStart { round: 2 });
            }
        }),
    );
    recorder(&mut ctx, EventKind::RoundStart, 2, Priority::STANDARD, &trace);
    recorder(&mut ctx, EventKind::RoundStart, 3, Priority::OBSERVER, &trace);

    ctx.broadcast(round_start());
    // Outer: 101, inner: 102 then 2 (3 is gone), outer resumes: 2
    assert_eq!(*trace.borrow(), vec![101, 102, 2, 2]);
}

/// A nested broadcast of another kind runs to completion inside the outer.
#[test]
fn test_nested_other_kind_broadcast() {
    let mut ctx = context();
    let trace: Trace = Rc::default();

    let log = Rc::clone(&trace);
    ctx.events_mut().subscribe(
        EventKind::TurnStart,
        SubscriberId::Observer(1),
        Priority::STANDARD,
        Rc::new(move |_: &mut CombatEvent, ctx: &mut CombatContext| {
            log.borrow_mut().push(1);
            ctx.broadcast(CombatEvent::RoundEnd { round: 1 });
            log.borrow_mut().push(1);
        }),
    );
    recorder(&mut ctx, EventKind::RoundEnd, 2, Priority::STANDARD, &trace);
    recorder(&mut ctx, EventKind::TurnStart, 3, Priority::OBSERVER, &trace);

    ctx.broadcast(CombatEvent::TurnStart {
        character: CharacterId::new(0),
        forfeit: false,
    });
    assert_eq!(*trace.borrow(), vec![1, 2, 1, 3]);
}

/// Re-subscribing an id that is live fails; after unsubscribing it works.
#[test]
fn test_duplicate_subscription_fails() {
    let mut ctx = context();
    let trace: Trace = Rc::default();
    recorder(&mut ctx, EventKind::UnitDefeated, 1, Priority::STANDARD, &trace);

    let handler = Rc::new(|_: &mut CombatEvent, _: &mut CombatContext| {});
    assert!(!ctx.events_mut().subscribe(
        EventKind::UnitDefeated,
        SubscriberId::Observer(1),
        Priority::OBSERVER,
        handler.clone(),
    ));
    assert!(ctx
        .events_mut()
        .unsubscribe(EventKind::UnitDefeated, SubscriberId::Observer(1)));
    assert!(ctx.events_mut().subscribe(
        EventKind::UnitDefeated,
        SubscriberId::Observer(1),
        Priority::OBSERVER,
        handler,
    ));
}
