//! Action resolver integration tests.
//!
//! These tests drive actions directly through a `CombatContext` and check
//! the resulting character state, the follow-ups each action raises, and
//! the events observed on the bus.

use std::rc::Rc;

use tactical_combat::actions::Action;
use tactical_combat::characters::{Character, Faction, Passive, Roster};
use tactical_combat::combat::{CombatContext, CombatLog};
use tactical_combat::core::{CharacterId, CombatConfig, PassiveId};
use tactical_combat::events::{CombatEvent, EventKind, Hook, Priority, SubscriberId};
use tactical_combat::status::library::{self, BLEED, DISHONORABLE, STAGGERED};

/// Two opponents and a bystander allied with the first.
fn setup() -> (CombatContext, CharacterId, CharacterId, CharacterId) {
    let mut roster = Roster::new(8);
    let hero = roster.add(
        Character::new("Hero", Faction::Player).with_hp(30).with_poise(5),
        1,
    );
    let brute = roster.add(
        Character::new("Brute", Faction::Enemy).with_hp(30).with_poise(10),
        2,
    );
    let ally = roster.add(Character::new("Ally", Faction::Player).with_hp(30), 0);
    (CombatContext::new(CombatConfig::new(7), roster), hero, brute, ally)
}

fn turn_end(character: CharacterId, forfeited: bool) -> CombatEvent {
    CombatEvent::TurnEnd {
        character,
        forfeited,
    }
}

// =============================================================================
// ApplyStatus
// =============================================================================

/// Stacking the same stackable status keeps a single instance.
#[test]
fn test_stackable_status_accumulates() {
    let (mut ctx, hero, _, _) = setup();
    let log = CombatLog::new();
    log.attach(ctx.events_mut());

    ctx.execute(Action::apply_status(Some(hero), library::bleed(), 2));
    ctx.execute(Action::apply_status(Some(hero), library::bleed(), 3));

    let character = ctx.roster().get(hero).unwrap();
    let bleeds: Vec<_> = character.statuses().iter().filter(|s| s.id == BLEED).collect();
    assert_eq!(bleeds.len(), 1, "Bleed should not be duplicated");
    assert_eq!(bleeds[0].stacks, 5);

    assert_eq!(
        log.of_kind(EventKind::StatusApplied),
        vec![
            CombatEvent::StatusApplied {
                target: hero,
                status: BLEED,
                stacks: 2,
                fresh: true,
            },
            CombatEvent::StatusApplied {
                target: hero,
                status: BLEED,
                stacks: 5,
                fresh: false,
            },
        ]
    );
    // The log and a single Bleed subscription
    assert_eq!(ctx.events().subscriber_count(EventKind::TurnEnd), 2);
}

/// Stacks join an existing stackable status whatever the incoming template says.
#[test]
fn test_stacks_follow_existing_status() {
    let (mut ctx, hero, _, _) = setup();
    ctx.execute(Action::apply_status(Some(hero), library::bleed(), 2));
    ctx.execute(Action::apply_status(
        Some(hero),
        library::bleed().with_stacks(0),
        3,
    ));

    assert_eq!(ctx.roster().get(hero).unwrap().status(BLEED).unwrap().stacks, 5);
}

/// Re-applying a non-stackable status changes nothing.
#[test]
fn test_non_stackable_reapply_is_ignored() {
    let (mut ctx, hero, _, _) = setup();
    let log = CombatLog::new();
    log.attach(ctx.events_mut());

    ctx.execute(Action::apply_status(Some(hero), library::dishonorable(), 0));
    ctx.execute(Action::apply_status(Some(hero), library::dishonorable(), 3));

    let character = ctx.roster().get(hero).unwrap();
    assert_eq!(character.statuses().len(), 1);
    assert_eq!(character.status(DISHONORABLE).unwrap().stacks, 0);
    assert_eq!(log.of_kind(EventKind::StatusApplied).len(), 1);
}

/// Actions aimed at nobody, or at an unknown id, do nothing.
#[test]
fn test_absent_target_is_noop() {
    let (mut ctx, hero, _, _) = setup();
    let log = CombatLog::new();
    log.attach(ctx.events_mut());

    assert!(Action::apply_status(None, library::bleed(), 1)
        .resolve(&mut ctx)
        .is_empty());
    assert!(Action::deal_damage(Some(hero), None, 9, false)
        .resolve(&mut ctx)
        .is_empty());
    assert!(Action::apply_status(Some(CharacterId::new(42)), library::bleed(), 1)
        .resolve(&mut ctx)
        .is_empty());
    ctx.execute(Action::move_to(CharacterId::new(42), 3));

    assert!(log.is_empty(), "no events expected, got {:?}", log.events());
}

// =============================================================================
// DealDamage
// =============================================================================

/// Running out of poise raises exactly one stagger follow-up.
#[test]
fn test_poise_break_staggers_once() {
    let (mut ctx, hero, brute, _) = setup();

    let follow_ups = Action::deal_damage(Some(brute), Some(hero), 10, true).resolve(&mut ctx);
    assert_eq!(follow_ups.len(), 1);
    match &follow_ups[0] {
        Action::ApplyStatus { target, effect, .. } => {
            assert_eq!(*target, Some(hero));
            assert_eq!(effect.id, STAGGERED);
        }
        other => panic!("expected a stagger, got {:?}", other),
    }
    assert_eq!(ctx.roster().get(hero).unwrap().cur_poise, -5);

    for action in follow_ups {
        ctx.execute(action);
    }
    assert!(ctx.roster().get(hero).unwrap().has_status(STAGGERED));

    // Further poise damage while staggered raises nothing
    let follow_ups = Action::deal_damage(Some(brute), Some(hero), 3, true).resolve(&mut ctx);
    assert!(follow_ups.is_empty());
}

/// Lethal damage wins over a simultaneous poise break.
#[test]
fn test_defeat_takes_precedence_over_stagger() {
    let (mut ctx, hero, brute, _) = setup();
    ctx.roster_mut().get_mut(hero).unwrap().cur_poise = 0;

    let follow_ups = Action::deal_damage(Some(brute), Some(hero), 30, false).resolve(&mut ctx);
    assert_eq!(follow_ups.len(), 1);
    assert!(matches!(follow_ups[0], Action::Defeat { character } if character == hero));
}

/// A staggered character takes double HP damage, but not double poise damage.
#[test]
fn test_staggered_doubles_hp_damage() {
    let (mut ctx, hero, brute, _) = setup();
    ctx.execute(Action::deal_damage(Some(brute), Some(hero), 5, true));
    assert!(ctx.roster().get(hero).unwrap().has_status(STAGGERED));

    ctx.execute(Action::deal_damage(Some(brute), Some(hero), 4, false));
    ctx.execute(Action::deal_damage(Some(brute), Some(hero), 2, true));
    let character = ctx.roster().get(hero).unwrap();
    assert_eq!(character.cur_hp, 22);
    assert_eq!(character.cur_poise, -2);
}

/// Extreme amounts saturate instead of overflowing.
#[test]
fn test_extreme_damage_saturates() {
    let (mut ctx, hero, brute, _) = setup();
    ctx.roster_mut().get_mut(hero).unwrap().cur_poise = -10;
    ctx.execute(Action::deal_damage(Some(brute), Some(hero), i32::MAX, true));
    assert_eq!(ctx.roster().get(hero).unwrap().cur_poise, i32::MIN);

    // Staggered now, so HP damage doubles and saturates too
    assert!(ctx.roster().get(hero).unwrap().has_status(STAGGERED));
    ctx.execute(Action::deal_damage(Some(brute), Some(hero), i32::MAX, false));
    let character = ctx.roster().get(hero).unwrap();
    assert_eq!(character.cur_hp, 30_i32.saturating_sub(i32::MAX));
    assert!(character.is_defeated());
}

/// Stagger ends at the forfeited turn's end and restores poise.
#[test]
fn test_stagger_recovery() {
    let (mut ctx, hero, brute, _) = setup();
    ctx.execute(Action::deal_damage(Some(brute), Some(hero), 7, true));

    // A turn that was not forfeited leaves the stagger in place
    ctx.broadcast(turn_end(hero, false));
    assert!(ctx.roster().get(hero).unwrap().has_status(STAGGERED));

    let start = ctx.broadcast(CombatEvent::TurnStart {
        character: hero,
        forfeit: false,
    });
    assert_eq!(
        start,
        CombatEvent::TurnStart {
            character: hero,
            forfeit: true,
        }
    );
    ctx.broadcast(turn_end(hero, true));

    let character = ctx.roster().get(hero).unwrap();
    assert!(!character.has_status(STAGGERED));
    assert_eq!(character.cur_poise, 5);
    assert_eq!(ctx.events().subscriber_count(EventKind::TurnStart), 0);
}

// =============================================================================
// Built-in statuses
// =============================================================================

/// Bleed deals its stacks at the holder's turn end, then loses one.
#[test]
fn test_bleed_ticks_down() {
    let (mut ctx, hero, brute, _) = setup();
    ctx.execute(Action::apply_status(Some(hero), library::bleed(), 2));

    // Someone else's turn end does nothing
    ctx.broadcast(turn_end(brute, false));
    assert_eq!(ctx.roster().get(hero).unwrap().cur_hp, 30);

    ctx.broadcast(turn_end(hero, false));
    let character = ctx.roster().get(hero).unwrap();
    assert_eq!(character.cur_hp, 28);
    assert_eq!(character.status(BLEED).unwrap().stacks, 1);

    ctx.broadcast(turn_end(hero, false));
    let character = ctx.roster().get(hero).unwrap();
    assert_eq!(character.cur_hp, 27);
    assert!(!character.has_status(BLEED));
}

/// The challenger hits harder; anyone else who interferes is dishonored.
#[test]
fn test_duel_to_the_death() {
    let (mut ctx, hero, brute, ally) = setup();
    ctx.execute(Action::apply_status(Some(brute), library::duel_to_the_death(hero), 0));

    ctx.execute(Action::deal_damage(Some(hero), Some(brute), 3, false));
    assert_eq!(ctx.roster().get(brute).unwrap().cur_hp, 25);
    assert!(!ctx.roster().get(hero).unwrap().has_status(DISHONORABLE));

    ctx.execute(Action::deal_damage(Some(ally), Some(brute), 3, false));
    assert_eq!(ctx.roster().get(brute).unwrap().cur_hp, 22);
    assert!(ctx.roster().get(ally).unwrap().has_status(DISHONORABLE));
}

// =============================================================================
// Passives
// =============================================================================

/// Returns one point of HP damage to whoever hurt the holder.
#[derive(Debug)]
struct Thorns;

impl Hook for Thorns {
    fn subscriptions(&self) -> Vec<(EventKind, Priority)> {
        vec![(EventKind::DamageTaken, Priority::STANDARD)]
    }

    fn on_event(&self, holder: CharacterId, event: &mut CombatEvent, ctx: &mut CombatContext) {
        if let CombatEvent::DamageTaken {
            attacker: Some(attacker),
            defender,
            poise: false,
            ..
        } = *event
        {
            if defender == holder && attacker != holder {
                ctx.execute(Action::deal_damage(Some(holder), Some(attacker), 1, false));
            }
        }
    }
}

/// Passives subscribe through `register_fighter_hooks` and act for their holder.
#[test]
fn test_passive_hook() {
    let mut roster = Roster::new(4);
    let thorny = roster.add(
        Character::new("Thorny", Faction::Enemy)
            .with_hp(20)
            .with_passive(Passive::new(PassiveId::new(1), "Thorns", Rc::new(Thorns))),
        0,
    );
    let hero = roster.add(Character::new("Hero", Faction::Player).with_hp(20), 1);
    let mut ctx = CombatContext::new(CombatConfig::new(3), roster);

    assert_eq!(ctx.register_fighter_hooks(thorny), 1);
    assert!(ctx.events().is_subscribed(
        EventKind::DamageTaken,
        SubscriberId::Passive {
            owner: thorny,
            passive: PassiveId::new(1),
        }
    ));

    ctx.execute(Action::deal_damage(Some(hero), Some(thorny), 4, false));
    assert_eq!(ctx.roster().get(thorny).unwrap().cur_hp, 16);
    assert_eq!(ctx.roster().get(hero).unwrap().cur_hp, 19);

    // Gone with its holder
    ctx.execute(Action::defeat(thorny));
    assert_eq!(ctx.events().subscriber_count(EventKind::DamageTaken), 0);
    ctx.execute(Action::deal_damage(Some(thorny), Some(hero), 1, false));
    assert_eq!(ctx.roster().get(hero).unwrap().cur_hp, 18);
}
