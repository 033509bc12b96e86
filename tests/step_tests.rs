//! Step engine tests.
//!
//! These tests verify step resolution through actions:
//! - Suspension on a missing argument and resumption with information
//! - Queue order, including steps prepended by a running step
//! - Result bindings and their scope
//! - Trigger order and removal

mod common;

use std::sync::{Arc, Mutex};

use deckr_engine::core::{Args, EntityId, GameError, PlayerId, Value, KIND_CARD};
use deckr_engine::game::{Game, ResolutionStatus};
use deckr_engine::rules::{ActionDef, Rulebook};
use deckr_engine::steps::{ArgType, Container, EngineState, PendingStep, Requirement, StepDef, TriggerTiming};
use deckr_engine::transitions::Transition;

use common::{arg, started, TestRules};

type Log = Arc<Mutex<Vec<String>>>;

fn push(log: &Log, entry: impl Into<String>) {
    log.lock().unwrap().push(entry.into());
}

fn entries(log: &Log) -> Vec<String> {
    log.lock().unwrap().clone()
}

fn in_hand(game: &Game, player: PlayerId, cards: &[EntityId]) -> bool {
    let hand = game.player_zone(player, "hand");
    cards.iter().all(|card| hand.is_some_and(|hand| game.zone_contains(hand, *card)))
}

fn register(book: &mut Rulebook, log: &Log) {
    let record = log.clone();
    let prepender = log.clone();
    let report = log.clone();

    book.step(StepDef::new("record", move |_: &mut Game, _: PlayerId, args: &Args| {
        push(&record, args.text("label").unwrap_or("?"));
        Ok(Value::Null)
    }))
    .step(
        StepDef::new("discard", |game: &mut Game, player: PlayerId, args: &Args| {
            let discard = game.player_zone(player, "discard").unwrap();
            let cards = args.entities("cards");
            for &card in &cards {
                game.move_to_zone(card, discard)?;
            }
            Ok(Value::from(cards.len()))
        })
        .requires(
            Requirement::list("cards", ArgType::entity(KIND_CARD))
                .with_prompt("Choose cards to discard")
                .with_test(|game, player, args| in_hand(game, player, &args.entities("cards"))),
        ),
    )
    .step(StepDef::new("count", |_: &mut Game, _: PlayerId, args: &Args| {
        Ok(Value::from(args.int("n").unwrap_or(0)))
    }))
    .step(
        StepDef::new("report", move |_: &mut Game, _: PlayerId, args: &Args| {
            push(&report, format!("total={}", args.int("total").unwrap_or(-1)));
            Ok(Value::Null)
        })
        .requires(Requirement::new("total", ArgType::Int)),
    )
    .step(StepDef::new("prepender", move |game: &mut Game, player: PlayerId, _: &Args| {
        push(&prepender, "prepender");
        game.enqueue(PendingStep::new(player, "record").with_arg("label", "inner").at_front())?;
        Ok(Value::Null)
    }));

    book.action(ActionDef::new("discard_some", |game: &mut Game, player: PlayerId, _: &Args| {
        game.enqueue(PendingStep::new(player, "discard"))
    }))
    .action(ActionDef::new("chain", |game: &mut Game, player: PlayerId, args: &Args| {
        let n = args.int("n").unwrap_or(0);
        game.enqueue(PendingStep::new(player, "count").with_arg("n", n).save_as("total"))?;
        game.enqueue(PendingStep::new(player, "report").using("total", "total"))
    }))
    .action(ActionDef::new("report_only", |game: &mut Game, player: PlayerId, _: &Args| {
        game.enqueue(PendingStep::new(player, "report").using("total", "total"))
    }))
    .action(ActionDef::new("nested", |game: &mut Game, player: PlayerId, _: &Args| {
        game.enqueue(PendingStep::new(player, "record").with_arg("label", "first"))?;
        game.enqueue(PendingStep::new(player, "prepender"))?;
        game.enqueue(PendingStep::new(player, "record").with_arg("label", "last"))
    }))
    .action(ActionDef::new("unknown_step", |game: &mut Game, player: PlayerId, _: &Args| {
        game.enqueue(PendingStep::new(player, "missing"))
    }));
}

fn setup(players: usize) -> (Game, Vec<PlayerId>, Log) {
    let log: Log = Arc::default();
    let rules_log = log.clone();
    let (game, players) = started(TestRules::new(move |book| register(book, &rules_log)), players);
    (game, players, log)
}

/// Deal `count` tokens into a player's hand.
fn deal(game: &mut Game, player: PlayerId, count: usize) -> Vec<EntityId> {
    let hand = game.player_zone(player, "hand").unwrap();
    let cards = game.create_cards("Token", count).unwrap();
    for &card in &cards {
        game.add_to_zone(hand, card).unwrap();
    }
    cards
}

fn ids(cards: &[EntityId]) -> Value {
    Value::List(cards.iter().map(|card| Value::Int(i64::from(card.raw()))).collect())
}

#[test]
fn test_cards_step_suspends_and_resumes() {
    let (mut game, players, _) = setup(1);
    let alice = players[0];
    let cards = deal(&mut game, alice, 2);
    let hand = game.player_zone(alice, "hand").unwrap();
    let discard = game.player_zone(alice, "discard").unwrap();
    game.get_transitions(alice);

    let status = game.make_action("discard_some", alice, Args::new()).unwrap();
    let prompt = status.prompt().unwrap();
    assert_eq!(prompt.name, "cards");
    assert_eq!(prompt.player, alice);
    assert_eq!(prompt.shape.container, Container::List);
    assert_eq!(prompt.prompt.as_deref(), Some("Choose cards to discard"));
    assert_eq!(game.step_state(), EngineState::AwaitingInput);
    assert_eq!(game.requires_information(), Some(prompt));

    let status = game.send_information(alice, arg("cards", ids(&cards))).unwrap();
    assert_eq!(status, ResolutionStatus::Complete);
    assert_eq!(game.step_state(), EngineState::Idle);
    assert!(game.requires_information().is_none());
    assert_eq!(game.zone_size(discard), 2);

    let expected: Vec<Transition> = cards
        .iter()
        .flat_map(|&card| {
            [
                Transition::Remove { object: card, zone: hand },
                Transition::Add { object: card, zone: discard },
            ]
        })
        .collect();
    assert_eq!(game.get_transitions(alice), expected);
}

#[test]
fn test_suspension_as_error() {
    let (mut game, players, _) = setup(1);
    let status = game.make_action("discard_some", players[0], Args::new()).unwrap();

    match status.into_result() {
        Err(GameError::NeedsMoreInfo(prompt)) => assert_eq!(prompt.name, "cards"),
        other => panic!("expected NeedsMoreInfo, got {:?}", other),
    }
}

#[test]
fn test_failed_test_prompts_again() {
    let (mut game, players, _) = setup(1);
    let alice = players[0];
    let stray = game.create_cards("Token", 1).unwrap();

    game.make_action("discard_some", alice, Args::new()).unwrap();
    let status = game.send_information(alice, arg("cards", ids(&stray))).unwrap();

    assert_eq!(status.prompt().map(|p| p.name.as_str()), Some("cards"));
    assert_eq!(game.step_state(), EngineState::AwaitingInput);
}

#[test]
fn test_unresolvable_information_rejected() {
    let (mut game, players, _) = setup(1);
    let alice = players[0];
    let cards = deal(&mut game, alice, 1);
    game.make_action("discard_some", alice, Args::new()).unwrap();

    let err = game
        .send_information(alice, arg("cards", Value::List(vec![Value::Int(999)])))
        .unwrap_err();
    assert!(matches!(err, GameError::InvalidMove { .. }));
    assert!(game.requires_information().is_some());

    // Still answerable afterwards.
    let status = game.send_information(alice, arg("cards", ids(&cards))).unwrap();
    assert!(status.is_complete());
}

#[test]
fn test_wrong_player_rejected() {
    let (mut game, players, _) = setup(2);
    let (alice, bob) = (players[0], players[1]);
    let cards = deal(&mut game, alice, 1);
    game.make_action("discard_some", alice, Args::new()).unwrap();

    assert_eq!(
        game.send_information(bob, arg("cards", ids(&cards))),
        Err(GameError::WrongPlayer { expected: alice, got: bob })
    );
    assert_eq!(game.requires_information().map(|p| p.player), Some(alice));
    assert_eq!(game.location(cards[0]), game.player_zone(alice, "hand"));
}

#[test]
fn test_send_information_routed_through_make_action() {
    let (mut game, players, _) = setup(1);
    let alice = players[0];
    let cards = deal(&mut game, alice, 1);
    game.make_action("discard_some", alice, Args::new()).unwrap();

    let status = game.make_action("send_information", alice, arg("cards", ids(&cards))).unwrap();
    assert!(status.is_complete());
}

#[test]
fn test_other_actions_blocked_while_waiting() {
    let (mut game, players, _) = setup(1);
    let alice = players[0];
    game.make_action("discard_some", alice, Args::new()).unwrap();

    let err = game.make_action("chain", alice, arg("n", 1)).unwrap_err();
    assert!(matches!(err, GameError::State(_)));
}

#[test]
fn test_no_information_expected() {
    let (mut game, players, _) = setup(1);
    let err = game.send_information(players[0], arg("cards", Value::List(Vec::new()))).unwrap_err();
    assert!(matches!(err, GameError::State(_)));
}

#[test]
fn test_saved_result_feeds_later_step() {
    let (mut game, players, log) = setup(1);
    let status = game.make_action("chain", players[0], arg("n", 3)).unwrap();

    assert!(status.is_complete());
    assert_eq!(entries(&log), vec!["total=3"]);
    // Bindings are flushed once the queue drains.
    assert!(game.binding("total").is_none());
}

#[test]
fn test_bindings_do_not_leak_across_actions() {
    let (mut game, players, log) = setup(1);
    let alice = players[0];
    game.make_action("chain", alice, arg("n", 3)).unwrap();

    let status = game.make_action("report_only", alice, Args::new()).unwrap();
    assert_eq!(status.prompt().map(|p| p.name.as_str()), Some("total"));

    game.send_information(alice, arg("total", 7)).unwrap();
    assert_eq!(entries(&log), vec!["total=3", "total=7"]);
}

#[test]
fn test_prepended_steps_run_next() {
    let (mut game, players, log) = setup(1);
    game.make_action("nested", players[0], Args::new()).unwrap();

    assert_eq!(entries(&log), vec!["first", "prepender", "inner", "last"]);
}

#[test]
fn test_triggers_fire_in_order() {
    let (mut game, players, log) = setup(1);
    let alice = players[0];
    for (label, timing) in [
        ("before-1", TriggerTiming::Before),
        ("after-1", TriggerTiming::After),
        ("before-2", TriggerTiming::Before),
    ] {
        let log = log.clone();
        game.add_trigger("count", timing, move |_, player, args| {
            push(&log, format!("{} {} n={}", label, player, args.int("n").unwrap_or(0)));
            Ok(())
        });
    }

    game.make_action("chain", alice, arg("n", 2)).unwrap();

    assert_eq!(
        entries(&log),
        vec![
            format!("before-1 {} n=2", alice),
            format!("before-2 {} n=2", alice),
            format!("after-1 {} n=2", alice),
            "total=2".to_string(),
        ]
    );
}

#[test]
fn test_removed_trigger_stops_firing() {
    let (mut game, players, log) = setup(1);
    let trigger_log = log.clone();
    let trigger = game.add_trigger("count", TriggerTiming::After, move |_, _, _| {
        push(&trigger_log, "fired");
        Ok(())
    });

    game.make_action("chain", players[0], arg("n", 1)).unwrap();
    assert!(game.remove_trigger(trigger));
    assert!(!game.remove_trigger(trigger));
    game.make_action("chain", players[0], arg("n", 1)).unwrap();

    assert_eq!(entries(&log), vec!["fired", "total=1", "total=1"]);
}

#[test]
fn test_before_trigger_waits_for_requirements() {
    let (mut game, players, log) = setup(1);
    let alice = players[0];
    let trigger_log = log.clone();
    game.add_trigger("report", TriggerTiming::Before, move |_, _, _| {
        push(&trigger_log, "before report");
        Ok(())
    });

    game.make_action("report_only", alice, Args::new()).unwrap();
    assert!(entries(&log).is_empty());

    game.send_information(alice, arg("total", 4)).unwrap();
    assert_eq!(entries(&log), vec!["before report", "total=4"]);
}

#[test]
fn test_unknown_step_rejected_at_enqueue() {
    let (mut game, players, _) = setup(1);
    assert_eq!(
        game.make_action("unknown_step", players[0], Args::new()),
        Err(GameError::UnknownStep("missing".to_string()))
    );
    assert_eq!(game.step_state(), EngineState::Idle);
}
