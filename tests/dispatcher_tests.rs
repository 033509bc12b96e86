//! Game lifecycle and action dispatch tests.
//!
//! These tests verify the public game API:
//! - Joining, set-up and capacity rules
//! - Parameter resolution and restriction clauses
//! - Rejected actions leave no trace
//! - Broadcast and player-scoped transitions
//! - Game over

mod common;

use deckr_engine::core::{Args, EntityId, GameError, PlayerId, SerializedValue, Value, KIND_CARD};
use deckr_engine::game::{Game, GamePhase, ResolutionStatus};
use deckr_engine::rules::{ActionDef, Rulebook};
use deckr_engine::steps::{ArgType, PendingStep, Requirement, StepDef};
use deckr_engine::transitions::Transition;
use serde_json::json;

use common::{arg, config, init_logging, started, TestRules};

fn on_board(game: &Game, card: EntityId) -> bool {
    game.zone("board").is_some_and(|board| game.zone_contains(board, card))
}

fn register(book: &mut Rulebook) {
    book.action(
        ActionDef::new("claim", |game: &mut Game, player: PlayerId, args: &Args| {
            let card = args.entity("card").ok_or_else(|| GameError::invalid("no card"))?;
            let hand = game.player_zone(player, "hand").ok_or_else(|| GameError::state("no hand"))?;
            game.move_to_zone(card, hand)?;
            game.set_for(card, player, "face_up", true)
        })
        .param("card", ArgType::entity(KIND_CARD))
        .restrict("card is not on the board", |game, _, args| {
            args.entity("card").is_some_and(|card| on_board(game, card))
        })
        .restrict("card is already face up", |game, _, args| {
            args.entity("card")
                .and_then(|card| game.get(card, "face_up"))
                .and_then(Value::as_bool)
                == Some(false)
        }),
    )
    .action(ActionDef::new("announce", |game: &mut Game, player: PlayerId, _: &Args| {
        game.emit("hello", "everyone", None);
        game.emit("secret", "only you", Some(player));
        Ok(())
    }))
    .action(ActionDef::new("win", |game: &mut Game, player: PlayerId, _: &Args| {
        game.set(player.entity(), "won", true)?;
        game.set(EntityId::ROOT, "over", true)
    }))
    .action(ActionDef::new("fail", |game: &mut Game, player: PlayerId, _: &Args| {
        game.enqueue(PendingStep::new(player, "noop"))?;
        Err(GameError::invalid("body failed"))
    }))
    .action(ActionDef::new("win_then_ask", |game: &mut Game, player: PlayerId, _: &Args| {
        game.set(player.entity(), "won", true)?;
        game.set(EntityId::ROOT, "over", true)?;
        game.enqueue(PendingStep::new(player, "ask"))
    }));

    book.step(StepDef::new("noop", |_: &mut Game, _: PlayerId, _: &Args| Ok(Value::Null)));
    book.step(
        StepDef::new("ask", |_: &mut Game, _: PlayerId, args: &Args| Ok(Value::from(args.int("answer").unwrap_or(0))))
            .requires(Requirement::new("answer", ArgType::Int)),
    );
}

fn deal_board(game: &mut Game) -> Result<(), GameError> {
    let board = game.zone("board").ok_or_else(|| GameError::state("no board"))?;
    for card in game.create_cards("Token", 3)? {
        game.add_to_zone(board, card)?;
    }
    Ok(())
}

fn rules() -> TestRules {
    TestRules::new(register).with_set_up(deal_board)
}

fn board_cards(game: &Game) -> Vec<EntityId> {
    game.cards_in_zone(game.zone("board").unwrap())
}

#[test]
fn test_capacity_after_start() {
    init_logging();
    let mut game = Game::new(config(1, 2), rules()).unwrap();
    game.add_player().unwrap();
    game.add_player().unwrap();
    game.start_game().unwrap();

    assert_eq!(game.add_player(), Err(GameError::Capacity { max: 2 }));
    assert_eq!(game.players().len(), 2);
}

#[test]
fn test_join_after_start_rejected() {
    init_logging();
    let mut game = Game::new(config(1, 3), rules()).unwrap();
    game.add_player().unwrap();
    game.start_game().unwrap();

    assert!(matches!(game.add_player(), Err(GameError::State(_))));
    assert_eq!(game.players().len(), 1);
}

#[test]
fn test_start_requires_players_and_runs_once() {
    init_logging();
    let mut game = Game::new(config(2, 3), rules()).unwrap();
    game.add_player().unwrap();

    assert_eq!(game.start_game(), Err(GameError::NotEnoughPlayers { joined: 1, min: 2 }));
    assert_eq!(game.phase(), GamePhase::Configuring);

    game.add_player().unwrap();
    assert_eq!(game.start_game(), Ok(ResolutionStatus::Complete));
    assert!(game.is_set_up());
    assert_eq!(board_cards(&game).len(), 3);

    assert!(matches!(game.start_game(), Err(GameError::State(_))));
    assert_eq!(board_cards(&game).len(), 3);
}

#[test]
fn test_failed_set_up_can_retry() {
    init_logging();
    let rules = TestRules::new(register).with_set_up(|game| {
        if game.get(EntityId::ROOT, "ready").is_none() {
            return Err(GameError::state("table not ready"));
        }
        Ok(())
    });
    let mut game = Game::new(config(1, 1), rules).unwrap();
    game.add_player().unwrap();

    assert!(game.start_game().is_err());
    assert_eq!(game.phase(), GamePhase::Configuring);

    game.set(EntityId::ROOT, "ready", true).unwrap();
    assert!(game.start_game().is_ok());
    assert_eq!(game.phase(), GamePhase::InProgress);
}

#[test]
fn test_actions_need_started_game() {
    init_logging();
    let mut game = Game::new(config(1, 1), rules()).unwrap();
    let player = game.add_player().unwrap();

    let err = game.make_action("announce", player, Args::new()).unwrap_err();
    assert!(matches!(err, GameError::State(_)));
}

#[test]
fn test_unknown_action_and_stranger() {
    let (mut game, players) = started(rules(), 1);

    assert_eq!(
        game.make_action("fly", players[0], Args::new()),
        Err(GameError::UnknownAction("fly".to_string()))
    );
    let err = game.make_action("announce", PlayerId::new(999), Args::new()).unwrap_err();
    assert!(matches!(err, GameError::InvalidMove { .. }));
}

#[test]
fn test_parameters_resolved_from_raw_ids() {
    let (mut game, players) = started(rules(), 1);
    let alice = players[0];
    let card = board_cards(&game)[0];

    let kwargs = Args::from(json!({ "card": card.raw() }));
    assert!(game.make_action("claim", alice, kwargs).unwrap().is_complete());
    assert_eq!(game.location(card), game.player_zone(alice, "hand"));
    assert_eq!(game.get_for(card, "face_up", alice), Some(&Value::Bool(true)));
}

#[test]
fn test_bad_parameters_rejected() {
    let (mut game, players) = started(rules(), 1);
    let alice = players[0];
    let hand = game.player_zone(alice, "hand").unwrap();

    // Missing, dangling and wrong-kind ids.
    for kwargs in [Args::new(), arg("card", 999), arg("card", i64::from(hand.raw()))] {
        let err = game.make_action("claim", alice, kwargs).unwrap_err();
        assert!(matches!(err, GameError::InvalidMove { .. }), "{:?}", err);
    }
}

#[test]
fn test_first_failing_clause_reported() {
    let (mut game, players) = started(rules(), 1);
    let alice = players[0];
    let card = board_cards(&game)[0];
    game.make_action("claim", alice, arg("card", card)).unwrap();

    // Off the board and face up: the first clause is reported.
    game.set(card, "face_up", true).unwrap();
    assert_eq!(
        game.make_action("claim", alice, arg("card", card)),
        Err(GameError::invalid("card is not on the board"))
    );

    let loose = game.create_cards("Token", 1).unwrap()[0];
    let board = game.zone("board").unwrap();
    game.add_to_zone(board, loose).unwrap();
    game.set(loose, "face_up", true).unwrap();
    assert_eq!(
        game.make_action("claim", alice, arg("card", loose)),
        Err(GameError::invalid("card is already face up"))
    );
}

#[test]
fn test_rejected_action_changes_nothing() {
    let (mut game, players) = started(rules(), 2);
    let (alice, bob) = (players[0], players[1]);
    let card = board_cards(&game)[0];
    game.make_action("claim", alice, arg("card", card)).unwrap();
    game.get_transitions(alice);
    game.get_transitions(bob);

    let before = game.get_state(Some(bob));
    assert!(game.make_action("claim", bob, arg("card", card)).is_err());

    assert_eq!(game.get_state(Some(bob)), before);
    assert_eq!(game.pending_transitions(alice), 0);
    assert_eq!(game.pending_transitions(bob), 0);
}

#[test]
fn test_failed_body_clears_queue() {
    let (mut game, players) = started(rules(), 1);

    assert_eq!(
        game.make_action("fail", players[0], Args::new()),
        Err(GameError::invalid("body failed"))
    );
    assert_eq!(game.queued_steps().count(), 0);
    assert!(game.make_action("announce", players[0], Args::new()).is_ok());
}

#[test]
fn test_broadcast_and_scoped_transitions() {
    let (mut game, players) = started(rules(), 2);
    let (alice, bob) = (players[0], players[1]);
    game.get_transitions(alice);
    game.get_transitions(bob);

    game.make_action("announce", alice, Args::new()).unwrap();

    let hello = Transition::Custom {
        label: "hello".to_string(),
        value: SerializedValue::Text("everyone".to_string()),
    };
    let secret = Transition::Custom {
        label: "secret".to_string(),
        value: SerializedValue::Text("only you".to_string()),
    };
    assert_eq!(game.get_transitions(alice), vec![hello.clone(), secret]);
    assert_eq!(game.get_transitions(bob), vec![hello]);

    // Drained exactly once.
    assert!(game.get_transitions(alice).is_empty());
}

#[test]
fn test_game_over_broadcast_once() {
    let (mut game, players) = started(rules(), 2);
    let (alice, bob) = (players[0], players[1]);
    game.get_transitions(alice);
    game.get_transitions(bob);

    game.make_action("win", bob, Args::new()).unwrap();

    assert!(game.is_over());
    assert_eq!(game.winners(), &[bob]);
    assert!(game.get_state(None).is_over);

    for player in [alice, bob] {
        let over: Vec<Transition> = game
            .get_transitions(player)
            .into_iter()
            .filter(|t| matches!(t, Transition::IsOver { .. }))
            .collect();
        assert_eq!(over, vec![Transition::IsOver { winners: vec![bob] }]);
    }

    let err = game.make_action("announce", alice, Args::new()).unwrap_err();
    assert!(matches!(err, GameError::State(_)));
}

#[test]
fn test_game_over_while_prompting() {
    let (mut game, players) = started(rules(), 2);
    let (alice, bob) = (players[0], players[1]);
    game.get_transitions(bob);

    let status = game.make_action("win_then_ask", alice, Args::new()).unwrap();

    assert_eq!(status, ResolutionStatus::Complete);
    assert!(game.is_over());
    assert_eq!(game.winners(), &[alice]);
    assert!(game.requires_information().is_none());
    assert!(game
        .get_transitions(bob)
        .contains(&Transition::IsOver { winners: vec![alice] }));
}

#[test]
fn test_is_over_transition_json() {
    let transition = Transition::IsOver { winners: vec![PlayerId::new(2)] };
    assert_eq!(
        serde_json::to_value(&transition).unwrap(),
        json!({ "name": "is_over", "winners": [2] })
    );
}

#[test]
fn test_clone_state_for_look_ahead() {
    let (mut game, players) = started(rules(), 1);
    let alice = players[0];
    let card = board_cards(&game)[0];

    let mut copy = game.clone_state();
    copy.make_action("claim", alice, arg("card", card)).unwrap();

    assert!(!on_board(&copy, card));
    assert!(on_board(&game, card));
    // Two zone moves and the owner's face-up override.
    assert_eq!(copy.pending_transitions(alice), game.pending_transitions(alice) + 3);
}
