//! Entity registry and observable state tests.
//!
//! These tests verify identity and visibility through the game API:
//! - Ids are unique, increasing and never reused
//! - Lookup filters by kind
//! - Snapshots apply per-player overrides

mod common;

use deckr_engine::core::{Entity, EntityId, SerializedValue, Value, KIND_CARD, KIND_PLAYER, KIND_ZONE};
use deckr_engine::transitions::Transition;
use proptest::prelude::*;

use common::{started, TestRules};

proptest! {
    /// Ids are handed out in increasing order and never reused.
    #[test]
    fn prop_ids_monotonic(batches in prop::collection::vec(1usize..6, 1..8)) {
        let (mut game, _) = started(TestRules::empty(), 1);
        let mut last = game.registry().ids().max().unwrap();

        for size in batches {
            let ids = game.register_all((0..size).map(|_| Entity::new(KIND_CARD)));
            for id in &ids {
                prop_assert!(*id > last);
                last = *id;
            }
            // Freeing ids never lets them come back.
            game.deregister(ids[0]);
        }
    }

    /// An override is seen by its player only; everyone else reads the global value.
    #[test]
    fn prop_override_visibility(
        name in prop::sample::select(vec!["power", "face_up", "score"]),
        global in -50i64..50,
        local in -50i64..50,
        seat in 0usize..2,
    ) {
        let (mut game, players) = started(TestRules::empty(), 2);
        let (owner, other) = (players[seat], players[1 - seat]);
        let card = game.create_cards("Gem", 1).unwrap()[0];

        game.set(card, name, global).unwrap();
        game.set_for(card, owner, name, local).unwrap();

        prop_assert_eq!(game.get_for(card, name, owner), Some(&Value::Int(local)));
        prop_assert_eq!(game.get_for(card, name, other), Some(&Value::Int(global)));
        prop_assert_eq!(game.get(card, name), Some(&Value::Int(global)));

        let seen = |player| {
            game.get_state(player)
                .entity(card.raw())
                .and_then(|card| card.field(name))
                .and_then(SerializedValue::as_int)
        };
        // Snapshots carry tracked attributes only.
        if game.lookup(card, None).unwrap().is_tracked(name) {
            prop_assert_eq!(seen(Some(owner)), Some(local));
            prop_assert_eq!(seen(Some(other)), Some(global));
            prop_assert_eq!(seen(None), Some(global));
        } else {
            prop_assert_eq!(seen(Some(owner)), None);
        }
    }
}

#[test]
fn test_deregister_is_idempotent() {
    let (mut game, _) = started(TestRules::empty(), 1);
    let id = game.register(Entity::new(KIND_CARD));

    let removed = game.deregister(id).unwrap();
    assert!(game.deregister(id).is_none());
    assert!(game.lookup(id, None).is_none());

    // The entity keeps its identity and can come back under it.
    assert_eq!(removed.id(), Some(id));
    assert_eq!(game.register(removed), id);
    assert!(game.lookup(id, Some(KIND_CARD)).is_some());
}

#[test]
fn test_root_cannot_be_deregistered() {
    let (mut game, _) = started(TestRules::empty(), 1);
    assert!(game.deregister(EntityId::ROOT).is_none());
    assert!(game.lookup(EntityId::ROOT, None).is_some());
}

#[test]
fn test_foreign_entity_not_adopted() {
    let (mut first, _) = started(TestRules::empty(), 1);
    let (mut second, _) = started(TestRules::empty(), 1);

    let id = first.register(Entity::new(KIND_CARD));
    let entity = first.deregister(id).unwrap();
    let before = second.registry().len();

    second.register(entity);
    assert_eq!(second.registry().len(), before);
}

#[test]
fn test_lookup_checks_kind() {
    let (game, players) = started(TestRules::empty(), 1);
    let player = players[0].entity();

    assert!(game.lookup(player, Some(KIND_PLAYER)).is_some());
    assert!(game.lookup(player, Some(KIND_ZONE)).is_none());
    assert!(game.lookup(EntityId(999), None).is_none());
}

#[test]
fn test_override_visible_only_to_player() {
    let (mut game, players) = started(TestRules::empty(), 2);
    let (alice, bob) = (players[0], players[1]);
    let card = game.create_cards("Token", 1).unwrap()[0];
    game.get_transitions(alice);
    game.get_transitions(bob);

    game.set_for(card, alice, "face_up", true).unwrap();

    assert_eq!(game.get_for(card, "face_up", alice), Some(&Value::Bool(true)));
    assert_eq!(game.get_for(card, "face_up", bob), Some(&Value::Bool(false)));
    assert_eq!(game.get(card, "face_up"), Some(&Value::Bool(false)));

    // Only the overridden player hears about it.
    assert_eq!(game.get_transitions(alice).len(), 1);
    assert!(game.get_transitions(bob).is_empty());

    let face_up = |state: &deckr_engine::game::StateSnapshot| {
        state
            .entity(card.raw())
            .and_then(|card| card.field("face_up"))
            .and_then(SerializedValue::as_bool)
    };
    assert_eq!(face_up(&game.get_state(Some(alice))), Some(true));
    assert_eq!(face_up(&game.get_state(Some(bob))), Some(false));
}

#[test]
fn test_clear_override_reveals_global_value() {
    let (mut game, players) = started(TestRules::empty(), 1);
    let alice = players[0];
    let card = game.create_cards("Token", 1).unwrap()[0];
    game.set_for(card, alice, "face_up", true).unwrap();
    game.get_transitions(alice);

    game.clear_override(card, alice, "face_up").unwrap();

    assert_eq!(game.get_for(card, "face_up", alice), Some(&Value::Bool(false)));
    let transitions = game.get_transitions(alice);
    assert!(matches!(
        transitions.as_slice(),
        [Transition::Set { attribute, value: SerializedValue::Bool(false), .. }] if attribute == "face_up"
    ));
}

#[test]
fn test_untracked_attributes_not_serialized() {
    let (mut game, players) = started(TestRules::empty(), 1);
    let card = game.create_cards("Token", 1).unwrap()[0];
    game.set(card, "scratch", 5).unwrap();

    let state = game.get_state(Some(players[0]));
    let serialized = state.entity(card.raw()).unwrap();

    assert_eq!(serialized.field("name").and_then(SerializedValue::as_text), Some("Token"));
    assert_eq!(serialized.field("kind").and_then(SerializedValue::as_text), Some(KIND_CARD));
    assert!(serialized.field("power").is_none());
    assert!(serialized.field("scratch").is_none());
    assert_eq!(game.int(card, "scratch"), Some(5));
}

#[test]
fn test_snapshot_shapes() {
    let (mut game, players) = started(TestRules::empty(), 1);
    let alice = players[0];
    let hand = game.player_zone(alice, "hand").unwrap();
    let card = game.create_cards("Token", 1).unwrap()[0];
    game.add_to_zone(hand, card).unwrap();

    let state = game.get_state(Some(alice));
    let zone = state.entity(hand.raw()).unwrap();
    assert_eq!(
        zone.field("objects"),
        Some(&SerializedValue::List(vec![SerializedValue::Int(i64::from(card.raw()))]))
    );

    let player = state.entity(alice.entity().raw()).unwrap();
    let zones = player.field("zones").unwrap();
    assert!(matches!(zones.field("hand"), Some(SerializedValue::Stub(stub)) if stub.id == hand));

    // Root first, then everything else in id order.
    let ids: Vec<i64> = state
        .entities
        .iter()
        .filter_map(|entity| entity.field("id").and_then(SerializedValue::as_int))
        .collect();
    assert_eq!(ids[0], 0);
    assert!(ids.windows(2).all(|pair| pair[0] < pair[1]));
}

#[test]
fn test_remove_player_cleans_up() {
    let (mut game, players) = started(TestRules::empty(), 2);
    let alice = players[0];
    let hand = game.player_zone(alice, "hand").unwrap();
    let card = game.create_cards("Token", 1).unwrap()[0];
    game.add_to_zone(hand, card).unwrap();

    game.remove_player(alice);
    game.remove_player(alice);

    assert!(!game.has_player(alice));
    assert_eq!(game.players(), &[players[1]]);
    assert!(game.lookup(hand, None).is_none());
    assert!(game.lookup(card, None).is_none());
    assert!(game.lookup(alice.entity(), None).is_none());
    assert!(game.get_transitions(alice).is_empty());
}
