//! Deck-builder rules.

use crate::core::{Args, Entity, EntityId, GameConfig, GameError, PlayerId, Result, Value, ZoneTemplate, KIND_CARD, KIND_ZONE};
use crate::game::Game;
use crate::rules::{ActionDef, GameRules, Rulebook};
use crate::steps::{ArgType, PendingStep, Requirement, StepDef};

use super::cards::{self, ACTION, KINGDOM, TREASURE};

/// Cards drawn at the end of each turn.
pub const HAND_SIZE: i64 = 5;

/// Value of the root `phase` attribute while actions may be played.
pub const ACTION_PHASE: &str = "action";
/// Value of the root `phase` attribute once treasures or buys happened.
pub const BUY_PHASE: &str = "buy";

/// Zone type of the supply piles.
pub const SUPPLY: &str = "supply";

// Step names.
pub const DRAW_CARDS: &str = "draw_cards";
pub const DISCARD_CARDS: &str = "discard_cards";
pub const TRASH_CARDS: &str = "trash_cards";
pub const TRASH_CARD: &str = "trash_card";
pub const GAIN_CARD: &str = "gain_card";

/// Chapel trashes at most this many cards.
const CHAPEL_LIMIT: usize = 4;
/// Workshop gains a card costing up to this much.
const WORKSHOP_COST: i64 = 4;
/// Remodel gains a card costing this much more than the trashed one.
const REMODEL_BONUS: i64 = 2;

/// A small Dominion-like game for 2-4 players.
///
/// ## Example
///
/// ```
/// use deckr_engine::core::PlayerId;
/// use deckr_engine::games::deckbuilder::{self, Deckbuilder};
///
/// let mut game = Deckbuilder::new_game(7).unwrap();
/// let first = game.add_player().unwrap();
/// game.add_player().unwrap();
/// game.start_game().unwrap();
///
/// let hand = game.player_zone(first, "hand").unwrap();
/// assert_eq!(game.zone_size(hand), 5);
/// assert_eq!(deckbuilder::current_player(&game), Some(first));
/// ```
#[derive(Clone, Copy, Debug, Default)]
pub struct Deckbuilder;

impl Deckbuilder {
    /// Zone layout and card list.
    #[must_use]
    pub fn config(seed: u64) -> GameConfig {
        GameConfig::new("deckbuilder", 2, 4)
            .with_seed(seed)
            .with_game_zone(ZoneTemplate::new("trash"))
            .with_game_zone(
                ZoneTemplate::new(SUPPLY)
                    .stacked()
                    .with_type(SUPPLY)
                    .with_multiplicity(KINGDOM.len()),
            )
            .with_player_zone(ZoneTemplate::new("deck").stacked())
            .with_player_zone(ZoneTemplate::new("hand"))
            .with_player_zone(ZoneTemplate::new("discard").stacked())
            .with_player_zone(ZoneTemplate::new("play"))
            .with_cards(cards::catalog())
    }

    /// Create an empty table.
    pub fn new_game(seed: u64) -> Result<Game> {
        Game::new(Self::config(seed), Deckbuilder)
    }
}

impl GameRules for Deckbuilder {
    fn register(&self, book: &mut Rulebook) {
        book.action(
            ActionDef::new("play_card", play_card)
                .param("card", ArgType::entity(KIND_CARD))
                .restrict("not your turn", is_current)
                .restrict("not in the action phase", |game, _, _| phase(game) == Some(ACTION_PHASE))
                .restrict("card is not in your hand", |game, player, args| {
                    args.entity("card").is_some_and(|card| in_zone(game, player, "hand", card))
                })
                .restrict("not an action card", |game, _, args| {
                    args.entity("card").is_some_and(|card| is_type(game, card, ACTION))
                })
                .restrict("no actions remaining", |game, player, _| counter(game, player, "actions") > 0)
                .restrict("nothing to choose for this card", |game, player, args| {
                    args.entity("card").is_some_and(|card| has_choice(game, player, card))
                }),
        )
        .action(ActionDef::new("play_treasures", play_treasures).restrict("not your turn", is_current))
        .action(
            ActionDef::new("buy_card", buy_card)
                .param("zone", ArgType::entity(KIND_ZONE))
                .restrict("not your turn", is_current)
                .restrict("not a supply pile", |game, _, args| {
                    args.entity("zone").is_some_and(|zone| game.text(zone, "zone_type") == Some(SUPPLY))
                })
                .restrict("no buys remaining", |game, player, _| counter(game, player, "buys") > 0)
                .restrict("pile is empty", |game, _, args| {
                    args.entity("zone").is_some_and(|zone| game.top_card(zone).is_some())
                })
                .restrict("not enough coins", |game, player, args| {
                    args.entity("zone")
                        .and_then(|zone| top_cost(game, zone))
                        .is_some_and(|cost| cost <= counter(game, player, "coins"))
                }),
        )
        .action(ActionDef::new("end_turn", end_turn).restrict("not your turn", is_current));

        book.step(StepDef::new(DRAW_CARDS, draw_cards).requires(Requirement::new("count", ArgType::Int)))
            .step(
                StepDef::new(DISCARD_CARDS, discard_cards).requires(
                    Requirement::list("cards", ArgType::entity(KIND_CARD))
                        .with_prompt("Choose any number of cards to discard")
                        .with_test(|game, player, args| all_in_hand(game, player, &args.entities("cards"))),
                ),
            )
            .step(
                StepDef::new(TRASH_CARDS, trash_cards).requires(
                    Requirement::list("cards", ArgType::entity(KIND_CARD))
                        .with_prompt("Choose up to 4 cards to trash")
                        .with_test(|game, player, args| {
                            let cards = args.entities("cards");
                            cards.len() <= CHAPEL_LIMIT && all_in_hand(game, player, &cards)
                        }),
                ),
            )
            .step(
                StepDef::new(TRASH_CARD, trash_card).requires(
                    Requirement::new("card", ArgType::entity(KIND_CARD))
                        .with_prompt("Choose a card to trash")
                        .with_test(|game, player, args| {
                            args.entity("card").is_some_and(|card| in_zone(game, player, "hand", card))
                        }),
                ),
            )
            .step(
                StepDef::new(GAIN_CARD, gain_card).requires(
                    Requirement::new("zone", ArgType::entity(KIND_ZONE))
                        .with_prompt("Choose a supply pile to gain from")
                        .with_test(|game, _, args| {
                            let max_cost = args.int("max_cost").unwrap_or(0);
                            args.entity("zone")
                                .filter(|zone| game.text(*zone, "zone_type") == Some(SUPPLY))
                                .and_then(|zone| top_cost(game, zone))
                                .is_some_and(|cost| cost <= max_cost)
                        }),
                ),
            );
    }

    fn set_up(&self, game: &mut Game) -> Result<()> {
        game.track(EntityId::ROOT, "phase")?;
        game.track(EntityId::ROOT, "current_player")?;

        let players = game.players().to_vec();
        let piles: Vec<EntityId> = supply_piles(game).collect();
        for (zone, name) in piles.into_iter().zip(KINGDOM) {
            game.track(zone, "pile")?;
            game.set(zone, "pile", name)?;

            // Supply cards are public from the start.
            let cards: Vec<Entity> = game
                .config()
                .cards
                .instantiate(name, cards::pile_size(name, players.len()))
                .ok_or_else(|| GameError::UnknownCard(name.to_string()))?
                .into_iter()
                .map(|card| card.with_tracked("face_up", true))
                .collect();
            for card in game.register_all(cards) {
                game.push(zone, card)?;
            }
        }

        for &player in &players {
            for name in ["actions", "buys", "coins"] {
                game.track(player.entity(), name)?;
                game.set(player.entity(), name, 0)?;
            }

            let deck = zone_of(game, player, "deck")?;
            let mut starting = game.create_cards("Copper", 7)?;
            starting.extend(game.create_cards("Estate", 3)?);
            for card in starting {
                game.push(deck, card)?;
            }
            game.shuffle_zone(deck)?;
            game.enqueue(PendingStep::new(player, DRAW_CARDS).with_arg("count", HAND_SIZE))?;
        }

        let first = players
            .first()
            .copied()
            .ok_or_else(|| GameError::state("no players"))?;
        start_turn(game, first)
    }

    fn is_over(&self, game: &Game) -> bool {
        let provinces_gone = pile(game, "Province").is_some_and(|zone| game.zone_size(zone) == 0);
        let empty_piles = supply_piles(game).filter(|zone| game.zone_size(*zone) == 0).count();
        provinces_gone || empty_piles >= 3
    }

    fn winners(&self, game: &Game) -> Vec<PlayerId> {
        let scores: Vec<(PlayerId, i64)> = game
            .players()
            .iter()
            .map(|&player| (player, victory_points(game, player)))
            .collect();
        let Some(best) = scores.iter().map(|(_, score)| *score).max() else {
            return Vec::new();
        };
        scores
            .into_iter()
            .filter(|(_, score)| *score == best)
            .map(|(player, _)| player)
            .collect()
    }
}

// === Queries ===

/// Player whose turn it is.
#[must_use]
pub fn current_player(game: &Game) -> Option<PlayerId> {
    game.get(EntityId::ROOT, "current_player").and_then(Value::as_player)
}

/// Current turn phase.
#[must_use]
pub fn phase(game: &Game) -> Option<&str> {
    game.text(EntityId::ROOT, "phase")
}

/// A player's `actions`, `buys` or `coins`.
#[must_use]
pub fn counter(game: &Game, player: PlayerId, name: &str) -> i64 {
    game.int(player.entity(), name).unwrap_or(0)
}

/// Supply piles in zone name order.
pub fn supply_piles(game: &Game) -> impl Iterator<Item = EntityId> + '_ {
    game.zones()
        .map(|(_, zone)| zone)
        .filter(move |zone| game.text(*zone, "zone_type") == Some(SUPPLY))
}

/// Supply pile holding a card name.
#[must_use]
pub fn pile(game: &Game, name: &str) -> Option<EntityId> {
    supply_piles(game).find(|zone| game.text(*zone, "pile") == Some(name))
}

/// Victory points across all of a player's zones.
#[must_use]
pub fn victory_points(game: &Game, player: PlayerId) -> i64 {
    ["deck", "hand", "discard", "play"]
        .into_iter()
        .filter_map(|name| game.player_zone(player, name))
        .flat_map(|zone| game.cards_in_zone(zone))
        .map(|card| game.int(card, "victory").unwrap_or(0))
        .sum()
}

fn is_current(game: &Game, player: PlayerId, _args: &Args) -> bool {
    current_player(game) == Some(player)
}

fn is_type(game: &Game, card: EntityId, kind: &str) -> bool {
    game.get(card, "types").is_some_and(|types| types.contains_text(kind))
}

fn in_zone(game: &Game, player: PlayerId, zone: &str, card: EntityId) -> bool {
    game.player_zone(player, zone).is_some_and(|zone| game.zone_contains(zone, card))
}

fn all_in_hand(game: &Game, player: PlayerId, cards: &[EntityId]) -> bool {
    cards.iter().all(|card| in_zone(game, player, "hand", *card))
}

/// Can the card's follow-up choice be answered?
///
/// Remodel needs another card in hand and Workshop an affordable pile;
/// without one the prompt could never be satisfied.
fn has_choice(game: &Game, player: PlayerId, card: EntityId) -> bool {
    match game.text(card, "name") {
        Some("Remodel") => game
            .player_zone(player, "hand")
            .is_some_and(|hand| game.cards_in_zone(hand).into_iter().any(|other| other != card)),
        Some("Workshop") => {
            supply_piles(game).any(|zone| top_cost(game, zone).is_some_and(|cost| cost <= WORKSHOP_COST))
        }
        _ => true,
    }
}

fn top_cost(game: &Game, zone: EntityId) -> Option<i64> {
    game.top_card(zone).map(|card| game.int(card, "cost").unwrap_or(0))
}

fn zone_of(game: &Game, player: PlayerId, name: &str) -> Result<EntityId> {
    game.player_zone(player, name)
        .ok_or_else(|| GameError::state(format!("{} has no {} zone", player, name)))
}

// === Mutations ===

fn adjust(game: &mut Game, player: PlayerId, name: &str, delta: i64) -> Result<()> {
    let value = counter(game, player, name) + delta;
    game.set(player.entity(), name, value)
}

fn start_turn(game: &mut Game, player: PlayerId) -> Result<()> {
    game.set(EntityId::ROOT, "current_player", player)?;
    game.set(EntityId::ROOT, "phase", ACTION_PHASE)?;
    game.set(player.entity(), "actions", 1)?;
    game.set(player.entity(), "buys", 1)?;
    game.set(player.entity(), "coins", 0)
}

/// Move a card to a public zone, face up for everyone.
fn reveal_into(game: &mut Game, player: PlayerId, card: EntityId, zone: EntityId) -> Result<()> {
    game.move_to_zone(card, zone)?;
    game.set(card, "face_up", true)?;
    game.clear_override(card, player, "face_up")
}

fn draw(game: &mut Game, player: PlayerId, count: i64) -> Result<usize> {
    let deck = zone_of(game, player, "deck")?;
    let hand = zone_of(game, player, "hand")?;

    let mut drawn = 0;
    for _ in 0..count.max(0) {
        if game.zone_size(deck) == 0 {
            reshuffle(game, player)?;
        }
        let Some(card) = game.pop_top(deck)? else {
            break;
        };
        game.add_to_zone(hand, card)?;
        game.set_for(card, player, "face_up", true)?;
        drawn += 1;
    }
    Ok(drawn)
}

fn reshuffle(game: &mut Game, player: PlayerId) -> Result<()> {
    let deck = zone_of(game, player, "deck")?;
    let discard = zone_of(game, player, "discard")?;
    for card in game.pop_all(discard)? {
        game.set(card, "face_up", false)?;
        game.push(deck, card)?;
    }
    game.shuffle_zone(deck)
}

// === Actions ===

fn play_card(game: &mut Game, player: PlayerId, args: &Args) -> Result<()> {
    let card = args.entity("card").ok_or_else(|| GameError::invalid("no card given"))?;
    let play = zone_of(game, player, "play")?;

    adjust(game, player, "actions", -1)?;
    reveal_into(game, player, card, play)?;

    let bonus = |name: &str| game.int(card, name).unwrap_or(0);
    let (draws, actions, buys, coins) = (bonus("cards"), bonus("actions"), bonus("buys"), bonus("coins"));
    adjust(game, player, "actions", actions)?;
    adjust(game, player, "buys", buys)?;
    adjust(game, player, "coins", coins)?;
    if draws > 0 {
        game.enqueue(PendingStep::new(player, DRAW_CARDS).with_arg("count", draws))?;
    }

    let name = game.text(card, "name").unwrap_or_default().to_string();
    match name.as_str() {
        "Cellar" => {
            game.enqueue(PendingStep::new(player, DISCARD_CARDS).save_as("discarded"))?;
            game.enqueue(PendingStep::new(player, DRAW_CARDS).using("count", "discarded"))?;
        }
        "Chapel" => game.enqueue(PendingStep::new(player, TRASH_CARDS))?,
        "Workshop" => game.enqueue(PendingStep::new(player, GAIN_CARD).with_arg("max_cost", WORKSHOP_COST))?,
        "Remodel" => {
            game.enqueue(PendingStep::new(player, TRASH_CARD).save_as("max_cost"))?;
            game.enqueue(PendingStep::new(player, GAIN_CARD).using("max_cost", "max_cost"))?;
        }
        _ => {}
    }
    Ok(())
}

fn play_treasures(game: &mut Game, player: PlayerId, _args: &Args) -> Result<()> {
    let hand = zone_of(game, player, "hand")?;
    let play = zone_of(game, player, "play")?;

    let treasures: Vec<EntityId> = game
        .cards_in_zone(hand)
        .into_iter()
        .filter(|card| is_type(game, *card, TREASURE))
        .collect();
    for card in treasures {
        let coins = game.int(card, "coins").unwrap_or(0);
        reveal_into(game, player, card, play)?;
        adjust(game, player, "coins", coins)?;
    }
    game.set(EntityId::ROOT, "phase", BUY_PHASE)
}

fn buy_card(game: &mut Game, player: PlayerId, args: &Args) -> Result<()> {
    let zone = args.entity("zone").ok_or_else(|| GameError::invalid("no pile given"))?;
    let card = game.top_card(zone).ok_or_else(|| GameError::invalid("pile is empty"))?;
    let discard = zone_of(game, player, "discard")?;
    let cost = game.int(card, "cost").unwrap_or(0);

    adjust(game, player, "coins", -cost)?;
    adjust(game, player, "buys", -1)?;
    game.set(EntityId::ROOT, "phase", BUY_PHASE)?;
    game.move_to_zone(card, discard)?;
    Ok(())
}

fn end_turn(game: &mut Game, player: PlayerId, _args: &Args) -> Result<()> {
    let discard = zone_of(game, player, "discard")?;
    for name in ["play", "hand"] {
        let zone = zone_of(game, player, name)?;
        for card in game.cards_in_zone(zone) {
            reveal_into(game, player, card, discard)?;
        }
    }
    for name in ["actions", "buys", "coins"] {
        game.set(player.entity(), name, 0)?;
    }
    game.enqueue(PendingStep::new(player, DRAW_CARDS).with_arg("count", HAND_SIZE))?;

    let players = game.players();
    let next = players
        .iter()
        .position(|p| *p == player)
        .map(|index| players[(index + 1) % players.len()])
        .ok_or_else(|| GameError::state(format!("{} is not seated", player)))?;
    start_turn(game, next)
}

// === Steps ===

fn draw_cards(game: &mut Game, player: PlayerId, args: &Args) -> Result<Value> {
    let count = args.int("count").unwrap_or(0);
    Ok(Value::from(draw(game, player, count)?))
}

fn discard_cards(game: &mut Game, player: PlayerId, args: &Args) -> Result<Value> {
    let discard = zone_of(game, player, "discard")?;
    let cards = args.entities("cards");
    for &card in &cards {
        reveal_into(game, player, card, discard)?;
    }
    Ok(Value::from(cards.len()))
}

fn trash_cards(game: &mut Game, player: PlayerId, args: &Args) -> Result<Value> {
    let trash = game.zone("trash").ok_or_else(|| GameError::state("no trash zone"))?;
    let cards = args.entities("cards");
    for &card in &cards {
        reveal_into(game, player, card, trash)?;
    }
    Ok(Value::from(cards.len()))
}

fn trash_card(game: &mut Game, player: PlayerId, args: &Args) -> Result<Value> {
    let trash = game.zone("trash").ok_or_else(|| GameError::state("no trash zone"))?;
    let card = args.entity("card").ok_or_else(|| GameError::invalid("no card given"))?;
    let cost = game.int(card, "cost").unwrap_or(0);
    reveal_into(game, player, card, trash)?;
    Ok(Value::from(cost + REMODEL_BONUS))
}

fn gain_card(game: &mut Game, player: PlayerId, args: &Args) -> Result<Value> {
    let zone = args.entity("zone").ok_or_else(|| GameError::invalid("no pile given"))?;
    let discard = zone_of(game, player, "discard")?;
    let card = game.top_card(zone).ok_or_else(|| GameError::invalid("pile is empty"))?;
    game.move_to_zone(card, discard)?;
    Ok(Value::from(card))
}
