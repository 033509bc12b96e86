//! Card list and supply layout.

use crate::cards::{CardCatalog, CardTemplate};

/// Card type of kingdom cards that are played for an effect.
pub const ACTION: &str = "action";
/// Card type of cards worth `coins`.
pub const TREASURE: &str = "treasure";
/// Card type of cards worth `victory` points.
pub const VICTORY: &str = "victory";

/// Names of the supply piles, one per supply zone.
pub const KINGDOM: [&str; 12] = [
    "Copper", "Silver", "Gold", "Estate", "Duchy", "Province", "Village", "Smithy", "Cellar", "Chapel", "Workshop",
    "Remodel",
];

fn card(name: &str, cost: i64, kind: &str) -> CardTemplate {
    CardTemplate::new(name)
        .with_attr("cost", cost)
        .with_attr("types", vec![kind])
        .with_tracked("face_up", false)
}

/// Every card of the game.
#[must_use]
pub fn catalog() -> CardCatalog {
    CardCatalog::new()
        .with(card("Copper", 0, TREASURE).with_attr("coins", 1))
        .with(card("Silver", 3, TREASURE).with_attr("coins", 2))
        .with(card("Gold", 6, TREASURE).with_attr("coins", 3))
        .with(card("Estate", 2, VICTORY).with_attr("victory", 1))
        .with(card("Duchy", 5, VICTORY).with_attr("victory", 3))
        .with(card("Province", 8, VICTORY).with_attr("victory", 6))
        .with(card("Village", 3, ACTION).with_attr("cards", 1).with_attr("actions", 2))
        .with(card("Smithy", 4, ACTION).with_attr("cards", 3))
        .with(card("Cellar", 2, ACTION).with_attr("actions", 1))
        .with(card("Chapel", 2, ACTION))
        .with(card("Workshop", 3, ACTION))
        .with(card("Remodel", 4, ACTION))
}

/// Starting size of a supply pile.
#[must_use]
pub fn pile_size(name: &str, players: usize) -> usize {
    match name {
        "Copper" => 60 - 7 * players,
        "Silver" => 40,
        "Gold" => 30,
        "Estate" | "Duchy" | "Province" if players <= 2 => 8,
        "Estate" | "Duchy" | "Province" => 12,
        _ => 10,
    }
}
