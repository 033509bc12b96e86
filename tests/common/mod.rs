//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::{Arc, OnceLock};

use deckr_engine::core::{Args, EntityId, GameConfig, PlayerId, Result, Value, ZoneTemplate};
use deckr_engine::cards::{CardCatalog, CardTemplate};
use deckr_engine::game::Game;
use deckr_engine::rules::{GameRules, Rulebook};
use tracing_subscriber::{fmt, EnvFilter};

static LOGGING: OnceLock<()> = OnceLock::new();

/// Initialize test logging once.
///
/// Level comes from `TEST_LOG`, then `RUST_LOG`, then defaults to `warn`.
pub fn init_logging() {
    LOGGING.get_or_init(|| {
        let filter = std::env::var("TEST_LOG")
            .or_else(|_| std::env::var("RUST_LOG"))
            .map(EnvFilter::new)
            .unwrap_or_else(|_| EnvFilter::new("warn"));

        fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .without_time()
            .try_init()
            .ok();
    });
}

type Register = Arc<dyn Fn(&mut Rulebook) + Send + Sync>;
type SetUp = Arc<dyn Fn(&mut Game) -> Result<()> + Send + Sync>;

/// Rules assembled by each test.
///
/// The game is over once the root `over` attribute is true; winners are
/// the players whose `won` attribute is true.
#[derive(Clone)]
pub struct TestRules {
    register: Register,
    set_up: SetUp,
}

impl TestRules {
    pub fn new(register: impl Fn(&mut Rulebook) + Send + Sync + 'static) -> Self {
        Self {
            register: Arc::new(register),
            set_up: Arc::new(no_set_up),
        }
    }

    pub fn empty() -> Self {
        Self::new(|_| {})
    }

    pub fn with_set_up(mut self, set_up: impl Fn(&mut Game) -> Result<()> + Send + Sync + 'static) -> Self {
        self.set_up = Arc::new(set_up);
        self
    }
}

fn no_set_up(_game: &mut Game) -> Result<()> {
    Ok(())
}

impl GameRules for TestRules {
    fn register(&self, book: &mut Rulebook) {
        (self.register)(book);
    }

    fn set_up(&self, game: &mut Game) -> Result<()> {
        (self.set_up)(game)
    }

    fn is_over(&self, game: &Game) -> bool {
        game.get(EntityId::ROOT, "over").and_then(Value::as_bool) == Some(true)
    }

    fn winners(&self, game: &Game) -> Vec<PlayerId> {
        game.players()
            .iter()
            .copied()
            .filter(|player| game.get(player.entity(), "won").and_then(Value::as_bool) == Some(true))
            .collect()
    }
}

/// Cards used by the tests.
pub fn catalog() -> CardCatalog {
    CardCatalog::new()
        .with(CardTemplate::new("Token").with_attr("power", 1).with_tracked("face_up", false))
        .with(CardTemplate::new("Gem").with_attr("power", 3).with_tracked("face_up", false))
}

/// Game zones `pile` (stacked) and `board`; player zones `hand`, `deck`
/// and `discard`.
pub fn config(min_players: usize, max_players: usize) -> GameConfig {
    GameConfig::new("test", min_players, max_players)
        .with_seed(42)
        .with_game_zone(ZoneTemplate::new("pile").stacked())
        .with_game_zone(ZoneTemplate::new("board"))
        .with_player_zone(ZoneTemplate::new("hand"))
        .with_player_zone(ZoneTemplate::new("deck").stacked())
        .with_player_zone(ZoneTemplate::new("discard").stacked())
        .with_cards(catalog())
}

/// A game with `players` seated and set up.
pub fn started(rules: TestRules, players: usize) -> (Game, Vec<PlayerId>) {
    init_logging();
    let mut game = Game::new(config(1, players.max(1)), rules).unwrap();
    let seated = (0..players).map(|_| game.add_player().unwrap()).collect();
    game.start_game().unwrap();
    (game, seated)
}

/// Shorthand for a single-argument `Args`.
pub fn arg(name: &str, value: impl Into<Value>) -> Args {
    Args::new().with(name, value)
}
