//! # Palace
//!
//! A rules engine for the Palace shedding card game (also played as
//! Shithead or Karma): up to four players race to shed a hidden hand,
//! three face-up visible cards, and three face-down blind cards.
//!
//! This library is the core of a larger system: it decides whether a
//! proposed move is legal, mutates the shared piles, rotates the turn
//! order, detects pile clears and winners, and produces/reconstructs a
//! fully serializable snapshot of game state. Transports, storage and
//! interfaces live in external collaborators that drive the engine
//! through its public operations and persist [`GameSnapshot`]s.
//!
//! ## Architecture
//!
//! A game moves through four phases:
//!
//! - **Setup**: a [`Game`] is constructed empty
//! - **Dealt**: `start_new_game` deals 3 blind, 3 visible, and 3 hand
//!   cards to each player; players swap and mark themselves ready
//! - **Active**: `play` fixes the opening player; turns proceed through
//!   `throw_cards`, `take_cards_from_pile`, and `take_blind_card`
//! - **Over**: one player is left holding cards and every mutator rejects
//!
//! ## Core Modules
//!
//! - [`game::entities`]: cards, the deck, and player zones
//! - [`game::pile`]: the stacking validator and its atomic effect
//! - [`game::snapshot`]: serializable snapshots and their JSON surface
//!
//! ## Example
//!
//! ```
//! use palace::Game;
//!
//! let mut game = Game::new();
//! game.start_new_game(["alice", "bob", "carol"]).unwrap();
//!
//! let ids: Vec<_> = game.players().iter().map(|p| p.id).collect();
//! for id in ids {
//!     game.mark_ready(id).unwrap();
//! }
//! let opener = game.play().unwrap();
//! assert_eq!(Some(opener.id), game.current_player().map(|p| p.id));
//! ```

/// Core game logic, entities, and the turn engine.
pub mod game;
pub use game::{
    Game, GameError, GameEvent,
    constants::{self, MAX_PLAYERS, MIN_PLAYERS},
    entities::{Card, CardId, Deck, Player, PlayerId, Rank, Suit, Weight},
    pile::{PileError, ThrowOutcome},
    snapshot::{GameSnapshot, SnapshotError},
};
