//! Shedding game turn engine.
//!
//! A [`Game`] moves through four phases, all derived from its data so a
//! snapshot round-trips without a phase field:
//!
//! - **Setup**: constructed empty, no players yet.
//! - **Dealt**: players hold their zones but not everyone is ready.
//! - **Active**: an opening player has been fixed by [`Game::play`] and
//!   turns proceed through the mutators.
//! - **Over**: `game_over` is set and every mutator rejects.
//!
//! Mutators run to completion without suspension and must be serialized
//! per instance by the host; distinct games are fully independent.

use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::{collections::VecDeque, fmt};
use thiserror::Error;

use super::constants::{MAX_PLAYERS, MIN_PLAYERS, ZONE_SIZE};
use super::entities::{Card, CardId, Deck, Player, PlayerId, Weight};
use super::pile::{self, PileError, ThrowOutcome};

/// Errors reported by the game engine. Every rejected operation leaves the
/// game unchanged.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum GameError {
    #[error("blind cards cannot be drawn yet")]
    BlindDrawNotAllowed,
    #[error("game is full")]
    CapacityReached,
    #[error("cards cannot be swapped")]
    CannotSwap,
    #[error("player ids must be unique")]
    DuplicatePlayer,
    #[error("game already in progress")]
    GameAlreadyInProgress,
    #[error("game has not started")]
    GameNotStarted,
    #[error("game is over")]
    GameOver,
    #[error(transparent)]
    IllegalThrow(#[from] PileError),
    #[error("no blind card at slot {0}")]
    NoBlindCard(usize),
    #[error("need 2+ players")]
    NotEnoughPlayers,
    #[error("not your turn")]
    OutOfTurnAction,
    #[error("not everyone is ready")]
    PlayersNotReady,
    #[error("player does not exist")]
    UnknownPlayer,
}

/// Events that occur during gameplay. Drained by the host via
/// [`Game::drain_events`]; not part of snapshots.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub enum GameEvent {
    BlindCardDrawn { player: String, index: usize },
    CardsThrown { player: String, count: usize },
    GameOver { player: String },
    GameStarted { opener: String },
    PileBurned { player: String, count: usize },
    PilePickedUp { player: String, count: usize },
    PlayerWon { player: String },
}

impl fmt::Display for GameEvent {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::BlindCardDrawn { player, index } => {
                format!("{player} draws blind card {index}")
            }
            Self::CardsThrown { player, count } => format!("{player} throws {count} card(s)"),
            Self::GameOver { player } => format!("game over, {player} takes the loss"),
            Self::GameStarted { opener } => format!("{opener} opens the game"),
            Self::PileBurned { player, count } => {
                format!("{player} burns the pile ({count} cards out of play)")
            }
            Self::PilePickedUp { player, count } => {
                format!("{player} picks up the pile ({count} cards)")
            }
            Self::PlayerWon { player } => format!("{player} is out"),
        };
        write!(f, "{repr}")
    }
}

/// The turn/state engine: owns the players, the draw and discard piles,
/// the removed set, the turn pointer and the finish order.
#[derive(Clone, Debug, Default)]
pub struct Game {
    pub(crate) players: Vec<Player>,
    pub(crate) draw_pile: Vec<Card>,
    pub(crate) pile: Vec<Card>,
    pub(crate) removed_cards: Vec<Card>,
    pub(crate) current: Option<usize>,
    pub(crate) winners: Vec<PlayerId>,
    pub(crate) game_over: bool,
    pub(crate) events: VecDeque<GameEvent>,
}

impl Game {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    // === Read accessors ===

    /// All players in fixed turn order.
    #[must_use]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    #[must_use]
    pub fn player(&self, id: PlayerId) -> Option<&Player> {
        self.players.iter().find(|p| p.id == id)
    }

    #[must_use]
    pub fn current_player(&self) -> Option<&Player> {
        self.current.and_then(|idx| self.players.get(idx))
    }

    /// Players that have finished, in finish order. Once the game is over
    /// the last entry is the losing player.
    #[must_use]
    pub fn winners(&self) -> Vec<&Player> {
        self.winners
            .iter()
            .filter_map(|id| self.players.iter().find(|p| p.id == *id))
            .collect()
    }

    /// The discard pile, bottom to top.
    #[must_use]
    pub fn pile(&self) -> &[Card] {
        &self.pile
    }

    /// The draw pile, bottom to top.
    #[must_use]
    pub fn draw_pile(&self) -> &[Card] {
        &self.draw_pile
    }

    /// Cards permanently out of play.
    #[must_use]
    pub fn removed_cards(&self) -> &[Card] {
        &self.removed_cards
    }

    #[must_use]
    pub fn is_over(&self) -> bool {
        self.game_over
    }

    /// Drain pending game events.
    pub fn drain_events(&mut self) -> VecDeque<GameEvent> {
        std::mem::take(&mut self.events)
    }

    // === Mutators ===

    /// Start a new game for the named players: fresh player ids, a fresh
    /// shuffled deck, and 3 blind + 3 visible + 3 hand cards dealt to each
    /// player in order from the top of the draw pile.
    pub fn start_new_game<I, S>(&mut self, names: I) -> Result<(), GameError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let players = names.into_iter().map(Player::new).collect();
        self.start_with(players)
    }

    /// Like [`Game::start_new_game`], for collaborators that manage player
    /// identity themselves and hand in `(id, name)` pairs.
    pub fn start_new_game_with_players<I, S>(&mut self, players: I) -> Result<(), GameError>
    where
        I: IntoIterator<Item = (PlayerId, S)>,
        S: Into<String>,
    {
        let players = players
            .into_iter()
            .map(|(id, name)| Player::with_id(id, name))
            .collect();
        self.start_with(players)
    }

    fn start_with(&mut self, players: Vec<Player>) -> Result<(), GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        if !self.players.is_empty() {
            return Err(GameError::GameAlreadyInProgress);
        }
        if players.len() < MIN_PLAYERS {
            return Err(GameError::NotEnoughPlayers);
        }
        if players.len() > MAX_PLAYERS {
            return Err(GameError::CapacityReached);
        }
        for (i, player) in players.iter().enumerate() {
            if players[..i].iter().any(|p| p.id == player.id) {
                return Err(GameError::DuplicatePlayer);
            }
        }

        self.players = players;
        self.draw_pile = Deck::shuffled().into_cards();
        for idx in 0..self.players.len() {
            for _ in 0..ZONE_SIZE {
                if let Some(card) = self.draw_pile.pop() {
                    self.players[idx].blind_cards.push(Some(card));
                }
            }
            for _ in 0..ZONE_SIZE {
                if let Some(card) = self.draw_pile.pop() {
                    self.players[idx].visible_cards.push(card);
                }
            }
            for _ in 0..ZONE_SIZE {
                if let Some(card) = self.draw_pile.pop() {
                    self.players[idx].hand.push(card);
                }
            }
        }
        debug!(
            "dealt {} players, {} cards left to draw",
            self.players.len(),
            self.draw_pile.len()
        );
        Ok(())
    }

    /// Fix the opening player once everyone is ready: the player holding
    /// the card with the lowest order level opens (rank 2 outranks Ace
    /// there), ties going to the first such player in turn order. Fails
    /// with [`GameError::PlayersNotReady`] until every player is ready and
    /// is idempotent afterwards, returning the current player.
    pub fn play(&mut self) -> Result<&Player, GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        if self.players.is_empty() {
            return Err(GameError::GameNotStarted);
        }
        if let Some(idx) = self.current {
            return Ok(&self.players[idx]);
        }
        if !self.players.iter().all(|p| p.ready) {
            return Err(GameError::PlayersNotReady);
        }

        let idx = self
            .players
            .iter()
            .enumerate()
            .min_by_key(|(_, p)| p.min_order_level().unwrap_or(Weight::MAX))
            .map(|(idx, _)| idx)
            .ok_or(GameError::GameNotStarted)?;
        self.current = Some(idx);
        let opener = self.players[idx].name.clone();
        info!("{opener} opens the game");
        self.events.push_back(GameEvent::GameStarted { opener });
        Ok(&self.players[idx])
    }

    /// Mark a player ready, sorting their hand. Irreversible; idempotent.
    pub fn mark_ready(&mut self, player: PlayerId) -> Result<(), GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        let idx = self.player_index(player).ok_or(GameError::UnknownPlayer)?;
        self.players[idx].mark_ready();
        Ok(())
    }

    /// Exchange one hand card with one visible card before the player is
    /// ready.
    pub fn swap_cards(
        &mut self,
        player: PlayerId,
        hand_card: CardId,
        visible_card: CardId,
    ) -> Result<(), GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        let idx = self.player_index(player).ok_or(GameError::UnknownPlayer)?;
        if self.players[idx].swap(hand_card, visible_card) {
            Ok(())
        } else {
            Err(GameError::CannotSwap)
        }
    }

    /// Throw a same-rank burst of hand cards onto the pile.
    ///
    /// On success the hand is replenished from the draw pile up to 3
    /// cards; once the draw pile is dry a short hand absorbs the whole
    /// visible zone; a player with nothing left to play is appended to the
    /// winners and the turn advances to the next non-winner — except that
    /// clearing the pile lets the thrower play again.
    pub fn throw_cards(&mut self, player: PlayerId, cards: &[CardId]) -> Result<(), GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        let current = self.current.ok_or(GameError::GameNotStarted)?;
        let idx = self.player_index(player).ok_or(GameError::UnknownPlayer)?;
        if idx != current {
            return Err(GameError::OutOfTurnAction);
        }

        let removed_before = self.removed_cards.len();
        let outcome = pile::add_cards(
            &mut self.players[idx],
            cards,
            &mut self.pile,
            &mut self.removed_cards,
        )?;

        let name = self.players[idx].name.clone();
        self.events.push_back(GameEvent::CardsThrown {
            player: name.clone(),
            count: cards.len(),
        });
        if outcome == ThrowOutcome::Burned {
            let count = self.removed_cards.len() - removed_before;
            debug!("{name} burned the pile, {count} cards out of play");
            self.events
                .push_back(GameEvent::PileBurned { player: name, count });
        }

        self.replenish_hand(idx);
        self.take_visible_cards(idx);
        self.check_win(idx);
        if !self.game_over {
            let thrower = self.players[idx].id;
            let retain = outcome == ThrowOutcome::Burned && !self.winners.contains(&thrower);
            self.advance_turn(retain);
        }
        Ok(())
    }

    /// The penalty move: the current player picks up the entire discard
    /// pile into their hand and the turn passes on, even when the pile was
    /// empty.
    pub fn take_cards_from_pile(&mut self, player: PlayerId) -> Result<(), GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        let current = self.current.ok_or(GameError::GameNotStarted)?;
        let idx = self.player_index(player).ok_or(GameError::UnknownPlayer)?;
        if idx != current {
            return Err(GameError::OutOfTurnAction);
        }

        let count = self.pile.len();
        let picked = &mut self.players[idx];
        picked.hand.append(&mut self.pile);
        picked.sort_hand();
        let name = picked.name.clone();
        debug!("{name} picks up the pile ({count} cards)");
        self.events
            .push_back(GameEvent::PilePickedUp { player: name, count });
        self.advance_turn(false);
        Ok(())
    }

    /// Draw one blind card by position. Legal only for the current player
    /// once the draw pile, their visible zone and their hand are all
    /// empty.
    pub fn take_blind_card(&mut self, player: PlayerId, index: usize) -> Result<(), GameError> {
        if self.game_over {
            return Err(GameError::GameOver);
        }
        let current = self.current.ok_or(GameError::GameNotStarted)?;
        let idx = self.player_index(player).ok_or(GameError::UnknownPlayer)?;
        if idx != current {
            return Err(GameError::OutOfTurnAction);
        }
        if !self.draw_pile.is_empty() {
            return Err(GameError::BlindDrawNotAllowed);
        }
        let drawer = &mut self.players[idx];
        if !drawer.visible_cards.is_empty() || !drawer.hand.is_empty() {
            return Err(GameError::BlindDrawNotAllowed);
        }
        if !drawer.pull_blind_card(index) {
            return Err(GameError::NoBlindCard(index));
        }
        let name = drawer.name.clone();
        self.events
            .push_back(GameEvent::BlindCardDrawn { player: name, index });
        Ok(())
    }

    // === Internals ===

    fn player_index(&self, id: PlayerId) -> Option<usize> {
        self.players.iter().position(|p| p.id == id)
    }

    /// Top up the hand to 3 cards while the draw pile lasts.
    fn replenish_hand(&mut self, idx: usize) {
        let player = &mut self.players[idx];
        while player.hand.len() < ZONE_SIZE {
            let Some(card) = self.draw_pile.pop() else {
                break;
            };
            player.hand.push(card);
        }
    }

    /// Once the draw pile is dry, a hand below 3 cards absorbs the whole
    /// visible zone.
    fn take_visible_cards(&mut self, idx: usize) {
        if !self.draw_pile.is_empty() {
            return;
        }
        let player = &mut self.players[idx];
        if player.hand.len() >= ZONE_SIZE || player.visible_cards.is_empty() {
            return;
        }
        player.hand.append(&mut player.visible_cards);
        player.sort_hand();
    }

    fn check_win(&mut self, idx: usize) {
        let id = self.players[idx].id;
        if !self.players[idx].is_finished() || self.winners.contains(&id) {
            return;
        }
        let name = self.players[idx].name.clone();
        info!("{name} is out");
        self.winners.push(id);
        self.events.push_back(GameEvent::PlayerWon { player: name });
        self.check_game_over();
    }

    fn check_game_over(&mut self) {
        let remaining: Vec<usize> = (0..self.players.len())
            .filter(|&idx| !self.winners.contains(&self.players[idx].id))
            .collect();
        if remaining.len() > 1 {
            return;
        }
        if let Some(&last) = remaining.first() {
            let id = self.players[last].id;
            let name = self.players[last].name.clone();
            self.winners.push(id);
            info!("game over, {name} takes the loss");
            self.events.push_back(GameEvent::GameOver { player: name });
        }
        self.game_over = true;
    }

    /// Rotate to the next non-winner, unless the current player earned
    /// another turn by clearing the pile.
    fn advance_turn(&mut self, retain: bool) {
        if retain {
            return;
        }
        let Some(current) = self.current else {
            return;
        };
        let count = self.players.len();
        let mut next = (current + 1) % count;
        while self.winners.contains(&self.players[next].id) {
            next = (next + 1) % count;
        }
        self.current = Some(next);
    }
}
