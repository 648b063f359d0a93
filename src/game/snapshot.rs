//! Serializable game snapshots.
//!
//! A snapshot is the full, self-contained state of one game: collaborators
//! persist or transmit it and rebuild the engine with
//! [`Game::from_snapshot`]. Round-tripping a snapshot reproduces the
//! identical structure, including drawn blind slots serialized as `null`
//! at their original index.

use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use thiserror::Error;

use super::entities::{Card, Player, PlayerId};
use super::state_machine::Game;

/// Structural snapshot failures. These are hard errors surfaced at load
/// time; the engine never repairs or guesses missing data.
#[derive(Debug, Error)]
pub enum SnapshotError {
    #[error("snapshot holds the same player twice")]
    DuplicatePlayer,
    #[error("current player is not an active player")]
    UnknownCurrentPlayer,
    #[error("winner is not an active player")]
    UnknownWinner,
    #[error(transparent)]
    Malformed(#[from] serde_json::Error),
}

/// Full state of one game. `cards` is the remaining draw pile and `pile`
/// the discard pile, both bottom to top; `current_player` and `winners`
/// repeat entries from `active_players` by id.
#[derive(Clone, Debug, Deserialize, PartialEq, Serialize)]
pub struct GameSnapshot {
    pub active_players: Vec<Player>,
    pub cards: Vec<Card>,
    pub pile: Vec<Card>,
    pub removed_cards: Vec<Card>,
    pub current_player: Option<Player>,
    pub winners: Vec<Player>,
    pub game_over: bool,
}

impl GameSnapshot {
    /// Serialize to the JSON wire format collaborators persist through.
    pub fn to_json(&self) -> Result<String, SnapshotError> {
        Ok(serde_json::to_string(self)?)
    }

    /// Parse the JSON wire format. Missing or malformed fields fail here.
    pub fn from_json(json: &str) -> Result<Self, SnapshotError> {
        Ok(serde_json::from_str(json)?)
    }
}

impl Game {
    /// Capture the full game state. Pending events are transient and not
    /// part of the snapshot.
    #[must_use]
    pub fn to_snapshot(&self) -> GameSnapshot {
        GameSnapshot {
            active_players: self.players.clone(),
            cards: self.draw_pile.clone(),
            pile: self.pile.clone(),
            removed_cards: self.removed_cards.clone(),
            current_player: self.current.and_then(|idx| self.players.get(idx)).cloned(),
            winners: self
                .winners
                .iter()
                .filter_map(|id| self.players.iter().find(|p| p.id == *id))
                .cloned()
                .collect(),
            game_over: self.game_over,
        }
    }

    /// Rebuild a game from a snapshot. The current player and every winner
    /// must refer to an active player by id.
    pub fn from_snapshot(snapshot: GameSnapshot) -> Result<Self, SnapshotError> {
        let GameSnapshot {
            active_players,
            cards,
            pile,
            removed_cards,
            current_player,
            winners,
            game_over,
        } = snapshot;

        for (i, player) in active_players.iter().enumerate() {
            if active_players[..i].iter().any(|p| p.id == player.id) {
                return Err(SnapshotError::DuplicatePlayer);
            }
        }

        let current = match current_player {
            Some(player) => Some(
                active_players
                    .iter()
                    .position(|p| p.id == player.id)
                    .ok_or(SnapshotError::UnknownCurrentPlayer)?,
            ),
            None => None,
        };

        let winners = winners
            .iter()
            .map(|winner| {
                active_players
                    .iter()
                    .find(|p| p.id == winner.id)
                    .map(|p| p.id)
                    .ok_or(SnapshotError::UnknownWinner)
            })
            .collect::<Result<Vec<PlayerId>, SnapshotError>>()?;

        Ok(Self {
            players: active_players,
            draw_pile: cards,
            pile,
            removed_cards,
            current,
            winners,
            game_over,
            events: VecDeque::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::entities::{Rank, Suit};

    fn snapshot_with_players() -> GameSnapshot {
        GameSnapshot {
            active_players: vec![Player::new("alice"), Player::new("bob")],
            cards: vec![Card::new(Rank::Four, Suit::Club)],
            pile: Vec::new(),
            removed_cards: Vec::new(),
            current_player: None,
            winners: Vec::new(),
            game_over: false,
        }
    }

    #[test]
    fn test_unknown_current_player_rejected() {
        let mut snapshot = snapshot_with_players();
        snapshot.current_player = Some(Player::new("mallory"));
        assert!(matches!(
            Game::from_snapshot(snapshot),
            Err(SnapshotError::UnknownCurrentPlayer)
        ));
    }

    #[test]
    fn test_unknown_winner_rejected() {
        let mut snapshot = snapshot_with_players();
        snapshot.winners = vec![Player::new("mallory")];
        assert!(matches!(
            Game::from_snapshot(snapshot),
            Err(SnapshotError::UnknownWinner)
        ));
    }

    #[test]
    fn test_duplicate_players_rejected() {
        let mut snapshot = snapshot_with_players();
        let twin = snapshot.active_players[0].clone();
        snapshot.active_players.push(twin);
        assert!(matches!(
            Game::from_snapshot(snapshot),
            Err(SnapshotError::DuplicatePlayer)
        ));
    }

    #[test]
    fn test_malformed_json_is_a_hard_error() {
        assert!(matches!(
            GameSnapshot::from_json("{\"active_players\": []}"),
            Err(SnapshotError::Malformed(_))
        ));
    }
}
