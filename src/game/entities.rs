use rand::seq::SliceRandom;
use serde::{Deserialize, Serialize};
use std::{
    fmt::{self},
    hash::{Hash, Hasher},
};
use uuid::Uuid;

use super::constants::DECK_SIZE;

/// Stable identifier for a card. Two cards are the same card iff their ids
/// match, even when rank and suit are equal.
pub type CardId = Uuid;

/// Stable identifier for a player.
pub type PlayerId = Uuid;

/// Numeric rank used for stacking comparisons.
pub type Weight = u8;

#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Suit {
    #[serde(rename = "♣")]
    Club,
    #[serde(rename = "♦")]
    Diamond,
    #[serde(rename = "♥")]
    Heart,
    #[serde(rename = "♠")]
    Spade,
}

impl Suit {
    pub const ALL: [Self; 4] = [Self::Club, Self::Diamond, Self::Heart, Self::Spade];
}

impl fmt::Display for Suit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Club => "♣",
            Self::Diamond => "♦",
            Self::Heart => "♥",
            Self::Spade => "♠",
        };
        write!(f, "{repr}")
    }
}

/// Card rank. `Ord` follows `weight`, so 2 sorts lowest and Ace highest.
#[derive(Clone, Copy, Debug, Deserialize, Eq, Hash, Ord, PartialEq, PartialOrd, Serialize)]
pub enum Rank {
    #[serde(rename = "2")]
    Two,
    #[serde(rename = "3")]
    Three,
    #[serde(rename = "4")]
    Four,
    #[serde(rename = "5")]
    Five,
    #[serde(rename = "6")]
    Six,
    #[serde(rename = "7")]
    Seven,
    #[serde(rename = "8")]
    Eight,
    #[serde(rename = "9")]
    Nine,
    #[serde(rename = "10")]
    Ten,
    #[serde(rename = "J")]
    Jack,
    #[serde(rename = "Q")]
    Queen,
    #[serde(rename = "K")]
    King,
    #[serde(rename = "A")]
    Ace,
}

impl Rank {
    pub const ALL: [Self; 13] = [
        Self::Two,
        Self::Three,
        Self::Four,
        Self::Five,
        Self::Six,
        Self::Seven,
        Self::Eight,
        Self::Nine,
        Self::Ten,
        Self::Jack,
        Self::Queen,
        Self::King,
        Self::Ace,
    ];

    /// Numeric rank for stacking comparisons: 2→2 … 10→10, J→11, Q→12,
    /// K→13, A→14.
    #[must_use]
    pub const fn weight(self) -> Weight {
        match self {
            Self::Two => 2,
            Self::Three => 3,
            Self::Four => 4,
            Self::Five => 5,
            Self::Six => 6,
            Self::Seven => 7,
            Self::Eight => 8,
            Self::Nine => 9,
            Self::Ten => 10,
            Self::Jack => 11,
            Self::Queen => 12,
            Self::King => 13,
            Self::Ace => 14,
        }
    }

    /// Rank used only to pick the opening player. Same as `weight`, except
    /// rank 2 outranks Ace.
    #[must_use]
    pub const fn order_level(self) -> Weight {
        match self {
            Self::Two => 15,
            rank => rank.weight(),
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let repr = match self {
            Self::Jack => "J".to_string(),
            Self::Queen => "Q".to_string(),
            Self::King => "K".to_string(),
            Self::Ace => "A".to_string(),
            rank => rank.weight().to_string(),
        };
        write!(f, "{repr}")
    }
}

/// A single card. Serialized as `{id, value, sign}`; equality and hashing
/// are id-based so a card reconstructed from a snapshot still matches the
/// original.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Card {
    pub id: CardId,
    #[serde(rename = "value")]
    pub rank: Rank,
    #[serde(rename = "sign")]
    pub suit: Suit,
}

impl Card {
    #[must_use]
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self::with_id(Uuid::new_v4(), rank, suit)
    }

    #[must_use]
    pub const fn with_id(id: CardId, rank: Rank, suit: Suit) -> Self {
        Self { id, rank, suit }
    }

    #[must_use]
    pub const fn weight(&self) -> Weight {
        self.rank.weight()
    }

    #[must_use]
    pub const fn order_level(&self) -> Weight {
        self.rank.order_level()
    }
}

impl PartialEq for Card {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Card {}

impl Hash for Card {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Card {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

/// A full 52-card deck. Jokers are not used.
#[derive(Clone, Debug)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Default for Deck {
    fn default() -> Self {
        let mut cards = Vec::with_capacity(DECK_SIZE);
        for rank in Rank::ALL {
            for suit in Suit::ALL {
                cards.push(Card::new(rank, suit));
            }
        }
        Self { cards }
    }
}

impl Deck {
    /// A freshly shuffled full deck.
    #[must_use]
    pub fn shuffled() -> Self {
        let mut deck = Self::default();
        deck.shuffle();
        deck
    }

    pub fn shuffle(&mut self) {
        self.cards.shuffle(&mut rand::rng());
    }

    /// The deck as a draw pile, bottom to top: dealing pops from the end.
    #[must_use]
    pub fn into_cards(self) -> Vec<Card> {
        self.cards
    }
}

/// A player owns three card zones:
/// - `hand`: the only zone cards can be thrown from;
/// - `visible_cards`: face-up cards, merged into the hand once the draw
///   pile runs out;
/// - `blind_cards`: face-down cards, drawable one at a time by position
///   once hand and visible cards are exhausted. Drawn slots stay in the
///   sequence as `None` so "slot 1 was already drawn" remains queryable.
///
/// Equality and hashing are id-based.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub hand: Vec<Card>,
    pub blind_cards: Vec<Option<Card>>,
    pub visible_cards: Vec<Card>,
    pub ready: bool,
}

impl Player {
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    #[must_use]
    pub fn with_id(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            hand: Vec::new(),
            blind_cards: Vec::new(),
            visible_cards: Vec::new(),
            ready: false,
        }
    }

    /// Sort the hand and lock in readiness. There is no way back to the
    /// swapping phase.
    pub fn mark_ready(&mut self) {
        self.sort_hand();
        self.ready = true;
    }

    /// Exchange one hand card with one visible card, in place: both zones
    /// keep their slot order. A no-op returning `false` once the player is
    /// ready or when either card is not in its zone.
    pub fn swap(&mut self, hand_card: CardId, visible_card: CardId) -> bool {
        if self.ready {
            return false;
        }
        let Some(hand_idx) = self.hand.iter().position(|c| c.id == hand_card) else {
            return false;
        };
        let Some(visible_idx) = self.visible_cards.iter().position(|c| c.id == visible_card)
        else {
            return false;
        };
        std::mem::swap(&mut self.hand[hand_idx], &mut self.visible_cards[visible_idx]);
        true
    }

    /// Draw the blind card at `index` into the hand. Legal only when hand
    /// and visible cards are both empty and the slot still holds a card;
    /// the slot becomes `None` in place. Returns whether the draw happened.
    pub fn pull_blind_card(&mut self, index: usize) -> bool {
        if !self.hand.is_empty() || !self.visible_cards.is_empty() {
            return false;
        }
        let Some(card) = self.blind_cards.get_mut(index).and_then(|slot| slot.take()) else {
            return false;
        };
        self.hand.push(card);
        self.sort_hand();
        true
    }

    /// Remove one card from the hand by identity.
    pub fn throw(&mut self, card: CardId) -> Option<Card> {
        let idx = self.hand.iter().position(|c| c.id == card)?;
        Some(self.hand.remove(idx))
    }

    /// Sort the hand descending by weight.
    pub fn sort_hand(&mut self) {
        self.hand.sort_by(|a, b| b.weight().cmp(&a.weight()));
    }

    /// A player is finished once the hand is empty and every blind slot has
    /// been drawn.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.hand.is_empty() && self.blind_cards.iter().all(Option::is_none)
    }

    pub(crate) fn min_order_level(&self) -> Option<Weight> {
        self.hand.iter().map(Card::order_level).min()
    }
}

impl PartialEq for Player {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for Player {}

impl Hash for Player {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Display for Player {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.name.fmt(f)
    }
}
