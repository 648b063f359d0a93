//! Game constants.

/// Maximum number of players in a single game.
pub const MAX_PLAYERS: usize = 4;

/// Minimum number of players needed to start a game.
pub const MIN_PLAYERS: usize = 2;

/// Number of cards in a full deck.
pub const DECK_SIZE: usize = 52;

/// Cards dealt to each zone (blind, visible, hand) at the start of a game,
/// and the size the hand is replenished to while the draw pile lasts.
pub const ZONE_SIZE: usize = 3;

/// Weights that can be thrown on any pile top. Weight 2 resets the pile,
/// weight 10 burns it.
pub const WILD_WEIGHTS: [u8; 2] = [2, 10];

/// A card of this weight on top of the pile clears the whole pile.
pub const BURN_WEIGHT: u8 = 10;

/// A pile top of this weight inverts the stacking order: the next throw
/// must be lower than or equal to it.
pub const INVERSION_WEIGHT: u8 = 7;

/// Number of consecutive same-weight cards on top of the pile that clears it.
pub const CLEAR_RUN: usize = 4;
