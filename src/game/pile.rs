//! Pile stacking rules: the add-cards command.
//!
//! A throw is a simultaneous burst of same-weight cards played from one
//! hand onto the discard pile. The command validates the whole burst
//! against the pile top and applies it atomically: either every card moves
//! and the clear condition is evaluated, or nothing moves at all.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::constants::{BURN_WEIGHT, CLEAR_RUN, INVERSION_WEIGHT, WILD_WEIGHTS};
use super::entities::{Card, CardId, Player, Weight};

/// Why a throw was rejected. Rejections are expected and frequent; callers
/// retry with a corrected move.
#[derive(Clone, Debug, Deserialize, Eq, Error, PartialEq, Serialize)]
pub enum PileError {
    #[error("throw at least one card")]
    EmptyThrow,
    #[error("cards are not in your hand")]
    NotInHand,
    #[error("cards must all have the same rank")]
    MixedRanks,
    #[error("cards cannot go on top of the pile")]
    CannotStack,
}

/// What a successful throw did to the pile.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum ThrowOutcome {
    /// The cards stay on top of the pile.
    Stacked,
    /// The throw cleared the whole pile into the removed set.
    Burned,
}

/// Validate a burst against the pile top without touching any state.
///
/// Checks run in order and the first failure rejects the whole throw:
/// the burst is non-empty, every card is in the hand (ids distinct), all
/// cards share one weight, and that weight may stack on the current top.
pub fn validate(player: &Player, cards: &[CardId], pile: &[Card]) -> Result<Weight, PileError> {
    let Some((first, rest)) = cards.split_first() else {
        return Err(PileError::EmptyThrow);
    };
    // A card can only be thrown once, so a duplicate id means the second
    // copy is no longer available.
    for (i, id) in cards.iter().enumerate() {
        if cards[..i].contains(id) {
            return Err(PileError::NotInHand);
        }
    }

    let weight_of = |id: &CardId| {
        player
            .hand
            .iter()
            .find(|c| c.id == *id)
            .map(Card::weight)
            .ok_or(PileError::NotInHand)
    };
    let weight = weight_of(first)?;
    let rest_weights = rest.iter().map(weight_of).collect::<Result<Vec<_>, _>>()?;
    if rest_weights.iter().any(|&w| w != weight) {
        return Err(PileError::MixedRanks);
    }

    let Some(top) = pile.last() else {
        return Ok(weight);
    };
    if WILD_WEIGHTS.contains(&weight) || can_stack(weight, top.weight()) {
        Ok(weight)
    } else {
        Err(PileError::CannotStack)
    }
}

/// Validate and apply a throw: move the burst from the hand to the top of
/// the pile preserving throw order, then clear the whole pile into
/// `removed` when the clear condition holds. On error nothing has moved.
pub fn add_cards(
    player: &mut Player,
    cards: &[CardId],
    pile: &mut Vec<Card>,
    removed: &mut Vec<Card>,
) -> Result<ThrowOutcome, PileError> {
    validate(player, cards, pile)?;

    for id in cards {
        if let Some(card) = player.throw(*id) {
            pile.push(card);
        }
    }

    if clears_pile(pile) {
        removed.append(pile);
        return Ok(ThrowOutcome::Burned);
    }
    Ok(ThrowOutcome::Stacked)
}

/// A burst may stack when its weight beats the pile top. A top of weight 7
/// inverts the order: the burst must stay at or below it.
fn can_stack(weight: Weight, top: Weight) -> bool {
    if top == INVERSION_WEIGHT {
        weight <= top
    } else {
        weight >= top
    }
}

/// The pile clears when the top card burns, or when the top four cards
/// share one weight. A shorter throw can complete the four with cards
/// already on the pile.
fn clears_pile(pile: &[Card]) -> bool {
    let Some(top) = pile.last() else {
        return false;
    };
    if top.weight() == BURN_WEIGHT {
        return true;
    }
    pile.len() >= CLEAR_RUN
        && pile[pile.len() - CLEAR_RUN..]
            .iter()
            .all(|c| c.weight() == top.weight())
}
