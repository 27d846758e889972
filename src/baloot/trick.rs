//! Trick.

use std::fmt::Display;

use super::{Card, Seat, Suit};

/// The cards played into the current trick, in play order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Trick {
    cards: Vec<(Seat, Card)>,
}

impl Display for Trick {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[")?;
        for (i, (seat, card)) in self.cards.iter().enumerate() {
            if i != 0 {
                write!(f, ", ")?;
            }
            write!(f, "{seat}:{card}")?;
        }
        write!(f, "]")
    }
}

impl Trick {
    /// The number of cards played into this trick.
    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// The lead play, if any card has been played.
    pub fn lead(&self) -> Option<(Seat, Card)> {
        self.cards.first().copied()
    }

    /// The suit led into this trick.
    pub fn lead_suit(&self) -> Option<Suit> {
        self.lead().map(|(_, card)| card.suit)
    }

    /// The plays made so far, in play order.
    pub fn plays(&self) -> &[(Seat, Card)] {
        &self.cards
    }

    /// Plays a card into the trick.
    pub fn push(&mut self, seat: Seat, card: Card) {
        debug_assert!(self.cards.len() < 4);
        self.cards.push((seat, card));
    }

    /// Clears the trick after it has been resolved.
    pub fn clear(&mut self) {
        self.cards.clear();
    }

    /// The winning play so far. Works on partial tricks: the lead card always
    /// has winning strength, so any non-empty trick has a winner.
    pub fn winner(&self, trump: Option<Suit>) -> Option<(Seat, Card)> {
        let lead = self.lead_suit()?;
        self.cards
            .iter()
            .filter_map(|&(seat, card)| {
                card.strength(trump, lead).map(|value| (value, seat, card))
            })
            .max_by_key(|&(value, _, _)| value)
            .map(|(_, seat, card)| (seat, card))
    }

    /// The total card-point value of the trick under the given trump suit.
    pub fn points(&self, trump: Option<Suit>) -> u16 {
        self.cards.iter().map(|(_, card)| card.points(trump)).sum()
    }
}
