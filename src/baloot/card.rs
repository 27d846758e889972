//! Baloot deck.
//!
//! Baloot is played with the 32-card subset of a French deck: ranks 7 through
//! ace in all four suits. A card's strength depends on the contract mode: in
//! sun (and for non-trump suits in hokm) the order is 7 8 9 J Q K 10 A, while
//! the hokm trump suit uses its own order 7 8 Q K 10 A 9 J.

use std::convert::{TryFrom, TryInto};
use std::{fmt::Display, str::FromStr};

use ansi_term::ANSIString;
use serde::{Deserialize, Serialize};

use crate::deck;
use crate::french;
pub use crate::french::Suit;

/// Card points awarded to the winner of the final trick.
pub const LAST_TRICK_BONUS: u16 = 10;

/// Baloot card rank. Declaration order is the sequence order used for meld
/// detection (7 8 9 10 J Q K A), not a strength order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl From<Rank> for french::Rank {
    fn from(r: Rank) -> Self {
        match r {
            Rank::Seven => french::Rank::Seven,
            Rank::Eight => french::Rank::Eight,
            Rank::Nine => french::Rank::Nine,
            Rank::Ten => french::Rank::Ten,
            Rank::Jack => french::Rank::Jack,
            Rank::Queen => french::Rank::Queen,
            Rank::King => french::Rank::King,
            Rank::Ace => french::Rank::Ace,
        }
    }
}

impl TryFrom<french::Rank> for Rank {
    type Error = ();

    fn try_from(r: french::Rank) -> Result<Self, Self::Error> {
        Ok(match r {
            french::Rank::Seven => Rank::Seven,
            french::Rank::Eight => Rank::Eight,
            french::Rank::Nine => Rank::Nine,
            french::Rank::Ten => Rank::Ten,
            french::Rank::Jack => Rank::Jack,
            french::Rank::Queen => Rank::Queen,
            french::Rank::King => Rank::King,
            french::Rank::Ace => Rank::Ace,
            _ => return Err(()),
        })
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        french::Rank::try_from(c)?.try_into()
    }
}

impl Rank {
    /// Returns an array of all ranks, in sequence order.
    pub fn all_ranks() -> &'static [Rank; 8] {
        static RANKS: [Rank; 8] = [
            Rank::Seven,
            Rank::Eight,
            Rank::Nine,
            Rank::Ten,
            Rank::Jack,
            Rank::Queen,
            Rank::King,
            Rank::Ace,
        ];
        &RANKS
    }

    /// Position in the sequence order 7 8 9 10 J Q K A.
    pub fn sequence_index(self) -> u8 {
        self as u8
    }

    /// Strength in the sun order 7 8 9 J Q K 10 A.
    pub fn sun_strength(self) -> u8 {
        match self {
            Rank::Seven => 0,
            Rank::Eight => 1,
            Rank::Nine => 2,
            Rank::Jack => 3,
            Rank::Queen => 4,
            Rank::King => 5,
            Rank::Ten => 6,
            Rank::Ace => 7,
        }
    }

    /// Strength in the hokm trump order 7 8 Q K 10 A 9 J.
    pub fn trump_strength(self) -> u8 {
        match self {
            Rank::Seven => 0,
            Rank::Eight => 1,
            Rank::Queen => 2,
            Rank::King => 3,
            Rank::Ten => 4,
            Rank::Ace => 5,
            Rank::Nine => 6,
            Rank::Jack => 7,
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        french::Rank::from(*self).fmt(f)
    }
}

/// A baloot card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    /// Card rank.
    pub rank: Rank,
    /// Card suit.
    pub suit: Suit,
}

impl From<Card> for french::Card {
    fn from(card: Card) -> Self {
        french::Card {
            rank: card.rank.into(),
            suit: card.suit,
        }
    }
}

impl TryFrom<french::Card> for Card {
    type Error = ();

    fn try_from(card: french::Card) -> Result<Self, Self::Error> {
        Ok(Card {
            rank: card.rank.try_into()?,
            suit: card.suit,
        })
    }
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        french::Card::from(*self).fmt(f)
    }
}

impl FromStr for Card {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        french::Card::from_str(s)?.try_into()
    }
}

impl Serialize for Card {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Card {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        code.parse()
            .map_err(|()| serde::de::Error::custom(format!("invalid card code {code:?}")))
    }
}

impl Card {
    /// Creates a new [`Card`].
    pub fn new(rank: Rank, suit: Suit) -> Self {
        Self { rank, suit }
    }

    /// Returns a string representation of the card, decorated with ANSI color
    /// codes and a suit symbol.
    pub fn to_ansi_string(self) -> ANSIString<'static> {
        use ansi_term::Colour::Red;
        let text = format!("{}{}", self.rank, self.suit.to_symbol());
        match self.suit.color() {
            french::Color::Black => text.into(),
            french::Color::Red => Red.paint(text),
        }
    }

    /// Returns true if this card belongs to the trump suit.
    pub fn is_trump(self, trump: Option<Suit>) -> bool {
        trump == Some(self.suit)
    }

    /// Returns the card's strength for deciding a trick, or `None` if the
    /// card cannot win: any trump beats any non-trump, trumps compare in the
    /// trump order, led-suit cards compare in the sun order, and a card that
    /// is neither trump nor the led suit never wins.
    pub fn strength(self, trump: Option<Suit>, lead: Suit) -> Option<u8> {
        if self.is_trump(trump) {
            Some(100 + self.rank.trump_strength())
        } else if self.suit == lead {
            Some(self.rank.sun_strength())
        } else {
            None
        }
    }

    /// Returns the card's point value under the given trump suit. Sun values
    /// apply to every suit when there is no trump and to the three plain
    /// suits in hokm.
    pub fn points(self, trump: Option<Suit>) -> u16 {
        if self.is_trump(trump) {
            match self.rank {
                Rank::Jack => 20,
                Rank::Nine => 14,
                Rank::Ace => 11,
                Rank::Ten => 10,
                Rank::King => 4,
                Rank::Queen => 3,
                Rank::Seven | Rank::Eight => 0,
            }
        } else {
            match self.rank {
                Rank::Ace => 11,
                Rank::Ten => 10,
                Rank::King => 4,
                Rank::Queen => 3,
                Rank::Jack => 2,
                Rank::Seven | Rank::Eight | Rank::Nine => 0,
            }
        }
    }
}

/// A baloot deck.
pub type Deck = deck::Deck<Card>;
impl Default for Deck {
    fn default() -> Self {
        itertools::iproduct!(Rank::all_ranks(), Suit::all_suits())
            .map(|(&rank, &suit)| Card { rank, suit })
            .collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    #[test]
    fn test_deck_size() {
        let mut deck = Deck::default();
        let cards = deck.take_all();
        assert_eq!(cards.len(), 32);
        let distinct: std::collections::HashSet<_> = cards.iter().collect();
        assert_eq!(distinct.len(), 32);
    }

    #[test]
    fn test_code_round_trip() {
        let mut deck = Deck::default();
        for card in deck.take_all() {
            assert_eq!(Ok(card), card.to_string().parse());
        }
        assert_eq!(card("TH"), Card::new(Rank::Ten, Suit::Heart));
        assert!("6H".parse::<Card>().is_err());
        assert!("QX".parse::<Card>().is_err());
    }

    #[test]
    fn test_serde_as_code() {
        let ser = serde_json::to_string(&card("QS")).unwrap();
        assert_eq!(ser, "\"QS\"");
        let de: Card = serde_json::from_str("\"7D\"").unwrap();
        assert_eq!(de, card("7D"));
        assert!(serde_json::from_str::<Card>("\"5D\"").is_err());
    }

    #[test]
    fn test_strength_orders() {
        let trump = Some(Suit::Heart);
        // Trump beats any led-suit card.
        assert!(card("7H").strength(trump, Suit::Spade) > card("AS").strength(trump, Suit::Spade));
        // Trump order: J > 9 > A.
        assert!(card("JH").strength(trump, Suit::Heart) > card("9H").strength(trump, Suit::Heart));
        assert!(card("9H").strength(trump, Suit::Heart) > card("AH").strength(trump, Suit::Heart));
        // Sun order: A > 10 > K.
        assert!(card("AS").strength(None, Suit::Spade) > card("TS").strength(None, Suit::Spade));
        assert!(card("TS").strength(None, Suit::Spade) > card("KS").strength(None, Suit::Spade));
        // Off-suit non-trump cards have no strength.
        assert_eq!(card("AC").strength(trump, Suit::Spade), None);
        assert_eq!(card("AC").strength(None, Suit::Spade), None);
    }

    #[test]
    fn test_point_totals() {
        let mut deck = Deck::default();
        let cards = deck.take_all();
        let sun: u16 = cards.iter().map(|c| c.points(None)).sum();
        assert_eq!(sun + LAST_TRICK_BONUS, 130);
        let hokm: u16 = cards.iter().map(|c| c.points(Some(Suit::Club))).sum();
        assert_eq!(hokm + LAST_TRICK_BONUS, 162);
    }
}
