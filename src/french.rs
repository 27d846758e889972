//! Generic French-suited playing cards.

use std::convert::TryFrom;
use std::fmt::Display;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Suit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Color {
    Red,
    Black,
}

/// Card suit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Suit {
    Club,
    Diamond,
    Heart,
    Spade,
}

impl Suit {
    /// Returns an array of all suits, in no particular order.
    pub fn all_suits() -> &'static [Suit; 4] {
        static SUITS: [Suit; 4] = [Suit::Club, Suit::Diamond, Suit::Heart, Suit::Spade];
        &SUITS
    }

    pub fn color(self) -> Color {
        match self {
            Suit::Diamond | Suit::Heart => Color::Red,
            Suit::Club | Suit::Spade => Color::Black,
        }
    }

    /// The single-letter suit code used in card codes (e.g. the `S` in `QS`).
    pub fn to_char(self) -> char {
        match self {
            Suit::Club => 'C',
            Suit::Diamond => 'D',
            Suit::Heart => 'H',
            Suit::Spade => 'S',
        }
    }

    /// The suit symbol, for human-facing output.
    pub fn to_symbol(self) -> &'static str {
        match self {
            Suit::Club => "♣",
            Suit::Diamond => "♦",
            Suit::Heart => "♥",
            Suit::Spade => "♠",
        }
    }
}

impl Display for Suit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl TryFrom<char> for Suit {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Ok(match c {
            'C' | 'c' => Suit::Club,
            'D' | 'd' => Suit::Diamond,
            'H' | 'h' => Suit::Heart,
            'S' | 's' => Suit::Spade,
            _ => return Err(()),
        })
    }
}

impl Serialize for Suit {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Suit {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let code = String::deserialize(deserializer)?;
        let mut chars = code.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => {
                Suit::try_from(c).map_err(|()| serde::de::Error::custom("unknown suit code"))
            }
            _ => Err(serde::de::Error::custom("suit code must be one character")),
        }
    }
}

/// Card rank, from a standard 52-card deck.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Rank {
    Two,
    Three,
    Four,
    Five,
    Six,
    Seven,
    Eight,
    Nine,
    Ten,
    Jack,
    Queen,
    King,
    Ace,
}

impl Rank {
    /// Returns an array of all ranks, in ascending order.
    pub fn all_ranks() -> &'static [Rank; 13] {
        static RANKS: [Rank; 13] = [
            Rank::Two,
            Rank::Three,
            Rank::Four,
            Rank::Five,
            Rank::Six,
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

    /// The single-letter rank code used in card codes (e.g. the `Q` in `QS`).
    pub fn to_char(self) -> char {
        match self {
            Rank::Two => '2',
            Rank::Three => '3',
            Rank::Four => '4',
            Rank::Five => '5',
            Rank::Six => '6',
            Rank::Seven => '7',
            Rank::Eight => '8',
            Rank::Nine => '9',
            Rank::Ten => 'T',
            Rank::Jack => 'J',
            Rank::Queen => 'Q',
            Rank::King => 'K',
            Rank::Ace => 'A',
        }
    }
}

impl Display for Rank {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_char())
    }
}

impl TryFrom<char> for Rank {
    type Error = ();

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Ok(match c {
            '2' => Rank::Two,
            '3' => Rank::Three,
            '4' => Rank::Four,
            '5' => Rank::Five,
            '6' => Rank::Six,
            '7' => Rank::Seven,
            '8' => Rank::Eight,
            '9' => Rank::Nine,
            'T' | 't' => Rank::Ten,
            'J' | 'j' => Rank::Jack,
            'Q' | 'q' => Rank::Queen,
            'K' | 'k' => Rank::King,
            'A' | 'a' => Rank::Ace,
            _ => return Err(()),
        })
    }
}

/// A playing card, identified by a stable 2-character code of rank then suit:
/// `QS` is the queen of spades, `TH` the ten of hearts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Card {
    pub rank: Rank,
    pub suit: Suit,
}

impl Display for Card {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.rank, self.suit)
    }
}

impl FromStr for Card {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let mut chars = s.chars();
        match (chars.next(), chars.next(), chars.next()) {
            (Some(r), Some(s), None) => Ok(Card {
                rank: Rank::try_from(r)?,
                suit: Suit::try_from(s)?,
            }),
            _ => Err(()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_card_code_round_trip() {
        for &rank in Rank::all_ranks() {
            for &suit in Suit::all_suits() {
                let card = Card { rank, suit };
                assert_eq!(Ok(card), card.to_string().parse());
            }
        }
    }

    #[test]
    fn test_card_code_rejects() {
        for code in ["", "Q", "QSX", "1S", "QZ", "SQ"] {
            assert_eq!(Err(()), code.parse::<Card>(), "{code:?}");
        }
    }

    #[test]
    fn test_suit_serde() {
        let ser = serde_json::to_string(&Suit::Heart).unwrap();
        assert_eq!(ser, "\"H\"");
        let de: Suit = serde_json::from_str("\"h\"").unwrap();
        assert_eq!(de, Suit::Heart);
        assert!(serde_json::from_str::<Suit>("\"HH\"").is_err());
    }
}
