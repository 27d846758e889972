//! Initial snapshots and saved round records.
//!
//! A snapshot holds exactly what existed before the first player decision,
//! either at the start of bidding (5-card hands, floor card, stock) or at the
//! start of play (completed 8-card hands plus the contract's mode and trump).
//! A [`SaveGame`] pairs a snapshot with the ordered action log; replaying the
//! log over the snapshot reproduces the round exactly.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use super::{Action, Card, Deck, Mode, RoundError, Seat, Suit};

/// Current save record version.
pub const SAVE_VERSION: u32 = 1;

/// Free-form snapshot metadata (seed, round number, and the like).
pub type Meta = BTreeMap<String, serde_json::Value>;

/// The four hands, indexed by player.
pub type Hands = [Vec<Card>; 4];

/// Returns the hand for the given seat.
pub fn hand(hands: &Hands, seat: Seat) -> &Vec<Card> {
    &hands[seat.index() as usize]
}

pub(crate) fn hand_mut(hands: &mut Hands, seat: Seat) -> &mut Vec<Card> {
    &mut hands[seat.index() as usize]
}

/// Checks that the given card collections are pairwise distinct and together
/// form the full 32-card deck.
fn validate_deck_partition<'a, I>(cards: I) -> Result<(), RoundError>
where
    I: IntoIterator<Item = &'a Card>,
{
    let mut seen = BTreeSet::new();
    for &card in cards {
        if !seen.insert(card) {
            return Err(RoundError::DuplicateCard(card));
        }
    }
    if seen.len() != 32 {
        return Err(RoundError::IncompleteDeal);
    }
    Ok(())
}

fn validate_hand_sizes(hands: &Hands, expected: usize) -> Result<(), RoundError> {
    for seat in Seat::all_seats() {
        let len = hand(hands, *seat).len();
        if len != expected {
            return Err(RoundError::WrongHandSize {
                player: *seat,
                len,
                expected,
            });
        }
    }
    Ok(())
}

/// The state of the table when bidding opens: a 5-card partial deal, the
/// revealed floor card, and the undealt stock in deal order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiddingInitial {
    pub dealer: Seat,
    /// The first bidder, to the dealer's right. Derivable from the dealer,
    /// but stored so the record is self-describing.
    pub first_bidder: Seat,
    pub hands: Hands,
    pub floor_card: Card,
    pub stock: Vec<Card>,
}

impl BiddingInitial {
    /// Creates a validated [`BiddingInitial`].
    pub fn new(
        dealer: Seat,
        hands: Hands,
        floor_card: Card,
        stock: Vec<Card>,
    ) -> Result<Self, RoundError> {
        let initial = Self {
            dealer,
            first_bidder: dealer.next(),
            hands,
            floor_card,
            stock,
        };
        initial.validate()?;
        Ok(initial)
    }

    /// Deals a [`BiddingInitial`] from a (typically shuffled) deck: five cards
    /// to each player starting right of the dealer, then the floor card; the
    /// rest becomes the stock.
    pub fn deal(dealer: Seat, mut deck: Deck) -> Result<Self, RoundError> {
        let mut hands = Hands::default();
        for seat in dealer.next_n(4) {
            *hand_mut(&mut hands, seat) = deck.take(5);
        }
        let floor_card = deck.take_one().ok_or(RoundError::IncompleteDeal)?;
        Self::new(dealer, hands, floor_card, deck.take_all())
    }

    /// Validates hand sizes, the stock, and the full-deck partition.
    pub fn validate(&self) -> Result<(), RoundError> {
        if self.first_bidder != self.dealer.next() {
            return Err(RoundError::BadFirstBidder {
                dealer: self.dealer,
                got: self.first_bidder,
            });
        }
        validate_hand_sizes(&self.hands, 5)?;
        if self.stock.len() != 11 {
            return Err(RoundError::StockMismatch {
                len: self.stock.len(),
                needed: 11,
            });
        }
        validate_deck_partition(
            self.hands
                .iter()
                .flatten()
                .chain(std::iter::once(&self.floor_card))
                .chain(self.stock.iter()),
        )
    }
}

/// The state of the table when trick play opens: the completed 8-card deal
/// plus the contract's mode and trump. Immutable once derived; the sole input
/// to trick replay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayingInitial {
    pub dealer: Seat,
    /// Leader of the first trick, to the dealer's right.
    pub leader: Seat,
    pub mode: Mode,
    #[serde(rename = "trump_suit")]
    pub trump: Option<Suit>,
    pub hands: Hands,
}

impl PlayingInitial {
    /// Validates hand sizes, the full-deck partition, and the mode/trump
    /// pairing.
    pub fn validate(&self) -> Result<(), RoundError> {
        validate_hand_sizes(&self.hands, 8)?;
        validate_deck_partition(self.hands.iter().flatten())?;
        match (self.mode, self.trump) {
            (Mode::Sun, None) | (Mode::Hokm, Some(_)) => Ok(()),
            (mode, trump) => Err(RoundError::ModeTrumpMismatch { mode, trump }),
        }
    }
}

/// A tagged initial snapshot: a round starts either at bidding or directly at
/// play, never both.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "start_phase")]
pub enum InitialSnapshot {
    #[serde(rename = "BIDDING")]
    Bidding {
        bidding: BiddingInitial,
        #[serde(default)]
        meta: Meta,
    },
    #[serde(rename = "PLAYING")]
    Playing {
        playing: PlayingInitial,
        #[serde(default)]
        meta: Meta,
    },
}

impl From<BiddingInitial> for InitialSnapshot {
    fn from(bidding: BiddingInitial) -> Self {
        InitialSnapshot::Bidding {
            bidding,
            meta: Meta::default(),
        }
    }
}

impl From<PlayingInitial> for InitialSnapshot {
    fn from(playing: PlayingInitial) -> Self {
        InitialSnapshot::Playing {
            playing,
            meta: Meta::default(),
        }
    }
}

impl InitialSnapshot {
    /// Attaches metadata to the snapshot.
    pub fn with_meta(mut self, meta: Meta) -> Self {
        match &mut self {
            InitialSnapshot::Bidding { meta: m, .. } => *m = meta,
            InitialSnapshot::Playing { meta: m, .. } => *m = meta,
        }
        self
    }

    /// The snapshot metadata.
    pub fn meta(&self) -> &Meta {
        match self {
            InitialSnapshot::Bidding { meta, .. } => meta,
            InitialSnapshot::Playing { meta, .. } => meta,
        }
    }

    /// Validates the carried snapshot.
    pub fn validate(&self) -> Result<(), RoundError> {
        match self {
            InitialSnapshot::Bidding { bidding, .. } => bidding.validate(),
            InitialSnapshot::Playing { playing, .. } => playing.validate(),
        }
    }
}

/// A saved round record: an initial snapshot plus the ordered action log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SaveGame {
    pub version: u32,
    pub initial: InitialSnapshot,
    #[serde(default)]
    pub actions: Vec<Action>,
}

impl SaveGame {
    /// Creates a new, empty save record for the given snapshot.
    pub fn new(initial: InitialSnapshot) -> Self {
        Self {
            version: SAVE_VERSION,
            initial,
            actions: vec![],
        }
    }

    /// Returns a new record with the action appended. The original record is
    /// not modified.
    #[must_use]
    pub fn append(&self, action: Action) -> Self {
        let mut next = self.clone();
        next.actions.push(action);
        next
    }

    /// Serializes the record to JSON.
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }

    /// Deserializes a record from JSON.
    pub fn from_json(s: &str) -> serde_json::Result<Self> {
        serde_json::from_str(s)
    }
}

#[cfg(test)]
pub(crate) mod test {
    use assert_matches::assert_matches;

    use super::*;
    use crate::baloot::ActionData;

    pub(crate) fn card(s: &str) -> Card {
        s.parse().unwrap()
    }

    pub(crate) fn hand_of(cards: &[&str]) -> Vec<Card> {
        cards.iter().map(|s| card(s)).collect()
    }

    /// A fixed, suit-segregated deal: North holds hearts, East spades, South
    /// diamonds, West clubs; the floor card and stock hold each suit's
    /// leftovers.
    pub(crate) fn bidding_fixture() -> BiddingInitial {
        BiddingInitial::new(
            Seat::North,
            [
                hand_of(&["7H", "8H", "9H", "TH", "JH"]),
                hand_of(&["7S", "8S", "9S", "TS", "JS"]),
                hand_of(&["7D", "8D", "9D", "TD", "JD"]),
                hand_of(&["7C", "8C", "9C", "TC", "JC"]),
            ],
            card("QH"),
            hand_of(&[
                "KH", "AH", "QS", "KS", "AS", "QD", "KD", "AD", "QC", "KC", "AC",
            ]),
        )
        .unwrap()
    }

    #[test]
    fn test_bidding_validate() {
        let initial = bidding_fixture();
        assert!(initial.validate().is_ok());

        let mut short = initial.clone();
        short.hands[2].pop();
        assert_matches!(
            short.validate(),
            Err(RoundError::WrongHandSize {
                player: Seat::South,
                len: 4,
                expected: 5,
            })
        );

        let mut dup = initial.clone();
        dup.hands[0][0] = card("7S");
        assert_matches!(dup.validate(), Err(RoundError::DuplicateCard(c)) if c == card("7S"));

        let mut bad_bidder = initial;
        bad_bidder.first_bidder = Seat::West;
        assert_matches!(bad_bidder.validate(), Err(RoundError::BadFirstBidder { .. }));
    }

    #[test]
    fn test_deal_from_deck() {
        let deck = Deck::default();
        let initial = BiddingInitial::deal(Seat::South, deck).unwrap();
        assert_eq!(initial.first_bidder, Seat::West);
        assert_eq!(initial.stock.len(), 11);
        assert!(initial.validate().is_ok());
    }

    #[test]
    fn test_playing_validate_mode_trump() {
        let deck = Deck::default();
        let mut deck = deck;
        let mut hands = Hands::default();
        for seat in Seat::North.next_n(4) {
            *hand_mut(&mut hands, seat) = deck.take(8);
        }
        let playing = PlayingInitial {
            dealer: Seat::North,
            leader: Seat::East,
            mode: Mode::Sun,
            trump: Some(Suit::Heart),
            hands,
        };
        assert_matches!(
            playing.validate(),
            Err(RoundError::ModeTrumpMismatch { .. })
        );
    }

    #[test]
    fn test_save_append_does_not_mutate() {
        let save = SaveGame::new(bidding_fixture().into());
        let appended = save.append(Action::new(Seat::East, ActionData::Pass));
        assert_eq!(save.actions.len(), 0);
        assert_eq!(appended.actions.len(), 1);
    }

    #[test]
    fn test_save_json_round_trip() {
        let mut save = SaveGame::new(InitialSnapshot::from(bidding_fixture()).with_meta(
            [("rng_seed".to_string(), serde_json::json!(7))].into(),
        ));
        save = save.append(Action::new(Seat::East, ActionData::Pass));
        save = save.append(Action::new(Seat::South, ActionData::BidHokm));
        let json = save.to_json().unwrap();
        let loaded = SaveGame::from_json(&json).unwrap();
        assert_eq!(save, loaded);

        // Player indices stay integers, and ordered collections stay ordered.
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["initial"]["start_phase"], "BIDDING");
        assert_eq!(value["initial"]["bidding"]["dealer"], 0);
        assert_eq!(value["initial"]["bidding"]["stock"][0], "KH");
        assert_eq!(value["actions"][1]["type"], "BID_HOKM");
    }
}
