//! Contract types.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{RoundError, Seat, Suit};

/// Contract mode: sun plays without a trump suit, hokm designates one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Mode {
    Sun,
    Hokm,
}

impl Display for Mode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Mode::Sun => "sun",
            Mode::Hokm => "hokm",
        })
    }
}

impl Mode {
    /// Total score units split between the teams in a normal settlement.
    pub fn total_units(self) -> u16 {
        match self {
            Mode::Sun => 26,
            Mode::Hokm => 16,
        }
    }

    /// Units awarded outright when the non-contract team takes no card points.
    pub fn sweep_units(self) -> u16 {
        match self {
            Mode::Sun => 44,
            Mode::Hokm => 25,
        }
    }

    /// Total raw card points dealt out over a full round, including the
    /// last-trick bonus.
    pub fn card_point_total(self) -> u16 {
        match self {
            Mode::Sun => 130,
            Mode::Hokm => 162,
        }
    }
}

/// The kind of bid that won the contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BidKind {
    Sun,
    Ashkal,
    Hokm,
    HokmThani,
}

impl Display for BidKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            BidKind::Sun => "sun",
            BidKind::Ashkal => "ashkal",
            BidKind::Hokm => "hokm",
            BidKind::HokmThani => "hokm thani",
        })
    }
}

impl BidKind {
    /// The contract mode this bid kind resolves to.
    pub fn mode(self) -> Mode {
        match self {
            BidKind::Sun | BidKind::Ashkal => Mode::Sun,
            BidKind::Hokm | BidKind::HokmThani => Mode::Hokm,
        }
    }
}

/// The contract established by a finalized bidding sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contract {
    pub mode: Mode,
    /// Trump suit; present exactly when the mode is hokm.
    #[serde(rename = "trump_suit")]
    pub trump: Option<Suit>,
    pub winning_bidder: Seat,
    /// The seat that receives the floor card: the winning bidder, or their
    /// partner under ashkal.
    pub floor_taker: Seat,
    pub bid_kind: BidKind,
}

impl Contract {
    /// Checks the internal consistency of the contract.
    pub fn validate(&self) -> Result<(), RoundError> {
        match (self.mode, self.trump) {
            (Mode::Sun, Some(_)) | (Mode::Hokm, None) => {
                return Err(RoundError::ModeTrumpMismatch {
                    mode: self.mode,
                    trump: self.trump,
                });
            }
            _ => (),
        }
        if self.bid_kind.mode() != self.mode {
            return Err(RoundError::BidKindMismatch {
                bid_kind: self.bid_kind,
                mode: self.mode,
            });
        }
        let expected_taker = match self.bid_kind {
            BidKind::Ashkal => self.winning_bidder.partner(),
            _ => self.winning_bidder,
        };
        if self.floor_taker != expected_taker {
            return Err(RoundError::BadFloorTaker {
                expected: expected_taker,
                got: self.floor_taker,
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::*;

    fn sun_contract(bidder: Seat) -> Contract {
        Contract {
            mode: Mode::Sun,
            trump: None,
            winning_bidder: bidder,
            floor_taker: bidder,
            bid_kind: BidKind::Sun,
        }
    }

    #[test]
    fn test_validate_mode_trump() {
        let mut contract = sun_contract(Seat::East);
        assert!(contract.validate().is_ok());
        contract.trump = Some(Suit::Heart);
        assert_matches!(
            contract.validate(),
            Err(RoundError::ModeTrumpMismatch { .. })
        );

        let hokm = Contract {
            mode: Mode::Hokm,
            trump: None,
            winning_bidder: Seat::East,
            floor_taker: Seat::East,
            bid_kind: BidKind::Hokm,
        };
        assert_matches!(hokm.validate(), Err(RoundError::ModeTrumpMismatch { .. }));
    }

    #[test]
    fn test_validate_floor_taker() {
        let mut contract = sun_contract(Seat::East);
        contract.bid_kind = BidKind::Ashkal;
        assert_matches!(contract.validate(), Err(RoundError::BadFloorTaker { .. }));
        contract.floor_taker = Seat::West;
        assert!(contract.validate().is_ok());
    }

    #[test]
    fn test_serde_names() {
        let contract = sun_contract(Seat::North);
        let ser = serde_json::to_value(&contract).unwrap();
        assert_eq!(ser["mode"], "SUN");
        assert_eq!(ser["bid_kind"], "SUN");
        assert_eq!(ser["trump_suit"], serde_json::Value::Null);
        assert_eq!(ser["winning_bidder"], 0);
        let thani = serde_json::to_value(BidKind::HokmThani).unwrap();
        assert_eq!(thani, "HOKM_THANI");
    }
}
