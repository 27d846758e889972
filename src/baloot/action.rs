//! Actions.
//!
//! Every decision a player makes — bids and card plays alike — is recorded as
//! an [`Action`] in a round's log. The wire format is a flat object with the
//! acting player, an upper-case `type` tag, and a kind-specific `payload`.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use super::{BidKind, Card, Contract, Mode, Seat, Suit};

/// Types of actions that a player can take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionType {
    /// Decline to bid, challenge, or override.
    Pass,
    /// Claim a sun contract.
    BidSun,
    /// Claim an ashkal contract (dealer or left of dealer only).
    BidAshkal,
    /// Claim a hokm contract over the floor card's suit (first bid round).
    BidHokm,
    /// Claim a hokm contract with a free choice of trump (second bid round).
    BidHokmThani,
    /// Take over a sun/ashkal claim in the escalation ladder.
    Raise,
    /// Close bidding with the resolved contract.
    FinalizeContract,
    /// Play a card into the current trick.
    PlayCard,
}

impl Display for ActionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            ActionType::Pass => "pass",
            ActionType::BidSun => "bid sun",
            ActionType::BidAshkal => "bid ashkal",
            ActionType::BidHokm => "bid hokm",
            ActionType::BidHokmThani => "bid hokm thani",
            ActionType::Raise => "raise",
            ActionType::FinalizeContract => "finalize contract",
            ActionType::PlayCard => "play card",
        })
    }
}

/// An action's type together with its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ActionData {
    Pass,
    BidSun,
    BidAshkal,
    BidHokm,
    BidHokmThani,
    Raise {
        /// The claim the challenger takes over with: sun or ashkal.
        bid_kind: BidKind,
    },
    FinalizeContract {
        mode: Mode,
        #[serde(default)]
        trump_suit: Option<Suit>,
        winning_bidder: Seat,
        floor_taker: Seat,
        bid_kind: BidKind,
    },
    PlayCard {
        card: Card,
    },
}

impl ActionData {
    /// The action type this payload belongs to.
    pub fn kind(&self) -> ActionType {
        match self {
            ActionData::Pass => ActionType::Pass,
            ActionData::BidSun => ActionType::BidSun,
            ActionData::BidAshkal => ActionType::BidAshkal,
            ActionData::BidHokm => ActionType::BidHokm,
            ActionData::BidHokmThani => ActionType::BidHokmThani,
            ActionData::Raise { .. } => ActionType::Raise,
            ActionData::FinalizeContract { .. } => ActionType::FinalizeContract,
            ActionData::PlayCard { .. } => ActionType::PlayCard,
        }
    }

    /// Builds the finalize payload for a resolved contract.
    pub fn finalize(contract: &Contract) -> Self {
        ActionData::FinalizeContract {
            mode: contract.mode,
            trump_suit: contract.trump,
            winning_bidder: contract.winning_bidder,
            floor_taker: contract.floor_taker,
            bid_kind: contract.bid_kind,
        }
    }
}

/// An action taken by a player during a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Action {
    /// The player taking the action.
    pub player: Seat,
    /// The type of action and its payload.
    #[serde(flatten)]
    pub data: ActionData,
}

impl Action {
    /// Creates a new [`Action`].
    pub fn new(player: Seat, data: ActionData) -> Self {
        Self { player, data }
    }

    /// The action type.
    pub fn kind(&self) -> ActionType {
        self.data.kind()
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.player, self.kind())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_wire_format_pass() {
        let action = Action::new(Seat::East, ActionData::Pass);
        let ser = serde_json::to_value(&action).unwrap();
        assert_eq!(ser, serde_json::json!({"player": 1, "type": "PASS"}));
    }

    #[test]
    fn test_wire_format_play_card() {
        let card = "QS".parse().unwrap();
        let action = Action::new(Seat::West, ActionData::PlayCard { card });
        let ser = serde_json::to_value(&action).unwrap();
        assert_eq!(
            ser,
            serde_json::json!({"player": 3, "type": "PLAY_CARD", "payload": {"card": "QS"}})
        );
        let de: Action = serde_json::from_value(ser).unwrap();
        assert_eq!(de, action);
    }

    #[test]
    fn test_wire_format_finalize() {
        let contract = Contract {
            mode: Mode::Hokm,
            trump: Some(Suit::Heart),
            winning_bidder: Seat::South,
            floor_taker: Seat::South,
            bid_kind: BidKind::Hokm,
        };
        let action = Action::new(Seat::South, ActionData::finalize(&contract));
        let ser = serde_json::to_value(&action).unwrap();
        assert_eq!(
            ser,
            serde_json::json!({
                "player": 2,
                "type": "FINALIZE_CONTRACT",
                "payload": {
                    "mode": "HOKM",
                    "trump_suit": "H",
                    "winning_bidder": 2,
                    "floor_taker": 2,
                    "bid_kind": "HOKM",
                },
            })
        );
        let de: Action = serde_json::from_value(ser).unwrap();
        assert_eq!(de, action);
    }

    #[test]
    fn test_rejects_malformed_payload() {
        // Missing payload fields must fail loudly, not default.
        let raw = serde_json::json!({
            "player": 2,
            "type": "FINALIZE_CONTRACT",
            "payload": {"mode": "HOKM"},
        });
        assert!(serde_json::from_value::<Action>(raw).is_err());
        let raw = serde_json::json!({"player": 0, "type": "PLAY_CARD", "payload": {}});
        assert!(serde_json::from_value::<Action>(raw).is_err());
    }
}
