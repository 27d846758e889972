//! Error types.

use super::{ActionType, BidKind, Card, Mode, Seat, Suit};

/// A rule violation during bidding. The bidding state is left untouched, so
/// the caller may retry with a corrected action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BidError {
    #[error("expected {expected} to bid, got {got}")]
    WrongBidder { expected: Seat, got: Seat },

    #[error("{seat} cannot {kind} in the current bidding phase")]
    UnexpectedBid { seat: Seat, kind: ActionType },

    /// Only the dealer or the player to the dealer's left may bid ashkal.
    #[error("{0} is not eligible for ashkal")]
    AshkalIneligible(Seat),

    /// A raise must carry a sun or ashkal claim.
    #[error("cannot raise with {0}")]
    InvalidRaise(BidKind),

    /// A first-round hokm contract is bound to the floor card's suit.
    #[error("hokm trump must be the floor suit {expected}, got {got}")]
    FloorSuitRequired { expected: Suit, got: Suit },

    /// A hokm thani trump is a free choice, except the floor card's suit.
    #[error("hokm thani trump may not be the floor suit {0}")]
    FloorSuitForbidden(Suit),

    /// The finalize payload disagrees with the contract the machine resolved.
    #[error("finalized contract field {field} does not match the resolved contract")]
    FinalizeMismatch { field: &'static str },

    #[error("bidding is already settled")]
    Settled,
}

/// A rule violation during trick play. The play state is left untouched, so
/// the caller may retry with a corrected action.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum PlayError {
    #[error("expected {expected} to play, got {got}")]
    OutOfTurn { expected: Seat, got: Seat },

    #[error("{0} does not hold {1}")]
    CardNotHeld(Seat, Card),

    #[error("{seat} must follow the led suit {suit}")]
    MustFollowSuit { seat: Seat, suit: Suit },

    #[error("{seat} must overtrump {winning}")]
    MustOvertrump { seat: Seat, winning: Card },

    #[error("{seat} must play a trump card")]
    MustTrump { seat: Seat },

    #[error("the round is over")]
    RoundOver,
}

/// A structural error: a malformed snapshot or action log. The whole
/// resolution is rejected; no partial state is returned.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum RoundError {
    #[error("player {player} holds {len} cards, expected {expected}")]
    WrongHandSize {
        player: Seat,
        len: usize,
        expected: usize,
    },

    #[error("duplicate card {0} in deal")]
    DuplicateCard(Card),

    #[error("deal does not cover the 32-card deck")]
    IncompleteDeal,

    #[error("first bidder {got} is not right of dealer {dealer}")]
    BadFirstBidder { dealer: Seat, got: Seat },

    #[error("stock holds {len} cards but deal completion needs {needed}")]
    StockMismatch { len: usize, needed: usize },

    #[error("bidding log ended without a FINALIZE_CONTRACT")]
    MissingFinalize,

    #[error("bidding log contains more than one FINALIZE_CONTRACT")]
    DuplicateFinalize,

    #[error("unexpected trailing action for {0} after the round settled")]
    TrailingAction(Seat),

    #[error("{mode} contract with trump {trump:?}")]
    ModeTrumpMismatch { mode: Mode, trump: Option<Suit> },

    #[error("bid kind {bid_kind} does not produce a {mode} contract")]
    BidKindMismatch { bid_kind: BidKind, mode: Mode },

    #[error("floor taker should be {expected}, got {got}")]
    BadFloorTaker { expected: Seat, got: Seat },

    #[error("action type {0} is not valid during play")]
    UnsupportedAction(ActionType),

    #[error(transparent)]
    Bid(#[from] BidError),

    #[error(transparent)]
    Play(#[from] PlayError),
}
