//! The game of Saudi Baloot.
//!
//! This module is the deterministic rules core of a four-player round: it
//! turns a sequence of logged player decisions into a fully determined
//! outcome. Replaying a saved log from its starting snapshot always
//! reproduces the live result exactly — the engine validates and resolves
//! decisions, and never makes them.

mod action;
mod bidding;
mod card;
mod contract;
mod error;
mod melds;
mod replay;
mod round;
mod seat;
mod settle;
mod snapshot;
mod trick;

pub use self::action::{Action, ActionData, ActionType};
pub use self::bidding::{complete_deal, playing_initial, resolve_bidding, BidOutcome, BidState};
pub use self::card::{Card, Deck, Rank, Suit, LAST_TRICK_BONUS};
pub use self::contract::{BidKind, Contract, Mode};
pub use self::error::{BidError, PlayError, RoundError};
pub use self::melds::{best_meld_set, compute_projects, Meld, MeldKind, Projects};
pub use self::replay::{replay, Recorder, ReplayOutcome, RoundReplay};
pub use self::round::PlayState;
pub use self::seat::{Seat, Team};
pub use self::settle::{settle_cards, settle_with_projects};
pub use self::snapshot::{
    BiddingInitial, Hands, InitialSnapshot, Meta, PlayingInitial, SaveGame, SAVE_VERSION,
};
pub use self::trick::Trick;
