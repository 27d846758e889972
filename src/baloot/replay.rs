//! Replay.
//!
//! Reconstructs round state by folding a saved action log onto its initial
//! snapshot. Replay is a pure function of the record: folding the same log
//! twice always produces the same state, which makes a stored log a
//! verifiable witness of a live round.

use delegate::delegate;

use super::bidding::{playing_initial, resolve_bidding, BidOutcome};
use super::{
    Action, ActionData, Card, Contract, InitialSnapshot, PlayState, PlayingInitial, RoundError,
    SaveGame, Seat,
};

/// A fully replayed round (or the prefix of one: the log may stop at any
/// point mid-play).
#[derive(Debug, Clone, PartialEq)]
pub struct RoundReplay {
    /// The contract, when the log started at bidding. A log that starts at
    /// play carries only the contract's mode and trump in its snapshot.
    pub contract: Option<Contract>,
    /// The playing snapshot the card plays were folded over.
    pub initial: PlayingInitial,
    /// The state after the final logged action.
    pub state: PlayState,
}

/// The outcome of replaying a saved record.
#[derive(Debug, Clone, PartialEq)]
pub enum ReplayOutcome {
    /// The log recorded a bidding sequence with no claim: the round was
    /// redealt with the dealer advanced.
    Redeal { next_dealer: Seat },
    Round(Box<RoundReplay>),
}

impl ReplayOutcome {
    /// The replayed round, unless the log ended in a redeal.
    pub fn round(self) -> Option<RoundReplay> {
        match self {
            ReplayOutcome::Round(round) => Some(*round),
            ReplayOutcome::Redeal { .. } => None,
        }
    }
}

fn fold_play(initial: &PlayingInitial, actions: &[Action]) -> Result<PlayState, RoundError> {
    let mut state = PlayState::from(initial);
    for action in actions {
        state = state.apply(action)?;
    }
    Ok(state)
}

/// Replays a saved record to its final state.
pub fn replay(save: &SaveGame) -> Result<ReplayOutcome, RoundError> {
    match &save.initial {
        InitialSnapshot::Bidding { bidding, .. } => {
            let (outcome, rest) = resolve_bidding(bidding, &save.actions)?;
            match outcome {
                BidOutcome::Redeal { next_dealer } => Ok(ReplayOutcome::Redeal { next_dealer }),
                BidOutcome::Contract(contract) => {
                    let initial = playing_initial(bidding, &contract)?;
                    let state = fold_play(&initial, rest)?;
                    Ok(ReplayOutcome::Round(Box::new(RoundReplay {
                        contract: Some(contract),
                        initial,
                        state,
                    })))
                }
            }
        }
        InitialSnapshot::Playing { playing, .. } => {
            playing.validate()?;
            let state = fold_play(playing, &save.actions)?;
            Ok(ReplayOutcome::Round(Box::new(RoundReplay {
                contract: None,
                initial: playing.clone(),
                state,
            })))
        }
    }
}

/// A live round that maintains its own save record: every card played is
/// appended to the log, so the record can be replayed to reproduce exactly
/// this state.
#[derive(Debug, Clone)]
pub struct Recorder {
    state: PlayState,
    save: SaveGame,
}

impl Recorder {
    /// Starts recording a round from its playing snapshot, continuing the
    /// given record (which already carries the snapshot and any bid
    /// actions).
    pub fn new(save: SaveGame, initial: &PlayingInitial) -> Self {
        Self {
            state: PlayState::from(initial),
            save,
        }
    }

    delegate! {
        to self.state {
            pub fn to_play(&self) -> Seat;
            pub fn leader(&self) -> Seat;
            pub fn trick_number(&self) -> u8;
            pub fn legal_moves(&self) -> Vec<Card>;
            pub fn card_points(&self) -> [u16; 2];
            pub fn trick_wins(&self) -> [u8; 2];
            pub fn is_finished(&self) -> bool;
        }
    }

    /// The current play state.
    pub fn state(&self) -> &PlayState {
        &self.state
    }

    /// The record so far.
    pub fn save(&self) -> &SaveGame {
        &self.save
    }

    /// Plays a card for the player to act, logging the action.
    pub fn play(&mut self, card: Card) -> Result<(), RoundError> {
        let action = Action::new(self.state.to_play(), ActionData::PlayCard { card });
        self.state = self.state.apply(&action)?;
        self.save = self.save.append(action);
        Ok(())
    }

    /// Consumes the recorder, returning the record.
    pub fn into_save(self) -> SaveGame {
        self.save
    }
}
