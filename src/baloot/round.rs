//! Trick play.
//!
//! [`PlayState`] is an immutable snapshot of a round in progress. Playing a
//! card produces a new snapshot; the previous one is never modified, so a
//! rejected action leaves the caller exactly where it was.

use std::fmt::Display;

use super::snapshot::{hand, hand_mut, Hands};
use super::{
    Action, ActionData, Card, Mode, PlayError, PlayingInitial, RoundError, Seat, Suit, Trick,
    LAST_TRICK_BONUS,
};

/// Number of tricks in a round.
const TRICKS_PER_ROUND: u8 = 8;

/// The state of a round of trick play.
#[derive(Debug, Clone, PartialEq)]
pub struct PlayState {
    hands: Hands,
    mode: Mode,
    trump: Option<Suit>,
    leader: Seat,
    to_play: Seat,
    trick: Trick,
    trick_number: u8,
    card_points: [u16; 2],
    trick_wins: [u8; 2],
}

impl From<&PlayingInitial> for PlayState {
    fn from(initial: &PlayingInitial) -> Self {
        PlayState {
            hands: initial.hands.clone(),
            mode: initial.mode,
            trump: initial.trump,
            leader: initial.leader,
            to_play: initial.leader,
            trick: Trick::default(),
            trick_number: 0,
            card_points: [0, 0],
            trick_wins: [0, 0],
        }
    }
}

impl Display for PlayState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "trick {}/{}, {} to play, points {}:{}",
            self.trick_number,
            TRICKS_PER_ROUND,
            self.to_play,
            self.card_points[0],
            self.card_points[1],
        )
    }
}

impl PlayState {
    pub fn mode(&self) -> Mode {
        self.mode
    }

    pub fn trump(&self) -> Option<Suit> {
        self.trump
    }

    /// The player who led the current trick.
    pub fn leader(&self) -> Seat {
        self.leader
    }

    /// The player expected to play next.
    pub fn to_play(&self) -> Seat {
        self.to_play
    }

    /// The current, possibly empty trick.
    pub fn trick(&self) -> &Trick {
        &self.trick
    }

    /// The number of completed tricks.
    pub fn trick_number(&self) -> u8 {
        self.trick_number
    }

    /// Cumulative raw card points, indexed by team.
    pub fn card_points(&self) -> [u16; 2] {
        self.card_points
    }

    /// Cumulative trick wins, indexed by team.
    pub fn trick_wins(&self) -> [u8; 2] {
        self.trick_wins
    }

    /// The given player's remaining hand.
    pub fn hand(&self, seat: Seat) -> &[Card] {
        hand(&self.hands, seat)
    }

    /// True once all eight tricks have been resolved.
    pub fn is_finished(&self) -> bool {
        self.trick_number == TRICKS_PER_ROUND && self.trick.is_empty()
    }

    /// Computes the set of cards the player to act may legally play.
    ///
    /// Leading is unrestricted. A follower must follow the led suit, and when
    /// the led suit is trump must beat a trump already winning the trick if
    /// they can. A follower void in the led suit may play anything in sun; in
    /// hokm they must trump unless their partner is winning, and must
    /// overtrump a winning opponent trump if they hold a higher one.
    pub fn legal_moves(&self) -> Vec<Card> {
        let hand = self.hand(self.to_play);
        let Some(lead) = self.trick.lead_suit() else {
            return hand.to_vec();
        };

        let follow: Vec<Card> = hand.iter().filter(|c| c.suit == lead).copied().collect();
        if !follow.is_empty() {
            if self.trump == Some(lead) {
                let (_, winning) = self.trick.winner(self.trump).expect("trick is non-empty");
                let higher: Vec<Card> = follow
                    .iter()
                    .filter(|c| c.rank.trump_strength() > winning.rank.trump_strength())
                    .copied()
                    .collect();
                if !higher.is_empty() {
                    return higher;
                }
            }
            return follow;
        }

        // Void in the led suit.
        let Some(trump) = self.trump else {
            return hand.to_vec();
        };
        let trumps: Vec<Card> = hand.iter().filter(|c| c.suit == trump).copied().collect();
        if trumps.is_empty() {
            return hand.to_vec();
        }
        let (winner, winning) = self.trick.winner(self.trump).expect("trick is non-empty");
        if winner == self.to_play.partner() {
            return hand.to_vec();
        }
        if winning.suit == trump {
            let higher: Vec<Card> = trumps
                .iter()
                .filter(|c| c.rank.trump_strength() > winning.rank.trump_strength())
                .copied()
                .collect();
            if higher.is_empty() {
                hand.to_vec()
            } else {
                higher
            }
        } else {
            trumps
        }
    }

    /// Plays a card for the player to act, returning the next state. Fails
    /// without side effects if the card is not currently legal.
    pub fn play(&self, card: Card) -> Result<PlayState, PlayError> {
        if self.is_finished() {
            return Err(PlayError::RoundOver);
        }
        let seat = self.to_play;
        if !self.hand(seat).contains(&card) {
            return Err(PlayError::CardNotHeld(seat, card));
        }
        let legal = self.legal_moves();
        if !legal.contains(&card) {
            return Err(self.diagnose(seat, card));
        }

        let mut next = self.clone();
        let hand = hand_mut(&mut next.hands, seat);
        let index = hand.iter().position(|c| *c == card).expect("card held");
        hand.remove(index);
        next.trick.push(seat, card);

        if next.trick.len() == 4 {
            let (winner, _) = next.trick.winner(self.trump).expect("trick is full");
            let mut points = next.trick.points(self.trump);
            next.trick_number += 1;
            if next.trick_number == TRICKS_PER_ROUND {
                points += LAST_TRICK_BONUS;
            }
            let team = winner.team().index();
            next.card_points[team] += points;
            next.trick_wins[team] += 1;
            next.trick.clear();
            next.leader = winner;
            next.to_play = winner;
        } else {
            next.to_play = seat.next();
        }
        Ok(next)
    }

    /// Applies a logged action: the actor must match the player to act, and
    /// the action must be a card play.
    pub fn apply(&self, action: &Action) -> Result<PlayState, RoundError> {
        let ActionData::PlayCard { card } = action.data else {
            return Err(RoundError::UnsupportedAction(action.kind()));
        };
        if action.player != self.to_play {
            return Err(PlayError::OutOfTurn {
                expected: self.to_play,
                got: action.player,
            }
            .into());
        }
        Ok(self.play(card)?)
    }

    /// Names the rule an illegal card would break.
    fn diagnose(&self, seat: Seat, card: Card) -> PlayError {
        let lead = self.trick.lead_suit().expect("leads are unrestricted");
        if card.suit != lead && self.hand(seat).iter().any(|c| c.suit == lead) {
            return PlayError::MustFollowSuit { seat, suit: lead };
        }
        match self.trick.winner(self.trump) {
            Some((_, winning)) if winning.is_trump(self.trump) => {
                PlayError::MustOvertrump { seat, winning }
            }
            _ => PlayError::MustTrump { seat },
        }
    }
}
