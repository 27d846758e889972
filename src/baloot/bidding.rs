//! Bidding.
//!
//! The bidding machine folds a logged action sequence into a contract (or a
//! redeal). It validates actors and eligibility but never chooses: which
//! action an agent takes at each decision point is external policy.
//!
//! Bidding runs over the authority order — the four seats starting right of
//! the dealer, earlier is higher. Round one offers sun, ashkal and hokm;
//! a hokm claim opens a sun-override window over the remaining seats, and an
//! unchallenged hokm claimant may still convert to sun/ashkal before
//! finalizing. Round two (entered only when all four pass) substitutes hokm
//! thani, with a free choice of trump other than the floor suit. Any sun or
//! ashkal claim opens the escalation ladder: higher-authority seats on the
//! opposing team may take the claim over, nearest first, until a full
//! outward scan produces no takeover.

use log::debug;

use super::snapshot::{hand_mut, Hands};
use super::{
    Action, ActionData, ActionType, BidError, BidKind, BiddingInitial, Card, Contract, Mode,
    PlayingInitial, RoundError, Seat,
};

/// Which of the two bid rounds is in progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BidRound {
    First,
    Second,
}

impl BidRound {
    /// The hokm-style claim available in this round.
    fn hokm_claim(self) -> ActionType {
        match self {
            BidRound::First => ActionType::BidHokm,
            BidRound::Second => ActionType::BidHokmThani,
        }
    }

    fn hokm_kind(self) -> BidKind {
        match self {
            BidRound::First => BidKind::Hokm,
            BidRound::Second => BidKind::HokmThani,
        }
    }
}

/// Bidding phase. `cursor` fields hold a position in the authority order.
#[derive(Debug, Clone, PartialEq)]
enum Phase {
    /// Seats bid in authority order.
    Open { round: BidRound, cursor: u8 },
    /// A hokm claim is pending; remaining seats may still claim sun/ashkal.
    Window {
        round: BidRound,
        claimant: Seat,
        cursor: u8,
    },
    /// The window closed with no override: the claimant converts or finalizes.
    Choice { round: BidRound, claimant: Seat },
    /// A sun/ashkal claim is being scanned for takeovers.
    Ladder {
        kind: BidKind,
        holder: Seat,
        cursor: u8,
    },
    /// The ladder resolved; the winning bidder must finalize.
    Finalize { contract: Contract },
    /// Terminal: nobody claimed in either round.
    Redeal,
    /// Terminal: the contract is set.
    Done { contract: Contract },
}

/// The outcome of a finished bidding sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum BidOutcome {
    /// Reshuffle and deal again, with the dealer advanced one seat.
    Redeal { next_dealer: Seat },
    Contract(Contract),
}

/// The bidding state machine. Immutable: applying an action returns a new
/// state, leaving the original untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct BidState {
    dealer: Seat,
    floor: Card,
    phase: Phase,
}

impl From<&BiddingInitial> for BidState {
    fn from(initial: &BiddingInitial) -> Self {
        BidState {
            dealer: initial.dealer,
            floor: initial.floor_card,
            phase: Phase::Open {
                round: BidRound::First,
                cursor: 0,
            },
        }
    }
}

impl BidState {
    /// The seat at the given position in the authority order: position 0 is
    /// right of the dealer, position 3 the dealer.
    fn authority_seat(&self, position: u8) -> Seat {
        let mut seat = self.dealer;
        for _ in 0..=position {
            seat = seat.next();
        }
        seat
    }

    fn authority_position(&self, seat: Seat) -> u8 {
        (seat.index() + 3 - self.dealer.index()) % 4
    }

    /// Only the dealer or the seat to the dealer's left may claim ashkal.
    pub fn ashkal_eligible(&self, seat: Seat) -> bool {
        seat == self.dealer || seat == self.dealer.prev()
    }

    /// The terminal outcome, if bidding is finished.
    pub fn outcome(&self) -> Option<BidOutcome> {
        match &self.phase {
            Phase::Redeal => Some(BidOutcome::Redeal {
                next_dealer: self.dealer.next(),
            }),
            Phase::Done { contract } => Some(BidOutcome::Contract(*contract)),
            _ => None,
        }
    }

    /// The contract the machine has resolved and now expects to be
    /// finalized, if the ladder has run its course.
    pub fn pending_contract(&self) -> Option<&Contract> {
        match &self.phase {
            Phase::Finalize { contract } => Some(contract),
            _ => None,
        }
    }

    /// The seat expected to act next and the action types open to it, or
    /// `None` if bidding is finished.
    pub fn expected(&self) -> Option<(Seat, Vec<ActionType>)> {
        match &self.phase {
            Phase::Open { round, cursor } => {
                let seat = self.authority_seat(*cursor);
                let mut kinds = vec![ActionType::Pass, ActionType::BidSun];
                if self.ashkal_eligible(seat) {
                    kinds.push(ActionType::BidAshkal);
                }
                kinds.push(round.hokm_claim());
                Some((seat, kinds))
            }
            Phase::Window { cursor, .. } => {
                let seat = self.authority_seat(*cursor);
                let mut kinds = vec![ActionType::Pass, ActionType::BidSun];
                if self.ashkal_eligible(seat) {
                    kinds.push(ActionType::BidAshkal);
                }
                Some((seat, kinds))
            }
            Phase::Choice { claimant, .. } => {
                let mut kinds = vec![ActionType::BidSun];
                if self.ashkal_eligible(*claimant) {
                    kinds.push(ActionType::BidAshkal);
                }
                kinds.push(ActionType::FinalizeContract);
                Some((*claimant, kinds))
            }
            Phase::Ladder { cursor, .. } => {
                let seat = self.authority_seat(*cursor);
                Some((seat, vec![ActionType::Pass, ActionType::Raise]))
            }
            Phase::Finalize { contract } => Some((
                contract.winning_bidder,
                vec![ActionType::FinalizeContract],
            )),
            Phase::Redeal | Phase::Done { .. } => None,
        }
    }

    /// Applies a logged bid action, returning the next state. Rule
    /// violations leave the current state untouched.
    pub fn apply(&self, action: &Action) -> Result<BidState, BidError> {
        let Some((expected, _)) = self.expected() else {
            return Err(BidError::Settled);
        };
        if action.player != expected {
            return Err(BidError::WrongBidder {
                expected,
                got: action.player,
            });
        }
        let seat = action.player;
        let phase = match (&self.phase, &action.data) {
            (Phase::Open { round, cursor }, ActionData::Pass) => {
                if *cursor < 3 {
                    Phase::Open {
                        round: *round,
                        cursor: cursor + 1,
                    }
                } else if *round == BidRound::First {
                    debug!("all seats passed, opening second bid round");
                    Phase::Open {
                        round: BidRound::Second,
                        cursor: 0,
                    }
                } else {
                    debug!("all seats passed twice: redeal");
                    Phase::Redeal
                }
            }
            (Phase::Open { .. }, ActionData::BidSun) => self.enter_ladder(seat, BidKind::Sun)?,
            (Phase::Open { .. }, ActionData::BidAshkal) => {
                self.enter_ladder(seat, BidKind::Ashkal)?
            }
            (Phase::Open { round, cursor }, data)
                if data.kind() == round.hokm_claim() =>
            {
                debug!("{seat} claims {}", round.hokm_kind());
                if *cursor < 3 {
                    Phase::Window {
                        round: *round,
                        claimant: seat,
                        cursor: cursor + 1,
                    }
                } else {
                    // The dealer claims last; there is nobody left to
                    // override.
                    Phase::Choice {
                        round: *round,
                        claimant: seat,
                    }
                }
            }
            (
                Phase::Window {
                    round,
                    claimant,
                    cursor,
                },
                ActionData::Pass,
            ) => {
                if *cursor < 3 {
                    Phase::Window {
                        round: *round,
                        claimant: *claimant,
                        cursor: cursor + 1,
                    }
                } else {
                    Phase::Choice {
                        round: *round,
                        claimant: *claimant,
                    }
                }
            }
            (Phase::Window { .. }, ActionData::BidSun) => self.enter_ladder(seat, BidKind::Sun)?,
            (Phase::Window { .. }, ActionData::BidAshkal) => {
                self.enter_ladder(seat, BidKind::Ashkal)?
            }
            (Phase::Choice { .. }, ActionData::BidSun) => {
                debug!("{seat} converts the hokm claim to sun");
                self.enter_ladder(seat, BidKind::Sun)?
            }
            (Phase::Choice { .. }, ActionData::BidAshkal) => {
                debug!("{seat} converts the hokm claim to ashkal");
                self.enter_ladder(seat, BidKind::Ashkal)?
            }
            (Phase::Choice { round, claimant }, ActionData::FinalizeContract { .. }) => {
                let contract = self.hokm_contract(*round, *claimant, &action.data)?;
                debug!("{seat} finalizes {contract:?}");
                Phase::Done { contract }
            }
            (Phase::Ladder { kind, holder, cursor }, ActionData::Pass) => {
                self.ladder_continue(*kind, *holder, *cursor)
            }
            (Phase::Ladder { .. }, ActionData::Raise { bid_kind }) => {
                let kind = match bid_kind {
                    BidKind::Sun | BidKind::Ashkal => *bid_kind,
                    other => return Err(BidError::InvalidRaise(*other)),
                };
                debug!("{seat} raises to {kind}");
                self.enter_ladder(seat, kind)?
            }
            (Phase::Finalize { contract }, ActionData::FinalizeContract { .. }) => {
                check_finalize(contract, &action.data)?;
                debug!("{seat} finalizes {contract:?}");
                Phase::Done {
                    contract: *contract,
                }
            }
            (_, data) => {
                return Err(BidError::UnexpectedBid {
                    seat,
                    kind: data.kind(),
                })
            }
        };
        Ok(BidState {
            phase,
            ..self.clone()
        })
    }

    /// Opens (or re-opens) the escalation ladder with a new holder, scanning
    /// outward for the nearest higher-authority challenger on the opposing
    /// team. With no challenger left, the contract resolves immediately.
    fn enter_ladder(&self, holder: Seat, kind: BidKind) -> Result<Phase, BidError> {
        if kind == BidKind::Ashkal && !self.ashkal_eligible(holder) {
            return Err(BidError::AshkalIneligible(holder));
        }
        Ok(self.ladder_continue(kind, holder, self.authority_position(holder)))
    }

    /// Continues the challenger scan strictly above `below` in authority.
    fn ladder_continue(&self, kind: BidKind, holder: Seat, below: u8) -> Phase {
        let challenger = (0..below)
            .rev()
            .map(|position| (position, self.authority_seat(position)))
            .find(|(_, seat)| seat.team() != holder.team());
        match challenger {
            Some((position, seat)) => {
                debug!("{seat} may challenge {holder}'s {kind} claim");
                Phase::Ladder {
                    kind,
                    holder,
                    cursor: position,
                }
            }
            None => {
                let floor_taker = match kind {
                    BidKind::Ashkal => holder.partner(),
                    _ => holder,
                };
                let contract = Contract {
                    mode: Mode::Sun,
                    trump: None,
                    winning_bidder: holder,
                    floor_taker,
                    bid_kind: kind,
                };
                debug!("ladder closed: {holder} holds {kind}");
                Phase::Finalize { contract }
            }
        }
    }

    /// Builds and checks the contract for a hokm finalization out of the
    /// claimant's choice phase.
    fn hokm_contract(
        &self,
        round: BidRound,
        claimant: Seat,
        data: &ActionData,
    ) -> Result<Contract, BidError> {
        let ActionData::FinalizeContract {
            mode,
            trump_suit,
            winning_bidder,
            floor_taker,
            bid_kind,
        } = data
        else {
            unreachable!("caller matched FinalizeContract");
        };
        if *mode != Mode::Hokm {
            return Err(BidError::FinalizeMismatch { field: "mode" });
        }
        let trump = match (round, trump_suit) {
            (_, None) => return Err(BidError::FinalizeMismatch { field: "trump_suit" }),
            (BidRound::First, Some(suit)) if *suit != self.floor.suit => {
                return Err(BidError::FloorSuitRequired {
                    expected: self.floor.suit,
                    got: *suit,
                });
            }
            (BidRound::Second, Some(suit)) if *suit == self.floor.suit => {
                return Err(BidError::FloorSuitForbidden(*suit));
            }
            (_, Some(suit)) => *suit,
        };
        let contract = Contract {
            mode: Mode::Hokm,
            trump: Some(trump),
            winning_bidder: claimant,
            floor_taker: claimant,
            bid_kind: round.hokm_kind(),
        };
        if *winning_bidder != contract.winning_bidder {
            return Err(BidError::FinalizeMismatch {
                field: "winning_bidder",
            });
        }
        if *floor_taker != contract.floor_taker {
            return Err(BidError::FinalizeMismatch {
                field: "floor_taker",
            });
        }
        if *bid_kind != contract.bid_kind {
            return Err(BidError::FinalizeMismatch { field: "bid_kind" });
        }
        Ok(contract)
    }
}

/// Checks a finalize payload against the contract the machine resolved.
fn check_finalize(contract: &Contract, data: &ActionData) -> Result<(), BidError> {
    let ActionData::FinalizeContract {
        mode,
        trump_suit,
        winning_bidder,
        floor_taker,
        bid_kind,
    } = data
    else {
        unreachable!("caller matched FinalizeContract");
    };
    if *mode != contract.mode {
        return Err(BidError::FinalizeMismatch { field: "mode" });
    }
    if *trump_suit != contract.trump {
        return Err(BidError::FinalizeMismatch { field: "trump_suit" });
    }
    if *winning_bidder != contract.winning_bidder {
        return Err(BidError::FinalizeMismatch {
            field: "winning_bidder",
        });
    }
    if *floor_taker != contract.floor_taker {
        return Err(BidError::FinalizeMismatch {
            field: "floor_taker",
        });
    }
    if *bid_kind != contract.bid_kind {
        return Err(BidError::FinalizeMismatch { field: "bid_kind" });
    }
    Ok(())
}

/// Folds a bidding log into its outcome. Returns the outcome and the actions
/// left over after bidding settled (the card plays of a full-round log).
/// A log that ends mid-bidding is rejected as missing its finalize; trailing
/// actions after a redeal are rejected outright.
pub fn resolve_bidding<'a>(
    initial: &BiddingInitial,
    actions: &'a [Action],
) -> Result<(BidOutcome, &'a [Action]), RoundError> {
    initial.validate()?;
    let finalize_count = actions
        .iter()
        .filter(|a| a.kind() == ActionType::FinalizeContract)
        .count();
    if finalize_count > 1 {
        return Err(RoundError::DuplicateFinalize);
    }

    let mut state = BidState::from(initial);
    for (index, action) in actions.iter().enumerate() {
        if let Some(outcome) = state.outcome() {
            return match outcome {
                BidOutcome::Redeal { .. } => Err(RoundError::TrailingAction(action.player)),
                BidOutcome::Contract(_) => Ok((outcome, &actions[index..])),
            };
        }
        state = state.apply(action)?;
    }
    match state.outcome() {
        Some(outcome) => Ok((outcome, &[])),
        None => Err(RoundError::MissingFinalize),
    }
}

/// Completes the 5-card deal into full 8-card hands, as a pure function of
/// the bidding snapshot and the finalized contract: the floor taker receives
/// the floor card, then the stock is dealt in order starting right of the
/// dealer until every hand holds exactly eight cards.
pub fn complete_deal(initial: &BiddingInitial, contract: &Contract) -> Result<Hands, RoundError> {
    initial.validate()?;
    contract.validate()?;
    let mut hands = initial.hands.clone();
    hand_mut(&mut hands, contract.floor_taker).push(initial.floor_card);

    let mut stock = initial.stock.iter();
    for seat in initial.dealer.next_n(4) {
        let hand = hand_mut(&mut hands, seat);
        let need = 8 - hand.len();
        for _ in 0..need {
            hand.push(*stock.next().ok_or(RoundError::StockMismatch {
                len: initial.stock.len(),
                needed: 11,
            })?);
        }
    }
    if stock.next().is_some() {
        return Err(RoundError::StockMismatch {
            len: initial.stock.len(),
            needed: 11,
        });
    }
    Ok(hands)
}

/// Derives the playing snapshot from a finalized contract.
pub fn playing_initial(
    initial: &BiddingInitial,
    contract: &Contract,
) -> Result<PlayingInitial, RoundError> {
    let hands = complete_deal(initial, contract)?;
    let playing = PlayingInitial {
        dealer: initial.dealer,
        leader: initial.dealer.next(),
        mode: contract.mode,
        trump: contract.trump,
        hands,
    };
    playing.validate()?;
    Ok(playing)
}

#[cfg(test)]
mod test {
    use assert_matches::assert_matches;

    use super::super::snapshot::test::bidding_fixture;
    use super::super::Suit;
    use super::*;

    // The fixture deals with North as dealer, so the authority order is
    // East, South, West, North, and ashkal is open to North and West. The
    // floor card is the queen of hearts.

    fn act(seat: Seat, data: ActionData) -> Action {
        Action::new(seat, data)
    }

    fn finalize(seat: Seat, contract: &Contract) -> Action {
        act(seat, ActionData::finalize(contract))
    }

    fn fold(actions: &[Action]) -> Result<BidState, BidError> {
        let initial = bidding_fixture();
        let mut state = BidState::from(&initial);
        for action in actions {
            state = state.apply(action)?;
        }
        Ok(state)
    }

    fn sun_contract(winning_bidder: Seat, bid_kind: BidKind) -> Contract {
        let floor_taker = match bid_kind {
            BidKind::Ashkal => winning_bidder.partner(),
            _ => winning_bidder,
        };
        Contract {
            mode: Mode::Sun,
            trump: None,
            winning_bidder,
            floor_taker,
            bid_kind,
        }
    }

    #[test]
    fn test_expected_opening() {
        let state = BidState::from(&bidding_fixture());
        let (seat, kinds) = state.expected().unwrap();
        assert_eq!(seat, Seat::East);
        assert_eq!(
            kinds,
            vec![ActionType::Pass, ActionType::BidSun, ActionType::BidHokm]
        );
        // West, left of the dealer, may also bid ashkal.
        let state = fold(&[
            act(Seat::East, ActionData::Pass),
            act(Seat::South, ActionData::Pass),
        ])
        .unwrap();
        let (seat, kinds) = state.expected().unwrap();
        assert_eq!(seat, Seat::West);
        assert!(kinds.contains(&ActionType::BidAshkal));
    }

    #[test]
    fn test_wrong_bidder() {
        let state = BidState::from(&bidding_fixture());
        assert_matches!(
            state.apply(&act(Seat::South, ActionData::Pass)),
            Err(BidError::WrongBidder {
                expected: Seat::East,
                got: Seat::South,
            })
        );
    }

    #[test]
    fn test_unchallenged_sun_claim() {
        // East has the highest authority: a sun claim resolves immediately.
        let state = fold(&[act(Seat::East, ActionData::BidSun)]).unwrap();
        let contract = sun_contract(Seat::East, BidKind::Sun);
        assert_eq!(state.pending_contract(), Some(&contract));
        let state = state.apply(&finalize(Seat::East, &contract)).unwrap();
        assert_eq!(state.outcome(), Some(BidOutcome::Contract(contract)));
    }

    #[test]
    fn test_double_pass_is_a_redeal() {
        let passes: Vec<Action> = [Seat::East, Seat::South, Seat::West, Seat::North]
            .iter()
            .cycle()
            .take(8)
            .map(|&seat| act(seat, ActionData::Pass))
            .collect();
        let state = fold(&passes).unwrap();
        assert_eq!(
            state.outcome(),
            Some(BidOutcome::Redeal {
                next_dealer: Seat::East,
            })
        );
        assert_matches!(
            state.apply(&act(Seat::East, ActionData::Pass)),
            Err(BidError::Settled)
        );
    }

    #[test]
    fn test_hokm_claim_and_quiet_window() {
        let state = fold(&[
            act(Seat::East, ActionData::BidHokm),
            act(Seat::South, ActionData::Pass),
            act(Seat::West, ActionData::Pass),
            act(Seat::North, ActionData::Pass),
        ])
        .unwrap();
        // The window closed: East now converts or finalizes hokm.
        let (seat, kinds) = state.expected().unwrap();
        assert_eq!(seat, Seat::East);
        assert!(kinds.contains(&ActionType::FinalizeContract));
        assert!(kinds.contains(&ActionType::BidSun));

        let contract = Contract {
            mode: Mode::Hokm,
            trump: Some(Suit::Heart),
            winning_bidder: Seat::East,
            floor_taker: Seat::East,
            bid_kind: BidKind::Hokm,
        };
        let state = state.apply(&finalize(Seat::East, &contract)).unwrap();
        assert_eq!(state.outcome(), Some(BidOutcome::Contract(contract)));
    }

    #[test]
    fn test_hokm_trump_must_match_floor() {
        let state = fold(&[
            act(Seat::East, ActionData::BidHokm),
            act(Seat::South, ActionData::Pass),
            act(Seat::West, ActionData::Pass),
            act(Seat::North, ActionData::Pass),
        ])
        .unwrap();
        let mut contract = Contract {
            mode: Mode::Hokm,
            trump: Some(Suit::Spade),
            winning_bidder: Seat::East,
            floor_taker: Seat::East,
            bid_kind: BidKind::Hokm,
        };
        assert_matches!(
            state.apply(&finalize(Seat::East, &contract)),
            Err(BidError::FloorSuitRequired {
                expected: Suit::Heart,
                got: Suit::Spade,
            })
        );
        contract.trump = None;
        assert_matches!(
            state.apply(&finalize(Seat::East, &contract)),
            Err(BidError::FinalizeMismatch { field: "trump_suit" })
        );
    }

    #[test]
    fn test_sun_override_kills_the_hokm_claim() {
        // East claims hokm; South overrides with sun. East, the only
        // higher-authority opponent, declines to raise.
        let state = fold(&[
            act(Seat::East, ActionData::BidHokm),
            act(Seat::South, ActionData::BidSun),
            act(Seat::East, ActionData::Pass),
        ])
        .unwrap();
        let contract = sun_contract(Seat::South, BidKind::Sun);
        assert_eq!(state.pending_contract(), Some(&contract));
    }

    #[test]
    fn test_hokm_claimant_converts_to_sun() {
        // The dealer claims hokm last (no override window), then changes
        // their mind. The conversion still runs the ladder over the
        // opposing seats with higher authority.
        let state = fold(&[
            act(Seat::East, ActionData::Pass),
            act(Seat::South, ActionData::Pass),
            act(Seat::West, ActionData::Pass),
            act(Seat::North, ActionData::BidHokm),
            act(Seat::North, ActionData::BidSun),
        ])
        .unwrap();
        // Nearest higher opponent first: West.
        let (seat, kinds) = state.expected().unwrap();
        assert_eq!(seat, Seat::West);
        assert_eq!(kinds, vec![ActionType::Pass, ActionType::Raise]);
    }

    #[test]
    fn test_ladder_raise_restarts_the_scan() {
        // West claims sun from third position; South may challenge first,
        // and takes over; then East gets the nearest-higher scan against
        // South and passes.
        let state = fold(&[
            act(Seat::East, ActionData::Pass),
            act(Seat::South, ActionData::Pass),
            act(Seat::West, ActionData::BidSun),
            act(
                Seat::South,
                ActionData::Raise {
                    bid_kind: BidKind::Sun,
                },
            ),
            act(Seat::East, ActionData::Pass),
        ])
        .unwrap();
        let contract = sun_contract(Seat::South, BidKind::Sun);
        assert_eq!(state.pending_contract(), Some(&contract));
    }

    #[test]
    fn test_ladder_skips_the_holders_team() {
        // West holds ashkal; South is the only opposing seat with higher
        // authority (East shares West's team and never challenges).
        let state = fold(&[
            act(Seat::East, ActionData::Pass),
            act(Seat::South, ActionData::Pass),
            act(Seat::West, ActionData::BidAshkal),
        ])
        .unwrap();
        let (seat, _) = state.expected().unwrap();
        assert_eq!(seat, Seat::South);
        let state = state.apply(&act(Seat::South, ActionData::Pass)).unwrap();
        // The scan found no further challenger: ashkal stands, and the
        // floor card goes to West's partner.
        let contract = state.pending_contract().unwrap();
        assert_eq!(contract.winning_bidder, Seat::West);
        assert_eq!(contract.floor_taker, Seat::East);
        assert_eq!(contract.bid_kind, BidKind::Ashkal);
    }

    #[test]
    fn test_ashkal_eligibility() {
        let state = BidState::from(&bidding_fixture());
        assert_matches!(
            state.apply(&act(Seat::East, ActionData::BidAshkal)),
            Err(BidError::AshkalIneligible(Seat::East))
        );
        // Raising into ashkal is just as restricted.
        let state = fold(&[
            act(Seat::East, ActionData::Pass),
            act(Seat::South, ActionData::Pass),
            act(Seat::West, ActionData::BidSun),
        ])
        .unwrap();
        assert_matches!(
            state.apply(&act(
                Seat::South,
                ActionData::Raise {
                    bid_kind: BidKind::Ashkal,
                }
            )),
            Err(BidError::AshkalIneligible(Seat::South))
        );
        assert_matches!(
            state.apply(&act(
                Seat::South,
                ActionData::Raise {
                    bid_kind: BidKind::Hokm,
                }
            )),
            Err(BidError::InvalidRaise(BidKind::Hokm))
        );
    }

    #[test]
    fn test_second_round_hokm_thani() {
        let state = fold(&[
            act(Seat::East, ActionData::Pass),
            act(Seat::South, ActionData::Pass),
            act(Seat::West, ActionData::Pass),
            act(Seat::North, ActionData::Pass),
            act(Seat::East, ActionData::BidHokmThani),
            act(Seat::South, ActionData::Pass),
            act(Seat::West, ActionData::Pass),
            act(Seat::North, ActionData::Pass),
        ])
        .unwrap();
        let mut contract = Contract {
            mode: Mode::Hokm,
            trump: Some(Suit::Heart),
            winning_bidder: Seat::East,
            floor_taker: Seat::East,
            bid_kind: BidKind::HokmThani,
        };
        // The floor suit is off limits in the second round.
        assert_matches!(
            state.apply(&finalize(Seat::East, &contract)),
            Err(BidError::FloorSuitForbidden(Suit::Heart))
        );
        contract.trump = Some(Suit::Club);
        let state = state.apply(&finalize(Seat::East, &contract)).unwrap();
        assert_eq!(state.outcome(), Some(BidOutcome::Contract(contract)));
    }

    #[test]
    fn test_hokm_claim_in_wrong_round() {
        let state = BidState::from(&bidding_fixture());
        assert_matches!(
            state.apply(&act(Seat::East, ActionData::BidHokmThani)),
            Err(BidError::UnexpectedBid {
                seat: Seat::East,
                kind: ActionType::BidHokmThani,
            })
        );
    }

    #[test]
    fn test_finalize_must_match_resolution() {
        let state = fold(&[act(Seat::East, ActionData::BidSun)]).unwrap();
        let mut contract = sun_contract(Seat::East, BidKind::Sun);
        contract.floor_taker = Seat::West;
        assert_matches!(
            state.apply(&finalize(Seat::East, &contract)),
            Err(BidError::FinalizeMismatch {
                field: "floor_taker",
            })
        );
    }

    #[test]
    fn test_resolve_bidding_structural_errors() {
        let initial = bidding_fixture();
        // Ends mid-bidding.
        let actions = [act(Seat::East, ActionData::BidHokm)];
        assert_matches!(
            resolve_bidding(&initial, &actions),
            Err(RoundError::MissingFinalize)
        );
        // Two finalizes can never be valid.
        let contract = sun_contract(Seat::East, BidKind::Sun);
        let actions = [
            act(Seat::East, ActionData::BidSun),
            finalize(Seat::East, &contract),
            finalize(Seat::East, &contract),
        ];
        assert_matches!(
            resolve_bidding(&initial, &actions),
            Err(RoundError::DuplicateFinalize)
        );
        // Trailing actions after a redeal.
        let mut actions: Vec<Action> = [Seat::East, Seat::South, Seat::West, Seat::North]
            .iter()
            .cycle()
            .take(8)
            .map(|&seat| act(seat, ActionData::Pass))
            .collect();
        actions.push(act(Seat::East, ActionData::Pass));
        assert_matches!(
            resolve_bidding(&initial, &actions),
            Err(RoundError::TrailingAction(Seat::East))
        );
    }

    #[test]
    fn test_resolve_bidding_returns_remaining_actions() {
        let initial = bidding_fixture();
        let contract = sun_contract(Seat::East, BidKind::Sun);
        let play = act(
            Seat::East,
            ActionData::PlayCard {
                card: "7S".parse().unwrap(),
            },
        );
        let actions = [
            act(Seat::East, ActionData::BidSun),
            finalize(Seat::East, &contract),
            play,
        ];
        let (outcome, rest) = resolve_bidding(&initial, &actions).unwrap();
        assert_eq!(outcome, BidOutcome::Contract(contract));
        assert_eq!(rest, &[play]);
    }

    #[test]
    fn test_complete_deal_ashkal_partner_takes_floor() {
        // Dealer is player 0; the winning bidder is player 1 under ashkal,
        // so the floor card lands with player 3.
        let initial = bidding_fixture();
        let contract = sun_contract(Seat::East, BidKind::Ashkal);
        assert_eq!(contract.floor_taker, Seat::West);
        let playing = playing_initial(&initial, &contract).unwrap();
        assert_eq!(playing.leader, Seat::East);
        assert_eq!(playing.mode, Mode::Sun);
        assert_eq!(playing.trump, None);
        for seat in Seat::all_seats() {
            assert_eq!(playing.hands[seat.index() as usize].len(), 8);
        }
        let west = &playing.hands[Seat::West.index() as usize];
        assert!(west.contains(&initial.floor_card));
        let east = &playing.hands[Seat::East.index() as usize];
        assert!(!east.contains(&initial.floor_card));
        // Stock is dealt in order from the first bidder: East takes the
        // first three stock cards.
        assert_eq!(east[5..], initial.stock[..3]);
        // West already held six and takes exactly two.
        assert_eq!(west[6..], initial.stock[6..8]);
    }

    #[test]
    fn test_complete_deal_rejects_bad_hands() {
        let mut initial = bidding_fixture();
        let moved = initial.hands[0].pop().unwrap();
        initial.hands[1].push(moved);
        let contract = sun_contract(Seat::East, BidKind::Sun);
        assert_matches!(
            complete_deal(&initial, &contract),
            Err(RoundError::WrongHandSize { .. })
        );
    }
}
