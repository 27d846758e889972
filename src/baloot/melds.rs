//! Melds (projects).
//!
//! A meld is a scoring combination held entirely within one player's hand:
//! a same-suit sequence of three to five cards, four of a kind, or the king
//! and queen of trump ("balote"). Melds are detected on the original 8-card
//! deal, before any card is played, and settle in final score units.
//!
//! Overlapping candidates are generated freely; exclusivity is enforced when
//! the best non-overlapping subset is selected. Hands are small, so the
//! selection is an exhaustive subset search — the tie-break chain requires
//! true optimality, not a greedy approximation.

use std::collections::BTreeSet;

use super::snapshot::{hand, Hands};
use super::{Card, Mode, Rank, Seat, Suit, Team};

/// The kind of a meld.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MeldKind {
    Sequence,
    FourOfAKind,
    Balote,
}

/// A single meld, fully contained in one player's hand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meld {
    pub kind: MeldKind,
    /// Value in final score units under the active mode.
    pub units: u16,
    /// The exact cards the meld consumes.
    pub cards: BTreeSet<Card>,
    /// Tie-break strength: for sequences (top rank index, length), for four
    /// of a kind a rank scalar, for balote a constant.
    pub strength: (u8, u8),
    pub owner: Seat,
    /// Balote pays even when its team wins no trick.
    pub exempt: bool,
}

impl Meld {
    /// Comparison key for ranking melds of the same team.
    fn rank_key(&self) -> (u16, (u8, u8)) {
        (self.units, self.strength)
    }
}

fn sequence_units(mode: Mode, len: usize) -> u16 {
    match (mode, len) {
        (Mode::Sun, 3) => 4,
        (Mode::Sun, 4) => 10,
        (Mode::Sun, 5) => 20,
        (Mode::Hokm, 3) => 2,
        (Mode::Hokm, 4) => 5,
        (Mode::Hokm, 5) => 10,
        _ => unreachable!("sequence windows are 3 to 5 cards"),
    }
}

fn four_units(mode: Mode, rank: Rank) -> Option<u16> {
    match (mode, rank) {
        (Mode::Sun, Rank::Ace) => Some(40),
        (Mode::Sun, Rank::Ten | Rank::Jack | Rank::Queen | Rank::King) => Some(20),
        (Mode::Hokm, Rank::Ten | Rank::Jack | Rank::Queen | Rank::King | Rank::Ace) => Some(10),
        _ => None,
    }
}

fn four_strength(rank: Rank) -> u8 {
    match rank {
        Rank::Ten => 0,
        Rank::Jack => 1,
        Rank::Queen => 2,
        Rank::King => 3,
        Rank::Ace => 4,
        _ => unreachable!("only 10 through ace form fours"),
    }
}

/// Generates every sequence candidate in the hand: all windows of length 5,
/// 4 and 3 within each maximal same-suit run, in sequence order 7-8-9-10-J-Q-K-A.
fn sequence_candidates(cards: &[Card], owner: Seat, mode: Mode) -> Vec<Meld> {
    let mut melds = vec![];
    for &suit in Suit::all_suits() {
        let mut in_suit: Vec<Card> = cards.iter().filter(|c| c.suit == suit).copied().collect();
        in_suit.sort_unstable_by_key(|c| c.rank.sequence_index());

        let mut start = 0;
        while start < in_suit.len() {
            let mut end = start;
            while end + 1 < in_suit.len()
                && in_suit[end + 1].rank.sequence_index()
                    == in_suit[end].rank.sequence_index() + 1
            {
                end += 1;
            }

            let run = &in_suit[start..=end];
            for len in (3..=5).rev() {
                if run.len() < len {
                    continue;
                }
                for window in run.windows(len) {
                    let top = window[len - 1].rank;
                    melds.push(Meld {
                        kind: MeldKind::Sequence,
                        units: sequence_units(mode, len),
                        cards: window.iter().copied().collect(),
                        strength: (top.sequence_index(), len as u8),
                        owner,
                        exempt: false,
                    });
                }
            }

            start = end + 1;
        }
    }
    melds
}

/// Generates four-of-a-kind candidates; only 10/J/Q/K/A count.
fn four_candidates(cards: &[Card], owner: Seat, mode: Mode) -> Vec<Meld> {
    let mut melds = vec![];
    for &rank in Rank::all_ranks() {
        let of_rank: BTreeSet<Card> = cards.iter().filter(|c| c.rank == rank).copied().collect();
        if of_rank.len() != 4 {
            continue;
        }
        if let Some(units) = four_units(mode, rank) {
            melds.push(Meld {
                kind: MeldKind::FourOfAKind,
                units,
                cards: of_rank,
                strength: (four_strength(rank), 0),
                owner,
                exempt: false,
            });
        }
    }
    melds
}

/// Generates the balote candidate: king and queen of trump, hokm only.
fn balote_candidate(cards: &[Card], owner: Seat, mode: Mode, trump: Option<Suit>) -> Option<Meld> {
    if mode != Mode::Hokm {
        return None;
    }
    let trump = trump?;
    let king = Card::new(Rank::King, trump);
    let queen = Card::new(Rank::Queen, trump);
    if cards.contains(&king) && cards.contains(&queen) {
        Some(Meld {
            kind: MeldKind::Balote,
            units: 2,
            cards: [king, queen].into_iter().collect(),
            strength: (0, 0),
            owner,
            exempt: true,
        })
    } else {
        None
    }
}

/// All meld candidates for one hand.
pub fn candidates(cards: &[Card], owner: Seat, mode: Mode, trump: Option<Suit>) -> Vec<Meld> {
    let mut melds = sequence_candidates(cards, owner, mode);
    melds.extend(four_candidates(cards, owner, mode));
    melds.extend(balote_candidate(cards, owner, mode, trump));
    melds
}

/// Selects the best set of non-overlapping melds for one hand, by exhaustive
/// search over candidate subsets. Deterministic even when several subsets
/// reach the maximum: ties break on the descending meld-value profile, then
/// on the descending strength profile.
pub fn best_meld_set(
    cards: &[Card],
    owner: Seat,
    mode: Mode,
    trump: Option<Suit>,
) -> (u16, Vec<Meld>) {
    let candidates = candidates(cards, owner, mode, trump);
    let n = candidates.len();
    debug_assert!(n < 32, "an 8-card hand has a small candidate count");

    let mut best_units = 0;
    let mut best: Vec<Meld> = vec![];
    for mask in 1u32..(1 << n) {
        let mut used: BTreeSet<Card> = BTreeSet::new();
        let mut total = 0;
        let mut chosen: Vec<&Meld> = vec![];
        let mut disjoint = true;
        for (i, meld) in candidates.iter().enumerate() {
            if mask & (1 << i) == 0 {
                continue;
            }
            if meld.cards.iter().any(|c| used.contains(c)) {
                disjoint = false;
                break;
            }
            used.extend(meld.cards.iter().copied());
            total += meld.units;
            chosen.push(meld);
        }
        if !disjoint {
            continue;
        }

        chosen.sort_unstable_by(|a, b| b.rank_key().cmp(&a.rank_key()));
        let better = match total.cmp(&best_units) {
            std::cmp::Ordering::Greater => true,
            std::cmp::Ordering::Less => false,
            std::cmp::Ordering::Equal => {
                let values: Vec<u16> = chosen.iter().map(|m| m.units).collect();
                let best_values: Vec<u16> = best.iter().map(|m| m.units).collect();
                match values.cmp(&best_values) {
                    std::cmp::Ordering::Greater => true,
                    std::cmp::Ordering::Less => false,
                    std::cmp::Ordering::Equal => {
                        let strengths: Vec<(u8, u8)> =
                            chosen.iter().map(|m| m.strength).collect();
                        let best_strengths: Vec<(u8, u8)> =
                            best.iter().map(|m| m.strength).collect();
                        strengths > best_strengths
                    }
                }
            }
        };
        if better {
            best_units = total;
            best = chosen.into_iter().cloned().collect();
        }
    }
    (best_units, best)
}

/// A team's melds: the sum of its two players' independently-best sets.
/// Melds never combine cards across hands.
pub fn team_meld_sets(
    hands: &Hands,
    team: Team,
    mode: Mode,
    trump: Option<Suit>,
) -> (u16, Vec<Meld>) {
    let [a, b] = team.seats();
    let (units_a, mut melds_a) = best_meld_set(hand(hands, a), a, mode, trump);
    let (units_b, melds_b) = best_meld_set(hand(hands, b), b, mode, trump);
    melds_a.extend(melds_b);
    (units_a + units_b, melds_a)
}

fn top_meld(melds: &[Meld]) -> Option<&Meld> {
    melds.iter().max_by_key(|m| m.rank_key())
}

/// The project settlement for a round: which team's melds pay, and how much.
#[derive(Debug, Clone, PartialEq)]
pub struct Projects {
    /// The team whose melds score, or `None` when neither team has any.
    pub winner: Option<Team>,
    /// The winning team's total units.
    pub units: u16,
    /// The winning team's melds.
    pub melds: Vec<Meld>,
}

impl Projects {
    /// Units that pay even without a trick win (balote).
    pub fn exempt_units(&self) -> u16 {
        self.melds.iter().filter(|m| m.exempt).map(|m| m.units).sum()
    }
}

/// Computes the cross-team project comparison from the original 8-card deal.
/// Teams compare by their single highest-ranked meld; an exact tie falls back
/// to the authority player's team (the round's first leader).
pub fn compute_projects(
    hands: &Hands,
    mode: Mode,
    trump: Option<Suit>,
    authority: Seat,
) -> Projects {
    let (units_ns, melds_ns) = team_meld_sets(hands, Team::NorthSouth, mode, trump);
    let (units_ew, melds_ew) = team_meld_sets(hands, Team::EastWest, mode, trump);

    let winner = match (top_meld(&melds_ns), top_meld(&melds_ew)) {
        (None, None) => None,
        (Some(_), None) => Some(Team::NorthSouth),
        (None, Some(_)) => Some(Team::EastWest),
        (Some(ns), Some(ew)) => match ns.rank_key().cmp(&ew.rank_key()) {
            std::cmp::Ordering::Greater => Some(Team::NorthSouth),
            std::cmp::Ordering::Less => Some(Team::EastWest),
            std::cmp::Ordering::Equal => Some(authority.team()),
        },
    };

    match winner {
        Some(Team::NorthSouth) => Projects {
            winner,
            units: units_ns,
            melds: melds_ns,
        },
        Some(Team::EastWest) => Projects {
            winner,
            units: units_ew,
            melds: melds_ew,
        },
        None => Projects {
            winner: None,
            units: 0,
            melds: vec![],
        },
    }
}
