//! Round settlement.
//!
//! Converts raw card points and the project comparison into final round
//! scores. The conversion is asymmetric: the non-contract team's points are
//! rounded and the contract team keeps the remainder of the mode total, with
//! takeover rules when the non-contract team outscores the bidders.

use super::{Mode, Projects, Team};

/// Rounds raw card points to the nearest multiple of ten: a last digit of
/// five or more rounds up, anything less truncates.
fn round_to_ten(raw: u16) -> u16 {
    let remainder = raw % 10;
    if remainder >= 5 {
        raw + (10 - remainder)
    } else {
        raw - remainder
    }
}

/// Settles one round from raw card points only, before projects.
///
/// Returns final score units indexed by team.
pub fn settle_cards(card_points: [u16; 2], contract_team: Team, mode: Mode) -> [u16; 2] {
    let ct = contract_team.index();
    let nc = contract_team.other().index();
    let ct_raw = card_points[ct];
    let nc_raw = card_points[nc];

    let mut scores = [0, 0];

    // A shut-out non-contract team concedes the fixed maximum.
    if nc_raw == 0 {
        scores[ct] = mode.sweep_units();
        return scores;
    }

    let nc_tens = round_to_ten(nc_raw) / 10;
    let nc_base = match mode {
        Mode::Sun => nc_tens * 2,
        Mode::Hokm => nc_tens,
    };
    let total = mode.total_units();
    let ct_base = total.saturating_sub(nc_base);

    // The non-contract team outscoring the bidders takes the whole total.
    if nc_raw > ct_raw {
        scores[nc] = total;
        return scores;
    }

    // Hokm-only carve-out: a rounded 8/8 draw is resolved on raw points;
    // only an exact raw tie keeps the split.
    if mode == Mode::Hokm && nc_base == 8 && ct_base == 8 {
        if nc_raw > ct_raw {
            scores[nc] = total;
            return scores;
        } else if ct_raw > nc_raw {
            scores[ct] = total;
            return scores;
        }
    }

    scores[nc] = nc_base;
    scores[ct] = ct_base;
    scores
}

/// Final settlement: adds the winning team's project units to the base score,
/// then applies the post-project takeover rule.
///
/// Project units require the winning team to have taken at least one trick;
/// melds flagged exempt (balote) pay unconditionally. If the non-contract
/// team then leads, it takes the mode total plus any project overflow above
/// it.
pub fn settle_with_projects(
    base: [u16; 2],
    mode: Mode,
    contract_team: Team,
    projects: &Projects,
    trick_wins: [u8; 2],
) -> [u16; 2] {
    let mut scores = base;

    if let Some(winner) = projects.winner {
        let units = if trick_wins[winner.index()] > 0 {
            projects.units
        } else {
            projects.exempt_units()
        };
        scores[winner.index()] += units;
    }

    let ct = contract_team.index();
    let nc = contract_team.other().index();
    if scores[nc] > scores[ct] {
        let total = mode.total_units();
        let overflow = (scores[0] + scores[1]).saturating_sub(total);
        let mut out = [0, 0];
        out[nc] = total + overflow;
        return out;
    }

    scores
}
