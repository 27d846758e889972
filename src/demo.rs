//! Demo driver.
//!
//! Plays full rounds against the rules core with a seeded random agent
//! policy, then verifies that replaying the recorded log reproduces the live
//! state. The random choices here are agent policy, not game rules: the core
//! only sees already-chosen actions.

use anyhow::{ensure, Context, Result};
use itertools::Itertools;
use log::{debug, info};
use rand::prelude::*;

use crate::args::Args;
use crate::baloot::{
    compute_projects, playing_initial, replay, settle_cards, settle_with_projects, Action,
    ActionData, ActionType, BidKind, BidOutcome, BidState, BiddingInitial, Contract, Deck,
    InitialSnapshot, Meta, Mode, Recorder, SaveGame, Seat, Suit,
};

pub fn run(args: &Args) -> Result<()> {
    let seed = args.seed.unwrap_or_else(rand::random);
    info!("agent policy seed: {seed}");
    let mut rng = StdRng::seed_from_u64(seed);
    let mut dealer: Seat = rng.gen();
    for number in 0..args.rounds {
        dealer = play_round(args, &mut rng, dealer, number, seed)?;
    }
    Ok(())
}

/// Plays one round (redealing as needed) and returns the next dealer.
fn play_round(
    args: &Args,
    rng: &mut StdRng,
    mut dealer: Seat,
    number: u32,
    seed: u64,
) -> Result<Seat> {
    let meta: Meta = [
        ("rng_seed".to_string(), serde_json::json!(seed)),
        ("round".to_string(), serde_json::json!(number)),
    ]
    .into();

    // Bid until a contract lands; a double all-pass redeals with the dealer
    // advanced.
    let (bidding, save, contract) = loop {
        let deck: Deck = rng.gen();
        let bidding = BiddingInitial::deal(dealer, deck)?;
        let mut save =
            SaveGame::new(InitialSnapshot::from(bidding.clone()).with_meta(meta.clone()));
        match run_bidding(rng, &bidding, &mut save)? {
            BidOutcome::Redeal { next_dealer } => {
                info!("round {number}: no claim from either side, redealing");
                dealer = next_dealer;
            }
            BidOutcome::Contract(contract) => break (bidding, save, contract),
        }
    };

    let trump = contract
        .trump
        .map(|t| t.to_symbol().to_string())
        .unwrap_or_default();
    info!(
        "round {number}: {} wins the {} bid, {} {trump}",
        contract.winning_bidder, contract.bid_kind, contract.mode,
    );

    let initial = playing_initial(&bidding, &contract)?;
    for seat in Seat::all_seats() {
        info!(
            "  {seat}: {}",
            initial.hands[seat.index() as usize]
                .iter()
                .map(|c| c.to_ansi_string().to_string())
                .join(" ")
        );
    }

    let mut recorder = Recorder::new(save, &initial);
    while !recorder.is_finished() {
        let legal = recorder.legal_moves();
        let card = *legal.choose(rng).expect("a turn always has a legal card");
        debug!("trick {}: {} plays {card}", recorder.trick_number(), recorder.to_play());
        recorder.play(card)?;
    }

    let card_points = recorder.card_points();
    let trick_wins = recorder.trick_wins();
    let contract_team = contract.winning_bidder.team();
    let projects = compute_projects(&initial.hands, contract.mode, contract.trump, initial.leader);
    if let Some(winner) = projects.winner {
        info!(
            "  projects: {winner} scores {} ({})",
            projects.units,
            projects.melds.iter().map(|m| format!("{:?}", m.kind)).join(", "),
        );
    }
    let base = settle_cards(card_points, contract_team, contract.mode);
    let scores = settle_with_projects(base, contract.mode, contract_team, &projects, trick_wins);
    info!(
        "  card points {}:{}, tricks {}:{}, score {}:{}",
        card_points[0], card_points[1], trick_wins[0], trick_wins[1], scores[0], scores[1],
    );

    // The record must reproduce the live round exactly.
    let live = recorder.state().clone();
    let save = recorder.into_save();
    let replayed = replay(&save)?
        .round()
        .context("a contract round cannot replay to a redeal")?;
    ensure!(replayed.state == live, "replay diverged from the live round");
    debug!("replay verified against the live round");

    if let Some(dir) = &args.save {
        std::fs::create_dir_all(dir)
            .with_context(|| format!("creating save directory {}", dir.display()))?;
        let path = dir.join(format!("round_{number}_{seed}.json"));
        std::fs::write(&path, save.to_json()?)
            .with_context(|| format!("writing {}", path.display()))?;
        info!("  saved record to {}", path.display());
    }

    Ok(dealer.next())
}

/// Drives the bidding machine with uniformly random (but always legal)
/// choices, appending each action to the record.
fn run_bidding(
    rng: &mut StdRng,
    bidding: &BiddingInitial,
    save: &mut SaveGame,
) -> Result<BidOutcome> {
    let mut bid = BidState::from(bidding);
    let mut thani = false;
    loop {
        if let Some(outcome) = bid.outcome() {
            return Ok(outcome);
        }
        let (seat, kinds) = bid.expected().expect("bidding is not settled");
        let data = match *kinds.choose(rng).expect("at least one action is open") {
            ActionType::Pass => ActionData::Pass,
            ActionType::BidSun => ActionData::BidSun,
            ActionType::BidAshkal => ActionData::BidAshkal,
            ActionType::BidHokm => ActionData::BidHokm,
            ActionType::BidHokmThani => {
                thani = true;
                ActionData::BidHokmThani
            }
            ActionType::Raise => ActionData::Raise {
                bid_kind: if bid.ashkal_eligible(seat) && rng.gen() {
                    BidKind::Ashkal
                } else {
                    BidKind::Sun
                },
            },
            ActionType::FinalizeContract => {
                let contract = match bid.pending_contract() {
                    Some(contract) => *contract,
                    // The unchallenged hokm claimant sticks with hokm; in
                    // the second round the trump is any non-floor suit.
                    None => hokm_choice(rng, bidding, seat, thani),
                };
                ActionData::finalize(&contract)
            }
            ActionType::PlayCard => unreachable!("bidding never expects a card"),
        };
        let action = Action::new(seat, data);
        bid = bid.apply(&action)?;
        *save = save.append(action);
    }
}

fn hokm_choice(rng: &mut StdRng, bidding: &BiddingInitial, claimant: Seat, thani: bool) -> Contract {
    let floor_suit = bidding.floor_card.suit;
    let (bid_kind, trump) = if thani {
        let trump = *Suit::all_suits()
            .iter()
            .filter(|&&suit| suit != floor_suit)
            .choose(rng)
            .expect("three suits remain");
        (BidKind::HokmThani, trump)
    } else {
        (BidKind::Hokm, floor_suit)
    };
    Contract {
        mode: Mode::Hokm,
        trump: Some(trump),
        winning_bidder: claimant,
        floor_taker: claimant,
        bid_kind,
    }
}
