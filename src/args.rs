//! Command line arguments

use std::path::PathBuf;

use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Seed for the demo's random agent policy. Random if omitted.
    #[arg(short, long)]
    pub seed: Option<u64>,

    /// Number of rounds to play.
    #[arg(short, long, default_value_t = 1)]
    pub rounds: u32,

    /// Directory to write finished round records into, as JSON.
    #[arg(long)]
    pub save: Option<PathBuf>,
}
