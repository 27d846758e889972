use clap::Parser;
use env_logger::Env;

mod args;
mod baloot;
mod deck;
mod demo;
mod french;
use self::args::Args;

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();
    demo::run(&args)
}
