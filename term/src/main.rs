use anyhow::Result;
use clap::Parser;

use args::Args;

mod args;
mod config;
mod keys;
mod render;
mod session;

fn main() -> Result<()> {
    let args = Args::parse();

    env_logger::Builder::new()
        .filter_level(args.verbose.log_level_filter())
        .init();

    let config = config::load(&args)?;
    let seed = args.seed.unwrap_or_else(rand::random);
    log::info!(
        "Starting {}x{} board with seed {}",
        config.size.0,
        config.size.1,
        seed
    );

    if args.headless {
        session::run_headless(config, seed, args.max_frames, args.json)
    } else {
        session::run_interactive(config, seed, args.fps, args.demo)
    }
}
