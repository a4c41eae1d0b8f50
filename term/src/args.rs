use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use genesis_2048_core::Variant;

#[derive(Parser, Debug)]
#[command(version, about = "Tile-merging puzzle with single-step pushes, played in the terminal")]
pub struct Args {
    /// Board preset
    #[arg(long, value_enum, default_value_t = VariantArg::Text)]
    pub variant: VariantArg,

    /// TOML file overriding fields of the preset
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long)]
    pub rows: Option<u8>,

    #[arg(long)]
    pub cols: Option<u8>,

    /// Seed for tile placement and demo moves, random when omitted
    #[arg(long)]
    pub seed: Option<u64>,

    /// Start with demo mode on
    #[arg(long)]
    pub demo: bool,

    /// Display frames per second
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u16).range(1..))]
    pub fps: u16,

    /// Only end the game when no move can change the board
    #[arg(long)]
    pub strict_game_over: bool,

    /// Play demo mode without a terminal UI and print the final board
    #[arg(long)]
    pub headless: bool,

    /// Frame limit for headless runs
    #[arg(long, default_value_t = 1_000_000)]
    pub max_frames: u64,

    /// Print the headless report as JSON
    #[arg(long)]
    pub json: bool,

    #[command(flatten)]
    pub verbose: Verbosity<WarnLevel>,
}

#[derive(ValueEnum, Copy, Clone, Debug, PartialEq, Eq)]
pub enum VariantArg {
    Text,
    Sprite,
    Smooth,
}

impl From<VariantArg> for Variant {
    fn from(arg: VariantArg) -> Self {
        match arg {
            VariantArg::Text => Variant::Text,
            VariantArg::Sprite => Variant::Sprite,
            VariantArg::Smooth => Variant::SmoothSprite,
        }
    }
}
