use std::fs;

use anyhow::{Context, Result, bail};
use genesis_2048_core::{GameConfig, GameOverRule, Variant};

use crate::args::Args;

/// Builds the game config: preset, then the TOML file, then flags.
pub fn load(args: &Args) -> Result<GameConfig> {
    let preset = Variant::from(args.variant).config();

    let mut config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("Failed to read config {}", path.display()))?;
            merge_toml(preset, &text)
                .with_context(|| format!("Invalid config {}", path.display()))?
        }
        None => preset,
    };

    if let Some(rows) = args.rows {
        config.size.0 = rows;
    }
    if let Some(cols) = args.cols {
        config.size.1 = cols;
    }
    if args.strict_game_over {
        config.game_over_rule = GameOverRule::NoMovesLeft;
    }

    config.validate()?;
    log::debug!("Using config {:?}", config);
    Ok(config)
}

/// Overlays the top-level keys of a TOML document on `base`.
pub fn merge_toml(base: GameConfig, text: &str) -> Result<GameConfig> {
    let overrides: toml::Table = toml::from_str(text)?;

    let toml::Value::Table(mut merged) = toml::Value::try_from(base)? else {
        bail!("Config did not serialize to a table");
    };
    for (key, value) in overrides {
        if !merged.contains_key(&key) {
            log::warn!("Ignoring unknown config key {:?}", key);
            continue;
        }
        merged.insert(key, value);
    }

    Ok(toml::Value::Table(merged).try_into()?)
}
