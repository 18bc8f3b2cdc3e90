use std::env;

use anyhow::{Context, Result};
use tracing::info;

use maze_chase::app::App;
use maze_chase::config::GameConfig;
use maze_chase::logging::setup_logging;

/// Runs a headless session driven by the autopilot.
///
/// An optional first argument caps the number of simulation ticks.
pub fn main() -> Result<()> {
    setup_logging();

    let max_ticks = env::args()
        .nth(1)
        .map(|raw| raw.parse::<u64>())
        .transpose()
        .context("The tick limit must be a non-negative integer")?;

    let config = GameConfig::from_env();
    info!(seed = ?config.seed, max_ticks, "Starting headless session");

    let mut app = App::new(config, max_ticks)?;
    while app.run()? {}

    let game = app.game();
    info!(
        ticks = game.ticks(),
        level = game.level().number(),
        score = %game.formatted_score(),
        status = game.status().as_ref(),
        "Session finished"
    );
    Ok(())
}
