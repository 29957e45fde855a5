//! Target Range entry point
//!
//! Headless runner: loads settings, plays one session on autopilot in
//! simulated time, saves the result and prints the leaderboard.

use std::path::Path;

use target_range::autopilot::Autopilot;
use target_range::consts::*;
use target_range::persistence::JsonScoreStore;
use target_range::{Game, Settings};

const SETTINGS_PATH: &str = "settings.json";

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    log::info!("Target Range (headless) starting...");

    let settings = Settings::load(Path::new(SETTINGS_PATH));
    let store = JsonScoreStore::new(settings.scores_path.clone());
    log::info!("Score table: {}", store.path().display());
    let mut game = match Game::new(settings, store) {
        Ok(game) => game,
        Err(e) => {
            log::error!("Failed to open score table: {}", e);
            std::process::exit(1);
        }
    };

    log::info!("Autopilot playing seed {}", game.seed());
    let mut pilot = Autopilot::new(0.75);
    game.on_start_game();

    // One tick past the full clock is enough to reach game over
    let max_ticks = (GAME_TIME as u32 + 1) * TICK_RATE;
    for _ in 0..max_ticks {
        pilot.drive(&mut game, SIM_DT);
        if let Err(e) = game.fixed_tick() {
            log::error!("Failed to save score: {}", e);
        }
        if game.session.is_over() {
            break;
        }
    }

    let s = &game.session;
    println!(
        "Final score: {} | shots {} | hits {} | accuracy {:.2}",
        s.score,
        s.shots,
        s.hits,
        s.accuracy()
    );
    println!("\n{}", game.high_scores().render());
}
