use std::cell::Cell;
use std::rc::Rc;
use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::info;

use crate::config::GameConfig;
use crate::constants::LOOP_TIME;
use crate::game::state::GameStatus;
use crate::game::Game;
use crate::input::Autopilot;

/// How often the loop logs a progress line.
const REPORT_INTERVAL: Duration = Duration::from_secs(5);
/// The name the autopilot signs high scores with.
const AUTOPILOT_NAME: &str = "AUTO";

/// A headless fixed-timestep loop driving one game with the autopilot.
pub struct App {
    game: Game,
    autopilot: Autopilot,
    max_ticks: Option<u64>,
    finished: Rc<Cell<bool>>,
    last_report: Instant,
}

impl App {
    pub fn new(config: GameConfig, max_ticks: Option<u64>) -> Result<Self> {
        let mut game = Game::new(config)?;

        let finished = Rc::new(Cell::new(false));
        let flag = Rc::clone(&finished);
        game.set_on_status_change(move |_, to| {
            if to == GameStatus::HighScores {
                flag.set(true);
            }
        });
        game.start();

        Ok(Self {
            game,
            autopilot: Autopilot::new(),
            max_ticks,
            finished,
            last_report: Instant::now(),
        })
    }

    pub fn game(&self) -> &Game {
        &self.game
    }

    /// Runs one frame, sleeping off whatever is left of the frame time.
    ///
    /// Returns false once the session is over or the tick limit is reached.
    pub fn run(&mut self) -> Result<bool> {
        let start = Instant::now();

        match self.game.status() {
            GameStatus::Playing => {
                let commands: Vec<_> = self
                    .autopilot
                    .command(self.game.player(), self.game.level())
                    .into_iter()
                    .collect();
                self.game.tick(LOOP_TIME, &commands)?;
            }
            GameStatus::GameOver | GameStatus::Victory => {
                self.game.proceed();
            }
            GameStatus::NameInput => {
                self.game.submit_name(AUTOPILOT_NAME)?;
            }
            GameStatus::Loading => {
                self.game.start();
            }
            GameStatus::Paused | GameStatus::HighScores => {}
        }

        if self.last_report.elapsed() >= REPORT_INTERVAL {
            self.last_report = Instant::now();
            info!(
                tick = self.game.ticks(),
                level = self.game.level().number(),
                score = %self.game.formatted_score(),
                timings = %self.game.timings().summary(),
                "Progress"
            );
        }

        if self.finished.get() || self.game.exit_requested() {
            return Ok(false);
        }
        if self.max_ticks.is_some_and(|limit| self.game.ticks() >= limit) {
            info!(limit = self.max_ticks, "Tick limit reached");
            return Ok(false);
        }

        if let Some(remaining) = LOOP_TIME.checked_sub(start.elapsed()) {
            spin_sleep::sleep(remaining);
        }
        Ok(true)
    }
}
