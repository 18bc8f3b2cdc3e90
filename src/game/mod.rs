//! This module contains the main game logic and state.

use std::cell::{Ref, RefCell};
use std::rc::Rc;
use std::time::Duration;

use rand::rngs::SmallRng;
use rand::SeedableRng;
use tracing::{debug, info, warn};

use crate::asset;
use crate::config::GameConfig;
use crate::entity::ghost::GhostContext;
use crate::entity::player::Player;
use crate::error::{GameError, GameResult};
use crate::events::{EventMediator, GameOver, HighScoreAdded, LevelCompleted, LevelLoaded, ShowHighScores, ShowNameInput};
use crate::formatter;
use crate::input::commands::GameCommand;
use crate::level::{Level, LevelAccessor};
use crate::scores::HighScoreTable;
use crate::systems::collision::CollisionSystem;
use crate::systems::profiling::{SystemId, SystemTimings};
use crate::systems::score::ScoreSystem;

use self::state::{GameState, GameStatus};

pub mod state;
pub mod timers;

/// Where level text comes from.
#[derive(Debug, Clone)]
pub enum LevelSource {
    /// The levels embedded in the binary.
    Embedded,
    /// Levels supplied by the caller, numbered from 1 in order.
    Custom(Vec<String>),
}

impl LevelSource {
    fn exists(&self, number: u32) -> bool {
        match self {
            LevelSource::Embedded => asset::has_level(number),
            LevelSource::Custom(levels) => number >= 1 && (number as usize) <= levels.len(),
        }
    }

    /// The text of a level along with the path it is reported under.
    fn load(&self, number: u32) -> GameResult<(String, String)> {
        match self {
            LevelSource::Embedded => {
                let text = asset::level_text(number)?;
                Ok((text.into_owned(), asset::Asset::Level(number).path()))
            }
            LevelSource::Custom(levels) => levels
                .get((number as usize).wrapping_sub(1))
                .map(|text| (text.clone(), format!("custom/level{number}")))
                .ok_or_else(|| GameError::InvalidState(format!("No custom level {number}"))),
        }
    }
}

/// The `Game` struct owns one complete simulation: the bus, the level, the
/// player, the score and the state machine.
///
/// Everything inside shares a single `Rc` bus and is therefore `!Send`: a game
/// lives and ticks on the thread that created it.
pub struct Game {
    config: GameConfig,
    bus: Rc<EventMediator>,
    state: Rc<RefCell<GameState>>,
    score: Rc<RefCell<ScoreSystem>>,
    levels: LevelSource,
    level: Level,
    player: Player,
    collisions: CollisionSystem,
    high_scores: HighScoreTable,
    rng: SmallRng,
    timings: SystemTimings,
    ticks: u64,
    exit_requested: bool,
}

impl Game {
    /// Creates a game on the embedded levels with its own bus.
    pub fn new(config: GameConfig) -> GameResult<Self> {
        Self::with_bus(Rc::new(EventMediator::new()), config, LevelSource::Embedded)
    }

    /// Creates a game on an existing bus, so listeners registered beforehand
    /// observe the first `LevelLoaded`.
    ///
    /// The starting level is loaded immediately; the game stays in Loading
    /// until [`start`](Self::start) is called.
    pub fn with_bus(bus: Rc<EventMediator>, config: GameConfig, levels: LevelSource) -> GameResult<Self> {
        let state = GameState::attach(&bus, &config);
        let score = ScoreSystem::attach(&bus, config.scoring);
        let collisions = CollisionSystem::new(Rc::clone(&bus), &config);

        let high_scores = match &config.high_score_path {
            Some(path) => HighScoreTable::load(path, config.high_score_capacity)?,
            None => HighScoreTable::new(config.high_score_capacity),
        };

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };

        let (level, path) = Self::build_level(&levels, config.starting_level, &config)?;
        let player = Player::new(
            level.start_position(),
            config.player_radius,
            config.player_speed,
            config.starting_lives,
        );

        let game = Self {
            config,
            bus,
            state,
            score,
            levels,
            level,
            player,
            collisions,
            high_scores,
            rng,
            timings: SystemTimings::default(),
            ticks: 0,
            exit_requested: false,
        };
        game.announce_level(path);
        Ok(game)
    }

    fn build_level(levels: &LevelSource, number: u32, config: &GameConfig) -> GameResult<(Level, String)> {
        let (text, path) = levels.load(number)?;
        let level = Level::build(number, &text, config)?;
        Ok((level, path))
    }

    fn announce_level(&self, path: String) {
        let level = self.level.number();
        info!(level, path = %path, "Level loaded");
        self.bus.notify(LevelLoaded { level, path });
    }

    /// Replaces the current level with level `number`.
    ///
    /// The new level is fully built before anything is swapped, so a failure
    /// leaves the current level, player and state untouched.
    pub fn load_level(&mut self, number: u32) -> GameResult<()> {
        let (level, path) = Self::build_level(&self.levels, number, &self.config)?;
        self.level = level;
        self.player.reset_to(self.level.start_position());
        self.announce_level(path);
        Ok(())
    }

    /// Loading → Playing.
    pub fn start(&mut self) -> bool {
        self.state.borrow_mut().start_game()
    }

    pub fn bus(&self) -> &Rc<EventMediator> {
        &self.bus
    }

    pub fn state(&self) -> Ref<'_, GameState> {
        self.state.borrow()
    }

    pub fn status(&self) -> GameStatus {
        self.state.borrow().status()
    }

    /// Registers the status-change callback. It must not borrow the game state.
    pub fn set_on_status_change(&self, callback: impl FnMut(GameStatus, GameStatus) + 'static) {
        self.state.borrow_mut().set_on_status_change(callback);
    }

    pub fn score(&self) -> f64 {
        self.score.borrow().score()
    }

    pub fn formatted_score(&self) -> String {
        self.score.borrow().formatted()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    pub fn level_mut(&mut self) -> &mut Level {
        &mut self.level
    }

    pub fn player(&self) -> &Player {
        &self.player
    }

    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    pub fn high_scores(&self) -> &HighScoreTable {
        &self.high_scores
    }

    pub fn timings(&self) -> &SystemTimings {
        &self.timings
    }

    pub fn ticks(&self) -> u64 {
        self.ticks
    }

    pub fn exit_requested(&self) -> bool {
        self.exit_requested
    }

    /// Applies one input command.
    pub fn handle_command(&mut self, command: GameCommand) -> GameResult<()> {
        match command {
            GameCommand::MovePlayer(direction) => {
                if self.status() == GameStatus::Playing {
                    self.player.request_direction(direction);
                }
            }
            GameCommand::TogglePause => {
                self.state.borrow_mut().toggle_pause();
            }
            GameCommand::Restart => self.restart()?,
            GameCommand::Exit => {
                info!("Exit requested");
                self.exit_requested = true;
            }
        }
        Ok(())
    }

    /// Runs one simulation tick of `dt`.
    ///
    /// Commands are applied first. The rest of the pipeline only runs while
    /// Playing: player movement, ghost planning and movement, respawns,
    /// collision resolution (whose events settle score and status
    /// synchronously), then level completion or effect timers.
    pub fn tick(&mut self, dt: Duration, commands: &[GameCommand]) -> GameResult<()> {
        let tick_start = std::time::Instant::now();
        let tick = self.ticks + 1;

        for &command in commands {
            self.handle_command(command)?;
        }
        self.timings.add_timing(SystemId::Input, tick_start.elapsed(), tick);

        if self.status() != GameStatus::Playing {
            return Ok(());
        }

        self.ticks = tick;
        formatter::increment_tick();
        let seconds = dt.as_secs_f32();

        let tile_size = self.level.tile_size();
        self.timings.time(SystemId::Player, tick, || {
            self.player.update(seconds, self.level.graph(), tile_size);
        });

        let pacman = self
            .level
            .node_at_pixel(self.player.position)
            .unwrap_or(self.level.start_node());
        let scared = self.state.borrow().ghosts_scared();
        self.timings.time(SystemId::Ghosts, tick, || -> GameResult<()> {
            let (graph, ghosts) = self.level.graph_and_ghosts_mut();
            let ctx = GhostContext {
                graph,
                tile_size,
                pacman,
                scared,
                recompute_interval: self.config.recompute_interval,
                scared_speed_factor: self.config.scared_speed_factor,
            };
            for ghost in ghosts {
                ghost.update(&ctx, seconds, &mut self.rng)?;
            }
            Ok(())
        })?;

        self.timings.time(SystemId::Respawn, tick, || self.level.tick_respawns(dt));

        let state = Rc::clone(&self.state);
        let report = self.timings.time(SystemId::Collision, tick, || {
            self.collisions.resolve(
                &mut self.player,
                &mut self.level,
                || state.borrow().ghosts_scared(),
                &mut self.rng,
            )
        })?;
        if report.dots + report.pellets + report.ghosts_eaten > 0 || report.player_died {
            debug!(?report, "Collisions resolved");
        }

        if self.status() == GameStatus::GameOver {
            let score = self.score();
            info!(score = %self.formatted_score(), "Game over");
            self.bus.notify(GameOver { score });
        } else if self.level.is_complete() {
            self.complete_level()?;
        } else {
            self.timings.time(SystemId::Effects, tick, || self.state.borrow_mut().tick(dt));
        }

        self.timings.add_timing(SystemId::Total, tick_start.elapsed(), tick);
        Ok(())
    }

    fn complete_level(&mut self) -> GameResult<()> {
        let level = self.level.number();
        let score = self.score();
        info!(level, score = %self.formatted_score(), "Level completed");
        self.bus.notify(LevelCompleted { score, level });

        let next = level + 1;
        if self.levels.exists(next) {
            self.state.borrow_mut().next_level();
            self.load_level(next)
        } else {
            self.state.borrow_mut().win_game();
            Ok(())
        }
    }

    /// Moves on from GameOver or Victory: to name input if the score makes the
    /// high-score table, straight to the table otherwise.
    pub fn proceed(&mut self) -> GameStatus {
        let score = self.score();
        let status = self.status();
        if !matches!(status, GameStatus::GameOver | GameStatus::Victory) {
            warn!(status = status.as_ref(), "Nothing to proceed to");
            return status;
        }

        if self.high_scores.qualifies(score) {
            if self.state.borrow_mut().show_name_input() {
                self.bus.notify(ShowNameInput { score });
            }
        } else if self.state.borrow_mut().show_high_scores() {
            self.bus.notify(ShowHighScores);
        }
        self.status()
    }

    /// Records the current score under `name` and shows the table.
    ///
    /// # Errors
    ///
    /// Fails outside of name input, for an empty name, or when the table
    /// cannot be persisted. The entry stays in memory when saving fails.
    pub fn submit_name(&mut self, name: &str) -> GameResult<Option<usize>> {
        if self.status() != GameStatus::NameInput {
            return Err(GameError::InvalidState(format!(
                "Cannot submit a name while {}",
                self.status().as_ref()
            )));
        }

        let score = self.score();
        let level = self.state.borrow().level();
        let rank = self.high_scores.add(name, score, level)?;
        if rank.is_some() {
            self.bus.notify(HighScoreAdded {
                name: HighScoreTable::normalize_name(name)?,
                score,
            });
        }

        if self.state.borrow_mut().show_high_scores() {
            self.bus.notify(ShowHighScores);
        }

        if let Some(path) = &self.config.high_score_path {
            self.high_scores.save(path)?;
        }
        Ok(rank)
    }

    /// Starts a fresh session: back through Loading, the starting level is
    /// reloaded, score and lives are restored, then play resumes.
    pub fn restart(&mut self) -> GameResult<()> {
        let starting_level = self.config.starting_level;
        let (level, path) = Self::build_level(&self.levels, starting_level, &self.config)?;

        self.state.borrow_mut().reset();
        self.score.borrow_mut().reset();
        self.level = level;
        self.player = Player::new(
            self.level.start_position(),
            self.config.player_radius,
            self.config.player_speed,
            self.config.starting_lives,
        );
        self.announce_level(path);
        self.start();
        Ok(())
    }
}
