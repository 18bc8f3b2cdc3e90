//! The game status state machine and its timed effects.

use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use strum_macros::{AsRefStr, EnumIter};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::events::{EventMediator, GamePaused, GameResumed, PacmanDied, PelletCollected, PowerModeEnded};

use super::timers::{EffectTimers, Effects};

/// The high-level status of a game session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, AsRefStr, EnumIter)]
pub enum GameStatus {
    #[default]
    Loading,
    Playing,
    Paused,
    GameOver,
    Victory,
    NameInput,
    HighScores,
}

type StatusCallback = Box<dyn FnMut(GameStatus, GameStatus)>;

/// Owns the game status, the level counter and the effect timers.
///
/// The status only changes through the named intents below. Every intent
/// that actually changes the status calls the status-change callback exactly
/// once; intents that are not valid from the current status do nothing.
///
/// Events published here (`GamePaused`, `GameResumed`, `PowerModeEnded`) are
/// dispatched while the state is still being mutated, so their listeners must
/// not borrow the state back. The same holds for the status-change callback.
pub struct GameState {
    bus: Rc<EventMediator>,
    status: GameStatus,
    level: u32,
    starting_level: u32,
    timers: EffectTimers,
    power_duration: Duration,
    path_duration: Duration,
    on_status_change: Option<StatusCallback>,
}

impl GameState {
    pub fn new(bus: Rc<EventMediator>, config: &GameConfig) -> Self {
        Self {
            bus,
            status: GameStatus::Loading,
            level: config.starting_level,
            starting_level: config.starting_level,
            timers: EffectTimers::default(),
            power_duration: config.power_duration,
            path_duration: config.path_duration,
            on_status_change: None,
        }
    }

    /// Creates a game state subscribed to the events that drive it: pellets
    /// arm their effect timers and a final death ends the game.
    pub fn attach(bus: &Rc<EventMediator>, config: &GameConfig) -> Rc<RefCell<Self>> {
        let state = Rc::new(RefCell::new(Self::new(Rc::clone(bus), config)));

        let weak = Rc::downgrade(&state);
        bus.register(move |pellet: &PelletCollected| {
            if let Some(state) = weak.upgrade() {
                state.borrow_mut().on_pellet(pellet);
            }
        });

        let weak = Rc::downgrade(&state);
        bus.register(move |died: &PacmanDied| {
            if let (true, Some(state)) = (died.game_over, weak.upgrade()) {
                state.borrow_mut().end_game();
            }
        });

        state
    }

    fn on_pellet(&mut self, pellet: &PelletCollected) {
        if pellet.is_power_pellet {
            self.set_ghosts_scared(pellet.duration.unwrap_or(self.power_duration));
        }
        if pellet.is_path_pellet {
            self.set_show_path(pellet.duration.unwrap_or(self.path_duration));
        }
    }

    /// Registers the callback invoked as `(old, new)` on every status change,
    /// replacing any previous one.
    pub fn set_on_status_change(&mut self, callback: impl FnMut(GameStatus, GameStatus) + 'static) {
        self.on_status_change = Some(Box::new(callback));
    }

    pub fn status(&self) -> GameStatus {
        self.status
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    fn transition(&mut self, to: GameStatus) -> bool {
        let from = self.status;
        if from == to {
            return false;
        }

        self.status = to;
        info!(from = from.as_ref(), to = to.as_ref(), "Game status changed");
        if let Some(callback) = self.on_status_change.as_mut() {
            callback(from, to);
        }
        true
    }

    fn transition_from(&mut self, allowed: &[GameStatus], to: GameStatus) -> bool {
        if !allowed.contains(&self.status) {
            debug!(status = self.status.as_ref(), to = to.as_ref(), "Ignoring invalid transition");
            return false;
        }
        self.transition(to)
    }

    /// Loading → Playing.
    pub fn start_game(&mut self) -> bool {
        self.transition_from(&[GameStatus::Loading], GameStatus::Playing)
    }

    /// Playing → Paused.
    pub fn pause_game(&mut self) -> bool {
        let paused = self.transition_from(&[GameStatus::Playing], GameStatus::Paused);
        if paused {
            self.bus.notify(GamePaused);
        }
        paused
    }

    /// Paused → Playing.
    pub fn resume_game(&mut self) -> bool {
        let resumed = self.transition_from(&[GameStatus::Paused], GameStatus::Playing);
        if resumed {
            self.bus.notify(GameResumed);
        }
        resumed
    }

    /// Pauses from Playing or resumes from Paused.
    ///
    /// Returns true only when the game is now paused. From any other status it
    /// does nothing and returns false.
    pub fn toggle_pause(&mut self) -> bool {
        match self.status {
            GameStatus::Playing => self.pause_game(),
            GameStatus::Paused => {
                self.resume_game();
                false
            }
            _ => false,
        }
    }

    /// Forces the game over from any status and stops every effect.
    pub fn end_game(&mut self) -> bool {
        self.timers.clear();
        self.transition(GameStatus::GameOver)
    }

    /// Playing → Victory, stopping every effect.
    pub fn win_game(&mut self) -> bool {
        let won = self.transition_from(&[GameStatus::Playing], GameStatus::Victory);
        if won {
            self.timers.clear();
        }
        won
    }

    /// GameOver or Victory → NameInput.
    pub fn show_name_input(&mut self) -> bool {
        self.transition_from(&[GameStatus::GameOver, GameStatus::Victory], GameStatus::NameInput)
    }

    /// NameInput → HighScores. Also reachable straight from GameOver or
    /// Victory when the score does not make the table.
    pub fn show_high_scores(&mut self) -> bool {
        self.transition_from(
            &[GameStatus::NameInput, GameStatus::GameOver, GameStatus::Victory],
            GameStatus::HighScores,
        )
    }

    /// Returns to Loading for a new session at the starting level.
    pub fn reset(&mut self) -> bool {
        self.timers.clear();
        self.level = self.starting_level;
        self.transition(GameStatus::Loading)
    }

    /// Advances the level counter and stops every effect.
    pub fn next_level(&mut self) -> u32 {
        self.timers.clear();
        self.level += 1;
        info!(level = self.level, "Advancing to next level");
        self.level
    }

    /// Scares the ghosts for `duration`, replacing any running scare.
    pub fn set_ghosts_scared(&mut self, duration: Duration) {
        debug!(duration_ms = duration.as_millis() as u64, "Ghosts scared");
        self.timers.arm(Effects::SCARED, duration);
    }

    /// Reveals ghost paths for `duration`, replacing any running reveal.
    pub fn set_show_path(&mut self, duration: Duration) {
        debug!(duration_ms = duration.as_millis() as u64, "Ghost paths revealed");
        self.timers.arm(Effects::SHOW_PATH, duration);
    }

    pub fn ghosts_scared(&self) -> bool {
        self.timers.active().contains(Effects::SCARED)
    }

    pub fn show_path(&self) -> bool {
        self.timers.active().contains(Effects::SHOW_PATH)
    }

    pub fn effects(&self) -> Effects {
        self.timers.active()
    }

    pub fn timers(&self) -> &EffectTimers {
        &self.timers
    }

    /// Advances the effect timers by `dt`, returning what expired.
    ///
    /// Scared-mode expiry publishes `PowerModeEnded`.
    pub fn tick(&mut self, dt: Duration) -> Effects {
        let expired = self.timers.advance(dt);
        if expired.contains(Effects::SHOW_PATH) {
            debug!("Path reveal ended");
        }
        if expired.contains(Effects::SCARED) {
            debug!("Power mode ended");
            self.bus.notify(PowerModeEnded);
        }
        expired
    }
}

impl std::fmt::Debug for GameState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GameState")
            .field("status", &self.status)
            .field("level", &self.level)
            .field("timers", &self.timers)
            .finish_non_exhaustive()
    }
}
