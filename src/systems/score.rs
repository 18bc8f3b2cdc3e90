//! Score accumulation driven entirely by bus events.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use thousands::Separable;
use tracing::debug;

use crate::events::{DotCollected, EventMediator, GhostEaten, PelletCollected, PowerModeEnded, ScoreChanged};

/// Points awarded per scoring event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoringTable {
    pub dot: f64,
    pub power_pellet: f64,
    pub path_pellet: f64,
    /// Points for the first ghost of a streak; each following ghost is worth double the previous.
    pub ghost_base: f64,
}

/// The score accumulator of one game.
///
/// Ghosts eaten during one power mode form a streak worth `base`, `2 * base`,
/// `4 * base` and so on. The streak restarts when power mode ends or a new
/// power pellet is collected.
#[derive(Debug)]
pub struct ScoreSystem {
    bus: Rc<EventMediator>,
    table: ScoringTable,
    score: f64,
    ghost_streak: u32,
}

impl ScoreSystem {
    pub fn new(bus: Rc<EventMediator>, table: ScoringTable) -> Self {
        Self {
            bus,
            table,
            score: 0.0,
            ghost_streak: 0,
        }
    }

    /// Creates a score system and subscribes it to the events that award points.
    ///
    /// Listeners hold a weak reference, so dropping the returned handle
    /// silently detaches the system.
    pub fn attach(bus: &Rc<EventMediator>, table: ScoringTable) -> Rc<RefCell<Self>> {
        let system = Rc::new(RefCell::new(Self::new(Rc::clone(bus), table)));

        let weak = Rc::downgrade(&system);
        bus.register(move |_: &DotCollected| {
            Self::with(&weak, |score| Some(score.table.dot));
        });

        let weak = Rc::downgrade(&system);
        bus.register(move |pellet: &PelletCollected| {
            Self::with(&weak, |score| score.on_pellet(pellet));
        });

        let weak = Rc::downgrade(&system);
        bus.register(move |_: &GhostEaten| {
            Self::with(&weak, |score| Some(score.on_ghost_eaten()));
        });

        let weak = Rc::downgrade(&system);
        bus.register(move |_: &PowerModeEnded| {
            Self::with(&weak, |score| {
                score.ghost_streak = 0;
                None
            });
        });

        system
    }

    /// Applies `update` and publishes the resulting score change, if any,
    /// after the borrow is released so score listeners may read the system.
    fn with(weak: &Weak<RefCell<Self>>, update: impl FnOnce(&mut Self) -> Option<f64>) {
        let Some(system) = weak.upgrade() else {
            return;
        };
        let published = {
            let mut score = system.borrow_mut();
            update(&mut *score).map(|points| (Rc::clone(&score.bus), score.add_points(points)))
        };
        if let Some((bus, changed)) = published {
            bus.notify(changed);
        }
    }

    fn on_pellet(&mut self, pellet: &PelletCollected) -> Option<f64> {
        let mut points = None;
        if pellet.is_power_pellet {
            self.ghost_streak = 0;
            points = Some(self.table.power_pellet);
        }
        if pellet.is_path_pellet {
            points = Some(points.unwrap_or(0.0) + self.table.path_pellet);
        }
        points
    }

    fn on_ghost_eaten(&mut self) -> f64 {
        let points = self.table.ghost_base * 2f64.powi(self.ghost_streak as i32);
        self.ghost_streak += 1;
        points
    }

    /// Adds points directly, returning the change to publish.
    pub fn add_points(&mut self, points: f64) -> ScoreChanged {
        self.score += points;
        debug!(points, score = %self.formatted(), "Score changed");
        ScoreChanged {
            score: self.score,
            points_added: points,
        }
    }

    pub fn score(&self) -> f64 {
        self.score
    }

    pub fn ghost_streak(&self) -> u32 {
        self.ghost_streak
    }

    /// The score with thousands separators, for log lines.
    pub fn formatted(&self) -> String {
        self.score.separate_with_commas()
    }

    /// Clears the score and streak for a new session.
    pub fn reset(&mut self) {
        self.score = 0.0;
        self.ghost_streak = 0;
    }
}
