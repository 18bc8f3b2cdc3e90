#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use maze_chase::config::GameConfig;
use maze_chase::events::{EventKind, EventMediator, GameEvent};
use rand::rngs::SmallRng;
use rand::SeedableRng;
use strum::IntoEnumIterator;

/// The 5x5 level used across the suite: start at (1,1), one chaser at (3,3).
pub const SCENARIO: [&str; 5] = ["#####", "#S..#", "#.#.#", "#..G#", "#####"];

pub fn scenario_text() -> String {
    SCENARIO.join("\n")
}

pub fn config() -> GameConfig {
    GameConfig {
        seed: Some(7),
        ..GameConfig::default()
    }
}

pub fn rng() -> SmallRng {
    SmallRng::seed_from_u64(42)
}

/// Records every event published on a bus, in dispatch order.
pub fn record_all(bus: &EventMediator) -> Rc<RefCell<Vec<GameEvent>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for kind in EventKind::iter() {
        let log = Rc::clone(&log);
        bus.register_kind(kind, move |event| log.borrow_mut().push(event.clone()));
    }
    log
}

pub fn kinds(log: &Rc<RefCell<Vec<GameEvent>>>) -> Vec<EventKind> {
    log.borrow().iter().map(GameEvent::kind).collect()
}
