use std::cell::RefCell;
use std::rc::Rc;
use std::time::Duration;

use maze_chase::config::GameConfig;
use maze_chase::events::{EventKind, EventMediator, PacmanDied, PelletCollected};
use maze_chase::game::state::{GameState, GameStatus};
use maze_chase::game::timers::Effects;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

fn playing() -> (Rc<EventMediator>, Rc<RefCell<GameState>>) {
    let bus = Rc::new(EventMediator::new());
    let state = GameState::attach(&bus, &GameConfig::default());
    assert_that(&state.borrow_mut().start_game()).is_true();
    (bus, state)
}

#[test]
fn test_toggle_pause_reports_paused() {
    let (bus, state) = playing();
    let log = common::record_all(&bus);

    assert_that(&state.borrow_mut().toggle_pause()).is_true();
    assert_that(&state.borrow().status()).is_equal_to(GameStatus::Paused);

    assert_that(&state.borrow_mut().toggle_pause()).is_false();
    assert_that(&state.borrow().status()).is_equal_to(GameStatus::Playing);

    assert_eq!(common::kinds(&log), vec![EventKind::GamePaused, EventKind::GameResumed]);
}

#[test]
fn test_toggle_pause_outside_play_does_nothing() {
    let bus = Rc::new(EventMediator::new());
    let mut state = GameState::new(Rc::clone(&bus), &GameConfig::default());
    let log = common::record_all(&bus);

    assert_that(&state.toggle_pause()).is_false();
    assert_that(&state.status()).is_equal_to(GameStatus::Loading);
    assert_that(&log.borrow().is_empty()).is_true();
}

#[test]
fn test_end_game_cancels_armed_timers() {
    let (bus, state) = playing();
    let log = common::record_all(&bus);

    state.borrow_mut().set_ghosts_scared(Duration::from_millis(100));
    assert_that(&state.borrow().ghosts_scared()).is_true();

    assert_that(&state.borrow_mut().end_game()).is_true();
    assert_that(&state.borrow().effects()).is_equal_to(Effects::empty());

    let expired = state.borrow_mut().tick(Duration::from_secs(1));
    assert_that(&expired).is_equal_to(Effects::empty());
    assert_that(&common::kinds(&log).contains(&EventKind::PowerModeEnded)).is_false();
}

#[test]
fn test_end_game_is_forced_from_any_status() {
    let bus = Rc::new(EventMediator::new());
    let mut state = GameState::new(bus, &GameConfig::default());

    assert_that(&state.end_game()).is_true();
    assert_that(&state.status()).is_equal_to(GameStatus::GameOver);
    assert_that(&state.end_game()).is_false();
}

#[test]
fn test_power_pellet_arms_scared_timer() {
    let (bus, state) = playing();
    bus.notify(PelletCollected {
        is_power_pellet: true,
        is_path_pellet: false,
        duration: Some(Duration::from_millis(50)),
    });

    assert_that(&state.borrow().ghosts_scared()).is_true();
    assert_that(&state.borrow().show_path()).is_false();
    assert_that(&state.borrow().timers().remaining(Effects::SCARED)).is_equal_to(Some(Duration::from_millis(50)));
}

#[test]
fn test_path_pellet_uses_default_duration() {
    let (bus, state) = playing();
    bus.notify(PelletCollected {
        is_power_pellet: false,
        is_path_pellet: true,
        duration: None,
    });

    assert_that(&state.borrow().show_path()).is_true();
    assert_that(&state.borrow().timers().remaining(Effects::SHOW_PATH))
        .is_equal_to(Some(GameConfig::default().path_duration));
}

#[test]
fn test_scared_expiry_publishes_power_mode_ended_once() {
    let (bus, state) = playing();
    let log = common::record_all(&bus);
    state.borrow_mut().set_ghosts_scared(Duration::from_millis(100));

    assert_that(&state.borrow_mut().tick(Duration::from_millis(60))).is_equal_to(Effects::empty());
    assert_that(&state.borrow_mut().tick(Duration::from_millis(60))).is_equal_to(Effects::SCARED);
    assert_that(&state.borrow_mut().tick(Duration::from_millis(60))).is_equal_to(Effects::empty());

    assert_eq!(common::kinds(&log), vec![EventKind::PowerModeEnded]);
}

#[test]
fn test_rearming_extends_the_effect() {
    let (_bus, state) = playing();
    state.borrow_mut().set_ghosts_scared(Duration::from_millis(100));
    state.borrow_mut().tick(Duration::from_millis(80));
    state.borrow_mut().set_ghosts_scared(Duration::from_millis(100));

    assert_that(&state.borrow_mut().tick(Duration::from_millis(80))).is_equal_to(Effects::empty());
    assert_that(&state.borrow().ghosts_scared()).is_true();
}

#[test]
fn test_final_death_ends_game() {
    let (bus, state) = playing();

    bus.notify(PacmanDied { game_over: false });
    assert_that(&state.borrow().status()).is_equal_to(GameStatus::Playing);

    bus.notify(PacmanDied { game_over: true });
    assert_that(&state.borrow().status()).is_equal_to(GameStatus::GameOver);
}

#[test]
fn test_session_flow_after_victory() {
    let (_bus, state) = playing();
    let transitions = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&transitions);
    state
        .borrow_mut()
        .set_on_status_change(move |from, to| sink.borrow_mut().push((from, to)));

    let mut state = state.borrow_mut();
    assert_that(&state.win_game()).is_true();
    assert_that(&state.show_name_input()).is_true();
    assert_that(&state.show_name_input()).is_false();
    assert_that(&state.show_high_scores()).is_true();
    assert_that(&state.reset()).is_true();

    assert_eq!(
        *transitions.borrow(),
        vec![
            (GameStatus::Playing, GameStatus::Victory),
            (GameStatus::Victory, GameStatus::NameInput),
            (GameStatus::NameInput, GameStatus::HighScores),
            (GameStatus::HighScores, GameStatus::Loading),
        ]
    );
}

#[test]
fn test_next_level_clears_timers() {
    let (_bus, state) = playing();
    let mut state = state.borrow_mut();
    state.set_show_path(Duration::from_secs(5));

    assert_that(&state.next_level()).is_equal_to(2);
    assert_that(&state.show_path()).is_false();

    state.reset();
    assert_that(&state.level()).is_equal_to(1);
}
