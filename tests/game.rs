use std::rc::Rc;
use std::time::Duration;

use maze_chase::config::GameConfig;
use maze_chase::error::GameError;
use maze_chase::events::{EventKind, EventMediator, GameEvent, HighScoreAdded, LevelCompleted, LevelLoaded};
use maze_chase::game::state::GameStatus;
use maze_chase::game::{Game, LevelSource};
use maze_chase::input::commands::GameCommand;
use maze_chase::level::LevelAccessor;
use maze_chase::map::direction::Direction;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

const FRAME: Duration = Duration::from_nanos(16_666_667);

/// One dot directly to the right of the start.
const ONE_DOT: &str = "#####\n#S. #\n#####";
/// A chaser right next to the start, with dots out of reach.
const AMBUSH: &str = "######\n#SG..#\n######";

fn custom(levels: &[&str], config: GameConfig) -> (Game, Rc<std::cell::RefCell<Vec<GameEvent>>>) {
    let bus = Rc::new(EventMediator::new());
    let log = common::record_all(&bus);
    let levels = LevelSource::Custom(levels.iter().map(|level| level.to_string()).collect());
    let game = Game::with_bus(bus, config, levels).unwrap();
    (game, log)
}

/// Ticks until `done` holds, returning the number of ticks taken.
fn run_until(game: &mut Game, limit: usize, commands: &[GameCommand], done: impl Fn(&Game) -> bool) -> Option<usize> {
    for tick in 0..limit {
        let commands = if tick == 0 { commands } else { &[] };
        game.tick(FRAME, commands).unwrap();
        if done(game) {
            return Some(tick + 1);
        }
    }
    None
}

fn count(log: &Rc<std::cell::RefCell<Vec<GameEvent>>>, kind: EventKind) -> usize {
    common::kinds(log).into_iter().filter(|&seen| seen == kind).count()
}

#[test]
fn test_construction_announces_level_and_waits() {
    let (game, log) = custom(&[ONE_DOT], common::config());

    assert_that(&game.status()).is_equal_to(GameStatus::Loading);
    assert_eq!(
        *log.borrow(),
        vec![GameEvent::from(LevelLoaded {
            level: 1,
            path: "custom/level1".into()
        })]
    );
}

#[test]
fn test_ticks_do_nothing_before_start() {
    let (mut game, _log) = custom(&[ONE_DOT], common::config());

    game.tick(FRAME, &[GameCommand::MovePlayer(Direction::Right)]).unwrap();
    assert_that(&game.ticks()).is_equal_to(0);
    assert_that(&game.player().direction()).is_none();
}

#[test]
fn test_clearing_the_last_level_is_a_victory() {
    let (mut game, log) = custom(&[ONE_DOT], common::config());
    assert_that(&game.start()).is_true();

    let ticks = run_until(&mut game, 60, &[GameCommand::MovePlayer(Direction::Right)], |game| {
        game.status() == GameStatus::Victory
    });

    assert_that(&ticks.is_some()).is_true();
    assert_that(&game.score()).is_equal_to(0.5);
    assert_that(&game.level().is_complete()).is_true();
    let completed: Vec<_> = log
        .borrow()
        .iter()
        .filter_map(|event| match event {
            GameEvent::LevelCompleted(completed) => Some(*completed),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![LevelCompleted { score: 0.5, level: 1 }]);

    // Finished games stop simulating.
    let before = game.ticks();
    game.tick(FRAME, &[]).unwrap();
    assert_that(&game.ticks()).is_equal_to(before);
}

#[test]
fn test_completed_level_loads_the_next() {
    let (mut game, log) = custom(&[ONE_DOT, AMBUSH], common::config());
    game.start();

    let ticks = run_until(&mut game, 60, &[GameCommand::MovePlayer(Direction::Right)], |game| {
        game.level().number() == 2
    });

    assert_that(&ticks.is_some()).is_true();
    assert_that(&game.status()).is_equal_to(GameStatus::Playing);
    assert_that(&game.state().level()).is_equal_to(2);
    assert_that(&game.player().position).is_equal_to(game.level().start_position());
    assert!(log.borrow().contains(&GameEvent::from(LevelLoaded {
        level: 2,
        path: "custom/level2".into()
    })));
}

#[test]
fn test_caught_on_last_life_ends_in_game_over() {
    let config = GameConfig {
        starting_lives: 1,
        ..common::config()
    };
    let (mut game, log) = custom(&[AMBUSH], config);
    game.start();

    let ticks = run_until(&mut game, 120, &[], |game| game.status() == GameStatus::GameOver);

    assert_that(&ticks.is_some()).is_true();
    assert_that(&game.player().lives).is_equal_to(0);
    assert_that(&count(&log, EventKind::PacmanDied)).is_equal_to(1);
    assert_that(&count(&log, EventKind::GameOver)).is_equal_to(1);
    assert_that(&game.state().effects().is_empty()).is_true();
}

#[test]
fn test_name_entry_after_game_over() {
    let config = GameConfig {
        starting_lives: 1,
        ..common::config()
    };
    let (mut game, log) = custom(&[AMBUSH], config);
    game.start();
    run_until(&mut game, 120, &[], |game| game.status() == GameStatus::GameOver);

    assert!(matches!(game.submit_name("abc"), Err(GameError::InvalidState(_))));

    assert_that(&game.proceed()).is_equal_to(GameStatus::NameInput);
    assert_that(&game.submit_name(" robin ").unwrap()).is_equal_to(Some(0));
    assert_that(&game.status()).is_equal_to(GameStatus::HighScores);

    assert_that(&game.high_scores().entries()[0].name).is_equal_to("ROBI".to_string());
    assert!(log.borrow().contains(&GameEvent::from(HighScoreAdded {
        name: "ROBI".into(),
        score: 0.0
    })));
    assert_that(&count(&log, EventKind::ShowNameInput)).is_equal_to(1);
    assert_that(&count(&log, EventKind::ShowHighScores)).is_equal_to(1);
}

#[test]
fn test_proceed_skips_name_entry_when_score_does_not_qualify() {
    let config = GameConfig {
        starting_lives: 1,
        high_score_capacity: 0,
        ..common::config()
    };
    let (mut game, log) = custom(&[AMBUSH], config);
    game.start();
    run_until(&mut game, 120, &[], |game| game.status() == GameStatus::GameOver);

    assert_that(&game.proceed()).is_equal_to(GameStatus::HighScores);
    assert_that(&count(&log, EventKind::ShowNameInput)).is_equal_to(0);
    assert_that(&count(&log, EventKind::ShowHighScores)).is_equal_to(1);
}

#[test]
fn test_pause_freezes_the_simulation() {
    let (mut game, log) = custom(&[ONE_DOT], common::config());
    game.start();

    game.tick(FRAME, &[GameCommand::TogglePause]).unwrap();
    assert_that(&game.status()).is_equal_to(GameStatus::Paused);
    assert_that(&game.ticks()).is_equal_to(0);

    game.tick(FRAME, &[GameCommand::MovePlayer(Direction::Right)]).unwrap();
    assert_that(&game.player().direction()).is_none();

    game.tick(FRAME, &[GameCommand::TogglePause]).unwrap();
    assert_that(&game.status()).is_equal_to(GameStatus::Playing);
    assert_that(&game.ticks()).is_equal_to(1);
    assert_that(&count(&log, EventKind::GamePaused)).is_equal_to(1);
    assert_that(&count(&log, EventKind::GameResumed)).is_equal_to(1);
}

#[test]
fn test_restart_restores_a_fresh_session() {
    let config = GameConfig {
        starting_lives: 1,
        ..common::config()
    };
    let (mut game, log) = custom(&[AMBUSH], config);
    game.start();
    run_until(&mut game, 120, &[], |game| game.status() == GameStatus::GameOver);

    game.handle_command(GameCommand::Restart).unwrap();

    assert_that(&game.status()).is_equal_to(GameStatus::Playing);
    assert_that(&game.player().lives).is_equal_to(1);
    assert_that(&game.score()).is_equal_to(0.0);
    assert_that(&game.level().ghosts().len()).is_equal_to(1);
    assert_that(&count(&log, EventKind::LevelLoaded)).is_equal_to(2);
}

#[test]
fn test_failed_load_keeps_current_level() {
    let (mut game, _log) = custom(&[ONE_DOT], common::config());

    assert!(game.load_level(5).is_err());
    assert_that(&game.level().number()).is_equal_to(1);
    assert_that(&game.level().dots().len()).is_equal_to(1);
}

#[test]
fn test_broken_level_text_is_rejected() {
    let bus = Rc::new(EventMediator::new());
    let levels = LevelSource::Custom(vec!["###\n#S\n###".to_string()]);
    let result = Game::with_bus(bus, common::config(), levels);

    assert!(matches!(result, Err(GameError::Level(_))));
}

#[test]
fn test_exit_command_is_recorded() {
    let (mut game, _log) = custom(&[ONE_DOT], common::config());
    game.tick(FRAME, &[GameCommand::Exit]).unwrap();
    assert_that(&game.exit_requested()).is_true();
}

#[test]
fn test_embedded_levels_load() {
    let game = Game::new(common::config()).unwrap();

    assert_that(&game.level().number()).is_equal_to(1);
    assert_that(&game.level().dots().is_empty()).is_false();
    assert_that(&game.level().ghosts().is_empty()).is_false();
}

#[test]
fn test_timings_are_recorded_while_playing() {
    let (mut game, _log) = custom(&[AMBUSH], common::config());
    game.start();
    game.tick(FRAME, &[]).unwrap();

    assert_that(&game.timings().summary().contains(" tps | ")).is_true();
}
