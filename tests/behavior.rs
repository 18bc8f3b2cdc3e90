use glam::IVec2;
use maze_chase::config::GameConfig;
use maze_chase::entity::behavior::Behavior;
use maze_chase::error::PathError;
use maze_chase::map::builder::MapBuilder;
use maze_chase::map::graph::{Graph, NodeId};
use maze_chase::map::parser::GhostKind;
use pretty_assertions::assert_eq;
use speculoos::prelude::*;

mod common;

const RANDOM: NodeId = 999;

fn open_grid() -> Graph {
    // 12x1 corridor: distances are just x differences.
    Graph::new(12, 1, &[true; 12]).unwrap()
}

fn pick(behavior: &mut Behavior, graph: &Graph, current: NodeId, pacman: NodeId, scared: bool) -> NodeId {
    let mut random = || -> Result<NodeId, PathError> { Ok(RANDOM) };
    behavior
        .determine_destination(current, pacman, scared, graph, &mut random)
        .unwrap()
}

#[test]
fn test_chaser_targets_player_within_radius() {
    let graph = open_grid();
    let mut chaser = Behavior::Chaser { radius: 4 };

    assert_that(&pick(&mut chaser, &graph, 0, 4, false)).is_equal_to(4);
    assert_that(&pick(&mut chaser, &graph, 0, 5, false)).is_equal_to(RANDOM);
}

#[test]
fn test_scared_always_wanders() {
    let graph = open_grid();
    for mut behavior in [
        Behavior::Chaser { radius: 10 },
        Behavior::Ambusher { radius: 10 },
        Behavior::patrol(vec![1, 2], 10),
    ] {
        assert_that(&pick(&mut behavior, &graph, 0, 1, true)).is_equal_to(RANDOM);
    }
}

#[test]
fn test_random_never_notices_player() {
    let graph = open_grid();
    let mut random = Behavior::random();
    assert_that(&pick(&mut random, &graph, 3, 4, false)).is_equal_to(RANDOM);
    assert_that(&pick(&mut random, &graph, 3, 3, false)).is_equal_to(3);
}

#[test]
fn test_ambusher_targets_a_cell_next_to_the_player() {
    let built = MapBuilder::build(&common::SCENARIO).unwrap();
    let ghost = built.graph.node_at(IVec2::new(3, 3)).unwrap();
    let mut ambusher = Behavior::Ambusher { radius: 6 };

    let target = pick(&mut ambusher, &built.graph, ghost, built.start, false);

    // Up and left of the start are walls, so the first open neighbour is to the right.
    assert_that(&target).is_equal_to(built.graph.node_at(IVec2::new(2, 1)).unwrap());
}

#[test]
fn test_ambusher_out_of_range_wanders() {
    let graph = open_grid();
    let mut ambusher = Behavior::Ambusher { radius: 2 };
    assert_that(&pick(&mut ambusher, &graph, 0, 9, false)).is_equal_to(RANDOM);
}

#[test]
fn test_patrol_cycles_waypoints() {
    let graph = open_grid();
    let mut patrol = Behavior::patrol(vec![2, 6, 9], 1);

    assert_that(&pick(&mut patrol, &graph, 0, 11, false)).is_equal_to(2);
    patrol.observe_arrival(1);
    assert_that(&pick(&mut patrol, &graph, 1, 11, false)).is_equal_to(2);
    patrol.observe_arrival(2);
    assert_that(&pick(&mut patrol, &graph, 4, 11, false)).is_equal_to(6);
    patrol.observe_arrival(6);
    patrol.observe_arrival(7);
    assert_that(&pick(&mut patrol, &graph, 7, 11, false)).is_equal_to(9);
    patrol.observe_arrival(9);
    assert_that(&pick(&mut patrol, &graph, 8, 11, false)).is_equal_to(2);
}

#[test]
fn test_arrivals_leave_other_behaviors_alone() {
    let mut chaser = Behavior::Chaser { radius: 3 };
    chaser.observe_arrival(3);
    assert_eq!(chaser, Behavior::Chaser { radius: 3 });

    let mut empty = Behavior::patrol(vec![], 3);
    empty.observe_arrival(0);
    assert_eq!(empty, Behavior::patrol(vec![], 3));
}

#[test]
fn test_patrol_breaks_off_to_chase() {
    let graph = open_grid();
    let mut patrol = Behavior::patrol(vec![0, 1], 2);
    assert_that(&pick(&mut patrol, &graph, 8, 10, false)).is_equal_to(10);
}

#[test]
fn test_random_source_errors_propagate() {
    let graph = open_grid();
    let mut random = || -> Result<NodeId, PathError> { Err(PathError::RandomPointExhausted { attempts: 1 }) };

    let result = Behavior::random().determine_destination(0, 5, false, &graph, &mut random);
    assert_eq!(result, Err(PathError::RandomPointExhausted { attempts: 1 }));
}

#[test]
fn test_kind_mapping() {
    let config = GameConfig::default();
    assert_eq!(
        Behavior::for_kind(GhostKind::Chaser, &config),
        Behavior::Chaser {
            radius: config.chase_radius
        }
    );
    assert_eq!(
        Behavior::for_kind(GhostKind::Ambusher, &config),
        Behavior::Ambusher {
            radius: config.ambush_radius
        }
    );
    assert_eq!(Behavior::for_kind(GhostKind::Random, &config), Behavior::random());
    assert_that(&Behavior::patrol(vec![], 1).name()).is_equal_to("Patrol");
    assert_eq!(
        Behavior::patrol_with(vec![4, 8], &config),
        Behavior::patrol(vec![4, 8], config.patrol_radius)
    );
}
