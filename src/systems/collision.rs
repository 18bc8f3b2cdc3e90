use std::rc::Rc;
use std::time::Duration;

use glam::Vec2;
use rand::RngCore;
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::entity::collision::circles_intersect;
use crate::entity::item::{PelletKind, Wall};
use crate::entity::player::Player;
use crate::error::PathError;
use crate::events::{DotCollected, EventMediator, GhostCollided, GhostEaten, PacmanDied, PelletCollected};
use crate::level::LevelAccessor;

/// What one resolution pass did, for logging and tests.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CollisionReport {
    pub dots: u32,
    pub walls: u32,
    pub pellets: u32,
    pub ghosts_eaten: u32,
    pub player_died: bool,
}

/// Pushes a circle of `radius` at `position` out of `wall`.
///
/// Penetration is measured on both axes and the shallower one is resolved
/// (ties resolve horizontally). The position is moved along that axis only, to
/// `half_extent + radius + slop` from the wall's center, on the side it
/// already was (the positive side when exactly centered).
pub fn separate_from_wall(position: Vec2, radius: f32, wall: &Wall, slop: f32) -> Vec2 {
    let delta = position - wall.center;
    let reach = wall.half_extent + radius;
    let penetration = Vec2::splat(reach) - delta.abs();

    let side = |offset: f32| if offset < 0.0 { -1.0 } else { 1.0 };
    let mut resolved = position;
    if penetration.x <= penetration.y {
        resolved.x = wall.center.x + side(delta.x) * (reach + slop);
    } else {
        resolved.y = wall.center.y + side(delta.y) * (reach + slop);
    }
    resolved
}

/// Resolves every player interaction once per frame.
///
/// Detection and resolution only remove entities and move the player; every
/// other consequence (score, status, timers) is published on the bus.
pub struct CollisionSystem {
    bus: Rc<EventMediator>,
    wall_slop: f32,
    respawn_delay: Duration,
    power_duration: Duration,
    path_duration: Duration,
}

impl CollisionSystem {
    pub fn new(bus: Rc<EventMediator>, config: &GameConfig) -> Self {
        Self {
            bus,
            wall_slop: config.wall_separation_slop,
            respawn_delay: config.respawn_delay,
            power_duration: config.power_duration,
            path_duration: config.path_duration,
        }
    }

    /// Runs the dot, wall, pellet and ghost phases, in that order.
    ///
    /// `ghosts_scared` is read when the ghost phase starts, so a power pellet
    /// collected earlier in the same pass already counts.
    ///
    /// # Errors
    ///
    /// Fails only when an eaten ghost cannot be given a respawn destination.
    pub fn resolve<L, R>(
        &self,
        player: &mut Player,
        level: &mut L,
        ghosts_scared: impl Fn() -> bool,
        rng: &mut R,
    ) -> Result<CollisionReport, PathError>
    where
        L: LevelAccessor + ?Sized,
        R: RngCore + ?Sized,
    {
        let mut report = CollisionReport::default();
        self.resolve_dots(player, level, &mut report);
        self.resolve_walls(player, level, &mut report);
        self.resolve_pellets(player, level, &mut report);
        self.resolve_ghosts(player, level, ghosts_scared(), rng, &mut report)?;
        Ok(report)
    }

    fn resolve_dots<L: LevelAccessor + ?Sized>(&self, player: &Player, level: &mut L, report: &mut CollisionReport) {
        for index in (0..level.dots().len()).rev() {
            let dot = level.dots()[index];
            if circles_intersect(player.position, player.radius, dot.center, dot.radius) {
                level.remove_dot(index);
                report.dots += 1;
                self.bus.notify(DotCollected);
            }
        }
    }

    fn resolve_walls<L: LevelAccessor + ?Sized>(&self, player: &mut Player, level: &L, report: &mut CollisionReport) {
        for wall in level.walls().iter().rev() {
            if player.rect().intersects(&wall.rect()) {
                player.position = separate_from_wall(player.position, player.radius, wall, self.wall_slop);
                report.walls += 1;
            }
        }
    }

    fn resolve_pellets<L: LevelAccessor + ?Sized>(&self, player: &Player, level: &mut L, report: &mut CollisionReport) {
        for index in (0..level.pellets().len()).rev() {
            let pellet = level.pellets()[index];
            if !circles_intersect(player.position, player.radius, pellet.center, pellet.radius) {
                continue;
            }

            level.remove_pellet(index);
            report.pellets += 1;
            self.bus.notify(match pellet.kind {
                PelletKind::Power => PelletCollected {
                    is_power_pellet: true,
                    is_path_pellet: false,
                    duration: Some(self.power_duration),
                },
                PelletKind::Path => PelletCollected {
                    is_power_pellet: false,
                    is_path_pellet: true,
                    duration: Some(self.path_duration),
                },
            });
        }
    }

    fn resolve_ghosts<L, R>(
        &self,
        player: &mut Player,
        level: &mut L,
        scared: bool,
        rng: &mut R,
        report: &mut CollisionReport,
    ) -> Result<(), PathError>
    where
        L: LevelAccessor + ?Sized,
        R: RngCore + ?Sized,
    {
        for index in (0..level.ghosts().len()).rev() {
            if !player.rect().intersects(&level.ghosts()[index].rect()) {
                continue;
            }

            let id = level.ghosts()[index].id;
            self.bus.notify(GhostCollided {
                ghost_scared: scared,
                ghost: id,
            });

            if scared {
                let eaten = level.remove_ghost(index);
                let replacement = eaten.respawned(level.graph(), level.tile_size(), rng)?;
                level.schedule_respawn(replacement, self.respawn_delay);
                report.ghosts_eaten += 1;
                debug!(ghost = id, "Ghost eaten");
                self.bus.notify(GhostEaten { ghost: id });
            } else {
                let remaining = player.lose_life();
                if remaining > 0 {
                    player.reset_to(level.start_position());
                }
                report.player_died = true;
                info!(ghost = id, lives = remaining, "Player caught");
                self.bus.notify(PacmanDied {
                    game_over: remaining == 0,
                });
                // The player has moved or the game is over; further contacts this frame are stale.
                break;
            }
        }
        Ok(())
    }
}
