use crate::map::direction::Direction;

/// An intent produced by an input source and consumed by the game.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameCommand {
    MovePlayer(Direction),
    TogglePause,
    Restart,
    Exit,
}
