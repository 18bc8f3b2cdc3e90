pub mod behavior;
pub mod collision;
pub mod ghost;
pub mod item;
pub mod player;
