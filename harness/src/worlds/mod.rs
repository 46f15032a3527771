//! Reference problem worlds.

pub mod graph_world;
pub mod grid_maze;
pub mod sliding_tile;
