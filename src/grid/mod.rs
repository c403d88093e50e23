pub mod grid2d;
pub mod walkable;

pub use grid2d::Grid2d;
pub use walkable::{WalkableGrid, WalkableQuery};
