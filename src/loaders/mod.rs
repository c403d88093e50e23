pub mod walkable_map;

pub use walkable_map::load_walkable_map;
