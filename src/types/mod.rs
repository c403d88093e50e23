pub mod constants;
pub mod error;
pub mod geometry;
pub mod info;
pub mod motion;

pub use constants::*;
pub use error::RdwError;
pub use geometry::{Bounds, Polygon, Segment};
pub use info::MapInfo;
pub use motion::MotionState;
