pub mod config;
pub mod controller;
pub mod gain;
pub mod grid;
pub mod iterators;
pub mod loaders;
pub mod locomotion;
pub mod predictor;
pub mod raycast;
pub mod reset;
pub mod space;
pub mod timer;
pub mod types;
pub mod visualization;
pub mod walker;

pub use config::SessionConfig;
pub use controller::{RdwController, TickInput, TickReport};
pub use gain::{GainModulator, GainProfile, PathContext};
pub use grid::{Grid2d, WalkableGrid, WalkableQuery};
pub use loaders::load_walkable_map;
pub use locomotion::LocomotionIntegrator;
pub use predictor::{CollisionHit, CollisionPredictor, HitKind};
pub use reset::{ResetKind, ResetMachine, ResetState, ResetStrategy};
pub use space::{PhysicalSpace, TrackedUser, UserId};
pub use types::{MapInfo, MotionState, Polygon, RdwError};
pub use walker::SimulatedWalker;
