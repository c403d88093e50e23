//! Reset strategies and the lifecycle they plug into.
//!
//! Every strategy shares the same lifecycle, driven by [`ResetMachine`]:
//!
//! ```text
//! Idle --request--> Required --initialize_reset--> Active --(strategy done)--> Ending
//!   ^                                                                            |
//!   +-------------------------------- finalize_reset ----------------------------+
//! ```
//!
//! Strategies only decide what happens while Active: how much rotation to
//! inject into the real-to-virtual mapping each tick, and when the user has
//! been reoriented far enough to finish.

pub mod machine;
pub mod null;
pub mod return_to_target;
pub mod two_one_turn;

use std::fmt;

use glam::Vec2;
use serde::Deserialize;

use crate::config::ResetConfig;
use crate::predictor::{CollisionHit, CollisionPredictor};
use crate::space::{PhysicalSpace, TrackedUser, UserId};
use crate::types::MotionState;

pub use machine::ResetMachine;
pub use null::NullReset;
pub use return_to_target::ReturnToTarget;
pub use two_one_turn::TwoOneTurn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResetState {
    #[default]
    Idle,
    Required,
    Active,
    Ending,
}

/// Which strategy a session runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResetKind {
    #[default]
    TwoOneTurn,
    ReturnToTarget,
    Null,
}

/// Bookkeeping for the reset in progress. Only exists outside Idle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetSession {
    pub state: ResetState,
    /// Real-space position the user should reach.
    pub target_pos: Vec2,
    /// Real-space heading the user should face when done.
    pub target_dir: Vec2,
    /// Signed degrees injected into the mapping so far.
    pub accumulated_rotation: f32,
    /// 0 at the start of the reset, 1 when done. For guidance UIs.
    pub progress: f32,
    pub started_at: u64,
    pub trigger: Option<CollisionHit>,
}

impl ResetSession {
    fn required(tick: u64, trigger: Option<CollisionHit>) -> Self {
        Self {
            state: ResetState::Required,
            target_pos: Vec2::ZERO,
            target_dir: Vec2::ZERO,
            accumulated_rotation: 0.0,
            progress: 0.0,
            started_at: tick,
            trigger,
        }
    }
}

/// Read-only view for guidance UIs and HUDs.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ResetGuidance {
    pub state: ResetState,
    pub progress: f32,
    pub target_pos: Vec2,
    pub target_dir: Vec2,
    pub accumulated_rotation: f32,
}

/// One tick of Active-phase output.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ResetStep {
    /// Rotation (signed degrees) to add to the virtual heading on top of the
    /// user's own turn.
    pub rotation_deg: f32,
    /// Hold the virtual position still this tick.
    pub suppress_translation: bool,
    pub progress: f32,
    /// The strategy is satisfied; the session moves to Ending.
    pub complete: bool,
}

impl ResetStep {
    pub fn none() -> Self {
        Self::default()
    }
}

/// How a simulated walker should move this tick while a reset is Active.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct WalkerCommand {
    /// Signed degrees to turn in place.
    pub turn_deg: f32,
    /// Meters to walk along the (new) heading.
    pub advance: f32,
}

/// Everything the predictor looks at besides the user's own motion.
#[derive(Debug, Clone, Copy)]
pub struct Surroundings<'a> {
    pub space: &'a PhysicalSpace,
    pub others: &'a [TrackedUser],
    pub self_id: UserId,
    pub buffer: f32,
}

/// Active-phase policy of a reset.
pub trait ResetStrategy: fmt::Debug + Send {
    fn kind(&self) -> ResetKind;

    /// Disabled strategies never start a session.
    fn enabled(&self) -> bool {
        true
    }

    /// The element that makes a reset necessary now, if any.
    fn reset_trigger(
        &self,
        predictor: &CollisionPredictor,
        motion: &MotionState,
        around: &Surroundings<'_>,
    ) -> Option<CollisionHit> {
        predictor.predict_excluding(
            motion,
            around.space,
            around.others,
            around.self_id,
            around.buffer,
        )
    }

    fn is_reset_required(
        &self,
        predictor: &CollisionPredictor,
        motion: &MotionState,
        around: &Surroundings<'_>,
    ) -> bool {
        self.reset_trigger(predictor, motion, around).is_some()
    }

    /// Adjust the freshly captured targets. The machine has already set
    /// `target_pos`, `target_dir` and zeroed the accumulated rotation.
    fn initialize_reset(
        &mut self,
        _session: &mut ResetSession,
        _motion: &MotionState,
        _space: Option<&PhysicalSpace>,
    ) {
    }

    /// One tick of Active-phase work.
    fn inject_resetting(&mut self, session: &ResetSession, motion: &MotionState) -> ResetStep;

    fn finalize_reset(&mut self, _session: &ResetSession) {}

    /// Movement for an automated walker that plays the user's part.
    fn simulated_walker_update(&self, session: &ResetSession, motion: &MotionState)
    -> WalkerCommand;
}

/// Build the strategy selected by `config.strategy`.
pub fn build_strategy(config: &ResetConfig) -> Box<dyn ResetStrategy> {
    match config.strategy {
        ResetKind::TwoOneTurn => Box::new(TwoOneTurn::new(config.walker_turn_speed_deg)),
        ResetKind::ReturnToTarget => Box::new(ReturnToTarget::from_config(config)),
        ResetKind::Null => Box::new(NullReset),
    }
}
