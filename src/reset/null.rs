use crate::predictor::{CollisionHit, CollisionPredictor};
use crate::reset::{ResetKind, ResetSession, ResetStep, ResetStrategy, Surroundings, WalkerCommand};
use crate::types::MotionState;

/// Resetting switched off. Never asks for a reset and never injects rotation,
/// so a session can only exist if one is forced by hand.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullReset;

impl ResetStrategy for NullReset {
    fn kind(&self) -> ResetKind {
        ResetKind::Null
    }

    fn enabled(&self) -> bool {
        false
    }

    fn is_reset_required(
        &self,
        _predictor: &CollisionPredictor,
        _motion: &MotionState,
        _around: &Surroundings<'_>,
    ) -> bool {
        false
    }

    fn reset_trigger(
        &self,
        _predictor: &CollisionPredictor,
        _motion: &MotionState,
        _around: &Surroundings<'_>,
    ) -> Option<CollisionHit> {
        None
    }

    fn inject_resetting(&mut self, _session: &ResetSession, _motion: &MotionState) -> ResetStep {
        ResetStep::none()
    }

    fn simulated_walker_update(
        &self,
        _session: &ResetSession,
        _motion: &MotionState,
    ) -> WalkerCommand {
        WalkerCommand::default()
    }
}
