use glam::Vec2;
use tracing::{debug, info, warn};

use crate::config::ResetConfig;
use crate::predictor::{CollisionHit, CollisionPredictor};
use crate::reset::{
    ResetGuidance, ResetSession, ResetState, ResetStep, ResetStrategy, Surroundings,
    WalkerCommand, build_strategy,
};
use crate::space::PhysicalSpace;
use crate::timer::Throttle;
use crate::types::MotionState;
use crate::types::geometry::{heading, is_degenerate};

/// Owns the reset lifecycle and forwards the Active phase to a strategy.
#[derive(Debug)]
pub struct ResetMachine {
    strategy: Box<dyn ResetStrategy>,
    session: Option<ResetSession>,
    missing_collaborator: Throttle,
    completed: u64,
}

impl ResetMachine {
    pub fn new(strategy: Box<dyn ResetStrategy>, warning_interval_ticks: u64) -> Self {
        Self {
            strategy,
            session: None,
            missing_collaborator: Throttle::new(warning_interval_ticks),
            completed: 0,
        }
    }

    pub fn from_config(config: &ResetConfig) -> Self {
        Self::new(build_strategy(config), config.warning_interval_ticks)
    }

    pub fn state(&self) -> ResetState {
        self.session.map_or(ResetState::Idle, |s| s.state)
    }

    pub fn is_idle(&self) -> bool {
        self.session.is_none()
    }

    pub fn session(&self) -> Option<&ResetSession> {
        self.session.as_ref()
    }

    pub fn strategy(&self) -> &dyn ResetStrategy {
        self.strategy.as_ref()
    }

    /// Resets finished since construction.
    pub fn completed_resets(&self) -> u64 {
        self.completed
    }

    pub fn guidance(&self) -> Option<ResetGuidance> {
        self.session.map(|s| ResetGuidance {
            state: s.state,
            progress: s.progress,
            target_pos: s.target_pos,
            target_dir: s.target_dir,
            accumulated_rotation: s.accumulated_rotation,
        })
    }

    /// Ask the strategy whether a reset is needed, returning what triggered it.
    pub fn reset_trigger(
        &self,
        predictor: &CollisionPredictor,
        motion: &MotionState,
        around: &Surroundings<'_>,
    ) -> Option<CollisionHit> {
        self.strategy.reset_trigger(predictor, motion, around)
    }

    pub fn is_reset_required(
        &self,
        predictor: &CollisionPredictor,
        motion: &MotionState,
        around: &Surroundings<'_>,
    ) -> bool {
        self.strategy.is_reset_required(predictor, motion, around)
    }

    /// Idle -> Required. Refused while a session exists or when the strategy
    /// is disabled.
    pub fn request(&mut self, tick: u64, trigger: Option<CollisionHit>) -> bool {
        if !self.strategy.enabled() {
            debug!(tick, kind = ?self.strategy.kind(), "reset request ignored by disabled strategy");
            return false;
        }
        if let Some(session) = &self.session {
            debug!(tick, state = ?session.state, "reset already in progress");
            return false;
        }
        self.session = Some(ResetSession::required(tick, trigger));
        true
    }

    /// Required -> Active. Captures the user's position as the target and the
    /// heading to face afterwards: away from the trigger, else opposite to
    /// the current heading.
    pub fn initialize_reset(
        &mut self,
        tick: u64,
        motion: Option<&MotionState>,
        space: Option<&PhysicalSpace>,
    ) -> bool {
        let Some(session) = self.session.as_mut() else {
            debug!(tick, "initialize_reset with no pending request");
            return false;
        };
        if session.state != ResetState::Required {
            debug!(tick, state = ?session.state, "initialize_reset outside Required");
            return false;
        }
        let Some(motion) = motion else {
            if self.missing_collaborator.ready(tick) {
                warn!(tick, "cannot initialize reset without a motion state");
            }
            return false;
        };

        session.target_pos = motion.real_pos;
        session.target_dir = match session.trigger {
            Some(hit) if !is_degenerate(hit.away) => hit.away,
            _ if !is_degenerate(motion.real_dir) => -heading(motion.real_dir),
            _ => Vec2::Y,
        };
        session.accumulated_rotation = 0.0;
        session.progress = 0.0;
        session.state = ResetState::Active;
        self.strategy.initialize_reset(session, motion, space);

        info!(
            tick,
            kind = ?self.strategy.kind(),
            trigger = ?session.trigger.map(|hit| hit.kind),
            target_pos = ?session.target_pos,
            target_dir = ?session.target_dir,
            "reset started"
        );
        true
    }

    /// One Active tick. A missing motion state or physical space makes this a
    /// no-op, warned about at most once per warning interval.
    pub fn inject_resetting(
        &mut self,
        tick: u64,
        motion: Option<&MotionState>,
        space: Option<&PhysicalSpace>,
    ) -> ResetStep {
        let Some(session) = self.session.as_mut() else {
            return ResetStep::none();
        };
        if session.state != ResetState::Active {
            return ResetStep::none();
        }
        let (Some(motion), Some(_)) = (motion, space) else {
            if self.missing_collaborator.ready(tick) {
                warn!(
                    tick,
                    motion = motion.is_some(),
                    space = space.is_some(),
                    "reset injection skipped, collaborator missing"
                );
            }
            return ResetStep::none();
        };

        let step = self.strategy.inject_resetting(session, motion);
        session.accumulated_rotation += step.rotation_deg;
        session.progress = step.progress;
        if step.complete {
            session.state = ResetState::Ending;
            info!(
                tick,
                accumulated_rotation = session.accumulated_rotation,
                ticks = tick.saturating_sub(session.started_at),
                "reset complete"
            );
        }
        step
    }

    /// Ending -> Idle. Safe to call in any state: it only acts on Ending and
    /// never cancels a reset that is still running.
    pub fn finalize_reset(&mut self) -> bool {
        match self.session {
            Some(session) if session.state == ResetState::Ending => {
                self.strategy.finalize_reset(&session);
                self.session = None;
                self.completed += 1;
                self.missing_collaborator.reset();
                true
            }
            _ => false,
        }
    }

    /// Walker movement for the current Active session, or standing still.
    pub fn simulated_walker_update(&self, motion: &MotionState) -> WalkerCommand {
        match &self.session {
            Some(session) if session.state == ResetState::Active => {
                self.strategy.simulated_walker_update(session, motion)
            }
            _ => WalkerCommand::default(),
        }
    }
}
