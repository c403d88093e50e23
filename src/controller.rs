//! Per-user session context tying predictor, gain modulator and reset
//! machine together.
//!
//! One [`RdwController`] per tracked user. The host calls [`RdwController::tick`]
//! once per frame with whatever collaborators it has; missing ones degrade to
//! no-ops. For finer control the individual operations are exposed as well.

use glam::Vec2;
use tracing::{debug, warn};

use crate::config::SessionConfig;
use crate::gain::{GainModulator, GainProfile, GainUpdate, PathContext};
use crate::grid::WalkableQuery;
use crate::predictor::{CollisionHit, CollisionPredictor};
use crate::reset::{ResetGuidance, ResetMachine, ResetState, Surroundings};
use crate::space::{PhysicalSpace, TrackedUser, UserId};
use crate::timer::Throttle;
use crate::types::MotionState;

/// Collaborators available this tick.
#[derive(Clone, Copy, Default)]
pub struct TickInput<'a> {
    pub motion: Option<&'a MotionState>,
    pub space: Option<&'a PhysicalSpace>,
    /// Every tracked user; the controller's own entry is skipped.
    pub users: &'a [TrackedUser],
    pub walkable: Option<&'a dyn WalkableQuery>,
}

/// Outcome of one tick, for the locomotion integrator and observers.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TickReport {
    pub tick: u64,
    pub context: PathContext,
    pub gain: GainProfile,
    pub gain_update: GainUpdate,
    pub reset_state: ResetState,
    /// A reset session exists; the integrator must stop applying gains.
    pub reset_active: bool,
    pub injected_rotation_deg: f32,
    pub suppress_translation: bool,
    /// Set on the tick a reset started.
    pub triggered: Option<CollisionHit>,
    /// A finished reset was cleared at the start of this tick.
    pub finalized: bool,
}

#[derive(Debug)]
pub struct RdwController {
    user: UserId,
    predictor: CollisionPredictor,
    gains: GainModulator,
    resets: ResetMachine,
    now: u64,
    missing_environment: Throttle,
    missing_geometry: Throttle,
}

impl RdwController {
    pub fn new(
        user: UserId,
        predictor: CollisionPredictor,
        gains: GainModulator,
        resets: ResetMachine,
        warning_interval_ticks: u64,
    ) -> Self {
        Self {
            user,
            predictor,
            gains,
            resets,
            now: 0,
            missing_environment: Throttle::new(warning_interval_ticks),
            missing_geometry: Throttle::new(warning_interval_ticks),
        }
    }

    pub fn from_config(config: &SessionConfig, user: UserId) -> Self {
        Self::new(
            user,
            CollisionPredictor::new(config.reset.tolerance_angle_deg),
            GainModulator::new(&config.gains, &config.classifier),
            ResetMachine::from_config(&config.reset),
            config.reset.warning_interval_ticks,
        )
    }

    pub fn user(&self) -> UserId {
        self.user
    }

    /// Ticks run so far.
    pub fn current_tick(&self) -> u64 {
        self.now
    }

    pub fn predictor(&self) -> &CollisionPredictor {
        &self.predictor
    }

    pub fn gains(&self) -> &GainModulator {
        &self.gains
    }

    pub fn gains_mut(&mut self) -> &mut GainModulator {
        &mut self.gains
    }

    pub fn resets(&self) -> &ResetMachine {
        &self.resets
    }

    pub fn guidance(&self) -> Option<ResetGuidance> {
        self.resets.guidance()
    }

    /// Run one tick.
    ///
    /// Order: clear a reset that ended last tick, reclassify the path
    /// context, then either look for a new collision (when idle) or advance
    /// the running reset. A reset that starts this tick injects from the
    /// next one.
    pub fn tick(&mut self, input: TickInput<'_>) -> TickReport {
        let tick = self.now;
        self.now += 1;

        let finalized = self.resets.finalize_reset();

        let point = input.motion.map_or(Vec2::ZERO, |m| m.virtual_pos);
        let environment = input.motion.and(input.walkable);
        let gain_update = self.gains.update(tick, point, environment);
        if gain_update == GainUpdate::NoEnvironment && self.missing_environment.ready(tick) {
            warn!(
                tick,
                motion = input.motion.is_some(),
                walkable = input.walkable.is_some(),
                "path context kept, no environment to classify against"
            );
        }

        let mut triggered = None;
        let mut step = None;
        match self.resets.state() {
            ResetState::Idle => triggered = self.detect_and_start(tick, &input),
            ResetState::Required => {
                self.resets.initialize_reset(tick, input.motion, input.space);
            }
            ResetState::Active => {
                step = Some(self.resets.inject_resetting(tick, input.motion, input.space));
            }
            ResetState::Ending => {}
        }

        let reset_state = self.resets.state();
        let step = step.unwrap_or_default();
        TickReport {
            tick,
            context: self.gains.context(),
            gain: self.gains.active(),
            gain_update,
            reset_state,
            reset_active: reset_state != ResetState::Idle,
            injected_rotation_deg: step.rotation_deg,
            suppress_translation: step.suppress_translation,
            triggered,
            finalized,
        }
    }

    fn detect_and_start(&mut self, tick: u64, input: &TickInput<'_>) -> Option<CollisionHit> {
        let (Some(motion), Some(space)) = (input.motion, input.space) else {
            if self.missing_geometry.ready(tick) {
                warn!(
                    tick,
                    motion = input.motion.is_some(),
                    space = input.space.is_some(),
                    "collision check skipped, collaborator missing"
                );
            }
            return None;
        };

        let around = Surroundings {
            space,
            others: input.users,
            self_id: self.user,
            buffer: self.gains.active().reset_buffer,
        };
        let hit = self.resets.reset_trigger(&self.predictor, motion, &around)?;
        debug!(tick, kind = ?hit.kind, distance = hit.distance, "collision predicted");
        if !self.resets.request(tick, Some(hit)) {
            return None;
        }
        self.resets.initialize_reset(tick, Some(motion), Some(space));
        Some(hit)
    }

    /// Whether `motion` needs a reset under the active profile's buffer.
    pub fn is_reset_required(
        &self,
        motion: &MotionState,
        space: &PhysicalSpace,
        users: &[TrackedUser],
    ) -> bool {
        let around = Surroundings {
            space,
            others: users,
            self_id: self.user,
            buffer: self.gains.active().reset_buffer,
        };
        self.resets.is_reset_required(&self.predictor, motion, &around)
    }

    /// Start a reset now, outside the tick loop. The trigger (if the
    /// predictor sees one) sets the safe heading.
    pub fn initialize_reset(
        &mut self,
        motion: &MotionState,
        space: &PhysicalSpace,
        users: &[TrackedUser],
    ) -> bool {
        let around = Surroundings {
            space,
            others: users,
            self_id: self.user,
            buffer: self.gains.active().reset_buffer,
        };
        let trigger = self.resets.reset_trigger(&self.predictor, motion, &around);
        if self.resets.state() == ResetState::Idle && !self.resets.request(self.now, trigger) {
            return false;
        }
        self.resets.initialize_reset(self.now, Some(motion), Some(space))
    }

    /// One Active tick outside the tick loop. Returns the injected rotation.
    pub fn inject_resetting(
        &mut self,
        motion: Option<&MotionState>,
        space: Option<&PhysicalSpace>,
    ) -> f32 {
        self.resets
            .inject_resetting(self.now, motion, space)
            .rotation_deg
    }

    pub fn finalize_reset(&mut self) -> bool {
        self.resets.finalize_reset()
    }

    pub fn temporarily_boost(&mut self, duration_ticks: u64) {
        self.gains.temporarily_boost(self.now, duration_ticks);
    }
}
