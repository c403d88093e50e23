use crate::reset::{ResetKind, ResetSession, ResetStep, ResetStrategy, WalkerCommand};
use crate::types::geometry::signed_angle_deg;
use crate::types::{HALF_TURN_DEG, MotionState, TURN_EPSILON_DEG};

/// The user turns 180° in place while the same rotation is injected into the
/// mapping, so the virtual view turns a full 360°. The user ends up facing
/// away from the wall while the virtual world is back where it started.
#[derive(Debug, Clone)]
pub struct TwoOneTurn {
    /// Simulated walker turn rate (degrees per tick).
    turn_speed_deg: f32,
}

impl TwoOneTurn {
    pub fn new(turn_speed_deg: f32) -> Self {
        Self { turn_speed_deg }
    }

    fn remaining_abs(session: &ResetSession) -> f32 {
        (HALF_TURN_DEG - session.accumulated_rotation.abs()).max(0.0)
    }
}

impl ResetStrategy for TwoOneTurn {
    fn kind(&self) -> ResetKind {
        ResetKind::TwoOneTurn
    }

    fn inject_resetting(&mut self, session: &ResetSession, motion: &MotionState) -> ResetStep {
        let accumulated = session.accumulated_rotation;
        let delta = motion.delta_dir;

        if delta.abs() <= f32::EPSILON {
            // Standing still: nothing to inject, but a turn finished up to
            // round-off still completes.
            let complete = Self::remaining_abs(session) <= TURN_EPSILON_DEG;
            return ResetStep {
                progress: accumulated.abs() / HALF_TURN_DEG,
                complete,
                ..ResetStep::none()
            };
        }

        let remaining = delta.signum() * HALF_TURN_DEG - accumulated;
        let (rotation_deg, complete) = if remaining.abs() <= delta.abs() + TURN_EPSILON_DEG {
            (remaining, true)
        } else {
            (delta, false)
        };

        ResetStep {
            rotation_deg,
            suppress_translation: false,
            progress: ((accumulated + rotation_deg).abs() / HALF_TURN_DEG).min(1.0),
            complete,
        }
    }

    fn simulated_walker_update(
        &self,
        session: &ResetSession,
        motion: &MotionState,
    ) -> WalkerCommand {
        let direction = if session.accumulated_rotation != 0.0 {
            session.accumulated_rotation.signum()
        } else {
            let toward_target = signed_angle_deg(motion.real_dir, session.target_dir);
            if toward_target < 0.0 { -1.0 } else { 1.0 }
        };
        WalkerCommand {
            turn_deg: direction * self.turn_speed_deg.min(Self::remaining_abs(session)),
            advance: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use glam::Vec2;

    use super::*;
    use crate::reset::ResetState;

    fn active_session() -> ResetSession {
        ResetSession {
            state: ResetState::Active,
            target_pos: Vec2::ZERO,
            target_dir: Vec2::NEG_X,
            accumulated_rotation: 0.0,
            progress: 0.0,
            started_at: 0,
            trigger: None,
        }
    }

    fn turning(delta: f32) -> MotionState {
        MotionState::at_rest(Vec2::ZERO, Vec2::X).with_delta_dir(delta)
    }

    /// Feed deltas, accumulating like the machine does. Returns the tick
    /// (1-based) that completed and the injections.
    fn run(deltas: &[f32]) -> (Option<usize>, Vec<f32>, ResetSession) {
        let mut strategy = TwoOneTurn::new(10.0);
        let mut session = active_session();
        let mut injected = Vec::new();
        for (i, delta) in deltas.iter().enumerate() {
            let step = strategy.inject_resetting(&session, &turning(*delta));
            session.accumulated_rotation += step.rotation_deg;
            injected.push(step.rotation_deg);
            if step.complete {
                return (Some(i + 1), injected, session);
            }
        }
        (None, injected, session)
    }

    #[test]
    fn forty_degree_ticks_finish_on_the_fifth() {
        let (done, injected, session) = run(&[40.0; 5]);
        assert_eq!(done, Some(5));
        assert_eq!(injected, vec![40.0, 40.0, 40.0, 40.0, 20.0]);
        assert_eq!(session.accumulated_rotation, 180.0);
    }

    #[test]
    fn negative_turns_accumulate_toward_minus_half_turn() {
        let (done, _, session) = run(&[-50.0; 4]);
        assert_eq!(done, Some(4));
        assert_eq!(session.accumulated_rotation, -180.0);
    }

    #[test]
    fn accumulation_is_monotonic_and_bounded() {
        let deltas: Vec<f32> = (1..=30).map(|i| (i % 7) as f32 * 3.5 + 0.5).collect();
        let mut strategy = TwoOneTurn::new(10.0);
        let mut session = active_session();
        let mut last = 0.0f32;
        for delta in deltas {
            let step = strategy.inject_resetting(&session, &turning(delta));
            session.accumulated_rotation += step.rotation_deg;
            assert!(session.accumulated_rotation.abs() >= last.abs());
            assert!(session.accumulated_rotation.abs() <= HALF_TURN_DEG + 1e-4);
            last = session.accumulated_rotation;
            if step.complete {
                assert_relative_eq!(session.accumulated_rotation, 180.0, epsilon = 1e-4);
                return;
            }
        }
        panic!("turn never completed");
    }

    #[test]
    fn standing_still_injects_nothing() {
        let mut strategy = TwoOneTurn::new(10.0);
        let mut session = active_session();
        session.accumulated_rotation = 90.0;
        let step = strategy.inject_resetting(&session, &turning(0.0));
        assert_eq!(step.rotation_deg, 0.0);
        assert!(!step.complete);
        assert_relative_eq!(step.progress, 0.5);
    }

    #[test]
    fn walker_turns_toward_target_then_keeps_direction() {
        let strategy = TwoOneTurn::new(10.0);
        let mut session = active_session();
        session.target_dir = Vec2::new(-1.0, -0.1).normalize();
        let cmd = strategy.simulated_walker_update(&session, &turning(0.0));
        assert_eq!(cmd.turn_deg, -10.0);
        assert_eq!(cmd.advance, 0.0);

        session.accumulated_rotation = 175.0;
        let cmd = strategy.simulated_walker_update(&session, &turning(0.0));
        assert_relative_eq!(cmd.turn_deg, 5.0);
    }
}
