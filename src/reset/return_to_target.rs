use glam::Vec2;
use tracing::debug;

use crate::config::ResetConfig;
use crate::reset::{ResetKind, ResetSession, ResetStep, ResetStrategy, WalkerCommand};
use crate::space::PhysicalSpace;
use crate::types::geometry::{angle_between_deg, heading, signed_angle_deg};
use crate::types::{HALF_TURN_DEG, MotionState};

/// Tries before falling back to the user's own position.
const MAX_TARGET_SHRINKS: u32 = 4;

/// The virtual world freezes while the user walks back to a point a little
/// inward from where the reset fired and faces away from the obstacle.
///
/// Every real turn is cancelled by an equal opposite injection and real
/// translation is dropped, so the virtual pose holds still for the whole
/// reset.
#[derive(Debug, Clone)]
pub struct ReturnToTarget {
    retreat_distance: f32,
    position_tolerance: f32,
    heading_tolerance_deg: f32,
    turn_speed_deg: f32,
    step: f32,
    /// Distance to the target when the reset started.
    initial_distance: f32,
}

impl ReturnToTarget {
    pub fn from_config(config: &ResetConfig) -> Self {
        Self {
            retreat_distance: config.retreat_distance.max(0.0),
            position_tolerance: config.position_tolerance,
            heading_tolerance_deg: config.heading_tolerance_deg,
            turn_speed_deg: config.walker_turn_speed_deg,
            step: config.walker_step,
            initial_distance: 0.0,
        }
    }

    fn errors(session: &ResetSession, motion: &MotionState) -> (f32, f32) {
        let position = motion.real_pos.distance(session.target_pos);
        let heading = angle_between_deg(motion.real_dir, session.target_dir).unwrap_or(HALF_TURN_DEG);
        (position, heading)
    }

    /// Place the target `retreat_distance` along `target_dir`, pulling it
    /// back toward the user while it falls outside the free floor.
    fn place_target(&self, from: Vec2, dir: Vec2, space: Option<&PhysicalSpace>) -> Vec2 {
        let Some(space) = space else {
            return from + dir * self.retreat_distance;
        };
        let mut distance = self.retreat_distance;
        for _ in 0..=MAX_TARGET_SHRINKS {
            let target = from + dir * distance;
            if space.contains(target) {
                return target;
            }
            distance *= 0.5;
        }
        debug!(?from, "no free retreat target, returning to the reset point");
        from
    }
}

impl ResetStrategy for ReturnToTarget {
    fn kind(&self) -> ResetKind {
        ResetKind::ReturnToTarget
    }

    fn initialize_reset(
        &mut self,
        session: &mut ResetSession,
        motion: &MotionState,
        space: Option<&PhysicalSpace>,
    ) {
        session.target_pos = self.place_target(session.target_pos, session.target_dir, space);
        self.initial_distance = motion.real_pos.distance(session.target_pos);
    }

    fn inject_resetting(&mut self, session: &ResetSession, motion: &MotionState) -> ResetStep {
        let (position_error, heading_error) = Self::errors(session, motion);
        let complete =
            position_error < self.position_tolerance && heading_error < self.heading_tolerance_deg;

        let walked = if self.initial_distance > 0.0 {
            (1.0 - position_error / self.initial_distance).clamp(0.0, 1.0)
        } else {
            1.0
        };
        let turned = 1.0 - heading_error / HALF_TURN_DEG;

        ResetStep {
            rotation_deg: -motion.delta_dir,
            suppress_translation: true,
            progress: if complete { 1.0 } else { 0.5 * (walked + turned) },
            complete,
        }
    }

    fn finalize_reset(&mut self, _session: &ResetSession) {
        self.initial_distance = 0.0;
    }

    fn simulated_walker_update(
        &self,
        session: &ResetSession,
        motion: &MotionState,
    ) -> WalkerCommand {
        let to_target = session.target_pos - motion.real_pos;
        let distance = to_target.length();
        let arrived = distance < 0.5 * self.position_tolerance;

        let facing = if arrived {
            session.target_dir
        } else {
            heading(to_target)
        };
        let off_by = signed_angle_deg(motion.real_dir, facing);
        let turn_deg = off_by.clamp(-self.turn_speed_deg, self.turn_speed_deg);

        // Only walk once lined up with the target.
        let aligned = (off_by - turn_deg).abs() < 0.5 * self.heading_tolerance_deg;
        let advance = if !arrived && aligned {
            self.step.min(distance)
        } else {
            0.0
        };
        WalkerCommand { turn_deg, advance }
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::reset::ResetState;

    fn session_at(pos: Vec2, away: Vec2) -> ResetSession {
        ResetSession {
            state: ResetState::Active,
            target_pos: pos,
            target_dir: away,
            accumulated_rotation: 0.0,
            progress: 0.0,
            started_at: 0,
            trigger: None,
        }
    }

    #[test]
    fn target_is_placed_inward() {
        let space = PhysicalSpace::rectangle(Vec2::ZERO, Vec2::splat(10.0)).unwrap();
        let mut strategy = ReturnToTarget::from_config(&ResetConfig::default());
        let mut session = session_at(Vec2::new(9.7, 5.0), Vec2::NEG_X);
        let motion = MotionState::at_rest(Vec2::new(9.7, 5.0), Vec2::X);
        strategy.initialize_reset(&mut session, &motion, Some(&space));
        assert_relative_eq!(session.target_pos.x, 8.7, epsilon = 1e-5);
        assert_relative_eq!(session.target_pos.y, 5.0);
    }

    #[test]
    fn target_shrinks_to_stay_on_the_floor() {
        // Narrow 1.2 m room: a 1 m retreat from 0.3 m off one wall would
        // land 0.1 m past the other.
        let space = PhysicalSpace::rectangle(Vec2::ZERO, Vec2::new(1.2, 10.0)).unwrap();
        let mut strategy = ReturnToTarget::from_config(&ResetConfig::default());
        let mut session = session_at(Vec2::new(0.3, 5.0), Vec2::X);
        let motion = MotionState::at_rest(Vec2::new(0.3, 5.0), Vec2::NEG_X);
        strategy.initialize_reset(&mut session, &motion, Some(&space));
        assert!(space.contains(session.target_pos));
        assert_relative_eq!(session.target_pos.x, 0.8, epsilon = 1e-5);
    }

    #[test]
    fn virtual_pose_is_frozen_while_active() {
        let mut strategy = ReturnToTarget::from_config(&ResetConfig::default());
        let session = session_at(Vec2::new(8.7, 5.0), Vec2::NEG_X);
        let motion = MotionState::at_rest(Vec2::new(9.7, 5.0), Vec2::X).with_delta_dir(12.0);
        let step = strategy.inject_resetting(&session, &motion);
        assert_eq!(step.rotation_deg, -12.0);
        assert!(step.suppress_translation);
        assert!(!step.complete);
    }

    #[test]
    fn completes_within_tolerances() {
        let mut strategy = ReturnToTarget::from_config(&ResetConfig::default());
        let session = session_at(Vec2::new(8.7, 5.0), Vec2::NEG_X);
        let close = MotionState::at_rest(Vec2::new(8.75, 5.05), Vec2::new(-1.0, 0.05));
        let step = strategy.inject_resetting(&session, &close);
        assert!(step.complete);
        assert_eq!(step.progress, 1.0);

        let wrong_way = MotionState::at_rest(Vec2::new(8.75, 5.0), Vec2::Y);
        assert!(!strategy.inject_resetting(&session, &wrong_way).complete);
    }

    #[test]
    fn walker_turns_before_walking() {
        let strategy = ReturnToTarget::from_config(&ResetConfig::default());
        let session = session_at(Vec2::new(8.7, 5.0), Vec2::NEG_X);
        let facing_wall = MotionState::at_rest(Vec2::new(9.7, 5.0), Vec2::X);
        let cmd = strategy.simulated_walker_update(&session, &facing_wall);
        assert_eq!(cmd.turn_deg.abs(), 10.0);
        assert_eq!(cmd.advance, 0.0);

        let facing_target = MotionState::at_rest(Vec2::new(9.7, 5.0), Vec2::NEG_X);
        let cmd = strategy.simulated_walker_update(&session, &facing_target);
        assert_relative_eq!(cmd.turn_deg, 0.0);
        assert_relative_eq!(cmd.advance, 0.05);
    }
}
