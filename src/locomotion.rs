//! Reference real-to-virtual mapping.
//!
//! Hosts usually own this part themselves. The integrator here is what the
//! playback tests and the simulated walker drive: it turns tracked real poses
//! into [`MotionState`]s and applies a [`TickReport`] to the virtual pose.

use glam::Vec2;

use crate::controller::TickReport;
use crate::types::MotionState;
use crate::types::geometry::{heading, rotate_deg, signed_angle_deg};

/// Wrap degrees into `(-180, 180]`.
fn wrap_deg(degrees: f32) -> f32 {
    let wrapped = (degrees + 180.0).rem_euclid(360.0) - 180.0;
    if wrapped == -180.0 { 180.0 } else { wrapped }
}

#[derive(Debug, Clone)]
pub struct LocomotionIntegrator {
    real_pos: Vec2,
    real_dir: Vec2,
    virtual_pos: Vec2,
    /// Rotation from the real frame to the virtual frame (degrees).
    frame_deg: f32,
    last: MotionState,
}

impl LocomotionIntegrator {
    /// Real and virtual poses start aligned.
    pub fn new(pos: Vec2, dir: Vec2) -> Self {
        let last = MotionState::at_rest(pos, dir);
        Self {
            real_pos: pos,
            real_dir: last.real_dir,
            virtual_pos: pos,
            frame_deg: 0.0,
            last,
        }
    }

    pub fn virtual_pos(&self) -> Vec2 {
        self.virtual_pos
    }

    pub fn virtual_dir(&self) -> Vec2 {
        rotate_deg(self.real_dir, self.frame_deg)
    }

    /// Rotation between the real and virtual frames (degrees).
    pub fn frame_offset_deg(&self) -> f32 {
        self.frame_deg
    }

    /// Latest motion state, virtual pose included.
    pub fn motion(&self) -> &MotionState {
        &self.last
    }

    /// Record a new tracked real pose. The returned state carries this tick's
    /// real deltas and the virtual pose from before [`Self::remap`].
    pub fn track(&mut self, real_pos: Vec2, real_dir: Vec2) -> MotionState {
        let real_dir = heading(real_dir);
        let delta_pos = real_pos - self.real_pos;
        let delta_dir = signed_angle_deg(self.real_dir, real_dir);
        let virtual_before = self.virtual_dir();

        self.real_pos = real_pos;
        self.real_dir = real_dir;
        self.last = MotionState {
            real_pos,
            real_dir,
            delta_pos,
            delta_dir,
            virtual_pos: self.virtual_pos,
            virtual_dir: virtual_before,
        };
        self.last
    }

    /// Map the last tracked deltas into virtual space.
    ///
    /// Outside a reset rotation and translation are scaled by the active
    /// gains. During a reset the user's rotation passes through unscaled plus
    /// whatever the strategy injected, and translation is passed through or
    /// dropped as the strategy asked.
    pub fn remap(&mut self, report: &TickReport) -> MotionState {
        let motion = self.last;
        let (rotation, translation_scale) = if report.reset_active {
            let scale = if report.suppress_translation { 0.0 } else { 1.0 };
            (motion.delta_dir + report.injected_rotation_deg, scale)
        } else {
            (
                motion.delta_dir * report.gain.rotation_gain,
                report.gain.translation_gain,
            )
        };

        // Translation happens in the frame the user was in before turning.
        self.virtual_pos += rotate_deg(motion.delta_pos, self.frame_deg) * translation_scale;
        self.frame_deg = wrap_deg(self.frame_deg + rotation - motion.delta_dir);

        self.last.virtual_pos = self.virtual_pos;
        self.last.virtual_dir = self.virtual_dir();
        self.last
    }
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::config::SessionConfig;
    use crate::controller::{RdwController, TickInput};
    use crate::gain::{GainProfile, GainUpdate, PathContext};
    use crate::reset::ResetState;
    use crate::space::{PhysicalSpace, UserId};

    fn report(gain: GainProfile) -> TickReport {
        TickReport {
            tick: 0,
            context: PathContext::OnStraightPath,
            gain,
            gain_update: GainUpdate::Unchanged,
            reset_state: ResetState::Idle,
            reset_active: false,
            injected_rotation_deg: 0.0,
            suppress_translation: false,
            triggered: None,
            finalized: false,
        }
    }

    #[test]
    fn deltas_are_signed() {
        let mut integrator = LocomotionIntegrator::new(Vec2::ZERO, Vec2::X);
        let motion = integrator.track(Vec2::new(0.1, 0.0), Vec2::Y);
        assert_relative_eq!(motion.delta_dir, 90.0, epsilon = 1e-4);
        assert_relative_eq!(motion.delta_pos.x, 0.1);

        let motion = integrator.track(Vec2::new(0.1, 0.0), Vec2::X);
        assert_relative_eq!(motion.delta_dir, -90.0, epsilon = 1e-4);
    }

    #[test]
    fn zero_heading_has_no_turn() {
        let mut integrator = LocomotionIntegrator::new(Vec2::ZERO, Vec2::X);
        let motion = integrator.track(Vec2::ZERO, Vec2::ZERO);
        assert_eq!(motion.delta_dir, 0.0);
        assert_eq!(motion.real_dir, Vec2::ZERO);
    }

    #[test]
    fn gains_scale_virtual_motion() {
        let mut integrator = LocomotionIntegrator::new(Vec2::ZERO, Vec2::X);
        integrator.track(Vec2::new(1.0, 0.0), Vec2::from_angle(10f32.to_radians()));
        let motion = integrator.remap(&report(GainProfile::new(1.5, 2.0, 0.4)));

        assert_relative_eq!(motion.virtual_pos.x, 2.0, epsilon = 1e-5);
        let virtual_angle = motion.virtual_dir.y.atan2(motion.virtual_dir.x).to_degrees();
        assert_relative_eq!(virtual_angle, 15.0, epsilon = 1e-3);
    }

    #[test]
    fn two_one_turn_leaves_virtual_heading_unchanged() {
        let config = SessionConfig::from_yaml_str(
            "space:\n  boundary: [[0, 0], [10, 0], [10, 10], [0, 10]]\n",
        )
        .unwrap();
        let space = PhysicalSpace::from_config(&config.space).unwrap();
        let mut controller = RdwController::from_config(&config, UserId(0));
        let mut integrator = LocomotionIntegrator::new(Vec2::new(9.7, 5.0), Vec2::X);

        let mut angle = 0.0f32;
        for _ in 0..30 {
            let motion =
                integrator.track(Vec2::new(9.7, 5.0), Vec2::from_angle(angle.to_radians()));
            let report = controller.tick(TickInput {
                motion: Some(&motion),
                space: Some(&space),
                ..TickInput::default()
            });
            integrator.remap(&report);
            if report.reset_state == ResetState::Ending {
                break;
            }
            if report.reset_active {
                angle += 20.0;
            }
        }

        assert_eq!(controller.resets().state(), ResetState::Ending);
        // Real heading turned around, virtual heading went full circle.
        let real = integrator.motion().real_dir;
        assert_relative_eq!(real.x, -1.0, epsilon = 1e-4);
        let virtual_dir = integrator.virtual_dir();
        assert_relative_eq!(virtual_dir.x, 1.0, epsilon = 1e-4);
        assert_relative_eq!(virtual_dir.y, 0.0, epsilon = 1e-3);
    }
}
