//! Closed-loop runs: a simulated walker drives the controller through the
//! reference locomotion integrator, the way a host application would.

use approx::assert_relative_eq;
use glam::Vec2;

use rdw_guard::config::ResetConfig;
use rdw_guard::reset::{ResetKind, ResetState};
use rdw_guard::space::UserId;
use rdw_guard::{
    LocomotionIntegrator, PhysicalSpace, RdwController, SessionConfig, SimulatedWalker,
    TickInput, TickReport,
};

struct Playback {
    space: PhysicalSpace,
    walker: SimulatedWalker,
    integrator: LocomotionIntegrator,
    controller: RdwController,
}

impl Playback {
    fn new(strategy: ResetKind) -> Self {
        let mut config =
            SessionConfig::from_yaml_str("space:\n  boundary: [[0, 0], [10, 0], [10, 10], [0, 10]]\n")
                .unwrap();
        config.reset = ResetConfig {
            strategy,
            ..ResetConfig::default()
        };
        let start = Vec2::splat(5.0);
        Self {
            space: PhysicalSpace::from_config(&config.space).unwrap(),
            walker: SimulatedWalker::new(start, Vec2::X, 0.05),
            integrator: LocomotionIntegrator::new(start, Vec2::X),
            controller: RdwController::from_config(&config, UserId(0)),
        }
    }

    fn step(&mut self) -> TickReport {
        let motion = self
            .integrator
            .track(self.walker.pos(), self.walker.dir());
        let report = self.controller.tick(TickInput {
            motion: Some(&motion),
            space: Some(&self.space),
            ..TickInput::default()
        });
        self.integrator.remap(&report);
        let command = report
            .reset_active
            .then(|| self.controller.resets().simulated_walker_update(&motion));
        self.walker.step(command);
        report
    }
}

#[test]
fn two_one_turn_keeps_walker_inside() {
    let mut playback = Playback::new(ResetKind::TwoOneTurn);
    for _ in 0..1000 {
        playback.step();
        assert!(
            playback.space.contains(playback.walker.pos()),
            "walker left the room at {:?}",
            playback.walker.pos()
        );
    }
    assert!(playback.controller.resets().completed_resets() >= 2);
}

#[test]
fn return_to_target_keeps_walker_inside() {
    let mut playback = Playback::new(ResetKind::ReturnToTarget);
    for _ in 0..1000 {
        playback.step();
        assert!(playback.space.contains(playback.walker.pos()));
    }
    assert!(playback.controller.resets().completed_resets() >= 2);
}

#[test]
fn return_to_target_freezes_virtual_pose() {
    let mut playback = Playback::new(ResetKind::ReturnToTarget);

    let mut frozen = None;
    for _ in 0..400 {
        let report = playback.step();
        if report.triggered.is_some() {
            let motion = playback.integrator.motion();
            frozen = Some((motion.virtual_pos, motion.virtual_dir));
        }
        if report.reset_state == ResetState::Ending {
            break;
        }
    }

    let (pos, dir) = frozen.expect("a reset should have started");
    assert_eq!(
        playback.controller.resets().state(),
        ResetState::Ending
    );
    let motion = playback.integrator.motion();
    assert_relative_eq!(motion.virtual_pos.x, pos.x, epsilon = 1e-5);
    assert_relative_eq!(motion.virtual_pos.y, pos.y, epsilon = 1e-5);
    assert_relative_eq!(motion.virtual_dir.x, dir.x, epsilon = 1e-3);
    assert_relative_eq!(motion.virtual_dir.y, dir.y, epsilon = 1e-3);

    // The walker physically turned around and stepped back from the wall.
    assert!(playback.walker.dir().x < -0.95);
    assert!(playback.walker.pos().x < 9.0);
}

#[test]
fn guidance_tracks_progress() {
    let mut playback = Playback::new(ResetKind::TwoOneTurn);
    let mut last_progress = None;
    for _ in 0..400 {
        let report = playback.step();
        if let Some(guidance) = playback.controller.guidance() {
            if let Some(previous) = last_progress {
                assert!(guidance.progress >= previous);
            }
            last_progress = Some(guidance.progress);
        }
        if report.reset_state == ResetState::Ending {
            break;
        }
    }
    assert_relative_eq!(last_progress.unwrap(), 1.0, epsilon = 1e-4);
}
