//! Context-driven gain modulation.
//!
//! The modulator owns the one active [`GainProfile`]. The locomotion
//! integrator reads its gains and the collision predictor reads its reset
//! buffer. The profile is a `Copy` value replaced wholesale, so a reader never
//! sees gains from two different profiles.

pub mod classifier;

use glam::Vec2;
use serde::Deserialize;
use tracing::{debug, info};

use crate::config::{ClassifierConfig, GainConfig};
use crate::grid::WalkableQuery;
use crate::timer::Deadline;
use crate::types::RdwError;

pub use classifier::{ContextClassifier, PathContext};

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct GainProfile {
    pub rotation_gain: f32,
    pub translation_gain: f32,
    /// Clearance below which the predictor asks for a reset (meters).
    pub reset_buffer: f32,
}

impl GainProfile {
    pub const fn new(rotation_gain: f32, translation_gain: f32, reset_buffer: f32) -> Self {
        Self {
            rotation_gain,
            translation_gain,
            reset_buffer,
        }
    }

    /// Unit gains, no buffer: real motion passes through and resets never fire.
    pub const fn identity() -> Self {
        Self::new(1.0, 1.0, 0.0)
    }

    /// Reject non-positive gains and a negative buffer. `label` names the
    /// profile in the error, e.g. `gains.curved`.
    pub fn validate(&self, label: &str) -> Result<(), RdwError> {
        if !(self.rotation_gain > 0.0 && self.translation_gain > 0.0) {
            return Err(RdwError::InvalidConfig(format!(
                "{label}: gains must be positive (rotation {}, translation {})",
                self.rotation_gain, self.translation_gain
            )));
        }
        if !(self.reset_buffer >= 0.0) {
            return Err(RdwError::InvalidConfig(format!(
                "{label}: reset buffer must not be negative, got {}",
                self.reset_buffer
            )));
        }
        Ok(())
    }
}

/// One profile per path context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GainProfiles {
    pub straight: GainProfile,
    pub curved: GainProfile,
    pub off_path: GainProfile,
}

impl GainProfiles {
    pub fn for_context(&self, context: PathContext) -> GainProfile {
        match context {
            PathContext::OnStraightPath => self.straight,
            PathContext::OnCurvedPath => self.curved,
            PathContext::OffPath => self.off_path,
        }
    }
}

impl From<&GainConfig> for GainProfiles {
    fn from(config: &GainConfig) -> Self {
        Self {
            straight: config.straight,
            curved: config.curved,
            off_path: config.off_path,
        }
    }
}

/// What happened during one [`GainModulator::update`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GainUpdate {
    /// Not a classification tick.
    Skipped,
    /// Classified, context unchanged.
    Unchanged,
    /// Context changed and the profile was swapped.
    Switched { from: PathContext, to: PathContext },
    /// No environment to query; classification kept.
    NoEnvironment,
}

#[derive(Debug, Clone)]
pub struct GainModulator {
    profiles: GainProfiles,
    classifier: ContextClassifier,
    context: PathContext,
    active: GainProfile,
    cadence_ticks: u64,
    boost_increment: f32,
    max_rotation_gain: f32,
    /// Extra rotation gain from pending boosts.
    boost: f32,
    boost_reversion: Deadline,
}

impl GainModulator {
    pub fn new(gains: &GainConfig, classifier: &ClassifierConfig) -> Self {
        let profiles = GainProfiles::from(gains);
        let context = PathContext::default();
        Self {
            profiles,
            classifier: ContextClassifier::new(classifier),
            context,
            active: profiles.for_context(context),
            cadence_ticks: u64::from(gains.cadence_ticks.max(1)),
            boost_increment: gains.boost_increment,
            max_rotation_gain: gains.max_rotation_gain,
            boost: 0.0,
            boost_reversion: Deadline::new(),
        }
    }

    /// The profile currently in force, boost included.
    pub fn active(&self) -> GainProfile {
        self.active
    }

    pub fn context(&self) -> PathContext {
        self.context
    }

    pub fn profiles(&self) -> &GainProfiles {
        &self.profiles
    }

    pub fn is_boosted(&self) -> bool {
        self.boost_reversion.is_pending()
    }

    /// Run one tick: expire a finished boost, then reclassify on cadence
    /// ticks at `point` (the user's virtual position).
    pub fn update(
        &mut self,
        tick: u64,
        point: Vec2,
        environment: Option<&dyn WalkableQuery>,
    ) -> GainUpdate {
        if self.boost_reversion.fire(tick) {
            debug!(tick, "gain boost expired");
            self.boost = 0.0;
            self.refresh();
        }

        if tick % self.cadence_ticks != 0 {
            return GainUpdate::Skipped;
        }
        let Some(environment) = environment else {
            return GainUpdate::NoEnvironment;
        };

        let detected = self.classifier.classify(point, environment);
        if detected == self.context {
            return GainUpdate::Unchanged;
        }

        let from = self.context;
        self.context = detected;
        self.refresh();
        info!(
            tick,
            ?from,
            to = ?detected,
            rotation_gain = self.active.rotation_gain,
            reset_buffer = self.active.reset_buffer,
            "path context switch"
        );
        GainUpdate::Switched { from, to: detected }
    }

    /// Force a context, e.g. from an external classifier. Same swap rules as
    /// [`Self::update`].
    pub fn set_context(&mut self, context: PathContext) {
        if context != self.context {
            self.context = context;
            self.refresh();
        }
    }

    /// Raise rotation gain by the configured increment (stacking, capped) for
    /// `duration_ticks`. A new boost restarts the reversion timer.
    pub fn temporarily_boost(&mut self, tick: u64, duration_ticks: u64) {
        self.boost += self.boost_increment;
        self.boost_reversion.schedule(tick, duration_ticks);
        self.refresh();
        debug!(
            tick,
            duration_ticks,
            rotation_gain = self.active.rotation_gain,
            "rotation gain boosted"
        );
    }

    /// Rebuild the active profile from context and boost in one assignment.
    fn refresh(&mut self) {
        let base = self.profiles.for_context(self.context);
        // Boosts never push past the cap, and never pull a profile below itself.
        let ceiling = self.max_rotation_gain.max(base.rotation_gain);
        self.active = GainProfile {
            rotation_gain: (base.rotation_gain + self.boost).min(ceiling),
            ..base
        };
    }
}
