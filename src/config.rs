//! Session configuration, loaded from YAML.
//!
//! ```yaml
//! space:
//!   boundary: [[0, 0], [10, 0], [10, 10], [0, 10]]
//!   obstacles:
//!     - [[4, 4], [6, 4], [6, 6], [4, 6]]
//! gains:
//!   straight: { rotation_gain: 1.0, translation_gain: 1.0, reset_buffer: 0.4 }
//!   cadence_ticks: 5
//! reset:
//!   strategy: two_one_turn
//! ```
//!
//! Every section except `space` is optional and falls back to defaults.

use std::path::Path;

use serde::Deserialize;

use crate::gain::GainProfile;
use crate::reset::ResetKind;
use crate::types::{
    DEFAULT_HEADING_TOLERANCE_DEG, DEFAULT_POSITION_TOLERANCE, RdwError, TOLERANCE_ANGLE_DEG,
};

#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    pub space: SpaceConfig,
    #[serde(default)]
    pub gains: GainConfig,
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub reset: ResetConfig,
}

/// Physical space rings as `[x, y]` pairs in meters.
#[derive(Debug, Clone, Deserialize)]
pub struct SpaceConfig {
    pub boundary: Vec<[f32; 2]>,
    #[serde(default)]
    pub obstacles: Vec<Vec<[f32; 2]>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GainConfig {
    pub straight: GainProfile,
    pub curved: GainProfile,
    pub off_path: GainProfile,
    /// Rotation gain added per `temporarily_boost` call.
    pub boost_increment: f32,
    /// Hard ceiling for boosted rotation gain.
    pub max_rotation_gain: f32,
    /// Reclassify path context every this many ticks.
    #[serde(deserialize_with = "deserialize_non_zero")]
    pub cadence_ticks: u32,
}

impl Default for GainConfig {
    fn default() -> Self {
        Self {
            straight: GainProfile::new(1.0, 1.0, 0.4),
            curved: GainProfile::new(1.3, 1.0, 0.5),
            off_path: GainProfile::new(1.0, 1.0, 0.6),
            boost_increment: 0.1,
            max_rotation_gain: 1.5,
            cadence_ticks: 1,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ClassifierConfig {
    /// Evenly spaced sample directions around the user.
    #[serde(deserialize_with = "deserialize_non_zero")]
    pub sample_directions: u32,
    /// How far walkable surface must continue along a sample ray (meters).
    pub sample_distance: f32,
    /// Open directions at or above which the path counts as curved.
    pub curved_threshold: u32,
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            sample_directions: 8,
            sample_distance: 1.5,
            curved_threshold: 3,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ResetConfig {
    pub strategy: ResetKind,
    pub tolerance_angle_deg: f32,
    /// Minimum ticks between repeated missing-collaborator warnings.
    pub warning_interval_ticks: u64,
    /// Return-to-target: how far inward the target is placed (meters).
    pub retreat_distance: f32,
    pub position_tolerance: f32,
    pub heading_tolerance_deg: f32,
    /// Simulated walker turn rate during a reset (degrees per tick).
    pub walker_turn_speed_deg: f32,
    /// Simulated walker speed during a reset (meters per tick).
    pub walker_step: f32,
}

impl Default for ResetConfig {
    fn default() -> Self {
        Self {
            strategy: ResetKind::TwoOneTurn,
            tolerance_angle_deg: TOLERANCE_ANGLE_DEG,
            warning_interval_ticks: 90,
            retreat_distance: 1.0,
            position_tolerance: DEFAULT_POSITION_TOLERANCE,
            heading_tolerance_deg: DEFAULT_HEADING_TOLERANCE_DEG,
            walker_turn_speed_deg: 10.0,
            walker_step: 0.05,
        }
    }
}

fn deserialize_non_zero<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Deserialize<'de> + PartialEq + Default,
{
    let value = T::deserialize(deserializer)?;
    if value == T::default() {
        Err(serde::de::Error::custom("value must be non-zero"))
    } else {
        Ok(value)
    }
}

impl SessionConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, RdwError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&contents)
    }

    pub fn from_yaml_str(yaml: &str) -> Result<Self, RdwError> {
        let config: SessionConfig = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Cross-field checks serde cannot express.
    pub fn validate(&self) -> Result<(), RdwError> {
        for (name, profile) in [
            ("straight", &self.gains.straight),
            ("curved", &self.gains.curved),
            ("off_path", &self.gains.off_path),
        ] {
            profile.validate(&format!("gains.{name}"))?;
            if profile.rotation_gain > self.gains.max_rotation_gain {
                return Err(RdwError::InvalidConfig(format!(
                    "gains.{name}: rotation gain {} exceeds max_rotation_gain {}",
                    profile.rotation_gain, self.gains.max_rotation_gain
                )));
            }
        }
        if self.gains.boost_increment < 0.0 {
            return Err(RdwError::InvalidConfig(
                "gains.boost_increment must not be negative".to_string(),
            ));
        }
        if self.classifier.curved_threshold > self.classifier.sample_directions {
            return Err(RdwError::InvalidConfig(format!(
                "classifier.curved_threshold {} exceeds sample_directions {}",
                self.classifier.curved_threshold, self.classifier.sample_directions
            )));
        }
        if self.classifier.sample_distance <= 0.0 {
            return Err(RdwError::InvalidConfig(
                "classifier.sample_distance must be positive".to_string(),
            ));
        }
        let reset = &self.reset;
        if !(0.0..90.0).contains(&reset.tolerance_angle_deg) {
            return Err(RdwError::InvalidConfig(format!(
                "reset.tolerance_angle_deg must be in [0, 90), got {}",
                reset.tolerance_angle_deg
            )));
        }
        if reset.position_tolerance <= 0.0
            || reset.heading_tolerance_deg <= 0.0
            || reset.walker_turn_speed_deg <= 0.0
        {
            return Err(RdwError::InvalidConfig(
                "reset tolerances and walker turn speed must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const MINIMAL: &str = "space:\n  boundary: [[0, 0], [10, 0], [10, 10], [0, 10]]\n";

    #[test]
    fn minimal_config_uses_defaults() {
        let config = SessionConfig::from_yaml_str(MINIMAL).unwrap();
        assert_eq!(config.space.boundary.len(), 4);
        assert!(config.space.obstacles.is_empty());
        assert_eq!(config.gains.cadence_ticks, 1);
        assert_eq!(config.reset.strategy, ResetKind::TwoOneTurn);
        assert_eq!(config.classifier.sample_directions, 8);
    }

    #[test]
    fn zero_cadence_is_rejected() {
        let yaml = format!("{MINIMAL}gains:\n  cadence_ticks: 0\n");
        assert!(matches!(
            SessionConfig::from_yaml_str(&yaml),
            Err(RdwError::Yaml(_))
        ));
    }

    #[test]
    fn profile_above_max_gain_is_rejected() {
        let yaml = format!(
            "{MINIMAL}gains:\n  max_rotation_gain: 1.2\n  curved: {{ rotation_gain: 1.4, translation_gain: 1.0, reset_buffer: 0.5 }}\n"
        );
        assert!(matches!(
            SessionConfig::from_yaml_str(&yaml),
            Err(RdwError::InvalidConfig(_))
        ));
    }

    #[test]
    fn threshold_above_direction_count_is_rejected() {
        let yaml = format!("{MINIMAL}classifier:\n  sample_directions: 4\n  curved_threshold: 5\n");
        assert!(SessionConfig::from_yaml_str(&yaml).is_err());
    }

    #[test]
    fn strategy_names_are_snake_case() {
        let yaml = format!("{MINIMAL}reset:\n  strategy: return_to_target\n");
        let config = SessionConfig::from_yaml_str(&yaml).unwrap();
        assert_eq!(config.reset.strategy, ResetKind::ReturnToTarget);
    }
}
