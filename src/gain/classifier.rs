use std::f32::consts::TAU;

use glam::Vec2;

use crate::config::ClassifierConfig;
use crate::grid::WalkableQuery;

/// Local path context of the user in the virtual environment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum PathContext {
    #[default]
    OnStraightPath,
    OnCurvedPath,
    OffPath,
}

/// Classifies path context from a ring of walkable-surface rays.
///
/// Off the walkable surface the context is `OffPath`. On it, a straight
/// corridor leaves only a couple of sample directions open (ahead and behind);
/// bends, junctions and open areas leave more. At least `curved_threshold`
/// open directions out of `sample_directions` means `OnCurvedPath`.
#[derive(Debug, Clone)]
pub struct ContextClassifier {
    directions: Vec<Vec2>,
    sample_distance: f32,
    curved_threshold: usize,
}

impl ContextClassifier {
    pub fn new(config: &ClassifierConfig) -> Self {
        let count = config.sample_directions.max(1);
        let directions = (0..count)
            .map(|i| Vec2::from_angle(TAU * i as f32 / count as f32))
            .collect();
        Self {
            directions,
            sample_distance: config.sample_distance,
            curved_threshold: config.curved_threshold as usize,
        }
    }

    /// Number of sample directions with walkable surface for the full sample distance.
    pub fn open_directions(&self, point: Vec2, query: &dyn WalkableQuery) -> usize {
        self.directions
            .iter()
            .filter(|dir| query.raycast_walkable(point, **dir, self.sample_distance))
            .count()
    }

    pub fn classify(&self, point: Vec2, query: &dyn WalkableQuery) -> PathContext {
        if !query.sample_walkable(point) {
            return PathContext::OffPath;
        }
        if self.open_directions(point, query) >= self.curved_threshold {
            PathContext::OnCurvedPath
        } else {
            PathContext::OnStraightPath
        }
    }
}

impl Default for ContextClassifier {
    fn default() -> Self {
        Self::new(&ClassifierConfig::default())
    }
}
