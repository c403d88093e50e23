//! Physical tracking space and co-located users.

use glam::Vec2;

use crate::config::SpaceConfig;
use crate::grid::WalkableGrid;
use crate::types::{Bounds, MapInfo, OCCUPIED, Polygon, RdwError};

/// The room the user physically walks in: one boundary ring and the
/// obstacles inside it. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicalSpace {
    boundary: Polygon,
    obstacles: Vec<Polygon>,
}

impl PhysicalSpace {
    /// Build a space. Every ring must be a simple polygon with at least three
    /// vertices, and each obstacle must lie inside the boundary: all of its
    /// vertices inside and none of its edges crossing a boundary edge.
    /// Edges that only touch are not crossings.
    pub fn new(boundary: Polygon, obstacles: Vec<Polygon>) -> Result<Self, RdwError> {
        boundary.validate()?;
        for (i, obstacle) in obstacles.iter().enumerate() {
            obstacle
                .validate()
                .map_err(|e| RdwError::InvalidGeometry(format!("obstacle {i}: {e}")))?;
            if let Some(p) = obstacle.points.iter().find(|p| !boundary.contains(**p)) {
                return Err(RdwError::InvalidGeometry(format!(
                    "obstacle {i} vertex ({}, {}) lies outside the boundary",
                    p.x, p.y
                )));
            }
            let crossing = obstacle
                .edges()
                .find(|edge| boundary.edges().any(|wall| edge.crosses(&wall)));
            if let Some(edge) = crossing {
                return Err(RdwError::InvalidGeometry(format!(
                    "obstacle {i} edge ({}, {}) -> ({}, {}) crosses the boundary",
                    edge.p.x, edge.p.y, edge.q.x, edge.q.y
                )));
            }
        }
        Ok(Self {
            boundary,
            obstacles,
        })
    }

    /// Build without validation. The predictor tolerates degenerate rings, so
    /// this is safe for hand-assembled geometry in tools and tests.
    pub fn new_unchecked(boundary: Polygon, obstacles: Vec<Polygon>) -> Self {
        Self {
            boundary,
            obstacles,
        }
    }

    pub fn from_config(config: &SpaceConfig) -> Result<Self, RdwError> {
        let boundary = Polygon::try_from_pairs(&config.boundary)?;
        let obstacles = config
            .obstacles
            .iter()
            .map(|ring| Polygon::try_from_pairs(ring))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(boundary, obstacles)
    }

    /// Axis-aligned empty room, counter-clockwise from `min`.
    pub fn rectangle(min: Vec2, max: Vec2) -> Result<Self, RdwError> {
        Self::new(Polygon::rectangle(min, max), Vec::new())
    }

    pub fn boundary(&self) -> &Polygon {
        &self.boundary
    }

    pub fn obstacles(&self) -> &[Polygon] {
        &self.obstacles
    }

    /// Boundary first, then every obstacle.
    pub fn polygons(&self) -> impl Iterator<Item = &Polygon> {
        std::iter::once(&self.boundary).chain(self.obstacles.iter())
    }

    pub fn bounds(&self) -> Bounds {
        self.boundary.bounds()
    }

    /// Inside the boundary and outside every obstacle.
    pub fn contains(&self, point: Vec2) -> bool {
        self.boundary.contains(point) && !self.obstacles.iter().any(|o| o.contains(point))
    }

    /// Rasterize the free floor at `resolution` meters per cell.
    ///
    /// Fails with `InvalidGeometry` for a resolution that is not a positive
    /// finite number, or one so fine the grid would exceed
    /// [`MAX_GRID_CELLS`](crate::types::MAX_GRID_CELLS).
    pub fn rasterize(&self, resolution: f32) -> Result<WalkableGrid, RdwError> {
        if !(resolution > 0.0 && resolution.is_finite()) {
            return Err(RdwError::InvalidGeometry(format!(
                "rasterize resolution must be positive, got {resolution}"
            )));
        }
        let bounds = self.bounds();
        let info = MapInfo::covering(bounds.min, bounds.max, resolution);
        let mut grid = WalkableGrid::from_polygons(info, std::slice::from_ref(&self.boundary))?;
        for obstacle in &self.obstacles {
            grid.paint(obstacle, OCCUPIED);
        }
        Ok(grid)
    }
}

/// Identity of a co-located participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct UserId(pub u32);

/// Another participant sharing the tracking space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackedUser {
    pub id: UserId,
    pub real_pos: Vec2,
}

impl TrackedUser {
    pub fn new(id: u32, real_pos: Vec2) -> Self {
        Self {
            id: UserId(id),
            real_pos,
        }
    }
}
