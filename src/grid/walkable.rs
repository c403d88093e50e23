//! Walkable-surface queries and their rasterized implementation.

use glam::{IVec2, UVec2, Vec2};

use crate::grid::Grid2d;
use crate::raycast::raycast_dda;
use crate::types::{FREE, MapInfo, OCCUPIED, Polygon, RdwError};

/// Environment collaborator answering "can the user walk here?".
///
/// Implementations must be cheap and synchronous: the gain modulator calls
/// them a bounded number of times per tick.
pub trait WalkableQuery {
    /// Is there walkable surface under `point`?
    fn sample_walkable(&self, point: Vec2) -> bool;

    /// Does walkable surface continue from `origin` along `direction` for
    /// `max_distance` meters without interruption?
    fn raycast_walkable(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> bool;
}

/// Occupancy-style grid where `FREE` cells are walkable and anything else
/// (`OCCUPIED`, `UNKNOWN`) is not.
#[derive(Debug, Clone)]
pub struct WalkableGrid {
    cells: Grid2d<i8>,
}

impl WalkableGrid {
    pub fn new(info: MapInfo, data: Vec<i8>) -> Result<Self, RdwError> {
        Ok(Self {
            cells: Grid2d::new(info, data)?,
        })
    }

    /// Grid where only the inside of `walkable` polygons is walkable.
    pub fn from_polygons(info: MapInfo, walkable: &[Polygon]) -> Result<Self, RdwError> {
        let mut cells = Grid2d::filled(info, OCCUPIED)?;
        for polygon in walkable {
            cells.fill_polygon(&polygon.points, FREE);
        }
        Ok(Self { cells })
    }

    pub fn cells(&self) -> &Grid2d<i8> {
        &self.cells
    }

    pub fn cells_mut(&mut self) -> &mut Grid2d<i8> {
        &mut self.cells
    }

    pub fn info(&self) -> &MapInfo {
        self.cells.info()
    }

    /// Mark the inside of `polygon` with `value`; returns the cell count.
    pub fn paint(&mut self, polygon: &Polygon, value: i8) -> usize {
        self.cells.fill_polygon(&polygon.points, value)
    }

    #[inline]
    pub fn is_walkable_cell(&self, cell: IVec2) -> bool {
        if cell.x < 0 || cell.y < 0 {
            return false;
        }
        self.cells.get(cell.as_uvec2()) == Some(&FREE)
    }

    pub fn walkable_count(&self) -> usize {
        self.cells.data().iter().filter(|v| **v == FREE).count()
    }

    pub fn get(&self, cell: UVec2) -> Option<i8> {
        self.cells.get(cell).copied()
    }
}

impl WalkableQuery for WalkableGrid {
    fn sample_walkable(&self, point: Vec2) -> bool {
        self.cells
            .world_to_map(point)
            .is_some_and(|m| self.is_walkable_cell(m.floor().as_ivec2()))
    }

    fn raycast_walkable(&self, origin: Vec2, direction: Vec2, max_distance: f32) -> bool {
        raycast_dda(self, origin, direction, max_distance).is_none()
    }
}
