use glam::{UVec2, Vec2};

use crate::types::{MAX_GRID_CELLS, MapInfo, RdwError};

#[derive(Debug, Clone)]
pub struct Grid2d<T> {
    info: MapInfo,
    data: Vec<T>,
}

impl<T> Grid2d<T> {
    pub fn new(info: MapInfo, data: Vec<T>) -> Result<Self, RdwError> {
        let expected_len = cell_count(&info)?;
        if data.len() != expected_len {
            return Err(RdwError::InvalidGeometry(format!(
                "data length {} does not match map size {}",
                data.len(),
                expected_len
            )));
        }

        Ok(Self { info, data })
    }

    /// Grid with every cell set to `value`. The map size is checked before
    /// anything is allocated.
    pub fn filled(info: MapInfo, value: T) -> Result<Self, RdwError>
    where
        T: Clone,
    {
        let len = cell_count(&info)?;
        Ok(Self {
            info,
            data: vec![value; len],
        })
    }

    pub fn info(&self) -> &MapInfo {
        &self.info
    }

    pub fn width(&self) -> u32 {
        self.info.width
    }

    pub fn height(&self) -> u32 {
        self.info.height
    }

    pub fn get(&self, pos: UVec2) -> Option<&T> {
        if pos.x >= self.info.width || pos.y >= self.info.height {
            return None;
        }
        let idx = self.index(pos);
        Some(&self.data[idx])
    }

    pub fn set(&mut self, pos: UVec2, value: T) -> Result<(), RdwError> {
        if pos.x >= self.info.width || pos.y >= self.info.height {
            return Err(RdwError::OutOfBounds(format!(
                "cell ({}, {}) out of bounds for map {}x{}",
                pos.x, pos.y, self.info.width, self.info.height
            )));
        }
        let idx = self.index(pos);
        self.data[idx] = value;
        Ok(())
    }

    fn index(&self, pos: UVec2) -> usize {
        (pos.y as usize) * (self.info.width as usize) + (pos.x as usize)
    }

    /// Continuous map coordinates to world coordinates.
    pub fn map_to_world(&self, pos: Vec2) -> Vec2 {
        self.info.origin + pos * self.info.resolution
    }

    /// World coordinates to continuous map coordinates, `None` if off the map.
    pub fn world_to_map(&self, pos: Vec2) -> Option<Vec2> {
        let m = (pos - self.info.origin) / self.info.resolution;
        if m.x < 0.0 || m.y < 0.0 || m.x >= self.info.width as f32 || m.y >= self.info.height as f32
        {
            return None;
        }
        Some(m)
    }

    /// World position of the centre of `cell`.
    pub fn cell_center(&self, cell: UVec2) -> Vec2 {
        self.map_to_world(cell.as_vec2() + Vec2::splat(0.5))
    }

    pub fn data(&self) -> &[T] {
        &self.data
    }
}

/// Number of cells `info` describes, or an error for a resolution that is not
/// a positive finite number or a map larger than [`MAX_GRID_CELLS`].
fn cell_count(info: &MapInfo) -> Result<usize, RdwError> {
    if !(info.resolution > 0.0 && info.resolution.is_finite()) {
        return Err(RdwError::InvalidGeometry(format!(
            "resolution must be positive, got {}",
            info.resolution
        )));
    }
    (info.width as usize)
        .checked_mul(info.height as usize)
        .filter(|&len| len <= MAX_GRID_CELLS)
        .ok_or_else(|| {
            RdwError::InvalidGeometry(format!(
                "map of {}x{} cells exceeds the {MAX_GRID_CELLS} cell limit",
                info.width, info.height
            ))
        })
}
