//! Grayscale previews of where a user can and cannot walk.

use glam::UVec2;
use image::{GrayImage, Luma};

use crate::grid::WalkableGrid;
use crate::space::PhysicalSpace;
use crate::types::{OCCUPIED, RdwError};

/// Walkable floor.
pub const WALKABLE_GRAY: u8 = 255;
/// Blocked: a wall, an obstacle or an occupied map cell.
pub const BLOCKED_GRAY: u8 = 0;
/// No surface information, or outside the tracked boundary.
pub const UNMAPPED_GRAY: u8 = 128;

/// Render a walkable grid as a two-tone map.
///
/// Walkable cells are white and `OCCUPIED` cells black. Every other value,
/// `UNKNOWN` included, is mid-gray. Row 0 of the grid is the bottom row of
/// the image, matching the map loader.
pub fn walkable_grid_to_image(grid: &WalkableGrid) -> GrayImage {
    let height = grid.info().height;
    GrayImage::from_fn(grid.info().width, height, |x, y_img| {
        let cell = UVec2::new(x, height - 1 - y_img);
        let gray = if grid.is_walkable_cell(cell.as_ivec2()) {
            WALKABLE_GRAY
        } else if grid.get(cell) == Some(OCCUPIED) {
            BLOCKED_GRAY
        } else {
            UNMAPPED_GRAY
        };
        Luma([gray])
    })
}

/// Render a physical space: free floor white, obstacles black, and the area
/// of the bounding box outside the boundary gray.
pub fn space_preview(space: &PhysicalSpace, resolution: f32) -> Result<GrayImage, RdwError> {
    let grid = space.rasterize(resolution)?;
    let height = grid.info().height;
    Ok(GrayImage::from_fn(grid.info().width, height, |x, y_img| {
        let cell = UVec2::new(x, height - 1 - y_img);
        let gray = if grid.is_walkable_cell(cell.as_ivec2()) {
            WALKABLE_GRAY
        } else if space.boundary().contains(grid.cells().cell_center(cell)) {
            BLOCKED_GRAY
        } else {
            UNMAPPED_GRAY
        };
        Luma([gray])
    }))
}
