use glam::{IVec2, Vec2};

use crate::grid::WalkableGrid;
use crate::raycast::RayHit2D;

/// Fast voxel traversal (Amanatides & Woo) that returns the first cell that
/// stops a walker: a non-walkable cell or the edge of the map.
///
/// `None` means the ray covered `max_t` meters on walkable cells only.
pub fn raycast_dda(grid: &WalkableGrid, origin: Vec2, dir: Vec2, max_t: f32) -> Option<RayHit2D> {
    let cells = grid.cells();
    let info = cells.info();
    let resolution = info.resolution;

    let Some(start) = cells.world_to_map(origin) else {
        // Starting off the map is never walkable.
        return Some(RayHit2D {
            cell: IVec2::new(-1, -1),
            hit_distance: 0.0,
        });
    };

    // We use ivecs internally as the steps can be negative.
    let mut cell = start.floor().as_ivec2();
    if !grid.is_walkable_cell(cell) {
        return Some(RayHit2D {
            cell,
            hit_distance: 0.0,
        });
    }

    if dir.length_squared() == 0.0 {
        return None;
    }
    let max_t_grid = max_t / resolution;
    let dir = dir.normalize();

    let step = IVec2::new(dir.x.signum() as i32, dir.y.signum() as i32);
    let (t_delta_x, t_max_x) = axis_params(start.x, dir.x);
    let (t_delta_y, t_max_y) = axis_params(start.y, dir.y);

    let mut t_max = Vec2::new(t_max_x, t_max_y);
    let t_delta = Vec2::new(t_delta_x, t_delta_y);

    loop {
        let t;
        if t_max.x < t_max.y {
            t = t_max.x;
            t_max.x += t_delta.x;
            cell.x += step.x;
        } else {
            t = t_max.y;
            t_max.y += t_delta.y;
            cell.y += step.y;
        }

        if t > max_t_grid {
            return None;
        }

        if !grid.is_walkable_cell(cell) {
            return Some(RayHit2D {
                cell,
                hit_distance: t * resolution,
            });
        }
    }
}

fn axis_params(start: f32, dir: f32) -> (f32, f32) {
    if dir == 0.0 {
        return (f32::INFINITY, f32::INFINITY);
    }

    let step = dir.signum();
    let dist_to_boundary = if step > 0.0 {
        1.0 - start.fract()
    } else {
        start.fract()
    };

    let t_delta = (1.0 / dir).abs();
    let t_max = dist_to_boundary * t_delta;
    (t_delta, t_max)
}
