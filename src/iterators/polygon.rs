use glam::{IVec2, UVec2, Vec2};

use crate::Grid2d;

/// Iterator over all grid cells whose centre lies inside a polygon.
///
/// Works for concave rings too: each row is scanned at the cell-centre height
/// and filled between alternate edge crossings (even-odd rule). Points are
/// expected in world coordinates (meters).
pub struct PolygonIterator {
    points: Vec<Vec2>,
    y: i32,
    y_max: i32,
    /// Column spans `[start, end]` still to emit on the current row.
    spans: Vec<(i32, i32)>,
    span: usize,
    grid_size: IVec2,
    cell: IVec2,
}

impl PolygonIterator {
    pub fn new<T>(grid: &Grid2d<T>, points: &[Vec2]) -> Option<Self> {
        if points.len() < 3 {
            return None;
        }
        let info = grid.info();
        let resolution = info.resolution;
        let origin = info.origin;
        let map_points = points.iter().map(|p| (*p - origin) / resolution).collect();
        Some(Self::new_map(map_points, info.width, info.height))
    }

    fn new_map(points: Vec<Vec2>, width: u32, height: u32) -> Self {
        let (min_y, max_y) = points
            .iter()
            .fold((f32::INFINITY, f32::NEG_INFINITY), |(min_y, max_y), p| {
                (min_y.min(p.y), max_y.max(p.y))
            });
        let grid_size = IVec2::new(width as i32, height as i32);
        let y_min = (min_y.floor() as i32).max(0);
        let y_max = (max_y.ceil() as i32).min(grid_size.y - 1);

        Self {
            points,
            y: y_min - 1,
            y_max,
            spans: Vec::new(),
            span: 0,
            grid_size,
            cell: IVec2::ZERO,
        }
    }

    /// Move to the next row that has at least one span. Returns false when done.
    fn advance_row(&mut self) -> bool {
        while self.y < self.y_max {
            self.y += 1;
            self.spans.clear();
            self.span = 0;

            let y_scan = self.y as f32 + 0.5;
            let mut xs = Vec::with_capacity(self.points.len());
            let n = self.points.len();
            for i in 0..n {
                let p0 = self.points[i];
                let p1 = self.points[(i + 1) % n];
                // Half-open crossing test: vertices on the scan line count once.
                if (p0.y <= y_scan) != (p1.y <= y_scan) {
                    let t = (y_scan - p0.y) / (p1.y - p0.y);
                    xs.push(p0.x + t * (p1.x - p0.x));
                }
            }
            xs.sort_by(|a, b| a.total_cmp(b));

            for pair in xs.chunks_exact(2) {
                // Cells whose centre x + 0.5 falls in [left, right).
                let x_start = ((pair[0] - 0.5).ceil() as i32).max(0);
                let x_end = ((pair[1] - 0.5).ceil() as i32 - 1).min(self.grid_size.x - 1);
                if x_start <= x_end {
                    self.spans.push((x_start, x_end));
                }
            }

            if !self.spans.is_empty() {
                self.cell = IVec2::new(self.spans[0].0, self.y);
                return true;
            }
        }
        false
    }
}

impl Iterator for PolygonIterator {
    type Item = UVec2;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(&(_, x_end)) = self.spans.get(self.span) {
                if self.cell.x <= x_end {
                    let cell = self.cell.as_uvec2();
                    self.cell.x += 1;
                    return Some(cell);
                }
                self.span += 1;
                if let Some(&(x_start, _)) = self.spans.get(self.span) {
                    self.cell.x = x_start;
                }
                continue;
            }

            if !self.advance_row() {
                return None;
            }
        }
    }
}

impl<T> Grid2d<T> {
    pub fn polygon(&self, points: &[Vec2]) -> Option<PolygonIterator> {
        PolygonIterator::new(self, points)
    }

    /// Set every cell whose centre is inside the polygon. Returns the count.
    pub fn fill_polygon(&mut self, points: &[Vec2], value: T) -> usize
    where
        T: Clone,
    {
        let Some(iter) = PolygonIterator::new(self, points) else {
            return 0;
        };
        let cells: Vec<UVec2> = iter.collect();
        for cell in &cells {
            // Cells come from the iterator, which clamps to the grid.
            let _ = self.set(*cell, value.clone());
        }
        cells.len()
    }
}

#[cfg(test)]
mod tests {
    use glam::{UVec2, Vec2};

    use super::PolygonIterator;
    use crate::Grid2d;
    use crate::types::MapInfo;

    fn grid(size: u32) -> Grid2d<u8> {
        Grid2d::filled(MapInfo::square(size, 1.0), 0).unwrap()
    }

    #[test]
    fn polygon_iter_fills_rectangle() {
        let grid = grid(8);
        let points = vec![
            Vec2::new(1.0, 1.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(4.0, 3.0),
            Vec2::new(1.0, 3.0),
        ];
        let cells: Vec<UVec2> = PolygonIterator::new(&grid, &points).unwrap().collect();
        // Centres at x in {1.5, 2.5, 3.5}, y in {1.5, 2.5}.
        assert_eq!(cells.len(), 6);
        assert!(cells.contains(&UVec2::new(1, 1)));
        assert!(cells.contains(&UVec2::new(3, 2)));
        assert!(!cells.contains(&UVec2::new(4, 1)));
        assert!(!cells.contains(&UVec2::new(1, 3)));
    }

    #[test]
    fn polygon_iter_handles_concave_rings() {
        let grid = grid(10);
        // U shape: two prongs joined at the bottom, notch between x=3..6 above y=3.
        let points = vec![
            Vec2::new(0.0, 0.0),
            Vec2::new(9.0, 0.0),
            Vec2::new(9.0, 9.0),
            Vec2::new(6.0, 9.0),
            Vec2::new(6.0, 3.0),
            Vec2::new(3.0, 3.0),
            Vec2::new(3.0, 9.0),
            Vec2::new(0.0, 9.0),
        ];
        let cells: Vec<UVec2> = PolygonIterator::new(&grid, &points).unwrap().collect();
        assert!(cells.contains(&UVec2::new(1, 5)));
        assert!(cells.contains(&UVec2::new(7, 5)));
        assert!(cells.contains(&UVec2::new(4, 1)));
        assert!(!cells.contains(&UVec2::new(4, 5)));
        assert_eq!(cells.len(), 9 * 9 - 3 * 6);
    }

    #[test]
    fn polygon_iter_clips_to_grid() {
        let grid = grid(4);
        let points = vec![
            Vec2::new(-5.0, -5.0),
            Vec2::new(20.0, -5.0),
            Vec2::new(20.0, 20.0),
            Vec2::new(-5.0, 20.0),
        ];
        assert_eq!(PolygonIterator::new(&grid, &points).unwrap().count(), 16);
    }

    #[test]
    fn fill_polygon_writes_values() {
        let mut grid = grid(8);
        let points = vec![
            Vec2::new(1.0, 1.0),
            Vec2::new(4.0, 1.0),
            Vec2::new(4.0, 3.0),
            Vec2::new(1.0, 3.0),
        ];
        assert_eq!(grid.fill_polygon(&points, 50), 6);

        let cells: Vec<UVec2> = grid.polygon(&points).unwrap().collect();
        for cell in cells {
            assert_eq!(grid.get(cell), Some(&50));
        }
        assert_eq!(grid.get(UVec2::new(0, 0)), Some(&0));
    }

    #[test]
    fn too_few_points_yields_nothing() {
        let grid = grid(4);
        assert!(PolygonIterator::new(&grid, &[Vec2::ZERO, Vec2::ONE]).is_none());
    }
}
