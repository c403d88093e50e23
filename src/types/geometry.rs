//! Planar geometry shared by the predictor, the physical space and the grid.
//!
//! Everything lives on the ground plane: positions are meters, headings are
//! 2D vectors that are either unit length or exactly zero ("no heading").

use glam::Vec2;

use crate::types::{DEGENERATE_LENGTH_SQ, RdwError};

/// 2D cross product (z component of the 3D cross).
#[inline]
pub fn cross(a: Vec2, b: Vec2) -> f32 {
    a.perp_dot(b)
}

/// True if `v` is too short to carry a direction.
#[inline]
pub fn is_degenerate(v: Vec2) -> bool {
    v.length_squared() <= DEGENERATE_LENGTH_SQ
}

/// Unsigned angle between two vectors in degrees, or `None` if either is zero.
pub fn angle_between_deg(a: Vec2, b: Vec2) -> Option<f32> {
    if is_degenerate(a) || is_degenerate(b) {
        return None;
    }
    Some(a.perp_dot(b).abs().atan2(a.dot(b)).to_degrees())
}

/// Signed angle from `from` to `to` in degrees (counter-clockwise positive).
/// Zero when either vector has no direction.
pub fn signed_angle_deg(from: Vec2, to: Vec2) -> f32 {
    if is_degenerate(from) || is_degenerate(to) {
        return 0.0;
    }
    from.perp_dot(to).atan2(from.dot(to)).to_degrees()
}

/// Rotate `v` counter-clockwise by `degrees`.
#[inline]
pub fn rotate_deg(v: Vec2, degrees: f32) -> Vec2 {
    Vec2::from_angle(degrees.to_radians()).rotate(v)
}

/// Heading for `v`: normalized, or zero when `v` is degenerate.
#[inline]
pub fn heading(v: Vec2) -> Vec2 {
    if is_degenerate(v) { Vec2::ZERO } else { v.normalize() }
}

/// World-axis-aligned rectangle in meters.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds {
    pub min: Vec2,
    pub max: Vec2,
}

impl Bounds {
    /// Bounds that contain nothing; expand from here.
    pub fn empty() -> Self {
        Self {
            min: Vec2::new(f32::INFINITY, f32::INFINITY),
            max: Vec2::new(f32::NEG_INFINITY, f32::NEG_INFINITY),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    pub fn expand_to_include(&mut self, p: Vec2) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn expand_by(&mut self, margin: f32) {
        self.min -= Vec2::splat(margin);
        self.max += Vec2::splat(margin);
    }

    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.min.x && p.x <= self.max.x && p.y >= self.min.y && p.y <= self.max.y
    }
}

/// One polygon edge `p -> q`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub p: Vec2,
    pub q: Vec2,
}

impl Segment {
    pub fn new(p: Vec2, q: Vec2) -> Self {
        Self { p, q }
    }

    #[inline]
    pub fn direction(&self) -> Vec2 {
        self.q - self.p
    }

    pub fn is_degenerate(&self) -> bool {
        is_degenerate(self.direction())
    }

    /// True if `point` projects onto the segment (both endpoint dot tests).
    pub fn projects_inside(&self, point: Vec2) -> bool {
        let dir = self.direction();
        (point - self.p).dot(dir) >= 0.0 && (point - self.q).dot(-dir) >= 0.0
    }

    /// Closest point on the segment to `point`.
    pub fn closest_point(&self, point: Vec2) -> Vec2 {
        let dir = self.direction();
        let len_sq = dir.length_squared();
        if len_sq <= DEGENERATE_LENGTH_SQ {
            return self.p;
        }
        let t = ((point - self.p).dot(dir) / len_sq).clamp(0.0, 1.0);
        self.p + dir * t
    }

    pub fn distance_to(&self, point: Vec2) -> f32 {
        self.closest_point(point).distance(point)
    }

    /// True if the two segments cross at a single interior point. Segments
    /// that only touch (shared endpoint, T-junction, collinear overlap) do
    /// not count.
    pub fn crosses(&self, other: &Segment) -> bool {
        let d = self.direction();
        let e = other.direction();
        let o1 = cross(d, other.p - self.p);
        let o2 = cross(d, other.q - self.p);
        let o3 = cross(e, self.p - other.p);
        let o4 = cross(e, self.q - other.p);
        o1 * o2 < 0.0 && o3 * o4 < 0.0
    }
}

/// Closed polygon; the edge from the last point back to the first is implied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Polygon {
    pub points: Vec<Vec2>,
}

impl Polygon {
    pub fn new(points: Vec<Vec2>) -> Self {
        Self { points }
    }

    /// Build from `[x, y]` pairs and check it forms a usable ring.
    pub fn try_from_pairs(pairs: &[[f32; 2]]) -> Result<Self, RdwError> {
        let polygon = Self::new(pairs.iter().map(|p| Vec2::from_array(*p)).collect());
        polygon.validate()?;
        Ok(polygon)
    }

    /// Axis-aligned rectangle, counter-clockwise from `min`.
    pub fn rectangle(min: Vec2, max: Vec2) -> Self {
        Self::new(vec![
            min,
            Vec2::new(max.x, min.y),
            max,
            Vec2::new(min.x, max.y),
        ])
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// At least three vertices; anything less has no interior.
    pub fn is_valid(&self) -> bool {
        self.points.len() >= 3
    }

    pub fn validate(&self) -> Result<(), RdwError> {
        if !self.is_valid() {
            return Err(RdwError::InvalidGeometry(format!(
                "polygon needs at least 3 vertices, got {}",
                self.points.len()
            )));
        }
        if self.points.iter().any(|p| !p.is_finite()) {
            return Err(RdwError::InvalidGeometry(
                "polygon has non-finite vertices".to_string(),
            ));
        }
        if self.signed_area().abs() <= f32::EPSILON {
            return Err(RdwError::InvalidGeometry(
                "polygon has zero area".to_string(),
            ));
        }
        if let Some((i, j)) = self.first_self_crossing() {
            return Err(RdwError::InvalidGeometry(format!(
                "polygon edges {i} and {j} cross each other"
            )));
        }
        Ok(())
    }

    /// No two non-adjacent edges cross.
    pub fn is_simple(&self) -> bool {
        self.first_self_crossing().is_none()
    }

    fn first_self_crossing(&self) -> Option<(usize, usize)> {
        let n = self.points.len();
        let edges: Vec<Segment> = self.edges().collect();
        for i in 0..n {
            // Skip the neighbour after `i`, and the closing edge when `i == 0`.
            for j in (i + 2)..n {
                if i == 0 && j == n - 1 {
                    continue;
                }
                if edges[i].crosses(&edges[j]) {
                    return Some((i, j));
                }
            }
        }
        None
    }

    /// All edges including the closing one, degenerate ones included.
    pub fn edges(&self) -> impl Iterator<Item = Segment> + '_ {
        let n = self.points.len();
        (0..n).map(move |i| Segment::new(self.points[i], self.points[(i + 1) % n]))
    }

    /// Shoelace area; positive for counter-clockwise rings.
    pub fn signed_area(&self) -> f32 {
        0.5 * self.edges().map(|e| cross(e.p, e.q)).sum::<f32>()
    }

    pub fn bounds(&self) -> Bounds {
        let mut bounds = Bounds::empty();
        for p in &self.points {
            bounds.expand_to_include(*p);
        }
        bounds
    }

    /// Even-odd point containment. Points exactly on an edge may go either way.
    pub fn contains(&self, point: Vec2) -> bool {
        let mut inside = false;
        for edge in self.edges() {
            let (a, b) = (edge.p, edge.q);
            if (a.y > point.y) != (b.y > point.y) {
                let x = a.x + (point.y - a.y) * (b.x - a.x) / (b.y - a.y);
                if point.x < x {
                    inside = !inside;
                }
            }
        }
        inside
    }
}
