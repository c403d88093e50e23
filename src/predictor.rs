//! Boundary, obstacle and co-located user collision prediction.
//!
//! Every tick the predictor answers one question: is the user about to leave
//! the free floor (or walk into somebody) given where they stand and where
//! they are heading? Two tests run against every polygon:
//!
//! - **vertex test**: a corner within `buffer` that lies ahead of the user,
//!   i.e. at an angle below `90° - tolerance` from the heading. Catches walking
//!   straight at a convex corner, which the edge test alone misses.
//! - **edge test**: a segment within `buffer` that the user projects onto and
//!   whose supporting line the heading crosses. Walking parallel to or away
//!   from a wall never triggers.
//!
//! Other users are only checked, with the vertex test, when no polygon fired.

use glam::Vec2;
use tracing::debug;

use crate::space::{PhysicalSpace, TrackedUser, UserId};
use crate::types::geometry::{angle_between_deg, cross, heading, is_degenerate};
use crate::types::{HEADING_CROSS_EPSILON, MotionState, Polygon, Segment, TOLERANCE_ANGLE_DEG};

/// What kind of element triggered a prediction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitKind {
    Vertex,
    Edge,
    User(UserId),
}

/// The offending element closest to the user.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionHit {
    pub kind: HitKind,
    /// Closest offending point in physical space.
    pub point: Vec2,
    pub distance: f32,
    /// Unit vector pointing from the element back toward the user (the
    /// inward normal for an edge). Zero if the user stands on the point.
    pub away: Vec2,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CollisionPredictor {
    /// Margin subtracted from 90° in the vertex heading test.
    pub tolerance_angle_deg: f32,
}

impl Default for CollisionPredictor {
    fn default() -> Self {
        Self {
            tolerance_angle_deg: TOLERANCE_ANGLE_DEG,
        }
    }
}

impl CollisionPredictor {
    pub fn new(tolerance_angle_deg: f32) -> Self {
        Self {
            tolerance_angle_deg,
        }
    }

    /// True if the user must be reset this tick.
    pub fn is_reset_required(
        &self,
        motion: &MotionState,
        space: &PhysicalSpace,
        others: &[TrackedUser],
        buffer: f32,
    ) -> bool {
        self.predict(motion, space, others, buffer).is_some()
    }

    /// Nearest element that requires a reset, if any.
    ///
    /// `others` may contain the user itself; entries at the user's own
    /// position are ignored by the vertex test, and callers are expected to
    /// filter by id (see [`Self::predict_excluding`]).
    pub fn predict(
        &self,
        motion: &MotionState,
        space: &PhysicalSpace,
        others: &[TrackedUser],
        buffer: f32,
    ) -> Option<CollisionHit> {
        if buffer <= 0.0 || is_degenerate(motion.real_dir) {
            return None;
        }
        let pos = motion.real_pos;
        let dir = motion.real_dir;

        let mut nearest: Option<CollisionHit> = None;
        for polygon in space.polygons() {
            if let Some(hit) = self.check_polygon(polygon, pos, dir, buffer) {
                keep_nearest(&mut nearest, hit);
            }
        }
        if nearest.is_some() {
            return nearest;
        }

        for other in others {
            if let Some(mut hit) = self.vertex_hit(other.real_pos, pos, dir, buffer) {
                hit.kind = HitKind::User(other.id);
                keep_nearest(&mut nearest, hit);
            }
        }
        nearest
    }

    /// [`Self::predict`] with the user's own registry entry filtered out.
    pub fn predict_excluding(
        &self,
        motion: &MotionState,
        space: &PhysicalSpace,
        others: &[TrackedUser],
        self_id: UserId,
        buffer: f32,
    ) -> Option<CollisionHit> {
        let others: Vec<TrackedUser> = others.iter().filter(|u| u.id != self_id).copied().collect();
        self.predict(motion, space, &others, buffer)
    }

    fn check_polygon(
        &self,
        polygon: &Polygon,
        pos: Vec2,
        dir: Vec2,
        buffer: f32,
    ) -> Option<CollisionHit> {
        if !polygon.is_valid() {
            debug!(
                vertices = polygon.len(),
                "skipping polygon with too few vertices"
            );
            return None;
        }

        let mut nearest = None;
        for vertex in &polygon.points {
            if let Some(hit) = self.vertex_hit(*vertex, pos, dir, buffer) {
                keep_nearest(&mut nearest, hit);
            }
        }
        for edge in polygon.edges() {
            if let Some(hit) = edge_hit(edge, pos, dir, buffer) {
                keep_nearest(&mut nearest, hit);
            }
        }
        nearest
    }

    /// Point is within `buffer` and ahead of the user.
    fn vertex_hit(&self, point: Vec2, pos: Vec2, dir: Vec2, buffer: f32) -> Option<CollisionHit> {
        let to_point = point - pos;
        let distance = to_point.length();
        if distance > buffer {
            return None;
        }
        // Standing on the point gives no direction to compare against.
        let angle = angle_between_deg(to_point, dir)?;
        if angle < 90.0 - self.tolerance_angle_deg {
            Some(CollisionHit {
                kind: HitKind::Vertex,
                point,
                distance,
                away: heading(-to_point),
            })
        } else {
            None
        }
    }
}

/// Edge within `buffer`, user projects onto it, heading crosses its line.
fn edge_hit(edge: Segment, pos: Vec2, dir: Vec2, buffer: f32) -> Option<CollisionHit> {
    if edge.is_degenerate() || !edge.projects_inside(pos) {
        return None;
    }
    let point = edge.closest_point(pos);
    let distance = point.distance(pos);
    if distance > buffer {
        return None;
    }

    let along = edge.direction();
    let cross_dir = cross(along, dir);
    let cross_pos = cross(along, pos - edge.p);
    if cross_dir.abs() <= HEADING_CROSS_EPSILON || cross_dir * cross_pos >= 0.0 {
        return None;
    }

    // Normal on the user's side of the edge.
    let normal = heading(along.perp());
    let away = if cross_pos >= 0.0 { normal } else { -normal };
    Some(CollisionHit {
        kind: HitKind::Edge,
        point,
        distance,
        away,
    })
}

fn keep_nearest(nearest: &mut Option<CollisionHit>, hit: CollisionHit) {
    if nearest.is_none_or(|n| hit.distance < n.distance) {
        *nearest = Some(hit);
    }
}
