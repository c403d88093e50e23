use glam::IVec2;

pub mod dda;

pub use dda::raycast_dda;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct RayHit2D {
    /// Grid cell that stopped the ray. May lie outside the map when the ray
    /// ran off its edge.
    pub cell: IVec2,
    /// Distance from the ray origin to the cell boundary hit (world units).
    pub hit_distance: f32,
}

impl RayHit2D {
    /// Extract hit distance, or return `default` if miss.
    pub fn distance_or(hit: Option<Self>, default: f32) -> f32 {
        hit.map(|h| h.hit_distance).unwrap_or(default)
    }
}
