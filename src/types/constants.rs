/// Walkable cell.
pub const FREE: i8 = 0;
/// Blocked cell (wall, obstacle, no surface).
pub const OCCUPIED: i8 = 100;
/// Cell with no information. Treated as not walkable.
pub const UNKNOWN: i8 = -1;

/// Largest grid (in cells) a map or rasterized space may allocate.
pub const MAX_GRID_CELLS: usize = 1 << 28;

pub const DEFAULT_OCCUPIED_THRESH: f32 = 0.65;
pub const DEFAULT_FREE_THRESH: f32 = 0.196;

/// Angular margin (degrees) subtracted from 90° in the vertex heading test.
pub const TOLERANCE_ANGLE_DEG: f32 = 1.0;
/// Minimum |cross(edge, heading)| for the edge heading test to be decisive.
pub const HEADING_CROSS_EPSILON: f32 = 1e-3;
/// Squared length below which a direction or edge is treated as zero.
pub const DEGENERATE_LENGTH_SQ: f32 = 1e-12;

/// Physical rotation a two-one-turn reset asks of the user.
pub const HALF_TURN_DEG: f32 = 180.0;
/// Residual rotation (degrees) at which a turn counts as complete.
pub const TURN_EPSILON_DEG: f32 = 0.01;

pub const DEFAULT_POSITION_TOLERANCE: f32 = 0.2;
pub const DEFAULT_HEADING_TOLERANCE_DEG: f32 = 8.0;
