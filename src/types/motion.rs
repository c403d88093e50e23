use glam::Vec2;

/// Per-tick motion snapshot produced by the locomotion integrator.
///
/// `real_dir` and `virtual_dir` are unit vectors or exactly zero. `delta_dir`
/// is this tick's real heading change in signed degrees (counter-clockwise
/// positive).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct MotionState {
    pub real_pos: Vec2,
    pub real_dir: Vec2,
    pub delta_pos: Vec2,
    pub delta_dir: f32,
    pub virtual_pos: Vec2,
    pub virtual_dir: Vec2,
}

impl MotionState {
    /// Real and virtual pose coincide, nothing has moved yet.
    pub fn at_rest(pos: Vec2, dir: Vec2) -> Self {
        let dir = crate::types::geometry::heading(dir);
        Self {
            real_pos: pos,
            real_dir: dir,
            delta_pos: Vec2::ZERO,
            delta_dir: 0.0,
            virtual_pos: pos,
            virtual_dir: dir,
        }
    }

    pub fn with_delta_dir(mut self, delta_dir: f32) -> Self {
        self.delta_dir = delta_dir;
        self
    }
}
