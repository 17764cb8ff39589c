//! Vertex type for triangle-list backends

/// Simple 2D vertex with position and color
#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Vertex {
    pub position: [f32; 2],
    pub color: [f32; 4],
}

impl Vertex {
    pub const fn new(x: f32, y: f32, color: [f32; 4]) -> Self {
        Self {
            position: [x, y],
            color,
        }
    }
}

/// Colors for game elements
pub mod colors {
    pub const BACKGROUND: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
    pub const STAR: [f32; 4] = [1.0, 1.0, 1.0, 1.0];
    pub const PLAYER: [f32; 4] = [0.0, 1.0, 1.0, 1.0];
    pub const ENGINE_FLAME: [f32; 4] = [1.0, 0.0, 0.0, 1.0];
    pub const SHIELD: [f32; 4] = [0.3, 0.8, 1.0, 0.6];
    pub const BULLET: [f32; 4] = [1.0, 1.0, 0.0, 1.0];
    pub const LASER: [f32; 4] = [0.3, 1.0, 1.0, 1.0];
    pub const MISSILE: [f32; 4] = [1.0, 0.67, 0.0, 1.0];
    pub const CAPSULE: [f32; 4] = [0.87, 0.27, 0.27, 1.0];
    pub const CAPSULE_HIGHLIGHT: [f32; 4] = [1.0, 0.67, 0.67, 1.0];
    pub const FANSHIP: [f32; 4] = [1.0, 0.0, 1.0, 1.0];
    pub const BOSS: [f32; 4] = [0.6, 0.2, 0.8, 1.0];
    pub const BOSS_FLASH: [f32; 4] = [1.0, 1.0, 0.9, 1.0];
    pub const BOSS_CORE: [f32; 4] = [1.0, 0.3, 0.1, 1.0];
    pub const HP_BAR_BG: [f32; 4] = [0.3, 0.0, 0.0, 1.0];
    pub const HP_BAR: [f32; 4] = [0.0, 1.0, 0.0, 1.0];
}
