//! Common components used across multiple entity types.

use serde::{Deserialize, Serialize};

/// 3D position vector
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Vec3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vec3 {
    pub const ZERO: Self = Self { x: 0.0, y: 0.0, z: 0.0 };

    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }
}

/// Where an entity sits; popups are anchored here
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct Position {
    /// Local position on the grid
    pub local: Vec3,
    /// Grid the position is relative to
    pub grid_id: u32,
}

impl Position {
    pub fn new(x: f32, y: f32, grid_id: u32) -> Self {
        Self {
            local: Vec3::new(x, y, 0.0),
            grid_id,
        }
    }
}
