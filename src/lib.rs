//! Tilefall - tile collision and movement engine
//!
//! Core modules:
//! - `sim`: Deterministic simulation (geometry, tiles, map, movement)
//! - `mapfile`: Map description parsing and validation
//! - `settings`: Engine tuning loaded from JSON

pub mod mapfile;
pub mod settings;
pub mod sim;

pub use mapfile::{MapDescription, MapLoadError, TileDef};
pub use settings::EngineSettings;

use glam::Vec2;

/// Engine configuration constants
pub mod consts {
    /// Width and height of one tile in world units
    pub const TILE_SIZE: f32 = 32.0;
    /// Default physics rate (ticks per second)
    pub const DEFAULT_TICKS_PER_SECOND: u32 = 120;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;
    /// Default number of unsupported ticks before dropping one level
    pub const DEFAULT_FALL_TICKS: u32 = 30;
    /// Largest collision radius an entity may have (eight tiles)
    pub const MAX_ENTITY_RADIUS: f32 = 8.0 * TILE_SIZE;
}

/// Normalized angle to [-π, π)
#[inline]
pub fn normalize_angle(mut angle: f32) -> f32 {
    use std::f32::consts::PI;
    while angle >= PI {
        angle -= 2.0 * PI;
    }
    while angle < -PI {
        angle += 2.0 * PI;
    }
    angle
}

/// Rotate a vector a quarter turn clockwise on screen (y points down)
#[inline]
pub fn quarter_turn(v: Vec2) -> Vec2 {
    Vec2::new(-v.y, v.x)
}

/// Angle of a vector measured from +x toward +y
#[inline]
pub fn angle_of(v: Vec2) -> f32 {
    v.y.atan2(v.x)
}
