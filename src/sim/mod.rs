//! Deterministic simulation module
//!
//! All collision and movement logic lives here. This module must be pure and
//! deterministic:
//! - Fixed timestep only
//! - No rendering, input devices or I/O
//! - Collision rejections are outcomes, never errors

pub mod catalog;
pub mod clock;
pub mod debug;
pub mod entity;
pub mod geometry;
pub mod local;
pub mod map;
pub mod shape;
pub mod state;
pub mod tick;
pub mod tile;

pub use catalog::TileCatalog;
pub use clock::FixedClock;
pub use debug::{DebugError, DebugHook, DebugValue};
pub use entity::{Camera, Entity, Player};
pub use geometry::{Arc, Disc, Rect, RightTriangle};
pub use local::LocalTiles;
pub use map::{Bounds, LevelSurface, TileData, TileMap};
pub use shape::{Rotation, Shape, WallGeometry};
pub use state::World;
pub use tick::{Action, Command, Fall, TickInput, tick};
pub use tile::{Appearance, StairDirection, Tile, TileFlags, TileKind};
