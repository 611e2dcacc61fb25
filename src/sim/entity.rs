//! Entities moving through the tile map

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::Disc;

/// A circular body with a continuous (x, y) position on an integer level
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    pub pos: Vec2,
    pub z: i32,
    /// Collision radius
    pub radius: f32,
    /// Distance covered by one movement step
    pub speed: f32,
    /// Passes through solid walls (never boundaries)
    pub incorporeal: bool,
    /// Never falls
    pub flight: bool,
    /// Consecutive ticks spent unsupported
    pub fall_ticks: u32,
    /// Outstanding absolute-move destination
    pub target: Option<Vec2>,
}

impl Entity {
    pub fn new(radius: f32, speed: f32) -> Self {
        Self {
            pos: Vec2::ZERO,
            z: 0,
            radius,
            speed,
            incorporeal: false,
            flight: false,
            fall_ticks: 0,
            target: None,
        }
    }

    pub fn at(mut self, pos: Vec2, z: i32) -> Self {
        self.pos = pos;
        self.z = z;
        self
    }

    /// Collision disc if the entity stood at `pos`
    #[inline]
    pub fn disc_at(&self, pos: Vec2) -> Disc {
        Disc::new(pos, self.radius)
    }

    pub fn is_falling(&self) -> bool {
        self.fall_ticks > 0
    }

    /// A step of exactly `speed` length along `direction`, or None for a
    /// zero direction
    pub fn step_along(&self, direction: Vec2) -> Option<Vec2> {
        direction.try_normalize().map(|dir| self.pos + dir * self.speed)
    }
}

/// Camera state driven by the player
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Camera {
    /// Point the camera follows
    pub focus: Vec2,
    /// Level shown
    pub z: i32,
    /// Accumulated manual pan
    pub pan: Vec2,
}

impl Camera {
    /// World point at the centre of the view
    pub fn center(&self) -> Vec2 {
        self.focus + self.pan
    }
}

/// The entity steered by input; owns the camera
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub body: Entity,
    pub camera: Camera,
}

impl Player {
    pub fn new(body: Entity) -> Self {
        let mut player = Self {
            body,
            camera: Camera::default(),
        };
        player.follow();
        player
    }

    /// Snap the camera onto the player
    pub fn follow(&mut self) {
        self.camera.focus = self.body.pos;
        self.camera.z = self.body.z;
    }
}
