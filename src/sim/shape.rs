//! Wall geometry variants and their per-orientation collision shapes
//!
//! Each geometry is described once for the `Up` orientation in tile-local
//! coordinates and then turned a quarter at a time about the tile centre.
//! The four resulting shapes are built when the tile is constructed, so a
//! collision test is a single match on a cached `Shape`.

use std::f32::consts::{FRAC_PI_2, PI};

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::geometry::{Arc, Disc, Rect, RightTriangle};
use crate::quarter_turn;

/// One of the four cardinal orientations, each a quarter turn clockwise
/// from the previous one
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rotation {
    #[default]
    Up,
    Right,
    Down,
    Left,
}

impl Rotation {
    pub const ALL: [Rotation; 4] = [
        Rotation::Up,
        Rotation::Right,
        Rotation::Down,
        Rotation::Left,
    ];

    /// Number of quarter turns from `Up`
    pub fn index(self) -> usize {
        match self {
            Rotation::Up => 0,
            Rotation::Right => 1,
            Rotation::Down => 2,
            Rotation::Left => 3,
        }
    }

    /// The next orientation clockwise
    pub fn turned(self) -> Self {
        Self::ALL[(self.index() + 1) % 4]
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Rotation::Up => "up",
            Rotation::Right => "right",
            Rotation::Down => "down",
            Rotation::Left => "left",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.as_str() == s)
    }
}

/// Shape families a wall tile can take
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WallGeometry {
    /// Full tile
    Square,
    /// Half tile slab along one edge
    Rectangle,
    /// Diagonal cut leaving a right triangle in one corner
    Angled,
    /// Corner with a quarter-circle bite taken out
    Concave,
    /// Quarter-circle bump in one corner
    Convex,
    /// Centred disc
    Circle,
    /// Semicircular notch cut into one edge
    DoubleConcave,
    /// Half disc hanging off one edge
    DoubleConvex,
}

impl WallGeometry {
    pub const ALL: [WallGeometry; 8] = [
        WallGeometry::Square,
        WallGeometry::Rectangle,
        WallGeometry::Angled,
        WallGeometry::Concave,
        WallGeometry::Convex,
        WallGeometry::Circle,
        WallGeometry::DoubleConcave,
        WallGeometry::DoubleConvex,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            WallGeometry::Square => "square",
            WallGeometry::Rectangle => "rectangle",
            WallGeometry::Angled => "angled",
            WallGeometry::Concave => "concave",
            WallGeometry::Convex => "convex",
            WallGeometry::Circle => "circle",
            WallGeometry::DoubleConcave => "double_concave",
            WallGeometry::DoubleConvex => "double_convex",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|g| g.as_str() == s)
    }

    /// Shape for the `Up` orientation of a tile at the origin with side `s`
    fn upright(self, s: f32) -> Shape {
        let half = s / 2.0;
        match self {
            WallGeometry::Square => Shape::Rect(Rect::new(0.0, 0.0, s, s)),
            WallGeometry::Rectangle => Shape::Rect(Rect::new(0.0, 0.0, s, half)),
            WallGeometry::Angled => Shape::Triangle(RightTriangle::new(
                Vec2::ZERO,
                Vec2::new(s, 0.0),
                Vec2::new(0.0, s),
            )),
            WallGeometry::Concave => Shape::Cutout {
                bounds: Rect::new(0.0, 0.0, s, s),
                hole: Disc::new(Vec2::new(s, s), s),
            },
            // Right (0) sweeping down (π/2)
            WallGeometry::Convex => Shape::Sector(Arc::new(Vec2::ZERO, s, 0.0, FRAC_PI_2)),
            WallGeometry::Circle => Shape::Disc(Disc::new(Vec2::splat(half), half)),
            WallGeometry::DoubleConcave => Shape::Cutout {
                bounds: Rect::new(0.0, 0.0, s, s),
                hole: Disc::new(Vec2::new(half, s), half),
            },
            // Right (0) sweeping through down to left (π)
            WallGeometry::DoubleConvex => {
                Shape::Sector(Arc::new(Vec2::new(half, 0.0), half, 0.0, PI))
            }
        }
    }

    /// Build the four oriented shapes for a tile whose top-left corner is
    /// `origin`, indexed by `Rotation::index`
    pub fn oriented_shapes(self, origin: Vec2, size: f32) -> [Shape; 4] {
        let pivot = Vec2::splat(size / 2.0);
        let up = self.upright(size);
        let mut shapes = [up; 4];
        for i in 1..4 {
            shapes[i] = shapes[i - 1].turned_about(pivot);
        }
        shapes.map(|shape| shape.translated(origin))
    }
}

/// A precomputed collision outline
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum Shape {
    Rect(Rect),
    Triangle(RightTriangle),
    Disc(Disc),
    Sector(Arc),
    /// `bounds` with the inside of `hole` removed
    Cutout { bounds: Rect, hole: Disc },
}

impl Shape {
    /// Whether `disc` overlaps the solid part of this shape
    pub fn intersects(&self, disc: &Disc) -> bool {
        match self {
            Shape::Rect(rect) => disc.intersects_rect(rect),
            Shape::Triangle(tri) => disc.intersects_triangle(tri),
            Shape::Disc(other) => disc.intersects_disc(other),
            Shape::Sector(arc) => disc.intersects_arc(arc),
            Shape::Cutout { bounds, hole } => disc.escapes_hole(bounds, hole),
        }
    }

    /// This shape turned a quarter clockwise about `pivot`
    fn turned_about(&self, pivot: Vec2) -> Shape {
        let turn = |p: Vec2| pivot + quarter_turn(p - pivot);
        match *self {
            Shape::Rect(rect) => Shape::Rect(Rect::from_corners(turn(rect.min), turn(rect.max()))),
            Shape::Triangle(tri) => Shape::Triangle(RightTriangle::new(
                turn(tri.corner),
                quarter_turn(tri.leg_a),
                quarter_turn(tri.leg_b),
            )),
            Shape::Disc(disc) => Shape::Disc(Disc::new(turn(disc.center), disc.radius)),
            Shape::Sector(arc) => Shape::Sector(Arc::new(
                turn(arc.center),
                arc.radius,
                arc.theta_start + FRAC_PI_2,
                arc.theta_end + FRAC_PI_2,
            )),
            Shape::Cutout { bounds, hole } => Shape::Cutout {
                bounds: Rect::from_corners(turn(bounds.min), turn(bounds.max())),
                hole: Disc::new(turn(hole.center), hole.radius),
            },
        }
    }

    fn translated(&self, by: Vec2) -> Shape {
        match *self {
            Shape::Rect(rect) => Shape::Rect(Rect {
                min: rect.min + by,
                size: rect.size,
            }),
            Shape::Triangle(tri) => Shape::Triangle(RightTriangle {
                corner: tri.corner + by,
                ..tri
            }),
            Shape::Disc(disc) => Shape::Disc(Disc::new(disc.center + by, disc.radius)),
            Shape::Sector(arc) => Shape::Sector(Arc {
                center: arc.center + by,
                ..arc
            }),
            Shape::Cutout { bounds, hole } => Shape::Cutout {
                bounds: Rect {
                    min: bounds.min + by,
                    size: bounds.size,
                },
                hole: Disc::new(hole.center + by, hole.radius),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const S: f32 = 32.0;

    fn probe(x: f32, y: f32) -> Disc {
        Disc::new(Vec2::new(x, y), 2.0)
    }

    #[test]
    fn test_rotation_cycle() {
        let mut r = Rotation::Up;
        for _ in 0..4 {
            r = r.turned();
        }
        assert_eq!(r, Rotation::Up);
        assert_eq!(Rotation::Left.turned(), Rotation::Up);
        assert_eq!(Rotation::from_str("down"), Some(Rotation::Down));
        assert_eq!(Rotation::from_str("north"), None);
    }

    #[test]
    fn test_rectangle_orientations() {
        let shapes = WallGeometry::Rectangle.oriented_shapes(Vec2::ZERO, S);
        // Up: top half, Right: right half, Down: bottom half, Left: left half
        assert!(shapes[0].intersects(&probe(16.0, 4.0)));
        assert!(!shapes[0].intersects(&probe(16.0, 28.0)));
        assert!(shapes[1].intersects(&probe(28.0, 16.0)));
        assert!(!shapes[1].intersects(&probe(4.0, 16.0)));
        assert!(shapes[2].intersects(&probe(16.0, 28.0)));
        assert!(shapes[3].intersects(&probe(4.0, 16.0)));
        assert!(!shapes[3].intersects(&probe(28.0, 16.0)));
    }

    #[test]
    fn test_angled_orientations() {
        let shapes = WallGeometry::Angled.oriented_shapes(Vec2::new(64.0, 32.0), S);
        let top_left = probe(64.0 + 5.0, 32.0 + 5.0);
        let top_right = probe(64.0 + 27.0, 32.0 + 5.0);
        let bottom_right = probe(64.0 + 27.0, 32.0 + 27.0);
        let bottom_left = probe(64.0 + 5.0, 32.0 + 27.0);

        assert!(shapes[0].intersects(&top_left));
        assert!(!shapes[0].intersects(&bottom_right));
        assert!(shapes[1].intersects(&top_right));
        assert!(!shapes[1].intersects(&bottom_left));
        assert!(shapes[2].intersects(&bottom_right));
        assert!(!shapes[2].intersects(&top_left));
        assert!(shapes[3].intersects(&bottom_left));
        assert!(!shapes[3].intersects(&top_right));
    }

    #[test]
    fn test_convex_and_concave_are_complementary() {
        let convex = WallGeometry::Convex.oriented_shapes(Vec2::ZERO, S);
        let concave = WallGeometry::Concave.oriented_shapes(Vec2::ZERO, S);

        // Convex Up bulges from the top-left corner
        assert!(convex[0].intersects(&probe(4.0, 4.0)));
        assert!(!convex[0].intersects(&probe(28.0, 28.0)));
        // Concave Up keeps the top-left corner, bitten from the bottom-right
        assert!(concave[0].intersects(&probe(3.0, 3.0)));
        assert!(!concave[0].intersects(&probe(26.0, 26.0)));

        // After a half turn the solid corners swap
        assert!(convex[2].intersects(&probe(28.0, 28.0)));
        assert!(!convex[2].intersects(&probe(4.0, 4.0)));
        assert!(concave[2].intersects(&probe(29.0, 29.0)));
        assert!(!concave[2].intersects(&probe(6.0, 6.0)));
    }

    #[test]
    fn test_double_variants() {
        let dconvex = WallGeometry::DoubleConvex.oriented_shapes(Vec2::ZERO, S);
        // Half disc hanging from the top edge
        assert!(dconvex[0].intersects(&probe(16.0, 8.0)));
        assert!(!dconvex[0].intersects(&probe(16.0, 28.0)));
        assert!(!dconvex[0].intersects(&probe(2.0, 28.0)));

        let dconcave = WallGeometry::DoubleConcave.oriented_shapes(Vec2::ZERO, S);
        // Notch in the bottom edge, solid everywhere above it
        assert!(dconcave[0].intersects(&probe(16.0, 4.0)));
        assert!(!dconcave[0].intersects(&probe(16.0, 28.0)));
        assert!(dconcave[0].intersects(&probe(2.0, 30.0)));
    }

    #[test]
    fn test_circle_ignores_rotation() {
        let shapes = WallGeometry::Circle.oriented_shapes(Vec2::ZERO, S);
        for shape in &shapes {
            assert!(shape.intersects(&probe(16.0, 16.0)));
            assert!(!shape.intersects(&probe(1.0, 1.0)));
        }
    }
}
