//! Geometry primitives for tile collision
//!
//! All shapes live in world space with y pointing down. Every predicate
//! treats touching as intersecting, so a disc resting exactly on an edge
//! collides with it.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::{angle_of, normalize_angle};

/// Axis-aligned rectangle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// Top-left corner
    pub min: Vec2,
    /// Width and height
    pub size: Vec2,
}

impl Rect {
    pub fn new(x: f32, y: f32, w: f32, h: f32) -> Self {
        Self {
            min: Vec2::new(x, y),
            size: Vec2::new(w, h),
        }
    }

    /// Rectangle spanning two opposite corners (in any order)
    pub fn from_corners(a: Vec2, b: Vec2) -> Self {
        let min = a.min(b);
        Self {
            min,
            size: a.max(b) - min,
        }
    }

    #[inline]
    pub fn max(&self) -> Vec2 {
        self.min + self.size
    }

    #[inline]
    pub fn center(&self) -> Vec2 {
        self.min + self.size * 0.5
    }

    pub fn contains(&self, p: Vec2) -> bool {
        let max = self.max();
        p.x >= self.min.x && p.x <= max.x && p.y >= self.min.y && p.y <= max.y
    }

    /// Closest point of the (filled) rectangle to `p`
    #[inline]
    pub fn closest_point(&self, p: Vec2) -> Vec2 {
        p.clamp(self.min, self.max())
    }

    pub fn corners(&self) -> [Vec2; 4] {
        let max = self.max();
        [
            self.min,
            Vec2::new(max.x, self.min.y),
            max,
            Vec2::new(self.min.x, max.y),
        ]
    }

    /// The four edges as (start, end) pairs, clockwise from the top
    pub fn edges(&self) -> [(Vec2, Vec2); 4] {
        let [a, b, c, d] = self.corners();
        [(a, b), (b, c), (c, d), (d, a)]
    }
}

/// A filled circle
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Disc {
    pub center: Vec2,
    pub radius: f32,
}

impl Disc {
    pub fn new(center: Vec2, radius: f32) -> Self {
        Self { center, radius }
    }

    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        (p - self.center).length_squared() <= self.radius * self.radius
    }

    pub fn intersects_rect(&self, rect: &Rect) -> bool {
        self.contains(rect.closest_point(self.center))
    }

    pub fn intersects_disc(&self, other: &Disc) -> bool {
        (self.center - other.center).length() <= self.radius + other.radius
    }

    pub fn intersects_arc(&self, arc: &Arc) -> bool {
        arc.distance_to(self.center) <= self.radius
    }

    pub fn intersects_triangle(&self, tri: &RightTriangle) -> bool {
        tri.distance_to(self.center) <= self.radius
    }

    /// Whether some point of this disc that lies inside `rect` is on or
    /// beyond the edge of `hole`.
    ///
    /// This is the collision test for a tile with a circular bite taken out
    /// of it: the solid part is `rect` minus the interior of `hole`.
    pub fn escapes_hole(&self, rect: &Rect, hole: &Disc) -> bool {
        if !self.intersects_rect(rect) {
            return false;
        }
        self.farthest_in_rect(rect, hole.center) >= hole.radius
    }

    /// Largest distance from `from` to any point of this disc clipped to `rect`.
    ///
    /// The clipped region is convex, so the maximum sits on one of: a rect
    /// corner inside the disc, the disc's own farthest point from `from`, or
    /// a crossing between the circle and a rect edge.
    fn farthest_in_rect(&self, rect: &Rect, from: Vec2) -> f32 {
        let mut best = f32::NEG_INFINITY;

        for corner in rect.corners() {
            if self.contains(corner) {
                best = best.max((corner - from).length());
            }
        }

        let away = (self.center - from).try_normalize().unwrap_or(Vec2::X);
        let far = self.center + away * self.radius;
        if rect.contains(far) {
            best = best.max((far - from).length());
        }

        for (a, b) in rect.edges() {
            for p in self.segment_crossings(a, b) {
                best = best.max((p - from).length());
            }
        }

        best
    }

    /// Points where the circle outline crosses segment `a`-`b`
    fn segment_crossings(&self, a: Vec2, b: Vec2) -> impl Iterator<Item = Vec2> {
        let d = b - a;
        let f = a - self.center;
        let qa = d.length_squared();
        let qb = 2.0 * f.dot(d);
        let qc = f.length_squared() - self.radius * self.radius;
        let disc = qb * qb - 4.0 * qa * qc;

        let roots = if qa < f32::EPSILON || disc < 0.0 {
            [None, None]
        } else {
            let sq = disc.sqrt();
            [
                Some((-qb - sq) / (2.0 * qa)),
                Some((-qb + sq) / (2.0 * qa)),
            ]
        };

        roots
            .into_iter()
            .flatten()
            .filter(|t| (0.0..=1.0).contains(t))
            .map(move |t| a + d * t)
    }
}

/// A filled circular sector (pie slice)
///
/// The slice sweeps from `theta_start` toward increasing angle until
/// `theta_end`, which on screen (y down) is clockwise.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    pub center: Vec2,
    pub radius: f32,
    /// Start angle (radians, normalized to [-π, π))
    pub theta_start: f32,
    /// End angle (radians, normalized to [-π, π))
    pub theta_end: f32,
}

impl Arc {
    pub fn new(center: Vec2, radius: f32, theta_start: f32, theta_end: f32) -> Self {
        Self {
            center,
            radius,
            theta_start: normalize_angle(theta_start),
            theta_end: normalize_angle(theta_end),
        }
    }

    /// Angular span of the arc (handles wraparound)
    pub fn angular_span(&self) -> f32 {
        let mut span = self.theta_end - self.theta_start;
        if span < 0.0 {
            span += std::f32::consts::TAU;
        }
        span
    }

    /// Check if an angle is within the arc's angular extent
    pub fn contains_angle(&self, theta: f32) -> bool {
        let theta = normalize_angle(theta);
        let start = self.theta_start;
        let end = self.theta_end;

        if start <= end {
            theta >= start && theta <= end
        } else {
            // Wraparound case (e.g., start=170°, end=-170°)
            theta >= start || theta <= end
        }
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let offset = p - self.center;
        let dist_sq = offset.length_squared();
        if dist_sq > self.radius * self.radius {
            return false;
        }
        dist_sq < f32::EPSILON || self.contains_angle(angle_of(offset))
    }

    /// Point on the rim at angle `theta`
    pub fn rim_point(&self, theta: f32) -> Vec2 {
        self.center + Vec2::new(theta.cos(), theta.sin()) * self.radius
    }

    /// Distance from `p` to the filled sector (0 inside)
    pub fn distance_to(&self, p: Vec2) -> f32 {
        if self.contains_point(p) {
            return 0.0;
        }

        let offset = p - self.center;
        let mut best = segment_distance(p, self.center, self.rim_point(self.theta_start))
            .min(segment_distance(p, self.center, self.rim_point(self.theta_end)));

        if self.contains_angle(angle_of(offset)) {
            best = best.min((offset.length() - self.radius).abs());
        }
        best
    }
}

/// Right triangle covering half of a square: the right angle sits at
/// `corner` and the legs run along `leg_a` and `leg_b`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RightTriangle {
    pub corner: Vec2,
    pub leg_a: Vec2,
    pub leg_b: Vec2,
}

impl RightTriangle {
    pub fn new(corner: Vec2, leg_a: Vec2, leg_b: Vec2) -> Self {
        Self {
            corner,
            leg_a,
            leg_b,
        }
    }

    pub fn vertices(&self) -> [Vec2; 3] {
        [
            self.corner,
            self.corner + self.leg_a,
            self.corner + self.leg_b,
        ]
    }

    pub fn contains_point(&self, p: Vec2) -> bool {
        let [a, b, c] = self.vertices();
        let d1 = (b - a).perp_dot(p - a);
        let d2 = (c - b).perp_dot(p - b);
        let d3 = (a - c).perp_dot(p - c);
        let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
        let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
        !(has_neg && has_pos)
    }

    /// Distance from `p` to the filled triangle (0 inside)
    pub fn distance_to(&self, p: Vec2) -> f32 {
        if self.contains_point(p) {
            return 0.0;
        }
        let [a, b, c] = self.vertices();
        segment_distance(p, a, b)
            .min(segment_distance(p, b, c))
            .min(segment_distance(p, c, a))
    }
}

/// Distance from `p` to segment `a`-`b`
pub fn segment_distance(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let line_vec = b - a;
    let line_len_sq = line_vec.length_squared();
    if line_len_sq < f32::EPSILON {
        return (p - a).length();
    }
    let t = ((p - a).dot(line_vec) / line_len_sq).clamp(0.0, 1.0);
    (p - (a + line_vec * t)).length()
}
