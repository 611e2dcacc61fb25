//! Outward shell walk over the tiles around a point
//!
//! Cells are visited in diamond rings of growing Manhattan distance from
//! the cell holding the query point. Ring `d > 0` has exactly `4d` cells, so
//! nothing is visited twice and the walk ends after the last ring.

use std::borrow::Cow;

use glam::{IVec2, Vec2};

use super::geometry::{Disc, Rect};
use super::map::TileMap;
use super::tile::Tile;
use crate::consts::TILE_SIZE;

/// Cell containing world point `p`
#[inline]
pub fn cell_of(p: Vec2) -> IVec2 {
    (p / TILE_SIZE).floor().as_ivec2()
}

/// World square covered by cell `cell`
#[inline]
pub fn cell_rect(cell: IVec2) -> Rect {
    Rect::new(
        cell.x as f32 * TILE_SIZE,
        cell.y as f32 * TILE_SIZE,
        TILE_SIZE,
        TILE_SIZE,
    )
}

/// Outermost ring that can hold a cell touching a disc of `radius`.
///
/// A cell `(i, j)` rings away is at least `(|i|-1, |j|-1)` tiles from any
/// point of the centre cell, which bounds `|i| + |j|` by
/// `2 * radius / diagonal + 2`.
pub fn shell_limit(radius: f32) -> i32 {
    let diagonal = TILE_SIZE * std::f32::consts::SQRT_2;
    let rings = (radius.max(0.0) / diagonal).ceil() as i32;
    rings.saturating_mul(2).saturating_add(2)
}

#[inline]
fn ring_len(shell: i32) -> i32 {
    if shell == 0 { 1 } else { 4 * shell }
}

/// The `step`-th offset on ring `shell`, walking the four sides in turn
pub fn shell_offset(shell: i32, step: i32) -> IVec2 {
    if shell == 0 {
        return IVec2::ZERO;
    }
    let i = step % shell;
    match step / shell {
        0 => IVec2::new(shell - i, i),
        1 => IVec2::new(-i, shell - i),
        2 => IVec2::new(-shell + i, -i),
        _ => IVec2::new(i, -shell + i),
    }
}

/// Tiles whose square touches a disc, nearest rings first
///
/// Borrows the map, so the walk must finish or be dropped before the map
/// can be reloaded.
pub struct LocalTiles<'a> {
    map: &'a TileMap,
    disc: Disc,
    center: IVec2,
    z: i32,
    max_shell: i32,
    shell: i32,
    step: i32,
}

impl<'a> LocalTiles<'a> {
    pub fn new(map: &'a TileMap, radius: f32, pos: Vec2, z: i32) -> Self {
        Self {
            map,
            disc: Disc::new(pos, radius),
            center: cell_of(pos),
            z,
            max_shell: shell_limit(radius),
            shell: 0,
            step: 0,
        }
    }

    fn next_offset(&mut self) -> Option<IVec2> {
        if self.shell > self.max_shell {
            return None;
        }
        let offset = shell_offset(self.shell, self.step);
        self.step += 1;
        if self.step >= ring_len(self.shell) {
            self.shell += 1;
            self.step = 0;
        }
        Some(offset)
    }
}

impl<'a> Iterator for LocalTiles<'a> {
    type Item = Cow<'a, Tile>;

    fn next(&mut self) -> Option<Self::Item> {
        while let Some(offset) = self.next_offset() {
            let cell = self.center + offset;
            if self.disc.intersects_rect(&cell_rect(cell)) {
                return Some(self.map.get(cell.extend(self.z)));
            }
        }
        None
    }
}
