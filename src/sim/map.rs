//! Sparse multi-level tile map
//!
//! Tiles are stored per level in a dictionary keyed by cell. Lookups that
//! miss synthesize a placeholder: `Boundary` outside the loaded extent on
//! any axis, `Empty` inside it.

use std::borrow::Cow;
use std::collections::{BTreeMap, HashMap};

use glam::{IVec2, IVec3, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::local::LocalTiles;
use super::tile::Tile;
use crate::consts::TILE_SIZE;

/// Tiles to load, per level and cell. `None` marks a cell that belongs to
/// the map (it widens the bounds) but holds no tile.
pub type TileData = BTreeMap<i32, HashMap<IVec2, Option<Tile>>>;

/// Inclusive per-axis extent of occupied coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub min: IVec3,
    pub max: IVec3,
}

impl Bounds {
    pub fn point(p: IVec3) -> Self {
        Self { min: p, max: p }
    }

    pub fn include(&mut self, p: IVec3) {
        self.min = self.min.min(p);
        self.max = self.max.max(p);
    }

    pub fn contains(&self, p: IVec3) -> bool {
        p.cmpge(self.min).all() && p.cmple(self.max).all()
    }
}

/// Sizing for one level's render surface, in tile coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelSurface {
    pub z: i32,
    pub min: IVec2,
    pub max: IVec2,
}

impl LevelSurface {
    /// Size in tiles
    pub fn tiles(&self) -> IVec2 {
        self.max - self.min + IVec2::ONE
    }

    /// Size in world units
    pub fn pixel_size(&self) -> Vec2 {
        self.tiles().as_vec2() * TILE_SIZE
    }

    /// World position of the surface's top-left corner
    pub fn origin(&self) -> Vec2 {
        self.min.as_vec2() * TILE_SIZE
    }
}

#[derive(Debug, Clone, Default)]
pub struct TileMap {
    levels: BTreeMap<i32, HashMap<IVec2, Tile>>,
    bounds: Option<Bounds>,
    surfaces: BTreeMap<i32, LevelSurface>,
}

impl TileMap {
    /// An unloaded map: every coordinate is a boundary
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_data(data: TileData) -> Self {
        let mut map = Self::new();
        map.load(data);
        map
    }

    /// Replace every tile and recompute all derived extents
    pub fn load(&mut self, data: TileData) {
        let mut levels = BTreeMap::new();
        let mut bounds: Option<Bounds> = None;
        let mut surfaces = BTreeMap::new();

        for (z, cells) in data {
            let mut level_extent: Option<(IVec2, IVec2)> = None;
            let mut stored = HashMap::with_capacity(cells.len());

            for (cell, tile) in cells {
                let p = cell.extend(z);
                match bounds.as_mut() {
                    Some(b) => b.include(p),
                    None => bounds = Some(Bounds::point(p)),
                }
                level_extent = Some(match level_extent {
                    Some((lo, hi)) => (lo.min(cell), hi.max(cell)),
                    None => (cell, cell),
                });
                if let Some(tile) = tile {
                    stored.insert(cell, tile);
                }
            }

            if let Some((min, max)) = level_extent {
                surfaces.insert(z, LevelSurface { z, min, max });
            }
            levels.insert(z, stored);
        }

        self.levels = levels;
        self.bounds = bounds;
        self.surfaces = surfaces;

        log::info!(
            "Tile map loaded: {} tiles on {} levels, bounds {:?}",
            self.tile_count(),
            self.levels.len(),
            self.bounds
        );
    }

    /// The tile answering for `pos`
    pub fn get(&self, pos: IVec3) -> Cow<'_, Tile> {
        if let Some(tile) = self
            .levels
            .get(&pos.z)
            .and_then(|level| level.get(&pos.truncate()))
        {
            return Cow::Borrowed(tile);
        }

        match self.bounds {
            Some(bounds) if bounds.contains(pos) => Cow::Owned(Tile::empty(pos)),
            _ => Cow::Owned(Tile::boundary(pos)),
        }
    }

    pub fn bounds(&self) -> Option<Bounds> {
        self.bounds
    }

    pub fn tile_count(&self) -> usize {
        self.levels.values().map(HashMap::len).sum()
    }

    /// Render surface sizing for every loaded level, lowest first
    pub fn surfaces(&self) -> impl Iterator<Item = &LevelSurface> {
        self.surfaces.values()
    }

    pub fn surface(&self, z: i32) -> Option<&LevelSurface> {
        self.surfaces.get(&z)
    }

    /// Turn the stored tile at `pos` a quarter clockwise. Returns false when
    /// there is no rotatable tile there.
    pub fn rotate_tile(&mut self, pos: IVec3) -> bool {
        self.levels
            .get_mut(&pos.z)
            .and_then(|level| level.get_mut(&pos.truncate()))
            .is_some_and(Tile::rotate)
    }

    /// Tiles on level `z` whose square may touch a disc of `radius` at `pos`
    pub fn local(&self, radius: f32, pos: Vec2, z: i32) -> LocalTiles<'_> {
        LocalTiles::new(self, radius, pos, z)
    }

    /// Whether any nearby tile on level `z` blocks `entity` at `pos`
    pub fn wall_collide(&self, entity: &Entity, pos: Vec2, z: i32) -> bool {
        self.local(entity.radius, pos, z)
            .any(|tile| tile.wall_collide(entity, pos))
    }

    pub fn floor_collide(&self, entity: &Entity, pos: Vec2, z: i32) -> bool {
        self.local(entity.radius, pos, z)
            .any(|tile| tile.floor_collide(entity, pos))
    }

    pub fn suspend_collide(&self, entity: &Entity, pos: Vec2, z: i32) -> bool {
        self.local(entity.radius, pos, z)
            .any(|tile| tile.suspend_collide(entity, pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::geometry::Disc;
    use crate::sim::local::{cell_of, cell_rect};
    use crate::sim::shape::{Rotation, WallGeometry};
    use crate::sim::tile::{Appearance, TileKind};
    use proptest::prelude::*;
    use std::collections::HashSet;

    fn floor(x: i32, y: i32, z: i32) -> (IVec2, Option<Tile>) {
        (
            IVec2::new(x, y),
            Some(Tile::new(TileKind::Floor, IVec3::new(x, y, z), None, None)),
        )
    }

    /// 4x4 floor on level 0 with a square wall at (2, 1) and a hole at
    /// (1, 2); level 1 only marks its corners
    fn sample_map() -> TileMap {
        let mut data = TileData::new();
        let mut ground: HashMap<_, _> = (0..4)
            .flat_map(|x| (0..4).map(move |y| floor(x, y, 0)))
            .collect();
        ground.insert(
            IVec2::new(2, 1),
            Some(Tile::new(
                TileKind::Wall,
                IVec3::new(2, 1, 0),
                Some(Rotation::Up),
                Some(Appearance::Geometry(WallGeometry::Square)),
            )),
        );
        ground.insert(IVec2::new(1, 2), None);
        data.insert(0, ground);
        data.insert(
            1,
            HashMap::from([(IVec2::new(0, 0), None), (IVec2::new(3, 3), None)]),
        );
        TileMap::from_data(data)
    }

    #[test]
    fn test_get_stored_empty_and_boundary() {
        let map = sample_map();
        assert_eq!(map.get(IVec3::new(0, 0, 0)).kind(), TileKind::Floor);
        assert_eq!(map.get(IVec3::new(2, 1, 0)).kind(), TileKind::Wall);
        assert_eq!(map.get(IVec3::new(1, 2, 0)).kind(), TileKind::Empty);
        assert_eq!(map.get(IVec3::new(1, 1, 1)).kind(), TileKind::Empty);
        assert_eq!(map.get(IVec3::new(4, 0, 0)).kind(), TileKind::Boundary);
        assert_eq!(map.get(IVec3::new(0, -1, 0)).kind(), TileKind::Boundary);
        assert_eq!(map.get(IVec3::new(0, 0, 2)).kind(), TileKind::Boundary);
        assert_eq!(map.get(IVec3::new(0, 0, -1)).kind(), TileKind::Boundary);
    }

    #[test]
    fn test_bounds_and_surfaces() {
        let map = sample_map();
        assert_eq!(
            map.bounds(),
            Some(Bounds {
                min: IVec3::new(0, 0, 0),
                max: IVec3::new(3, 3, 1),
            })
        );
        let surface = map.surface(0).copied().unwrap();
        assert_eq!(surface.tiles(), IVec2::new(4, 4));
        assert_eq!(surface.pixel_size(), Vec2::splat(4.0 * TILE_SIZE));
        assert_eq!(surface.origin(), Vec2::ZERO);
        assert_eq!(map.surfaces().count(), 2);
        assert_eq!(map.tile_count(), 15);
    }

    #[test]
    fn test_load_replaces_everything() {
        let mut map = sample_map();
        let mut data = TileData::new();
        data.insert(5, HashMap::from([floor(10, 10, 5)]));
        map.load(data);
        assert_eq!(map.tile_count(), 1);
        assert_eq!(map.get(IVec3::new(0, 0, 0)).kind(), TileKind::Boundary);
        assert!(map.surface(0).is_none());
        assert_eq!(map.bounds().map(|b| b.min), Some(IVec3::new(10, 10, 5)));
        assert_eq!(
            map.surface(5).map(LevelSurface::origin),
            Some(Vec2::splat(10.0 * TILE_SIZE))
        );
    }

    #[test]
    fn test_unloaded_map_is_all_boundary() {
        let map = TileMap::new();
        assert_eq!(map.get(IVec3::ZERO).kind(), TileKind::Boundary);
    }

    #[test]
    fn test_map_level_predicates() {
        let map = sample_map();
        let walker = Entity::new(4.0, 2.0);
        let mut ghost = walker.clone();
        ghost.incorporeal = true;

        // Right next to the wall at (2, 1)
        let near_wall = Vec2::new(2.0 * TILE_SIZE - 2.0, 1.5 * TILE_SIZE);
        assert!(map.wall_collide(&walker, near_wall, 0));
        assert!(!map.wall_collide(&ghost, near_wall, 0));

        // Centre of the hole at (1, 2) is still within reach of floors
        let hole = Vec2::new(1.5 * TILE_SIZE, 2.5 * TILE_SIZE);
        assert!(!map.floor_collide(&walker, hole, 0));
        assert!(map.floor_collide(&Entity::new(TILE_SIZE, 1.0), hole, 0));

        assert!(map.suspend_collide(&ghost, Vec2::splat(16.0), 0));
        assert!(!map.suspend_collide(&walker, Vec2::splat(16.0), 0));
    }

    #[test]
    fn test_rotate_tile() {
        let mut map = sample_map();
        assert!(map.rotate_tile(IVec3::new(2, 1, 0)));
        assert_eq!(map.get(IVec3::new(2, 1, 0)).rotation(), Some(Rotation::Right));
        assert!(!map.rotate_tile(IVec3::new(0, 0, 0)));
        assert!(!map.rotate_tile(IVec3::new(9, 9, 0)));
    }

    proptest! {
        #[test]
        fn prop_outside_bounds_blocks_everyone(
            x in -20i32..20, y in -20i32..20, z in -3i32..4,
            incorporeal in any::<bool>(), flight in any::<bool>(),
        ) {
            let map = sample_map();
            let p = IVec3::new(x, y, z);
            prop_assume!(!map.bounds().unwrap().contains(p));
            let tile = map.get(p);
            let mut e = Entity::new(2.0, 1.0);
            e.incorporeal = incorporeal;
            e.flight = flight;
            prop_assert!(tile.wall_collide(&e, tile.bounds().center()));
        }

        #[test]
        fn prop_unstored_inside_collides_with_nothing(
            x in 0i32..4, y in 0i32..4, incorporeal in any::<bool>(),
        ) {
            let map = sample_map();
            let p = IVec3::new(x, y, 1);
            let tile = map.get(p);
            let mut e = Entity::new(2.0, 1.0);
            e.incorporeal = incorporeal;
            let c = tile.bounds().center();
            prop_assert!(!tile.wall_collide(&e, c));
            prop_assert!(!tile.floor_collide(&e, c));
            prop_assert!(!tile.suspend_collide(&e, c));
        }

        #[test]
        fn prop_local_is_sound_and_unique(
            px in -200.0f32..200.0, py in -200.0f32..200.0, radius in 0.0f32..120.0,
        ) {
            let map = sample_map();
            let pos = Vec2::new(px, py);
            let seen: Vec<IVec3> = map.local(radius, pos, 0).map(|t| t.pos).collect();
            let unique: HashSet<IVec3> = seen.iter().copied().collect();
            prop_assert_eq!(unique.len(), seen.len());

            let disc = Disc::new(pos, radius);
            let reach = (radius / TILE_SIZE).ceil() as i32 + 1;
            let center = cell_of(pos);
            for dx in -reach..=reach {
                for dy in -reach..=reach {
                    let cell = center + IVec2::new(dx, dy);
                    if disc.intersects_rect(&cell_rect(cell)) {
                        prop_assert!(unique.contains(&cell.extend(0)), "missed {:?}", cell);
                    }
                }
            }
        }
    }
}
