//! Tile kinds, static flags and the tile-level collision predicates

use glam::{IVec3, Vec2};
use serde::{Deserialize, Serialize};

use super::entity::Entity;
use super::geometry::{Disc, Rect};
use super::shape::{Rotation, Shape, WallGeometry};
use crate::consts::TILE_SIZE;

/// Closed set of tile behaviours
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TileKind {
    /// Synthesized for unoccupied coordinates inside the map
    Empty,
    /// Synthesized for coordinates outside the map
    Boundary,
    Floor,
    Wall,
    /// Wall whose floor is only its solid part
    FloorlessWall,
    Stair,
    FloorStair,
}

impl TileKind {
    pub const ALL: [TileKind; 7] = [
        TileKind::Empty,
        TileKind::Boundary,
        TileKind::Floor,
        TileKind::Wall,
        TileKind::FloorlessWall,
        TileKind::Stair,
        TileKind::FloorStair,
    ];

    /// Identifier used in map descriptions
    pub fn id(&self) -> &'static str {
        match self {
            TileKind::Empty => "Empty",
            TileKind::Boundary => "Boundary",
            TileKind::Floor => "Floor",
            TileKind::Wall => "Wall",
            TileKind::FloorlessWall => "FloorlessWall",
            TileKind::Stair => "Stair",
            TileKind::FloorStair => "FloorStair",
        }
    }

    /// Flags shared by every tile of this kind, before the appearance
    /// contributes its own (stair direction)
    pub fn base_flags(&self) -> TileFlags {
        let none = TileFlags::default();
        match self {
            TileKind::Empty | TileKind::Stair => none,
            TileKind::Boundary => TileFlags {
                boundary: true,
                ..none
            },
            TileKind::Floor | TileKind::FloorStair => TileFlags {
                floor: true,
                ..none
            },
            TileKind::Wall | TileKind::FloorlessWall => TileFlags {
                solid: true,
                floor: true,
                ..none
            },
        }
    }

    pub fn rotatable(&self) -> bool {
        matches!(
            self,
            TileKind::Wall | TileKind::FloorlessWall | TileKind::Stair | TileKind::FloorStair
        )
    }

    /// Keys accepted as an appearance selector; empty for single-look kinds
    pub fn appearance_keys(&self) -> Vec<&'static str> {
        match self {
            TileKind::Wall | TileKind::FloorlessWall => {
                WallGeometry::ALL.iter().map(|g| g.as_str()).collect()
            }
            TileKind::Stair | TileKind::FloorStair => {
                StairDirection::ALL.iter().map(|d| d.as_str()).collect()
            }
            TileKind::Empty | TileKind::Boundary | TileKind::Floor => Vec::new(),
        }
    }

    pub fn has_variants(&self) -> bool {
        self.appearance_keys().len() > 1
    }

    /// Resolve an appearance key for this kind
    pub fn parse_appearance(&self, key: &str) -> Option<Appearance> {
        match self {
            TileKind::Wall | TileKind::FloorlessWall => {
                WallGeometry::from_str(key).map(Appearance::Geometry)
            }
            TileKind::Stair | TileKind::FloorStair => {
                StairDirection::from_str(key).map(Appearance::Stair)
            }
            TileKind::Empty | TileKind::Boundary | TileKind::Floor => None,
        }
    }
}

/// Which way a stair lets its occupant hang on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StairDirection {
    Up,
    Down,
    Both,
    None,
}

impl StairDirection {
    pub const ALL: [StairDirection; 4] = [
        StairDirection::Up,
        StairDirection::Down,
        StairDirection::Both,
        StairDirection::None,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            StairDirection::Up => "up",
            StairDirection::Down => "down",
            StairDirection::Both => "both",
            StairDirection::None => "none",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.as_str() == s)
    }

    pub fn suspends_up(&self) -> bool {
        matches!(self, StairDirection::Up | StairDirection::Both)
    }

    pub fn suspends_down(&self) -> bool {
        matches!(self, StairDirection::Down | StairDirection::Both)
    }
}

/// Selected look of a multi-variant tile
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Appearance {
    Geometry(WallGeometry),
    Stair(StairDirection),
}

impl Appearance {
    pub fn key(&self) -> &'static str {
        match self {
            Appearance::Geometry(g) => g.as_str(),
            Appearance::Stair(d) => d.as_str(),
        }
    }
}

/// Static passability flags
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TileFlags {
    pub solid: bool,
    pub floor: bool,
    pub suspend_up: bool,
    pub suspend_down: bool,
    pub boundary: bool,
}

impl TileFlags {
    pub fn suspends(&self) -> bool {
        self.suspend_up || self.suspend_down
    }
}

/// Collision outline of a tile
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
enum Outline {
    /// The whole tile square
    Full,
    /// One precomputed shape per rotation
    Oriented([Shape; 4]),
}

/// A single grid cell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Tile {
    pub pos: IVec3,
    kind: TileKind,
    flags: TileFlags,
    rotation: Option<Rotation>,
    appearance: Option<Appearance>,
    outline: Outline,
}

impl Tile {
    /// Build a tile; `rotation` and `appearance` are expected to have been
    /// validated against the kind already (see `TileDef`)
    pub fn new(
        kind: TileKind,
        pos: IVec3,
        rotation: Option<Rotation>,
        appearance: Option<Appearance>,
    ) -> Self {
        let mut flags = kind.base_flags();
        let mut outline = Outline::Full;

        match appearance {
            Some(Appearance::Stair(direction)) => {
                flags.suspend_up = direction.suspends_up();
                flags.suspend_down = direction.suspends_down();
            }
            Some(Appearance::Geometry(geometry)) => {
                outline = Outline::Oriented(geometry.oriented_shapes(origin_of(pos), TILE_SIZE));
            }
            None => {}
        }

        Self {
            pos,
            kind,
            flags,
            rotation: if kind.rotatable() {
                Some(rotation.unwrap_or_default())
            } else {
                None
            },
            appearance,
            outline,
        }
    }

    pub fn empty(pos: IVec3) -> Self {
        Self::new(TileKind::Empty, pos, None, None)
    }

    pub fn boundary(pos: IVec3) -> Self {
        Self::new(TileKind::Boundary, pos, None, None)
    }

    pub fn kind(&self) -> TileKind {
        self.kind
    }

    pub fn flags(&self) -> TileFlags {
        self.flags
    }

    pub fn rotation(&self) -> Option<Rotation> {
        self.rotation
    }

    pub fn appearance(&self) -> Option<Appearance> {
        self.appearance
    }

    /// Turn a rotatable tile a quarter clockwise. Returns false for tiles
    /// that cannot rotate.
    pub fn rotate(&mut self) -> bool {
        match self.rotation {
            Some(rotation) => {
                self.rotation = Some(rotation.turned());
                true
            }
            None => false,
        }
    }

    /// World-space square covered by this tile
    pub fn bounds(&self) -> Rect {
        let origin = origin_of(self.pos);
        Rect::new(origin.x, origin.y, TILE_SIZE, TILE_SIZE)
    }

    fn wall_shape_hit(&self, disc: &Disc) -> bool {
        match &self.outline {
            Outline::Full => disc.intersects_rect(&self.bounds()),
            Outline::Oriented(shapes) => {
                let index = self.rotation.unwrap_or_default().index();
                shapes[index].intersects(disc)
            }
        }
    }

    fn floor_shape_hit(&self, disc: &Disc) -> bool {
        if self.kind == TileKind::FloorlessWall {
            self.wall_shape_hit(disc)
        } else {
            disc.intersects_rect(&self.bounds())
        }
    }

    /// Whether this tile blocks `entity` from standing at `pos`
    pub fn wall_collide(&self, entity: &Entity, pos: Vec2) -> bool {
        let blocks = self.flags.boundary || (self.flags.solid && !entity.incorporeal);
        blocks && self.wall_shape_hit(&entity.disc_at(pos))
    }

    /// Whether this tile supports `entity` from below at `pos`
    pub fn floor_collide(&self, entity: &Entity, pos: Vec2) -> bool {
        self.flags.floor && !entity.incorporeal && self.floor_shape_hit(&entity.disc_at(pos))
    }

    /// Whether this tile keeps `entity` from falling without acting as a
    /// floor: stairs for everyone, floors for incorporeal entities
    pub fn suspend_collide(&self, entity: &Entity, pos: Vec2) -> bool {
        let disc = entity.disc_at(pos);
        (self.flags.suspends() && self.floor_shape_hit(&disc))
            || (self.flags.floor && entity.incorporeal && self.floor_shape_hit(&disc))
    }
}

/// Top-left world corner of the tile at `pos`
#[inline]
pub fn origin_of(pos: IVec3) -> Vec2 {
    Vec2::new(pos.x as f32, pos.y as f32) * TILE_SIZE
}
