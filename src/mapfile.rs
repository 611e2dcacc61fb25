//! Map descriptions: parsing, validation and serialization
//!
//! Wire format (JSON):
//! ```json
//! {
//!   "tile_types": ["{\"def\":\"Stair\",\"opts\":{\"rotation\":\"up\",\"appearance_lookup\":\"both\"}}", null],
//!   "start_pos": [0, 0, 0],
//!   "tile_data": {"0": {"0,0": 0, "1,0": 1}}
//! }
//! ```
//! Each `tile_types` entry is itself a JSON descriptor string, or null for
//! "no tile". `tile_data` maps a level to cells (`"x,y"`) holding an index
//! into `tile_types`. A description is validated as a whole; nothing is
//! produced from a partly valid one.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use glam::{IVec2, IVec3};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::sim::catalog::TileCatalog;
use crate::sim::map::TileData;
use crate::sim::shape::Rotation;
use crate::sim::tile::{Appearance, Tile, TileKind};

/// Why a single tile descriptor was rejected
#[derive(Debug, Error)]
pub enum DescriptorError {
    #[error("malformed descriptor: {0}")]
    Json(#[from] serde_json::Error),

    #[error("unknown tile kind `{0}`")]
    UnknownKind(String),

    #[error("{kind} requires a rotation")]
    MissingRotation { kind: &'static str },

    #[error("{kind} rotation `{value}` is not one of up, right, down, left")]
    InvalidRotation { kind: &'static str, value: String },

    #[error("{kind} cannot be rotated")]
    UnexpectedRotation { kind: &'static str },

    #[error("{kind} requires an appearance (one of {expected})")]
    MissingAppearance { kind: &'static str, expected: String },

    #[error("{kind} has no appearance `{value}` (expected one of {expected})")]
    UnknownAppearance {
        kind: &'static str,
        value: String,
        expected: String,
    },

    #[error("{kind} has a single appearance")]
    UnexpectedAppearance { kind: &'static str },
}

/// Failure to load a map; no part of the map is usable
#[derive(Debug, Error)]
pub enum MapLoadError {
    #[error("cannot read map: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed map: {0}")]
    Json(#[from] serde_json::Error),

    #[error("tile type {index}: {source}")]
    Descriptor {
        index: usize,
        #[source]
        source: DescriptorError,
    },

    #[error("map has no tile data")]
    EmptyTileData,

    #[error("level {z} has no tiles")]
    EmptyLevel { z: i32 },

    #[error("coordinate `{key}` is not an integer")]
    NonIntegerCoordinate { key: String },

    #[error("cell {cell:?} on level {z} uses tile type {index}, but only {count} are defined")]
    UnknownTileType {
        z: i32,
        cell: (i32, i32),
        index: usize,
        count: usize,
    },
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawMap {
    tile_types: Vec<Option<String>>,
    start_pos: [i32; 3],
    tile_data: BTreeMap<String, BTreeMap<String, usize>>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawDescriptor {
    // Explicit null means "no tile"; a missing field is an error
    #[serde(deserialize_with = "Option::deserialize")]
    def: Option<String>,
    #[serde(default)]
    opts: RawOptions,
}

#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
struct RawOptions {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    rotation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    appearance_lookup: Option<String>,
}

/// A resolved tile definition: kind plus the rotation and appearance it
/// requires. Reused to build every tile that references it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileDef {
    pub kind: TileKind,
    pub rotation: Option<Rotation>,
    pub appearance: Option<Appearance>,
}

impl TileDef {
    /// Check `rotation` and `appearance` against what the named kind needs
    pub fn resolve(
        catalog: &TileCatalog,
        kind_id: &str,
        rotation: Option<&str>,
        appearance: Option<&str>,
    ) -> Result<Self, DescriptorError> {
        let kind = catalog
            .lookup(kind_id)
            .ok_or_else(|| DescriptorError::UnknownKind(kind_id.to_string()))?;
        let name = kind.id();

        let rotation = match (kind.rotatable(), rotation) {
            (true, Some(value)) => Some(Rotation::from_str(value).ok_or_else(|| {
                DescriptorError::InvalidRotation {
                    kind: name,
                    value: value.to_string(),
                }
            })?),
            (true, None) => return Err(DescriptorError::MissingRotation { kind: name }),
            (false, Some(_)) => return Err(DescriptorError::UnexpectedRotation { kind: name }),
            (false, None) => None,
        };

        let expected = || kind.appearance_keys().join(", ");
        let appearance = match (kind.has_variants(), appearance) {
            (true, Some(value)) => Some(kind.parse_appearance(value).ok_or_else(|| {
                DescriptorError::UnknownAppearance {
                    kind: name,
                    value: value.to_string(),
                    expected: expected(),
                }
            })?),
            (true, None) => {
                return Err(DescriptorError::MissingAppearance {
                    kind: name,
                    expected: expected(),
                });
            }
            (false, Some(_)) => return Err(DescriptorError::UnexpectedAppearance { kind: name }),
            (false, None) => None,
        };

        Ok(Self {
            kind,
            rotation,
            appearance,
        })
    }

    /// Parse one descriptor string; `Ok(None)` for "no tile"
    pub fn from_descriptor(
        catalog: &TileCatalog,
        descriptor: &str,
    ) -> Result<Option<Self>, DescriptorError> {
        let raw: RawDescriptor = serde_json::from_str(descriptor)?;
        raw.def
            .map(|def| {
                Self::resolve(
                    catalog,
                    &def,
                    raw.opts.rotation.as_deref(),
                    raw.opts.appearance_lookup.as_deref(),
                )
            })
            .transpose()
    }

    pub fn to_descriptor(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(&RawDescriptor {
            def: Some(self.kind.id().to_string()),
            opts: RawOptions {
                rotation: self.rotation.map(|r| r.as_str().to_string()),
                appearance_lookup: self.appearance.map(|a| a.key().to_string()),
            },
        })
    }

    pub fn build(&self, pos: IVec3) -> Tile {
        Tile::new(self.kind, pos, self.rotation, self.appearance)
    }
}

/// Tiles and start position produced from a description
#[derive(Debug, Clone)]
pub struct LoadedMap {
    pub tiles: TileData,
    pub start: IVec3,
}

/// A typed map description
#[derive(Debug, Clone, PartialEq)]
pub struct MapDescription {
    /// `None` entries place cells with no tile
    pub tile_types: Vec<Option<TileDef>>,
    /// Start tile (x, y, z)
    pub start: IVec3,
    /// Level -> (x, y) -> index into `tile_types`
    pub tile_data: BTreeMap<i32, BTreeMap<(i32, i32), usize>>,
}

impl MapDescription {
    pub fn parse(json: &str, catalog: &TileCatalog) -> Result<Self, MapLoadError> {
        let raw: RawMap = serde_json::from_str(json)?;

        let tile_types = raw
            .tile_types
            .iter()
            .enumerate()
            .map(|(index, descriptor)| match descriptor {
                Some(text) => TileDef::from_descriptor(catalog, text)
                    .map_err(|source| MapLoadError::Descriptor { index, source }),
                None => Ok(None),
            })
            .collect::<Result<Vec<_>, _>>()?;

        let mut tile_data = BTreeMap::new();
        for (z_key, cells) in &raw.tile_data {
            let z = parse_int(z_key)?;
            let mut level = BTreeMap::new();
            for (cell_key, index) in cells {
                level.insert(parse_cell(cell_key)?, *index);
            }
            tile_data.insert(z, level);
        }

        let description = Self {
            tile_types,
            start: IVec3::from_array(raw.start_pos),
            tile_data,
        };
        description.validate()?;
        Ok(description)
    }

    pub fn from_path(path: impl AsRef<Path>, catalog: &TileCatalog) -> Result<Self, MapLoadError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let description = Self::parse(&json, catalog)?;
        log::info!(
            "Parsed map {} ({} tile types, {} levels)",
            path.display(),
            description.tile_types.len(),
            description.tile_data.len()
        );
        Ok(description)
    }

    pub fn to_json(&self) -> Result<String, MapLoadError> {
        let tile_types = self
            .tile_types
            .iter()
            .map(|def| def.map(|d| d.to_descriptor()).transpose())
            .collect::<Result<Vec<_>, _>>()?;
        let tile_data = self
            .tile_data
            .iter()
            .map(|(z, cells)| {
                let cells = cells
                    .iter()
                    .map(|((x, y), index)| (format!("{x},{y}"), *index))
                    .collect();
                (z.to_string(), cells)
            })
            .collect();
        Ok(serde_json::to_string(&RawMap {
            tile_types,
            start_pos: self.start.to_array(),
            tile_data,
        })?)
    }

    /// Structural checks that do not depend on the wire format
    pub fn validate(&self) -> Result<(), MapLoadError> {
        if self.tile_data.is_empty() {
            return Err(MapLoadError::EmptyTileData);
        }
        for (&z, cells) in &self.tile_data {
            if cells.is_empty() {
                return Err(MapLoadError::EmptyLevel { z });
            }
            for (&cell, &index) in cells {
                if index >= self.tile_types.len() {
                    return Err(MapLoadError::UnknownTileType {
                        z,
                        cell,
                        index,
                        count: self.tile_types.len(),
                    });
                }
            }
        }
        Ok(())
    }

    /// Instantiate one tile per cell
    pub fn build(&self) -> Result<LoadedMap, MapLoadError> {
        self.validate()?;
        let tiles = self
            .tile_data
            .iter()
            .map(|(&z, cells)| {
                let level: HashMap<IVec2, Option<Tile>> = cells
                    .iter()
                    .map(|(&(x, y), &index)| {
                        let pos = IVec3::new(x, y, z);
                        (pos.truncate(), self.tile_types[index].map(|def| def.build(pos)))
                    })
                    .collect();
                (z, level)
            })
            .collect();
        Ok(LoadedMap {
            tiles,
            start: self.start,
        })
    }
}

fn parse_int(key: &str) -> Result<i32, MapLoadError> {
    key.trim()
        .parse()
        .map_err(|_| MapLoadError::NonIntegerCoordinate {
            key: key.to_string(),
        })
}

fn parse_cell(key: &str) -> Result<(i32, i32), MapLoadError> {
    let (x, y) = key
        .split_once(',')
        .ok_or_else(|| MapLoadError::NonIntegerCoordinate {
            key: key.to_string(),
        })?;
    match (parse_int(x), parse_int(y)) {
        (Ok(x), Ok(y)) => Ok((x, y)),
        _ => Err(MapLoadError::NonIntegerCoordinate {
            key: key.to_string(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::shape::WallGeometry;
    use crate::sim::tile::StairDirection;

    fn catalog() -> TileCatalog {
        TileCatalog::standard()
    }

    fn single(descriptor: &str) -> String {
        serde_json::json!({
            "tile_types": [descriptor],
            "start_pos": [0, 0, 0],
            "tile_data": {"0": {"0,0": 0}},
        })
        .to_string()
    }

    #[test]
    fn test_stair_requires_rotation() {
        let err = MapDescription::parse(&single(r#"{"def":"Stair","opts":{}}"#), &catalog())
            .unwrap_err();
        assert!(matches!(
            err,
            MapLoadError::Descriptor {
                index: 0,
                source: DescriptorError::MissingRotation { kind: "Stair" }
            }
        ));
    }

    #[test]
    fn test_stair_with_options_loads_with_direction_flags() {
        let json = single(
            r#"{"def":"Stair","opts":{"rotation":"left","appearance_lookup":"up"}}"#,
        );
        let loaded = MapDescription::parse(&json, &catalog())
            .and_then(|d| d.build())
            .unwrap();
        let tile = loaded.tiles[&0][&IVec2::ZERO].clone().unwrap();
        assert_eq!(tile.kind(), TileKind::Stair);
        assert_eq!(tile.rotation(), Some(Rotation::Left));
        assert!(tile.flags().suspend_up);
        assert!(!tile.flags().suspend_down);
    }

    #[test]
    fn test_descriptor_errors() {
        let cases = [
            (r#"{"def":"Lava","opts":{}}"#, "unknown"),
            (r#"{"def":"Wall","opts":{"rotation":"up"}}"#, "missing appearance"),
            (
                r#"{"def":"Wall","opts":{"rotation":"sideways","appearance_lookup":"square"}}"#,
                "invalid rotation",
            ),
            (
                r#"{"def":"Wall","opts":{"rotation":"up","appearance_lookup":"hexagon"}}"#,
                "unknown appearance",
            ),
            (r#"{"def":"Floor","opts":{"rotation":"up"}}"#, "unexpected rotation"),
            (r#"{"def":"Floor","opts":{"appearance_lookup":"square"}}"#, "unexpected appearance"),
            (r#"{"opts":{}}"#, "missing def"),
            (r#"{"def":"Floor","opts":{"colour":"red"}}"#, "unknown option"),
            ("not json", "syntax"),
        ];
        for (descriptor, label) in cases {
            let result = MapDescription::parse(&single(descriptor), &catalog());
            assert!(
                matches!(result, Err(MapLoadError::Descriptor { index: 0, .. })),
                "{label}: {result:?}"
            );
        }
    }

    #[test]
    fn test_structural_errors() {
        let c = catalog();
        let floor = r#"{\"def\":\"Floor\",\"opts\":{}}"#;
        let map = |start: &str, data: &str| {
            format!(r#"{{"tile_types": ["{floor}"], "start_pos": {start}, "tile_data": {data}}}"#)
        };

        assert!(MapDescription::parse(&map("[0,0,0]", r#"{"0":{"0,0":0}}"#), &c).is_ok());
        assert!(matches!(
            MapDescription::parse(&map("[0,0.5,0]", r#"{"0":{"0,0":0}}"#), &c),
            Err(MapLoadError::Json(_))
        ));
        assert!(matches!(
            MapDescription::parse(&map("[0,0]", r#"{"0":{"0,0":0}}"#), &c),
            Err(MapLoadError::Json(_))
        ));
        assert!(matches!(
            MapDescription::parse(&map("[0,0,0]", "{}"), &c),
            Err(MapLoadError::EmptyTileData)
        ));
        assert!(matches!(
            MapDescription::parse(&map("[0,0,0]", r#"{"0":{"0,0":0},"1":{}}"#), &c),
            Err(MapLoadError::EmptyLevel { z: 1 })
        ));
        assert!(matches!(
            MapDescription::parse(&map("[0,0,0]", r#"{"0":{"0.5,0":0}}"#), &c),
            Err(MapLoadError::NonIntegerCoordinate { .. })
        ));
        assert!(matches!(
            MapDescription::parse(&map("[0,0,0]", r#"{"z":{"0,0":0}}"#), &c),
            Err(MapLoadError::NonIntegerCoordinate { .. })
        ));
        assert!(matches!(
            MapDescription::parse(&map("[0,0,0]", r#"{"0":{"0,0":3}}"#), &c),
            Err(MapLoadError::UnknownTileType { index: 3, count: 1, .. })
        ));
        assert!(matches!(
            MapDescription::parse(r#"{"tile_types": [], "start_pos": [0,0,0]}"#, &c),
            Err(MapLoadError::Json(_))
        ));
    }

    #[test]
    fn test_no_tile_entries_widen_bounds_only() {
        let json = serde_json::json!({
            "tile_types": [r#"{"def":"Floor","opts":{}}"#, null, r#"{"def":null,"opts":{}}"#],
            "start_pos": [0, 0, 0],
            "tile_data": {"0": {"0,0": 0, "5,0": 1, "-2,3": 2}},
        })
        .to_string();
        let description = MapDescription::parse(&json, &catalog()).unwrap();
        assert_eq!(description.tile_types[1], None);
        assert_eq!(description.tile_types[2], None);

        let level = &description.build().unwrap().tiles[&0];
        assert_eq!(level.len(), 3);
        assert!(level[&IVec2::new(5, 0)].is_none());
        assert!(level[&IVec2::new(-2, 3)].is_none());
    }

    #[test]
    fn test_round_trip_preserves_definitions() {
        let description = MapDescription {
            tile_types: vec![
                Some(TileDef {
                    kind: TileKind::Floor,
                    rotation: None,
                    appearance: None,
                }),
                Some(TileDef {
                    kind: TileKind::Wall,
                    rotation: Some(Rotation::Down),
                    appearance: Some(Appearance::Geometry(WallGeometry::DoubleConcave)),
                }),
                Some(TileDef {
                    kind: TileKind::FloorStair,
                    rotation: Some(Rotation::Right),
                    appearance: Some(Appearance::Stair(StairDirection::Both)),
                }),
                None,
            ],
            start: IVec3::new(1, -1, 2),
            tile_data: BTreeMap::from([
                (0, BTreeMap::from([((0, 0), 0), ((1, 0), 1)])),
                (2, BTreeMap::from([((1, -1), 2), ((-4, 7), 3)])),
            ]),
        };
        let json = description.to_json().unwrap();
        assert_eq!(MapDescription::parse(&json, &catalog()).unwrap(), description);
    }

    #[test]
    fn test_missing_file_is_io_error() {
        assert!(matches!(
            MapDescription::from_path("/nonexistent/tilefall/map.json", &catalog()),
            Err(MapLoadError::Io(_))
        ));
    }
}
