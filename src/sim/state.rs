//! World state advanced by the simulation
//!
//! The world exclusively owns its tile map. Loading a new map parses and
//! validates the whole description before anything here is touched.

use glam::{IVec3, Vec2};

use super::catalog::TileCatalog;
use super::entity::{Entity, Player};
use super::map::TileMap;
use crate::consts::TILE_SIZE;
use crate::mapfile::{MapDescription, MapLoadError};
use crate::settings::EngineSettings;

#[derive(Debug, Clone)]
pub struct World {
    pub map: TileMap,
    pub player: Player,
    pub settings: EngineSettings,
    /// Simulation tick counter
    pub time_ticks: u64,
}

impl World {
    /// An empty world with the player at the origin
    pub fn new(settings: EngineSettings) -> Self {
        let settings = settings.sanitized();
        let mut body = Entity::new(settings.player_radius, settings.player_speed);
        body.flight = settings.player_flight;
        body.incorporeal = settings.player_incorporeal;
        Self {
            map: TileMap::new(),
            player: Player::new(body),
            settings,
            time_ticks: 0,
        }
    }

    /// Parse `json` and, only if it is valid, replace the map and respawn
    /// the player at its start tile
    pub fn load_map(&mut self, json: &str, catalog: &TileCatalog) -> Result<(), MapLoadError> {
        let description = MapDescription::parse(json, catalog)?;
        self.install(&description)
    }

    /// Replace the map with a validated description
    pub fn install(&mut self, description: &MapDescription) -> Result<(), MapLoadError> {
        let loaded = description.build()?;
        self.map.load(loaded.tiles);
        self.spawn(loaded.start);
        log::info!("Player spawned at {:?}", loaded.start);
        Ok(())
    }

    /// Put the player at the centre of tile `start`, at rest
    pub fn spawn(&mut self, start: IVec3) {
        let body = &mut self.player.body;
        body.pos = (Vec2::new(start.x as f32, start.y as f32) + 0.5) * TILE_SIZE;
        body.z = start.z;
        body.fall_ticks = 0;
        body.target = None;
        self.player.camera.pan = Vec2::ZERO;
        self.player.follow();
    }
}
