//! tilefall demo entry point
//!
//! Loads a map (the built-in demo map unless a path is given), then drives
//! the player through a short scripted route on the fixed-rate clock and
//! logs where it ends up after each leg.
//!
//! Usage: `tilefall [MAP.json] [SETTINGS.json]`

#[cfg(not(target_arch = "wasm32"))]
fn main() -> std::process::ExitCode {
    native::run()
}

#[cfg(target_arch = "wasm32")]
fn main() {
    // The library is the wasm surface; there is no browser demo
}

#[cfg(not(target_arch = "wasm32"))]
mod native {
    use std::process::ExitCode;

    use glam::Vec2;

    use tilefall::consts::TILE_SIZE;
    use tilefall::sim::{Action, Command, FixedClock, TickInput, TileCatalog, World};
    use tilefall::{EngineSettings, MapDescription};

    const SETTINGS_PATH: &str = "tilefall.json";
    const FRAME_SECONDS: f32 = 1.0 / 60.0;

    /// Two storeys: a stair at (1,1) leads up, a hole at (4,1) leads back down
    const DEMO_MAP: &str = r#"{
        "tile_types": [
            "{\"def\":\"Floor\",\"opts\":{}}",
            "{\"def\":\"Stair\",\"opts\":{\"rotation\":\"right\",\"appearance_lookup\":\"both\"}}",
            "{\"def\":\"Wall\",\"opts\":{\"rotation\":\"up\",\"appearance_lookup\":\"circle\"}}",
            null
        ],
        "start_pos": [0, 1, 0],
        "tile_data": {
            "0": {
                "0,0": 0, "1,0": 0, "2,0": 0, "3,0": 0, "4,0": 0, "5,0": 0,
                "0,1": 0, "1,1": 0, "2,1": 0, "3,1": 0, "4,1": 0, "5,1": 0,
                "0,2": 0, "1,2": 0, "2,2": 0, "3,2": 0, "4,2": 0, "5,2": 0
            },
            "1": {
                "0,0": 0, "1,0": 0, "2,0": 2, "3,0": 0, "4,0": 0, "5,0": 0,
                "0,1": 3, "1,1": 1, "2,1": 0, "3,1": 0, "4,1": 3, "5,1": 0,
                "0,2": 0, "1,2": 0, "2,2": 0, "3,2": 0, "4,2": 0, "5,2": 0
            }
        }
    }"#;

    struct Leg {
        name: &'static str,
        frames: u32,
        input: TickInput,
    }

    fn route() -> Vec<Leg> {
        let tile_centre = |x: f32, y: f32| Vec2::new(x + 0.5, y + 0.5) * TILE_SIZE;
        vec![
            Leg {
                name: "walk to the stair",
                frames: 60,
                input: TickInput::new([Command::MoveTo(tile_centre(1.0, 1.0))]),
            },
            Leg {
                name: "climb",
                frames: 1,
                input: TickInput::new([Command::Act(Action::Ascend)]),
            },
            Leg {
                name: "head east along the upper floor",
                frames: 90,
                input: TickInput::new([Command::Act(Action::East)]),
            },
            Leg {
                name: "stand still",
                frames: 60,
                input: TickInput::default(),
            },
            Leg {
                name: "look around",
                frames: 1,
                input: TickInput::new([Command::Pan(Vec2::new(-TILE_SIZE, 0.0))]),
            },
        ]
    }

    pub fn run() -> ExitCode {
        env_logger::init();
        log::info!("tilefall demo starting...");

        let mut args = std::env::args().skip(1);
        let map_path = args.next();
        let settings_path = args.next().unwrap_or_else(|| SETTINGS_PATH.to_string());

        let settings = EngineSettings::load_or_default(&settings_path);
        let catalog = TileCatalog::standard();
        let mut world = World::new(settings);

        let loaded = match &map_path {
            Some(path) => MapDescription::from_path(path, &catalog)
                .and_then(|description| world.install(&description)),
            None => world.load_map(DEMO_MAP, &catalog),
        };
        if let Err(e) = loaded {
            log::error!(
                "Failed to load {}: {e}",
                map_path.as_deref().unwrap_or("demo map")
            );
            return ExitCode::FAILURE;
        }
        log::info!(
            "Map loaded: {} tiles on {} levels",
            world.map.tile_count(),
            world.map.surfaces().count()
        );
        for surface in world.map.surfaces() {
            log::info!(
                "Level {}: {:?} tiles, origin {:?}, size {:?}",
                surface.z,
                surface.tiles(),
                surface.origin(),
                surface.pixel_size()
            );
        }

        let mut clock = FixedClock::from_settings(&world.settings);
        for leg in route() {
            let mut ticks = 0;
            for _ in 0..leg.frames {
                ticks += clock.run(FRAME_SECONDS, &mut world, &leg.input);
            }
            let body = &world.player.body;
            log::info!(
                "{} ({} ticks): pos=({:.1}, {:.1}) z={} falling={} camera={:?}",
                leg.name,
                ticks,
                body.pos.x,
                body.pos.y,
                body.z,
                body.is_falling(),
                world.player.camera.center()
            );
        }

        log::info!("Demo finished after {} ticks", world.time_ticks);
        ExitCode::SUCCESS
    }
}
