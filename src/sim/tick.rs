//! Fixed timestep simulation tick
//!
//! Resolves falling, level changes and horizontal movement against the tile
//! map. A rejected move is a silent no-op; nothing in here fails.

use glam::Vec2;

use super::entity::Entity;
use super::map::TileMap;
use super::state::World;

/// Discrete movement key
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    North,
    South,
    East,
    West,
    /// Climb one level
    Ascend,
    /// Drop one level
    Descend,
}

impl Action {
    /// Unit direction on screen (y down) for horizontal actions
    pub fn direction(&self) -> Option<Vec2> {
        match self {
            Action::North => Some(Vec2::NEG_Y),
            Action::South => Some(Vec2::Y),
            Action::East => Some(Vec2::X),
            Action::West => Some(Vec2::NEG_X),
            Action::Ascend | Action::Descend => None,
        }
    }
}

/// One classified input
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Walk toward a world point over the following ticks
    MoveTo(Vec2),
    Act(Action),
    /// Shift the camera without moving the player
    Pan(Vec2),
}

impl Command {
    /// Held horizontal keys repeat on every substep; everything else is
    /// consumed by the first tick that sees it
    pub fn is_held(&self) -> bool {
        matches!(self, Command::Act(action) if action.direction().is_some())
    }
}

/// Ordered inputs for a single tick
#[derive(Debug, Clone, Default)]
pub struct TickInput {
    pub commands: Vec<Command>,
}

impl TickInput {
    pub fn new(commands: impl IntoIterator<Item = Command>) -> Self {
        Self {
            commands: commands.into_iter().collect(),
        }
    }
}

/// Outcome of the per-tick fall check
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fall {
    Supported,
    /// Unsupported, counter still below the threshold
    Falling,
    /// Counter hit the threshold and the entity dropped a level
    Dropped,
}

impl Fall {
    pub fn is_falling(&self) -> bool {
        !matches!(self, Fall::Supported)
    }
}

/// Whether nothing holds `entity` up this tick
pub fn should_fall(map: &TileMap, entity: &Entity) -> bool {
    !entity.flight
        && !map.wall_collide(entity, entity.pos, entity.z - 1)
        && !map.floor_collide(entity, entity.pos, entity.z)
        && !map.suspend_collide(entity, entity.pos, entity.z)
}

/// Advance the fall counter, dropping a level once it reaches `fall_ticks`
pub fn resolve_fall(map: &TileMap, entity: &mut Entity, fall_ticks: u32) -> Fall {
    if !should_fall(map, entity) {
        entity.fall_ticks = 0;
        return Fall::Supported;
    }

    entity.fall_ticks += 1;
    if entity.fall_ticks < fall_ticks.max(1) {
        return Fall::Falling;
    }

    entity.fall_ticks = 0;
    if vertical_down(map, entity) {
        log::debug!("Fell to level {} at {:?}", entity.z, entity.pos);
    }
    Fall::Dropped
}

/// Climb one level unless the level above blocks or floors the spot
pub fn vertical_up(map: &TileMap, entity: &mut Entity) -> bool {
    let above = entity.z + 1;
    if map.wall_collide(entity, entity.pos, above) || map.floor_collide(entity, entity.pos, above)
    {
        log::trace!("Ascend from level {} rejected", entity.z);
        return false;
    }
    entity.z = above;
    true
}

/// Drop one level unless the level below blocks the spot or the current
/// floor holds the entity
pub fn vertical_down(map: &TileMap, entity: &mut Entity) -> bool {
    let below = entity.z - 1;
    if map.wall_collide(entity, entity.pos, below)
        || map.floor_collide(entity, entity.pos, entity.z)
    {
        log::trace!("Descend from level {} rejected", entity.z);
        return false;
    }
    entity.z = below;
    true
}

/// Take one `speed`-long step along `direction`; rejected if the new spot
/// is walled off
pub fn move_by(map: &TileMap, entity: &mut Entity, direction: Vec2) -> bool {
    let Some(candidate) = entity.step_along(direction) else {
        return false;
    };
    if map.wall_collide(entity, candidate, entity.z) {
        log::trace!("Move to {:?} on level {} rejected", candidate, entity.z);
        return false;
    }
    entity.pos = candidate;
    true
}

/// Step toward the outstanding absolute-move target, clearing it once
/// within `tolerance` or when the way is blocked. A target closer than one
/// step is landed on exactly.
pub fn advance_target(map: &TileMap, entity: &mut Entity, tolerance: f32) -> bool {
    let Some(target) = entity.target else {
        return false;
    };
    let distance = (target - entity.pos).length();
    if distance <= tolerance {
        log::debug!("Reached target {:?}", target);
        entity.target = None;
        return false;
    }

    if distance <= entity.speed {
        entity.target = None;
        if map.wall_collide(entity, target, entity.z) {
            log::trace!("Final step to {:?} on level {} rejected", target, entity.z);
            return false;
        }
        entity.pos = target;
        log::debug!("Reached target {:?}", target);
        return true;
    }

    if !move_by(map, entity, target - entity.pos) {
        entity.target = None;
        return false;
    }
    true
}

fn perform(map: &TileMap, entity: &mut Entity, action: Action) -> bool {
    match action.direction() {
        Some(direction) => move_by(map, entity, direction),
        None if action == Action::Ascend => vertical_up(map, entity),
        None => vertical_down(map, entity),
    }
}

/// Advance the world by one fixed timestep
pub fn tick(world: &mut World, input: &TickInput) {
    world.time_ticks += 1;

    let fall_ticks = world.settings.fall_ticks;
    let tolerance = world.settings.move_tolerance;
    let map = &world.map;
    let player = &mut world.player;

    // Falling takes priority; only camera input gets through
    let fall = resolve_fall(map, &mut player.body, fall_ticks);

    for command in &input.commands {
        match *command {
            Command::Pan(delta) => player.camera.pan += delta,
            _ if fall.is_falling() => {}
            Command::MoveTo(target) => {
                log::debug!("Move target set to {:?}", target);
                player.body.target = Some(target);
            }
            Command::Act(action) => {
                player.body.target = None;
                perform(map, &mut player.body, action);
            }
        }
    }

    if !fall.is_falling() {
        advance_target(map, &mut player.body, tolerance);
    }

    player.follow();
}
