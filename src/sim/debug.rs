//! Named, typed runtime parameters for the debug console
//!
//! Each hook reads and writes one field of the world. Values arrive as text
//! from the console and are parsed according to the hook's type.

use std::fmt;

use thiserror::Error;

use super::state::World;
use crate::consts::MAX_ENTITY_RADIUS;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DebugError {
    #[error("unknown debug hook `{0}`")]
    UnknownHook(String),

    #[error("`{hook}` expects {expected}, got `{value}`")]
    InvalidValue {
        hook: &'static str,
        expected: &'static str,
        value: String,
    },

    #[error("`{0}` is not a flag")]
    NotToggleable(&'static str),
}

/// A hook's current value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DebugValue {
    Flag(bool),
    Real(f32),
    Level(i32),
    Count(u32),
}

impl fmt::Display for DebugValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DebugValue::Flag(v) => write!(f, "{v}"),
            DebugValue::Real(v) => write!(f, "{v}"),
            DebugValue::Level(v) => write!(f, "{v}"),
            DebugValue::Count(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DebugHook {
    PlayerIncorporeal,
    PlayerFlight,
    PlayerSpeed,
    PlayerRadius,
    PlayerZ,
    FallTicks,
}

impl DebugHook {
    pub const ALL: [DebugHook; 6] = [
        DebugHook::PlayerIncorporeal,
        DebugHook::PlayerFlight,
        DebugHook::PlayerSpeed,
        DebugHook::PlayerRadius,
        DebugHook::PlayerZ,
        DebugHook::FallTicks,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            DebugHook::PlayerIncorporeal => "player.incorporeal",
            DebugHook::PlayerFlight => "player.flight",
            DebugHook::PlayerSpeed => "player.speed",
            DebugHook::PlayerRadius => "player.radius",
            DebugHook::PlayerZ => "player.z",
            DebugHook::FallTicks => "world.fall_ticks",
        }
    }

    pub fn lookup(name: &str) -> Result<Self, DebugError> {
        Self::ALL
            .into_iter()
            .find(|hook| hook.name() == name)
            .ok_or_else(|| DebugError::UnknownHook(name.to_string()))
    }

    pub fn get(&self, world: &World) -> DebugValue {
        let body = &world.player.body;
        match self {
            DebugHook::PlayerIncorporeal => DebugValue::Flag(body.incorporeal),
            DebugHook::PlayerFlight => DebugValue::Flag(body.flight),
            DebugHook::PlayerSpeed => DebugValue::Real(body.speed),
            DebugHook::PlayerRadius => DebugValue::Real(body.radius),
            DebugHook::PlayerZ => DebugValue::Level(body.z),
            DebugHook::FallTicks => DebugValue::Count(world.settings.fall_ticks),
        }
    }

    /// Parse `raw` by this hook's type and store it
    pub fn set(&self, world: &mut World, raw: &str) -> Result<DebugValue, DebugError> {
        let raw = raw.trim();
        let value = match self.get(world) {
            DebugValue::Flag(_) => DebugValue::Flag(self.parse(raw, "a boolean")?),
            DebugValue::Real(_) => {
                let v: f32 = self.parse(raw, "a non-negative number")?;
                if !v.is_finite() || v < 0.0 {
                    return Err(self.invalid(raw, "a non-negative number"));
                }
                if *self == DebugHook::PlayerRadius && v > MAX_ENTITY_RADIUS {
                    return Err(self.invalid(raw, "a radius no larger than 256"));
                }
                DebugValue::Real(v)
            }
            DebugValue::Level(_) => DebugValue::Level(self.parse(raw, "an integer")?),
            DebugValue::Count(_) => DebugValue::Count(self.parse(raw, "a whole number")?),
        };
        self.store(world, value);
        log::info!("{} = {}", self.name(), value);
        Ok(value)
    }

    /// Flip a boolean hook, returning the new state
    pub fn toggle(&self, world: &mut World) -> Result<bool, DebugError> {
        match self.get(world) {
            DebugValue::Flag(v) => {
                self.store(world, DebugValue::Flag(!v));
                log::info!("{} = {}", self.name(), !v);
                Ok(!v)
            }
            _ => Err(DebugError::NotToggleable(self.name())),
        }
    }

    fn store(&self, world: &mut World, value: DebugValue) {
        let body = &mut world.player.body;
        match (self, value) {
            (DebugHook::PlayerIncorporeal, DebugValue::Flag(v)) => body.incorporeal = v,
            (DebugHook::PlayerFlight, DebugValue::Flag(v)) => body.flight = v,
            (DebugHook::PlayerSpeed, DebugValue::Real(v)) => body.speed = v,
            (DebugHook::PlayerRadius, DebugValue::Real(v)) => body.radius = v,
            (DebugHook::PlayerZ, DebugValue::Level(v)) => body.z = v,
            (DebugHook::FallTicks, DebugValue::Count(v)) => world.settings.fall_ticks = v,
            (hook, value) => unreachable!("{} cannot hold {:?}", hook.name(), value),
        }
    }

    fn parse<T: std::str::FromStr>(
        &self,
        raw: &str,
        expected: &'static str,
    ) -> Result<T, DebugError> {
        raw.parse().map_err(|_| self.invalid(raw, expected))
    }

    fn invalid(&self, raw: &str, expected: &'static str) -> DebugError {
        DebugError::InvalidValue {
            hook: self.name(),
            expected,
            value: raw.to_string(),
        }
    }
}

/// Set the hook called `name` from console text
pub fn set(world: &mut World, name: &str, raw: &str) -> Result<DebugValue, DebugError> {
    DebugHook::lookup(name)?.set(world, raw)
}

/// Flip the boolean hook called `name`
pub fn toggle(world: &mut World, name: &str) -> Result<bool, DebugError> {
    DebugHook::lookup(name)?.toggle(world)
}

pub fn get(world: &World, name: &str) -> Result<DebugValue, DebugError> {
    Ok(DebugHook::lookup(name)?.get(world))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::EngineSettings;

    fn world() -> World {
        World::new(EngineSettings::default())
    }

    #[test]
    fn test_toggle_flags() {
        let mut w = world();
        assert_eq!(toggle(&mut w, "player.incorporeal"), Ok(true));
        assert!(w.player.body.incorporeal);
        assert_eq!(toggle(&mut w, "player.flight"), Ok(true));
        assert_eq!(toggle(&mut w, "player.flight"), Ok(false));
        assert_eq!(
            toggle(&mut w, "player.speed"),
            Err(DebugError::NotToggleable("player.speed"))
        );
    }

    #[test]
    fn test_set_parses_by_type() {
        let mut w = world();
        assert_eq!(set(&mut w, "player.speed", " 7.5 "), Ok(DebugValue::Real(7.5)));
        assert_eq!(w.player.body.speed, 7.5);
        assert_eq!(set(&mut w, "player.z", "-2"), Ok(DebugValue::Level(-2)));
        assert_eq!(set(&mut w, "world.fall_ticks", "12"), Ok(DebugValue::Count(12)));
        assert_eq!(w.settings.fall_ticks, 12);
        assert_eq!(get(&w, "player.z"), Ok(DebugValue::Level(-2)));
    }

    #[test]
    fn test_set_rejects_bad_values() {
        let mut w = world();
        assert!(matches!(
            set(&mut w, "player.radius", "-1"),
            Err(DebugError::InvalidValue { .. })
        ));
        assert!(matches!(
            set(&mut w, "player.flight", "yes"),
            Err(DebugError::InvalidValue { .. })
        ));
        assert!(matches!(
            set(&mut w, "world.fall_ticks", "1.5"),
            Err(DebugError::InvalidValue { .. })
        ));
        assert_eq!(
            set(&mut w, "player.pos", "0"),
            Err(DebugError::UnknownHook("player.pos".to_string()))
        );
    }

    #[test]
    fn test_radius_is_capped() {
        let mut w = world();
        assert_eq!(
            set(&mut w, "player.radius", "256"),
            Ok(DebugValue::Real(MAX_ENTITY_RADIUS))
        );
        assert!(matches!(
            set(&mut w, "player.radius", "1e30"),
            Err(DebugError::InvalidValue { .. })
        ));
        assert_eq!(w.player.body.radius, MAX_ENTITY_RADIUS);

        // The largest radius still ticks
        crate::sim::tick::tick(&mut w, &crate::sim::tick::TickInput::default());
        assert_eq!(w.time_ticks, 1);
    }

    #[test]
    fn test_hook_names_are_unique() {
        for hook in DebugHook::ALL {
            assert_eq!(DebugHook::lookup(hook.name()), Ok(hook));
        }
    }
}
