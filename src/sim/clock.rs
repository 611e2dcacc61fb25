//! Fixed-rate physics clock
//!
//! Wall-clock time since the last frame is banked in an accumulator and
//! paid out as whole physics ticks, so the simulation runs at a steady rate
//! regardless of how often frames are drawn.

use super::state::World;
use super::tick::{TickInput, tick};
use crate::settings::EngineSettings;

#[derive(Debug, Clone)]
pub struct FixedClock {
    dt: f32,
    max_substeps: u32,
    accumulator: f32,
}

impl FixedClock {
    /// A clock paying out ticks of `dt` seconds
    pub fn new(dt: f32, max_substeps: u32) -> Self {
        Self {
            dt: dt.max(f32::EPSILON),
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
        }
    }

    pub fn from_settings(settings: &EngineSettings) -> Self {
        Self::new(settings.tick_dt(), settings.max_substeps)
    }

    /// Length of one tick in seconds
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Time banked toward the next tick
    pub fn pending(&self) -> f32 {
        self.accumulator
    }

    /// Bank `elapsed` seconds and return how many ticks are due now.
    /// Anything beyond `max_substeps` ticks is dropped rather than carried.
    pub fn advance(&mut self, elapsed: f32) -> u32 {
        self.accumulator += elapsed.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= self.dt && ticks < self.max_substeps {
            self.accumulator -= self.dt;
            ticks += 1;
        }

        if ticks == self.max_substeps && self.accumulator >= self.dt {
            log::debug!("Dropping {:.3}s of simulation backlog", self.accumulator);
            self.accumulator %= self.dt;
        }
        ticks
    }

    /// Bank `elapsed` and run the due ticks on `world`.
    ///
    /// The first tick sees every command; later ticks of the same frame only
    /// repeat held movement keys.
    pub fn run(&mut self, elapsed: f32, world: &mut World, input: &TickInput) -> u32 {
        let ticks = self.advance(elapsed);
        if ticks == 0 {
            return 0;
        }

        tick(world, input);
        let held = TickInput::new(input.commands.iter().copied().filter(|c| c.is_held()));
        for _ in 1..ticks {
            tick(world, &held);
        }
        ticks
    }
}
