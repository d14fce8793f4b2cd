//! World Resources
//!
//! Shared simulation state: the tick clock and the seeded RNG.

use bevy_ecs::prelude::*;
use rand::rngs::SmallRng;
use rand::SeedableRng;

/// Simulation clock, advanced once per tick by the host engine.
#[derive(Resource, Debug, Clone, Default)]
pub struct SimClock {
    pub current_tick: u64,
}

/// Seeded random number generator resource
#[derive(Resource)]
pub struct SimRng(pub SmallRng);

impl SimRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}
