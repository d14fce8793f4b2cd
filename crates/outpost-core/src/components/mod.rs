//! Gameplay components.

pub mod thirst;
pub mod tool;
pub mod world;

pub use thirst::{Thirst, ThirstThreshold};
pub use tool::{QualityId, Tool};
pub use world::{SimClock, SimRng};
