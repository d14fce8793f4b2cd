//! Engine-boundary contracts for the outpost gameplay crates.
//!
//! The host engine owns timing, replication, audio playback, power cells and
//! damage application. Gameplay crates only ever talk to those services
//! through the traits in this crate, so tests can substitute deterministic
//! fakes (enable the `test-fixtures` feature).

pub mod audio;
pub mod damage;
pub mod event;
pub mod power;
pub mod scheduler;

#[cfg(feature = "test-fixtures")]
pub mod fakes;

pub use audio::{AudioSink, SoundId};
pub use damage::{Damageable, DamageSink, DamageSpec};
pub use event::{DelayedEvent, EntityEvent, EventBus, EventClone};
pub use power::PowerCellPool;
pub use scheduler::{AttemptFrequency, DelayedActionScheduler, DoAfterArgs, DoAfterId};
