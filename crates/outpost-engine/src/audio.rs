//! Audio Sink
//!
//! Contract for the engine's audio playback service.

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Identifier of an audio cue known to the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SoundId(pub String);

impl SoundId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

/// Plays audio cues positioned at an entity.
pub trait AudioSink {
    fn play(&mut self, world: &mut World, sound: &SoundId, source: Entity);
}
