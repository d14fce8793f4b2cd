//! Outpost gameplay fragment: tool use and hydration.
//!
//! Components and systems for a networked outpost simulation, built on
//! `bevy_ecs` with the host engine's services injected through the
//! `outpost-engine` boundary traits.

pub mod catalog;
pub mod components;
pub mod events;
pub mod systems;

pub use components::*;

pub use catalog::{CatalogError, QualityCatalog, QualityPrototype};
pub use events::tool::{SimpleDelayedEvent, ToolDoAfterEvent, ToolUseAttemptEvent, ToolUserAttemptEvent};
pub use systems::tool_use::{default_quality_levels, has_any_quality, ToolUseStart, ToolUseSystem};
