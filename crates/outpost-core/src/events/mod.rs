//! Gameplay events.

pub mod tool;

pub use tool::{SimpleDelayedEvent, ToolDoAfterEvent, ToolUseAttemptEvent, ToolUserAttemptEvent};
