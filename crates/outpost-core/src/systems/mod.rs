//! Gameplay systems.

pub mod examine;
pub mod thirst;
pub mod tool_use;

pub use thirst::{initialize_thirst, modify_thirst, update_thirst};
pub use tool_use::{default_quality_levels, has_any_quality, ToolUseStart, ToolUseSystem};
