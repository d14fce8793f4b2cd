//! Tool Examination
//!
//! Read-only projection of a tool's qualities and condition into a report.

use bevy_ecs::prelude::*;

use outpost_engine::damage::Damageable;

use crate::components::tool::Tool;
use crate::systems::tool_use::ToolUseSystem;

impl ToolUseSystem {
    /// Describe a tool's qualities, and its condition when it wears out.
    ///
    /// Returns `None` for tools without qualities. Quality ids missing from
    /// the catalog are skipped. The condition line is omitted when the tool
    /// is not destructible (a zero threshold).
    pub fn describe(&self, world: &World, tool: Entity) -> Option<String> {
        let tool_comp = world.get::<Tool>(tool)?;
        if tool_comp.qualities.is_empty() {
            return None;
        }

        let qualities: Vec<String> = tool_comp
            .qualities
            .iter()
            .filter_map(|(id, level)| {
                self.catalog()
                    .get(id)
                    .map(|prototype| format!("{} {}", prototype.name, level))
            })
            .collect();
        if qualities.is_empty() {
            return None;
        }

        let mut report = format!("Qualities: {}", qualities.join(", "));

        if let Some(damageable) = world.get::<Damageable>(tool) {
            let threshold = self.damage_service().destroyed_at(world, tool);
            if threshold != 0.0 {
                let percent = 100.0 - damageable.total_damage() / threshold * 100.0;
                report.push_str(&format!("\nCondition: {percent:.0}% remaining"));
            }
        }

        Some(report)
    }
}
