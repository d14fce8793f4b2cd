//! Power Cell Pool
//!
//! Contract for the engine's power cell service.

use bevy_ecs::prelude::*;

/// Access to the charge stored in an entity's power cell.
pub trait PowerCellPool {
    /// Whether the entity's cell can currently supply `amount`.
    fn has_charge(&self, world: &World, entity: Entity, amount: f32) -> bool;

    /// Debit `amount` from the entity's cell. Best-effort: the pool decides
    /// whether to clamp or accept a negative balance.
    fn try_use_charge(&mut self, world: &mut World, entity: Entity, amount: f32) -> bool;
}
