//! Damage Service
//!
//! Contract for the engine's damage subsystem, plus the damage payload type
//! and the component it maintains on damage-tracking entities.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// A damage payload: amounts per named damage type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageSpec {
    pub amounts: BTreeMap<String, f32>,
}

impl DamageSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// A payload with a single damage type.
    pub fn single(kind: impl Into<String>, amount: f32) -> Self {
        let mut amounts = BTreeMap::new();
        amounts.insert(kind.into(), amount);
        Self { amounts }
    }

    /// Sum over all damage types.
    pub fn total(&self) -> f32 {
        self.amounts.values().sum()
    }

    /// Accumulate another payload into this one.
    pub fn add(&mut self, other: &DamageSpec) {
        for (kind, amount) in &other.amounts {
            *self.amounts.entry(kind.clone()).or_insert(0.0) += amount;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.amounts.is_empty()
    }
}

/// Accumulated damage on an entity. Owned by the damage subsystem; gameplay
/// code reads it and requests changes through [`DamageSink`].
#[derive(Component, Debug, Clone, Default, Serialize, Deserialize)]
pub struct Damageable {
    pub damage: DamageSpec,
}

impl Damageable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn total_damage(&self) -> f32 {
        self.damage.total()
    }
}

/// Applies damage payloads and answers destructibility queries.
pub trait DamageSink {
    /// Apply `damage` to `target`. `allow_death` and `interrupt` control
    /// whether the hit may kill the target or break its current action.
    fn change_damage(
        &mut self,
        world: &mut World,
        target: Entity,
        damage: &DamageSpec,
        allow_death: bool,
        interrupt: bool,
    );

    /// Total damage at which `entity` is destroyed, or `0.0` when the entity
    /// is not destructible.
    fn destroyed_at(&self, world: &World, entity: Entity) -> f32;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_damage_spec_total() {
        let mut spec = DamageSpec::single("Blunt", 2.0);
        spec.add(&DamageSpec::single("Heat", 3.0));
        spec.add(&DamageSpec::single("Blunt", 1.0));

        assert_eq!(spec.total(), 6.0);
        assert_eq!(spec.amounts.get("Blunt"), Some(&3.0));
    }

    #[test]
    fn test_damageable_tracks_total() {
        let mut damageable = Damageable::new();
        assert_eq!(damageable.total_damage(), 0.0);

        damageable.damage.add(&DamageSpec::single("Blunt", 2.5));
        assert_eq!(damageable.total_damage(), 2.5);
    }
}
