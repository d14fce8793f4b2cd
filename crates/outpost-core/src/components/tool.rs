//! Tool Component
//!
//! A tool provides named qualities (cutting, welding, ...) at numeric levels
//! and pays for each completed use with either power cell charge or its own
//! durability.

use std::collections::BTreeMap;
use std::fmt;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

use outpost_engine::audio::SoundId;
use outpost_engine::damage::DamageSpec;

/// Quality id for cutting tools.
pub const CUT_QUALITY: &str = "Cutting";
/// Quality id for multitools.
pub const PULSE_QUALITY: &str = "Pulsing";

/// Identifier of a tool quality, matching a catalog prototype id.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct QualityId(pub String);

impl QualityId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }
}

impl From<&str> for QualityId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl fmt::Display for QualityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// A usable tool.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Tool {
    /// Qualities this tool was spawned with, in declaration order. Fixed
    /// configuration data.
    pub declared_qualities: Vec<(QualityId, f32)>,

    /// Quality lookup derived from `declared_qualities`. Rebuilt at
    /// initialization, so it is skipped on the wire.
    #[serde(skip)]
    pub qualities: BTreeMap<QualityId, f32>,

    /// Divides the base delay of any use of this tool. Positive.
    pub speed_modifier: f32,

    /// When set, completed uses debit `charge_use` from the tool's power
    /// cell instead of damaging the tool.
    pub uses_energy: bool,

    /// Charge debited per completed use of an energy tool. Non-negative.
    pub charge_use: f32,

    /// Damage the tool takes per completed use, for tools that wear out
    /// rather than drain a cell.
    pub damage_per_use: Option<DamageSpec>,

    /// Cue played when a use completes.
    pub use_sound: Option<SoundId>,
}

impl Tool {
    pub fn new(declared_qualities: Vec<(QualityId, f32)>) -> Self {
        let mut tool = Self {
            declared_qualities,
            qualities: BTreeMap::new(),
            speed_modifier: 1.0,
            uses_energy: false,
            charge_use: 0.0,
            damage_per_use: None,
            use_sound: None,
        };
        tool.rebuild_qualities();
        tool
    }

    pub fn with_speed_modifier(mut self, speed_modifier: f32) -> Self {
        self.speed_modifier = speed_modifier;
        self
    }

    pub fn with_energy_use(mut self, charge_use: f32) -> Self {
        self.uses_energy = true;
        self.charge_use = charge_use;
        self
    }

    pub fn with_damage_per_use(mut self, damage: DamageSpec) -> Self {
        self.damage_per_use = Some(damage);
        self
    }

    pub fn with_use_sound(mut self, sound: SoundId) -> Self {
        self.use_sound = Some(sound);
        self
    }

    /// Rebuild the derived quality lookup from the declared pairs.
    ///
    /// A direct copy: on a duplicated id the later declaration wins. Safe to
    /// call again at any time; the lookup is fully overwritten.
    pub fn rebuild_qualities(&mut self) {
        self.qualities = self.declared_qualities.iter().cloned().collect();
    }

    pub fn has_quality(&self, quality: &QualityId) -> bool {
        self.qualities.contains_key(quality)
    }

    pub fn quality_level(&self, quality: &QualityId) -> Option<f32> {
        self.qualities.get(quality).copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rebuild_derives_declared_pairs() {
        let tool = Tool::new(vec![
            (QualityId::from(CUT_QUALITY), 2.0),
            (QualityId::from("Welding"), 1.0),
        ]);

        assert_eq!(tool.qualities.len(), 2);
        assert_eq!(tool.quality_level(&QualityId::from(CUT_QUALITY)), Some(2.0));
        assert!(tool.has_quality(&QualityId::from("Welding")));
        assert!(!tool.has_quality(&QualityId::from(PULSE_QUALITY)));
    }

    #[test]
    fn test_rebuild_is_idempotent() {
        let mut tool = Tool::new(vec![(QualityId::from(CUT_QUALITY), 2.0)]);
        let first = tool.qualities.clone();

        tool.rebuild_qualities();
        assert_eq!(tool.qualities, first);
    }

    #[test]
    fn test_rebuild_overwrites_stale_entries() {
        let mut tool = Tool::new(vec![(QualityId::from(CUT_QUALITY), 2.0)]);
        tool.qualities.insert(QualityId::from("Stale"), 9.0);

        tool.rebuild_qualities();
        assert_eq!(tool.qualities.len(), 1);
        assert!(!tool.has_quality(&QualityId::from("Stale")));
    }

    #[test]
    fn test_later_duplicate_declaration_wins() {
        let tool = Tool::new(vec![
            (QualityId::from(CUT_QUALITY), 1.0),
            (QualityId::from(CUT_QUALITY), 3.0),
        ]);

        assert_eq!(tool.quality_level(&QualityId::from(CUT_QUALITY)), Some(3.0));
    }
}
