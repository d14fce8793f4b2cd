//! Thirst Component
//!
//! Hydration stat with threshold-based decay: the thirstier an entity gets,
//! the slower it dehydrates further.

use std::collections::BTreeMap;

use bevy_ecs::prelude::*;
use serde::{Deserialize, Serialize};

/// Hydration bands, driest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum ThirstThreshold {
    Dead,
    Parched,
    Thirsty,
    Okay,
    HighHydrated,
    OverHydrated,
}

/// Hydration level of an entity.
#[derive(Component, Debug, Clone, Serialize, Deserialize)]
pub struct Thirst {
    /// Hydration lost per update before threshold modifiers.
    pub base_decay_rate: f32,

    /// Decay applied on the most recent update.
    pub actual_decay_rate: f32,

    /// Current hydration. A negative starting value means "roll a value
    /// between Thirsty and Okay at initialization".
    pub current: f32,

    pub current_threshold: ThirstThreshold,
    pub last_threshold: ThirstThreshold,

    /// Hydration value at which each band begins.
    pub thresholds: BTreeMap<ThirstThreshold, f32>,

    /// Decay multiplier per band.
    pub decay_modifiers: BTreeMap<ThirstThreshold, f32>,

    /// Ticks between updates.
    pub update_interval: u64,

    /// Next tick this component updates on.
    pub next_update_tick: u64,
}

impl Default for Thirst {
    fn default() -> Self {
        let thresholds = BTreeMap::from([
            (ThirstThreshold::OverHydrated, 750.0),
            (ThirstThreshold::HighHydrated, 600.0),
            (ThirstThreshold::Okay, 450.0),
            (ThirstThreshold::Thirsty, 300.0),
            (ThirstThreshold::Parched, 150.0),
            (ThirstThreshold::Dead, 0.0),
        ]);
        let decay_modifiers = BTreeMap::from([
            (ThirstThreshold::OverHydrated, 1.4),
            (ThirstThreshold::HighHydrated, 1.2),
            (ThirstThreshold::Okay, 1.0),
            (ThirstThreshold::Thirsty, 0.8),
            (ThirstThreshold::Parched, 0.6),
            (ThirstThreshold::Dead, 0.4),
        ]);
        Self {
            base_decay_rate: 0.1,
            actual_decay_rate: 0.1,
            current: -1.0,
            current_threshold: ThirstThreshold::Okay,
            last_threshold: ThirstThreshold::Okay,
            thresholds,
            decay_modifiers,
            update_interval: 1,
            next_update_tick: 0,
        }
    }
}

impl Thirst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_current(mut self, current: f32) -> Self {
        self.current = current;
        self
    }

    /// The band a given hydration value falls in: the band with the largest
    /// starting value not above `amount`.
    pub fn threshold_for(&self, amount: f32) -> ThirstThreshold {
        let mut result = ThirstThreshold::Dead;
        let mut best = f32::MIN;
        for (threshold, value) in &self.thresholds {
            if *value <= amount && *value >= best {
                result = *threshold;
                best = *value;
            }
        }
        result
    }

    /// Upper clamp for hydration.
    pub fn max_thirst(&self) -> f32 {
        self.thresholds.values().fold(0.0, |max, v| max.max(*v))
    }

    /// Decay multiplier for the current band.
    pub fn decay_modifier(&self) -> f32 {
        self.decay_modifiers
            .get(&self.current_threshold)
            .copied()
            .unwrap_or(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_threshold_bands() {
        let thirst = Thirst::new();

        assert_eq!(thirst.threshold_for(750.0), ThirstThreshold::OverHydrated);
        assert_eq!(thirst.threshold_for(600.0), ThirstThreshold::HighHydrated);
        assert_eq!(thirst.threshold_for(599.9), ThirstThreshold::Okay);
        assert_eq!(thirst.threshold_for(450.0), ThirstThreshold::Okay);
        assert_eq!(thirst.threshold_for(449.9), ThirstThreshold::Thirsty);
        assert_eq!(thirst.threshold_for(300.0), ThirstThreshold::Thirsty);
        assert_eq!(thirst.threshold_for(150.0), ThirstThreshold::Parched);
        assert_eq!(thirst.threshold_for(0.0), ThirstThreshold::Dead);
    }

    #[test]
    fn test_band_ordering() {
        assert!(ThirstThreshold::Dead < ThirstThreshold::Parched);
        assert!(ThirstThreshold::Okay < ThirstThreshold::OverHydrated);
    }

    #[test]
    fn test_decay_modifier_tracks_band() {
        let mut thirst = Thirst::new();

        thirst.current_threshold = ThirstThreshold::Parched;
        assert_eq!(thirst.decay_modifier(), 0.6);

        thirst.current_threshold = ThirstThreshold::OverHydrated;
        assert_eq!(thirst.decay_modifier(), 1.4);
    }

    #[test]
    fn test_max_thirst() {
        assert_eq!(Thirst::new().max_thirst(), 750.0);
    }
}
