//! Tool Use System
//!
//! Gates, schedules and settles delayed tool uses. A use is admitted against
//! the tool's qualities, resource availability and three veto stages, then
//! runs as a timed action on the engine scheduler; the completion callback
//! settles the resource cost and forwards the caller's wrapped event.

use std::collections::BTreeMap;
use std::time::Duration;

use bevy_ecs::prelude::*;

use outpost_engine::audio::AudioSink;
use outpost_engine::damage::{Damageable, DamageSink};
use outpost_engine::event::{DelayedEvent, EntityEvent, EventBus};
use outpost_engine::power::PowerCellPool;
use outpost_engine::scheduler::{
    AttemptFrequency, DelayedActionScheduler, DoAfterArgs, DoAfterId,
};

use crate::catalog::QualityCatalog;
use crate::components::tool::{QualityId, Tool};
use crate::events::tool::{ToolDoAfterEvent, ToolUseAttemptEvent, ToolUserAttemptEvent};

/// Result of a tool-use request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ToolUseStart {
    /// Whether an interaction took place. Started does not mean the action
    /// will succeed; listen for the wrapped completion event.
    pub started: bool,

    /// Identifier of the created action. May be `None` even when started,
    /// when this use superseded an identical pending action.
    pub do_after_id: Option<DoAfterId>,
}

impl ToolUseStart {
    pub fn refused() -> Self {
        Self {
            started: false,
            do_after_id: None,
        }
    }
}

/// A level-1.0 requirement map over the given quality ids, for tools that
/// only care about presence, not tiers.
pub fn default_quality_levels<I>(qualities: I) -> BTreeMap<QualityId, f32>
where
    I: IntoIterator<Item = QualityId>,
{
    qualities.into_iter().map(|id| (id, 1.0)).collect()
}

/// Whether any of `candidates` appears as a key of `requirements`.
pub fn has_any_quality(requirements: &BTreeMap<QualityId, f32>, candidates: &[QualityId]) -> bool {
    candidates.iter().any(|id| requirements.contains_key(id))
}

/// Tool use gating and lifecycle, over injected engine services.
pub struct ToolUseSystem {
    scheduler: Box<dyn DelayedActionScheduler>,
    power: Box<dyn PowerCellPool>,
    damage: Box<dyn DamageSink>,
    audio: Box<dyn AudioSink>,
    bus: Box<dyn EventBus>,
    catalog: QualityCatalog,
}

impl ToolUseSystem {
    pub fn new(
        scheduler: Box<dyn DelayedActionScheduler>,
        power: Box<dyn PowerCellPool>,
        damage: Box<dyn DamageSink>,
        audio: Box<dyn AudioSink>,
        bus: Box<dyn EventBus>,
        catalog: QualityCatalog,
    ) -> Self {
        Self {
            scheduler,
            power,
            damage,
            audio,
            bus,
            catalog,
        }
    }

    pub fn catalog(&self) -> &QualityCatalog {
        &self.catalog
    }

    pub(crate) fn damage_service(&self) -> &dyn DamageSink {
        self.damage.as_ref()
    }

    /// Derive the tool's quality lookup from its declared pairs. Must run
    /// before the tool is used; safe to run again.
    pub fn initialize(&self, world: &mut World, tool: Entity) -> bool {
        let Some(mut tool_comp) = world.get_mut::<Tool>(tool) else {
            return false;
        };
        tool_comp.rebuild_qualities();
        true
    }

    /// Whether the tool has the given quality at any level.
    pub fn has_quality(&self, world: &World, tool: Entity, quality: &QualityId) -> bool {
        world
            .get::<Tool>(tool)
            .is_some_and(|tool| tool.has_quality(quality))
    }

    /// Whether the tool has the given quality at `min_level` or above.
    pub fn has_min_quality_level(
        &self,
        world: &World,
        tool: Entity,
        quality: &QualityId,
        min_level: f32,
    ) -> bool {
        world.get::<Tool>(tool).is_some_and(|tool| {
            tool.quality_level(quality)
                .is_some_and(|level| level >= min_level)
        })
    }

    /// Whether a tool use may begin right now.
    ///
    /// Gates run in order and stop at the first failure: required qualities,
    /// charge availability for energy tools, then the user, tool and target
    /// veto stages. The tool and target stages share one event object, so a
    /// veto raised at the tool stays visible at the target but can never be
    /// cleared.
    pub fn can_start_use(
        &mut self,
        world: &mut World,
        tool: Entity,
        user: Entity,
        target: Option<Entity>,
        fuel: f32,
        requirements: &BTreeMap<QualityId, f32>,
    ) -> bool {
        let Some(tool_comp) = world.get::<Tool>(tool) else {
            return false;
        };

        for (quality, min_level) in requirements {
            let satisfied = tool_comp
                .quality_level(quality)
                .is_some_and(|level| level >= *min_level);
            if !satisfied {
                tracing::debug!(?tool, quality = %quality, "tool use refused: missing quality");
                return false;
            }
        }

        let uses_energy = tool_comp.uses_energy;
        let charge_use = tool_comp.charge_use;

        // Availability only; the debit happens at completion.
        if uses_energy && !self.power.has_charge(world, tool, charge_use) {
            tracing::debug!(?tool, charge_use, "tool use refused: insufficient charge");
            return false;
        }

        // Does the user allow using the tool?
        let mut user_attempt = ToolUserAttemptEvent::new(target);
        self.bus.raise_targeted(world, user, &mut user_attempt);
        if user_attempt.cancelled() {
            return false;
        }

        // Does the tool allow being used?
        let mut attempt = ToolUseAttemptEvent::new(user, fuel);
        self.bus.raise_targeted(world, tool, &mut attempt);
        if attempt.cancelled() {
            return false;
        }

        // Does the target allow the tool being used on it?
        if let Some(target) = target {
            if target != tool {
                self.bus.raise_targeted(world, target, &mut attempt);
            }
        }

        !attempt.cancelled()
    }

    /// Use a tool on `target`, starting a delayed action.
    ///
    /// Returns with `started` when an interaction occurred; the wrapped
    /// `event` fires at `target` (or broadcasts, when there is none) once
    /// the action completes or is interrupted.
    pub fn use_tool(
        &mut self,
        world: &mut World,
        tool: Entity,
        user: Entity,
        target: Option<Entity>,
        delay: Duration,
        requirements: &BTreeMap<QualityId, f32>,
        event: Box<dyn DelayedEvent>,
        fuel: f32,
    ) -> ToolUseStart {
        let Some(tool_comp) = world.get::<Tool>(tool) else {
            return ToolUseStart::refused();
        };
        let speed_modifier = tool_comp.speed_modifier;

        if !self.can_start_use(world, tool, user, target, fuel, requirements) {
            return ToolUseStart::refused();
        }

        let envelope = ToolDoAfterEvent::new(fuel, event, target);
        let args = DoAfterArgs {
            user,
            delay: delay.div_f32(speed_modifier),
            event: Box::new(envelope),
            event_target: tool,
            target,
            used: Some(tool),
            break_on_damage: true,
            break_on_move: true,
            break_on_weightless_move: false,
            // Self-use tools skip the hand requirement.
            need_hand: tool != user,
            attempt_frequency: if fuel > 0.0 {
                AttemptFrequency::EveryTick
            } else {
                AttemptFrequency::Never
            },
        };

        let do_after_id = self.scheduler.try_start_do_after(world, args);
        tracing::debug!(?tool, ?user, ?do_after_id, "tool use started");

        ToolUseStart {
            started: true,
            do_after_id,
        }
    }

    /// [`Self::use_tool`] with a single required quality.
    pub fn use_tool_with_quality(
        &mut self,
        world: &mut World,
        tool: Entity,
        user: Entity,
        target: Option<Entity>,
        delay: Duration,
        quality: QualityId,
        min_level: f32,
        event: Box<dyn DelayedEvent>,
        fuel: f32,
    ) -> ToolUseStart {
        let mut requirements = BTreeMap::new();
        requirements.insert(quality, min_level);
        self.use_tool(world, tool, user, target, delay, &requirements, event, fuel)
    }

    /// Completion callback, invoked by the scheduler exactly once per
    /// started action.
    ///
    /// Settles the use cost and plays the tool sound on success, then
    /// forwards the wrapped event to its recipient. The forward happens on
    /// cancellation too; cancellation shows up on the wrapped event itself.
    pub fn on_do_after(
        &mut self,
        world: &mut World,
        tool: Entity,
        envelope: ToolDoAfterEvent,
        id: DoAfterId,
        cancelled: bool,
    ) {
        if !cancelled {
            self.play_tool_sound(world, tool);
            self.apply_use_cost(world, tool);
        }

        let target = envelope.original_target;
        let mut event = envelope.into_wrapped();
        event.set_completion(id, cancelled);

        match target {
            Some(entity) => self
                .bus
                .raise_targeted(world, entity, event.as_entity_event_mut()),
            None => self.bus.raise_broadcast(world, event.as_entity_event_mut()),
        }
    }

    /// Play the tool's use cue, if it has one.
    pub fn play_tool_sound(&mut self, world: &mut World, tool: Entity) {
        let Some(sound) = world.get::<Tool>(tool).and_then(|tool| tool.use_sound.clone()) else {
            return;
        };
        self.audio.play(world, &sound, tool);
    }

    /// Settle the cost of one completed use: charge for energy tools,
    /// durability for everything else.
    fn apply_use_cost(&mut self, world: &mut World, tool: Entity) {
        let Some(tool_comp) = world.get::<Tool>(tool) else {
            return;
        };
        let uses_energy = tool_comp.uses_energy;
        let charge_use = tool_comp.charge_use;
        let damage_per_use = tool_comp.damage_per_use.clone();

        if uses_energy {
            self.power.try_use_charge(world, tool, charge_use);
        } else if let Some(damage) = damage_per_use {
            if world.get::<Damageable>(tool).is_some() {
                self.damage.change_damage(world, tool, &damage, false, false);
            }
        }
    }
}
