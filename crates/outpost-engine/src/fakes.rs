//! Deterministic engine fakes for testing.
//!
//! In-memory stand-ins for the engine services, for driving gameplay systems
//! in tests without a running engine. Enable the `test-fixtures` feature to
//! access them.
//!
//! # Example
//!
//! ```ignore
//! // In your Cargo.toml:
//! // [dev-dependencies]
//! // outpost-engine = { path = "../outpost-engine", features = ["test-fixtures"] }
//!
//! use outpost_engine::fakes::RecordingScheduler;
//!
//! let scheduler = RecordingScheduler::new();
//! let boxed: Box<dyn DelayedActionScheduler> = Box::new(scheduler.clone());
//! // `scheduler` still observes everything `boxed` records.
//! ```
//!
//! All fakes are cheaply clonable handles over shared state, so a test can
//! keep a view on a service after injecting it. The simulation is
//! single-threaded and tick-based, so the shared state is plain `Rc<RefCell>`.

use std::any::TypeId;
use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use bevy_ecs::prelude::*;

use crate::audio::{AudioSink, SoundId};
use crate::damage::{Damageable, DamageSink, DamageSpec};
use crate::event::{EntityEvent, EventBus};
use crate::power::PowerCellPool;
use crate::scheduler::{DelayedActionScheduler, DoAfterArgs, DoAfterId};

/// One action accepted by [`RecordingScheduler`].
pub struct StartedAction {
    pub id: DoAfterId,
    pub args: DoAfterArgs,
}

#[derive(Default)]
struct SchedulerState {
    next_id: u64,
    started: Vec<StartedAction>,
    refuse_next: bool,
}

/// Scheduler fake that records accepted actions instead of timing them.
///
/// Tests complete an action manually by taking its [`StartedAction`] back and
/// invoking the owning system's completion callback.
#[derive(Clone, Default)]
pub struct RecordingScheduler {
    state: Rc<RefCell<SchedulerState>>,
}

impl RecordingScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn started_count(&self) -> usize {
        self.state.borrow().started.len()
    }

    /// Remove and return the most recently accepted action.
    pub fn take_last(&self) -> Option<StartedAction> {
        self.state.borrow_mut().started.pop()
    }

    /// Make the next start request fail, as if the scheduler superseded an
    /// identical pending action.
    pub fn refuse_next(&self) {
        self.state.borrow_mut().refuse_next = true;
    }
}

impl DelayedActionScheduler for RecordingScheduler {
    fn try_start_do_after(&mut self, _world: &mut World, args: DoAfterArgs) -> Option<DoAfterId> {
        let mut state = self.state.borrow_mut();
        if state.refuse_next {
            state.refuse_next = false;
            return None;
        }
        state.next_id += 1;
        let id = DoAfterId(state.next_id);
        state.started.push(StartedAction { id, args });
        Some(id)
    }
}

/// Power cell fake backed by a per-entity balance map.
///
/// Debits are unconditional and may drive a balance negative, matching the
/// engine pool's best-effort debit contract.
#[derive(Clone, Default)]
pub struct FixedChargePool {
    balances: Rc<RefCell<HashMap<Entity, f32>>>,
}

impl FixedChargePool {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_charge(&self, entity: Entity, amount: f32) {
        self.balances.borrow_mut().insert(entity, amount);
    }

    pub fn charge(&self, entity: Entity) -> f32 {
        self.balances.borrow().get(&entity).copied().unwrap_or(0.0)
    }
}

impl PowerCellPool for FixedChargePool {
    fn has_charge(&self, _world: &World, entity: Entity, amount: f32) -> bool {
        self.charge(entity) >= amount
    }

    fn try_use_charge(&mut self, _world: &mut World, entity: Entity, amount: f32) -> bool {
        *self.balances.borrow_mut().entry(entity).or_insert(0.0) -= amount;
        true
    }
}

/// One payload applied through [`RecordingDamageSink`].
#[derive(Clone)]
pub struct AppliedDamage {
    pub target: Entity,
    pub damage: DamageSpec,
    pub allow_death: bool,
    pub interrupt: bool,
}

#[derive(Default)]
struct DamageState {
    applied: Vec<AppliedDamage>,
    thresholds: HashMap<Entity, f32>,
}

/// Damage service fake: accumulates payloads into the target's
/// [`Damageable`] component and records every application.
#[derive(Clone, Default)]
pub struct RecordingDamageSink {
    state: Rc<RefCell<DamageState>>,
}

impl RecordingDamageSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Configure the destruction threshold reported for `entity`.
    pub fn set_threshold(&self, entity: Entity, destroyed_at: f32) {
        self.state.borrow_mut().thresholds.insert(entity, destroyed_at);
    }

    pub fn applied(&self) -> Vec<AppliedDamage> {
        self.state.borrow().applied.clone()
    }

    /// Total damage applied to `entity` across all recorded payloads.
    pub fn total_applied(&self, entity: Entity) -> f32 {
        self.state
            .borrow()
            .applied
            .iter()
            .filter(|a| a.target == entity)
            .map(|a| a.damage.total())
            .sum()
    }
}

impl DamageSink for RecordingDamageSink {
    fn change_damage(
        &mut self,
        world: &mut World,
        target: Entity,
        damage: &DamageSpec,
        allow_death: bool,
        interrupt: bool,
    ) {
        if let Some(mut damageable) = world.get_mut::<Damageable>(target) {
            damageable.damage.add(damage);
        }
        self.state.borrow_mut().applied.push(AppliedDamage {
            target,
            damage: damage.clone(),
            allow_death,
            interrupt,
        });
    }

    fn destroyed_at(&self, _world: &World, entity: Entity) -> f32 {
        self.state
            .borrow()
            .thresholds
            .get(&entity)
            .copied()
            .unwrap_or(0.0)
    }
}

/// Audio fake that records played cues.
#[derive(Clone, Default)]
pub struct RecordingAudioSink {
    played: Rc<RefCell<Vec<(Entity, SoundId)>>>,
}

impl RecordingAudioSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn played(&self) -> Vec<(Entity, SoundId)> {
        self.played.borrow().clone()
    }

    pub fn played_count(&self) -> usize {
        self.played.borrow().len()
    }
}

impl AudioSink for RecordingAudioSink {
    fn play(&mut self, _world: &mut World, sound: &SoundId, source: Entity) {
        self.played.borrow_mut().push((source, sound.clone()));
    }
}

type Handler = Box<dyn FnMut(&mut World, Option<Entity>, &mut dyn EntityEvent)>;

/// One delivery performed by [`LocalEventBus`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchRecord {
    /// `None` for broadcasts.
    pub target: Option<Entity>,
    pub type_id: TypeId,
    /// Cancellation state once every subscriber had run.
    pub cancelled: bool,
}

#[derive(Default)]
struct BusState {
    handlers: Vec<Handler>,
    dispatched: Vec<DispatchRecord>,
}

/// Event bus fake with closure subscribers and a dispatch log.
///
/// Every subscriber sees every event, targeted or broadcast, in subscription
/// order; cancellation by one subscriber does not stop delivery to the rest.
#[derive(Clone, Default)]
pub struct LocalEventBus {
    state: Rc<RefCell<BusState>>,
}

impl LocalEventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(
        &self,
        handler: impl FnMut(&mut World, Option<Entity>, &mut dyn EntityEvent) + 'static,
    ) {
        self.state.borrow_mut().handlers.push(Box::new(handler));
    }

    pub fn dispatched(&self) -> Vec<DispatchRecord> {
        self.state.borrow().dispatched.clone()
    }

    fn raise(&mut self, world: &mut World, target: Option<Entity>, event: &mut dyn EntityEvent) {
        // Handlers are moved out while running so a subscriber may touch the
        // bus handle without re-entrant borrows.
        let mut handlers = std::mem::take(&mut self.state.borrow_mut().handlers);
        for handler in handlers.iter_mut() {
            handler(world, target, event);
        }
        let mut state = self.state.borrow_mut();
        handlers.extend(state.handlers.drain(..));
        state.handlers = handlers;
        state.dispatched.push(DispatchRecord {
            target,
            type_id: event.as_any().type_id(),
            cancelled: event.cancelled(),
        });
    }
}

impl EventBus for LocalEventBus {
    fn raise_targeted(&mut self, world: &mut World, entity: Entity, event: &mut dyn EntityEvent) {
        self.raise(world, Some(entity), event);
    }

    fn raise_broadcast(&mut self, world: &mut World, event: &mut dyn EntityEvent) {
        self.raise(world, None, event);
    }
}
