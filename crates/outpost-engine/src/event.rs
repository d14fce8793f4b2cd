//! Event Contracts
//!
//! Capability traits for gameplay events routed through the engine event bus.

use std::any::Any;

use bevy_ecs::prelude::*;

use crate::scheduler::DoAfterId;

/// A gameplay event that can be raised at an entity or broadcast.
///
/// Every event carries a single cancellation flag. Cancellation is one-way:
/// once a subscriber cancels, later subscribers still see the event but
/// cannot clear the flag.
pub trait EntityEvent: Any {
    /// Whether some subscriber has cancelled this event.
    fn cancelled(&self) -> bool;

    /// Mark the event cancelled.
    fn cancel(&mut self);

    fn as_any(&self) -> &dyn Any;

    fn as_any_mut(&mut self) -> &mut dyn Any;

    fn into_any(self: Box<Self>) -> Box<dyn Any>;
}

/// Result of cloning a delayed event.
pub enum EventClone {
    /// The event is immutable; the original can stand in for its own clone.
    Immutable,
    /// A fresh copy.
    Cloned(Box<dyn DelayedEvent>),
}

/// An event raised when a timed action finishes or is interrupted.
///
/// The scheduler may need to copy a pending event to re-arm an action, or
/// compare two pending events to detect duplicates, so delayed events expose
/// both operations explicitly.
pub trait DelayedEvent: EntityEvent {
    /// Copy this event for re-arming. Immutable events return
    /// [`EventClone::Immutable`] instead of allocating.
    fn clone_event(&self) -> EventClone;

    /// Whether `other` describes the same logical action as this event.
    fn is_duplicate(&self, other: &dyn DelayedEvent) -> bool;

    /// Stamp the event with the finished action's identifier and terminal
    /// cancellation state before it is delivered.
    fn set_completion(&mut self, id: DoAfterId, cancelled: bool);

    fn as_entity_event_mut(&mut self) -> &mut dyn EntityEvent;
}

/// The engine's local event bus.
///
/// Targeted events reach subscribers listening on a specific entity;
/// broadcast events reach process-wide subscribers.
pub trait EventBus {
    fn raise_targeted(&mut self, world: &mut World, entity: Entity, event: &mut dyn EntityEvent);

    fn raise_broadcast(&mut self, world: &mut World, event: &mut dyn EntityEvent);
}
