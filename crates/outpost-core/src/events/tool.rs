//! Tool Events
//!
//! Veto events raised while admitting a tool use, and the envelope that
//! carries a caller's completion event through the delayed action.

use std::any::Any;

use bevy_ecs::prelude::*;

use outpost_engine::event::{DelayedEvent, EntityEvent, EventClone};
use outpost_engine::scheduler::DoAfterId;

/// Raised at the user before a tool use starts. Subscribers cancel to veto
/// the use on the user's behalf (stunned, restrained, ...).
#[derive(Debug)]
pub struct ToolUserAttemptEvent {
    /// Entity the tool would be used on, if any.
    pub target: Option<Entity>,
    cancelled: bool,
}

impl ToolUserAttemptEvent {
    pub fn new(target: Option<Entity>) -> Self {
        Self {
            target,
            cancelled: false,
        }
    }
}

impl EntityEvent for ToolUserAttemptEvent {
    fn cancelled(&self) -> bool {
        self.cancelled
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Raised at the tool, then re-delivered to the target, before a tool use
/// starts. One event object serves both stages, so a target subscriber can
/// observe a veto the tool already raised but can never clear it.
#[derive(Debug)]
pub struct ToolUseAttemptEvent {
    pub user: Entity,
    /// Resource amount requested for this attempt.
    pub fuel: f32,
    cancelled: bool,
}

impl ToolUseAttemptEvent {
    pub fn new(user: Entity, fuel: f32) -> Self {
        Self {
            user,
            fuel,
            cancelled: false,
        }
    }
}

impl EntityEvent for ToolUseAttemptEvent {
    fn cancelled(&self) -> bool {
        self.cancelled
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

/// Envelope around a caller's completion event for the duration of a tool
/// action. Owns the wrapped event from admission until the scheduler hands
/// it back, exactly once, on completion or cancellation.
pub struct ToolDoAfterEvent {
    /// Resource amount requested for this attempt.
    pub fuel: f32,

    /// Entity the wrapped event will be directed at. If `None`, the event
    /// is broadcast instead.
    pub original_target: Option<Entity>,

    wrapped: Box<dyn DelayedEvent>,
    cancelled: bool,
}

impl ToolDoAfterEvent {
    pub fn new(fuel: f32, wrapped: Box<dyn DelayedEvent>, original_target: Option<Entity>) -> Self {
        Self {
            fuel,
            original_target,
            wrapped,
            cancelled: false,
        }
    }

    pub fn wrapped(&self) -> &dyn DelayedEvent {
        self.wrapped.as_ref()
    }

    /// Consume the envelope, releasing the wrapped event for dispatch.
    pub fn into_wrapped(self) -> Box<dyn DelayedEvent> {
        self.wrapped
    }
}

impl EntityEvent for ToolDoAfterEvent {
    fn cancelled(&self) -> bool {
        self.cancelled
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl DelayedEvent for ToolDoAfterEvent {
    fn clone_event(&self) -> EventClone {
        // An envelope around an immutable event is itself immutable.
        match self.wrapped.clone_event() {
            EventClone::Immutable => EventClone::Immutable,
            EventClone::Cloned(inner) => EventClone::Cloned(Box::new(Self {
                fuel: self.fuel,
                original_target: self.original_target,
                wrapped: inner,
                cancelled: self.cancelled,
            })),
        }
    }

    fn is_duplicate(&self, other: &dyn DelayedEvent) -> bool {
        other
            .as_any()
            .downcast_ref::<ToolDoAfterEvent>()
            .is_some_and(|other| self.wrapped.is_duplicate(other.wrapped.as_ref()))
    }

    fn set_completion(&mut self, id: DoAfterId, cancelled: bool) {
        self.wrapped.set_completion(id, cancelled);
        if cancelled {
            self.cancelled = true;
        }
    }

    fn as_entity_event_mut(&mut self) -> &mut dyn EntityEvent {
        self
    }
}

/// Minimal completion event for tool uses that only need a finished signal,
/// stamped with the action it belongs to.
#[derive(Debug, Default)]
pub struct SimpleDelayedEvent {
    pub do_after: Option<DoAfterId>,
    cancelled: bool,
}

impl SimpleDelayedEvent {
    pub fn new() -> Self {
        Self::default()
    }
}

impl EntityEvent for SimpleDelayedEvent {
    fn cancelled(&self) -> bool {
        self.cancelled
    }

    fn cancel(&mut self) {
        self.cancelled = true;
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn into_any(self: Box<Self>) -> Box<dyn Any> {
        self
    }
}

impl DelayedEvent for SimpleDelayedEvent {
    fn clone_event(&self) -> EventClone {
        EventClone::Immutable
    }

    fn is_duplicate(&self, other: &dyn DelayedEvent) -> bool {
        other.as_any().is::<SimpleDelayedEvent>()
    }

    fn set_completion(&mut self, id: DoAfterId, cancelled: bool) {
        self.do_after = Some(id);
        if cancelled {
            self.cancelled = true;
        }
    }

    fn as_entity_event_mut(&mut self) -> &mut dyn EntityEvent {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A wrapped event that always clones to a fresh copy.
    #[derive(Debug, Default)]
    struct MutableProbeEvent {
        marker: u32,
        cancelled: bool,
    }

    impl EntityEvent for MutableProbeEvent {
        fn cancelled(&self) -> bool {
            self.cancelled
        }

        fn cancel(&mut self) {
            self.cancelled = true;
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn as_any_mut(&mut self) -> &mut dyn Any {
            self
        }

        fn into_any(self: Box<Self>) -> Box<dyn Any> {
            self
        }
    }

    impl DelayedEvent for MutableProbeEvent {
        fn clone_event(&self) -> EventClone {
            EventClone::Cloned(Box::new(Self {
                marker: self.marker,
                cancelled: self.cancelled,
            }))
        }

        fn is_duplicate(&self, other: &dyn DelayedEvent) -> bool {
            other
                .as_any()
                .downcast_ref::<Self>()
                .is_some_and(|other| other.marker == self.marker)
        }

        fn set_completion(&mut self, _id: DoAfterId, cancelled: bool) {
            if cancelled {
                self.cancelled = true;
            }
        }

        fn as_entity_event_mut(&mut self) -> &mut dyn EntityEvent {
            self
        }
    }

    #[test]
    fn test_envelope_over_immutable_event_is_immutable() {
        let envelope = ToolDoAfterEvent::new(0.0, Box::new(SimpleDelayedEvent::new()), None);

        assert!(matches!(envelope.clone_event(), EventClone::Immutable));
    }

    #[test]
    fn test_envelope_clone_preserves_fuel_and_target() {
        let mut world = World::new();
        let target = world.spawn_empty().id();

        let probe = MutableProbeEvent {
            marker: 7,
            cancelled: false,
        };
        let envelope = ToolDoAfterEvent::new(5.0, Box::new(probe), Some(target));

        let EventClone::Cloned(clone) = envelope.clone_event() else {
            panic!("expected a fresh clone for a mutable wrapped event");
        };
        let clone = clone
            .into_any()
            .downcast::<ToolDoAfterEvent>()
            .expect("clone keeps the envelope type");

        assert_eq!(clone.fuel, 5.0);
        assert_eq!(clone.original_target, Some(target));
        assert!(envelope.is_duplicate(&*clone));
    }

    #[test]
    fn test_duplicate_delegates_to_wrapped_event() {
        let a = ToolDoAfterEvent::new(
            0.0,
            Box::new(MutableProbeEvent {
                marker: 1,
                cancelled: false,
            }),
            None,
        );
        let b = ToolDoAfterEvent::new(
            3.0,
            Box::new(MutableProbeEvent {
                marker: 1,
                cancelled: false,
            }),
            None,
        );
        let c = ToolDoAfterEvent::new(
            0.0,
            Box::new(MutableProbeEvent {
                marker: 2,
                cancelled: false,
            }),
            None,
        );

        assert!(a.is_duplicate(&b));
        assert!(!a.is_duplicate(&c));
        // Not an envelope at all.
        assert!(!a.is_duplicate(&SimpleDelayedEvent::new()));
    }

    #[test]
    fn test_completion_stamp_reaches_wrapped_event() {
        let mut envelope = ToolDoAfterEvent::new(0.0, Box::new(SimpleDelayedEvent::new()), None);

        envelope.set_completion(DoAfterId(4), true);
        assert!(envelope.cancelled());

        let inner = envelope
            .into_wrapped()
            .into_any()
            .downcast::<SimpleDelayedEvent>()
            .unwrap();
        assert_eq!(inner.do_after, Some(DoAfterId(4)));
        assert!(inner.cancelled);
    }

    #[test]
    fn test_veto_cannot_be_uncancelled() {
        let mut world = World::new();
        let user = world.spawn_empty().id();

        let mut attempt = ToolUseAttemptEvent::new(user, 0.0);
        assert!(!attempt.cancelled());

        attempt.cancel();
        attempt.cancel();
        assert!(attempt.cancelled());
    }
}
