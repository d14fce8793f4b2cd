//! Delayed Action Scheduler
//!
//! Contract for the engine service that counts down timed, interruptible
//! actions and fires their completion events.

use std::time::Duration;

use bevy_ecs::prelude::*;

use crate::event::DelayedEvent;

/// Identifier of a pending delayed action, issued by the scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct DoAfterId(pub u64);

/// How often the scheduler re-validates a running action against its start
/// conditions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AttemptFrequency {
    /// No re-validation once started.
    #[default]
    Never,
    /// Re-validate on every simulation tick.
    EveryTick,
}

/// Configuration for one delayed action.
pub struct DoAfterArgs {
    /// Entity performing the action.
    pub user: Entity,
    /// Time until completion, already adjusted for tool speed.
    pub delay: Duration,
    /// Event delivered to `event_target` when the action finishes or is
    /// interrupted. Fired exactly once per accepted action.
    pub event: Box<dyn DelayedEvent>,
    /// Entity the completion event is raised at.
    pub event_target: Entity,
    /// Entity the action is performed on, if any.
    pub target: Option<Entity>,
    /// Item being used, if any.
    pub used: Option<Entity>,
    /// Interrupt when the user takes damage.
    pub break_on_damage: bool,
    /// Interrupt when the user moves.
    pub break_on_move: bool,
    /// Interrupt on movement while weightless. Off lets actions survive
    /// zero-gravity drift.
    pub break_on_weightless_move: bool,
    /// Require the user to keep a free hand on `used`.
    pub need_hand: bool,
    pub attempt_frequency: AttemptFrequency,
}

/// The delayed-action scheduler service.
pub trait DelayedActionScheduler {
    /// Try to begin a timed action.
    ///
    /// Returns the new action's identifier, or `None` when the scheduler
    /// refused the request or consumed it to supersede an identical pending
    /// action. For every accepted action, the scheduler later invokes the
    /// owning system's completion callback exactly once, with `cancelled`
    /// set if the action was interrupted.
    fn try_start_do_after(&mut self, world: &mut World, args: DoAfterArgs) -> Option<DoAfterId>;
}
