//! Thirst System
//!
//! Tick-based hydration decay and the public hydration operations.

use bevy_ecs::prelude::*;
use rand::Rng;

use crate::components::thirst::{Thirst, ThirstThreshold};
use crate::components::world::{SimClock, SimRng};

/// System: decay hydration on every due component and recompute its band.
pub fn update_thirst(clock: Res<SimClock>, mut query: Query<&mut Thirst>) {
    for mut thirst in query.iter_mut() {
        if clock.current_tick < thirst.next_update_tick {
            continue;
        }
        thirst.next_update_tick = clock.current_tick + thirst.update_interval;

        thirst.actual_decay_rate = thirst.base_decay_rate * thirst.decay_modifier();
        let next = thirst.current - thirst.actual_decay_rate;
        set_thirst(&mut thirst, next);
    }
}

/// Adjust an entity's hydration by `amount` (negative to dehydrate).
/// Returns false when the entity has no thirst component.
pub fn modify_thirst(world: &mut World, entity: Entity, amount: f32) -> bool {
    let Some(mut thirst) = world.get_mut::<Thirst>(entity) else {
        return false;
    };
    let next = thirst.current + amount;
    set_thirst(&mut thirst, next);
    true
}

/// Prepare a freshly spawned thirst component: rolls a starting value
/// between Thirsty and Okay when none was declared, then settles the band.
pub fn initialize_thirst(world: &mut World, entity: Entity) -> bool {
    world.resource_scope(|world, mut rng: Mut<SimRng>| {
        let Some(mut thirst) = world.get_mut::<Thirst>(entity) else {
            return false;
        };
        if thirst.current < 0.0 {
            let low = thirst
                .thresholds
                .get(&ThirstThreshold::Thirsty)
                .copied()
                .unwrap_or(0.0);
            let high = thirst
                .thresholds
                .get(&ThirstThreshold::Okay)
                .copied()
                .unwrap_or(low + 1.0);
            thirst.current = rng.0.gen_range(low..high);
        }
        let current = thirst.current;
        set_thirst(&mut thirst, current);
        true
    })
}

fn set_thirst(thirst: &mut Thirst, amount: f32) {
    thirst.current = amount.clamp(0.0, thirst.max_thirst());
    thirst.last_threshold = thirst.current_threshold;
    thirst.current_threshold = thirst.threshold_for(thirst.current);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn world_at_tick(tick: u64) -> World {
        let mut world = World::new();
        world.insert_resource(SimClock { current_tick: tick });
        world.insert_resource(SimRng::seeded(17));
        world
    }

    #[test]
    fn test_decay_applies_band_modifier() {
        let mut world = world_at_tick(1);
        let entity = world
            .spawn(Thirst::new().with_current(200.0))
            .id();
        initialize_thirst(&mut world, entity);

        let mut schedule = Schedule::default();
        schedule.add_systems(update_thirst);
        schedule.run(&mut world);

        let thirst = world.get::<Thirst>(entity).unwrap();
        // Parched band decays at 0.6 of the base rate.
        assert_eq!(thirst.current_threshold, ThirstThreshold::Parched);
        assert!((thirst.current - (200.0 - 0.1 * 0.6)).abs() < 1e-4);
        assert!((thirst.actual_decay_rate - 0.06).abs() < 1e-6);
    }

    #[test]
    fn test_update_waits_for_interval() {
        let mut world = world_at_tick(1);
        let mut thirst = Thirst::new().with_current(500.0);
        thirst.update_interval = 10;
        let entity = world.spawn(thirst).id();
        initialize_thirst(&mut world, entity);

        let mut schedule = Schedule::default();
        schedule.add_systems(update_thirst);
        schedule.run(&mut world);
        let after_first = world.get::<Thirst>(entity).unwrap().current;

        // Still within the interval: nothing changes.
        schedule.run(&mut world);
        assert_eq!(world.get::<Thirst>(entity).unwrap().current, after_first);

        world.resource_mut::<SimClock>().current_tick = 11;
        schedule.run(&mut world);
        assert!(world.get::<Thirst>(entity).unwrap().current < after_first);
    }

    #[test]
    fn test_modify_thirst_clamps_and_rebands() {
        let mut world = world_at_tick(0);
        let entity = world
            .spawn(Thirst::new().with_current(400.0))
            .id();
        initialize_thirst(&mut world, entity);

        assert!(modify_thirst(&mut world, entity, 1000.0));
        let thirst = world.get::<Thirst>(entity).unwrap();
        assert_eq!(thirst.current, 750.0);
        assert_eq!(thirst.current_threshold, ThirstThreshold::OverHydrated);
        assert_eq!(thirst.last_threshold, ThirstThreshold::Thirsty);

        assert!(modify_thirst(&mut world, entity, -2000.0));
        let thirst = world.get::<Thirst>(entity).unwrap();
        assert_eq!(thirst.current, 0.0);
        assert_eq!(thirst.current_threshold, ThirstThreshold::Dead);
    }

    #[test]
    fn test_modify_thirst_without_component() {
        let mut world = world_at_tick(0);
        let entity = world.spawn_empty().id();

        assert!(!modify_thirst(&mut world, entity, 10.0));
    }

    #[test]
    fn test_initialize_rolls_unset_starting_value() {
        let mut world = world_at_tick(0);
        let entity = world.spawn(Thirst::new()).id();

        assert!(initialize_thirst(&mut world, entity));
        let thirst = world.get::<Thirst>(entity).unwrap();
        assert!(thirst.current >= 300.0 && thirst.current < 450.0);
        assert_eq!(thirst.current_threshold, ThirstThreshold::Thirsty);

        // A declared starting value is left alone.
        let declared = world.spawn(Thirst::new().with_current(700.0)).id();
        assert!(initialize_thirst(&mut world, declared));
        let thirst = world.get::<Thirst>(declared).unwrap();
        assert_eq!(thirst.current, 700.0);
        assert_eq!(thirst.current_threshold, ThirstThreshold::HighHydrated);
    }
}
