use super::*;

/// The boss's forward-only phase controller.
#[derive(Component, Debug, Clone, Deref, DerefMut)]
pub struct PhaseControl(pub PhaseController);

/// Feeds the health fraction to the controller; the boss can only be hurt in combat phases.
pub(super) fn watch_health(
    time: Res<Time>,
    mut bosses: Query<(Entity, &mut PhaseControl, &Health), With<Boss>>,
    mut commands: Commands,
) {
    for (entity, mut control, health) in bosses.iter_mut() {
        let Some(change) = control.tick(time.delta_secs(), health.fraction()) else {
            continue;
        };
        if change.to.is_combat() {
            commands.entity(entity).remove::<Untargetable>();
        } else {
            commands.entity(entity).insert(Untargetable);
        }
        commands.trigger(PhaseChanged::from(change));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    #[derive(Resource, Default)]
    struct Seen(Vec<PhaseChanged>);

    fn world(step: Duration) -> World {
        let mut world = World::new();
        let mut time = Time::<()>::default();
        time.advance_by(step);
        world.insert_resource(time);
        world.init_resource::<Seen>();
        world.add_observer(|on: On<PhaseChanged>, mut seen: ResMut<Seen>| {
            seen.0.push(*on.event());
        });
        world
    }

    fn opening_boss(world: &mut World, health: Health) -> Entity {
        let mut control = PhaseController::new(PhaseThresholds::default(), CutsceneTiming::default());
        control.begin_encounter();
        world
            .spawn((Boss, PhaseControl(control), health, Untargetable))
            .id()
    }

    #[test]
    fn opening_ends_into_a_vulnerable_phase1() {
        let mut world = world(Duration::from_secs(3));
        let boss = opening_boss(&mut world, Health::new(100.0));

        world.run_system_once(watch_health).unwrap();
        assert_eq!(world.get::<PhaseControl>(boss).unwrap().phase(), BossPhase::Phase1);
        assert!(world.get::<Untargetable>(boss).is_none());
        assert_eq!(
            world.resource::<Seen>().0,
            vec![PhaseChanged {
                from: BossPhase::OpeningCutscene,
                to: BossPhase::Phase1
            }]
        );
    }

    #[test]
    fn empty_health_bar_starts_the_closing_cutscene() {
        let mut world = world(Duration::from_secs(3));
        let mut health = Health::new(100.0);
        health.take_damage(100.0);
        let boss = opening_boss(&mut world, health);

        world.run_system_once(watch_health).unwrap();
        world.run_system_once(watch_health).unwrap();
        assert_eq!(
            world.get::<PhaseControl>(boss).unwrap().phase(),
            BossPhase::ClosingCutscene
        );
        assert!(world.get::<Untargetable>(boss).is_some());
    }

    #[test]
    fn partial_damage_escalates() {
        let mut world = world(Duration::from_secs(3));
        let mut health = Health::new(100.0);
        health.take_damage(50.0);
        let boss = opening_boss(&mut world, health);

        world.run_system_once(watch_health).unwrap();
        world.run_system_once(watch_health).unwrap();
        assert_eq!(world.get::<PhaseControl>(boss).unwrap().phase(), BossPhase::Phase2);
        let seen: Vec<_> = world.resource::<Seen>().0.iter().map(|c| c.to).collect();
        assert_eq!(seen, vec![BossPhase::Phase1, BossPhase::Phase2]);
    }
}
