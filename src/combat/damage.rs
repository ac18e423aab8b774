use super::*;

pub fn plugin(app: &mut App) {
    app.add_observer(on_damage)
        .add_observer(on_death)
        .add_systems(
            Update,
            tick_invulnerability.in_set(AppSystems::TickTimers),
        );
}

/// Observer: apply damage when DamageEvent is triggered.
fn on_damage(
    on: On<DamageEvent>,
    mut targets: Query<(&mut Health, Option<&mut Invulnerability>, Has<Untargetable>)>,
    mut commands: Commands,
) {
    let event = on.event();

    let Ok((mut health, grace, untargetable)) = targets.get_mut(event.target) else {
        return;
    };
    if untargetable || health.is_dead() {
        return;
    }
    if let Some(mut grace) = grace {
        if grace.is_active() {
            return;
        }
        grace.remaining = grace.window;
    }

    let died = health.take_damage(event.damage);
    debug!(
        "{} damage to {} ({:.0}/{:.0})",
        event.damage, event.target, health.current, health.max
    );

    if died {
        commands.trigger(DeathEvent {
            entity: event.target,
        });
    }
}

/// Observer: a dead player ends the run. The boss keeps its entity for the
/// closing cutscene, its phase controller reacts to the empty health bar.
fn on_death(on: On<DeathEvent>, players: Query<(), With<Player>>, mut commands: Commands) {
    let event = on.event();
    if players.contains(event.entity) {
        info!("player went down");
        commands.trigger(EncounterEnded(Outcome::PlayerDefeated));
    }
}

fn tick_invulnerability(time: Res<Time>, mut graces: Query<&mut Invulnerability>) {
    let dt = time.delta_secs();
    for mut grace in graces.iter_mut() {
        if grace.is_active() {
            grace.remaining = (grace.remaining - dt).max(0.0);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bevy::ecs::system::RunSystemOnce;
    use pretty_assertions::assert_eq;
    use std::time::Duration;

    fn app() -> App {
        let mut app = App::new();
        app.init_resource::<EncounterState>()
            .add_observer(on_damage)
            .add_observer(on_death)
            .add_observer(end_on_outcome);
        app
    }

    // stand-in for the lifecycle observer, only records the outcome
    fn end_on_outcome(on: On<EncounterEnded>, mut state: ResMut<EncounterState>) {
        if state.outcome.is_none() {
            state.outcome = Some(**on.event());
        }
    }

    fn hit(app: &mut App, target: Entity, damage: f32) {
        app.world_mut().trigger(DamageEvent {
            source: None,
            target,
            damage,
        });
        app.world_mut().flush();
    }

    fn health(app: &App, entity: Entity) -> f32 {
        app.world().get::<Health>(entity).unwrap().current
    }

    #[test]
    fn damage_reduces_health() {
        let mut app = app();
        let target = app.world_mut().spawn(Health::new(100.0)).id();
        hit(&mut app, target, 30.0);
        hit(&mut app, target, 30.0);
        assert_eq!(health(&app, target), 40.0);
    }

    #[test]
    fn untargetable_ignores_damage() {
        let mut app = app();
        let boss = app
            .world_mut()
            .spawn((Boss, Health::new(100.0), Untargetable))
            .id();
        hit(&mut app, boss, 30.0);
        assert_eq!(health(&app, boss), 100.0);

        app.world_mut().entity_mut(boss).remove::<Untargetable>();
        hit(&mut app, boss, 30.0);
        assert_eq!(health(&app, boss), 70.0);
    }

    #[test]
    fn grace_window_blocks_follow_up_hits() {
        let mut app = app();
        let player = app
            .world_mut()
            .spawn((Player, Health::new(100.0), Invulnerability::new(0.5)))
            .id();
        hit(&mut app, player, 20.0);
        hit(&mut app, player, 20.0);
        assert_eq!(health(&app, player), 80.0);

        let mut time = Time::<()>::default();
        time.advance_by(Duration::from_millis(600));
        app.world_mut().insert_resource(time);
        app.world_mut()
            .run_system_once(tick_invulnerability)
            .unwrap();

        hit(&mut app, player, 20.0);
        assert_eq!(health(&app, player), 60.0);
    }

    #[test]
    fn player_death_ends_the_encounter() {
        let mut app = app();
        let player = app
            .world_mut()
            .spawn((Player, Health::new(10.0)))
            .id();
        hit(&mut app, player, 25.0);
        let state = app.world().resource::<EncounterState>();
        assert_eq!(state.outcome, Some(Outcome::PlayerDefeated));
    }

    #[test]
    fn boss_death_leaves_the_run_going() {
        let mut app = app();
        let boss = app.world_mut().spawn((Boss, Health::new(10.0))).id();
        hit(&mut app, boss, 25.0);
        assert!(app.world().get_entity(boss).is_ok());
        assert_eq!(app.world().resource::<EncounterState>().outcome, None);
    }
}
