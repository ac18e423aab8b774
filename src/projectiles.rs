//! Thrown rocks: ballistic flight, player hits and cleanup.

use crate::combat::{DamageEvent, Hurtbox, Player};
use crate::models::*;
use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.add_systems(Update, fly_rocks.in_set(AppSystems::Move))
        .add_systems(Update, resolve_rocks.in_set(AppSystems::Resolve));
}

#[derive(Component, Debug, Clone, Copy)]
pub struct Rock {
    pub velocity: Vec2,
    pub radius: f32,
    pub damage: f32,
}

/// Exact constant-gravity step so rocks follow the solver's parabola.
fn fly_rocks(time: Res<Time>, settings: Res<Settings>, mut rocks: Query<(&mut Rock, &mut Transform)>) {
    let dt = time.delta_secs();
    let g = settings.encounter.gravity;
    for (mut rock, mut tf) in rocks.iter_mut() {
        let step = rock.velocity * dt - Vec2::Y * (0.5 * g * dt * dt);
        tf.translation += step.extend(0.0);
        rock.velocity.y -= g * dt;
    }
}

fn resolve_rocks(
    settings: Res<Settings>,
    rocks: Query<(Entity, &Rock, &Transform)>,
    players: Query<(Entity, &Hurtbox, &Transform), With<Player>>,
    mut commands: Commands,
) {
    let arena = settings.encounter.arena;
    for (entity, rock, tf) in rocks.iter() {
        let at = tf.translation.truncate();
        let hit = players.iter().find(|(_, hurtbox, ptf)| {
            hurtbox
                .at(ptf.translation.truncate())
                .intersects_circle(at, rock.radius)
        });
        if let Some((player, ..)) = hit {
            commands.trigger(DamageEvent {
                source: Some(entity),
                target: player,
                damage: rock.damage,
            });
            commands.entity(entity).despawn();
            continue;
        }

        let landed = at.y - rock.radius <= arena.floor && rock.velocity.y < 0.0;
        let outside = (at.x - arena.center_x()).abs() > arena.width() * 0.5 + rock.radius;
        if landed || outside {
            trace!("rock shattered at {at}");
            commands.entity(entity).despawn();
        }
    }
}
