use super::*;
use crate::combat::{Anchored, Armed, HazardZone, Lifetime, Player};
use crate::player::Kinematics;
use crate::projectiles::Rock;

/// Per-phase routines and the current action.
#[derive(Component, Debug, Clone, Default, Deref, DerefMut)]
pub struct Brain(pub BossBrain);

/// Hitbox entity spawned for the current action, if any.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct LiveHazard(pub Option<Entity>);

pub fn think(
    time: Res<Time>,
    settings: Res<Settings>,
    mut rng: ResMut<EncounterRng>,
    mut bosses: Query<
        (
            Entity,
            &mut Brain,
            &PhaseControl,
            &Transform,
            &Hurtbox,
            &mut Mover,
            &mut LiveHazard,
        ),
        With<Boss>,
    >,
    players: Query<(&Transform, &Kinematics, &Hurtbox), (With<Player>, Without<Boss>)>,
    mut commands: Commands,
) {
    let Ok((boss, mut brain, control, tf, hurtbox, mut mover, mut live)) = bosses.single_mut()
    else {
        return;
    };
    let Ok((player_tf, kinematics, player_box)) = players.single() else {
        return;
    };

    let config = &settings.encounter;
    let center = tf.translation.truncate();
    let ctx = BrainContext {
        boss_position: center - Vec2::Y * hurtbox.half_size.y,
        target: TargetMotion {
            position: player_tf.translation.truncate(),
            velocity: kinematics.velocity,
            gliding: kinematics.gliding,
            rest_height: player_box.half_size.y,
        },
    };
    let phase = control.phase();

    for command in brain.tick(phase, time.delta_secs(), &ctx, config, &mut rng.boss) {
        match command {
            BossCommand::ActionStarted(action) => {
                commands.trigger(ActionStarted { action, phase });
            }
            BossCommand::MoveToward { x, speed } => *mover = Mover::Toward { x, speed },
            BossCommand::Stop => *mover = Mover::Still,
            BossCommand::Charge { direction, speed } => {
                *mover = Mover::Charge { direction, speed };
            }
            BossCommand::ThrowRock { origin, velocity } => {
                commands.spawn((
                    Name::new("Rock"),
                    Rock {
                        velocity,
                        radius: config.rocks.radius,
                        damage: config.rocks.damage,
                    },
                    Transform::from_translation(origin.extend(0.0)),
                ));
            }
            BossCommand::SummonWall { x } => {
                let half_size = Vec2::from(config.hazards.wall_half_size);
                debug!("wall rises at x = {x:.1}");
                commands.spawn((
                    Name::new("Wall"),
                    HazardZone {
                        damage: config.hazards.wall_damage,
                        half_size,
                    },
                    Armed::from_seconds(config.hazards.wall_rise),
                    Lifetime::from_seconds(config.hazards.wall_lifetime),
                    Transform::from_xyz(x, config.arena.floor + half_size.y, 0.0),
                ));
            }
            BossCommand::Hazard { kind, active: true } => {
                let zone = spawn_hazard(kind, boss, center, hurtbox, config, &mut commands);
                if let Some(old) = live.0.replace(zone) {
                    commands.entity(old).try_despawn();
                }
            }
            BossCommand::Hazard { active: false, .. } => {
                if let Some(old) = live.0.take() {
                    commands.entity(old).try_despawn();
                }
            }
        }
    }
}

fn spawn_hazard(
    kind: HazardKind,
    boss: Entity,
    center: Vec2,
    hurtbox: &Hurtbox,
    config: &EncounterConfig,
    commands: &mut Commands,
) -> Entity {
    let h = &config.hazards;
    match kind {
        HazardKind::ChargeBody => commands
            .spawn((
                Name::new("Charge"),
                HazardZone {
                    damage: h.charge_damage,
                    half_size: hurtbox.half_size,
                },
                Anchored {
                    to: boss,
                    offset: Vec2::ZERO,
                },
                Transform::from_translation(center.extend(0.0)),
            ))
            .id(),
        HazardKind::Shockwave => {
            let half_size = Vec2::new(config.arena.width() * 0.5, h.shockwave_height * 0.5);
            let at = Vec2::new(config.arena.center_x(), config.arena.floor + half_size.y);
            commands
                .spawn((
                    Name::new("Shockwave"),
                    HazardZone {
                        damage: h.shockwave_damage,
                        half_size,
                    },
                    Transform::from_translation(at.extend(0.0)),
                ))
                .id()
        }
        HazardKind::Tornado => {
            let half_size = Vec2::from(h.tornado_half_size);
            // sits on the floor, centred on the boss
            let offset = Vec2::new(0.0, half_size.y - hurtbox.half_size.y);
            commands
                .spawn((
                    Name::new("Tornado"),
                    HazardZone {
                        damage: h.tornado_damage,
                        half_size,
                    },
                    Anchored { to: boss, offset },
                    Transform::from_translation((center + offset).extend(0.0)),
                ))
                .id()
        }
    }
}
