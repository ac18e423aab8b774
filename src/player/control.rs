use super::*;
use crate::boss::{Brain, PhaseControl};
use crate::combat::{Aabb, HazardZone, Untargetable};
use crate::projectiles::Rock;

pub const WALK_SPEED: f32 = 6.0;
pub const DASH_SPEED: f32 = 18.0;
/// Clears a standing boss at the top of the jump.
pub const JUMP_SPEED: f32 = 15.0;
pub const GLIDE_FALL_SPEED: f32 = 2.5;
/// Largest gap between the two hurtboxes a strike still connects across.
pub const STRIKE_REACH: f32 = 1.0;
pub const STRIKE_DAMAGE: f32 = 40.0;
/// Chance per second of a hop over rocks and floor waves.
pub const HOP_RATE: f64 = 0.6;

#[derive(Component, Debug, Clone, Copy)]
pub struct Autopilot {
    pub facing: f32,
    pub dash_direction: f32,
}

impl Default for Autopilot {
    fn default() -> Self {
        Self {
            facing: 1.0,
            dash_direction: 1.0,
        }
    }
}

impl Kinematics {
    pub fn jump(&mut self, speed: f32) {
        if self.grounded {
            self.velocity.y = speed;
            self.grounded = false;
        }
    }
}

fn activate(abilities: &mut Abilities, id: AbilityId) {
    if let Err(e) = abilities.owner.try_activate(id) {
        debug!("{e}");
    }
}

pub(super) fn tick_abilities(
    time: Res<Time>,
    mut players: Query<(Entity, &mut Abilities, &Autopilot, &Transform, &Hurtbox), With<Player>>,
    bosses: Query<(Entity, &Transform, &Hurtbox), (With<Boss>, Without<Player>)>,
    mut commands: Commands,
) {
    let dt = time.delta_secs();
    for (player, mut abilities, pilot, tf, hurtbox) in players.iter_mut() {
        let strike = abilities.strike;
        for event in abilities.owner.tick(dt) {
            match event {
                AbilityEvent::Activated(id) if id == strike => {
                    let body = hurtbox.at(tf.translation.truncate());
                    for (boss, boss_tf, boss_box) in bosses.iter() {
                        let center = boss_tf.translation.truncate();
                        let facing = (center.x - body.center.x) * pilot.facing >= 0.0;
                        let reach = Aabb::new(center, boss_box.half_size + Vec2::X * STRIKE_REACH);
                        if facing && body.intersects(&reach) {
                            commands.trigger(DamageEvent {
                                source: Some(player),
                                target: boss,
                                damage: STRIKE_DAMAGE,
                            });
                        }
                    }
                }
                event => trace!("player {event:?}"),
            }
        }
    }
}

/// Seconds before a charging boss reaches the player at which the player jumps;
/// the jump then peaks while the boss passes underneath.
pub const CHARGE_JUMP_LEAD: f32 = 0.4;
/// Rocks closer than this are dodged with a dash.
pub const ROCK_ALERT: f32 = 5.0;
/// Hazards no taller than this are jumped over instead of walked out of.
pub const LOW_HAZARD: f32 = 1.5;
/// How far ahead the player looks for hazards before taking a step.
pub const STEP_AHEAD: f32 = 0.3;

/// The boss as the player reads it this frame.
struct Threat {
    dx: f32,
    gap: f32,
    /// Seconds until a charge reaches the player, if one is coming.
    charge_contact: Option<f32>,
    untargetable: bool,
}

fn read_boss(
    me: f32,
    hurtbox: &Hurtbox,
    (boss_tf, boss_box, mover, brain, control, untargetable): (
        &Transform,
        &Hurtbox,
        &Mover,
        &Brain,
        &PhaseControl,
        bool,
    ),
    config: &EncounterConfig,
) -> Threat {
    let dx = boss_tf.translation.x - me;
    let gap = (dx.abs() - (hurtbox.half_size.x + boss_box.half_size.x)).max(0.0);

    let charge_contact = match *mover {
        Mover::Charge { direction, speed } if direction * dx < 0.0 => Some(gap / speed),
        Mover::Charge { .. } => None,
        _ if brain.action() == BossAction::ChargeAttack => {
            // still winding up; the charge will head our way
            let windup_at = config.hazards.windup_fraction * brain.duration();
            let windup_left = windup_at - brain.timer();
            let scale = config
                .phases
                .get(control.phase())
                .map_or(1.0, |behavior| behavior.speed_scale);
            let speed = config.boss.charge_speed * scale;
            (windup_left > 0.0).then(|| windup_left + gap / speed)
        }
        _ => None,
    };

    Threat {
        dx,
        gap,
        charge_contact,
        untargetable,
    }
}

fn away_from(me: f32, x: f32, facing: f32) -> f32 {
    if me > x {
        1.0
    } else if me < x {
        -1.0
    } else {
        -facing
    }
}

pub(super) fn drive(
    time: Res<Time>,
    settings: Res<Settings>,
    room: Res<ArenaRoom>,
    mut rng: ResMut<EncounterRng>,
    mut players: Query<
        (
            &mut Kinematics,
            &mut Autopilot,
            &mut Abilities,
            &Transform,
            &Hurtbox,
            &Health,
        ),
        With<Player>,
    >,
    bosses: Query<
        (
            &Transform,
            &Hurtbox,
            &Mover,
            &Brain,
            &PhaseControl,
            Has<Untargetable>,
        ),
        (With<Boss>, Without<Player>),
    >,
    rocks: Query<(&Rock, &Transform), Without<Player>>,
    hazards: Query<(&HazardZone, &Transform), Without<Player>>,
) {
    let Ok((mut kin, mut pilot, mut abilities, tf, hurtbox, health)) = players.single_mut() else {
        return;
    };
    if health.is_dead() {
        kin.velocity.x = 0.0;
        return;
    }
    let dt = time.delta_secs();
    let config = &settings.encounter;
    let (dash, strike) = (abilities.dash, abilities.strike);
    let me = tf.translation.x;
    let body = hurtbox.at(tf.translation.truncate());
    let zones: Vec<Aabb> = hazards
        .iter()
        .map(|(zone, zone_tf)| Aabb::new(zone_tf.translation.truncate(), zone.half_size))
        .collect();

    let mut walk = 0.0;
    if !room.sealed {
        pilot.facing = 1.0;
        walk = WALK_SPEED;
    } else if let Ok(boss) = bosses.single() {
        let threat = read_boss(me, hurtbox, boss, config);
        pilot.facing = if threat.dx < 0.0 { -1.0 } else { 1.0 };
        let incoming_rock = rocks.iter().find(|(rock, rock_tf)| {
            let dx = me - rock_tf.translation.x;
            dx.abs() < ROCK_ALERT && rock.velocity.x * dx > 0.0
        });
        let inside = zones.iter().find(|zone| zone.intersects(&body));

        if let Some(contact) = threat.charge_contact {
            // hop over the charge instead of trying to outrun it
            if contact <= CHARGE_JUMP_LEAD {
                kin.jump(JUMP_SPEED);
            }
        } else if let Some(zone) = inside {
            if zone.max().y - config.arena.floor <= LOW_HAZARD {
                kin.jump(JUMP_SPEED);
            } else {
                let away = away_from(me, zone.center.x, pilot.facing);
                walk = away * WALK_SPEED;
                if abilities.owner.is_ready(dash) {
                    pilot.dash_direction = away;
                    activate(&mut abilities, dash);
                }
            }
        } else if let Some((_, rock_tf)) = incoming_rock {
            if abilities.owner.is_ready(dash) {
                pilot.dash_direction = away_from(me, rock_tf.translation.x, pilot.facing);
                activate(&mut abilities, dash);
            }
        } else if threat.gap > STRIKE_REACH * 0.5 {
            // hold rather than walk into a live hazard
            let step = Vec2::X * pilot.facing * STEP_AHEAD;
            let ahead = Aabb::new(body.center + step, body.half_size);
            if !zones.iter().any(|zone| zone.intersects(&ahead)) {
                walk = pilot.facing * WALK_SPEED;
            }
        } else if !threat.untargetable && abilities.owner.is_ready(strike) {
            activate(&mut abilities, strike);
        }

        let hop = (HOP_RATE * f64::from(dt)).clamp(0.0, 1.0);
        if threat.charge_contact.is_none() && kin.grounded && rng.player.random_bool(hop) {
            kin.jump(JUMP_SPEED);
        }
    }

    kin.velocity.x = if abilities.owner.is_active(dash) {
        pilot.dash_direction * DASH_SPEED
    } else {
        walk
    };
    kin.gliding = !kin.grounded && kin.velocity.y < 0.0;
}

pub(super) fn integrate(
    time: Res<Time>,
    settings: Res<Settings>,
    room: Res<ArenaRoom>,
    mut players: Query<(&mut Kinematics, &mut Transform, &Hurtbox), With<Player>>,
) {
    let dt = time.delta_secs();
    let config = &settings.encounter;
    let arena = config.arena;

    for (mut kin, mut tf, hurtbox) in players.iter_mut() {
        if !kin.grounded {
            kin.velocity.y -= config.gravity * dt;
        }
        if kin.gliding {
            kin.velocity.y = kin.velocity.y.max(-GLIDE_FALL_SPEED);
        }

        let mut at = tf.translation.truncate() + kin.velocity * dt;
        let rest = arena.floor + hurtbox.half_size.y;
        if at.y <= rest {
            at.y = rest;
            kin.velocity.y = kin.velocity.y.max(0.0);
            kin.grounded = true;
            kin.gliding = false;
        } else {
            kin.grounded = false;
        }

        // the entrance stays open until the room seals
        let left = if room.sealed {
            arena.left
        } else {
            arena.left - SPAWN_OFFSET - 1.0
        };
        at.x = at
            .x
            .clamp(left + hurtbox.half_size.x, arena.right - hurtbox.half_size.x);
        tf.translation = at.extend(tf.translation.z);
    }
}
