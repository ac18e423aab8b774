use super::*;

pub fn plugin(app: &mut App) {
    app.add_systems(
        Update,
        (expire_hazards, disarm_hazards).in_set(AppSystems::TickTimers),
    )
        .add_systems(
            Update,
            (follow_anchors, hurt_players)
                .chain()
                .in_set(AppSystems::Resolve),
        );
}

/// Box that damages the player on contact.
#[derive(Component, Debug, Clone, Copy)]
pub struct HazardZone {
    pub damage: f32,
    pub half_size: Vec2,
}

/// Keeps a hazard glued to another entity.
#[derive(Component, Debug, Clone, Copy)]
pub struct Anchored {
    pub to: Entity,
    pub offset: Vec2,
}

/// Despawns the entity once the timer runs out.
#[derive(Component, Debug, Clone)]
pub struct Lifetime(pub Timer);

impl Lifetime {
    pub fn from_seconds(secs: f32) -> Self {
        Self(Timer::from_seconds(secs, TimerMode::Once))
    }
}

/// Hazard that only hurts until the timer runs out; the entity itself stays.
#[derive(Component, Debug, Clone)]
pub struct Armed(pub Timer);

impl Armed {
    pub fn from_seconds(secs: f32) -> Self {
        Self(Timer::from_seconds(secs, TimerMode::Once))
    }
}

fn disarm_hazards(time: Res<Time>, mut armed: Query<(Entity, &mut Armed)>, mut commands: Commands) {
    for (entity, mut armed) in armed.iter_mut() {
        armed.0.tick(time.delta());
        if armed.0.is_finished() {
            commands.entity(entity).remove::<(HazardZone, Armed)>();
        }
    }
}

fn expire_hazards(
    time: Res<Time>,
    mut lifetimes: Query<(Entity, &mut Lifetime)>,
    mut commands: Commands,
) {
    for (entity, mut lifetime) in lifetimes.iter_mut() {
        lifetime.0.tick(time.delta());
        if lifetime.0.is_finished() {
            commands.entity(entity).despawn();
        }
    }
}

fn follow_anchors(
    mut zones: Query<(Entity, &Anchored, &mut Transform)>,
    anchors: Query<&Transform, Without<Anchored>>,
    mut commands: Commands,
) {
    for (entity, anchored, mut transform) in zones.iter_mut() {
        let Ok(anchor) = anchors.get(anchored.to) else {
            commands.entity(entity).despawn();
            continue;
        };
        let at = anchor.translation.truncate() + anchored.offset;
        transform.translation = at.extend(transform.translation.z);
    }
}

fn hurt_players(
    zones: Query<(Entity, &HazardZone, &Transform)>,
    players: Query<(Entity, &Hurtbox, &Transform), With<Player>>,
    mut commands: Commands,
) {
    for (zone_entity, zone, zone_tf) in zones.iter() {
        let area = Aabb::new(zone_tf.translation.truncate(), zone.half_size);
        for (player, hurtbox, tf) in players.iter() {
            if area.intersects(&hurtbox.at(tf.translation.truncate())) {
                commands.trigger(DamageEvent {
                    source: Some(zone_entity),
                    target: player,
                    damage: zone.damage,
                });
            }
        }
    }
}
