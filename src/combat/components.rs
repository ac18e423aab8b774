use bevy::prelude::*;

pub fn plugin(app: &mut App) {
    app.register_type::<Health>()
        .register_type::<Hurtbox>()
        .register_type::<Invulnerability>();
}

/// Health component for any entity that can take damage.
#[derive(Component, Reflect, Debug, Clone)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Health {
    pub fn new(max: f32) -> Self {
        Self { current: max, max }
    }

    pub fn take_damage(&mut self, amount: f32) -> bool {
        self.current = (self.current - amount).max(0.0);
        self.current <= 0.0
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }

    pub fn fraction(&self) -> f32 {
        if self.max <= 0.0 {
            return 0.0;
        }
        self.current / self.max
    }
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

/// The Geb boss.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Boss;

/// The player avatar the boss targets.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Player;

/// Axis-aligned box centred on the entity's translation.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct Hurtbox {
    pub half_size: Vec2,
}

impl Hurtbox {
    pub fn new(half_size: impl Into<Vec2>) -> Self {
        Self {
            half_size: half_size.into(),
        }
    }

    pub fn at(&self, center: Vec2) -> Aabb {
        Aabb::new(center, self.half_size)
    }
}

/// Entity ignores all incoming damage while this is present.
#[derive(Component, Debug, Clone, Copy, Default)]
pub struct Untargetable;

/// Grace window after a hit during which further damage is ignored.
#[derive(Component, Reflect, Debug, Clone, Copy)]
#[reflect(Component)]
pub struct Invulnerability {
    pub window: f32,
    pub remaining: f32,
}

impl Invulnerability {
    pub fn new(window: f32) -> Self {
        Self {
            window,
            remaining: 0.0,
        }
    }

    pub fn is_active(&self) -> bool {
        self.remaining > 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    pub center: Vec2,
    pub half_size: Vec2,
}

impl Aabb {
    pub fn new(center: Vec2, half_size: Vec2) -> Self {
        Self { center, half_size }
    }

    pub fn min(&self) -> Vec2 {
        self.center - self.half_size
    }

    pub fn max(&self) -> Vec2 {
        self.center + self.half_size
    }

    pub fn intersects(&self, other: &Aabb) -> bool {
        let d = (self.center - other.center).abs();
        let reach = self.half_size + other.half_size;
        d.x <= reach.x && d.y <= reach.y
    }

    pub fn intersects_circle(&self, center: Vec2, radius: f32) -> bool {
        let closest = center.clamp(self.min(), self.max());
        closest.distance_squared(center) <= radius * radius
    }
}

/// Event fired when damage should be applied (use with commands.trigger()).
#[derive(Event, Debug, Clone, Copy)]
pub struct DamageEvent {
    pub source: Option<Entity>,
    pub target: Entity,
    pub damage: f32,
}

/// Event fired when an entity's health reaches zero.
#[derive(Event, Debug, Clone, Copy)]
pub struct DeathEvent {
    pub entity: Entity,
}
