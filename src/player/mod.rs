//! A scripted stand-in for the player: walks into the arena, fights at melee range,
//! jumps over charges, dashes out of the way of rocks and hazards, glides on the way down.

use crate::boss::{ArenaRoom, Mover};
use crate::combat::{Boss, DamageEvent, Health, Hurtbox, Invulnerability, Player};
use crate::models::*;
use bevy::prelude::*;
use geb_encounter_shared::*;
use rand::Rng;

mod control;

pub use control::*;

pub const PLAYER_HEALTH: f32 = 300.0;
pub const PLAYER_HALF_SIZE: [f32; 2] = [0.4, 0.9];
/// Seconds of invulnerability after taking a hit.
pub const GRACE_SECS: f32 = 1.0;
/// The player starts this far outside the arena's left wall.
pub const SPAWN_OFFSET: f32 = 4.0;

pub fn plugin(app: &mut App) {
    app.register_type::<Kinematics>()
        .add_systems(Startup, spawn_player)
        .add_systems(Update, control::tick_abilities.in_set(AppSystems::TickTimers))
        // reacts to what the boss decided this frame
        .add_systems(
            Update,
            control::drive
                .in_set(AppSystems::Think)
                .after(crate::boss::think),
        )
        .add_systems(Update, control::integrate.in_set(AppSystems::Move));
}

#[derive(Component, Reflect, Debug, Clone, Copy, Default, PartialEq)]
#[reflect(Component)]
pub struct Kinematics {
    pub velocity: Vec2,
    pub grounded: bool,
    pub gliding: bool,
}

/// The player's dash and strike.
#[derive(Component, Debug, Clone)]
pub struct Abilities {
    pub owner: AbilityOwner,
    pub dash: AbilityId,
    pub strike: AbilityId,
}

impl Default for Abilities {
    fn default() -> Self {
        let mut owner = AbilityOwner::new();
        let dash = owner.add(AbilityInfo::new("Dash", 0.0, 0.2, 0.9));
        let strike = owner.add(AbilityInfo::new("Strike", 0.15, 0.1, 0.45));
        Self {
            owner,
            dash,
            strike,
        }
    }
}

pub fn spawn_player(settings: Res<Settings>, mut commands: Commands) {
    let arena = settings.encounter.arena;
    let hurtbox = Hurtbox::new(PLAYER_HALF_SIZE);
    let x = arena.left - SPAWN_OFFSET;
    let y = arena.floor + hurtbox.half_size.y;

    commands.spawn((
        Name::new("Player"),
        Player,
        Health::new(PLAYER_HEALTH),
        Invulnerability::new(GRACE_SECS),
        hurtbox,
        Kinematics {
            grounded: true,
            ..default()
        },
        Abilities::default(),
        Autopilot::default(),
        Transform::from_xyz(x, y, 0.0),
    ));
}
