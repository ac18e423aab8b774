//! The Geb entity and the systems that drive it.
//! Each frame: the room may seal, the phase controller reacts to health, then the
//! brain runs the current phase routine and its commands are applied to the world.

use crate::combat::{Boss, Health, Hurtbox, Untargetable};
use crate::models::*;
use bevy::prelude::*;
use geb_encounter_shared::*;

mod brain;
mod movement;
mod phase;
mod room;

pub use brain::{Brain, LiveHazard, think};
pub use movement::Mover;
pub use phase::PhaseControl;
pub use room::{ArenaRoom, ENTRANCE_DEPTH};

pub fn plugin(app: &mut App) {
    app.init_resource::<ArenaRoom>()
        .add_systems(Startup, spawn_boss)
        .add_systems(
            Update,
            (room::seal_arena, phase::watch_health, think)
                .chain()
                .in_set(AppSystems::Think),
        )
        .add_systems(Update, movement::move_boss.in_set(AppSystems::Move));
}

pub fn spawn_boss(settings: Res<Settings>, mut commands: Commands) {
    let config = &settings.encounter;
    let hurtbox = Hurtbox::new(config.boss.half_size);
    let x = config.arena.right - hurtbox.half_size.x - 2.0;
    let y = config.arena.floor + hurtbox.half_size.y;

    commands.spawn((
        Name::new("Geb"),
        Boss,
        Health::new(config.boss.max_health),
        hurtbox,
        Untargetable,
        PhaseControl(PhaseController::new(config.thresholds, config.cutscenes)),
        Brain::default(),
        LiveHazard::default(),
        Mover::default(),
        Transform::from_xyz(x, y, 0.0),
    ));
    info!("geb waits at x = {x:.1}, {} hp", config.boss.max_health);
}
