use super::*;
use crate::combat::Player;

/// How far past the left wall the player must walk before the room seals.
pub const ENTRANCE_DEPTH: f32 = 1.0;

#[derive(Resource, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ArenaRoom {
    pub sealed: bool,
}

pub(super) fn seal_arena(
    settings: Res<Settings>,
    mut room: ResMut<ArenaRoom>,
    players: Query<&Transform, With<Player>>,
    mut bosses: Query<&mut PhaseControl, With<Boss>>,
    mut commands: Commands,
) {
    if room.sealed {
        return;
    }
    let Ok(player) = players.single() else {
        return;
    };
    let arena = settings.encounter.arena;
    if player.translation.x < arena.left + ENTRANCE_DEPTH {
        return;
    }

    room.sealed = true;
    info!("player entered the arena, sealing the room");
    for mut control in bosses.iter_mut() {
        if let Some(change) = control.begin_encounter() {
            commands.trigger(PhaseChanged::from(change));
        }
    }
}
