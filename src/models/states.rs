use super::*;
use std::fmt;

pub fn plugin(app: &mut App) {
    app.init_resource::<EncounterState>()
        .add_systems(Update, tick_clock.in_set(AppSystems::TickTimers));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Outcome {
    BossDefeated,
    PlayerDefeated,
    TimedOut,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Outcome::BossDefeated => "boss defeated",
            Outcome::PlayerDefeated => "player defeated",
            Outcome::TimedOut => "timed out",
        })
    }
}

/// Run-level bookkeeping, mirrored from the lifecycle events.
#[derive(Resource, Debug, Clone, Default, PartialEq)]
pub struct EncounterState {
    pub elapsed: f32,
    pub phase: BossPhase,
    pub actions_started: u32,
    pub outcome: Option<Outcome>,
}

impl EncounterState {
    pub fn is_over(&self) -> bool {
        self.outcome.is_some()
    }
}

fn tick_clock(
    time: Res<Time>,
    settings: Res<Settings>,
    mut state: ResMut<EncounterState>,
    mut commands: Commands,
) {
    if state.is_over() {
        return;
    }
    state.elapsed += time.delta_secs();
    if state.elapsed >= settings.time_limit {
        commands.trigger(EncounterEnded(Outcome::TimedOut));
    }
}
