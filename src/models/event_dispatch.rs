use super::*;

pub fn plugin(app: &mut App) {
    app.add_observer(phase_changed)
        .add_observer(action_started)
        .add_observer(encounter_ended);
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChanged {
    pub from: BossPhase,
    pub to: BossPhase,
}

impl From<PhaseChange> for PhaseChanged {
    fn from(change: PhaseChange) -> Self {
        Self {
            from: change.from,
            to: change.to,
        }
    }
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionStarted {
    pub action: BossAction,
    pub phase: BossPhase,
}

#[derive(Event, Debug, Clone, Copy, PartialEq, Eq, Deref)]
pub struct EncounterEnded(pub Outcome);

fn phase_changed(on: On<PhaseChanged>, mut state: ResMut<EncounterState>, mut commands: Commands) {
    let event = on.event();
    info!("geb: {} -> {}", event.from, event.to);
    state.phase = event.to;
    if event.to == BossPhase::Defeated {
        commands.trigger(EncounterEnded(Outcome::BossDefeated));
    }
}

fn action_started(on: On<ActionStarted>, mut state: ResMut<EncounterState>) {
    let event = on.event();
    state.actions_started += 1;
    debug!(
        "geb starts {} ({}) in {}",
        event.action,
        event.action.category(),
        event.phase
    );
}

/// First outcome wins; the app exits on the next frame.
fn encounter_ended(
    on: On<EncounterEnded>,
    mut state: ResMut<EncounterState>,
    mut exit: MessageWriter<AppExit>,
) {
    if state.is_over() {
        return;
    }
    let outcome = **on.event();
    state.outcome = Some(outcome);
    info!(
        "encounter over after {:.1}s: {outcome} ({} boss actions, last phase {})",
        state.elapsed, state.actions_started, state.phase
    );
    exit.write(AppExit::Success);
}
