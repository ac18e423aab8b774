use bevy::prelude::*;
use geb_encounter_shared::*;
use serde::{Deserialize, Serialize};

mod event_dispatch;
mod rng;
mod settings;
mod states;

pub use event_dispatch::*;
pub use rng::*;
pub use settings::*;
pub use states::*;

pub fn plugin(app: &mut App) {
    app.configure_sets(
        Update,
        (
            AppSystems::TickTimers,
            AppSystems::Think,
            AppSystems::Move,
            AppSystems::Resolve,
        )
            .chain(),
    );

    // settings first: the rng and the clock read it while building
    app.add_plugins((
        settings::plugin,
        rng::plugin,
        states::plugin,
        event_dispatch::plugin,
    ));
}

/// High-level groupings of systems for the app in the [`Update`] schedule.
/// When adding a new variant, make sure to order it in the `configure_sets`
/// call above.
#[derive(SystemSet, Debug, Clone, Copy, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum AppSystems {
    /// Tick timers and ability envelopes.
    TickTimers,
    /// Watch health, run the brain and the player script.
    Think,
    /// Integrate positions.
    Move,
    /// Overlaps, damage and cleanup.
    Resolve,
}
