use bevy::{app::ScheduleRunnerPlugin, log, prelude::*, time::TimeUpdateStrategy};
use std::time::Duration;

pub mod boss;
pub mod combat;
pub mod models;
pub mod player;
pub mod projectiles;

/// Fixed simulation step of the headless runner.
pub const TICK: Duration = Duration::from_micros(16_667);

fn main() {
    let mut app = App::new();

    // DEBUG
    // let filter = "info,geb_encounter=trace,geb_encounter_shared=trace".to_string();
    let filter = "info,geb_encounter=debug,geb_encounter_shared=debug".to_string();
    let log_level = log::LogPlugin {
        level: log::Level::DEBUG,
        filter,
        ..Default::default()
    };

    app.add_plugins((
        MinimalPlugins.set(ScheduleRunnerPlugin::run_loop(TICK)),
        log_level,
    ))
    // every frame advances the clock by exactly one tick so seeded runs replay
    .insert_resource(TimeUpdateStrategy::ManualDuration(TICK));

    app.add_plugins(encounter);
    app.run();
}

/// Everything but the runner and the log output.
fn encounter(app: &mut App) {
    // custom plugins. the order is important
    // be sure you use resources/types AFTER you add plugins that insert them
    app.add_plugins((
        models::plugin,
        combat::plugin,
        projectiles::plugin,
        player::plugin,
        boss::plugin,
    ));
}
