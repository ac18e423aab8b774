use crate::models::*;
use bevy::prelude::*;

mod components;
mod damage;
mod hazards;

pub use components::*;
pub use hazards::{Anchored, Armed, HazardZone, Lifetime};

pub fn plugin(app: &mut App) {
    app.add_plugins((components::plugin, damage::plugin, hazards::plugin));
}
