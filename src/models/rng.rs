//! Seeded randomness for the encounter.
//!
//! The boss and the scripted player draw from separate streams derived from the
//! same base seed, so tweaking one script never shifts the other's rolls.

use super::*;
use rand::{SeedableRng, rngs::StdRng};

const BOSS_STREAM: u64 = 0x6eb;
const PLAYER_STREAM: u64 = 0x9a7;

pub fn plugin(app: &mut App) {
    let seed = app.world().get_resource::<Settings>().and_then(|s| s.seed);
    app.insert_resource(EncounterRng::new(seed));
}

#[derive(Resource, Debug, Clone)]
pub struct EncounterRng {
    pub boss: StdRng,
    pub player: StdRng,
}

impl EncounterRng {
    pub fn new(seed: Option<u64>) -> Self {
        match seed {
            Some(seed) => {
                info!("seeding encounter rng with {seed}");
                Self::from_seed(seed)
            }
            None => Self {
                boss: StdRng::from_os_rng(),
                player: StdRng::from_os_rng(),
            },
        }
    }

    pub fn from_seed(seed: u64) -> Self {
        Self {
            boss: StdRng::seed_from_u64(stream_seed(seed, BOSS_STREAM)),
            player: StdRng::seed_from_u64(stream_seed(seed, PLAYER_STREAM)),
        }
    }
}

/// Mixes a stream id into the base seed.
pub fn stream_seed(seed: u64, stream: u64) -> u64 {
    let mut hash = seed;
    hash ^= stream;
    hash = hash.wrapping_mul(0x100000001b3);
    hash ^= hash >> 32;
    hash.wrapping_mul(0x100000001b3)
}
