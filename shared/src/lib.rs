//! Engine-free gameplay logic for the Geb encounter.
//!
//! Everything here is deterministic given its inputs (randomness is always injected),
//! so the Bevy app and the tests drive exactly the same code.

pub mod ability;
pub mod action;
pub mod ballistics;
pub mod behavior;
pub mod config;
pub mod phase;
pub mod prediction;

pub use ability::*;
pub use action::*;
pub use ballistics::*;
pub use behavior::*;
pub use config::*;
pub use phase::*;
pub use prediction::*;
