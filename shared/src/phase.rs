//! Encounter phases and the health watcher that advances them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Behavioural regime of the boss. Declaration order is encounter order.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum BossPhase {
    #[default]
    Inactive,
    OpeningCutscene,
    Phase1,
    Phase2,
    Phase3,
    ClosingCutscene,
    Defeated,
}

impl BossPhase {
    pub const ALL: [BossPhase; 7] = [
        BossPhase::Inactive,
        BossPhase::OpeningCutscene,
        BossPhase::Phase1,
        BossPhase::Phase2,
        BossPhase::Phase3,
        BossPhase::ClosingCutscene,
        BossPhase::Defeated,
    ];

    /// Phases in which the boss fights and can be hurt.
    pub fn is_combat(self) -> bool {
        matches!(self, BossPhase::Phase1 | BossPhase::Phase2 | BossPhase::Phase3)
    }

    pub fn is_cutscene(self) -> bool {
        matches!(self, BossPhase::OpeningCutscene | BossPhase::ClosingCutscene)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BossPhase::Inactive => "Inactive",
            BossPhase::OpeningCutscene => "OpeningCutscene",
            BossPhase::Phase1 => "Phase1",
            BossPhase::Phase2 => "Phase2",
            BossPhase::Phase3 => "Phase3",
            BossPhase::ClosingCutscene => "ClosingCutscene",
            BossPhase::Defeated => "Defeated",
        }
    }
}

impl fmt::Display for BossPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Health fractions at which the boss escalates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PhaseThresholds {
    /// Drop to or below this fraction to enter Phase2.
    pub phase2: f32,
    /// Drop to or below this fraction to enter Phase3.
    pub phase3: f32,
}

impl Default for PhaseThresholds {
    fn default() -> Self {
        Self {
            phase2: 0.66,
            phase3: 0.33,
        }
    }
}

impl PhaseThresholds {
    pub fn combat_phase_for(&self, health_fraction: f32) -> BossPhase {
        if health_fraction > self.phase2 {
            BossPhase::Phase1
        } else if health_fraction > self.phase3 {
            BossPhase::Phase2
        } else {
            BossPhase::Phase3
        }
    }
}

/// Length of the scripted sections, in seconds.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CutsceneTiming {
    pub opening: f32,
    pub closing: f32,
}

impl Default for CutsceneTiming {
    fn default() -> Self {
        Self {
            opening: 3.0,
            closing: 4.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PhaseChange {
    pub from: BossPhase,
    pub to: BossPhase,
}

/// Forward-only phase state machine.
#[derive(Debug, Clone)]
pub struct PhaseController {
    phase: BossPhase,
    thresholds: PhaseThresholds,
    cutscenes: CutsceneTiming,
    cutscene_elapsed: f32,
}

impl PhaseController {
    pub fn new(thresholds: PhaseThresholds, cutscenes: CutsceneTiming) -> Self {
        Self {
            phase: BossPhase::Inactive,
            thresholds,
            cutscenes,
            cutscene_elapsed: 0.0,
        }
    }

    pub fn phase(&self) -> BossPhase {
        self.phase
    }

    /// Starts the opening cutscene. Only meaningful while the boss is dormant.
    pub fn begin_encounter(&mut self) -> Option<PhaseChange> {
        match self.phase {
            BossPhase::Inactive => self.advance_to(BossPhase::OpeningCutscene),
            _ => None,
        }
    }

    pub fn tick(&mut self, dt: f32, health_fraction: f32) -> Option<PhaseChange> {
        match self.phase {
            BossPhase::Inactive | BossPhase::Defeated => None,
            BossPhase::OpeningCutscene => {
                self.cutscene_elapsed += dt;
                if self.cutscene_elapsed >= self.cutscenes.opening {
                    self.advance_to(BossPhase::Phase1)
                } else {
                    None
                }
            }
            BossPhase::Phase1 | BossPhase::Phase2 | BossPhase::Phase3 => {
                if health_fraction <= 0.0 {
                    self.advance_to(BossPhase::ClosingCutscene)
                } else {
                    self.advance_to(self.thresholds.combat_phase_for(health_fraction))
                }
            }
            BossPhase::ClosingCutscene => {
                self.cutscene_elapsed += dt;
                if self.cutscene_elapsed >= self.cutscenes.closing {
                    self.advance_to(BossPhase::Defeated)
                } else {
                    None
                }
            }
        }
    }

    fn advance_to(&mut self, to: BossPhase) -> Option<PhaseChange> {
        if to <= self.phase {
            return None;
        }
        let from = self.phase;
        self.phase = to;
        self.cutscene_elapsed = 0.0;
        Some(PhaseChange { from, to })
    }
}
