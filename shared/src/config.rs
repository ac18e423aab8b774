//! Tuning for the whole encounter, loadable from RON.

use crate::action::{ActionCategory, ActionSpec, BossAction, ChainLimits};
use crate::phase::{BossPhase, CutsceneTiming, PhaseThresholds};
use crate::prediction::ArenaBounds;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("gravity must be positive, got {0}")]
    Gravity(f32),
    #[error("arena is empty: left {left} must be below right {right}")]
    Arena { left: f32, right: f32 },
    #[error("boss max health must be positive, got {0}")]
    MaxHealth(f32),
    #[error("phase thresholds must satisfy 0 < phase3 ({phase3}) < phase2 ({phase2}) < 1")]
    Thresholds { phase2: f32, phase3: f32 },
    #[error("{category} chain bounds need 1 <= min ({min}) <= max ({max})")]
    ChainBounds {
        category: ActionCategory,
        min: u32,
        max: u32,
    },
    #[error("hazard window needs 0 <= windup ({windup}) < recovery ({recovery}) <= 1")]
    HazardWindow { windup: f32, recovery: f32 },
    #[error("{phase} has no {category} action to fall back on")]
    MissingCategory {
        phase: BossPhase,
        category: ActionCategory,
    },
    #[error("{action} is not unlocked in {phase}")]
    LockedAction { phase: BossPhase, action: BossAction },
    #[error("{action} in {phase} needs a non-negative weight and positive duration, got {weight} / {duration}")]
    ActionTiming {
        phase: BossPhase,
        action: BossAction,
        weight: f32,
        duration: f32,
    },
    #[error("{phase} must throw at least one rock per throw")]
    RocksPerThrow { phase: BossPhase },
    #[error("cutscene durations must not be negative")]
    Cutscene,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BossTuning {
    pub max_health: f32,
    pub move_speed: f32,
    pub charge_speed: f32,
    /// Stop distance for `Moving`.
    pub arrive_distance: f32,
    /// Rocks leave the boss this far above its feet.
    pub throw_height: f32,
    pub half_size: [f32; 2],
}

impl Default for BossTuning {
    fn default() -> Self {
        Self {
            max_health: 1200.0,
            move_speed: 4.0,
            charge_speed: 16.0,
            arrive_distance: 0.2,
            throw_height: 3.0,
            half_size: [1.2, 1.6],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HazardTuning {
    /// Fraction of an action's duration spent winding up.
    pub windup_fraction: f32,
    /// Fraction of an action's duration after which hitboxes switch off.
    pub recovery_fraction: f32,
    pub charge_damage: f32,
    pub shockwave_damage: f32,
    /// Targets at most this high above the floor are hit by a shockwave.
    pub shockwave_height: f32,
    pub tornado_damage: f32,
    pub tornado_half_size: [f32; 2],
    pub wall_damage: f32,
    pub wall_half_size: [f32; 2],
    /// Seconds a wall hurts while rising; afterwards it is harmless.
    pub wall_rise: f32,
    pub wall_lifetime: f32,
}

impl Default for HazardTuning {
    fn default() -> Self {
        Self {
            windup_fraction: 0.4,
            recovery_fraction: 0.85,
            charge_damage: 25.0,
            shockwave_damage: 20.0,
            shockwave_height: 0.5,
            tornado_damage: 15.0,
            tornado_half_size: [3.0, 4.0],
            wall_damage: 20.0,
            wall_half_size: [0.6, 2.5],
            wall_rise: 0.3,
            wall_lifetime: 2.5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RockTuning {
    pub damage: f32,
    pub radius: f32,
}

impl Default for RockTuning {
    fn default() -> Self {
        Self {
            damage: 15.0,
            radius: 0.4,
        }
    }
}

/// What the boss does in one combat phase.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseBehavior {
    pub actions: Vec<ActionSpec>,
    /// Multiplier on walking and charging speed.
    pub speed_scale: f32,
    pub rocks_per_throw: u32,
}

impl Default for PhaseBehavior {
    fn default() -> Self {
        Self::phase1()
    }
}

impl PhaseBehavior {
    pub fn phase1() -> Self {
        Self {
            actions: vec![
                ActionSpec::new(BossAction::Idle, 0.3, 1.2),
                ActionSpec::new(BossAction::Moving, 0.3, 1.6),
                ActionSpec::new(BossAction::RockThrowAttack, 0.4, 1.8),
            ],
            speed_scale: 1.0,
            rocks_per_throw: 1,
        }
    }

    pub fn phase2() -> Self {
        Self {
            actions: vec![
                ActionSpec::new(BossAction::Idle, 0.2, 1.0),
                ActionSpec::new(BossAction::Moving, 0.2, 1.4),
                ActionSpec::new(BossAction::RockThrowAttack, 0.25, 1.6),
                ActionSpec::new(BossAction::WallSummon, 0.15, 1.8),
                ActionSpec::new(BossAction::ChargeAttack, 0.2, 1.5),
            ],
            speed_scale: 1.2,
            rocks_per_throw: 2,
        }
    }

    pub fn phase3() -> Self {
        Self {
            actions: vec![
                ActionSpec::new(BossAction::Idle, 0.1, 0.8),
                ActionSpec::new(BossAction::Moving, 0.15, 1.2),
                ActionSpec::new(BossAction::RockThrowAttack, 0.2, 1.4),
                ActionSpec::new(BossAction::WallSummon, 0.1, 1.6),
                ActionSpec::new(BossAction::ChargeAttack, 0.15, 1.3),
                ActionSpec::new(BossAction::Earthquake, 0.15, 2.0),
                ActionSpec::new(BossAction::RockTornado, 0.15, 2.4),
            ],
            speed_scale: 1.4,
            rocks_per_throw: 3,
        }
    }

    pub fn spec(&self, action: BossAction) -> Option<&ActionSpec> {
        self.actions.iter().find(|s| s.action == action)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhaseTable {
    pub phase1: PhaseBehavior,
    pub phase2: PhaseBehavior,
    pub phase3: PhaseBehavior,
}

impl Default for PhaseTable {
    fn default() -> Self {
        Self {
            phase1: PhaseBehavior::phase1(),
            phase2: PhaseBehavior::phase2(),
            phase3: PhaseBehavior::phase3(),
        }
    }
}

impl PhaseTable {
    /// Behaviour for a combat phase; `None` outside combat.
    pub fn get(&self, phase: BossPhase) -> Option<&PhaseBehavior> {
        match phase {
            BossPhase::Phase1 => Some(&self.phase1),
            BossPhase::Phase2 => Some(&self.phase2),
            BossPhase::Phase3 => Some(&self.phase3),
            BossPhase::Inactive
            | BossPhase::OpeningCutscene
            | BossPhase::ClosingCutscene
            | BossPhase::Defeated => None,
        }
    }

    fn iter(&self) -> impl Iterator<Item = (BossPhase, &PhaseBehavior)> {
        [
            (BossPhase::Phase1, &self.phase1),
            (BossPhase::Phase2, &self.phase2),
            (BossPhase::Phase3, &self.phase3),
        ]
        .into_iter()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EncounterConfig {
    /// Downward acceleration, units per second squared.
    pub gravity: f32,
    pub arena: ArenaBounds,
    pub boss: BossTuning,
    pub thresholds: PhaseThresholds,
    pub chains: ChainLimits,
    pub cutscenes: CutsceneTiming,
    pub hazards: HazardTuning,
    pub rocks: RockTuning,
    pub phases: PhaseTable,
}

impl Default for EncounterConfig {
    fn default() -> Self {
        Self {
            gravity: 30.0,
            arena: ArenaBounds::default(),
            boss: BossTuning::default(),
            thresholds: PhaseThresholds::default(),
            chains: ChainLimits::default(),
            cutscenes: CutsceneTiming::default(),
            hazards: HazardTuning::default(),
            rocks: RockTuning::default(),
            phases: PhaseTable::default(),
        }
    }
}

impl EncounterConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.gravity.is_finite() || self.gravity <= 0.0 {
            return Err(ConfigError::Gravity(self.gravity));
        }
        if self.arena.left >= self.arena.right {
            return Err(ConfigError::Arena {
                left: self.arena.left,
                right: self.arena.right,
            });
        }
        if self.boss.max_health <= 0.0 {
            return Err(ConfigError::MaxHealth(self.boss.max_health));
        }

        let PhaseThresholds { phase2, phase3 } = self.thresholds;
        if !(0.0 < phase3 && phase3 < phase2 && phase2 < 1.0) {
            return Err(ConfigError::Thresholds { phase2, phase3 });
        }

        let c = &self.chains;
        for (category, min, max) in [
            (ActionCategory::Attack, c.min_attack, c.max_attack),
            (ActionCategory::NonAttack, c.min_non_attack, c.max_non_attack),
        ] {
            if min == 0 || min > max {
                return Err(ConfigError::ChainBounds { category, min, max });
            }
        }

        let h = &self.hazards;
        if !(0.0 <= h.windup_fraction
            && h.windup_fraction < h.recovery_fraction
            && h.recovery_fraction <= 1.0)
        {
            return Err(ConfigError::HazardWindow {
                windup: h.windup_fraction,
                recovery: h.recovery_fraction,
            });
        }

        if self.cutscenes.opening < 0.0 || self.cutscenes.closing < 0.0 {
            return Err(ConfigError::Cutscene);
        }

        for (phase, behavior) in self.phases.iter() {
            for spec in &behavior.actions {
                if !spec.action.is_unlocked(phase) {
                    return Err(ConfigError::LockedAction {
                        phase,
                        action: spec.action,
                    });
                }
                let weight_ok = spec.weight.is_finite() && spec.weight >= 0.0;
                let duration_ok = spec.duration.is_finite() && spec.duration > 0.0;
                if !weight_ok || !duration_ok {
                    return Err(ConfigError::ActionTiming {
                        phase,
                        action: spec.action,
                        weight: spec.weight,
                        duration: spec.duration,
                    });
                }
            }
            for category in [ActionCategory::Attack, ActionCategory::NonAttack] {
                let present = behavior
                    .actions
                    .iter()
                    .any(|s| s.weight > 0.0 && s.action.category() == category);
                if !present {
                    return Err(ConfigError::MissingCategory { phase, category });
                }
            }
            if behavior.rocks_per_throw == 0 {
                return Err(ConfigError::RocksPerThrow { phase });
            }
        }

        Ok(())
    }
}
