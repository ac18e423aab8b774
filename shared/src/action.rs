//! Boss actions, attack streak bookkeeping and weighted selection.

use crate::phase::BossPhase;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BossAction {
    #[default]
    Idle,
    Moving,
    RockThrowAttack,
    WallSummon,
    ChargeAttack,
    Earthquake,
    RockTornado,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ActionCategory {
    Attack,
    NonAttack,
}

impl fmt::Display for ActionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ActionCategory::Attack => f.write_str("attack"),
            ActionCategory::NonAttack => f.write_str("non-attack"),
        }
    }
}

impl BossAction {
    pub const ALL: [BossAction; 7] = [
        BossAction::Idle,
        BossAction::Moving,
        BossAction::RockThrowAttack,
        BossAction::WallSummon,
        BossAction::ChargeAttack,
        BossAction::Earthquake,
        BossAction::RockTornado,
    ];

    pub fn category(self) -> ActionCategory {
        match self {
            BossAction::Idle | BossAction::Moving => ActionCategory::NonAttack,
            BossAction::RockThrowAttack
            | BossAction::WallSummon
            | BossAction::ChargeAttack
            | BossAction::Earthquake
            | BossAction::RockTornado => ActionCategory::Attack,
        }
    }

    pub fn is_attack(self) -> bool {
        self.category() == ActionCategory::Attack
    }

    /// First combat phase in which the boss knows this move.
    pub fn unlocked_in(self) -> BossPhase {
        match self {
            BossAction::Idle | BossAction::Moving | BossAction::RockThrowAttack => {
                BossPhase::Phase1
            }
            BossAction::WallSummon | BossAction::ChargeAttack => BossPhase::Phase2,
            BossAction::Earthquake | BossAction::RockTornado => BossPhase::Phase3,
        }
    }

    pub fn is_unlocked(self, phase: BossPhase) -> bool {
        phase.is_combat() && phase >= self.unlocked_in()
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BossAction::Idle => "Idle",
            BossAction::Moving => "Moving",
            BossAction::RockThrowAttack => "RockThrowAttack",
            BossAction::WallSummon => "WallSummon",
            BossAction::ChargeAttack => "ChargeAttack",
            BossAction::Earthquake => "Earthquake",
            BossAction::RockTornado => "RockTornado",
        }
    }
}

impl fmt::Display for BossAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Signed streak of same-category picks.
///
/// Positive values count consecutive attacks, negative values consecutive
/// non-attacks, zero means nothing has been picked yet.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ChainCounter(i32);

impl ChainCounter {
    pub fn value(self) -> i32 {
        self.0
    }

    pub fn record(&mut self, category: ActionCategory) {
        self.0 = match category {
            ActionCategory::Attack if self.0 > 0 => self.0.saturating_add(1),
            ActionCategory::Attack => 1,
            ActionCategory::NonAttack if self.0 < 0 => self.0.saturating_sub(1),
            ActionCategory::NonAttack => -1,
        };
    }

    pub fn attack_streak(self) -> u32 {
        if self.0 > 0 { self.0.unsigned_abs() } else { 0 }
    }

    pub fn non_attack_streak(self) -> u32 {
        if self.0 < 0 { self.0.unsigned_abs() } else { 0 }
    }

    pub fn reset(&mut self) {
        self.0 = 0;
    }
}

/// Bounds on how many actions of one category may run back to back.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainLimits {
    pub min_attack: u32,
    pub max_attack: u32,
    pub min_non_attack: u32,
    pub max_non_attack: u32,
}

impl Default for ChainLimits {
    fn default() -> Self {
        Self {
            min_attack: 1,
            max_attack: 3,
            min_non_attack: 1,
            max_non_attack: 2,
        }
    }
}

impl ChainLimits {
    /// The category the next pick must have, if the streak leaves no choice.
    pub fn forced_category(&self, chain: ChainCounter) -> Option<ActionCategory> {
        let attacks = chain.attack_streak();
        let idles = chain.non_attack_streak();

        if attacks > 0 {
            if attacks >= self.max_attack {
                Some(ActionCategory::NonAttack)
            } else if attacks < self.min_attack {
                Some(ActionCategory::Attack)
            } else {
                None
            }
        } else if idles > 0 {
            if idles >= self.max_non_attack {
                Some(ActionCategory::Attack)
            } else if idles < self.min_non_attack {
                Some(ActionCategory::NonAttack)
            } else {
                None
            }
        } else {
            None
        }
    }
}

/// One row of a phase's action table.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActionSpec {
    pub action: BossAction,
    /// Relative likelihood among the rows that are allowed this pick.
    pub weight: f32,
    /// Seconds the action runs for.
    pub duration: f32,
}

impl ActionSpec {
    pub const fn new(action: BossAction, weight: f32, duration: f32) -> Self {
        Self {
            action,
            weight,
            duration,
        }
    }
}

/// Picks the row whose slice of `[0, 1)` contains `roll`.
///
/// With a forced category the partition is rebuilt over that category's rows
/// only. Returns `None` when no row is eligible.
pub fn select_action(
    table: &[ActionSpec],
    forced: Option<ActionCategory>,
    roll: f32,
) -> Option<&ActionSpec> {
    let eligible = |spec: &&ActionSpec| {
        spec.weight > 0.0 && forced.is_none_or(|c| spec.action.category() == c)
    };

    let total: f32 = table.iter().filter(eligible).map(|s| s.weight).sum();
    if total <= 0.0 {
        return None;
    }

    let target = roll.clamp(0.0, 1.0) * total;
    let mut breakpoint = 0.0;
    let mut last = None;
    for spec in table.iter().filter(eligible) {
        breakpoint += spec.weight;
        if target < breakpoint {
            return Some(spec);
        }
        last = Some(spec);
    }
    last
}
