//! Charge-up / active / cooldown timing shared by every ability.

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub type AbilityId = usize;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AbilityInfo {
    pub name: String,
    pub charge_up: f32,
    pub duration: f32,
    pub cooldown: f32,
}

impl AbilityInfo {
    pub fn new(name: impl Into<String>, charge_up: f32, duration: f32, cooldown: f32) -> Self {
        Self {
            name: name.into(),
            charge_up: charge_up.max(0.0),
            duration: duration.max(0.0),
            cooldown: cooldown.max(0.0),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AbilityStage {
    #[default]
    Ready,
    Charging,
    Active,
    Cooldown,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AbilityEvent {
    ChargeStarted(AbilityId),
    Activated(AbilityId),
    Ended(AbilityId),
    Ready(AbilityId),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AbilityError {
    #[error("no ability with id {0}")]
    Unknown(AbilityId),
    #[error("{name} cannot be used while {stage:?}")]
    NotReady { name: String, stage: AbilityStage },
}

#[derive(Debug, Clone)]
struct Slot {
    info: AbilityInfo,
    stage: AbilityStage,
    elapsed: f32,
    /// Activated since the last tick; the charge start has not been reported yet.
    pending: bool,
}

impl Slot {
    fn stage_length(&self) -> f32 {
        match self.stage {
            AbilityStage::Ready => f32::INFINITY,
            AbilityStage::Charging => self.info.charge_up,
            AbilityStage::Active => self.info.duration,
            AbilityStage::Cooldown => self.info.cooldown,
        }
    }
}

/// Owns a set of abilities and advances their timing envelopes.
#[derive(Debug, Clone, Default)]
pub struct AbilityOwner {
    slots: Vec<Slot>,
}

impl AbilityOwner {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, info: AbilityInfo) -> AbilityId {
        self.slots.push(Slot {
            info,
            stage: AbilityStage::Ready,
            elapsed: 0.0,
            pending: false,
        });
        self.slots.len() - 1
    }

    pub fn info(&self, id: AbilityId) -> Option<&AbilityInfo> {
        self.slots.get(id).map(|s| &s.info)
    }

    pub fn stage(&self, id: AbilityId) -> Option<AbilityStage> {
        self.slots.get(id).map(|s| s.stage)
    }

    pub fn is_ready(&self, id: AbilityId) -> bool {
        self.stage(id) == Some(AbilityStage::Ready)
    }

    pub fn is_active(&self, id: AbilityId) -> bool {
        self.stage(id) == Some(AbilityStage::Active)
    }

    /// Seconds until the ability is ready again, zero when it already is.
    pub fn remaining(&self, id: AbilityId) -> f32 {
        let Some(slot) = self.slots.get(id) else {
            return 0.0;
        };
        let info = &slot.info;
        let left_in_stage = (slot.stage_length() - slot.elapsed).max(0.0);
        match slot.stage {
            AbilityStage::Ready => 0.0,
            AbilityStage::Charging => left_in_stage + info.duration + info.cooldown,
            AbilityStage::Active => left_in_stage + info.cooldown,
            AbilityStage::Cooldown => left_in_stage,
        }
    }

    /// Starts charging. The stage change is reported by the next [`tick`](Self::tick).
    pub fn try_activate(&mut self, id: AbilityId) -> Result<(), AbilityError> {
        let slot = self.slots.get_mut(id).ok_or(AbilityError::Unknown(id))?;
        if slot.stage != AbilityStage::Ready {
            return Err(AbilityError::NotReady {
                name: slot.info.name.clone(),
                stage: slot.stage,
            });
        }
        slot.stage = AbilityStage::Charging;
        slot.elapsed = 0.0;
        slot.pending = true;
        Ok(())
    }

    /// Interrupts a charging or active ability; it still pays its cooldown.
    pub fn cancel(&mut self, id: AbilityId) -> Option<AbilityEvent> {
        let slot = self.slots.get_mut(id)?;
        match slot.stage {
            AbilityStage::Charging | AbilityStage::Active => {
                slot.stage = AbilityStage::Cooldown;
                slot.elapsed = 0.0;
                slot.pending = false;
                Some(AbilityEvent::Ended(id))
            }
            AbilityStage::Ready | AbilityStage::Cooldown => None,
        }
    }

    /// Advances every ability by `dt`, carrying leftover time across stages.
    pub fn tick(&mut self, dt: f32) -> Vec<AbilityEvent> {
        let mut events = Vec::new();
        for (id, slot) in self.slots.iter_mut().enumerate() {
            if slot.stage == AbilityStage::Ready {
                continue;
            }
            if std::mem::take(&mut slot.pending) {
                events.push(AbilityEvent::ChargeStarted(id));
            }
            slot.elapsed += dt.max(0.0);

            while slot.stage != AbilityStage::Ready && slot.elapsed >= slot.stage_length() {
                slot.elapsed -= slot.stage_length();
                let (next, event) = match slot.stage {
                    AbilityStage::Charging => (AbilityStage::Active, AbilityEvent::Activated(id)),
                    AbilityStage::Active => (AbilityStage::Cooldown, AbilityEvent::Ended(id)),
                    AbilityStage::Cooldown => (AbilityStage::Ready, AbilityEvent::Ready(id)),
                    AbilityStage::Ready => break,
                };
                slot.stage = next;
                events.push(event);
            }
            if slot.stage == AbilityStage::Ready {
                slot.elapsed = 0.0;
            }
        }
        events
    }
}
