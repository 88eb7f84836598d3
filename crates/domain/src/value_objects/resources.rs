//! Per-class consumable resource pools (rage, ki, spell slots, ...).

use serde::{Deserialize, Serialize};
use std::fmt;

/// When a pool refills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RestType {
    Short,
    Long,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Rage,
    SecondWind,
    BardicInspiration,
    LayOnHands,
    SpellSlotsLevel1,
    PactSlots,
    ChannelDivinity,
    Ki,
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Rage => "rage",
            Self::SecondWind => "second_wind",
            Self::BardicInspiration => "bardic_inspiration",
            Self::LayOnHands => "lay_on_hands",
            Self::SpellSlotsLevel1 => "spell_slots_level_1",
            Self::PactSlots => "pact_slots",
            Self::ChannelDivinity => "channel_divinity",
            Self::Ki => "ki",
        };
        write!(f, "{}", s)
    }
}

/// A consumable pool. `current` never exceeds `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourcePool {
    pub kind: ResourceKind,
    pub max: u32,
    pub current: u32,
    pub recharge: RestType,
}

impl ResourcePool {
    /// A full pool.
    pub fn full(kind: ResourceKind, max: u32, recharge: RestType) -> Self {
        Self {
            kind,
            max,
            current: max,
            recharge,
        }
    }

    /// Spend `amount`; returns false (and spends nothing) if not enough remains.
    pub fn spend(&mut self, amount: u32) -> bool {
        if amount > self.current {
            return false;
        }
        self.current -= amount;
        true
    }

    /// Refill if this rest type recharges the pool. A long rest also covers short-rest pools.
    pub fn rest(&mut self, rest: RestType) {
        if rest == RestType::Long || self.recharge == rest {
            self.current = self.max;
        }
    }
}
