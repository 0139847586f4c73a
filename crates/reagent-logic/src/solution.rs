//! Solutions - bounded containers of reagent quantities.
//!
//! Reagents are kept in insertion order. Every operation preserves:
//! - `current_volume == sum(quantities)`
//! - `current_volume <= max_volume`
//! - no stored quantity is zero

use serde::{Deserialize, Serialize};

use crate::error::TransferError;

/// Whole units of reagent
pub type ReagentUnit = u32;

/// Capability flags carried by a solution
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SolutionCaps(u8);

impl SolutionCaps {
    pub const NONE: Self = Self(0);
    /// The solution is the reservoir of an injector device
    pub const INJECTOR: Self = Self(1 << 0);
    /// The container can be injected into or drawn from by an injector
    pub const INJECTABLE: Self = Self(1 << 1);

    pub fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    pub fn bits(self) -> u8 {
        self.0
    }
}

impl std::ops::BitOr for SolutionCaps {
    type Output = Self;
    fn bitor(self, other: Self) -> Self {
        Self(self.0 | other.0)
    }
}

impl std::ops::BitOrAssign for SolutionCaps {
    fn bitor_assign(&mut self, other: Self) {
        self.0 |= other.0;
    }
}

/// A single reagent and how much of it is present
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReagentQuantity {
    pub reagent_id: String,
    pub quantity: ReagentUnit,
}

impl ReagentQuantity {
    pub fn new(reagent_id: impl Into<String>, quantity: ReagentUnit) -> Self {
        Self {
            reagent_id: reagent_id.into(),
            quantity,
        }
    }
}

/// Bounded multiset of reagents
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Solution {
    reagents: Vec<ReagentQuantity>,
    current_volume: ReagentUnit,
    max_volume: ReagentUnit,
    pub caps: SolutionCaps,
}

impl Solution {
    /// Empty solution that can hold up to `max_volume` units
    pub fn with_capacity(max_volume: ReagentUnit) -> Self {
        Self {
            max_volume,
            ..Self::default()
        }
    }

    pub fn with_caps(mut self, caps: SolutionCaps) -> Self {
        self.caps |= caps;
        self
    }

    pub fn current_volume(&self) -> ReagentUnit {
        self.current_volume
    }

    pub fn max_volume(&self) -> ReagentUnit {
        self.max_volume
    }

    pub fn empty_volume(&self) -> ReagentUnit {
        self.max_volume - self.current_volume
    }

    pub fn is_empty(&self) -> bool {
        self.current_volume == 0
    }

    /// Reagents in insertion order
    pub fn reagents(&self) -> &[ReagentQuantity] {
        &self.reagents
    }

    pub fn quantity_of(&self, reagent_id: &str) -> ReagentUnit {
        self.reagents
            .iter()
            .find(|r| r.reagent_id == reagent_id)
            .map(|r| r.quantity)
            .unwrap_or(0)
    }

    /// Sum of stored quantities, recomputed from scratch
    pub fn total_quantity(&self) -> u64 {
        self.reagents.iter().map(|r| r.quantity as u64).sum()
    }

    /// Check all volume invariants
    pub fn is_consistent(&self) -> bool {
        self.total_quantity() == self.current_volume as u64
            && self.current_volume <= self.max_volume
            && self.reagents.iter().all(|r| r.quantity > 0)
    }

    /// Add up to `amount` of a reagent, limited by headroom.
    /// Returns how much was accepted.
    pub fn add_reagent(&mut self, reagent_id: impl Into<String>, amount: ReagentUnit) -> ReagentUnit {
        let accepted = amount.min(self.empty_volume());
        if accepted == 0 {
            return 0;
        }
        self.merge_quantity(reagent_id.into(), accepted);
        self.current_volume += accepted;
        accepted
    }

    /// Remove up to `amount` of a reagent. Returns how much was removed;
    /// zero when the reagent isn't present.
    pub fn remove_reagent(&mut self, reagent_id: &str, amount: ReagentUnit) -> ReagentUnit {
        let Some(idx) = self.reagents.iter().position(|r| r.reagent_id == reagent_id) else {
            return 0;
        };

        let removed = amount.min(self.reagents[idx].quantity);
        self.reagents[idx].quantity -= removed;
        if self.reagents[idx].quantity == 0 {
            self.reagents.remove(idx);
        }
        self.current_volume -= removed;
        removed
    }

    /// Split off `min(requested, current_volume)` units into a new solution.
    ///
    /// Each reagent gives up its proportional (floored) share; the units the
    /// flooring leaves over are taken one at a time in insertion order. The
    /// returned solution holds exactly the removed quantities and is sized to
    /// its contents.
    pub fn split(&mut self, requested: ReagentUnit) -> Result<Solution, TransferError> {
        let actual = requested.min(self.current_volume);
        if actual == 0 {
            return Err(TransferError::Underflow);
        }

        let total = self.current_volume as u64;
        let mut removed: Vec<ReagentQuantity> = Vec::with_capacity(self.reagents.len());
        let mut taken: ReagentUnit = 0;

        for reagent in &mut self.reagents {
            let share = (reagent.quantity as u64 * actual as u64 / total) as ReagentUnit;
            reagent.quantity -= share;
            taken += share;
            removed.push(ReagentQuantity::new(reagent.reagent_id.clone(), share));
        }

        // Enough units remain: total - taken >= actual - taken
        let mut remainder = actual - taken;
        while remainder > 0 {
            for (reagent, out) in self.reagents.iter_mut().zip(removed.iter_mut()) {
                if remainder == 0 {
                    break;
                }
                if reagent.quantity > 0 {
                    reagent.quantity -= 1;
                    out.quantity += 1;
                    remainder -= 1;
                }
            }
        }

        self.reagents.retain(|r| r.quantity > 0);
        removed.retain(|r| r.quantity > 0);
        self.current_volume -= actual;

        Ok(Solution {
            reagents: removed,
            current_volume: actual,
            max_volume: actual,
            caps: SolutionCaps::NONE,
        })
    }

    /// Merge `incoming` into this solution if all of it fits.
    ///
    /// On failure nothing changes and `incoming` is handed back.
    pub fn try_add(&mut self, incoming: Solution) -> Result<(), Solution> {
        if incoming.current_volume > self.empty_volume() {
            return Err(incoming);
        }

        let volume = incoming.current_volume;
        for reagent in incoming.reagents {
            self.merge_quantity(reagent.reagent_id, reagent.quantity);
        }
        self.current_volume += volume;
        Ok(())
    }

    fn merge_quantity(&mut self, reagent_id: String, quantity: ReagentUnit) {
        if quantity == 0 {
            return;
        }
        match self.reagents.iter_mut().find(|r| r.reagent_id == reagent_id) {
            Some(existing) => existing.quantity += quantity,
            None => self.reagents.push(ReagentQuantity {
                reagent_id,
                quantity,
            }),
        }
    }
}
