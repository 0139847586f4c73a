//! Chemistry components: SolutionContainer, Injector, Liver.

use serde::{Deserialize, Serialize};

use crate::config::{InjectorConfig, LiverConfig};
use reagent_logic::{
    transfer, InjectorMode, InjectorNotice, ModeSwitch, ReagentUnit, Solution, SolutionCaps,
};

/// A container other entities can reach into (beakers, bottles, tanks)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SolutionContainer {
    pub solution: Solution,
}

impl SolutionContainer {
    pub fn new(max_volume: ReagentUnit, caps: SolutionCaps) -> Self {
        Self {
            solution: Solution::with_capacity(max_volume).with_caps(caps),
        }
    }

    /// Beaker-style container that injectors can use
    pub fn injectable(max_volume: ReagentUnit) -> Self {
        Self::new(max_volume, SolutionCaps::INJECTABLE)
    }

    pub fn with_reagent(mut self, reagent_id: impl Into<String>, amount: ReagentUnit) -> Self {
        self.solution.add_reagent(reagent_id, amount);
        self
    }

    pub fn accepts_injection(&self) -> bool {
        self.solution.caps.contains(SolutionCaps::INJECTABLE)
    }
}

/// Syringe-style device with its own reservoir.
///
/// Any change visible to a display sets `dirty`; replication clears it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Injector {
    switch: ModeSwitch,
    transfer_amount: ReagentUnit,
    internal: Solution,
    #[serde(skip)]
    dirty: bool,
}

impl Injector {
    pub fn new(config: &InjectorConfig) -> Self {
        Self {
            switch: ModeSwitch::new(config.inject_only),
            transfer_amount: config.transfer_amount,
            internal: Solution::with_capacity(config.max_volume).with_caps(SolutionCaps::INJECTOR),
            dirty: true,
        }
    }

    pub fn mode(&self) -> InjectorMode {
        self.switch.mode()
    }

    pub fn inject_only(&self) -> bool {
        self.switch.inject_only()
    }

    pub fn transfer_amount(&self) -> ReagentUnit {
        self.transfer_amount
    }

    pub fn internal(&self) -> &Solution {
        &self.internal
    }

    /// Mutable reservoir access; marks the injector dirty
    pub fn internal_mut(&mut self) -> &mut Solution {
        self.dirty = true;
        &mut self.internal
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Read and clear the dirty flag
    pub fn take_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    /// Flip Inject/Draw. Inject-only devices ignore this.
    pub fn toggle(&mut self) -> bool {
        let changed = self.switch.toggle();
        if changed {
            self.dirty = true;
        }
        changed
    }

    /// Push up to `transfer_amount` into `target`.
    ///
    /// The target's headroom is checked before the reservoir, so a full
    /// target reads "Container full" even when the injector is empty.
    pub fn inject_into(&mut self, target: &mut Solution) -> InjectorNotice {
        if target.empty_volume() == 0 {
            return InjectorNotice::ContainerFull;
        }
        match transfer(&mut self.internal, target, self.transfer_amount) {
            Ok(amount) => {
                self.dirty = true;
                InjectorNotice::Injected(amount)
            }
            Err(err) => err.into(),
        }
    }

    /// Pull up to `transfer_amount` out of `source`
    pub fn draw_from(&mut self, source: &mut Solution) -> InjectorNotice {
        match transfer(source, &mut self.internal, self.transfer_amount) {
            Ok(amount) => {
                self.dirty = true;
                InjectorNotice::Drew(amount)
            }
            Err(err) => err.into(),
        }
    }
}

/// Consumes reagents over time.
///
/// The liver's solution is always its own, never another component's, so
/// metabolism can't eat from blood or stomach contents on the same entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Liver {
    internal: Solution,
}

impl Liver {
    pub fn new(config: &LiverConfig) -> Self {
        Self {
            internal: Solution::with_capacity(config.max_volume),
        }
    }

    pub fn internal(&self) -> &Solution {
        &self.internal
    }

    pub fn internal_mut(&mut self) -> &mut Solution {
        &mut self.internal
    }

    /// Take `solution` only if all of it fits
    pub fn try_transfer(&mut self, solution: Solution) -> Result<(), Solution> {
        self.internal.try_add(solution)
    }
}
