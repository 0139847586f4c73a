//! Injector mode state machine and the notices an injector shows its user.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::TransferError;
use crate::solution::ReagentUnit;

/// What an injector does when applied to a target
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InjectorMode {
    /// Push the injector's contents into the target
    Inject,
    /// Pull the target's contents into the injector
    #[default]
    Draw,
}

impl InjectorMode {
    pub fn toggled(self) -> Self {
        match self {
            InjectorMode::Inject => InjectorMode::Draw,
            InjectorMode::Draw => InjectorMode::Inject,
        }
    }

    /// Wire encoding: 0 = Inject, 1 = Draw
    pub fn to_wire(self) -> u8 {
        match self {
            InjectorMode::Inject => 0,
            InjectorMode::Draw => 1,
        }
    }

    pub fn from_wire(byte: u8) -> Option<Self> {
        match byte {
            0 => Some(InjectorMode::Inject),
            1 => Some(InjectorMode::Draw),
            _ => None,
        }
    }
}

impl fmt::Display for InjectorMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectorMode::Inject => write!(f, "Inject"),
            InjectorMode::Draw => write!(f, "Draw"),
        }
    }
}

/// Mode plus the inject-only restriction.
///
/// Inject-only devices start (and stay) in `Inject`; everything else
/// starts in `Draw`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModeSwitch {
    mode: InjectorMode,
    inject_only: bool,
}

impl ModeSwitch {
    pub fn new(inject_only: bool) -> Self {
        let mode = if inject_only {
            InjectorMode::Inject
        } else {
            InjectorMode::Draw
        };
        Self { mode, inject_only }
    }

    pub fn mode(&self) -> InjectorMode {
        self.mode
    }

    pub fn inject_only(&self) -> bool {
        self.inject_only
    }

    /// Flip between Inject and Draw. Returns whether the mode changed.
    pub fn toggle(&mut self) -> bool {
        if self.inject_only {
            return false;
        }
        self.mode = self.mode.toggled();
        true
    }
}

/// User-facing injector messages. `Display` renders the message template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InjectorNotice {
    Injected(ReagentUnit),
    Drew(ReagentUnit),
    ContainerFull,
    ContainerEmpty,
    ModeChanged(InjectorMode),
}

impl From<TransferError> for InjectorNotice {
    fn from(err: TransferError) -> Self {
        match err {
            TransferError::Underflow => InjectorNotice::ContainerEmpty,
            TransferError::Overflow | TransferError::Rejected { .. } => {
                InjectorNotice::ContainerFull
            }
        }
    }
}

impl fmt::Display for InjectorNotice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InjectorNotice::Injected(amount) => write!(f, "Injected {}u", amount),
            InjectorNotice::Drew(amount) => write!(f, "Drew {}u", amount),
            InjectorNotice::ContainerFull => write!(f, "Container full"),
            InjectorNotice::ContainerEmpty => write!(f, "Container empty"),
            InjectorNotice::ModeChanged(mode) => write!(f, "{} mode", mode),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_initial_mode() {
        assert_eq!(ModeSwitch::new(true).mode(), InjectorMode::Inject);
        assert_eq!(ModeSwitch::new(false).mode(), InjectorMode::Draw);
    }

    #[test]
    fn test_toggle_flips() {
        let mut switch = ModeSwitch::new(false);
        assert!(switch.toggle());
        assert_eq!(switch.mode(), InjectorMode::Inject);
        assert!(switch.toggle());
        assert_eq!(switch.mode(), InjectorMode::Draw);
    }

    #[test]
    fn test_inject_only_never_toggles() {
        let mut switch = ModeSwitch::new(true);
        for _ in 0..5 {
            assert!(!switch.toggle());
            assert_eq!(switch.mode(), InjectorMode::Inject);
        }
    }

    #[test]
    fn test_wire_encoding() {
        assert_eq!(InjectorMode::Inject.to_wire(), 0);
        assert_eq!(InjectorMode::Draw.to_wire(), 1);
        assert_eq!(InjectorMode::from_wire(1), Some(InjectorMode::Draw));
        assert_eq!(InjectorMode::from_wire(2), None);
    }

    #[test]
    fn test_notice_text() {
        assert_eq!(InjectorNotice::Injected(3).to_string(), "Injected 3u");
        assert_eq!(InjectorNotice::Drew(5).to_string(), "Drew 5u");
        assert_eq!(InjectorNotice::ContainerFull.to_string(), "Container full");
        assert_eq!(InjectorNotice::ContainerEmpty.to_string(), "Container empty");
        assert_eq!(
            InjectorNotice::ModeChanged(InjectorMode::Draw).to_string(),
            "Draw mode"
        );
    }

    #[test]
    fn test_notice_from_transfer_error() {
        assert_eq!(
            InjectorNotice::from(TransferError::Overflow),
            InjectorNotice::ContainerFull
        );
        assert_eq!(
            InjectorNotice::from(TransferError::Underflow),
            InjectorNotice::ContainerEmpty
        );
    }
}
