use thiserror::Error;

use crate::solution::ReagentUnit;

/// Why a transfer between two solutions moved nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("source solution has nothing to give")]
    Underflow,

    #[error("destination solution has no headroom")]
    Overflow,

    #[error("destination rejected {amount}u after clamping; split returned to source")]
    Rejected { amount: ReagentUnit },
}
