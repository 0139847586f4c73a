//! Transfer engine - moves reagents between two independently owned solutions.
//!
//! The amount is always pre-clamped to what the source holds and what the
//! destination can take, so once it is non-zero the split/merge pair cannot
//! fail on capacity.

use crate::error::TransferError;
use crate::solution::{ReagentUnit, Solution};

/// `min(requested, available, headroom)`
pub fn clamp_transfer(
    requested: ReagentUnit,
    available: ReagentUnit,
    headroom: ReagentUnit,
) -> ReagentUnit {
    requested.min(available).min(headroom)
}

/// Move up to `requested` units from `source` into `destination`.
///
/// The source is checked first: an empty source (or a zero request) is
/// `Underflow`, a full destination is `Overflow`. Neither side is touched
/// on error. Returns the amount actually moved.
pub fn transfer(
    source: &mut Solution,
    destination: &mut Solution,
    requested: ReagentUnit,
) -> Result<ReagentUnit, TransferError> {
    if requested == 0 || source.is_empty() {
        return Err(TransferError::Underflow);
    }
    if destination.empty_volume() == 0 {
        return Err(TransferError::Overflow);
    }

    let amount = clamp_transfer(
        requested,
        source.current_volume(),
        destination.empty_volume(),
    );
    let removed = source.split(amount)?;

    if let Err(rejected) = destination.try_add(removed) {
        log::warn!(
            "Destination rejected {}u despite clamping, returning to source",
            rejected.current_volume()
        );
        if let Err(lost) = source.try_add(rejected) {
            log::warn!("Could not return {}u to source", lost.current_volume());
        }
        return Err(TransferError::Rejected { amount });
    }

    log::debug!("Transferred {}u (requested {}u)", amount, requested);
    Ok(amount)
}
