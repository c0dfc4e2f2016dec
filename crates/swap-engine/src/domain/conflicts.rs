//! # Conflict Guard
//!
//! Duplicate detection for exchange requests. Two requests conflict when they
//! reference the same two slots while both are `Pending`, regardless of which
//! side offered which slot: `(A, B)` and `(B, A)` are the same pair.
//!
//! The guard is checked by the coordinator before inserting a request, and
//! the same pair key backs the uniqueness index the storage backend enforces
//! at commit time, so two transactions racing on mirrored proposals cannot
//! both land.

use shared_types::{ExchangeRequest, SlotId};
use std::fmt;

/// Order-insensitive identity of a slot pair.
///
/// Construction normalizes the two ids so that `of(a, b) == of(b, a)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SlotPairKey {
    lo: SlotId,
    hi: SlotId,
}

impl SlotPairKey {
    /// Build the normalized key for two slots.
    pub fn of(a: SlotId, b: SlotId) -> Self {
        if a <= b {
            Self { lo: a, hi: b }
        } else {
            Self { lo: b, hi: a }
        }
    }

    /// The pair key of the two slots an exchange request references.
    pub fn for_request(request: &ExchangeRequest) -> Self {
        Self::of(request.offered_slot, request.requested_slot)
    }
}

impl fmt::Display for SlotPairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.lo, self.hi)
    }
}

/// Find a `Pending` request over the same pair as `(offered, requested)`,
/// in either orientation.
///
/// Resolved requests never block a new proposal; only a live negotiation
/// reserves the pair.
pub fn duplicate_pending<'a, I>(
    candidates: I,
    offered: SlotId,
    requested: SlotId,
) -> Option<&'a ExchangeRequest>
where
    I: IntoIterator<Item = &'a ExchangeRequest>,
{
    let key = SlotPairKey::of(offered, requested);
    candidates
        .into_iter()
        .find(|r| r.status.is_pending() && SlotPairKey::for_request(r) == key)
}
