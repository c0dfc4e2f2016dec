//! # Inbound Ports
//!
//! The caller-facing API of the exchange engine. Transport adapters (the
//! HTTP gateway, test harnesses) depend on this trait rather than on the
//! service type, so the engine behind it can be swapped out.

use serde::{Deserialize, Serialize};
use shared_types::{
    ExchangeOutcome, ExchangeRequest, RequestId, RequestsView, Slot, SlotId, SlotStats,
    SwapDecision, SwapError, SwapStats, Timestamp, UserId,
};

/// Partial edit of a slot's non-status fields. `None` keeps the current
/// value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotPatch {
    pub title: Option<String>,
    pub start: Option<Timestamp>,
    pub end: Option<Timestamp>,
}

/// Exchange engine API.
///
/// Every method is one atomic unit of work: it either commits completely or
/// leaves the store untouched and reports a single error. Identity is always
/// the first argument; the engine trusts the transport layer to have
/// authenticated it.
pub trait SwapApi: Send + Sync {
    // Exchange protocol

    /// Propose swapping `offered` (owned by `requester`) for `requested`.
    ///
    /// Both slots move to `SwapPending` and a `Pending` request addressed to
    /// the owner of `requested` is recorded, in one commit.
    fn propose(
        &self,
        requester: UserId,
        offered: SlotId,
        requested: SlotId,
    ) -> Result<ExchangeRequest, SwapError>;

    /// Accept or reject a pending request addressed to `responder`.
    fn respond(
        &self,
        responder: UserId,
        request: RequestId,
        decision: SwapDecision,
    ) -> Result<ExchangeOutcome, SwapError>;

    /// Withdraw a pending request created by `caller`.
    fn cancel(&self, caller: UserId, request: RequestId) -> Result<(), SwapError>;

    // Slot lifecycle

    /// Create a slot owned by `owner`, starting out `Busy`.
    fn create_slot(
        &self,
        owner: UserId,
        title: String,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Slot, SwapError>;

    /// Fetch one of the caller's slots.
    fn get_slot(&self, caller: UserId, slot: SlotId) -> Result<Slot, SwapError>;

    /// Edit title or bounds of one of the caller's slots.
    fn update_slot(&self, caller: UserId, slot: SlotId, patch: SlotPatch)
        -> Result<Slot, SwapError>;

    /// Remove one of the caller's slots.
    fn delete_slot(&self, caller: UserId, slot: SlotId) -> Result<(), SwapError>;

    /// Flip one of the caller's slots between `Busy` and `Swappable`.
    fn toggle_swappable(&self, caller: UserId, slot: SlotId) -> Result<Slot, SwapError>;

    // Read side

    /// The caller's slots, earliest start first.
    fn list_slots(&self, caller: UserId) -> Result<Vec<Slot>, SwapError>;

    /// Other users' `Swappable` slots, the marketplace view.
    fn list_swappable(&self, caller: UserId) -> Result<Vec<Slot>, SwapError>;

    /// Requests involving `user`, split by direction, newest first.
    fn list_requests(&self, user: UserId) -> Result<RequestsView, SwapError>;

    /// Fetch one request; only its two participants may see it.
    fn get_request(&self, caller: UserId, request: RequestId)
        -> Result<ExchangeRequest, SwapError>;

    /// Per-status counts over the caller's slots.
    fn slot_stats(&self, user: UserId) -> Result<SlotStats, SwapError>;

    /// Per-status counts over the requests the user participates in.
    fn swap_stats(&self, user: UserId) -> Result<SwapStats, SwapError>;
}
