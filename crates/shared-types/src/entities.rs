//! # Domain Entities
//!
//! The two record families the exchange engine operates on, plus the view
//! types returned by the read-side queries.
//!
//! Both entities own their status state machine: every transition is a
//! method that checks its precondition and refuses illegal moves, so a store
//! or coordinator can never drive a record into a state the model forbids.

use crate::errors::SwapError;
use crate::ids::{RequestId, SlotId, UserId};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Instant type used for slot bounds and request creation times.
pub type Timestamp = DateTime<Utc>;

/// Status of a time slot.
///
/// `SwapPending` is entered and left only by the transaction coordinator as
/// part of an exchange; owners can only toggle between `Busy` and
/// `Swappable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SlotStatus {
    Busy,
    Swappable,
    SwapPending,
}

impl SlotStatus {
    pub fn is_busy(&self) -> bool {
        matches!(self, SlotStatus::Busy)
    }

    pub fn is_swappable(&self) -> bool {
        matches!(self, SlotStatus::Swappable)
    }

    pub fn is_swap_pending(&self) -> bool {
        matches!(self, SlotStatus::SwapPending)
    }
}

impl fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SlotStatus::Busy => "BUSY",
            SlotStatus::Swappable => "SWAPPABLE",
            SlotStatus::SwapPending => "SWAP_PENDING",
        };
        f.write_str(s)
    }
}

/// Status of an exchange request.
///
/// `Accepted` and `Rejected` are terminal. A cancelled request is deleted
/// outright rather than kept in a terminal status: cancellation is a
/// withdrawal, not an outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Accepted,
    Rejected,
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }

    pub fn is_terminal(&self) -> bool {
        !self.is_pending()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Accepted => "ACCEPTED",
            RequestStatus::Rejected => "REJECTED",
        };
        f.write_str(s)
    }
}

/// The recipient's verdict on a pending exchange request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SwapDecision {
    Accept,
    Reject,
}

impl fmt::Display for SwapDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SwapDecision::Accept => "ACCEPT",
            SwapDecision::Reject => "REJECT",
        };
        f.write_str(s)
    }
}

/// A time-bounded resource owned by one user, exchangeable with another
/// user's slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Slot {
    pub id: SlotId,
    pub title: String,
    pub start: Timestamp,
    pub end: Timestamp,
    pub owner: UserId,
    pub status: SlotStatus,
}

impl Slot {
    /// Create a slot in `Busy` with a fresh id.
    ///
    /// The title is trimmed and must be non-empty; `end` must be strictly
    /// after `start`. Both are enforced here so an invalid slot never
    /// reaches a store.
    pub fn new(
        owner: UserId,
        title: impl Into<String>,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Self, SwapError> {
        let title = normalize_title(title.into())?;
        validate_time_range(start, end)?;
        Ok(Self {
            id: SlotId::new(),
            title,
            start,
            end,
            owner,
            status: SlotStatus::Busy,
        })
    }

    /// Owner-driven toggle between `Busy` and `Swappable`.
    ///
    /// Fails with an authorization error when `caller` is not the owner and
    /// with a conflict error while an exchange is pending. Either failure
    /// leaves the slot untouched.
    pub fn toggle(&mut self, caller: UserId) -> Result<(), SwapError> {
        if caller != self.owner {
            return Err(SwapError::NotSlotOwner { slot: self.id });
        }
        match self.status {
            SlotStatus::Busy => {
                self.status = SlotStatus::Swappable;
                Ok(())
            }
            SlotStatus::Swappable => {
                self.status = SlotStatus::Busy;
                Ok(())
            }
            SlotStatus::SwapPending => Err(SwapError::SlotPendingExchange { slot: self.id }),
        }
    }

    /// Coordinator-only transition into `SwapPending`.
    ///
    /// The slot must currently be `Swappable`; a slot committed elsewhere
    /// cannot be pulled into a second exchange.
    pub fn enter_pending(&mut self) -> Result<(), SwapError> {
        if !self.status.is_swappable() {
            return Err(SwapError::SlotNotSwappable {
                slot: self.id,
                status: self.status,
            });
        }
        self.status = SlotStatus::SwapPending;
        Ok(())
    }

    /// Coordinator-only transition out of `SwapPending`.
    ///
    /// `target` is `Busy` after an accepted exchange and `Swappable` after a
    /// rejection or cancellation.
    pub fn exit_pending(&mut self, target: SlotStatus) -> Result<(), SwapError> {
        debug_assert!(!target.is_swap_pending(), "exit target must leave pending");
        if !self.status.is_swap_pending() {
            return Err(SwapError::SlotNotPending {
                slot: self.id,
                status: self.status,
            });
        }
        self.status = target;
        Ok(())
    }

    /// Apply a partial edit of the non-status fields.
    ///
    /// Refused while an exchange is pending. The merged record must still
    /// satisfy the title and time-range rules; on any failure the slot is
    /// left unchanged.
    pub fn update(
        &mut self,
        title: Option<String>,
        start: Option<Timestamp>,
        end: Option<Timestamp>,
    ) -> Result<(), SwapError> {
        if self.status.is_swap_pending() {
            return Err(SwapError::SlotPendingExchange { slot: self.id });
        }
        let title = match title {
            Some(t) => normalize_title(t)?,
            None => self.title.clone(),
        };
        let start = start.unwrap_or(self.start);
        let end = end.unwrap_or(self.end);
        validate_time_range(start, end)?;
        self.title = title;
        self.start = start;
        self.end = end;
        Ok(())
    }
}

fn normalize_title(raw: String) -> Result<String, SwapError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(SwapError::EmptyTitle);
    }
    Ok(trimmed.to_string())
}

fn validate_time_range(start: Timestamp, end: Timestamp) -> Result<(), SwapError> {
    if end <= start {
        return Err(SwapError::InvalidTimeRange { start, end });
    }
    Ok(())
}

/// A proposal to swap ownership of two specific slots between two users.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRequest {
    pub id: RequestId,
    pub requester: UserId,
    pub recipient: UserId,
    pub offered_slot: SlotId,
    pub requested_slot: SlotId,
    pub status: RequestStatus,
    pub created_at: Timestamp,
}

impl ExchangeRequest {
    /// Create a `Pending` request with a fresh id.
    ///
    /// The caller has already validated that the slots are distinct and
    /// owned by two distinct users; those checks live in the exchange
    /// protocol, not here.
    pub fn new(
        requester: UserId,
        recipient: UserId,
        offered_slot: SlotId,
        requested_slot: SlotId,
        created_at: Timestamp,
    ) -> Self {
        debug_assert_ne!(offered_slot, requested_slot);
        debug_assert_ne!(requester, recipient);
        Self {
            id: RequestId::new(),
            requester,
            recipient,
            offered_slot,
            requested_slot,
            status: RequestStatus::Pending,
            created_at,
        }
    }

    /// Move the request to its terminal status, exactly once.
    pub fn resolve(&mut self, decision: SwapDecision) -> Result<(), SwapError> {
        if !self.status.is_pending() {
            return Err(SwapError::AlreadyProcessed {
                request: self.id,
                status: self.status,
            });
        }
        self.status = match decision {
            SwapDecision::Accept => RequestStatus::Accepted,
            SwapDecision::Reject => RequestStatus::Rejected,
        };
        Ok(())
    }

    /// Whether the given slot is one side of this request.
    pub fn references_slot(&self, slot: SlotId) -> bool {
        self.offered_slot == slot || self.requested_slot == slot
    }

    /// Whether the given user is requester or recipient.
    pub fn involves(&self, user: UserId) -> bool {
        self.requester == user || self.recipient == user
    }
}

/// Incoming and outgoing requests for one user, newest first.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RequestsView {
    pub incoming: Vec<ExchangeRequest>,
    pub outgoing: Vec<ExchangeRequest>,
}

/// Per-status counts over one user's slots.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SlotStats {
    pub total: usize,
    pub busy: usize,
    pub swappable: usize,
    pub swap_pending: usize,
}

/// Per-status counts over the requests a user participates in.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SwapStats {
    pub total: usize,
    pub pending: usize,
    pub accepted: usize,
    pub rejected: usize,
}

/// Result of a `respond` call: the resolved request plus both slots as they
/// stand after the commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeOutcome {
    pub request: ExchangeRequest,
    pub offered_slot: Slot,
    pub requested_slot: Slot,
}
