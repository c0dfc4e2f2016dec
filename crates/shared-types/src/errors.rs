//! # Error Types
//!
//! The caller-facing error taxonomy. Every variant carries the ids it talks
//! about and maps onto exactly one [`ErrorKind`], which is what transports
//! (HTTP status codes, RPC error codes) switch on.

use crate::entities::{RequestStatus, SlotStatus};
use crate::ids::{RequestId, SlotId};
use crate::Timestamp;
use thiserror::Error;

/// The five stable failure kinds surfaced to callers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// Malformed or semantically invalid input.
    Validation,
    /// The caller is not the required party for the action.
    Authorization,
    /// A referenced slot or request does not exist.
    NotFound,
    /// A state precondition does not hold.
    Conflict,
    /// The atomic commit failed for infrastructure reasons.
    StorageTransaction,
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::Validation => "VALIDATION",
            ErrorKind::Authorization => "AUTHORIZATION",
            ErrorKind::NotFound => "NOT_FOUND",
            ErrorKind::Conflict => "CONFLICT",
            ErrorKind::StorageTransaction => "STORAGE_TRANSACTION",
        }
    }
}

/// Errors produced by the exchange engine.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum SwapError {
    /// Title empty after trimming.
    #[error("title must not be empty")]
    EmptyTitle,

    /// Title longer than the configured limit.
    #[error("title exceeds {max} characters")]
    TitleTooLong { max: usize },

    /// Slot bounds inverted or zero-length.
    #[error("end time must be after start time")]
    InvalidTimeRange { start: Timestamp, end: Timestamp },

    /// Both sides of the proposed pair belong to the requester.
    #[error("cannot exchange with your own slot")]
    SelfExchange,

    /// Caller is not the owner of the slot being acted on.
    #[error("you do not own slot {slot}")]
    NotSlotOwner { slot: SlotId },

    /// Requester offered a slot that is not theirs.
    #[error("you do not own the offered slot")]
    OfferedNotOwned { slot: SlotId },

    /// Responder is not the recipient of the request.
    #[error("you are not the recipient of request {request}")]
    NotRecipient { request: RequestId },

    /// Canceller is not the requester.
    #[error("only the requester may cancel request {request}")]
    NotRequester { request: RequestId },

    /// Reader is neither requester nor recipient.
    #[error("you are not a party to request {request}")]
    NotParticipant { request: RequestId },

    /// Slot id did not resolve (or is not visible to the caller).
    #[error("slot {slot} not found")]
    SlotNotFound { slot: SlotId },

    /// Request id did not resolve.
    #[error("exchange request {request} not found")]
    RequestNotFound { request: RequestId },

    /// Slot must be SWAPPABLE for the attempted transition.
    #[error("slot {slot} is {status}, not SWAPPABLE")]
    SlotNotSwappable { slot: SlotId, status: SlotStatus },

    /// Slot must be SWAP_PENDING for the attempted transition.
    #[error("slot {slot} is {status}, not SWAP_PENDING")]
    SlotNotPending { slot: SlotId, status: SlotStatus },

    /// Slot is locked by an in-flight exchange.
    #[error("slot {slot} has a pending exchange")]
    SlotPendingExchange { slot: SlotId },

    /// A PENDING request already exists for this unordered slot pair.
    #[error("an exchange request is already pending for this slot pair")]
    DuplicateRequest { offered: SlotId, requested: SlotId },

    /// Request already reached a terminal status.
    #[error("request {request} has already been processed ({status})")]
    AlreadyProcessed {
        request: RequestId,
        status: RequestStatus,
    },

    /// Optimistic commit kept losing to concurrent writers.
    #[error("commit contention persisted after {attempts} attempts")]
    StorageContention { attempts: u32 },

    /// The storage backend failed mid-transaction; nothing was applied.
    #[error("storage transaction failed: {0}")]
    StorageFailure(String),
}

impl SwapError {
    /// The stable kind transports switch on.
    pub fn kind(&self) -> ErrorKind {
        match self {
            SwapError::EmptyTitle
            | SwapError::TitleTooLong { .. }
            | SwapError::InvalidTimeRange { .. }
            | SwapError::SelfExchange => ErrorKind::Validation,

            SwapError::NotSlotOwner { .. }
            | SwapError::OfferedNotOwned { .. }
            | SwapError::NotRecipient { .. }
            | SwapError::NotRequester { .. }
            | SwapError::NotParticipant { .. } => ErrorKind::Authorization,

            SwapError::SlotNotFound { .. } | SwapError::RequestNotFound { .. } => {
                ErrorKind::NotFound
            }

            SwapError::SlotNotSwappable { .. }
            | SwapError::SlotNotPending { .. }
            | SwapError::SlotPendingExchange { .. }
            | SwapError::DuplicateRequest { .. }
            | SwapError::AlreadyProcessed { .. } => ErrorKind::Conflict,

            SwapError::StorageContention { .. } | SwapError::StorageFailure(_) => {
                ErrorKind::StorageTransaction
            }
        }
    }

    /// Whether the whole operation may be transparently retried. True only
    /// for storage-transaction failures, which are idempotent to retry
    /// because no partial state was ever visible.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::StorageTransaction
    }
}
