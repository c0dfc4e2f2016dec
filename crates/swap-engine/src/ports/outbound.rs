//! # Outbound Ports
//!
//! What the engine requires from the outside world: transactional storage
//! for the two record families, and a clock.
//!
//! Storage hands out one [`TransactionContext`] per unit of work. Reads
//! observe the consistent snapshot taken when the context was opened (plus
//! the context's own staged writes), writes are staged inside the context,
//! and `commit` applies every staged write atomically or none at all.
//! Dropping a context without committing abandons it.

use chrono::Utc;
use shared_types::{ExchangeRequest, RequestId, Slot, SlotId, Timestamp};
use std::sync::Arc;
use thiserror::Error;

/// Failures raised by a storage backend.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StorageError {
    /// A record this transaction read was modified by a concurrent commit.
    /// Re-running the unit of work may succeed.
    #[error("commit contention on {record}")]
    Contention { record: String },

    /// A concurrent commit recorded a pending request over the same slot
    /// pair. Re-running lets the conflict guard report the duplicate.
    #[error("pending request already recorded for pair {pair}")]
    PairTaken { pair: String },

    /// The backend itself failed. Nothing was applied.
    #[error("storage backend fault: {0}")]
    Backend(String),
}

impl StorageError {
    /// Whether re-running the whole unit of work may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            StorageError::Contention { .. } | StorageError::PairTaken { .. }
        )
    }
}

/// Slot records within one transaction.
pub trait SlotStore {
    /// Point read of one slot.
    fn slot(&self, id: SlotId) -> Option<Slot>;

    /// Every slot visible to this transaction.
    fn all_slots(&self) -> Vec<Slot>;

    /// Stage an insert or full-record update.
    fn put_slot(&mut self, slot: Slot);

    /// Stage a removal.
    fn remove_slot(&mut self, id: SlotId);
}

/// Exchange-request records within one transaction.
pub trait ExchangeLedger {
    /// Point read of one request.
    fn request(&self, id: RequestId) -> Option<ExchangeRequest>;

    /// Every request visible to this transaction.
    fn all_requests(&self) -> Vec<ExchangeRequest>;

    /// The `Pending` request over `(a, b)` in either orientation, if any.
    fn pending_for_pair(&self, a: SlotId, b: SlotId) -> Option<ExchangeRequest>;

    /// Stage an insert or full-record update.
    fn put_request(&mut self, request: ExchangeRequest);

    /// Stage a removal.
    fn remove_request(&mut self, id: RequestId);
}

/// One unit of work over both record families.
pub trait TransactionContext: SlotStore + ExchangeLedger + Send {
    /// Apply every staged write atomically.
    ///
    /// Fails without applying anything when a record this transaction read
    /// changed underneath it, when a staged pending request collides with
    /// the pair uniqueness index, or when the backend faults.
    fn commit(self) -> Result<(), StorageError>
    where
        Self: Sized;
}

/// Factory for transaction contexts.
pub trait SwapStorage: Send + Sync {
    type Tx: TransactionContext;

    /// Open a unit of work over a consistent snapshot of the store.
    fn begin(&self) -> Result<Self::Tx, StorageError>;
}

/// Clock abstraction, so request timestamps are testable.
pub trait TimeSource: Send + Sync {
    fn now(&self) -> Timestamp;
}

impl<T: TimeSource + ?Sized> TimeSource for Arc<T> {
    fn now(&self) -> Timestamp {
        (**self).now()
    }
}

/// Production clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemTimeSource;

impl TimeSource for SystemTimeSource {
    fn now(&self) -> Timestamp {
        Utc::now()
    }
}
