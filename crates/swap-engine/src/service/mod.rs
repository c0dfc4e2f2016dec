//! # Coordinator Service
//!
//! [`SwapService`] drives every API operation as one optimistic transaction:
//! read from a snapshot, validate, stage writes, commit. When a commit loses
//! a race the whole unit of work is re-run from a fresh snapshot, so callers
//! only ever observe fully applied operations or a single error.
//!
//! Split by concern:
//! - `exchange` - the propose / respond / cancel protocol
//! - `slots`    - slot lifecycle and the swappable toggle
//! - `queries`  - read-side lists and stats

mod exchange;
mod queries;
mod slots;

use crate::domain::EngineConfig;
use crate::ports::inbound::{SlotPatch, SwapApi};
use crate::ports::outbound::{SwapStorage, TimeSource, TransactionContext};
use shared_types::{
    ExchangeOutcome, ExchangeRequest, RequestId, RequestsView, Slot, SlotId, SlotStats,
    SwapDecision, SwapError, SwapStats, Timestamp, UserId,
};

/// The transaction coordinator, generic over its storage backend and clock.
pub struct SwapService<S, C>
where
    S: SwapStorage,
    C: TimeSource,
{
    storage: S,
    clock: C,
    config: EngineConfig,
}

impl<S, C> SwapService<S, C>
where
    S: SwapStorage,
    C: TimeSource,
{
    pub fn new(storage: S, clock: C, config: EngineConfig) -> Self {
        Self {
            storage,
            clock,
            config,
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    /// Run one unit of work, re-running it when the commit loses a race.
    ///
    /// Domain errors abort immediately and discard the context. Retryable
    /// storage errors re-run `body` on a fresh snapshot up to the configured
    /// attempt limit; anything else is surfaced as a storage failure.
    fn execute<T, F>(&self, op: &'static str, body: F) -> Result<T, SwapError>
    where
        F: Fn(&mut S::Tx) -> Result<T, SwapError>,
    {
        let limit = self.config.commit_retry_limit.max(1);
        let mut attempt = 1;
        loop {
            let mut tx = self.begin()?;
            let out = body(&mut tx)?;
            match tx.commit() {
                Ok(()) => return Ok(out),
                Err(err) if err.is_retryable() && attempt < limit => {
                    tracing::warn!(op, attempt, %err, "commit lost a race, retrying");
                    attempt += 1;
                }
                Err(err) if err.is_retryable() => {
                    return Err(SwapError::StorageContention { attempts: limit });
                }
                Err(err) => return Err(SwapError::StorageFailure(err.to_string())),
            }
        }
    }

    fn begin(&self) -> Result<S::Tx, SwapError> {
        self.storage
            .begin()
            .map_err(|err| SwapError::StorageFailure(err.to_string()))
    }
}

impl<S, C> SwapApi for SwapService<S, C>
where
    S: SwapStorage,
    C: TimeSource,
{
    fn propose(
        &self,
        requester: UserId,
        offered: SlotId,
        requested: SlotId,
    ) -> Result<ExchangeRequest, SwapError> {
        self.propose(requester, offered, requested)
    }

    fn respond(
        &self,
        responder: UserId,
        request: RequestId,
        decision: SwapDecision,
    ) -> Result<ExchangeOutcome, SwapError> {
        self.respond(responder, request, decision)
    }

    fn cancel(&self, caller: UserId, request: RequestId) -> Result<(), SwapError> {
        self.cancel(caller, request)
    }

    fn create_slot(
        &self,
        owner: UserId,
        title: String,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Slot, SwapError> {
        self.create_slot(owner, title, start, end)
    }

    fn get_slot(&self, caller: UserId, slot: SlotId) -> Result<Slot, SwapError> {
        self.get_slot(caller, slot)
    }

    fn update_slot(
        &self,
        caller: UserId,
        slot: SlotId,
        patch: SlotPatch,
    ) -> Result<Slot, SwapError> {
        self.update_slot(caller, slot, patch)
    }

    fn delete_slot(&self, caller: UserId, slot: SlotId) -> Result<(), SwapError> {
        self.delete_slot(caller, slot)
    }

    fn toggle_swappable(&self, caller: UserId, slot: SlotId) -> Result<Slot, SwapError> {
        self.toggle_swappable(caller, slot)
    }

    fn list_slots(&self, caller: UserId) -> Result<Vec<Slot>, SwapError> {
        self.list_slots(caller)
    }

    fn list_swappable(&self, caller: UserId) -> Result<Vec<Slot>, SwapError> {
        self.list_swappable(caller)
    }

    fn list_requests(&self, user: UserId) -> Result<RequestsView, SwapError> {
        self.list_requests(user)
    }

    fn get_request(
        &self,
        caller: UserId,
        request: RequestId,
    ) -> Result<ExchangeRequest, SwapError> {
        self.get_request(caller, request)
    }

    fn slot_stats(&self, user: UserId) -> Result<SlotStats, SwapError> {
        self.slot_stats(user)
    }

    fn swap_stats(&self, user: UserId) -> Result<SwapStats, SwapError> {
        self.swap_stats(user)
    }
}
