//! Test support shared by this crate's unit tests and the workspace test
//! suites: a deterministic clock, a fault-injecting storage wrapper, and
//! fixture helpers. Compiled unconditionally so downstream test crates can
//! use it.

use crate::ports::outbound::{
    ExchangeLedger, SlotStore, StorageError, SwapStorage, TimeSource, TransactionContext,
};
use crate::service::SwapService;
use chrono::{Duration, TimeZone, Utc};
use shared_types::{ExchangeRequest, RequestId, Slot, SlotId, Timestamp, UserId};
use std::sync::atomic::{AtomicI64, AtomicU32, Ordering};
use std::sync::Arc;

/// Clock that only moves when told to.
#[derive(Debug)]
pub struct ManualClock {
    millis: AtomicI64,
}

impl ManualClock {
    pub fn at(start: Timestamp) -> Self {
        Self {
            millis: AtomicI64::new(start.timestamp_millis()),
        }
    }

    pub fn advance_millis(&self, delta: i64) {
        self.millis.fetch_add(delta, Ordering::SeqCst);
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::at(Utc.with_ymd_and_hms(2025, 6, 1, 8, 0, 0).unwrap())
    }
}

impl TimeSource for ManualClock {
    fn now(&self) -> Timestamp {
        Utc.timestamp_millis_opt(self.millis.load(Ordering::SeqCst))
            .single()
            .expect("manual clock millis in range")
    }
}

/// Storage wrapper that fails commits on command.
///
/// `contend_next_commits` injects retryable contention (the coordinator's
/// retry loop will re-run the unit of work); `fail_next_commits` injects a
/// fatal backend fault. Either way the inner commit is never reached, so
/// nothing is applied.
#[derive(Debug, Clone)]
pub struct FlakyStorage<S> {
    inner: S,
    contentions: Arc<AtomicU32>,
    faults: Arc<AtomicU32>,
}

impl<S> FlakyStorage<S> {
    pub fn new(inner: S) -> Self {
        Self {
            inner,
            contentions: Arc::new(AtomicU32::new(0)),
            faults: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Arm `n` injected contention failures on upcoming commits.
    pub fn contend_next_commits(&self, n: u32) {
        self.contentions.store(n, Ordering::SeqCst);
    }

    /// Arm `n` injected backend faults on upcoming commits.
    pub fn fail_next_commits(&self, n: u32) {
        self.faults.store(n, Ordering::SeqCst);
    }
}

fn take(counter: &AtomicU32) -> bool {
    counter
        .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
        .is_ok()
}

impl<S: SwapStorage> SwapStorage for FlakyStorage<S> {
    type Tx = FlakyTransaction<S::Tx>;

    fn begin(&self) -> Result<Self::Tx, StorageError> {
        Ok(FlakyTransaction {
            inner: self.inner.begin()?,
            contentions: Arc::clone(&self.contentions),
            faults: Arc::clone(&self.faults),
        })
    }
}

pub struct FlakyTransaction<T> {
    inner: T,
    contentions: Arc<AtomicU32>,
    faults: Arc<AtomicU32>,
}

impl<T: TransactionContext> SlotStore for FlakyTransaction<T> {
    fn slot(&self, id: SlotId) -> Option<Slot> {
        self.inner.slot(id)
    }

    fn all_slots(&self) -> Vec<Slot> {
        self.inner.all_slots()
    }

    fn put_slot(&mut self, slot: Slot) {
        self.inner.put_slot(slot);
    }

    fn remove_slot(&mut self, id: SlotId) {
        self.inner.remove_slot(id);
    }
}

impl<T: TransactionContext> ExchangeLedger for FlakyTransaction<T> {
    fn request(&self, id: RequestId) -> Option<ExchangeRequest> {
        self.inner.request(id)
    }

    fn all_requests(&self) -> Vec<ExchangeRequest> {
        self.inner.all_requests()
    }

    fn pending_for_pair(&self, a: SlotId, b: SlotId) -> Option<ExchangeRequest> {
        self.inner.pending_for_pair(a, b)
    }

    fn put_request(&mut self, request: ExchangeRequest) {
        self.inner.put_request(request);
    }

    fn remove_request(&mut self, id: RequestId) {
        self.inner.remove_request(id);
    }
}

impl<T: TransactionContext> TransactionContext for FlakyTransaction<T> {
    fn commit(self) -> Result<(), StorageError> {
        if take(&self.contentions) {
            return Err(StorageError::Contention {
                record: "injected".to_string(),
            });
        }
        if take(&self.faults) {
            return Err(StorageError::Backend("injected commit fault".to_string()));
        }
        self.inner.commit()
    }
}

/// Create a one-hour slot for `owner` through the service and flip it to
/// `Swappable`.
pub fn swappable_slot<S, C>(
    service: &SwapService<S, C>,
    owner: UserId,
    title: &str,
    hour: u32,
) -> Slot
where
    S: SwapStorage,
    C: TimeSource,
{
    let start = Utc
        .with_ymd_and_hms(2025, 6, 2, hour, 0, 0)
        .single()
        .expect("fixture hour in range");
    let end = start + Duration::hours(1);
    let slot = service
        .create_slot(owner, title.to_string(), start, end)
        .expect("fixture slot is valid");
    service
        .toggle_swappable(owner, slot.id)
        .expect("fresh slot toggles")
}

/// Write records straight into storage, bypassing the protocol. For
/// constructing states the public API refuses to produce.
pub fn seed_state<S: SwapStorage>(storage: &S, slots: &[Slot], requests: &[ExchangeRequest]) {
    let mut tx = storage.begin().expect("begin seed transaction");
    for slot in slots {
        tx.put_slot(slot.clone());
    }
    for request in requests {
        tx.put_request(request.clone());
    }
    tx.commit().expect("seed commit");
}
