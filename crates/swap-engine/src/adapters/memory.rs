//! # In-Memory Storage Backend
//!
//! Versioned, copy-on-write storage for slots and exchange requests.
//!
//! The live store is an `Arc<StoreState>` behind a `parking_lot::RwLock`.
//! Opening a transaction clones the `Arc`, giving the transaction an
//! immutable snapshot in O(1). Writes are staged as a list of operations.
//! At commit the backend takes the write lock, validates that every record
//! the transaction point-read still carries the version it observed
//! (optimistic concurrency), enforces the pending-pair uniqueness index,
//! then builds the next generation and swaps it in. A failed validation
//! applies nothing.

use crate::domain::conflicts::{duplicate_pending, SlotPairKey};
use crate::ports::outbound::{
    ExchangeLedger, SlotStore, StorageError, SwapStorage, TransactionContext,
};
use parking_lot::RwLock;
use shared_types::{ExchangeRequest, RequestId, Slot, SlotId};
use std::cell::RefCell;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Monotonic per-record version, bumped on every committed write.
type Version = u64;

#[derive(Debug, Clone)]
struct Versioned<T> {
    record: T,
    version: Version,
}

/// One immutable generation of the store.
#[derive(Debug, Default)]
struct StoreState {
    slots: HashMap<SlotId, Versioned<Slot>>,
    requests: HashMap<RequestId, Versioned<ExchangeRequest>>,
    /// Uniqueness index over `Pending` requests, keyed by normalized pair.
    pending_pairs: HashMap<SlotPairKey, RequestId>,
}

/// Identity of a record in the version-validation read set.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum RecordKey {
    Slot(SlotId),
    Request(RequestId),
}

impl fmt::Display for RecordKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKey::Slot(id) => write!(f, "slot {id}"),
            RecordKey::Request(id) => write!(f, "request {id}"),
        }
    }
}

/// Staged write, applied in staging order at commit.
#[derive(Debug, Clone)]
enum WriteOp {
    PutSlot(Slot),
    RemoveSlot(SlotId),
    PutRequest(ExchangeRequest),
    RemoveRequest(RequestId),
}

#[derive(Debug, Default)]
struct Shared {
    state: RwLock<Arc<StoreState>>,
}

/// The in-memory backend. Cloning is cheap; clones share the same store.
#[derive(Debug, Clone, Default)]
pub struct InMemorySwapStorage {
    shared: Arc<Shared>,
}

impl InMemorySwapStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SwapStorage for InMemorySwapStorage {
    type Tx = MemoryTransaction;

    fn begin(&self) -> Result<MemoryTransaction, StorageError> {
        let snapshot = Arc::clone(&self.shared.state.read());
        Ok(MemoryTransaction {
            shared: Arc::clone(&self.shared),
            snapshot,
            reads: RefCell::new(HashMap::new()),
            writes: Vec::new(),
            staged_slots: HashMap::new(),
            staged_requests: HashMap::new(),
        })
    }
}

/// A unit of work over one snapshot.
///
/// Point reads record the version they observed (or that the record was
/// absent); commit refuses to apply if any of those observations no longer
/// hold. List reads are not version-tracked, which is why the coordinator
/// never bases a write on them alone.
pub struct MemoryTransaction {
    shared: Arc<Shared>,
    snapshot: Arc<StoreState>,
    /// First-observation versions of point reads. `None` = read as absent.
    reads: RefCell<HashMap<RecordKey, Option<Version>>>,
    writes: Vec<WriteOp>,
    /// Overlay so the transaction reads its own writes. `None` marks a
    /// staged removal.
    staged_slots: HashMap<SlotId, Option<Slot>>,
    staged_requests: HashMap<RequestId, Option<ExchangeRequest>>,
}

impl SlotStore for MemoryTransaction {
    fn slot(&self, id: SlotId) -> Option<Slot> {
        if let Some(staged) = self.staged_slots.get(&id) {
            return staged.clone();
        }
        let found = self.snapshot.slots.get(&id);
        self.reads
            .borrow_mut()
            .entry(RecordKey::Slot(id))
            .or_insert_with(|| found.map(|v| v.version));
        found.map(|v| v.record.clone())
    }

    fn all_slots(&self) -> Vec<Slot> {
        let mut out: Vec<Slot> = self
            .snapshot
            .slots
            .values()
            .filter(|v| !self.staged_slots.contains_key(&v.record.id))
            .map(|v| v.record.clone())
            .collect();
        out.extend(self.staged_slots.values().filter_map(Clone::clone));
        out
    }

    fn put_slot(&mut self, slot: Slot) {
        self.staged_slots.insert(slot.id, Some(slot.clone()));
        self.writes.push(WriteOp::PutSlot(slot));
    }

    fn remove_slot(&mut self, id: SlotId) {
        self.staged_slots.insert(id, None);
        self.writes.push(WriteOp::RemoveSlot(id));
    }
}

impl ExchangeLedger for MemoryTransaction {
    fn request(&self, id: RequestId) -> Option<ExchangeRequest> {
        if let Some(staged) = self.staged_requests.get(&id) {
            return staged.clone();
        }
        let found = self.snapshot.requests.get(&id);
        self.reads
            .borrow_mut()
            .entry(RecordKey::Request(id))
            .or_insert_with(|| found.map(|v| v.version));
        found.map(|v| v.record.clone())
    }

    fn all_requests(&self) -> Vec<ExchangeRequest> {
        let mut out: Vec<ExchangeRequest> = self
            .snapshot
            .requests
            .values()
            .filter(|v| !self.staged_requests.contains_key(&v.record.id))
            .map(|v| v.record.clone())
            .collect();
        out.extend(self.staged_requests.values().filter_map(Clone::clone));
        out
    }

    fn pending_for_pair(&self, a: SlotId, b: SlotId) -> Option<ExchangeRequest> {
        let from_snapshot = self
            .snapshot
            .requests
            .values()
            .filter(|v| !self.staged_requests.contains_key(&v.record.id))
            .map(|v| &v.record);
        let from_overlay = self.staged_requests.values().filter_map(Option::as_ref);
        duplicate_pending(from_snapshot.chain(from_overlay), a, b).cloned()
    }

    fn put_request(&mut self, request: ExchangeRequest) {
        self.staged_requests.insert(request.id, Some(request.clone()));
        self.writes.push(WriteOp::PutRequest(request));
    }

    fn remove_request(&mut self, id: RequestId) {
        self.staged_requests.insert(id, None);
        self.writes.push(WriteOp::RemoveRequest(id));
    }
}

impl TransactionContext for MemoryTransaction {
    fn commit(self) -> Result<(), StorageError> {
        if self.writes.is_empty() {
            return Ok(());
        }

        let mut live = self.shared.state.write();

        for (key, observed) in self.reads.borrow().iter() {
            let current = match key {
                RecordKey::Slot(id) => live.slots.get(id).map(|v| v.version),
                RecordKey::Request(id) => live.requests.get(id).map(|v| v.version),
            };
            if current != *observed {
                return Err(StorageError::Contention {
                    record: key.to_string(),
                });
            }
        }

        let mut next = StoreState {
            slots: live.slots.clone(),
            requests: live.requests.clone(),
            pending_pairs: live.pending_pairs.clone(),
        };

        for op in &self.writes {
            match op {
                WriteOp::PutSlot(slot) => {
                    let version = next.slots.get(&slot.id).map_or(1, |v| v.version + 1);
                    next.slots.insert(
                        slot.id,
                        Versioned {
                            record: slot.clone(),
                            version,
                        },
                    );
                }
                WriteOp::RemoveSlot(id) => {
                    next.slots.remove(id);
                }
                WriteOp::PutRequest(request) => {
                    let key = SlotPairKey::for_request(request);
                    if request.status.is_pending() {
                        match next.pending_pairs.get(&key) {
                            Some(holder) if *holder != request.id => {
                                return Err(StorageError::PairTaken {
                                    pair: key.to_string(),
                                });
                            }
                            _ => {
                                next.pending_pairs.insert(key, request.id);
                            }
                        }
                    } else if next.pending_pairs.get(&key) == Some(&request.id) {
                        next.pending_pairs.remove(&key);
                    }
                    let version = next.requests.get(&request.id).map_or(1, |v| v.version + 1);
                    next.requests.insert(
                        request.id,
                        Versioned {
                            record: request.clone(),
                            version,
                        },
                    );
                }
                WriteOp::RemoveRequest(id) => {
                    if let Some(gone) = next.requests.remove(id) {
                        let key = SlotPairKey::for_request(&gone.record);
                        if next.pending_pairs.get(&key) == Some(id) {
                            next.pending_pairs.remove(&key);
                        }
                    }
                }
            }
        }

        *live = Arc::new(next);
        Ok(())
    }
}
