//! Read-side queries. Each runs against a single storage snapshot, so one
//! listing never mixes records from two generations of the store.

use super::SwapService;
use crate::ports::outbound::{ExchangeLedger, SlotStore, SwapStorage, TimeSource};
use shared_types::{
    ExchangeRequest, RequestId, RequestStatus, RequestsView, Slot, SlotStats, SlotStatus,
    SwapError, SwapStats, UserId,
};

impl<S, C> SwapService<S, C>
where
    S: SwapStorage,
    C: TimeSource,
{
    /// The caller's slots, earliest start first.
    pub fn list_slots(&self, caller: UserId) -> Result<Vec<Slot>, SwapError> {
        let tx = self.begin()?;
        let mut slots: Vec<Slot> = tx
            .all_slots()
            .into_iter()
            .filter(|slot| slot.owner == caller)
            .collect();
        sort_by_start(&mut slots);
        Ok(slots)
    }

    /// Other users' `Swappable` slots: what the caller can bid for.
    pub fn list_swappable(&self, caller: UserId) -> Result<Vec<Slot>, SwapError> {
        let tx = self.begin()?;
        let mut slots: Vec<Slot> = tx
            .all_slots()
            .into_iter()
            .filter(|slot| slot.status.is_swappable() && slot.owner != caller)
            .collect();
        sort_by_start(&mut slots);
        Ok(slots)
    }

    /// Requests involving `user`, split by direction, newest first.
    pub fn list_requests(&self, user: UserId) -> Result<RequestsView, SwapError> {
        let tx = self.begin()?;
        let mut incoming = Vec::new();
        let mut outgoing = Vec::new();
        for request in tx.all_requests() {
            if request.recipient == user {
                incoming.push(request);
            } else if request.requester == user {
                outgoing.push(request);
            }
        }
        sort_newest_first(&mut incoming);
        sort_newest_first(&mut outgoing);
        Ok(RequestsView { incoming, outgoing })
    }

    /// Fetch one request; only its two participants may see it.
    pub fn get_request(
        &self,
        caller: UserId,
        request_id: RequestId,
    ) -> Result<ExchangeRequest, SwapError> {
        let tx = self.begin()?;
        let request = tx.request(request_id).ok_or(SwapError::RequestNotFound {
            request: request_id,
        })?;
        if !request.involves(caller) {
            return Err(SwapError::NotParticipant {
                request: request_id,
            });
        }
        Ok(request)
    }

    /// Per-status counts over the caller's slots.
    pub fn slot_stats(&self, user: UserId) -> Result<SlotStats, SwapError> {
        let tx = self.begin()?;
        let mut stats = SlotStats::default();
        for slot in tx.all_slots() {
            if slot.owner != user {
                continue;
            }
            stats.total += 1;
            match slot.status {
                SlotStatus::Busy => stats.busy += 1,
                SlotStatus::Swappable => stats.swappable += 1,
                SlotStatus::SwapPending => stats.swap_pending += 1,
            }
        }
        Ok(stats)
    }

    /// Per-status counts over the requests the user participates in.
    pub fn swap_stats(&self, user: UserId) -> Result<SwapStats, SwapError> {
        let tx = self.begin()?;
        let mut stats = SwapStats::default();
        for request in tx.all_requests() {
            if !request.involves(user) {
                continue;
            }
            stats.total += 1;
            match request.status {
                RequestStatus::Pending => stats.pending += 1,
                RequestStatus::Accepted => stats.accepted += 1,
                RequestStatus::Rejected => stats.rejected += 1,
            }
        }
        Ok(stats)
    }
}

fn sort_by_start(slots: &mut [Slot]) {
    slots.sort_by(|a, b| a.start.cmp(&b.start).then_with(|| a.id.cmp(&b.id)));
}

fn sort_newest_first(requests: &mut [ExchangeRequest]) {
    requests.sort_by(|a, b| {
        b.created_at
            .cmp(&a.created_at)
            .then_with(|| a.id.cmp(&b.id))
    });
}
