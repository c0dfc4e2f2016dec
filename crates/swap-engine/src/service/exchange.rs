//! The propose / respond / cancel protocol.

use super::SwapService;
use crate::ports::outbound::{ExchangeLedger, SlotStore, SwapStorage, TimeSource};
use shared_types::{
    ExchangeOutcome, ExchangeRequest, RequestId, SlotId, SlotStatus, SwapDecision, SwapError,
    UserId,
};

impl<S, C> SwapService<S, C>
where
    S: SwapStorage,
    C: TimeSource,
{
    /// Open a negotiation over two swappable slots.
    ///
    /// Preconditions run in a fixed order so callers get stable errors:
    /// both slots exist, the requester owns the offered slot, the requested
    /// slot belongs to someone else, both sides are `Swappable`, and no
    /// pending request already covers the pair in either orientation. On
    /// success both slots move to `SwapPending` and a `Pending` request is
    /// recorded, all in one commit.
    pub fn propose(
        &self,
        requester: UserId,
        offered: SlotId,
        requested: SlotId,
    ) -> Result<ExchangeRequest, SwapError> {
        let request = self.execute("propose", |tx| {
            let mut offered_slot = tx
                .slot(offered)
                .ok_or(SwapError::SlotNotFound { slot: offered })?;
            let mut requested_slot = tx
                .slot(requested)
                .ok_or(SwapError::SlotNotFound { slot: requested })?;

            if offered_slot.owner != requester {
                return Err(SwapError::OfferedNotOwned { slot: offered });
            }
            if requested_slot.owner == requester {
                return Err(SwapError::SelfExchange);
            }
            if !offered_slot.status.is_swappable() {
                return Err(SwapError::SlotNotSwappable {
                    slot: offered,
                    status: offered_slot.status,
                });
            }
            if !requested_slot.status.is_swappable() {
                return Err(SwapError::SlotNotSwappable {
                    slot: requested,
                    status: requested_slot.status,
                });
            }
            if tx.pending_for_pair(offered, requested).is_some() {
                return Err(SwapError::DuplicateRequest {
                    offered,
                    requested,
                });
            }

            offered_slot.enter_pending()?;
            requested_slot.enter_pending()?;
            let request = ExchangeRequest::new(
                requester,
                requested_slot.owner,
                offered,
                requested,
                self.clock.now(),
            );

            tx.put_slot(offered_slot);
            tx.put_slot(requested_slot);
            tx.put_request(request.clone());
            Ok(request)
        })?;

        tracing::info!(
            request = %request.id,
            requester = %request.requester,
            recipient = %request.recipient,
            offered = %offered,
            requested = %requested,
            "exchange proposed"
        );
        Ok(request)
    }

    /// Resolve a pending request addressed to `responder`.
    ///
    /// The request must exist and still be `Pending`, and only the recipient
    /// may answer. On accept the two slots trade owners and both land in
    /// `Busy`; on reject owners stay put and both land back in `Swappable`.
    /// The request reaches its terminal status in the same commit as the
    /// slot writes.
    pub fn respond(
        &self,
        responder: UserId,
        request_id: RequestId,
        decision: SwapDecision,
    ) -> Result<ExchangeOutcome, SwapError> {
        let outcome = self.execute("respond", |tx| {
            let mut request = tx.request(request_id).ok_or(SwapError::RequestNotFound {
                request: request_id,
            })?;
            if !request.status.is_pending() {
                return Err(SwapError::AlreadyProcessed {
                    request: request_id,
                    status: request.status,
                });
            }
            if request.recipient != responder {
                return Err(SwapError::NotRecipient {
                    request: request_id,
                });
            }

            let mut offered_slot = tx.slot(request.offered_slot).ok_or(SwapError::SlotNotFound {
                slot: request.offered_slot,
            })?;
            let mut requested_slot =
                tx.slot(request.requested_slot).ok_or(SwapError::SlotNotFound {
                    slot: request.requested_slot,
                })?;

            let landing = match decision {
                SwapDecision::Accept => SlotStatus::Busy,
                SwapDecision::Reject => SlotStatus::Swappable,
            };
            offered_slot.exit_pending(landing)?;
            requested_slot.exit_pending(landing)?;
            if decision == SwapDecision::Accept {
                std::mem::swap(&mut offered_slot.owner, &mut requested_slot.owner);
            }
            request.resolve(decision)?;

            tx.put_slot(offered_slot.clone());
            tx.put_slot(requested_slot.clone());
            tx.put_request(request.clone());
            Ok(ExchangeOutcome {
                request,
                offered_slot,
                requested_slot,
            })
        })?;

        tracing::info!(
            request = %outcome.request.id,
            status = %outcome.request.status,
            "exchange resolved"
        );
        Ok(outcome)
    }

    /// Withdraw a pending request.
    ///
    /// Only the requester may cancel, and only while the request is still
    /// `Pending`. Referenced slots are released back to `Swappable`; a slot
    /// that no longer exists is skipped rather than failing the withdrawal.
    /// The request record is removed outright.
    pub fn cancel(&self, caller: UserId, request_id: RequestId) -> Result<(), SwapError> {
        self.execute("cancel", |tx| {
            let request = tx.request(request_id).ok_or(SwapError::RequestNotFound {
                request: request_id,
            })?;
            if request.requester != caller {
                return Err(SwapError::NotRequester {
                    request: request_id,
                });
            }
            if !request.status.is_pending() {
                return Err(SwapError::AlreadyProcessed {
                    request: request_id,
                    status: request.status,
                });
            }

            for slot_id in [request.offered_slot, request.requested_slot] {
                if let Some(mut slot) = tx.slot(slot_id) {
                    slot.exit_pending(SlotStatus::Swappable)?;
                    tx.put_slot(slot);
                }
            }
            tx.remove_request(request_id);
            Ok(())
        })?;

        tracing::info!(request = %request_id, "exchange cancelled");
        Ok(())
    }
}
