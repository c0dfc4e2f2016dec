//! # Exchange Protocol Choreography
//!
//! End-to-end runs of the swap protocol against the in-memory backend:
//! every path from marketplace discovery through proposal to resolution,
//! checked record by record. Time is driven by a manual clock so request
//! ordering is deterministic.

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use shared_types::{ErrorKind, RequestStatus, SlotStatus, SwapDecision, SwapError, UserId};
    use swap_engine::test_utils::{swappable_slot, ManualClock};
    use swap_engine::{EngineConfig, InMemorySwapStorage, SwapService};

    type Engine = SwapService<InMemorySwapStorage, Arc<ManualClock>>;

    fn engine() -> (Engine, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let service = SwapService::new(
            InMemorySwapStorage::new(),
            Arc::clone(&clock),
            EngineConfig::for_testing(),
        );
        (service, clock)
    }

    // =========================================================================
    // HAPPY PATHS
    // =========================================================================

    #[test]
    fn accept_flow_swaps_ownership_and_unlocks_both_slots() {
        let (engine, _clock) = engine();
        let alice = UserId::new();
        let bob = UserId::new();

        let alice_slot = swappable_slot(&engine, alice, "deep work", 9);
        let bob_slot = swappable_slot(&engine, bob, "code review", 14);

        // Bob discovers Alice's slot in the marketplace and proposes.
        let market = engine.list_swappable(bob).unwrap();
        assert_eq!(market.len(), 1);
        assert_eq!(market[0].id, alice_slot.id);

        let request = engine.propose(bob, bob_slot.id, alice_slot.id).unwrap();
        assert_eq!(request.status, RequestStatus::Pending);
        assert_eq!(request.requester, bob);
        assert_eq!(request.recipient, alice);

        // Both sides are locked while the request is open.
        assert_eq!(
            engine.get_slot(bob, bob_slot.id).unwrap().status,
            SlotStatus::SwapPending
        );
        assert_eq!(
            engine.get_slot(alice, alice_slot.id).unwrap().status,
            SlotStatus::SwapPending
        );
        assert!(engine.list_swappable(bob).unwrap().is_empty());

        let outcome = engine
            .respond(alice, request.id, SwapDecision::Accept)
            .unwrap();
        assert_eq!(outcome.request.status, RequestStatus::Accepted);

        // Ownership crossed over; both slots land BUSY.
        assert_eq!(outcome.offered_slot.owner, alice);
        assert_eq!(outcome.requested_slot.owner, bob);
        assert_eq!(outcome.offered_slot.status, SlotStatus::Busy);
        assert_eq!(outcome.requested_slot.status, SlotStatus::Busy);

        // The owner-scoped reads agree with the outcome.
        assert_eq!(engine.get_slot(bob, alice_slot.id).unwrap().owner, bob);
        assert_eq!(engine.get_slot(alice, bob_slot.id).unwrap().owner, alice);
        assert_eq!(
            engine.get_slot(bob, bob_slot.id).unwrap_err(),
            SwapError::SlotNotFound { slot: bob_slot.id }
        );
    }

    #[test]
    fn reject_flow_reopens_slots_without_moving_ownership() {
        let (engine, _clock) = engine();
        let alice = UserId::new();
        let bob = UserId::new();

        let alice_slot = swappable_slot(&engine, alice, "gym", 7);
        let bob_slot = swappable_slot(&engine, bob, "standup", 10);

        let request = engine.propose(bob, bob_slot.id, alice_slot.id).unwrap();
        let outcome = engine
            .respond(alice, request.id, SwapDecision::Reject)
            .unwrap();

        assert_eq!(outcome.request.status, RequestStatus::Rejected);
        assert_eq!(outcome.offered_slot.owner, bob);
        assert_eq!(outcome.requested_slot.owner, alice);
        assert_eq!(outcome.offered_slot.status, SlotStatus::Swappable);
        assert_eq!(outcome.requested_slot.status, SlotStatus::Swappable);

        // A rejected pair can be proposed again.
        let retry = engine.propose(bob, bob_slot.id, alice_slot.id).unwrap();
        assert_eq!(retry.status, RequestStatus::Pending);
    }

    #[test]
    fn cancel_flow_withdraws_the_request_entirely() {
        let (engine, _clock) = engine();
        let alice = UserId::new();
        let bob = UserId::new();

        let alice_slot = swappable_slot(&engine, alice, "lunch", 12);
        let bob_slot = swappable_slot(&engine, bob, "retro", 16);

        let request = engine.propose(bob, bob_slot.id, alice_slot.id).unwrap();
        engine.cancel(bob, request.id).unwrap();

        // Withdrawal deletes the record instead of parking it in a terminal
        // status.
        assert_eq!(
            engine.get_request(bob, request.id).unwrap_err(),
            SwapError::RequestNotFound {
                request: request.id
            }
        );
        let view = engine.list_requests(alice).unwrap();
        assert!(view.incoming.is_empty());

        assert_eq!(
            engine.get_slot(bob, bob_slot.id).unwrap().status,
            SlotStatus::Swappable
        );
        assert_eq!(
            engine.get_slot(alice, alice_slot.id).unwrap().status,
            SlotStatus::Swappable
        );
    }

    #[test]
    fn swapped_slots_can_flow_onward_in_a_chain() {
        let (engine, _clock) = engine();
        let alice = UserId::new();
        let bob = UserId::new();
        let carol = UserId::new();

        let alice_slot = swappable_slot(&engine, alice, "morning", 8);
        let bob_slot = swappable_slot(&engine, bob, "midday", 12);

        // Hop one: Bob takes over Alice's slot.
        let first = engine.propose(bob, bob_slot.id, alice_slot.id).unwrap();
        engine.respond(alice, first.id, SwapDecision::Accept).unwrap();

        // Hop two: Bob re-lists the slot he won and trades it to Carol.
        engine.toggle_swappable(bob, alice_slot.id).unwrap();
        let carol_slot = swappable_slot(&engine, carol, "evening", 18);

        let second = engine.propose(carol, carol_slot.id, alice_slot.id).unwrap();
        let outcome = engine
            .respond(bob, second.id, SwapDecision::Accept)
            .unwrap();

        assert_eq!(outcome.requested_slot.owner, carol);
        assert_eq!(engine.get_slot(carol, alice_slot.id).unwrap().owner, carol);
        assert_eq!(engine.get_slot(bob, carol_slot.id).unwrap().owner, bob);
    }

    // =========================================================================
    // LOCKING AND EXCLUSIVITY
    // =========================================================================

    #[test]
    fn pending_slots_refuse_every_mutation() {
        let (engine, _clock) = engine();
        let alice = UserId::new();
        let bob = UserId::new();

        let alice_slot = swappable_slot(&engine, alice, "locked", 9);
        let bob_slot = swappable_slot(&engine, bob, "also locked", 11);
        engine.propose(bob, bob_slot.id, alice_slot.id).unwrap();

        let patch = swap_engine::SlotPatch {
            title: Some("renamed".to_string()),
            ..Default::default()
        };
        assert_eq!(
            engine.update_slot(alice, alice_slot.id, patch).unwrap_err(),
            SwapError::SlotPendingExchange {
                slot: alice_slot.id
            }
        );
        assert_eq!(
            engine.delete_slot(alice, alice_slot.id).unwrap_err(),
            SwapError::SlotPendingExchange {
                slot: alice_slot.id
            }
        );
        assert_eq!(
            engine.toggle_swappable(alice, alice_slot.id).unwrap_err(),
            SwapError::SlotPendingExchange {
                slot: alice_slot.id
            }
        );

        // Third parties cannot pull a locked slot into another exchange.
        let carol = UserId::new();
        let carol_slot = swappable_slot(&engine, carol, "outsider", 15);
        assert_eq!(
            engine
                .propose(carol, carol_slot.id, alice_slot.id)
                .unwrap_err(),
            SwapError::SlotNotSwappable {
                slot: alice_slot.id,
                status: SlotStatus::SwapPending,
            }
        );
    }

    #[test]
    fn one_slot_joins_at_most_one_open_exchange() {
        let (engine, _clock) = engine();
        let alice = UserId::new();
        let bob = UserId::new();
        let carol = UserId::new();

        let offered = swappable_slot(&engine, alice, "single use", 9);
        let first_target = swappable_slot(&engine, bob, "target one", 10);
        let second_target = swappable_slot(&engine, carol, "target two", 11);

        engine.propose(alice, offered.id, first_target.id).unwrap();

        // The offered slot is committed; a second proposal from its owner
        // must fail even against a completely different counterparty.
        let err = engine
            .propose(alice, offered.id, second_target.id)
            .unwrap_err();
        assert_eq!(
            err,
            SwapError::SlotNotSwappable {
                slot: offered.id,
                status: SlotStatus::SwapPending,
            }
        );
    }

    // =========================================================================
    // VIEWS AND STATISTICS
    // =========================================================================

    #[test]
    fn request_views_split_by_direction_newest_first() {
        let (engine, clock) = engine();
        let alice = UserId::new();
        let bob = UserId::new();
        let carol = UserId::new();

        let alice_first = swappable_slot(&engine, alice, "a1", 8);
        let alice_second = swappable_slot(&engine, alice, "a2", 9);
        let bob_slot = swappable_slot(&engine, bob, "b1", 10);
        let carol_slot = swappable_slot(&engine, carol, "c1", 11);

        let older = engine.propose(alice, alice_first.id, bob_slot.id).unwrap();
        clock.advance_millis(1_000);
        let newer = engine
            .propose(alice, alice_second.id, carol_slot.id)
            .unwrap();
        clock.advance_millis(1_000);
        let incoming = engine.propose(bob, bob_slot.id, alice_first.id);
        // Bob's mirrored proposal is refused outright: that pair is taken.
        assert_eq!(incoming.unwrap_err().kind(), ErrorKind::Conflict);

        let view = engine.list_requests(alice).unwrap();
        assert_eq!(view.outgoing.len(), 2);
        assert_eq!(view.outgoing[0].id, newer.id);
        assert_eq!(view.outgoing[1].id, older.id);
        assert!(view.incoming.is_empty());

        let bob_view = engine.list_requests(bob).unwrap();
        assert_eq!(bob_view.incoming.len(), 1);
        assert_eq!(bob_view.incoming[0].id, older.id);
        assert!(bob_view.outgoing.is_empty());
    }

    #[test]
    fn stats_track_protocol_outcomes() {
        let (engine, _clock) = engine();
        let alice = UserId::new();
        let bob = UserId::new();

        let a1 = swappable_slot(&engine, alice, "a1", 8);
        let a2 = swappable_slot(&engine, alice, "a2", 9);
        let a3 = swappable_slot(&engine, alice, "a3", 10);
        let b1 = swappable_slot(&engine, bob, "b1", 8);
        let b2 = swappable_slot(&engine, bob, "b2", 9);
        let b3 = swappable_slot(&engine, bob, "b3", 10);

        let accepted = engine.propose(alice, a1.id, b1.id).unwrap();
        engine
            .respond(bob, accepted.id, SwapDecision::Accept)
            .unwrap();

        let rejected = engine.propose(alice, a2.id, b2.id).unwrap();
        engine
            .respond(bob, rejected.id, SwapDecision::Reject)
            .unwrap();

        engine.propose(alice, a3.id, b3.id).unwrap();

        for user in [alice, bob] {
            let stats = engine.swap_stats(user).unwrap();
            assert_eq!(stats.total, 3);
            assert_eq!(stats.pending, 1);
            assert_eq!(stats.accepted, 1);
            assert_eq!(stats.rejected, 1);
        }

        // Slot counts per owner: the accepted pair traded BUSY slots, the
        // rejected pair reopened, the pending pair stays locked.
        let alice_slots = engine.slot_stats(alice).unwrap();
        assert_eq!(alice_slots.total, 3);
        assert_eq!(alice_slots.busy, 1);
        assert_eq!(alice_slots.swappable, 1);
        assert_eq!(alice_slots.swap_pending, 1);
    }

    #[test]
    fn requests_are_visible_to_participants_only() {
        let (engine, _clock) = engine();
        let alice = UserId::new();
        let bob = UserId::new();
        let stranger = UserId::new();

        let alice_slot = swappable_slot(&engine, alice, "private", 9);
        let bob_slot = swappable_slot(&engine, bob, "affair", 10);
        let request = engine.propose(bob, bob_slot.id, alice_slot.id).unwrap();

        assert!(engine.get_request(alice, request.id).is_ok());
        assert!(engine.get_request(bob, request.id).is_ok());

        let err = engine.get_request(stranger, request.id).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authorization);
        assert!(engine.list_requests(stranger).unwrap().incoming.is_empty());
    }
}
