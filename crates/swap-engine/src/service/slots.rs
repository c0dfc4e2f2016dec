//! Slot lifecycle: create, read, update, delete, and the swappable toggle.
//!
//! Reads are owner-scoped: asking for another user's slot reports not-found
//! rather than revealing it. The toggle is the one exception; it names the
//! real owner conflict so a misdirected flip is distinguishable from a typo.

use super::SwapService;
use crate::ports::inbound::SlotPatch;
use crate::ports::outbound::{SlotStore, SwapStorage, TimeSource};
use shared_types::{Slot, SlotId, SwapError, Timestamp, UserId};

impl<S, C> SwapService<S, C>
where
    S: SwapStorage,
    C: TimeSource,
{
    /// Create a slot owned by `owner`, starting out `Busy`.
    pub fn create_slot(
        &self,
        owner: UserId,
        title: String,
        start: Timestamp,
        end: Timestamp,
    ) -> Result<Slot, SwapError> {
        self.check_title(&title)?;
        let slot = self.execute("create_slot", |tx| {
            let slot = Slot::new(owner, title.clone(), start, end)?;
            tx.put_slot(slot.clone());
            Ok(slot)
        })?;
        tracing::info!(slot = %slot.id, owner = %owner, "slot created");
        Ok(slot)
    }

    /// Fetch one of the caller's slots.
    pub fn get_slot(&self, caller: UserId, slot_id: SlotId) -> Result<Slot, SwapError> {
        let tx = self.begin()?;
        owned_slot(&tx, caller, slot_id)
    }

    /// Edit title or bounds of one of the caller's slots.
    ///
    /// Refused while an exchange is pending on the slot. The merged record
    /// is validated as a whole, so a patch can never leave an invalid slot
    /// behind.
    pub fn update_slot(
        &self,
        caller: UserId,
        slot_id: SlotId,
        patch: SlotPatch,
    ) -> Result<Slot, SwapError> {
        if let Some(title) = &patch.title {
            self.check_title(title)?;
        }
        let slot = self.execute("update_slot", |tx| {
            let mut slot = owned_slot(tx, caller, slot_id)?;
            slot.update(patch.title.clone(), patch.start, patch.end)?;
            tx.put_slot(slot.clone());
            Ok(slot)
        })?;
        tracing::info!(slot = %slot.id, "slot updated");
        Ok(slot)
    }

    /// Remove one of the caller's slots. Refused while an exchange is
    /// pending on it.
    pub fn delete_slot(&self, caller: UserId, slot_id: SlotId) -> Result<(), SwapError> {
        self.execute("delete_slot", |tx| {
            let slot = owned_slot(tx, caller, slot_id)?;
            if slot.status.is_swap_pending() {
                return Err(SwapError::SlotPendingExchange { slot: slot_id });
            }
            tx.remove_slot(slot_id);
            Ok(())
        })?;
        tracing::info!(slot = %slot_id, "slot deleted");
        Ok(())
    }

    /// Flip one of the caller's slots between `Busy` and `Swappable`.
    pub fn toggle_swappable(&self, caller: UserId, slot_id: SlotId) -> Result<Slot, SwapError> {
        let slot = self.execute("toggle_swappable", |tx| {
            let mut slot = tx
                .slot(slot_id)
                .ok_or(SwapError::SlotNotFound { slot: slot_id })?;
            slot.toggle(caller)?;
            tx.put_slot(slot.clone());
            Ok(slot)
        })?;
        tracing::info!(slot = %slot.id, status = %slot.status, "slot toggled");
        Ok(slot)
    }

    fn check_title(&self, title: &str) -> Result<(), SwapError> {
        if title.trim().chars().count() > self.config.max_title_len {
            return Err(SwapError::TitleTooLong {
                max: self.config.max_title_len,
            });
        }
        Ok(())
    }
}

fn owned_slot<T: SlotStore>(tx: &T, caller: UserId, slot_id: SlotId) -> Result<Slot, SwapError> {
    tx.slot(slot_id)
        .filter(|slot| slot.owner == caller)
        .ok_or(SwapError::SlotNotFound { slot: slot_id })
}
