//! Bodies that exist only at the HTTP boundary.
//!
//! Entities and views serialize straight from `shared-types`; these types
//! cover the request and confirmation shapes that have no engine
//! counterpart.

use serde::{Deserialize, Serialize};
use shared_types::{SlotId, Timestamp};

/// POST `/api/slots` body. Status is never client-assignable, so there is
/// no status field here; new slots always start BUSY.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateSlotBody {
    pub title: String,
    pub start: Timestamp,
    pub end: Timestamp,
}

/// POST `/api/swaps/requests` body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct ProposeBody {
    pub offered_slot: SlotId,
    pub requested_slot: SlotId,
}

/// POST `/api/swaps/requests/:id/response` body.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct RespondBody {
    pub accept: bool,
}

/// 200 confirmation for deletes and cancellations.
#[derive(Debug, Clone, Serialize)]
pub struct Confirmation {
    pub message: &'static str,
}

impl Confirmation {
    pub fn new(message: &'static str) -> Self {
        Self { message }
    }
}
