//! `/api/slots` handlers: slot CRUD and the swappable toggle.

use crate::dto::{Confirmation, CreateSlotBody};
use crate::error::ApiResult;
use crate::extract::CallerId;
use crate::service::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shared_types::{Slot, SlotId, SlotStats};
use swap_engine::SlotPatch;

pub async fn list_slots(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
) -> ApiResult<Json<Vec<Slot>>> {
    Ok(Json(state.api.list_slots(caller)?))
}

pub async fn create_slot(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Json(body): Json<CreateSlotBody>,
) -> ApiResult<(StatusCode, Json<Slot>)> {
    let slot = state
        .api
        .create_slot(caller, body.title, body.start, body.end)?;
    Ok((StatusCode::CREATED, Json(slot)))
}

pub async fn slot_stats(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
) -> ApiResult<Json<SlotStats>> {
    Ok(Json(state.api.slot_stats(caller)?))
}

pub async fn get_slot(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(slot): Path<SlotId>,
) -> ApiResult<Json<Slot>> {
    Ok(Json(state.api.get_slot(caller, slot)?))
}

pub async fn update_slot(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(slot): Path<SlotId>,
    Json(patch): Json<SlotPatch>,
) -> ApiResult<Json<Slot>> {
    Ok(Json(state.api.update_slot(caller, slot, patch)?))
}

pub async fn delete_slot(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(slot): Path<SlotId>,
) -> ApiResult<Json<Confirmation>> {
    state.api.delete_slot(caller, slot)?;
    Ok(Json(Confirmation::new("Slot deleted successfully")))
}

pub async fn toggle_swappable(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(slot): Path<SlotId>,
) -> ApiResult<Json<Slot>> {
    Ok(Json(state.api.toggle_swappable(caller, slot)?))
}
