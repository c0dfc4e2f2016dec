//! `/api/swaps` handlers: the exchange protocol and its read side.

use crate::dto::{Confirmation, ProposeBody, RespondBody};
use crate::error::ApiResult;
use crate::extract::CallerId;
use crate::service::AppState;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use shared_types::{
    ExchangeOutcome, ExchangeRequest, RequestId, RequestsView, Slot, SwapDecision, SwapStats,
};

pub async fn swappable_slots(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
) -> ApiResult<Json<Vec<Slot>>> {
    Ok(Json(state.api.list_swappable(caller)?))
}

pub async fn propose(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Json(body): Json<ProposeBody>,
) -> ApiResult<(StatusCode, Json<ExchangeRequest>)> {
    let request = state
        .api
        .propose(caller, body.offered_slot, body.requested_slot)?;
    Ok((StatusCode::CREATED, Json(request)))
}

pub async fn respond(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(request): Path<RequestId>,
    Json(body): Json<RespondBody>,
) -> ApiResult<Json<ExchangeOutcome>> {
    let decision = if body.accept {
        SwapDecision::Accept
    } else {
        SwapDecision::Reject
    };
    Ok(Json(state.api.respond(caller, request, decision)?))
}

pub async fn cancel(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(request): Path<RequestId>,
) -> ApiResult<Json<Confirmation>> {
    state.api.cancel(caller, request)?;
    Ok(Json(Confirmation::new("Swap request cancelled successfully")))
}

pub async fn my_requests(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
) -> ApiResult<Json<RequestsView>> {
    Ok(Json(state.api.list_requests(caller)?))
}

pub async fn get_request(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
    Path(request): Path<RequestId>,
) -> ApiResult<Json<ExchangeRequest>> {
    Ok(Json(state.api.get_request(caller, request)?))
}

pub async fn swap_stats(
    State(state): State<AppState>,
    CallerId(caller): CallerId,
) -> ApiResult<Json<SwapStats>> {
    Ok(Json(state.api.swap_stats(caller)?))
}
