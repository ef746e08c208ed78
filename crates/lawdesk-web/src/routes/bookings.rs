//! Slot bookings and their approval.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::booking;
use database::{Booking, BookingDetail, Role};

use crate::error::Result;
use crate::extract::CurrentUser;
use crate::state::AppState;

/// Request a slot. Answers 409 when the slot is already held.
pub async fn book(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(availability_id): Path<i64>,
) -> Result<(StatusCode, Json<Booking>)> {
    let booking = booking::book_slot(state.db.pool(), availability_id, caller.id()).await?;
    Ok((StatusCode::CREATED, Json(booking)))
}

/// The caller's bookings, newest first.
pub async fn mine(State(state): State<AppState>, caller: CurrentUser) -> Result<Json<Vec<BookingDetail>>> {
    Ok(Json(
        booking::list_for_client(state.db.pool(), caller.id()).await?,
    ))
}

/// Bookings on the caller's slots, newest first.
pub async fn for_lawyer(
    State(state): State<AppState>,
    caller: CurrentUser,
) -> Result<Json<Vec<BookingDetail>>> {
    caller.require_role(Role::Lawyer)?;
    Ok(Json(
        booking::list_for_lawyer(state.db.pool(), caller.id()).await?,
    ))
}

/// Approve or decline a booking on one of the caller's slots.
pub async fn update_status(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path((id, status)): Path<(i64, String)>,
) -> Result<Json<BookingDetail>> {
    caller.require_role(Role::Lawyer)?;
    let booking = booking::update_booking_status(state.db.pool(), id, caller.id(), &status).await?;
    Ok(Json(booking))
}
