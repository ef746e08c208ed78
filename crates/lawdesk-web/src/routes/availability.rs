//! Lawyer weekly availability.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::availability;
use database::lawyer;
use database::schedule::Window;
use database::{Availability, AvailabilitySlot, LawyerProfile, Role};
use serde::Serialize;

use crate::error::Result;
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

/// A lawyer's week as seen by clients.
#[derive(Serialize)]
pub struct LawyerWeek {
    pub lawyer: LawyerProfile,
    pub availabilities: Vec<AvailabilitySlot>,
}

/// The caller's lawyer profile.
pub(crate) async fn own_profile(state: &AppState, caller: &CurrentUser) -> Result<LawyerProfile> {
    caller.require_role(Role::Lawyer)?;
    Ok(lawyer::get_profile_for_user(state.db.pool(), caller.id()).await?)
}

/// Add a window to the caller's week. Times default to 08:00-16:00.
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    JsonBody(window): JsonBody<Window>,
) -> Result<(StatusCode, Json<Availability>)> {
    let profile = own_profile(&state, &caller).await?;
    let slot = availability::create_availability(state.db.pool(), profile.id, &window).await?;
    Ok((StatusCode::CREATED, Json(slot)))
}

/// The caller's own windows.
pub async fn mine(State(state): State<AppState>, caller: CurrentUser) -> Result<Json<Vec<Availability>>> {
    let profile = own_profile(&state, &caller).await?;
    Ok(Json(
        availability::list_for_lawyer(state.db.pool(), profile.id).await?,
    ))
}

pub async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(window): JsonBody<Window>,
) -> Result<Json<Availability>> {
    let profile = own_profile(&state, &caller).await?;
    let slot = availability::update_availability(state.db.pool(), id, profile.id, &window).await?;
    Ok(Json(slot))
}

pub async fn remove(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    let profile = own_profile(&state, &caller).await?;
    availability::delete_availability(state.db.pool(), id, profile.id).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// A lawyer's windows, each marked booked when a pending or approved
/// booking holds it.
pub async fn for_lawyer(
    State(state): State<AppState>,
    _caller: CurrentUser,
    Path(user_id): Path<i64>,
) -> Result<Json<LawyerWeek>> {
    let pool = state.db.pool();
    let lawyer = lawyer::get_profile_for_user(pool, user_id).await?;
    let availabilities = availability::list_slots(pool, lawyer.id).await?;
    Ok(Json(LawyerWeek {
        lawyer,
        availabilities,
    }))
}
