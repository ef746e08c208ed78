//! Dated appointments requested by clients.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::appointment::{self, AppointmentInput};
use database::{client, lawyer, Appointment, Role};

use crate::error::{Result, WebError};
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

/// Book an appointment inside the lawyer's window for that weekday.
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    JsonBody(input): JsonBody<AppointmentInput>,
) -> Result<(StatusCode, Json<Appointment>)> {
    let pool = state.db.pool();
    let Some(profile) = client::get_client_for_user(pool, caller.id()).await? else {
        return Err(WebError::Forbidden(
            "Only clients can book appointments.".to_string(),
        ));
    };

    let appointment =
        appointment::create_appointment(pool, profile.id, &input, state.today()).await?;
    Ok((StatusCode::CREATED, Json(appointment)))
}

/// Clients see their own appointments; lawyers see the ones booked with them.
pub async fn list(State(state): State<AppState>, caller: CurrentUser) -> Result<Json<Vec<Appointment>>> {
    let pool = state.db.pool();

    if caller.role() == Role::Lawyer {
        let profile = lawyer::get_profile_for_user(pool, caller.id()).await?;
        return Ok(Json(appointment::list_for_lawyer(pool, profile.id).await?));
    }

    match client::get_client_for_user(pool, caller.id()).await? {
        Some(profile) => Ok(Json(appointment::list_for_client(pool, profile.id).await?)),
        None => Ok(Json(Vec::new())),
    }
}
