//! Lawyer directory and onboarding.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::lawyer::{self, NewLawyer};
use database::{LawyerProfile, LawyerSummary, Role, User};
use serde::Serialize;

use crate::error::Result;
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

#[derive(Serialize)]
pub struct CreatedLawyer {
    pub user: User,
    pub profile: LawyerProfile,
}

/// Active lawyers with their profiles.
pub async fn list(State(state): State<AppState>, _caller: CurrentUser) -> Result<Json<Vec<LawyerSummary>>> {
    Ok(Json(lawyer::list_lawyers(state.db.pool()).await?))
}

/// Onboard a lawyer. Admin only.
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    JsonBody(new): JsonBody<NewLawyer>,
) -> Result<(StatusCode, Json<CreatedLawyer>)> {
    caller.require_role(Role::Admin)?;
    let (user, profile) = lawyer::create_lawyer(state.db.pool(), &new).await?;
    Ok((StatusCode::CREATED, Json(CreatedLawyer { user, profile })))
}
