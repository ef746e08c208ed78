//! The caller's own client profile.

use axum::extract::State;
use axum::Json;
use database::client::{self, ClientInput};
use database::Client;

use crate::error::Result;
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

/// Show the caller's profile, creating it on first access.
pub async fn show(State(state): State<AppState>, caller: CurrentUser) -> Result<Json<Client>> {
    Ok(Json(client::ensure_profile(state.db.pool(), &caller.0).await?))
}

/// Update the caller's profile.
pub async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    JsonBody(input): JsonBody<ClientInput>,
) -> Result<Json<Client>> {
    let pool = state.db.pool();
    let profile = client::ensure_profile(pool, &caller.0).await?;
    let updated = client::update_client(pool, profile.id, &input, state.today()).await?;
    tracing::info!(client_id = updated.id, "Profile updated");
    Ok(Json(updated))
}
