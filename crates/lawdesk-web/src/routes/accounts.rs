//! Self-service registration and account approval.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::registration::{self, Registration};
use database::{user, Client, DatabaseError, Role, User};
use serde::Serialize;

use crate::error::{Result, WebError, REGISTRATION_FAILED};
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

/// Registration outcome.
#[derive(Serialize)]
pub struct Registered {
    pub user: User,
    pub client: Client,
    pub message: &'static str,
}

/// Register a client account. It stays inactive until an admin approves it.
pub async fn register(
    State(state): State<AppState>,
    JsonBody(form): JsonBody<Registration>,
) -> Result<(StatusCode, Json<Registered>)> {
    let (user, client) = registration::register(state.db.pool(), &form, state.today())
        .await
        .map_err(|err| match err {
            DatabaseError::Validation(_) => WebError::Database(err),
            other => {
                tracing::error!(username = %form.username, "Registration failed: {}", other);
                WebError::Internal(REGISTRATION_FAILED.to_string())
            }
        })?;

    Ok((
        StatusCode::CREATED,
        Json(Registered {
            user,
            client,
            message: "Your account has been created and is pending admin approval. \
                      You will be able to log in once an admin activates your account.",
        }),
    ))
}

/// Accounts awaiting approval.
pub async fn pending(State(state): State<AppState>, caller: CurrentUser) -> Result<Json<Vec<User>>> {
    caller.require_role(Role::Admin)?;
    Ok(Json(user::list_pending_users(state.db.pool()).await?))
}

/// Approve a pending account.
pub async fn activate(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<User>> {
    caller.require_role(Role::Admin)?;
    let user = user::activate_user(state.db.pool(), id).await?;
    tracing::info!(user_id = id, admin_id = caller.id(), "Account activated");
    Ok(Json(user))
}
