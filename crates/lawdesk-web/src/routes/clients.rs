//! Client management for staff.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::case::{self, CaseFilter};
use database::client::{self, ClientInput};
use database::{Case, Client, Role, User};
use serde::Serialize;

use crate::error::{Result, WebError};
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

/// A new client and the account created for them.
#[derive(Serialize)]
pub struct CreatedClient {
    pub client: Client,
    pub user: User,
}

/// A client with their cases.
#[derive(Serialize)]
pub struct ClientDetail {
    pub client: Client,
    pub cases: Vec<Case>,
}

/// Create a client and a linked login account.
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    JsonBody(input): JsonBody<ClientInput>,
) -> Result<(StatusCode, Json<CreatedClient>)> {
    caller.require_staff()?;
    let (client, user) = client::create_client(state.db.pool(), &input, state.today()).await?;
    Ok((StatusCode::CREATED, Json(CreatedClient { client, user })))
}

/// Staff, or the client themselves.
pub async fn show(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<ClientDetail>> {
    let pool = state.db.pool();
    let client = client::get_client(pool, id).await?;

    if !caller.0.role.is_staff() && client.user_id != Some(caller.id()) {
        return Err(WebError::Forbidden(
            "You do not have permission to view this client.".to_string(),
        ));
    }

    let cases = case::list_cases(
        pool,
        &CaseFilter {
            client_id: Some(id),
            query: None,
        },
    )
    .await?;
    Ok(Json(ClientDetail { client, cases }))
}

pub async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<ClientInput>,
) -> Result<Json<Client>> {
    caller.require_staff()?;
    let client = client::update_client(state.db.pool(), id, &input, state.today()).await?;
    tracing::info!(client_id = id, staff_id = caller.id(), "Client updated");
    Ok(Json(client))
}

/// Delete a client and their account. Admin only.
pub async fn remove(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> Result<StatusCode> {
    caller.require_role(Role::Admin)?;
    client::delete_client(state.db.pool(), id).await?;
    Ok(StatusCode::NO_CONTENT)
}
