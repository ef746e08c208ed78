//! Role-dependent overview of cases and clients.

use axum::extract::{Query, State};
use axum::Json;
use database::case::{self, CaseFilter};
use database::{client, Case, Client};
use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::extract::CurrentUser;
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct DashboardQuery {
    #[serde(default)]
    pub q: Option<String>,
}

/// Dashboard contents.
#[derive(Debug, Default, Serialize)]
pub struct Dashboard {
    pub cases: Vec<Case>,
    pub clients: Vec<Client>,
    /// The caller's own profile, for client accounts.
    pub profile: Option<Client>,
}

/// Staff see every case and client; clients see only their own cases.
pub async fn dashboard(
    State(state): State<AppState>,
    caller: CurrentUser,
    Query(params): Query<DashboardQuery>,
) -> Result<Json<Dashboard>> {
    let pool = state.db.pool();
    let query = params.q.as_deref();

    if caller.0.role.is_staff() {
        let cases = case::list_cases(pool, &CaseFilter { client_id: None, query }).await?;
        let clients = client::list_clients(pool, query).await?;
        return Ok(Json(Dashboard {
            cases,
            clients,
            profile: None,
        }));
    }

    let Some(profile) = client::get_client_for_user(pool, caller.id()).await? else {
        return Ok(Json(Dashboard::default()));
    };

    let cases = case::list_cases(
        pool,
        &CaseFilter {
            client_id: Some(profile.id),
            query,
        },
    )
    .await?;

    Ok(Json(Dashboard {
        cases,
        clients: Vec::new(),
        profile: Some(profile),
    }))
}
