//! Request extractors: caller identity and JSON bodies.
//!
//! Sessions and passwords live in the auth layer in front of this service.
//! It forwards the signed-in user's ID in the `X-User-Id` header.

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, FromRequestParts};
use axum::http::request::Parts;
use database::{user, DatabaseError, Role, User};

use crate::error::{Result, WebError};
use crate::state::AppState;

/// Header carrying the authenticated user's ID.
pub const USER_HEADER: &str = "x-user-id";

/// JSON body whose parse failures answer 400 instead of axum's default.
#[derive(Debug, FromRequest)]
#[from_request(via(axum::Json), rejection(WebError))]
pub struct JsonBody<T>(pub T);

impl From<JsonRejection> for WebError {
    fn from(rejection: JsonRejection) -> Self {
        WebError::BadRequest(rejection.body_text())
    }
}

/// The signed-in, active user.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    pub fn id(&self) -> i64 {
        self.0.id
    }

    pub fn role(&self) -> Role {
        self.0.role
    }

    /// Admins and lawyers.
    pub fn require_staff(&self) -> Result<()> {
        if self.0.role.is_staff() {
            return Ok(());
        }
        Err(WebError::Forbidden("Staff access required.".to_string()))
    }

    pub fn require_role(&self, role: Role) -> Result<()> {
        if self.0.role == role {
            return Ok(());
        }
        Err(WebError::Forbidden(format!(
            "Only {} accounts can do this.",
            match role {
                Role::Admin => "admin",
                Role::Lawyer => "lawyer",
                Role::Client => "client",
            }
        )))
    }
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = WebError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> std::result::Result<Self, Self::Rejection> {
        let id = parts
            .headers
            .get(USER_HEADER)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.trim().parse::<i64>().ok())
            .ok_or_else(|| WebError::Unauthorized("Sign in required.".to_string()))?;

        let account = match user::get_user(state.db.pool(), id).await {
            Ok(account) => account,
            Err(DatabaseError::NotFound { .. }) => {
                return Err(WebError::Unauthorized("Unknown user.".to_string()));
            }
            Err(err) => return Err(err.into()),
        };

        if !account.is_active {
            tracing::debug!(user_id = id, "Rejected inactive account");
            return Err(WebError::Unauthorized(
                "Your account is pending admin approval.".to_string(),
            ));
        }

        Ok(CurrentUser(account))
    }
}
