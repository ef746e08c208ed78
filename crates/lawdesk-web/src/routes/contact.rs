//! Landing-page contact form.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use database::visitor::{self, VisitorInput};
use database::Visitor;

use crate::error::Result;
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

/// Store an inquiry from an anonymous visitor.
pub async fn submit(
    State(state): State<AppState>,
    JsonBody(input): JsonBody<VisitorInput>,
) -> Result<(StatusCode, Json<Visitor>)> {
    let visitor = visitor::create_visitor(state.db.pool(), &input).await?;
    Ok((StatusCode::CREATED, Json(visitor)))
}

/// Inquiries for staff, newest first.
pub async fn list(State(state): State<AppState>, caller: CurrentUser) -> Result<Json<Vec<Visitor>>> {
    caller.require_staff()?;
    Ok(Json(visitor::list_visitors(state.db.pool()).await?))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::testing::TestApp;

    #[tokio::test]
    async fn test_contact_submission() {
        let app = TestApp::spawn().await;
        let (lawyer, _) = app.lawyer("counsel").await;
        let (client, _) = app.client("amina").await;

        let response = app
            .post(
                "/contact",
                None,
                json!({"name": "Visitor", "email": "v@mail.example", "message": "Do you do probate?"}),
            )
            .await;
        assert_eq!(response.status(), 201);

        let response = app
            .post(
                "/contact",
                None,
                json!({"name": "Visitor", "email": "not-an-email", "message": "Hi"}),
            )
            .await;
        assert_eq!(response.status(), 400);
        let body: Value = response.json().await.unwrap();
        assert!(body["errors"]["email"].is_array());

        assert_eq!(app.get("/contact", Some(client.id)).await.status(), 403);
        let inquiries: Value = app.get("/contact", Some(lawyer.id)).await.json().await.unwrap();
        assert_eq!(inquiries.as_array().unwrap().len(), 1);
    }
}
