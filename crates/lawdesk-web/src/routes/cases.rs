//! Cases and their documents.

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use database::case::{self, CaseInput};
use database::document::{self, DocumentInput};
use database::{client, Case, Document, Role};
use serde::Serialize;

use crate::error::{Result, WebError};
use crate::extract::{CurrentUser, JsonBody};
use crate::state::AppState;

/// A case with its documents.
#[derive(Serialize)]
pub struct CaseDetail {
    pub case: Case,
    pub documents: Vec<Document>,
}

/// Open a case. Lawyers are assigned to the cases they open unless
/// another lawyer is named.
pub async fn create(
    State(state): State<AppState>,
    caller: CurrentUser,
    JsonBody(mut input): JsonBody<CaseInput>,
) -> Result<(StatusCode, Json<Case>)> {
    caller.require_staff()?;
    if input.assigned_lawyer().is_none() && caller.role() == Role::Lawyer {
        input.lawyer_id = Some(Some(caller.id()));
    }

    let case = case::create_case(state.db.pool(), &input).await?;
    Ok((StatusCode::CREATED, Json(case)))
}

/// Staff, or the client the case belongs to.
pub async fn show(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
) -> Result<Json<CaseDetail>> {
    let pool = state.db.pool();
    let case = case::get_case(pool, id).await?;

    if !caller.0.role.is_staff() {
        let owner = client::get_client_for_user(pool, caller.id())
            .await?
            .is_some_and(|profile| profile.id == case.client_id);
        if !owner {
            return Err(WebError::Forbidden(
                "You do not have permission to view this case.".to_string(),
            ));
        }
    }

    let documents = document::list_documents(pool, id).await?;
    Ok(Json(CaseDetail { case, documents }))
}

pub async fn update(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<CaseInput>,
) -> Result<Json<Case>> {
    caller.require_staff()?;
    Ok(Json(case::update_case(state.db.pool(), id, &input).await?))
}

/// Record a document already placed in file storage.
pub async fn upload_document(
    State(state): State<AppState>,
    caller: CurrentUser,
    Path(id): Path<i64>,
    JsonBody(input): JsonBody<DocumentInput>,
) -> Result<(StatusCode, Json<Document>)> {
    caller.require_staff()?;
    let document = document::create_document(state.db.pool(), id, &input).await?;
    Ok((StatusCode::CREATED, Json(document)))
}

#[cfg(test)]
mod tests {
    use serde_json::{json, Value};

    use crate::testing::TestApp;

    #[tokio::test]
    async fn test_case_lifecycle() {
        let app = TestApp::spawn().await;
        let (lawyer, _) = app.lawyer("counsel").await;
        let (amina, profile) = app.client("amina").await;
        let (bouba, _) = app.client("bouba").await;

        let response = app
            .post(
                "/cases",
                Some(lawyer.id),
                json!({"title": "Boundary dispute", "client_id": profile.id, "due_date": "2031-03-01"}),
            )
            .await;
        assert_eq!(response.status(), 201);
        let case: Value = response.json().await.unwrap();
        assert_eq!(case["status"], "open");
        assert_eq!(case["lawyer_id"], lawyer.id);
        let path = format!("/cases/{}", case["id"]);

        let response = app
            .post(
                &format!("{}/documents", path),
                Some(lawyer.id),
                json!({"file_path": "documents/survey.pdf"}),
            )
            .await;
        assert_eq!(response.status(), 201);
        let doc: Value = response.json().await.unwrap();
        assert_eq!(doc["title"], "Untitled Document");

        let detail: Value = app.get(&path, Some(amina.id)).await.json().await.unwrap();
        assert_eq!(detail["documents"].as_array().unwrap().len(), 1);
        assert_eq!(app.get(&path, Some(bouba.id)).await.status(), 403);

        let response = app
            .put(
                &path,
                Some(lawyer.id),
                json!({"title": "Boundary dispute", "client_id": profile.id, "status": "closed"}),
            )
            .await;
        let updated: Value = response.json().await.unwrap();
        assert_eq!(updated["status"], "closed");
        assert_eq!(updated["lawyer_id"], lawyer.id);

        let response = app
            .put(
                &path,
                Some(lawyer.id),
                json!({"title": "Boundary dispute", "client_id": profile.id, "lawyer_id": null}),
            )
            .await;
        let updated: Value = response.json().await.unwrap();
        assert!(updated["lawyer_id"].is_null());
    }

    #[tokio::test]
    async fn test_case_validation() {
        let app = TestApp::spawn().await;
        let admin = app.admin().await;
        let (amina, profile) = app.client("amina").await;

        let response = app
            .post("/cases", Some(admin.id), json!({"title": "  ", "client_id": profile.id}))
            .await;
        assert_eq!(response.status(), 400);

        let response = app
            .post("/cases", Some(admin.id), json!({"title": "Ghost", "client_id": 999}))
            .await;
        assert_eq!(response.status(), 404);

        let response = app
            .post(
                "/cases",
                Some(admin.id),
                json!({"title": "Ghost counsel", "client_id": profile.id, "lawyer_id": 999}),
            )
            .await;
        assert_eq!(response.status(), 404);

        let response = app
            .post(
                "/cases",
                Some(admin.id),
                json!({"title": "Client as counsel", "client_id": profile.id, "lawyer_id": amina.id}),
            )
            .await;
        assert_eq!(response.status(), 404);

        let response = app
            .post("/cases", Some(amina.id), json!({"title": "Mine", "client_id": profile.id}))
            .await;
        assert_eq!(response.status(), 403);

        let response = app
            .post("/cases/77/documents", Some(admin.id), json!({"file_path": "x.pdf"}))
            .await;
        assert_eq!(response.status(), 404);
    }
}
