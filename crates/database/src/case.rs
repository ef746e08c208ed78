//! Case CRUD operations.

use chrono::NaiveDate;
use serde::{Deserialize, Deserializer};
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{Case, CaseStatus};
use crate::validation::{require, MAX_TITLE_LENGTH};

const CASE_COLUMNS: &str =
    "id, title, client_id, description, lawyer_id, status, opened_on, due_date";

/// Case form input.
#[derive(Debug, Clone, Deserialize)]
pub struct CaseInput {
    pub title: String,
    pub client_id: i64,
    #[serde(default)]
    pub description: String,
    /// Absent keeps the current lawyer on update; `null` unassigns.
    #[serde(default, deserialize_with = "present")]
    pub lawyer_id: Option<Option<i64>>,
    #[serde(default)]
    pub status: CaseStatus,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
}

impl CaseInput {
    /// The lawyer to store when creating a case.
    pub fn assigned_lawyer(&self) -> Option<i64> {
        self.lawyer_id.flatten()
    }
}

fn present<'de, D>(deserializer: D) -> std::result::Result<Option<Option<i64>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<i64>::deserialize(deserializer).map(Some)
}

/// Which cases to list.
#[derive(Debug, Clone, Default)]
pub struct CaseFilter<'a> {
    /// Only this client's cases.
    pub client_id: Option<i64>,
    /// Substring of title or description, or of the client name when
    /// listing across clients.
    pub query: Option<&'a str>,
}

async fn ensure_client_exists(pool: &SqlitePool, client_id: i64) -> Result<()> {
    let exists = sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM clients WHERE id = ?)")
        .bind(client_id)
        .fetch_one(pool)
        .await?;

    if !exists {
        return Err(DatabaseError::not_found("Client", client_id));
    }
    Ok(())
}

async fn ensure_lawyer_exists(pool: &SqlitePool, lawyer_id: Option<i64>) -> Result<()> {
    let Some(lawyer_id) = lawyer_id else {
        return Ok(());
    };

    let exists = sqlx::query_scalar::<_, bool>(
        "SELECT EXISTS(SELECT 1 FROM users WHERE id = ? AND role = 'lawyer')",
    )
    .bind(lawyer_id)
    .fetch_one(pool)
    .await?;

    if !exists {
        return Err(DatabaseError::not_found("Lawyer", lawyer_id));
    }
    Ok(())
}

/// Open a new case.
pub async fn create_case(pool: &SqlitePool, input: &CaseInput) -> Result<Case> {
    let title = require("title", &input.title, MAX_TITLE_LENGTH)?;
    ensure_client_exists(pool, input.client_id).await?;
    ensure_lawyer_exists(pool, input.assigned_lawyer()).await?;

    let case = sqlx::query_as::<_, Case>(&format!(
        r#"
        INSERT INTO cases (title, client_id, description, lawyer_id, status, due_date)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING {CASE_COLUMNS}
        "#
    ))
    .bind(&title)
    .bind(input.client_id)
    .bind(input.description.trim())
    .bind(input.assigned_lawyer())
    .bind(input.status)
    .bind(input.due_date)
    .fetch_one(pool)
    .await?;

    tracing::info!(case_id = case.id, client_id = case.client_id, "Case opened");
    Ok(case)
}

/// Get a case by ID.
pub async fn get_case(pool: &SqlitePool, id: i64) -> Result<Case> {
    sqlx::query_as::<_, Case>(&format!("SELECT {CASE_COLUMNS} FROM cases WHERE id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Case", id))
}

/// Update an existing case. The assigned lawyer changes only when the
/// input names one or explicitly clears it.
pub async fn update_case(pool: &SqlitePool, id: i64, input: &CaseInput) -> Result<Case> {
    let title = require("title", &input.title, MAX_TITLE_LENGTH)?;
    ensure_client_exists(pool, input.client_id).await?;
    ensure_lawyer_exists(pool, input.assigned_lawyer()).await?;

    sqlx::query_as::<_, Case>(&format!(
        r#"
        UPDATE cases
        SET title = ?, client_id = ?, description = ?,
            lawyer_id = CASE WHEN ? THEN ? ELSE lawyer_id END,
            status = ?, due_date = ?
        WHERE id = ?
        RETURNING {CASE_COLUMNS}
        "#
    ))
    .bind(&title)
    .bind(input.client_id)
    .bind(input.description.trim())
    .bind(input.lawyer_id.is_some())
    .bind(input.assigned_lawyer())
    .bind(input.status)
    .bind(input.due_date)
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Case", id))
}

/// List cases newest first.
pub async fn list_cases(pool: &SqlitePool, filter: &CaseFilter<'_>) -> Result<Vec<Case>> {
    let pattern = filter
        .query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q));

    let cases = sqlx::query_as::<_, Case>(
        r#"
        SELECT c.id, c.title, c.client_id, c.description, c.lawyer_id, c.status,
               c.opened_on, c.due_date
        FROM cases c
        JOIN clients cl ON cl.id = c.client_id
        WHERE (? IS NULL OR c.client_id = ?)
          AND (? IS NULL OR c.title LIKE ? OR c.description LIKE ?
               OR (? IS NULL AND cl.name LIKE ?))
        ORDER BY c.opened_on DESC, c.id DESC
        "#,
    )
    .bind(filter.client_id)
    .bind(filter.client_id)
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .bind(filter.client_id)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(cases)
}
