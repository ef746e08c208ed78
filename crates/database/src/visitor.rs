//! Landing-page contact form submissions.

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::Result;
use crate::models::Visitor;
use crate::validation::{normalize_email, require};

/// Contact form input.
#[derive(Debug, Clone, Deserialize)]
pub struct VisitorInput {
    pub name: String,
    pub email: String,
    pub message: String,
}

/// Store a contact-form submission.
pub async fn create_visitor(pool: &SqlitePool, input: &VisitorInput) -> Result<Visitor> {
    let name = require("name", &input.name, 255)?;
    let email = normalize_email(&input.email)?;
    let message = require("message", &input.message, 10_000)?;

    let visitor = sqlx::query_as::<_, Visitor>(
        r#"
        INSERT INTO visitors (name, email, message)
        VALUES (?, ?, ?)
        RETURNING id, name, email, message, submitted_at
        "#,
    )
    .bind(&name)
    .bind(&email)
    .bind(&message)
    .fetch_one(pool)
    .await?;

    tracing::info!(visitor_id = visitor.id, "Contact inquiry received");
    Ok(visitor)
}

/// List submissions, newest first.
pub async fn list_visitors(pool: &SqlitePool) -> Result<Vec<Visitor>> {
    let visitors = sqlx::query_as::<_, Visitor>(
        r#"
        SELECT id, name, email, message, submitted_at
        FROM visitors
        ORDER BY submitted_at DESC, id DESC
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(visitors)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::test_db;
    use crate::{DatabaseError, ValidationError};

    #[tokio::test]
    async fn test_contact_form() {
        let db = test_db().await;
        let visitor = create_visitor(
            db.pool(),
            &VisitorInput {
                name: "Curious Visitor".to_string(),
                email: "Visitor@Mail.Example".to_string(),
                message: "Do you handle land titles?".to_string(),
            },
        )
        .await
        .unwrap();
        assert_eq!(visitor.email, "visitor@mail.example");

        let err = create_visitor(
            db.pool(),
            &VisitorInput {
                name: "No Message".to_string(),
                email: "x@mail.example".to_string(),
                message: "   ".to_string(),
            },
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Validation(ValidationError::Empty(_))
        ));

        assert_eq!(list_visitors(db.pool()).await.unwrap().len(), 1);
    }
}
