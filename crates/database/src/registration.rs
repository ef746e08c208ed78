//! Self-service client registration.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::client::ClientInput;
use crate::error::Result;
use crate::models::{Client, Role, User};
use crate::user::{self, NewUser};
use crate::validation::{require, split_name, validate_username, ValidationError, MAX_PHONE_LENGTH};

/// Registration form fields. Credentials are handled by the auth layer.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
    pub username: String,
    pub email: String,
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

/// Register a client account.
///
/// The account is created inactive and must be activated by an admin
/// before the client can sign in. Username and email are unique ignoring
/// case.
pub async fn register(
    pool: &SqlitePool,
    form: &Registration,
    today: NaiveDate,
) -> Result<(User, Client)> {
    let username = validate_username(&form.username)?;
    let phone = require("phone", &form.phone, MAX_PHONE_LENGTH)?;
    let clean = ClientInput {
        name: form.name.clone(),
        email: form.email.clone(),
        phone: Some(phone),
        address: None,
        date_of_birth: form.date_of_birth,
    }
    .clean(today)?;

    let mut tx = pool.begin().await?;

    if user::username_exists(&mut tx, &username).await? {
        return Err(ValidationError::Taken {
            field: "username".to_string(),
            message: "This username is already taken.".to_string(),
        }
        .into());
    }
    if user::email_in_use(&mut tx, &clean.email, None).await? {
        return Err(ValidationError::Taken {
            field: "email".to_string(),
            message: "This email is already registered.".to_string(),
        }
        .into());
    }

    let (first_name, last_name) = split_name(&clean.name);
    let account = user::insert_user(
        &mut tx,
        &NewUser {
            username,
            email: clean.email.clone(),
            first_name,
            last_name,
            role: Role::Client,
            is_active: false,
        },
    )
    .await?;
    let client = crate::client::insert_client(&mut tx, &clean, Some(account.id)).await?;
    tx.commit().await?;

    tracing::info!(user_id = account.id, username = %account.username, "Client registered, pending approval");
    Ok((account, client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{test_db, today};
    use crate::DatabaseError;

    fn form(username: &str, email: &str) -> Registration {
        Registration {
            username: username.to_string(),
            email: email.to_string(),
            name: "achille mbembe".to_string(),
            phone: "+237 699 000 000".to_string(),
            date_of_birth: None,
        }
    }

    #[tokio::test]
    async fn test_register_creates_inactive_client() {
        let db = test_db().await;
        let (account, client) = register(db.pool(), &form("achille", "Achille@Mail.Example"), today())
            .await
            .unwrap();

        assert!(!account.is_active);
        assert_eq!(account.role, Role::Client);
        assert_eq!(account.email, "achille@mail.example");
        assert_eq!(client.user_id, Some(account.id));
        assert_eq!(client.name, "Achille Mbembe");
        assert_eq!(client.phone.as_deref(), Some("+237 699 000 000"));
    }

    #[tokio::test]
    async fn test_register_rejects_taken_username_any_case() {
        let db = test_db().await;
        register(db.pool(), &form("achille", "a@mail.example"), today())
            .await
            .unwrap();

        let err = register(db.pool(), &form("ACHILLE", "b@mail.example"), today())
            .await
            .unwrap_err();
        match err {
            DatabaseError::Validation(v) => assert_eq!(v.field(), "username"),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_register_rejects_taken_email() {
        let db = test_db().await;
        register(db.pool(), &form("one", "same@mail.example"), today())
            .await
            .unwrap();

        let err = register(db.pool(), &form("two", "SAME@mail.example"), today())
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "validation failed: This email is already registered.");
    }

    #[tokio::test]
    async fn test_register_rejects_underage() {
        let db = test_db().await;
        let mut minor = form("minor", "minor@mail.example");
        minor.date_of_birth = NaiveDate::from_ymd_opt(2009, 1, 1);

        let err = register(db.pool(), &minor, today()).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Validation(ValidationError::Underage)
        ));
    }

    #[tokio::test]
    async fn test_register_requires_phone() {
        let db = test_db().await;
        let mut no_phone = form("nophone", "nophone@mail.example");
        no_phone.phone = "  ".to_string();

        let err = register(db.pool(), &no_phone, today()).await.unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Validation(ValidationError::Empty(ref f)) if f == "phone"
        ));
    }
}
