//! Client profile operations.
//!
//! Every write normalizes and validates the profile first: email is
//! lowercased and must be unique, the name is capitalized, and a date of
//! birth (when given) must make the client an adult. A linked user account
//! follows the profile's email, and takes its name only when it has none.

use chrono::NaiveDate;
use serde::Deserialize;
use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{is_unique_violation, DatabaseError, Result};
use crate::models::{Client, Role, User};
use crate::user::{self, NewUser};
use crate::validation::{
    normalize_email, normalize_name, optional, split_name, validate_adult, ValidationError,
    MAX_PHONE_LENGTH,
};

const CLIENT_COLUMNS: &str =
    "id, user_id, name, email, phone, address, date_of_birth, created_at, updated_at";

/// Client form input, before normalization.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ClientInput {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub date_of_birth: Option<NaiveDate>,
}

/// Normalized, validated client fields.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CleanClient {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
}

impl ClientInput {
    /// Normalize and validate the fields that need no database lookups.
    pub(crate) fn clean(&self, today: NaiveDate) -> std::result::Result<CleanClient, ValidationError> {
        let email = normalize_email(&self.email)?;
        let name = normalize_name(&self.name)?;
        let phone = optional("phone", self.phone.as_deref(), MAX_PHONE_LENGTH)?;
        let address = optional("address", self.address.as_deref(), usize::MAX)?;

        if let Some(dob) = self.date_of_birth {
            validate_adult(dob, today)?;
        }

        Ok(CleanClient {
            name,
            email,
            phone,
            address,
            date_of_birth: self.date_of_birth,
        })
    }
}

fn duplicate_email() -> ValidationError {
    ValidationError::Taken {
        field: "email".to_string(),
        message: "A client with this email already exists.".to_string(),
    }
}

fn email_used_by_account() -> ValidationError {
    ValidationError::Taken {
        field: "email".to_string(),
        message: "This email is already in use by another account.".to_string(),
    }
}

async fn client_email_taken(
    conn: &mut SqliteConnection,
    email: &str,
    excluding: Option<i64>,
) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM clients
            WHERE email = ? AND (? IS NULL OR id != ?)
        )
        "#,
    )
    .bind(email)
    .bind(excluding)
    .bind(excluding)
    .fetch_one(conn)
    .await?;

    Ok(exists)
}

pub(crate) async fn fetch_client(conn: &mut SqliteConnection, id: i64) -> Result<Client> {
    sqlx::query_as::<_, Client>(&format!("SELECT {CLIENT_COLUMNS} FROM clients WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Client", id))
}

/// Insert a cleaned profile on an open connection or transaction.
pub(crate) async fn insert_client(
    conn: &mut SqliteConnection,
    clean: &CleanClient,
    user_id: Option<i64>,
) -> Result<Client> {
    if client_email_taken(conn, &clean.email, None).await? {
        return Err(duplicate_email().into());
    }

    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO clients (user_id, name, email, phone, address, date_of_birth)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(user_id)
    .bind(&clean.name)
    .bind(&clean.email)
    .bind(&clean.phone)
    .bind(&clean.address)
    .bind(clean.date_of_birth)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return DatabaseError::Validation(duplicate_email());
        }
        DatabaseError::Sqlx(e)
    })?;

    fetch_client(conn, id).await
}

/// Create a client together with a login account.
///
/// The account's username is derived from the email's local part, with a
/// numeric suffix when taken (`jdoe`, `jdoe_1`, ...).
pub async fn create_client(
    pool: &SqlitePool,
    input: &ClientInput,
    today: NaiveDate,
) -> Result<(Client, User)> {
    let clean = input.clean(today)?;
    let mut tx = pool.begin().await?;

    if client_email_taken(&mut tx, &clean.email, None).await? {
        return Err(duplicate_email().into());
    }
    if user::email_in_use(&mut tx, &clean.email, None).await? {
        return Err(email_used_by_account().into());
    }

    let base = clean
        .email
        .split('@')
        .next()
        .unwrap_or_default()
        .to_string();
    let username = user::unique_username(&mut tx, &base).await?;
    let (first_name, last_name) = split_name(&clean.name);

    let account = user::insert_user(
        &mut tx,
        &NewUser {
            username,
            email: clean.email.clone(),
            first_name,
            last_name,
            role: Role::Client,
            is_active: true,
        },
    )
    .await?;

    let client = insert_client(&mut tx, &clean, Some(account.id)).await?;
    tx.commit().await?;

    tracing::info!(client_id = client.id, username = %account.username, "Client created");
    Ok((client, account))
}

/// Get a client by ID.
pub async fn get_client(pool: &SqlitePool, id: i64) -> Result<Client> {
    let mut conn = pool.acquire().await?;
    fetch_client(&mut conn, id).await
}

/// Get the profile linked to a user account, if any.
pub async fn get_client_for_user(pool: &SqlitePool, user_id: i64) -> Result<Option<Client>> {
    let client = sqlx::query_as::<_, Client>(&format!(
        "SELECT {CLIENT_COLUMNS} FROM clients WHERE user_id = ?"
    ))
    .bind(user_id)
    .fetch_optional(pool)
    .await?;

    Ok(client)
}

/// Get the caller's profile, creating a minimal one on first access.
///
/// The name falls back from the full name to the username; an account
/// without an email gets `<username>@example.com`.
pub async fn ensure_profile(pool: &SqlitePool, account: &User) -> Result<Client> {
    if let Some(client) = get_client_for_user(pool, account.id).await? {
        return Ok(client);
    }

    match create_profile(pool, account).await {
        Ok(client) => Ok(client),
        Err(err) => profile_after_failed_insert(pool, account.id, err).await,
    }
}

/// A concurrent first access may have created the profile between the
/// lookup and the insert; that profile wins.
async fn profile_after_failed_insert(
    pool: &SqlitePool,
    user_id: i64,
    err: DatabaseError,
) -> Result<Client> {
    match get_client_for_user(pool, user_id).await? {
        Some(client) => {
            tracing::debug!(client_id = client.id, user_id, "Profile created concurrently");
            Ok(client)
        }
        None => Err(err),
    }
}

async fn create_profile(pool: &SqlitePool, account: &User) -> Result<Client> {
    let mut tx = pool.begin().await?;
    let email = if account.email.trim().is_empty() {
        let placeholder = format!("{}@example.com", account.username).to_lowercase();
        sqlx::query("UPDATE users SET email = ? WHERE id = ?")
            .bind(&placeholder)
            .bind(account.id)
            .execute(&mut *tx)
            .await?;
        placeholder
    } else {
        account.email.trim().to_lowercase()
    };

    let full_name = account.full_name();
    let name = if full_name.is_empty() {
        account.username.clone()
    } else {
        full_name
    };

    let clean = CleanClient {
        name,
        email,
        phone: None,
        address: None,
        date_of_birth: None,
    };
    let client = insert_client(&mut tx, &clean, Some(account.id)).await?;
    tx.commit().await?;

    tracing::info!(client_id = client.id, user_id = account.id, "Created profile on first access");
    Ok(client)
}

/// Update a client profile and sync its linked account.
pub async fn update_client(
    pool: &SqlitePool,
    id: i64,
    input: &ClientInput,
    today: NaiveDate,
) -> Result<Client> {
    let clean = input.clean(today)?;
    let mut tx = pool.begin().await?;
    let existing = fetch_client(&mut tx, id).await?;

    if client_email_taken(&mut tx, &clean.email, Some(id)).await? {
        return Err(duplicate_email().into());
    }
    if let Some(user_id) = existing.user_id {
        if user::email_in_use(&mut tx, &clean.email, Some(user_id)).await? {
            return Err(email_used_by_account().into());
        }
    }

    sqlx::query(
        r#"
        UPDATE clients
        SET name = ?, email = ?, phone = ?, address = ?, date_of_birth = ?,
            updated_at = datetime('now')
        WHERE id = ?
        "#,
    )
    .bind(&clean.name)
    .bind(&clean.email)
    .bind(&clean.phone)
    .bind(&clean.address)
    .bind(clean.date_of_birth)
    .bind(id)
    .execute(&mut *tx)
    .await?;

    if let Some(user_id) = existing.user_id {
        let (first_name, last_name) = split_name(&clean.name);
        user::sync_contact(&mut tx, user_id, &clean.email, &first_name, &last_name).await?;
    }

    let client = fetch_client(&mut tx, id).await?;
    tx.commit().await?;
    Ok(client)
}

/// Delete a client and its linked account.
pub async fn delete_client(pool: &SqlitePool, id: i64) -> Result<()> {
    let mut tx = pool.begin().await?;
    let client = fetch_client(&mut tx, id).await?;

    sqlx::query("DELETE FROM clients WHERE id = ?")
        .bind(id)
        .execute(&mut *tx)
        .await?;

    if let Some(user_id) = client.user_id {
        sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(user_id)
            .execute(&mut *tx)
            .await?;
    }

    tx.commit().await?;
    tracing::info!(client_id = id, "Client deleted");
    Ok(())
}

/// List clients by name, optionally filtered by a name/email substring.
pub async fn list_clients(pool: &SqlitePool, query: Option<&str>) -> Result<Vec<Client>> {
    let pattern = query
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q));

    let clients = sqlx::query_as::<_, Client>(&format!(
        r#"
        SELECT {CLIENT_COLUMNS}
        FROM clients
        WHERE ? IS NULL OR name LIKE ? OR email LIKE ?
        ORDER BY name
        "#
    ))
    .bind(&pattern)
    .bind(&pattern)
    .bind(&pattern)
    .fetch_all(pool)
    .await?;

    Ok(clients)
}

/// Count total clients.
pub async fn count_clients(pool: &SqlitePool) -> Result<i64> {
    let count = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM clients")
        .fetch_one(pool)
        .await?;

    Ok(count)
}
