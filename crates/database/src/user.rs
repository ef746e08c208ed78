//! User account operations.

use sqlx::{SqliteConnection, SqlitePool};

use crate::error::{is_unique_violation, DatabaseError, Result};
use crate::models::{Role, User};

const USER_COLUMNS: &str =
    "id, username, email, first_name, last_name, role, is_active, created_at";

/// Fields for a new account.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    pub is_active: bool,
}

/// Insert a user on an open connection or transaction.
pub(crate) async fn insert_user(conn: &mut SqliteConnection, new: &NewUser) -> Result<User> {
    let id = sqlx::query_scalar::<_, i64>(
        r#"
        INSERT INTO users (username, email, first_name, last_name, role, is_active)
        VALUES (?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&new.username)
    .bind(&new.email)
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(new.role)
    .bind(new.is_active)
    .fetch_one(&mut *conn)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return DatabaseError::AlreadyExists {
                entity: "User",
                id: new.username.clone(),
            };
        }
        DatabaseError::Sqlx(e)
    })?;

    fetch_user(conn, id).await
}

async fn fetch_user(conn: &mut SqliteConnection, id: i64) -> Result<User> {
    sqlx::query_as::<_, User>(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
        .bind(id)
        .fetch_optional(conn)
        .await?
        .ok_or_else(|| DatabaseError::not_found("User", id))
}

/// Create a new user.
pub async fn create_user(pool: &SqlitePool, new: &NewUser) -> Result<User> {
    let mut conn = pool.acquire().await?;
    insert_user(&mut conn, new).await
}

/// Get a user by ID.
pub async fn get_user(pool: &SqlitePool, id: i64) -> Result<User> {
    let mut conn = pool.acquire().await?;
    fetch_user(&mut conn, id).await
}

/// Get a user by username, ignoring case.
pub async fn get_user_by_username(pool: &SqlitePool, username: &str) -> Result<User> {
    sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE username = ? COLLATE NOCASE"
    ))
    .bind(username)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("User", username))
}

/// Check whether a username is taken, ignoring case.
pub(crate) async fn username_exists(conn: &mut SqliteConnection, username: &str) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(SELECT 1 FROM users WHERE username = ? COLLATE NOCASE)
        "#,
    )
    .bind(username)
    .fetch_one(conn)
    .await?;

    Ok(exists)
}

/// Check whether another account already uses this email, ignoring case.
pub(crate) async fn email_in_use(
    conn: &mut SqliteConnection,
    email: &str,
    excluding_user: Option<i64>,
) -> Result<bool> {
    let exists = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM users
            WHERE email = ? COLLATE NOCASE AND (? IS NULL OR id != ?)
        )
        "#,
    )
    .bind(email)
    .bind(excluding_user)
    .bind(excluding_user)
    .fetch_one(conn)
    .await?;

    Ok(exists)
}

/// Pick a free username: `base`, then `base_1`, `base_2`, ...
pub(crate) async fn unique_username(conn: &mut SqliteConnection, base: &str) -> Result<String> {
    let mut candidate = base.to_string();
    let mut counter = 1;

    while username_exists(conn, &candidate).await? {
        candidate = format!("{}_{}", base, counter);
        counter += 1;
    }

    Ok(candidate)
}

/// Sync an owning profile's email. Names are filled in only while the
/// account has none.
pub(crate) async fn sync_contact(
    conn: &mut SqliteConnection,
    id: i64,
    email: &str,
    first_name: &str,
    last_name: &str,
) -> Result<()> {
    sqlx::query(
        r#"
        UPDATE users
        SET email = ?,
            first_name = CASE WHEN first_name = '' AND last_name = '' THEN ? ELSE first_name END,
            last_name = CASE WHEN first_name = '' AND last_name = '' THEN ? ELSE last_name END
        WHERE id = ?
        "#,
    )
    .bind(email)
    .bind(first_name)
    .bind(last_name)
    .bind(id)
    .execute(conn)
    .await?;

    Ok(())
}

/// Activate an account awaiting approval.
pub async fn activate_user(pool: &SqlitePool, id: i64) -> Result<User> {
    let result = sqlx::query(
        r#"
        UPDATE users
        SET is_active = 1
        WHERE id = ?
        "#,
    )
    .bind(id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("User", id));
    }

    tracing::info!(user_id = id, "User activated");
    get_user(pool, id).await
}

/// List accounts awaiting activation, oldest first.
pub async fn list_pending_users(pool: &SqlitePool) -> Result<Vec<User>> {
    let users = sqlx::query_as::<_, User>(&format!(
        "SELECT {USER_COLUMNS} FROM users WHERE is_active = 0 ORDER BY created_at, id"
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}
