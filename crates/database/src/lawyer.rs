//! Lawyer accounts and public profiles.

use serde::Deserialize;
use sqlx::SqlitePool;

use crate::error::{DatabaseError, Result};
use crate::models::{LawyerProfile, LawyerSummary, Role, User};
use crate::user::{self, NewUser};
use crate::validation::{normalize_email, optional, validate_username, ValidationError};

/// Fields for onboarding a lawyer.
#[derive(Debug, Clone, Deserialize)]
pub struct NewLawyer {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
    #[serde(default)]
    pub bio: String,
    #[serde(default)]
    pub photo: Option<String>,
}

/// Create an active lawyer account with its profile.
pub async fn create_lawyer(pool: &SqlitePool, new: &NewLawyer) -> Result<(User, LawyerProfile)> {
    let username = validate_username(&new.username)?;
    let email = normalize_email(&new.email)?;
    let photo = optional("photo", new.photo.as_deref(), 255)?;

    let mut tx = pool.begin().await?;

    if user::username_exists(&mut tx, &username).await? {
        return Err(ValidationError::Taken {
            field: "username".to_string(),
            message: "This username is already taken.".to_string(),
        }
        .into());
    }

    let account = user::insert_user(
        &mut tx,
        &NewUser {
            username,
            email,
            first_name: new.first_name.trim().to_string(),
            last_name: new.last_name.trim().to_string(),
            role: Role::Lawyer,
            is_active: true,
        },
    )
    .await?;

    let profile = sqlx::query_as::<_, LawyerProfile>(
        r#"
        INSERT INTO lawyer_profiles (user_id, bio, photo)
        VALUES (?, ?, ?)
        RETURNING id, user_id, bio, photo
        "#,
    )
    .bind(account.id)
    .bind(new.bio.trim())
    .bind(&photo)
    .fetch_one(&mut *tx)
    .await?;

    tx.commit().await?;

    tracing::info!(user_id = account.id, profile_id = profile.id, "Lawyer created");
    Ok((account, profile))
}

/// Get the profile owned by a lawyer's account.
pub async fn get_profile_for_user(pool: &SqlitePool, user_id: i64) -> Result<LawyerProfile> {
    sqlx::query_as::<_, LawyerProfile>(
        r#"
        SELECT id, user_id, bio, photo
        FROM lawyer_profiles
        WHERE user_id = ?
        "#,
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::NotFound {
        entity: "LawyerProfile",
        id: format!("user {}", user_id),
    })
}

/// Get a lawyer profile by its own ID.
pub async fn get_profile(pool: &SqlitePool, id: i64) -> Result<LawyerProfile> {
    sqlx::query_as::<_, LawyerProfile>(
        r#"
        SELECT id, user_id, bio, photo
        FROM lawyer_profiles
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("LawyerProfile", id))
}

/// List active lawyers with their profiles, by name.
pub async fn list_lawyers(pool: &SqlitePool) -> Result<Vec<LawyerSummary>> {
    let lawyers = sqlx::query_as::<_, LawyerSummary>(
        r#"
        SELECT p.id AS profile_id, u.id AS user_id, u.username, u.first_name, u.last_name,
               u.email, p.bio, p.photo
        FROM lawyer_profiles p
        JOIN users u ON u.id = p.user_id
        WHERE u.is_active = 1
        ORDER BY u.last_name, u.first_name, u.username
        "#,
    )
    .fetch_all(pool)
    .await?;

    Ok(lawyers)
}
