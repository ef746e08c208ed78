//! Lawyer weekly availability.
//!
//! Windows are validated on every create and update; the table's
//! `UNIQUE (lawyer_id, day)` keeps one window per lawyer and weekday.

use sqlx::SqlitePool;

use crate::error::{is_unique_violation, DatabaseError, Result};
use crate::models::{Availability, AvailabilitySlot, Weekday};
use crate::schedule::{validate_window, Window};

const DAY_ORDER: &str = "CASE day WHEN 'MON' THEN 1 WHEN 'TUE' THEN 2 WHEN 'WED' THEN 3 \
                         WHEN 'THU' THEN 4 WHEN 'FRI' THEN 5 END";

fn day_taken(lawyer_id: i64, day: Weekday) -> DatabaseError {
    DatabaseError::AlreadyExists {
        entity: "Availability",
        id: format!("lawyer {} on {}", lawyer_id, day.code()),
    }
}

/// Add a window for a lawyer profile.
pub async fn create_availability(
    pool: &SqlitePool,
    lawyer_id: i64,
    window: &Window,
) -> Result<Availability> {
    validate_window(window)?;

    let availability = sqlx::query_as::<_, Availability>(
        r#"
        INSERT INTO availabilities (lawyer_id, day, start_time, end_time)
        VALUES (?, ?, ?, ?)
        RETURNING id, lawyer_id, day, start_time, end_time
        "#,
    )
    .bind(lawyer_id)
    .bind(window.day)
    .bind(window.start_time)
    .bind(window.end_time)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return day_taken(lawyer_id, window.day);
        }
        DatabaseError::Sqlx(e)
    })?;

    tracing::info!(
        availability_id = availability.id,
        lawyer_id,
        day = window.day.code(),
        "Availability added"
    );
    Ok(availability)
}

/// Get a window by ID.
pub async fn get_availability(pool: &SqlitePool, id: i64) -> Result<Availability> {
    sqlx::query_as::<_, Availability>(
        r#"
        SELECT id, lawyer_id, day, start_time, end_time
        FROM availabilities
        WHERE id = ?
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await?
    .ok_or_else(|| DatabaseError::not_found("Availability", id))
}

/// Replace a window owned by `lawyer_id`.
pub async fn update_availability(
    pool: &SqlitePool,
    id: i64,
    lawyer_id: i64,
    window: &Window,
) -> Result<Availability> {
    validate_window(window)?;

    sqlx::query_as::<_, Availability>(
        r#"
        UPDATE availabilities
        SET day = ?, start_time = ?, end_time = ?
        WHERE id = ? AND lawyer_id = ?
        RETURNING id, lawyer_id, day, start_time, end_time
        "#,
    )
    .bind(window.day)
    .bind(window.start_time)
    .bind(window.end_time)
    .bind(id)
    .bind(lawyer_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return day_taken(lawyer_id, window.day);
        }
        DatabaseError::Sqlx(e)
    })?
    .ok_or_else(|| DatabaseError::not_found("Availability", id))
}

/// Remove a window owned by `lawyer_id`, with its bookings.
pub async fn delete_availability(pool: &SqlitePool, id: i64, lawyer_id: i64) -> Result<()> {
    let result = sqlx::query(
        r#"
        DELETE FROM availabilities
        WHERE id = ? AND lawyer_id = ?
        "#,
    )
    .bind(id)
    .bind(lawyer_id)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        return Err(DatabaseError::not_found("Availability", id));
    }

    Ok(())
}

/// A lawyer's windows, Monday first.
pub async fn list_for_lawyer(pool: &SqlitePool, lawyer_id: i64) -> Result<Vec<Availability>> {
    let slots = sqlx::query_as::<_, Availability>(&format!(
        r#"
        SELECT id, lawyer_id, day, start_time, end_time
        FROM availabilities
        WHERE lawyer_id = ?
        ORDER BY {DAY_ORDER}, start_time
        "#
    ))
    .bind(lawyer_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// A lawyer's windows with `is_booked` set when a pending or approved
/// booking holds the slot.
pub async fn list_slots(pool: &SqlitePool, lawyer_id: i64) -> Result<Vec<AvailabilitySlot>> {
    let slots = sqlx::query_as::<_, AvailabilitySlot>(&format!(
        r#"
        SELECT id, lawyer_id, day, start_time, end_time,
               EXISTS(
                   SELECT 1 FROM bookings b
                   WHERE b.availability_id = availabilities.id
                     AND b.status IN ('pending', 'approved')
               ) AS is_booked
        FROM availabilities
        WHERE lawyer_id = ?
        ORDER BY {DAY_ORDER}, start_time
        "#
    ))
    .bind(lawyer_id)
    .fetch_all(pool)
    .await?;

    Ok(slots)
}

/// The lawyer's window on `day`, if any.
pub async fn find_for_day(
    pool: &SqlitePool,
    lawyer_id: i64,
    day: Weekday,
) -> Result<Option<Availability>> {
    let slot = sqlx::query_as::<_, Availability>(
        r#"
        SELECT id, lawyer_id, day, start_time, end_time
        FROM availabilities
        WHERE lawyer_id = ? AND day = ?
        "#,
    )
    .bind(lawyer_id)
    .bind(day)
    .fetch_optional(pool)
    .await?;

    Ok(slot)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{self, test_db};
    use crate::ValidationError;
    use chrono::NaiveTime;

    fn t(h: u32, m: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(h, m, 0).unwrap()
    }

    fn window(day: Weekday, start: NaiveTime, end: NaiveTime) -> Window {
        Window {
            day,
            start_time: start,
            end_time: end,
        }
    }

    #[tokio::test]
    async fn test_create_and_order_windows() {
        let db = test_db().await;
        let (_, profile) = testing::lawyer(&db, "counsel").await;

        create_availability(db.pool(), profile.id, &window(Weekday::Fri, t(8, 0), t(12, 0)))
            .await
            .unwrap();
        create_availability(db.pool(), profile.id, &Window::full_day(Weekday::Mon))
            .await
            .unwrap();

        let slots = list_for_lawyer(db.pool(), profile.id).await.unwrap();
        let days: Vec<Weekday> = slots.iter().map(|s| s.day).collect();
        assert_eq!(days, vec![Weekday::Mon, Weekday::Fri]);
        assert_eq!(slots[0].start_time, t(8, 0));
        assert_eq!(slots[0].end_time, t(16, 0));
    }

    #[tokio::test]
    async fn test_one_window_per_day() {
        let db = test_db().await;
        let (_, profile) = testing::lawyer(&db, "counsel").await;

        create_availability(db.pool(), profile.id, &Window::full_day(Weekday::Tue))
            .await
            .unwrap();
        let err = create_availability(db.pool(), profile.id, &window(Weekday::Tue, t(9, 0), t(10, 0)))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::AlreadyExists { .. }));
    }

    #[tokio::test]
    async fn test_invalid_windows_never_stored() {
        let db = test_db().await;
        let (_, profile) = testing::lawyer(&db, "counsel").await;

        let err = create_availability(db.pool(), profile.id, &window(Weekday::Wed, t(7, 0), t(12, 0)))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Validation(ValidationError::OutsideBusinessHours)
        ));

        let slot = create_availability(db.pool(), profile.id, &Window::full_day(Weekday::Wed))
            .await
            .unwrap();
        let err = update_availability(
            db.pool(),
            slot.id,
            profile.id,
            &window(Weekday::Wed, t(14, 0), t(9, 0)),
        )
        .await
        .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Validation(ValidationError::StartNotBeforeEnd)
        ));

        let stored = get_availability(db.pool(), slot.id).await.unwrap();
        assert_eq!(stored.start_time, t(8, 0));
    }

    #[tokio::test]
    async fn test_update_and_delete_require_owner() {
        let db = test_db().await;
        let (_, owner) = testing::lawyer(&db, "owner").await;
        let (_, other) = testing::lawyer(&db, "other").await;
        let slot = create_availability(db.pool(), owner.id, &Window::full_day(Weekday::Thu))
            .await
            .unwrap();

        let err = update_availability(db.pool(), slot.id, other.id, &Window::full_day(Weekday::Fri))
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));
        assert!(delete_availability(db.pool(), slot.id, other.id).await.is_err());

        let moved = update_availability(
            db.pool(),
            slot.id,
            owner.id,
            &window(Weekday::Fri, t(10, 0), t(15, 30)),
        )
        .await
        .unwrap();
        assert_eq!(moved.day, Weekday::Fri);
        assert_eq!(
            find_for_day(db.pool(), owner.id, Weekday::Fri).await.unwrap(),
            Some(moved)
        );

        delete_availability(db.pool(), slot.id, owner.id).await.unwrap();
        assert!(list_for_lawyer(db.pool(), owner.id).await.unwrap().is_empty());
    }
}
