//! Slot booking and the approval workflow.
//!
//! A slot holds at most one pending or approved booking. `book_slot` checks
//! first so the common case gets a clean error, and the partial unique index
//! `bookings_one_active_per_slot` rejects whichever concurrent insert loses
//! the race.

use sqlx::SqlitePool;

use crate::availability;
use crate::error::{is_unique_violation, DatabaseError, Result};
use crate::models::{Booking, BookingDetail, BookingStatus};
use crate::validation::ValidationError;

const DETAIL_SELECT: &str = r#"
    SELECT b.id, b.availability_id, b.client_id, cu.username AS client_username,
           lu.id AS lawyer_user_id, lu.username AS lawyer_username,
           a.day, a.start_time, a.end_time, b.status, b.booked_at
    FROM bookings b
    JOIN availabilities a ON a.id = b.availability_id
    JOIN lawyer_profiles p ON p.id = a.lawyer_id
    JOIN users lu ON lu.id = p.user_id
    JOIN users cu ON cu.id = b.client_id
"#;

/// Whether a pending or approved booking holds the slot.
pub async fn is_slot_taken(pool: &SqlitePool, availability_id: i64) -> Result<bool> {
    let taken = sqlx::query_scalar::<_, bool>(
        r#"
        SELECT EXISTS(
            SELECT 1 FROM bookings
            WHERE availability_id = ? AND status IN ('pending', 'approved')
        )
        "#,
    )
    .bind(availability_id)
    .fetch_one(pool)
    .await?;

    Ok(taken)
}

/// Request a slot for the user `client_id`. The booking starts pending.
pub async fn book_slot(pool: &SqlitePool, availability_id: i64, client_id: i64) -> Result<Booking> {
    // Surfaces NotFound before the conflict check.
    availability::get_availability(pool, availability_id).await?;

    if is_slot_taken(pool, availability_id).await? {
        return Err(DatabaseError::SlotTaken { availability_id });
    }

    let booking = sqlx::query_as::<_, Booking>(
        r#"
        INSERT INTO bookings (availability_id, client_id, status)
        VALUES (?, ?, 'pending')
        RETURNING id, availability_id, client_id, status, booked_at
        "#,
    )
    .bind(availability_id)
    .bind(client_id)
    .fetch_one(pool)
    .await
    .map_err(|e| {
        if is_unique_violation(&e) {
            return DatabaseError::SlotTaken { availability_id };
        }
        DatabaseError::Sqlx(e)
    })?;

    tracing::info!(booking_id = booking.id, availability_id, client_id, "Slot booked");
    Ok(booking)
}

/// Get a booking with its slot and participants.
pub async fn get_booking(pool: &SqlitePool, id: i64) -> Result<BookingDetail> {
    sqlx::query_as::<_, BookingDetail>(&format!("{DETAIL_SELECT} WHERE b.id = ?"))
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| DatabaseError::not_found("Booking", id))
}

/// Approve or decline a booking on one of `lawyer_user_id`'s slots.
///
/// Only `approved` and `declined` are accepted. Re-activating a declined
/// booking fails with [`DatabaseError::SlotTaken`] when another booking
/// already holds the slot.
pub async fn update_booking_status(
    pool: &SqlitePool,
    booking_id: i64,
    lawyer_user_id: i64,
    status: &str,
) -> Result<BookingDetail> {
    let status: BookingStatus = status.parse()?;
    if status == BookingStatus::Pending {
        return Err(ValidationError::InvalidStatus(status.as_str().to_string()).into());
    }

    let current = get_booking(pool, booking_id).await?;
    if current.lawyer_user_id != lawyer_user_id {
        return Err(DatabaseError::not_found("Booking", booking_id));
    }

    sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
        .bind(status)
        .bind(booking_id)
        .execute(pool)
        .await
        .map_err(|e| {
            if is_unique_violation(&e) {
                return DatabaseError::SlotTaken {
                    availability_id: current.availability_id,
                };
            }
            DatabaseError::Sqlx(e)
        })?;

    tracing::info!(
        booking_id,
        from = current.status.as_str(),
        to = status.as_str(),
        "Booking status updated"
    );
    get_booking(pool, booking_id).await
}

/// Bookings made by a user, newest first.
pub async fn list_for_client(pool: &SqlitePool, client_id: i64) -> Result<Vec<BookingDetail>> {
    let bookings = sqlx::query_as::<_, BookingDetail>(&format!(
        "{DETAIL_SELECT} WHERE b.client_id = ? ORDER BY b.booked_at DESC, b.id DESC"
    ))
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

/// Bookings on a lawyer's slots, newest first.
pub async fn list_for_lawyer(pool: &SqlitePool, lawyer_user_id: i64) -> Result<Vec<BookingDetail>> {
    let bookings = sqlx::query_as::<_, BookingDetail>(&format!(
        "{DETAIL_SELECT} WHERE lu.id = ? ORDER BY b.booked_at DESC, b.id DESC"
    ))
    .bind(lawyer_user_id)
    .fetch_all(pool)
    .await?;

    Ok(bookings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::availability::{create_availability, list_slots};
    use crate::models::Weekday;
    use crate::schedule::Window;
    use crate::testing::{self, test_db};

    #[tokio::test]
    async fn test_second_booking_on_slot_rejected() {
        let db = test_db().await;
        let (_, profile) = testing::lawyer(&db, "counsel").await;
        let (first, _) = testing::client(&db, "first").await;
        let (second, _) = testing::client(&db, "second").await;
        let slot = create_availability(db.pool(), profile.id, &Window::full_day(Weekday::Mon))
            .await
            .unwrap();

        let booking = book_slot(db.pool(), slot.id, first.id).await.unwrap();
        assert_eq!(booking.status, BookingStatus::Pending);

        let err = book_slot(db.pool(), slot.id, second.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::SlotTaken { availability_id } if availability_id == slot.id));
    }

    #[tokio::test]
    async fn test_index_blocks_direct_duplicate_insert() {
        let db = test_db().await;
        let (_, profile) = testing::lawyer(&db, "counsel").await;
        let (first, _) = testing::client(&db, "first").await;
        let slot = create_availability(db.pool(), profile.id, &Window::full_day(Weekday::Mon))
            .await
            .unwrap();
        book_slot(db.pool(), slot.id, first.id).await.unwrap();

        // A racing request that skipped the existence check.
        let result = sqlx::query(
            "INSERT INTO bookings (availability_id, client_id, status) VALUES (?, ?, 'approved')",
        )
        .bind(slot.id)
        .bind(first.id)
        .execute(db.pool())
        .await;
        assert!(matches!(result, Err(ref e) if is_unique_violation(e)));
    }

    #[tokio::test]
    async fn test_declined_slot_can_be_rebooked() {
        let db = test_db().await;
        let (lawyer, profile) = testing::lawyer(&db, "counsel").await;
        let (first, _) = testing::client(&db, "first").await;
        let (second, _) = testing::client(&db, "second").await;
        let slot = create_availability(db.pool(), profile.id, &Window::full_day(Weekday::Tue))
            .await
            .unwrap();

        let booking = book_slot(db.pool(), slot.id, first.id).await.unwrap();
        let declined = update_booking_status(db.pool(), booking.id, lawyer.id, "declined")
            .await
            .unwrap();
        assert_eq!(declined.status, BookingStatus::Declined);
        assert!(!list_slots(db.pool(), profile.id).await.unwrap()[0].is_booked);

        let rebooked = book_slot(db.pool(), slot.id, second.id).await.unwrap();
        assert!(list_slots(db.pool(), profile.id).await.unwrap()[0].is_booked);

        // The first booking cannot come back while the slot is held.
        let err = update_booking_status(db.pool(), booking.id, lawyer.id, "approved")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::SlotTaken { .. }));

        let approved = update_booking_status(db.pool(), rebooked.id, lawyer.id, "approved")
            .await
            .unwrap();
        assert_eq!(approved.status, BookingStatus::Approved);
    }

    #[tokio::test]
    async fn test_status_update_checks_owner_and_value() {
        let db = test_db().await;
        let (_, profile) = testing::lawyer(&db, "counsel").await;
        let (intruder, _) = testing::lawyer(&db, "intruder").await;
        let (client, _) = testing::client(&db, "client").await;
        let slot = create_availability(db.pool(), profile.id, &Window::full_day(Weekday::Wed))
            .await
            .unwrap();
        let booking = book_slot(db.pool(), slot.id, client.id).await.unwrap();

        let err = update_booking_status(db.pool(), booking.id, intruder.id, "approved")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { .. }));

        let err = update_booking_status(db.pool(), booking.id, profile.user_id, "cancelled")
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            DatabaseError::Validation(ValidationError::InvalidStatus(_))
        ));

        let err = update_booking_status(db.pool(), booking.id, profile.user_id, "pending")
            .await
            .unwrap_err();
        assert!(matches!(err, DatabaseError::Validation(_)));
    }

    #[tokio::test]
    async fn test_booking_lists() {
        let db = test_db().await;
        let (lawyer, profile) = testing::lawyer(&db, "counsel").await;
        let (client, _) = testing::client(&db, "client").await;
        let mon = create_availability(db.pool(), profile.id, &Window::full_day(Weekday::Mon))
            .await
            .unwrap();
        let fri = create_availability(db.pool(), profile.id, &Window::full_day(Weekday::Fri))
            .await
            .unwrap();
        book_slot(db.pool(), mon.id, client.id).await.unwrap();
        book_slot(db.pool(), fri.id, client.id).await.unwrap();

        let mine = list_for_client(db.pool(), client.id).await.unwrap();
        assert_eq!(mine.len(), 2);
        assert_eq!(mine[0].day, Weekday::Fri);
        assert_eq!(mine[0].lawyer_username, "counsel");

        let theirs = list_for_lawyer(db.pool(), lawyer.id).await.unwrap();
        assert_eq!(theirs.len(), 2);
        assert!(theirs.iter().all(|b| b.client_username == "client"));
    }

    #[tokio::test]
    async fn test_book_missing_slot() {
        let db = test_db().await;
        let (client, _) = testing::client(&db, "client").await;
        let err = book_slot(db.pool(), 77, client.id).await.unwrap_err();
        assert!(matches!(err, DatabaseError::NotFound { entity: "Availability", .. }));
    }
}
