//! Dated appointments checked against the lawyer's weekly windows.

use chrono::{NaiveDate, NaiveTime};
use serde::Deserialize;
use sqlx::SqlitePool;

use crate::availability;
use crate::error::Result;
use crate::lawyer;
use crate::models::Appointment;
use crate::schedule::{validate_appointment, weekday_of};
use crate::validation::optional;

/// Appointment form input.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentInput {
    /// Lawyer profile ID.
    pub lawyer_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    #[serde(default)]
    pub message: Option<String>,
}

/// Book an appointment for a client profile.
///
/// Rejected when the date is before `today`, when the lawyer has no window
/// on that weekday, or when the time falls outside it.
pub async fn create_appointment(
    pool: &SqlitePool,
    client_id: i64,
    input: &AppointmentInput,
    today: NaiveDate,
) -> Result<Appointment> {
    lawyer::get_profile(pool, input.lawyer_id).await?;

    let window = match weekday_of(input.date) {
        Some(day) => availability::find_for_day(pool, input.lawyer_id, day).await?,
        None => None,
    };
    validate_appointment(input.date, input.time, today, window.as_ref())?;

    let message = optional("message", input.message.as_deref(), 10_000)?;

    let appointment = sqlx::query_as::<_, Appointment>(
        r#"
        INSERT INTO appointments (client_id, lawyer_id, date, time, message)
        VALUES (?, ?, ?, ?, ?)
        RETURNING id, client_id, lawyer_id, date, time, message
        "#,
    )
    .bind(client_id)
    .bind(input.lawyer_id)
    .bind(input.date)
    .bind(input.time)
    .bind(&message)
    .fetch_one(pool)
    .await?;

    tracing::info!(
        appointment_id = appointment.id,
        client_id,
        lawyer_id = input.lawyer_id,
        date = %input.date,
        "Appointment booked"
    );
    Ok(appointment)
}

/// A client's appointments, soonest first.
pub async fn list_for_client(pool: &SqlitePool, client_id: i64) -> Result<Vec<Appointment>> {
    let appointments = sqlx::query_as::<_, Appointment>(
        r#"
        SELECT id, client_id, lawyer_id, date, time, message
        FROM appointments
        WHERE client_id = ?
        ORDER BY date, time
        "#,
    )
    .bind(client_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}

/// Appointments with a lawyer profile, soonest first.
pub async fn list_for_lawyer(pool: &SqlitePool, lawyer_id: i64) -> Result<Vec<Appointment>> {
    let appointments = sqlx::query_as::<_, Appointment>(
        r#"
        SELECT id, client_id, lawyer_id, date, time, message
        FROM appointments
        WHERE lawyer_id = ?
        ORDER BY date, time
        "#,
    )
    .bind(lawyer_id)
    .fetch_all(pool)
    .await?;

    Ok(appointments)
}
