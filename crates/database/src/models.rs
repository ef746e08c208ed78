//! Database models.

use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDate, NaiveTime};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use crate::validation::ValidationError;

/// Account role. Admins and lawyers are staff.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Lawyer,
    Client,
}

impl Role {
    /// Staff may see every client and case.
    pub fn is_staff(self) -> bool {
        matches!(self, Role::Admin | Role::Lawyer)
    }
}

/// Lifecycle of a legal case.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum CaseStatus {
    #[default]
    Open,
    Pending,
    Closed,
}

/// Approval state of a booking.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum BookingStatus {
    #[default]
    Pending,
    Approved,
    Declined,
}

impl BookingStatus {
    /// Pending and approved bookings occupy their slot.
    pub fn is_active(self) -> bool {
        matches!(self, BookingStatus::Pending | BookingStatus::Approved)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            BookingStatus::Pending => "pending",
            BookingStatus::Approved => "approved",
            BookingStatus::Declined => "declined",
        }
    }
}

impl FromStr for BookingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "pending" => Ok(BookingStatus::Pending),
            "approved" => Ok(BookingStatus::Approved),
            "declined" => Ok(BookingStatus::Declined),
            other => Err(ValidationError::InvalidStatus(other.to_string())),
        }
    }
}

/// A working weekday. Weekends cannot be represented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "UPPERCASE")]
#[serde(rename_all = "UPPERCASE", try_from = "String")]
pub enum Weekday {
    Mon,
    Tue,
    Wed,
    Thu,
    Fri,
}

impl Weekday {
    /// All working days, Monday first.
    pub const ALL: [Weekday; 5] = [
        Weekday::Mon,
        Weekday::Tue,
        Weekday::Wed,
        Weekday::Thu,
        Weekday::Fri,
    ];

    /// Three-letter code stored in the database.
    pub fn code(self) -> &'static str {
        match self {
            Weekday::Mon => "MON",
            Weekday::Tue => "TUE",
            Weekday::Wed => "WED",
            Weekday::Thu => "THU",
            Weekday::Fri => "FRI",
        }
    }

    /// Full English name.
    pub fn display_name(self) -> &'static str {
        match self {
            Weekday::Mon => "Monday",
            Weekday::Tue => "Tuesday",
            Weekday::Wed => "Wednesday",
            Weekday::Thu => "Thursday",
            Weekday::Fri => "Friday",
        }
    }

    /// Working day of a calendar weekday; `None` on Saturday and Sunday.
    pub fn from_chrono(day: chrono::Weekday) -> Option<Self> {
        match day {
            chrono::Weekday::Mon => Some(Weekday::Mon),
            chrono::Weekday::Tue => Some(Weekday::Tue),
            chrono::Weekday::Wed => Some(Weekday::Wed),
            chrono::Weekday::Thu => Some(Weekday::Thu),
            chrono::Weekday::Fri => Some(Weekday::Fri),
            chrono::Weekday::Sat | chrono::Weekday::Sun => None,
        }
    }
}

impl fmt::Display for Weekday {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

impl FromStr for Weekday {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value = s.trim().to_uppercase();
        Weekday::ALL
            .into_iter()
            .find(|day| day.code() == value || day.display_name().to_uppercase() == value)
            .ok_or(ValidationError::InvalidWeekday(s.trim().to_string()))
    }
}

impl TryFrom<String> for Weekday {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// A user account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub first_name: String,
    pub last_name: String,
    pub role: Role,
    /// Registered clients stay inactive until an admin approves them.
    pub is_active: bool,
    pub created_at: String,
}

impl User {
    /// "First Last", or an empty string when neither is set.
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
            .trim()
            .to_string()
    }
}

/// A client profile.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Client {
    pub id: i64,
    pub user_id: Option<i64>,
    pub name: String,
    /// Lowercased, unique across clients.
    pub email: String,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub date_of_birth: Option<NaiveDate>,
    pub created_at: String,
    pub updated_at: String,
}

/// Public-facing lawyer details.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LawyerProfile {
    pub id: i64,
    pub user_id: i64,
    pub bio: String,
    /// Path into external file storage.
    pub photo: Option<String>,
}

/// A lawyer profile joined with its account, as listed to visitors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct LawyerSummary {
    pub profile_id: i64,
    pub user_id: i64,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub bio: String,
    pub photo: Option<String>,
}

/// A legal matter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Case {
    pub id: i64,
    pub title: String,
    pub client_id: i64,
    pub description: String,
    /// Assigned lawyer's user ID; cleared if the account is deleted.
    pub lawyer_id: Option<i64>,
    pub status: CaseStatus,
    pub opened_on: NaiveDate,
    pub due_date: Option<NaiveDate>,
}

/// Document metadata; the file itself lives in external storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Document {
    pub id: i64,
    pub title: String,
    pub case_id: i64,
    pub file_path: String,
    pub uploaded_at: String,
}

/// An anonymous contact-form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Visitor {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub message: String,
    pub submitted_at: String,
}

/// A lawyer's recurring weekly window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Availability {
    pub id: i64,
    /// Lawyer profile ID.
    pub lawyer_id: i64,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
}

/// An availability window annotated with its booking state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct AvailabilitySlot {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub availability: Availability,
    /// True when a pending or approved booking holds the slot.
    pub is_booked: bool,
}

/// A client's request to occupy an availability slot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub availability_id: i64,
    /// Booking user's ID.
    pub client_id: i64,
    pub status: BookingStatus,
    pub booked_at: String,
}

/// A booking joined with its slot and the people involved.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct BookingDetail {
    pub id: i64,
    pub availability_id: i64,
    pub client_id: i64,
    pub client_username: String,
    pub lawyer_user_id: i64,
    pub lawyer_username: String,
    pub day: Weekday,
    pub start_time: NaiveTime,
    pub end_time: NaiveTime,
    pub status: BookingStatus,
    pub booked_at: String,
}

/// A dated appointment with a lawyer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Appointment {
    pub id: i64,
    pub client_id: i64,
    /// Lawyer profile ID.
    pub lawyer_id: i64,
    pub date: NaiveDate,
    pub time: NaiveTime,
    pub message: Option<String>,
}

/// A persisted chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Message {
    pub id: i64,
    pub room: String,
    pub sender_id: i64,
    pub sender_username: String,
    pub text: String,
    pub timestamp: String,
}
