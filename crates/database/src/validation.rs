//! Input validation and normalization for form fields.

use std::fmt;

use chrono::{Datelike, NaiveDate, NaiveTime};

/// Validation error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Empty value where one is required.
    Empty(String),
    /// Invalid email format.
    InvalidEmail(String),
    /// Value too long.
    TooLong { field: String, max: usize, actual: usize },
    /// Value contains characters the field does not accept.
    InvalidCharacters { field: String, allowed: String },
    /// Value already used by another record.
    Taken { field: String, message: String },
    /// Date of birth makes the person younger than [`MINIMUM_AGE`].
    Underage,
    /// Availability window leaves business hours.
    OutsideBusinessHours,
    /// Availability window does not start before it ends.
    StartNotBeforeEnd,
    /// Not a Monday-to-Friday day code.
    InvalidWeekday(String),
    /// Appointment date lies in the past.
    PastDate,
    /// Lawyer has no availability on that day of the week.
    LawyerUnavailable(String),
    /// Appointment time falls outside the lawyer's window for that day.
    OutsideWindow { start: NaiveTime, end: NaiveTime },
    /// Booking status outside the allowed transitions.
    InvalidStatus(String),
}

impl ValidationError {
    /// Form field the error belongs to; `non_field_errors` for cross-field checks.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Empty(field)
            | ValidationError::TooLong { field, .. }
            | ValidationError::InvalidCharacters { field, .. }
            | ValidationError::Taken { field, .. } => field.as_str(),
            ValidationError::InvalidEmail(_) => "email",
            ValidationError::Underage => "date_of_birth",
            ValidationError::InvalidWeekday(_) => "day",
            ValidationError::PastDate | ValidationError::LawyerUnavailable(_) => "date",
            ValidationError::OutsideWindow { .. } => "time",
            ValidationError::InvalidStatus(_) => "status",
            ValidationError::OutsideBusinessHours | ValidationError::StartNotBeforeEnd => {
                "non_field_errors"
            }
        }
    }
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::Empty(field) => write!(f, "{} cannot be empty", field),
            ValidationError::InvalidEmail(msg) => write!(f, "Invalid email: {}", msg),
            ValidationError::TooLong { field, max, actual } => {
                write!(f, "{} is too long ({} chars, max {})", field, actual, max)
            }
            ValidationError::InvalidCharacters { field, allowed } => {
                write!(f, "{} may only contain {}", field, allowed)
            }
            ValidationError::Taken { message, .. } => f.write_str(message),
            ValidationError::Underage => write!(
                f,
                "You must be at least {} years old.",
                MINIMUM_AGE
            ),
            ValidationError::OutsideBusinessHours => write!(
                f,
                "Availability must be between {} and {}",
                OPENING_TIME.format("%H:%M"),
                CLOSING_TIME.format("%H:%M")
            ),
            ValidationError::StartNotBeforeEnd => f.write_str("Start time must be before end time."),
            ValidationError::InvalidWeekday(day) => write!(
                f,
                "Availability can only be set for weekdays (Monday to Friday), got '{}'",
                day
            ),
            ValidationError::PastDate => {
                f.write_str("Cannot book an appointment for a past date.")
            }
            ValidationError::LawyerUnavailable(day) => {
                write!(f, "Lawyer is not available on {}.", day)
            }
            ValidationError::OutsideWindow { start, end } => write!(
                f,
                "Appointment time must be between {} and {}.",
                start.format("%H:%M"),
                end.format("%H:%M")
            ),
            ValidationError::InvalidStatus(status) => {
                write!(f, "Unsupported booking status '{}'", status)
            }
        }
    }
}

impl std::error::Error for ValidationError {}

/// Maximum allowed length for email addresses.
pub const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum allowed length for client names.
pub const MAX_NAME_LENGTH: usize = 100;

/// Maximum allowed length for usernames.
pub const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum allowed length for phone numbers.
pub const MAX_PHONE_LENGTH: usize = 20;

/// Maximum allowed length for case and document titles.
pub const MAX_TITLE_LENGTH: usize = 255;

/// Minimum client age in whole years.
pub const MINIMUM_AGE: i32 = 18;

/// Earliest time an availability window may start.
pub const OPENING_TIME: NaiveTime = match NaiveTime::from_hms_opt(8, 0, 0) {
    Some(t) => t,
    None => panic!("invalid opening time"),
};

/// Latest time an availability window may end.
pub const CLOSING_TIME: NaiveTime = match NaiveTime::from_hms_opt(16, 0, 0) {
    Some(t) => t,
    None => panic!("invalid closing time"),
};

/// Validate an email address (basic RFC 5322 format check).
///
/// This is a basic validation that checks:
/// - Contains exactly one @
/// - Has at least one character before @
/// - Has at least one dot after @
/// - Is not too long
pub fn validate_email(email: &str) -> Result<(), ValidationError> {
    let email = email.trim();

    if email.is_empty() {
        return Err(ValidationError::Empty("email".to_string()));
    }

    if email.len() > MAX_EMAIL_LENGTH {
        return Err(ValidationError::TooLong {
            field: "email".to_string(),
            max: MAX_EMAIL_LENGTH,
            actual: email.len(),
        });
    }

    let Some((local, domain)) = email.split_once('@') else {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    };

    if domain.contains('@') {
        return Err(ValidationError::InvalidEmail(
            "must contain exactly one @ symbol".to_string(),
        ));
    }

    if local.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing local part (before @)".to_string(),
        ));
    }

    if local.chars().any(char::is_whitespace) || domain.chars().any(char::is_whitespace) {
        return Err(ValidationError::InvalidEmail(
            "cannot contain whitespace".to_string(),
        ));
    }

    if domain.is_empty() {
        return Err(ValidationError::InvalidEmail(
            "missing domain (after @)".to_string(),
        ));
    }

    if !domain.contains('.') {
        return Err(ValidationError::InvalidEmail(
            "domain must contain at least one dot".to_string(),
        ));
    }

    if domain.starts_with('.') || domain.ends_with('.') {
        return Err(ValidationError::InvalidEmail(
            "domain cannot start or end with a dot".to_string(),
        ));
    }

    if domain.contains("..") {
        return Err(ValidationError::InvalidEmail(
            "domain cannot contain consecutive dots".to_string(),
        ));
    }

    Ok(())
}

/// Trim, lowercase and validate an email address.
pub fn normalize_email(email: &str) -> Result<String, ValidationError> {
    let email = email.trim().to_lowercase();
    validate_email(&email)?;
    Ok(email)
}

/// Trim a required field, rejecting blank and oversized values.
pub fn require(field: &str, value: &str, max: usize) -> Result<String, ValidationError> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::Empty(field.to_string()));
    }

    let actual = value.chars().count();
    if actual > max {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max,
            actual,
        });
    }

    Ok(value.to_string())
}

/// Trim an optional field; blank becomes `None`.
pub fn optional(
    field: &str,
    value: Option<&str>,
    max: usize,
) -> Result<Option<String>, ValidationError> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(value) => require(field, value, max).map(Some),
    }
}

/// Collapse whitespace and capitalize each part of a person's name.
///
/// `"  jOHN   smith "` becomes `"John Smith"`.
pub fn normalize_name(name: &str) -> Result<String, ValidationError> {
    let name = require("name", name, MAX_NAME_LENGTH)?;

    Ok(name
        .split_whitespace()
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" "))
}

fn capitalize(part: &str) -> String {
    let mut chars = part.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Split a full name into first name and the remainder.
pub fn split_name(name: &str) -> (String, String) {
    match name.trim().split_once(' ') {
        Some((first, last)) => (first.to_string(), last.trim().to_string()),
        None => (name.trim().to_string(), String::new()),
    }
}

/// Validate a username: letters, digits and `@.+-_`.
pub fn validate_username(username: &str) -> Result<String, ValidationError> {
    let username = require("username", username, MAX_USERNAME_LENGTH)?;

    if !username
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '@' | '.' | '+' | '-' | '_'))
    {
        return Err(ValidationError::InvalidCharacters {
            field: "username".to_string(),
            allowed: "letters, digits and @/./+/-/_".to_string(),
        });
    }

    Ok(username)
}

/// Whole years elapsed between `date_of_birth` and `today`.
pub fn age_on(date_of_birth: NaiveDate, today: NaiveDate) -> i32 {
    let had_birthday =
        (today.month(), today.day()) >= (date_of_birth.month(), date_of_birth.day());
    today.year() - date_of_birth.year() - if had_birthday { 0 } else { 1 }
}

/// Reject dates of birth younger than [`MINIMUM_AGE`].
pub fn validate_adult(date_of_birth: NaiveDate, today: NaiveDate) -> Result<(), ValidationError> {
    if age_on(date_of_birth, today) < MINIMUM_AGE {
        return Err(ValidationError::Underage);
    }
    Ok(())
}
