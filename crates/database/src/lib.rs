//! SQLite persistence layer for Lawdesk.
//!
//! This crate provides async database operations for clients, cases,
//! documents, lawyer availability and bookings using SQLx with SQLite, plus
//! the validation rules every write path runs through.
//!
//! # Example
//!
//! ```no_run
//! use database::{availability, booking, schedule::Window, Database, Weekday};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Connect and run migrations
//!     let db = Database::connect("sqlite:lawdesk.db?mode=rwc").await?;
//!     db.migrate().await?;
//!
//!     // Open Monday for lawyer profile 1 and let user 7 book it
//!     let slot = availability::create_availability(db.pool(), 1, &Window::full_day(Weekday::Mon)).await?;
//!     booking::book_slot(db.pool(), slot.id, 7).await?;
//!
//!     Ok(())
//! }
//! ```

pub mod appointment;
pub mod availability;
pub mod booking;
pub mod case;
pub mod client;
pub mod document;
pub mod error;
pub mod lawyer;
pub mod message;
pub mod models;
pub mod registration;
pub mod schedule;
pub mod user;
pub mod validation;
pub mod visitor;

pub use error::{DatabaseError, Result};
pub use models::{
    Appointment, Availability, AvailabilitySlot, Booking, BookingDetail, BookingStatus, Case,
    CaseStatus, Client, Document, LawyerProfile, LawyerSummary, Message, Role, User, Visitor,
    Weekday,
};
pub use validation::ValidationError;

use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

/// Database connection wrapper.
#[derive(Debug, Clone)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Default pool size for database connections.
    const DEFAULT_POOL_SIZE: u32 = 20;

    /// Connect to a SQLite database.
    ///
    /// The URL should be in the format `sqlite:path/to/db.sqlite?mode=rwc`.
    /// Use `?mode=rwc` to create the database file if it doesn't exist.
    ///
    /// # Example
    ///
    /// ```no_run
    /// # async fn example() -> database::Result<()> {
    /// // File database
    /// let db = database::Database::connect("sqlite:data/lawdesk.db?mode=rwc").await?;
    ///
    /// // In-memory database (for testing)
    /// let db = database::Database::connect("sqlite::memory:").await?;
    /// # Ok(())
    /// # }
    /// ```
    pub async fn connect(url: &str) -> Result<Self> {
        Self::connect_with_pool_size(url, Self::DEFAULT_POOL_SIZE).await
    }

    /// Connect to a SQLite database with a custom pool size.
    pub async fn connect_with_pool_size(url: &str, pool_size: u32) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(url)?
            .create_if_missing(true)
            .foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(pool_size)
            .acquire_timeout(std::time::Duration::from_secs(30))
            .connect_with(options)
            .await?;

        tracing::info!(
            "Connected to database: {} (pool size: {})",
            url,
            pool_size
        );

        Ok(Self { pool })
    }

    /// Run database migrations.
    ///
    /// This should be called once after connecting to ensure the schema is up to date.
    pub async fn migrate(&self) -> Result<()> {
        tracing::info!("Running database migrations...");

        sqlx::migrate!("./migrations").run(&self.pool).await?;

        tracing::info!("Migrations complete");
        Ok(())
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the database connection pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
