//! Application state shared across handlers.

use std::sync::Arc;

use assistant::Assistant;
use chrono::NaiveDate;
use database::Database;
use relay::RoomHub;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Database connection.
    pub db: Database,
    /// Live chat rooms.
    pub hub: RoomHub,
    /// Legal chatbot; `None` when no API key is configured.
    pub assistant: Option<Arc<dyn Assistant>>,
}

impl AppState {
    /// Create new application state.
    pub fn new(db: Database, assistant: Option<Arc<dyn Assistant>>) -> Self {
        Self {
            db,
            hub: RoomHub::new(),
            assistant,
        }
    }

    /// Local calendar date used for age and past-date checks.
    pub fn today(&self) -> NaiveDate {
        chrono::Local::now().date_naive()
    }
}
