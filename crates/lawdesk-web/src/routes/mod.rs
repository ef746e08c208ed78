//! Route handlers for the Lawdesk API.

pub mod accounts;
pub mod appointments;
pub mod availability;
pub mod bookings;
pub mod cases;
pub mod chat;
pub mod chatbot;
pub mod clients;
pub mod contact;
pub mod dashboard;
pub mod health;
pub mod lawyers;
pub mod profile;

use axum::routing::{get, post, put};
use axum::Router;

use crate::state::AppState;

/// Build the router with all routes.
pub fn router() -> Router<AppState> {
    Router::new()
        // Public
        .route("/health", get(health::health))
        .route("/contact", post(contact::submit).get(contact::list))
        .route("/register", post(accounts::register))
        .route("/chatbot", post(chatbot::reply))
        .route("/ws/chat/:room", get(chat::socket))
        // Accounts and profiles
        .route("/users/pending", get(accounts::pending))
        .route("/users/:id/activate", post(accounts::activate))
        .route("/profile", get(profile::show).put(profile::update))
        .route("/dashboard", get(dashboard::dashboard))
        // Clients, cases, documents
        .route("/clients", post(clients::create))
        .route(
            "/clients/:id",
            get(clients::show).put(clients::update).delete(clients::remove),
        )
        .route("/cases", post(cases::create))
        .route("/cases/:id", get(cases::show).put(cases::update))
        .route("/cases/:id/documents", post(cases::upload_document))
        // Lawyers, availability, bookings
        .route("/lawyers", get(lawyers::list).post(lawyers::create))
        .route("/lawyers/:user_id/availability", get(availability::for_lawyer))
        .route("/availability", get(availability::mine).post(availability::create))
        .route(
            "/availability/:id",
            put(availability::update).delete(availability::remove),
        )
        .route("/availability/:id/book", post(bookings::book))
        .route("/bookings", get(bookings::mine))
        .route("/lawyer/bookings", get(bookings::for_lawyer))
        .route("/bookings/:id/status/:status", post(bookings::update_status))
        .route("/appointments", get(appointments::list).post(appointments::create))
        // Chat history
        .route("/chat/:room/messages", get(chat::history))
}
