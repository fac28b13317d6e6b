//! API Layer
//!
//! Axum routers and handlers over the service layer. POST flows
//! answer with 302 redirects carrying query markers, matching the
//! cookie-session browser surface; reads answer JSON.

pub mod admin;
pub mod auth;
pub mod common;
pub mod events;
pub mod middleware;
pub mod registrations;

use axum::Router;

pub use common::found;
pub use middleware::{AdminUser, AppState, Authenticated, CurrentUser};

/// Assemble the full application router.
pub fn router(state: AppState) -> Router {
    Router::new()
        .merge(auth::routes())
        .merge(events::routes())
        .merge(registrations::routes())
        .merge(admin::routes())
        .with_state(state)
}
