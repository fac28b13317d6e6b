//! API Middleware
//!
//! Application state and the request-identity extractors. Identity is
//! resolved once per request from the opaque session cookie; a
//! missing or stale cookie means anonymous, never an error.

use std::sync::Arc;

use axum::extract::{FromRef, FromRequestParts};
use axum::http::request::Parts;
use axum::response::{IntoResponse, Response};
use axum_extra::extract::cookie::CookieJar;

use crate::domain::{checks, User};
use crate::service::{AdminService, AuthService, EventService, RegistrationService};

pub const SESSION_COOKIE: &str = "session";

/// Application state containing shared services.
#[derive(Clone)]
pub struct AppState {
    pub auth: Arc<AuthService>,
    pub events: Arc<EventService>,
    pub registrations: Arc<RegistrationService>,
    pub admin: Arc<AdminService>,
}

/// Request identity; `None` for anonymous callers.
pub struct CurrentUser(pub Option<User>);

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let state = AppState::from_ref(state);
        let jar = CookieJar::from_headers(&parts.headers);

        let user = match jar.get(SESSION_COOKIE) {
            Some(cookie) => state.auth.resolve(cookie.value()).await.unwrap_or_else(|e| {
                tracing::warn!(error = %e, "session resolution failed");
                None
            }),
            None => None,
        };

        Ok(CurrentUser(user))
    }
}

/// Extractor for routes requiring a logged-in user. Anonymous callers
/// are redirected to the login page.
pub struct Authenticated(pub User);

#[axum::async_trait]
impl<S> FromRequestParts<S> for Authenticated
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state)
            .await
            .unwrap_or(CurrentUser(None));
        match user {
            Some(user) => Ok(Authenticated(user)),
            None => Err(crate::api::found("/login")),
        }
    }
}

/// Extractor for admin-only routes.
pub struct AdminUser(pub User);

#[axum::async_trait]
impl<S> FromRequestParts<S> for AdminUser
where
    AppState: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Authenticated(user) = Authenticated::from_request_parts(parts, state).await?;
        checks::require_admin(&user).map_err(IntoResponse::into_response)?;
        Ok(AdminUser(user))
    }
}
