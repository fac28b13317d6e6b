//! Registration Endpoints
//!
//! - POST /events/:id/register - guest or member registration
//! - POST /events/:id/cancel   - member cancellation
//! - GET  /attendee/registrations - the caller's active registrations
//!
//! Success paths redirect back to the event page with a query marker:
//! `?success=1` for a new registration, `?registered=1` when a member
//! was already registered, `?already=1` for a repeat guest email.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use serde::{Deserialize, Serialize};

use crate::api::common::found;
use crate::api::middleware::{AppState, Authenticated, CurrentUser};
use crate::error::Result;
use crate::service::{GuestDetails, RegistrationOutcome};

#[derive(Debug, Default, Deserialize)]
pub struct GuestForm {
    pub name: Option<String>,
    pub email: Option<String>,
}

pub async fn register(
    State(state): State<AppState>,
    CurrentUser(caller): CurrentUser,
    Path(event_id): Path<String>,
    form: Option<Form<GuestForm>>,
) -> Result<Response> {
    // Guest identity only matters for anonymous callers.
    let guest = match (&caller, form) {
        (None, Some(Form(form))) => match (form.name, form.email) {
            (Some(name), Some(email)) => Some(GuestDetails { name, email }),
            _ => None,
        },
        _ => None,
    };

    let receipt = state
        .registrations
        .register(&event_id, caller.as_ref(), guest)
        .await?;

    let marker = match (receipt.outcome, &caller) {
        (RegistrationOutcome::Registered, _) => "success",
        (RegistrationOutcome::AlreadyRegistered, Some(_)) => "registered",
        (RegistrationOutcome::AlreadyRegistered, None) => "already",
    };

    Ok(found(format!("/events/{}?{marker}=1", receipt.event_slug)))
}

pub async fn cancel(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(event_id): Path<String>,
) -> Result<Response> {
    state.registrations.cancel(&event_id, &user).await?;
    Ok(found("/attendee/registrations"))
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegistrationResponse {
    pub id: String,
    pub event_id: String,
    pub event_title: Option<String>,
    pub event_slug: Option<String>,
    pub created_at: String,
}

pub async fn list_my_registrations(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
) -> Result<Json<Vec<RegistrationResponse>>> {
    let registrations = state.registrations.list_for_member(&user).await?;
    let responses = registrations
        .into_iter()
        .map(|(registration, event)| RegistrationResponse {
            id: registration.id,
            event_id: registration.event_id,
            event_title: event.as_ref().map(|e| e.title.clone()),
            event_slug: event.map(|e| e.slug),
            created_at: registration.created_at.to_rfc3339(),
        })
        .collect();
    Ok(Json(responses))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events/:id/register", post(register))
        .route("/events/:id/cancel", post(cancel))
        .route("/attendee/registrations", get(list_my_registrations))
}
