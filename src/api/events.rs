//! Event Endpoints
//!
//! Public listing and detail, organiser dashboard, and the owner-only
//! create/edit/delete flows. Form dates arrive in the HTML
//! `datetime-local` shape and are taken as UTC.

use axum::extract::{Path, State};
use axum::response::Response;
use axum::routing::{get, post};
use axum::{Form, Json, Router};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::api::common::found;
use crate::api::middleware::{AppState, Authenticated, CurrentUser};
use crate::domain::{Event, EventDetails, TicketType};
use crate::error::{AppError, Result};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventForm {
    pub title: String,
    pub description: String,
    pub location: String,
    pub hosted_by: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub capacity: Option<String>,
    pub ticket_type: Option<String>,
    pub price: Option<String>,
    pub image: Option<String>,
}

fn parse_local_datetime(value: &str) -> Result<DateTime<Utc>> {
    NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M")
        .or_else(|_| NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S"))
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::validation(format!("Invalid date/time: {value}")))
}

fn parse_optional<T: std::str::FromStr>(value: Option<&String>, field: &str) -> Result<Option<T>> {
    match value.map(|s| s.trim()).filter(|s| !s.is_empty()) {
        None => Ok(None),
        Some(s) => s
            .parse()
            .map(Some)
            .map_err(|_| AppError::validation(format!("Invalid {field}: {s}"))),
    }
}

impl EventForm {
    fn into_details(self) -> Result<EventDetails> {
        let start_date = parse_local_datetime(&self.start_date)?;
        let end_date = match self.end_date.as_deref().map(str::trim) {
            Some(s) if !s.is_empty() => Some(parse_local_datetime(s)?),
            _ => None,
        };

        let ticket_type = match self.ticket_type.as_deref().map(str::trim) {
            None | Some("") | Some("free") => TicketType::Free,
            Some("paid") => TicketType::Paid,
            Some(other) => {
                return Err(AppError::validation(format!("Invalid ticket type: {other}")))
            }
        };

        Ok(EventDetails {
            title: self.title,
            description: self.description,
            location: self.location,
            hosted_by: self.hosted_by,
            start_date,
            end_date,
            capacity: parse_optional(self.capacity.as_ref(), "capacity")?.unwrap_or(0),
            ticket_type,
            price: parse_optional(self.price.as_ref(), "price")?.unwrap_or(0.0),
            image: self.image.filter(|s| !s.trim().is_empty()),
        })
    }
}

/// Event response DTO
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventResponse {
    pub id: String,
    pub slug: String,
    pub title: String,
    pub description: String,
    pub location: String,
    pub hosted_by: String,
    pub start_date: String,
    pub end_date: Option<String>,
    pub capacity: u32,
    pub ticket_type: TicketType,
    pub price: f64,
    pub image: Option<String>,
    pub organiser_id: String,
    pub is_approved: bool,
    pub created_at: String,
}

impl From<Event> for EventResponse {
    fn from(e: Event) -> Self {
        Self {
            id: e.id,
            slug: e.slug,
            title: e.title,
            description: e.description,
            location: e.location,
            hosted_by: e.hosted_by,
            start_date: e.start_date.to_rfc3339(),
            end_date: e.end_date.map(|d| d.to_rfc3339()),
            capacity: e.capacity,
            ticket_type: e.ticket_type,
            price: e.price,
            image: e.image,
            organiser_id: e.organiser_id,
            is_approved: e.is_approved,
            created_at: e.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetailResponse {
    pub event: EventResponse,
    pub active_count: u64,
    pub capacity_left: Option<u64>,
    pub registered: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrganiserDashboardResponse {
    pub upcoming: Vec<EventResponse>,
    pub past: Vec<EventResponse>,
}

/// Approved events; organisers also see their own pending listings.
pub async fn list_events(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
) -> Result<Json<Vec<EventResponse>>> {
    let events = state.events.list_public(viewer.as_ref()).await?;
    Ok(Json(events.into_iter().map(Into::into).collect()))
}

pub async fn organiser_dashboard(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
) -> Result<Json<OrganiserDashboardResponse>> {
    let dashboard = state.events.organiser_dashboard(&user).await?;
    Ok(Json(OrganiserDashboardResponse {
        upcoming: dashboard.upcoming.into_iter().map(Into::into).collect(),
        past: dashboard.past.into_iter().map(Into::into).collect(),
    }))
}

pub async fn create_event(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Form(form): Form<EventForm>,
) -> Result<Response> {
    state.events.create(&user, form.into_details()?).await?;
    Ok(found("/events/dashboard"))
}

pub async fn update_event(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
    Form(form): Form<EventForm>,
) -> Result<Response> {
    state.events.update(&user, &id, form.into_details()?).await?;
    Ok(found("/events/dashboard"))
}

pub async fn delete_event(
    State(state): State<AppState>,
    Authenticated(user): Authenticated,
    Path(id): Path<String>,
) -> Result<Response> {
    state.events.delete(&user, &id).await?;
    Ok(found("/events/dashboard"))
}

pub async fn event_detail(
    State(state): State<AppState>,
    CurrentUser(viewer): CurrentUser,
    Path(slug): Path<String>,
) -> Result<Json<EventDetailResponse>> {
    let detail = state.events.detail(&slug, viewer.as_ref()).await?;
    Ok(Json(EventDetailResponse {
        event: detail.event.into(),
        active_count: detail.active_count,
        capacity_left: detail.capacity_left,
        registered: detail.registered,
    }))
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/events", get(list_events))
        .route("/events/dashboard", get(organiser_dashboard))
        .route("/events/create", post(create_event))
        .route("/events/edit/:id", post(update_event))
        .route("/events/delete/:id", post(delete_event))
        // Same param name as the registration routes; the value here
        // is the slug.
        .route("/events/:id", get(event_detail))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_local_datetime() {
        let parsed = parse_local_datetime("2026-09-01T18:30").unwrap();
        assert_eq!(parsed.to_rfc3339(), "2026-09-01T18:30:00+00:00");
        assert!(parse_local_datetime("not-a-date").is_err());
    }

    #[test]
    fn test_form_defaults() {
        let form = EventForm {
            title: "Fest".to_string(),
            description: "d".to_string(),
            location: "l".to_string(),
            hosted_by: "h".to_string(),
            start_date: "2026-09-01T18:30".to_string(),
            end_date: None,
            capacity: Some("".to_string()),
            ticket_type: None,
            price: None,
            image: None,
        };
        let details = form.into_details().unwrap();
        assert_eq!(details.capacity, 0);
        assert_eq!(details.ticket_type, TicketType::Free);
        assert_eq!(details.price, 0.0);
    }

    #[test]
    fn test_form_rejects_bad_capacity() {
        let form = EventForm {
            title: "Fest".to_string(),
            description: "d".to_string(),
            location: "l".to_string(),
            hosted_by: "h".to_string(),
            start_date: "2026-09-01T18:30".to_string(),
            end_date: None,
            capacity: Some("lots".to_string()),
            ticket_type: None,
            price: None,
            image: None,
        };
        assert!(form.into_details().is_err());
    }
}
