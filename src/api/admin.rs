//! Admin Endpoints
//!
//! Moderation dashboard, event approval and rejection, organiser role
//! management, analytics counters, and the registrations CSV export.
//! Every route requires an admin session.

use axum::extract::{Path, State};
use axum::http::header;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::api::common::found;
use crate::api::events::EventResponse;
use crate::api::middleware::{AdminUser, AppState};
use crate::domain::User;
use crate::error::Result;

/// User view without the credential hash.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: String,
    pub created_at: String,
}

impl From<User> for UserResponse {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role.as_str().to_string(),
            created_at: user.created_at.to_rfc3339(),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardResponse {
    pub pending_events: Vec<EventResponse>,
    pub approved_events: Vec<EventResponse>,
    pub organisers: Vec<UserResponse>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyticsResponse {
    pub total_users: u64,
    pub organisers: u64,
    pub admins: u64,
    pub total_events: u64,
    pub approved_events: u64,
    pub registrations: u64,
}

pub async fn dashboard(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<DashboardResponse>> {
    let dashboard = state.admin.dashboard().await?;
    Ok(Json(DashboardResponse {
        pending_events: dashboard
            .pending_events
            .into_iter()
            .map(EventResponse::from)
            .collect(),
        approved_events: dashboard
            .approved_events
            .into_iter()
            .map(EventResponse::from)
            .collect(),
        organisers: dashboard
            .organisers
            .into_iter()
            .map(UserResponse::from)
            .collect(),
    }))
}

pub async fn approve_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(event_id): Path<String>,
) -> Result<Response> {
    state.admin.approve_event(&event_id).await?;
    Ok(found("/admin/dashboard"))
}

pub async fn reject_event(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(event_id): Path<String>,
) -> Result<Response> {
    state.admin.reject_event(&event_id).await?;
    Ok(found("/admin/dashboard"))
}

pub async fn grant_organiser(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Response> {
    state.admin.grant_organiser(&user_id).await?;
    Ok(found("/admin/dashboard"))
}

pub async fn revoke_organiser(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(user_id): Path<String>,
) -> Result<Response> {
    state.admin.revoke_organiser(&user_id).await?;
    Ok(found("/admin/dashboard"))
}

pub async fn analytics(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Json<AnalyticsResponse>> {
    let analytics = state.admin.analytics().await?;
    Ok(Json(AnalyticsResponse {
        total_users: analytics.total_users,
        organisers: analytics.organisers,
        admins: analytics.admins,
        total_events: analytics.total_events,
        approved_events: analytics.approved_events,
        registrations: analytics.registrations,
    }))
}

pub async fn export_registrations(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
) -> Result<Response> {
    let csv = state.admin.export_registrations_csv().await?;
    Ok((
        [
            (header::CONTENT_TYPE, "text/csv"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"registrations.csv\"",
            ),
        ],
        csv,
    )
        .into_response())
}

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/admin/dashboard", get(dashboard))
        .route("/admin/events/:id/approve", post(approve_event))
        .route("/admin/events/:id/reject", post(reject_event))
        .route("/admin/users/:id/approve", post(grant_organiser))
        .route("/admin/users/:id/remove", post(revoke_organiser))
        .route("/admin/analytics", get(analytics))
        .route("/admin/export", get(export_registrations))
}
