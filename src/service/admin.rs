//! Admin Moderation Service
//!
//! Event approval state machine, organiser role grants, dashboard
//! queries, analytics counters, and the registrations CSV export.

use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::{Attendee, Event, Role, User};
use crate::error::{AppError, Result};
use crate::repository::{EventRepository, RegistrationRepository, UserRepository};

pub struct AdminService {
    users: Arc<dyn UserRepository>,
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
}

pub struct AdminDashboard {
    pub pending_events: Vec<Event>,
    pub approved_events: Vec<Event>,
    pub organisers: Vec<User>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Analytics {
    pub total_users: u64,
    pub organisers: u64,
    pub admins: u64,
    pub total_events: u64,
    pub approved_events: u64,
    pub registrations: u64,
}

impl AdminService {
    pub fn new(
        users: Arc<dyn UserRepository>,
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            users,
            events,
            registrations,
        }
    }

    /// Make an event publicly visible and registrable. Approving an
    /// already-approved event is a no-op success.
    pub async fn approve_event(&self, event_id: &str) -> Result<()> {
        let mut event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event", event_id))?;

        if !event.is_approved {
            event.is_approved = true;
            self.events.update(&event).await?;
            tracing::info!(event_id = %event.id, "event approved");
        }
        Ok(())
    }

    /// Rejection deletes the record outright; a rejected event can
    /// never be approved later. Unlike owner-delete, no registration
    /// cascade runs here - existing ledger rows are left orphaned.
    pub async fn reject_event(&self, event_id: &str) -> Result<()> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event", event_id))?;

        self.events.delete(&event.id).await?;
        tracing::info!(event_id = %event.id, "event rejected and removed");
        Ok(())
    }

    /// Grant the organiser role. Idempotent; events created under a
    /// previous role are untouched.
    pub async fn grant_organiser(&self, user_id: &str) -> Result<()> {
        self.set_role(user_id, Role::Organiser).await
    }

    /// Revoke back to attendee. Idempotent.
    pub async fn revoke_organiser(&self, user_id: &str) -> Result<()> {
        self.set_role(user_id, Role::Attendee).await
    }

    async fn set_role(&self, user_id: &str, role: Role) -> Result<()> {
        let mut user = self
            .users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User", user_id))?;

        if user.role != role {
            user.role = role;
            self.users.update(&user).await?;
            tracing::info!(user_id = %user.id, role = role.as_str(), "role changed");
        }
        Ok(())
    }

    pub async fn dashboard(&self) -> Result<AdminDashboard> {
        Ok(AdminDashboard {
            pending_events: self.events.list_pending().await?,
            approved_events: self.events.list_approved().await?,
            organisers: self.users.find_by_role(Role::Organiser).await?,
        })
    }

    pub async fn analytics(&self) -> Result<Analytics> {
        Ok(Analytics {
            total_users: self.users.count().await?,
            organisers: self.users.count_by_role(Role::Organiser).await?,
            admins: self.users.count_by_role(Role::Admin).await?,
            total_events: self.events.count().await?,
            approved_events: self.events.count_approved().await?,
            registrations: self.registrations.count().await?,
        })
    }

    /// All registrations as CSV. Events deleted after the fact render
    /// as "Deleted Event"; member attendees resolve through the
    /// identity store.
    pub async fn export_registrations_csv(&self) -> Result<String> {
        let registrations = self.registrations.find_all().await?;

        // Resolve referenced events and users once each.
        let mut events: HashMap<String, Option<Event>> = HashMap::new();
        let mut users: HashMap<String, Option<User>> = HashMap::new();

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(["Event", "AttendeeName", "AttendeeEmail", "Date"])
            .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;

        for registration in &registrations {
            let event = match events.get(&registration.event_id) {
                Some(cached) => cached.clone(),
                None => {
                    let fetched = self.events.find_by_id(&registration.event_id).await?;
                    events.insert(registration.event_id.clone(), fetched.clone());
                    fetched
                }
            };
            let event_title = event
                .map(|e| e.title)
                .unwrap_or_else(|| "Deleted Event".to_string());

            let (name, email) = match &registration.attendee {
                Attendee::Guest { name, email } => (name.clone(), email.clone()),
                Attendee::Member { user_id } => {
                    let user = match users.get(user_id) {
                        Some(cached) => cached.clone(),
                        None => {
                            let fetched = self.users.find_by_id(user_id).await?;
                            users.insert(user_id.clone(), fetched.clone());
                            fetched
                        }
                    };
                    match user {
                        Some(u) => (u.name, u.email),
                        None => ("Unknown".to_string(), "N/A".to_string()),
                    }
                }
            };

            writer
                .write_record([
                    event_title.as_str(),
                    name.as_str(),
                    email.as_str(),
                    registration.created_at.to_rfc3339().as_str(),
                ])
                .map_err(|e| AppError::internal(format!("CSV write failed: {e}")))?;
        }

        let bytes = writer
            .into_inner()
            .map_err(|e| AppError::internal(format!("CSV flush failed: {e}")))?;
        String::from_utf8(bytes).map_err(|e| AppError::internal(format!("CSV encoding: {e}")))
    }
}
