//! Registration Workflow
//!
//! The capacity-checked registration path and cancellation. Checks
//! run in a fixed order: existence, approval, timing, capacity, then
//! duplicate detection - so an already-registered caller hitting a
//! full event sees the capacity failure, matching the listing page.

use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;

use crate::domain::{normalize_email, Attendee, Registration, User};
use crate::error::{AppError, Result};
use crate::repository::{EventRepository, RegistrationRepository};

/// Guest-submitted identity for anonymous registration.
#[derive(Debug, Clone)]
pub struct GuestDetails {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistrationOutcome {
    /// A new ledger row was written.
    Registered,
    /// An active registration already existed; no new row.
    AlreadyRegistered,
}

#[derive(Debug)]
pub struct RegistrationReceipt {
    pub outcome: RegistrationOutcome,
    pub event_slug: String,
}

pub struct RegistrationService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    // Per-event single-writer locks. The count-then-insert sequence
    // below is check-then-act; serializing it per event keeps
    // capacity strict under concurrent requests within this process.
    // Lock entries are a few words each and are never evicted.
    event_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl RegistrationService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
    ) -> Self {
        Self {
            events,
            registrations,
            event_locks: DashMap::new(),
        }
    }

    fn lock_for(&self, event_id: &str) -> Arc<Mutex<()>> {
        self.event_locks
            .entry(event_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    /// Register a caller (member or guest) for an event.
    pub async fn register(
        &self,
        event_id: &str,
        caller: Option<&User>,
        guest: Option<GuestDetails>,
    ) -> Result<RegistrationReceipt> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event", event_id))?;

        if !event.is_approved {
            return Err(AppError::NotApproved);
        }
        if event.has_started(Utc::now()) {
            return Err(AppError::EventEnded);
        }

        let lock = self.lock_for(&event.id);
        let _guard = lock.lock().await;

        let active_count = self.registrations.count_active(&event.id).await?;
        if !event.is_unlimited() && active_count >= event.capacity as u64 {
            return Err(AppError::CapacityExceeded);
        }

        let attendee = match caller {
            Some(user) => {
                if self
                    .registrations
                    .find_active_by_member(&event.id, &user.id)
                    .await?
                    .is_some()
                {
                    return Ok(RegistrationReceipt {
                        outcome: RegistrationOutcome::AlreadyRegistered,
                        event_slug: event.slug,
                    });
                }
                Attendee::member(&user.id)
            }
            None => {
                let guest = guest.ok_or_else(|| {
                    AppError::validation("Name and email are required")
                })?;
                if guest.name.trim().is_empty() || guest.email.trim().is_empty() {
                    return Err(AppError::validation("Name and email are required"));
                }

                let email = normalize_email(&guest.email);
                if self
                    .registrations
                    .find_active_by_guest_email(&event.id, &email)
                    .await?
                    .is_some()
                {
                    return Ok(RegistrationReceipt {
                        outcome: RegistrationOutcome::AlreadyRegistered,
                        event_slug: event.slug,
                    });
                }
                Attendee::guest(guest.name, email)
            }
        };

        let registration = Registration::new(&event.id, attendee);
        self.registrations.insert(&registration).await?;

        tracing::info!(
            event_id = %event.id,
            registration_id = %registration.id,
            "registration confirmed"
        );
        Ok(RegistrationReceipt {
            outcome: RegistrationOutcome::Registered,
            event_slug: event.slug,
        })
    }

    /// Cancel the caller's active registration. The row stays in the
    /// ledger with `is_cancelled` set, freeing one capacity slot.
    pub async fn cancel(&self, event_id: &str, user: &User) -> Result<()> {
        let mut registration = self
            .registrations
            .find_active_by_member(event_id, &user.id)
            .await?
            .ok_or_else(|| AppError::not_found("Registration", event_id))?;

        registration.is_cancelled = true;
        self.registrations.update(&registration).await?;

        tracing::info!(
            event_id = %event_id,
            registration_id = %registration.id,
            "registration cancelled"
        );
        Ok(())
    }

    /// The caller's active registrations, newest first, joined with
    /// their events where those still exist.
    pub async fn list_for_member(
        &self,
        user: &User,
    ) -> Result<Vec<(Registration, Option<crate::domain::Event>)>> {
        let registrations = self.registrations.find_active_by_member_all(&user.id).await?;
        let mut joined = Vec::with_capacity(registrations.len());
        for registration in registrations {
            let event = self.events.find_by_id(&registration.event_id).await?;
            joined.push((registration, event));
        }
        Ok(joined)
    }
}
