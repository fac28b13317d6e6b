//! Event Management Service
//!
//! Creation with slug derivation, owner-gated update and delete with
//! registration/image cascade, and the listing rules around approval
//! visibility.

use std::sync::Arc;

use chrono::Utc;

use crate::domain::{checks, slugify, Event, EventDetails, User};
use crate::error::{AppError, Result};
use crate::repository::{EventRepository, RegistrationRepository};
use crate::service::ImageStore;
use crate::TsidGenerator;

pub struct EventService {
    events: Arc<dyn EventRepository>,
    registrations: Arc<dyn RegistrationRepository>,
    images: Arc<dyn ImageStore>,
}

/// Organiser's own events split around the current time.
pub struct OrganiserDashboard {
    pub upcoming: Vec<Event>,
    pub past: Vec<Event>,
}

/// Event page data: the record plus live registration numbers.
#[derive(Debug)]
pub struct EventDetail {
    pub event: Event,
    pub active_count: u64,
    /// None when capacity is unlimited.
    pub capacity_left: Option<u64>,
    /// Whether the viewer holds an active registration.
    pub registered: bool,
}

impl EventService {
    pub fn new(
        events: Arc<dyn EventRepository>,
        registrations: Arc<dyn RegistrationRepository>,
        images: Arc<dyn ImageStore>,
    ) -> Self {
        Self {
            events,
            registrations,
            images,
        }
    }

    /// Create an unapproved event owned by the caller. The slug is
    /// derived from the title once, suffixed until unique, and never
    /// regenerated afterwards.
    pub async fn create(&self, owner: &User, details: EventDetails) -> Result<Event> {
        checks::can_create_events(owner)?;
        details.validate()?;

        let slug = self.unique_slug(&details.title).await?;
        let price = details.effective_price();

        let event = Event {
            id: TsidGenerator::generate(),
            slug,
            title: details.title.trim().to_string(),
            description: details.description,
            location: details.location,
            hosted_by: details.hosted_by,
            start_date: details.start_date,
            end_date: details.end_date,
            capacity: details.capacity,
            ticket_type: details.ticket_type,
            price,
            image: details.image,
            organiser_id: owner.id.clone(),
            // Approval always starts pending, whoever creates it.
            is_approved: false,
            created_at: Utc::now(),
        };

        self.events.insert(&event).await?;
        tracing::info!(event_id = %event.id, slug = %event.slug, "event created");
        Ok(event)
    }

    async fn unique_slug(&self, title: &str) -> Result<String> {
        let base = slugify(title);
        let mut candidate = base.clone();
        let mut suffix = 1u32;
        while self.events.slug_exists(&candidate).await? {
            candidate = format!("{base}-{suffix}");
            suffix += 1;
        }
        Ok(candidate)
    }

    /// Owner-only update. Slug, ownership, and approval state are
    /// untouched; a replaced image has its old asset removed.
    pub async fn update(&self, caller: &User, event_id: &str, details: EventDetails) -> Result<Event> {
        let mut event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event", event_id))?;
        checks::can_manage_event(caller, &event.organiser_id)?;
        details.validate()?;

        let replaced_image = match (&event.image, &details.image) {
            (Some(old), Some(new)) if old != new => Some(old.clone()),
            _ => None,
        };

        let price = details.effective_price();
        event.title = details.title.trim().to_string();
        event.description = details.description;
        event.location = details.location;
        event.hosted_by = details.hosted_by;
        event.start_date = details.start_date;
        event.end_date = details.end_date;
        event.capacity = details.capacity;
        event.ticket_type = details.ticket_type;
        event.price = price;
        if details.image.is_some() {
            event.image = details.image;
        }

        self.events.update(&event).await?;

        if let Some(old) = replaced_image {
            if let Err(e) = self.images.remove(&old).await {
                tracing::warn!(event_id = %event.id, error = %e, "failed to remove replaced image");
            }
        }

        Ok(event)
    }

    /// Owner-only delete. Cascade order: registrations, then the
    /// image asset, then the event record, so a partial failure never
    /// leaves an orphaned image behind a live event.
    pub async fn delete(&self, caller: &User, event_id: &str) -> Result<()> {
        let event = self
            .events
            .find_by_id(event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event", event_id))?;
        checks::can_manage_event(caller, &event.organiser_id)?;

        let removed = self.registrations.delete_by_event(&event.id).await?;
        if let Some(image) = &event.image {
            if let Err(e) = self.images.remove(image).await {
                tracing::warn!(event_id = %event.id, error = %e, "failed to remove event image");
            }
        }
        self.events.delete(&event.id).await?;

        tracing::info!(event_id = %event.id, registrations_removed = removed, "event deleted");
        Ok(())
    }

    /// Public listing: approved events, plus the viewer's own pending
    /// ones when the viewer is an organiser.
    pub async fn list_public(&self, viewer: Option<&User>) -> Result<Vec<Event>> {
        match viewer {
            Some(user) if user.is_organiser() => {
                self.events.list_approved_or_owned(&user.id).await
            }
            _ => self.events.list_approved().await,
        }
    }

    pub async fn organiser_dashboard(&self, owner: &User) -> Result<OrganiserDashboard> {
        let events = self.events.list_by_owner(&owner.id).await?;
        let now = Utc::now();
        let (upcoming, past) = events.into_iter().partition(|e| e.start_date >= now);
        Ok(OrganiserDashboard { upcoming, past })
    }

    /// Detail by slug. Unapproved events exist only for their owner
    /// and admins; everyone else gets NotFound.
    pub async fn detail(&self, slug: &str, viewer: Option<&User>) -> Result<EventDetail> {
        let event = self
            .events
            .find_by_slug(slug)
            .await?
            .ok_or_else(|| AppError::not_found("Event", slug))?;

        let visible = event.is_approved
            || viewer.is_some_and(|u| u.id == event.organiser_id || u.is_admin());
        if !visible {
            return Err(AppError::not_found("Event", slug));
        }

        let active_count = self.registrations.count_active(&event.id).await?;
        let capacity_left = if event.is_unlimited() {
            None
        } else {
            Some((event.capacity as u64).saturating_sub(active_count))
        };

        let registered = match viewer {
            Some(user) => self
                .registrations
                .find_active_by_member(&event.id, &user.id)
                .await?
                .is_some(),
            None => false,
        };

        Ok(EventDetail {
            event,
            active_count,
            capacity_left,
            registered,
        })
    }
}
