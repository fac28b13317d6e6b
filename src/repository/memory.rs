//! In-Memory Backend
//!
//! HashMap-backed repositories behind the same traits as the MongoDB
//! backend. Used by the test suite and by `--storage memory` for
//! local development.

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::RwLock;

use crate::domain::{Attendee, Event, Registration, Role, Session, User};
use crate::error::Result;
use crate::repository::{
    EventRepository, RegistrationRepository, SessionRepository, UserRepository,
};

#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<String, User>>,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        self.users.write().insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.users.read().get(id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self
            .users
            .read()
            .values()
            .find(|u| u.email == email)
            .cloned())
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.users.write().insert(user.id.clone(), user.clone());
        Ok(())
    }

    async fn find_by_role(&self, role: Role) -> Result<Vec<User>> {
        Ok(self
            .users
            .read()
            .values()
            .filter(|u| u.role == role)
            .cloned()
            .collect())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.users.read().len() as u64)
    }

    async fn count_by_role(&self, role: Role) -> Result<u64> {
        Ok(self.users.read().values().filter(|u| u.role == role).count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryEventRepository {
    events: RwLock<HashMap<String, Event>>,
}

impl InMemoryEventRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn collect_sorted(&self, filter: impl Fn(&Event) -> bool) -> Vec<Event> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .values()
            .filter(|e| filter(e))
            .cloned()
            .collect();
        events.sort_by_key(|e| e.start_date);
        events
    }
}

#[async_trait]
impl EventRepository for InMemoryEventRepository {
    async fn insert(&self, event: &Event) -> Result<()> {
        self.events.write().insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.events.read().get(id).cloned())
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        Ok(self
            .events
            .read()
            .values()
            .find(|e| e.slug == slug)
            .cloned())
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        Ok(self.events.read().values().any(|e| e.slug == slug))
    }

    async fn list_approved(&self) -> Result<Vec<Event>> {
        Ok(self.collect_sorted(|e| e.is_approved))
    }

    async fn list_approved_or_owned(&self, owner_id: &str) -> Result<Vec<Event>> {
        Ok(self.collect_sorted(|e| e.is_approved || e.organiser_id == owner_id))
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>> {
        let mut events: Vec<Event> = self
            .events
            .read()
            .values()
            .filter(|e| e.organiser_id == owner_id)
            .cloned()
            .collect();
        events.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(events)
    }

    async fn list_pending(&self) -> Result<Vec<Event>> {
        Ok(self.collect_sorted(|e| !e.is_approved))
    }

    async fn update(&self, event: &Event) -> Result<()> {
        self.events.write().insert(event.id.clone(), event.clone());
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        Ok(self.events.write().remove(id).is_some())
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.events.read().len() as u64)
    }

    async fn count_approved(&self) -> Result<u64> {
        Ok(self.events.read().values().filter(|e| e.is_approved).count() as u64)
    }
}

#[derive(Default)]
pub struct InMemoryRegistrationRepository {
    registrations: RwLock<HashMap<String, Registration>>,
}

impl InMemoryRegistrationRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl RegistrationRepository for InMemoryRegistrationRepository {
    async fn insert(&self, registration: &Registration) -> Result<()> {
        self.registrations
            .write()
            .insert(registration.id.clone(), registration.clone());
        Ok(())
    }

    async fn update(&self, registration: &Registration) -> Result<()> {
        self.registrations
            .write()
            .insert(registration.id.clone(), registration.clone());
        Ok(())
    }

    async fn count_active(&self, event_id: &str) -> Result<u64> {
        Ok(self
            .registrations
            .read()
            .values()
            .filter(|r| r.event_id == event_id && r.is_active())
            .count() as u64)
    }

    async fn find_active_by_member(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>> {
        Ok(self
            .registrations
            .read()
            .values()
            .find(|r| {
                r.event_id == event_id
                    && r.is_active()
                    && matches!(&r.attendee, Attendee::Member { user_id: uid } if uid == user_id)
            })
            .cloned())
    }

    async fn find_active_by_guest_email(
        &self,
        event_id: &str,
        email: &str,
    ) -> Result<Option<Registration>> {
        Ok(self
            .registrations
            .read()
            .values()
            .find(|r| {
                r.event_id == event_id
                    && r.is_active()
                    && matches!(&r.attendee, Attendee::Guest { email: e, .. } if e == email)
            })
            .cloned())
    }

    async fn find_active_by_member_all(&self, user_id: &str) -> Result<Vec<Registration>> {
        let mut regs: Vec<Registration> = self
            .registrations
            .read()
            .values()
            .filter(|r| {
                r.is_active()
                    && matches!(&r.attendee, Attendee::Member { user_id: uid } if uid == user_id)
            })
            .cloned()
            .collect();
        regs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(regs)
    }

    async fn delete_by_event(&self, event_id: &str) -> Result<u64> {
        let mut registrations = self.registrations.write();
        let before = registrations.len();
        registrations.retain(|_, r| r.event_id != event_id);
        Ok((before - registrations.len()) as u64)
    }

    async fn find_all(&self) -> Result<Vec<Registration>> {
        let mut regs: Vec<Registration> =
            self.registrations.read().values().cloned().collect();
        regs.sort_by_key(|r| r.created_at);
        Ok(regs)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.registrations.read().len() as u64)
    }
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    sessions: RwLock<HashMap<String, Session>>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn insert(&self, session: &Session) -> Result<()> {
        self.sessions
            .write()
            .insert(session.token.clone(), session.clone());
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.sessions.read().get(token).cloned())
    }

    async fn delete(&self, token: &str) -> Result<()> {
        self.sessions.write().remove(token);
        Ok(())
    }
}
