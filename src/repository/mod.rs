//! Repository Layer
//!
//! Storage traits for all domain entities, with a MongoDB backend for
//! deployment and an in-memory backend for tests and local
//! development.

pub mod memory;
pub mod mongo;

use async_trait::async_trait;

use crate::domain::{Event, Registration, Role, Session, User};
use crate::error::Result;

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &User) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<User>>;
    /// Lookup by normalized (lowercased, trimmed) email.
    async fn find_by_email(&self, email: &str) -> Result<Option<User>>;
    async fn update(&self, user: &User) -> Result<()>;
    async fn find_by_role(&self, role: Role) -> Result<Vec<User>>;
    async fn count(&self) -> Result<u64>;
    async fn count_by_role(&self, role: Role) -> Result<u64>;
}

#[async_trait]
pub trait EventRepository: Send + Sync {
    async fn insert(&self, event: &Event) -> Result<()>;
    async fn find_by_id(&self, id: &str) -> Result<Option<Event>>;
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>>;
    async fn slug_exists(&self, slug: &str) -> Result<bool>;
    /// Approved events, soonest first.
    async fn list_approved(&self) -> Result<Vec<Event>>;
    /// Approved events plus the owner's own pending ones, soonest first.
    async fn list_approved_or_owned(&self, owner_id: &str) -> Result<Vec<Event>>;
    /// All events of one organiser, newest first.
    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>>;
    async fn list_pending(&self) -> Result<Vec<Event>>;
    async fn update(&self, event: &Event) -> Result<()>;
    async fn delete(&self, id: &str) -> Result<bool>;
    async fn count(&self) -> Result<u64>;
    async fn count_approved(&self) -> Result<u64>;
}

#[async_trait]
pub trait RegistrationRepository: Send + Sync {
    async fn insert(&self, registration: &Registration) -> Result<()>;
    async fn update(&self, registration: &Registration) -> Result<()>;
    /// Active (not cancelled) registrations for one event.
    async fn count_active(&self, event_id: &str) -> Result<u64>;
    async fn find_active_by_member(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>>;
    /// Guest dedup key is the normalized email.
    async fn find_active_by_guest_email(
        &self,
        event_id: &str,
        email: &str,
    ) -> Result<Option<Registration>>;
    /// All active registrations of one member, across events.
    async fn find_active_by_member_all(&self, user_id: &str) -> Result<Vec<Registration>>;
    /// Cascade target for owner event deletion.
    async fn delete_by_event(&self, event_id: &str) -> Result<u64>;
    async fn find_all(&self) -> Result<Vec<Registration>>;
    async fn count(&self) -> Result<u64>;
}

#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn insert(&self, session: &Session) -> Result<()>;
    async fn find(&self, token: &str) -> Result<Option<Session>>;
    async fn delete(&self, token: &str) -> Result<()>;
}
