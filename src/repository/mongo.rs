//! MongoDB Backend
//!
//! MongoDB repositories for all domain entities.

use async_trait::async_trait;
use futures::TryStreamExt;
use mongodb::bson::doc;
use mongodb::options::IndexOptions;
use mongodb::{Collection, Database, IndexModel};

use crate::domain::{Event, Registration, Role, Session, User};
use crate::error::Result;
use crate::repository::{
    EventRepository, RegistrationRepository, SessionRepository, UserRepository,
};

/// Create the indexes the platform relies on: unique email, unique
/// slug, and a guest-dedup index backing the workflow's invariant
/// check.
pub async fn ensure_indexes(db: &Database) -> Result<()> {
    let users: Collection<User> = db.collection("users");
    users
        .create_index(
            IndexModel::builder()
                .keys(doc! { "email": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    let events: Collection<Event> = db.collection("events");
    events
        .create_index(
            IndexModel::builder()
                .keys(doc! { "slug": 1 })
                .options(IndexOptions::builder().unique(true).build())
                .build(),
        )
        .await?;

    let registrations: Collection<Registration> = db.collection("registrations");
    registrations
        .create_index(
            IndexModel::builder()
                .keys(doc! { "eventId": 1, "attendee.email": 1 })
                .build(),
        )
        .await?;

    Ok(())
}

pub struct MongoUserRepository {
    collection: Collection<User>,
}

impl MongoUserRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("users"),
        }
    }
}

#[async_trait]
impl UserRepository for MongoUserRepository {
    async fn insert(&self, user: &User) -> Result<()> {
        self.collection.insert_one(user).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        Ok(self.collection.find_one(doc! { "email": email }).await?)
    }

    async fn update(&self, user: &User) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &user.id }, user)
            .await?;
        Ok(())
    }

    async fn find_by_role(&self, role: Role) -> Result<Vec<User>> {
        let cursor = self
            .collection
            .find(doc! { "role": role.as_str() })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn count_by_role(&self, role: Role) -> Result<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "role": role.as_str() })
            .await?)
    }
}

pub struct MongoEventRepository {
    collection: Collection<Event>,
}

impl MongoEventRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("events"),
        }
    }
}

#[async_trait]
impl EventRepository for MongoEventRepository {
    async fn insert(&self, event: &Event) -> Result<()> {
        self.collection.insert_one(event).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<Event>> {
        Ok(self.collection.find_one(doc! { "_id": id }).await?)
    }

    async fn find_by_slug(&self, slug: &str) -> Result<Option<Event>> {
        Ok(self.collection.find_one(doc! { "slug": slug }).await?)
    }

    async fn slug_exists(&self, slug: &str) -> Result<bool> {
        let count = self
            .collection
            .count_documents(doc! { "slug": slug })
            .await?;
        Ok(count > 0)
    }

    async fn list_approved(&self) -> Result<Vec<Event>> {
        let cursor = self
            .collection
            .find(doc! { "isApproved": true })
            .sort(doc! { "startDate": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_approved_or_owned(&self, owner_id: &str) -> Result<Vec<Event>> {
        let filter = doc! {
            "$or": [
                { "isApproved": true },
                { "organiserId": owner_id },
            ]
        };
        let cursor = self
            .collection
            .find(filter)
            .sort(doc! { "startDate": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_by_owner(&self, owner_id: &str) -> Result<Vec<Event>> {
        let cursor = self
            .collection
            .find(doc! { "organiserId": owner_id })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn list_pending(&self) -> Result<Vec<Event>> {
        let cursor = self
            .collection
            .find(doc! { "isApproved": false })
            .sort(doc! { "startDate": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn update(&self, event: &Event) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &event.id }, event)
            .await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<bool> {
        let result = self.collection.delete_one(doc! { "_id": id }).await?;
        Ok(result.deleted_count > 0)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }

    async fn count_approved(&self) -> Result<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "isApproved": true })
            .await?)
    }
}

pub struct MongoRegistrationRepository {
    collection: Collection<Registration>,
}

impl MongoRegistrationRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("registrations"),
        }
    }
}

#[async_trait]
impl RegistrationRepository for MongoRegistrationRepository {
    async fn insert(&self, registration: &Registration) -> Result<()> {
        self.collection.insert_one(registration).await?;
        Ok(())
    }

    async fn update(&self, registration: &Registration) -> Result<()> {
        self.collection
            .replace_one(doc! { "_id": &registration.id }, registration)
            .await?;
        Ok(())
    }

    async fn count_active(&self, event_id: &str) -> Result<u64> {
        Ok(self
            .collection
            .count_documents(doc! { "eventId": event_id, "isCancelled": false })
            .await?)
    }

    async fn find_active_by_member(
        &self,
        event_id: &str,
        user_id: &str,
    ) -> Result<Option<Registration>> {
        Ok(self
            .collection
            .find_one(doc! {
                "eventId": event_id,
                "isCancelled": false,
                "attendee.kind": "member",
                "attendee.userId": user_id,
            })
            .await?)
    }

    async fn find_active_by_guest_email(
        &self,
        event_id: &str,
        email: &str,
    ) -> Result<Option<Registration>> {
        Ok(self
            .collection
            .find_one(doc! {
                "eventId": event_id,
                "isCancelled": false,
                "attendee.kind": "guest",
                "attendee.email": email,
            })
            .await?)
    }

    async fn find_active_by_member_all(&self, user_id: &str) -> Result<Vec<Registration>> {
        let cursor = self
            .collection
            .find(doc! {
                "isCancelled": false,
                "attendee.kind": "member",
                "attendee.userId": user_id,
            })
            .sort(doc! { "createdAt": -1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn delete_by_event(&self, event_id: &str) -> Result<u64> {
        let result = self
            .collection
            .delete_many(doc! { "eventId": event_id })
            .await?;
        Ok(result.deleted_count)
    }

    async fn find_all(&self) -> Result<Vec<Registration>> {
        let cursor = self
            .collection
            .find(doc! {})
            .sort(doc! { "createdAt": 1 })
            .await?;
        Ok(cursor.try_collect().await?)
    }

    async fn count(&self) -> Result<u64> {
        Ok(self.collection.count_documents(doc! {}).await?)
    }
}

pub struct MongoSessionRepository {
    collection: Collection<Session>,
}

impl MongoSessionRepository {
    pub fn new(db: &Database) -> Self {
        Self {
            collection: db.collection("sessions"),
        }
    }
}

#[async_trait]
impl SessionRepository for MongoSessionRepository {
    async fn insert(&self, session: &Session) -> Result<()> {
        self.collection.insert_one(session).await?;
        Ok(())
    }

    async fn find(&self, token: &str) -> Result<Option<Session>> {
        Ok(self.collection.find_one(doc! { "_id": token }).await?)
    }

    async fn delete(&self, token: &str) -> Result<()> {
        self.collection.delete_one(doc! { "_id": token }).await?;
        Ok(())
    }
}
