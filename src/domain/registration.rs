//! Registration Entity
//!
//! An attendance claim against an event. Rows are never deleted on
//! cancellation; `is_cancelled` flips instead so the history survives
//! for analytics and export.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::user::normalize_email;

/// Who registered - a logged-in member or an anonymous guest.
/// Exactly one identity is populated by construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", rename_all_fields = "camelCase", tag = "kind")]
pub enum Attendee {
    Member { user_id: String },
    Guest { name: String, email: String },
}

impl Attendee {
    pub fn guest(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self::Guest {
            name: name.into().trim().to_string(),
            email: normalize_email(&email.into()),
        }
    }

    pub fn member(user_id: impl Into<String>) -> Self {
        Self::Member { user_id: user_id.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    pub event_id: String,

    pub attendee: Attendee,

    #[serde(default)]
    pub is_cancelled: bool,

    pub created_at: DateTime<Utc>,
}

impl Registration {
    pub fn new(event_id: impl Into<String>, attendee: Attendee) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            event_id: event_id.into(),
            attendee,
            is_cancelled: false,
            created_at: Utc::now(),
        }
    }

    /// Active registrations count toward capacity.
    pub fn is_active(&self) -> bool {
        !self.is_cancelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_guest_attendee_normalized() {
        let attendee = Attendee::guest("  Priya ", " Priya@Example.COM ");
        match attendee {
            Attendee::Guest { name, email } => {
                assert_eq!(name, "Priya");
                assert_eq!(email, "priya@example.com");
            }
            Attendee::Member { .. } => panic!("expected guest"),
        }
    }

    #[test]
    fn test_new_registration_is_active() {
        let reg = Registration::new("evt1", Attendee::member("user1"));
        assert!(reg.is_active());
    }

    #[test]
    fn test_attendee_serialization_is_tagged() {
        let json = serde_json::to_string(&Attendee::member("u1")).unwrap();
        assert!(json.contains("\"kind\":\"member\""));
        let json = serde_json::to_string(&Attendee::guest("G", "g@x.y")).unwrap();
        assert!(json.contains("\"kind\":\"guest\""));
    }
}
