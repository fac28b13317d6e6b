//! User Entity and Roles

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, Result};

/// User role - closed set, mutated only by admin actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Attendee,
    Organiser,
    Admin,
}

impl Default for Role {
    fn default() -> Self {
        Self::Attendee
    }
}

impl Role {
    /// Wire/storage form, matching the serde representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Attendee => "attendee",
            Self::Organiser => "organiser",
            Self::Admin => "admin",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    /// TSID as Crockford Base32 string
    #[serde(rename = "_id")]
    pub id: String,

    pub name: String,

    /// Stored lowercased; uniqueness is case-insensitive
    pub email: String,

    pub password_hash: String,

    #[serde(default)]
    pub role: Role,

    pub created_at: DateTime<Utc>,
}

impl User {
    /// Everyone starts as an attendee.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        password_hash: impl Into<String>,
    ) -> Self {
        Self {
            id: crate::TsidGenerator::generate(),
            name: name.into(),
            email: normalize_email(&email.into()),
            password_hash: password_hash.into(),
            role: Role::Attendee,
            created_at: Utc::now(),
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    pub fn is_organiser(&self) -> bool {
        self.role == Role::Organiser
    }
}

/// Lowercase and trim an email for lookup and storage.
pub fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

/// Capability checks for protected operations.
pub mod checks {
    use super::*;

    pub fn can_create_events(user: &User) -> Result<()> {
        if user.is_organiser() {
            Ok(())
        } else {
            Err(AppError::forbidden("Only organisers can create events"))
        }
    }

    pub fn can_manage_event(user: &User, organiser_id: &str) -> Result<()> {
        if user.id == organiser_id {
            Ok(())
        } else {
            Err(AppError::forbidden("You do not own this event"))
        }
    }

    pub fn require_admin(user: &User) -> Result<()> {
        if user.is_admin() {
            Ok(())
        } else {
            Err(AppError::forbidden("Access denied. Admins only."))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_user_is_attendee() {
        let user = User::new("Asha", "Asha@Example.COM", "hash");
        assert_eq!(user.role, Role::Attendee);
        assert_eq!(user.email, "asha@example.com");
    }

    #[test]
    fn test_normalize_email() {
        assert_eq!(normalize_email("  Bob@HOST.io "), "bob@host.io");
    }

    #[test]
    fn test_capability_checks() {
        let mut user = User::new("Asha", "a@b.c", "hash");
        assert!(checks::can_create_events(&user).is_err());
        assert!(checks::require_admin(&user).is_err());

        user.role = Role::Organiser;
        assert!(checks::can_create_events(&user).is_ok());

        user.role = Role::Admin;
        assert!(checks::require_admin(&user).is_ok());
    }

    #[test]
    fn test_ownership_check() {
        let user = User::new("Asha", "a@b.c", "hash");
        assert!(checks::can_manage_event(&user, &user.id).is_ok());
        assert!(checks::can_manage_event(&user, "someone-else").is_err());
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&Role::Organiser).unwrap(), "\"organiser\"");
        assert_eq!(serde_json::to_string(&Role::Admin).unwrap(), "\"admin\"");
    }
}
