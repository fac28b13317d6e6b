//! Session Entity
//!
//! Opaque server-side session backing the identity cookie. The cookie
//! carries only the random token; everything else is resolved per
//! request.

use chrono::{DateTime, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Random opaque token, also the storage key.
    #[serde(rename = "_id")]
    pub token: String,

    pub user_id: String,

    pub created_at: DateTime<Utc>,
}

impl Session {
    pub fn issue(user_id: impl Into<String>) -> Self {
        Self {
            token: generate_token(),
            user_id: user_id.into(),
            created_at: Utc::now(),
        }
    }
}

fn generate_token() -> String {
    let bytes: [u8; 32] = rand::thread_rng().gen();
    let mut token = String::with_capacity(64);
    for b in bytes {
        token.push_str(&format!("{b:02x}"));
    }
    token
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_is_opaque_hex() {
        let session = Session::issue("user1");
        assert_eq!(session.token.len(), 64);
        assert!(session.token.chars().all(|c| c.is_ascii_hexdigit()));
    }

    #[test]
    fn test_tokens_are_unique() {
        let a = Session::issue("user1");
        let b = Session::issue("user1");
        assert_ne!(a.token, b.token);
    }
}
