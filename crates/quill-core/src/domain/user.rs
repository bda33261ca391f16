use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Account role, fixed at registration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Reader,
    Author,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Reader => "reader",
            Role::Author => "author",
        }
    }

    /// Parse a requested role. Anything other than `author` registers as a
    /// reader, so unknown inputs never escalate privileges.
    pub fn from_requested(value: Option<&str>) -> Self {
        match value {
            Some("author") => Role::Author,
            _ => Role::Reader,
        }
    }
}

/// User entity - a registered account.
///
/// The email is stored lowercased; uniqueness is enforced by the storage
/// layer. Users are never deleted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// Create a new user with generated ID and timestamps.
    pub fn new(name: String, email: String, password_hash: String, role: Role) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            name,
            email,
            password_hash,
            role,
            created_at: now,
            updated_at: now,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn requested_role_defaults_to_reader() {
        assert_eq!(Role::from_requested(Some("author")), Role::Author);
        assert_eq!(Role::from_requested(Some("reader")), Role::Reader);
        assert_eq!(Role::from_requested(Some("admin")), Role::Reader);
        assert_eq!(Role::from_requested(None), Role::Reader);
    }
}
