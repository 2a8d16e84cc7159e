//! Authentication models

use serde::{Deserialize, Serialize};
use std::fmt;

/// User roles for authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UserRole {
    /// Administrator - full access including user management
    Admin,
    /// User - can manage customers, products and licenses
    User,
}

impl fmt::Display for UserRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UserRole::Admin => write!(f, "admin"),
            UserRole::User => write!(f, "user"),
        }
    }
}

/// Identity record as persisted in the data store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    /// Unique user identifier
    pub id: u64,
    /// Username for login, unique and case-sensitive
    pub username: String,
    /// Opaque bcrypt digest
    pub password_hash: String,
    /// User's role
    pub role: UserRole,
    /// Whether the account is active; inactive accounts cannot log in
    /// and existing sessions for them are rejected
    pub active: bool,
}

impl User {
    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin && self.active
    }
}

/// Insufficient role for an operation. Terminal: a 403, not a login redirect.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Forbidden;

/// The resolved identity attached to an authenticated request
#[derive(Debug, Clone, Serialize)]
pub struct Principal {
    pub id: u64,
    pub username: String,
    pub role: UserRole,
}

impl Principal {
    /// Equality check against the required role
    pub fn require_role(&self, role: UserRole) -> Result<&Self, Forbidden> {
        if self.role == role {
            Ok(self)
        } else {
            Err(Forbidden)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_display() {
        assert_eq!(UserRole::Admin.to_string(), "admin");
        assert_eq!(UserRole::User.to_string(), "user");
    }

    #[test]
    fn test_require_role() {
        let principal = Principal {
            id: 1,
            username: "alice".to_string(),
            role: UserRole::User,
        };
        assert!(principal.require_role(UserRole::User).is_ok());
        assert_eq!(principal.require_role(UserRole::Admin).err(), Some(Forbidden));
    }

    #[test]
    fn test_inactive_user_is_not_admin() {
        let user = User {
            id: 1,
            username: "root".to_string(),
            password_hash: String::new(),
            role: UserRole::Admin,
            active: false,
        };
        assert!(!user.is_admin());
    }
}
