use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserId;

/// What an authenticated user is allowed to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Customer,
    RestaurantOwner,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Customer => "customer",
            Role::RestaurantOwner => "restaurant_owner",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An authenticated identity, threaded explicitly through every engine call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn customer(id: impl Into<UserId>) -> Self {
        Self { id: id.into(), role: Role::Customer }
    }

    pub fn owner(id: impl Into<UserId>) -> Self {
        Self { id: id.into(), role: Role::RestaurantOwner }
    }

    pub fn is_customer(&self) -> bool {
        self.role == Role::Customer
    }

    pub fn is_owner(&self) -> bool {
        self.role == Role::RestaurantOwner
    }
}

/// Represents a registered user in the system.
#[derive(Clone, PartialEq, Serialize)]
pub struct User {
    pub id: UserId,
    pub username: String,
    pub email: String,
    pub role: Role,
    /// `<salt>$<digest>`, both hex encoded.
    #[serde(skip)]
    pub password_hash: String,
}

impl User {
    pub fn actor(&self) -> Actor {
        Actor { id: self.id.clone(), role: self.role }
    }
}

/// Payload for registering a new user.
#[derive(Clone, Deserialize)]
pub struct UserCreate {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl UserCreate {
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
        role: Role,
    ) -> Self {
        Self {
            username: username.into(),
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

impl fmt::Debug for User {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("User")
            .field("id", &self.id)
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

// Passwords never reach the logs.
impl fmt::Debug for UserCreate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("UserCreate")
            .field("username", &self.username)
            .field("email", &self.email)
            .field("role", &self.role)
            .finish_non_exhaustive()
    }
}

/// Username/password pair presented to the identity provider.
#[derive(Clone, Deserialize)]
pub struct Credentials {
    pub username: String,
    pub password: String,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self { username: username.into(), password: password.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn debug_output_hides_secrets() {
        let user = User {
            id: UserId::from("user_1"),
            username: "alice".to_string(),
            email: "alice@example.com".to_string(),
            role: Role::Customer,
            password_hash: "00ff$deadbeef".to_string(),
        };
        let rendered = format!("{user:?}");
        assert!(rendered.contains("alice"));
        assert!(!rendered.contains("deadbeef"));

        let create = UserCreate::new("alice", "alice@example.com", "hunter2", Role::Customer);
        assert!(!format!("{create:?}").contains("hunter2"));
        assert!(!format!("{:?}", Credentials::new("alice", "hunter2")).contains("hunter2"));
    }
}
