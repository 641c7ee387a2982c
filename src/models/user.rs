use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A stored credential: the username and its bcrypt hash. The plaintext password
/// never reaches a store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
}

impl User {
    pub fn new(username: impl Into<String>, password_hash: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password_hash: password_hash.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_password_hash_is_not_serialized() {
        let user = User::new("alice", "$2b$04$abcdefghijklmnopqrstuv");
        let value = serde_json::to_value(&user).unwrap();

        assert_eq!(value["username"], "alice");
        assert!(value.get("password_hash").is_none());
    }
}
