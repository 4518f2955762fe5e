//! User domain model.

use serde::{Deserialize, Serialize};

/// The authenticated user's identity record.
///
/// Backends disagree on field naming (`id`/`uuid`/`_id`, `display_name`/
/// `name`); serde aliases fold the variants into one canonical shape at the
/// deserialization boundary. The record is cached in durable storage purely
/// for fast UI bootstrap and is never a trust source — the profile endpoint
/// decides whether a session is actually authenticated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Opaque identifier. Empty when the backend omitted it (a login
    /// response may carry only an email).
    #[serde(default, alias = "uuid", alias = "_id")]
    pub id: String,
    /// The user's email address, if known.
    #[serde(default)]
    pub email: Option<String>,
    /// Preferred display name, if the backend provides one.
    #[serde(default, alias = "name")]
    pub display_name: Option<String>,
}

impl User {
    /// Returns the best available label for display: display name, then
    /// email, then id.
    pub fn label(&self) -> &str {
        if let Some(name) = self.display_name.as_deref() {
            return name;
        }
        if let Some(email) = self.email.as_deref() {
            return email;
        }
        &self.id
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_id_fields() {
        let user: User = serde_json::from_str(r#"{"uuid":"u-1","email":"a@b.com"}"#).unwrap();
        assert_eq!(user.id, "u-1");

        let user: User = serde_json::from_str(r#"{"_id":"u-2"}"#).unwrap();
        assert_eq!(user.id, "u-2");
    }

    #[test]
    fn test_label_preference() {
        let user: User =
            serde_json::from_str(r#"{"id":"u-1","email":"a@b.com","name":"Ada"}"#).unwrap();
        assert_eq!(user.label(), "Ada");

        let user: User = serde_json::from_str(r#"{"id":"u-1","email":"a@b.com"}"#).unwrap();
        assert_eq!(user.label(), "a@b.com");
    }
}
