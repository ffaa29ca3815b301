//! User record types and their public projections.

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Role assigned when a create request does not name one.
pub const DEFAULT_ROLE: &str = "user";

/// A stored user. Holds the password, so it is never serialized directly;
/// callers only ever see [`PublicUser`].
#[derive(Debug, Clone)]
pub struct UserRecord {
    /// Sequential identifier, never reused.
    pub id: i64,
    /// Trimmed username, unique case-insensitively.
    pub username: String,
    /// Trimmed, lower-cased email, unique case-insensitively.
    pub email: String,
    /// Free-form role name.
    pub role: String,
    /// Stored as supplied. Write-only: no projection reads it back.
    #[allow(dead_code)]
    pub(crate) password: String,
    /// Creation time.
    pub created_at: OffsetDateTime,
    /// Time of the last update, if any.
    pub updated_at: Option<OffsetDateTime>,
}

impl UserRecord {
    /// Project the record into its externally visible form.
    pub fn public_view(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            username: self.username.clone(),
            email: self.email.clone(),
            role: self.role.clone(),
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }

    /// Case-insensitive match on username or email.
    pub(crate) fn collides_with(&self, username: &str, email: &str) -> bool {
        self.username.to_lowercase() == username.to_lowercase()
            || self.email.to_lowercase() == email.to_lowercase()
    }
}

/// User record without its password.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub role: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(
        with = "time::serde::rfc3339::option",
        skip_serializing_if = "Option::is_none"
    )]
    pub updated_at: Option<OffsetDateTime>,
}

/// Create request body. Fields are optional so that missing values surface
/// as validation errors rather than deserialization failures.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NewUser {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl NewUser {
    /// Convenience constructor for the required fields.
    pub fn new(
        username: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            username: Some(username.into()),
            email: Some(email.into()),
            password: Some(password.into()),
            role: None,
        }
    }

    /// Set the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }
}

/// Update request body. Supplied fields overwrite the stored ones; `id`,
/// `createdAt` and any other keys in the body are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPatch {
    pub username: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

impl UserPatch {
    /// Patch that only changes the role.
    pub fn role(role: impl Into<String>) -> Self {
        Self {
            role: Some(role.into()),
            ..Self::default()
        }
    }
}

/// Summary returned after a delete.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DeletedUser {
    pub id: i64,
    pub username: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> UserRecord {
        UserRecord {
            id: 1,
            username: "Alice".to_string(),
            email: "alice@example.com".to_string(),
            role: DEFAULT_ROLE.to_string(),
            password: "secret".to_string(),
            created_at: OffsetDateTime::UNIX_EPOCH,
            updated_at: None,
        }
    }

    #[test]
    fn public_view_omits_password_and_unset_update_time() {
        let json = serde_json::to_value(record().public_view()).unwrap();

        assert!(json.get("password").is_none());
        assert!(json.get("updatedAt").is_none());
        assert_eq!(json["createdAt"], "1970-01-01T00:00:00Z");
        assert_eq!(json["role"], "user");
    }

    #[test]
    fn collision_ignores_case() {
        let r = record();
        assert!(r.collides_with("ALICE", "other@example.com"));
        assert!(r.collides_with("bob", "Alice@Example.COM"));
        assert!(!r.collides_with("bob", "bob@example.com"));
    }

    #[test]
    fn patch_ignores_identity_fields() {
        let patch: UserPatch =
            serde_json::from_str(r#"{"id": 42, "createdAt": "x", "role": "admin"}"#).unwrap();
        assert_eq!(patch.role.as_deref(), Some("admin"));
        assert!(patch.username.is_none());
    }
}
