//! In-memory user registry.
//!
//! The registry owns the user collection and the id counter behind a single
//! lock. Mutations hold the write lock for their whole check-then-write step,
//! so concurrent creates cannot both pass the uniqueness check or draw the
//! same id.

use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use time::OffsetDateTime;
use tracing::{debug, error, info};

use crate::error::RegistryError;
use crate::metrics;

use super::types::{DeletedUser, NewUser, PublicUser, UserPatch, UserRecord, DEFAULT_ROLE};

/// Parse a path identifier. Anything that is not a decimal integer is
/// rejected; a valid integer that matches no record is left to the lookup.
pub fn parse_id(raw: &str) -> Result<i64, RegistryError> {
    raw.parse::<i64>()
        .map_err(|_| RegistryError::InvalidIdentifier(raw.to_string()))
}

#[derive(Debug)]
struct Collection {
    users: Vec<UserRecord>,
    next_id: i64,
}

impl Collection {
    fn position(&self, id: i64) -> Result<usize, RegistryError> {
        self.users
            .iter()
            .position(|u| u.id == id)
            .ok_or(RegistryError::NotFound(id))
    }
}

/// Registry of users, shared between request handlers.
#[derive(Debug)]
pub struct UserRegistry {
    inner: RwLock<Collection>,
}

impl Default for UserRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl UserRegistry {
    /// Create an empty registry. The first id handed out is 1.
    pub fn new() -> Self {
        Self {
            inner: RwLock::new(Collection {
                users: Vec::new(),
                next_id: 1,
            }),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Collection>, RegistryError> {
        self.inner.read().map_err(|_| {
            error!("user collection lock poisoned on read");
            RegistryError::Internal("user collection is unavailable".to_string())
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Collection>, RegistryError> {
        self.inner.write().map_err(|_| {
            error!("user collection lock poisoned on write");
            RegistryError::Internal("user collection is unavailable".to_string())
        })
    }

    /// Number of stored users.
    pub fn len(&self) -> Result<usize, RegistryError> {
        Ok(self.read()?.users.len())
    }

    /// Whether the registry holds no users.
    pub fn is_empty(&self) -> Result<bool, RegistryError> {
        Ok(self.len()? == 0)
    }

    /// Public view of every user, in insertion order.
    pub fn list_all(&self) -> Result<Vec<PublicUser>, RegistryError> {
        let _timer = metrics::timer_registry_op("list");
        let collection = self.read()?;
        Ok(collection.users.iter().map(UserRecord::public_view).collect())
    }

    /// Public view of one user.
    pub fn get_by_id(&self, raw_id: &str) -> Result<PublicUser, RegistryError> {
        let _timer = metrics::timer_registry_op("get");
        let id = parse_id(raw_id)?;
        let collection = self.read()?;
        let idx = collection.position(id)?;
        Ok(collection.users[idx].public_view())
    }

    /// Register a new user.
    pub fn create(&self, input: NewUser) -> Result<PublicUser, RegistryError> {
        let _timer = metrics::timer_registry_op("create");

        let username = required(input.username.as_deref());
        let email = required(input.email.as_deref());
        let password = input.password.filter(|p| !p.is_empty());

        let (Some(username), Some(email), Some(password)) = (username, email, password) else {
            debug!("create rejected: missing required field");
            metrics::inc_registry_rejections("validation");
            return Err(RegistryError::Validation(
                "Username, email, and password are required".to_string(),
            ));
        };
        let email = email.to_lowercase();
        // Only a blank role is replaced; a supplied one is kept verbatim.
        let role = input
            .role
            .filter(|r| !r.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_ROLE.to_string());

        let mut collection = self.write()?;

        if collection
            .users
            .iter()
            .any(|u| u.collides_with(username, &email))
        {
            debug!(username, email = %email, "create rejected: duplicate user");
            metrics::inc_registry_rejections("conflict");
            return Err(RegistryError::Conflict(
                "User with this username or email already exists".to_string(),
            ));
        }

        let record = UserRecord {
            id: collection.next_id,
            username: username.to_string(),
            email,
            role,
            password,
            created_at: OffsetDateTime::now_utc(),
            updated_at: None,
        };
        collection.next_id += 1;

        let view = record.public_view();
        collection.users.push(record);

        metrics::inc_users_created();
        metrics::set_users_registered(collection.users.len());
        info!(id = view.id, username = %view.username, "user created");

        Ok(view)
    }

    /// Merge `patch` onto an existing user.
    ///
    /// Supplied values are stored verbatim and are not checked for
    /// uniqueness against other users.
    pub fn update(&self, raw_id: &str, patch: UserPatch) -> Result<PublicUser, RegistryError> {
        let _timer = metrics::timer_registry_op("update");
        let id = parse_id(raw_id)?;

        let mut collection = self.write()?;
        let idx = collection.position(id)?;
        let user = &mut collection.users[idx];

        if let Some(username) = patch.username {
            user.username = username;
        }
        if let Some(email) = patch.email {
            user.email = email;
        }
        if let Some(password) = patch.password {
            user.password = password;
        }
        if let Some(role) = patch.role {
            user.role = role;
        }
        user.updated_at = Some(OffsetDateTime::now_utc());

        metrics::inc_users_updated();
        info!(id, "user updated");

        Ok(user.public_view())
    }

    /// Remove a user for good. The id is not handed out again.
    pub fn delete(&self, raw_id: &str) -> Result<DeletedUser, RegistryError> {
        let _timer = metrics::timer_registry_op("delete");
        let id = parse_id(raw_id)?;

        let mut collection = self.write()?;
        let idx = collection.position(id)?;
        let removed = collection.users.remove(idx);

        metrics::inc_users_deleted();
        metrics::set_users_registered(collection.users.len());
        info!(id, username = %removed.username, "user deleted");

        Ok(DeletedUser {
            id: removed.id,
            username: removed.username,
        })
    }
}

#[cfg(test)]
impl UserRegistry {
    /// Panic while holding the write lock, leaving it poisoned.
    pub(crate) fn poison_for_test(&self) {
        let _guard = self.inner.write();
        panic!("writer died holding the user collection lock");
    }
}

/// Trimmed value, or `None` when absent or blank.
fn required(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}
