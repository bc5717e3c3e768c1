//! Persistent storage for the request and user collections.
//!
//! Each collection is stored as a single JSON array under a well-known key in
//! a [`KeyValueStore`]. A [`Collection`] binds a store to a record type and
//! exposes it as a [`Repository`].

use std::io;

use serde::{de::DeserializeOwned, Serialize};

use crate::domain::{PickupRequest, RegisteredUser, SessionUser};

mod collection;
pub mod directory;
mod memory;
mod seed;

pub use collection::Collection;
pub use directory::Directory;
pub use memory::MemoryStore;
pub use seed::sample_requests;

/// Key holding the pickup request collection.
pub const REQUESTS_KEY: &str = "pickupRequests";

/// Key holding the registered user collection.
pub const USERS_KEY: &str = "registeredUsers";

/// Key holding the signed-in user.
pub const SESSION_KEY: &str = "currentUser";

/// A string-valued key-value store.
///
/// Values are whole serialized collections; there is no partial update.
pub trait KeyValueStore {
    /// Reads the value stored under `key`, or `None` if nothing is stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be read.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Replaces the value stored under `key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the backing store cannot be written.
    fn set(&mut self, key: &str, value: String) -> io::Result<()>;
}

impl<S: KeyValueStore + ?Sized> KeyValueStore for &mut S {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: String) -> io::Result<()> {
        (**self).set(key, value)
    }
}

/// A record that lives in a keyed collection.
pub trait Record: Serialize + DeserializeOwned {
    /// The store key the collection is kept under.
    const KEY: &'static str;

    /// The identifier that is unique within the collection.
    fn record_id(&self) -> &str;
}

impl Record for PickupRequest {
    const KEY: &'static str = REQUESTS_KEY;

    fn record_id(&self) -> &str {
        self.id.as_str()
    }
}

impl Record for RegisteredUser {
    const KEY: &'static str = USERS_KEY;

    fn record_id(&self) -> &str {
        &self.id
    }
}

/// Whole-collection access to a set of records.
pub trait Repository<T> {
    /// Returns every record in stored order.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read or parsed.
    fn list(&self) -> Result<Vec<T>, StoreError>;

    /// Replaces the record with the same identifier, or appends it if there
    /// is none.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read, parsed or written.
    fn upsert(&mut self, record: T) -> Result<(), StoreError>;

    /// Removes the record with the given identifier.
    ///
    /// Returns `false`, without writing, if there was no such record.
    ///
    /// # Errors
    ///
    /// Returns an error if the collection cannot be read, parsed or written.
    fn delete(&mut self, id: &str) -> Result<bool, StoreError>;
}

/// Failure to read or write a stored collection.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing store could not be accessed.
    #[error("failed to access '{key}': {source}")]
    Io {
        /// The key being accessed.
        key: &'static str,
        /// The underlying error.
        #[source]
        source: io::Error,
    },

    /// The stored value is not valid JSON for the collection.
    #[error("malformed data under '{key}': {source}")]
    Malformed {
        /// The key being accessed.
        key: &'static str,
        /// The underlying error.
        #[source]
        source: serde_json::Error,
    },
}

/// Reads the signed-in user, if any.
///
/// # Errors
///
/// Returns an error if the session cannot be read or parsed.
pub fn load_session<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<SessionUser>, StoreError> {
    let Some(raw) = store.get(SESSION_KEY).map_err(|source| StoreError::Io {
        key: SESSION_KEY,
        source,
    })?
    else {
        return Ok(None);
    };

    if raw.trim().is_empty() || raw.trim() == "null" {
        return Ok(None);
    }

    serde_json::from_str(&raw)
        .map(Some)
        .map_err(|source| StoreError::Malformed {
            key: SESSION_KEY,
            source,
        })
}

/// Records `user` as the signed-in user.
///
/// # Errors
///
/// Returns an error if the session cannot be written.
pub fn save_session<S: KeyValueStore + ?Sized>(
    store: &mut S,
    user: &SessionUser,
) -> Result<(), StoreError> {
    let raw = serde_json::to_string(user).map_err(|source| StoreError::Malformed {
        key: SESSION_KEY,
        source,
    })?;
    store.set(SESSION_KEY, raw).map_err(|source| StoreError::Io {
        key: SESSION_KEY,
        source,
    })
}
