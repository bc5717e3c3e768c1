//! Pickup Request Administration
//!
//! Pickup requests and registered users are JSON collections kept in a
//! key-value store. An administrator completes requests, crediting reward
//! points to the requesting user, or rejects them.

pub mod domain;
pub use domain::{
    Config, PickupRequest, RandomSampler, RegisteredUser, RequestId, Sampler, SessionUser, Status,
    Summary, WasteTypes,
};

/// Key-value storage and typed collections.
pub mod storage;
pub use storage::{Collection, Directory, KeyValueStore, MemoryStore, Repository, StoreError};

pub mod admin;
pub use admin::{AdminPanel, Completion, Credit, Notification, Notifier, PanelError, Rejection};
