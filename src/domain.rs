//! Domain models for pickup administration.
//!
//! This module contains the pickup request and user records, the reward point
//! rules, dashboard counters and configuration.

/// Pickup requests and their identifiers.
pub mod request;
pub use request::{PickupRequest, RequestId, Status, WasteTypes};

mod user;
pub use user::{RegisteredUser, SessionUser};

pub mod points;
pub use points::{PointRange, RandomSampler, Sampler};

mod summary;
pub use summary::Summary;

mod config;
pub use config::Config;
