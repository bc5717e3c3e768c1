use std::{fmt, str::FromStr};

use chrono::{DateTime, NaiveDate, Utc};
use non_empty_string::NonEmptyString;
use nonempty::NonEmpty;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The unique identifier of a pickup request, e.g. `req-001`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RequestId(NonEmptyString);

impl RequestId {
    /// Creates a new request identifier.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyIdError`] if the string is empty.
    pub fn new(id: String) -> Result<Self, EmptyIdError> {
        NonEmptyString::new(id).map(Self).map_err(|_| EmptyIdError)
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

/// A request identifier was empty.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("request identifier cannot be empty")]
pub struct EmptyIdError;

impl TryFrom<String> for RequestId {
    type Error = EmptyIdError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<RequestId> for String {
    fn from(id: RequestId) -> Self {
        id.as_str().to_owned()
    }
}

impl FromStr for RequestId {
    type Err = EmptyIdError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s.trim().to_string())
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl PartialEq<str> for RequestId {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

/// The waste-type labels attached to a request.
///
/// A request always names at least one waste type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct WasteTypes(NonEmpty<String>);

impl WasteTypes {
    /// Builds a waste-type list from its first label and any further labels.
    #[must_use]
    pub fn new(
        first: impl Into<String>,
        rest: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self(NonEmpty {
            head: first.into(),
            tail: rest.into_iter().map(Into::into).collect(),
        })
    }

    /// Iterates over the labels in the order they were recorded.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.0.iter().map(String::as_str)
    }

    /// The number of labels, counting duplicates.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        false
    }
}

/// A stored waste-type list had no labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("a pickup request must list at least one waste type")]
pub struct NoWasteTypesError;

impl TryFrom<Vec<String>> for WasteTypes {
    type Error = NoWasteTypesError;

    fn try_from(labels: Vec<String>) -> Result<Self, Self::Error> {
        NonEmpty::from_vec(labels).map(Self).ok_or(NoWasteTypesError)
    }
}

impl From<WasteTypes> for Vec<String> {
    fn from(labels: WasteTypes) -> Self {
        labels.0.into()
    }
}

/// Where a request is in its lifecycle.
///
/// Rejected requests are deleted, so there is no rejected state.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    /// Waiting for an administrator decision.
    Pending,
    /// Collected; points have been awarded.
    Completed,
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Pending => f.write_str("Pending"),
            Self::Completed => f.write_str("Completed"),
        }
    }
}

/// A user-submitted request for waste collection.
///
/// Fields written by the submission flow that are not modelled here are kept
/// in [`extra`](Self::extra) and written back unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PickupRequest {
    /// Unique identifier within the request collection.
    pub id: RequestId,
    /// Identifier of the registered user who asked for the pickup.
    pub user_id: String,
    /// Display name of the requester.
    pub user_name: String,
    /// Contact email of the requester.
    pub user_email: String,
    /// Contact phone number of the requester.
    pub user_phone: String,
    /// Where the waste should be collected.
    pub user_address: String,
    /// The requested collection date.
    pub date: NaiveDate,
    /// What is being collected.
    pub waste_types: WasteTypes,
    /// Lifecycle state.
    pub status: Status,
    /// When the request was submitted.
    pub created_at: DateTime<Utc>,
    /// Any other stored fields, in stored order.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl PickupRequest {
    /// Whether the request is still awaiting a decision.
    #[must_use]
    pub fn is_pending(&self) -> bool {
        self.status == Status::Pending
    }

    /// Looks up a field that is not interpreted by this crate.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}
