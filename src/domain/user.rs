use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A user record owned by the registration flow.
///
/// Only the identifier and the points balance are interpreted here. Every
/// other field is carried through untouched so that crediting points never
/// drops data the registration flow relies on.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegisteredUser {
    /// Identifier matched against [`PickupRequest::user_id`](crate::PickupRequest::user_id).
    pub id: String,

    /// Accumulated loyalty points. Absent in records that were never credited.
    ///
    /// Signed, since other flows may have written a negative balance.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub points: Option<i64>,

    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl RegisteredUser {
    /// Creates a user record with no points and no additional fields.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            points: None,
            extra: Map::new(),
        }
    }

    /// The current balance, treating a missing balance as zero.
    #[must_use]
    pub fn balance(&self) -> i64 {
        self.points.unwrap_or(0)
    }

    /// Adds `points` to the balance.
    pub fn credit(&mut self, points: u64) {
        self.points = Some(self.balance().saturating_add_unsigned(points));
    }

    /// Looks up a field that is not interpreted by this crate.
    #[must_use]
    pub fn field(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}

/// The user operating the dashboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionUser {
    /// Identifier of the signed-in user.
    pub id: String,

    /// Display name, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Whether the user may operate the admin dashboard.
    #[serde(default)]
    pub is_admin: bool,
}

impl SessionUser {
    /// Creates an administrator session user.
    #[must_use]
    pub fn admin(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: None,
            is_admin: true,
        }
    }
}
