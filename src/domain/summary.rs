use serde::Serialize;

use crate::domain::{request::Status, PickupRequest};

/// Aggregate counters shown at the top of the dashboard.
///
/// `points_awarded` is `completed × points_per_completion`. It is a display
/// estimate and does not track the points actually credited to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Summary {
    /// Requests awaiting a decision.
    pub pending: usize,
    /// Requests that have been completed.
    pub completed: usize,
    /// All requests in the collection.
    pub total: usize,
    /// Estimated points awarded so far.
    pub points_awarded: u64,
}

impl Summary {
    /// Computes the counters for a request collection.
    #[must_use]
    pub fn of(requests: &[PickupRequest], points_per_completion: u64) -> Self {
        let pending = requests
            .iter()
            .filter(|request| request.status == Status::Pending)
            .count();
        let completed = requests.len() - pending;

        Self {
            pending,
            completed,
            total: requests.len(),
            points_awarded: (completed as u64).saturating_mul(points_per_completion),
        }
    }
}
