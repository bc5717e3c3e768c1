//! The administrator's view of pickup requests.
//!
//! An [`AdminPanel`] is only handed out to an admin session. It loads the
//! request collection (seeding samples into an empty store), and lets the
//! administrator complete or reject pending requests.
//!
//! Completing a request is two separate writes: the request's status is
//! updated first, then the reward is credited to the matching user. The
//! writes are not transactional. If crediting fails the request stays
//! completed and [`PanelError::CreditFailed`] reports the drawn amount, so
//! [`AdminPanel::credit_points`] can be called again with it.

use std::fmt;

use serde_json::Value;
use tracing::instrument;

use crate::{
    domain::{
        points, Config, PickupRequest, RegisteredUser, RequestId, Sampler, SessionUser, Status,
        Summary,
    },
    storage::{sample_requests, Collection, KeyValueStore, Repository, StoreError, USERS_KEY},
};

/// How prominently a notification should be shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Variant {
    /// An ordinary confirmation.
    #[default]
    Default,
    /// Something was removed or cannot be undone.
    Destructive,
}

/// A message for the administrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    /// Short headline.
    pub title: String,
    /// Longer explanation.
    pub description: String,
    /// Display style.
    pub variant: Variant,
}

impl fmt::Display for Notification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.title, self.description)
    }
}

/// Receives notifications. Delivery is fire-and-forget.
pub trait Notifier {
    /// Shows `notification` to the administrator.
    fn notify(&mut self, notification: Notification);
}

impl Notifier for Vec<Notification> {
    fn notify(&mut self, notification: Notification) {
        self.push(notification);
    }
}

impl<N: Notifier + ?Sized> Notifier for &mut N {
    fn notify(&mut self, notification: Notification) {
        (**self).notify(notification);
    }
}

/// Errors returned by the admin panel.
#[derive(Debug, thiserror::Error)]
pub enum PanelError {
    /// The session user is missing or is not an administrator.
    #[error("Access denied. Admin only.")]
    AccessDenied,

    /// Reading or writing a collection failed.
    #[error(transparent)]
    Store(#[from] StoreError),

    /// The request was completed but its points could not be credited.
    #[error(
        "request {request} was completed but {points} points could not be credited to \
         '{user_id}'"
    )]
    CreditFailed {
        /// The request that is now completed.
        request: RequestId,
        /// The user the points were meant for.
        user_id: String,
        /// Total points drawn for the request.
        points: u64,
        /// Why the users collection could not be updated.
        source: StoreError,
    },
}

/// The result of marking a request as completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// The request was pending and is now completed. Holds the request as it
    /// was before the update.
    Completed(PickupRequest),
    /// The request had already been completed; nothing was written.
    AlreadyCompleted,
    /// No request has that identifier; nothing was written.
    NotFound,
}

/// Where awarded points ended up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Credit {
    /// The user's balance was increased and is now `balance`.
    Credited {
        /// The user's balance after the credit.
        balance: i64,
    },
    /// No registered user matched; the points were dropped.
    NoMatchingUser,
}

/// Points awarded for a completed request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Award {
    /// The completed request.
    pub request: RequestId,
    /// The user the points were meant for.
    pub user_id: String,
    /// Total points drawn for the request's waste types.
    pub points: u64,
    /// Whether a user record received them.
    pub credit: Credit,
}

/// The result of [`AdminPanel::complete`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Completion {
    /// The request was completed and points were awarded.
    Completed(Award),
    /// The request had already been completed; nothing changed.
    AlreadyCompleted,
    /// No request has that identifier; nothing changed.
    NotFound,
}

/// The result of [`AdminPanel::reject`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rejection {
    /// The request was deleted.
    Removed(PickupRequest),
    /// No request has that identifier; nothing changed.
    NotFound,
}

/// The admin dashboard over a key-value store.
pub struct AdminPanel<S, N> {
    store: S,
    notifier: N,
    config: Config,
    requests: Vec<PickupRequest>,
}

impl<S, N> fmt::Debug for AdminPanel<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AdminPanel")
            .field("config", &self.config)
            .field("requests", &self.requests.len())
            .finish_non_exhaustive()
    }
}

impl<S, N> AdminPanel<S, N>
where
    S: KeyValueStore,
    N: Notifier,
{
    /// Opens the dashboard for `session`.
    ///
    /// The session is checked before the store is touched. Once admitted, the
    /// request collection is loaded; an empty collection is seeded with the
    /// sample requests unless seeding is disabled.
    ///
    /// # Errors
    ///
    /// Returns [`PanelError::AccessDenied`] if there is no session user or the
    /// user is not an administrator, or a storage error if the collection
    /// cannot be loaded or seeded.
    #[instrument(level = "debug", skip(store, notifier, config))]
    pub fn open(
        mut store: S,
        session: Option<&SessionUser>,
        config: Config,
        notifier: N,
    ) -> Result<Self, PanelError> {
        if !session.is_some_and(|user| user.is_admin) {
            tracing::debug!("refusing non-admin session");
            return Err(PanelError::AccessDenied);
        }

        let mut collection = Collection::<S, PickupRequest>::new(&mut store);
        let mut requests = collection.list()?;

        if requests.is_empty() && config.seed_sample_data {
            requests = sample_requests();
            collection.replace_all(&requests)?;
            tracing::info!(count = requests.len(), "seeded sample pickup requests");
        }

        Ok(Self {
            store,
            notifier,
            config,
            requests,
        })
    }

    /// Every loaded request, in stored order.
    #[must_use]
    pub fn requests(&self) -> &[PickupRequest] {
        &self.requests
    }

    /// Requests that are waiting for a decision.
    pub fn pending(&self) -> impl Iterator<Item = &PickupRequest> {
        self.requests.iter().filter(|r| r.status == Status::Pending)
    }

    /// Requests that have been completed.
    pub fn completed(&self) -> impl Iterator<Item = &PickupRequest> {
        self.requests.iter().filter(|r| r.status == Status::Completed)
    }

    /// Looks up a request by identifier.
    #[must_use]
    pub fn find(&self, id: &str) -> Option<&PickupRequest> {
        self.requests.iter().find(|r| r.id == *id)
    }

    /// The dashboard counters.
    #[must_use]
    pub fn summary(&self) -> Summary {
        Summary::of(&self.requests, self.config.display_points_per_completion())
    }

    /// The configuration the panel was opened with.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Accepts a pending request: marks it completed, then credits points
    /// for its waste types to the requesting user.
    ///
    /// Points are drawn from `sampler`. A notification naming the total is
    /// sent once both steps have run.
    ///
    /// # Errors
    ///
    /// Returns an error if the status update fails. If the status update
    /// succeeded but crediting failed, the request remains completed and
    /// [`PanelError::CreditFailed`] carries the points that were drawn.
    #[instrument(level = "debug", skip(self, sampler))]
    pub fn complete<R>(&mut self, id: &str, sampler: &mut R) -> Result<Completion, PanelError>
    where
        R: Sampler + ?Sized,
    {
        let request = match self.mark_completed(id)? {
            Transition::Completed(request) => request,
            Transition::AlreadyCompleted => return Ok(Completion::AlreadyCompleted),
            Transition::NotFound => return Ok(Completion::NotFound),
        };

        let points = points::score(
            request.waste_types.iter(),
            sampler,
            self.config.unknown_waste_points(),
        );
        let credit = match self.credit(&request.user_id, points) {
            Ok(credit) => credit,
            Err(source) => {
                tracing::error!(id, user_id = %request.user_id, points, "failed to credit points");
                return Err(PanelError::CreditFailed {
                    request: request.id,
                    user_id: request.user_id,
                    points,
                    source,
                });
            }
        };

        self.notifier.notify(Notification {
            title: "Request Accepted & Completed".to_string(),
            description: format!(
                "Pickup completed successfully. User awarded {points} points."
            ),
            variant: Variant::Default,
        });

        Ok(Completion::Completed(Award {
            request: request.id,
            user_id: request.user_id,
            points,
            credit,
        }))
    }

    /// Marks a pending request as completed and persists it.
    ///
    /// Calling this again for the same request does nothing.
    ///
    /// # Errors
    ///
    /// Returns an error if the request collection cannot be written.
    pub fn mark_completed(&mut self, id: &str) -> Result<Transition, PanelError> {
        let Some(index) = self.requests.iter().position(|r| r.id == *id) else {
            tracing::warn!(id, "no pickup request to complete");
            return Ok(Transition::NotFound);
        };

        if self.requests[index].status == Status::Completed {
            tracing::debug!(id, "pickup request already completed");
            return Ok(Transition::AlreadyCompleted);
        }

        let previous = self.requests[index].clone();
        let updated = PickupRequest {
            status: Status::Completed,
            ..previous.clone()
        };

        Collection::<S, PickupRequest>::new(&mut self.store).upsert(updated.clone())?;
        self.requests[index] = updated;

        tracing::info!(id, "completed pickup request");
        Ok(Transition::Completed(previous))
    }

    /// Adds `points` to the registered user with `user_id`.
    ///
    /// If no user matches, the users collection is left untouched. Only the
    /// matching record is interpreted; other records are written back as
    /// they were stored.
    ///
    /// # Errors
    ///
    /// Returns an error if the users collection cannot be read or written, or
    /// if the matching record is malformed.
    pub fn credit_points(&mut self, user_id: &str, points: u64) -> Result<Credit, PanelError> {
        Ok(self.credit(user_id, points)?)
    }

    fn credit(&mut self, user_id: &str, points: u64) -> Result<Credit, StoreError> {
        let mut users = Collection::<S, RegisteredUser>::new(&mut self.store);
        let mut entries = users.entries()?;

        let Some(entry) = entries
            .iter_mut()
            .find(|entry| entry.get("id").and_then(Value::as_str) == Some(user_id))
        else {
            tracing::warn!(user_id, points, "no registered user to credit");
            return Ok(Credit::NoMatchingUser);
        };

        let malformed = |source: serde_json::Error| StoreError::Malformed {
            key: USERS_KEY,
            source,
        };
        let mut user: RegisteredUser = serde_json::from_value(entry.clone()).map_err(malformed)?;
        user.credit(points);
        let balance = user.balance();
        *entry = serde_json::to_value(&user).map_err(malformed)?;
        users.replace_entries(&entries)?;

        tracing::info!(user_id, points, balance, "credited points");
        Ok(Credit::Credited { balance })
    }

    /// Rejects a request by deleting it. This cannot be undone.
    ///
    /// # Errors
    ///
    /// Returns an error if the request collection cannot be written.
    #[instrument(level = "debug", skip(self))]
    pub fn reject(&mut self, id: &str) -> Result<Rejection, PanelError> {
        let Some(index) = self.requests.iter().position(|r| r.id == *id) else {
            tracing::warn!(id, "no pickup request to reject");
            return Ok(Rejection::NotFound);
        };

        Collection::<S, PickupRequest>::new(&mut self.store).delete(id)?;
        let removed = self.requests.remove(index);

        tracing::info!(id, "rejected pickup request");
        self.notifier.notify(Notification {
            title: "Request Rejected".to_string(),
            description: "Pickup request has been rejected and removed.".to_string(),
            variant: Variant::Destructive,
        });

        Ok(Rejection::Removed(removed))
    }
}

#[cfg(test)]
mod tests {
    use std::io;

    use super::*;
    use crate::{
        domain::PointRange,
        storage::{MemoryStore, REQUESTS_KEY},
    };

    struct Lowest;

    impl Sampler for Lowest {
        fn sample(&mut self, range: PointRange) -> u64 {
            range.min
        }
    }

    fn admin() -> SessionUser {
        SessionUser::admin("admin")
    }

    fn open(store: &mut MemoryStore) -> AdminPanel<&mut MemoryStore, Vec<Notification>> {
        let session = admin();
        AdminPanel::open(store, Some(&session), Config::default(), Vec::new()).unwrap()
    }

    fn stored_requests(store: &MemoryStore) -> Vec<PickupRequest> {
        serde_json::from_str(store.value(REQUESTS_KEY).unwrap()).unwrap()
    }

    /// A store whose users collection cannot be written.
    struct ReadOnlyUsers(MemoryStore);

    impl KeyValueStore for ReadOnlyUsers {
        fn get(&self, key: &str) -> io::Result<Option<String>> {
            self.0.get(key)
        }

        fn set(&mut self, key: &str, value: String) -> io::Result<()> {
            if key == USERS_KEY {
                return Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"));
            }
            self.0.set(key, value)
        }
    }

    #[test]
    fn empty_store_is_seeded_with_samples() {
        let mut store = MemoryStore::new();
        let panel = open(&mut store);

        assert_eq!(panel.requests(), sample_requests());
        assert_eq!(panel.pending().count(), 4);
        assert_eq!(stored_requests(&store), sample_requests());
    }

    #[test]
    fn seeding_can_be_disabled() {
        let mut store = MemoryStore::new();
        let mut config = Config::default();
        config.seed_sample_data = false;

        let panel =
            AdminPanel::open(&mut store, Some(&admin()), config, Vec::<Notification>::new())
                .unwrap();

        assert!(panel.requests().is_empty());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn stored_requests_are_adopted_without_writing() {
        let stored = serde_json::to_string(&sample_requests()[2..]).unwrap();
        let mut store = MemoryStore::new().with(REQUESTS_KEY, stored);

        let panel = open(&mut store);

        assert_eq!(panel.requests().len(), 2);
        assert_eq!(panel.requests()[0].id.as_str(), "req-003");
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn malformed_requests_fail_to_open() {
        let mut store = MemoryStore::new().with(REQUESTS_KEY, "not json");
        let error = AdminPanel::open(
            &mut store,
            Some(&admin()),
            Config::default(),
            Vec::<Notification>::new(),
        )
        .unwrap_err();
        assert!(matches!(error, PanelError::Store(StoreError::Malformed { .. })));
    }

    #[test]
    fn non_admin_sessions_never_touch_the_store() {
        let mut store = MemoryStore::new();
        let visitor = SessionUser {
            id: "u1".to_string(),
            name: None,
            is_admin: false,
        };

        for session in [None, Some(&visitor)] {
            let error = AdminPanel::open(
                &mut store,
                session,
                Config::default(),
                Vec::<Notification>::new(),
            )
            .unwrap_err();
            assert!(matches!(error, PanelError::AccessDenied));
            assert_eq!(error.to_string(), "Access denied. Admin only.");
        }

        assert_eq!(store.reads(), 0);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn completing_changes_only_the_status() {
        let mut store = MemoryStore::new();
        let mut panel = open(&mut store);

        let outcome = panel.complete("req-002", &mut Lowest).unwrap();
        assert!(matches!(outcome, Completion::Completed(_)));

        let mut expected = sample_requests();
        expected[1].status = Status::Completed;
        assert_eq!(panel.requests(), expected);
        drop(panel);
        assert_eq!(stored_requests(&store), expected);
    }

    #[test]
    fn completing_credits_the_matching_user() {
        let users = r#"[
            {"id":"someone-else","points":5},
            {"id":"test-user-3","name":"Arun","points":40}
        ]"#;
        let mut store = MemoryStore::new().with(USERS_KEY, users);
        let mut panel = open(&mut store);

        let Completion::Completed(award) = panel.complete("req-003", &mut Lowest).unwrap() else {
            panic!("expected the request to be completed");
        };

        // Glass Bottles + Paper/Cardboard + Organic Waste at their minimums.
        assert_eq!(award.points, 120 + 100 + 80);
        assert_eq!(award.credit, Credit::Credited { balance: 340 });
        assert_eq!(
            panel.notifier,
            vec![Notification {
                title: "Request Accepted & Completed".to_string(),
                description: "Pickup completed successfully. User awarded 300 points.".to_string(),
                variant: Variant::Default,
            }]
        );

        drop(panel);
        let stored: Vec<RegisteredUser> =
            serde_json::from_str(store.value(USERS_KEY).unwrap()).unwrap();
        assert_eq!(stored[0].points, Some(5));
        assert_eq!(stored[1].points, Some(340));
        assert_eq!(stored[1].field("name"), Some(&serde_json::Value::from("Arun")));
    }

    #[test]
    fn other_fields_of_every_request_are_kept() {
        let mut stored = serde_json::to_value(&sample_requests()[..2]).unwrap();
        for (request, slot) in stored.as_array_mut().unwrap().iter_mut().zip(["9-11", "14-16"]) {
            request["timeSlot"] = Value::from(slot);
        }
        let mut store = MemoryStore::new().with(REQUESTS_KEY, stored.to_string());
        let mut panel = open(&mut store);

        panel.complete("req-001", &mut Lowest).unwrap();

        assert_eq!(panel.requests()[0].field("timeSlot"), Some(&Value::from("9-11")));
        drop(panel);
        let written: Value = serde_json::from_str(store.value(REQUESTS_KEY).unwrap()).unwrap();
        stored[0]["status"] = Value::from("completed");
        assert_eq!(written, stored);
        assert_eq!(written[1]["timeSlot"], "14-16");
    }

    #[test]
    fn unrelated_user_records_do_not_block_the_credit() {
        let users = concat!(
            r#"[{"id":7,"points":-20},"#,
            r#"{"id":"other","points":-20,"tier":null},"#,
            r#"{"id":"test-user-2","points":-10}]"#,
        );
        let mut store = MemoryStore::new().with(USERS_KEY, users);
        let mut panel = open(&mut store);

        let Completion::Completed(award) = panel.complete("req-002", &mut Lowest).unwrap() else {
            panic!("expected the request to be completed");
        };

        // E-waste + Plastic Containers at their minimums.
        assert_eq!(award.points, 300 + 130);
        assert_eq!(award.credit, Credit::Credited { balance: 420 });
        drop(panel);
        assert_eq!(
            store.value(USERS_KEY),
            Some(concat!(
                r#"[{"id":7,"points":-20},"#,
                r#"{"id":"other","points":-20,"tier":null},"#,
                r#"{"id":"test-user-2","points":420}]"#,
            ))
        );
    }

    #[test]
    fn failed_credit_keeps_the_request_completed_and_reports_the_points() {
        let users = r#"[{"id":"test-user-2","points":10}]"#;
        let mut store = ReadOnlyUsers(MemoryStore::new().with(USERS_KEY, users));
        let mut panel = AdminPanel::open(
            &mut store,
            Some(&admin()),
            Config::default(),
            Vec::<Notification>::new(),
        )
        .unwrap();

        let error = panel.complete("req-002", &mut Lowest).unwrap_err();

        let PanelError::CreditFailed {
            request,
            user_id,
            points,
            source,
        } = &error
        else {
            panic!("expected a credit failure, got {error:?}");
        };
        assert_eq!(request.as_str(), "req-002");
        assert_eq!(user_id, "test-user-2");
        assert_eq!(*points, 300 + 130);
        assert!(matches!(source, StoreError::Io { key: USERS_KEY, .. }));
        assert!(panel.notifier.is_empty());
        assert!(!panel.find("req-002").unwrap().is_pending());

        assert_eq!(
            panel.complete("req-002", &mut Lowest).unwrap(),
            Completion::AlreadyCompleted
        );
        drop(panel);
        assert_eq!(stored_requests(&store.0)[1].status, Status::Completed);
        assert_eq!(store.0.value(USERS_KEY), Some(users));
    }

    #[test]
    fn missing_points_field_counts_as_zero() {
        let mut store = MemoryStore::new().with(USERS_KEY, r#"[{"id":"test-user-4"}]"#);
        let mut panel = open(&mut store);

        let Completion::Completed(award) = panel.complete("req-004", &mut Lowest).unwrap() else {
            panic!("expected the request to be completed");
        };

        assert_eq!(award.points, 150 + 200);
        assert_eq!(award.credit, Credit::Credited { balance: 350 });
    }

    #[test]
    fn unmatched_user_leaves_users_untouched() {
        let users = r#"[{"id":"nobody","points":12}]"#;
        let mut store = MemoryStore::new().with(USERS_KEY, users);
        let mut panel = open(&mut store);

        let Completion::Completed(award) = panel.complete("req-001", &mut Lowest).unwrap() else {
            panic!("expected the request to be completed");
        };

        assert_eq!(award.credit, Credit::NoMatchingUser);
        assert_eq!(panel.notifier.len(), 1);
        drop(panel);
        assert_eq!(store.value(USERS_KEY), Some(users));
    }

    #[test]
    fn completing_twice_awards_once() {
        let mut store = MemoryStore::new().with(USERS_KEY, r#"[{"id":"test-user","points":0}]"#);
        let mut panel = open(&mut store);

        panel.complete("req-001", &mut Lowest).unwrap();
        let second = panel.complete("req-001", &mut Lowest).unwrap();

        assert_eq!(second, Completion::AlreadyCompleted);
        assert_eq!(panel.notifier.len(), 1);
        assert_eq!(
            panel.credit_points("test-user", 0).unwrap(),
            Credit::Credited { balance: 150 + 100 + 200 }
        );
    }

    #[test]
    fn completing_unknown_request_changes_nothing() {
        let mut store = MemoryStore::new();
        let mut panel = open(&mut store);
        let before = panel.requests().to_vec();

        assert_eq!(panel.complete("req-404", &mut Lowest).unwrap(), Completion::NotFound);
        assert_eq!(panel.requests(), before);
        assert!(panel.notifier.is_empty());
        drop(panel);
        // Only the seeding write happened.
        assert_eq!(store.writes(), 1);
    }

    #[test]
    fn rejecting_removes_exactly_one_request() {
        let mut store = MemoryStore::new();
        let mut panel = open(&mut store);

        let Rejection::Removed(removed) = panel.reject("req-003").unwrap() else {
            panic!("expected the request to be removed");
        };

        assert_eq!(removed.id.as_str(), "req-003");
        let mut expected = sample_requests();
        expected.remove(2);
        assert_eq!(panel.requests(), expected);
        assert_eq!(panel.notifier[0].variant, Variant::Destructive);
        assert_eq!(panel.notifier[0].title, "Request Rejected");
        drop(panel);
        assert_eq!(stored_requests(&store), expected);
    }

    #[test]
    fn rejecting_unknown_request_changes_nothing() {
        let mut store = MemoryStore::new();
        let mut panel = open(&mut store);

        assert_eq!(panel.reject("req-404").unwrap(), Rejection::NotFound);
        assert_eq!(panel.requests().len(), 4);
        assert!(panel.notifier.is_empty());
    }

    #[test]
    fn summary_tracks_decisions() {
        let mut store = MemoryStore::new();
        let mut panel = open(&mut store);

        panel.complete("req-001", &mut Lowest).unwrap();
        panel.complete("req-002", &mut Lowest).unwrap();
        panel.reject("req-004").unwrap();

        assert_eq!(
            panel.summary(),
            Summary {
                pending: 1,
                completed: 2,
                total: 3,
                points_awarded: 1000,
            }
        );
        assert_eq!(panel.completed().count(), 2);
    }
}
