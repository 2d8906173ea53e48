use chrono::{DateTime, SubsecRound, TimeZone, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{LearnHubError, Result};

/// Current time truncated to the millisecond precision rows are stored with
pub fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

/// Storage representation of a timestamp
pub fn to_millis(ts: DateTime<Utc>) -> i64 {
    ts.timestamp_millis()
}

/// Inverse of [`to_millis`]; `None` when out of chrono's range
pub fn from_millis(ms: i64) -> Option<DateTime<Utc>> {
    Utc.timestamp_millis_opt(ms).single()
}

/// Logical state of a soft-deletable record
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordState {
    Active,
    Deleted,
}

/// Timestamps and soft-delete flag shared by every soft-deletable record
///
/// Invariant: `is_deleted` is true exactly when `deleted_at` is set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lifecycle {
    /// Set once at creation
    pub created_at: DateTime<Utc>,

    /// Refreshed by direct saves only; bulk updates leave it alone
    pub updated_at: DateTime<Utc>,

    pub is_deleted: bool,

    pub deleted_at: Option<DateTime<Utc>>,
}

impl Lifecycle {
    /// Lifecycle of a record created at `now`
    pub fn new(now: DateTime<Utc>) -> Self {
        Self {
            created_at: now,
            updated_at: now,
            is_deleted: false,
            deleted_at: None,
        }
    }

    pub fn state(&self) -> RecordState {
        if self.is_deleted {
            RecordState::Deleted
        } else {
            RecordState::Active
        }
    }

    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Direct save
    pub fn touch(&mut self, now: DateTime<Utc>) {
        self.updated_at = now;
    }

    /// Per-record soft delete; an existing deletion time is kept
    pub fn mark_deleted(&mut self, now: DateTime<Utc>) {
        self.is_deleted = true;
        self.deleted_at = Some(self.deleted_at.unwrap_or(now));
        self.updated_at = now;
    }

    /// Per-record restore
    pub fn mark_restored(&mut self, now: DateTime<Utc>) {
        self.is_deleted = false;
        self.deleted_at = None;
        self.updated_at = now;
    }

    /// Describe a broken flag/timestamp pairing, if any
    pub fn violation(&self) -> Option<&'static str> {
        match (self.is_deleted, self.deleted_at) {
            (true, None) => Some("is_deleted is set but deleted_at is null"),
            (false, Some(_)) => Some("deleted_at is set on an active record"),
            _ => None,
        }
    }
}

/// A persisted domain object using the soft-delete convention
pub trait Record {
    /// Entity label used in logs, errors and purge reports (`app.Model`)
    const LABEL: &'static str;

    fn id(&self) -> i64;

    fn lifecycle(&self) -> &Lifecycle;

    fn lifecycle_mut(&mut self) -> &mut Lifecycle;

    /// Check the `is_deleted`/`deleted_at` invariant
    ///
    /// # Errors
    ///
    /// Returns `LifecycleInvariant` naming the record when the pairing is broken.
    fn check_lifecycle(&self) -> Result<()> {
        match self.lifecycle().violation() {
            Some(reason) => Err(LearnHubError::LifecycleInvariant {
                label: Self::LABEL.to_string(),
                id: self.id(),
                reason: reason.to_string(),
            }),
            None => Ok(()),
        }
    }
}
