//! Persistence for todo records.
//!
//! # Design
//! `TodoStore` is the only seam between the HTTP layer and storage. Both
//! implementations assign ids and timestamps themselves and return the full
//! record after every mutation, so handlers never build a `Todo` by hand.
//!
//! Timestamps are kept at millisecond precision. `updatedAt` is bumped by at
//! least one millisecond on every mutation so it strictly increases per record.

mod memory;
mod sqlite;

use async_trait::async_trait;
use chrono::{DateTime, Duration, SubsecRound, Utc};
use uuid::Uuid;

use crate::error::StoreError;
use crate::Todo;

pub use memory::MemoryStore;
pub use sqlite::SqliteStore;

#[async_trait]
pub trait TodoStore: Send + Sync {
    /// Insert a new, uncompleted record.
    async fn insert(&self, text: &str) -> Result<Todo, StoreError>;

    /// All records, newest `created_at` first.
    async fn list(&self) -> Result<Vec<Todo>, StoreError>;

    /// Set `completed` on a record. `None` if the id is unknown.
    async fn update_completion(&self, id: Uuid, completed: bool)
        -> Result<Option<Todo>, StoreError>;

    /// Remove a record. Returns whether it existed.
    async fn delete(&self, id: Uuid) -> Result<bool, StoreError>;
}

pub(crate) fn now() -> DateTime<Utc> {
    Utc::now().trunc_subsecs(3)
}

pub(crate) fn next_updated_at(previous: DateTime<Utc>) -> DateTime<Utc> {
    let now = now();
    if now > previous {
        now
    } else {
        previous + Duration::milliseconds(1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn now_has_millisecond_precision() {
        let stamp = now();
        assert_eq!(stamp.timestamp_subsec_nanos() % 1_000_000, 0);
    }

    #[test]
    fn next_updated_at_bumps_future_stamp() {
        let ahead = now() + Duration::seconds(60);
        assert_eq!(next_updated_at(ahead), ahead + Duration::milliseconds(1));
    }

    #[test]
    fn next_updated_at_uses_clock_when_ahead() {
        let past = now() - Duration::seconds(60);
        assert!(next_updated_at(past) > past + Duration::seconds(59));
    }
}
