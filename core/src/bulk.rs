//! Ordered, one-at-a-time deletion of several todos.
//!
//! Deletes run strictly in the given order and stop at the first failure.
//! Nothing is rolled back: ids in `deleted` are gone on the server even when
//! the report carries a failure.

use uuid::Uuid;

use crate::error::ApiError;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BulkDeleteReport {
    /// Confirmed deletions, in request order.
    pub deleted: Vec<Uuid>,
    /// The id whose delete failed, with the error.
    pub failed: Option<(Uuid, ApiError)>,
    /// Ids never attempted because an earlier delete failed.
    pub skipped: Vec<Uuid>,
}

impl BulkDeleteReport {
    pub fn is_complete(&self) -> bool {
        self.failed.is_none()
    }
}

/// Run `delete` for each id in order, awaiting each before the next.
pub fn delete_sequentially<F>(ids: &[Uuid], mut delete: F) -> BulkDeleteReport
where
    F: FnMut(Uuid) -> Result<(), ApiError>,
{
    let mut report = BulkDeleteReport::default();
    for (pos, &id) in ids.iter().enumerate() {
        if let Err(err) = delete(id) {
            report.failed = Some((id, err));
            report.skipped = ids[pos + 1..].to_vec();
            break;
        }
        report.deleted.push(id);
    }
    report
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(n: u128) -> Vec<Uuid> {
        (1..=n).map(Uuid::from_u128).collect()
    }

    #[test]
    fn all_succeed() {
        let ids = ids(3);
        let mut seen = Vec::new();
        let report = delete_sequentially(&ids, |id| {
            seen.push(id);
            Ok(())
        });
        assert!(report.is_complete());
        assert_eq!(report.deleted, ids);
        assert_eq!(seen, ids);
        assert!(report.skipped.is_empty());
    }

    #[test]
    fn stops_at_first_failure() {
        let ids = ids(4);
        let mut calls = 0;
        let report = delete_sequentially(&ids, |id| {
            calls += 1;
            if id == ids[1] {
                Err(ApiError::NetworkError("reset".into()))
            } else {
                Ok(())
            }
        });
        assert_eq!(calls, 2);
        assert_eq!(report.deleted, vec![ids[0]]);
        assert_eq!(
            report.failed,
            Some((ids[1], ApiError::NetworkError("reset".into())))
        );
        assert_eq!(report.skipped, vec![ids[2], ids[3]]);
    }

    #[test]
    fn empty_input_is_complete() {
        let report = delete_sequentially(&[], |_| unreachable!());
        assert!(report.is_complete());
        assert!(report.deleted.is_empty());
    }
}
