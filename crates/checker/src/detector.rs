//! The change-detection decision rule.
//!
//! A resource is considered changed iff the freshly observed timestamp is
//! *strictly* newer than the last-seen baseline. Equal timestamps are
//! unchanged, which is what makes repeated runs idempotent when nothing
//! happened upstream.

use crate::identifiers::CommitSha;
use crate::types::Timestamp;

/// Returns `true` iff `observed` is strictly newer than `last_seen`.
///
/// Both values are UTC-normalized [`Timestamp`]s; callers substitute
/// [`Timestamp::epoch`] for `last_seen` when no prior state exists.
pub fn is_changed(observed: Timestamp, last_seen: Timestamp) -> bool {
    observed > last_seen
}

/// Extracts a commit identifier from a commit-feed entry link by taking the
/// final path segment of its href.
///
/// Feed entry links look like `https://github.com/owner/repo/commit/<sha>`.
/// Returns `None` when the final segment is empty (trailing slash, bare host).
pub fn commit_from_link(href: &str) -> Option<CommitSha> {
    let segment = href.rsplit('/').next()?;
    CommitSha::new(segment)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    fn ts(y: i32, mo: u32, d: u32) -> Timestamp {
        Timestamp::from_utc(Utc.with_ymd_and_hms(y, mo, d, 0, 0, 0).unwrap())
    }

    #[test]
    fn strictly_newer_is_changed() {
        assert!(is_changed(ts(2024, 1, 2), ts(2024, 1, 1)));
    }

    #[test]
    fn equal_timestamps_are_unchanged() {
        assert!(!is_changed(ts(2024, 1, 1), ts(2024, 1, 1)));
    }

    #[test]
    fn older_observation_is_unchanged() {
        assert!(!is_changed(ts(2024, 1, 1), ts(2024, 1, 2)));
    }

    #[test]
    fn any_post_epoch_timestamp_beats_the_epoch_baseline() {
        assert!(is_changed(ts(1970, 1, 2), Timestamp::epoch()));
        assert!(!is_changed(Timestamp::epoch(), Timestamp::epoch()));
    }

    #[test]
    fn sub_second_precision_participates_in_the_comparison() {
        let coarse = Timestamp::parse_storage("2024-01-01T00:00:00Z").unwrap();
        let fine = Timestamp::parse_storage("2024-01-01T00:00:00.000001Z").unwrap();
        assert!(is_changed(fine, coarse));
        assert!(!is_changed(coarse, fine));
    }

    #[test]
    fn commit_is_the_final_path_segment() {
        let sha = commit_from_link("https://github.com/ceph/ceph-ansible/commit/abc123").unwrap();
        assert_eq!(sha.as_str(), "abc123");
    }

    #[test]
    fn trailing_slash_yields_no_commit() {
        assert!(commit_from_link("https://github.com/ceph/ceph-ansible/commit/").is_none());
    }
}
