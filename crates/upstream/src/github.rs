//! Commit-feed observation for git resources.
//!
//! Fetches `https://github.com/<repo>/commits/<branch>.atom` and reads two
//! things out of it: the feed-level `updated` timestamp (the comparison value
//! for change detection) and the newest entry's commit identifier, taken as
//! the final path segment of that entry's first link.

use checker::{detector, BranchName, CheckerError, Observation, RepositoryId, Timestamp};

use crate::upstream_error;

/// Observes the current state of a (repository, branch) pair.
pub(crate) async fn observe_branch(
    http: &reqwest::Client,
    base_url: &str,
    repository: &RepositoryId,
    branch: &BranchName,
) -> Result<Observation, CheckerError> {
    let label = format!("{repository}@{branch}");
    let url = format!("{base_url}/{repository}/commits/{branch}.atom");
    tracing::debug!(%url, "Fetching commit feed");

    let response = http
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| upstream_error(&label, e))?;
    let body = response
        .bytes()
        .await
        .map_err(|e| upstream_error(&label, e))?;

    parse_feed(&body, &label)
}

/// Parses an Atom commit feed into a git [`Observation`].
fn parse_feed(body: &[u8], label: &str) -> Result<Observation, CheckerError> {
    let feed = feed_rs::parser::parse(body)
        .map_err(|e| upstream_error(label, format!("malformed commit feed: {e}")))?;

    let updated = feed
        .updated
        .ok_or_else(|| upstream_error(label, "commit feed carries no updated timestamp"))?;

    let entry = feed
        .entries
        .first()
        .ok_or_else(|| upstream_error(label, "commit feed has no entries"))?;
    let link = entry
        .links
        .first()
        .ok_or_else(|| upstream_error(label, "newest feed entry has no link"))?;
    let commit = detector::commit_from_link(&link.href)
        .ok_or_else(|| upstream_error(label, "newest feed entry link has no commit segment"))?;

    Ok(Observation::Git {
        updated: Timestamp::from_utc(updated),
        commit,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom" xmlns:media="http://search.yahoo.com/mrss/" xml:lang="en-US">
  <id>tag:github.com,2008:/ceph/ceph-ansible/commits/stable-4.0</id>
  <title>Recent Commits to ceph-ansible:stable-4.0</title>
  <updated>2024-01-02T00:00:00Z</updated>
  <entry>
    <id>tag:github.com,2008:Grit::Commit/abc123</id>
    <link type="text/html" rel="alternate" href="https://github.com/ceph/ceph-ansible/commit/abc123"/>
    <title>Fix a thing</title>
    <updated>2024-01-02T00:00:00Z</updated>
  </entry>
  <entry>
    <id>tag:github.com,2008:Grit::Commit/older0</id>
    <link type="text/html" rel="alternate" href="https://github.com/ceph/ceph-ansible/commit/older0"/>
    <title>Older change</title>
    <updated>2024-01-01T00:00:00Z</updated>
  </entry>
</feed>"#;

    #[test]
    fn parses_updated_and_newest_commit() {
        let observation = parse_feed(FEED.as_bytes(), "ceph/ceph-ansible@stable-4.0").unwrap();
        match observation {
            Observation::Git { updated, commit } => {
                assert_eq!(updated, Timestamp::parse_storage("2024-01-02T00:00:00Z").unwrap());
                assert_eq!(commit.as_str(), "abc123");
            }
            other => panic!("expected a git observation, got {other:?}"),
        }
    }

    #[test]
    fn feed_without_entries_is_malformed() {
        let feed = r#"<?xml version="1.0" encoding="UTF-8"?>
<feed xmlns="http://www.w3.org/2005/Atom">
  <id>tag:github.com,2008:/ceph/ceph-ansible/commits/empty</id>
  <title>Recent Commits</title>
  <updated>2024-01-02T00:00:00Z</updated>
</feed>"#;
        let err = parse_feed(feed.as_bytes(), "ceph/ceph-ansible@empty").unwrap_err();
        assert!(err.to_string().contains("no entries"));
    }

    #[test]
    fn garbage_bytes_are_malformed() {
        assert!(parse_feed(b"not xml at all", "x@y").is_err());
    }
}
