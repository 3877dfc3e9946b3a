//! Shared value types for the update-checker domain.
//!
//! Unlike the newtype identifiers in [`crate::identifiers`], these types carry
//! meaningful values with invariants (timestamps are UTC-normalized, resource
//! specs are fully populated) and participate in domain computations.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::identifiers::{
    BranchName, CommitSha, ImageName, ParameterName, RepositoryId, TagName, VersionLabel,
};

// ---------------------------------------------------------------------------
// Time
// ---------------------------------------------------------------------------

/// A UTC wall-clock timestamp.
///
/// Wraps [`chrono::DateTime<Utc>`] so callers never depend on `chrono` types
/// directly; the underlying representation can change without affecting the
/// domain API.
///
/// Ordering is the strict chronological order used by the change detector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Timestamp(DateTime<Utc>);

impl Timestamp {
    /// The sentinel baseline used when no prior state exists for a resource:
    /// 1970-01-01T00:00:00Z. Any valid upstream timestamp compares newer.
    pub fn epoch() -> Self {
        Self(DateTime::UNIX_EPOCH)
    }

    /// Creates a [`Timestamp`] from a [`DateTime<Utc>`].
    pub fn from_utc(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }

    /// Returns the underlying [`DateTime<Utc>`].
    pub fn as_datetime(self) -> DateTime<Utc> {
        self.0
    }

    /// Serialises this timestamp to its persisted form.
    ///
    /// RFC 3339 with a `Z` suffix; fractional seconds are kept when present
    /// (registry tag timestamps carry microseconds, commit feeds do not), so
    /// the strict comparison on the next run sees exactly what was observed.
    pub fn to_storage(self) -> String {
        if self.0.timestamp_subsec_nanos() == 0 {
            self.0.to_rfc3339_opts(SecondsFormat::Secs, true)
        } else {
            self.0.to_rfc3339_opts(SecondsFormat::Micros, true)
        }
    }

    /// Parses a persisted timestamp blob.
    ///
    /// Accepts both the whole-second and fractional-second forms written by
    /// [`Timestamp::to_storage`]. Returns `None` for anything else; callers
    /// treat an unreadable blob the same as an absent one.
    pub fn parse_storage(blob: &str) -> Option<Self> {
        DateTime::parse_from_rfc3339(blob.trim())
            .ok()
            .map(|dt| Self(dt.with_timezone(&Utc)))
    }
}

impl std::fmt::Display for Timestamp {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_storage())
    }
}

// ---------------------------------------------------------------------------
// Resource configuration
// ---------------------------------------------------------------------------

/// The upstream entity a resource tracks. Exactly one kind per resource.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum UpstreamRef {
    /// A (source repository, branch) pair, observed via its commit feed.
    Git {
        /// Source repository in `"owner/repo"` format.
        repository: RepositoryId,
        /// The tracked branch.
        branch: BranchName,
    },
    /// A (registry image, tag) pair, observed via the registry's tag metadata.
    Image {
        /// Image in `"namespace/name"` registry format.
        image: ImageName,
        /// The tracked tag.
        tag: TagName,
    },
}

// ---------------------------------------------------------------------------

/// Describes the downstream build fired when a resource changes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSpec {
    /// Downstream build repository id (the repository whose CI is triggered).
    pub repository: RepositoryId,
    /// Version label injected into the downstream build.
    pub version: VersionLabel,
    /// Name of the environment parameter set to the version label.
    pub parameter: ParameterName,
}

// ---------------------------------------------------------------------------

/// One entry of the compiled-in resource table: the upstream to watch plus
/// the downstream build to fire. Immutable for the life of the run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResourceSpec {
    /// The tracked upstream entity.
    pub upstream: UpstreamRef,
    /// The downstream build descriptor.
    pub target: TargetSpec,
}

// ---------------------------------------------------------------------------
// Per-check values
// ---------------------------------------------------------------------------

/// What a single upstream lookup observed.
///
/// The timestamp is always present and is re-persisted even when nothing
/// changed, keeping stored state in sync with upstream clock adjustments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Observation {
    /// Commit-feed observation: the feed-level `updated` timestamp and the
    /// newest entry's commit identifier (final path segment of its first link).
    Git {
        /// Feed-level last-change timestamp.
        updated: Timestamp,
        /// Newest commit on the tracked branch.
        commit: CommitSha,
    },
    /// Registry tag observation: the tag's `last_updated` timestamp.
    Image {
        /// Tag last-push timestamp (microsecond precision).
        last_updated: Timestamp,
    },
}

impl Observation {
    /// The comparison value for change detection.
    pub fn timestamp(&self) -> Timestamp {
        match self {
            Observation::Git { updated, .. } => *updated,
            Observation::Image { last_updated } => *last_updated,
        }
    }
}

// ---------------------------------------------------------------------------

/// Ephemeral record of a detected change, used only to build the trigger
/// request and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEvent {
    /// The newly observed upstream timestamp.
    pub observed: Timestamp,
    /// Human-readable summary: `"<repo> (<branch>, <commit>)"` for git
    /// resources, `"<image> (<tag>)"` for image resources.
    pub message: String,
}

impl ChangeEvent {
    /// Builds the change summary for `upstream` from what was observed.
    pub fn describe(upstream: &UpstreamRef, observation: &Observation) -> Self {
        let message = match (upstream, observation) {
            (UpstreamRef::Git { repository, branch }, Observation::Git { commit, .. }) => {
                format!("{repository} ({branch}, {commit})")
            }
            (UpstreamRef::Image { image, tag }, _) => format!("{image} ({tag})"),
            // A git upstream always yields a git observation; fall back to
            // the branch alone rather than panicking if an adapter misbehaves.
            (UpstreamRef::Git { repository, branch }, _) => format!("{repository} ({branch})"),
        };
        Self {
            observed: observation.timestamp(),
            message,
        }
    }
}

// ---------------------------------------------------------------------------
// Trigger request
// ---------------------------------------------------------------------------

/// Name of the extra environment parameter injected for image-kind resources,
/// telling the downstream build which upstream image to pull.
pub const IMAGE_REPOSITORY_PARAMETER: &str = "IMAGE_REPOSITORY";

/// A single `NAME=value` environment entry for a downstream build.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnvEntry {
    /// Environment variable name.
    pub name: String,
    /// Environment variable value.
    pub value: String,
}

impl std::fmt::Display for EnvEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}={}", self.name, self.value)
    }
}

// ---------------------------------------------------------------------------

/// Everything the build-trigger port needs to fire one downstream build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TriggerRequest {
    /// Downstream build repository id.
    pub repository: RepositoryId,
    /// Human-readable change summary shown on the downstream build.
    pub message: String,
    /// Global environment entries: the version parameter, plus the image
    /// repository parameter for image-kind resources.
    pub env: Vec<EnvEntry>,
}

impl TriggerRequest {
    /// Assembles the trigger request for a detected change.
    ///
    /// Git resources inject exactly one global environment entry
    /// (`<parameter>=<version>`); image resources additionally inject
    /// [`IMAGE_REPOSITORY_PARAMETER`] naming the upstream image, since
    /// image-triggered builds must know which image to pull.
    pub fn for_change(spec: &ResourceSpec, event: &ChangeEvent) -> Self {
        let mut env = vec![EnvEntry {
            name: spec.target.parameter.as_str().to_owned(),
            value: spec.target.version.as_str().to_owned(),
        }];
        if let UpstreamRef::Image { image, .. } = &spec.upstream {
            env.push(EnvEntry {
                name: IMAGE_REPOSITORY_PARAMETER.to_owned(),
                value: image.as_str().to_owned(),
            });
        }
        Self {
            repository: spec.target.repository.clone(),
            message: event.message.clone(),
            env,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::identifiers::{BranchName, CommitSha, ImageName, TagName};
    use chrono::TimeZone;

    fn git_spec() -> ResourceSpec {
        ResourceSpec {
            upstream: UpstreamRef::Git {
                repository: RepositoryId::new("ceph/ceph-ansible").unwrap(),
                branch: BranchName::new("stable-4.0").unwrap(),
            },
            target: TargetSpec {
                repository: RepositoryId::new("docker-ceph-ansible").unwrap(),
                version: VersionLabel::new("nautilus").unwrap(),
                parameter: ParameterName::new("CEPH_VERSION").unwrap(),
            },
        }
    }

    fn image_spec() -> ResourceSpec {
        ResourceSpec {
            upstream: UpstreamRef::Image {
                image: ImageName::new("osism/kolla-ansible").unwrap(),
                tag: TagName::new("latest").unwrap(),
            },
            target: TargetSpec {
                repository: RepositoryId::new("docker-kolla-ansible").unwrap(),
                version: VersionLabel::new("latest").unwrap(),
                parameter: ParameterName::new("OPENSTACK_VERSION").unwrap(),
            },
        }
    }

    #[test]
    fn epoch_is_start_of_1970() {
        assert_eq!(Timestamp::epoch().to_storage(), "1970-01-01T00:00:00Z");
    }

    #[test]
    fn storage_round_trip_whole_seconds() {
        let ts = Timestamp::from_utc(Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap());
        assert_eq!(ts.to_storage(), "2024-01-02T03:04:05Z");
        assert_eq!(Timestamp::parse_storage(&ts.to_storage()), Some(ts));
    }

    #[test]
    fn storage_round_trip_preserves_microseconds() {
        let ts = Timestamp::parse_storage("2024-01-02T03:04:05.123456Z").unwrap();
        assert_eq!(ts.to_storage(), "2024-01-02T03:04:05.123456Z");
        assert_eq!(Timestamp::parse_storage(&ts.to_storage()), Some(ts));
    }

    #[test]
    fn parse_storage_rejects_garbage() {
        assert_eq!(Timestamp::parse_storage("not a timestamp"), None);
        assert_eq!(Timestamp::parse_storage(""), None);
    }

    #[test]
    fn git_change_message_shape() {
        let spec = git_spec();
        let observation = Observation::Git {
            updated: Timestamp::epoch(),
            commit: CommitSha::new("abc123").unwrap(),
        };
        let event = ChangeEvent::describe(&spec.upstream, &observation);
        assert_eq!(event.message, "ceph/ceph-ansible (stable-4.0, abc123)");
    }

    #[test]
    fn image_change_message_shape() {
        let spec = image_spec();
        let observation = Observation::Image {
            last_updated: Timestamp::epoch(),
        };
        let event = ChangeEvent::describe(&spec.upstream, &observation);
        assert_eq!(event.message, "osism/kolla-ansible (latest)");
    }

    #[test]
    fn git_trigger_carries_exactly_one_env_entry() {
        let spec = git_spec();
        let observation = Observation::Git {
            updated: Timestamp::epoch(),
            commit: CommitSha::new("abc123").unwrap(),
        };
        let event = ChangeEvent::describe(&spec.upstream, &observation);
        let request = TriggerRequest::for_change(&spec, &event);
        assert_eq!(request.env.len(), 1);
        assert_eq!(request.env[0].to_string(), "CEPH_VERSION=nautilus");
    }

    #[test]
    fn image_trigger_carries_version_and_image_entries() {
        let spec = image_spec();
        let observation = Observation::Image {
            last_updated: Timestamp::epoch(),
        };
        let event = ChangeEvent::describe(&spec.upstream, &observation);
        let request = TriggerRequest::for_change(&spec, &event);
        let entries: Vec<String> = request.env.iter().map(EnvEntry::to_string).collect();
        assert_eq!(
            entries,
            vec![
                "OPENSTACK_VERSION=latest".to_owned(),
                "IMAGE_REPOSITORY=osism/kolla-ansible".to_owned(),
            ]
        );
    }
}
