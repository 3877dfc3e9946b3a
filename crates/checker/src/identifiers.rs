//! Newtype domain identifiers.
//!
//! Every domain concept that has an identity is represented as a distinct newtype
//! wrapping a `String`. This prevents accidentally interchanging — for example —
//! a [`BranchName`] with a [`TagName`] even though both are strings under the
//! hood.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ---------------------------------------------------------------------------
// Macro for String-wrapped newtypes.
// Generates: struct, new() returning Option<Self>, as_str(), Display.
// ---------------------------------------------------------------------------
macro_rules! string_id {
    (
        $(#[$attr:meta])*
        $name:ident
    ) => {
        $(#[$attr])*
        #[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(String);

        impl $name {
            /// Creates a new identifier, returning `None` if the value is empty.
            pub fn new(value: impl Into<String>) -> Option<Self> {
                let v = value.into();
                if v.is_empty() { None } else { Some(Self(v)) }
            }

            /// Returns the identifier as a string slice.
            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// Identifiers — UUID-backed (internally generated)
// ---------------------------------------------------------------------------

/// Identifies a single checker invocation (one full pass over the registry).
///
/// Generated fresh for every run; propagated through spans so all activity
/// from a single invocation can be correlated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RunId(Uuid);

impl RunId {
    /// Generates a new random run identifier.
    pub fn new_random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying [`Uuid`].
    pub fn as_uuid(self) -> Uuid {
        self.0
    }
}

impl std::fmt::Display for RunId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// Identifiers — String-backed (configuration / upstream names)
// ---------------------------------------------------------------------------

string_id! {
    /// Identifies a tracked resource in the registry (e.g. `"ceph-nautilus"`).
    ///
    /// Also the prefix of the resource's persisted state key,
    /// `<resource-id>/updated`.
    ResourceId
}

string_id! {
    /// Identifies a source repository in `"owner/repo"` format.
    RepositoryId
}

string_id! {
    /// A Git branch name (e.g. `"master"`, `"stable-4.0"`).
    BranchName
}

string_id! {
    /// A Git commit identifier, as extracted from a commit feed entry link.
    CommitSha
}

string_id! {
    /// Identifies a container image in `"namespace/name"` registry format.
    ImageName
}

string_id! {
    /// A container image tag (e.g. `"latest"`).
    TagName
}

string_id! {
    /// The name of an environment variable injected into a downstream build
    /// (e.g. `"CEPH_VERSION"`).
    ParameterName
}

string_id! {
    /// The version label a downstream build is parameterized with
    /// (e.g. `"nautilus"`).
    VersionLabel
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn string_ids_reject_empty_values() {
        assert!(ResourceId::new("").is_none());
        assert!(BranchName::new("").is_none());
        assert!(ParameterName::new("").is_none());
    }

    #[test]
    fn string_ids_round_trip_display() {
        let id = RepositoryId::new("ceph/ceph-ansible").unwrap();
        assert_eq!(id.as_str(), "ceph/ceph-ansible");
        assert_eq!(id.to_string(), "ceph/ceph-ansible");
    }
}
