//! Infrastructure trait definitions (ports).
//!
//! The domain defines *what* it needs from the outside world; infrastructure
//! crates supply the *how*. All three ports are dyn-compatible async traits
//! so the run loop can hold them behind trait objects and tests can swap in
//! in-memory fakes.

use async_trait::async_trait;

use crate::errors::CheckerError;
use crate::identifiers::ResourceId;
use crate::types::{Observation, TriggerRequest, UpstreamRef};

/// Observes an upstream entity's current "last changed" state.
///
/// Implemented over HTTP in the `upstream` crate: commit feeds for git
/// resources, registry tag metadata for image resources.
#[async_trait]
pub trait UpstreamSource: Send + Sync {
    /// Fetches the current change state of `upstream`.
    ///
    /// Failures (unreachable endpoint, malformed payload) are fatal to the
    /// run; there is no per-resource isolation.
    async fn observe(&self, upstream: &UpstreamRef) -> Result<Observation, CheckerError>;
}

/// Durable per-resource key-value persistence of last-seen timestamps.
///
/// Keys are derived from the resource id (`<resource-id>/updated`); values
/// are opaque string blobs. Absence of a record means "never seen" and is
/// reported as `Ok(None)`, not as an error.
#[async_trait]
pub trait StateStore: Send + Sync {
    /// Creates the backing container if it does not exist yet.
    ///
    /// Idempotent; an "already exists" outcome is not an error.
    async fn ensure_container(&self) -> Result<(), CheckerError>;

    /// Reads the persisted blob for `resource`, or `None` if never written.
    async fn get(&self, resource: &ResourceId) -> Result<Option<String>, CheckerError>;

    /// Writes the persisted blob for `resource`, replacing any prior value.
    async fn put(&self, resource: &ResourceId, blob: &str) -> Result<(), CheckerError>;
}

/// Fires one downstream CI build for a detected change.
///
/// Fire-and-forget: implementations report transport failures but never
/// inspect the response beyond completing the HTTP call. No retry, no
/// acceptance confirmation.
#[async_trait]
pub trait BuildTrigger: Send + Sync {
    /// Sends exactly one build request for `request`.
    async fn trigger(&self, request: &TriggerRequest) -> Result<(), CheckerError>;
}
