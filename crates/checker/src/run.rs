//! The sequential per-resource check loop.
//!
//! One invocation walks the registry in order, performing for each resource:
//! fetch upstream state, read the persisted baseline, compare, optionally
//! fire the downstream build, persist the newly observed timestamp. There is
//! no overlap between resources and no cross-run coordination; concurrent
//! invocations against the same state store must be avoided by the operator.

use std::sync::Arc;

use crate::detector::is_changed;
use crate::errors::CheckerError;
use crate::identifiers::{ResourceId, RunId};
use crate::ports::{BuildTrigger, StateStore, UpstreamSource};
use crate::registry::ResourceRegistry;
use crate::types::{ChangeEvent, ResourceSpec, Timestamp, TriggerRequest, UpstreamRef};

/// Drives one full pass over a [`ResourceRegistry`].
///
/// Holds the three infrastructure ports behind trait objects so the
/// composition root decides the concrete transports and tests can substitute
/// in-memory fakes.
pub struct UpdateChecker {
    upstream: Arc<dyn UpstreamSource>,
    store: Arc<dyn StateStore>,
    trigger: Arc<dyn BuildTrigger>,
}

impl UpdateChecker {
    /// Wires the checker to its infrastructure.
    pub fn new(
        upstream: Arc<dyn UpstreamSource>,
        store: Arc<dyn StateStore>,
        trigger: Arc<dyn BuildTrigger>,
    ) -> Self {
        Self {
            upstream,
            store,
            trigger,
        }
    }

    /// Checks every resource in `registry` once, strictly sequentially.
    ///
    /// Upstream and trigger transport failures abort the run for all
    /// remaining resources; store failures degrade per resource (reads fall
    /// back to the epoch baseline, writes are logged and dropped).
    pub async fn run(&self, registry: &ResourceRegistry) -> Result<(), CheckerError> {
        let run_id = RunId::new_random();
        tracing::debug!(%run_id, resources = registry.len(), "Starting check pass");

        if let Err(e) = self.store.ensure_container().await {
            // A missing container makes every read degrade to the epoch
            // baseline and every write fail softly; the pass still runs.
            tracing::warn!(error = %e, "Could not ensure the state container exists");
        }

        for (id, spec) in registry.iter() {
            match &spec.upstream {
                UpstreamRef::Git { repository, branch } => {
                    tracing::info!("Checking {branch} @ {repository}");
                }
                UpstreamRef::Image { image, tag } => {
                    tracing::info!("Checking {tag} @ {image}");
                }
            }
            self.check(id, spec).await?;
        }

        tracing::debug!(%run_id, "Check pass complete");
        Ok(())
    }

    /// Performs one resource's check: observe, compare, trigger, persist.
    async fn check(&self, id: &ResourceId, spec: &ResourceSpec) -> Result<(), CheckerError> {
        let observation = self.upstream.observe(&spec.upstream).await?;
        let last_seen = self.load_last_seen(id).await;

        if is_changed(observation.timestamp(), last_seen) {
            let event = ChangeEvent::describe(&spec.upstream, &observation);
            let request = TriggerRequest::for_change(spec, &event);
            tracing::info!(
                "Triggering {} @ {}",
                spec.target.version,
                spec.target.repository
            );
            self.trigger.trigger(&request).await?;
        }

        // Persisted even when unchanged, keeping stored state in sync with
        // upstream clock adjustments. Best effort: the next run simply
        // re-detects from the previous baseline if this write is lost.
        let blob = observation.timestamp().to_storage();
        if let Err(e) = self.store.put(id, &blob).await {
            tracing::warn!(resource = %id, error = %e, "Could not persist last-seen timestamp");
        }

        Ok(())
    }

    /// Reads the persisted baseline for `id`.
    ///
    /// Absent, unreadable, or unparsable state all degrade to the epoch-zero
    /// sentinel; a missing baseline is "never seen", not an error.
    async fn load_last_seen(&self, id: &ResourceId) -> Timestamp {
        match self.store.get(id).await {
            Ok(Some(blob)) => Timestamp::parse_storage(&blob).unwrap_or_else(|| {
                tracing::warn!(resource = %id, blob, "Unparsable last-seen blob, using epoch");
                Timestamp::epoch()
            }),
            Ok(None) => Timestamp::epoch(),
            Err(e) => {
                tracing::warn!(resource = %id, error = %e, "State read failed, using epoch");
                Timestamp::epoch()
            }
        }
    }
}
