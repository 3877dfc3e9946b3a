//! Top-level error type for the update-checker domain.
//!
//! [`CheckerError`] covers every failure an infrastructure port can report.
//! The run loop decides per variant whether a failure aborts the run
//! (upstream/trigger) or degrades to a default (store reads fall back to the
//! epoch baseline, store writes are logged and dropped).

use thiserror::Error;

/// Errors reported by the infrastructure ports and the run loop.
///
/// Infrastructure crates map their transport-level errors into these
/// variants; the domain never sees `reqwest` or SDK error types directly.
#[derive(Debug, Error)]
pub enum CheckerError {
    /// An upstream lookup failed: the commit feed or registry endpoint was
    /// unreachable, or its payload could not be parsed.
    ///
    /// Produced by: [`crate::ports::UpstreamSource`] implementations.
    /// Aborts the run for all remaining resources.
    #[error("Upstream lookup for '{resource}' failed: {message}")]
    Upstream {
        /// Human-readable locator of the upstream being observed.
        resource: String,
        /// Description of the transport or parse failure.
        message: String,
    },

    /// The downstream build-trigger request could not be sent.
    ///
    /// Produced by: [`crate::ports::BuildTrigger`] implementations on
    /// transport failure only. The response status of a delivered request is
    /// never inspected; a downstream rejection is invisible by design.
    #[error("Build trigger for '{repository}' failed: {message}")]
    Trigger {
        /// Downstream build repository id.
        repository: String,
        /// Description of the transport failure.
        message: String,
    },

    /// A state-store read or write failed.
    ///
    /// Produced by: [`crate::ports::StateStore`] implementations. The run
    /// loop treats a failed read as "never seen" (epoch-zero baseline) and a
    /// failed write as a warning; neither aborts the run.
    #[error("State store operation on '{key}' failed: {message}")]
    Store {
        /// The storage key involved.
        key: String,
        /// Description of the storage failure.
        message: String,
    },

    /// The runtime configuration is invalid or incomplete.
    ///
    /// Produced at startup, before any network call; the checker never
    /// starts with an invalid configuration.
    #[error("Configuration error: {message}")]
    Configuration {
        /// Description of the configuration problem.
        message: String,
    },
}
