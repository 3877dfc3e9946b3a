//! Core domain for the update checker.
//!
//! This crate contains every domain concept, newtype identifier, shared value
//! type, and cross-cutting error type used throughout the workspace, plus the
//! change-detection logic and the sequential run loop. Infrastructure crates
//! implement the port traits defined here; they never add domain rules.
//!
//! ## Architectural Layer
//!
//! **Business logic + port definitions.** This crate has no I/O dependencies.
//! It defines *what* is needed; infrastructure crates define *how* to supply it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype domain identifiers (`ResourceId`, `BranchName`, etc.) |
//! | [`types`] | Shared value types (`Timestamp`, `ResourceSpec`, `Observation`, etc.) |
//! | [`errors`] | Top-level error type |
//! | [`ports`] | Infrastructure trait definitions |
//! | [`registry`] | The compiled-in table of tracked resources |
//! | [`detector`] | The changed-iff-strictly-newer decision rule |
//! | [`run`] | The sequential per-resource check loop |

pub mod detector;
pub mod errors;
pub mod identifiers;
pub mod ports;
pub mod registry;
pub mod run;
pub mod types;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use errors::CheckerError;
pub use identifiers::{
    BranchName, CommitSha, ImageName, ParameterName, RepositoryId, ResourceId, RunId, TagName,
    VersionLabel,
};
pub use ports::{BuildTrigger, StateStore, UpstreamSource};
pub use registry::ResourceRegistry;
pub use run::UpdateChecker;
pub use types::{
    ChangeEvent, EnvEntry, Observation, ResourceSpec, TargetSpec, Timestamp, TriggerRequest,
    UpstreamRef,
};
