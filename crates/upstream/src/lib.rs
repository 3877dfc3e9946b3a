//! Upstream observation infrastructure.
//!
//! Implements the [`checker::UpstreamSource`] port over HTTP:
//!
//! - Git resources are observed through the hosting service's public Atom
//!   commit feed ([`github`]).
//! - Image resources are observed through the container registry's tag
//!   metadata endpoint ([`dockerhub`]).
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** All HTTP transport, feed parsing, and response
//! deserialisation live here. The [`checker`] crate sees only
//! [`checker::UpstreamSource`] and [`checker::Observation`].

use async_trait::async_trait;
use checker::{CheckerError, Observation, UpstreamRef, UpstreamSource};

pub mod dockerhub;
pub mod github;

/// Default base URL for commit feeds.
pub const GITHUB_BASE_URL: &str = "https://github.com";

/// Default base URL for registry tag metadata.
pub const DOCKERHUB_BASE_URL: &str = "https://hub.docker.com";

/// HTTP-backed implementation of [`UpstreamSource`], dispatching on the
/// resource kind.
pub struct HttpUpstreamSource {
    http: reqwest::Client,
    github_base: String,
    dockerhub_base: String,
}

impl HttpUpstreamSource {
    /// Creates a source against the public endpoints.
    pub fn new(http: reqwest::Client) -> Self {
        Self::with_base_urls(http, GITHUB_BASE_URL, DOCKERHUB_BASE_URL)
    }

    /// Creates a source against explicit base URLs.
    pub fn with_base_urls(
        http: reqwest::Client,
        github_base: impl Into<String>,
        dockerhub_base: impl Into<String>,
    ) -> Self {
        Self {
            http,
            github_base: github_base.into(),
            dockerhub_base: dockerhub_base.into(),
        }
    }
}

#[async_trait]
impl UpstreamSource for HttpUpstreamSource {
    async fn observe(&self, upstream: &UpstreamRef) -> Result<Observation, CheckerError> {
        match upstream {
            UpstreamRef::Git { repository, branch } => {
                github::observe_branch(&self.http, &self.github_base, repository, branch).await
            }
            UpstreamRef::Image { image, tag } => {
                dockerhub::observe_tag(&self.http, &self.dockerhub_base, image, tag).await
            }
        }
    }
}

/// Maps a transport or parse failure into the domain error, tagged with the
/// upstream locator it concerned.
pub(crate) fn upstream_error(resource: &str, message: impl std::fmt::Display) -> CheckerError {
    CheckerError::Upstream {
        resource: resource.to_owned(),
        message: message.to_string(),
    }
}
