//! Downstream build-trigger infrastructure.
//!
//! Implements the [`checker::BuildTrigger`] port against the Travis CI API
//! (v3): one `POST /repo/<owner>%2F<repository>/requests` per detected
//! change, authenticated with an API token. The request always targets the
//! downstream repository's default branch and injects the change summary and
//! global environment entries assembled by the domain.
//!
//! Fire-and-forget by contract: the response status is logged but never
//! inspected; there is no retry and no acceptance confirmation.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** API versioning headers, authentication, and payload
//! formatting live here. The [`checker`] crate sees only
//! [`checker::BuildTrigger`].

use async_trait::async_trait;
use serde::Serialize;

use checker::{BuildTrigger, CheckerError, TriggerRequest};

/// Default base URL of the build-request API.
pub const DEFAULT_API_URL: &str = "https://api.travis-ci.org";

/// API version announced in the `Travis-API-Version` header.
const API_VERSION: &str = "3";

/// Branch the downstream build request always targets.
const TARGET_BRANCH: &str = "master";

/// Travis CI build-trigger client.
pub struct TravisClient {
    http: reqwest::Client,
    api_url: String,
    owner: String,
    token: String,
}

impl TravisClient {
    /// Creates a client for downstream repositories under `owner`.
    pub fn new(
        http: reqwest::Client,
        api_url: impl Into<String>,
        owner: impl Into<String>,
        token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            api_url: api_url.into(),
            owner: owner.into(),
            token: token.into(),
        }
    }

    /// The build-request endpoint for `repository`, with the owner/repository
    /// slug URL-encoded as the API requires.
    fn request_url(&self, repository: &str) -> String {
        format!(
            "{}/repo/{}%2F{}/requests",
            self.api_url, self.owner, repository
        )
    }
}

// ---------------------------------------------------------------------------
// Wire payload
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
struct RequestBody<'a> {
    request: BuildRequest<'a>,
}

#[derive(Debug, Serialize)]
struct BuildRequest<'a> {
    branch: &'a str,
    message: &'a str,
    config: BuildConfig,
}

#[derive(Debug, Serialize)]
struct BuildConfig {
    env: BuildEnv,
}

#[derive(Debug, Serialize)]
struct BuildEnv {
    global: Vec<String>,
}

impl<'a> RequestBody<'a> {
    fn for_request(request: &'a TriggerRequest) -> Self {
        Self {
            request: BuildRequest {
                branch: TARGET_BRANCH,
                message: &request.message,
                config: BuildConfig {
                    env: BuildEnv {
                        global: request.env.iter().map(ToString::to_string).collect(),
                    },
                },
            },
        }
    }
}

#[async_trait]
impl BuildTrigger for TravisClient {
    async fn trigger(&self, request: &TriggerRequest) -> Result<(), CheckerError> {
        let url = self.request_url(request.repository.as_str());
        let body = RequestBody::for_request(request);

        let response = self
            .http
            .post(&url)
            .header("Travis-API-Version", API_VERSION)
            .header("Authorization", format!("token {}", self.token))
            .json(&body)
            .send()
            .await
            .map_err(|e| CheckerError::Trigger {
                repository: request.repository.as_str().to_owned(),
                message: e.to_string(),
            })?;

        // Never inspected for success; a downstream rejection is invisible.
        tracing::debug!(status = %response.status(), %url, "Build request sent");
        Ok(())
    }
}
