//! Runtime configuration, read from the process environment.
//!
//! No configuration files and no flags: the checker is driven entirely by
//! environment variables (with `.env` support for local development). Missing
//! required variables fail the run before any network call.

use checker::CheckerError;

/// Everything the composition root needs to wire the infrastructure.
#[derive(Debug, Clone)]
pub struct Config {
    /// Object-storage endpoint URL (scheme added if the variable omits it).
    pub storage_endpoint: String,
    /// Object-storage access key.
    pub storage_access_key: String,
    /// Object-storage secret key.
    pub storage_secret_key: String,
    /// Bucket holding the per-resource state records.
    pub state_bucket: String,
    /// CI API token for build-trigger requests.
    pub ci_token: String,
    /// CI API base URL.
    pub ci_api_url: String,
    /// Owner/namespace of the downstream build repositories.
    pub ci_owner: String,
}

/// Default bucket for last-seen records.
const DEFAULT_BUCKET: &str = "trigger";

/// Default owner of the downstream build repositories.
const DEFAULT_OWNER: &str = "osism";

impl Config {
    /// Loads the configuration from the environment.
    pub fn from_env() -> Result<Self, CheckerError> {
        Ok(Self {
            storage_endpoint: endpoint_url(&required("MINIO_SERVER")?),
            storage_access_key: required("MINIO_ACCESS_KEY")?,
            storage_secret_key: required("MINIO_SECRET_KEY")?,
            state_bucket: optional("TRIGGER_BUCKET", DEFAULT_BUCKET),
            ci_token: required("TRAVIS_ACCESS_TOKEN")?,
            ci_api_url: optional("TRAVIS_API_URL", travis::DEFAULT_API_URL),
            ci_owner: optional("TRAVIS_OWNER", DEFAULT_OWNER),
        })
    }
}

fn required(name: &str) -> Result<String, CheckerError> {
    match std::env::var(name) {
        Ok(value) if !value.is_empty() => Ok(value),
        _ => Err(CheckerError::Configuration {
            message: format!("environment variable {name} is required"),
        }),
    }
}

fn optional(name: &str, default: &str) -> String {
    std::env::var(name)
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| default.to_owned())
}

/// Normalises the storage endpoint to a full URL. The variable historically
/// holds a bare host; TLS is assumed when no scheme is given.
fn endpoint_url(server: &str) -> String {
    if server.starts_with("http://") || server.starts_with("https://") {
        server.to_owned()
    } else {
        format!("https://{server}")
    }
}
