//! Update-checker entry point.
//!
//! This binary is the composition root for the whole workspace:
//!
//! 1. **Load configuration** — read the environment (with `.env` support) and
//!    fail fast if anything required is missing.
//! 2. **Wire observability** — `tracing-subscriber` with an `EnvFilter`, so
//!    `RUST_LOG` controls verbosity. Progress is one `info` line per resource.
//! 3. **Construct infrastructure** — the HTTP upstream source, the
//!    object-storage state store, and the CI trigger client, injected into
//!    [`checker::UpdateChecker`].
//! 4. **Run once** — one sequential pass over the built-in registry, then
//!    exit. Scheduling recurring runs (and ensuring two instances never
//!    overlap on one state store) is the operator's job.
//!
//! # Environment variables
//!
//! | Variable              | Required | Default                      | Description                     |
//! |-----------------------|----------|------------------------------|---------------------------------|
//! | `MINIO_SERVER`        | yes      | --                           | Object-storage endpoint host    |
//! | `MINIO_ACCESS_KEY`    | yes      | --                           | Object-storage access key       |
//! | `MINIO_SECRET_KEY`    | yes      | --                           | Object-storage secret key       |
//! | `TRAVIS_ACCESS_TOKEN` | yes      | --                           | CI API token                    |
//! | `TRAVIS_API_URL`      | no       | `https://api.travis-ci.org`  | CI API base URL                 |
//! | `TRAVIS_OWNER`        | no       | `osism`                      | Downstream repository namespace |
//! | `TRIGGER_BUCKET`      | no       | `trigger`                    | State bucket name               |
//! | `RUST_LOG`            | no       | `info`                       | Log filter                      |

mod config;

use std::sync::Arc;

use checker::{ResourceRegistry, UpdateChecker};
use store::ObjectStateStore;
use travis::TravisClient;
use upstream::HttpUpstreamSource;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let http = reqwest::Client::new();
    let upstream = Arc::new(HttpUpstreamSource::new(http.clone()));
    let store = Arc::new(ObjectStateStore::new(
        config.storage_endpoint,
        &config.storage_access_key,
        &config.storage_secret_key,
        config.state_bucket,
    ));
    let trigger = Arc::new(TravisClient::new(
        http,
        config.ci_api_url,
        config.ci_owner,
        config.ci_token,
    ));

    let registry = ResourceRegistry::builtin();
    let checker = UpdateChecker::new(upstream, store, trigger);
    checker.run(&registry).await?;

    Ok(())
}
