//! Registry tag observation for image resources.
//!
//! Fetches `https://hub.docker.com/v2/repositories/<image>/tags/<tag>/` and
//! reads the `last_updated` field, reported with microsecond precision
//! (`YYYY-MM-DDTHH:MM:SS.ffffffZ`).

use serde::Deserialize;

use checker::{CheckerError, ImageName, Observation, TagName, Timestamp};

use crate::upstream_error;

/// The slice of the tag metadata response this checker cares about.
#[derive(Debug, Deserialize)]
struct TagMetadata {
    last_updated: String,
}

/// Observes the current state of an (image, tag) pair.
pub(crate) async fn observe_tag(
    http: &reqwest::Client,
    base_url: &str,
    image: &ImageName,
    tag: &TagName,
) -> Result<Observation, CheckerError> {
    let label = format!("{image}:{tag}");
    let url = format!("{base_url}/v2/repositories/{image}/tags/{tag}/");
    tracing::debug!(%url, "Fetching tag metadata");

    let response = http
        .get(&url)
        .send()
        .await
        .and_then(|r| r.error_for_status())
        .map_err(|e| upstream_error(&label, e))?;
    let body = response
        .bytes()
        .await
        .map_err(|e| upstream_error(&label, e))?;

    parse_tag(&body, &label)
}

/// Parses a tag metadata response into an image [`Observation`].
fn parse_tag(body: &[u8], label: &str) -> Result<Observation, CheckerError> {
    let metadata: TagMetadata = serde_json::from_slice(body)
        .map_err(|e| upstream_error(label, format!("malformed tag metadata: {e}")))?;

    let last_updated = Timestamp::parse_storage(&metadata.last_updated).ok_or_else(|| {
        upstream_error(
            label,
            format!("unparsable last_updated value '{}'", metadata.last_updated),
        )
    })?;

    Ok(Observation::Image { last_updated })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_last_updated_with_microseconds() {
        let body = br#"{
            "creator": 1,
            "name": "latest",
            "last_updated": "2024-01-02T03:04:05.123456Z",
            "tag_status": "active"
        }"#;
        let observation = parse_tag(body, "osism/kolla-ansible:latest").unwrap();
        match observation {
            Observation::Image { last_updated } => {
                assert_eq!(
                    last_updated,
                    Timestamp::parse_storage("2024-01-02T03:04:05.123456Z").unwrap()
                );
            }
            other => panic!("expected an image observation, got {other:?}"),
        }
    }

    #[test]
    fn missing_last_updated_is_malformed() {
        let err = parse_tag(br#"{"name": "latest"}"#, "osism/kolla-ansible:latest").unwrap_err();
        assert!(err.to_string().contains("malformed tag metadata"));
    }

    #[test]
    fn unparsable_last_updated_is_malformed() {
        let err = parse_tag(
            br#"{"last_updated": "yesterday"}"#,
            "osism/kolla-ansible:latest",
        )
        .unwrap_err();
        assert!(err.to_string().contains("unparsable last_updated"));
    }
}
