//! Canonical Statuspage incident URLs.
//!
//! Front matches app events to links by URL, so the URL built when a link is
//! created must be byte-identical to the one sent with every later event for
//! the same incident.

use crate::{RelayError, StatuspageUrl};

/// Builds `{base}/incidents/{id}`.
///
/// Exactly one trailing `/` is removed from `base` and exactly one leading `/`
/// from `id`; anything beyond that is left as-is. Fails with
/// [`RelayError::InvalidIncidentIdentifier`] if `id` is empty after stripping.
pub fn canonical_url(base: &str, id: &str) -> Result<String, RelayError> {
    let base = base.strip_suffix('/').unwrap_or(base);
    let clean_id = id.strip_prefix('/').unwrap_or(id);
    if clean_id.is_empty() {
        tracing::error!(incident_id = %id, "Invalid incident identifier");
        return Err(RelayError::InvalidIncidentIdentifier { id: id.to_string() });
    }
    Ok(format!("{base}/incidents/{clean_id}"))
}

/// [`canonical_url`] against the configured status page.
pub fn incident_url(base: &StatuspageUrl, id: &str) -> Result<String, RelayError> {
    canonical_url(base.as_str(), id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slash_normalisation_is_idempotent() {
        let expected = "https://x.com/incidents/abc";
        assert_eq!(canonical_url("https://x.com/", "/abc").unwrap(), expected);
        assert_eq!(canonical_url("https://x.com", "abc").unwrap(), expected);
        assert_eq!(canonical_url("https://x.com/", "abc").unwrap(), expected);
        assert_eq!(canonical_url("https://x.com", "/abc").unwrap(), expected);
    }

    #[test]
    fn strips_exactly_one_slash() {
        assert_eq!(
            canonical_url("https://x.com//", "//abc").unwrap(),
            "https://x.com//incidents//abc"
        );
    }

    #[test]
    fn preserves_base_path() {
        assert_eq!(
            canonical_url("https://example.com/status/", "p31zjtct2jer").unwrap(),
            "https://example.com/status/incidents/p31zjtct2jer"
        );
    }

    #[test]
    fn empty_identifier_is_rejected() {
        for id in ["", "/"] {
            let err = canonical_url("https://x.com", id).unwrap_err();
            assert!(
                matches!(err, RelayError::InvalidIncidentIdentifier { .. }),
                "{id:?} should be rejected"
            );
        }
    }

    #[test]
    fn uses_configured_base() {
        let base = StatuspageUrl::new("https://status.example.com/").unwrap();
        assert_eq!(
            incident_url(&base, "abc").unwrap(),
            "https://status.example.com/incidents/abc"
        );
    }
}
