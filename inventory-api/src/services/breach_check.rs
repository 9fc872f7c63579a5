//! Known-compromised-password lookup (k-anonymity pattern).
//!
//! Only the first five hex characters of the password's SHA-1 leave the
//! process; the service answers with every suffix in that prefix bucket
//! and the match is decided locally.

use sha1::{Digest, Sha1};
use std::time::Duration;

use crate::config::BreachCheckSettings;

#[derive(Debug, thiserror::Error)]
pub enum BreachCheckError {
    #[error("Breach lookup failed: {0}")]
    Upstream(#[from] reqwest::Error),
}

pub struct BreachCheckClient {
    http: reqwest::Client,
    base_url: String,
}

impl BreachCheckClient {
    pub fn new(settings: &BreachCheckSettings) -> Self {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(settings.timeout_secs))
            .build()
            .expect("reqwest client construction cannot fail with static options");

        Self {
            http,
            base_url: settings.api_url.trim_end_matches('/').to_string(),
        }
    }

    /// Returns `true` when the password appears in the breach corpus.
    ///
    /// Transport failures and timeouts surface as errors; the caller
    /// decides whether the check is mandatory.
    pub async fn is_breached(&self, password: &str) -> Result<bool, BreachCheckError> {
        let (prefix, suffix) = hash_prefix_suffix(password);

        let url = format!("{}/range/{}", self.base_url, prefix);
        let body = self
            .http
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        Ok(range_contains(&body, &suffix))
    }
}

/// Uppercase SHA-1 hex split into the 5-char bucket prefix and the
/// 35-char suffix matched against the range response.
fn hash_prefix_suffix(password: &str) -> (String, String) {
    let digest = Sha1::digest(password.as_bytes());
    let hash = hex::encode_upper(digest);
    (hash[..5].to_string(), hash[5..].to_string())
}

/// Match a suffix against a range response of `SUFFIX:COUNT` lines.
fn range_contains(body: &str, suffix: &str) -> bool {
    body.lines()
        .filter_map(|line| line.trim().split(':').next())
        .any(|candidate| candidate.eq_ignore_ascii_case(suffix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_prefix_suffix_shape() {
        let (prefix, suffix) = hash_prefix_suffix("password");

        assert_eq!(prefix.len(), 5);
        assert_eq!(suffix.len(), 35);
        // SHA-1("password") is a well-known digest.
        assert_eq!(prefix, "5BAA6");
        assert_eq!(suffix, "1E4C9B93F3F0682250B6CF8331B7EE68FD8");
    }

    #[test]
    fn test_range_contains_match() {
        let body = "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n\
                    1E4C9B93F3F0682250B6CF8331B7EE68FD8:3861493\r\n\
                    011053FD0102E94D6AE2F8B83D76FAF94F6:1";

        assert!(range_contains(body, "1E4C9B93F3F0682250B6CF8331B7EE68FD8"));
    }

    #[test]
    fn test_range_contains_no_match() {
        let body = "0018A45C4D1DEF81644B54AB7F969B88D65:1\r\n\
                    011053FD0102E94D6AE2F8B83D76FAF94F6:1";

        assert!(!range_contains(body, "FFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFFF"));
    }

    #[test]
    fn test_range_match_is_case_insensitive() {
        let body = "1e4c9b93f3f0682250b6cf8331b7ee68fd8:10";
        assert!(range_contains(body, "1E4C9B93F3F0682250B6CF8331B7EE68FD8"));
    }

    #[test]
    fn test_empty_range_response() {
        assert!(!range_contains("", "1E4C9B93F3F0682250B6CF8331B7EE68FD8"));
    }
}
