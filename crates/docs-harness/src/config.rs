//! Harness configuration read from the environment
//!
//! # Environment Variables
//!
//! - `DOCS_BASE_URL`: Base URL of the documentation site under test (required)
//! - `DOCS_RETRIES`: Attempts per request on connection reset (default 5)
//! - `DOCS_REQUEST_TIMEOUT_SECS`: Per-request timeout (default 60)
//! - `DOCS_TEST_TIMEOUT_SECS`: Per-test timeout (default 180)
//! - `DOCS_FIXTURES`: Path to a fixture file replacing the embedded table
//! - `DOCS_ENTERPRISE_LATEST`: Release used in place of the registry's latest

use crate::error::{Error, Result};
use camino::Utf8PathBuf;
use std::time::Duration;

pub const BASE_URL_VAR: &str = "DOCS_BASE_URL";

const DEFAULT_RETRIES: usize = 5;
const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(60);
const DEFAULT_TEST_TIMEOUT: Duration = Duration::from_secs(3 * 60);

#[derive(Debug, Clone)]
pub struct HarnessConfig {
    /// Site root, without a trailing slash
    pub base_url: String,
    pub retries: usize,
    pub request_timeout: Duration,
    pub test_timeout: Duration,
    pub fixtures: Option<Utf8PathBuf>,
    pub latest_release: Option<String>,
}

impl HarnessConfig {
    /// Build a config pointing at `base_url` with default limits.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: normalize_base_url(base_url.into()),
            retries: DEFAULT_RETRIES,
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            test_timeout: DEFAULT_TEST_TIMEOUT,
            fixtures: None,
            latest_release: None,
        }
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let base_url = lookup(BASE_URL_VAR)
            .filter(|v| !v.trim().is_empty())
            .ok_or_else(|| Error::Config(format!("{BASE_URL_VAR} must be set")))?;
        if !base_url.starts_with("http://") && !base_url.starts_with("https://") {
            return Err(Error::Config(format!(
                "{BASE_URL_VAR} must be an http(s) URL, got {base_url}"
            )));
        }

        let mut config = Self::new(base_url);

        if let Some(retries) = parse_var::<usize>(&lookup, "DOCS_RETRIES")? {
            config.retries = retries.max(1);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "DOCS_REQUEST_TIMEOUT_SECS")? {
            config.request_timeout = Duration::from_secs(secs);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "DOCS_TEST_TIMEOUT_SECS")? {
            config.test_timeout = Duration::from_secs(secs);
        }
        config.fixtures = lookup("DOCS_FIXTURES")
            .filter(|v| !v.is_empty())
            .map(Utf8PathBuf::from);
        config.latest_release = lookup("DOCS_ENTERPRISE_LATEST").filter(|v| !v.is_empty());

        Ok(config)
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
) -> Result<Option<T>> {
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::Config(format!("{key} must be a number, got {raw:?}"))),
    }
}

fn normalize_base_url(mut url: String) -> String {
    while url.ends_with('/') {
        url.pop();
    }
    url
}
