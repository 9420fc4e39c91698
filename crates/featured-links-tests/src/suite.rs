//! Shared, read-only context handed to every scenario.

use crate::fixtures::{self, Fixtures};
use docs_harness::{DocsClient, HarnessConfig, Release, VersionRegistry};
use eyre::Result;
use std::time::Duration;
use tracing::info;

pub struct Suite {
    pub client: DocsClient,
    pub fixtures: Fixtures,
    pub releases: VersionRegistry,
    pub test_timeout: Duration,
}

impl Suite {
    pub fn from_config(config: &HarnessConfig) -> Result<Self> {
        let fixtures = Fixtures::load(config.fixtures.as_deref())?;
        let releases = fixtures.registry(config.latest_release.as_deref())?;
        info!(
            base_url = %config.base_url,
            latest = %releases.latest(),
            "Suite configured"
        );
        Ok(Self {
            client: DocsClient::new(config),
            fixtures,
            releases,
            test_timeout: config.test_timeout,
        })
    }

    pub fn latest(&self) -> Release {
        self.releases.latest()
    }

    /// A fixture path with `{version}` expanded to the latest release.
    pub fn versioned(&self, template: &str) -> String {
        fixtures::expand(template, self.latest())
    }
}
