//! Enterprise release registry.
//!
//! Releases are `major.minor` identifiers. The registry keeps the supported
//! releases newest first, so `latest` is the head of the list. Deprecated
//! releases are no longer served and can never be pinned as `latest`.

use crate::error::{Error, Result};
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Release {
    pub major: u32,
    pub minor: u32,
}

impl Ord for Release {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.major, self.minor).cmp(&(other.major, other.minor))
    }
}

impl PartialOrd for Release {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl FromStr for Release {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let invalid = || Error::Config(format!("invalid release identifier {s:?}"));
        let (major, minor) = s.trim().split_once('.').ok_or_else(invalid)?;
        Ok(Release {
            major: major.parse().map_err(|_| invalid())?,
            minor: minor.parse().map_err(|_| invalid())?,
        })
    }
}

impl fmt::Display for Release {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

#[derive(Debug, Clone)]
pub struct VersionRegistry {
    supported: Vec<Release>,
    deprecated: Vec<Release>,
    latest_override: Option<Release>,
}

impl VersionRegistry {
    pub fn new<S: AsRef<str>>(supported: &[S], deprecated: &[S]) -> Result<Self> {
        let mut supported = parse_all(supported)?;
        if supported.is_empty() {
            return Err(Error::Config(
                "at least one supported release is required".to_string(),
            ));
        }
        supported.sort_by(|a, b| b.cmp(a));
        supported.dedup();

        let mut deprecated = parse_all(deprecated)?;
        deprecated.sort_by(|a, b| b.cmp(a));
        deprecated.dedup();

        if let Some(both) = supported.iter().find(|r| deprecated.contains(r)) {
            return Err(Error::Config(format!(
                "release {both} is listed as both supported and deprecated"
            )));
        }

        Ok(Self {
            supported,
            deprecated,
            latest_override: None,
        })
    }

    /// Pin `latest` to a release chosen outside the registry.
    pub fn with_latest(mut self, release: Release) -> Result<Self> {
        if self.is_deprecated(release) {
            return Err(Error::Config(format!(
                "release {release} is deprecated and cannot be used as the latest release"
            )));
        }
        self.latest_override = Some(release);
        Ok(self)
    }

    pub fn latest(&self) -> Release {
        self.latest_override.unwrap_or(self.supported[0])
    }

    pub fn is_deprecated(&self, release: Release) -> bool {
        self.deprecated.contains(&release)
    }
}

fn parse_all<S: AsRef<str>>(items: &[S]) -> Result<Vec<Release>> {
    items.iter().map(|s| s.as_ref().parse()).collect()
}
