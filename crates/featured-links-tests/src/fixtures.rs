//! Expected content for every scenario, keyed by scenario name.
//!
//! Literal titles, intros and paths track live site content. They live in
//! `fixtures/featured-links.json` so a content change is a one-file edit.
//! Paths may contain `{version}`, which expands to the latest enterprise
//! release.

use camino::Utf8Path;
use docs_harness::{Release, VersionRegistry};
use eyre::{Result, WrapErr, eyre};
use facet::Facet;

/// The fixture table compiled into the binary.
pub const EMBEDDED: &str = include_str!("../fixtures/featured-links.json");

const VERSION_PLACEHOLDER: &str = "{version}";

#[derive(Debug, Clone, Facet)]
pub struct Fixtures {
    pub enterprise_server_releases: ReleaseList,
    pub non_listing_page: NonListingPage,
    pub default_locale_listing: Listing,
    pub localized_listing: LocalizedListing,
    pub version_scoped_listing: Listing,
    pub version_filtered_articles: FilteredArticles,
    pub page_context_enriched: EnrichedProjection,
    pub page_context_raw: RawProjection,
}

#[derive(Debug, Clone, Facet)]
pub struct ReleaseList {
    pub supported: Vec<String>,
    #[facet(default)]
    pub deprecated: Vec<String>,
}

#[derive(Debug, Clone, Facet)]
pub struct NonListingPage {
    pub path: String,
    /// Selector that must match nothing
    pub container: String,
}

/// A landing page whose link list has a fixed length and pinned entries.
#[derive(Debug, Clone, Facet)]
pub struct Listing {
    pub path: String,
    /// Selector for the link elements
    pub links: String,
    pub count: usize,
    #[facet(default)]
    pub pinned: Vec<PinnedLink>,
}

#[derive(Debug, Clone, Facet)]
pub struct PinnedLink {
    pub index: usize,
    pub href: String,
    /// Prefix of the `h4` child's text
    pub heading: String,
    /// Prefix of the `p` child's text
    pub intro: String,
}

#[derive(Debug, Clone, Facet)]
pub struct LocalizedListing {
    pub path: String,
    pub links: String,
    pub count: usize,
    /// Locale code; also picks the script the translated text must contain
    pub locale: String,
}

#[derive(Debug, Clone, Facet)]
pub struct FilteredArticles {
    pub path: String,
    pub links: String,
    pub more_than: usize,
    pub included: Vec<String>,
    pub excluded: Vec<String>,
}

#[derive(Debug, Clone, Facet)]
pub struct EnrichedProjection {
    pub path: String,
    pub query: String,
    pub href: String,
    pub title: String,
    /// Prefix of the first link's intro
    pub intro: String,
}

#[derive(Debug, Clone, Facet)]
pub struct RawProjection {
    pub path: String,
    pub query: String,
    pub first: String,
    /// Locale whose prefix raw paths must not carry
    pub locale: String,
}

impl Fixtures {
    pub fn embedded() -> Result<Self> {
        Self::parse(EMBEDDED, "embedded fixtures")
    }

    /// Load fixtures from `path`, or the embedded table when `None`.
    pub fn load(path: Option<&Utf8Path>) -> Result<Self> {
        match path {
            Some(path) => {
                let source = fs_err::read_to_string(path.as_std_path())?;
                Self::parse(&source, path.as_str())
            }
            None => Self::embedded(),
        }
    }

    pub fn parse(source: &str, origin: &str) -> Result<Self> {
        let fixtures: Fixtures = facet_json::from_str(source)
            .map_err(|e| eyre!("fixture parse error in {origin}: {e}"))?;
        fixtures
            .validate()
            .wrap_err_with(|| format!("invalid fixtures in {origin}"))?;
        Ok(fixtures)
    }

    /// Build the release registry, pinning `latest` when an override is given.
    pub fn registry(&self, latest_override: Option<&str>) -> Result<VersionRegistry> {
        let releases = &self.enterprise_server_releases;
        let registry = VersionRegistry::new(&releases.supported, &releases.deprecated)?;
        match latest_override {
            Some(raw) => {
                let release: Release = raw.parse()?;
                Ok(registry.with_latest(release)?)
            }
            None => Ok(registry),
        }
    }

    fn validate(&self) -> Result<()> {
        for (name, listing) in [
            ("default_locale_listing", &self.default_locale_listing),
            ("version_scoped_listing", &self.version_scoped_listing),
        ] {
            if listing.count == 0 {
                return Err(eyre!("{name}: count must be positive"));
            }
            if let Some(pin) = listing.pinned.iter().find(|p| p.index >= listing.count) {
                return Err(eyre!(
                    "{name}: pinned index {} is outside a list of {}",
                    pin.index,
                    listing.count
                ));
            }
        }
        let filtered = &self.version_filtered_articles;
        if filtered.included.is_empty() || filtered.excluded.is_empty() {
            return Err(eyre!(
                "version_filtered_articles: both included and excluded titles are required"
            ));
        }
        if let Some(title) = filtered
            .included
            .iter()
            .find(|t| filtered.excluded.contains(t))
        {
            return Err(eyre!(
                "version_filtered_articles: {title:?} is both included and excluded"
            ));
        }
        Ok(())
    }
}

/// Substitute the release into a fixture path.
pub fn expand(template: &str, release: Release) -> String {
    template.replace(VERSION_PLACEHOLDER, &release.to_string())
}
