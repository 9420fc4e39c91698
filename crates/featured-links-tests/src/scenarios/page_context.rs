//! Assertions against the page-context JSON projection.

use super::link_at;
use crate::suite::Suite;
use docs_harness::{Locale, Shape};
use eyre::{Result, eyre};

pub fn enriched_links(suite: &Suite) -> Result<()> {
    let fx = &suite.fixtures.page_context_enriched;
    let projection = suite.client.fetch_json(&fx.path, &fx.query)?;
    let links = projection.links()?;
    let first = links
        .first()
        .ok_or_else(|| eyre!("{} returned no links", projection.url()))?;

    assert_eq!(first.href, fx.href, "href of the first link from {}", projection.url());
    assert_eq!(first.title, fx.title, "title of the first link from {}", projection.url());
    let intro = first.intro.as_deref().unwrap_or_default();
    assert!(
        intro.starts_with(&fx.intro),
        "intro of the first link from {} should start with {:?}, got {intro:?}",
        projection.url(),
        fx.intro
    );
    Ok(())
}

pub fn raw_links(suite: &Suite) -> Result<()> {
    let fx = &suite.fixtures.page_context_raw;
    let projection = suite.client.fetch_json(&fx.path, &fx.query)?;
    let paths = projection.raw_paths()?;
    let first = paths
        .first()
        .ok_or_else(|| eyre!("{} returned no paths", projection.url()))?;

    assert_eq!(first, &fx.first, "first raw path from {}", projection.url());
    Ok(())
}

pub fn raw_links_omit_derived_fields(suite: &Suite) -> Result<()> {
    let fx = &suite.fixtures.page_context_raw;
    let locale = Locale::new(fx.locale.as_str());
    let projection = suite.client.fetch_json(&fx.path, &fx.query)?;

    assert_eq!(
        projection.shape()?,
        Shape::Strings,
        "{} should return bare paths",
        projection.url()
    );
    for path in projection.raw_paths()? {
        assert!(
            !locale.owns(&path),
            "raw path {path:?} from {} carries the {} prefix",
            projection.url(),
            locale.prefix()
        );
    }
    Ok(())
}

/// The enriched projection and the rendered listing describe the same links.
pub fn projection_matches_markup(suite: &Suite) -> Result<()> {
    let fx = &suite.fixtures.page_context_enriched;
    let listing = &suite.fixtures.default_locale_listing;

    let projection = suite.client.fetch_json(&fx.path, &fx.query)?;
    let links = projection.links()?;
    let from_json = links
        .first()
        .ok_or_else(|| eyre!("{} returned no links", projection.url()))?;

    let doc = suite.client.fetch_document(&fx.path)?;
    let rendered = doc.select(&listing.links)?;
    let first = link_at(&doc, &rendered, &listing.links, 0)?;

    assert_eq!(
        first.attr("href"),
        Some(from_json.href.as_str()),
        "first link href differs between {} and {}",
        projection.url(),
        doc.url()
    );
    assert_eq!(
        first.children_text("h4").trim(),
        from_json.title.trim(),
        "first link title differs between {} and {}",
        projection.url(),
        doc.url()
    );
    Ok(())
}
